//! Extension point for remote file backends.
//!
//! [`RemoteFile`] describes what a backend for a non-local scheme (object
//! storage, SFTP, ...) has to supply. Every operation has a default body that
//! fails with [`FileError::NotImplemented`]; a backend overrides the ones it
//! supports. The connection and the stream are memoised in slots owned by the
//! backend, the same way [`LocalFile`](crate::LocalFile) caches its stream.

use std::io::{Read, Write};

use bytes::Bytes;
use regex::{Match, Regex};

use crate::error::{FileError, Result};
use crate::local::LocalFile;
use crate::mode::Mode;
use crate::uri::Uri;

/// Backend-specific connection settings, e.g. credentials or endpoints.
pub type ConnectOptions = serde_json::Map<String, serde_json::Value>;

/// A file reached through a remote backend.
pub trait RemoteFile {
    /// The backend's connection (client, session, ...).
    type Connection;
    /// The byte stream returned by [`RemoteFile::open_stream`].
    type Stream: Read + Write;

    /// The URI this file is addressed by.
    fn uri(&self) -> &Uri;

    /// The access mode requested for the stream.
    fn mode(&self) -> &Mode;

    /// Storage for the memoised connection.
    fn connection_slot(&mut self) -> &mut Option<Self::Connection>;

    /// Storage for the memoised stream.
    fn stream_slot(&mut self) -> &mut Option<Self::Stream>;

    /// Connect to the remote.
    fn connect(&self, _options: &ConnectOptions) -> Result<Self::Connection> {
        Err(FileError::NotImplemented("connect"))
    }

    /// Download the remote file to the local `target` URI.
    fn download(&mut self, _target: &Uri) -> Result<LocalFile> {
        Err(FileError::NotImplemented("download"))
    }

    /// Test file existence on the remote.
    fn exists(&mut self) -> Result<bool> {
        Err(FileError::NotImplemented("exists"))
    }

    /// Write everything from `data` to the remote file.
    fn write(&mut self, _data: &mut dyn Read) -> Result<u64> {
        Err(FileError::NotImplemented("write"))
    }

    /// Open a fresh stream to the remote file.
    fn open_stream(&mut self) -> Result<Self::Stream> {
        Err(FileError::NotImplemented("open_stream"))
    }

    /// Get the connection, connecting on first call. A failed connect is not
    /// cached.
    fn connection(&mut self, options: &ConnectOptions) -> Result<&mut Self::Connection> {
        let connection = match self.connection_slot().take() {
            Some(connection) => connection,
            None => self.connect(options)?,
        };
        Ok(self.connection_slot().insert(connection))
    }

    /// Get the stream, opening it on first call. Modes without `w` check
    /// [`RemoteFile::exists`] first.
    fn stream(&mut self) -> Result<&mut Self::Stream> {
        let stream = match self.stream_slot().take() {
            Some(stream) => stream,
            None => {
                if self.mode().requires_existing() && !self.exists()? {
                    return Err(FileError::NotFound(self.uri().to_string()));
                }
                self.open_stream()?
            }
        };
        Ok(self.stream_slot().insert(stream))
    }

    /// Read up to `size` bytes from the stream, or everything left.
    fn read(&mut self, size: Option<usize>) -> Result<Bytes> {
        let stream = self.stream()?;
        let mut buf = Vec::new();
        match size {
            Some(limit) => Read::by_ref(stream).take(limit as u64).read_to_end(&mut buf)?,
            None => stream.read_to_end(&mut buf)?,
        };
        Ok(Bytes::from(buf))
    }

    fn filename(&self) -> &str {
        self.uri().filename()
    }

    fn directory(&self) -> &str {
        self.uri().directory()
    }

    /// Match `pattern` against the filename, anchored at its start.
    fn matches(&self, pattern: &str) -> Result<Option<Match<'_>>> {
        self.uri().matches(pattern)
    }

    fn matches_regex(&self, re: &Regex) -> Option<Match<'_>> {
        self.uri().matches_regex(re)
    }
}
