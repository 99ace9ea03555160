//! The `LocalFile` handle and its operations.
//!
//! A `LocalFile` is addressed by a URI whose path component names a file on
//! the local filesystem. Nothing touches the filesystem at construction: the
//! underlying stream is opened on first use and kept for the lifetime of the
//! handle.

use std::fmt;
use std::fs;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::Path;

use bytes::Bytes;
use regex::{Match, Regex};
use sha2::{Digest, Sha256};
use url::Url;

use crate::error::{FileError, Result};
use crate::metadata::Metadata;
use crate::mode::Mode;
use crate::uri::Uri;

/// A file on the local filesystem, addressed by URI.
///
/// # Examples
///
/// ```no_run
/// # use furi::LocalFile;
/// # fn example() -> furi::error::Result<()> {
/// let mut out = LocalFile::with_mode("file:///tmp/greeting.txt", "w")?;
/// out.write("hello")?;
///
/// let mut file = LocalFile::new("/tmp/greeting.txt");
/// assert_eq!(file.filename(), "greeting.txt");
/// assert_eq!(file.read(None)?, "hello");
/// # Ok(())
/// # }
/// ```
pub struct LocalFile {
    uri: Uri,
    mode: Mode,
    stream: Option<fs::File>,
}

impl LocalFile {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Create a handle for reading the file at `uri`.
    pub fn new(uri: &str) -> Self {
        Self::from_parts(Uri::parse(uri), Mode::default())
    }

    /// Create a handle for the file at `uri`, to be opened in `mode`.
    ///
    /// Fails with [`FileError::InvalidMode`] if `mode` is not accepted.
    pub fn with_mode(uri: &str, mode: &str) -> Result<Self> {
        let mode = Mode::new(mode)?;
        Ok(Self::from_parts(Uri::parse(uri), mode))
    }

    /// Create a handle from an already parsed [`Url`].
    pub fn from_url(url: &Url, mode: &str) -> Result<Self> {
        let mode = Mode::new(mode)?;
        Ok(Self::from_parts(Uri::from(url), mode))
    }

    /// Create a handle from a parsed URI and a validated mode.
    pub fn from_parts(uri: Uri, mode: Mode) -> Self {
        tracing::trace!(%uri, %mode, "LocalFile created");
        Self {
            uri,
            mode,
            stream: None,
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Returns the parsed URI.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the access mode.
    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Returns the filesystem path, taken verbatim from the URI path.
    pub fn path(&self) -> &Path {
        Path::new(self.uri.path())
    }

    /// Returns the directory part of the path.
    pub fn directory(&self) -> &str {
        self.uri.directory()
    }

    /// Returns the final path segment.
    pub fn filename(&self) -> &str {
        self.uri.filename()
    }

    /// True once the stream has been opened.
    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Match `pattern` against the filename, anchored at its start.
    pub fn matches(&self, pattern: &str) -> Result<Option<Match<'_>>> {
        self.uri.matches(pattern)
    }

    /// Match a compiled regex against the filename, anchored at its start.
    pub fn matches_regex(&self, re: &Regex) -> Option<Match<'_>> {
        self.uri.matches_regex(re)
    }

    /// Test file existence. Always asks the filesystem.
    pub fn exists(&self) -> bool {
        self.path().exists()
    }

    // -----------------------------------------------------------------------
    // Stream
    // -----------------------------------------------------------------------

    /// Get the underlying stream, opening it on first call.
    ///
    /// Modes without `w` require the file to exist at that point and fail
    /// with [`FileError::NotFound`] otherwise. Later calls return the same
    /// handle, whatever has happened to the path since.
    pub fn stream(&mut self) -> Result<&mut fs::File> {
        let stream = match self.stream.take() {
            Some(stream) => stream,
            None => self.open_stream()?,
        };
        Ok(self.stream.insert(stream))
    }

    fn open_stream(&self) -> Result<fs::File> {
        if self.mode.requires_existing() && !self.exists() {
            return Err(FileError::NotFound(self.uri.to_string()));
        }
        let stream = self.mode.open_options()?.open(self.path())?;
        tracing::debug!(uri = %self.uri, mode = %self.mode, "Stream opened");
        Ok(stream)
    }

    /// Iterate over the remaining lines of the stream.
    pub fn lines(&mut self) -> Result<Lines<'_>> {
        Ok(Lines::new(self.stream()?))
    }

    // -----------------------------------------------------------------------
    // Read operations
    // -----------------------------------------------------------------------

    /// Read up to `size` bytes, or everything left when `size` is `None`.
    pub fn read(&mut self, size: Option<usize>) -> Result<Bytes> {
        let stream = self.stream()?;
        let mut buf = Vec::new();
        match size {
            Some(limit) => Read::by_ref(stream).take(limit as u64).read_to_end(&mut buf)?,
            None => stream.read_to_end(&mut buf)?,
        };
        Ok(Bytes::from(buf))
    }

    /// Read everything left as a UTF-8 string.
    pub fn read_text(&mut self) -> Result<String> {
        let data = self.read(None)?;
        Ok(String::from_utf8_lossy(&data).into_owned())
    }

    // -----------------------------------------------------------------------
    // Write operations
    // -----------------------------------------------------------------------

    /// Write `data` to the stream, returning the number of bytes written.
    pub fn write(&mut self, data: impl AsRef<[u8]>) -> Result<usize> {
        let data = data.as_ref();
        self.stream()?.write_all(data)?;
        Ok(data.len())
    }

    /// Copy everything from `reader` into the stream.
    pub fn write_from<R: Read + ?Sized>(&mut self, reader: &mut R) -> Result<u64> {
        let stream = self.stream()?;
        Ok(io::copy(reader, stream)?)
    }

    /// Close the stream, syncing written data to disk first.
    ///
    /// Dropping a `LocalFile` closes it as well, but discards any error.
    pub fn close(mut self) -> Result<()> {
        if let Some(stream) = self.stream.take() {
            if self.mode.is_writable() {
                stream.sync_all()?;
            }
            tracing::debug!(uri = %self.uri, "Stream closed");
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Inspection
    // -----------------------------------------------------------------------

    /// Collect what the filesystem currently reports about the file.
    pub fn metadata(&self) -> Result<Metadata> {
        Metadata::collect(&self.uri, &self.mode)
    }

    /// Calculate the SHA-256 checksum of the file contents.
    ///
    /// Reads through a separate handle; the position of the stream is left
    /// untouched.
    pub fn checksum(&self) -> Result<String> {
        let mut file = fs::File::open(self.path())?;
        let mut hasher = Sha256::new();
        io::copy(&mut file, &mut hasher)?;
        Ok(hex::encode(hasher.finalize()))
    }
}

impl fmt::Display for LocalFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uri)
    }
}

impl fmt::Debug for LocalFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalFile")
            .field("uri", &self.uri.to_string())
            .field("mode", &self.mode.as_str())
            .field("open", &self.stream.is_some())
            .finish()
    }
}

impl<'a> IntoIterator for &'a mut LocalFile {
    type Item = Result<Bytes>;
    type IntoIter = Lines<'a>;

    /// Iterate over lines. If the stream cannot be opened the error is the
    /// only item.
    fn into_iter(self) -> Lines<'a> {
        match self.stream() {
            Ok(stream) => Lines::new(stream),
            Err(err) => Lines {
                reader: None,
                error: Some(err),
            },
        }
    }
}

/// Forward-only iterator over the lines of a [`LocalFile`] stream.
///
/// Each line keeps its trailing `\n`. The first error is the last item.
/// Dropping the iterator moves the stream back to the end of the last line
/// handed out.
pub struct Lines<'a> {
    reader: Option<BufReader<&'a mut fs::File>>,
    error: Option<FileError>,
}

impl<'a> Lines<'a> {
    fn new(stream: &'a mut fs::File) -> Self {
        Self {
            reader: Some(BufReader::new(stream)),
            error: None,
        }
    }
}

impl Iterator for Lines<'_> {
    type Item = Result<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = self.error.take() {
            return Some(Err(err));
        }
        let reader = self.reader.as_mut()?;
        let mut line = Vec::new();
        match reader.read_until(b'\n', &mut line) {
            Ok(0) => None,
            Ok(_) => Some(Ok(Bytes::from(line))),
            Err(err) => {
                // A read error ends the iteration.
                self.reader = None;
                Some(Err(err.into()))
            }
        }
    }
}

impl Drop for Lines<'_> {
    fn drop(&mut self) {
        let Some(reader) = self.reader.as_mut() else {
            return;
        };
        if reader.buffer().is_empty() {
            return;
        }
        // Seeking through the BufReader accounts for the unread buffer.
        if let Err(err) = reader.seek(SeekFrom::Current(0)) {
            tracing::warn!(error = %err, "Failed to rewind stream after partial iteration");
        }
    }
}
