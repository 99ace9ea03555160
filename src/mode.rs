//! File access modes.
//!
//! A mode is one of the strings in [`MODES`]. For compatibility a string made
//! up only of the single-character modes (`r`, `w`, `a`) is accepted as well,
//! e.g. `"rw"`, and so is the empty string. Such modes pass construction but
//! are rejected by the platform open, since they do not name exactly one of
//! read/write/append.

use std::fmt;
use std::fs::OpenOptions;
use std::io;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FileError, Result};

/// Every mode string that maps directly to a set of open flags.
pub const MODES: [&str; 12] = [
    "r", "rb", "r+", "rb+", "w", "wb", "w+", "wb+", "a", "ab", "a+", "ab+",
];

/// A validated access mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Mode(String);

impl Mode {
    /// Validate `mode` against the accepted mode strings.
    pub fn new(mode: &str) -> Result<Self> {
        let exact = MODES.contains(&mode);
        let per_char = mode
            .chars()
            .all(|c| MODES.iter().any(|m| m.len() == 1 && m.starts_with(c)));

        if exact || per_char {
            Ok(Self(mode.to_string()))
        } else {
            Err(FileError::InvalidMode(mode.to_string()))
        }
    }

    /// Returns the mode string as given.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True unless the mode writes from scratch. Only `w` modes may open a
    /// path that does not exist yet.
    pub fn requires_existing(&self) -> bool {
        !self.0.contains('w')
    }

    /// True if the mode asks for binary access.
    pub fn is_binary(&self) -> bool {
        self.0.contains('b')
    }

    /// True if the opened stream accepts writes.
    pub fn is_writable(&self) -> bool {
        self.0.contains(['w', 'a', '+'])
    }

    /// Translate the mode into open flags.
    ///
    /// Fails with [`io::ErrorKind::InvalidInput`] for modes that were only
    /// accepted by the per-character rule.
    pub fn open_options(&self) -> io::Result<OpenOptions> {
        if !MODES.contains(&self.as_str()) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "invalid mode {:?}: must have exactly one of read/write/append mode",
                    self.0
                ),
            ));
        }

        let update = self.0.contains('+');
        let mut options = OpenOptions::new();
        match self.0.chars().next() {
            Some('w') => {
                options.read(update).write(true).create(true).truncate(true);
            }
            Some('a') => {
                options.read(update).append(true).create(true);
            }
            _ => {
                options.read(true).write(update);
            }
        }
        Ok(options)
    }
}

impl Default for Mode {
    fn default() -> Self {
        Self("r".to_string())
    }
}

impl FromStr for Mode {
    type Err = FileError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for Mode {
    type Error = FileError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<Mode> for String {
    fn from(mode: Mode) -> Self {
        mode.0
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
