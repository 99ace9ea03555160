//! furi: file access by URI.
//!
//! A file is addressed uniformly by a URI, either a bare path or a `file://`
//! URI, and read or written through a small handle that opens the underlying
//! stream on first use.
//!
//! # Overview
//!
//! - [`LocalFile`]: a file on the local filesystem
//! - [`RemoteFile`]: the trait a backend for a remote scheme implements
//! - [`Uri`]: URI components, parsed without normalisation
//! - [`Mode`]: validated access modes (`r`, `wb+`, `a`, ...)
//!
//! # Examples
//!
//! ```no_run
//! # use furi::LocalFile;
//! # fn example() -> furi::error::Result<()> {
//! let mut file = LocalFile::with_mode("file:///var/log/app.log", "r")?;
//! for line in &mut file {
//!     let line = line?;
//!     print!("{}", String::from_utf8_lossy(&line));
//! }
//! # Ok(())
//! # }
//! ```

pub mod detection;
pub mod error;
pub mod local;
pub mod metadata;
pub mod mode;
pub mod remote;
pub mod uri;

// Re-export primary types at the crate root for convenience.
pub use crate::error::FileError;
pub use crate::local::{LocalFile, Lines};
pub use crate::metadata::{EntryKind, Metadata};
pub use crate::mode::{Mode, MODES};
pub use crate::remote::{ConnectOptions, RemoteFile};
pub use crate::uri::Uri;

/// The crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
