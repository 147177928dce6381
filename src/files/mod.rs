//! Static file subsystem.
//!
//! # Data Flow
//! ```text
//! Relative request path
//!     → static_files.rs (resolve under root, reject traversal, read)
//!     → mime.rs (content type from extension)
//!     → StaticFile { content_type, body }
//! ```

pub mod mime;
pub mod static_files;

pub use static_files::{StaticFile, StaticFileError, StaticFileServer};
