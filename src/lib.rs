//! zipper: a directory-aware handle on zip archives.
//!
//! A zip archive is a flat list of named entries.  [Zipper] lets you treat it like a directory tree anyway:
//! add whole host directories, delete a virtual directory (every entry under its prefix), extract some or all
//! entries, and flatten a lone top-level folder after extraction.  All changes are buffered until
//! [Zipper::close].
//!
//! Every failure is a typed [Error] carrying the archive path, the entry involved, a [ZipStatus] code and a
//! human-readable reason.
//!
//! # Features
//!
//! * `vfs012` (default): [Zipper::ensure_source_in_root_directory] and [flatten_single_root], via `vfs` 0.12
//! * `zip-deflate`, `zip-bzip2` (default): compression methods supported when reading and writing
//! * `zip-time`: timestamps on written entries
#![forbid(unsafe_code)]

mod error;  pub use error::*;
mod path;   pub use path::{normalize, normalize_host};
mod status; pub use status::*;
#[path = "engine/_engine.rs"] mod engine; pub use engine::*;
#[path = "zipper/_zipper.rs"] mod zipper; pub use zipper::*;
