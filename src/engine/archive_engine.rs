use crate::ZipStatus;

use std::path::Path;



/// Shorthand for [std::result::Result]<T, [ZipStatus]>
pub type EngineResult<T> = std::result::Result<T, ZipStatus>;

/// The primitive archive operations [Zipper](crate::Zipper) is built on.
///
/// An engine holds at most one session (one open or newly created archive.)  Mutations are buffered until
/// [close](ArchiveEngine::close), which makes them durable and ends the session.  Every fallible primitive reports
/// a [ZipStatus] on failure, and may leave a more specific description behind for
/// [status_string](ArchiveEngine::status_string).
///
/// [ZipEngine] is the implementation used by default.
pub trait ArchiveEngine {
    /// Start a session on an existing archive.  On success, any previous session is discarded without saving.
    fn open_existing(&mut self, path: &Path, check_consistency: bool) -> EngineResult<()>;

    /// Start a session on a new archive at `path`.  With `exclusive`, fails with [ZipStatus::Exists] if `path` exists.
    fn create_new(&mut self, path: &Path, exclusive: bool) -> EngineResult<()>;

    /// Materialize every live entry (or only `entries`, by name) under `destination`.
    fn extract(&mut self, destination: &Path, entries: Option<&[&str]>) -> EngineResult<()>;

    /// Queue an entry with in-memory content, replacing any live entry of the same name.
    fn add_bytes(&mut self, name: &str, content: Vec<u8>) -> EngineResult<()>;

    /// Queue a host file, replacing any live entry of the same name.  `name` defaults to the host file's base name.
    fn add_file_from_host(&mut self, host_path: &Path, name: Option<&str>) -> EngineResult<()>;

    /// Queue a directory marker.  A `/` is appended to `name` if missing.
    fn add_empty_dir_marker(&mut self, name: &str) -> EngineResult<()>;

    /// Mark the live entry called `name` as deleted.
    fn delete_by_name(&mut self, name: &str) -> EngineResult<()>;

    /// Name of the entry at `index`, or [None] if out of range or deleted this session.
    fn name_at_index(&self, index: usize) -> Option<&str>;

    /// Number of entry slots in the session, including ones deleted since it started.  0 without a session.
    fn entry_count(&self) -> usize;

    /// Absolute path of the session's archive.
    fn current_path(&self) -> Option<&Path>;

    /// Write out all buffered changes and end the session.  On failure the session stays active.
    fn close(&mut self) -> EngineResult<()>;

    /// Description of the last failure, or an empty string if the engine has nothing beyond the status code.
    fn status_string(&self) -> &str;
}
