use crate::{ArchiveEngine, Error, Result, ZipEngine, ZipStatus, normalize_host};

use std::fmt::{self, Debug, Formatter};
use std::path::{Path, PathBuf};



/// A handle on one zip archive at a time, with directory-aware operations layered over the flat entry list.
///
/// Changes are buffered by the engine and only written when [close](Zipper::close) succeeds.  Dropping the handle
/// discards them.  Every operation either succeeds or returns the [Error] variant for that operation; the `bool`
/// results are always `true`.
///
/// ```no_run
/// # fn main() -> zipper::Result<()> {
/// let mut zipper = zipper::Zipper::new();
/// zipper.create("site.zip")?;
/// zipper.add_from_payload("index.html", "<h1>hi</h1>")?;
/// zipper.add_directory("public/assets", "assets")?;
/// zipper.delete_directory("assets/drafts")?;
/// zipper.close()?;
/// # Ok(())
/// # }
/// ```
pub struct Zipper<E: ArchiveEngine = ZipEngine> {
    pub(super) engine: E,
}

impl<E: ArchiveEngine> Debug for Zipper<E> {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        match self.filename() {
            Some(path)  => write!(fmt, "Zipper({:?})", path),
            None        => write!(fmt, "Zipper"),
        }
    }
}

impl Default for Zipper<ZipEngine> {
    fn default() -> Self { Self::new() }
}

impl Zipper<ZipEngine> {
    /// Create an unopened handle using [ZipEngine].
    pub fn new() -> Self { Self::with_engine(ZipEngine::new()) }
}

impl<E: ArchiveEngine> Zipper<E> {
    /// Create an unopened handle on top of a custom engine.
    pub fn with_engine(engine: E) -> Self { Self { engine } }

    /// The engine behind this handle.
    pub fn engine(&self) -> &E { &self.engine }

    /// Number of entries in the current archive, counting entries deleted since it was opened.  0 when unopened.
    pub fn count(&self) -> usize { self.engine.entry_count() }

    /// Absolute path of the current archive, or [None] when unopened.
    pub fn filename(&self) -> Option<&Path> { self.engine.current_path() }

    /// Open an existing archive, validating its consistency.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        let path = path.as_ref();
        log::debug!("open {}", path.display());
        match self.engine.open_existing(path, true) {
            Ok(())      => Ok(self),
            Err(status) => Err(Error::CannotOpenArchive { path: path.into(), status, reason: self.reason(status) }),
        }
    }

    /// Start a new archive at `path`, which must not exist yet.  Nothing is written until [close](Zipper::close).
    pub fn create(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        let path = path.as_ref();
        log::debug!("create {}", path.display());
        match self.engine.create_new(path, true) {
            Ok(())      => Ok(self),
            Err(status) => Err(Error::CannotCreateArchive { path: path.into(), status, reason: self.reason(status) }),
        }
    }

    /// Extract the whole archive, or only the named `entries`, into `destination`.
    pub fn extract_to(&mut self, destination: impl AsRef<Path>, entries: Option<&[&str]>) -> Result<bool> {
        let destination = destination.as_ref();
        log::debug!("extract to {}", destination.display());
        match self.engine.extract(destination, entries) {
            Ok(())      => Ok(true),
            Err(status) => Err(Error::UnableToExtractArchive { archive: self.archive(), status, reason: self.reason(status) }),
        }
    }

    /// Add (or replace) an entry named exactly `name` with `bytes` as its content.
    pub fn add_from_payload(&mut self, name: &str, bytes: impl Into<Vec<u8>>) -> Result<bool> {
        log::trace!("add payload {:?}", name);
        match self.engine.add_bytes(name, bytes.into()) {
            Ok(())      => Ok(true),
            Err(status) => Err(Error::CannotAddFile { archive: self.archive(), name: name.into(), status, reason: self.reason(status) }),
        }
    }

    /// Add (or replace) a host file.  Without `name`, the entry is named after the file's base name.
    pub fn add_file(&mut self, path: impl AsRef<Path>, name: Option<&str>) -> Result<bool> {
        let path = normalize_host(path.as_ref());
        log::trace!("add file {:?} as {:?}", path, name);
        match self.engine.add_file_from_host(Path::new(&path), name) {
            Ok(())      => Ok(true),
            Err(status) => Err(Error::CannotAddFile { archive: self.archive(), name: path, status, reason: self.reason(status) }),
        }
    }

    /// Add a directory marker entry (`name` plus a trailing `/`.)
    pub fn add_empty_directory(&mut self, name: &str) -> Result<bool> {
        log::trace!("add empty directory {:?}", name);
        match self.engine.add_empty_dir_marker(name) {
            Ok(())      => Ok(true),
            Err(status) => Err(Error::CannotAddEmptyDirectory { archive: self.archive(), name: name.into(), status, reason: self.reason(status) }),
        }
    }

    /// Delete the entry named exactly `name`.
    pub fn delete_file(&mut self, name: &str) -> Result<bool> {
        log::trace!("delete {:?}", name);
        match self.engine.delete_by_name(name) {
            Ok(())      => Ok(true),
            Err(status) => Err(Error::CannotDeleteElement { archive: self.archive(), name: name.into(), status, reason: self.reason(status) }),
        }
    }

    /// Write out all pending changes and return to the unopened state.
    ///
    /// Closing an unopened handle is an error (with no archive path.)  If closing fails the archive stays open.
    pub fn close(&mut self) -> Result<bool> {
        let path = self.archive();
        match self.engine.close() {
            Ok(())      => Ok(true),
            Err(status) => Err(Error::CannotCloseArchive { path, status, reason: self.reason(status) }),
        }
    }

    pub(super) fn archive(&self) -> Option<PathBuf> { self.filename().map(Path::to_path_buf) }

    pub(super) fn reason(&self, status: ZipStatus) -> String {
        match self.engine.status_string() {
            ""      => status.description().into(),
            reason  => reason.into(),
        }
    }
}
