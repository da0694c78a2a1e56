use crate::ZipStatus;

use std::path::{Path, PathBuf};



/// A zipper error.  Every failed archive primitive maps onto exactly one variant.
///
/// Each variant carries the archive's path, the entry involved (where there is one), the engine's [ZipStatus],
/// and a human-readable reason: the engine's own description of the failure when it has one, otherwise
/// [ZipStatus::description].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("Can't open zip archive [{}]. Reason: {reason}", path.display())]
    CannotOpenArchive { path: PathBuf, status: ZipStatus, reason: String },

    #[error("Can't create zip archive [{}]. Reason: {reason}", path.display())]
    CannotCreateArchive { path: PathBuf, status: ZipStatus, reason: String },

    #[error("Can't add file [{name}] to zip archive [{}]. Reason: {reason}", display_opt(archive))]
    CannotAddFile { archive: Option<PathBuf>, name: String, status: ZipStatus, reason: String },

    #[error("Can't add empty directory [{name}] to zip archive [{}]. Reason: {reason}", display_opt(archive))]
    CannotAddEmptyDirectory { archive: Option<PathBuf>, name: String, status: ZipStatus, reason: String },

    #[error("Can't delete element [{name}] from zip archive [{}]. Reason: {reason}", display_opt(archive))]
    CannotDeleteElement { archive: Option<PathBuf>, name: String, status: ZipStatus, reason: String },

    #[error("Unable to extract zip archive [{}]. Reason: {reason}", display_opt(archive))]
    UnableToExtractArchive { archive: Option<PathBuf>, status: ZipStatus, reason: String },

    #[error("Can't close zip archive [{}]. Reason: {reason}", display_opt(path))]
    CannotCloseArchive { path: Option<PathBuf>, status: ZipStatus, reason: String },

    #[cfg(feature = "vfs012")]
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] vfs012::VfsError),
}

/// Shorthand for [std::result::Result]<T, zipper::[Error]>
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The engine status behind this error, if it came from the archive engine.
    pub fn status(&self) -> Option<ZipStatus> {
        match self {
            Error::CannotOpenArchive        { status, .. }  |
            Error::CannotCreateArchive      { status, .. }  |
            Error::CannotAddFile            { status, .. }  |
            Error::CannotAddEmptyDirectory  { status, .. }  |
            Error::CannotDeleteElement      { status, .. }  |
            Error::UnableToExtractArchive   { status, .. }  |
            Error::CannotCloseArchive       { status, .. }  => Some(*status),
            #[cfg(feature = "vfs012")]
            Error::Filesystem(_)                            => None,
        }
    }

    /// The resolved human-readable reason, if it came from the archive engine.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Error::CannotOpenArchive        { reason, .. }  |
            Error::CannotCreateArchive      { reason, .. }  |
            Error::CannotAddFile            { reason, .. }  |
            Error::CannotAddEmptyDirectory  { reason, .. }  |
            Error::CannotDeleteElement      { reason, .. }  |
            Error::UnableToExtractArchive   { reason, .. }  |
            Error::CannotCloseArchive       { reason, .. }  => Some(reason.as_str()),
            #[cfg(feature = "vfs012")]
            Error::Filesystem(_)                            => None,
        }
    }

    /// The archive this error concerns.  [None] when no archive was open (e.g. closing an unopened handle.)
    pub fn archive(&self) -> Option<&Path> {
        match self {
            Error::CannotOpenArchive        { path, .. }    |
            Error::CannotCreateArchive      { path, .. }    => Some(path.as_path()),
            Error::CannotAddFile            { archive, .. } |
            Error::CannotAddEmptyDirectory  { archive, .. } |
            Error::CannotDeleteElement      { archive, .. } |
            Error::UnableToExtractArchive   { archive, .. } => archive.as_deref(),
            Error::CannotCloseArchive       { path, .. }    => path.as_deref(),
            #[cfg(feature = "vfs012")]
            Error::Filesystem(_)                            => None,
        }
    }

    /// The entry or directory name involved, for errors that concern one.
    pub fn entry(&self) -> Option<&str> {
        match self {
            Error::CannotAddFile            { name, .. }    |
            Error::CannotAddEmptyDirectory  { name, .. }    |
            Error::CannotDeleteElement      { name, .. }    => Some(name.as_str()),
            _                                               => None,
        }
    }
}

fn display_opt(path: &Option<PathBuf>) -> String {
    match path {
        Some(path)  => path.display().to_string(),
        None        => String::new(),
    }
}
