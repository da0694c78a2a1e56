use std::fmt::{self, Display, Formatter};
use std::io;
use zip::result::ZipError;



/// Outcome code of a failed archive engine primitive.
///
/// The numeric values match libzip's `ZIP_ER_*` constants, so codes logged or persisted by other zip tooling
/// mean the same thing here.  [ZipStatus::Ok] never appears inside an [Error](crate::Error).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ZipStatus {
    Ok                      = 0,
    MultiDisk               = 1,
    Rename                  = 2,
    Close                   = 3,
    Seek                    = 4,
    Read                    = 5,
    Write                   = 6,
    Crc                     = 7,
    ZipClosed               = 8,
    NoEntry                 = 9,
    Exists                  = 10,
    Open                    = 11,
    TmpOpen                 = 12,
    Zlib                    = 13,
    Memory                  = 14,
    Changed                 = 15,
    CompressionNotSupported = 16,
    Eof                     = 17,
    Invalid                 = 18,
    NotZip                  = 19,
    Internal                = 20,
    Inconsistent            = 21,
    Remove                  = 22,
    Deleted                 = 23,
}

const ALL : [ZipStatus; 24] = {
    use ZipStatus::*;
    [
        Ok, MultiDisk, Rename, Close, Seek, Read, Write, Crc, ZipClosed, NoEntry, Exists, Open,
        TmpOpen, Zlib, Memory, Changed, CompressionNotSupported, Eof, Invalid, NotZip, Internal, Inconsistent, Remove, Deleted,
    ]
};

impl ZipStatus {
    /// The stable integer code of this status.
    pub fn code(self) -> i32 { self as i32 }

    /// Look up a status by its integer code.  Returns [None] for codes outside the known range.
    pub fn from_code(code: i32) -> Option<Self> {
        ALL.iter().copied().find(|s| s.code() == code)
    }

    /// Static human-readable reason, used whenever the engine has nothing more specific to say.
    pub fn description(self) -> &'static str {
        match self {
            ZipStatus::Ok                       => "No error.",
            ZipStatus::MultiDisk                => "Multi-disk zip archives not supported.",
            ZipStatus::Rename                   => "Renaming temporary file failed.",
            ZipStatus::Close                    => "Closing zip archive failed.",
            ZipStatus::Seek                     => "Seek error.",
            ZipStatus::Read                     => "Read error.",
            ZipStatus::Write                    => "Write error.",
            ZipStatus::Crc                      => "CRC error.",
            ZipStatus::ZipClosed                => "Containing zip archive was closed.",
            ZipStatus::NoEntry                  => "No such file.",
            ZipStatus::Exists                   => "File already exists.",
            ZipStatus::Open                     => "Can't open file.",
            ZipStatus::TmpOpen                  => "Failure to create temporary file.",
            ZipStatus::Zlib                     => "Zlib error.",
            ZipStatus::Memory                   => "Memory allocation failure.",
            ZipStatus::Changed                  => "Entry has been changed.",
            ZipStatus::CompressionNotSupported  => "Compression method not supported.",
            ZipStatus::Eof                      => "Premature EOF.",
            ZipStatus::Invalid                  => "Invalid argument.",
            ZipStatus::NotZip                   => "Not a zip archive.",
            ZipStatus::Internal                 => "Internal error.",
            ZipStatus::Inconsistent             => "Zip archive inconsistent.",
            ZipStatus::Remove                   => "Can't remove file.",
            ZipStatus::Deleted                  => "Entry has been deleted.",
        }
    }

    /// Like [ZipStatus::description], but for raw codes that may not be known.
    pub fn describe_code(code: i32) -> String {
        match Self::from_code(code) {
            Some(status)    => status.description().into(),
            None            => format!("Unknown status: {}", code),
        }
    }

    /// Classify an I/O failure.  `fallback` is used for kinds that don't map onto a more specific status.
    pub(crate) fn from_io(err: &io::Error, fallback: ZipStatus) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound         => ZipStatus::NoEntry,
            io::ErrorKind::AlreadyExists    => ZipStatus::Exists,
            io::ErrorKind::OutOfMemory      => ZipStatus::Memory,
            io::ErrorKind::UnexpectedEof    => ZipStatus::Eof,
            io::ErrorKind::InvalidInput     => ZipStatus::Invalid,
            _                               => fallback,
        }
    }

    /// Classify a `zip` crate failure.  `fallback` is used for plain I/O errors of no particular kind.
    pub(crate) fn from_zip(err: &ZipError, fallback: ZipStatus) -> Self {
        match err {
            ZipError::Io(e)                     => Self::from_io(e, fallback),
            ZipError::InvalidArchive(_)         => ZipStatus::NotZip,
            ZipError::UnsupportedArchive(m) if m.contains("multi") || m.contains("disk")
                                                => ZipStatus::MultiDisk,
            ZipError::UnsupportedArchive(_)     => ZipStatus::CompressionNotSupported,
            ZipError::FileNotFound              => ZipStatus::NoEntry,
            _                                   => ZipStatus::Internal,
        }
    }
}

impl Display for ZipStatus {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result { write!(fmt, "{} ({})", self.description(), self.code()) }
}
