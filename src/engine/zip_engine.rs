use super::*;
use crate::{normalize, ZipStatus};

use tempfile::NamedTempFile;
use zip::ZipArchive;
use zip::write::{SimpleFileOptions, ZipWriter};

use std::fmt::{self, Debug, Display, Formatter};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};



const UNINITIALIZED : &str = "Invalid or uninitialized Zip object";

/// An [ArchiveEngine] backed by the [zip] crate.
///
/// Opening reads the central directory; the archive file stays open for the rest of the session so unchanged
/// entries can be copied (without recompression) when the session is closed.  Closing writes a complete new
/// archive to a temporary file next to the target and renames it into place.
#[derive(Default)]
pub struct ZipEngine {
    session:    Option<Session>,
    last_error: String,
}

struct Session {
    path:       PathBuf,
    source:     Option<ZipArchive<File>>,
    entries:    Vec<PendingEntry>,
    dirty:      bool,
}

impl Debug for ZipEngine {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        match self.session.as_ref() {
            Some(s) => write!(fmt, "ZipEngine({:?}, {} entries)", s.path, s.entries.len()),
            None    => write!(fmt, "ZipEngine"),
        }
    }
}

impl ZipEngine {
    pub fn new() -> Self { Self::default() }

    /// Start `session`, dropping the previous one (and its unsaved changes) if there was one.
    fn begin(&mut self, session: Session) {
        if let Some(old) = self.session.replace(session) {
            if old.dirty { log::warn!("discarding unsaved changes to {}", old.path.display()); }
        }
    }

    fn session_mut(&mut self) -> EngineResult<(&mut Session, &mut String)> {
        let Self { session, last_error } = self;
        last_error.clear();
        match session.as_mut() {
            Some(s) => Ok((s, last_error)),
            None    => Err(fail(last_error, ZipStatus::Invalid, UNINITIALIZED)),
        }
    }
}

/// Record `detail` as the last failure and hand back `status`.
fn fail(last_error: &mut String, status: ZipStatus, detail: impl Display) -> ZipStatus {
    *last_error = format!("{} {}", status.description(), detail);
    status
}

fn fail_io(last_error: &mut String, err: io::Error, fallback: ZipStatus) -> ZipStatus {
    let status = ZipStatus::from_io(&err, fallback);
    fail(last_error, status, err)
}

fn fail_zip(last_error: &mut String, err: zip::result::ZipError, fallback: ZipStatus) -> ZipStatus {
    let status = ZipStatus::from_zip(&err, fallback);
    fail(last_error, status, err)
}

/// `destination` joined with the `/`-separated entry `name`, or [None] if `name` would land outside of it.
fn enclosed_path(destination: &Path, name: &str) -> Option<PathBuf> {
    let name = normalize(name);
    if name.starts_with('/') { return None; }
    let mut path = destination.to_path_buf();
    for part in name.split('/') {
        match part {
            "" | "."                => continue,
            ".."                    => return None,
            p if !is_plain(p)       => return None,
            p                       => path.push(p),
        }
    }
    Some(path)
}

/// `part` is a single ordinary path component on this platform: no root, no drive prefix.
fn is_plain(part: &str) -> bool {
    let mut components = Path::new(part).components();
    let single = matches!((components.next(), components.next()), (Some(Component::Normal(_)), None));
    single && !(cfg!(windows) && part.contains(':')) // NTFS alternate data streams
}

fn options_for(len: u64) -> SimpleFileOptions {
    SimpleFileOptions::default().large_file(len >= u32::MAX as u64)
}

impl ArchiveEngine for ZipEngine {
    fn open_existing(&mut self, path: &Path, check_consistency: bool) -> EngineResult<()> {
        self.last_error.clear();
        let last_error = &mut self.last_error;

        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => { last_error.clear(); ZipStatus::NoEntry }
            _                       => fail_io(last_error, e, ZipStatus::Open),
        })?;
        let len = file.metadata().map_err(|e| fail_io(last_error, e, ZipStatus::Read))?.len();
        let abs = fs::canonicalize(path).map_err(|e| fail_io(last_error, e, ZipStatus::Open))?;

        let mut entries = Vec::new();
        let source = if len == 0 {
            None // libzip treats a 0-byte file as an empty archive
        } else {
            let mut archive = ZipArchive::new(file).map_err(|e| fail_zip(last_error, e, ZipStatus::Read))?;
            for i in 0..archive.len() {
                match archive.by_index_raw(i) {
                    Ok(entry)                       => entries.push(PendingEntry::new(entry.name(), Source::Archived(i))),
                    Err(e) if check_consistency     => return Err(fail(last_error, ZipStatus::Inconsistent, e)),
                    Err(e)                          => log::warn!("skipping unreadable entry #{} of {}: {}", i, abs.display(), e),
                }
            }
            Some(archive)
        };

        log::debug!("opened {} ({} entries)", abs.display(), entries.len());
        self.begin(Session { path: abs, source, entries, dirty: false });
        Ok(())
    }

    fn create_new(&mut self, path: &Path, exclusive: bool) -> EngineResult<()> {
        self.last_error.clear();
        if path.exists() {
            if exclusive { return Err(ZipStatus::Exists); }
            return self.open_existing(path, false);
        }
        let abs = std::path::absolute(path).map_err(|e| fail_io(&mut self.last_error, e, ZipStatus::Invalid))?;
        log::debug!("created {} (pending)", abs.display());
        self.begin(Session { path: abs, source: None, entries: Vec::new(), dirty: false });
        Ok(())
    }

    fn extract(&mut self, destination: &Path, entries: Option<&[&str]>) -> EngineResult<()> {
        let (session, last_error) = self.session_mut()?;
        let Session { source, entries: slots, .. } = session;

        let selected = match entries {
            None        => (0..slots.len()).filter(|&i| slots[i].is_live()).collect::<Vec<_>>(),
            Some(names) => {
                let mut selected = Vec::with_capacity(names.len());
                for name in names {
                    match find_live(slots, name) {
                        Some(i) => selected.push(i),
                        None    => return Err(fail(last_error, ZipStatus::NoEntry, name)),
                    }
                }
                selected
            },
        };

        fs::create_dir_all(destination).map_err(|e| fail_io(last_error, e, ZipStatus::Write))?;
        for i in selected {
            let entry = &slots[i];
            let target = enclosed_path(destination, &entry.name).ok_or_else(|| fail(last_error, ZipStatus::Invalid, &entry.name))?;
            log::trace!("extracting {:?} to {}", entry.name, target.display());

            if entry.is_dir() {
                fs::create_dir_all(&target).map_err(|e| fail_io(last_error, e, ZipStatus::Write))?;
                continue;
            }
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| fail_io(last_error, e, ZipStatus::Write))?;
            }

            match &entry.source {
                Source::Directory       => {},
                Source::Bytes(bytes)    => fs::write(&target, bytes).map_err(|e| fail_io(last_error, e, ZipStatus::Write))?,
                Source::HostFile(host)  => { fs::copy(host, &target).map_err(|e| fail_io(last_error, e, ZipStatus::Read))?; },
                Source::Archived(n)     => {
                    let archive = source.as_mut().ok_or_else(|| fail(last_error, ZipStatus::Internal, "archived entry without a source archive"))?;
                    let mut file = archive.by_index(*n).map_err(|e| fail_zip(last_error, e, ZipStatus::Read))?;
                    let mut out = File::create(&target).map_err(|e| fail_io(last_error, e, ZipStatus::Write))?;
                    io::copy(&mut file, &mut out).map_err(|e| fail_io(last_error, e, ZipStatus::Read))?;
                },
            }
        }
        Ok(())
    }

    fn add_bytes(&mut self, name: &str, content: Vec<u8>) -> EngineResult<()> {
        let (session, last_error) = self.session_mut()?;
        if name.is_empty() { return Err(fail(last_error, ZipStatus::Invalid, "empty entry name")); }
        upsert(&mut session.entries, name, Source::Bytes(content));
        session.dirty = true;
        Ok(())
    }

    fn add_file_from_host(&mut self, host_path: &Path, name: Option<&str>) -> EngineResult<()> {
        let (session, last_error) = self.session_mut()?;
        let meta = fs::metadata(host_path).map_err(|e| fail_io(last_error, e, ZipStatus::Read))?;
        if !meta.is_file() { return Err(fail(last_error, ZipStatus::Invalid, format!("{} is not a regular file", host_path.display()))); }

        let name = match name {
            Some(name)  => name.to_string(),
            None        => match host_path.file_name() {
                Some(base)  => base.to_string_lossy().into_owned(),
                None        => return Err(fail(last_error, ZipStatus::Invalid, "host path has no file name")),
            },
        };
        if name.is_empty() { return Err(fail(last_error, ZipStatus::Invalid, "empty entry name")); }

        upsert(&mut session.entries, &name, Source::HostFile(host_path.to_path_buf()));
        session.dirty = true;
        Ok(())
    }

    fn add_empty_dir_marker(&mut self, name: &str) -> EngineResult<()> {
        let (session, last_error) = self.session_mut()?;
        if name.is_empty() { return Err(fail(last_error, ZipStatus::Invalid, "empty directory name")); }
        let mut name = name.to_string();
        if !name.ends_with('/') { name.push('/'); }
        if find_live(&session.entries, &name).is_some() { return Err(ZipStatus::Exists); }
        session.entries.push(PendingEntry::new(name, Source::Directory));
        session.dirty = true;
        Ok(())
    }

    fn delete_by_name(&mut self, name: &str) -> EngineResult<()> {
        let (session, _) = self.session_mut()?;
        let i = find_live(&session.entries, name).ok_or(ZipStatus::NoEntry)?;
        session.entries[i].deleted = true;
        session.dirty = true;
        Ok(())
    }

    fn name_at_index(&self, index: usize) -> Option<&str> {
        let entry = self.session.as_ref()?.entries.get(index)?;
        if entry.is_live() { Some(&entry.name) } else { None }
    }

    fn entry_count(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.entries.len())
    }

    fn current_path(&self) -> Option<&Path> {
        self.session.as_ref().map(|s| s.path.as_path())
    }

    fn close(&mut self) -> EngineResult<()> {
        let (session, last_error) = self.session_mut()?;
        if session.dirty { write_out(session, last_error)?; }
        log::debug!("closed {}", session.path.display());
        self.session = None;
        Ok(())
    }

    fn status_string(&self) -> &str { &self.last_error }
}

/// Make a session's changes durable.
///
/// Zero live entries means no archive at all: an existing file is removed, a new one is never written.
fn write_out(session: &mut Session, last_error: &mut String) -> EngineResult<()> {
    let Session { path, source, entries, .. } = session;
    let live = entries.iter().filter(|e| e.is_live()).collect::<Vec<_>>();

    if live.is_empty() {
        *source = None; // release the handle before removing the file
        if path.exists() {
            fs::remove_file(&*path).map_err(|e| fail_io(last_error, e, ZipStatus::Remove))?;
            log::debug!("removed {} (no entries left)", path.display());
        }
        return Ok(());
    }

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty()    => dir,
        _                                           => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dir).map_err(|e| fail_io(last_error, e, ZipStatus::TmpOpen))?;
    let mut writer = ZipWriter::new(tmp);

    for entry in live {
        log::trace!("writing {:?}", entry.name);
        match &entry.source {
            Source::Directory       => writer.add_directory(entry.name.as_str(), SimpleFileOptions::default()).map_err(|e| fail_zip(last_error, e, ZipStatus::Write))?,
            Source::Archived(n)     => {
                let archive = source.as_mut().ok_or_else(|| fail(last_error, ZipStatus::Internal, "archived entry without a source archive"))?;
                let file = archive.by_index_raw(*n).map_err(|e| fail_zip(last_error, e, ZipStatus::Read))?;
                writer.raw_copy_file(file).map_err(|e| fail_zip(last_error, e, ZipStatus::Write))?;
            },
            Source::Bytes(bytes)    => {
                writer.start_file(entry.name.as_str(), options_for(bytes.len() as u64)).map_err(|e| fail_zip(last_error, e, ZipStatus::Write))?;
                writer.write_all(bytes).map_err(|e| fail_io(last_error, e, ZipStatus::Write))?;
            },
            Source::HostFile(host)  => {
                let mut file = File::open(host).map_err(|e| fail_io(last_error, e, ZipStatus::Read))?;
                let len = file.metadata().map_err(|e| fail_io(last_error, e, ZipStatus::Read))?.len();
                writer.start_file(entry.name.as_str(), options_for(len)).map_err(|e| fail_zip(last_error, e, ZipStatus::Write))?;
                io::copy(&mut file, &mut writer).map_err(|e| fail_io(last_error, e, ZipStatus::Read))?;
            },
        }
    }

    let tmp = writer.finish().map_err(|e| fail_zip(last_error, e, ZipStatus::Write))?;
    tmp.persist(&*path).map_err(|e| fail_io(last_error, e.error, ZipStatus::Rename))?;
    Ok(())
}
