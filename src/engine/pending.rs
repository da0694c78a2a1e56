use std::path::PathBuf;



/// Where a queued entry's content comes from when the archive is written out or extracted.
pub(crate) enum Source {
    /// Entry `n` of the archive the session was opened from.
    Archived(usize),
    Bytes(Vec<u8>),
    HostFile(PathBuf),
    Directory,
}

/// One slot of a session's entry list.
///
/// Deleted slots stay in place until the session ends so that entry indices remain stable.
pub(crate) struct PendingEntry {
    pub name:       String,
    pub source:     Source,
    pub deleted:    bool,
}

impl PendingEntry {
    pub fn new(name: impl Into<String>, source: Source) -> Self {
        Self { name: name.into(), source, deleted: false }
    }

    pub fn is_live(&self) -> bool { !self.deleted }
    pub fn is_dir(&self) -> bool { matches!(self.source, Source::Directory) || self.name.ends_with('/') }
}

/// Index of the live entry called `name`.
pub(crate) fn find_live(entries: &[PendingEntry], name: &str) -> Option<usize> {
    entries.iter().position(|e| e.is_live() && e.name == name)
}

/// Replace the content of the live entry called `name`, or append a new one.
pub(crate) fn upsert(entries: &mut Vec<PendingEntry>, name: &str, source: Source) {
    match find_live(entries, name) {
        Some(i) => entries[i].source = source,
        None    => entries.push(PendingEntry::new(name, source)),
    }
}
