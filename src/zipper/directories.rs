use super::Zipper;
use crate::path::{directory_prefix, is_separator};
use crate::{ArchiveEngine, Error, Result, ZipStatus, normalize, normalize_host};

use walkdir::WalkDir;

use std::path::Path;



impl<E: ArchiveEngine> Zipper<E> {
    /// Recursively add every regular file below `real_path`, named `relative_path/<sub path>` in the archive.
    ///
    /// Symbolic links and special files (sockets, fifos, devices...) are skipped rather than reported: their
    /// metadata doesn't survive a trip between platforms.  Empty directories produce no entries.  The first file
    /// that can't be added aborts the walk; files queued before it stay queued.
    pub fn add_directory(&mut self, real_path: impl AsRef<Path>, relative_path: &str) -> Result<bool> {
        let root = real_path.as_ref();
        let base = normalize(relative_path.trim_end_matches(is_separator));
        log::debug!("add directory {} as {:?}", root.display(), base);

        for entry in WalkDir::new(root).min_depth(1).follow_links(false).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let status = e.io_error().map_or(ZipStatus::Read, |io| ZipStatus::from_io(io, ZipStatus::Read));
                let name = normalize_host(e.path().unwrap_or(root));
                Error::CannotAddFile { archive: self.archive(), name, status, reason: e.to_string() }
            })?;

            let file_type = entry.file_type();
            if file_type.is_dir() { continue }
            if !file_type.is_file() {
                log::debug!("skipping {} (not a regular file)", entry.path().display());
                continue;
            }

            let sub_path = entry.path().strip_prefix(root).unwrap_or(entry.path());
            let name = match base.as_str() {
                ""      => normalize_host(sub_path),
                base    => format!("{}/{}", base, normalize_host(sub_path)),
            };
            self.add_file(entry.path(), Some(&name))?;
        }
        Ok(true)
    }

    /// Delete every entry below the virtual directory `name`, and its marker entry if there is one.
    ///
    /// Deleting a directory with nothing in it (or that doesn't exist at all) succeeds without changing anything.
    /// The first entry that can't be deleted aborts the operation; entries deleted before it stay deleted.
    pub fn delete_directory(&mut self, name: &str) -> Result<bool> {
        let prefix = directory_prefix(name);
        log::debug!("delete directory {:?}", prefix);

        for i in 0..self.engine.entry_count() {
            let entry = match self.engine.name_at_index(i) {
                Some(entry) if normalize(entry).starts_with(&prefix)    => entry.to_string(),
                _                                                       => continue,
            };
            self.delete_file(&entry)?;
        }

        self.delete_marker(&prefix);
        Ok(true)
    }

    /// Best-effort removal of a directory marker.  Never fails: the scan in [Zipper::delete_directory] normally
    /// removed the marker already, and a directory without one is fine too.
    pub(super) fn delete_marker(&mut self, prefix: &str) {
        if let Err(status) = self.engine.delete_by_name(prefix) {
            log::trace!("no marker {:?} to delete: {}", prefix, status);
        }
    }
}
