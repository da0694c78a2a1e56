use super::Zipper;
use crate::{ArchiveEngine, Result};

use ::vfs012::{PhysicalFS, VfsPath};

use std::path::Path;



impl<E: ArchiveEngine> Zipper<E> {
    /// After extracting into `destination`: if all it holds is a single directory, pull that directory's contents
    /// up into `destination` and remove it.  Anything else is left as-is.
    ///
    /// Archives commonly wrap their payload in one top-level folder; this makes callers find it directly under
    /// `destination` either way.  See [flatten_single_root] for a version that works on any [VfsPath].
    ///
    /// A lone symbolic link is left alone, even one pointing at a directory.
    pub fn ensure_source_in_root_directory(&self, destination: impl AsRef<Path>) -> Result<()> {
        let destination = destination.as_ref();
        if lone_symlink(destination) {
            log::debug!("not flattening {}: its only entry is a symbolic link", destination.display());
            return Ok(());
        }
        flatten_single_root(&VfsPath::new(PhysicalFS::new(destination.to_path_buf())))
    }
}

/// `dir` holds exactly one entry, and it's a symbolic link.  [VfsPath::is_dir] follows links, so this has to be
/// checked on the host filesystem.
fn lone_symlink(dir: &Path) -> bool {
    let Ok(mut children) = std::fs::read_dir(dir) else { return false };
    match (children.next(), children.next()) {
        (Some(Ok(only)), None)  => only.file_type().map_or(false, |t| t.is_symlink()),
        _                       => false,
    }
}

/// If `destination` contains exactly one entry and it's a directory, move that directory's children into
/// `destination` and remove the (now empty) directory.
pub fn flatten_single_root(destination: &VfsPath) -> Result<()> {
    let children = destination.read_dir()?.collect::<Vec<_>>();
    let [only] = children.as_slice() else { return Ok(()) };
    if !only.is_dir()? { return Ok(()) }

    let name = only.filename();
    log::debug!("flattening {:?} into {:?}", name, destination.as_str());

    // dest/x/x/... can't move up while dest/x still exists
    let root = if only.read_dir()?.any(|c| c.filename() == name) {
        let mut n = 0;
        let aside = loop {
            let aside = destination.join(format!("{}.flatten{}", name, n))?;
            if !aside.exists()? { break aside }
            n += 1;
        };
        only.move_dir(&aside)?;
        aside
    } else {
        only.clone()
    };

    for child in root.read_dir()?.collect::<Vec<_>>() {
        let target = destination.join(child.filename())?;
        log::trace!("moving {:?} to {:?}", child.as_str(), target.as_str());
        if child.is_dir()? {
            child.move_dir(&target)?;
        } else {
            child.move_file(&target)?;
        }
    }
    root.remove_dir()?;
    Ok(())
}
