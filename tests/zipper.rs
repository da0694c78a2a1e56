//! End-to-end behaviour of [Zipper] against real archives on disk.

use zipper::{Error, Zipper, ZipStatus};

use std::collections::BTreeSet;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};



fn scratch() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let zip = dir.path().join("new-empty-file.zip");
    (dir, zip)
}

/// Entry names of an archive, read with the `zip` crate directly.
fn entry_names(path: &Path) -> BTreeSet<String> {
    let archive = zip::ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
    archive.file_names().map(String::from).collect()
}

fn entry_bytes(path: &Path, name: &str) -> Vec<u8> {
    let mut archive = zip::ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
    let mut buf = Vec::new();
    archive.by_name(name).unwrap().read_to_end(&mut buf).unwrap();
    buf
}

fn assert_closed(zipper: &Zipper) {
    assert_eq!(zipper.filename(), None);
    assert_eq!(zipper.count(), 0);
}

#[test] fn payload_round_trip() {
    let (_dir, path) = scratch();
    let payloads : &[(&str, &[u8])] = &[
        ("dummy.txt",           b"dummy contents"),
        ("nested/bin.dat",      &[0, 1, 2, 255, 254]),
        ("empty.txt",           b""),
        ("dummy.txt",           b"replaced contents"),
    ];

    let mut zipper = Zipper::new();
    zipper.create(&path).unwrap();
    for (name, bytes) in payloads { assert!(zipper.add_from_payload(name, *bytes).unwrap()); }
    assert_eq!(zipper.count(), 3);
    assert!(zipper.close().unwrap());
    assert_closed(&zipper);

    zipper.open(&path).unwrap();
    assert_eq!(zipper.count(), 3);
    assert_eq!(zipper.filename(), Some(fs::canonicalize(&path).unwrap().as_path()));
    zipper.close().unwrap();

    assert_eq!(entry_bytes(&path, "dummy.txt"),         b"replaced contents");
    assert_eq!(entry_bytes(&path, "nested/bin.dat"),    [0u8, 1, 2, 255, 254]);
    assert_eq!(entry_bytes(&path, "empty.txt"),         b"");
}

#[test] fn create_is_exclusive() {
    let (_dir, path) = scratch();
    let mut zipper = Zipper::new();
    zipper.create(&path).unwrap();
    zipper.add_from_payload("a.txt", "a").unwrap();
    zipper.close().unwrap();

    match Zipper::new().create(&path) {
        Err(Error::CannotCreateArchive { status: ZipStatus::Exists, reason, .. }) => assert_eq!(reason, "File already exists."),
        other => panic!("expected CannotCreateArchive, got {:?}", other.map(|_| ())),
    }
}

#[test] fn open_requires_existing() {
    let (_dir, path) = scratch();
    let err = Zipper::new().open(&path).unwrap_err();
    assert!(matches!(err, Error::CannotOpenArchive { status: ZipStatus::NoEntry, .. }), "{:?}", err);
    assert_eq!(err.archive(), Some(path.as_path()));
}

#[test] fn open_rejects_non_archives() {
    let (dir, _) = scratch();
    let path = dir.path().join("notes.txt");
    fs::write(&path, "definitely not a zip file, just some text that is long enough").unwrap();
    let err = Zipper::new().open(&path).unwrap_err();
    assert_eq!(err.status(), Some(ZipStatus::NotZip));
    let reason = err.reason().unwrap();
    assert!(reason.starts_with("Not a zip archive. "), "{}", reason);
    assert!(reason.len() > "Not a zip archive. ".len(), "engine detail expected: {}", reason);
}

#[test] fn open_and_close_empty_archive() {
    let (_dir, path) = scratch();
    let mut eocd = b"PK\x05\x06".to_vec(); // end of central directory, nothing else
    eocd.resize(22, 0);
    fs::write(&path, eocd).unwrap();

    let mut zipper = Zipper::new();
    zipper.open(&path).unwrap();
    assert_eq!(zipper.count(), 0);
    assert_eq!(zipper.filename(), Some(fs::canonicalize(&path).unwrap().as_path()));
    zipper.close().unwrap();
    assert_closed(&zipper);
    assert!(path.exists(), "unchanged archives are left alone");
}

#[test] fn created_empty_archive_is_not_written() {
    let (_dir, path) = scratch();
    let mut zipper = Zipper::new();
    zipper.create(&path).unwrap();
    assert!(zipper.filename().unwrap().is_absolute());
    assert!(!path.exists());
    zipper.close().unwrap();
    assert_closed(&zipper);
    assert!(!path.exists());
}

#[test] fn closing_twice_fails() {
    let (_dir, path) = scratch();
    let mut zipper = Zipper::new();
    zipper.create(&path).unwrap();
    zipper.add_empty_directory("sub-dir").unwrap();
    zipper.close().unwrap();

    let err = zipper.close().unwrap_err();
    assert!(matches!(err, Error::CannotCloseArchive { path: None, .. }), "{:?}", err);
    assert_eq!(entry_names(&path), ["sub-dir/".to_string()].into_iter().collect::<BTreeSet<_>>());
}

#[test] fn add_host_file_and_directory() {
    let (dir, path) = scratch();
    let single = dir.path().join("dummy.txt");
    fs::write(&single, "dummy contents").unwrap();
    let tree = dir.path().join("sub-dir");
    fs::create_dir_all(tree.join("deep")).unwrap();
    fs::write(tree.join("dummy.txt"), "in dir").unwrap();
    fs::write(tree.join("deep").join("more.txt"), "deeper").unwrap();

    let mut zipper = Zipper::new();
    zipper.create(&path).unwrap();
    assert!(zipper.add_file(&single, None).unwrap());
    assert!(zipper.add_directory(&tree, "sub-dir").unwrap());
    assert_eq!(zipper.count(), 3);
    zipper.close().unwrap();
    assert_closed(&zipper);

    assert_eq!(entry_names(&path), ["dummy.txt", "sub-dir/deep/more.txt", "sub-dir/dummy.txt"].iter().map(|s| s.to_string()).collect::<BTreeSet<_>>());
    assert_eq!(entry_bytes(&path, "sub-dir/deep/more.txt"), b"deeper");
}

#[test] fn delete_directory_removes_descendants() {
    let (_dir, path) = scratch();
    let mut zipper = Zipper::new();
    zipper.create(&path).unwrap();
    zipper.add_empty_directory("d").unwrap();
    zipper.add_from_payload("d/a.txt", "a").unwrap();
    zipper.add_from_payload("d/sub/b.txt", "b").unwrap();
    zipper.add_from_payload("other.txt", "o").unwrap();
    zipper.close().unwrap();

    zipper.open(&path).unwrap();
    assert_eq!(zipper.count(), 4);
    assert!(zipper.delete_directory("d").unwrap());
    assert_eq!(zipper.count(), 4, "deletions only take effect on close");
    zipper.close().unwrap();

    zipper.open(&path).unwrap();
    assert_eq!(zipper.count(), 1);
    zipper.close().unwrap();
    assert_eq!(entry_names(&path), ["other.txt".to_string()].into_iter().collect::<BTreeSet<_>>());
}

#[test] fn delete_missing_directory_is_noop() {
    let (_dir, path) = scratch();
    let mut zipper = Zipper::new();
    zipper.create(&path).unwrap();
    zipper.add_from_payload("keep/x.txt", "x").unwrap();
    let before = zipper.count();
    assert!(zipper.delete_directory("nope").unwrap());
    assert_eq!(zipper.count(), before);
}

#[test] fn deleting_everything_removes_archive() {
    let (_dir, path) = scratch();
    let mut zipper = Zipper::new();
    zipper.create(&path).unwrap();
    zipper.add_from_payload("dummy.txt", "dummy contents").unwrap();
    zipper.close().unwrap();
    assert!(path.exists());

    zipper.open(&path).unwrap();
    zipper.delete_file("dummy.txt").unwrap();
    assert_eq!(zipper.count(), 1);
    zipper.close().unwrap();
    assert_closed(&zipper);
    assert!(!path.exists());
}

#[test] fn extract_everything() {
    let (dir, path) = scratch();
    let mut zipper = Zipper::new();
    zipper.create(&path).unwrap();
    zipper.add_empty_directory("sub-dir").unwrap();
    zipper.add_from_payload("sub-dir/dummy.txt", "dummy contents").unwrap();
    zipper.close().unwrap();

    let out = dir.path().join("extracted");
    zipper.open(&path).unwrap();
    assert!(zipper.extract_to(&out, None).unwrap());
    assert_eq!(zipper.count(), 2);
    zipper.close().unwrap();

    assert!(out.join("sub-dir").is_dir());
    assert_eq!(fs::read_to_string(out.join("sub-dir").join("dummy.txt")).unwrap(), "dummy contents");
}

#[test] fn extract_selected_entries() {
    let (dir, path) = scratch();
    let mut zipper = Zipper::new();
    zipper.create(&path).unwrap();
    zipper.add_from_payload("a/x.txt", "x").unwrap();
    zipper.add_from_payload("a/y.txt", "y").unwrap();
    zipper.close().unwrap();

    let out = dir.path().join("partial");
    zipper.open(&path).unwrap();
    zipper.extract_to(&out, Some(&["a/x.txt"])).unwrap();
    zipper.close().unwrap();

    assert_eq!(fs::read_to_string(out.join("a").join("x.txt")).unwrap(), "x");
    assert!(!out.join("a").join("y.txt").exists());
}

#[test] fn extract_pending_entries() {
    let (dir, path) = scratch();
    let mut zipper = Zipper::new();
    zipper.create(&path).unwrap();
    zipper.add_from_payload("queued.txt", "not yet saved").unwrap();

    let out = dir.path().join("pending");
    zipper.extract_to(&out, None).unwrap();
    assert_eq!(fs::read_to_string(out.join("queued.txt")).unwrap(), "not yet saved");
}

#[test] fn extract_refuses_escaping_names() {
    let (dir, path) = scratch();
    let mut zipper = Zipper::new();
    zipper.create(&path).unwrap();
    zipper.add_from_payload("../escape.txt", "nope").unwrap();

    let err = zipper.extract_to(dir.path().join("jail"), None).unwrap_err();
    assert!(matches!(err, Error::UnableToExtractArchive { status: ZipStatus::Invalid, .. }), "{:?}", err);
    assert!(!dir.path().join("escape.txt").exists());
}

#[cfg(unix)]
#[test] fn extract_names_with_colons() {
    let (dir, path) = scratch();
    let mut zipper = Zipper::new();
    zipper.create(&path).unwrap();
    zipper.add_from_payload("logs/12:00.log", "noon").unwrap();
    zipper.add_from_payload("logs/other.log", "other").unwrap();
    zipper.close().unwrap();

    let out = dir.path().join("logs-out");
    zipper.open(&path).unwrap();
    assert!(zipper.extract_to(&out, None).unwrap());
    zipper.close().unwrap();

    assert_eq!(fs::read_to_string(out.join("logs").join("12:00.log")).unwrap(), "noon");
    assert_eq!(fs::read_to_string(out.join("logs").join("other.log")).unwrap(), "other");
}

#[cfg(feature = "vfs012")]
#[test] fn extract_then_flatten() {
    let (dir, path) = scratch();
    let mut zipper = Zipper::new();
    zipper.create(&path).unwrap();
    zipper.add_from_payload("project-1.0/readme.txt", "r").unwrap();
    zipper.add_from_payload("project-1.0/src/main.txt", "m").unwrap();
    zipper.close().unwrap();

    let out = dir.path().join("flat");
    zipper.open(&path).unwrap();
    zipper.extract_to(&out, None).unwrap();
    zipper.ensure_source_in_root_directory(&out).unwrap();
    zipper.close().unwrap();

    assert_eq!(fs::read_to_string(out.join("readme.txt")).unwrap(), "r");
    assert_eq!(fs::read_to_string(out.join("src").join("main.txt")).unwrap(), "m");
    assert!(!out.join("project-1.0").exists());
}

#[cfg(feature = "vfs012")]
#[test] fn flatten_leaves_multiple_roots() {
    let (dir, _) = scratch();
    let out = dir.path().join("two");
    fs::create_dir_all(out.join("a")).unwrap();
    fs::create_dir_all(out.join("b")).unwrap();
    Zipper::new().ensure_source_in_root_directory(&out).unwrap();
    assert!(out.join("a").is_dir());
    assert!(out.join("b").is_dir());
}
