//! Integration tests for the LocalFile handle.

use std::fs;
use std::io::Write;

use furi::{FileError, LocalFile, Uri};
use tempfile::NamedTempFile;

#[test]
fn test_path_and_filename_from_uri() {
    for uri in ["file:///a/b/c.ext", "/a/b/c.ext"] {
        let file = LocalFile::new(uri);
        assert_eq!(file.path(), std::path::Path::new("/a/b/c.ext"));
        assert_eq!(file.directory(), "/a/b");
        assert_eq!(file.filename(), "c.ext");
    }
}

#[test]
fn test_mode_validation() {
    assert!(LocalFile::with_mode("/a/b/c.ext", "r").is_ok());

    let err = LocalFile::with_mode("/a/b/c.ext", "xyz").unwrap_err();
    assert!(matches!(err, FileError::InvalidMode(ref m) if m == "xyz"));
}

#[test]
fn test_per_character_mode_constructs_but_cannot_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rw.txt");
    let mut file = LocalFile::with_mode(path.to_str().unwrap(), "rw").unwrap();
    assert_eq!(file.mode().as_str(), "rw");

    // "rw" contains 'w', so the existence check is skipped and the open fails
    let err = file.stream().unwrap_err();
    match err {
        FileError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::InvalidInput),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!file.is_open());
    assert!(!path.exists());
}

#[test]
fn test_per_character_read_mode_checks_existence_first() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rr.txt");
    let mut file = LocalFile::with_mode(path.to_str().unwrap(), "rr").unwrap();
    assert!(matches!(file.stream().unwrap_err(), FileError::NotFound(_)));
}

#[test]
fn test_empty_mode_fails_only_when_opened() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty_mode.txt");
    let mut file = LocalFile::with_mode(path.to_str().unwrap(), "").unwrap();

    // no 'w', so a missing file is reported first
    assert!(matches!(file.read(None).unwrap_err(), FileError::NotFound(_)));

    fs::write(&path, "x").unwrap();
    match file.read(None).unwrap_err() {
        FileError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::InvalidInput),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_exists_reflects_live_state() {
    let tmp = NamedTempFile::new().unwrap();
    let path = tmp.path().to_path_buf();
    let file = LocalFile::new(path.to_str().unwrap());

    assert!(file.exists());
    drop(tmp);
    assert!(!file.exists());

    fs::write(&path, "back again").unwrap();
    assert!(file.exists());
    fs::remove_file(&path).unwrap();
}

#[test]
fn test_stream_is_memoised() {
    let mut tmp = NamedTempFile::new().unwrap();
    write!(tmp, "abcdef").unwrap();
    tmp.flush().unwrap();

    let mut file = LocalFile::new(tmp.path().to_str().unwrap());
    assert!(!file.is_open());

    let first: *const fs::File = file.stream().unwrap();
    let second: *const fs::File = file.stream().unwrap();
    assert!(std::ptr::eq(first, second));
    assert!(file.is_open());

    // Reads share one position
    assert_eq!(file.read(Some(3)).unwrap(), "abc");
    assert_eq!(file.read(None).unwrap(), "def");
}

#[test]
fn test_cached_stream_survives_deletion() {
    let mut tmp = NamedTempFile::new().unwrap();
    write!(tmp, "still here").unwrap();
    tmp.flush().unwrap();
    let path = tmp.path().to_path_buf();

    let mut file = LocalFile::new(path.to_str().unwrap());
    file.stream().unwrap();
    drop(tmp);

    assert!(!file.exists());
    assert_eq!(file.read_text().unwrap(), "still here");
}

#[test]
fn test_read_missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.txt");
    let uri = format!("file://{}", path.display());

    let mut file = LocalFile::with_mode(&uri, "r").unwrap();
    let err = file.read(None).unwrap_err();
    assert!(matches!(err, FileError::NotFound(_)));
    assert_eq!(err.to_string(), format!("{} does not exist", uri));
    assert!(!file.is_open());
}

#[test]
fn test_append_mode_requires_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.txt");
    let mut file = LocalFile::with_mode(path.to_str().unwrap(), "a").unwrap();
    assert!(matches!(file.write("x").unwrap_err(), FileError::NotFound(_)));
}

#[test]
fn test_write_mode_creates_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("new.txt");

    let mut file = LocalFile::with_mode(path.to_str().unwrap(), "w").unwrap();
    assert!(!file.exists());
    assert_eq!(file.write("data").unwrap(), 4);
    assert!(file.exists());
    file.close().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "data");
}

#[test]
fn test_binary_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hello.bin");
    let path_str = path.to_str().unwrap();

    let mut out = LocalFile::with_mode(path_str, "wb").unwrap();
    out.write(b"hello").unwrap();
    out.close().unwrap();

    let mut input = LocalFile::with_mode(path_str, "rb").unwrap();
    assert_eq!(input.read(None).unwrap(), &b"hello"[..]);
}

#[test]
fn test_write_to_read_only_stream_fails() {
    let mut tmp = NamedTempFile::new().unwrap();
    write!(tmp, "read only").unwrap();
    tmp.flush().unwrap();

    let mut file = LocalFile::with_mode(tmp.path().to_str().unwrap(), "r").unwrap();
    let err = file.write("nope").unwrap_err();
    assert!(matches!(err, FileError::Io(_)));
    assert_eq!(fs::read_to_string(tmp.path()).unwrap(), "read only");
}

#[test]
fn test_append_and_update_modes() {
    let mut tmp = NamedTempFile::new().unwrap();
    write!(tmp, "one\n").unwrap();
    tmp.flush().unwrap();
    let path = tmp.path().to_str().unwrap();

    let mut file = LocalFile::with_mode(path, "a").unwrap();
    file.write("two\n").unwrap();
    file.close().unwrap();
    assert_eq!(fs::read_to_string(tmp.path()).unwrap(), "one\ntwo\n");

    let mut file = LocalFile::with_mode(path, "r+").unwrap();
    file.write("ONE").unwrap();
    assert_eq!(file.read(None).unwrap(), "\ntwo\n");
    file.close().unwrap();
    assert_eq!(fs::read_to_string(tmp.path()).unwrap(), "ONE\ntwo\n");

    let mut file = LocalFile::with_mode(path, "w+").unwrap();
    assert_eq!(file.read(None).unwrap(), "");
}

#[test]
fn test_to_string_reconstructs_equal_handle() {
    for uri in ["file:///a/b/c.ext", "/a/b/c.ext", "file:///a/b/c.ext?x=1#top"] {
        let file = LocalFile::with_mode(uri, "rb").unwrap();
        assert_eq!(file.to_string(), uri);

        let again = LocalFile::with_mode(&file.to_string(), "rb").unwrap();
        assert_eq!(again.uri(), file.uri());
        assert_eq!(again.path(), file.path());
        assert_eq!(again.mode(), file.mode());
    }
    assert_eq!(Uri::parse("file:///a/b/c.ext").scheme(), Some("file"));
}

#[test]
fn test_matches_is_prefix_anchored() {
    let file = LocalFile::new("/a/b/c.ext");

    // `$` still anchors the end inside a prefix match
    let m = file.matches(r"c\.ext$").unwrap().unwrap();
    assert_eq!(m.as_str(), "c.ext");

    // a prefix is enough
    assert_eq!(file.matches("c").unwrap().unwrap().as_str(), "c");

    // but the match must start at the beginning of the filename
    assert!(file.matches(r"\.ext").unwrap().is_none());
    assert!(file.matches("b/c").unwrap().is_none());
}

#[test]
fn test_matches_with_compiled_regex() {
    let file = LocalFile::new("/data/Sales_2024.CSV");

    let re = regex::RegexBuilder::new(r"sales_\d{4}\.csv")
        .case_insensitive(true)
        .build()
        .unwrap();
    assert_eq!(file.matches_regex(&re).unwrap().as_str(), "Sales_2024.CSV");

    // same text without the flag
    assert!(file.matches(re.as_str()).unwrap().is_none());

    // a match later in the name does not count
    let year = regex::Regex::new(r"\d{4}").unwrap();
    assert!(file.matches_regex(&year).is_none());
}
