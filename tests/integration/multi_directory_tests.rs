use dupfinder::duplicates::{scan_for_duplicates, DuplicateFinder, FinderError, ScanRequest};
use dupfinder::scanner::InvalidRootError;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_duplicates_across_roots() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    fs::write(a.path().join("photo.jpg"), b"pixels").unwrap();
    fs::write(b.path().join("backup.jpg"), b"pixels").unwrap();
    fs::write(b.path().join("note.txt"), b"unrelated").unwrap();

    let (index, _) = scan_for_duplicates([a.path(), b.path()]).unwrap();

    let group = index.duplicate_groups().next().unwrap();
    assert_eq!(
        group.paths,
        &[a.path().join("photo.jpg"), b.path().join("backup.jpg")]
    );
}

#[test]
fn test_roots_are_scanned_in_given_order() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    fs::write(a.path().join("z"), b"same").unwrap();
    fs::write(b.path().join("a"), b"same").unwrap();

    let (index, _) = scan_for_duplicates([b.path(), a.path()]).unwrap();
    let group = index.duplicate_groups().next().unwrap();
    assert_eq!(group.paths[0], b.path().join("a"));
    assert_eq!(group.paths[1], a.path().join("z"));
}

#[test]
fn test_repeated_root_is_scanned_once() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("only"), b"data").unwrap();

    let (index, _) = scan_for_duplicates([dir.path(), dir.path()]).unwrap();

    assert_eq!(index.file_count(), 1);
    assert!(!index.has_duplicates());
}

#[test]
fn test_nested_roots_report_each_file_once() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    let only = dir.path().join("sub").join("only.txt");
    fs::write(&only, b"data").unwrap();

    let (index, skipped) =
        scan_for_duplicates([dir.path().to_path_buf(), dir.path().join("sub")]).unwrap();

    assert!(skipped.is_empty());
    assert_eq!(index.file_count(), 1);
    assert_eq!(index.duplicate_group_count(), 0);
    let fingerprint = index.fingerprint_of(&only).unwrap();
    assert_eq!(index.get(&fingerprint).unwrap(), &[only]);
}

#[test]
fn test_same_directory_spelled_twice_is_not_a_duplicate() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("single.txt"), b"one of a kind").unwrap();
    let other_spelling = dir.path().join("sub").join("..");

    let (index, _) = scan_for_duplicates([dir.path().to_path_buf(), other_spelling]).unwrap();

    assert_eq!(index.file_count(), 1);
    assert!(!index.has_duplicates());
    assert_eq!(
        dupfinder::output::TextOutput::new(&index).render(),
        "—— Duplicate Files Found ——\nNo duplicate files found.\n"
    );
}

#[test]
fn test_real_copies_across_nested_roots_still_grouped() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("a.txt"), b"copy").unwrap();
    fs::write(dir.path().join("sub").join("b.txt"), b"copy").unwrap();

    let (index, _) =
        scan_for_duplicates([dir.path().join("sub"), dir.path().to_path_buf()]).unwrap();

    let group = index.duplicate_groups().next().unwrap();
    assert_eq!(
        group.paths,
        &[dir.path().join("sub").join("b.txt"), dir.path().join("a.txt")]
    );
}

#[test]
fn test_invalid_roots_are_dropped() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("plain.txt");
    fs::write(&file, b"x").unwrap();
    let missing = dir.path().join("missing");

    let (request, invalid) = ScanRequest::new([dir.path().to_path_buf(), file.clone(), missing.clone()]);

    assert_eq!(request.roots(), &[dir.path().to_path_buf()]);
    assert_eq!(invalid.len(), 2);
    assert!(matches!(&invalid[0], InvalidRootError::NotADirectory(p) if *p == file));
    assert!(matches!(&invalid[1], InvalidRootError::NotFound(p) if *p == missing));
}

#[test]
fn test_nonexistent_only_root_does_not_scan() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");

    let result = scan_for_duplicates([missing]);
    assert!(matches!(result, Err(FinderError::NoValidRoots)));

    let (request, invalid) = ScanRequest::parse_list(" , ");
    assert!(request.is_empty());
    assert!(invalid.is_empty());
    assert!(matches!(
        DuplicateFinder::with_defaults().scan(request),
        Err(FinderError::NoValidRoots)
    ));
}

#[test]
fn test_parse_list_trims_entries() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    let input = format!("  {} ,{}  ,/definitely/not/here", a.path().display(), b.path().display());

    let (request, invalid) = ScanRequest::parse_list(&input);

    assert_eq!(request.roots(), &[a.path().to_path_buf(), b.path().to_path_buf()]);
    assert_eq!(invalid.len(), 1);
}
