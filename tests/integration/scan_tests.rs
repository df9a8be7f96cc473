use dupfinder::duplicates::{scan_for_duplicates, DuplicateFinder, FinderConfig, ScanRequest};
use dupfinder::output::TextOutput;
use dupfinder::scanner::{compute_fingerprint, HashAlgorithm, Hasher};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(dir: &Path, name: &str, content: &[u8]) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();

    let (index, skipped) = scan_for_duplicates([dir.path()]).unwrap();

    assert!(index.is_empty());
    assert!(skipped.is_empty());
    assert_eq!(
        TextOutput::new(&index).render(),
        "—— Duplicate Files Found ——\nNo duplicate files found.\n"
    );
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"content a");
    write(dir.path(), "b.txt", b"content b");
    write(dir.path(), "c.txt", b"content c");

    let (index, _) = scan_for_duplicates([dir.path()]).unwrap();

    assert_eq!(index.len(), 3);
    assert_eq!(index.file_count(), 3);
    assert!(!index.has_duplicates());
    for (_, paths) in index.iter() {
        assert_eq!(paths.len(), 1);
    }
}

#[test]
fn test_scan_hello_world_scenario() {
    let dir = tempdir().unwrap();
    write(dir.path(), "x.txt", b"hello");
    write(dir.path(), "y.txt", b"hello");
    write(dir.path(), "z.txt", b"world");

    let (index, skipped) = scan_for_duplicates([dir.path()]).unwrap();
    assert!(skipped.is_empty());
    assert_eq!(index.len(), 2);

    let hello = compute_fingerprint(&dir.path().join("x.txt")).unwrap();
    let world = compute_fingerprint(&dir.path().join("z.txt")).unwrap();
    assert_eq!(
        index.get(&hello).unwrap(),
        &[dir.path().join("x.txt"), dir.path().join("y.txt")]
    );
    assert_eq!(index.get(&world).unwrap(), &[dir.path().join("z.txt")]);

    let report = TextOutput::new(&index).render();
    assert_eq!(report.matches("Duplicate Group:").count(), 1);
    assert!(!report.contains("z.txt"));
}

#[test]
fn test_scan_nested_directories() {
    let dir = tempdir().unwrap();
    write(dir.path(), "top.bin", b"payload");
    write(dir.path(), "a/b/c/deep.bin", b"payload");
    write(dir.path(), "a/other.bin", b"different");

    let (index, _) = scan_for_duplicates([dir.path()]).unwrap();

    let groups: Vec<_> = index.duplicate_groups().collect();
    assert_eq!(groups.len(), 1);
    assert_eq!(
        groups[0].paths,
        &[dir.path().join("a/b/c/deep.bin"), dir.path().join("top.bin")]
    );
}

#[test]
fn test_empty_files_are_duplicates_of_each_other() {
    let dir = tempdir().unwrap();
    write(dir.path(), "empty1", b"");
    write(dir.path(), "empty2", b"");
    write(dir.path(), "full", b"x");

    let (index, _) = scan_for_duplicates([dir.path()]).unwrap();

    assert_eq!(index.duplicate_group_count(), 1);
    let group = index.duplicate_groups().next().unwrap();
    assert_eq!(group.len(), 2);
}

#[test]
fn test_large_file_spanning_many_chunks() {
    let dir = tempdir().unwrap();
    let big: Vec<u8> = (0..100_000u32).map(|i| (i % 251) as u8).collect();
    let mut tweaked = big.clone();
    *tweaked.last_mut().unwrap() ^= 1;
    write(dir.path(), "big1", &big);
    write(dir.path(), "big2", &big);
    write(dir.path(), "big3", &tweaked);

    let (index, _) = scan_for_duplicates([dir.path()]).unwrap();

    assert_eq!(index.len(), 2);
    assert_eq!(index.duplicate_group_count(), 1);
}

#[test]
fn test_summary_reports_reclaimable_space() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a", b"12345");
    write(dir.path(), "b", b"12345");
    write(dir.path(), "c", b"12345");
    write(dir.path(), "d", b"xy");

    let (request, _) = ScanRequest::new([dir.path()]);
    let outcome = DuplicateFinder::with_defaults().scan(request).unwrap();

    assert_eq!(outcome.summary.total_files, 4);
    assert_eq!(outcome.summary.total_size, 17);
    assert_eq!(outcome.summary.duplicate_groups, 1);
    assert_eq!(outcome.summary.duplicate_files, 2);
    assert_eq!(outcome.summary.reclaimable_space, 10);
}

#[test]
fn test_blake3_and_small_chunks_find_same_groups() {
    let dir = tempdir().unwrap();
    write(dir.path(), "one", b"same bytes here");
    write(dir.path(), "two", b"same bytes here");
    write(dir.path(), "three", b"other");

    let default = {
        let (request, _) = ScanRequest::new([dir.path()]);
        DuplicateFinder::with_defaults().scan(request).unwrap()
    };
    let tuned = {
        let (request, _) = ScanRequest::new([dir.path()]);
        let hasher = Hasher::new()
            .with_algorithm(HashAlgorithm::Blake3)
            .with_chunk_size(3);
        DuplicateFinder::new(FinderConfig::default().with_hasher(hasher).with_io_threads(4))
            .scan(request)
            .unwrap()
    };

    let paths = |outcome: &dupfinder::duplicates::ScanOutcome| -> Vec<Vec<std::path::PathBuf>> {
        outcome
            .index
            .duplicate_groups()
            .map(|g| g.paths.to_vec())
            .collect()
    };
    assert_eq!(paths(&default), paths(&tuned));
    assert_ne!(
        default.index.iter().next().unwrap().0,
        tuned.index.iter().next().unwrap().0
    );
}
