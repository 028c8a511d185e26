use taco_invasion::highscore::{FileHighscore, HighscoreStore, MemoryHighscore};

#[test]
fn missing_file_reads_zero() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileHighscore::new(dir.path().join("highscore.txt"));
    assert_eq!(store.read(), 0);
}

#[test]
fn write_then_read() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileHighscore::new(dir.path().join("data").join("highscore.txt"));
    store.write(42).unwrap();
    assert_eq!(store.read(), 42);
    assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "42");

    store.write(7).unwrap();
    assert_eq!(store.read(), 7);
}

#[test]
fn unparsable_file_reads_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("highscore.txt");
    std::fs::write(&path, "not a number").unwrap();
    assert_eq!(FileHighscore::new(&path).read(), 0);

    std::fs::write(&path, "-5").unwrap();
    assert_eq!(FileHighscore::new(&path).read(), 0);
}

#[test]
fn only_first_line_counts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("highscore.txt");
    std::fs::write(&path, " 31 \n99\n").unwrap();
    assert_eq!(FileHighscore::new(&path).read(), 31);
}

#[test]
fn memory_store_counts_writes() {
    let mut store = MemoryHighscore::default();
    assert_eq!(store.read(), 0);
    store.write(5).unwrap();
    store.write(9).unwrap();
    assert_eq!(store.read(), 9);
    assert_eq!(store.writes, 2);
}
