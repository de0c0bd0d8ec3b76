use super::*;
use tempfile::tempdir;

#[test]
fn write_rope_to_path_rewrites_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.csv");
    std::fs::write(&path, "old,content\nmore\n").unwrap();

    let rope = Rope::from_str("a,b\n1,2\n");
    write_rope_to_path(&path, &rope).unwrap();

    assert_eq!(read_project_text(&path).unwrap(), "a,b\n1,2\n");
}

#[test]
fn write_rope_to_missing_dir_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("data.csv");
    assert!(write_rope_to_path(&path, &Rope::from_str("x")).is_err());
}
