use symdex::indexer::IndexOptions;

use crate::helpers::test_harness::TestRepo;
use crate::helpers::test_utils::summarize;

fn row(file: &str, kind: &str, name: &str, start: usize, end: usize) -> (String, String, String, usize, usize) {
    (file.to_string(), kind.to_string(), name.to_string(), start, end)
}

#[test]
fn test_single_file_yields_class_and_method() {
    let repo = TestRepo::new("game").unwrap();
    repo.create_file("Foo.cs", "public class Foo { public void Bar() {} }")
        .unwrap();

    let stats = repo.index(IndexOptions::default()).unwrap();
    assert_eq!(stats.symbols_inserted, 2);

    let records = repo.records().unwrap();
    assert_eq!(
        summarize(&records),
        vec![
            row("Foo.cs", "method", "Bar", 0, 0),
            row("Foo.cs", "class", "Foo", 0, 0),
        ]
    );
}

#[test]
fn test_line_spans_cover_bodies() {
    let repo = TestRepo::new("game").unwrap();
    repo.create_file(
        "Assets/Scripts/Player.cs",
        "namespace Game\n{\n    public class Player\n    {\n        public int Health { get; set; }\n\n        public void Jump()\n        {\n        }\n    }\n}\n",
    )
    .unwrap();

    repo.index(IndexOptions::default()).unwrap();

    assert_eq!(
        summarize(&repo.records().unwrap()),
        vec![
            row("Assets/Scripts/Player.cs", "class", "Player", 2, 9),
            row("Assets/Scripts/Player.cs", "property", "Health", 4, 4),
            row("Assets/Scripts/Player.cs", "method", "Jump", 6, 8),
        ]
    );
}

#[test]
fn test_ignored_directory_contributes_nothing() {
    let repo = TestRepo::new("game").unwrap();
    repo.create_file("Library/PackageCache/Cached.cs", "class Cached {}")
        .unwrap();
    repo.create_file("Scripts/Visible.cs", "class Visible {}")
        .unwrap();

    repo.index(IndexOptions::default()).unwrap();

    let records = repo.records().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Visible");
    assert_eq!(records[0].file_path, "Scripts/Visible.cs");
}

#[test]
fn test_same_name_in_two_files_is_two_rows() {
    let repo = TestRepo::new("game").unwrap();
    repo.create_file("A/Manager.cs", "class Manager {}").unwrap();
    repo.create_file("B/Manager.cs", "class Manager {}").unwrap();

    repo.index(IndexOptions::default()).unwrap();

    let files: Vec<_> = repo
        .records()
        .unwrap()
        .into_iter()
        .map(|r| r.file_path)
        .collect();
    assert_eq!(files, vec!["A/Manager.cs", "B/Manager.cs"]);
}

#[test]
fn test_reindexing_unchanged_repository_is_idempotent() {
    let repo = TestRepo::new("game").unwrap();
    repo.create_file(
        "Enemy.cs",
        "class Enemy\n{\n    void Attack() {}\n    Enemy() {}\n}\n",
    )
    .unwrap();

    repo.index(IndexOptions::default()).unwrap();
    let first = repo.records().unwrap();
    repo.index(IndexOptions::default()).unwrap();
    let second = repo.records().unwrap();

    assert_eq!(first.len(), 3);
    assert_eq!(first, second);
}

#[test]
fn test_rebuild_leaves_no_residue() {
    let repo = TestRepo::new("game").unwrap();
    repo.create_file("Old.cs", "class Old {}").unwrap();
    repo.create_file("Kept.cs", "class Kept {}").unwrap();
    repo.index(IndexOptions::default()).unwrap();

    repo.remove_file("Old.cs").unwrap();
    repo.create_file("Kept.cs", "\nclass Kept {}").unwrap();
    repo.index(IndexOptions {
        rebuild: true,
        prune: false,
    })
    .unwrap();

    assert_eq!(
        summarize(&repo.records().unwrap()),
        vec![row("Kept.cs", "class", "Kept", 1, 1)]
    );
}

#[test]
fn test_incremental_run_reports_stale_rows_and_prune_removes_them() {
    let repo = TestRepo::new("game").unwrap();
    repo.create_file("Gone.cs", "class Gone {}").unwrap();
    repo.create_file("Stays.cs", "class Stays {}").unwrap();
    repo.index(IndexOptions::default()).unwrap();
    repo.remove_file("Gone.cs").unwrap();

    let stats = repo.index(IndexOptions::default()).unwrap();
    assert_eq!(stats.stale_files, 1);
    assert_eq!(repo.records().unwrap().len(), 2);

    let stats = repo
        .index(IndexOptions {
            rebuild: false,
            prune: true,
        })
        .unwrap();
    assert_eq!(stats.stale_files, 1);
    let names: Vec<_> = repo
        .records()
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["Stays"]);
}

#[test]
fn test_undecodable_file_does_not_stop_the_run() {
    let repo = TestRepo::new("game").unwrap();
    std::fs::write(repo.path().join("Broken.cs"), [0xff, 0xfe, 0x00, 0x63]).unwrap();
    repo.create_file("Fine.cs", "struct Fine {}").unwrap();

    let stats = repo.index(IndexOptions::default()).unwrap();

    assert_eq!(stats.files_failed, 1);
    let records = repo.records().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].kind, "struct");
}
