use serde_json::json;
use symdex::config::Config;
use symdex::indexer::IndexOptions;
use symdex::tools::ToolStatus;
use tempfile::TempDir;

use crate::helpers::test_harness::TestRepo;

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, content).unwrap();
    path
}

#[tokio::test]
async fn test_config_to_index_to_search() {
    let game = TestRepo::new("game").unwrap();
    let tools_repo = TestRepo::new("tools").unwrap();
    game.create_file("Assets/Inventory.cs", "public class Inventory { public void AddItem() {} }")
        .unwrap();
    tools_repo
        .create_file("Editor/InventoryWindow.cs", "class InventoryWindow {}")
        .unwrap();

    let config_dir = TempDir::new().unwrap();
    let config_path = write_config(
        &config_dir,
        &format!(
            "repositories:\n  - name: game\n    path: {}\n  - description: no path here\n  - name: tools\n    path: {}\n",
            game.path().display(),
            tools_repo.path().display()
        ),
    );

    let config = Config::load(&config_path).unwrap();
    assert_eq!(config.repositories.len(), 2);

    symdex::commands::index::run(&config, None, IndexOptions::default())
        .await
        .unwrap();
    assert!(game.path().join(".symdex").join("code_index.db").exists());
    assert!(tools_repo.path().join(".symdex").join("code_index.db").exists());

    let registry = symdex::commands::tool_registry(&config);
    let response = registry
        .call("search_symbol", json!({"symbol_name": "Inventory", "kind": "class"}))
        .await;

    assert_eq!(response.status, ToolStatus::Success);
    assert_eq!(
        response.output.as_deref(),
        Some(
            "Found 2 matches for 'Inventory':\n\
             1. [class] Inventory in game/Assets/Inventory.cs (Lines 0-0)\n\
             2. [class] InventoryWindow in tools/Editor/InventoryWindow.cs (Lines 0-0)"
        )
    );
}

#[tokio::test]
async fn test_legacy_map_config_names_repositories_by_key() {
    let repo = TestRepo::new("unused").unwrap();
    repo.create_file("Boss.cs", "class Boss {}").unwrap();

    let config_dir = TempDir::new().unwrap();
    let config_path = write_config(
        &config_dir,
        &format!("repositories:\n  mainline:\n    path: {}\n", repo.path().display()),
    );
    let config = Config::load(&config_path).unwrap();

    symdex::commands::index::run(&config, None, IndexOptions::default())
        .await
        .unwrap();
    let response = symdex::commands::tool_registry(&config)
        .call("search_symbol", json!({"symbol_name": "Boss"}))
        .await;

    assert!(response.output.unwrap().contains("Boss in mainline/Boss.cs"));
}

#[tokio::test]
async fn test_index_continues_past_missing_repository() {
    let repo = TestRepo::new("present").unwrap();
    repo.create_file("Gate.cs", "class Gate {}").unwrap();

    let config_dir = TempDir::new().unwrap();
    let missing = config_dir.path().join("does-not-exist");
    let config_path = write_config(
        &config_dir,
        &format!(
            "repositories:\n  - path: {}\n  - path: {}\n",
            missing.display(),
            repo.path().display()
        ),
    );
    let config = Config::load(&config_path).unwrap();

    symdex::commands::index::run(&config, None, IndexOptions::default())
        .await
        .unwrap();

    assert!(!missing.exists());
    assert_eq!(repo.records().unwrap().len(), 1);
}

#[tokio::test]
async fn test_repo_path_override_ignores_configured_list() {
    let configured = TestRepo::new("configured").unwrap();
    let adhoc = TestRepo::new("adhoc").unwrap();
    configured.create_file("A.cs", "class A {}").unwrap();
    adhoc.create_file("B.cs", "class B {}").unwrap();

    let config_dir = TempDir::new().unwrap();
    let config_path = write_config(
        &config_dir,
        &format!("repositories:\n  - path: {}\n", configured.path().display()),
    );
    let config = Config::load(&config_path).unwrap();

    symdex::commands::index::run(&config, Some(adhoc.path().to_path_buf()), IndexOptions::default())
        .await
        .unwrap();

    assert!(adhoc.path().join(".symdex").join("code_index.db").exists());
    assert!(!configured.path().join(".symdex").exists());
}

#[tokio::test]
async fn test_store_failure_in_one_repository_does_not_stop_the_next() {
    let broken = TestRepo::new("broken").unwrap();
    let healthy = TestRepo::new("healthy").unwrap();
    broken.create_file("Trap.cs", "class Trap {}").unwrap();
    // A plain file where the index directory should be
    broken.create_file(".symdex", "not a directory").unwrap();
    healthy
        .create_file("Tower.cs", "class Tower { void Fire() {} }")
        .unwrap();

    let config_dir = TempDir::new().unwrap();
    let config_path = write_config(
        &config_dir,
        &format!(
            "repositories:\n  - path: {}\n  - path: {}\n",
            broken.path().display(),
            healthy.path().display()
        ),
    );
    let config = Config::load(&config_path).unwrap();

    symdex::commands::index::run(&config, None, IndexOptions::default())
        .await
        .unwrap();

    assert!(broken.path().join(".symdex").is_file());
    assert!(healthy.path().join(".symdex").join("code_index.db").exists());
    let names: Vec<_> = healthy
        .records()
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["Fire", "Tower"]);
}
