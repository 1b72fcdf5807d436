use serde_json::json;
use std::sync::Arc;
use symdex::config::{Config, RepositoryConfig, SearchConfig};
use symdex::indexer::IndexOptions;
use symdex::registry::RepositoryRegistry;
use symdex::symbol::{SymbolSearchRequest, SymbolSearchTool};
use symdex::tools::ToolStatus;

use crate::helpers::test_harness::TestRepo;
use crate::helpers::test_utils::class_with_methods;

fn search_tool(repos: &[&TestRepo]) -> SymbolSearchTool {
    let registry = RepositoryRegistry::new(repos.iter().map(|r| r.repository()).collect());
    SymbolSearchTool::new(Arc::new(registry), &SearchConfig::default())
}

#[tokio::test]
async fn test_results_from_two_repositories_are_tagged_and_capped() {
    let client = TestRepo::new("client").unwrap();
    let server = TestRepo::new("server").unwrap();
    client
        .create_file("Net/Handlers.cs", &class_with_methods("Handlers", "OnPacket", 15))
        .unwrap();
    server
        .create_file("Net/Handlers.cs", &class_with_methods("Handlers", "OnPacket", 10))
        .unwrap();
    client.index(IndexOptions::default()).unwrap();
    server.index(IndexOptions::default()).unwrap();

    let tool = search_tool(&[&client, &server]);
    let response = tool.search(SymbolSearchRequest::new("OnPacket")).await;

    assert_eq!(response.status, ToolStatus::Success);
    assert_eq!(response.summary, "Found 25 symbols matching 'OnPacket'.");
    let output = response.output.unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 22);
    assert_eq!(lines[0], "Found 25 matches for 'OnPacket':");
    assert!(lines[1].starts_with("1. [method] OnPacket0 in client/Net/Handlers.cs (Lines "));
    assert!(lines[20].starts_with("20. [method] "));
    assert!(lines[20].contains(" in server/"));
    assert_eq!(lines[21], "... and 5 more.");
}

#[tokio::test]
async fn test_per_repository_cap_applies_before_merge() {
    let big = TestRepo::new("big").unwrap();
    big.create_file("Big.cs", &class_with_methods("Big", "Tick", 30))
        .unwrap();
    big.index(IndexOptions::default()).unwrap();

    let matches = search_tool(&[&big]).find("Tick", None).await;
    assert_eq!(matches.len(), 20);
}

#[tokio::test]
async fn test_repository_without_index_is_skipped() {
    let indexed = TestRepo::new("indexed").unwrap();
    let fresh = TestRepo::new("fresh").unwrap();
    indexed.create_file("Door.cs", "class Door {}").unwrap();
    fresh.create_file("Door.cs", "class Door {}").unwrap();
    indexed.index(IndexOptions::default()).unwrap();

    let tool = search_tool(&[&fresh, &indexed]);
    let response = tool.search(SymbolSearchRequest::new("Door")).await;

    assert_eq!(response.status, ToolStatus::Success);
    assert_eq!(
        response.output.as_deref(),
        Some("Found 1 matches for 'Door':\n1. [class] Door in indexed/Door.cs (Lines 0-0)")
    );
}

#[tokio::test]
async fn test_wildcard_characters_match_literally() {
    let repo = TestRepo::new("game").unwrap();
    repo.create_file(
        "Names.cs",
        "class Spawn_Point {}\nclass SpawnXPoint {}\nclass Health100 {}\n",
    )
    .unwrap();
    repo.index(IndexOptions::default()).unwrap();

    let tool = search_tool(&[&repo]);
    let names: Vec<_> = tool
        .find("n_P", None)
        .await
        .into_iter()
        .map(|m| m.name)
        .collect();
    assert_eq!(names, vec!["Spawn_Point"]);

    assert!(tool.find("%", None).await.is_empty());
}

#[tokio::test]
async fn test_no_repositories_is_distinct_from_no_matches() {
    let tools = symdex::commands::tool_registry(&Config::default());

    let response = tools
        .call("search_symbol", json!({"symbol_name": "Anything"}))
        .await;
    assert_eq!(response.status, ToolStatus::Error);
    assert_eq!(response.summary, "No repositories configured.");

    let repo = TestRepo::new("game").unwrap();
    repo.create_file("A.cs", "class A {}").unwrap();
    repo.index(IndexOptions::default()).unwrap();
    let config = Config {
        repositories: vec![RepositoryConfig {
            path: repo.path().to_path_buf(),
            name: Some("game".to_string()),
        }],
        ..Config::default()
    };
    let tools = symdex::commands::tool_registry(&config);

    let response = tools
        .call("search_symbol", json!({"symbol_name": "Zebra"}))
        .await;
    assert_eq!(response.status, ToolStatus::Success);
    assert_eq!(response.summary, "No symbols found matching 'Zebra'.");
}

#[tokio::test]
async fn test_kind_filter_through_tool_call() {
    let repo = TestRepo::new("game").unwrap();
    repo.create_file(
        "Shop.cs",
        "interface IShop\n{\n}\nclass Shop : IShop\n{\n    public Shop() {}\n    public int ShopLevel { get; }\n}\n",
    )
    .unwrap();
    repo.index(IndexOptions::default()).unwrap();
    let config = Config {
        repositories: vec![RepositoryConfig {
            path: repo.path().to_path_buf(),
            name: None,
        }],
        ..Config::default()
    };
    let tools = symdex::commands::tool_registry(&config);

    let response = tools
        .call(
            "search_symbol",
            json!({"symbol_name": "Shop", "type_filter": "constructor"}),
        )
        .await;

    let output = response.output.unwrap();
    assert!(output.starts_with("Found 1 matches for 'Shop':"));
    assert!(output.contains("[constructor] Shop in "));
    assert!(output.ends_with("/Shop.cs (Lines 5-5)"));
}
