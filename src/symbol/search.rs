//! Cross-repository symbol search over the per-repository stores.

use async_trait::async_trait;
use futures::future::join_all;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::SymbolKind;
use crate::config::SearchConfig;
use crate::registry::{Repository, RepositoryRegistry};
use crate::storage::SymbolStore;
use crate::tools::{Tool, ToolResponse};

/// Arguments of a symbol lookup
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SymbolSearchRequest {
    /// Symbol name to look for; partial names match
    pub symbol_name: String,

    /// Restrict results to one kind: class, struct, interface, enum, method,
    /// constructor or property
    #[serde(default, alias = "type_filter")]
    pub kind: Option<String>,
}

impl SymbolSearchRequest {
    pub fn new(symbol_name: impl Into<String>) -> Self {
        Self {
            symbol_name: symbol_name.into(),
            kind: None,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

/// One store row tagged with the repository it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolMatch {
    pub repository: String,
    pub name: String,
    pub kind: String,
    pub file_path: String,
    pub start_line: usize,
    pub end_line: usize,
}

impl SymbolMatch {
    fn listing_line(&self, rank: usize) -> String {
        format!(
            "{}. [{}] {} in {}/{} (Lines {}-{})",
            rank,
            self.kind,
            self.name,
            self.repository,
            self.file_path,
            self.start_line,
            self.end_line
        )
    }
}

/// Looks up definitions by name across every registered repository
pub struct SymbolSearchTool {
    repositories: Arc<RepositoryRegistry>,
    per_repository_limit: usize,
    display_limit: usize,
}

impl SymbolSearchTool {
    /// Handler name used in tool bindings
    pub const HANDLER: &'static str = "symbol_search";

    pub fn new(repositories: Arc<RepositoryRegistry>, config: &SearchConfig) -> Self {
        Self {
            repositories,
            per_repository_limit: config.per_repository_limit,
            display_limit: config.display_limit,
        }
    }

    /// Validate the request, query every repository and format the listing.
    pub async fn search(&self, request: SymbolSearchRequest) -> ToolResponse {
        if self.repositories.is_empty() {
            return ToolResponse::error("No repositories configured.");
        }

        let query = request.symbol_name.trim();
        if query.is_empty() {
            return ToolResponse::error("symbol_name must not be empty.");
        }

        let kind = match request.kind.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match SymbolKind::parse(&raw.to_lowercase()) {
                Some(kind) => Some(kind),
                None => {
                    let expected: Vec<&str> = SymbolKind::ALL.iter().map(|k| k.as_str()).collect();
                    return ToolResponse::error(format!(
                        "Unknown kind '{}'. Expected one of: {}.",
                        raw,
                        expected.join(", ")
                    ));
                }
            },
        };

        let matches = self.find(query, kind).await;
        format_matches(query, &matches, self.display_limit)
    }

    /// Query all repositories concurrently, concatenating results in
    /// registry order.
    pub async fn find(&self, query: &str, kind: Option<SymbolKind>) -> Vec<SymbolMatch> {
        let limit = self.per_repository_limit;

        let lookups = self.repositories.iter().cloned().map(|repo| {
            let query = query.to_string();
            async move {
                let name = repo.name.clone();
                match tokio::task::spawn_blocking(move || query_repository(&repo, &query, kind, limit))
                    .await
                {
                    Ok(matches) => matches,
                    Err(e) => {
                        error!("Search task for repository '{}' failed: {}", name, e);
                        Vec::new()
                    }
                }
            }
        });

        join_all(lookups).await.into_iter().flatten().collect()
    }
}

#[async_trait]
impl Tool for SymbolSearchTool {
    fn description(&self) -> &str {
        "Find where C# classes, structs, interfaces, enums, methods, constructors \
         and properties are defined, using the prebuilt symbol index. Returns \
         file paths and line ranges. Definitions only, not references."
    }

    fn parameters(&self) -> serde_json::Value {
        schemars::schema_for!(SymbolSearchRequest).to_value()
    }

    async fn call(&self, args: serde_json::Value) -> ToolResponse {
        match serde_json::from_value::<SymbolSearchRequest>(args) {
            Ok(request) => self.search(request).await,
            Err(e) => ToolResponse::error(format!("Invalid arguments: {}", e)),
        }
    }
}

/// Blocking lookup in one repository's store. Missing stores and query
/// failures yield no rows.
fn query_repository(
    repo: &Repository,
    query: &str,
    kind: Option<SymbolKind>,
    limit: usize,
) -> Vec<SymbolMatch> {
    let store_path = repo.store_path();
    if !store_path.exists() {
        warn!("Index not found for {}", repo.root.display());
        return Vec::new();
    }

    let records = SymbolStore::open_read_only(&store_path)
        .and_then(|store| store.search(query, kind, limit));

    match records {
        Ok(records) => {
            debug!("{} matches in repository '{}'", records.len(), repo.name);
            records
                .into_iter()
                .map(|record| SymbolMatch {
                    repository: repo.name.clone(),
                    name: record.name,
                    kind: record.kind,
                    file_path: record.file_path,
                    start_line: record.start_line,
                    end_line: record.end_line,
                })
                .collect()
        }
        Err(e) => {
            error!("Error querying {}: {}", store_path.display(), e);
            Vec::new()
        }
    }
}

fn format_matches(query: &str, matches: &[SymbolMatch], display_limit: usize) -> ToolResponse {
    if matches.is_empty() {
        let message = format!("No symbols found matching '{}'.", query);
        return ToolResponse::success(message.clone(), message);
    }

    let mut lines = Vec::with_capacity(matches.len().min(display_limit) + 2);
    lines.push(format!("Found {} matches for '{}':", matches.len(), query));
    lines.extend(
        matches
            .iter()
            .take(display_limit)
            .enumerate()
            .map(|(i, m)| m.listing_line(i + 1)),
    );
    if matches.len() > display_limit {
        lines.push(format!("... and {} more.", matches.len() - display_limit));
    }

    ToolResponse::success(
        lines.join("\n"),
        format!("Found {} symbols matching '{}'.", matches.len(), query),
    )
}
