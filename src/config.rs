use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration file used when none is given on the command line
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse YAML config from {path:?}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("failed to parse TOML config from {path:?}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Repositories to index and search, in order
    #[serde(default, deserialize_with = "deserialize_repositories")]
    pub repositories: Vec<RepositoryConfig>,

    #[serde(default)]
    pub indexer: IndexerConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Tool bindings exposed to the tool-calling layer
    #[serde(default = "default_tools")]
    pub tools: Vec<ToolBinding>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repositories: Vec::new(),
            indexer: IndexerConfig::default(),
            search: SearchConfig::default(),
            logging: LoggingConfig::default(),
            tools: default_tools(),
        }
    }
}

/// One repository descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Repository root
    pub path: PathBuf,

    /// Identifier shown in search results (defaults to the last path component)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexerConfig {
    /// File extensions to parse (without the dot, case-sensitive)
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Directory names pruned from the walk wherever they appear
    #[serde(default = "default_ignore_dirs")]
    pub ignore_dirs: Vec<String>,

    /// Also honor .gitignore files
    #[serde(default)]
    pub respect_gitignore: bool,

    /// Number of parser threads (None = auto-detect)
    #[serde(default)]
    pub parallel_threads: Option<usize>,

    /// Number of files parsed per parallel batch
    #[serde(default = "default_file_batch_size")]
    pub file_batch_size: usize,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            ignore_dirs: default_ignore_dirs(),
            respect_gitignore: false,
            parallel_threads: None,
            file_batch_size: default_file_batch_size(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["cs".to_string()]
}

fn default_ignore_dirs() -> Vec<String> {
    [".git", ".svn", ".vs", "Library", "Temp", "Obj", "Build", "Logs"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_file_batch_size() -> usize {
    100
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Rows fetched from each repository
    #[serde(default = "default_result_cap")]
    pub per_repository_limit: usize,

    /// Rows listed in the final output
    #[serde(default = "default_result_cap")]
    pub display_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            per_repository_limit: default_result_cap(),
            display_limit: default_result_cap(),
        }
    }
}

fn default_result_cap() -> usize {
    20
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log to stderr
    #[serde(default = "default_true")]
    pub stderr: bool,

    /// Also write rolling log files
    #[serde(default)]
    pub file: bool,

    /// Directory for log files, relative to the working directory
    #[serde(default = "default_log_directory")]
    pub directory: PathBuf,

    /// Rotation: minutely, hourly, daily, never
    #[serde(default = "default_rotation")]
    pub rotation: String,

    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            stderr: true,
            file: false,
            directory: default_log_directory(),
            rotation: default_rotation(),
            file_prefix: default_file_prefix(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_directory() -> PathBuf {
    PathBuf::from(".symdex/logs")
}

fn default_rotation() -> String {
    "daily".to_string()
}

fn default_file_prefix() -> String {
    "symdex.log".to_string()
}

/// Binds a tool name to a built-in handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolBinding {
    pub name: String,
    pub handler: String,
}

fn default_tools() -> Vec<ToolBinding> {
    vec![ToolBinding {
        name: "search_symbol".to_string(),
        handler: "symbol_search".to_string(),
    }]
}

impl Config {
    /// Load configuration from a YAML file (or TOML, by `.toml` extension).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        if content.trim().is_empty() {
            return Ok(Config::default());
        }

        let is_toml = path.extension().and_then(|e| e.to_str()) == Some("toml");
        if is_toml {
            toml::from_str(&content).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            })
        } else {
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

/// A repository list entry; anything without a `path` is skipped.
#[derive(Deserialize)]
#[serde(untagged)]
enum RepositoryEntry {
    Descriptor(RepositoryConfig),
    Ignored(IgnoredAny),
}

/// Accepts the list form and the legacy `name: {path: ...}` map form,
/// preserving document order.
fn deserialize_repositories<'de, D>(deserializer: D) -> Result<Vec<RepositoryConfig>, D::Error>
where
    D: Deserializer<'de>,
{
    struct RepositoriesVisitor;

    impl<'de> Visitor<'de> for RepositoriesVisitor {
        type Value = Vec<RepositoryConfig>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a list of repositories or a map of named repositories")
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut repos = Vec::new();
            while let Some(entry) = seq.next_element::<RepositoryEntry>()? {
                if let RepositoryEntry::Descriptor(repo) = entry {
                    repos.push(repo);
                }
            }
            Ok(repos)
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut repos = Vec::new();
            while let Some((key, entry)) = map.next_entry::<String, RepositoryEntry>()? {
                if let RepositoryEntry::Descriptor(mut repo) = entry {
                    repo.name.get_or_insert(key);
                    repos.push(repo);
                }
            }
            Ok(repos)
        }
    }

    deserializer.deserialize_any(RepositoriesVisitor)
}
