use std::str::FromStr;

/// Which [`TodoRepo`](todos_db::repositories::TodoRepo) implementation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// ScyllaDB / Cassandra cluster.
    Scylla,
    /// Process-local map; data is lost on restart.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scylla" | "cassandra" => Ok(Self::Scylla),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => Err(format!("unknown store backend '{other}'")),
        }
    }
}

/// Store connection settings.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Contact points, `host:port`.
    pub nodes: Vec<String>,
    pub keyspace: String,
    pub connect_timeout_secs: u64,
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Emit logs as JSON lines (`LOG_FORMAT=json`).
    pub log_json: bool,
    pub store: StoreConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                 |
    /// |-------------------------------|-------------------------|
    /// | `HOST`                        | `0.0.0.0`               |
    /// | `PORT`                        | `8080`                  |
    /// | `CORS_ORIGINS`                | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`        | `30`                    |
    /// | `LOG_FORMAT`                  | `text`                  |
    /// | `STORE_BACKEND`               | `scylla`                |
    /// | `SCYLLA_NODES`                | `127.0.0.1:9042`        |
    /// | `SCYLLA_KEYSPACE`             | `todo_app`              |
    /// | `SCYLLA_CONNECT_TIMEOUT_SECS` | `5`                     |
    ///
    /// Panics on unparseable values; misconfiguration should stop startup.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, default: &str| var(key).unwrap_or_else(|| default.into());

        let host = get("HOST", "0.0.0.0");

        let port: u16 = get("PORT", "8080")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = split_list(&get("CORS_ORIGINS", "http://localhost:5173"));

        let request_timeout_secs: u64 = get("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let log_json = get("LOG_FORMAT", "text").eq_ignore_ascii_case("json");

        let backend: StoreBackend = get("STORE_BACKEND", "scylla")
            .parse()
            .unwrap_or_else(|e| panic!("STORE_BACKEND: {e}"));

        let nodes = split_list(&get("SCYLLA_NODES", "127.0.0.1:9042"));
        assert!(!nodes.is_empty(), "SCYLLA_NODES must name at least one node");

        let keyspace = get("SCYLLA_KEYSPACE", "todo_app");

        let connect_timeout_secs: u64 = get("SCYLLA_CONNECT_TIMEOUT_SECS", "5")
            .parse()
            .expect("SCYLLA_CONNECT_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            log_json,
            store: StoreConfig {
                backend,
                nodes,
                keyspace,
                connect_timeout_secs,
            },
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
