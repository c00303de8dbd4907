use serde::{Deserialize, Serialize};

/// Settings handed to the validating engine at context setup.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Local resolver configuration read by the engine (nameserver list).
    #[serde(default = "default_resolv_conf")]
    pub resolv_conf: String,

    /// Per-upstream timeout used by the engine, in milliseconds.
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    /// How many times each nameserver is tried before failing over.
    #[serde(default = "default_attempts")]
    pub attempts: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            resolv_conf: default_resolv_conf(),
            query_timeout_ms: default_query_timeout_ms(),
            attempts: default_attempts(),
        }
    }
}

fn default_resolv_conf() -> String {
    "/etc/resolv.conf".to_string()
}

fn default_query_timeout_ms() -> u64 {
    5000
}

fn default_attempts() -> u32 {
    2
}
