use ferrous_dnsq_domain::{CliOverrides, Config};
use tracing::info;
use tracing_subscriber::EnvFilter;

pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, overrides)
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    if let Some(source) = path.map(str::to_string).or_else(Config::get_config_path) {
        info!(path = %source, "Using configuration file");
    }

    Ok(config)
}

/// Logs go to stderr so stdout carries only the lookup result.
pub fn init_logging(config: &Config, level_from_cli: bool) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let directive = filter_directive(&config.logging.level, level_from_cli, rust_log.as_deref());

    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// `--log-level` wins, then `RUST_LOG`, then the configured level.
fn filter_directive(config_level: &str, level_from_cli: bool, rust_log: Option<&str>) -> String {
    match rust_log {
        Some(env) if !level_from_cli && !env.trim().is_empty() => env.to_string(),
        _ => config_level.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_cli_level_beats_rust_log() {
        assert_eq!(filter_directive("debug", true, Some("trace")), "debug");
    }

    #[test]
    fn test_rust_log_beats_config() {
        assert_eq!(filter_directive("warn", false, Some("info")), "info");
    }

    #[test]
    fn test_config_level_is_the_fallback() {
        assert_eq!(filter_directive("warn", false, None), "warn");
        assert_eq!(filter_directive("error", false, Some("  ")), "error");
    }

    #[test]
    fn test_load_config_applies_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[resolver]\nresolv_conf = \"/tmp/resolv.conf\"").unwrap();

        let overrides = CliOverrides {
            resolv_conf: Some("/etc/alt-resolv.conf".to_string()),
            trust_anchors: vec![],
            log_level: Some("debug".to_string()),
        };
        let config = load_config(file.path().to_str(), overrides).unwrap();

        assert_eq!(config.resolver.resolv_conf, "/etc/alt-resolv.conf");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.trust_anchors.anchors.len(), 1);
    }

    #[test]
    fn test_load_config_rejects_zero_timeout() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[resolver]\nquery_timeout_ms = 0").unwrap();

        assert!(load_config(file.path().to_str(), CliOverrides::default()).is_err());
    }
}
