//! Ferrous DNSQ Domain Layer
pub mod config;
pub mod dns_query;
pub mod dns_security;
pub mod errors;
pub mod response_code;

pub use config::{CliOverrides, Config, ConfigError, LoggingConfig, ResolverConfig, TrustAnchorConfig};
pub use dns_query::{DnsClass, DnsQuery};
pub use dns_security::{EngineStatus, SecurityIndicator};
pub use errors::{DomainError, WireStage};
pub use response_code::rcode_to_text;
