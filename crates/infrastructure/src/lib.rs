//! Ferrous DNSQ Infrastructure Layer
pub mod dns;
