pub mod client;
pub mod resolv_conf;

pub use client::{UpstreamClient, UpstreamExchange};
pub use resolv_conf::ResolvConf;
