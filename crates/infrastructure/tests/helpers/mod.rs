pub mod dns_server_mock;
pub mod signed_zone;
