#![allow(dead_code)]
#![allow(unused_imports)]

mod mock_engine;

pub use mock_engine::{FakeCodec, FakeMessage, FakeRecord, ScriptedEngine};

use ferrous_dnsq_application::ports::RawResolution;
use ferrous_dnsq_domain::SecurityIndicator;

/// Smallest packet the fake codec accepts as a message: a bare header.
pub fn header_only_packet(rcode: u8) -> Vec<u8> {
    vec![0x12, 0x34, 0x81, 0x80 | rcode, 0, 1, 0, 0, 0, 0, 0, 0]
}

pub fn secure_a_resolution(addresses: &[[u8; 4]]) -> RawResolution {
    RawResolution::new(0, SecurityIndicator::SECURE, 300, header_only_packet(0))
        .with_answers(addresses.iter().map(|a| a.to_vec()).collect())
}
