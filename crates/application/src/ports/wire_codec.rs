use ferrous_dnsq_domain::DomainError;
use std::fmt;

/// DNS wire-format decoder used to turn engine output into typed data.
pub trait WireCodec {
    type Message: fmt::Debug;
    type Record: fmt::Debug;
    type Error: fmt::Display;

    /// Numeric code for a record-type mnemonic such as `"AAAA"`.
    fn type_code(&self, text: &str) -> Result<u16, DomainError>;

    fn decode_message(&self, packet: &[u8]) -> Result<Self::Message, Self::Error>;

    /// Decodes the RDATA found at `bytes[offset..offset + length]` as a record
    /// of the given class and type.
    fn decode_record(
        &self,
        qclass: u16,
        qtype: u16,
        bytes: &[u8],
        offset: usize,
        length: usize,
    ) -> Result<Self::Record, Self::Error>;
}
