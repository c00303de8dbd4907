use ferrous_dnsq_application::ports::WireCodec;
use ferrous_dnsq_domain::DomainError;
use hickory_proto::op::Message;
use hickory_proto::rr::{DNSClass, RData, RecordType};
use hickory_proto::serialize::binary::{BinDecoder, Restrict};
use hickory_proto::ProtoError;
use std::str::FromStr;
use tracing::debug;

/// [`WireCodec`] backed by `hickory-proto`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HickoryWireCodec;

impl HickoryWireCodec {
    pub fn new() -> Self {
        Self
    }

    /// RFC 3597 generic type names, e.g. `TYPE65534`.
    fn generic_type_code(text: &str) -> Option<u16> {
        let prefix = text.get(..4)?;
        if !prefix.eq_ignore_ascii_case("TYPE") {
            return None;
        }
        text[4..].parse::<u16>().ok()
    }

    /// Types that only make sense as a query or transfer operation.
    fn is_meta_type(record_type: RecordType) -> bool {
        matches!(
            record_type,
            RecordType::ANY
                | RecordType::AXFR
                | RecordType::IXFR
                | RecordType::OPT
                | RecordType::ZERO
        )
    }
}

impl WireCodec for HickoryWireCodec {
    type Message = Message;
    type Record = RData;
    type Error = ProtoError;

    fn type_code(&self, text: &str) -> Result<u16, DomainError> {
        let text = text.trim();

        if let Some(code) = Self::generic_type_code(text) {
            return Ok(code);
        }

        let record_type = RecordType::from_str(&text.to_ascii_uppercase())
            .map_err(|_| DomainError::UnknownRecordType(text.to_string()))?;

        if matches!(record_type, RecordType::Unknown(_)) || Self::is_meta_type(record_type) {
            return Err(DomainError::UnknownRecordType(text.to_string()));
        }

        Ok(u16::from(record_type))
    }

    fn decode_message(&self, packet: &[u8]) -> Result<Message, ProtoError> {
        Message::from_vec(packet)
    }

    fn decode_record(
        &self,
        qclass: u16,
        qtype: u16,
        bytes: &[u8],
        offset: usize,
        length: usize,
    ) -> Result<RData, ProtoError> {
        if DNSClass::from(qclass) != DNSClass::IN {
            return Err(ProtoError::from(format!(
                "unsupported record class {}",
                qclass
            )));
        }

        let end = offset
            .checked_add(length)
            .filter(|end| *end <= bytes.len())
            .ok_or_else(|| {
                ProtoError::from(format!(
                    "record data {}+{} exceeds {} bytes",
                    offset,
                    length,
                    bytes.len()
                ))
            })?;
        let rdlength = u16::try_from(length)
            .map_err(|_| ProtoError::from(format!("record data too long: {}", length)))?;

        let record_type = RecordType::from(qtype);
        let mut decoder = BinDecoder::new(&bytes[offset..end]);
        let rdata = RData::read(&mut decoder, record_type, Restrict::new(rdlength))?;

        if decoder.index() != length {
            return Err(ProtoError::from(format!(
                "{} record used {} of {} bytes",
                record_type,
                decoder.index(),
                length
            )));
        }

        debug!(record_type = %record_type, length, "Record decoded");
        Ok(rdata)
    }
}
