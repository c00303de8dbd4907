//! Wire-format query construction with `hickory-proto`.

use super::super::transport::udp::MAX_UDP_RESPONSE_SIZE;
use ferrous_dnsq_domain::DomainError;
use hickory_proto::op::{Edns, Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name, RecordType};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};

pub struct MessageBuilder;

impl MessageBuilder {
    /// Build a recursive query for a validating stub: RD, CD and EDNS(0)
    /// with the DO bit, so the upstream returns signatures without
    /// filtering out data it considers bogus itself.
    ///
    /// Returns the message ID alongside the wire bytes.
    pub fn build_query(name: &Name, record_type: RecordType) -> Result<(u16, Vec<u8>), DomainError> {
        let mut query = Query::new();
        query.set_name(name.clone());
        query.set_query_type(record_type);
        query.set_query_class(DNSClass::IN);

        let id = fastrand::u16(..);

        let mut message = Message::new(id, MessageType::Query, OpCode::Query);
        message.set_recursion_desired(true);
        message.set_checking_disabled(true);
        message.add_query(query);

        let edns = message.extensions_mut().get_or_insert_with(Edns::new);
        edns.set_max_payload(MAX_UDP_RESPONSE_SIZE as u16);
        edns.enable_dnssec();

        let bytes = Self::serialize_message(&message)?;
        Ok((id, bytes))
    }

    fn serialize_message(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }
}
