use std::fmt;
use std::sync::Arc;

/// DNS class codes (RFC 1035 §3.2.4). Queries are always issued in `IN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DnsClass(pub u16);

impl DnsClass {
    pub const IN: DnsClass = DnsClass(1);
    pub const CH: DnsClass = DnsClass(3);
    pub const HS: DnsClass = DnsClass(4);

    pub fn code(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for DnsClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            DnsClass::IN => write!(f, "IN"),
            DnsClass::CH => write!(f, "CH"),
            DnsClass::HS => write!(f, "HS"),
            DnsClass(other) => write!(f, "CLASS{}", other),
        }
    }
}

/// An immutable `(qname, qtype)` question. The type text has already been
/// resolved to its numeric code when a `DnsQuery` exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuery {
    pub qname: Arc<str>,
    pub qtype: u16,
    pub qtype_text: Arc<str>,
    pub qclass: DnsClass,
}

impl DnsQuery {
    pub fn new(qname: impl Into<Arc<str>>, qtype: u16, qtype_text: impl Into<Arc<str>>) -> Self {
        Self {
            qname: qname.into(),
            qtype,
            qtype_text: qtype_text.into(),
            qclass: DnsClass::IN,
        }
    }
}

impl fmt::Display for DnsQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.qname, self.qtype_text)
    }
}
