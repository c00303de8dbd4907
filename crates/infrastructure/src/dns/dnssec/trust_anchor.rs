use super::types::DnskeyRecord;
use super::zone::{is_subdomain, label_count, to_fqdn};
use base64::{engine::general_purpose::STANDARD, Engine};
use ferrous_dnsq_domain::DomainError;

#[derive(Debug, Clone)]
pub struct TrustAnchor {
    pub zone: String,

    pub dnskey: DnskeyRecord,
}

impl TrustAnchor {
    pub fn new(zone: &str, dnskey: DnskeyRecord) -> Self {
        Self {
            zone: to_fqdn(zone),
            dnskey,
        }
    }

    /// Parse a DNSKEY record in presentation format:
    /// `<owner> [<ttl>] [IN] DNSKEY <flags> <protocol> <algorithm> <base64...>`.
    /// The key material may be split across several whitespace-separated
    /// chunks.
    pub fn parse(text: &str) -> Result<Self, DomainError> {
        let invalid = |msg: String| DomainError::InvalidTrustAnchor(msg);

        let mut tokens = text.split_whitespace().peekable();
        let owner = tokens
            .next()
            .ok_or_else(|| invalid("empty trust anchor".to_string()))?;

        while let Some(token) = tokens.peek() {
            if token.chars().all(|c| c.is_ascii_digit()) || token.eq_ignore_ascii_case("IN") {
                tokens.next();
            } else {
                break;
            }
        }

        match tokens.next() {
            Some(rtype) if rtype.eq_ignore_ascii_case("DNSKEY") => {}
            Some(rtype) => {
                return Err(invalid(format!(
                    "expected a DNSKEY record, found {}",
                    rtype
                )))
            }
            None => return Err(invalid(format!("{}: missing record type", owner))),
        }

        let flags: u16 = Self::parse_field(tokens.next(), "flags")?;
        let protocol: u8 = Self::parse_field(tokens.next(), "protocol")?;
        let algorithm: u8 = Self::parse_field(tokens.next(), "algorithm")?;

        let key_text: String = tokens.collect();
        if key_text.is_empty() {
            return Err(invalid(format!("{}: missing public key", owner)));
        }
        let public_key = STANDARD
            .decode(key_text.as_bytes())
            .map_err(|e| invalid(format!("{}: bad base64 key material: {}", owner, e)))?;

        let dnskey = DnskeyRecord::new(flags, protocol, algorithm, public_key)
            .map_err(|e| invalid(format!("{}: {}", owner, e)))?;

        Ok(Self::new(owner, dnskey))
    }

    fn parse_field<T: std::str::FromStr>(token: Option<&str>, field: &str) -> Result<T, DomainError> {
        let token =
            token.ok_or_else(|| DomainError::InvalidTrustAnchor(format!("missing {}", field)))?;
        token
            .parse()
            .map_err(|_| DomainError::InvalidTrustAnchor(format!("invalid {}: {}", field, token)))
    }

    pub fn key_tag(&self) -> u16 {
        self.dnskey.calculate_key_tag()
    }

    pub fn matches(&self, dnskey: &DnskeyRecord) -> bool {
        if self.dnskey.calculate_key_tag() != dnskey.calculate_key_tag() {
            return false;
        }

        if self.dnskey.algorithm != dnskey.algorithm {
            return false;
        }

        self.dnskey.public_key == dnskey.public_key
    }
}

#[derive(Debug, Clone, Default)]
pub struct TrustAnchorStore {
    anchors: Vec<TrustAnchor>,
}

impl TrustAnchorStore {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn add_anchor(&mut self, anchor: TrustAnchor) {
        self.anchors.push(anchor);
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_trusted(&self, dnskey: &DnskeyRecord, zone: &str) -> bool {
        let zone = to_fqdn(zone);
        self.anchors
            .iter()
            .any(|anchor| anchor.zone == zone && anchor.matches(dnskey))
    }

    /// Deepest anchored zone that encloses `name`.
    pub fn closest_anchor_zone(&self, name: &str) -> Option<&str> {
        let name = to_fqdn(name);
        self.anchors
            .iter()
            .filter(|anchor| is_subdomain(&name, &anchor.zone))
            .max_by_key(|anchor| label_count(&anchor.zone))
            .map(|anchor| anchor.zone.as_str())
    }
}
