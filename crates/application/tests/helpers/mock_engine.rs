use ferrous_dnsq_application::ports::{EngineResponse, ValidatingEngine, WireCodec};
use ferrous_dnsq_domain::{DomainError, EngineStatus};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Engine double that returns a scripted response and records every call.
#[derive(Clone)]
pub struct ScriptedEngine {
    response: Arc<Mutex<EngineResponse>>,
    config_error: Option<DomainError>,
    rejected_anchors: HashSet<String>,
    loaded_configs: Arc<Mutex<Vec<String>>>,
    installed_anchors: Arc<Mutex<Vec<String>>>,
    resolve_calls: Arc<AtomicUsize>,
    last_question: Arc<Mutex<Option<(String, u16, u16)>>>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self {
            response: Arc::new(Mutex::new(EngineResponse::failed(
                EngineStatus::INITFAIL,
                "no scripted response",
            ))),
            config_error: None,
            rejected_anchors: HashSet::new(),
            loaded_configs: Arc::new(Mutex::new(Vec::new())),
            installed_anchors: Arc::new(Mutex::new(Vec::new())),
            resolve_calls: Arc::new(AtomicUsize::new(0)),
            last_question: Arc::new(Mutex::new(None)),
        }
    }

    pub fn responding(response: EngineResponse) -> Self {
        let engine = Self::new();
        engine.set_response(response);
        engine
    }

    pub fn with_config_error(mut self, error: DomainError) -> Self {
        self.config_error = Some(error);
        self
    }

    pub fn rejecting_anchor(mut self, anchor: &str) -> Self {
        self.rejected_anchors.insert(anchor.to_string());
        self
    }

    pub fn set_response(&self, response: EngineResponse) {
        *self.response.lock().unwrap() = response;
    }

    pub fn resolve_calls(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
    }

    pub fn loaded_configs(&self) -> Vec<String> {
        self.loaded_configs.lock().unwrap().clone()
    }

    pub fn installed_anchors(&self) -> Vec<String> {
        self.installed_anchors.lock().unwrap().clone()
    }

    pub fn last_question(&self) -> Option<(String, u16, u16)> {
        self.last_question.lock().unwrap().clone()
    }
}

impl Default for ScriptedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidatingEngine for ScriptedEngine {
    fn load_resolver_config(&mut self, path: &str) -> Result<(), DomainError> {
        if let Some(error) = &self.config_error {
            return Err(error.clone());
        }
        self.loaded_configs.lock().unwrap().push(path.to_string());
        Ok(())
    }

    fn add_trust_anchor(&mut self, anchor: &str) -> Result<(), DomainError> {
        if self.rejected_anchors.contains(anchor) {
            return Err(DomainError::InvalidTrustAnchor(format!(
                "cannot parse {}",
                anchor
            )));
        }
        self.installed_anchors.lock().unwrap().push(anchor.to_string());
        Ok(())
    }

    fn resolve(&self, qname: &str, qtype: u16, qclass: u16) -> EngineResponse {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_question.lock().unwrap() = Some((qname.to_string(), qtype, qclass));
        self.response.lock().unwrap().clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeMessage {
    pub id: u16,
    pub rcode: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeRecord {
    pub qclass: u16,
    pub qtype: u16,
    pub data: Vec<u8>,
}

/// Codec double: messages need a 12-byte header, A records exactly 4 bytes
/// and AAAA records exactly 16.
pub struct FakeCodec;

impl WireCodec for FakeCodec {
    type Message = FakeMessage;
    type Record = FakeRecord;
    type Error = String;

    fn type_code(&self, text: &str) -> Result<u16, DomainError> {
        match text.to_ascii_uppercase().as_str() {
            "A" => Ok(1),
            "NS" => Ok(2),
            "MX" => Ok(15),
            "TXT" => Ok(16),
            "AAAA" => Ok(28),
            _ => Err(DomainError::UnknownRecordType(text.to_string())),
        }
    }

    fn decode_message(&self, packet: &[u8]) -> Result<FakeMessage, String> {
        if packet.len() < 12 {
            return Err(format!("header needs 12 bytes, got {}", packet.len()));
        }
        Ok(FakeMessage {
            id: u16::from_be_bytes([packet[0], packet[1]]),
            rcode: packet[3] & 0x0F,
        })
    }

    fn decode_record(
        &self,
        qclass: u16,
        qtype: u16,
        bytes: &[u8],
        offset: usize,
        length: usize,
    ) -> Result<FakeRecord, String> {
        let data = bytes
            .get(offset..offset + length)
            .ok_or_else(|| "record runs past end of buffer".to_string())?;
        let expected = match qtype {
            1 => Some(4),
            28 => Some(16),
            _ => None,
        };
        if let Some(expected) = expected {
            if data.len() != expected {
                return Err(format!("expected {} bytes, got {}", expected, data.len()));
            }
        }
        Ok(FakeRecord {
            qclass,
            qtype,
            data: data.to_vec(),
        })
    }
}
