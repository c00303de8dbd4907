#![allow(dead_code)]
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

pub const TYPE_A: u16 = 1;
pub const TYPE_CNAME: u16 = 5;
pub const TYPE_SOA: u16 = 6;
pub const TYPE_DS: u16 = 43;
pub const TYPE_RRSIG: u16 = 46;
pub const TYPE_DNSKEY: u16 = 48;

pub const RCODE_NOERROR: u8 = 0;
pub const RCODE_NXDOMAIN: u8 = 3;

/// Canonical wire form of a presentation name: lowercase, uncompressed.
pub fn name_wire(name: &str) -> Vec<u8> {
    let mut wire = Vec::new();
    for label in name.trim_end_matches('.').split('.').filter(|l| !l.is_empty()) {
        wire.push(label.len() as u8);
        wire.extend(label.to_ascii_lowercase().bytes());
    }
    wire.push(0);
    wire
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireRecord {
    pub owner: String,
    pub rtype: u16,
    pub ttl: u32,
    pub rdata: Vec<u8>,
}

impl WireRecord {
    pub fn new(owner: &str, rtype: u16, ttl: u32, rdata: Vec<u8>) -> Self {
        Self {
            owner: owner.to_ascii_lowercase(),
            rtype,
            ttl,
            rdata,
        }
    }

    pub fn a(owner: &str, ip: [u8; 4], ttl: u32) -> Self {
        Self::new(owner, TYPE_A, ttl, ip.to_vec())
    }

    pub fn cname(owner: &str, target: &str, ttl: u32) -> Self {
        Self::new(owner, TYPE_CNAME, ttl, name_wire(target))
    }

    pub fn soa(zone: &str, ttl: u32, minimum: u32) -> Self {
        let mut rdata = name_wire(&format!("ns1.{}", zone));
        rdata.extend(name_wire(&format!("hostmaster.{}", zone)));
        for value in [2024_01_01u32, 3600, 600, 86400, minimum] {
            rdata.extend(value.to_be_bytes());
        }
        Self::new(zone, TYPE_SOA, ttl, rdata)
    }

    /// Owner, type, class IN, `ttl`, RDLENGTH and RDATA.
    pub fn write(&self, ttl: u32, out: &mut Vec<u8>) {
        out.extend(name_wire(&self.owner));
        out.extend(self.rtype.to_be_bytes());
        out.extend(1u16.to_be_bytes());
        out.extend(ttl.to_be_bytes());
        out.extend((self.rdata.len() as u16).to_be_bytes());
        out.extend(&self.rdata);
    }
}

#[derive(Debug, Clone)]
pub struct MockQuery {
    pub id: u16,
    pub recursion_desired: bool,
    pub name: String,
    pub qtype: u16,
    question: Vec<u8>,
}

impl MockQuery {
    pub fn parse(packet: &[u8]) -> Option<Self> {
        if packet.len() < 12 {
            return None;
        }

        let mut labels = Vec::new();
        let mut pos = 12;
        loop {
            let len = *packet.get(pos)? as usize;
            pos += 1;
            if len == 0 {
                break;
            }
            let label = packet.get(pos..pos + len)?;
            labels.push(String::from_utf8_lossy(label).to_ascii_lowercase());
            pos += len;
        }
        let qtype = u16::from_be_bytes([*packet.get(pos)?, *packet.get(pos + 1)?]);
        let question = packet.get(12..pos + 4)?.to_vec();

        let name = if labels.is_empty() {
            ".".to_string()
        } else {
            format!("{}.", labels.join("."))
        };

        Some(Self {
            id: u16::from_be_bytes([packet[0], packet[1]]),
            recursion_desired: packet[2] & 0x01 != 0,
            name,
            qtype,
            question,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockReply {
    pub rcode: u8,
    pub truncated: bool,
    pub answers: Vec<WireRecord>,
    pub authority: Vec<WireRecord>,
    /// Question section to send instead of echoing the query's.
    pub question: Option<Vec<u8>>,
}

impl MockReply {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn answer(answers: Vec<WireRecord>) -> Self {
        Self {
            answers,
            ..Self::default()
        }
    }

    pub fn nxdomain(authority: Vec<WireRecord>) -> Self {
        Self {
            rcode: RCODE_NXDOMAIN,
            authority,
            ..Self::default()
        }
    }

    pub fn with_question(mut self, name: &str, qtype: u16) -> Self {
        let mut question = name_wire(name);
        question.extend(qtype.to_be_bytes());
        question.extend(1u16.to_be_bytes());
        self.question = Some(question);
        self
    }

    pub fn encode(&self, query: &MockQuery) -> Vec<u8> {
        let mut packet = Vec::with_capacity(512);
        packet.extend(query.id.to_be_bytes());

        let mut flags_high = 0x80;
        if query.recursion_desired {
            flags_high |= 0x01;
        }
        if self.truncated {
            flags_high |= 0x02;
        }
        packet.push(flags_high);
        packet.push(0x80 | (self.rcode & 0x0f));

        packet.extend(1u16.to_be_bytes());
        packet.extend((self.answers.len() as u16).to_be_bytes());
        packet.extend((self.authority.len() as u16).to_be_bytes());
        packet.extend(0u16.to_be_bytes());
        packet.extend(self.question.as_ref().unwrap_or(&query.question));

        for record in self.answers.iter().chain(&self.authority) {
            record.write(record.ttl, &mut packet);
        }
        packet
    }
}

type Handler = dyn Fn(&MockQuery) -> Option<MockReply> + Send + 'static;

/// UDP DNS server on 127.0.0.1 driven by a closure. Returning `None` from
/// the closure leaves the query unanswered.
///
/// It runs on its own thread and runtime so blocking engine calls can be
/// made from the test thread.
pub struct MockDnsServer {
    addr: SocketAddr,
    queries: Arc<Mutex<Vec<(String, u16)>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl MockDnsServer {
    pub fn start<F>(handler: F) -> std::io::Result<Self>
    where
        F: Fn(&MockQuery) -> Option<MockReply> + Send + 'static,
    {
        let std_socket = std::net::UdpSocket::bind("127.0.0.1:0")?;
        std_socket.set_nonblocking(true)?;
        let addr = std_socket.local_addr()?;

        let queries = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&queries);
        let handler: Box<Handler> = Box::new(handler);
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let thread = std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("mock server runtime");

            runtime.block_on(async move {
                let socket = UdpSocket::from_std(std_socket).expect("mock server socket");
                let mut buf = vec![0u8; 4096];

                loop {
                    tokio::select! {
                        _ = &mut shutdown_rx => break,
                        result = socket.recv_from(&mut buf) => {
                            let Ok((len, peer)) = result else { continue };
                            let Some(query) = MockQuery::parse(&buf[..len]) else { continue };

                            seen.lock().unwrap().push((query.name.clone(), query.qtype));
                            if let Some(reply) = handler(&query) {
                                let _ = socket.send_to(&reply.encode(&query), peer).await;
                            }
                        }
                    }
                }
            });
        });

        Ok(Self {
            addr,
            queries,
            shutdown_tx: Some(shutdown_tx),
            thread: Some(thread),
        })
    }

    /// A server that never answers.
    pub fn silent() -> std::io::Result<Self> {
        Self::start(|_| None)
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Questions received so far, as `(name, qtype)`.
    pub fn queries(&self) -> Vec<(String, u16)> {
        self.queries.lock().unwrap().clone()
    }

    pub fn query_count(&self, name: &str, qtype: u16) -> usize {
        self.queries()
            .iter()
            .filter(|(n, t)| n == name && *t == qtype)
            .count()
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
