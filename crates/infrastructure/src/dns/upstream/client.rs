use super::super::forwarding::{DnsResponse, MessageBuilder, ResponseParser};
use super::super::transport::Transport;
use ferrous_dnsq_domain::DomainError;
use hickory_proto::rr::{Name, RecordType};
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// One answered query: the parsed reply, the bytes it came from and the
/// server that sent it.
#[derive(Debug, Clone)]
pub struct UpstreamExchange {
    pub server: SocketAddr,
    pub response: DnsResponse,
    pub raw: Vec<u8>,
    pub latency_ms: u64,
}

/// Failover client over the nameservers of a `resolv.conf`.
///
/// Servers are tried in order, `attempts` rounds in total. A truncated UDP
/// reply is retried once over TCP against the same server.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    servers: Vec<SocketAddr>,
    timeout: Duration,
    attempts: u32,
}

impl UpstreamClient {
    pub fn new(servers: Vec<SocketAddr>, timeout: Duration, attempts: u32) -> Self {
        Self {
            servers,
            timeout,
            attempts: attempts.max(1),
        }
    }

    pub fn servers(&self) -> &[SocketAddr] {
        &self.servers
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Ask every server in turn until one answers the question.
    ///
    /// When every attempt failed at the socket level the last I/O error is
    /// returned; otherwise the servers are reported unreachable.
    pub async fn query(
        &self,
        name: &Name,
        record_type: RecordType,
    ) -> Result<UpstreamExchange, DomainError> {
        let (id, query_bytes) = MessageBuilder::build_query(name, record_type)?;
        let mut socket_failure: Option<DomainError> = None;
        let mut other_failure = false;

        for attempt in 1..=self.attempts {
            for &server in &self.servers {
                match self.exchange(server, id, name, record_type, &query_bytes).await {
                    Ok(exchange) => {
                        debug!(
                            domain = %name,
                            record_type = %record_type,
                            server = %server,
                            latency_ms = exchange.latency_ms,
                            "Upstream answered"
                        );
                        return Ok(exchange);
                    }
                    Err(e) => {
                        warn!(
                            domain = %name,
                            record_type = %record_type,
                            server = %server,
                            attempt,
                            error = %e,
                            "Upstream query failed"
                        );
                        match e {
                            DomainError::IoError(_) => socket_failure = Some(e),
                            _ => other_failure = true,
                        }
                    }
                }
            }
        }

        match socket_failure {
            Some(e) if !other_failure => Err(e),
            _ => Err(DomainError::TransportAllServersUnreachable),
        }
    }

    async fn exchange(
        &self,
        server: SocketAddr,
        id: u16,
        name: &Name,
        record_type: RecordType,
        query_bytes: &[u8],
    ) -> Result<UpstreamExchange, DomainError> {
        let start = Instant::now();

        let mut reply = Transport::udp(server).send(query_bytes, self.timeout).await?;
        let mut response = Self::parse_matching(&reply.bytes, id, name, record_type)?;

        if response.truncated {
            debug!(server = %server, "Truncated UDP response, retrying over TCP");
            reply = Transport::tcp(server).send(query_bytes, self.timeout).await?;
            response = Self::parse_matching(&reply.bytes, id, name, record_type)?;
        }

        debug!(
            server = %server,
            protocol = reply.protocol_used,
            bytes = reply.bytes.len(),
            "Reply accepted"
        );

        Ok(UpstreamExchange {
            server,
            response,
            raw: reply.bytes,
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn parse_matching(
        bytes: &[u8],
        id: u16,
        name: &Name,
        record_type: RecordType,
    ) -> Result<DnsResponse, DomainError> {
        let response = ResponseParser::parse(bytes)?;
        if response.message.id() != id {
            return Err(DomainError::InvalidDnsResponse(format!(
                "Response ID {} does not match query ID {}",
                response.message.id(),
                id
            )));
        }
        if !response.answers_question(name, record_type) {
            return Err(DomainError::InvalidDnsResponse(format!(
                "Response does not answer {} {}",
                name, record_type
            )));
        }
        Ok(response)
    }
}
