//! UDP transport (RFC 1035 §4.2.1).
//!
//! Messages go out unframed. Replies carrying the TC bit must be retried
//! over TCP by the caller.

use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use ferrous_dnsq_domain::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Advertised EDNS(0) payload size; DNSSEC answers rarely fit in 512 bytes.
pub const MAX_UDP_RESPONSE_SIZE: usize = 4096;

pub struct UdpTransport {
    server_addr: SocketAddr,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    fn bind_addr(&self) -> SocketAddr {
        if self.server_addr.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        }
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let socket = UdpSocket::bind(self.bind_addr())
            .await
            .map_err(|e| DomainError::IoError(format!("Failed to bind UDP socket: {}", e)))?;

        let bytes_sent =
            tokio::time::timeout(timeout, socket.send_to(message_bytes, self.server_addr))
                .await
                .map_err(|_| DomainError::TransportTimeout {
                    server: self.server_addr.to_string(),
                })?
                .map_err(|e| {
                    DomainError::IoError(format!(
                        "Failed to send UDP query to {}: {}",
                        self.server_addr, e
                    ))
                })?;

        debug!(server = %self.server_addr, bytes_sent, "UDP query sent");

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        // One deadline for the whole receive; stray datagrams do not extend it.
        let deadline = Instant::now() + timeout;

        loop {
            let (bytes_received, from_addr) =
                tokio::time::timeout_at(deadline, socket.recv_from(&mut recv_buf))
                    .await
                    .map_err(|_| DomainError::TransportTimeout {
                        server: self.server_addr.to_string(),
                    })?
                    .map_err(|e| {
                        DomainError::IoError(format!(
                            "Failed to receive UDP response from {}: {}",
                            self.server_addr, e
                        ))
                    })?;

            if from_addr != self.server_addr {
                warn!(
                    expected = %self.server_addr,
                    received_from = %from_addr,
                    "Dropping UDP response from unexpected source"
                );
                continue;
            }

            recv_buf.truncate(bytes_received);
            debug!(server = %self.server_addr, bytes_received, "UDP response received");

            return Ok(TransportResponse {
                bytes: recv_buf,
                protocol_used: "UDP",
            });
        }
    }
}
