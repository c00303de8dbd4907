//! TCP transport (RFC 1035 §4.2.2, RFC 7766): two-byte length prefix per
//! message, one connection per exchange.

use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use ferrous_dnsq_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

const MAX_TCP_MESSAGE_SIZE: usize = 65535;

pub struct TcpTransport {
    server_addr: SocketAddr,
}

impl TcpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    async fn connect(&self, timeout: Duration) -> Result<TcpStream, DomainError> {
        let stream = tokio::time::timeout(timeout, TcpStream::connect(self.server_addr))
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: self.server_addr.to_string(),
            })?
            .map_err(|e| {
                DomainError::IoError(format!(
                    "Connection refused by TCP server {}: {}",
                    self.server_addr, e
                ))
            })?;

        stream.set_nodelay(true).map_err(|e| {
            DomainError::IoError(format!(
                "Failed to set TCP_NODELAY on {}: {}",
                self.server_addr, e
            ))
        })?;

        Ok(stream)
    }
}

#[async_trait]
impl DnsTransport for TcpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let mut stream = self.connect(timeout).await?;

        tokio::time::timeout(timeout, send_with_length_prefix(&mut stream, message_bytes))
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: self.server_addr.to_string(),
            })??;

        debug!(
            server = %self.server_addr,
            message_len = message_bytes.len(),
            "TCP query sent"
        );

        let response_bytes = tokio::time::timeout(timeout, read_with_length_prefix(&mut stream))
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: self.server_addr.to_string(),
            })??;

        debug!(
            server = %self.server_addr,
            response_len = response_bytes.len(),
            "TCP response received"
        );

        Ok(TransportResponse {
            bytes: response_bytes,
            protocol_used: "TCP",
        })
    }
}

pub(crate) async fn send_with_length_prefix<S>(
    stream: &mut S,
    message_bytes: &[u8],
) -> Result<(), DomainError>
where
    S: AsyncWriteExt + Unpin,
{
    let length = u16::try_from(message_bytes.len()).map_err(|_| {
        DomainError::IoError(format!(
            "Query too large for TCP framing: {} bytes",
            message_bytes.len()
        ))
    })?;

    let mut framed = Vec::with_capacity(2 + message_bytes.len());
    framed.extend_from_slice(&length.to_be_bytes());
    framed.extend_from_slice(message_bytes);

    stream
        .write_all(&framed)
        .await
        .map_err(|e| DomainError::IoError(format!("Failed to write TCP query: {}", e)))?;
    stream
        .flush()
        .await
        .map_err(|e| DomainError::IoError(format!("Failed to flush TCP stream: {}", e)))
}

pub(crate) async fn read_with_length_prefix<S>(stream: &mut S) -> Result<Vec<u8>, DomainError>
where
    S: AsyncReadExt + Unpin,
{
    let mut len_buf = [0u8; 2];
    stream
        .read_exact(&mut len_buf)
        .await
        .map_err(|e| DomainError::IoError(format!("Failed to read response length: {}", e)))?;

    let response_len = u16::from_be_bytes(len_buf) as usize;

    if response_len > MAX_TCP_MESSAGE_SIZE {
        return Err(DomainError::InvalidDnsResponse(format!(
            "Response too large: {} bytes (max {})",
            response_len, MAX_TCP_MESSAGE_SIZE
        )));
    }

    let mut response = vec![0u8; response_len];
    stream
        .read_exact(&mut response)
        .await
        .map_err(|e| DomainError::IoError(format!("Failed to read response body: {}", e)))?;

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_length_prefix_round_trip() {
        let (mut client, mut server) = tokio::io::duplex(1024);
        let payload = vec![0xAB; 300];

        send_with_length_prefix(&mut client, &payload).await.unwrap();
        let received = read_with_length_prefix(&mut server).await.unwrap();

        assert_eq!(received, payload);
    }

    #[tokio::test]
    async fn test_length_prefix_is_big_endian() {
        let (mut client, mut server) = tokio::io::duplex(1024);

        send_with_length_prefix(&mut client, &[1, 2, 3]).await.unwrap();

        let mut raw = [0u8; 5];
        server.read_exact(&mut raw).await.unwrap();
        assert_eq!(raw, [0x00, 0x03, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_truncated_body_is_error() {
        let (mut client, mut server) = tokio::io::duplex(1024);
        client.write_all(&[0x00, 0x10, 1, 2]).await.unwrap();
        drop(client);

        assert!(read_with_length_prefix(&mut server).await.is_err());
    }
}
