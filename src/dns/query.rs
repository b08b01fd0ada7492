//! Forward query capability and its UDP implementation.
//!
//! Messages are built and parsed with `hickory-proto`; this module only owns
//! the exchange: one datagram out, the matching datagram back, each step under
//! the configured timeout. There is no retry and no TCP fallback.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use hickory_proto::op::{Edns, Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::{Name, Record, RecordType};
use log::{debug, warn};
use tokio::net::UdpSocket;

use crate::config::EDNS_BUFFER_SIZE;
use crate::error_handling::QueryError;

/// Parsed answer to one query.
#[derive(Debug, Clone)]
pub struct DnsResponse {
    /// Answer section rows in the order they were received
    pub answers: Vec<Record>,
    pub response_code: ResponseCode,
}

impl DnsResponse {
    pub fn new(answers: Vec<Record>, response_code: ResponseCode) -> Self {
        Self {
            answers,
            response_code,
        }
    }

    /// True when any answer row is an RRSIG.
    ///
    /// Presence anywhere in the answer marks every row of the response; no
    /// signature is validated.
    pub fn has_signature(&self) -> bool {
        self.answers
            .iter()
            .any(|record| record.record_type() == RecordType::RRSIG)
    }
}

/// "Send query, get parsed answer records" capability.
#[async_trait]
pub trait DnsQuery: Send + Sync {
    async fn query(&self, name: &str, record_type: RecordType) -> Result<DnsResponse, QueryError>;
}

/// Queries a single resolver over UDP with EDNS(0) and the DNSSEC-OK bit.
pub struct UdpDnsClient {
    server: SocketAddr,
    timeout: Duration,
}

impl UdpDnsClient {
    pub fn new(server: SocketAddr, timeout: Duration) -> Self {
        Self { server, timeout }
    }

    async fn exchange(&self, name: &str, id: u16, request: &[u8]) -> Result<Message, QueryError> {
        let bind_addr: SocketAddr = if self.server.is_ipv4() {
            SocketAddr::from(([0, 0, 0, 0], 0))
        } else {
            SocketAddr::from(([0u16; 8], 0))
        };
        let io_error = |source| QueryError::Io {
            server: self.server,
            source,
        };

        let socket = UdpSocket::bind(bind_addr).await.map_err(io_error)?;
        socket.connect(self.server).await.map_err(io_error)?;
        socket.send(request).await.map_err(io_error)?;

        let mut buf = vec![0u8; usize::from(EDNS_BUFFER_SIZE)];
        loop {
            let received = socket.recv(&mut buf).await.map_err(io_error)?;
            let response = Message::from_vec(&buf[..received]).map_err(|source| {
                QueryError::Decode {
                    server: self.server,
                    source,
                }
            })?;

            if response.id() != id {
                warn!(
                    "Discarding DNS response for '{}' with unexpected id {} (expected {})",
                    name,
                    response.id(),
                    id
                );
                continue;
            }
            if response.truncated() {
                debug!("Truncated response for '{}', using partial answer", name);
            }
            return Ok(response);
        }
    }
}

/// Builds a recursive query message with EDNS(0) and DNSSEC-OK set.
pub(crate) fn build_query(
    name: &str,
    record_type: RecordType,
    id: u16,
) -> Result<Message, QueryError> {
    let fqdn = if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{name}.")
    };
    let name = Name::from_str(&fqdn).map_err(|source| QueryError::InvalidName {
        name: name.to_string(),
        source,
    })?;

    let mut message = Message::new();
    message
        .set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true);
    message.add_query(Query::query(name, record_type));

    let edns = message.extensions_mut().get_or_insert_with(Edns::new);
    edns.set_max_payload(EDNS_BUFFER_SIZE);
    edns.set_dnssec_ok(true);

    Ok(message)
}

#[async_trait]
impl DnsQuery for UdpDnsClient {
    async fn query(&self, name: &str, record_type: RecordType) -> Result<DnsResponse, QueryError> {
        let id: u16 = rand::random();
        let message = build_query(name, record_type, id)?;
        let request = message.to_vec().map_err(|source| QueryError::Encode {
            name: name.to_string(),
            source,
        })?;

        let mut response = tokio::time::timeout(self.timeout, self.exchange(name, id, &request))
            .await
            .map_err(|_| QueryError::Timeout {
                name: name.to_string(),
                timeout: self.timeout,
            })??;

        let response_code = response.response_code();
        Ok(DnsResponse::new(response.take_answers(), response_code))
    }
}
