//! Plain DNS over UDP.
//!
//! [`UdpLookup`] sends one A query per call from a fresh ephemeral socket
//! and waits for the matching reply. Wire encoding is done by hickory-proto.

use super::{Answering, Lookup};
use crate::base::checkerror::LookupError;
use crate::base::context::IoResultExt;
use hickory_resolver::proto::{
    op::{Message, MessageType, OpCode, Query},
    rr::{Name, RData, RecordType},
};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::UdpSocket;

/// Port used when an endpoint address does not name one.
pub const DNS_PORT: u16 = 53;

/// Maximum UDP DNS response size
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

/// Resolver client speaking classic DNS over UDP.
///
/// Each lookup binds its own socket, so concurrent lookups share nothing.
/// The socket is connected to the server: an ICMP port-unreachable comes
/// back as a "connection refused" receive error instead of a timeout.
#[derive(Clone, Debug, Default)]
pub struct UdpLookup;

impl UdpLookup {
    pub fn new() -> Self {
        Self
    }
}

impl Lookup for UdpLookup {
    fn lookup(&self, domain: &str, server: &str) -> Answering {
        let domain = domain.to_string();
        let server = server.to_string();
        Box::pin(async move {
            let target = server_addr(&server).await?;
            let id = rand::random::<u16>();
            let query = build_query(&domain, id)?;

            tracing::trace!(domain = %domain, server = %target, id, "sending A query");
            exchange(target, &query, id).await
        })
    }
}

/// Encode an A/IN query for `domain` with recursion desired.
pub(crate) fn build_query(domain: &str, id: u16) -> Result<Vec<u8>, LookupError> {
    let fqdn = if domain.ends_with('.') {
        domain.to_string()
    } else {
        format!("{domain}.")
    };
    let name = Name::from_utf8(&fqdn).map_err(|e| LookupError::InvalidName {
        name: domain.to_string(),
        reason: e.to_string(),
    })?;

    let mut message = Message::new();
    message.set_id(id);
    message.set_message_type(MessageType::Query);
    message.set_op_code(OpCode::Query);
    message.set_recursion_desired(true);
    message.add_query(Query::query(name, RecordType::A));

    message
        .to_vec()
        .map_err(|e| LookupError::Encode(e.to_string()))
}

/// A addresses of the answer section, in answer order. CNAMEs and other
/// record types are skipped.
pub(crate) fn a_records(message: &Message) -> Vec<Ipv4Addr> {
    message
        .answers()
        .iter()
        .filter_map(|record| match record.data() {
            RData::A(a) => Some(a.0),
            _ => None,
        })
        .collect()
}

/// Turn an endpoint address into the socket address to query.
///
/// Accepts `ip`, `[ipv6]`, `ip:port`, `[ipv6]:port`, `host` and `host:port`.
/// Hostnames go through the system resolver.
pub(crate) async fn server_addr(server: &str) -> Result<SocketAddr, LookupError> {
    if let Ok(addr) = server.parse::<SocketAddr>() {
        return Ok(addr);
    }
    let bare = server
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(server);
    if let Ok(ip) = bare.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, DNS_PORT));
    }

    let (host, port) = match server.rsplit_once(':') {
        Some((host, port)) => match port.parse::<u16>() {
            Ok(port) => (host, port),
            Err(_) => (server, DNS_PORT),
        },
        None => (server, DNS_PORT),
    };

    let unresolved = |reason: String| LookupError::ServerAddress {
        address: server.to_string(),
        reason,
    };
    if host.is_empty() || host.contains(char::is_whitespace) {
        return Err(unresolved("not a host name".to_string()));
    }
    tokio::net::lookup_host((host, port))
        .await
        .map_err(|e| unresolved(e.to_string()))?
        .next()
        .ok_or_else(|| unresolved("no addresses".to_string()))
}

async fn exchange(target: SocketAddr, query: &[u8], id: u16) -> Result<Vec<Ipv4Addr>, LookupError> {
    let bind_addr = if target.is_ipv6() {
        SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0)
    } else {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0)
    };

    let socket = UdpSocket::bind(bind_addr).await.exchange_context("bind")?;
    socket.connect(target).await.exchange_context("connect")?;
    socket.send(query).await.exchange_context("send")?;

    let mut buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
    loop {
        let len = socket.recv(&mut buf).await.exchange_context("receive")?;
        let response =
            Message::from_vec(&buf[..len]).map_err(|e| LookupError::Decode(e.to_string()))?;

        if response.id() != id || response.message_type() != MessageType::Response {
            tracing::trace!(server = %target, expected = id, got = response.id(), "ignoring stray datagram");
            continue;
        }

        return Ok(a_records(&response));
    }
}
