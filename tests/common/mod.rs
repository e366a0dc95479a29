//! Local UDP DNS responder for integration tests.

#![allow(dead_code)]

use hickory_resolver::proto::op::{Message, MessageType, OpCode, ResponseCode};
use hickory_resolver::proto::rr::{rdata, Name, RData, Record};
use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::UdpSocket;

/// How the responder reacts to a query.
#[derive(Clone, Debug)]
pub enum Behavior {
    /// Answer with these A records, in order.
    Answer(Vec<Ipv4Addr>),
    /// Answer NOERROR with an empty answer section.
    Empty,
    /// Answer NXDOMAIN.
    NxDomain,
    /// A CNAME to `target.example.` followed by these A records.
    CnameThen(Vec<Ipv4Addr>),
    /// Never reply.
    Silent,
    /// Reply with bytes that are not a DNS message.
    Garbage,
    /// First a reply with the wrong id, then the real answer.
    WrongIdFirst(Vec<Ipv4Addr>),
}

pub struct Responder {
    pub addr: SocketAddr,
    queries: Arc<AtomicUsize>,
}

impl Responder {
    /// Bind on 127.0.0.1 with an ephemeral port and start answering.
    pub async fn start(behavior: Behavior) -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();
        let queries = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&queries);
        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];
            loop {
                let Ok((len, peer)) = socket.recv_from(&mut buf).await else {
                    return;
                };
                counter.fetch_add(1, Ordering::SeqCst);
                let Ok(query) = Message::from_vec(&buf[..len]) else {
                    continue;
                };

                for reply in replies(&query, &behavior) {
                    let _ = socket.send_to(&reply, peer).await;
                }
            }
        });

        Self { addr, queries }
    }

    /// Endpoint address string for this responder.
    pub fn address(&self) -> String {
        self.addr.to_string()
    }

    /// Number of datagrams received so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

/// An address nothing listens on: bind a socket, note its port, drop it.
pub async fn closed_port_address() -> String {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = socket.local_addr().unwrap();
    drop(socket);
    addr.to_string()
}

fn replies(query: &Message, behavior: &Behavior) -> Vec<Vec<u8>> {
    match behavior {
        Behavior::Silent => vec![],
        Behavior::Garbage => vec![vec![0xde, 0xad, 0xbe]],
        Behavior::Answer(addrs) => vec![answer(query, query.id(), ResponseCode::NoError, None, addrs)],
        Behavior::Empty => vec![answer(query, query.id(), ResponseCode::NoError, None, &[])],
        Behavior::NxDomain => vec![answer(query, query.id(), ResponseCode::NXDomain, None, &[])],
        Behavior::CnameThen(addrs) => {
            let target = Name::from_str("target.example.").unwrap();
            vec![answer(query, query.id(), ResponseCode::NoError, Some(target), addrs)]
        }
        Behavior::WrongIdFirst(addrs) => vec![
            answer(query, query.id().wrapping_add(1), ResponseCode::NoError, None, &[Ipv4Addr::new(6, 6, 6, 6)]),
            answer(query, query.id(), ResponseCode::NoError, None, addrs),
        ],
    }
}

fn answer(
    query: &Message,
    id: u16,
    code: ResponseCode,
    cname: Option<Name>,
    addrs: &[Ipv4Addr],
) -> Vec<u8> {
    let mut response = Message::new();
    response.set_id(id);
    response.set_message_type(MessageType::Response);
    response.set_op_code(OpCode::Query);
    response.set_response_code(code);
    response.set_recursion_desired(query.recursion_desired());
    response.set_recursion_available(true);

    let owner = query
        .queries()
        .first()
        .map(|q| q.name().clone())
        .unwrap_or_else(Name::root);
    for q in query.queries() {
        response.add_query(q.clone());
    }

    let a_owner = match cname {
        Some(target) => {
            response.add_answer(Record::from_rdata(
                owner,
                60,
                RData::CNAME(rdata::CNAME(target.clone())),
            ));
            target
        }
        None => owner,
    };
    for ip in addrs {
        response.add_answer(Record::from_rdata(a_owner.clone(), 60, RData::A(rdata::A(*ip))));
    }

    response.to_vec().unwrap()
}
