use hickory_proto::op::{Message, MessageType, Query, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{Name, RData, Record, RecordType};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

#[derive(Debug, Clone, Copy)]
pub enum MockMode {
    /// One A record per query
    Answer { ip: Ipv4Addr, ttl: u32 },
    /// NOERROR with an empty answer section
    Empty,
    /// Never replies
    Silent,
    /// A reply with the wrong ID first, then the real answer
    WrongIdFirst { ip: Ipv4Addr, ttl: u32 },
    /// Correct ID, but answers a different name than the one asked
    OtherQuestion { ip: Ipv4Addr, ttl: u32 },
}

pub struct MockDnsServer {
    addr: SocketAddr,
    queries: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(mode: MockMode) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = socket.local_addr()?;
        let queries = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&queries);

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        let Ok((len, peer)) = result else { continue };
                        counter.fetch_add(1, Ordering::SeqCst);
                        for response in Self::build_mock_responses(&buf[..len], mode) {
                            let _ = socket.send_to(&response, peer).await;
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            queries,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn build_mock_responses(query: &[u8], mode: MockMode) -> Vec<Vec<u8>> {
        let Ok(request) = Message::from_vec(query) else {
            return vec![];
        };

        match mode {
            MockMode::Silent => vec![],
            MockMode::Empty => vec![Self::response(&request, None)],
            MockMode::Answer { ip, ttl } => vec![Self::response(&request, Some((ip, ttl)))],
            MockMode::WrongIdFirst { ip, ttl } => {
                let good = Self::response(&request, Some((ip, ttl)));
                let mut bad = good.clone();
                bad[0] ^= 0xFF;
                vec![bad, good]
            }
            MockMode::OtherQuestion { ip, ttl } => {
                let mut other = request.clone();
                let name = Name::from_ascii("spoofed.example.").unwrap();
                let queries = vec![Query::query(name, RecordType::A)];
                other.take_queries();
                other.add_queries(queries);
                vec![Self::response(&other, Some((ip, ttl)))]
            }
        }
    }

    fn response(request: &Message, answer: Option<(Ipv4Addr, u32)>) -> Vec<u8> {
        let mut response = Message::new();
        response
            .set_id(request.id())
            .set_message_type(MessageType::Response)
            .set_op_code(request.op_code())
            .set_recursion_desired(request.recursion_desired())
            .set_recursion_available(true)
            .set_response_code(ResponseCode::NoError);
        response.add_queries(request.queries().to_vec());

        if let (Some((ip, ttl)), Some(question)) = (answer, request.queries().first()) {
            response.add_answer(Record::from_rdata(
                question.name().clone(),
                ttl,
                RData::A(A(ip)),
            ));
        }

        response.to_vec().unwrap()
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
