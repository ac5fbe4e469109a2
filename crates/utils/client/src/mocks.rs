//! Mocks of the bridge service.
//!
//! [`MockBridge`] serves both the deposit index and the proof endpoints from an in-process
//! server bound to an ephemeral local port.

use std::{io, net::SocketAddr, sync::Arc, time::Duration};

use claim_assembler::{Deposit, MerkleProof, B256, PROOF_DEPTH};
use parking_lot::Mutex;
use poem::{
    get, handler,
    listener::TcpAcceptor,
    web::{Data, Json, Path, Query},
    EndpointExt as _, Route, Server,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, task::JoinHandle, time};

use crate::{Client, Config, Url};

pub use poem::http::StatusCode;

/// Query of a proof request received by the mock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofQuery {
    /// Requested deposit counter.
    pub deposit_cnt: u32,

    /// Requested origin network.
    pub net_id: u32,
}

/// A configurable bridge service.
#[derive(Debug, Clone)]
pub struct MockBridge {
    bridge: String,
    deposits: Value,
    proof: Value,
    deposits_status: Option<StatusCode>,
    proof_status: Option<StatusCode>,
    delay: Duration,
    queries: Arc<Mutex<Vec<ProofQuery>>>,
}

impl MockBridge {
    /// Creates a bridge service with no deposits, serving a zero proof.
    pub fn new<B: Into<String>>(bridge: B) -> Self {
        Self {
            bridge: bridge.into(),
            deposits: json!({ "deposits": [] }),
            proof: json!({ "proof": zero_proof() }),
            deposits_status: None,
            proof_status: None,
            delay: Duration::ZERO,
            queries: Default::default(),
        }
    }

    /// Serves the provided deposits.
    pub fn with_deposits<I>(mut self, deposits: I) -> Self
    where
        I: IntoIterator<Item = Deposit>,
    {
        let deposits: Vec<_> = deposits.into_iter().collect();

        self.deposits = json!({ "deposits": deposits });
        self
    }

    /// Serves the provided raw body on the deposit index.
    pub fn with_deposits_body(mut self, body: Value) -> Self {
        self.deposits = body;
        self
    }

    /// Serves the provided proof.
    pub fn with_proof(mut self, proof: MerkleProof) -> Self {
        self.proof = json!({ "proof": proof });
        self
    }

    /// Serves the provided raw body on the proof endpoint.
    pub fn with_proof_body(mut self, body: Value) -> Self {
        self.proof = body;
        self
    }

    /// Fails every deposit index request with the provided status.
    pub fn with_deposits_status(mut self, status: StatusCode) -> Self {
        self.deposits_status.replace(status);
        self
    }

    /// Fails every proof request with the provided status.
    pub fn with_proof_status(mut self, status: StatusCode) -> Self {
        self.proof_status.replace(status);
        self
    }

    /// Delays every response.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Starts serving on an ephemeral local port.
    pub async fn spawn(self) -> anyhow::Result<RunningBridge> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let acceptor = TcpAcceptor::from_tokio(listener)?;

        let bridge = self.bridge.clone();
        let queries = self.queries.clone();

        let app = Route::new()
            .at("/bridges/:bridge", get(get_deposits))
            .at("/merkle-proof", get(get_merkle_proof))
            .data(Arc::new(self));

        let handle = tokio::spawn(Server::new_with_acceptor(acceptor).run(app));

        tracing::debug!("mock bridge service listening on `{addr}`...");

        Ok(RunningBridge {
            addr,
            bridge,
            queries,
            handle,
        })
    }
}

/// A running [`MockBridge`]. The server is stopped on drop.
pub struct RunningBridge {
    addr: SocketAddr,
    bridge: String,
    queries: Arc<Mutex<Vec<ProofQuery>>>,
    handle: JoinHandle<io::Result<()>>,
}

impl RunningBridge {
    /// Client configuration targeting this server.
    pub fn config(&self) -> anyhow::Result<Config> {
        let url = Url::parse(&format!("http://{}/", self.addr))?;

        Ok(Config::new(url, &self.bridge))
    }

    /// A client targeting this server, with the provided timeout.
    pub fn client(&self, timeout: Duration) -> anyhow::Result<Client> {
        Client::new(self.config()?.with_timeout(timeout))
    }

    /// Proof queries received so far, in arrival order.
    pub fn proof_queries(&self) -> Vec<ProofQuery> {
        self.queries.lock().clone()
    }
}

impl Drop for RunningBridge {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A ready, unclaimed deposit with the provided metadata.
pub fn deposit<M: Into<String>>(metadata: M) -> Deposit {
    Deposit {
        metadata: metadata.into(),
        ready_for_claim: true,
        claim_tx_hash: None,
        deposit_cnt: 7,
        orig_net: 0,
        orig_addr: "0x0000000000000000000000000000000000000000".into(),
        dest_net: 1,
        dest_addr: "0x22D0Cc772C6e87e6A952b675BB128CCF97B1A2d6".into(),
        amount: "1000000000000000".into(),
    }
}

/// A proof with zeroed siblings and roots.
pub fn zero_proof() -> MerkleProof {
    MerkleProof {
        merkle_proof: vec![B256::ZERO; PROOF_DEPTH],
        rollup_merkle_proof: vec![B256::ZERO; PROOF_DEPTH],
        main_exit_root: B256::ZERO,
        rollup_exit_root: B256::ZERO,
    }
}

#[handler]
async fn get_deposits(
    Path(bridge): Path<String>,
    mock: Data<&Arc<MockBridge>>,
) -> poem::Result<Json<Value>> {
    time::sleep(mock.delay).await;

    if let Some(status) = mock.deposits_status {
        return Err(poem::Error::from_status(status));
    }

    if bridge != mock.bridge {
        return Err(poem::Error::from_status(StatusCode::NOT_FOUND));
    }

    Ok(Json(mock.deposits.clone()))
}

#[handler]
async fn get_merkle_proof(
    Query(query): Query<ProofQuery>,
    mock: Data<&Arc<MockBridge>>,
) -> poem::Result<Json<Value>> {
    mock.queries.lock().push(query);

    time::sleep(mock.delay).await;

    if let Some(status) = mock.proof_status {
        return Err(poem::Error::from_status(status));
    }

    Ok(Json(mock.proof.clone()))
}
