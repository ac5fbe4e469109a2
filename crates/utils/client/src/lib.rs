use std::time::Duration;

use claim_assembler::{
    select_entry, ClaimError, ClaimPayload, Deposit, DepositsResponse, MerkleProof, ProofResponse,
};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use reqwest::Url;

#[cfg(feature = "mocks")]
pub mod mocks;

/// Upstream configuration of a claim client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the bridge service, serving both the deposit index and the proofs.
    pub base_url: Url,

    /// Bridge contract identifier whose deposits are queried.
    pub bridge: String,

    /// Timeout applied to every upstream call.
    pub timeout: Duration,
}

impl Config {
    /// The default upstream call timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration with the default timeout.
    pub fn new<B: Into<String>>(base_url: Url, bridge: B) -> Self {
        Self {
            base_url,
            bridge: bridge.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the upstream call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// A bridge service client.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct Client {
    config: Config,
    http: reqwest::Client,
}

impl Client {
    /// Creates a new client from the provided configuration.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        anyhow::ensure!(
            !config.bridge.is_empty(),
            "the bridge contract identifier must not be empty"
        );

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build the http client: {e}"))?;

        Ok(Self { config, http })
    }

    /// Computes the URI of a bridge service path.
    pub fn uri<P: AsRef<str>>(&self, path: P) -> String {
        format!(
            "{}/{}",
            self.config.base_url.as_str().trim_end_matches('/'),
            path.as_ref()
        )
    }

    /// Fetches the raw deposit entries of the configured bridge contract.
    pub async fn deposits(&self) -> Result<Vec<Value>, ClaimError> {
        let uri = self.uri(format!("bridges/{}", self.config.bridge));

        tracing::debug!("fetching deposits from `{uri}`...");

        let DepositsResponse { deposits } = fetch(self.http.get(&uri))
            .await
            .map_err(|e| ClaimError::Upstream(e.into()))?;

        tracing::debug!("fetched {} deposits from `{uri}`", deposits.len());
        tracing::trace!("deposits: {deposits:?}");

        Ok(deposits)
    }

    /// Locates the claimable deposit carrying the provided metadata marker.
    pub async fn locate(&self, marker: &str) -> Result<Deposit, ClaimError> {
        let deposits = self.deposits().await?;
        let deposit = select_entry(deposits, marker);

        match &deposit {
            Ok(d) => tracing::debug!("located deposit for marker `{marker}`: {d:?}"),
            Err(e) => tracing::debug!("no claimable deposit for marker `{marker}`: {e}"),
        }

        deposit
    }

    /// Fetches the Merkle proof of a deposit.
    ///
    /// A response body that doesn't decode into a proof is reported as
    /// [`ClaimError::MalformedProof`].
    pub async fn merkle_proof(
        &self,
        deposit_cnt: u32,
        net_id: u32,
    ) -> Result<MerkleProof, ClaimError> {
        let request = self
            .http
            .get(self.uri("merkle-proof"))
            .query(&[("deposit_cnt", deposit_cnt), ("net_id", net_id)]);

        tracing::debug!("fetching proof for deposit #{deposit_cnt} of network {net_id}...");

        let ProofResponse { proof } = fetch(request).await.map_err(|e| {
            if e.is_decode() {
                ClaimError::MalformedProof(format!("{:#}", anyhow::Error::from(e)))
            } else {
                ClaimError::Upstream(e.into())
            }
        })?;

        Ok(proof)
    }

    /// Fetches the proof of a located deposit and returns the encoded claim payload.
    pub async fn assemble(&self, deposit: &Deposit) -> Result<Vec<u8>, ClaimError> {
        let proof = self
            .merkle_proof(deposit.deposit_cnt, deposit.orig_net)
            .await?;

        let payload = ClaimPayload::try_from_parts(deposit, &proof)?.encode();

        tracing::debug!("encoded claim: {}", const_hex::encode_prefixed(&payload));

        Ok(payload)
    }

    /// Locates the deposit of `marker` and assembles its claim payload.
    pub async fn claim(&self, marker: &str) -> Result<Vec<u8>, ClaimError> {
        let deposit = self.locate(marker).await?;

        self.assemble(&deposit).await
    }
}

async fn fetch<T: DeserializeOwned>(request: RequestBuilder) -> reqwest::Result<T> {
    request.send().await?.error_for_status()?.json().await
}
