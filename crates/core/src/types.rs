use alloy_primitives::B256;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A bridge deposit, as published by the deposit index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    /// Hex encoded metadata of the deposit. Used as the claim marker.
    pub metadata: String,

    /// Set when the exit root that includes the deposit is available on the destination.
    pub ready_for_claim: bool,

    /// Hash of the claim transaction, if any.
    #[serde(default)]
    pub claim_tx_hash: Option<String>,

    /// Deposit counter of the origin network; the leaf index in the local exit tree.
    #[serde(deserialize_with = "u32_from_number_or_str")]
    pub deposit_cnt: u32,

    /// Origin network id.
    #[serde(deserialize_with = "u32_from_number_or_str")]
    pub orig_net: u32,

    /// Token address on the origin network.
    pub orig_addr: String,

    /// Destination network id.
    #[serde(deserialize_with = "u32_from_number_or_str")]
    pub dest_net: u32,

    /// Receiver on the destination network.
    pub dest_addr: String,

    /// Decimal amount of the deposit.
    pub amount: String,
}

impl Deposit {
    /// Returns `true` if a claim transaction was recorded for this deposit.
    ///
    /// The index reports unclaimed deposits either with `null` or an empty hash.
    pub fn is_claimed(&self) -> bool {
        self.claim_tx_hash
            .as_deref()
            .is_some_and(|hash| !hash.is_empty())
    }
}

/// Response of the deposit index for a bridge contract.
///
/// Entries are kept undecoded; only the one matching a claim marker is parsed into a
/// [`Deposit`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositsResponse {
    /// Deposits of the bridge contract, in index order.
    pub deposits: Vec<Value>,
}

/// Merkle inclusion proof of a deposit.
///
/// The siblings are kept as returned by the service; their depth is validated when the claim
/// payload is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    /// Siblings of the deposit leaf in the local exit tree.
    pub merkle_proof: Vec<B256>,

    /// Siblings of the local exit root in the rollup exit tree.
    pub rollup_merkle_proof: Vec<B256>,

    /// Mainnet exit root the proof was computed against.
    pub main_exit_root: B256,

    /// Rollup exit root the proof was computed against.
    pub rollup_exit_root: B256,
}

/// Response of the proof service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofResponse {
    /// The requested proof.
    pub proof: MerkleProof,
}

// The index gateway renders some integers as decimal strings.
fn u32_from_number_or_str<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrStr {
        Number(u32),
        Str(String),
    }

    match NumberOrStr::deserialize(deserializer)? {
        NumberOrStr::Number(n) => Ok(n),
        NumberOrStr::Str(s) => s
            .parse()
            .map_err(|e| de::Error::custom(format!("invalid integer `{s}`: {e}"))),
    }
}
