use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::{sol, SolType};

use crate::{ClaimError, Deposit, MerkleProof};

/// Depth of the exit trees; every proof carries exactly this many siblings.
pub const PROOF_DEPTH: usize = 32;

sol! {
    /// Arguments of the bridge claim call.
    ///
    /// Encoded as ABI parameters, so the output matches `abi.encode` of the eleven values,
    /// without a leading tuple offset.
    #[derive(Debug, PartialEq, Eq)]
    struct ClaimPayload {
        /// Siblings of the deposit in the local exit tree.
        bytes32[32] smtProofLocalExitRoot;
        /// Siblings of the local exit root in the rollup exit tree.
        bytes32[32] smtProofRollupExitRoot;
        /// Claim index of the deposit.
        uint256 globalIndex;
        /// Mainnet exit root of the proof.
        bytes32 mainnetExitRoot;
        /// Rollup exit root of the proof.
        bytes32 rollupExitRoot;
        /// Origin network id.
        uint32 originNetwork;
        /// Token address on the origin network.
        address originAddress;
        /// Destination network id.
        uint32 destinationNetwork;
        /// Receiver on the destination network.
        address destinationAddress;
        /// Deposited amount.
        uint256 amount;
        /// Raw deposit metadata.
        bytes metadata;
    }
}

impl ClaimPayload {
    /// Builds the payload of a located deposit and its proof.
    ///
    /// The global index is the deposit counter. Fails with [`ClaimError::MalformedProof`] if a
    /// proof path doesn't have [`PROOF_DEPTH`] siblings, and with
    /// [`ClaimError::MalformedDeposit`] if an address, the amount or the metadata can't be
    /// parsed.
    pub fn try_from_parts(deposit: &Deposit, proof: &MerkleProof) -> Result<Self, ClaimError> {
        let local = to_fixed_path("merkle_proof", &proof.merkle_proof)?;
        let rollup = to_fixed_path("rollup_merkle_proof", &proof.rollup_merkle_proof)?;

        let origin = parse_address("orig_addr", &deposit.orig_addr)?;
        let destination = parse_address("dest_addr", &deposit.dest_addr)?;

        let amount = deposit.amount.parse::<U256>().map_err(|e| {
            ClaimError::MalformedDeposit(format!("invalid amount `{}`: {e}", deposit.amount))
        })?;

        let metadata = const_hex::decode(&deposit.metadata).map_err(|e| {
            ClaimError::MalformedDeposit(format!("invalid metadata `{}`: {e}", deposit.metadata))
        })?;

        Ok(Self {
            smtProofLocalExitRoot: local,
            smtProofRollupExitRoot: rollup,
            globalIndex: U256::from(deposit.deposit_cnt),
            mainnetExitRoot: proof.main_exit_root,
            rollupExitRoot: proof.rollup_exit_root,
            originNetwork: deposit.orig_net,
            originAddress: origin,
            destinationNetwork: deposit.dest_net,
            destinationAddress: destination,
            amount,
            metadata: Bytes::from(metadata),
        })
    }

    /// ABI encodes the payload.
    pub fn encode(&self) -> Vec<u8> {
        <Self as SolType>::abi_encode_params(self)
    }

    /// Decodes an ABI encoded payload.
    pub fn decode<B: AsRef<[u8]>>(bytes: B) -> anyhow::Result<Self> {
        <Self as SolType>::abi_decode_params(bytes.as_ref())
            .map_err(|e| anyhow::anyhow!("failed to decode claim payload: {e}"))
    }

    /// Returns the `0x` prefixed hex representation of the encoded payload.
    pub fn to_hex(&self) -> String {
        const_hex::encode_prefixed(self.encode())
    }
}

fn to_fixed_path(name: &str, path: &[B256]) -> Result<[B256; PROOF_DEPTH], ClaimError> {
    <[B256; PROOF_DEPTH]>::try_from(path).map_err(|_| {
        ClaimError::MalformedProof(format!(
            "`{name}` has {} siblings, expected {PROOF_DEPTH}",
            path.len()
        ))
    })
}

fn parse_address(name: &str, address: &str) -> Result<Address, ClaimError> {
    address.parse().map_err(|e| {
        ClaimError::MalformedDeposit(format!("invalid {name} `{address}`: {e}"))
    })
}
