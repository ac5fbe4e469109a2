/// Failures of a claim request.
///
/// The first three variants describe the state of the located deposit and are meaningful to
/// the caller; the remaining ones are opaque failures of the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ClaimError {
    /// No deposit carries the requested metadata marker.
    #[error("deposit not found")]
    NotFound,

    /// The deposit exists, but its exit root is not yet available on the destination network.
    #[error("deposit not ready for claim")]
    NotReady,

    /// The deposit exists and already has a claim transaction.
    #[error("deposit already claimed")]
    AlreadyClaimed,

    /// Transport failure, timeout or non-success status from an upstream service.
    #[error("upstream request failed: {0:#}")]
    Upstream(anyhow::Error),

    /// The Merkle proof returned by the proof service has an invalid shape.
    #[error("malformed merkle proof: {0}")]
    MalformedProof(String),

    /// The located deposit has fields that cannot be encoded.
    #[error("malformed deposit: {0}")]
    MalformedDeposit(String),
}

impl ClaimError {
    /// Returns `true` if the error describes the state of an existing or missing deposit, rather
    /// than a failure to serve the request.
    pub fn is_deposit_state(&self) -> bool {
        matches!(self, Self::NotFound | Self::NotReady | Self::AlreadyClaimed)
    }
}
