use serde_json::Value;

use crate::{ClaimError, Deposit};

/// Selects the claimable deposit identified by `marker`.
///
/// The first deposit whose metadata is byte-equal to the marker is taken; no normalization is
/// applied. The match must be ready for claim and must not carry a claim transaction.
pub fn select_deposit<I>(deposits: I, marker: &str) -> Result<Deposit, ClaimError>
where
    I: IntoIterator<Item = Deposit>,
{
    let deposit = deposits
        .into_iter()
        .find(|d| d.metadata == marker)
        .ok_or(ClaimError::NotFound)?;

    claimable(deposit)
}

/// Selects the claimable deposit identified by `marker` out of raw index entries.
///
/// Entries are matched on their `metadata` string and only the match is decoded, so an
/// unrelated entry of unexpected shape doesn't affect the lookup.
pub fn select_entry<I>(entries: I, marker: &str) -> Result<Deposit, ClaimError>
where
    I: IntoIterator<Item = Value>,
{
    let entry = entries
        .into_iter()
        .find(|e| e.get("metadata").and_then(Value::as_str) == Some(marker))
        .ok_or(ClaimError::NotFound)?;

    let deposit = serde_json::from_value(entry)
        .map_err(|e| ClaimError::MalformedDeposit(format!("invalid deposit entry: {e}")))?;

    claimable(deposit)
}

fn claimable(deposit: Deposit) -> Result<Deposit, ClaimError> {
    tracing::debug!(
        "matched deposit #{} from network {}...",
        deposit.deposit_cnt,
        deposit.orig_net
    );

    if !deposit.ready_for_claim {
        return Err(ClaimError::NotReady);
    }

    if deposit.is_claimed() {
        return Err(ClaimError::AlreadyClaimed);
    }

    Ok(deposit)
}
