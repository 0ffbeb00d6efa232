use alloy::primitives::{B256, U256};
use tracing::warn;

use super::Proposal;
use crate::error::{VotaError, VotaResult};

/// Encodes `s` as a zero-padded `bytes32`.
///
/// Input longer than 32 bytes is truncated rather than rejected; a warning
/// is logged so the lost suffix does not go unnoticed.
pub fn str_to_bytes32(s: &str) -> VotaResult<B256> {
    if !s.is_ascii() {
        return Err(VotaError::encoding(format!("'{}' is not ASCII", s)));
    }

    let bytes = s.as_bytes();
    if bytes.len() > 32 {
        warn!("Proposal name '{}' is {} bytes, truncating to 32", s, bytes.len());
    }

    let len = bytes.len().min(32);
    let mut buf = [0u8; 32];
    buf[..len].copy_from_slice(&bytes[..len]);
    Ok(B256::from(buf))
}

pub fn proposal_from_raw(name: &B256, votes: U256) -> VotaResult<Proposal> {
    let bytes = name.as_slice();
    let end = bytes.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
    let trimmed = &bytes[..end];

    if !trimmed.is_ascii() {
        return Err(VotaError::decode(format!("proposal name {} is not ASCII", name)));
    }

    let votes = u64::try_from(votes)
        .map_err(|_| VotaError::decode(format!("vote count {} does not fit in u64", votes)))?;

    Ok(Proposal {
        name: String::from_utf8_lossy(trimmed).into_owned(),
        votes,
    })
}
