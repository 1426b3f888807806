//! # Core Domain Entities
//!
//! Data the node hands to the dispatch core alongside each call:
//! the operator set of the current round and, in the response phase,
//! the validated outcome of the previous round.
//!
//! Aggregated keys and signatures are carried as opaque bytes. Verifying
//! them is the node's job, not the dispatch core's.

use serde::{Deserialize, Serialize};

/// An operator taking part in the current validation round.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Operator {
    /// Operator identifier (32 bytes on the wire).
    pub id: Vec<u8>,
    /// Operator account address.
    pub address: String,
    /// Network endpoint the operator serves on.
    pub socket: String,
    /// Stake weight in the groups the operator belongs to.
    pub stake: u64,
}

/// Stake indices of a non-signing operator, per group.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NonSignerStakeIndices {
    pub indices: Vec<u32>,
}

/// Outcome of a prior round, once validators have agreed on it.
///
/// Attaching one to a `RequestContext` switches routing into the
/// response phase.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidatedResponse {
    /// Aggregated response payload.
    pub data: Vec<u8>,
    /// Error reported by the round, empty on success.
    pub error: String,
    /// Digest the validators signed.
    pub hash: Vec<u8>,
    pub non_signers_pubkeys_g1: Vec<Vec<u8>>,
    pub group_apks_g1: Vec<Vec<u8>>,
    pub signers_apk_g2: Vec<u8>,
    pub signers_agg_sig_g1: Vec<u8>,
    pub non_signer_group_bitmap_indices: Vec<u32>,
    pub group_apk_indices: Vec<u32>,
    pub total_stake_indices: Vec<u32>,
    pub non_signer_stake_indices: Vec<NonSignerStakeIndices>,
}

impl ValidatedResponse {
    /// Minimal response carrying a payload and its digest.
    pub fn new(data: Vec<u8>, hash: Vec<u8>) -> Self {
        Self {
            data,
            hash,
            ..Self::default()
        }
    }

    /// Whether the round reported an error.
    pub fn is_error(&self) -> bool {
        !self.error.is_empty()
    }
}
