//! Request and response types of the node boundary.

use shared_types::{Event, Operator, ValidatedResponse};
use serde::{Deserialize, Serialize};

/// A DVS request as submitted to the network.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DvsRequest {
    /// Encoded envelope.
    pub data: Vec<u8>,
    pub height: i64,
    pub chain_id: i64,
    pub group_numbers: Vec<u32>,
    pub group_threshold_percentages: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RequestProcessDvsRequest {
    pub request: DvsRequest,
    pub operators: Vec<Operator>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResponseProcessDvsRequest {
    pub code: u32,
    pub log: String,
    pub events: Vec<Event>,
    pub codespace: String,
    /// Custom data produced for the output message.
    pub response: Vec<u8>,
    /// Digest validators sign over.
    pub response_digest: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RequestProcessDvsResponse {
    pub dvs_request: DvsRequest,
    pub dvs_response: ValidatedResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResponseProcessDvsResponse {
    pub code: u32,
    pub log: String,
    pub events: Vec<Event>,
    pub codespace: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseInfo {
    pub name: String,
    pub version: String,
}
