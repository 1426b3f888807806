//! # Error Reporting
//!
//! Maps dispatch failures to the `(codespace, code, log)` triple reported
//! back to the caller.

use dvs_02_msg_router::RouterError;
use shared_types::errors::{INTERNAL_CODE, SUCCESS_CODE, UNDEFINED_CODESPACE};
use std::fmt;
use thiserror::Error;

/// Codespace, code and log line for a dispatch outcome.
///
/// - success: `("", 0, "")`
/// - registered error anywhere in the chain: its codespace and code
/// - anything else: `("undefined", 1, ..)`
///
/// The log is the error's display string, or its full debug rendering when
/// `debug` is set.
pub fn avsi_info(err: Option<&RouterError>, debug: bool) -> (&'static str, u32, String) {
    let Some(err) = err else {
        return ("", SUCCESS_CODE, String::new());
    };

    let log = if debug {
        format!("{err:?}")
    } else {
        err.to_string()
    };

    match err.registered() {
        Some(coded) => (coded.codespace(), coded.code(), log),
        None => (UNDEFINED_CODESPACE, INTERNAL_CODE, log),
    }
}

/// Failed process call: the error plus the coded response to hand back.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct ProcessError<R: fmt::Debug> {
    pub response: R,
    #[source]
    pub source: RouterError,
}
