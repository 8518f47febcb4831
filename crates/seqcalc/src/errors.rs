//! Error handling and exit codes.

use seqcalc_core::constants::exit_codes;
use seqcalc_core::solver::SeqError;

/// Map an engine error to the process exit code.
#[must_use]
pub fn exit_code(err: &SeqError) -> i32 {
    match err {
        SeqError::Computation(_) | SeqError::IndexOutOfDomain { .. } => exit_codes::ERROR_GENERIC,
        SeqError::Timeout(_) => exit_codes::ERROR_TIMEOUT,
        SeqError::LimitExceeded(_) => exit_codes::ERROR_LIMIT,
        SeqError::InvalidDefinition(_) => exit_codes::ERROR_CONFIG,
        SeqError::Cancelled => exit_codes::ERROR_CANCELED,
    }
}
