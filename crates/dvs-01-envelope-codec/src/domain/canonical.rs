//! Canonical-form check for the envelope wrapper.
//!
//! Runs over the raw bytes before anything is unmarshalled. The wrapper has
//! three byte-string fields, so the check is narrow:
//!
//! - every field is length-delimited,
//! - field numbers strictly ascend, except that field 3 may repeat
//!   (1, 2, then any number of 3s),
//! - every length prefix is the shortest varint for its value,
//! - fields 1 and 2 are never present with an empty payload, since an
//!   encoder omits empty singular fields.
//!
//! Together these leave one byte sequence per logical wrapper, so a relayer
//! cannot re-encode an envelope into a different but equivalent form.

use crate::domain::errors::EncodingViolation;
use crate::domain::wire::{fields, varint_min_length, WireType};

/// The only wrapper field that may appear more than once (signatures).
const REPEATABLE_FIELD: u32 = 3;

/// Reject wrapper bytes that are not in canonical form.
pub fn reject_non_canonical(bytes: &[u8]) -> Result<(), EncodingViolation> {
    let mut previous = 0u32;

    for field in fields(bytes) {
        let field = field?;
        let number = field.header.number;

        if field.header.wire_type != WireType::LengthDelimited {
            return Err(EncodingViolation::WireType {
                field: number,
                found: field.header.wire_type,
            });
        }

        if number < previous {
            return Err(EncodingViolation::FieldOrder {
                field: number,
                previous,
            });
        }
        if number == previous && number != REPEATABLE_FIELD {
            return Err(EncodingViolation::RepeatedField { field: number });
        }
        previous = number;

        let minimal = varint_min_length(field.value.len() as u64);
        if field.length_prefix_len != minimal {
            return Err(EncodingViolation::NonMinimalLength {
                field: number,
                used: field.length_prefix_len,
                minimal,
            });
        }

        if field.value.is_empty() && number != REPEATABLE_FIELD {
            return Err(EncodingViolation::EmptyField { field: number });
        }
    }

    Ok(())
}
