//! Unknown-field detection.
//!
//! `prost` silently skips fields it does not know. The codec walks each
//! sub-structure against a static schema first so that unknown fields are
//! either rejected or, inside the message body, recorded.
//!
//! Field numbers with bit 11 set (`n & 1024 != 0`) are non-critical: a
//! reader that does not understand them may ignore them. Every other
//! unknown field is critical and always rejected.

use crate::domain::errors::CodecError;
use crate::domain::wire::{fields, WireType};

/// Bit marking a field number as non-critical.
pub const NON_CRITICAL_FIELD_BIT: u32 = 1 << 10;

/// Shape of a known field.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Scalar, string or bytes. Contents are not inspected.
    Scalar,
    /// Nested message, checked recursively.
    Message(&'static Schema),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub number: u32,
    pub kind: FieldKind,
}

/// Known fields of one message type.
#[derive(Debug)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

impl Schema {
    fn lookup(&self, number: u32) -> Option<FieldKind> {
        self.fields
            .iter()
            .find(|spec| spec.number == number)
            .map(|spec| spec.kind)
    }
}

const fn scalar(number: u32) -> FieldSpec {
    FieldSpec {
        number,
        kind: FieldKind::Scalar,
    }
}

const fn message(number: u32, schema: &'static Schema) -> FieldSpec {
    FieldSpec {
        number,
        kind: FieldKind::Message(schema),
    }
}

/// How unknown fields are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownFieldPolicy {
    /// Any unknown field is an error.
    Strict,
    /// Unknown non-critical fields are accepted and reported.
    AllowNonCritical,
}

pub static ANY_SCHEMA: Schema = Schema {
    name: "AnyMessage",
    fields: &[scalar(1), scalar(2)],
};

pub static ENVELOPE_SCHEMA: Schema = Schema {
    name: "Envelope",
    fields: &[scalar(1), scalar(2), scalar(3)],
};

pub static BODY_SCHEMA: Schema = Schema {
    name: "Body",
    fields: &[
        message(1, &ANY_SCHEMA),
        scalar(2),
        scalar(3),
        message(1023, &ANY_SCHEMA),
        message(2047, &ANY_SCHEMA),
    ],
};

pub static COIN_SCHEMA: Schema = Schema {
    name: "Coin",
    fields: &[scalar(1), scalar(2)],
};

pub static FEE_SCHEMA: Schema = Schema {
    name: "Fee",
    fields: &[message(1, &COIN_SCHEMA), scalar(2), scalar(3), scalar(4)],
};

pub static SIGNER_INFO_SCHEMA: Schema = Schema {
    name: "SignerInfo",
    fields: &[message(1, &ANY_SCHEMA), scalar(2), scalar(3)],
};

pub static AUTH_INFO_SCHEMA: Schema = Schema {
    name: "AuthInfo",
    fields: &[message(1, &SIGNER_INFO_SCHEMA), message(2, &FEE_SCHEMA)],
};

/// Check `bytes` against `schema`.
///
/// Returns whether any unknown non-critical field was accepted.
pub fn check_unknown_fields(
    bytes: &[u8],
    schema: &'static Schema,
    policy: UnknownFieldPolicy,
) -> Result<bool, CodecError> {
    let mut saw_non_critical = false;

    for field in fields(bytes) {
        let field = field?;
        let number = field.header.number;

        match schema.lookup(number) {
            Some(FieldKind::Scalar) => {}
            Some(FieldKind::Message(inner)) => {
                if field.header.wire_type != WireType::LengthDelimited {
                    return Err(CodecError::WireTypeMismatch {
                        message: schema.name,
                        field: number,
                        found: field.header.wire_type,
                    });
                }
                saw_non_critical |= check_unknown_fields(field.value, inner, policy)?;
            }
            None => {
                let non_critical = number & NON_CRITICAL_FIELD_BIT != 0;
                if policy == UnknownFieldPolicy::AllowNonCritical && non_critical {
                    saw_non_critical = true;
                    continue;
                }
                return Err(CodecError::UnknownField {
                    message: schema.name,
                    field: number,
                });
            }
        }
    }

    Ok(saw_non_critical)
}
