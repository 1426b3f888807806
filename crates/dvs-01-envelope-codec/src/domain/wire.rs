//! Protobuf wire primitives.
//!
//! Just enough of the wire format to walk fields without a schema: varints,
//! tags and field skipping. Group encodings are not supported.

use thiserror::Error;

/// Largest field number the wire format allows.
pub const MAX_FIELD_NUMBER: u64 = (1 << 29) - 1;

/// Longest possible varint encoding of a `u64`.
pub const MAX_VARINT_LEN: usize = 10;

/// Low-level framing failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    #[error("unexpected end of input")]
    Truncated,

    #[error("varint overflows 64 bits")]
    VarintOverflow,

    #[error("invalid field number {0}")]
    InvalidFieldNumber(u64),

    #[error("invalid wire type {0}")]
    InvalidWireType(u8),

    #[error("group encoding is not supported (field {0})")]
    UnsupportedGroup(u32),
}

/// Protobuf wire types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    Varint,
    Fixed64,
    LengthDelimited,
    StartGroup,
    EndGroup,
    Fixed32,
}

impl WireType {
    pub fn from_bits(bits: u8) -> Result<Self, WireError> {
        match bits {
            0 => Ok(Self::Varint),
            1 => Ok(Self::Fixed64),
            2 => Ok(Self::LengthDelimited),
            3 => Ok(Self::StartGroup),
            4 => Ok(Self::EndGroup),
            5 => Ok(Self::Fixed32),
            other => Err(WireError::InvalidWireType(other)),
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            Self::Varint => 0,
            Self::Fixed64 => 1,
            Self::LengthDelimited => 2,
            Self::StartGroup => 3,
            Self::EndGroup => 4,
            Self::Fixed32 => 5,
        }
    }
}

/// Decode a varint from the front of `buf`.
///
/// Returns the value and the number of bytes it occupied.
pub fn decode_varint(buf: &[u8]) -> Result<(u64, usize), WireError> {
    let mut value: u64 = 0;
    for (i, &byte) in buf.iter().take(MAX_VARINT_LEN).enumerate() {
        // The tenth byte may only contribute the top bit.
        if i == MAX_VARINT_LEN - 1 && byte > 1 {
            return Err(WireError::VarintOverflow);
        }
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    if buf.len() >= MAX_VARINT_LEN {
        Err(WireError::VarintOverflow)
    } else {
        Err(WireError::Truncated)
    }
}

/// Append the minimal varint encoding of `value`.
pub fn encode_varint(mut value: u64, out: &mut Vec<u8>) {
    while value >= 0x80 {
        out.push((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

/// Minimum number of bytes needed to varint-encode `n`.
pub fn varint_min_length(n: u64) -> usize {
    let bits = 64 - n.leading_zeros() as usize;
    bits.div_ceil(7).max(1)
}

/// Field number and wire type of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldHeader {
    pub number: u32,
    pub wire_type: WireType,
}

/// Decode a field tag from the front of `buf`.
pub fn decode_tag(buf: &[u8]) -> Result<(FieldHeader, usize), WireError> {
    let (key, used) = decode_varint(buf)?;
    let number = key >> 3;
    if number == 0 || number > MAX_FIELD_NUMBER {
        return Err(WireError::InvalidFieldNumber(number));
    }
    let wire_type = WireType::from_bits((key & 0x7) as u8)?;
    Ok((
        FieldHeader {
            number: number as u32,
            wire_type,
        },
        used,
    ))
}

/// Append a field tag.
pub fn encode_tag(number: u32, wire_type: WireType, out: &mut Vec<u8>) {
    encode_varint((u64::from(number) << 3) | u64::from(wire_type.bits()), out);
}

/// One field as it sits in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawField<'a> {
    pub header: FieldHeader,
    /// Bytes used by the length prefix (length-delimited fields only).
    pub length_prefix_len: usize,
    /// Field value: the payload for length-delimited fields, the raw
    /// encoded value otherwise.
    pub value: &'a [u8],
    /// Total bytes the field occupies, tag included.
    pub encoded_len: usize,
}

/// Read the next field from the front of `buf`.
pub fn next_field(buf: &[u8]) -> Result<RawField<'_>, WireError> {
    let (header, tag_len) = decode_tag(buf)?;
    let rest = &buf[tag_len..];

    let (prefix_len, start, len) = match header.wire_type {
        WireType::Varint => {
            let (_, used) = decode_varint(rest)?;
            (0, 0, used)
        }
        WireType::Fixed64 => (0, 0, 8),
        WireType::Fixed32 => (0, 0, 4),
        WireType::LengthDelimited => {
            let (len, used) = decode_varint(rest)?;
            let len = usize::try_from(len).map_err(|_| WireError::Truncated)?;
            (used, used, len)
        }
        WireType::StartGroup | WireType::EndGroup => {
            return Err(WireError::UnsupportedGroup(header.number));
        }
    };

    let end = start.checked_add(len).ok_or(WireError::Truncated)?;
    if end > rest.len() {
        return Err(WireError::Truncated);
    }

    Ok(RawField {
        header,
        length_prefix_len: prefix_len,
        value: &rest[start..end],
        encoded_len: tag_len + end,
    })
}

/// Iterate over every top-level field of `buf`.
pub fn fields(buf: &[u8]) -> FieldIter<'_> {
    FieldIter { rest: buf }
}

/// Iterator returned by [`fields`]. Stops after the first error.
pub struct FieldIter<'a> {
    rest: &'a [u8],
}

impl<'a> Iterator for FieldIter<'a> {
    type Item = Result<RawField<'a>, WireError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        match next_field(self.rest) {
            Ok(field) => {
                self.rest = &self.rest[field.encoded_len..];
                Some(Ok(field))
            }
            Err(e) => {
                self.rest = &[];
                Some(Err(e))
            }
        }
    }
}
