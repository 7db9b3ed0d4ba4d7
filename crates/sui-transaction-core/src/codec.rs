// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Layout-directed canonical codec for dynamically typed values.
//!
//! Integers are little-endian, sequences carry a ULEB128 length, struct fields follow
//! declaration order with no names on the wire, and enum values lead with a ULEB128 variant
//! index. The output is byte-identical to what `bcs` produces for the equivalent Rust type.
//!
//! Decoding is strict: it rejects trailing bytes, non-minimal ULEB128 and booleans other than
//! `0`/`1`, so every accepted byte string is the unique encoding of its value.

use std::fmt;

use ethnum::U256;
use serde::de::DeserializeOwned;
use serde::ser::{SerializeSeq, SerializeTuple, SerializeTupleVariant};
use serde::{Deserialize, Serialize, Serializer};

use crate::base_types::{SuiAddress, SUI_ADDRESS_LENGTH};
use crate::error::{SuiError, SuiResult};
use crate::type_tag::{Identifier, StructTag, TypeTag};

#[cfg(test)]
#[path = "unit_tests/codec_tests.rs"]
mod codec_tests;

/// Largest sequence length BCS will encode.
pub const MAX_SEQUENCE_LENGTH: u64 = (1 << 31) - 1;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveTypeLayout {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    Address,
    Vector(Box<MoveTypeLayout>),
    Struct(Box<MoveStructLayout>),
    Enum(Box<MoveEnumLayout>),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveFieldLayout {
    pub name: Identifier,
    pub layout: MoveTypeLayout,
}

impl MoveFieldLayout {
    pub fn new(name: Identifier, layout: MoveTypeLayout) -> Self {
        Self { name, layout }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveStructLayout {
    pub type_: Option<StructTag>,
    pub fields: Vec<MoveFieldLayout>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveVariantLayout {
    pub name: Identifier,
    pub fields: Vec<MoveFieldLayout>,
}

/// Variants are indexed by their position.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveEnumLayout {
    pub type_: Option<StructTag>,
    pub variants: Vec<MoveVariantLayout>,
}

impl MoveTypeLayout {
    pub fn vector(inner: MoveTypeLayout) -> Self {
        MoveTypeLayout::Vector(Box::new(inner))
    }

    pub fn struct_(type_: Option<StructTag>, fields: Vec<MoveFieldLayout>) -> Self {
        MoveTypeLayout::Struct(Box::new(MoveStructLayout { type_, fields }))
    }

    pub fn enum_(type_: Option<StructTag>, variants: Vec<MoveVariantLayout>) -> Self {
        MoveTypeLayout::Enum(Box::new(MoveEnumLayout { type_, variants }))
    }

    /// True when every value of this layout encodes to zero bytes, e.g. a struct with no fields.
    pub fn is_zero_sized(&self) -> bool {
        match self {
            MoveTypeLayout::Struct(s) => s.fields.iter().all(|f| f.layout.is_zero_sized()),
            _ => false,
        }
    }

    /// Layout of `0x1::string::String` and `0x1::ascii::String`: a single `bytes: vector<u8>`.
    fn string(type_: StructTag) -> Self {
        Self::struct_(
            Some(type_),
            vec![MoveFieldLayout::new(
                crate::ident!("bytes"),
                MoveTypeLayout::vector(MoveTypeLayout::U8),
            )],
        )
    }
}

impl TryFrom<&TypeTag> for MoveTypeLayout {
    type Error = SuiError;

    /// Resolves layouts that need no on-chain lookup: primitives, vectors, and the framework
    /// structs that pure arguments may use.
    fn try_from(tag: &TypeTag) -> Result<Self, Self::Error> {
        Ok(match tag {
            TypeTag::Bool => MoveTypeLayout::Bool,
            TypeTag::U8 => MoveTypeLayout::U8,
            TypeTag::U16 => MoveTypeLayout::U16,
            TypeTag::U32 => MoveTypeLayout::U32,
            TypeTag::U64 => MoveTypeLayout::U64,
            TypeTag::U128 => MoveTypeLayout::U128,
            TypeTag::U256 => MoveTypeLayout::U256,
            TypeTag::Address => MoveTypeLayout::Address,
            TypeTag::Vector(inner) => MoveTypeLayout::vector((&**inner).try_into()?),
            TypeTag::Struct(s) if s.is_std_string() || s.is_ascii_string() => {
                MoveTypeLayout::string((**s).clone())
            }
            TypeTag::Struct(s) if s.is_object_id() => MoveTypeLayout::struct_(
                Some((**s).clone()),
                vec![MoveFieldLayout::new(crate::ident!("bytes"), MoveTypeLayout::Address)],
            ),
            TypeTag::Struct(s) => match s.option_element() {
                Some(inner) => MoveTypeLayout::struct_(
                    Some((**s).clone()),
                    vec![MoveFieldLayout::new(
                        crate::ident!("vec"),
                        MoveTypeLayout::vector(inner.try_into()?),
                    )],
                ),
                None => {
                    return Err(SuiError::type_mismatch(format!(
                        "no layout known for struct {s}"
                    )))
                }
            },
            TypeTag::Signer => {
                return Err(SuiError::type_mismatch("signer has no value layout"));
            }
        })
    }
}

/// A dynamically typed value. Struct fields are positional; their names live in the layout.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MoveValue {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    U256(U256),
    Address(SuiAddress),
    Vector(Vec<MoveValue>),
    Struct(Vec<MoveValue>),
    Variant(MoveVariant),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MoveVariant {
    pub tag: u16,
    pub fields: Vec<MoveValue>,
}

impl MoveValue {
    pub fn vector_u8(bytes: impl AsRef<[u8]>) -> Self {
        MoveValue::Vector(bytes.as_ref().iter().copied().map(MoveValue::U8).collect())
    }

    /// A `0x1::string::String` value.
    pub fn string(s: &str) -> Self {
        MoveValue::Struct(vec![MoveValue::vector_u8(s.as_bytes())])
    }

    pub fn encode(&self, layout: &MoveTypeLayout) -> SuiResult<Vec<u8>> {
        encode(self, layout)
    }

    pub fn decode(bytes: &[u8], layout: &MoveTypeLayout) -> SuiResult<Self> {
        decode(bytes, layout)
    }

    fn kind(&self) -> &'static str {
        match self {
            MoveValue::Bool(_) => "bool",
            MoveValue::U8(_) => "u8",
            MoveValue::U16(_) => "u16",
            MoveValue::U32(_) => "u32",
            MoveValue::U64(_) => "u64",
            MoveValue::U128(_) => "u128",
            MoveValue::U256(_) => "u256",
            MoveValue::Address(_) => "address",
            MoveValue::Vector(_) => "vector",
            MoveValue::Struct(_) => "struct",
            MoveValue::Variant(_) => "variant",
        }
    }
}

impl fmt::Display for MoveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveValue::Bool(b) => write!(f, "{b}"),
            MoveValue::U8(v) => write!(f, "{v}u8"),
            MoveValue::U16(v) => write!(f, "{v}u16"),
            MoveValue::U32(v) => write!(f, "{v}u32"),
            MoveValue::U64(v) => write!(f, "{v}u64"),
            MoveValue::U128(v) => write!(f, "{v}u128"),
            MoveValue::U256(v) => write!(f, "{v}u256"),
            MoveValue::Address(a) => write!(f, "{a}"),
            MoveValue::Vector(elems) => {
                write!(f, "vector[")?;
                write_comma_separated(f, elems)?;
                write!(f, "]")
            }
            MoveValue::Struct(fields) => {
                write!(f, "{{")?;
                write_comma_separated(f, fields)?;
                write!(f, "}}")
            }
            MoveValue::Variant(v) => {
                write!(f, "#{}{{", v.tag)?;
                write_comma_separated(f, &v.fields)?;
                write!(f, "}}")
            }
        }
    }
}

fn write_comma_separated(f: &mut fmt::Formatter<'_>, values: &[MoveValue]) -> fmt::Result {
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{v}")?;
    }
    Ok(())
}

/// Serializes the value the way `bcs` would serialize the equivalent static type.
impl Serialize for MoveValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MoveValue::Bool(b) => serializer.serialize_bool(*b),
            MoveValue::U8(v) => serializer.serialize_u8(*v),
            MoveValue::U16(v) => serializer.serialize_u16(*v),
            MoveValue::U32(v) => serializer.serialize_u32(*v),
            MoveValue::U64(v) => serializer.serialize_u64(*v),
            MoveValue::U128(v) => serializer.serialize_u128(*v),
            MoveValue::U256(v) => {
                let bytes = v.to_le_bytes();
                let mut t = serializer.serialize_tuple(bytes.len())?;
                for b in bytes.iter() {
                    t.serialize_element(b)?;
                }
                t.end()
            }
            MoveValue::Address(a) => a.serialize(serializer),
            MoveValue::Vector(elems) => {
                let mut seq = serializer.serialize_seq(Some(elems.len()))?;
                for e in elems {
                    seq.serialize_element(e)?;
                }
                seq.end()
            }
            MoveValue::Struct(fields) => {
                let mut t = serializer.serialize_tuple(fields.len())?;
                for field in fields {
                    t.serialize_element(field)?;
                }
                t.end()
            }
            MoveValue::Variant(v) => {
                let mut t =
                    serializer.serialize_tuple_variant("", v.tag as u32, "", v.fields.len())?;
                for field in &v.fields {
                    t.serialize_field(field)?;
                }
                t.end()
            }
        }
    }
}

/// Encodes `value` according to `layout`, failing with `TypeMismatch` when their shapes differ.
pub fn encode(value: &MoveValue, layout: &MoveTypeLayout) -> SuiResult<Vec<u8>> {
    let mut out = vec![];
    encode_into(&mut out, value, layout)?;
    Ok(out)
}

fn encode_into(out: &mut Vec<u8>, value: &MoveValue, layout: &MoveTypeLayout) -> SuiResult {
    match (value, layout) {
        (MoveValue::Bool(b), MoveTypeLayout::Bool) => out.push(u8::from(*b)),
        (MoveValue::U8(v), MoveTypeLayout::U8) => out.push(*v),
        (MoveValue::U16(v), MoveTypeLayout::U16) => out.extend_from_slice(&v.to_le_bytes()),
        (MoveValue::U32(v), MoveTypeLayout::U32) => out.extend_from_slice(&v.to_le_bytes()),
        (MoveValue::U64(v), MoveTypeLayout::U64) => out.extend_from_slice(&v.to_le_bytes()),
        (MoveValue::U128(v), MoveTypeLayout::U128) => out.extend_from_slice(&v.to_le_bytes()),
        (MoveValue::U256(v), MoveTypeLayout::U256) => out.extend_from_slice(&v.to_le_bytes()),
        (MoveValue::Address(a), MoveTypeLayout::Address) => out.extend_from_slice(a.as_ref()),
        (MoveValue::Vector(elems), MoveTypeLayout::Vector(inner)) => {
            write_length(out, elems.len())?;
            for e in elems {
                encode_into(out, e, inner)?;
            }
        }
        (MoveValue::Struct(fields), MoveTypeLayout::Struct(s)) => {
            encode_fields(out, fields, &s.fields)?;
        }
        (MoveValue::Variant(v), MoveTypeLayout::Enum(e)) => {
            let variant = e.variants.get(v.tag as usize).ok_or_else(|| {
                SuiError::type_mismatch(format!(
                    "variant tag {} out of range for {} variants",
                    v.tag,
                    e.variants.len()
                ))
            })?;
            write_uleb128(out, v.tag as u64);
            encode_fields(out, &v.fields, &variant.fields)?;
        }
        (value, layout) => {
            return Err(SuiError::type_mismatch(format!(
                "{} value where {} was declared",
                value.kind(),
                layout_kind(layout)
            )))
        }
    }
    Ok(())
}

fn encode_fields(out: &mut Vec<u8>, values: &[MoveValue], fields: &[MoveFieldLayout]) -> SuiResult {
    fp_ensure!(
        values.len() == fields.len(),
        SuiError::type_mismatch(format!(
            "expected {} field(s), got {}",
            fields.len(),
            values.len()
        ))
    );
    for (value, field) in values.iter().zip(fields) {
        encode_into(out, value, &field.layout)?;
    }
    Ok(())
}

fn layout_kind(layout: &MoveTypeLayout) -> &'static str {
    match layout {
        MoveTypeLayout::Bool => "bool",
        MoveTypeLayout::U8 => "u8",
        MoveTypeLayout::U16 => "u16",
        MoveTypeLayout::U32 => "u32",
        MoveTypeLayout::U64 => "u64",
        MoveTypeLayout::U128 => "u128",
        MoveTypeLayout::U256 => "u256",
        MoveTypeLayout::Address => "address",
        MoveTypeLayout::Vector(_) => "vector",
        MoveTypeLayout::Struct(_) => "struct",
        MoveTypeLayout::Enum(_) => "enum",
    }
}

fn write_length(out: &mut Vec<u8>, len: usize) -> SuiResult {
    let len = len as u64;
    fp_ensure!(
        len <= MAX_SEQUENCE_LENGTH,
        SuiError::size_limit("sequence length", len)
    );
    write_uleb128(out, len);
    Ok(())
}

pub fn write_uleb128(out: &mut Vec<u8>, value: u64) {
    // Writing into a Vec cannot fail.
    let _ = leb128::write::unsigned(out, value);
}

/// Decodes exactly one value of `layout` from `bytes`; leftover bytes are an error.
pub fn decode(bytes: &[u8], layout: &MoveTypeLayout) -> SuiResult<MoveValue> {
    let mut reader = Reader::new(bytes);
    let value = reader.read_value(layout)?;
    reader.finish()?;
    Ok(value)
}

/// Cursor over an input buffer that tracks the offset for error reporting.
pub struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    pub fn finish(&self) -> SuiResult {
        match self.remaining() {
            0 => Ok(()),
            remaining => Err(SuiError::TrailingBytes {
                remaining: Some(remaining),
            }),
        }
    }

    fn take(&mut self, n: usize) -> SuiResult<&'a [u8]> {
        if self.remaining() < n {
            return Err(SuiError::TruncatedInput {
                offset: Some(self.offset),
                needed: Some(n - self.remaining()),
            });
        }
        let out = &self.bytes[self.offset..self.offset + n];
        self.offset += n;
        Ok(out)
    }

    fn take_array<const N: usize>(&mut self) -> SuiResult<[u8; N]> {
        let mut arr = [0u8; N];
        arr.copy_from_slice(self.take(N)?);
        Ok(arr)
    }

    /// Reads a ULEB128 value, rejecting padded encodings and values past `u64`.
    pub fn read_uleb128(&mut self) -> SuiResult<u64> {
        let start = self.offset;
        let mut value: u64 = 0;
        for shift in (0..64).step_by(7) {
            let byte = self.take(1)?[0];
            let digit = (byte & 0x7f) as u64;
            if shift == 63 && digit > 1 {
                return Err(SuiError::NonCanonicalEncoding {
                    error: format!("ULEB128 at offset {start} overflows u64"),
                });
            }
            value |= digit << shift;
            if byte & 0x80 == 0 {
                if shift > 0 && digit == 0 {
                    return Err(SuiError::NonCanonicalEncoding {
                        error: format!("ULEB128 at offset {start} has a redundant trailing byte"),
                    });
                }
                return Ok(value);
            }
        }
        Err(SuiError::NonCanonicalEncoding {
            error: format!("ULEB128 at offset {start} overflows u64"),
        })
    }

    fn read_length(&mut self) -> SuiResult<usize> {
        let len = self.read_uleb128()?;
        fp_ensure!(
            len <= MAX_SEQUENCE_LENGTH,
            SuiError::size_limit("sequence length", len)
        );
        Ok(len as usize)
    }

    pub fn read_value(&mut self, layout: &MoveTypeLayout) -> SuiResult<MoveValue> {
        Ok(match layout {
            MoveTypeLayout::Bool => match self.take(1)?[0] {
                0 => MoveValue::Bool(false),
                1 => MoveValue::Bool(true),
                other => {
                    return Err(SuiError::NonCanonicalEncoding {
                        error: format!("boolean byte {other:#04x} at offset {}", self.offset - 1),
                    })
                }
            },
            MoveTypeLayout::U8 => MoveValue::U8(self.take(1)?[0]),
            MoveTypeLayout::U16 => MoveValue::U16(u16::from_le_bytes(self.take_array()?)),
            MoveTypeLayout::U32 => MoveValue::U32(u32::from_le_bytes(self.take_array()?)),
            MoveTypeLayout::U64 => MoveValue::U64(u64::from_le_bytes(self.take_array()?)),
            MoveTypeLayout::U128 => MoveValue::U128(u128::from_le_bytes(self.take_array()?)),
            MoveTypeLayout::U256 => MoveValue::U256(U256::from_le_bytes(self.take_array()?)),
            MoveTypeLayout::Address => {
                MoveValue::Address(SuiAddress::new(self.take_array::<SUI_ADDRESS_LENGTH>()?))
            }
            MoveTypeLayout::Vector(inner) => {
                let len = self.read_length()?;
                if !inner.is_zero_sized() && len > self.remaining() {
                    return Err(SuiError::TruncatedInput {
                        offset: Some(self.offset),
                        needed: Some(len - self.remaining()),
                    });
                }
                let mut elems = Vec::with_capacity(len.min(self.remaining()));
                for _ in 0..len {
                    elems.push(self.read_value(inner)?);
                }
                MoveValue::Vector(elems)
            }
            MoveTypeLayout::Struct(s) => MoveValue::Struct(self.read_fields(&s.fields)?),
            MoveTypeLayout::Enum(e) => {
                let tag = self.read_uleb128()?;
                let variant = e.variants.get(tag as usize).ok_or_else(|| {
                    SuiError::type_mismatch(format!(
                        "variant tag {tag} out of range for {} variants",
                        e.variants.len()
                    ))
                })?;
                MoveValue::Variant(MoveVariant {
                    tag: tag as u16,
                    fields: self.read_fields(&variant.fields)?,
                })
            }
        })
    }

    fn read_fields(&mut self, fields: &[MoveFieldLayout]) -> SuiResult<Vec<MoveValue>> {
        fields.iter().map(|f| self.read_value(&f.layout)).collect()
    }
}

/// BCS-encodes any serde type.
pub fn to_bytes<T: Serialize + ?Sized>(value: &T) -> SuiResult<Vec<u8>> {
    Ok(bcs::to_bytes(value)?)
}

/// BCS-decodes any serde type, rejecting trailing bytes and non-canonical encodings.
pub fn from_bytes<T: DeserializeOwned>(bytes: &[u8]) -> SuiResult<T> {
    Ok(bcs::from_bytes(bytes)?)
}
