// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::fmt::Debug;
use std::marker::PhantomData;

use serde::de::{Deserializer, Error};
use serde::ser::Serializer;
use serde::Deserialize;
use serde_with::{DeserializeAs, SerializeAs};

use crate::base_types::SUI_ADDRESS_LENGTH;

#[inline]
fn to_custom_error<'de, D, E>(e: E) -> D::Error
where
    E: Debug,
    D: Deserializer<'de>,
{
    Error::custom(format!("byte deserialization failed, cause by: {:?}", e))
}

/// Use with serde_as to control serde for human-readable serialization and deserialization
/// `H` : serde_as SerializeAs/DeserializeAs delegation for human readable in/output
/// `R` : serde_as SerializeAs/DeserializeAs delegation for non-human readable in/output
///
/// # Example:
///
/// ```text
/// #[serde_as]
/// #[derive(Deserialize, Serialize)]
/// struct Example(#[serde_as(as = "Readable<HexAccountAddress, _>")] [u8; 32]);
/// ```
///
/// The above example will delegate human-readable serde to `HexAccountAddress`
/// and array tuple (default) for non-human-readable serializer such as BCS.
pub struct Readable<H, R> {
    human_readable: PhantomData<H>,
    non_human_readable: PhantomData<R>,
}

impl<T: ?Sized, H, R> SerializeAs<T> for Readable<H, R>
where
    H: SerializeAs<T>,
    R: SerializeAs<T>,
{
    fn serialize_as<S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            H::serialize_as(value, serializer)
        } else {
            R::serialize_as(value, serializer)
        }
    }
}

impl<'de, R, H, T> DeserializeAs<'de, T> for Readable<H, R>
where
    H: DeserializeAs<'de, T>,
    R: DeserializeAs<'de, T>,
{
    fn deserialize_as<D>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            H::deserialize_as(deserializer)
        } else {
            R::deserialize_as(deserializer)
        }
    }
}

/// `0x`-prefixed, zero-padded hex for 32-byte account addresses and object ids.
pub struct HexAccountAddress;

impl SerializeAs<[u8; SUI_ADDRESS_LENGTH]> for HexAccountAddress {
    fn serialize_as<S>(value: &[u8; SUI_ADDRESS_LENGTH], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("0x{}", hex::encode(value)))
    }
}

impl<'de> DeserializeAs<'de, [u8; SUI_ADDRESS_LENGTH]> for HexAccountAddress {
    fn deserialize_as<D>(deserializer: D) -> Result<[u8; SUI_ADDRESS_LENGTH], D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        decode_address_hex(&s).map_err(to_custom_error::<'de, D, _>)
    }
}

/// Parses `0x`-prefixed (or bare) hex of at most 64 digits, left-padding short literals like `0x2`.
pub(crate) fn decode_address_hex(s: &str) -> Result<[u8; SUI_ADDRESS_LENGTH], String> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    if digits.is_empty() || digits.len() > SUI_ADDRESS_LENGTH * 2 {
        return Err(format!("invalid address literal {s:?}"));
    }
    let padded = format!("{:0>width$}", digits, width = SUI_ADDRESS_LENGTH * 2);
    let mut bytes = [0u8; SUI_ADDRESS_LENGTH];
    hex::decode_to_slice(padded, &mut bytes).map_err(|e| e.to_string())?;
    Ok(bytes)
}

/// Base58 text for digests, the format explorers and RPC responses use.
pub struct Base58;

impl<const N: usize> SerializeAs<[u8; N]> for Base58 {
    fn serialize_as<S>(value: &[u8; N], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&bs58::encode(value).into_string())
    }
}

impl<'de, const N: usize> DeserializeAs<'de, [u8; N]> for Base58 {
    fn deserialize_as<D>(deserializer: D) -> Result<[u8; N], D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = bs58::decode(&s)
            .into_vec()
            .map_err(to_custom_error::<'de, D, _>)?;
        bytes.try_into().map_err(|v: Vec<u8>| {
            Error::custom(format!("expected {N} bytes, got {}", v.len()))
        })
    }
}
