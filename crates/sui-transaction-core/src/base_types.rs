// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::digests::ObjectDigest;
use crate::error::SuiError;
use crate::sui_serde::{decode_address_hex, HexAccountAddress, Readable};

#[cfg(test)]
#[path = "unit_tests/base_types_tests.rs"]
mod base_types_tests;

pub const SUI_ADDRESS_LENGTH: usize = 32;

#[derive(
    Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Hash, Default, Debug, Serialize, Deserialize,
)]
pub struct SequenceNumber(u64);

pub type VersionNumber = SequenceNumber;
pub type EpochId = u64;

impl SequenceNumber {
    pub const MIN: SequenceNumber = SequenceNumber(u64::MIN);
    pub const MAX: SequenceNumber = SequenceNumber(0x7fff_ffff_ffff_ffff);

    pub const fn new() -> Self {
        SequenceNumber(0)
    }

    pub const fn from_u64(u: u64) -> Self {
        SequenceNumber(u)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for SequenceNumber {
    fn from(value: u64) -> Self {
        SequenceNumber(value)
    }
}

impl From<SequenceNumber> for u64 {
    fn from(val: SequenceNumber) -> Self {
        val.0
    }
}

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

macro_rules! address_type {
    ($(#[$meta:meta])* $name:ident, $what:literal) => {
        $(#[$meta])*
        #[serde_as]
        #[derive(Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Hash, Default, Serialize, Deserialize)]
        pub struct $name(
            #[serde_as(as = "Readable<HexAccountAddress, _>")] [u8; SUI_ADDRESS_LENGTH],
        );

        impl $name {
            pub const ZERO: Self = Self([0u8; SUI_ADDRESS_LENGTH]);
            pub const LENGTH: usize = SUI_ADDRESS_LENGTH;

            pub const fn new(bytes: [u8; SUI_ADDRESS_LENGTH]) -> Self {
                Self(bytes)
            }

            /// Builds a value whose trailing bytes hold `suffix` big-endian, e.g. `0x2`.
            pub const fn from_suffix(suffix: u16) -> Self {
                let mut bytes = [0u8; SUI_ADDRESS_LENGTH];
                let be = suffix.to_be_bytes();
                bytes[SUI_ADDRESS_LENGTH - 2] = be[0];
                bytes[SUI_ADDRESS_LENGTH - 1] = be[1];
                Self(bytes)
            }

            pub fn random() -> Self {
                Self::random_from_rng(&mut rand::thread_rng())
            }

            pub fn random_from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
                let mut bytes = [0u8; SUI_ADDRESS_LENGTH];
                rng.fill(&mut bytes[..]);
                Self(bytes)
            }

            pub const fn into_bytes(self) -> [u8; SUI_ADDRESS_LENGTH] {
                self.0
            }

            pub fn to_vec(&self) -> Vec<u8> {
                self.0.to_vec()
            }

            /// Full-width `0x`-prefixed hex.
            pub fn to_hex_literal(&self) -> String {
                format!("0x{}", hex::encode(self.0))
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl From<[u8; SUI_ADDRESS_LENGTH]> for $name {
            fn from(bytes: [u8; SUI_ADDRESS_LENGTH]) -> Self {
                Self(bytes)
            }
        }

        impl TryFrom<&[u8]> for $name {
            type Error = SuiError;

            fn try_from(bytes: &[u8]) -> Result<Self, SuiError> {
                let arr: [u8; SUI_ADDRESS_LENGTH] =
                    bytes.try_into().map_err(|_| SuiError::InvalidLength {
                        expected: SUI_ADDRESS_LENGTH,
                        actual: bytes.len(),
                    })?;
                Ok(Self(arr))
            }
        }

        impl FromStr for $name {
            type Err = SuiError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                decode_address_hex(s)
                    .map(Self)
                    .map_err(|error| SuiError::parse($what, error))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl fmt::LowerHex for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if f.alternate() {
                    write!(f, "0x")?;
                }
                write!(f, "{}", hex::encode(self.0))
            }
        }
    };
}

address_type!(
    /// An account address: the Blake2b-256 hash of a flagged public key, or a package address.
    SuiAddress,
    "address"
);

address_type!(
    /// Identifier of an on-chain object. Shares the address space with `SuiAddress`.
    ObjectID,
    "object id"
);

impl From<ObjectID> for SuiAddress {
    fn from(id: ObjectID) -> Self {
        SuiAddress(id.0)
    }
}

impl From<SuiAddress> for ObjectID {
    fn from(address: SuiAddress) -> Self {
        ObjectID(address.0)
    }
}

/// Generate a fake SuiAddress with repeated one byte.
pub fn dbg_addr(name: u8) -> SuiAddress {
    SuiAddress([name; SUI_ADDRESS_LENGTH])
}

pub fn dbg_object_id(name: u8) -> ObjectID {
    ObjectID([name; SUI_ADDRESS_LENGTH])
}

pub type ObjectRef = (ObjectID, SequenceNumber, ObjectDigest);

pub fn random_object_ref() -> ObjectRef {
    (
        ObjectID::random(),
        SequenceNumber::from_u64(1),
        ObjectDigest::random(),
    )
}
