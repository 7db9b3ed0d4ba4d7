// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};

use crate::crypto::DefaultHash;
use crate::error::SuiError;
use crate::sui_serde::{Base58, Readable};

/// A representation of a 32 byte digest
#[serde_as]
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Digest(#[serde_as(as = "Readable<Base58, Bytes>")] [u8; 32]);

impl Digest {
    pub const ZERO: Self = Digest([0; 32]);

    pub const fn new(digest: [u8; 32]) -> Self {
        Self(digest)
    }

    pub fn generate<R: rand::RngCore + rand::CryptoRng>(mut rng: R) -> Self {
        let mut bytes = [0; 32];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn random() -> Self {
        Self::generate(rand::thread_rng())
    }

    pub const fn inner(&self) -> &[u8; 32] {
        &self.0
    }

    pub const fn into_inner(self) -> [u8; 32] {
        self.0
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Digest {
    fn from(digest: [u8; 32]) -> Self {
        Self::new(digest)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::LowerHex for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "0x")?;
        }

        for byte in self.0 {
            write!(f, "{:02x}", byte)?;
        }

        Ok(())
    }
}

impl FromStr for Digest {
    type Err = SuiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let buffer = bs58::decode(s)
            .into_vec()
            .map_err(|e| SuiError::parse("digest", e.to_string()))?;
        let actual = buffer.len();
        let bytes: [u8; 32] = buffer.try_into().map_err(|_| SuiError::InvalidLength {
            expected: 32,
            actual,
        })?;
        Ok(Digest(bytes))
    }
}

macro_rules! digest_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(Digest);

        impl $name {
            pub const ZERO: Self = Self(Digest::ZERO);

            pub const fn new(digest: [u8; 32]) -> Self {
                Self(Digest::new(digest))
            }

            pub fn random() -> Self {
                Self(Digest::random())
            }

            pub const fn inner(&self) -> &[u8; 32] {
                self.0.inner()
            }

            pub const fn into_inner(self) -> [u8; 32] {
                self.0.into_inner()
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                self.0.as_ref()
            }
        }

        impl From<[u8; 32]> for $name {
            fn from(digest: [u8; 32]) -> Self {
                Self::new(digest)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.0).finish()
            }
        }

        impl FromStr for $name {
            type Err = SuiError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Digest::from_str(s).map(Self)
            }
        }
    };
}

digest_newtype!(
    /// Digest of an object's contents at one version; part of every `ObjectRef`.
    ObjectDigest
);

digest_newtype!(
    /// A transaction will have a (unique) digest.
    TransactionDigest
);

impl TransactionDigest {
    /// Blake2b-256 over the type-name-prefixed BCS bytes, `"TransactionData::" || bcs(data)`.
    pub fn from_transaction_bytes(tx_bytes: &[u8]) -> Self {
        let mut hasher = DefaultHash::default();
        hasher.update(b"TransactionData::");
        hasher.update(tx_bytes);
        Self::new(hasher.finalize())
    }
}
