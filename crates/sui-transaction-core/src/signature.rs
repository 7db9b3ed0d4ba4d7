// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::crypto::{decode_base64, OpaqueBytes, Signature, SignatureScheme};
use crate::error::{SuiError, SuiResult};
use crate::multisig::MultiSig;

#[cfg(test)]
#[path = "unit_tests/signature_tests.rs"]
mod signature_tests;

/// Every kind of user authenticator a transaction can carry. On the wire each one is a byte
/// string whose first byte is its scheme flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GenericSignature {
    MultiSig(MultiSig),
    Signature(Signature),
    /// Opaque zkLogin proof bytes, without the flag.
    ZkLoginAuthenticator(OpaqueBytes),
    /// Opaque passkey authenticator bytes, without the flag.
    PasskeyAuthenticator(OpaqueBytes),
}

impl GenericSignature {
    pub fn scheme(&self) -> SignatureScheme {
        match self {
            GenericSignature::MultiSig(_) => SignatureScheme::MultiSig,
            GenericSignature::Signature(s) => s.scheme(),
            GenericSignature::ZkLoginAuthenticator(_) => SignatureScheme::ZkLoginAuthenticator,
            GenericSignature::PasskeyAuthenticator(_) => SignatureScheme::PasskeyAuthenticator,
        }
    }

    /// `flag || payload`.
    pub fn to_bytes(&self) -> SuiResult<Vec<u8>> {
        match self {
            GenericSignature::MultiSig(m) => m.to_bytes(),
            GenericSignature::Signature(s) => Ok(s.as_bytes().to_vec()),
            GenericSignature::ZkLoginAuthenticator(b) | GenericSignature::PasskeyAuthenticator(b) => {
                let payload = b.as_bytes();
                let mut bytes = Vec::with_capacity(1 + payload.len());
                bytes.push(self.scheme().flag());
                bytes.extend_from_slice(payload);
                Ok(bytes)
            }
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> SuiResult<Self> {
        let (flag, rest) = bytes.split_first().ok_or(SuiError::InvalidLength {
            expected: 1,
            actual: 0,
        })?;
        match SignatureScheme::from_flag_byte(flag)? {
            SignatureScheme::MultiSig => Ok(GenericSignature::MultiSig(MultiSig::from_bytes(bytes)?)),
            SignatureScheme::ED25519 | SignatureScheme::Secp256k1 | SignatureScheme::Secp256r1 => {
                Ok(GenericSignature::Signature(Signature::from_bytes(bytes)?))
            }
            SignatureScheme::ZkLoginAuthenticator => Ok(GenericSignature::ZkLoginAuthenticator(
                OpaqueBytes::new(rest.to_vec()),
            )),
            SignatureScheme::PasskeyAuthenticator => Ok(GenericSignature::PasskeyAuthenticator(
                OpaqueBytes::new(rest.to_vec()),
            )),
        }
    }

    /// Base64 of [`Self::to_bytes`].
    pub fn encode_base64(&self) -> SuiResult<String> {
        Ok(BASE64_STANDARD.encode(self.to_bytes()?))
    }
}

impl From<Signature> for GenericSignature {
    fn from(sig: Signature) -> Self {
        GenericSignature::Signature(sig)
    }
}

impl From<MultiSig> for GenericSignature {
    fn from(sig: MultiSig) -> Self {
        GenericSignature::MultiSig(sig)
    }
}

impl FromStr for GenericSignature {
    type Err = SuiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GenericSignature::from_bytes(&decode_base64(s)?)
    }
}

impl Serialize for GenericSignature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let bytes = self.to_bytes().map_err(serde::ser::Error::custom)?;
        if serializer.is_human_readable() {
            serializer.serialize_str(&BASE64_STANDARD.encode(bytes))
        } else {
            serializer.serialize_bytes(&bytes)
        }
    }
}

impl<'de> Deserialize<'de> for GenericSignature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes = if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            decode_base64(&s).map_err(D::Error::custom)?
        } else {
            <Vec<u8>>::deserialize(deserializer)?
        };
        GenericSignature::from_bytes(&bytes).map_err(D::Error::custom)
    }
}
