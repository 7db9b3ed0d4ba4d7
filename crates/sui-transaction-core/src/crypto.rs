// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Key and signature framing.
//!
//! Raw curve arithmetic lives outside this crate. Keys and signatures here are fixed-width byte
//! containers tagged with their scheme; producing a signature goes through the [`SuiSigner`] seam.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest as _};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_with::base64::Base64;
use serde_with::{serde_as, Bytes};
use strum_macros::{EnumIter, EnumString};
use tracing::trace;

use crate::base_types::SuiAddress;
use crate::error::{SuiError, SuiResult};
use crate::intent::IntentMessage;
use crate::sui_serde::Readable;

#[cfg(test)]
#[path = "unit_tests/crypto_tests.rs"]
mod crypto_tests;

pub const ED25519_PUBLIC_KEY_LENGTH: usize = 32;
pub const SECP256K1_PUBLIC_KEY_LENGTH: usize = 33;
pub const SECP256R1_PUBLIC_KEY_LENGTH: usize = 33;
pub const SIGNATURE_LENGTH: usize = 64;
pub const DIGEST_LENGTH: usize = 32;

/// Blake2b-256, the hash behind addresses, transaction digests and signing digests.
#[derive(Clone, Default)]
pub struct DefaultHash(Blake2b<U32>);

impl DefaultHash {
    pub fn update(&mut self, data: impl AsRef<[u8]>) {
        self.0.update(data);
    }

    pub fn finalize(self) -> [u8; DIGEST_LENGTH] {
        self.0.finalize().into()
    }

    pub fn digest(data: impl AsRef<[u8]>) -> [u8; DIGEST_LENGTH] {
        let mut hasher = Self::default();
        hasher.update(data);
        hasher.finalize()
    }
}

/// Leading byte of every self-describing key or signature.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    strum_macros::Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum SignatureScheme {
    ED25519,
    Secp256k1,
    Secp256r1,
    MultiSig,
    ZkLoginAuthenticator,
    PasskeyAuthenticator,
}

impl SignatureScheme {
    pub fn flag(&self) -> u8 {
        match self {
            SignatureScheme::ED25519 => 0x00,
            SignatureScheme::Secp256k1 => 0x01,
            SignatureScheme::Secp256r1 => 0x02,
            SignatureScheme::MultiSig => 0x03,
            SignatureScheme::ZkLoginAuthenticator => 0x05,
            SignatureScheme::PasskeyAuthenticator => 0x06,
        }
    }

    pub fn from_flag_byte(byte: &u8) -> SuiResult<SignatureScheme> {
        match byte {
            0x00 => Ok(SignatureScheme::ED25519),
            0x01 => Ok(SignatureScheme::Secp256k1),
            0x02 => Ok(SignatureScheme::Secp256r1),
            0x03 => Ok(SignatureScheme::MultiSig),
            0x05 => Ok(SignatureScheme::ZkLoginAuthenticator),
            0x06 => Ok(SignatureScheme::PasskeyAuthenticator),
            other => Err(SuiError::InvalidSignatureScheme(*other)),
        }
    }

    /// Public key width for the schemes that have a fixed one.
    pub fn public_key_length(&self) -> Option<usize> {
        match self {
            SignatureScheme::ED25519 => Some(ED25519_PUBLIC_KEY_LENGTH),
            SignatureScheme::Secp256k1 => Some(SECP256K1_PUBLIC_KEY_LENGTH),
            SignatureScheme::Secp256r1 | SignatureScheme::PasskeyAuthenticator => {
                Some(SECP256R1_PUBLIC_KEY_LENGTH)
            }
            SignatureScheme::MultiSig | SignatureScheme::ZkLoginAuthenticator => None,
        }
    }
}

macro_rules! fixed_bytes {
    ($(#[$meta:meta])* $name:ident, $len:expr) => {
        $(#[$meta])*
        #[serde_as]
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(#[serde_as(as = "Readable<Base64, Bytes>")] [u8; $len]);

        impl $name {
            pub const LENGTH: usize = $len;

            pub const fn new(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            pub fn from_bytes(bytes: &[u8]) -> SuiResult<Self> {
                Self::try_from(bytes)
            }
        }

        impl TryFrom<&[u8]> for $name {
            type Error = SuiError;

            fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
                let arr: [u8; $len] = bytes.try_into().map_err(|_| SuiError::InvalidLength {
                    expected: $len,
                    actual: bytes.len(),
                })?;
                Ok(Self(arr))
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), hex::encode(self.0))
            }
        }
    };
}

fixed_bytes!(Ed25519PublicKeyAsBytes, ED25519_PUBLIC_KEY_LENGTH);
fixed_bytes!(Secp256k1PublicKeyAsBytes, SECP256K1_PUBLIC_KEY_LENGTH);
fixed_bytes!(Secp256r1PublicKeyAsBytes, SECP256R1_PUBLIC_KEY_LENGTH);
fixed_bytes!(Ed25519SignatureAsBytes, SIGNATURE_LENGTH);
fixed_bytes!(Secp256k1SignatureAsBytes, SIGNATURE_LENGTH);
fixed_bytes!(Secp256r1SignatureAsBytes, SIGNATURE_LENGTH);

/// Variable-length proof material carried without interpretation.
#[serde_as]
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OpaqueBytes(#[serde_as(as = "Readable<Base64, Bytes>")] Vec<u8>);

impl OpaqueBytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for OpaqueBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for OpaqueBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OpaqueBytes({})", hex::encode(&self.0))
    }
}

/// A public key tagged with its scheme. The variant order is the wire order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PublicKey {
    Ed25519(Ed25519PublicKeyAsBytes),
    Secp256k1(Secp256k1PublicKeyAsBytes),
    Secp256r1(Secp256r1PublicKeyAsBytes),
    ZkLogin(OpaqueBytes),
    Passkey(Secp256r1PublicKeyAsBytes),
}

impl PublicKey {
    pub fn scheme(&self) -> SignatureScheme {
        match self {
            PublicKey::Ed25519(_) => SignatureScheme::ED25519,
            PublicKey::Secp256k1(_) => SignatureScheme::Secp256k1,
            PublicKey::Secp256r1(_) => SignatureScheme::Secp256r1,
            PublicKey::ZkLogin(_) => SignatureScheme::ZkLoginAuthenticator,
            PublicKey::Passkey(_) => SignatureScheme::PasskeyAuthenticator,
        }
    }

    pub fn flag(&self) -> u8 {
        self.scheme().flag()
    }

    /// Builds a key from raw bytes, checking the width the scheme demands.
    pub fn try_from_bytes(scheme: SignatureScheme, bytes: &[u8]) -> SuiResult<PublicKey> {
        match scheme {
            SignatureScheme::ED25519 => Ok(PublicKey::Ed25519(bytes.try_into()?)),
            SignatureScheme::Secp256k1 => Ok(PublicKey::Secp256k1(bytes.try_into()?)),
            SignatureScheme::Secp256r1 => Ok(PublicKey::Secp256r1(bytes.try_into()?)),
            SignatureScheme::ZkLoginAuthenticator => {
                Ok(PublicKey::ZkLogin(OpaqueBytes::new(bytes.to_vec())))
            }
            SignatureScheme::PasskeyAuthenticator => Ok(PublicKey::Passkey(bytes.try_into()?)),
            SignatureScheme::MultiSig => Err(SuiError::InvalidSignatureScheme(scheme.flag())),
        }
    }

    /// `flag || key bytes`, Base64 encoded.
    pub fn encode_base64(&self) -> String {
        let mut bytes = vec![self.flag()];
        bytes.extend_from_slice(self.as_ref());
        BASE64_STANDARD.encode(bytes)
    }

    pub fn decode_base64(value: &str) -> SuiResult<PublicKey> {
        let bytes = decode_base64(value)?;
        let (flag, key) = bytes.split_first().ok_or(SuiError::InvalidLength {
            expected: 1,
            actual: 0,
        })?;
        PublicKey::try_from_bytes(SignatureScheme::from_flag_byte(flag)?, key)
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        match self {
            PublicKey::Ed25519(pk) => pk.as_ref(),
            PublicKey::Secp256k1(pk) => pk.as_ref(),
            PublicKey::Secp256r1(pk) => pk.as_ref(),
            PublicKey::ZkLogin(pk) => pk.as_ref(),
            PublicKey::Passkey(pk) => pk.as_ref(),
        }
    }
}

impl From<&PublicKey> for SuiAddress {
    /// Blake2b-256 over `flag || key bytes`.
    fn from(pk: &PublicKey) -> Self {
        let mut hasher = DefaultHash::default();
        hasher.update([pk.flag()]);
        hasher.update(pk);
        SuiAddress::new(hasher.finalize())
    }
}

/// A signature without its public key, as stored inside a multisig.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompressedSignature {
    Ed25519(Ed25519SignatureAsBytes),
    Secp256k1(Secp256k1SignatureAsBytes),
    Secp256r1(Secp256r1SignatureAsBytes),
    ZkLogin(OpaqueBytes),
    Passkey(OpaqueBytes),
}

impl CompressedSignature {
    pub fn scheme(&self) -> SignatureScheme {
        match self {
            CompressedSignature::Ed25519(_) => SignatureScheme::ED25519,
            CompressedSignature::Secp256k1(_) => SignatureScheme::Secp256k1,
            CompressedSignature::Secp256r1(_) => SignatureScheme::Secp256r1,
            CompressedSignature::ZkLogin(_) => SignatureScheme::ZkLoginAuthenticator,
            CompressedSignature::Passkey(_) => SignatureScheme::PasskeyAuthenticator,
        }
    }
}

impl AsRef<[u8]> for CompressedSignature {
    fn as_ref(&self) -> &[u8] {
        match self {
            CompressedSignature::Ed25519(sig) => sig.as_ref(),
            CompressedSignature::Secp256k1(sig) => sig.as_ref(),
            CompressedSignature::Secp256r1(sig) => sig.as_ref(),
            CompressedSignature::ZkLogin(sig) => sig.as_ref(),
            CompressedSignature::Passkey(sig) => sig.as_ref(),
        }
    }
}

/// Something that can produce a raw signature over a 32-byte digest.
///
/// Implemented by whatever key store or hardware signer the caller uses.
pub trait SuiSigner {
    fn scheme(&self) -> SignatureScheme;

    fn public_key_bytes(&self) -> Vec<u8>;

    fn sign_digest(&self, digest: &[u8; DIGEST_LENGTH]) -> SuiResult<Vec<u8>>;

    fn sui_address(&self) -> SuiResult<SuiAddress> {
        let pk = PublicKey::try_from_bytes(self.scheme(), &self.public_key_bytes())?;
        Ok(SuiAddress::from(&pk))
    }
}

/// A single-key signature, framed as `flag || signature || public key`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Signature(Vec<u8>);

impl Signature {
    /// Hashes the intent-wrapped message and asks `signer` to sign the digest.
    pub fn new_secure<T>(value: &IntentMessage<T>, signer: &dyn SuiSigner) -> SuiResult<Self>
    where
        T: Serialize,
    {
        let digest = DefaultHash::digest(value.to_bytes()?);
        let raw = signer.sign_digest(&digest)?;
        trace!(scheme = %signer.scheme(), "signed intent message");
        Self::from_parts(signer.scheme(), &raw, &signer.public_key_bytes())
    }

    pub fn from_parts(
        scheme: SignatureScheme,
        signature: &[u8],
        public_key: &[u8],
    ) -> SuiResult<Self> {
        let pk_len = match scheme {
            SignatureScheme::ED25519 | SignatureScheme::Secp256k1 | SignatureScheme::Secp256r1 => {
                scheme.public_key_length().unwrap_or_default()
            }
            other => return Err(SuiError::InvalidSignatureScheme(other.flag())),
        };
        fp_ensure!(
            signature.len() == SIGNATURE_LENGTH,
            SuiError::InvalidLength {
                expected: SIGNATURE_LENGTH,
                actual: signature.len(),
            }
        );
        fp_ensure!(
            public_key.len() == pk_len,
            SuiError::InvalidLength {
                expected: pk_len,
                actual: public_key.len(),
            }
        );
        let mut bytes = Vec::with_capacity(1 + SIGNATURE_LENGTH + pk_len);
        bytes.push(scheme.flag());
        bytes.extend_from_slice(signature);
        bytes.extend_from_slice(public_key);
        Ok(Self(bytes))
    }

    pub fn from_bytes(bytes: &[u8]) -> SuiResult<Self> {
        let (flag, rest) = bytes.split_first().ok_or(SuiError::InvalidLength {
            expected: 1,
            actual: 0,
        })?;
        let scheme = SignatureScheme::from_flag_byte(flag)?;
        let pk_len = match scheme {
            SignatureScheme::ED25519 | SignatureScheme::Secp256k1 | SignatureScheme::Secp256r1 => {
                scheme.public_key_length().unwrap_or_default()
            }
            other => return Err(SuiError::InvalidSignatureScheme(other.flag())),
        };
        fp_ensure!(
            rest.len() == SIGNATURE_LENGTH + pk_len,
            SuiError::InvalidLength {
                expected: 1 + SIGNATURE_LENGTH + pk_len,
                actual: bytes.len(),
            }
        );
        Ok(Self(bytes.to_vec()))
    }

    pub fn scheme(&self) -> SignatureScheme {
        // The flag was checked on construction.
        SignatureScheme::from_flag_byte(&self.0[0]).unwrap_or(SignatureScheme::ED25519)
    }

    pub fn signature_bytes(&self) -> &[u8] {
        &self.0[1..1 + SIGNATURE_LENGTH]
    }

    pub fn public_key_bytes(&self) -> &[u8] {
        &self.0[1 + SIGNATURE_LENGTH..]
    }

    pub fn to_public_key(&self) -> SuiResult<PublicKey> {
        PublicKey::try_from_bytes(self.scheme(), self.public_key_bytes())
    }

    pub fn to_compressed(&self) -> SuiResult<CompressedSignature> {
        let sig = self.signature_bytes();
        match self.scheme() {
            SignatureScheme::ED25519 => Ok(CompressedSignature::Ed25519(sig.try_into()?)),
            SignatureScheme::Secp256k1 => Ok(CompressedSignature::Secp256k1(sig.try_into()?)),
            SignatureScheme::Secp256r1 => Ok(CompressedSignature::Secp256r1(sig.try_into()?)),
            other => Err(SuiError::InvalidSignatureScheme(other.flag())),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn encode_base64(&self) -> String {
        BASE64_STANDARD.encode(&self.0)
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}, {})", self.scheme(), self.encode_base64())
    }
}

impl FromStr for Signature {
    type Err = SuiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Signature::from_bytes(&decode_base64(s)?)
    }
}

impl Serialize for Signature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.encode_base64())
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Signature {
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
        Signature::from_bytes(&bytes).map_err(D::Error::custom)
    }
}

pub(crate) fn decode_base64(value: &str) -> SuiResult<Vec<u8>> {
    BASE64_STANDARD
        .decode(value)
        .map_err(|e| SuiError::parse("base64", e.to_string()))
}
