// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::crypto::{PublicKey, SignatureScheme, SuiSigner, DIGEST_LENGTH};
use crate::error::SuiResult;

/// Deterministic stand-in for a key store. The "signature" is the digest twice, xor'ed with
/// the seed, so tests can check what was signed.
pub struct TestSigner {
    scheme: SignatureScheme,
    seed: u8,
}

impl TestSigner {
    pub fn ed25519(seed: u8) -> Self {
        Self {
            scheme: SignatureScheme::ED25519,
            seed,
        }
    }

    pub fn secp256k1(seed: u8) -> Self {
        Self {
            scheme: SignatureScheme::Secp256k1,
            seed,
        }
    }

    pub fn public(&self) -> PublicKey {
        PublicKey::try_from_bytes(self.scheme, &self.public_key_bytes()).unwrap()
    }
}

impl SuiSigner for TestSigner {
    fn scheme(&self) -> SignatureScheme {
        self.scheme
    }

    fn public_key_bytes(&self) -> Vec<u8> {
        let len = self.scheme.public_key_length().unwrap();
        vec![self.seed; len]
    }

    fn sign_digest(&self, digest: &[u8; DIGEST_LENGTH]) -> SuiResult<Vec<u8>> {
        Ok(digest
            .iter()
            .chain(digest.iter())
            .map(|b| b ^ self.seed)
            .collect())
    }
}

pub fn keys() -> Vec<TestSigner> {
    (1..=3).map(TestSigner::ed25519).collect()
}
