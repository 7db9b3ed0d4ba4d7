// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::hash::{Hash, Hasher};
use std::str::FromStr;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::base_types::SuiAddress;
use crate::crypto::{
    decode_base64, CompressedSignature, DefaultHash, PublicKey, Signature, SignatureScheme,
};
use crate::error::{SuiError, SuiResult};

#[cfg(test)]
#[path = "unit_tests/multisig_tests.rs"]
mod multisig_tests;

pub type WeightUnit = u8;
pub type ThresholdUnit = u16;
pub type BitmapUnit = u16;
pub const MAX_SIGNER_IN_MULTISIG: usize = 10;
pub const MAX_BITMAP_VALUE: BitmapUnit = 0b1111111111;

/// The struct that contains signatures and public keys necessary for authenticating a MultiSig.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MultiSig {
    /// The plain signatures, ordered by the position of their signer in `multisig_pk`.
    sigs: Vec<CompressedSignature>,
    /// Bit `i` is set when the key at index `i` of `multisig_pk` contributed a signature.
    bitmap: BitmapUnit,
    /// The public keys with their weights, and the threshold.
    multisig_pk: MultiSigPublicKey,
    /// `flag || bcs(self)`, computed on first use.
    #[serde(skip)]
    bytes: OnceCell<Vec<u8>>,
}

impl PartialEq for MultiSig {
    fn eq(&self, other: &Self) -> bool {
        self.sigs == other.sigs
            && self.bitmap == other.bitmap
            && self.multisig_pk == other.multisig_pk
    }
}

impl Eq for MultiSig {}

impl Hash for MultiSig {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sigs.hash(state);
        self.bitmap.hash(state);
        self.multisig_pk.hash(state);
    }
}

/// Interpret a bitmap of 01s as a list of indices that is set to 1s.
/// e.g. 22 = 0b10110, then the result is [1, 2, 4].
pub fn as_indices(bitmap: u16) -> SuiResult<Vec<u8>> {
    if bitmap > MAX_BITMAP_VALUE {
        return Err(SuiError::aggregation(format!("invalid bitmap {bitmap:#b}")));
    }
    Ok((0..MAX_SIGNER_IN_MULTISIG as u8)
        .filter(|i| bitmap & (1 << i) != 0)
        .collect())
}

impl MultiSig {
    /// Create MultiSig from its fields, without checking them.
    pub fn new(
        sigs: Vec<CompressedSignature>,
        bitmap: BitmapUnit,
        multisig_pk: MultiSigPublicKey,
    ) -> Self {
        Self {
            sigs,
            bitmap,
            multisig_pk,
            bytes: OnceCell::new(),
        }
    }

    /// Combines full signatures (`flag || sig || pk`), locating each signer by its public key.
    /// The signatures may arrive in any order.
    pub fn combine(full_sigs: Vec<Signature>, multisig_pk: MultiSigPublicKey) -> SuiResult<Self> {
        let indexed = full_sigs
            .iter()
            .map(|s| {
                let pk = s.to_public_key()?;
                let index = multisig_pk
                    .get_index(&pk)
                    .ok_or_else(|| SuiError::aggregation(format!("pk does not exist: {pk:?}")))?;
                Ok((index, s.to_compressed()?))
            })
            .collect::<SuiResult<Vec<_>>>()?;
        Self::aggregate(multisig_pk, indexed)
    }

    /// Builds a multisig from `(index into pk_map, signature)` pairs. The pairs are sorted by
    /// index here, so the caller's order does not matter.
    pub fn aggregate(
        multisig_pk: MultiSigPublicKey,
        mut indexed_sigs: Vec<(u8, CompressedSignature)>,
    ) -> SuiResult<Self> {
        multisig_pk.validate()?;
        fp_ensure!(
            !indexed_sigs.is_empty() && indexed_sigs.len() <= multisig_pk.pk_map.len(),
            SuiError::aggregation(format!(
                "got {} signature(s) for {} key(s)",
                indexed_sigs.len(),
                multisig_pk.pk_map.len()
            ))
        );
        indexed_sigs.sort_by_key(|(index, _)| *index);

        let mut bitmap: BitmapUnit = 0;
        let mut sigs = Vec::with_capacity(indexed_sigs.len());
        for (index, sig) in indexed_sigs {
            let (pk, _) = multisig_pk
                .pk_map
                .get(index as usize)
                .ok_or_else(|| SuiError::aggregation(format!("no public key at index {index}")))?;
            fp_ensure!(
                bitmap & (1 << index) == 0,
                SuiError::aggregation(format!("duplicate signature for index {index}"))
            );
            fp_ensure!(
                pk.scheme() == sig.scheme(),
                SuiError::aggregation(format!(
                    "{} signature for {} key at index {index}",
                    sig.scheme(),
                    pk.scheme()
                ))
            );
            bitmap |= 1 << index;
            sigs.push(sig);
        }
        debug!(bitmap, signers = sigs.len(), "aggregated multisig");
        Ok(Self::new(sigs, bitmap, multisig_pk))
    }

    /// Structural checks: signature count agrees with the bitmap, and the key set is valid.
    pub fn validate(&self) -> SuiResult {
        let indices = as_indices(self.bitmap)?;
        fp_ensure!(
            !self.sigs.is_empty() && self.sigs.len() <= self.multisig_pk.pk_map.len(),
            SuiError::aggregation("invalid number of signatures")
        );
        fp_ensure!(
            indices.len() == self.sigs.len(),
            SuiError::aggregation(format!(
                "bitmap has {} bit(s) set but there are {} signature(s)",
                indices.len(),
                self.sigs.len()
            ))
        );
        for (sig, index) in self.sigs.iter().zip(&indices) {
            let (pk, _) = self
                .multisig_pk
                .pk_map
                .get(*index as usize)
                .ok_or_else(|| SuiError::aggregation(format!("no public key at index {index}")))?;
            fp_ensure!(
                pk.scheme() == sig.scheme(),
                SuiError::aggregation(format!("scheme mismatch at index {index}"))
            );
        }
        self.multisig_pk.validate()
    }

    /// Sum of the weights of the keys whose bits are set.
    pub fn weight(&self) -> SuiResult<ThresholdUnit> {
        Ok(as_indices(self.bitmap)?
            .into_iter()
            .filter_map(|i| self.multisig_pk.pk_map.get(i as usize))
            .map(|(_, w)| *w as ThresholdUnit)
            .sum())
    }

    /// Whether the participating weight reaches the threshold. The network makes the final
    /// call after verifying each signature.
    pub fn is_satisfied(&self) -> bool {
        self.weight()
            .map(|w| w >= self.multisig_pk.threshold)
            .unwrap_or(false)
    }

    pub fn get_pk(&self) -> &MultiSigPublicKey {
        &self.multisig_pk
    }

    pub fn get_sigs(&self) -> &[CompressedSignature] {
        &self.sigs
    }

    pub fn get_bitmap(&self) -> BitmapUnit {
        self.bitmap
    }

    pub fn get_indices(&self) -> SuiResult<Vec<u8>> {
        as_indices(self.bitmap)
    }

    /// `0x03 || bcs(self)`.
    pub fn to_bytes(&self) -> SuiResult<Vec<u8>> {
        self.bytes
            .get_or_try_init(|| -> SuiResult<Vec<u8>> {
                let as_bytes = bcs::to_bytes(self)?;
                let mut bytes = Vec::with_capacity(1 + as_bytes.len());
                bytes.push(SignatureScheme::MultiSig.flag());
                bytes.extend_from_slice(&as_bytes);
                Ok(bytes)
            })
            .cloned()
    }

    pub fn from_bytes(bytes: &[u8]) -> SuiResult<Self> {
        let (flag, rest) = bytes.split_first().ok_or(SuiError::InvalidLength {
            expected: 1,
            actual: 0,
        })?;
        fp_ensure!(
            *flag == SignatureScheme::MultiSig.flag(),
            SuiError::InvalidSignatureScheme(*flag)
        );
        let multisig: MultiSig = bcs::from_bytes(rest)?;
        multisig.validate()?;
        Ok(multisig)
    }
}

impl FromStr for MultiSig {
    type Err = SuiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MultiSig::from_bytes(&decode_base64(s)?)
    }
}

/// The struct that contains the public key used for authenticating a MultiSig.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MultiSigPublicKey {
    /// A list of public key and its corresponding weight.
    pk_map: Vec<(PublicKey, WeightUnit)>,
    /// If the total weight of the public keys corresponding to verified signatures is larger
    /// than threshold, the MultiSig is verified.
    threshold: ThresholdUnit,
}

impl MultiSigPublicKey {
    /// Construct MultiSigPublicKey from its fields, without checking them.
    pub fn construct(pk_map: Vec<(PublicKey, WeightUnit)>, threshold: ThresholdUnit) -> Self {
        Self { pk_map, threshold }
    }

    pub fn new(
        pks: Vec<PublicKey>,
        weights: Vec<WeightUnit>,
        threshold: ThresholdUnit,
    ) -> SuiResult<Self> {
        fp_ensure!(
            pks.len() == weights.len(),
            SuiError::InvalidSignature {
                error: format!("{} keys but {} weights", pks.len(), weights.len()),
            }
        );
        let multisig_pk = MultiSigPublicKey {
            pk_map: pks.into_iter().zip(weights).collect(),
            threshold,
        };
        multisig_pk.validate()?;
        Ok(multisig_pk)
    }

    pub fn get_index(&self, pk: &PublicKey) -> Option<u8> {
        self.pk_map.iter().position(|x| &x.0 == pk).map(|x| x as u8)
    }

    pub fn threshold(&self) -> &ThresholdUnit {
        &self.threshold
    }

    pub fn pubkeys(&self) -> &Vec<(PublicKey, WeightUnit)> {
        &self.pk_map
    }

    pub fn validate(&self) -> SuiResult {
        let pk_map = self.pubkeys();
        let invalid = |error: &str| SuiError::InvalidSignature {
            error: format!("invalid multisig public key: {error}"),
        };
        fp_ensure!(self.threshold != 0, invalid("zero threshold"));
        fp_ensure!(!pk_map.is_empty(), invalid("no keys"));
        fp_ensure!(
            pk_map.len() <= MAX_SIGNER_IN_MULTISIG,
            invalid("too many keys")
        );
        fp_ensure!(
            pk_map.iter().all(|(_, weight)| *weight != 0),
            invalid("zero weight")
        );
        fp_ensure!(
            pk_map
                .iter()
                .enumerate()
                .all(|(i, (pk, _))| pk_map[..i].iter().all(|(other, _)| other != pk)),
            invalid("duplicate key")
        );
        let total: ThresholdUnit = pk_map.iter().map(|(_, w)| *w as ThresholdUnit).sum();
        fp_ensure!(total >= self.threshold, invalid("unreachable threshold"));
        Ok(())
    }
}

impl From<&MultiSigPublicKey> for SuiAddress {
    /// Blake2b-256 over `0x03 || threshold (LE) || flag_1 || pk_1 || weight_1 || ...`.
    fn from(multisig_pk: &MultiSigPublicKey) -> Self {
        let mut hasher = DefaultHash::default();
        hasher.update([SignatureScheme::MultiSig.flag()]);
        hasher.update(multisig_pk.threshold().to_le_bytes());
        for (pk, w) in multisig_pk.pubkeys() {
            hasher.update([pk.flag()]);
            hasher.update(pk);
            hasher.update(w.to_le_bytes());
        }
        SuiAddress::new(hasher.finalize())
    }
}
