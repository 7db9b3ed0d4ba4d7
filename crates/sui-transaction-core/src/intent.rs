// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use strum_macros::EnumIter;

use crate::error::{SuiError, SuiResult};

#[cfg(test)]
#[path = "unit_tests/intent_tests.rs"]
mod intent_tests;

pub const INTENT_PREFIX_LENGTH: usize = 3;

/// `IntentScope` is required to guarantee two different intents will never collide.
///
/// Each scope has a byte assigned explicitly. A value used once must never be reassigned to a
/// different scope.
#[derive(
    Serialize_repr, Deserialize_repr, Copy, Clone, PartialEq, Eq, Debug, Hash, EnumIter,
)]
#[repr(u8)]
pub enum IntentScope {
    TransactionData = 0,
    TransactionEffects = 1,
    CheckpointSummary = 2,
    PersonalMessage = 3,
}

impl IntentScope {
    /// The 3-byte prefix for this scope under the current version and app id.
    pub fn tag_bytes(&self) -> [u8; INTENT_PREFIX_LENGTH] {
        Intent {
            scope: *self,
            version: IntentVersion::V0,
            app_id: AppId::Sui,
        }
        .to_bytes()
    }
}

impl TryFrom<u8> for IntentScope {
    type Error = SuiError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        bcs::from_bytes(&[value]).map_err(|_| SuiError::parse("intent scope", value.to_string()))
    }
}

#[derive(Serialize_repr, Deserialize_repr, Copy, Clone, PartialEq, Eq, Debug, Hash, Default)]
#[repr(u8)]
pub enum IntentVersion {
    #[default]
    V0 = 0,
}

impl TryFrom<u8> for IntentVersion {
    type Error = SuiError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        bcs::from_bytes(&[value]).map_err(|_| SuiError::parse("intent version", value.to_string()))
    }
}

#[derive(Serialize_repr, Deserialize_repr, Copy, Clone, PartialEq, Eq, Debug, Hash, Default)]
#[repr(u8)]
pub enum AppId {
    #[default]
    Sui = 0,
}

impl TryFrom<u8> for AppId {
    type Error = SuiError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        bcs::from_bytes(&[value]).map_err(|_| SuiError::parse("app id", value.to_string()))
    }
}

/// Domain separation prefix for everything that gets signed. BCS lays it out as
/// `[scope, version, app_id]`.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Intent {
    pub scope: IntentScope,
    pub version: IntentVersion,
    pub app_id: AppId,
}

impl Intent {
    pub fn to_bytes(&self) -> [u8; INTENT_PREFIX_LENGTH] {
        [self.scope as u8, self.version as u8, self.app_id as u8]
    }

    pub fn from_bytes(bytes: &[u8]) -> SuiResult<Self> {
        fp_ensure!(
            bytes.len() == INTENT_PREFIX_LENGTH,
            SuiError::InvalidLength {
                expected: INTENT_PREFIX_LENGTH,
                actual: bytes.len(),
            }
        );
        Ok(Self {
            scope: bytes[0].try_into()?,
            version: bytes[1].try_into()?,
            app_id: bytes[2].try_into()?,
        })
    }

    pub fn sui_app(scope: IntentScope) -> Self {
        Self {
            scope,
            version: IntentVersion::V0,
            app_id: AppId::Sui,
        }
    }

    pub fn sui_transaction() -> Self {
        Self::sui_app(IntentScope::TransactionData)
    }

    pub fn personal_message() -> Self {
        Self::sui_app(IntentScope::PersonalMessage)
    }

    pub fn with_scope(mut self, scope: IntentScope) -> Self {
        self.scope = scope;
        self
    }
}

impl FromStr for Intent {
    type Err = SuiError;

    /// Parses the hex form of the 3-byte prefix, e.g. `"000000"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| SuiError::parse("intent", e.to_string()))?;
        Self::from_bytes(&bytes)
    }
}

/// A payload paired with the intent it will be signed under.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone, Hash)]
pub struct IntentMessage<T> {
    pub intent: Intent,
    pub value: T,
}

impl<T> IntentMessage<T> {
    pub fn new(intent: Intent, value: T) -> Self {
        Self { intent, value }
    }
}

impl<T: Serialize> IntentMessage<T> {
    /// The bytes that get hashed for signing: the intent prefix followed by `bcs(value)`.
    pub fn to_bytes(&self) -> SuiResult<Vec<u8>> {
        Ok(bcs::to_bytes(self)?)
    }
}

/// A message a user signs outside of any transaction.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone, Hash)]
pub struct PersonalMessage {
    pub message: Vec<u8>,
}

/// Prefixes already-encoded payload bytes with the scope's intent bytes. No hashing happens here.
pub fn wrap(scope: IntentScope, payload: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(INTENT_PREFIX_LENGTH + payload.len());
    bytes.extend_from_slice(&scope.tag_bytes());
    bytes.extend_from_slice(payload);
    bytes
}
