// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[macro_export]
macro_rules! fp_bail {
    ($e:expr) => {
        return Err($e)
    };
}

#[macro_export(local_inner_macros)]
macro_rules! fp_ensure {
    ($cond:expr, $e:expr) => {
        if !($cond) {
            fp_bail!($e);
        }
    };
}

pub type SuiResult<T = ()> = Result<T, SuiError>;

/// Construction, encoding and framing errors.
///
/// Every variant describes a caller bug scoped to the single value, graph or signature being
/// built. None of them are transient, so none of them should be retried.
#[derive(Eq, PartialEq, Clone, Debug, Serialize, Deserialize, Error, Hash)]
pub enum SuiError {
    // Codec
    #[error("Value does not match its declared type: {error}")]
    TypeMismatch { error: String },
    /// Position fields are `None` when the decoder that failed does not report them.
    #[error("Input ended early{}", truncation_detail(.offset, .needed))]
    TruncatedInput {
        offset: Option<usize>,
        needed: Option<usize>,
    },
    #[error("Unexpected bytes left after decoding{}", remaining_detail(.remaining))]
    TrailingBytes { remaining: Option<usize> },
    #[error("Non-canonical encoding: {error}")]
    NonCanonicalEncoding { error: String },
    #[error("BCS (de)serialization failed: {error}")]
    BcsError { error: String },

    // Type tags
    #[error("Invalid Move identifier: {0:?}")]
    InvalidIdentifier(String),
    #[error("Failed to parse {what}: {error}")]
    ParseError { what: String, error: String },

    // Programmable transaction graph
    #[error("Invalid argument reference: {error}")]
    GraphReferenceError { error: String },
    #[error("Conflicting object arguments for {object_id}: {error}")]
    ObjectArgMismatch { object_id: String, error: String },
    #[error("Size limit exceeded: {limit} is {value}")]
    SizeLimitExceeded { limit: String, value: String },
    #[error("Invalid transaction: {error}")]
    InvalidTransaction { error: String },

    // Signatures
    #[error("Expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("Unknown signature scheme flag: {0}")]
    InvalidSignatureScheme(u8),
    #[error("Signature is not valid: {error}")]
    InvalidSignature { error: String },
    #[error("Multisig aggregation failed: {error}")]
    AggregationError { error: String },
}

impl SuiError {
    pub fn type_mismatch(error: impl Into<String>) -> Self {
        SuiError::TypeMismatch {
            error: error.into(),
        }
    }

    pub fn graph(error: impl Into<String>) -> Self {
        SuiError::GraphReferenceError {
            error: error.into(),
        }
    }

    pub fn aggregation(error: impl Into<String>) -> Self {
        SuiError::AggregationError {
            error: error.into(),
        }
    }

    pub fn parse(what: &str, error: impl Into<String>) -> Self {
        SuiError::ParseError {
            what: what.to_string(),
            error: error.into(),
        }
    }

    pub fn size_limit(limit: &str, value: impl ToString) -> Self {
        SuiError::SizeLimitExceeded {
            limit: limit.to_string(),
            value: value.to_string(),
        }
    }
}

fn truncation_detail(offset: &Option<usize>, needed: &Option<usize>) -> String {
    match (offset, needed) {
        (Some(offset), Some(needed)) => {
            format!(": needed {needed} more byte(s) at offset {offset}")
        }
        _ => String::new(),
    }
}

fn remaining_detail(remaining: &Option<usize>) -> String {
    remaining
        .map(|n| format!(": {n} byte(s)"))
        .unwrap_or_default()
}

impl From<bcs::Error> for SuiError {
    fn from(error: bcs::Error) -> Self {
        match error {
            bcs::Error::Eof => SuiError::TruncatedInput {
                offset: None,
                needed: None,
            },
            bcs::Error::RemainingInput => SuiError::TrailingBytes { remaining: None },
            bcs::Error::NonCanonicalUleb128Encoding | bcs::Error::ExpectedBoolean => {
                SuiError::NonCanonicalEncoding {
                    error: error.to_string(),
                }
            }
            other => SuiError::BcsError {
                error: other.to_string(),
            },
        }
    }
}
