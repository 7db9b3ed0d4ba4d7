// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0
#![warn(
    future_incompatible,
    nonstandard_style,
    rust_2018_idioms,
    rust_2021_compatibility
)]

//! Client-side construction of Sui transactions: canonical encoding, programmable transaction
//! graphs, intent framing for signing, and signature aggregation.

use base_types::{ObjectID, SequenceNumber, SuiAddress};

#[macro_use]
pub mod error;

pub mod base_types;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod digests;
pub mod intent;
pub mod multisig;
pub mod object_cache;
pub mod programmable_transaction_builder;
pub mod signature;
pub mod sui_serde;
pub mod transaction;
pub mod type_tag;

#[cfg(test)]
#[path = "unit_tests/utils.rs"]
mod test_utils;

/// 0x1-- account address where Move stdlib modules are stored
/// Same as the ObjectID
pub const MOVE_STDLIB_ADDRESS: SuiAddress = SuiAddress::from_suffix(0x1);
pub const MOVE_STDLIB_PACKAGE_ID: ObjectID = ObjectID::from_suffix(0x1);

/// 0x2-- account address where sui framework modules are stored
/// Same as the ObjectID
pub const SUI_FRAMEWORK_ADDRESS: SuiAddress = SuiAddress::from_suffix(0x2);
pub const SUI_FRAMEWORK_PACKAGE_ID: ObjectID = ObjectID::from_suffix(0x2);

/// 0x3-- account address where sui system modules are stored
pub const SUI_SYSTEM_ADDRESS: SuiAddress = SuiAddress::from_suffix(0x3);
pub const SUI_SYSTEM_PACKAGE_ID: ObjectID = ObjectID::from_suffix(0x3);

/// 0x5: hardcoded object ID for the singleton sui system state object.
pub const SUI_SYSTEM_STATE_OBJECT_ID: ObjectID = ObjectID::from_suffix(0x5);
pub const SUI_SYSTEM_STATE_OBJECT_SHARED_VERSION: SequenceNumber = SequenceNumber::from_u64(1);

/// 0x6: hardcoded object ID for the singleton clock object.
pub const SUI_CLOCK_OBJECT_ID: ObjectID = ObjectID::from_suffix(0x6);
pub const SUI_CLOCK_OBJECT_SHARED_VERSION: SequenceNumber = SequenceNumber::from_u64(1);
