// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use serde_json::Value;
use std::str::FromStr;
use sui_transaction_core::base_types::{dbg_addr, ObjectID, SequenceNumber};
use sui_transaction_core::digests::ObjectDigest;
use sui_transaction_core::programmable_transaction_builder::ProgrammableTransactionBuilder;
use sui_transaction_core::transaction::TransactionData;
use sui_transaction_core::type_tag::{StructTag, TypeTag};

#[test]
fn test_struct_tag_display_keeps_leading_zero() {
    let tag = StructTag::from_str("0x7f89cdffd8968affa0b47bef91adc5314e19509080470c45bfd434cd83a766b::suifrens::SuiFren<0x7f89cdffd8968affa0b47bef91adc5314e19509080470c45bfd434cd83a766b::capy::Capy>").unwrap();

    // display should not trim the leading 0
    let text = tag.to_string();
    assert_eq!(text, "0x07f89cdffd8968affa0b47bef91adc5314e19509080470c45bfd434cd83a766b::suifrens::SuiFren<0x07f89cdffd8968affa0b47bef91adc5314e19509080470c45bfd434cd83a766b::capy::Capy>");

    let tag2 = StructTag::from_str(&text).unwrap();
    assert_eq!(tag, tag2);
}

#[test]
fn test_type_tag_json() {
    let tag = TypeTag::vector(TypeTag::U8);
    let json = serde_json::to_value(&tag).unwrap();
    assert_eq!(json, serde_json::json!({ "vector": "u8" }));
    assert_eq!(serde_json::from_value::<TypeTag>(json).unwrap(), tag);
}

#[test]
fn test_transaction_data_json_round_trip() {
    let mut builder = ProgrammableTransactionBuilder::new();
    builder.transfer_sui(dbg_addr(2), Some(100)).unwrap();
    let gas = (
        ObjectID::from_str("0x5").unwrap(),
        SequenceNumber::from_u64(1),
        ObjectDigest::new([3; 32]),
    );
    let data = TransactionData::new_programmable(dbg_addr(1), vec![gas], builder.finish(), 10, 1);

    let json = serde_json::to_value(&data).unwrap();
    let Value::String(sender) = &json["V1"]["sender"] else {
        panic!("sender should be a hex string: {json}")
    };
    assert_eq!(sender, &dbg_addr(1).to_string());
    let Value::String(digest) = &json["V1"]["gas_data"]["payment"][0][2] else {
        panic!("digest should be a base58 string: {json}")
    };
    assert_eq!(digest, &ObjectDigest::new([3; 32]).to_string());

    let back: TransactionData = serde_json::from_value(json).unwrap();
    assert_eq!(back, data);
    assert_eq!(back.to_bytes().unwrap(), data.to_bytes().unwrap());
}
