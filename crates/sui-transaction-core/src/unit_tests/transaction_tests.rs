// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;

use super::*;
use crate::base_types::{dbg_addr, dbg_object_id, random_object_ref};
use crate::crypto::SignatureScheme;
use crate::test_utils::keys;
use crate::SUI_FRAMEWORK_PACKAGE_ID;

fn pure_u64(v: u64) -> CallArg {
    CallArg::Pure(bcs::to_bytes(&v).unwrap())
}

fn pt(inputs: Vec<CallArg>, commands: Vec<Command>) -> ProgrammableTransaction {
    ProgrammableTransaction { inputs, commands }
}

fn noop_call(arguments: Vec<Argument>) -> Command {
    Command::move_call(
        SUI_FRAMEWORK_PACKAGE_ID,
        crate::ident!("m"),
        crate::ident!("f"),
        vec![],
        arguments,
    )
}

fn split_two() -> Command {
    Command::SplitCoins(Argument::GasCoin, vec![Argument::Input(0), Argument::Input(0)])
}

fn assert_graph_error(tx: ProgrammableTransaction) {
    assert!(
        matches!(tx.validate(), Err(SuiError::GraphReferenceError { .. })),
        "{tx}"
    );
}

#[test]
fn test_input_references() {
    pt(vec![pure_u64(1)], vec![split_two()]).validate().unwrap();
    assert_graph_error(pt(vec![], vec![split_two()]));
}

#[test]
fn test_result_must_point_backwards() {
    // A command cannot consume its own result.
    assert_graph_error(pt(
        vec![pure_u64(1)],
        vec![Command::TransferObjects(vec![Argument::Result(0)], Argument::Input(0))],
    ));
    // Nor a later one.
    assert_graph_error(pt(
        vec![pure_u64(1)],
        vec![
            Command::TransferObjects(vec![Argument::Result(1)], Argument::Input(0)),
            noop_call(vec![]),
        ],
    ));
}

#[test]
fn test_result_arity() {
    let inputs = vec![pure_u64(1)];

    // SplitCoins with two amounts has two results, so plain Result is ambiguous.
    assert_graph_error(pt(
        inputs.clone(),
        vec![
            split_two(),
            Command::TransferObjects(vec![Argument::Result(0)], Argument::Input(0)),
        ],
    ));
    pt(
        inputs.clone(),
        vec![
            split_two(),
            Command::TransferObjects(
                vec![Argument::NestedResult(0, 0), Argument::NestedResult(0, 1)],
                Argument::Input(0),
            ),
        ],
    )
    .validate()
    .unwrap();
    assert_graph_error(pt(
        inputs.clone(),
        vec![
            split_two(),
            Command::TransferObjects(vec![Argument::NestedResult(0, 2)], Argument::Input(0)),
        ],
    ));

    // Commands without results.
    assert_graph_error(pt(
        inputs.clone(),
        vec![
            Command::MergeCoins(Argument::GasCoin, vec![]),
            noop_call(vec![Argument::Result(0)]),
        ],
    ));
    assert_graph_error(pt(
        inputs.clone(),
        vec![
            Command::MergeCoins(Argument::GasCoin, vec![]),
            noop_call(vec![Argument::NestedResult(0, 0)]),
        ],
    ));

    // Move call results are unknown here and are left to the network.
    pt(
        inputs,
        vec![
            noop_call(vec![]),
            noop_call(vec![Argument::Result(0), Argument::NestedResult(0, 5)]),
        ],
    )
    .validate()
    .unwrap();
}

#[test]
fn test_command_shapes() {
    assert!(matches!(
        pt(vec![], vec![Command::MakeMoveVec(None, vec![])]).validate(),
        Err(SuiError::TypeMismatch { .. })
    ));
    pt(vec![], vec![Command::MakeMoveVec(Some(TypeTag::U8), vec![])])
        .validate()
        .unwrap();
    assert!(matches!(
        pt(vec![], vec![Command::Publish(vec![], vec![])]).validate(),
        Err(SuiError::InvalidTransaction { .. })
    ));
    assert!(matches!(
        pt(vec![pure_u64(1)], vec![Command::TransferObjects(vec![], Argument::Input(0))])
            .validate(),
        Err(SuiError::InvalidTransaction { .. })
    ));
    assert!(matches!(
        pt(vec![], vec![Command::SplitCoins(Argument::GasCoin, vec![])]).validate(),
        Err(SuiError::InvalidTransaction { .. })
    ));
    // Merging no sources is a no-op and stays valid.
    Command::MergeCoins(Argument::GasCoin, vec![])
        .validate_shape()
        .unwrap();
    pt(vec![], vec![Command::MergeCoins(Argument::GasCoin, vec![])])
        .validate()
        .unwrap();
}

#[test]
fn test_duplicate_object_inputs() {
    let object_ref = random_object_ref();
    let tx = pt(
        vec![
            CallArg::Object(ObjectArg::ImmOrOwnedObject(object_ref)),
            CallArg::Object(ObjectArg::Receiving(object_ref)),
        ],
        vec![],
    );
    assert!(matches!(
        tx.validate(),
        Err(SuiError::ObjectArgMismatch { .. })
    ));
}

#[test]
fn test_limits() {
    let limits = ProtocolLimits {
        max_programmable_tx_commands: 1,
        max_pure_argument_size: 4,
        ..Default::default()
    };
    let two_commands = pt(vec![], vec![noop_call(vec![]), noop_call(vec![])]);
    assert!(matches!(
        two_commands.validate_with_limits(&limits),
        Err(SuiError::SizeLimitExceeded { .. })
    ));
    let big_pure = pt(vec![pure_u64(1)], vec![]);
    assert!(matches!(
        big_pure.validate_with_limits(&limits),
        Err(SuiError::SizeLimitExceeded { .. })
    ));

    let deep = (0..20).fold(TypeTag::U8, |t, _| TypeTag::vector(t));
    let deep_vec = pt(vec![], vec![Command::MakeMoveVec(Some(deep), vec![])]);
    assert!(matches!(
        deep_vec.validate(),
        Err(SuiError::SizeLimitExceeded { .. })
    ));
}

#[test]
fn test_wire_discriminants() {
    assert_eq!(bcs::to_bytes(&Argument::GasCoin).unwrap(), vec![0]);
    assert_eq!(bcs::to_bytes(&Argument::Input(1)).unwrap(), vec![1, 1, 0]);
    assert_eq!(bcs::to_bytes(&Argument::Result(2)).unwrap(), vec![2, 2, 0]);
    assert_eq!(
        bcs::to_bytes(&Argument::NestedResult(2, 3)).unwrap(),
        vec![3, 2, 0, 3, 0]
    );

    assert_eq!(
        bcs::to_bytes(&CallArg::Pure(vec![1, 2])).unwrap(),
        vec![0, 2, 1, 2]
    );
    let shared = CallArg::Object(ObjectArg::SharedObject {
        id: dbg_object_id(1),
        initial_shared_version: SequenceNumber::from_u64(1),
        mutable: true,
    });
    let bytes = bcs::to_bytes(&shared).unwrap();
    assert_eq!(&bytes[..2], &[1, 1]);
    assert_eq!(bytes.len(), 2 + 32 + 8 + 1);

    let first_byte = |c: Command| bcs::to_bytes(&c).unwrap()[0];
    assert_eq!(first_byte(noop_call(vec![])), 0);
    assert_eq!(
        first_byte(Command::TransferObjects(vec![], Argument::GasCoin)),
        1
    );
    assert_eq!(first_byte(Command::SplitCoins(Argument::GasCoin, vec![])), 2);
    assert_eq!(first_byte(Command::MergeCoins(Argument::GasCoin, vec![])), 3);
    assert_eq!(first_byte(Command::Publish(vec![], vec![])), 4);
    assert_eq!(first_byte(Command::MakeMoveVec(None, vec![])), 5);
    assert_eq!(
        first_byte(Command::Upgrade(
            vec![],
            vec![],
            dbg_object_id(1),
            Argument::GasCoin
        )),
        6
    );
}

#[test]
fn test_pure_args_match_bcs() {
    assert_eq!(PureArg::u64(1000).encode().unwrap(), bcs::to_bytes(&1000u64).unwrap());
    assert_eq!(
        PureArg::string("hello").encode().unwrap(),
        bcs::to_bytes("hello").unwrap()
    );
    assert_eq!(
        PureArg::bytes([1u8, 2, 3]).encode().unwrap(),
        bcs::to_bytes(&vec![1u8, 2, 3]).unwrap()
    );
    assert_eq!(
        PureArg::option(BasePureType::U8, Some(MoveValue::U8(4)))
            .encode()
            .unwrap(),
        bcs::to_bytes(&Some(4u8)).unwrap()
    );
    assert_eq!(
        PureArg::option(BasePureType::U8, None).encode().unwrap(),
        vec![0]
    );
    assert_eq!(
        PureArg::id(dbg_object_id(7)).encode().unwrap(),
        vec![7; 32]
    );
    assert_eq!(
        PureArg::address(dbg_addr(8)).encode().unwrap(),
        bcs::to_bytes(&dbg_addr(8)).unwrap()
    );
    assert_eq!(
        PureArg::u256(U256::ONE).encode().unwrap().len(),
        32
    );
}

#[test]
fn test_pure_arg_type_mismatch() {
    assert!(matches!(
        PureArg::new(MoveValue::U8(1), BasePureType::U64).encode(),
        Err(SuiError::TypeMismatch { .. })
    ));
    assert!(matches!(
        PureArg::option(BasePureType::U8, Some(MoveValue::Bool(true))).encode(),
        Err(SuiError::TypeMismatch { .. })
    ));
    let two = PureArg::new(
        MoveValue::Struct(vec![MoveValue::Vector(vec![MoveValue::U8(1), MoveValue::U8(2)])]),
        BasePureType::option(BasePureType::U8),
    );
    assert!(matches!(two.encode(), Err(SuiError::TypeMismatch { .. })));
    assert!(matches!(
        PureArg::decode(&[2, 1, 2], BasePureType::option(BasePureType::U8)),
        Err(SuiError::NonCanonicalEncoding { .. })
    ));
}

#[test]
fn test_pure_string_must_be_utf8() {
    let invalid = PureArg::new(
        MoveValue::Struct(vec![MoveValue::vector_u8([0xff, 0xfe])]),
        BasePureType::String,
    );
    assert!(matches!(invalid.encode(), Err(SuiError::TypeMismatch { .. })));
    let mut builder = ProgrammableTransactionBuilder::new();
    assert!(matches!(
        builder.pure_typed(invalid),
        Err(SuiError::TypeMismatch { .. })
    ));
    assert!(builder.finish().inputs.is_empty());

    assert!(matches!(
        PureArg::decode(&[2, 0xff, 0xfe], BasePureType::String),
        Err(SuiError::TypeMismatch { .. })
    ));

    // Nested inside vectors and options.
    let nested = BasePureType::option(BasePureType::vector(BasePureType::String));
    let bad_nested = PureArg::new(
        MoveValue::Struct(vec![MoveValue::Vector(vec![MoveValue::Vector(vec![
            MoveValue::string("ok"),
            MoveValue::Struct(vec![MoveValue::vector_u8([0xc3])]),
        ])])]),
        nested.clone(),
    );
    assert!(matches!(
        bad_nested.encode(),
        Err(SuiError::TypeMismatch { .. })
    ));
    // Some([ "ok", "\xc3" ])
    assert!(matches!(
        PureArg::decode(&[1, 2, 2, b'o', b'k', 1, 0xc3], nested.clone()),
        Err(SuiError::TypeMismatch { .. })
    ));

    let valid = PureArg::new(
        MoveValue::Struct(vec![MoveValue::Vector(vec![MoveValue::Vector(vec![
            MoveValue::string("ok"),
            MoveValue::string("héllo"),
        ])])]),
        nested.clone(),
    );
    let bytes = valid.encode().unwrap();
    assert_eq!(PureArg::decode(&bytes, nested).unwrap(), valid);
}

#[test]
fn test_pure_arg_decode() {
    let arg = PureArg::option(
        BasePureType::vector(BasePureType::U16),
        Some(MoveValue::Vector(vec![MoveValue::U16(1), MoveValue::U16(2)])),
    );
    let bytes = arg.encode().unwrap();
    assert_eq!(PureArg::decode(&bytes, arg.type_.clone()).unwrap(), arg);
    assert!(PureArg::decode(&bytes[1..], arg.type_.clone()).is_err());
}

#[test]
fn test_base_pure_type_from_type_tag() {
    let tag: TypeTag = "0x1::option::Option<vector<0x1::string::String>>".parse().unwrap();
    let pure = BasePureType::try_from(&tag).unwrap();
    assert_eq!(
        pure,
        BasePureType::option(BasePureType::vector(BasePureType::String))
    );
    assert_eq!(pure.type_tag(), tag);
    assert_eq!(
        BasePureType::try_from(&TypeTag::object_id()).unwrap(),
        BasePureType::ID
    );
    assert!(BasePureType::try_from(&TypeTag::Signer).is_err());
    assert!(BasePureType::try_from(&"0x2::coin::Coin<0x2::sui::SUI>".parse::<TypeTag>().unwrap()).is_err());
}

fn transfer_data(budget: u64) -> TransactionData {
    TransactionData::new_transfer_sui(
        dbg_addr(2),
        dbg_addr(1),
        Some(1000),
        (dbg_object_id(9), SequenceNumber::from_u64(3), Default::default()),
        budget,
        1000,
    )
    .unwrap()
}

#[test]
fn test_transaction_data_bytes_and_digest() {
    let data = transfer_data(10_000);
    let bytes = data.to_bytes().unwrap();
    // V1, then the programmable transaction kind.
    assert_eq!(&bytes[..2], &[0, 0]);
    assert_eq!(TransactionData::from_bytes(&bytes).unwrap(), data);

    assert_eq!(data.digest().unwrap(), transfer_data(10_000).digest().unwrap());
    assert_ne!(data.digest().unwrap(), transfer_data(10_001).digest().unwrap());
    assert_eq!(
        data.digest().unwrap(),
        TransactionDigest::from_transaction_bytes(&bytes)
    );

    let mut trailing = bytes.clone();
    trailing.push(0);
    assert!(TransactionData::from_bytes(&trailing).is_err());
}

#[test]
fn test_transfer_sui_shape() {
    let data = transfer_data(10_000);
    let pt = data.programmable_transaction();
    assert_eq!(pt.inputs.len(), 2);
    assert_eq!(
        pt.commands,
        vec![
            Command::SplitCoins(Argument::GasCoin, vec![Argument::Input(1)]),
            Command::TransferObjects(vec![Argument::Result(0)], Argument::Input(0)),
        ]
    );
    pt.validate().unwrap();
    assert_eq!(data.sender(), dbg_addr(1));
    assert!(!data.is_sponsored_tx());
}

#[test]
fn test_sponsor_and_expiration() {
    let data = TransactionData::new_programmable_allow_sponsor(
        dbg_addr(1),
        vec![random_object_ref()],
        pt(vec![], vec![]),
        100,
        1,
        dbg_addr(2),
    )
    .with_expiration(TransactionExpiration::Epoch(5));
    assert!(data.is_sponsored_tx());
    assert_eq!(data.gas_owner(), dbg_addr(2));
    assert_eq!(data.expiration(), &TransactionExpiration::Epoch(5));
}

#[test]
fn test_validate_size() {
    let data = transfer_data(10_000);
    data.validate_size(&ProtocolLimits::default()).unwrap();

    let tiny = ProtocolLimits {
        max_tx_size_bytes: 10,
        ..Default::default()
    };
    assert!(matches!(
        data.validate_size(&tiny),
        Err(SuiError::SizeLimitExceeded { .. })
    ));

    let no_gas = TransactionData::new_programmable(dbg_addr(1), vec![], pt(vec![], vec![]), 1, 1);
    assert!(matches!(
        no_gas.validate_size(&ProtocolLimits::default()),
        Err(SuiError::InvalidTransaction { .. })
    ));
}

#[test]
fn test_signed_transaction() {
    let keys = keys();
    let data = transfer_data(10_000);
    let tx =
        Transaction::from_data_and_signer(data.clone(), vec![&keys[0] as &dyn SuiSigner]).unwrap();
    assert_eq!(tx.tx_signatures.len(), 1);
    assert_eq!(tx.tx_signatures[0].scheme(), SignatureScheme::ED25519);
    assert_eq!(tx.intent_message.intent, Intent::sui_transaction());
    assert_eq!(tx.digest().unwrap(), data.digest().unwrap());
    tx.validate(&ProtocolLimits::default()).unwrap();

    let (tx_bytes, signatures) = tx.to_tx_bytes_and_signatures().unwrap();
    assert_eq!(BASE64_STANDARD.decode(tx_bytes).unwrap(), data.to_bytes().unwrap());
    assert_eq!(signatures, vec![tx.tx_signatures[0].encode_base64().unwrap()]);

    let signers: Vec<&dyn SuiSigner> = vec![&keys[0], &keys[1]];
    let sponsored = Transaction::from_data_and_signer(data.clone(), signers).unwrap();
    assert_eq!(sponsored.tx_signatures.len(), 2);

    let unsigned = Transaction::from_data(data, vec![]);
    assert!(matches!(
        unsigned.validate(&ProtocolLimits::default()),
        Err(SuiError::InvalidSignature { .. })
    ));
}

#[test]
fn test_shared_inputs_and_move_calls() {
    let tx = pt(
        vec![CallArg::CLOCK_IMM, pure_u64(3)],
        vec![noop_call(vec![Argument::Input(0), Argument::Input(1)])],
    );
    tx.validate().unwrap();
    let shared: Vec<_> = tx.shared_input_objects().collect();
    assert_eq!(
        shared,
        vec![SharedInputObject {
            id: SUI_CLOCK_OBJECT_ID,
            initial_shared_version: SUI_CLOCK_OBJECT_SHARED_VERSION,
            mutable: false,
        }]
    );
    assert_eq!(
        tx.move_calls(),
        vec![(&SUI_FRAMEWORK_PACKAGE_ID, "m", "f")]
    );
}

#[test]
fn test_display() {
    assert_eq!(Argument::NestedResult(0, 1).to_string(), "NestedResult(0,1)");
    let command = Command::SplitCoins(Argument::GasCoin, vec![Argument::Input(0)]);
    assert_eq!(command.to_string(), "SplitCoins(GasCoin,[Input(0)])");
}
