// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use sui_transaction_core::base_types::{dbg_addr, dbg_object_id, SequenceNumber, SuiAddress};
use sui_transaction_core::config::ProtocolLimits;
use sui_transaction_core::crypto::{
    DefaultHash, PublicKey, Signature, SignatureScheme, SuiSigner, DIGEST_LENGTH,
};
use sui_transaction_core::digests::ObjectDigest;
use sui_transaction_core::error::SuiResult;
use sui_transaction_core::intent::{self, Intent, IntentMessage, IntentScope};
use sui_transaction_core::multisig::{MultiSig, MultiSigPublicKey};
use sui_transaction_core::programmable_transaction_builder::ProgrammableTransactionBuilder;
use sui_transaction_core::signature::GenericSignature;
use sui_transaction_core::transaction::{
    Argument, Command, PureArg, Transaction, TransactionData,
};

struct FixedKey(u8);

impl SuiSigner for FixedKey {
    fn scheme(&self) -> SignatureScheme {
        SignatureScheme::ED25519
    }

    fn public_key_bytes(&self) -> Vec<u8> {
        vec![self.0; 32]
    }

    fn sign_digest(&self, digest: &[u8; DIGEST_LENGTH]) -> SuiResult<Vec<u8>> {
        Ok([digest.as_slice(), digest.as_slice()].concat())
    }
}

fn public(key: &FixedKey) -> PublicKey {
    PublicKey::try_from_bytes(key.scheme(), &key.public_key_bytes()).unwrap()
}

fn transfer_data(sender: SuiAddress) -> TransactionData {
    let mut builder = ProgrammableTransactionBuilder::new();
    let amount = builder.pure_typed(PureArg::u64(1000)).unwrap();
    let coin = builder
        .command(Command::SplitCoins(Argument::GasCoin, vec![amount]))
        .unwrap();
    builder.transfer_arg(dbg_addr(9), coin).unwrap();
    let gas = (dbg_object_id(1), SequenceNumber::from_u64(4), ObjectDigest::new([2; 32]));
    TransactionData::new_programmable(sender, vec![gas], builder.finish(), 5_000_000, 1000)
}

#[test]
fn test_single_signer_flow() {
    let key = FixedKey(1);
    let data = transfer_data(key.sui_address().unwrap());
    let signers: Vec<&dyn SuiSigner> = vec![&key];
    let tx = Transaction::from_data_and_signer(data.clone(), signers).unwrap();
    tx.validate(&ProtocolLimits::default()).unwrap();

    // The signature covers the intent-prefixed transaction bytes.
    let signed = intent::wrap(IntentScope::TransactionData, &data.to_bytes().unwrap());
    let digest = DefaultHash::digest(&signed);
    let GenericSignature::Signature(sig) = &tx.tx_signatures[0] else {
        panic!("expected a single-key signature")
    };
    assert_eq!(&sig.signature_bytes()[..DIGEST_LENGTH], &digest[..]);

    let (tx_bytes, sigs) = tx.to_tx_bytes_and_signatures().unwrap();
    assert!(!tx_bytes.is_empty());
    assert_eq!(sigs[0].parse::<GenericSignature>().unwrap(), tx.tx_signatures[0]);
}

#[test]
fn test_multisig_flow() {
    let keys = [FixedKey(1), FixedKey(2), FixedKey(3)];
    let multisig_pk =
        MultiSigPublicKey::new(keys.iter().map(public).collect(), vec![1, 1, 1], 2).unwrap();
    let data = transfer_data((&multisig_pk).into());
    let message = IntentMessage::new(Intent::sui_transaction(), data.clone());

    let sigs = vec![
        Signature::new_secure(&message, &keys[2]).unwrap(),
        Signature::new_secure(&message, &keys[0]).unwrap(),
    ];
    let multisig = MultiSig::combine(sigs, multisig_pk).unwrap();
    assert!(multisig.is_satisfied());
    assert_eq!(multisig.get_bitmap(), 0b101);

    let tx = Transaction::from_generic_sig_data(data, vec![multisig.into()]);
    tx.validate(&ProtocolLimits::default()).unwrap();

    let encoded = tx.tx_signatures[0].encode_base64().unwrap();
    assert_eq!(encoded.parse::<GenericSignature>().unwrap(), tx.tx_signatures[0]);
}
