// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use super::*;
use crate::intent::{Intent, IntentMessage, PersonalMessage};
use crate::multisig::MultiSigPublicKey;
use crate::test_utils::{keys, TestSigner};

fn single_sig() -> Signature {
    let msg = IntentMessage::new(
        Intent::sui_transaction(),
        PersonalMessage {
            message: vec![1, 2, 3],
        },
    );
    Signature::new_secure(&msg, &keys()[0]).unwrap()
}

#[test]
fn test_single_signature_passes_through() {
    let sig = single_sig();
    let generic = GenericSignature::from(sig.clone());
    assert_eq!(generic.scheme(), SignatureScheme::ED25519);
    assert_eq!(generic.to_bytes().unwrap(), sig.as_bytes());
    assert_eq!(GenericSignature::from_bytes(sig.as_bytes()).unwrap(), generic);
}

#[test]
fn test_dispatch_on_flag() {
    let keys = keys();
    let multisig_pk =
        MultiSigPublicKey::new(keys.iter().map(TestSigner::public).collect(), vec![1, 1, 1], 1)
            .unwrap();
    let multisig = MultiSig::combine(vec![single_sig()], multisig_pk).unwrap();
    let bytes = multisig.to_bytes().unwrap();
    assert_eq!(
        GenericSignature::from_bytes(&bytes).unwrap(),
        GenericSignature::MultiSig(multisig)
    );

    let zklogin = GenericSignature::from_bytes(&[5, 0xaa, 0xbb]).unwrap();
    assert_eq!(
        zklogin,
        GenericSignature::ZkLoginAuthenticator(OpaqueBytes::new(vec![0xaa, 0xbb]))
    );
    assert_eq!(zklogin.to_bytes().unwrap(), vec![5, 0xaa, 0xbb]);

    let passkey = GenericSignature::from_bytes(&[6, 1]).unwrap();
    assert_eq!(passkey.scheme(), SignatureScheme::PasskeyAuthenticator);
}

#[test]
fn test_bad_bytes() {
    assert_eq!(
        GenericSignature::from_bytes(&[]),
        Err(SuiError::InvalidLength {
            expected: 1,
            actual: 0
        })
    );
    assert_eq!(
        GenericSignature::from_bytes(&[4, 0, 0]),
        Err(SuiError::InvalidSignatureScheme(4))
    );
    assert!(matches!(
        GenericSignature::from_bytes(&[0, 1, 2]),
        Err(SuiError::InvalidLength { .. })
    ));
}

#[test]
fn test_generic_signature_serde() {
    let generic = GenericSignature::from(single_sig());

    let json = serde_json::to_string(&generic).unwrap();
    assert_eq!(json, format!("\"{}\"", generic.encode_base64().unwrap()));
    assert_eq!(
        serde_json::from_str::<GenericSignature>(&json).unwrap(),
        generic
    );
    assert_eq!(
        generic.encode_base64().unwrap().parse::<GenericSignature>().unwrap(),
        generic
    );

    // BCS carries the flagged bytes as a length-prefixed byte vector.
    let bcs_bytes = bcs::to_bytes(&generic).unwrap();
    let flagged = generic.to_bytes().unwrap();
    assert_eq!(bcs_bytes[0] as usize, flagged.len());
    assert_eq!(&bcs_bytes[1..], &flagged[..]);
    assert_eq!(
        bcs::from_bytes::<GenericSignature>(&bcs_bytes).unwrap(),
        generic
    );
}
