// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use strum::IntoEnumIterator;

use super::*;
use crate::intent::{Intent, PersonalMessage};
use crate::test_utils::TestSigner;

fn hello() -> IntentMessage<PersonalMessage> {
    IntentMessage::new(
        Intent::personal_message(),
        PersonalMessage {
            message: b"Hello".to_vec(),
        },
    )
}

#[test]
fn test_default_hash_is_blake2b_256() {
    assert_eq!(
        hex::encode(DefaultHash::digest(b"")),
        "0e5751c026e543b2e8ab2eb06099daa1d1e5df47778f7787faab45cdf12fe3a8"
    );
    let mut hasher = DefaultHash::default();
    hasher.update(b"ab");
    hasher.update(b"c");
    assert_eq!(hasher.finalize(), DefaultHash::digest(b"abc"));
}

#[test]
fn test_scheme_flags() {
    for scheme in SignatureScheme::iter() {
        assert_eq!(SignatureScheme::from_flag_byte(&scheme.flag()).unwrap(), scheme);
    }
    assert_eq!(
        SignatureScheme::from_flag_byte(&4),
        Err(SuiError::InvalidSignatureScheme(4))
    );
    assert_eq!(SignatureScheme::ED25519.to_string(), "ed25519");
    assert_eq!(
        "secp256k1".parse::<SignatureScheme>().unwrap(),
        SignatureScheme::Secp256k1
    );
}

#[test]
fn test_signature_lengths() {
    let mut bytes = vec![SignatureScheme::ED25519.flag()];
    bytes.extend_from_slice(&[1; SIGNATURE_LENGTH]);
    bytes.extend_from_slice(&[2; ED25519_PUBLIC_KEY_LENGTH]);

    let sig = Signature::from_bytes(&bytes).unwrap();
    assert_eq!(sig.scheme(), SignatureScheme::ED25519);
    assert_eq!(sig.signature_bytes(), &[1; SIGNATURE_LENGTH][..]);
    assert_eq!(sig.public_key_bytes(), &[2; ED25519_PUBLIC_KEY_LENGTH][..]);

    assert!(matches!(
        Signature::from_bytes(&bytes[..bytes.len() - 1]),
        Err(SuiError::InvalidLength { .. })
    ));
    let mut long = bytes.clone();
    long.push(0);
    assert!(matches!(
        Signature::from_bytes(&long),
        Err(SuiError::InvalidLength { .. })
    ));
    assert!(matches!(
        Signature::from_parts(SignatureScheme::ED25519, &[0; 63], &[0; 32]),
        Err(SuiError::InvalidLength {
            expected: 64,
            actual: 63
        })
    ));
    assert!(matches!(
        Signature::from_parts(SignatureScheme::MultiSig, &[0; 64], &[0; 32]),
        Err(SuiError::InvalidSignatureScheme(3))
    ));
}

#[test]
fn test_new_secure_signs_intent_digest() {
    let signer = TestSigner::ed25519(7);
    let msg = hello();
    let sig = Signature::new_secure(&msg, &signer).unwrap();

    let digest = DefaultHash::digest(msg.to_bytes().unwrap());
    let expected: Vec<u8> = digest.iter().map(|b| b ^ 7).collect();
    assert_eq!(&sig.signature_bytes()[..DIGEST_LENGTH], &expected[..]);
    assert_eq!(sig.public_key_bytes(), &signer.public_key_bytes()[..]);
    assert_eq!(sig.to_public_key().unwrap(), signer.public());

    // A different scope produces a different digest.
    let tx_scoped = IntentMessage::new(Intent::sui_transaction(), msg.value.clone());
    let other = Signature::new_secure(&tx_scoped, &signer).unwrap();
    assert_ne!(other.signature_bytes(), sig.signature_bytes());
}

#[test]
fn test_signature_serde() {
    let sig = Signature::new_secure(&hello(), &TestSigner::secp256k1(3)).unwrap();
    assert_eq!(sig.as_bytes().len(), 1 + SIGNATURE_LENGTH + SECP256K1_PUBLIC_KEY_LENGTH);

    let json = serde_json::to_string(&sig).unwrap();
    assert_eq!(json, format!("\"{}\"", sig.encode_base64()));
    assert_eq!(serde_json::from_str::<Signature>(&json).unwrap(), sig);
    assert_eq!(sig.encode_base64().parse::<Signature>().unwrap(), sig);

    let bcs_bytes = bcs::to_bytes(&sig).unwrap();
    assert_eq!(bcs::from_bytes::<Signature>(&bcs_bytes).unwrap(), sig);

    assert!(matches!(
        sig.to_compressed().unwrap(),
        CompressedSignature::Secp256k1(_)
    ));
}

#[test]
fn test_public_key_base64() {
    let pk = TestSigner::ed25519(9).public();
    let encoded = pk.encode_base64();
    assert_eq!(PublicKey::decode_base64(&encoded).unwrap(), pk);

    let multisig_flagged = BASE64_STANDARD.encode([SignatureScheme::MultiSig.flag(), 0, 0]);
    assert!(PublicKey::decode_base64(&multisig_flagged).is_err());
    assert!(PublicKey::try_from_bytes(SignatureScheme::Secp256r1, &[0; 32]).is_err());
}

#[test]
fn test_address_from_public_key() {
    let signer = TestSigner::ed25519(5);
    let pk = signer.public();
    let mut flagged = vec![0x00];
    flagged.extend_from_slice(&[5; ED25519_PUBLIC_KEY_LENGTH]);
    assert_eq!(SuiAddress::from(&pk), SuiAddress::new(DefaultHash::digest(&flagged)));
    assert_eq!(signer.sui_address().unwrap(), SuiAddress::from(&pk));

    // The flag is part of the preimage.
    let r1 = PublicKey::try_from_bytes(SignatureScheme::Secp256r1, &[5; 33]).unwrap();
    let k1 = PublicKey::try_from_bytes(SignatureScheme::Secp256k1, &[5; 33]).unwrap();
    assert_ne!(SuiAddress::from(&r1), SuiAddress::from(&k1));
}
