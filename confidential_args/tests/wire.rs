use confidential_args::{
    ACCOUNTS_VERSION, DeserializeError, EncryptedOutput, HEADER_SIZE, INVOCATION_MAGIC,
    INVOCATION_VERSION, OutputValue, PeekError, PublicKey, REGISTRY_VERSION, banking,
    deserialize_accounts_payload, deserialize_decoded, deserialize_invocation,
    deserialize_invocation_payload, deserialize_outputs, deserialize_registry,
    deserialize_registry_payload, peek_accounts_version, peek_invocation_version,
    peek_registry_version, serialize_accounts, serialize_decoded, serialize_invocation,
    serialize_outputs, serialize_registry,
};

mod setup;

#[test]
fn test_invocation_header() {
    let (_, sender, receiver) = setup::accounts();
    let invocation = setup::payment_invocation(&sender, &receiver);
    let bytes = serialize_invocation(&invocation).unwrap();

    assert_eq!(&bytes[..4], &INVOCATION_MAGIC);
    assert_eq!(peek_invocation_version(&bytes).unwrap(), 1);
    assert_eq!(deserialize_invocation(&bytes).unwrap(), invocation);
}

#[test]
fn test_peek_rejects_short_and_foreign_data() {
    assert_eq!(peek_invocation_version(b"CAIV"), Err(PeekError::TooShort));

    let outputs = serialize_outputs(&[OutputValue::Boolean(true)]).unwrap();
    assert_eq!(
        peek_invocation_version(&outputs),
        Err(PeekError::InvalidMagic)
    );
}

#[test]
fn test_unsupported_version() {
    let (_, sender, receiver) = setup::accounts();
    let mut bytes = serialize_invocation(&setup::payment_invocation(&sender, &receiver)).unwrap();
    bytes[4..HEADER_SIZE].copy_from_slice(&7u32.to_be_bytes());

    assert!(matches!(
        deserialize_invocation(&bytes),
        Err(DeserializeError::UnsupportedVersion {
            got: 7,
            expected: 1
        })
    ));
}

#[test]
fn test_payload_shorter_than_header() {
    assert!(matches!(
        deserialize_invocation_payload(&[1, 2, 3], INVOCATION_VERSION),
        Err(DeserializeError::Peek(PeekError::TooShort))
    ));
    assert!(matches!(
        deserialize_registry_payload(&[], REGISTRY_VERSION),
        Err(DeserializeError::Peek(PeekError::TooShort))
    ));
}

#[test]
fn test_peek_distinguishes_inputs() {
    let (accounts, _, _) = setup::accounts();
    let bytes = serialize_accounts(&accounts).unwrap();
    assert_eq!(peek_accounts_version(&bytes), Ok(ACCOUNTS_VERSION));
    assert_eq!(peek_registry_version(&bytes), Err(PeekError::InvalidMagic));

    let restored = deserialize_accounts_payload(&bytes, ACCOUNTS_VERSION).unwrap();
    assert_eq!(restored, accounts);
}

#[test]
fn test_corrupt_payload() {
    let mut bytes = INVOCATION_MAGIC.to_vec();
    bytes.extend_from_slice(&1u32.to_be_bytes());
    bytes.extend_from_slice(&[0xc1, 0xc1, 0xc1]);
    assert!(matches!(
        deserialize_invocation(&bytes),
        Err(DeserializeError::Payload(_))
    ));
}

#[test]
fn test_outputs_preserve_nonces() {
    let outputs = vec![
        OutputValue::Owned(EncryptedOutput {
            nonce: u128::MAX - 1,
            ciphertexts: vec![[1; 32]],
        }),
        OutputValue::Shared {
            recipient: PublicKey([2; 32]),
            output: EncryptedOutput {
                nonce: 0x3003,
                ciphertexts: vec![[3; 32]],
            },
        },
        OutputValue::Boolean(false),
    ];
    let bytes = serialize_outputs(&outputs).unwrap();
    assert_eq!(deserialize_outputs(&bytes).unwrap(), outputs);
}

#[test]
fn test_registry_file_keeps_schemas() {
    let schemas = vec![
        banking::process_payment_schema().unwrap(),
        banking::calculate_rewards_schema().unwrap(),
    ];
    let bytes = serialize_registry(&schemas).unwrap();
    assert_eq!(deserialize_registry(&bytes).unwrap(), schemas);
}

#[test]
fn test_decoded_report() {
    let (accounts, sender, receiver) = setup::accounts();
    let registry = banking::banking_registry().unwrap();
    let invocation = setup::payment_invocation(&sender, &receiver);
    let decoded = confidential_args::decode_invocation(&registry, &invocation, &accounts).unwrap();

    let bytes = serialize_decoded(&decoded).unwrap();
    assert_eq!(deserialize_decoded(&bytes).unwrap(), decoded);
}
