use std::process::Command;

use confidential_args::{DecodedValue, deserialize_decoded, serialize_registry};

mod setup;

#[test]
fn test_process_payment() {
    let setup = setup::setup();
    let result_path = setup.test_dir.path().join("decoded.bin");

    let output = Command::new(env!("CARGO_BIN_EXE_confidential_args"))
        .arg("--invocation")
        .arg(&setup.invocation_path)
        .arg("--accounts")
        .arg(&setup.accounts_path)
        .arg("--output")
        .arg(&result_path)
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let result_bytes = std::fs::read(&result_path).unwrap();
    let decoded = deserialize_decoded(&result_bytes).unwrap();

    assert_eq!(decoded.computation(), "process_payment");
    assert_eq!(decoded.len(), 4);
    assert_eq!(
        decoded.get("sender_balance").and_then(DecodedValue::ciphertext),
        Some(&[0xaa; 32][..])
    );
    assert_eq!(
        decoded.get("receiver_balance").and_then(DecodedValue::nonce),
        Some(setup.receiver.balance_nonce)
    );
    assert_eq!(
        decoded.get("amount"),
        Some(&DecodedValue::Scalar {
            bit_width: confidential_args::BitWidth::U64,
            value: 250
        })
    );
    assert_eq!(
        decoded.get("receiver_key"),
        Some(&DecodedValue::SharedContext {
            recipient: setup.receiver.owner_enc_pubkey,
            nonce: 0x3003
        })
    );
    assert_eq!(
        decoded.get("sender_balance").and_then(DecodedValue::nonce),
        Some(setup.sender.balance_nonce)
    );
}

#[test]
fn test_process_payment_stdout() {
    let setup = setup::setup();

    let output = Command::new(env!("CARGO_BIN_EXE_confidential_args"))
        .arg("--invocation")
        .arg(&setup.invocation_path)
        .arg("--accounts")
        .arg(&setup.accounts_path)
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let decoded = deserialize_decoded(&output.stdout).unwrap();
    assert_eq!(decoded.len(), 4);
}

#[test]
fn test_registry_file() {
    let setup = setup::setup();
    let registry_path = setup.test_dir.path().join("registry.bin");
    let schemas = vec![confidential_args::banking::process_payment_schema().unwrap()];
    std::fs::write(&registry_path, serialize_registry(&schemas).unwrap()).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_confidential_args"))
        .arg("--invocation")
        .arg(&setup.invocation_path)
        .arg("--accounts")
        .arg(&setup.accounts_path)
        .arg("--registry")
        .arg(&registry_path)
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let decoded = deserialize_decoded(&output.stdout).unwrap();
    assert_eq!(decoded.computation(), "process_payment");
}
