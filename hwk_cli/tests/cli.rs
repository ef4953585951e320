use clap::Parser;
use hwk_cli::{run, Cli};
use hwk_device::{
    messages::{
        failure::FailureType, AlephiumAddress, AlephiumGetAddress, AlephiumMessageSignature,
        AlephiumSignMessage, AlephiumSignTx, AlephiumSignedTx, BenfenAddress, BenfenGetAddress,
        BenfenMessageSignature, BenfenSignMessage, BenfenSignTx, BenfenSignedTx, ButtonRequest,
        Failure,
    },
    mock::MockTransport,
    Client, MessageType,
};

const H: u32 = 0x8000_0000;

struct Outcome {
    result: anyhow::Result<Option<String>>,
    output: String,
    transport: MockTransport,
}

#[track_caller]
fn parse(command: &str) -> Cli {
    let shell_words = shellwords::split(command).unwrap();
    Cli::try_parse_from(shell_words).unwrap()
}

#[track_caller]
fn sh(command: &str, transport: MockTransport) -> Outcome {
    let cli = parse(command);
    let client = Client::new(transport);
    let mut out = Vec::new();
    let result = run(&client, cli.command, &mut out);
    Outcome {
        result,
        output: String::from_utf8(out).unwrap(),
        transport: client.into_transport().unwrap(),
    }
}

fn default_path() -> Vec<u32> {
    vec![44 + H, 1234 + H, H, 0, 0]
}

fn alephium_address(public_key: Option<Vec<u8>>) -> AlephiumAddress {
    AlephiumAddress {
        address: "1DrDyTr9RpRsQnDnXo2YRiPzPW4ooHX5LLoqXrqfMrpQH".to_string(),
        public_key,
        derived_path: vec![44, 1234, 0, 0, 0],
    }
}

fn failure() -> Failure {
    Failure {
        code: Some(FailureType::ActionCancelled as i32),
        message: Some("Signing cancelled by user".to_string()),
    }
}

#[test]
fn alephium_get_address() {
    let transport = MockTransport::new().reply(alephium_address(Some(vec![0xab, 0xcd])));
    let r = sh(
        "hwk alephium get-address -n \"m/44'/1234'/0'/0/0\" -d -p -g 2",
        transport,
    );
    assert_eq!(
        r.result.unwrap().as_deref(),
        Some("1DrDyTr9RpRsQnDnXo2YRiPzPW4ooHX5LLoqXrqfMrpQH")
    );
    assert_eq!(
        r.output,
        "Address: 1DrDyTr9RpRsQnDnXo2YRiPzPW4ooHX5LLoqXrqfMrpQH\nPublic Key: abcd\nDerived Path: m/44/1234/0/0/0\n"
    );

    assert_eq!(r.transport.sent().len(), 1);
    let request: AlephiumGetAddress = r.transport.sent_as(0);
    assert_eq!(request.address_n, default_path());
    assert_eq!(request.show_display, Some(true));
    assert_eq!(request.include_public_key, Some(true));
    assert_eq!(request.target_group, Some(2));
}

#[test]
fn alephium_get_address_without_public_key() {
    // the key is printed only when requested
    let transport = MockTransport::new().reply(alephium_address(Some(vec![0xab])));
    let r = sh("hwk alephium get-address --address m/44h/1234h/0h/0/0", transport);
    assert!(!r.output.contains("Public Key"));
    let request: AlephiumGetAddress = r.transport.sent_as(0);
    assert_eq!(request.show_display, Some(false));
    assert_eq!(request.include_public_key, Some(false));
    assert_eq!(request.target_group, None);

    let transport = MockTransport::new().reply(alephium_address(None));
    let r = sh("hwk alephium get-address -n m/44h/1234h/0h/0/0 -p", transport);
    assert!(!r.output.contains("Public Key"));
    assert!(r.output.ends_with("Derived Path: m/44/1234/0/0/0\n"));
}

#[test]
fn alephium_get_address_propagates_failures() {
    let transport = MockTransport::new().reply(failure());
    let r = sh("hwk alephium get-address -n m/44h/1234h/0h/0/0", transport);
    let err = r.result.unwrap_err();
    assert!(format!("{err}").contains("Signing cancelled by user"));
    assert!(r.output.is_empty());

    let r = sh(
        "hwk alephium get-address -n m/44h/1234h/0h/0/0",
        MockTransport::new().disconnect(),
    );
    assert!(r.result.is_err());
}

#[test]
fn alephium_sign_tx() {
    let transport = MockTransport::new()
        .reply(ButtonRequest::default())
        .reply(AlephiumSignedTx {
            signature: vec![0x01, 0x02, 0xff],
            address: None,
        });
    let r = sh("hwk alephium sign-tx 0x000102 --data-length 3", transport);
    assert_eq!(r.result.unwrap().as_deref(), Some("0102ff"));
    assert_eq!(r.output, "0102ff\n");

    let sent = r.transport.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].kind, MessageType::ButtonAck as u16);
    let request: AlephiumSignTx = r.transport.sent_as(0);
    assert_eq!(request.address_n, default_path());
    assert_eq!(request.data_initial_chunk, vec![0x00, 0x01, 0x02]);
    assert_eq!(request.data_length, Some(3));
}

#[test]
fn alephium_sign_tx_data_length_alias() {
    let transport = MockTransport::new().reply(AlephiumSignedTx {
        signature: vec![1],
        address: None,
    });
    let r = sh("hwk alephium sign-tx -n m/44h/1234h/0h/0/1 aa --data_length 1", transport);
    let request: AlephiumSignTx = r.transport.sent_as(0);
    assert_eq!(request.address_n, vec![44 + H, 1234 + H, H, 0, 1]);
    assert_eq!(request.data_length, Some(1));
}

#[test]
fn alephium_sign_tx_without_signature() {
    let transport = MockTransport::new().reply(AlephiumSignedTx {
        signature: vec![],
        address: None,
    });
    let r = sh("hwk alephium sign-tx 00", transport);
    assert_eq!(r.result.unwrap(), None);
    assert_eq!(r.output, "Transaction signed, but no signature returned\n");
}

#[test]
fn alephium_sign_tx_failures_are_printed() {
    let r = sh("hwk alephium sign-tx 00", MockTransport::new().reply(failure()));
    assert_eq!(r.result.unwrap(), None);
    assert_eq!(
        r.output,
        "Failed to sign transaction: Device failure: ActionCancelled - message: Signing cancelled by user\n"
    );

    let r = sh("hwk alephium sign-tx 00", MockTransport::new().disconnect());
    assert_eq!(r.result.unwrap(), None);
    assert!(r.output.starts_with("Failed to sign transaction: "));

    // invalid hex never reaches the device
    let r = sh("hwk alephium sign-tx 0g", MockTransport::new());
    assert_eq!(r.result.unwrap(), None);
    assert!(r.output.starts_with("Failed to sign transaction: "));
    assert!(r.transport.sent().is_empty());
}

#[test]
fn alephium_sign_message() {
    let transport = MockTransport::new().reply(AlephiumMessageSignature {
        signature: Some(vec![0xde, 0xad]),
        address: None,
    });
    let r = sh(
        "hwk alephium sign-message -n m/44h/1234h/0h/0/0 'hello world' alephium",
        transport,
    );
    assert_eq!(r.result.unwrap().as_deref(), Some("dead"));
    assert_eq!(r.output, "dead\n");

    let request: AlephiumSignMessage = r.transport.sent_as(0);
    assert_eq!(request.address_n, default_path());
    assert_eq!(request.message.as_deref(), Some(&b"hello world"[..]));
    assert_eq!(request.message_type.as_deref(), Some(&b"alephium"[..]));
}

#[test]
fn alephium_sign_message_soft_failures() {
    let transport = MockTransport::new().reply(AlephiumMessageSignature {
        signature: None,
        address: None,
    });
    let r = sh("hwk alephium sign-message -n m/0 msg alephium", transport);
    assert_eq!(r.result.unwrap(), None);
    assert_eq!(r.output, "Message signed, but no signature returned\n");

    let transport = MockTransport::new().reply(BenfenAddress { address: None });
    let r = sh("hwk alephium sign-message -n m/0 msg alephium", transport);
    assert_eq!(r.result.unwrap(), None);
    assert_eq!(
        r.output,
        "Failed to sign message: Unexpected message from the device, expected AlephiumMessageSignature got BenfenAddress\n"
    );
}

#[test]
fn invalid_path_is_an_error() {
    let r = sh("hwk alephium sign-tx -n m/x 00", MockTransport::new());
    assert!(r.result.is_err());
    assert!(r.transport.sent().is_empty());
}

#[test]
fn benfen_get_address() {
    let transport = MockTransport::new().reply(BenfenAddress {
        address: Some("BFCabc".to_string()),
    });
    let r = sh("hwk benfen get-address -n m/44h/728h/0h/0h/0h -d", transport);
    assert_eq!(r.result.unwrap().as_deref(), Some("BFCabc"));
    assert_eq!(r.output, "BFCabc\n");

    let request: BenfenGetAddress = r.transport.sent_as(0);
    assert_eq!(request.address_n, vec![44 + H, 728 + H, H, H, H]);
    assert_eq!(request.show_display, Some(true));
}

#[test]
fn benfen_sign_tx() {
    let public_key: Vec<u8> = (0..32).collect();
    let transport = MockTransport::new().reply(BenfenSignedTx {
        public_key,
        signature: vec![0x11; 2],
    });
    let r = sh(
        "hwk benfen sign-tx -n m/44h/728h/0h/0h/0h 000000aa --coin-type 0x2::bfc::BFC",
        transport,
    );
    assert_eq!(r.result.unwrap().as_deref(), Some("1111"));
    assert_eq!(
        r.output,
        "1111\nSigner: BFC0ddaaec3ffac93977c83c3d7440e9e65663850d4861be2f48532548d0a4633367b68\n"
    );

    assert_eq!(r.transport.sent().len(), 1);
    let request: BenfenSignTx = r.transport.sent_as(0);
    assert_eq!(request.raw_tx, vec![0, 0, 0, 0xaa]);
    assert_eq!(request.coin_type.as_deref(), Some(&b"0x2::bfc::BFC"[..]));
}

#[test]
fn benfen_sign_tx_soft_failures() {
    let transport = MockTransport::new().reply(BenfenSignedTx {
        public_key: vec![],
        signature: vec![],
    });
    let r = sh("hwk benfen sign-tx -n m/0 00 -c x", transport);
    assert_eq!(r.result.unwrap(), None);
    assert_eq!(r.output, "Transaction signed, but no signature returned\n");

    let r = sh("hwk benfen sign-tx -n m/0 00 -c x", MockTransport::new().reply(failure()));
    assert_eq!(r.result.unwrap(), None);
    assert!(r.output.starts_with("Failed to sign transaction: "));
}

#[test]
fn benfen_sign_message() {
    let transport = MockTransport::new().reply(BenfenMessageSignature {
        signature: vec![0x22; 3],
        address: None,
    });
    let r = sh("hwk benfen sign-message -n m/44h/728h/0h/0h/0h hello", transport);
    assert_eq!(r.result.unwrap().as_deref(), Some("222222"));

    let request: BenfenSignMessage = r.transport.sent_as(0);
    assert_eq!(request.message, b"hello");

    let r = sh("hwk benfen sign-message -n m/0 hello", MockTransport::new().disconnect());
    assert_eq!(r.result.unwrap(), None);
    assert!(r.output.starts_with("Failed to sign message: "));
}

#[test]
fn parse_args() {
    let cli = parse("hwk alephium sign-tx 00");
    assert_eq!(cli.connection.emulator_addr.to_string(), "127.0.0.1:21324");
    assert_eq!(cli.connection.bridge_url, "http://127.0.0.1:21325");

    let cli = parse("hwk --transport bridge --bridge-url http://localhost:1 benfen get-address -n m/0");
    assert_eq!(cli.connection.bridge_url, "http://localhost:1");

    for command in [
        "hwk alephium get-address",
        "hwk alephium get-address -n m/0 -g 4",
        "hwk alephium sign-message -n m/0 msg",
        "hwk benfen sign-tx -n m/0 00",
        "hwk --transport usb alephium sign-tx 00",
    ] {
        let shell_words = shellwords::split(command).unwrap();
        assert!(Cli::try_parse_from(shell_words).is_err(), "{command}");
    }
}
