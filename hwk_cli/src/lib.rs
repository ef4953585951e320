#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]

use std::io::Write;

use anyhow::{anyhow, Context};
use clap::CommandFactory;
use hwk_common::{format_path, parse_hex, parse_path};
use hwk_device::{
    alephium, benfen, BridgeTransport, Client, Connection, SignatureResponse, Transport,
    UdpTransport,
};
use tracing_subscriber::{filter::LevelFilter, EnvFilter, FmtSubscriber};

use crate::args::{AlephiumCommand, BenfenCommand, ConnectionArgs, TransportKind};
pub use args::{Cli, CliCommand};

mod args;

/// Run the command parsed from the command line, printing to stdout
pub fn inner_main(args: args::Cli) -> anyhow::Result<Option<String>> {
    let (appender, _guard) = tracing_appender::non_blocking(std::io::stderr());
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(appender)
        .finish();
    match tracing::subscriber::set_global_default(subscriber) {
        Ok(_) => tracing::info!("logging initialized"),
        Err(_) => tracing::debug!("logging already initialized"),
    }

    tracing::info!("CLI initialized with args: {:?}", args);

    let mut stdout = std::io::stdout().lock();

    if !args.command.requires_device() {
        if let CliCommand::GenerateCompletion { shell } = args.command {
            clap_complete::generate(shell, &mut Cli::command(), "hwk", &mut stdout);
        }
        return Ok(None);
    }

    let client = Client::new(connect(&args.connection)?);
    run(&client, args.command, &mut stdout)
}

fn connect(args: &ConnectionArgs) -> anyhow::Result<Connection> {
    Ok(match args.transport {
        TransportKind::Udp => UdpTransport::connect(args.emulator_addr)
            .with_context(|| format!("Is the emulator at {} running?", args.emulator_addr))?
            .into(),
        TransportKind::Bridge => BridgeTransport::connect(&args.bridge_url)
            .with_context(|| format!("Is the bridge at {} running?", args.bridge_url))?
            .into(),
    })
}

/// Execute a device command with `client`, writing the human readable output to `out`.
///
/// Returns the main result of the command: the address, or the hex of the signature.
/// Signing commands don't fail when the device does, they print the reason and return `None`.
pub fn run<T: Transport, W: Write>(
    client: &Client<T>,
    command: CliCommand,
    out: &mut W,
) -> anyhow::Result<Option<String>> {
    match command {
        CliCommand::Alephium(a) => match a.command {
            AlephiumCommand::GetAddress {
                address,
                show_display,
                include_public_key,
                target_group,
            } => {
                let address_n = parse_path(&address)?;
                let result = alephium::get_address(
                    client,
                    &address_n,
                    show_display,
                    include_public_key,
                    target_group,
                )?;
                writeln!(out, "Address: {}", result.address)?;
                if include_public_key {
                    if let Some(public_key) = result.public_key.as_ref().filter(|k| !k.is_empty()) {
                        writeln!(out, "Public Key: {}", hex::encode(public_key))?;
                    }
                }
                writeln!(out, "Derived Path: {}", format_path(&result.derived_path))?;
                Ok(Some(result.address))
            }
            AlephiumCommand::SignTx {
                address,
                message,
                data_length,
            } => {
                let address_n = parse_path(&address)?;
                let result = parse_hex(&message)
                    .map_err(hwk_device::Error::from)
                    .and_then(|data| alephium::sign_tx(client, &address_n, &data, data_length));
                let signed = print_signature(out, Signed::Transaction, result)?;
                Ok(signed.as_ref().and_then(signature_hex))
            }
            AlephiumCommand::SignMessage {
                address,
                message,
                message_type,
            } => {
                let address_n = parse_path(&address)?;
                let result = alephium::sign_message(client, &address_n, &message, &message_type);
                let signed = print_signature(out, Signed::Message, result)?;
                Ok(signed.as_ref().and_then(signature_hex))
            }
        },
        CliCommand::Benfen(a) => match a.command {
            BenfenCommand::GetAddress {
                address,
                show_display,
            } => {
                let address_n = parse_path(&address)?;
                let address = benfen::get_address(client, &address_n, show_display)?;
                writeln!(out, "{address}")?;
                Ok(Some(address))
            }
            BenfenCommand::SignTx {
                address,
                raw_tx,
                coin_type,
            } => {
                let address_n = parse_path(&address)?;
                let result = parse_hex(&raw_tx)
                    .map_err(hwk_device::Error::from)
                    .and_then(|raw_tx| {
                        benfen::sign_tx(client, &address_n, &raw_tx, coin_type.as_bytes())
                    });
                let signed = print_signature(out, Signed::Transaction, result)?;
                if let Some(signed) = signed.as_ref() {
                    match benfen::address_from_public_key(&signed.public_key) {
                        Ok(signer) => writeln!(out, "Signer: {signer}")?,
                        Err(e) => tracing::warn!("cannot derive the signer address: {e}"),
                    }
                }
                Ok(signed.as_ref().and_then(signature_hex))
            }
            BenfenCommand::SignMessage { address, message } => {
                let address_n = parse_path(&address)?;
                let result = benfen::sign_message(client, &address_n, &message);
                let signed = print_signature(out, Signed::Message, result)?;
                Ok(signed.as_ref().and_then(signature_hex))
            }
        },
        CliCommand::GenerateCompletion { .. } => Err(anyhow!("completions don't need a device")),
    }
}

#[derive(Debug, Clone, Copy)]
enum Signed {
    Transaction,
    Message,
}

impl Signed {
    fn noun(&self) -> &'static str {
        match self {
            Signed::Transaction => "transaction",
            Signed::Message => "message",
        }
    }

    fn capitalized(&self) -> &'static str {
        match self {
            Signed::Transaction => "Transaction",
            Signed::Message => "Message",
        }
    }
}

fn signature_hex<R: SignatureResponse>(response: &R) -> Option<String> {
    response.signature_bytes().map(hex::encode)
}

/// Print the signature or why it's missing, returns the response only if it carries a signature
fn print_signature<R: SignatureResponse, W: Write>(
    out: &mut W,
    signed: Signed,
    result: hwk_device::Result<R>,
) -> anyhow::Result<Option<R>> {
    match result {
        Ok(response) => match signature_hex(&response) {
            Some(signature) => {
                writeln!(out, "{signature}")?;
                Ok(Some(response))
            }
            None => {
                writeln!(
                    out,
                    "{} signed, but no signature returned",
                    signed.capitalized()
                )?;
                Ok(None)
            }
        },
        Err(e) => {
            tracing::debug!("signing failed: {e:?}");
            writeln!(out, "Failed to sign {}: {e}", signed.noun())?;
            Ok(None)
        }
    }
}
