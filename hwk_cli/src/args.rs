use std::{fmt::Display, net::SocketAddr};

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use hwk_common::ALEPHIUM_DEFAULT_PATH;
use hwk_device::{DEFAULT_BRIDGE_URL, DEFAULT_EMULATOR_ADDR};

const PATH_HELP: &str = "BIP-32 path, e.g. m/44'/1234'/0'/0/0";

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportKind {
    /// The emulator, over UDP
    Udp,
    /// A physical device, through the HTTP bridge
    Bridge,
}

impl Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            TransportKind::Udp => write!(f, "udp"),
            TransportKind::Bridge => write!(f, "bridge"),
        }
    }
}

/// Get addresses and signatures from the Benfen and Alephium apps of a hardware wallet.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// The sub command
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Args, Debug)]
pub struct ConnectionArgs {
    /// How to reach the device
    #[arg(long, env = "HWK_TRANSPORT", default_value_t = TransportKind::Udp)]
    pub transport: TransportKind,

    /// Where the emulator listens, used with `--transport udp`
    #[arg(long, env = "HWK_EMULATOR_ADDR", default_value = DEFAULT_EMULATOR_ADDR)]
    pub emulator_addr: SocketAddr,

    /// Where the bridge listens, used with `--transport bridge`
    #[arg(long, env = "HWK_BRIDGE_URL", default_value = DEFAULT_BRIDGE_URL)]
    pub bridge_url: String,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Alephium commands
    Alephium(AlephiumArgs),

    /// Benfen commands
    Benfen(BenfenArgs),

    #[clap(hide = true)]
    GenerateCompletion { shell: Shell },
}

impl CliCommand {
    pub(crate) fn requires_device(&self) -> bool {
        !matches!(self, CliCommand::GenerateCompletion { .. })
    }
}

#[derive(Debug, Args)]
pub struct AlephiumArgs {
    #[command(subcommand)]
    pub command: AlephiumCommand,
}

#[derive(Debug, Subcommand)]
pub enum AlephiumCommand {
    /// Get Alephium address and optionally public key for specified path
    GetAddress {
        #[arg(short = 'n', long, help = PATH_HELP)]
        address: String,

        /// Show the address on the device for confirmation
        #[arg(short = 'd', long)]
        show_display: bool,

        /// Include public key in the output
        #[arg(short = 'p', long)]
        include_public_key: bool,

        /// Target group for address derivation (0-3)
        #[arg(short = 'g', long, value_parser = clap::value_parser!(u32).range(0..4))]
        target_group: Option<u32>,
    },

    /// Sign a hex-encoded raw message which is the data used to calculate the bip143-like sig-hash
    SignTx {
        #[arg(short = 'n', long, help = PATH_HELP, default_value = ALEPHIUM_DEFAULT_PATH)]
        address: String,

        /// Hex of the unsigned transaction
        message: String,

        /// Total length of the transaction data
        #[arg(short = 'd', long, alias = "data_length")]
        data_length: Option<u32>,
    },

    /// Sign message with Alephium address
    SignMessage {
        #[arg(short = 'n', long, help = PATH_HELP)]
        address: String,

        message: String,

        message_type: String,
    },
}

#[derive(Debug, Args)]
pub struct BenfenArgs {
    #[command(subcommand)]
    pub command: BenfenCommand,
}

#[derive(Debug, Subcommand)]
pub enum BenfenCommand {
    /// Get Benfen address for specified path
    GetAddress {
        #[arg(short = 'n', long, help = PATH_HELP)]
        address: String,

        /// Show the address on the device for confirmation
        #[arg(short = 'd', long)]
        show_display: bool,
    },

    /// Blind sign a hex-encoded serialized transaction
    SignTx {
        #[arg(short = 'n', long, help = PATH_HELP)]
        address: String,

        /// Hex of the serialized transaction
        raw_tx: String,

        /// Coin type of the transferred asset, e.g. 0x2::bfc::BFC
        #[arg(short = 'c', long)]
        coin_type: String,
    },

    /// Sign message with Benfen address
    SignMessage {
        #[arg(short = 'n', long, help = PATH_HELP)]
        address: String,

        message: String,
    },
}
