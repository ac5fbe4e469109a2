use clap::{Parser, Subcommand};

use crate::App;

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Socket address of the claim assembler service.
    #[arg(short, long, value_name = "SOCKET", default_value = App::DEFAULT_SOCKET)]
    pub socket: String,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Requests the claim payload of a deposit.
    Claim {
        /// Metadata marker of the deposit.
        #[arg(short, long, value_name = "DATA")]
        data: String,

        /// Address of the claimer.
        #[arg(short, long, value_name = "SENDER")]
        sender: Option<String>,
    },

    /// Decodes a hex claim payload into its arguments.
    Decode {
        /// The `0x` prefixed hex payload.
        #[arg(value_name = "PAYLOAD")]
        payload: String,
    },
}
