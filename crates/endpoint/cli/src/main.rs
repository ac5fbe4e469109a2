use claim_assembler_cli::{App, Cli, Commands};
use clap::Parser as _;

fn main() -> anyhow::Result<()> {
    let Cli { cmd, socket } = Cli::parse();

    let app = App::default().with_socket(socket);

    let response = match cmd {
        Commands::Claim { data, sender } => app.claim(data, sender)?,

        Commands::Decode { payload } => App::decode(payload)?,
    };

    println!("{}", serde_json::to_string(&response)?);

    Ok(())
}
