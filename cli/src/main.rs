mod commands;
mod terminal;

use commands::{CommandLine, Commands, config, import, normalize};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.quiet);

    let cfg = commands.discovery_config()?;
    let quiet = commands.quiet;

    match commands.command {
        Commands::Import { files, no_vendor } => {
            print::header("importing facts", quiet);
            import::import(files, cfg, no_vendor, quiet).await
        }
        Commands::Normalize { file } => {
            print::header("normalized facts", quiet);
            normalize::normalize(&file, &cfg)
        }
        Commands::Config => config::show(&cfg),
    }
}
