use clap::Parser as _;
use starling_bank_mcp::config::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = starling_bank_mcp::logging::init(&cli.log_level, cli.log_format) {
        eprintln!("{e:#}");
        std::process::exit(1);
    }

    if let Err(e) = starling_bank_mcp::run(cli).await {
        eprintln!("Server startup failed: {e:#}");
        std::process::exit(1);
    }
}
