use clap::Parser;
use competitor_scout::utils::{logger, validation::Validate};
use competitor_scout::{build_scan, CliConfig};
use std::sync::Arc;

/// 不啟動伺服器，直接對一段應用描述跑一次競品掃描並輸出 JSON
#[derive(Debug, Parser)]
#[command(name = "scout_lookup")]
#[command(about = "Run a single competitor scan and print the result as JSON")]
struct LookupArgs {
    /// Short description of the app
    app_description: String,

    #[arg(long, help = "Print compact JSON instead of pretty JSON")]
    compact: bool,

    #[command(flatten)]
    config: CliConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = LookupArgs::parse();
    logger::init_logger(args.config.verbose, args.config.log_json);

    let config = args.config.resolve()?;
    config.validate()?;
    config.warn_missing_credentials();

    let scan = build_scan(Arc::new(config))?;

    match scan.run(&args.app_description).await {
        Ok(envelope) => {
            let output = if args.compact {
                serde_json::to_string(&envelope)?
            } else {
                serde_json::to_string_pretty(&envelope)?
            };
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            tracing::error!("❌ Competitor scan failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("   {}", e);
            std::process::exit(if e.is_gateway_failure() { 2 } else { 1 });
        }
    }
}
