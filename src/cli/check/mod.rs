//! Check command - runs one similarity check and prints the response

use clap::Args;

use crate::api::types::CheckSimilarResponse;
use crate::config::AppConfig;
use crate::infrastructure::logging::LoggingConfig;
use crate::infrastructure::observability::{init_tracing, TracingConfig};

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Query text; multiple words are joined with spaces
    #[arg(required = true)]
    words: Vec<String>,

    /// Print compact JSON instead of pretty output
    #[arg(long)]
    compact: bool,
}

impl CheckArgs {
    pub fn query(&self) -> String {
        self.words.join(" ")
    }
}

/// Run the check command
pub async fn run(args: CheckArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_tracing(
        &LoggingConfig::for_cli(&config),
        &TracingConfig {
            enabled: false,
            ..config.observability.tracing.clone()
        },
    );

    let state = crate::create_app_state_with_config(&config).await?;
    let check = state.similarity_service.check(&args.query()).await?;
    let response = CheckSimilarResponse::from(check);

    let output = if args.compact {
        serde_json::to_string(&response)?
    } else {
        serde_json::to_string_pretty(&response)?
    };
    println!("{}", output);

    Ok(())
}
