use anyhow::Context;
use clap::Parser;

use npcchat::app;
use npcchat::cli::Args;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    let config = args.resolve().context("invalid configuration")?;
    app::init_tracing(config.output.log_format);

    let api_key = app::api_key_from_env(&config.llm.api_key_env);
    app::run(&config, &args.input_file, api_key).await?;
    Ok(())
}
