use clap::Parser;
use phyquest::Provider;
use phyquest::core::config;
use phyquest::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "phyquest", about = "Physics tutor for 11th-grade students")]
struct Args {
    /// LLM provider to use (overrides config file and env)
    #[arg(short, long, value_enum)]
    provider: Option<Provider>,

    /// Model name (overrides config file and env)
    #[arg(short, long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to phyquest.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("phyquest.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("{e}; falling back to defaults");
        config::PhyQuestConfig::default()
    });
    let resolved = config::resolve(
        &file_config,
        args.provider.as_ref().map(Provider::as_str),
        args.model.as_deref(),
    );

    log::info!(
        "PhyQuest starting up with provider: {}, model: {}",
        resolved.provider,
        resolved.model_name
    );

    tui::run(resolved)
}
