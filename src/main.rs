use clap::Parser;
use redefine::Section;
use redefine::core::config::{self, RedefineConfig};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "redefine", about = "Browse courses and mentors, and send enquiries")]
struct Args {
    /// Section to open on start-up
    #[arg(short, long, value_enum)]
    section: Option<Section>,

    /// Catalog API base URL (overrides config file and REDEFINE_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to redefine.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("redefine.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("Ignoring config file: {}", e);
        RedefineConfig::default()
    });
    let resolved = config::resolve(&file_config, args.section, args.base_url.as_deref());

    log::info!(
        "Redefine starting up: backend={}, section={:?}",
        resolved.base_url,
        resolved.initial_section
    );

    redefine::tui::run(resolved)
}
