//=========================================================================
// cocoon-tour
//=========================================================================
//
// Usage: cocoon-tour [CONFIG]
//
// Reads CONFIG (default `cocoon.toml`). A missing default config falls
// back to built-in settings; an explicit one must exist and parse.
// Logging follows RUST_LOG (default `info`).
//
//=========================================================================

use std::path::Path;

use cocoon_tour::core::config::GameConfig;
use cocoon_tour::EngineBuilder;
use log::{error, info};

const DEFAULT_CONFIG: &str = "cocoon.toml";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let explicit = std::env::args().nth(1);
    let path = explicit.clone().unwrap_or_else(|| DEFAULT_CONFIG.to_string());

    let config = if explicit.is_none() && !Path::new(&path).exists() {
        info!("No {} found, using built-in settings", path);
        GameConfig::default()
    } else {
        match GameConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                error!("{}", e);
                std::process::exit(2);
            }
        }
    };

    if let Err(e) = EngineBuilder::new().with_config(config).build().run() {
        error!("Tour stopped: {}", e);
        std::process::exit(1);
    }
}
