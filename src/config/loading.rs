use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use snafu::{ResultExt, Snafu};

use super::models::Settings;

pub fn load_config(path: Option<&Path>) -> Result<Settings, ConfigLoadError> {
    // As Rust has no native support for .env files,
    // we use the dotenv_flow crate to import to actual ENV vars.
    let dotenv_path = dotenv_flow::dotenv_flow();
    if let Ok(dotenv_path) = dotenv_path {
        println!("Loaded dotenv file: {:?}", dotenv_path);
    }

    let file = match path {
        Some(path) => File::from(path.to_path_buf()).required(true),
        None => File::new("smb2cups", FileFormat::Toml).required(false),
    };

    let config = Config::builder()
        .add_source(file)
        .add_source(Environment::default()
            .prefix("S2C")
            .separator("_")
            .prefix_separator("_")
            .try_parsing(true))
        .build()
        .whatever_context("Could not read configuration")?;

    config.try_deserialize().whatever_context("Configuration is invalid")
}

// ////// //
// Errors //
// ////// //

#[derive(Debug, Snafu)]
pub enum ConfigLoadError {
    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error + Send + Sync>, Some)))]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}
