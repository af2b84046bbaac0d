pub mod toml_config;

pub use toml_config::MatchConfig;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "creator-match")]
#[command(about = "Match a brand's website to a recommended creator")]
pub struct CliConfig {
    /// Website to match, e.g. example.com or https://example.com/shop
    #[arg(short, long)]
    pub website: String,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Re-select for this category after the match (one of the 10 taxonomy labels)
    #[arg(long)]
    pub category: Option<String>,

    /// Override the classification service endpoint
    #[arg(long)]
    pub classifier_endpoint: Option<String>,

    /// Override the creator spreadsheet id
    #[arg(long)]
    pub spreadsheet_id: Option<String>,

    /// Print the outcome as JSON instead of text
    #[arg(long)]
    pub json: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the configuration file (or defaults) and applies command-line overrides.
    pub fn load_match_config(&self) -> crate::utils::error::Result<MatchConfig> {
        let mut config = match &self.config {
            Some(path) => MatchConfig::from_file(path)?,
            None => MatchConfig::default(),
        };

        if let Some(endpoint) = &self.classifier_endpoint {
            config.classifier.endpoint = endpoint.clone();
        }
        if let Some(id) = &self.spreadsheet_id {
            config.roster.spreadsheet_id = id.clone();
        }

        Ok(config)
    }
}
