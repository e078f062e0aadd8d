use std::time::Duration;

use chrono::format::{Item, StrftimeItems};
use chrono_tz::Tz;
use clap::{Parser, ValueEnum};
use serde::Deserialize;

use crate::{error::Result, view::DateDisplay};

const DEFAULT_CONFIG_PATH: &str = "config/budgetview.toml";

/// Which entries the table shows when the sequence is longer than
/// `visible_rows`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OrderingPolicy {
    /// Tail of the local sequence, in fetch/append order.
    #[default]
    Insertion,
    /// Latest entries by their `date` field.
    Date,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub endpoint_path: String,
    pub visible_rows: usize,
    pub ordering: OrderingPolicy,
    pub timezone: String,
    pub date_format: String,
    pub export_path: String,
    pub request_timeout_secs: Option<u64>,
    pub accept_invalid_certs: bool,
    pub log_file: String,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "https://localhost:7060/".to_string(),
            endpoint_path: "budgettransaction".to_string(),
            visible_rows: 10,
            ordering: OrderingPolicy::Insertion,
            timezone: "UTC".to_string(),
            date_format: "%d %b %Y".to_string(),
            export_path: "transactions.csv".to_string(),
            request_timeout_secs: Some(30),
            accept_invalid_certs: false,
            log_file: "budgetview.log".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn tz(&self) -> Result<Tz> {
        self.timezone.parse::<Tz>().map_err(|err| {
            config::ConfigError::Message(format!("invalid timezone {}: {err}", self.timezone))
                .into()
        })
    }

    /// `0` disables the timeout.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn date_display(&self) -> Result<DateDisplay> {
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(config::ConfigError::Message(format!(
                "invalid date_format {}",
                self.date_format
            ))
            .into());
        }
        Ok(DateDisplay {
            timezone: self.tz()?,
            format: self.date_format.clone(),
        })
    }
}

#[derive(Debug, Parser)]
#[command(name = "budgetview", version)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override service root (e.g. https://localhost:7060/).
    #[arg(long)]
    base_url: Option<String>,
    /// Override the transaction collection path.
    #[arg(long)]
    endpoint_path: Option<String>,
    /// Maximum number of table rows.
    #[arg(long)]
    visible_rows: Option<usize>,
    /// Which entries the table shows.
    #[arg(long, value_enum)]
    ordering: Option<OrderingPolicy>,
    /// CSV export destination.
    #[arg(long)]
    export_path: Option<String>,
    /// Default log level for this crate.
    #[arg(long)]
    log_level: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("BUDGETVIEW").try_parsing(true));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(endpoint_path) = args.endpoint_path {
        settings.endpoint_path = endpoint_path;
    }
    if let Some(visible_rows) = args.visible_rows {
        settings.visible_rows = visible_rows;
    }
    if let Some(ordering) = args.ordering {
        settings.ordering = ordering;
    }
    if let Some(export_path) = args.export_path {
        settings.export_path = export_path;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }

    settings.date_display()?;
    Ok(settings)
}
