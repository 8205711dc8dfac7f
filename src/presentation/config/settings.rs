use std::path::PathBuf;
use std::time::Duration;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File};
use serde::Deserialize;

use crate::application::ports::ExtractionProfile;
use crate::application::services::{
    DEFAULT_ERROR_EXCERPT_CHARS, DEFAULT_SIGNATURE, DEFAULT_TITLE_PLACEHOLDER, DeliveryPolicy,
};

use super::Environment;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub telegram: TelegramSettings,
    pub extraction: ExtractionSettings,
    pub delivery: DeliverySettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramSettings {
    pub bot_token: String,
    pub api_base_url: String,
    pub listener_enabled: bool,
    pub poll_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionSettings {
    pub binary: String,
    pub working_dir: PathBuf,
    pub audio_codec: String,
    pub audio_bitrate_kbps: u32,
    pub youtube_player_clients: Vec<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeliverySettings {
    pub signature: String,
    pub error_excerpt_chars: usize,
    pub title_placeholder: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub json: bool,
}

impl Settings {
    /// Layers `appsettings.<env>` and `APP_*` variables over the defaults.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Self::default_builder()?
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str())).required(false),
            )
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("extraction.youtube_player_clients")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn default_builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 10000)?
            .set_default("telegram.api_base_url", "https://api.telegram.org")?
            .set_default("telegram.listener_enabled", true)?
            .set_default("telegram.poll_timeout_secs", 30)?
            .set_default("extraction.binary", "yt-dlp")?
            .set_default("extraction.working_dir", "downloads")?
            .set_default("extraction.audio_codec", "mp3")?
            .set_default("extraction.audio_bitrate_kbps", 192)?
            .set_default("extraction.youtube_player_clients", vec!["android", "ios"])?
            .set_default("delivery.signature", DEFAULT_SIGNATURE)?
            .set_default(
                "delivery.error_excerpt_chars",
                DEFAULT_ERROR_EXCERPT_CHARS as u64,
            )?
            .set_default("delivery.title_placeholder", DEFAULT_TITLE_PLACEHOLDER)?
            .set_default("logging.json", false)
    }
}

impl ExtractionSettings {
    pub fn profile(&self) -> ExtractionProfile {
        let mut profile = ExtractionProfile::new(&self.working_dir);
        profile.audio_codec = self.audio_codec.clone();
        profile.audio_bitrate_kbps = self.audio_bitrate_kbps;
        profile.youtube_player_clients = self.youtube_player_clients.clone();
        profile
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl DeliverySettings {
    pub fn policy(&self) -> DeliveryPolicy {
        DeliveryPolicy {
            signature: self.signature.clone(),
            error_excerpt_chars: self.error_excerpt_chars,
        }
    }
}
