mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    DeliverySettings, ExtractionSettings, LoggingSettings, ServerSettings, Settings,
    TelegramSettings,
};
