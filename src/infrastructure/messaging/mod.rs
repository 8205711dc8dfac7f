mod telegram_client;
mod telegram_listener;

pub use telegram_client::{Chat, IncomingMessage, TelegramBotClient, Update};
pub use telegram_listener::{ListenerHandle, TelegramListener, command_name, usage_text};
