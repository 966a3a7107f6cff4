pub mod notifier;

pub use notifier::{parse_chat, TelegramNotifier};
