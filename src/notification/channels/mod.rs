//! 各通知渠道实现

pub mod feishu;
pub mod telegram;

pub use feishu::{FeishuChannel, MessageStyle};
pub use telegram::TelegramChannel;
