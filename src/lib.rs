//! Task Notify - 任务完成通知系统（飞书 / Telegram）

pub mod cli;
pub mod config;
pub mod gitinfo;
pub mod notification;
pub mod project;
pub mod sound;

pub use config::{AppConfig, FeishuConfig, NotificationConfig, SoundConfig, TelegramConfig};
pub use gitinfo::GitInfo;
pub use notification::{
    ChannelAdapter, ChannelKind, DispatchResult, FeishuChannel, MessageStyle,
    NotificationDispatcher, NotificationTask, RichContent, RichTextFormatter, TaskStatus,
    TelegramChannel, TextSpan, TokenUsage, TransportClient,
};
pub use project::resolve_project_name;
