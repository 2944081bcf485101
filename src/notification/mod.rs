//! 通知核心 - 分发、传输与内容格式化
//!
//! # 设计
//! 1. 统一接口：所有渠道实现 `ChannelAdapter`（构造载荷 + 判定响应）
//! 2. 渠道解耦：每个渠道独立发送，互不影响；单渠道失败不中断其余渠道
//! 3. 并发分发：`NotificationDispatcher` 并发触发所有渠道并等待全部落定
//! 4. 传输隔离：直连 / CONNECT 隧道细节都在 `TransportClient` 内部
//!
//! # 使用示例
//! ```ignore
//! use task_notify::{AppConfig, NotificationDispatcher, NotificationTask};
//!
//! let config = AppConfig::load();
//! let dispatcher = NotificationDispatcher::from_config(&config);
//! let task = NotificationTask::new("构建完成", "my-app");
//! let results = dispatcher.dispatch_all(&task).await;
//! ```

pub mod channel;
pub mod channels;
pub mod dispatcher;
pub mod formatter;
pub mod task;
pub mod transport;

pub use channel::{ChannelAdapter, ChannelKind, DispatchResult};
pub use channels::{FeishuChannel, MessageStyle, TelegramChannel};
pub use dispatcher::NotificationDispatcher;
pub use formatter::{RichContent, RichTextFormatter, TextSpan};
pub use task::{format_duration, NotificationTask, TaskStatus, TokenUsage};
pub use transport::TransportClient;
