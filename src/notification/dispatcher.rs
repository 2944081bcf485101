//! 通知分发器 - 并发驱动所有已启用渠道并收集结果
//!
//! 一次 `dispatch_all`：每个渠道 spawn 一个任务并发发送，等待全部落定。
//! 任何单渠道失败（网络、协议、甚至 panic）都不影响其余渠道的结果收集，
//! 结果条数恒等于已注册渠道数。

use std::sync::Arc;

use tracing::{info, warn};

use super::channel::{ChannelAdapter, ChannelKind, DispatchResult};
use super::channels::{FeishuChannel, TelegramChannel};
use super::task::NotificationTask;
use super::transport::TransportClient;
use crate::config::AppConfig;

/// 通知分发器
pub struct NotificationDispatcher {
    /// 所有注册的渠道
    channels: Vec<Arc<dyn ChannelAdapter>>,
    transport: TransportClient,
    /// dry-run 模式只打印不发送
    dry_run: bool,
}

impl NotificationDispatcher {
    /// 创建空分发器
    pub fn new() -> Self {
        Self {
            channels: Vec::new(),
            transport: TransportClient::new(),
            dry_run: false,
        }
    }

    /// 从配置构造：凭据齐全且启用的渠道才会被注册
    pub fn from_config(config: &AppConfig) -> Self {
        let mut dispatcher = Self::new();
        if let Some(feishu) = FeishuChannel::from_config(&config.notification.feishu) {
            dispatcher.register_channel(Arc::new(feishu));
        }
        if let Some(telegram) = TelegramChannel::from_config(&config.notification.telegram) {
            dispatcher.register_channel(Arc::new(telegram));
        }
        dispatcher
    }

    /// 设置 dry-run 模式
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// 注册渠道
    pub fn register_channel(&mut self, channel: Arc<dyn ChannelAdapter>) {
        info!(channel = channel.name(), "Registering notification channel");
        self.channels.push(channel);
    }

    /// 已注册的渠道数量
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// 已注册的渠道类型
    pub fn channel_kinds(&self) -> Vec<ChannelKind> {
        self.channels.iter().map(|c| c.kind()).collect()
    }

    /// 并发发送到所有渠道，等待全部落定后返回逐渠道结果
    ///
    /// 不保证渠道间的完成顺序；返回顺序即注册顺序。
    pub async fn dispatch_all(&self, task: &NotificationTask) -> Vec<DispatchResult> {
        let mut handles = Vec::with_capacity(self.channels.len());

        for channel in &self.channels {
            let channel = Arc::clone(channel);
            let transport = self.transport.clone();
            let task = task.clone();
            let dry_run = self.dry_run;
            let name = channel.name().to_string();
            let handle = tokio::spawn(async move { send_one(channel, transport, task, dry_run).await });
            handles.push((name, handle));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (name, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                // 渠道任务 panic 也只算该渠道失败
                Err(e) => {
                    warn!(channel = %name, error = %e, "channel task aborted");
                    DispatchResult::failed(name, format!("internal fault: {e}"))
                }
            };
            results.push(result);
        }
        results
    }
}

impl Default for NotificationDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// 单渠道发送：构造载荷 → 传输 → 判定响应
async fn send_one(
    channel: Arc<dyn ChannelAdapter>,
    transport: TransportClient,
    task: NotificationTask,
    dry_run: bool,
) -> DispatchResult {
    let name = channel.name();

    if dry_run {
        eprintln!("[DRY-RUN] Would send to channel: {name}");
        return DispatchResult::ok(name);
    }

    let payload = channel.build_payload(&task);
    match transport
        .post_json(&channel.endpoint(), channel.proxy_url().as_deref(), &payload)
        .await
    {
        Ok(body) => {
            if channel.interpret_response(&body) {
                info!(channel = name, "notification sent");
                DispatchResult::ok(name)
            } else {
                let detail = channel
                    .failure_detail(&body)
                    .unwrap_or_else(|| "unknown error".to_string());
                warn!(channel = name, detail = %detail, "channel reported failure");
                DispatchResult::failed(name, detail)
            }
        }
        Err(e) => DispatchResult::failed(name, e.to_string()),
    }
}
