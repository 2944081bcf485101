//! 通知渠道 trait 定义
//!
//! 每个目的地只需实现两个能力：构造发送载荷、判定响应成败。
//! 传输细节由 `TransportClient` 承担，并发调度由 `NotificationDispatcher` 承担。

use serde::{Deserialize, Serialize};

use super::task::NotificationTask;

/// 渠道类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Feishu,
    Telegram,
}

impl ChannelKind {
    /// 渠道标识（用于日志和结果汇总）
    pub fn id(&self) -> &'static str {
        match self {
            ChannelKind::Feishu => "feishu",
            ChannelKind::Telegram => "telegram",
        }
    }

    /// 渠道中文名称
    pub fn display_name(&self) -> &'static str {
        match self {
            ChannelKind::Feishu => "飞书通知",
            ChannelKind::Telegram => "Telegram通知",
        }
    }

    /// 汇总输出中的渠道图标
    pub fn icon(&self) -> &'static str {
        match self {
            ChannelKind::Feishu => "📱",
            ChannelKind::Telegram => "📲",
        }
    }

    /// 该渠道对应的提醒效果说明（只用于展示，不参与控制流）
    pub fn effect_notes(&self) -> &'static [&'static str] {
        match self {
            ChannelKind::Feishu => &["📱 手机将收到飞书通知", "⌚ 小米手环会震动提醒"],
            ChannelKind::Telegram => &["📲 Telegram将收到推送通知"],
        }
    }
}

/// 单渠道发送结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchResult {
    /// 渠道标识
    pub channel: String,
    /// 是否发送成功
    pub success: bool,
    /// 失败详情
    pub error: Option<String>,
}

impl DispatchResult {
    pub fn ok(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            success: true,
            error: None,
        }
    }

    pub fn failed(channel: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            success: false,
            error: Some(error.into()),
        }
    }
}

/// 通知渠道 trait
///
/// 实现者在构造时完成凭据校验：凭据不全就不产生适配器实例，
/// 因此注册到分发器里的渠道一定可以尝试发送。
pub trait ChannelAdapter: Send + Sync {
    /// 渠道标识（用于日志和结果汇总）
    fn name(&self) -> &'static str {
        self.kind().id()
    }

    /// 渠道类型
    fn kind(&self) -> ChannelKind;

    /// 目标 HTTPS 端点
    fn endpoint(&self) -> String;

    /// 可选的转发代理（HTTP CONNECT 隧道）
    fn proxy_url(&self) -> Option<String> {
        None
    }

    /// 从任务构造该渠道的发送载荷
    fn build_payload(&self, task: &NotificationTask) -> serde_json::Value;

    /// 判定响应体是否表示发送成功
    fn interpret_response(&self, body: &serde_json::Value) -> bool;

    /// 从失败响应中提取渠道自己的错误描述
    fn failure_detail(&self, body: &serde_json::Value) -> Option<String> {
        let _ = body;
        None
    }
}
