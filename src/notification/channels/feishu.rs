//! 飞书 webhook 渠道
//!
//! 自定义机器人 webhook，请求 `{msg_type, content}`，响应 `{code, msg}`，
//! `code == 0` 表示成功。富文本（post）正文由 `RichTextFormatter` 生成。

use chrono::Local;
use serde_json::json;
use tracing::{info, warn};

use crate::config::FeishuConfig;
use crate::notification::channel::{ChannelAdapter, ChannelKind};
use crate::notification::formatter::RichTextFormatter;
use crate::notification::task::{format_duration, NotificationTask};

/// 飞书消息形态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageStyle {
    /// 纯文本 text
    Text,
    /// 富文本 post（默认）
    #[default]
    Post,
    /// 交互式卡片 interactive
    Card,
}

/// 卡片模板 ID（interactive 消息用）
const CARD_TEMPLATE_ID: &str = "AAqKGP7Qx6y9R";

/// 飞书 webhook 渠道
pub struct FeishuChannel {
    webhook_url: String,
    style: MessageStyle,
}

impl FeishuChannel {
    /// 从配置构造；未启用或凭据缺失时返回 None，之后不会有任何网络活动
    pub fn from_config(config: &FeishuConfig) -> Option<Self> {
        if !config.enabled {
            info!(channel = "feishu", "channel disabled");
            return None;
        }
        if config.webhook_url.is_empty() || config.webhook_url.contains("YOUR_WEBHOOK_URL_HERE") {
            warn!(
                channel = "feishu",
                "channel enabled but webhook_url is not configured"
            );
            return None;
        }
        Some(Self {
            webhook_url: config.webhook_url.clone(),
            style: MessageStyle::default(),
        })
    }

    /// 设置消息形态
    pub fn with_style(mut self, style: MessageStyle) -> Self {
        self.style = style;
        self
    }

    /// 构造通知正文（富文本源，`**`/`` ` `` 标记在格式化时被剥掉）
    fn build_content(task: &NotificationTask) -> String {
        let mut content = format!("🎯 任务: {}", task.task_info);

        if let Some(prompt) = task.short_prompt() {
            content.push_str(&format!("\n\n🧩 提示词摘要: {prompt}"));
        }

        content.push_str(&format!(
            "\n\n{} 状态: {}",
            task.status.icon(),
            task.status.label()
        ));

        let now = Local::now();
        content.push_str(&format!("\n\n⏰ 完成时间: {}", now.format("%Y-%m-%d %H:%M:%S")));

        if let Some(start) = task.start_time {
            content.push_str(&format!(
                "\n🚀 开始时间: {}\n⏱️ 执行时长: {}",
                start.format("%Y-%m-%d %H:%M:%S"),
                format_duration(now - start)
            ));
        }

        if let Some(tokens) = task.tokens.as_ref().and_then(|t| t.render()) {
            content.push_str(&format!("\n📊 Token消耗: {tokens}"));
        }

        if let Some(description) = &task.description {
            content.push_str(&format!("\n\n📝 任务详情:\n{description}"));
        }

        if let Some(git) = &task.git_info {
            content.push_str(&format!(
                "\n\n🔧 仓库信息:\n• 分支: {}\n• 提交: {} - {}\n• 作者: {}\n• 日期: {}",
                git.branch, git.commit_hash, git.commit_message, git.commit_author, git.commit_time
            ));
            if let Some(status) = &git.status {
                content.push_str(&format!("\n• 工作区: {status}"));
            }
            if let Some(unpushed) = &git.unpushed {
                content.push_str(&format!("\n• {unpushed}"));
            }
        }

        content.push_str(&format!(
            "\n\n💻 环境: {} {}",
            std::env::consts::OS,
            std::env::consts::ARCH
        ));
        content.push_str("\n\n💡 可以查看执行结果了！");

        content
    }
}

impl ChannelAdapter for FeishuChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Feishu
    }

    fn endpoint(&self) -> String {
        self.webhook_url.clone()
    }

    fn build_payload(&self, task: &NotificationTask) -> serde_json::Value {
        let title = task.display_title();
        let content = Self::build_content(task);

        match self.style {
            MessageStyle::Text => json!({
                "msg_type": "text",
                "content": { "text": format!("{title}\n\n{content}") }
            }),
            MessageStyle::Post => json!({
                "msg_type": "post",
                "content": {
                    "post": {
                        "zh_cn": {
                            "title": title,
                            "content": RichTextFormatter::format(&content),
                        }
                    }
                }
            }),
            MessageStyle::Card => json!({
                "msg_type": "interactive",
                "content": {
                    "type": "template",
                    "data": {
                        "template_id": CARD_TEMPLATE_ID,
                        "template_variable": {
                            "title": title,
                            "content": content,
                        }
                    }
                }
            }),
        }
    }

    fn interpret_response(&self, body: &serde_json::Value) -> bool {
        body.get("code").and_then(|v| v.as_i64()) == Some(0)
    }

    fn failure_detail(&self, body: &serde_json::Value) -> Option<String> {
        body.get("msg").and_then(|v| v.as_str()).map(String::from)
    }
}
