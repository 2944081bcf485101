//! 配置层 - config.json + .env + 环境变量覆盖
//!
//! 配置是显式值：在入口处加载一次，传给分发器和各渠道，没有全局单例。
//! 加载顺序：`~/.config/task-notify/config.json` 为基底，`.env`（dotenvy）
//! 注入进程环境后，环境变量覆盖文件里的凭据。

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// 顶层配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub notification: NotificationConfig,
}

/// 通知相关配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default)]
    pub feishu: FeishuConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub sound: SoundConfig,
}

/// 飞书 webhook 配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeishuConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub webhook_url: String,
}

/// Telegram Bot 配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub bot_token: String,
    #[serde(default)]
    pub chat_id: String,
    /// 可选的 HTTP 代理（支持 user:pass@ 形式的 Basic 认证）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
}

/// 声音提醒配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SoundConfig {
    #[serde(default)]
    pub enabled: bool,
}

impl AppConfig {
    /// 加载配置：config.json + .env + 环境变量覆盖
    pub fn load() -> Self {
        // .env 不存在时静默使用系统环境变量
        if dotenvy::dotenv().is_ok() {
            debug!("loaded .env file");
        }

        let mut config = match Self::config_path() {
            Some(path) if path.exists() => match Self::from_file(&path) {
                Ok(config) => config,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to read config file, using env only");
                    Self::default()
                }
            },
            _ => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// 从指定文件读取配置
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read {} failed", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("parse {} failed", path.display()))
    }

    /// 写入配置文件（目录不存在时创建）
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create {} failed", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("write {} failed", path.display()))
    }

    /// 默认配置文件路径 `~/.config/task-notify/config.json`
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config/task-notify/config.json"))
    }

    /// 用环境变量覆盖文件配置
    ///
    /// `FEISHU_WEBHOOK_URL` 直接启用飞书渠道；Telegram 的凭据可由环境变量
    /// 提供，但 enabled 开关仍来自配置文件。
    pub fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var("FEISHU_WEBHOOK_URL").filter(|v| !v.is_empty()) {
            self.notification.feishu.webhook_url = url;
            self.notification.feishu.enabled = true;
        }
        if let Some(token) = var("TELEGRAM_BOT_TOKEN").filter(|v| !v.is_empty()) {
            self.notification.telegram.bot_token = token;
        }
        if let Some(chat_id) = var("TELEGRAM_CHAT_ID").filter(|v| !v.is_empty()) {
            self.notification.telegram.chat_id = chat_id;
        }
        if let Some(proxy) = var("TELEGRAM_PROXY_URL").filter(|v| !v.is_empty()) {
            self.notification.telegram.proxy_url = Some(proxy);
        }
    }
}
