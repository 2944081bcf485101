//! 交互式配置向导
//!
//! 引导用户配置飞书 webhook（必选）与 Telegram Bot（可选），写入
//! `~/.config/task-notify/config.json`。

use anyhow::{anyhow, Context, Result};
use dialoguer::{Confirm, Input};

use crate::config::AppConfig;

/// 运行配置向导
pub fn run_setup_wizard() -> Result<()> {
    println!("🚀 任务完成通知系统 - 配置向导");
    println!("{}", "=".repeat(50));
    println!();
    println!("📋 这个向导将帮助您配置通知渠道，让任务完成时能够通知您。");
    println!();
    println!("📱 飞书 Webhook 配置步骤：");
    println!("1. 📲 在飞书中创建一个群组（可以只包含你自己）");
    println!("2. ⚙️  进入群组设置 > 群机器人 > 添加机器人");
    println!("3. 🤖 选择\"自定义机器人\"并点击\"添加\"");
    println!("4. 📝 设置机器人名称（如：任务提醒助手）");
    println!("5. 🔗 复制生成的 Webhook 地址");
    println!();

    let mut config = AppConfig::config_path()
        .filter(|p| p.exists())
        .and_then(|p| AppConfig::from_file(&p).ok())
        .unwrap_or_default();

    let webhook_url: String = Input::new()
        .with_prompt("🔗 请粘贴您的飞书 webhook 地址")
        .validate_with(|input: &String| -> std::result::Result<(), &str> {
            if input.starts_with("https://open.feishu.cn") {
                Ok(())
            } else {
                Err("无效的 webhook 地址！请确保地址以 https://open.feishu.cn 开头")
            }
        })
        .interact_text()
        .context("read webhook url failed")?;

    config.notification.feishu.enabled = true;
    config.notification.feishu.webhook_url = webhook_url;

    if Confirm::new()
        .with_prompt("📲 是否同时配置 Telegram 通知？")
        .default(false)
        .interact()?
    {
        let bot_token: String = Input::new()
            .with_prompt("🤖 Bot Token（与 @BotFather 对话获取）")
            .interact_text()?;
        let chat_id: String = Input::new()
            .with_prompt("💬 Chat ID")
            .interact_text()?;
        let proxy: String = Input::new()
            .with_prompt("🌐 HTTP 代理地址（可选，直接回车跳过）")
            .allow_empty(true)
            .interact_text()?;

        config.notification.telegram.enabled = true;
        config.notification.telegram.bot_token = bot_token;
        config.notification.telegram.chat_id = chat_id;
        config.notification.telegram.proxy_url =
            if proxy.is_empty() { None } else { Some(proxy) };
    }

    config.notification.sound.enabled = Confirm::new()
        .with_prompt("🔊 任务完成时播放提示音？")
        .default(config.notification.sound.enabled)
        .interact()?;

    println!();
    println!("⏳ 正在写入配置...");

    let path = AppConfig::config_path().ok_or_else(|| anyhow!("cannot find home directory"))?;
    config.save(&path)?;

    println!("✅ 配置已保存到 {}", path.display());
    println!("💡 运行 `task-notify send --message \"测试\"` 验证通知是否可达");
    Ok(())
}
