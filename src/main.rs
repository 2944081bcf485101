//! Task Notify CLI
//!
//! 任务完成后发送飞书 / Telegram 通知，适合挂在自动化钩子的收尾处。

use anyhow::Result;
use chrono::{DateTime, Local, TimeZone};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use task_notify::cli::{enabled_channel_icons, print_dispatch_summary, run_setup_wizard};
use task_notify::{
    AppConfig, GitInfo, NotificationDispatcher, NotificationTask, TaskStatus, TokenUsage,
};

#[derive(Parser)]
#[command(name = "task-notify")]
#[command(about = "任务完成通知系统 - 发送飞书 / Telegram 提醒")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 发送任务完成通知
    Send(SendArgs),
    /// 交互式配置向导
    Setup,
    /// 列出已配置的通知渠道
    Channels {
        /// 输出 JSON 格式
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct SendArgs {
    /// 任务信息
    #[arg(long, short, default_value = "任务已完成")]
    message: String,
    /// 自定义标题（默认 "项目名: 任务信息"）
    #[arg(long, short)]
    title: Option<String>,
    /// 任务状态
    #[arg(long, short, value_enum, default_value_t = TaskStatus::Success)]
    status: TaskStatus,
    /// 任务详细描述
    #[arg(long, short)]
    description: Option<String>,
    /// 提示词摘要
    #[arg(long)]
    prompt: Option<String>,
    /// 任务开始时间（RFC3339 或毫秒时间戳）
    #[arg(long)]
    start_time: Option<String>,
    /// Token 消耗（"total" 或 "input,output"）
    #[arg(long)]
    tokens: Option<String>,
    /// 项目名称（默认自动探测）
    #[arg(long, short)]
    project: Option<String>,
    /// 只打印不发送
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 通过 RUST_LOG 控制日志级别，默认 info
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("task_notify=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Send(args) => handle_send(args).await?,
        Commands::Setup => run_setup_wizard()?,
        Commands::Channels { json } => handle_channels(json)?,
    }

    Ok(())
}

async fn handle_send(args: SendArgs) -> Result<()> {
    let config = AppConfig::load();
    let dispatcher = NotificationDispatcher::from_config(&config).with_dry_run(args.dry_run);

    if dispatcher.channel_count() == 0 {
        println!("⚠️  未配置任何通知渠道");
        println!("📝 运行 `task-notify setup` 完成配置，");
        println!("   或设置 FEISHU_WEBHOOK_URL / TELEGRAM_BOT_TOKEN 等环境变量");
        return Ok(());
    }

    let project_name = args
        .project
        .unwrap_or_else(task_notify::resolve_project_name);

    let kinds = dispatcher.channel_kinds();
    println!("🚀 开始发送任务完成通知... {}", enabled_channel_icons(&kinds));
    println!("📁 项目名称：{project_name}");
    println!("📝 任务信息：{}", args.message);

    let mut task = NotificationTask::new(args.message, project_name).with_status(args.status);
    if let Some(title) = args.title {
        task = task.with_title(title);
    }
    if let Some(description) = args.description {
        task = task.with_description(description);
    }
    if let Some(prompt) = args.prompt {
        task = task.with_prompt_summary(prompt);
    }
    if let Some(raw) = args.start_time.as_deref() {
        match parse_start_time(raw) {
            Some(start) => task = task.with_start_time(start),
            None => println!("⚠️  无法解析开始时间: {raw}"),
        }
    }
    if let Some(raw) = args.tokens.as_deref() {
        match parse_tokens(raw) {
            Some(tokens) => task = task.with_tokens(tokens),
            None => println!("⚠️  无法解析 Token 消耗: {raw}"),
        }
    }
    if let Some(git) = GitInfo::collect() {
        task = task.with_git_info(git);
    }

    let results = dispatcher.dispatch_all(&task).await;
    print_dispatch_summary(&kinds, &results);

    if config.notification.sound.enabled && !args.dry_run {
        task_notify::sound::play_completion_sound();
    }

    // 通知失败不是致命错误，进程始终正常退出
    Ok(())
}

fn handle_channels(json: bool) -> Result<()> {
    let config = AppConfig::load();
    let dispatcher = NotificationDispatcher::from_config(&config);
    let kinds = dispatcher.channel_kinds();

    if json {
        let ids: Vec<&str> = kinds.iter().map(|k| k.id()).collect();
        println!("{}", serde_json::to_string_pretty(&ids)?);
        return Ok(());
    }

    if kinds.is_empty() {
        println!("⚠️  未配置任何通知渠道，运行 `task-notify setup` 开始配置");
    } else {
        println!("已启用 {} 个通知渠道：", kinds.len());
        for kind in kinds {
            println!("  {} {}", kind.icon(), kind.display_name());
        }
    }
    Ok(())
}

/// 解析开始时间：先试 RFC3339，再试毫秒时间戳
fn parse_start_time(raw: &str) -> Option<DateTime<Local>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Local));
    }
    let millis = raw.parse::<i64>().ok()?;
    Local.timestamp_millis_opt(millis).single()
}

/// 解析 Token 消耗："total" 或 "input,output"
fn parse_tokens(raw: &str) -> Option<TokenUsage> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [total] => Some(TokenUsage {
            total: Some(total.parse().ok()?),
            ..Default::default()
        }),
        [input, output, ..] => Some(TokenUsage {
            input: Some(input.parse().ok()?),
            output: Some(output.parse().ok()?),
            ..Default::default()
        }),
        _ => None,
    }
}
