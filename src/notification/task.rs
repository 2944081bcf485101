//! 通知任务模型 - 一次"任务完成"通知携带的全部信息
//!
//! 由调用方构造一次、所有渠道只读共享，渠道各自决定如何渲染。

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::gitinfo::GitInfo;

/// 任务状态
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Success,
    Warning,
    Error,
}

impl TaskStatus {
    /// 状态图标
    pub fn icon(&self) -> &'static str {
        match self {
            TaskStatus::Success => "✅",
            TaskStatus::Warning => "⚠️",
            TaskStatus::Error => "❌",
        }
    }

    /// 状态中文标签
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Success => "成功",
            TaskStatus::Warning => "警告",
            TaskStatus::Error => "失败",
        }
    }
}

/// Token 消耗信息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input: Option<u64>,
    pub output: Option<u64>,
    pub total: Option<u64>,
    pub cache_read: Option<u64>,
    pub cache_write: Option<u64>,
}

impl TokenUsage {
    /// 渲染为一行摘要，信息不足时返回 None
    pub fn render(&self) -> Option<String> {
        let mut info = match (self.total, self.input, self.output) {
            (Some(total), _, _) => format!("总计: {}", group_thousands(total)),
            (None, Some(input), Some(output)) => format!(
                "输入: {} | 输出: {} | 总计: {}",
                group_thousands(input),
                group_thousands(output),
                group_thousands(input + output)
            ),
            (None, Some(input), None) => format!("输入: {}", group_thousands(input)),
            _ => return None,
        };

        if self.cache_read.is_some() || self.cache_write.is_some() {
            info.push_str(&format!(
                " (缓存读: {} | 缓存写: {})",
                group_thousands(self.cache_read.unwrap_or(0)),
                group_thousands(self.cache_write.unwrap_or(0))
            ));
        }

        Some(info)
    }
}

/// 千分位分组，如 12345 -> "12,345"
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// 通知任务 - 构造后不可变，被所有渠道只读消费
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationTask {
    /// 任务信息（通知正文的主语）
    pub task_info: String,
    /// 自定义标题，缺省时用 "项目名: 任务信息"
    pub title: Option<String>,
    /// 任务状态
    pub status: TaskStatus,
    /// 任务详细描述
    pub description: Option<String>,
    /// 提示词摘要（原始文本，渲染时压缩空白并截断）
    pub prompt_summary: Option<String>,
    /// 任务开始时间
    pub start_time: Option<DateTime<Local>>,
    /// Token 消耗
    pub tokens: Option<TokenUsage>,
    /// 项目名称
    pub project_name: String,
    /// Git 仓库信息
    pub git_info: Option<GitInfo>,
}

impl NotificationTask {
    /// 创建最简任务
    pub fn new(task_info: impl Into<String>, project_name: impl Into<String>) -> Self {
        Self {
            task_info: task_info.into(),
            title: None,
            status: TaskStatus::Success,
            description: None,
            prompt_summary: None,
            start_time: None,
            tokens: None,
            project_name: project_name.into(),
            git_info: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_prompt_summary(mut self, prompt: impl Into<String>) -> Self {
        self.prompt_summary = Some(prompt.into());
        self
    }

    pub fn with_start_time(mut self, start_time: DateTime<Local>) -> Self {
        self.start_time = Some(start_time);
        self
    }

    pub fn with_tokens(mut self, tokens: TokenUsage) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn with_git_info(mut self, git_info: GitInfo) -> Self {
        self.git_info = Some(git_info);
        self
    }

    /// 显示标题：自定义标题 > "项目名: 任务信息" > 任务信息
    pub fn display_title(&self) -> String {
        if let Some(title) = &self.title {
            return title.clone();
        }
        if self.project_name.is_empty() {
            self.task_info.clone()
        } else {
            format!("{}: {}", self.project_name, self.task_info)
        }
    }

    /// 压缩空白并截断到 120 字符的提示词摘要
    pub fn short_prompt(&self) -> Option<String> {
        let raw = self.prompt_summary.as_deref()?;
        let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if normalized.is_empty() {
            return None;
        }
        if normalized.chars().count() > 120 {
            let head: String = normalized.chars().take(117).collect();
            Some(format!("{head}..."))
        } else {
            Some(normalized)
        }
    }
}

/// 格式化执行时长，如 "1小时2分3秒"
pub fn format_duration(duration: chrono::Duration) -> String {
    let total_secs = duration.num_seconds();
    if total_secs < 0 {
        return "未知".to_string();
    }

    let hours = total_secs / 3600;
    let minutes = total_secs / 60;
    let seconds = total_secs;

    if hours > 0 {
        format!("{}小时{}分{}秒", hours, minutes % 60, seconds % 60)
    } else if minutes > 0 {
        format!("{}分{}秒", minutes, seconds % 60)
    } else {
        format!("{}秒", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_title() {
        let task = NotificationTask::new("构建完成", "my-app");
        assert_eq!(task.display_title(), "my-app: 构建完成");

        let task = NotificationTask::new("构建完成", "");
        assert_eq!(task.display_title(), "构建完成");

        let task = NotificationTask::new("构建完成", "my-app").with_title("自定义");
        assert_eq!(task.display_title(), "自定义");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(chrono::Duration::seconds(5)), "5秒");
        assert_eq!(format_duration(chrono::Duration::seconds(65)), "1分5秒");
        assert_eq!(format_duration(chrono::Duration::seconds(3725)), "1小时2分5秒");
        assert_eq!(format_duration(chrono::Duration::seconds(-1)), "未知");
    }

    #[test]
    fn test_token_usage_render() {
        let usage = TokenUsage {
            total: Some(12345),
            ..Default::default()
        };
        assert_eq!(usage.render().unwrap(), "总计: 12,345");

        let usage = TokenUsage {
            input: Some(1000),
            output: Some(234),
            ..Default::default()
        };
        assert_eq!(usage.render().unwrap(), "输入: 1,000 | 输出: 234 | 总计: 1,234");

        let usage = TokenUsage {
            input: Some(10),
            cache_read: Some(5),
            ..Default::default()
        };
        assert_eq!(usage.render().unwrap(), "输入: 10 (缓存读: 5 | 缓存写: 0)");

        assert_eq!(TokenUsage::default().render(), None);
    }

    #[test]
    fn test_short_prompt_normalizes_and_truncates() {
        let task = NotificationTask::new("t", "p").with_prompt_summary("  a\n\n b\tc  ");
        assert_eq!(task.short_prompt().unwrap(), "a b c");

        let long = "x".repeat(200);
        let task = NotificationTask::new("t", "p").with_prompt_summary(long);
        let short = task.short_prompt().unwrap();
        assert_eq!(short.chars().count(), 120);
        assert!(short.ends_with("..."));

        let task = NotificationTask::new("t", "p").with_prompt_summary("   ");
        assert_eq!(task.short_prompt(), None);
    }
}
