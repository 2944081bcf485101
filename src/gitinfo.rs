//! Git 仓库信息采集 - 通知正文中的"仓库信息"区块
//!
//! 全部通过 `git` 子进程获取；不在仓库内时返回 None，通知里就不带该区块。

use std::path::Path;
use std::process::Command;

use serde::{Deserialize, Serialize};

/// Git 仓库信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitInfo {
    /// 仓库根目录
    pub root: String,
    /// 仓库目录名
    pub project_name: String,
    /// 当前分支
    pub branch: String,
    /// 最近提交短哈希
    pub commit_hash: String,
    /// 最近提交标题
    pub commit_message: String,
    /// 最近提交作者
    pub commit_author: String,
    /// 最近提交日期（YYYY-MM-DD）
    pub commit_time: String,
    /// 工作区状态摘要，干净时为 None
    pub status: Option<String>,
    /// 未推送提交提示，无则为 None
    pub unpushed: Option<String>,
}

impl GitInfo {
    /// 在当前目录采集 Git 信息
    pub fn collect() -> Option<Self> {
        let root = git(&["rev-parse", "--show-toplevel"])?;
        let project_name = Path::new(&root)
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.clone());

        let branch = git(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        let commit_hash = git(&["rev-parse", "--short", "HEAD"])?;
        let commit_message = git(&["log", "-1", "--pretty=%s"])?;
        let commit_author = git(&["log", "-1", "--pretty=%an"])?;
        let commit_time = git(&["log", "-1", "--pretty=%ci"])?
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string();

        let status = git(&["status", "--porcelain"]).and_then(|out| summarize_status(&out));

        // 可能没有上游分支，失败时直接忽略
        let unpushed = git(&["rev-list", "--count", "@{u}..HEAD"])
            .and_then(|count| count.parse::<u64>().ok())
            .filter(|n| *n > 0)
            .map(|n| format!("有 {n} 个未推送提交"));

        Some(Self {
            root,
            project_name,
            branch,
            commit_hash,
            commit_message,
            commit_author,
            commit_time,
            status,
            unpushed,
        })
    }
}

/// 运行 git 命令，失败或非零退出返回 None
fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// 汇总 `git status --porcelain` 输出为中文摘要
fn summarize_status(porcelain: &str) -> Option<String> {
    if porcelain.trim().is_empty() {
        return None;
    }

    let lines: Vec<&str> = porcelain.trim().lines().collect();
    let modified = lines.iter().filter(|l| l.starts_with(" M")).count();
    let staged = lines.iter().filter(|l| l.starts_with('M')).count();
    let untracked = lines.iter().filter(|l| l.starts_with("??")).count();

    let mut parts = Vec::new();
    if modified > 0 {
        parts.push(format!("{modified} 个修改"));
    }
    if staged > 0 {
        parts.push(format!("{staged} 个暂存"));
    }
    if untracked > 0 {
        parts.push(format!("{untracked} 个未跟踪"));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}
