//! 项目名称解析
//!
//! 优先级: package.json 的 name > git 远程仓库名 > 当前目录名。

use std::path::Path;
use std::process::Command;

use regex::Regex;
use tracing::debug;

/// 解析当前工作目录的项目名称
pub fn resolve_project_name() -> String {
    if let Some(name) = name_from_package_json(Path::new("package.json")) {
        debug!(name = %name, "project name from package.json");
        return name;
    }

    if let Some(name) = name_from_git_remote() {
        debug!(name = %name, "project name from git remote");
        return name;
    }

    if let Some(name) = std::env::current_dir()
        .ok()
        .and_then(|d| d.file_name().map(|s| s.to_string_lossy().into_owned()))
    {
        debug!(name = %name, "project name from directory");
        return name;
    }

    "未知项目".to_string()
}

/// 从 package.json 读取 name 字段
fn name_from_package_json(path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    let data: serde_json::Value = serde_json::from_str(&content).ok()?;
    data.get("name")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// 从 `git remote get-url origin` 提取仓库名
fn name_from_git_remote() -> Option<String> {
    let output = Command::new("git")
        .args(["remote", "get-url", "origin"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let remote = String::from_utf8_lossy(&output.stdout).trim().to_string();
    repo_name_from_remote(&remote)
}

/// 从远程 URL 提取 `.git` 前的仓库名
fn repo_name_from_remote(remote: &str) -> Option<String> {
    let re = Regex::new(r"/([^/]+)\.git$").ok()?;
    re.captures(remote)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_repo_name_from_remote() {
        assert_eq!(
            repo_name_from_remote("https://github.com/foo/my-repo.git").unwrap(),
            "my-repo"
        );
        assert_eq!(
            repo_name_from_remote("git@github.com:foo/bar.git").unwrap(),
            "bar"
        );
        assert_eq!(
            repo_name_from_remote("ssh://git@host/team/proj.git").unwrap(),
            "proj"
        );
        assert_eq!(repo_name_from_remote("https://github.com/foo/bare"), None);
    }

    #[test]
    fn test_name_from_package_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, r#"{{"name": "my-node-app", "version": "1.0.0"}}"#).unwrap();

        assert_eq!(
            name_from_package_json(&path).unwrap(),
            "my-node-app"
        );
    }

    #[test]
    fn test_name_from_package_json_missing_or_invalid() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(name_from_package_json(&dir.path().join("nope.json")), None);

        let path = dir.path().join("package.json");
        std::fs::write(&path, "not json").unwrap();
        assert_eq!(name_from_package_json(&path), None);

        std::fs::write(&path, r#"{"name": ""}"#).unwrap();
        assert_eq!(name_from_package_json(&path), None);
    }
}
