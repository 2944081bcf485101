//! 任务完成声音提醒
//!
//! 按平台挑选系统自带的播放命令，失败只记日志并退化为终端响铃。

use std::process::{Command, Stdio};

use tracing::{debug, warn};

/// 播放任务完成提示音
pub fn play_completion_sound() {
    let result = if cfg!(target_os = "macos") {
        spawn("afplay", &["/System/Library/Sounds/Glass.aiff"])
    } else if cfg!(target_os = "windows") {
        spawn("powershell", &["-Command", "[console]::Beep(800, 500)"])
    } else {
        spawn(
            "paplay",
            &["/usr/share/sounds/freedesktop/stereo/complete.oga"],
        )
    };

    match result {
        Ok(()) => debug!("completion sound spawned"),
        Err(e) => {
            warn!(error = %e, "sound command failed, falling back to terminal bell");
            // ASCII BEL
            eprint!("\x07");
        }
    }
}

fn spawn(program: &str, args: &[&str]) -> std::io::Result<()> {
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
}
