//! 通知结果汇总输出
//!
//! 逐渠道 ✅/❌ 加上各渠道的提醒效果说明，只用于人读，不参与控制流。

use crate::notification::channel::{ChannelKind, DispatchResult};

/// 打印通知发送结果汇总
pub fn print_dispatch_summary(kinds: &[ChannelKind], results: &[DispatchResult]) {
    println!();
    println!("📊 通知发送结果汇总：");

    for kind in kinds {
        let result = results.iter().find(|r| r.channel == kind.id());
        let status = match result {
            Some(r) if r.success => "✅ 成功".to_string(),
            Some(r) => match &r.error {
                Some(detail) => format!("❌ 失败 ({detail})"),
                None => "❌ 失败".to_string(),
            },
            None => "❌ 失败".to_string(),
        };
        println!("  {} {}：{}", kind.icon(), kind.display_name(), status);
    }

    println!();
    println!("🎯 提醒效果：");
    for kind in kinds {
        for note in kind.effect_notes() {
            println!("  {note}");
        }
    }
    println!();
}

/// 已启用渠道的图标串，如 "📱 📲"
pub fn enabled_channel_icons(kinds: &[ChannelKind]) -> String {
    kinds
        .iter()
        .map(|k| k.icon())
        .collect::<Vec<_>>()
        .join(" ")
}
