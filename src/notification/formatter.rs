//! 富文本格式化模块 - 将带标记的文本转换为飞书 post 结构
//!
//! 飞书 post 消息不支持加粗和行内代码渲染，因此 `**bold**` 与 `` `code` ``
//! 只剥掉标记字符、保留内容本身。未闭合的标记原样输出，任何字符都不会丢失。

use serde::Serialize;

/// 单个文本片段，序列化为飞书 post 元素 `{"tag":"text","text":"..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextSpan {
    tag: &'static str,
    pub text: String,
}

impl TextSpan {
    /// 创建纯文本片段
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            tag: "text",
            text: value.into(),
        }
    }
}

/// 富文本内容 - 有序的行，每行是有序的片段序列
///
/// 序列化结果即飞书 `post.zh_cn.content` 期望的 `[[{tag, text}, ...], ...]`。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RichContent(Vec<Vec<TextSpan>>);

impl RichContent {
    pub fn lines(&self) -> &[Vec<TextSpan>] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 某一行所有片段的文本拼接（测试与诊断用）
    pub fn line_text(&self, index: usize) -> String {
        self.0
            .get(index)
            .map(|spans| spans.iter().map(|s| s.text.as_str()).collect())
            .unwrap_or_default()
    }
}

/// 富文本格式化器
pub struct RichTextFormatter;

impl RichTextFormatter {
    /// 逐行转换文本，空行（含纯空白行）直接丢弃
    pub fn format(text: &str) -> RichContent {
        let mut lines = Vec::new();
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let spans = Self::parse_line(line);
            if !spans.is_empty() {
                lines.push(spans);
            }
        }
        RichContent(lines)
    }

    /// 从左到右扫描单行，按标记拆分为片段
    fn parse_line(line: &str) -> Vec<TextSpan> {
        let mut spans = Vec::new();
        let mut rest = line;

        while !rest.is_empty() {
            // 加粗 **text**：剥掉标记，内容作为纯文本输出
            if let Some((inner, consumed)) = Self::match_bold(rest) {
                spans.push(TextSpan::text(inner));
                rest = &rest[consumed..];
                continue;
            }

            // 行内代码 `code`：同样剥掉标记
            if let Some((inner, consumed)) = Self::match_code(rest) {
                spans.push(TextSpan::text(inner));
                rest = &rest[consumed..];
                continue;
            }

            // 普通文本：消费到下一个标记出现位置为止
            let next_bold = rest.find("**");
            let next_code = rest.find('`');
            let mut end = rest.len();
            if let Some(i) = next_bold {
                end = end.min(i);
            }
            if let Some(i) = next_code {
                end = end.min(i);
            }

            if end == 0 {
                // 行首是未闭合的标记字符，逐字符原样输出
                end = rest
                    .chars()
                    .next()
                    .map(|c| c.len_utf8())
                    .unwrap_or(rest.len());
            }

            spans.push(TextSpan::text(&rest[..end]));
            rest = &rest[end..];
        }

        spans
    }

    /// 匹配行首的 `**inner**`，返回 (内容, 消费的字节数)
    ///
    /// 最短匹配：取闭合 `**` 的最早位置，内容至少一个字符。
    fn match_bold(rest: &str) -> Option<(&str, usize)> {
        let body = rest.strip_prefix("**")?;
        let close = match body.find("**") {
            // `****` 内容为空，不算标记
            Some(0) => 1 + body[1..].find("**")?,
            Some(i) => i,
            None => return None,
        };
        Some((&body[..close], 2 + close + 2))
    }

    /// 匹配行首的 `` `inner` ``，内容为非反引号字符且非空
    fn match_code(rest: &str) -> Option<(&str, usize)> {
        let body = rest.strip_prefix('`')?;
        let close = body.find('`')?;
        if close == 0 {
            return None;
        }
        Some((&body[..close], 1 + close + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span_texts(content: &RichContent, line: usize) -> Vec<String> {
        content.lines()[line]
            .iter()
            .map(|s| s.text.clone())
            .collect()
    }

    #[test]
    fn test_bold_and_code_markers_are_stripped() {
        let content = RichTextFormatter::format("Build **passed** with `no errors`");
        assert_eq!(content.lines().len(), 1);
        assert_eq!(
            span_texts(&content, 0),
            vec!["Build ", "passed", " with ", "no errors"]
        );
        assert_eq!(content.line_text(0), "Build passed with no errors");
    }

    #[test]
    fn test_blank_lines_are_dropped() {
        let content = RichTextFormatter::format("第一行\n\n  \n第二行\n\n第三行");
        assert_eq!(content.lines().len(), 3);
        assert_eq!(content.line_text(0), "第一行");
        assert_eq!(content.line_text(1), "第二行");
        assert_eq!(content.line_text(2), "第三行");
    }

    #[test]
    fn test_unclosed_markers_preserved_verbatim() {
        let content = RichTextFormatter::format("a ** b ` c");
        assert_eq!(content.line_text(0), "a ** b ` c");

        let content = RichTextFormatter::format("`tail");
        assert_eq!(content.line_text(0), "`tail");

        let content = RichTextFormatter::format("**tail");
        assert_eq!(content.line_text(0), "**tail");
    }

    #[test]
    fn test_empty_markers_not_recognized() {
        // 内容为空的 `****` 与 ``` `` ``` 不算标记
        let content = RichTextFormatter::format("x****y");
        assert_eq!(content.line_text(0), "x****y");

        let content = RichTextFormatter::format("a``b");
        assert_eq!(content.line_text(0), "a``b");
    }

    #[test]
    fn test_shortest_match_wins() {
        let content = RichTextFormatter::format("**a** and **b**");
        assert_eq!(span_texts(&content, 0), vec!["a", " and ", "b"]);
    }

    #[test]
    fn test_round_trip_strips_only_matched_pairs() {
        let cases = [
            ("🎯 任务: **重构完成**", "🎯 任务: 重构完成"),
            ("run `cargo test` now", "run cargo test now"),
            ("mix `a` and **b** here", "mix a and b here"),
            ("trailing **", "trailing **"),
            ("no markers at all", "no markers at all"),
        ];
        for (input, expected) in cases {
            let content = RichTextFormatter::format(input);
            assert_eq!(content.line_text(0), expected, "input: {input}");
        }
    }

    #[test]
    fn test_span_serializes_as_feishu_element() {
        let span = TextSpan::text("hello");
        let json = serde_json::to_value(&span).unwrap();
        assert_eq!(json, serde_json::json!({"tag": "text", "text": "hello"}));
    }
}
