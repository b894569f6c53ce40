//! The markdown subset used in replies: `**bold**` and line breaks only.
//!
//! Anything else, including single `*` or unmatched `**`, is plain text.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub text: String,
    pub bold: bool,
}

/// One rendered line.
pub type Line = Vec<Span>;

pub fn parse(content: &str) -> Vec<Line> {
    content.split('\n').map(parse_line).collect()
}

fn parse_line(line: &str) -> Line {
    let mut spans = Vec::new();
    let mut rest = line;

    while let Some(open) = rest.find("**") {
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("**") else {
            break;
        };
        push(&mut spans, &rest[..open], false);
        push(&mut spans, &after_open[..close], true);
        rest = &after_open[close + 2..];
    }
    push(&mut spans, rest, false);
    spans
}

fn push(spans: &mut Line, text: &str, bold: bool) {
    if text.is_empty() {
        return;
    }
    match spans.last_mut() {
        Some(last) if last.bold == bold => last.text.push_str(text),
        _ => spans.push(Span {
            text: text.to_string(),
            bold,
        }),
    }
}

/// Render for a terminal using ANSI bold.
pub fn to_ansi(content: &str) -> String {
    parse(content)
        .iter()
        .map(|line| {
            line.iter()
                .map(|span| {
                    if span.bold {
                        format!("\x1b[1m{}\x1b[0m", span.text)
                    } else {
                        span.text.clone()
                    }
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
