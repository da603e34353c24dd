use crate::model::{LineKind, TypedLine};

pub(crate) const BULLET: char = '•';

/// Split generated text into classified lines. Blank lines are dropped;
/// nothing else is validated.
pub fn classify_lines(text: &str) -> Vec<TypedLine> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let text = clean_line(line);
            TypedLine {
                kind: line_kind(&text),
                text,
            }
        })
        .collect()
}

/// Strip emphasis markers and normalize a leading `*`, `-` or `•` bullet marker.
/// Repeated `-`/`•` directly after the marker go with it.
pub(crate) fn clean_line(line: &str) -> String {
    let line = line.replace("**", "");
    let line = line.trim();
    let (is_bullet, rest) = match line.strip_prefix(['*', '-', BULLET]) {
        Some(rest) => (true, rest.trim_start_matches(['-', BULLET])),
        None => (false, line),
    };
    let rest: String = rest.chars().filter(|&c| c != '*').collect();
    let rest = rest.trim();
    if is_bullet {
        format!("{BULLET} {rest}")
    } else {
        rest.to_string()
    }
}

fn line_kind(text: &str) -> LineKind {
    let trimmed = text.trim();
    if trimmed.ends_with(':') || trimmed.to_lowercase().starts_with("example:") {
        LineKind::Heading
    } else if trimmed.starts_with(BULLET) {
        LineKind::Bullet
    } else {
        LineKind::Paragraph
    }
}
