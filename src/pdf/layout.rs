use crate::model::{DisplayLine, PaperSize, TypedLine};

pub const INCH: f32 = 72.0;

/// Gap between the top margin and the first body line.
const BODY_INSET: f32 = 20.0;
/// Space kept free above the bottom margin for the footer.
const FOOTER_RESERVE: f32 = 60.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
}

impl PageGeometry {
    pub fn for_paper(paper: PaperSize) -> Self {
        let (page_width, page_height) = paper.dimensions();
        Self {
            page_width,
            page_height,
            margin_left: 0.75 * INCH,
            margin_right: 0.75 * INCH,
            margin_top: INCH,
            margin_bottom: 0.75 * INCH,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.page_width - self.margin_left - self.margin_right
    }

    pub fn content_right(&self) -> f32 {
        self.page_width - self.margin_right
    }

    pub fn center_x(&self) -> f32 {
        self.page_width / 2.0
    }

    /// Baseline of the first body line on a content page.
    pub fn body_top(&self) -> f32 {
        self.page_height - self.margin_top - BODY_INSET
    }

    /// A body line whose baseline would sit below this starts a new page.
    pub fn break_threshold(&self) -> f32 {
        self.margin_bottom + FOOTER_RESERVE
    }

    pub fn header_y(&self) -> f32 {
        self.page_height - 0.5 * INCH
    }

    pub fn header_rule_y(&self) -> f32 {
        self.page_height - 0.6 * INCH
    }

    pub fn footer_y(&self) -> f32 {
        0.5 * INCH
    }

    /// Wrap width in characters, assuming half an em per character.
    pub fn wrap_columns(&self, font_size: f32) -> usize {
        ((self.content_width() / (font_size / 2.0)).floor() as usize).max(1)
    }
}

/// Greedy word wrap at whitespace. Runs of whitespace collapse to one space.
/// A word longer than `columns` is hard-split, the only case a word is broken.
pub fn wrap_line(text: &str, columns: usize) -> Vec<String> {
    let columns = columns.max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let proposed = if current_len == 0 {
            word_len
        } else {
            current_len + 1 + word_len
        };
        if proposed <= columns {
            if current_len > 0 {
                current.push(' ');
            }
            current.push_str(word);
            current_len = proposed;
            continue;
        }

        if current_len > 0 {
            lines.push(std::mem::take(&mut current));
        }
        let mut rest = word;
        let mut rest_len = word_len;
        while rest_len > columns {
            let split = rest
                .char_indices()
                .nth(columns)
                .map_or(rest.len(), |(i, _)| i);
            lines.push(rest[..split].to_string());
            rest = &rest[split..];
            rest_len -= columns;
        }
        current.push_str(rest);
        current_len = rest_len;
    }

    if current_len > 0 {
        lines.push(current);
    }
    lines
}

pub(crate) fn wrap_typed_lines(lines: &[TypedLine], columns: usize) -> Vec<DisplayLine> {
    lines
        .iter()
        .flat_map(|line| {
            wrap_line(&line.text, columns)
                .into_iter()
                .map(move |text| DisplayLine {
                    kind: line.kind,
                    text,
                })
        })
        .collect()
}

/// First `max` characters (not bytes) of `s`.
pub(crate) fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_columns_follow_font_size() {
        let g = PageGeometry::for_paper(PaperSize::Letter);
        assert_eq!(g.content_width(), 504.0);
        assert_eq!(g.wrap_columns(12.0), 84);
        assert_eq!(g.wrap_columns(10.0), 100);
        assert_eq!(g.wrap_columns(72.0), 14);
    }

    #[test]
    fn wraps_greedily_at_whitespace() {
        let lines = wrap_line("the quick  brown fox jumps over", 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps over"]);
    }

    #[test]
    fn overlong_words_are_hard_split() {
        let lines = wrap_line("a supercalifragilistic b", 8);
        assert_eq!(lines, vec!["a", "supercal", "ifragili", "stic b"]);
        assert!(lines.iter().all(|l| l.chars().count() <= 8));
    }

    #[test]
    fn blank_text_wraps_to_nothing() {
        assert!(wrap_line("   ", 10).is_empty());
    }

    #[test]
    fn truncation_counts_characters() {
        assert_eq!(truncate_chars("ééééé", 3), "ééé");
        assert_eq!(truncate_chars("short", 30), "short");
    }
}
