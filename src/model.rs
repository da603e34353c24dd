use chrono::{Local, NaiveDateTime};

use crate::error::Error;
use crate::fonts::FontFamily;

pub const DEFAULT_TITLE: &str = "Generated Topic Book";
pub const DEFAULT_AUTHOR: &str = "Anonymous";
pub const DEFAULT_FONT_SIZE: u32 = 12;
pub const MIN_FONT_SIZE: u32 = 6;
pub const MAX_FONT_SIZE: u32 = 72;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
    Heading,
    Bullet,
    Paragraph,
}

/// One classified line of generated text.
#[derive(Clone, Debug, PartialEq)]
pub struct TypedLine {
    pub kind: LineKind,
    pub text: String,
}

/// A slice of a `TypedLine` after wrapping to the column width.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayLine {
    pub kind: LineKind,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChapterRecord {
    pub index: usize, // 1-based
    pub topic: String,
    /// Counter value of the chapter title page plus the front matter offset.
    pub start_page: u32,
}

impl ChapterRecord {
    pub fn title(&self) -> String {
        chapter_title(self.index, &self.topic)
    }
}

pub(crate) fn chapter_title(index: usize, topic: &str) -> String {
    format!("Chapter {index}: {topic}")
}

/// A chapter ready for pagination. Lines are wrapped once and shared by both passes.
pub struct Chapter {
    pub index: usize,
    pub topic: String,
    pub lines: Vec<DisplayLine>,
}

impl Chapter {
    pub fn title(&self) -> String {
        chapter_title(self.index, &self.topic)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PaperSize {
    Letter,
    A4,
    A5,
}

impl PaperSize {
    /// Width and height in points.
    pub fn dimensions(self) -> (f32, f32) {
        const MM: f32 = 72.0 / 25.4;
        match self {
            PaperSize::Letter => (612.0, 792.0),
            PaperSize::A4 => (210.0 * MM, 297.0 * MM),
            PaperSize::A5 => (148.0 * MM, 210.0 * MM),
        }
    }

    /// Unknown names fall back to Letter.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "a4" => PaperSize::A4,
            "a5" => PaperSize::A5,
            _ => PaperSize::Letter,
        }
    }
}

pub struct BookRequest {
    pub topics: Vec<String>,
    pub title: String,
    pub author: String,
    pub paper: PaperSize,
    pub font_family: FontFamily,
    pub font_size: u32,
    pub generated_at: NaiveDateTime,
}

impl BookRequest {
    pub fn new(topics: Vec<String>) -> Self {
        Self {
            topics,
            title: DEFAULT_TITLE.to_string(),
            author: DEFAULT_AUTHOR.to_string(),
            paper: PaperSize::Letter,
            font_family: FontFamily::Helvetica,
            font_size: DEFAULT_FONT_SIZE,
            generated_at: Local::now().naive_local(),
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.topics.is_empty() {
            return Err(Error::EmptyInput);
        }
        if !(MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&self.font_size) {
            return Err(Error::InvalidRequest(format!(
                "font size {} outside {MIN_FONT_SIZE}..={MAX_FONT_SIZE}",
                self.font_size
            )));
        }
        Ok(())
    }

    pub(crate) fn font_size_pt(&self) -> f32 {
        self.font_size as f32
    }
}

/// `{safe_title}_{YYYYmmdd_HHMMSS}.pdf`: keeps alphanumerics, spaces and
/// underscores, then maps spaces to underscores.
pub fn output_file_name(title: &str, at: NaiveDateTime) -> String {
    let safe: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '_')
        .map(|c| if c == ' ' { '_' } else { c })
        .collect();
    format!("{}_{}.pdf", safe, at.format("%Y%m%d_%H%M%S"))
}
