#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use topicbook_pdf::pdf::surface::{PlacedText, PlannedPage};
use topicbook_pdf::{BookRequest, PageGeometry, TopicResponses};

pub fn fixed_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 17)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

/// Letter, Helvetica 12, fixed date.
pub fn request(topics: &[&str]) -> BookRequest {
    let mut req = BookRequest::new(topics.iter().map(|t| t.to_string()).collect());
    req.title = "Physics Primer".to_string();
    req.author = "Ada".to_string();
    req.generated_at = fixed_time();
    req
}

pub fn responses(pairs: &[(&str, &str)]) -> TopicResponses {
    let mut r = TopicResponses::default();
    for (topic, text) in pairs {
        r.insert(*topic, *text);
    }
    r
}

/// `count` one-word paragraph lines, each distinct.
pub fn numbered_lines(count: usize) -> String {
    (1..=count)
        .map(|i| format!("line{i}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Output directory: tests/output/<name>/
pub fn output_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("tests/output").join(name);
    fs::create_dir_all(&dir).ok();
    dir
}

pub fn texts_at_y(page: &PlannedPage, y: f32) -> Vec<&PlacedText> {
    page.texts.iter().filter(|t| (t.y - y).abs() < 0.1).collect()
}

pub fn footer_label<'a>(page: &'a PlannedPage, g: &PageGeometry) -> Option<&'a str> {
    page.text_at_y(g.footer_y())
}

/// Find `needle` as a byte substring.
pub fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
