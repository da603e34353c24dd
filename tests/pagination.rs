mod common;

use std::collections::HashSet;

use topicbook_pdf::pdf::paginator::ContentPageKind;
use topicbook_pdf::{
    Book, ContentSource, FontFamily, GenerationError, LineKind, PageGeometry, PaperSize,
    TopicResponses, plan_book,
};

fn letter() -> PageGeometry {
    PageGeometry::for_paper(PaperSize::Letter)
}

#[test]
fn single_short_topic_layout() {
    let req = common::request(&["Gravity"]);
    let res = common::responses(&[(
        "Gravity",
        "Gravity is the attraction between masses.\nIt keeps planets in orbit.",
    )]);
    let plan = plan_book(&req, &res).expect("plan");
    let g = letter();

    // cover, copyright, toc, title, body
    assert_eq!(plan.pages.len(), 5);
    assert!(plan.pages[0].contains("Physics Primer"));
    assert!(plan.pages[0].contains("By Ada"));
    assert!(plan.pages[0].contains("Generated on May 17, 2024"));
    assert_eq!(common::footer_label(&plan.pages[0], &g), None);

    assert!(plan.pages[1].contains("Copyright © 2024 Ada"));
    assert_eq!(common::footer_label(&plan.pages[1], &g), Some("i"));

    let toc = &plan.pages[2];
    assert!(toc.contains("Table of Contents"));
    assert!(toc.contains("Chapter 1: Gravity"));
    assert_eq!(common::footer_label(toc, &g), Some("ii"));
    let entry_y = g.page_height - g.margin_top - 40.0;
    let entry: Vec<&str> = common::texts_at_y(toc, entry_y)
        .into_iter()
        .map(|t| t.text.as_str())
        .collect();
    assert!(entry.contains(&"3"), "toc entry {entry:?}");

    assert!(plan.pages[3].contains("Chapter 1: Gravity"));
    assert_eq!(common::footer_label(&plan.pages[3], &g), None);

    assert!(plan.pages[4].contains("Gravity is the attraction between masses."));
    assert_eq!(common::footer_label(&plan.pages[4], &g), Some("2"));

    assert_eq!(plan.summary.chapters.len(), 1);
    assert_eq!(plan.summary.chapters[0].start_page, 3);
}

#[test]
fn empty_response_gives_title_page_only() {
    let req = common::request(&["Empty", "Next"]);
    let res = common::responses(&[("Empty", ""), ("Next", "Some text.")]);
    let plan = plan_book(&req, &res).expect("plan");

    let kinds: Vec<(u32, usize, ContentPageKind)> = plan
        .summary
        .pages
        .iter()
        .map(|p| (p.number, p.chapter, p.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (1, 1, ContentPageKind::ChapterTitle),
            (2, 2, ContentPageKind::ChapterTitle),
            (3, 2, ContentPageKind::Body),
        ]
    );
    let starts: Vec<u32> = plan.summary.chapters.iter().map(|c| c.start_page).collect();
    assert_eq!(starts, vec![3, 4]);
}

#[test]
fn whitespace_only_response_is_an_empty_chapter() {
    let req = common::request(&["Blank"]);
    let res = common::responses(&[("Blank", "  \n\n\t\n")]);
    let plan = plan_book(&req, &res).expect("plan");
    assert_eq!(plan.summary.pages.len(), 1);
}

#[test]
fn duplicate_topics_resolve_once_and_number_separately() {
    let mut calls = Vec::new();
    let mut source = |topic: &str| -> Result<String, GenerationError> {
        calls.push(topic.to_string());
        Ok("Alpha body.\n* first point".to_string())
    };
    let req = common::request(&["A", "A"]);
    let responses = TopicResponses::resolve_all(&req.topics, &mut source);
    assert_eq!(calls, vec!["A".to_string()]);

    let book = Book::prepare(&req, &responses);
    assert_eq!(book.chapters.len(), 2);
    assert_eq!(book.chapters[0].lines, book.chapters[1].lines);
    assert_eq!(book.chapters[1].title(), "Chapter 2: A");

    let plan = plan_book(&req, &responses).expect("plan");
    let titles: Vec<String> = plan.summary.chapters.iter().map(|c| c.title()).collect();
    assert_eq!(titles, vec!["Chapter 1: A", "Chapter 2: A"]);
    let starts: Vec<u32> = plan.summary.chapters.iter().map(|c| c.start_page).collect();
    assert_eq!(starts, vec![3, 5]);
}

#[test]
fn long_body_breaks_pages_with_running_headers() {
    // 41 lines fit between the first baseline (700) and the footer reserve (114).
    let req = common::request(&["Mechanics"]);
    let res = common::responses(&[("Mechanics", common::numbered_lines(100).as_str())]);
    let plan = plan_book(&req, &res).expect("plan");
    let g = letter();

    assert_eq!(plan.summary.printed_numbers(), vec![2, 3, 4]);
    let body = &plan.pages[4..];
    assert_eq!(body.len(), 3);

    for (page, label) in body.iter().zip(["2", "3", "4"]) {
        assert_eq!(common::footer_label(page, &g), Some(label));
        let header: Vec<&str> = common::texts_at_y(page, g.header_y())
            .into_iter()
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(header, vec!["Physics Primer", "Chapter 1: Mechanics"]);
        assert_eq!(page.rules, 1, "header rule");
    }

    let first_body_lines: Vec<&str> = body[0]
        .texts
        .iter()
        .filter(|t| t.text.starts_with("line"))
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(first_body_lines.len(), 41);
    assert_eq!(first_body_lines.last(), Some(&"line41"));
    assert!(body[1].contains("line42"));
    assert!(body[2].contains("line100"));
}

#[test]
fn content_page_numbers_are_contiguous() {
    let topics = ["One", "Two", "Three", "Four"];
    let req = common::request(&topics);
    let long = common::numbered_lines(90);
    let long = long.as_str();
    let res = common::responses(&[("One", long), ("Two", ""), ("Three", "short"), ("Four", long)]);
    let plan = plan_book(&req, &res).expect("plan");

    let numbers: Vec<u32> = plan.summary.pages.iter().map(|p| p.number).collect();
    let expected: Vec<u32> = (1..=numbers.len() as u32).collect();
    assert_eq!(numbers, expected);

    let g = letter();
    let printed: Vec<&str> = plan.pages[3..]
        .iter()
        .filter_map(|p| common::footer_label(p, &g))
        .collect();
    let unique: HashSet<&&str> = printed.iter().collect();
    assert_eq!(unique.len(), printed.len(), "no repeated page numbers");
}

#[test]
fn chapter_numbers_follow_input_order_despite_failures() {
    struct Flaky;
    impl ContentSource for Flaky {
        fn resolve(&mut self, topic: &str) -> Result<String, GenerationError> {
            if topic.starts_with("bad") {
                Err(GenerationError::new("service unavailable"))
            } else {
                Ok(format!("All about {topic}."))
            }
        }
    }
    let req = common::request(&["good1", "bad1", "good2", "good1"]);
    let responses = TopicResponses::resolve_all(&req.topics, &mut Flaky);
    let plan = plan_book(&req, &responses).expect("plan");

    let titles: Vec<String> = plan.summary.chapters.iter().map(|c| c.title()).collect();
    assert_eq!(
        titles,
        vec![
            "Chapter 1: good1",
            "Chapter 2: bad1",
            "Chapter 3: good2",
            "Chapter 4: good1"
        ]
    );
    assert!(plan.pages.iter().any(|p| p.contains("Error: service unavailable")));
}

#[test]
fn planning_is_idempotent() {
    let req = common::request(&["Optics", "Waves"]);
    let waves = common::numbered_lines(60);
    let res = common::responses(&[
        ("Optics", "Light:\n* reflection\n* refraction\nLenses bend light."),
        ("Waves", waves.as_str()),
    ]);
    let first = plan_book(&req, &res).expect("plan");
    let second = plan_book(&req, &res).expect("plan");
    assert_eq!(first.summary, second.summary);
    assert_eq!(first.pages, second.pages);
}

#[test]
fn display_lines_fit_the_wrap_width() {
    let text = "Thermodynamics describes heat, work and temperature, and their relation to energy, entropy and the physical properties of matter and radiation.\n\
        * Zeroth law: thermal equilibrium is transitive across systems in contact\n\
        Pneumonoultramicroscopicsilicovolcanoconiosis is long enough to need splitting at narrow widths";
    for size in [8, 12, 18, 36, 72] {
        let mut req = common::request(&["Heat"]);
        req.font_size = size;
        let res = common::responses(&[("Heat", text)]);
        let book = Book::prepare(&req, &res);
        let columns = letter().wrap_columns(size as f32);
        for line in &book.chapters[0].lines {
            assert!(
                line.text.chars().count() <= columns,
                "{:?} exceeds {columns} columns at size {size}",
                line.text
            );
        }
    }
}

#[test]
fn line_styles_are_applied_per_kind() {
    let req = common::request(&["Style"]);
    let res = common::responses(&[("Style", "Overview:\n* a point\nplain text")]);
    let book = Book::prepare(&req, &res);
    let kinds: Vec<LineKind> = book.chapters[0].lines.iter().map(|l| l.kind).collect();
    assert_eq!(kinds, vec![LineKind::Heading, LineKind::Bullet, LineKind::Paragraph]);

    let plan = plan_book(&req, &res).expect("plan");
    let body = &plan.pages[4];
    let find = |needle: &str| {
        body.texts
            .iter()
            .find(|t| t.text.contains(needle))
            .unwrap_or_else(|| panic!("{needle} not drawn"))
    };
    let heading = find("Overview:");
    assert_eq!(heading.face, FontFamily::Helvetica.bold());
    assert_eq!(heading.size, 14.0);

    let bullet = find("a point");
    assert_eq!(bullet.text, "    • a point");
    assert_eq!(bullet.face, FontFamily::Helvetica.regular());

    let plain = find("plain text");
    assert_eq!(plain.size, 12.0);
    assert!((heading.y - bullet.y - 14.4).abs() < 0.01);
    assert!((bullet.y - plain.y - 14.4).abs() < 0.01);
}

#[test]
fn long_titles_are_truncated_in_headers() {
    let mut req = common::request(&["A remarkably long chapter topic name"]);
    req.title = "An Extraordinarily Verbose Book Title".to_string();
    let res = common::responses(&[("A remarkably long chapter topic name", "body")]);
    let plan = plan_book(&req, &res).expect("plan");
    let g = letter();
    let header: Vec<&str> = common::texts_at_y(&plan.pages[4], g.header_y())
        .into_iter()
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(
        header,
        vec!["An Extraordinarily Verbose Boo", "Chapter 1: A remarkably long c"]
    );
}

#[test]
fn chapter_title_rule_matches_measured_width() {
    let req = common::request(&["Gravity"]);
    let res = common::responses(&[("Gravity", "x")]);
    let plan = plan_book(&req, &res).expect("plan");
    let g = letter();
    let title_page = &plan.pages[3];
    let title = &title_page.texts[0];
    assert_eq!(title.text, "Chapter 1: Gravity");
    assert_eq!(title.size, 20.0);
    let width = FontFamily::Helvetica.bold().measure("Chapter 1: Gravity", 20.0);
    assert!((title.x - (g.page_width - width) / 2.0).abs() < 0.01);
    assert!((title.y - g.page_height * 0.6).abs() < 0.01);
    assert_eq!(title_page.rules, 1);
}
