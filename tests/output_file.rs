mod common;

use std::fs;

use rayon::prelude::*;
use topicbook_pdf::{
    Error, FontFamily, GenerationError, PaperSize, build_book, plan_book, render_book,
};

#[test]
fn rendered_pdf_is_well_formed() {
    let req = common::request(&["Gravity", "Optics"]);
    let res = common::responses(&[
        ("Gravity", "Gravity is the attraction between masses."),
        ("Optics", "Light:\n* reflection\n* refraction"),
    ]);
    let rendered = render_book(&req, &res).expect("render");

    assert!(rendered.pdf.starts_with(b"%PDF"));
    // cover, copyright, toc, 2 x (title + body)
    assert_eq!(rendered.page_count, 7);
    assert_eq!(rendered.content_pages, 4);
    let count = format!("/Count {}", rendered.page_count);
    assert!(common::contains_bytes(&rendered.pdf, count.as_bytes()));
    assert!(common::contains_bytes(&rendered.pdf, b"/BaseFont /Helvetica-Bold"));
    assert!(common::contains_bytes(&rendered.pdf, b"/WinAnsiEncoding"));
    assert!(common::contains_bytes(&rendered.pdf, b"/FlateDecode"));
}

#[test]
fn render_and_plan_agree_on_chapters() {
    let req = common::request(&["A", "B", "A"]);
    let long = common::numbered_lines(120);
    let res = common::responses(&[("A", long.as_str()), ("B", "")]);
    let rendered = render_book(&req, &res).expect("render");
    let plan = plan_book(&req, &res).expect("plan");
    assert_eq!(rendered.chapters, plan.summary.chapters);
    assert_eq!(rendered.page_count, plan.pages.len());
}

#[test]
fn chosen_font_family_is_embedded_by_name() {
    let mut req = common::request(&["Gravity"]);
    req.font_family = FontFamily::Times;
    let res = common::responses(&[("Gravity", "text")]);
    let rendered = render_book(&req, &res).expect("render");
    assert!(common::contains_bytes(&rendered.pdf, b"/Times-Roman"));
    assert!(common::contains_bytes(&rendered.pdf, b"/Times-Bold"));
    assert!(!common::contains_bytes(&rendered.pdf, b"/Helvetica"));
}

#[test]
fn build_writes_the_file_without_leftovers() {
    let _ = env_logger::try_init();
    let dir = common::output_dir("build");
    let path = dir.join("gravity.pdf");
    let _ = fs::remove_file(&path);

    let mut source = |topic: &str| -> Result<String, GenerationError> {
        Ok(format!("{topic} keeps planets in orbit."))
    };
    let report = build_book(&common::request(&["Gravity"]), &mut source, &path).expect("build");

    let bytes = fs::read(&path).expect("written");
    assert_eq!(bytes.len(), report.bytes);
    assert!(bytes.starts_with(b"%PDF"));
    assert_eq!(report.page_count, 5);
    assert_eq!(report.chapters[0].start_page, 3);
    assert!(!dir.join("gravity.pdf.part").exists());
}

#[test]
fn unwritable_destination_is_a_storage_error() {
    let path = common::output_dir("storage").join("no-such-dir").join("book.pdf");
    let mut source = |_: &str| -> Result<String, GenerationError> { Ok("text".into()) };
    let err = build_book(&common::request(&["Gravity"]), &mut source, &path).unwrap_err();
    assert!(matches!(err, Error::Storage(_)), "{err}");
    assert!(!path.with_extension("pdf.part").exists());
}

#[test]
fn empty_topics_never_reach_the_source() {
    let mut called = false;
    let mut source = |_: &str| -> Result<String, GenerationError> {
        called = true;
        Ok(String::new())
    };
    let path = common::output_dir("empty").join("never.pdf");
    let err = build_book(&common::request(&[]), &mut source, &path).unwrap_err();
    assert!(matches!(err, Error::EmptyInput));
    assert!(!called);
    assert!(!path.exists());
}

#[test]
fn out_of_range_font_size_is_rejected() {
    let mut req = common::request(&["Gravity"]);
    req.font_size = 200;
    let err = render_book(&req, &common::responses(&[])).unwrap_err();
    assert!(matches!(err, Error::InvalidRequest(_)));
}

#[test]
fn layout_is_deterministic_across_settings() {
    let _ = env_logger::try_init();
    let text = format!(
        "Overview:\n{}\n* a bullet that runs on for quite a few words to force wrapping at larger sizes\n{}",
        "Energy is conserved in closed systems. ".repeat(12),
        common::numbered_lines(70),
    );
    let mut cases = Vec::new();
    for paper in [PaperSize::Letter, PaperSize::A4, PaperSize::A5] {
        for family in [FontFamily::Helvetica, FontFamily::Times, FontFamily::Courier] {
            for size in [6u32, 10, 12, 18, 30, 72] {
                cases.push((paper, family, size));
            }
        }
    }

    cases.par_iter().for_each(|&(paper, family, size)| {
        let mut req = common::request(&["Energy", "Momentum", "Energy"]);
        req.paper = paper;
        req.font_family = family;
        req.font_size = size;
        let res = common::responses(&[("Energy", text.as_str()), ("Momentum", "")]);

        let first = plan_book(&req, &res)
            .unwrap_or_else(|e| panic!("{paper:?} {family:?} {size}: {e}"));
        let second = plan_book(&req, &res).expect("second plan");
        assert_eq!(first.summary, second.summary);

        let numbers: Vec<u32> = first.summary.pages.iter().map(|p| p.number).collect();
        assert_eq!(numbers, (1..=numbers.len() as u32).collect::<Vec<_>>());

        let rendered = render_book(&req, &res).expect("render");
        assert_eq!(rendered.chapters, first.summary.chapters);
    });
}
