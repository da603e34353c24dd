use crate::fonts::{FontFace, FontFamily};
use crate::model::{Chapter, ChapterRecord, LineKind};

use super::layout::{PageGeometry, truncate_chars};
use super::surface::{StyleOverride, Surface, TextRun};

/// Cover and copyright precede content; TOC start pages are offset by this.
pub const FRONT_MATTER_PAGES: u32 = 2;
const HEADER_MAX_CHARS: usize = 30;
const TITLE_HEIGHT_RATIO: f32 = 0.6;
const TITLE_RULE_GAP: f32 = 10.0;

/// Geometry and typography shared by every page of one document.
#[derive(Clone, Debug)]
pub struct PageStyle {
    pub geometry: PageGeometry,
    pub family: FontFamily,
    pub font_size: f32,
    pub book_title: String,
}

impl PageStyle {
    pub fn body_face(&self) -> FontFace {
        self.family.regular()
    }

    pub fn bold_face(&self) -> FontFace {
        self.family.bold()
    }

    pub fn line_height(&self) -> f32 {
        self.font_size * 1.2
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentPageKind {
    ChapterTitle,
    Body,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContentPage {
    pub number: u32,
    pub chapter: usize,
    pub kind: ContentPageKind,
}

/// What one pass decided. Two passes over the same input must agree exactly.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub chapters: Vec<ChapterRecord>,
    pub pages: Vec<ContentPage>,
}

impl PassSummary {
    /// Page numbers printed in footers, in emission order.
    pub fn printed_numbers(&self) -> Vec<u32> {
        self.pages
            .iter()
            .filter(|p| p.kind == ContentPageKind::Body)
            .map(|p| p.number)
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PageState {
    AtTopOfPage,
    MidPage,
    PageFull,
}

/// Page counter and records for one pass, threaded through every chapter.
pub struct PaginationContext<'a> {
    style: &'a PageStyle,
    page_number: u32,
    summary: PassSummary,
}

impl<'a> PaginationContext<'a> {
    pub fn new(style: &'a PageStyle) -> Self {
        Self {
            style,
            page_number: 1,
            summary: PassSummary::default(),
        }
    }

    pub fn finish(self) -> PassSummary {
        self.summary
    }

    pub fn paginate_chapter<S: Surface + ?Sized>(&mut self, surface: &mut S, chapter: &Chapter) {
        let start = self.page_number;
        self.title_page(surface, chapter);
        if !chapter.lines.is_empty() {
            self.body_pages(surface, chapter);
        }
        log::debug!(
            "Chapter {} ({:?}): pages {}..{}, {} display lines",
            chapter.index,
            chapter.topic,
            start,
            self.page_number - 1,
            chapter.lines.len(),
        );
        self.summary.chapters.push(ChapterRecord {
            index: chapter.index,
            topic: chapter.topic.clone(),
            start_page: start + FRONT_MATTER_PAGES,
        });
    }

    fn title_page<S: Surface + ?Sized>(&mut self, surface: &mut S, chapter: &Chapter) {
        let g = &self.style.geometry;
        let face = self.style.bold_face();
        let size = self.style.font_size + 8.0;
        let title = chapter.title();
        let y = g.page_height * TITLE_HEIGHT_RATIO;

        surface.set_font(face, size);
        surface.draw_centered_text(g.center_x(), y, &title);
        let width = surface.measure_width(&title, face, size);
        let x0 = (g.page_width - width) / 2.0;
        surface.draw_line(x0, y - TITLE_RULE_GAP, x0 + width, y - TITLE_RULE_GAP);

        self.commit_page(surface, chapter.index, ContentPageKind::ChapterTitle);
    }

    fn body_pages<S: Surface + ?Sized>(&mut self, surface: &mut S, chapter: &Chapter) {
        let title = chapter.title();
        let heading = StyleOverride {
            face: self.style.bold_face(),
            size: self.style.font_size + 2.0,
        };
        let mut run = self.begin_run();

        for line in &chapter.lines {
            if self.page_state(&run) == PageState::PageFull {
                let full = std::mem::replace(&mut run, self.begin_run());
                self.close_body_page(surface, full, chapter.index, &title);
            }
            match line.kind {
                LineKind::Heading => run.append_line(&line.text, Some(heading)),
                LineKind::Bullet => run.append_line(&format!("    {}", line.text), None),
                LineKind::Paragraph => run.append_line(&line.text, None),
            }
        }

        self.close_body_page(surface, run, chapter.index, &title);
    }

    fn begin_run(&self) -> TextRun {
        let g = &self.style.geometry;
        let mut run = TextRun::begin(
            g.margin_left,
            g.body_top(),
            self.style.body_face(),
            self.style.font_size,
        );
        run.set_line_height(self.style.line_height());
        run
    }

    fn page_state(&self, run: &TextRun) -> PageState {
        if run.is_empty() {
            PageState::AtTopOfPage
        } else if run.current_y() < self.style.geometry.break_threshold() {
            PageState::PageFull
        } else {
            PageState::MidPage
        }
    }

    fn close_body_page<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        run: TextRun,
        chapter: usize,
        chapter_title: &str,
    ) {
        surface.flush_run(run);
        self.draw_running_header(surface, chapter_title);
        self.commit_page(surface, chapter, ContentPageKind::Body);
    }

    fn draw_running_header<S: Surface + ?Sized>(&self, surface: &mut S, chapter_title: &str) {
        let g = &self.style.geometry;
        surface.set_font(self.style.body_face(), self.style.font_size - 2.0);
        surface.draw_left_text(
            g.margin_left,
            g.header_y(),
            truncate_chars(&self.style.book_title, HEADER_MAX_CHARS),
        );
        surface.draw_right_text(
            g.content_right(),
            g.header_y(),
            truncate_chars(chapter_title, HEADER_MAX_CHARS),
        );
        surface.draw_centered_text(g.center_x(), g.footer_y(), &self.page_number.to_string());
        surface.draw_line(g.margin_left, g.header_rule_y(), g.content_right(), g.header_rule_y());
    }

    fn commit_page<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        chapter: usize,
        kind: ContentPageKind,
    ) {
        surface.new_page();
        self.summary.pages.push(ContentPage {
            number: self.page_number,
            chapter,
            kind,
        });
        self.page_number += 1;
    }
}
