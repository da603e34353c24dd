pub mod layout;
pub mod paginator;
pub mod surface;
mod toc;

use std::collections::HashMap;

use chrono::{Datelike, NaiveDateTime};

use crate::classify::classify_lines;
use crate::error::Error;
use crate::model::{BookRequest, Chapter, ChapterRecord, DisplayLine};
use crate::source::TopicResponses;

use layout::{PageGeometry, wrap_typed_lines};
use paginator::{PageStyle, PaginationContext, PassSummary};
use surface::{DocumentMeta, PdfSurface, PlanSurface, PlannedPage, Surface};

pub(crate) const COPYRIGHT_PAGE_LABEL: &str = "i";

/// Everything pagination needs, with display lines already wrapped.
pub struct Book {
    pub style: PageStyle,
    pub author: String,
    pub generated_at: NaiveDateTime,
    pub chapters: Vec<Chapter>,
}

impl Book {
    /// Classify and wrap each distinct response once; duplicate topics share
    /// the result but still get their own chapter number.
    pub fn prepare(request: &BookRequest, responses: &TopicResponses) -> Self {
        let geometry = PageGeometry::for_paper(request.paper);
        let font_size = request.font_size_pt();
        let columns = geometry.wrap_columns(font_size);

        let mut wrapped: HashMap<&str, Vec<DisplayLine>> = HashMap::new();
        let chapters = request
            .topics
            .iter()
            .enumerate()
            .map(|(i, topic)| {
                let lines = wrapped
                    .entry(topic.as_str())
                    .or_insert_with(|| {
                        wrap_typed_lines(&classify_lines(responses.get(topic)), columns)
                    })
                    .clone();
                Chapter {
                    index: i + 1,
                    topic: topic.clone(),
                    lines,
                }
            })
            .collect();

        Self {
            style: PageStyle {
                geometry,
                family: request.font_family,
                font_size,
                book_title: request.title.clone(),
            },
            author: request.author.clone(),
            generated_at: request.generated_at,
            chapters,
        }
    }
}

fn render_cover<S: Surface + ?Sized>(surface: &mut S, book: &Book) {
    let style = &book.style;
    let g = &style.geometry;
    let size = style.font_size;

    surface.set_font(style.bold_face(), size + 16.0);
    surface.draw_centered_text(g.center_x(), g.page_height * 0.6, &style.book_title);
    surface.set_font(style.body_face(), size + 4.0);
    surface.draw_centered_text(g.center_x(), g.page_height * 0.5, &format!("By {}", book.author));
    surface.set_font(style.body_face(), size);
    surface.draw_centered_text(
        g.center_x(),
        g.page_height * 0.45,
        &format!("Generated on {}", book.generated_at.format("%B %d, %Y")),
    );
    // Border inset by the side margin on all four edges.
    let inset = g.margin_left;
    surface.draw_rect(
        inset,
        inset,
        g.page_width - 2.0 * inset,
        g.page_height - 2.0 * inset,
    );
    surface.new_page();
}

fn render_copyright<S: Surface + ?Sized>(surface: &mut S, book: &Book) {
    let style = &book.style;
    let g = &style.geometry;

    surface.set_font(style.body_face(), style.font_size - 2.0);
    surface.draw_centered_text(
        g.center_x(),
        g.page_height * 0.5,
        &format!("Copyright © {} {}", book.generated_at.year(), book.author),
    );
    surface.draw_centered_text(g.center_x(), g.page_height * 0.45, "All rights reserved.");
    surface.draw_centered_text(g.center_x(), g.footer_y(), COPYRIGHT_PAGE_LABEL);
    surface.new_page();
}

/// One full pass: front matter, table of contents, then every chapter.
pub(crate) fn render_pass<S: Surface + ?Sized>(
    surface: &mut S,
    book: &Book,
    toc: &[ChapterRecord],
) -> PassSummary {
    render_cover(surface, book);
    render_copyright(surface, book);
    let toc_pages = toc::render_toc(surface, &book.style, toc);

    let mut ctx = PaginationContext::new(&book.style);
    for chapter in &book.chapters {
        ctx.paginate_chapter(surface, chapter);
    }
    let summary = ctx.finish();
    log::debug!(
        "Pass complete: {} TOC page(s), {} content pages, {} total",
        toc_pages,
        summary.pages.len(),
        surface.page_count(),
    );
    summary
}

#[derive(Debug)]
pub struct RenderedBook {
    pub pdf: Vec<u8>,
    pub chapters: Vec<ChapterRecord>,
    /// Every page in the file, front matter included.
    pub page_count: usize,
    pub content_pages: usize,
}

pub fn render(book: &Book) -> Result<RenderedBook, Error> {
    let mut surface = PdfSurface::new(book.style.geometry, book.style.family);
    let summary = toc::reconcile(book, &mut surface)?;
    let page_count = surface.page_count();
    let pdf = surface.finish(&DocumentMeta {
        title: book.style.book_title.clone(),
        author: book.author.clone(),
        created: book.generated_at,
    });
    Ok(RenderedBook {
        pdf,
        chapters: summary.chapters,
        page_count,
        content_pages: summary.pages.len(),
    })
}

/// The final pass recorded page by page instead of as PDF bytes.
#[derive(Debug)]
pub struct BookPlan {
    pub pages: Vec<PlannedPage>,
    pub summary: PassSummary,
}

pub fn plan(book: &Book) -> Result<BookPlan, Error> {
    let mut surface = PlanSurface::new(book.style.family);
    let summary = toc::reconcile(book, &mut surface)?;
    Ok(BookPlan {
        pages: surface.into_pages(),
        summary,
    })
}
