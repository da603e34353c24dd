use crate::error::Error;
use crate::model::ChapterRecord;

use super::paginator::{PageStyle, PassSummary};
use super::surface::{PlanSurface, Surface};
use super::{Book, render_pass};

pub(crate) const TOC_PAGE_LABEL: &str = "ii";
const TOC_HEADING: &str = "Table of Contents";
const FIRST_ENTRY_GAP: f32 = 40.0;
const ENTRY_SPACING: f32 = 20.0;

/// Draw the table of contents and return how many pages it took.
///
/// Continuation pages carry the "ii" label but not the heading.
pub(crate) fn render_toc<S: Surface + ?Sized>(
    surface: &mut S,
    style: &PageStyle,
    records: &[ChapterRecord],
) -> usize {
    let g = &style.geometry;
    let face = style.body_face();
    let size = style.font_size;
    let first_page = surface.page_count();

    surface.set_font(style.bold_face(), size + 6.0);
    surface.draw_centered_text(g.center_x(), g.page_height - g.margin_top, TOC_HEADING);
    surface.set_font(face, size);

    let dot_w = surface.measure_width(".", face, size);
    let mut y = g.page_height - g.margin_top - FIRST_ENTRY_GAP;

    for record in records {
        let title = record.title();
        let page = record.start_page.to_string();
        surface.draw_left_text(g.margin_left, y, &title);
        surface.draw_right_text(g.content_right(), y, &page);

        let title_w = surface.measure_width(&title, face, size);
        let page_w = surface.measure_width(&page, face, size);
        let gap = g.content_width() - title_w - page_w;
        let dots = (gap / dot_w).floor().max(0.0) as usize;
        if dots > 0 {
            surface.draw_left_text(g.margin_left + title_w, y, &".".repeat(dots));
        }

        y -= ENTRY_SPACING;
        if y < g.margin_bottom {
            surface.draw_centered_text(g.center_x(), g.footer_y(), TOC_PAGE_LABEL);
            surface.new_page();
            y = g.page_height - g.margin_top;
            surface.set_font(face, size);
        }
    }

    surface.draw_centered_text(g.center_x(), g.footer_y(), TOC_PAGE_LABEL);
    surface.new_page();
    surface.page_count() - first_page
}

/// Paginate `book` twice. The planning pass runs on a throwaway
/// [`PlanSurface`] only to learn chapter start pages; the final pass renders
/// the table of contents from them onto `surface`. Any difference between
/// the two passes' page decisions is an error.
pub(crate) fn reconcile<S: Surface + ?Sized>(
    book: &Book,
    surface: &mut S,
) -> Result<PassSummary, Error> {
    let planned = {
        let mut scratch = PlanSurface::new(book.style.family);
        render_pass(&mut scratch, book, &[])
    };

    let rendered = render_pass(surface, book, &planned.chapters);

    if rendered != planned {
        let diverged = planned
            .pages
            .iter()
            .zip(&rendered.pages)
            .position(|(a, b)| a != b)
            .unwrap_or(planned.pages.len().min(rendered.pages.len()));
        return Err(Error::Pagination(format!(
            "planned {} content pages, rendered {}; first difference at content page {}",
            planned.pages.len(),
            rendered.pages.len(),
            diverged + 1,
        )));
    }

    Ok(rendered)
}
