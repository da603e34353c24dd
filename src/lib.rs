mod classify;
mod error;
mod fonts;
mod model;
pub mod pdf;
mod source;

pub use classify::classify_lines;
pub use error::{Error, GenerationError};
pub use fonts::{FontFace, FontFamily};
pub use model::{
    BookRequest, Chapter, ChapterRecord, DEFAULT_AUTHOR, DEFAULT_FONT_SIZE, DEFAULT_TITLE,
    DisplayLine, LineKind, MAX_FONT_SIZE, MIN_FONT_SIZE, PaperSize, TypedLine, output_file_name,
};
pub use pdf::layout::{PageGeometry, wrap_line};
pub use pdf::{Book, BookPlan, RenderedBook};
pub use source::{ContentSource, DirectorySource, TopicResponses, topic_slug};

use std::path::{Path, PathBuf};
use std::time::Instant;

/// Lay out a book from already-resolved responses and return the PDF bytes.
pub fn render_book(
    request: &BookRequest,
    responses: &TopicResponses,
) -> Result<RenderedBook, Error> {
    request.validate()?;
    let book = Book::prepare(request, responses);
    pdf::render(&book)
}

/// Same two-pass layout as [`render_book`], recording placements instead of
/// producing bytes.
pub fn plan_book(request: &BookRequest, responses: &TopicResponses) -> Result<BookPlan, Error> {
    request.validate()?;
    let book = Book::prepare(request, responses);
    pdf::plan(&book)
}

#[derive(Debug)]
pub struct BuildReport {
    pub chapters: Vec<ChapterRecord>,
    pub page_count: usize,
    pub bytes: usize,
}

/// Resolve every topic, lay out the book, and save it to `output`.
///
/// The file only appears at `output` once the whole document is written.
pub fn build_book<S>(
    request: &BookRequest,
    source: &mut S,
    output: &Path,
) -> Result<BuildReport, Error>
where
    S: ContentSource + ?Sized,
{
    let t0 = Instant::now();
    request.validate()?;

    let responses = TopicResponses::resolve_all(&request.topics, source);
    let t_resolve = t0.elapsed();

    let book = Book::prepare(request, &responses);
    let rendered = pdf::render(&book)?;
    let t_render = t0.elapsed();

    save_atomically(output, &rendered.pdf)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: resolve={:.1}ms, render={:.1}ms, write={:.1}ms, total={:.1}ms ({} topics, {} pages, {} bytes)",
        t_resolve.as_secs_f64() * 1000.0,
        (t_render - t_resolve).as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        responses.len(),
        rendered.page_count,
        rendered.pdf.len(),
    );

    Ok(BuildReport {
        chapters: rendered.chapters,
        page_count: rendered.page_count,
        bytes: rendered.pdf.len(),
    })
}

fn save_atomically(path: &Path, bytes: &[u8]) -> Result<(), Error> {
    let mut partial = path.as_os_str().to_owned();
    partial.push(".part");
    let partial = PathBuf::from(partial);

    let result = std::fs::write(&partial, bytes).and_then(|_| std::fs::rename(&partial, path));
    if let Err(e) = result {
        let _ = std::fs::remove_file(&partial);
        return Err(Error::Storage(std::io::Error::new(
            e.kind(),
            format!("{}: {}", e, path.display()),
        )));
    }
    Ok(())
}
