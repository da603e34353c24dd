use chrono::{Datelike, NaiveDateTime, Timelike};
use pdf_writer::{Content, Date, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::fonts::{FontFace, FontFamily, to_winansi_bytes};

use super::layout::PageGeometry;

/// One line of a text run, positioned and styled.
#[derive(Clone, Debug, PartialEq)]
pub struct RunLine {
    pub text: String,
    pub face: FontFace,
    pub size: f32,
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StyleOverride {
    pub face: FontFace,
    pub size: f32,
}

/// A block of lines laid out top to bottom at a fixed leading.
///
/// The run only positions lines; nothing is drawn until it is handed to
/// [`Surface::flush_run`].
#[derive(Clone, Debug)]
pub struct TextRun {
    x: f32,
    y: f32,
    face: FontFace,
    size: f32,
    line_height: f32,
    lines: Vec<RunLine>,
}

impl TextRun {
    pub fn begin(x: f32, y: f32, face: FontFace, size: f32) -> Self {
        Self {
            x,
            y,
            face,
            size,
            line_height: size * 1.2,
            lines: Vec::new(),
        }
    }

    pub fn set_line_height(&mut self, h: f32) {
        self.line_height = h;
    }

    /// Place `text` at the current baseline, then move down one line height.
    /// An override applies to this line only.
    pub fn append_line(&mut self, text: &str, style: Option<StyleOverride>) {
        let (face, size) = style.map_or((self.face, self.size), |s| (s.face, s.size));
        self.lines.push(RunLine {
            text: text.to_string(),
            face,
            size,
            x: self.x,
            y: self.y,
        });
        self.y -= self.line_height;
    }

    pub fn current_y(&self) -> f32 {
        self.y
    }

    pub fn lines(&self) -> &[RunLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Drawing primitives the paginator needs from a backend.
pub trait Surface {
    /// Font used by subsequent `draw_*_text` calls.
    fn set_font(&mut self, face: FontFace, size: f32);
    fn current_font(&self) -> (FontFace, f32);

    /// Exact rendered width.
    fn measure_width(&self, text: &str, face: FontFace, size: f32) -> f32 {
        face.measure(text, size)
    }

    fn draw_left_text(&mut self, x: f32, y: f32, text: &str);

    fn draw_centered_text(&mut self, x_center: f32, y: f32, text: &str) {
        let (face, size) = self.current_font();
        let w = self.measure_width(text, face, size);
        self.draw_left_text(x_center - w / 2.0, y, text);
    }

    fn draw_right_text(&mut self, x: f32, y: f32, text: &str) {
        let (face, size) = self.current_font();
        let w = self.measure_width(text, face, size);
        self.draw_left_text(x - w, y, text);
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32);
    fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn flush_run(&mut self, run: TextRun);

    /// Commit the current page and start a blank one.
    fn new_page(&mut self);
    /// Pages committed so far.
    fn page_count(&self) -> usize;
}

/// Document information written into the PDF trailer's Info dictionary.
pub struct DocumentMeta {
    pub title: String,
    pub author: String,
    pub created: NaiveDateTime,
}

pub struct PdfSurface {
    geometry: PageGeometry,
    family: FontFamily,
    pages: Vec<Content>,
    current: Content,
    dirty: bool,
    font: (FontFace, f32),
}

impl PdfSurface {
    pub fn new(geometry: PageGeometry, family: FontFamily) -> Self {
        Self {
            geometry,
            family,
            pages: Vec::new(),
            current: Content::new(),
            dirty: false,
            font: (family.regular(), 12.0),
        }
    }

    fn show(&mut self, face: FontFace, size: f32, x: f32, y: f32, text: &str) {
        let bytes = to_winansi_bytes(text);
        if bytes.is_empty() {
            return;
        }
        self.current.begin_text();
        self.current.set_font(Name(face.pdf_name().as_bytes()), size);
        self.current.next_line(x, y);
        self.current.show(Str(&bytes));
        self.current.end_text();
        self.dirty = true;
    }

    /// Assemble the PDF. A trailing page with nothing drawn on it is dropped.
    pub fn finish(mut self, meta: &DocumentMeta) -> Vec<u8> {
        if self.dirty {
            log::debug!("Committing unterminated final page");
            self.pages.push(std::mem::replace(&mut self.current, Content::new()));
        }

        let mut pdf = Pdf::new();
        let mut next_id = 1i32;
        let mut alloc = || {
            let r = Ref::new(next_id);
            next_id += 1;
            r
        };

        let catalog_id = alloc();
        let pages_id = alloc();
        let info_id = alloc();

        let faces = [self.family.regular(), self.family.bold()];
        let font_refs: Vec<(FontFace, Ref)> = faces.iter().map(|&f| (f, alloc())).collect();
        for &(face, font_ref) in &font_refs {
            pdf.type1_font(font_ref)
                .base_font(Name(face.base_name().as_bytes()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }

        let n = self.pages.len();
        let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
        let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

        for (i, c) in self.pages.into_iter().enumerate() {
            let raw = c.finish();
            let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
            pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
        }

        pdf.catalog(catalog_id).pages(pages_id);
        pdf.pages(pages_id)
            .kids(page_ids.iter().copied())
            .count(n as i32);

        let g = self.geometry;
        for i in 0..n {
            let mut page = pdf.page(page_ids[i]);
            page.media_box(Rect::new(0.0, 0.0, g.page_width, g.page_height))
                .parent(pages_id)
                .contents(content_ids[i]);
            let mut resources = page.resources();
            let mut fonts = resources.fonts();
            for &(face, font_ref) in &font_refs {
                fonts.pair(Name(face.pdf_name().as_bytes()), font_ref);
            }
        }

        let created = meta.created;
        pdf.document_info(info_id)
            .title(TextStr(&meta.title))
            .author(TextStr(&meta.author))
            .creator(TextStr(concat!("topicbook-pdf ", env!("CARGO_PKG_VERSION"))))
            .creation_date(
                Date::new(created.year().clamp(0, 9999) as u16)
                    .month(created.month() as u8)
                    .day(created.day() as u8)
                    .hour(created.hour() as u8)
                    .minute(created.minute() as u8)
                    .second(created.second() as u8),
            );

        pdf.finish()
    }
}

impl Surface for PdfSurface {
    fn set_font(&mut self, face: FontFace, size: f32) {
        self.font = (face, size);
    }

    fn current_font(&self) -> (FontFace, f32) {
        self.font
    }

    fn draw_left_text(&mut self, x: f32, y: f32, text: &str) {
        let (face, size) = self.font;
        self.show(face, size, x, y, text);
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.current.move_to(x1, y1);
        self.current.line_to(x2, y2);
        self.current.stroke();
        self.dirty = true;
    }

    fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.current.rect(x, y, w, h);
        self.current.stroke();
        self.dirty = true;
    }

    fn flush_run(&mut self, run: TextRun) {
        if run.is_empty() {
            return;
        }
        self.current.begin_text();
        let mut td_x = 0.0_f32;
        let mut td_y = 0.0_f32;
        let mut cur: Option<(FontFace, f32)> = None;
        for line in run.lines() {
            let bytes = to_winansi_bytes(&line.text);
            if bytes.is_empty() {
                continue;
            }
            if cur != Some((line.face, line.size)) {
                self.current.set_font(Name(line.face.pdf_name().as_bytes()), line.size);
                cur = Some((line.face, line.size));
            }
            self.current.next_line(line.x - td_x, line.y - td_y);
            td_x = line.x;
            td_y = line.y;
            self.current.show(Str(&bytes));
        }
        self.current.end_text();
        self.dirty = true;
    }

    fn new_page(&mut self) {
        self.pages.push(std::mem::replace(&mut self.current, Content::new()));
        self.dirty = false;
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Text placed on a page by a [`PlanSurface`].
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedText {
    pub x: f32,
    pub y: f32,
    pub face: FontFace,
    pub size: f32,
    pub text: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlannedPage {
    pub texts: Vec<PlacedText>,
    pub rules: usize,
}

impl PlannedPage {
    /// Text whose baseline sits at `y` (within a tenth of a point).
    pub fn text_at_y(&self, y: f32) -> Option<&str> {
        self.texts
            .iter()
            .find(|t| (t.y - y).abs() < 0.1)
            .map(|t| t.text.as_str())
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.texts.iter().any(|t| t.text.contains(needle))
    }
}

/// Records placements instead of producing bytes. Used for the planning pass.
pub struct PlanSurface {
    pages: Vec<PlannedPage>,
    current: PlannedPage,
    font: (FontFace, f32),
}

impl PlanSurface {
    pub fn new(family: FontFamily) -> Self {
        Self {
            pages: Vec::new(),
            current: PlannedPage::default(),
            font: (family.regular(), 12.0),
        }
    }

    pub fn into_pages(self) -> Vec<PlannedPage> {
        self.pages
    }
}

impl Surface for PlanSurface {
    fn set_font(&mut self, face: FontFace, size: f32) {
        self.font = (face, size);
    }

    fn current_font(&self) -> (FontFace, f32) {
        self.font
    }

    fn draw_left_text(&mut self, x: f32, y: f32, text: &str) {
        let (face, size) = self.font;
        self.current.texts.push(PlacedText {
            x,
            y,
            face,
            size,
            text: text.to_string(),
        });
    }

    fn draw_line(&mut self, _x1: f32, _y1: f32, _x2: f32, _y2: f32) {
        self.current.rules += 1;
    }

    fn draw_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32) {
        self.current.rules += 1;
    }

    fn flush_run(&mut self, run: TextRun) {
        self.current.texts.extend(run.lines().iter().map(|l| PlacedText {
            x: l.x,
            y: l.y,
            face: l.face,
            size: l.size,
            text: l.text.clone(),
        }));
    }

    fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }
}
