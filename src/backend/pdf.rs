//! `lopdf`-backed document engine.
//!
//! Walks each page's content stream to recover positioned text spans, then
//! derives line-granularity and block-granularity views from them. lopdf
//! has no table finder, so pages from this engine always report the native
//! capability as absent.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{Dictionary, Document as RawDocument, Object, ObjectId};

use crate::detect::{detect_format_from_bytes, detect_format_from_path};
use crate::error::{Error, Result};
use crate::model::{cmp_coord, BoundingBox};

use super::{decode_text_simple, DocumentSource, PageSource, RawLine, RawSpan, RawTextBlock};

/// Letter size, used when a page has no usable MediaBox.
const DEFAULT_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

/// Ascender and descender as fractions of the font size.
const ASCENT: f32 = 0.8;
const DESCENT: f32 = 0.2;

/// Average glyph advance as a fraction of the font size.
const GLYPH_ADVANCE: f32 = 0.5;

/// Spans whose baselines differ by less than this fraction of the font size
/// sit on the same line.
const BASELINE_TOLERANCE: f32 = 0.3;

/// A horizontal gap wider than this many ems splits a baseline into
/// separate lines (e.g. table cells).
const LINE_SPLIT_GAP: f32 = 1.0;

/// A horizontal gap wider than this fraction of a glyph separates words.
const WORD_GAP: f32 = 0.2;

/// TJ adjustments (thousandths of an em) past this value read as a space.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Parent chains deeper than this are treated as malformed.
const MAX_INHERITANCE_DEPTH: usize = 32;

/// A PDF document opened with lopdf.
pub struct LopdfDocument {
    doc: Option<RawDocument>,
    page_ids: Vec<ObjectId>,
}

impl LopdfDocument {
    /// Open a PDF file.
    ///
    /// Fails with [`Error::NotFound`] if the path does not exist and with
    /// [`Error::InvalidDocument`] if it is not a regular file or cannot be
    /// parsed as a PDF.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        if !path.is_file() {
            return Err(Error::InvalidDocument(format!(
                "path is not a file: {}",
                path.display()
            )));
        }

        detect_format_from_path(path).map_err(invalid_document)?;

        let doc = RawDocument::load(path).map_err(|e| {
            log::error!("Failed to open PDF {}: {}", path.display(), e);
            Error::from(e)
        })?;

        Ok(Self::from_document(doc))
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        detect_format_from_bytes(data).map_err(invalid_document)?;
        let doc = RawDocument::load_mem(data)?;
        Ok(Self::from_document(doc))
    }

    /// Wrap an already parsed lopdf document.
    pub fn from_document(doc: RawDocument) -> Self {
        let page_ids = doc.get_pages().into_values().collect();
        Self {
            doc: Some(doc),
            page_ids,
        }
    }

    /// PDF version string, if the document is still open.
    pub fn version(&self) -> Option<String> {
        self.doc.as_ref().map(|d| d.version.to_string())
    }

    /// Whether [`DocumentSource::close`] has run.
    pub fn is_closed(&self) -> bool {
        self.doc.is_none()
    }
}

fn invalid_document(err: Error) -> Error {
    match err {
        Error::InvalidDocument(_) | Error::NotFound(_) => err,
        other => Error::InvalidDocument(other.to_string()),
    }
}

impl DocumentSource for LopdfDocument {
    fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn page(&self, index: usize) -> Result<Box<dyn PageSource + '_>> {
        let doc = self
            .doc
            .as_ref()
            .ok_or_else(|| Error::InvalidDocument("document is closed".to_string()))?;
        let id = *self
            .page_ids
            .get(index)
            .ok_or(Error::PageOutOfRange(index, self.page_ids.len()))?;

        Ok(Box::new(LopdfPage::new(doc, id, index as u32 + 1)))
    }

    fn close(&mut self) {
        self.doc = None;
    }
}

/// One page of a [`LopdfDocument`].
pub struct LopdfPage<'a> {
    doc: &'a RawDocument,
    id: ObjectId,
    number: u32,
    media_box: [f32; 4],
}

impl<'a> LopdfPage<'a> {
    fn new(doc: &'a RawDocument, id: ObjectId, number: u32) -> Self {
        let media_box = media_box(doc, id).unwrap_or(DEFAULT_MEDIA_BOX);
        Self {
            doc,
            id,
            number,
            media_box,
        }
    }

    /// Positioned spans in content-stream order.
    fn spans(&self) -> Result<Vec<Span>> {
        let fonts = self
            .doc
            .get_page_fonts(self.id)
            .map_err(|e| Error::page(self.number, e.to_string()))?;
        let content = self.content()?;
        let operations = lopdf::content::Content::decode(&content)
            .map_err(|e| Error::page(self.number, e.to_string()))?
            .operations;

        let mut walker = TextWalker::default();
        for op in &operations {
            walker.apply(&op.operator, &op.operands, |font, bytes| {
                self.decode(&fonts, font, bytes)
            });
        }

        let left = self.media_box[0].min(self.media_box[2]);
        let top = self.media_box[1].max(self.media_box[3]);
        Ok(walker
            .spans
            .into_iter()
            .map(|s| s.into_page_space(left, top))
            .collect())
    }

    /// Decompressed page content.
    fn content(&self) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(self.id)
            .map_err(|e| Error::page(self.number, e.to_string()))?;

        let contents = match page_dict.get(b"Contents") {
            Ok(obj) => obj,
            // A page without content is blank, not broken.
            Err(_) => return Ok(Vec::new()),
        };

        let mut refs = Vec::new();
        match contents {
            Object::Reference(r) => match self.doc.get_object(*r) {
                Ok(Object::Array(arr)) => refs.extend(arr.iter().filter_map(|o| o.as_reference().ok())),
                _ => refs.push(*r),
            },
            Object::Array(arr) => refs.extend(arr.iter().filter_map(|o| o.as_reference().ok())),
            _ => return Err(Error::page(self.number, "invalid content stream")),
        }

        let mut content = Vec::new();
        for r in refs {
            match self.doc.get_object(r) {
                Ok(Object::Stream(s)) => match s.decompressed_content() {
                    Ok(data) => content.extend_from_slice(&data),
                    // Uncompressed streams report an error here.
                    Err(_) => content.extend_from_slice(&s.content),
                },
                _ => {
                    log::debug!(
                        "page {}: skipping non-stream content object {:?}",
                        self.number,
                        r
                    );
                    continue;
                }
            }
            content.push(b'\n');
        }
        Ok(content)
    }

    fn decode(&self, fonts: &BTreeMap<Vec<u8>, &Dictionary>, font: &[u8], bytes: &[u8]) -> String {
        fonts
            .get(font)
            .and_then(|dict| dict.get_font_encoding(self.doc).ok())
            .and_then(|enc| RawDocument::decode_text(&enc, bytes).ok())
            .unwrap_or_else(|| decode_text_simple(bytes))
    }
}

impl PageSource for LopdfPage<'_> {
    fn text_blocks(&self) -> Result<Vec<RawTextBlock>> {
        let lines = segment_lines(self.spans()?);
        Ok(stack_blocks(lines)
            .into_iter()
            .map(|block| RawTextBlock::new(block.bbox(), block.text()))
            .collect())
    }

    fn text_lines(&self) -> Result<Vec<RawLine>> {
        Ok(segment_lines(self.spans()?)
            .into_iter()
            .map(|line| line.into_raw())
            .collect())
    }
}

/// Resolve the page MediaBox, following `Parent` inheritance.
fn media_box(doc: &RawDocument, page_id: ObjectId) -> Option<[f32; 4]> {
    let mut dict = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_INHERITANCE_DEPTH {
        if let Ok(obj) = dict.get(b"MediaBox") {
            let arr = match obj {
                Object::Reference(r) => doc.get_object(*r).ok()?.as_array().ok()?,
                other => other.as_array().ok()?,
            };
            let values: Vec<f32> = arr.iter().filter_map(get_number).collect();
            if let [x0, y0, x1, y1] = values[..] {
                return Some([x0, y0, x1, y1]);
            }
        }
        let parent = dict.get(b"Parent").ok()?.as_reference().ok()?;
        dict = doc.get_dictionary(parent).ok()?;
    }
    None
}

fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// A span in page space (top-down coordinates).
#[derive(Debug, Clone)]
struct Span {
    text: String,
    x: f32,
    /// Baseline, top-down
    baseline: f32,
    width: f32,
    font_size: f32,
}

impl Span {
    fn bbox(&self) -> BoundingBox {
        BoundingBox::new(
            self.x,
            self.baseline - self.font_size * ASCENT,
            self.x + self.width,
            self.baseline + self.font_size * DESCENT,
        )
    }

    fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// A span in PDF user space (bottom-up coordinates).
#[derive(Debug, Clone)]
struct UserSpan {
    text: String,
    x: f32,
    y: f32,
    width: f32,
    font_size: f32,
}

impl UserSpan {
    fn into_page_space(self, left: f32, top: f32) -> Span {
        Span {
            text: self.text,
            x: self.x - left,
            baseline: top - self.y,
            width: self.width,
            font_size: self.font_size,
        }
    }
}

/// Text state tracked while walking a content stream.
#[derive(Default)]
struct TextWalker {
    in_text: bool,
    font: Vec<u8>,
    font_size: f32,
    leading: Option<f32>,
    text_matrix: TextMatrix,
    line_matrix: TextMatrix,
    spans: Vec<UserSpan>,
}

impl TextWalker {
    fn apply<F>(&mut self, operator: &str, operands: &[Object], decode: F)
    where
        F: Fn(&[u8], &[u8]) -> String,
    {
        match operator {
            "BT" => {
                self.in_text = true;
                self.text_matrix = TextMatrix::default();
                self.line_matrix = TextMatrix::default();
            }
            "ET" => self.in_text = false,
            "Tf" => {
                if let [Object::Name(name), size, ..] = operands {
                    self.font = name.clone();
                    self.font_size = get_number(size).unwrap_or(12.0);
                }
            }
            "TL" => self.leading = operands.first().and_then(get_number),
            "Td" | "TD" => {
                if let [tx, ty, ..] = operands {
                    let tx = get_number(tx).unwrap_or(0.0);
                    let ty = get_number(ty).unwrap_or(0.0);
                    if operator == "TD" {
                        self.leading = Some(-ty);
                    }
                    self.line_matrix.translate(tx, ty);
                    self.text_matrix = self.line_matrix;
                }
            }
            "Tm" => {
                let values: Vec<f32> = operands.iter().filter_map(get_number).collect();
                if let [a, b, c, d, e, f] = values[..] {
                    self.line_matrix = TextMatrix { a, b, c, d, e, f };
                    self.text_matrix = self.line_matrix;
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    let text = decode(&self.font, bytes);
                    self.show(text);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    let text = self.assemble_tj(items, &decode);
                    self.show(text);
                }
            }
            "'" => {
                self.next_line();
                if let Some(Object::String(bytes, _)) = operands.first() {
                    let text = decode(&self.font, bytes);
                    self.show(text);
                }
            }
            "\"" => {
                self.next_line();
                if let Some(Object::String(bytes, _)) = operands.get(2) {
                    let text = decode(&self.font, bytes);
                    self.show(text);
                }
            }
            _ => {}
        }
    }

    fn next_line(&mut self) {
        let leading = self.leading.unwrap_or(self.font_size * 1.2);
        self.line_matrix.translate(0.0, -leading);
        self.text_matrix = self.line_matrix;
    }

    fn assemble_tj<F>(&self, items: &[Object], decode: &F) -> String
    where
        F: Fn(&[u8], &[u8]) -> String,
    {
        let mut combined = String::new();
        for item in items {
            match item {
                Object::String(bytes, _) => combined.push_str(&decode(&self.font, bytes)),
                other => {
                    // Negative adjustments advance; large ones are word breaks.
                    let adjustment = get_number(other).map(|n| -n).unwrap_or(0.0);
                    if adjustment > TJ_SPACE_THRESHOLD
                        && !combined.is_empty()
                        && !combined.ends_with(char::is_whitespace)
                    {
                        combined.push(' ');
                    }
                }
            }
        }
        combined
    }

    fn show(&mut self, text: String) {
        let glyphs = text.chars().count() as f32;
        let scale = self.text_matrix.horizontal_scale();
        let width = glyphs * self.font_size * GLYPH_ADVANCE * scale;

        if self.in_text && !text.trim().is_empty() {
            let (x, y) = self.text_matrix.position();
            self.spans.push(UserSpan {
                text,
                x,
                y,
                width,
                font_size: self.font_size * self.text_matrix.vertical_scale(),
            });
        }

        self.text_matrix.e += width;
    }
}

/// Text or line matrix `[a b c d e f]`.
#[derive(Debug, Clone, Copy)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn horizontal_scale(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Spans on one baseline with no wide gap between them.
#[derive(Debug, Clone)]
struct Segment {
    /// Word groups; glued spans are already concatenated.
    words: Vec<Span>,
}

impl Segment {
    fn bbox(&self) -> BoundingBox {
        let boxes: Vec<BoundingBox> = self.words.iter().map(Span::bbox).collect();
        BoundingBox::merge(&boxes)
    }

    fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.trim())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn font_size(&self) -> f32 {
        self.words.first().map(|w| w.font_size).unwrap_or(0.0)
    }

    fn into_raw(self) -> RawLine {
        RawLine::new(
            self.words
                .into_iter()
                .map(|w| {
                    let bbox = w.bbox();
                    RawSpan::new(bbox, w.text.trim().to_string())
                })
                .collect(),
        )
    }
}

/// Group spans into baseline rows, then split each row at wide gaps.
///
/// Output is top-to-bottom, left-to-right.
fn segment_lines(mut spans: Vec<Span>) -> Vec<Segment> {
    spans.sort_by(|a, b| cmp_coord(a.baseline, b.baseline).then(cmp_coord(a.x, b.x)));

    let mut rows: Vec<Vec<Span>> = Vec::new();
    for span in spans {
        match rows.last_mut() {
            Some(row)
                if (span.baseline - row[0].baseline).abs()
                    <= row[0].font_size.max(span.font_size) * BASELINE_TOLERANCE =>
            {
                row.push(span)
            }
            _ => rows.push(vec![span]),
        }
    }

    let mut segments = Vec::new();
    for mut row in rows {
        row.sort_by(|a, b| cmp_coord(a.x, b.x));

        let mut words: Vec<Span> = Vec::new();
        for span in row {
            let Some(prev) = words.last_mut() else {
                words.push(span);
                continue;
            };
            let gap = span.x - prev.right();
            let em = prev.font_size.max(span.font_size);
            if gap > em * LINE_SPLIT_GAP {
                segments.push(Segment {
                    words: std::mem::take(&mut words),
                });
                words.push(span);
            } else if gap > em * GLYPH_ADVANCE * WORD_GAP {
                words.push(span);
            } else {
                prev.text.push_str(&span.text);
                prev.width = span.right() - prev.x;
            }
        }
        if !words.is_empty() {
            segments.push(Segment { words });
        }
    }
    segments
}

/// Lines stacked into one paragraph-like block.
struct Block {
    lines: Vec<Segment>,
    bbox: BoundingBox,
}

impl Block {
    fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    fn text(&self) -> String {
        self.lines
            .iter()
            .map(Segment::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn accepts(&self, line: &Segment) -> bool {
        let Some(last) = self.lines.last() else {
            return false;
        };
        let last_box = last.bbox();
        let line_box = line.bbox();
        let gap = line_box.y0 - last_box.y1;

        gap >= -last_box.height() * 0.5
            && gap <= line_box.height() * 0.8
            && (line_box.x0 - self.bbox.x0).abs() <= 20.0
            && (line.font_size() - last.font_size()).abs() <= 1.0
    }
}

/// Stack vertically adjacent, left-aligned lines into blocks.
fn stack_blocks(lines: Vec<Segment>) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();
    for line in lines {
        if line.text().is_empty() {
            continue;
        }
        match blocks.iter_mut().rev().find(|b| b.accepts(&line)) {
            Some(block) => {
                block.bbox = block.bbox.union(&line.bbox());
                block.lines.push(line);
            }
            None => blocks.push(Block {
                bbox: line.bbox(),
                lines: vec![line],
            }),
        }
    }
    blocks
}
