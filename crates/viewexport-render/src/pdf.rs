//! Printable tabular PDF.
//!
//! Layout is computed first in top-down page coordinates (origin at the top
//! left, like a screen) and only then encoded as PDF content streams, which
//! flip the y axis.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

use viewexport_core::Table;

const PAGE_WIDTH: i64 = 612;
const PAGE_HEIGHT: i64 = 792;
const MARGIN: i64 = 50;
const TABLE_TOP: i64 = 90;
const CELL_WIDTH: i64 = 80;
const CELL_HEIGHT: i64 = 20;
const CELL_PADDING: i64 = 5;
/// Cursor position past which the next row starts a new page.
const PAGE_BREAK_Y: i64 = 700;

const TITLE_SIZE: i64 = 16;
const HEADER_SIZE: i64 = 10;
const CELL_SIZE: i64 = 8;
const NOTE_SIZE: i64 = 8;

const HEADER_CHARS: usize = 12;
const CELL_CHARS: usize = 15;

/// Rows drawn at most; the remainder is summarised in a trailing note.
pub const MAX_PDF_ROWS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gray {
    Black,
    /// `#f0f0f0`
    HeaderFill,
    /// `#cccccc`
    GridLine,
}

impl Gray {
    fn operand(self) -> Object {
        match self {
            Gray::Black => Object::Integer(0),
            Gray::HeaderFill => Object::Real(0.94),
            Gray::GridLine => Object::Real(0.8),
        }
    }
}

/// One drawing instruction, in top-down coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Text {
        x: i64,
        y: i64,
        size: i64,
        font: Font,
        text: String,
    },
    Cell {
        x: i64,
        y: i64,
        fill: Option<Gray>,
        stroke: Gray,
    },
}

/// Pages of marks, ready for encoding.
#[derive(Debug, Clone, Default)]
pub struct PdfLayout {
    pub pages: Vec<Vec<Mark>>,
    /// Rows left out because of [`MAX_PDF_ROWS`].
    pub omitted_rows: usize,
}

impl PdfLayout {
    /// All text marks across pages, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flatten().filter_map(|mark| match mark {
            Mark::Text { text, .. } => Some(text.as_str()),
            Mark::Cell { .. } => None,
        })
    }
}

/// Lay out the title, header row and up to [`MAX_PDF_ROWS`] data rows.
pub fn layout(table: &Table, title: &str) -> PdfLayout {
    let mut pages: Vec<Vec<Mark>> = vec![Vec::new()];

    push(
        &mut pages,
        Mark::Text {
            x: MARGIN,
            y: MARGIN,
            size: TITLE_SIZE,
            font: Font::Bold,
            text: title.to_string(),
        },
    );

    let mut y = TABLE_TOP;
    for (i, header) in table.headers().iter().enumerate() {
        let x = MARGIN + i as i64 * CELL_WIDTH;
        push(
            &mut pages,
            Mark::Cell {
                x,
                y,
                fill: Some(Gray::HeaderFill),
                stroke: Gray::Black,
            },
        );
        push(
            &mut pages,
            Mark::Text {
                x: x + CELL_PADDING,
                y: y + CELL_PADDING,
                size: HEADER_SIZE,
                font: Font::Bold,
                text: truncate(header, HEADER_CHARS),
            },
        );
    }
    y += CELL_HEIGHT;

    let records: Vec<_> = table.records().collect();
    let drawn = records.len().min(MAX_PDF_ROWS);
    let omitted_rows = records.len() - drawn;
    for (index, row) in records[..drawn].iter().enumerate() {
        for (i, value) in row.cells().iter().enumerate() {
            let x = MARGIN + i as i64 * CELL_WIDTH;
            push(
                &mut pages,
                Mark::Cell {
                    x,
                    y,
                    fill: None,
                    stroke: Gray::GridLine,
                },
            );
            push(
                &mut pages,
                Mark::Text {
                    x: x + CELL_PADDING,
                    y: y + CELL_PADDING,
                    size: CELL_SIZE,
                    font: Font::Regular,
                    text: truncate(value, CELL_CHARS),
                },
            );
        }
        y += CELL_HEIGHT;

        // No trailing blank page when nothing follows.
        let more_to_draw = index + 1 < drawn || omitted_rows > 0;
        if y > PAGE_BREAK_Y && more_to_draw {
            pages.push(Vec::new());
            y = MARGIN;
        }
    }

    if omitted_rows > 0 {
        push(
            &mut pages,
            Mark::Text {
                x: MARGIN,
                y: y + CELL_PADDING * 2,
                size: NOTE_SIZE,
                font: Font::Regular,
                text: format!("... and {} more rows", omitted_rows),
            },
        );
    }

    PdfLayout {
        pages,
        omitted_rows,
    }
}

fn push(pages: &mut [Vec<Mark>], mark: Mark) {
    if let Some(current) = pages.last_mut() {
        current.push(mark);
    }
}

/// Render the table as PDF bytes titled `title`.
pub fn render_pdf(table: &Table, title: &str) -> Result<Vec<u8>, String> {
    encode(&layout(table, title))
}

/// Encode a layout with lopdf, one content stream per page.
pub fn encode(layout: &PdfLayout) -> Result<Vec<u8>, String> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            Font::Regular.resource() => regular_id,
            Font::Bold.resource() => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(layout.pages.len());
    for marks in &layout.pages {
        let content: Content<Vec<Operation>> = Content {
            operations: marks.iter().flat_map(operations).collect(),
        };
        let bytes = content.encode().map_err(|e| e.to_string())?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, bytes));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut out = Vec::new();
    doc.save_to(&mut out).map_err(|e| e.to_string())?;
    Ok(out)
}

fn operations(mark: &Mark) -> Vec<Operation> {
    match mark {
        Mark::Cell { x, y, fill, stroke } => {
            let rect = vec![
                Object::Integer(*x),
                Object::Integer(PAGE_HEIGHT - y - CELL_HEIGHT),
                Object::Integer(CELL_WIDTH),
                Object::Integer(CELL_HEIGHT),
            ];
            let mut ops = vec![
                Operation::new("q", vec![]),
                Operation::new("G", vec![stroke.operand()]),
            ];
            match fill {
                Some(fill) => {
                    ops.push(Operation::new("g", vec![fill.operand()]));
                    ops.push(Operation::new("re", rect));
                    ops.push(Operation::new("B", vec![]));
                }
                None => {
                    ops.push(Operation::new("re", rect));
                    ops.push(Operation::new("S", vec![]));
                }
            }
            ops.push(Operation::new("Q", vec![]));
            ops
        }
        Mark::Text {
            x,
            y,
            size,
            font,
            text,
        } => vec![
            Operation::new("g", vec![Gray::Black.operand()]),
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![font.resource().into(), Object::Integer(*size)]),
            Operation::new(
                "Td",
                vec![Object::Integer(*x), Object::Integer(PAGE_HEIGHT - y - size)],
            ),
            Operation::new("Tj", vec![Object::String(win_ansi(text), StringFormat::Literal)]),
            Operation::new("ET", vec![]),
        ],
    }
}

/// First `max` characters of `text`.
fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Latin-1 bytes for the standard fonts; anything outside becomes `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}
