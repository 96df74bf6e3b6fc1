use std::io::BufWriter;

use anyhow::{Result, anyhow};
use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::analysis::describe::DescriptiveStats;

pub const REPORT_TITLE: &str = "Emperor Data Analytics Report";

// A4 portrait, in millimetres.
const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;

const HEADING_SIZE: f32 = 20.0;
const BODY_SIZE: f32 = 9.0;
const LINE_HEIGHT: f32 = 4.2;

/// Characters of 9pt Courier that fit between the margins: a glyph is
/// 0.6 em = 1.905 mm wide, 170 mm / 1.905 mm ≈ 89.
const BODY_COLUMNS: usize = 88;

/// Single-page report: a heading and the statistics table as monospace
/// text.  Wide tables wrap into column blocks; lines past the bottom
/// margin are cut and marked with an ellipsis.
pub fn report(stats: &DescriptiveStats) -> Result<Vec<u8>> {
    let (doc, page, layer) =
        PdfDocument::new(REPORT_TITLE, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let heading = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| anyhow!("embedding heading font: {e}"))?;
    let body = doc
        .add_builtin_font(BuiltinFont::Courier)
        .map_err(|e| anyhow!("embedding body font: {e}"))?;
    let layer = doc.get_page(page).get_layer(layer);

    let mut y = PAGE_HEIGHT - MARGIN - 7.0;
    layer.use_text(REPORT_TITLE, HEADING_SIZE, Mm(MARGIN), Mm(y), &heading);
    y -= 12.0;

    let text = stats.to_text_wrapped(BODY_COLUMNS);
    let mut lines = text.lines().peekable();
    while let Some(line) = lines.next() {
        if y - LINE_HEIGHT < MARGIN && lines.peek().is_some() {
            layer.use_text("...", BODY_SIZE, Mm(MARGIN), Mm(y), &body);
            break;
        }
        layer.use_text(line, BODY_SIZE, Mm(MARGIN), Mm(y), &body);
        y -= LINE_HEIGHT;
    }

    let mut out = BufWriter::new(Vec::new());
    doc.save(&mut out).map_err(|e| anyhow!("serialising PDF: {e}"))?;
    out.into_inner()
        .map_err(|e| anyhow!("flushing PDF: {}", e.error()))
}
