//! Landscape document rendering of the team preview.

use anyhow::{anyhow, Result};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument};

use super::table::Sheet;

/// Landscape A4 width.
pub const PAGE_WIDTH_MM: f32 = 297.0;
/// Landscape A4 height.
pub const PAGE_HEIGHT_MM: f32 = 210.0;
/// Margin kept clear on every side.
pub const MARGIN_MM: f32 = 10.0;
/// Resolution multiplier applied when capturing the table.
pub const CAPTURE_SCALE: f32 = 2.0;

const PX_TO_MM: f32 = 25.4 / 96.0;
const CHAR_WIDTH_PX: f32 = 7.0;
const CELL_PADDING_PX: f32 = 8.0;
const ROW_HEIGHT_PX: f32 = 24.0;
const FONT_SIZE_PT: f32 = 10.0;

/// Position and size of the captured table on the page, in millimetres
/// measured from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Scale content of the given size to the printable width, shrinking it
/// proportionally when it would overflow the printable height.
pub fn fit_to_page(content_width: f32, content_height: f32) -> Placement {
    let available_width = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
    let available_height = PAGE_HEIGHT_MM - 2.0 * MARGIN_MM;

    let mut width = available_width;
    let mut height = content_height * available_width / content_width;
    if height > available_height {
        width *= available_height / height;
        height = available_height;
    }

    Placement {
        x: MARGIN_MM,
        y: MARGIN_MM,
        width,
        height,
    }
}

struct Capture {
    column_widths: Vec<f32>,
    row_height: f32,
    width: f32,
    height: f32,
}

impl Capture {
    /// Measure `sheet` in millimetres at [`CAPTURE_SCALE`].
    fn measure(sheet: &Sheet) -> Option<Self> {
        let columns = sheet.width();
        if columns < 2 || sheet.rows.is_empty() {
            return None;
        }
        let column_widths: Vec<f32> = (0..columns)
            .map(|column| {
                let chars = sheet
                    .rows
                    .iter()
                    .filter_map(|row| row.get(column))
                    .map(|cell| cell.display().chars().count())
                    .max()
                    .unwrap_or(0);
                (chars as f32 * CHAR_WIDTH_PX + 2.0 * CELL_PADDING_PX) * CAPTURE_SCALE * PX_TO_MM
            })
            .collect();
        let row_height = ROW_HEIGHT_PX * CAPTURE_SCALE * PX_TO_MM;
        let width = column_widths.iter().sum();
        let height = row_height * sheet.rows.len() as f32;
        Some(Self {
            column_widths,
            row_height,
            width,
            height,
        })
    }
}

/// Render the preview `sheet` as a single landscape page.
///
/// Returns `None` when the sheet has no game-day columns to capture.
pub fn preview_document(title: &str, sheet: &Sheet) -> Result<Option<Vec<u8>>> {
    let Some(capture) = Capture::measure(sheet) else {
        return Ok(None);
    };
    let placement = fit_to_page(capture.width, capture.height);
    let scale = placement.width / capture.width;

    let (doc, page, layer) = PdfDocument::new(
        title,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Preview",
    );
    let layer = doc.get_page(page).get_layer(layer);
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|err| anyhow!("failed to load font: {err:?}"))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|err| anyhow!("failed to load font: {err:?}"))?;

    let font_size = FONT_SIZE_PT * CAPTURE_SCALE * scale;
    let row_height = capture.row_height * scale;
    let padding = CELL_PADDING_PX * CAPTURE_SCALE * PX_TO_MM * scale;

    for (row_index, row) in sheet.rows.iter().enumerate() {
        let baseline_from_top = placement.y + row_height * (row_index as f32 + 0.7);
        let y = PAGE_HEIGHT_MM - baseline_from_top;
        let mut x = placement.x;
        for (column_index, cell) in row.iter().enumerate() {
            let text = cell.display();
            if !text.is_empty() {
                let font: &IndirectFontRef = if sheet.is_header(row_index, column_index) {
                    &bold
                } else {
                    &regular
                };
                layer.use_text(text, font_size, Mm(x + padding), Mm(y), font);
            }
            x += capture.column_widths[column_index] * scale;
        }
    }

    let bytes = doc
        .save_to_bytes()
        .map_err(|err| anyhow!("failed to serialize document: {err:?}"))?;
    Ok(Some(bytes))
}
