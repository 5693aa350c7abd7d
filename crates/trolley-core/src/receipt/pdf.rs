//! PDF rendering for receipts.
//!
//! Draws a receipt onto an A4 page: store header, items table, summary
//! block and footer. Item rows that would run off the page continue on
//! a fresh page.

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rgb,
};
use tracing::debug;

use super::Receipt;
use crate::{Error, Result};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_X_MM: f32 = 14.0;
const RIGHT_EDGE_MM: f32 = 196.0;
const TOP_MARGIN_MM: f32 = 18.0;
const BOTTOM_MARGIN_MM: f32 = 20.0;

const QTY_RIGHT_MM: f32 = 124.0;
const PRICE_RIGHT_MM: f32 = 152.0;
const TOTAL_RIGHT_MM: f32 = RIGHT_EDGE_MM;
const NAME_WIDTH_MM: f32 = 98.0;
const LINE_HEIGHT_MM: f32 = 5.0;

const PT_TO_MM: f32 = 0.352_778;

// Built-in Helvetica is WinAnsi-encoded; the rupee sign is outside it.
const CURRENCY: &str = "Rs.";

/// Render a receipt to the bytes of a single PDF document.
pub fn render_pdf(receipt: &Receipt) -> Result<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(
        format!("Receipt {}", receipt.id),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "receipt",
    );

    let regular = builtin_font(&doc, BuiltinFont::Helvetica)?;
    let bold = builtin_font(&doc, BuiltinFont::HelveticaBold)?;
    let italic = builtin_font(&doc, BuiltinFont::HelveticaOblique)?;

    let mut canvas = Canvas {
        doc: &doc,
        layer: doc.get_page(page).get_layer(layer),
        y: TOP_MARGIN_MM,
    };

    // Header
    canvas.text(&receipt.store_name, 16.0, MARGIN_X_MM, &bold);
    canvas.advance(6.5);
    if let Some(ref address) = receipt.store_address {
        canvas.text(address, 10.0, MARGIN_X_MM, &regular);
        canvas.advance(5.0);
    }
    canvas.text(&format!("Date: {}", receipt.date), 10.0, MARGIN_X_MM, &regular);
    canvas.advance(5.0);
    canvas.text(&format!("Receipt ID: {}", receipt.id), 10.0, MARGIN_X_MM, &regular);
    canvas.advance(8.5);

    canvas.rule(0.78);
    canvas.advance(7.0);

    // Items header
    canvas.text("Item", 11.0, MARGIN_X_MM, &bold);
    canvas.text_right("Qty", 11.0, QTY_RIGHT_MM, &bold);
    canvas.text_right("Price", 11.0, PRICE_RIGHT_MM, &bold);
    canvas.text_right("Total", 11.0, TOTAL_RIGHT_MM, &bold);
    canvas.advance(5.0);
    canvas.rule(0.90);
    canvas.advance(4.5);

    // Items
    for item in &receipt.items {
        let name_lines = wrap_text(&item.name, NAME_WIDTH_MM, 10.0);
        let row_height = name_lines.len() as f32 * LINE_HEIGHT_MM + 2.8;
        canvas.ensure_space(row_height);

        canvas.text(&name_lines[0], 10.0, MARGIN_X_MM, &regular);
        canvas.text_right(&item.qty.to_string(), 10.0, QTY_RIGHT_MM, &regular);
        canvas.text_right(&money(item.price), 10.0, PRICE_RIGHT_MM, &regular);
        canvas.text_right(&money(item.line_total()), 10.0, TOTAL_RIGHT_MM, &regular);

        for line in &name_lines[1..] {
            canvas.advance(LINE_HEIGHT_MM);
            canvas.text(line, 10.0, MARGIN_X_MM, &regular);
        }

        canvas.advance(LINE_HEIGHT_MM);
        canvas.rule(0.96);
        canvas.advance(2.8);
    }

    canvas.advance(3.0);

    // Summary
    canvas.ensure_space(40.0);
    canvas.text_right("Subtotal", 11.0, PRICE_RIGHT_MM, &regular);
    canvas.text_right(&money(receipt.subtotal), 11.0, TOTAL_RIGHT_MM, &regular);
    canvas.advance(5.6);
    canvas.text_right("Tax", 11.0, PRICE_RIGHT_MM, &regular);
    canvas.text_right(&money(receipt.tax), 11.0, TOTAL_RIGHT_MM, &regular);
    canvas.advance(5.6);
    canvas.text_right("Total", 11.0, PRICE_RIGHT_MM, &bold);
    canvas.text_right(&money(receipt.total), 11.0, TOTAL_RIGHT_MM, &bold);
    canvas.advance(8.5);

    canvas.text(
        &format!("Paid via: {}", receipt.payment_method),
        10.0,
        MARGIN_X_MM,
        &regular,
    );
    canvas.advance(8.5);

    // Footer
    canvas.set_text_gray(0.47);
    canvas.text("Thank you for shopping with us!", 9.0, MARGIN_X_MM, &italic);

    debug!(receipt_id = %receipt.id, items = receipt.items.len(), "receipt rendered");

    doc.save_to_bytes()
        .map_err(|e| Error::Receipt(format!("failed to serialize PDF: {}", e)))
}

fn builtin_font(doc: &PdfDocumentReference, font: BuiltinFont) -> Result<IndirectFontRef> {
    doc.add_builtin_font(font)
        .map_err(|e| Error::Receipt(format!("failed to load built-in font: {}", e)))
}

fn money(amount: f64) -> String {
    format!("{}{:.2}", CURRENCY, amount)
}

/// Drawing cursor over the current page.
///
/// `y` is the distance from the top of the page; PDF user space has its
/// origin at the bottom, so drawing flips the coordinate.
struct Canvas<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
}

impl Canvas<'_> {
    fn text(&self, text: &str, size_pt: f32, x: f32, font: &IndirectFontRef) {
        self.layer
            .use_text(text, size_pt, Mm(x), Mm(PAGE_HEIGHT_MM - self.y), font);
    }

    fn text_right(&self, text: &str, size_pt: f32, right: f32, font: &IndirectFontRef) {
        let x = right - text_width_mm(text, size_pt);
        self.text(text, size_pt, x, font);
    }

    /// Horizontal rule across the content width at the current cursor.
    fn rule(&self, gray: f32) {
        let y = Mm(PAGE_HEIGHT_MM - self.y);
        let line = Line {
            points: vec![
                (Point::new(Mm(MARGIN_X_MM), y), false),
                (Point::new(Mm(RIGHT_EDGE_MM), y), false),
            ],
            is_closed: false,
        };
        self.layer
            .set_outline_color(Color::Rgb(Rgb::new(gray, gray, gray, None)));
        self.layer.set_outline_thickness(0.5);
        self.layer.add_line(line);
    }

    fn set_text_gray(&self, gray: f32) {
        self.layer
            .set_fill_color(Color::Rgb(Rgb::new(gray, gray, gray, None)));
    }

    fn advance(&mut self, dy: f32) {
        self.y += dy;
    }

    /// Start a fresh page if `needed` more millimetres would cross the
    /// bottom margin.
    fn ensure_space(&mut self, needed: f32) {
        if self.y + needed > PAGE_HEIGHT_MM - BOTTOM_MARGIN_MM {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "receipt");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = TOP_MARGIN_MM;
        }
    }
}

/// Approximate rendered width of `text` in millimetres.
///
/// Helvetica averages about half an em per glyph; exact metrics are not
/// exposed for built-in fonts, and right-alignment only needs to be
/// close.
fn text_width_mm(text: &str, size_pt: f32) -> f32 {
    text.chars().count() as f32 * size_pt * 0.5 * PT_TO_MM
}

/// Greedy word wrap to `max_width` millimetres.
fn wrap_text(text: &str, max_width: f32, size_pt: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if text_width_mm(&candidate, size_pt) <= max_width || current.is_empty() {
            current = candidate;
        } else {
            lines.push(current);
            current = word.to_string();
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
