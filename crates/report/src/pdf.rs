//! PDF composition.
//!
//! One letter-size page: title, department counts, name-length statistics,
//! then the two charts side by side with figure captions. Charts arrive as
//! decoded images (not paths) so composition stays testable without the
//! filesystem.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::Context;
use printpdf::image_crate::DynamicImage;
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference,
};

use crate::stats::Summary;

const PAGE_WIDTH: f64 = 215.9;
const PAGE_HEIGHT: f64 = 279.4;
const MARGIN_LEFT: f64 = 18.0;
const MARGIN_TOP: f64 = 18.0;
const LINE_SPACING: f64 = 6.0;

/// Rendered chart width at the embed dpi (800 px at 300 dpi).
const CHART_WIDTH_MM: f64 = 67.7;
/// Rendered chart height at the embed dpi (600 px at 300 dpi).
const CHART_HEIGHT_MM: f64 = 50.8;

/// Assemble the report document.
pub fn compose_report(
    summary: &Summary,
    bar_chart: &DynamicImage,
    hist_chart: &DynamicImage,
) -> anyhow::Result<PdfDocumentReference> {
    let (doc, page, layer) = PdfDocument::new(
        "Professor Data Analysis Report",
        Mm(PAGE_WIDTH as f32),
        Mm(PAGE_HEIGHT as f32),
        "Layer 1",
    );
    let layer = doc.get_page(page).get_layer(layer);

    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .context("failed to register bold font")?;
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .context("failed to register text font")?;

    let mut cursor = PAGE_HEIGHT - MARGIN_TOP;

    draw_centered(&layer, &bold, 18.0, cursor, "Professor Data Analysis Report");
    cursor -= 2.0 * LINE_SPACING;

    layer.use_text("Department Counts:", 14.0, Mm(MARGIN_LEFT as f32), Mm(cursor as f32), &bold);
    cursor -= LINE_SPACING;
    for dc in &summary.departments {
        let line = format!("  {}: {}", dc.department, dc.count);
        layer.use_text(line, 12.0, Mm(MARGIN_LEFT as f32), Mm(cursor as f32), &regular);
        cursor -= LINE_SPACING;
    }
    cursor -= LINE_SPACING;

    layer.use_text(
        "Name Length Statistics:",
        14.0,
        Mm(MARGIN_LEFT as f32),
        Mm(cursor as f32),
        &bold,
    );
    cursor -= LINE_SPACING;
    for (label, value) in summary.name_stats.rows() {
        let line = format!("  {label}: {value:.2}");
        layer.use_text(line, 12.0, Mm(MARGIN_LEFT as f32), Mm(cursor as f32), &regular);
        cursor -= LINE_SPACING;
    }
    cursor -= 2.0 * LINE_SPACING;

    let image_bottom = cursor - CHART_HEIGHT_MM;
    place_image(&layer, bar_chart, MARGIN_LEFT, image_bottom);
    layer.use_text(
        "Figure 1: Professors by Department",
        10.0,
        Mm(MARGIN_LEFT as f32),
        Mm((image_bottom - LINE_SPACING) as f32),
        &regular,
    );

    let second_x = MARGIN_LEFT + CHART_WIDTH_MM + 25.0;
    place_image(&layer, hist_chart, second_x, image_bottom);
    layer.use_text(
        "Figure 2: Name Length Distribution",
        10.0,
        Mm(second_x as f32),
        Mm((image_bottom - LINE_SPACING) as f32),
        &regular,
    );

    Ok(doc)
}

/// Write the document to disk.
pub fn save_report(doc: PdfDocumentReference, path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    doc.save(&mut BufWriter::new(file))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

fn place_image(layer: &PdfLayerReference, image: &DynamicImage, x: f64, y: f64) {
    Image::from_dynamic_image(image).add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(x as f32)),
            translate_y: Some(Mm(y as f32)),
            ..Default::default()
        },
    );
}

/// Approximate centered text: builtin fonts ship no metrics, so estimate the
/// width from the average Helvetica glyph ratio.
fn draw_centered(layer: &PdfLayerReference, font: &IndirectFontRef, size: f64, y: f64, text: &str) {
    const PT_TO_MM: f64 = 0.352_778;
    const AVG_GLYPH_RATIO: f64 = 0.5;
    let width = text.chars().count() as f64 * size * AVG_GLYPH_RATIO * PT_TO_MM;
    let x = ((PAGE_WIDTH - width) / 2.0).max(MARGIN_LEFT);
    layer.use_text(text, size as f32, Mm(x as f32), Mm(y as f32), font);
}
