use crate::capture::CapturedImage;
use crate::chart::ChartType;
use anyhow::{Context, Result};
use log::debug;
use printpdf::{Image, ImageTransform, Mm, PdfDocument};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const TOP_MARGIN_MM: f32 = 10.0;
const BOTTOM_MARGIN_MM: f32 = 20.0;
const IMAGE_GAP_MM: f32 = 10.0;

/// Scaled width on the page: Pie-sized sources get 100mm, everything else
/// the full 180mm content width.
const PIE_WIDTH_MM: f32 = 100.0;
const WIDE_WIDTH_MM: f32 = 180.0;

/// Where one captured image lands in the document. Pages are 0-based.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedImage {
    pub page: usize,
    pub x_mm: f32,
    pub y_mm: f32,
    pub width_mm: f32,
    pub height_mm: f32,
}

/// Lay captured images out across A4 portrait pages, in order.
///
/// Aspect ratio is preserved; an image that would cross the bottom margin
/// starts a new page instead (page-break-before, images are never split).
pub fn plan_pages(images: &[CapturedImage]) -> Vec<PlacedImage> {
    let limit = PAGE_HEIGHT_MM - BOTTOM_MARGIN_MM;
    let mut page = 0usize;
    let mut current_y = TOP_MARGIN_MM;
    let mut placements = Vec::with_capacity(images.len());

    for image in images {
        let width_mm = if image.chart_type == ChartType::Pie {
            PIE_WIDTH_MM
        } else {
            WIDE_WIDTH_MM
        };
        let height_mm = image.height_px as f32 * (width_mm / image.width_px as f32);

        if current_y + height_mm > limit {
            page += 1;
            current_y = TOP_MARGIN_MM;
        }

        placements.push(PlacedImage {
            page,
            x_mm: (PAGE_WIDTH_MM - width_mm) / 2.0,
            y_mm: current_y,
            width_mm,
            height_mm,
        });
        current_y += height_mm + IMAGE_GAP_MM;
    }

    placements
}

/// Assemble captured images into PDF bytes.
pub fn compose(images: &[CapturedImage]) -> Result<Vec<u8>> {
    if images.is_empty() {
        anyhow::bail!("nothing to compose: no captured images");
    }

    let placements = plan_pages(images);
    let page_count = placements.last().map_or(1, |p| p.page + 1);
    debug!(
        "composing {} captures across {page_count} page(s)",
        images.len()
    );

    let (doc, first_page, first_layer) =
        PdfDocument::new("Chart Export", Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let mut pages = vec![(first_page, first_layer)];

    for (image, placement) in images.iter().zip(&placements) {
        while pages.len() <= placement.page {
            pages.push(doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1"));
        }
        let (page_index, layer_index) = pages[placement.page];
        let layer = doc.get_page(page_index).get_layer(layer_index);

        let bitmap = printpdf::image_crate::RgbImage::from_raw(
            image.width_px,
            image.height_px,
            image.pixels.clone(),
        )
        .context("captured pixel buffer does not match its dimensions")?;
        let pdf_image =
            Image::from_dynamic_image(&printpdf::image_crate::DynamicImage::ImageRgb8(bitmap));

        // printpdf places from the bottom-left corner
        let dpi = 300.0_f32;
        let native_width_mm = image.width_px as f32 * 25.4 / dpi;
        let native_height_mm = image.height_px as f32 * 25.4 / dpi;
        pdf_image.add_to_layer(
            layer,
            ImageTransform {
                translate_x: Some(Mm(placement.x_mm)),
                translate_y: Some(Mm(
                    PAGE_HEIGHT_MM - placement.y_mm - placement.height_mm
                )),
                scale_x: Some(placement.width_mm / native_width_mm),
                scale_y: Some(placement.height_mm / native_height_mm),
                dpi: Some(dpi),
                ..Default::default()
            },
        );
    }

    doc.save_to_bytes().context("Failed to serialize PDF")
}

/// Download name: `{fileName}_{x}_vs_{y}_{types joined by "_"}.pdf`.
pub fn document_name(file_name: &str, x_column: &str, y_column: &str, types: &[ChartType]) -> String {
    let joined = types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("_");
    format!("{file_name}_{x_column}_vs_{y_column}_{joined}.pdf")
}
