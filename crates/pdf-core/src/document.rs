//! PDF Document builder

use crate::font::StandardFont;
use crate::graphics::{
    generate_circle_operators, generate_line_operators, generate_rect_operators, LineStyle,
    PaintMode,
};
use crate::image::{
    calculate_scaled_dimensions, generate_image_operators, ImageScaleMode, ImageXObject,
};
use crate::text::{
    encode_win_ansi_hex, generate_rotated_text_operators, generate_text_operators,
    TextRenderContext,
};
use crate::{Align, PdfError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::{Hash, Hasher};
use std::io::Write;
use tracing::debug;

/// A4 page width in points
pub const A4_WIDTH: f64 = 595.2756;
/// A4 page height in points
pub const A4_HEIGHT: f64 = 841.8898;

/// RGB Color (values 0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a new RGB color (values 0.0 - 1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Black color
    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    /// White color
    pub fn white() -> Self {
        Self::rgb(1.0, 1.0, 1.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// Per-page drawing state, turned into PDF objects on save
#[derive(Debug, Default)]
struct PageState {
    width: f64,
    height: f64,
    /// Content stream operators, uncompressed
    content: Vec<u8>,
    /// Fonts referenced by this page
    fonts: BTreeSet<StandardFont>,
    /// Images referenced by this page (index into `PdfDocument::images`)
    images: BTreeSet<usize>,
    /// Constant alpha states referenced by this page, in thousandths
    alphas: BTreeSet<u16>,
}

/// PDF Document builder providing high-level drawing operations
///
/// Drawing calls buffer operators per page; `to_bytes` assembles the
/// lopdf object graph once, so pages stay cheap to append.
pub struct PdfDocument {
    pages: Vec<PageState>,
    /// Current font face
    current_font: StandardFont,
    /// Current font size
    current_font_size: f64,
    /// Current text color
    current_text_color: Color,
    /// Decoded images in insertion order
    images: Vec<ImageXObject>,
    /// Image data hash -> index into `images`
    image_index: HashMap<u64, usize>,
    /// Document title for the Info dictionary
    title: Option<String>,
}

impl Default for PdfDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfDocument {
    /// Create an empty document with no pages
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            current_font: StandardFont::Helvetica,
            current_font_size: 12.0,
            current_text_color: Color::default(),
            images: Vec::new(),
            image_index: HashMap::new(),
            title: None,
        }
    }

    /// Set the document title written to the Info dictionary
    pub fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    /// Get the number of pages in the document
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Append a blank A4 page
    ///
    /// # Returns
    /// New page number (1-indexed)
    pub fn add_page(&mut self) -> usize {
        self.pages.push(PageState {
            width: A4_WIDTH,
            height: A4_HEIGHT,
            ..PageState::default()
        });
        debug!(page = self.pages.len(), "added page");
        self.pages.len()
    }

    fn page(&self, page: usize) -> Result<&PageState> {
        let count = self.pages.len();
        page.checked_sub(1)
            .and_then(|i| self.pages.get(i))
            .ok_or(PdfError::InvalidPage(page, count))
    }

    fn page_mut(&mut self, page: usize) -> Result<&mut PageState> {
        let count = self.pages.len();
        page.checked_sub(1)
            .and_then(|i| self.pages.get_mut(i))
            .ok_or(PdfError::InvalidPage(page, count))
    }

    /// Set current font face and size
    pub fn set_font(&mut self, font: StandardFont, size: f64) {
        self.current_font = font;
        self.current_font_size = size;
    }

    /// Set text color for subsequent text insertions
    pub fn set_text_color(&mut self, color: Color) {
        self.current_text_color = color;
    }

    /// Width of `text` in points with the current font and size
    pub fn text_width(&self, text: &str) -> f64 {
        self.current_font
            .text_width_points(text, self.current_font_size)
    }

    fn text_context(&self, text: &str) -> TextRenderContext {
        TextRenderContext {
            font_name: self.current_font.resource_name().to_string(),
            font_size: self.current_font_size,
            text_width: self.text_width(text),
            color: self.current_text_color,
        }
    }

    /// Insert a single line of text
    ///
    /// # Arguments
    /// * `text` - Text to insert
    /// * `page` - Page number (1-indexed)
    /// * `x` - X coordinate in points (anchor for `align`)
    /// * `y` - Baseline Y coordinate in points, from the bottom of the page
    /// * `align` - Text alignment
    pub fn insert_text(
        &mut self,
        text: &str,
        page: usize,
        x: f64,
        y: f64,
        align: Align,
    ) -> Result<()> {
        let ctx = self.text_context(text);
        let font = self.current_font;
        let ops = generate_text_operators(&encode_win_ansi_hex(text), x, y, align, &ctx);

        let state = self.page_mut(page)?;
        state.fonts.insert(font);
        state.content.extend_from_slice(&ops);
        Ok(())
    }

    /// Insert text rotated counter-clockwise by `angle_deg`, centered on `(x, y)`
    pub fn insert_text_rotated(
        &mut self,
        text: &str,
        page: usize,
        x: f64,
        y: f64,
        angle_deg: f64,
    ) -> Result<()> {
        let ctx = self.text_context(text);
        let font = self.current_font;
        let ops =
            generate_rotated_text_operators(&encode_win_ansi_hex(text), x, y, angle_deg, &ctx);

        let state = self.page_mut(page)?;
        state.fonts.insert(font);
        state.content.extend_from_slice(&ops);
        Ok(())
    }

    /// Draw a straight line
    pub fn draw_line(
        &mut self,
        page: usize,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        style: &LineStyle,
    ) -> Result<()> {
        let ops = generate_line_operators(x1, y1, x2, y2, style);
        self.page_mut(page)?.content.extend_from_slice(&ops);
        Ok(())
    }

    /// Draw a rectangle with its lower-left corner at `(x, y)`
    pub fn draw_rect(
        &mut self,
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        mode: &PaintMode,
    ) -> Result<()> {
        let ops = generate_rect_operators(x, y, width, height, mode);
        self.page_mut(page)?.content.extend_from_slice(&ops);
        Ok(())
    }

    /// Draw a circle centered at `(cx, cy)`
    pub fn draw_circle(
        &mut self,
        page: usize,
        cx: f64,
        cy: f64,
        radius: f64,
        mode: &PaintMode,
    ) -> Result<()> {
        let ops = generate_circle_operators(cx, cy, radius, mode);
        self.page_mut(page)?.content.extend_from_slice(&ops);
        Ok(())
    }

    /// Save graphics state and apply a constant alpha (0.0 - 1.0)
    ///
    /// Must be paired with [`PdfDocument::end_alpha`] on the same page.
    pub fn begin_alpha(&mut self, page: usize, alpha: f64) -> Result<()> {
        let permille = (alpha.clamp(0.0, 1.0) * 1000.0).round() as u16;
        let state = self.page_mut(page)?;
        state.alphas.insert(permille);
        state
            .content
            .extend_from_slice(format!("q\n/GS{permille} gs\n").as_bytes());
        Ok(())
    }

    /// Restore the graphics state saved by [`PdfDocument::begin_alpha`]
    pub fn end_alpha(&mut self, page: usize) -> Result<()> {
        self.page_mut(page)?.content.extend_from_slice(b"Q\n");
        Ok(())
    }

    /// Decode (or reuse) an image and return its index and pixel size
    ///
    /// Images are deduplicated by hash of their data.
    fn register_image(&mut self, data: &[u8]) -> Result<(usize, u32, u32)> {
        let mut hasher = DefaultHasher::new();
        data.hash(&mut hasher);
        let data_hash = hasher.finish();

        let index = match self.image_index.get(&data_hash) {
            Some(&index) => index,
            None => {
                let xobject = ImageXObject::decode(data).map_err(|e| {
                    PdfError::ImageError(format!("Failed to create image XObject: {e}"))
                })?;
                self.images.push(xobject);
                let index = self.images.len() - 1;
                self.image_index.insert(data_hash, index);
                index
            }
        };

        let image = &self.images[index];
        Ok((index, image.width, image.height))
    }

    /// Pixel dimensions of an image without placing it
    pub fn image_size(&mut self, data: &[u8]) -> Result<(u32, u32)> {
        let (_, width, height) = self.register_image(data)?;
        Ok((width, height))
    }

    /// Insert an image into the box at `(x, y, width, height)` using `mode`
    ///
    /// With [`ImageScaleMode::FitBox`] the image keeps its aspect ratio and is
    /// centered in the box.
    ///
    /// # Returns
    /// The drawn `(width, height)` in points
    #[allow(clippy::too_many_arguments)]
    pub fn insert_image_scaled(
        &mut self,
        data: &[u8],
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        mode: ImageScaleMode,
    ) -> Result<(f64, f64)> {
        // validate the page before decoding
        self.page(page)?;
        let (index, px_w, px_h) = self.register_image(data)?;
        let (draw_w, draw_h) = calculate_scaled_dimensions(px_w, px_h, width, height, mode);
        let draw_x = x + (width - draw_w) / 2.0;
        let draw_y = y + (height - draw_h) / 2.0;

        let name = image_resource_name(index);
        let ops = generate_image_operators(&name, draw_x, draw_y, draw_w, draw_h);
        let state = self.page_mut(page)?;
        state.images.insert(index);
        state.content.extend_from_slice(&ops);
        Ok((draw_w, draw_h))
    }

    /// Serialize the document to PDF bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        // Fonts shared by all pages
        let mut font_ids: BTreeMap<StandardFont, ObjectId> = BTreeMap::new();
        for font in self.pages.iter().flat_map(|p| p.fonts.iter()) {
            if !font_ids.contains_key(font) {
                let id = doc.add_object(font.to_pdf_dictionary());
                font_ids.insert(*font, id);
            }
        }

        // Images, each with its optional soft mask
        let mut image_ids: Vec<ObjectId> = Vec::with_capacity(self.images.len());
        for image in &self.images {
            let smask_id = image.to_smask_stream().map(|s| doc.add_object(s));
            image_ids.push(doc.add_object(image.to_pdf_stream(smask_id)));
        }

        let mut kids = Vec::with_capacity(self.pages.len());
        for state in &self.pages {
            let mut resources = Dictionary::new();

            if !state.fonts.is_empty() {
                let mut fonts = Dictionary::new();
                for font in &state.fonts {
                    fonts.set(font.resource_name(), Object::Reference(font_ids[font]));
                }
                resources.set("Font", Object::Dictionary(fonts));
            }

            if !state.images.is_empty() {
                let mut xobjects = Dictionary::new();
                for &index in &state.images {
                    xobjects.set(
                        image_resource_name(index),
                        Object::Reference(image_ids[index]),
                    );
                }
                resources.set("XObject", Object::Dictionary(xobjects));
            }

            if !state.alphas.is_empty() {
                let mut gstates = Dictionary::new();
                for &permille in &state.alphas {
                    let alpha = permille as f32 / 1000.0;
                    let mut gs = Dictionary::new();
                    gs.set("Type", Object::Name(b"ExtGState".to_vec()));
                    gs.set("ca", Object::Real(alpha));
                    gs.set("CA", Object::Real(alpha));
                    gstates.set(format!("GS{permille}"), Object::Dictionary(gs));
                }
                resources.set("ExtGState", Object::Dictionary(gstates));
            }

            let contents_id = doc.add_object(compressed_stream(&state.content)?);

            let mut page_dict = Dictionary::new();
            page_dict.set("Type", Object::Name(b"Page".to_vec()));
            page_dict.set("Parent", Object::Reference(pages_id));
            page_dict.set(
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(state.width as f32),
                    Object::Real(state.height as f32),
                ]),
            );
            page_dict.set("Resources", Object::Dictionary(resources));
            page_dict.set("Contents", Object::Reference(contents_id));
            kids.push(Object::Reference(doc.add_object(page_dict)));
        }

        let mut pages_dict = Dictionary::new();
        pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
        pages_dict.set("Count", self.pages.len() as i64);
        pages_dict.set("Kids", Object::Array(kids));
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", Object::Reference(catalog_id));

        if let Some(title) = &self.title {
            let mut info = Dictionary::new();
            info.set(
                "Title",
                Object::String(title.as_bytes().to_vec(), StringFormat::Literal),
            );
            let info_id = doc.add_object(info);
            doc.trailer.set("Info", Object::Reference(info_id));
        }

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;

        debug!(
            pages = self.pages.len(),
            images = self.images.len(),
            bytes = buffer.len(),
            "serialized document"
        );
        Ok(buffer)
    }
}

fn image_resource_name(index: usize) -> String {
    format!("Im{}", index + 1)
}

/// Build a FlateDecode content stream
fn compressed_stream(content: &[u8]) -> Result<Stream> {
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(content)?;
    let data = encoder.finish()?;

    let mut dict = Dictionary::new();
    dict.set("Filter", Object::Name(b"FlateDecode".to_vec()));
    dict.set("Length", data.len() as i64);
    Ok(Stream::new(dict, data).with_compression(false))
}
