//! Voucher rendering
//!
//! Each room gets one A4 page. Fixed sections are drawn top-down from the
//! top margin; the terms block is fitted into whatever is left above the
//! footer band and placed according to the configured overflow policy.

use crate::config::{SealStyle, VoucherConfig};
use crate::extract::request_from_extraction;
use crate::sections::{room_sections, Row, Section, ValueStyle};
use crate::warnings::{record, ImageSlot, Warning};
use crate::{Result, VoucherRequest};
use chrono::NaiveDate;
use layout::{
    Cell, FitResult, FitterConfig, Padding, PageGeometry, PaginatedDocumentFitter, TableLayout,
};
use pdf_core::{Align, Color, ImageScaleMode, LineStyle, PaintMode, PdfDocument, StandardFont};
use tracing::{debug, instrument};

const REGULAR: StandardFont = StandardFont::Helvetica;
const BOLD: StandardFont = StandardFont::HelveticaBold;

/// Default leading for single-style table text
const LEADING_RATIO: f64 = 1.2;

// header
const WATERMARK_ALPHA: f64 = 0.04;
const WATERMARK_SIZE: (f64, f64) = (400.0, 150.0);
const LOGO_SIZE: (f64, f64) = (190.0, 55.0);
const COMPANY_NAME_SIZE: f64 = 20.0;
const HEADER_DROP: f64 = 85.0;
const TITLE_SIZE: f64 = 22.0;
const TITLE_DROP: f64 = 25.0;

// image row
const IMAGE_HEIGHT: f64 = 70.0;
const IMAGE_GAP: f64 = 8.0;
const IMAGE_ROW_DROP: f64 = 12.0;

// boxed sections
const KEY_COLUMN: f64 = 155.0;
const SECTION_TITLE_SIZE: f64 = 12.0;
const ROW_SIZE: f64 = 9.5;
const ADDRESS_LEADING: f64 = 11.0;
const SECTION_GAP: f64 = 8.0;

// policy table
const POLICY_GAP: f64 = 14.0;
const POLICY_TITLE_SIZE: f64 = 10.5;
const POLICY_TITLE_DROP: f64 = 10.0;
const POLICY_KEY_COLUMN: f64 = 170.0;
const POLICY_HEADER_SIZE: f64 = 8.4;
const POLICY_ROW_SIZE: f64 = 7.2;
const POLICY_DROP: f64 = 10.0;

// terms
const TERMS_TITLE_SIZE: f64 = 10.0;
const TERMS_TITLE_DROP: f64 = 8.0;

// footer
const SEAL_SIZE: f64 = 80.0;
const SEAL_INSET_X: f64 = 130.0;
const SEAL_Y: f64 = 45.0;
const ISSUER_SIZE: f64 = 8.0;
const ISSUER_LEADING: f64 = 12.0;
const ISSUER_BASELINE: f64 = 25.0;

fn light_grey() -> Color {
    Color::rgb(0.827, 0.827, 0.827)
}

fn separator_grey() -> Color {
    Color::rgb(0.82, 0.82, 0.82)
}

fn address_grey() -> Color {
    Color::rgb(0.15, 0.15, 0.15)
}

/// Image bytes supplied with a request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoucherImages {
    pub exterior: Option<Vec<u8>>,
    pub lobby: Option<Vec<u8>>,
    pub room: Option<Vec<u8>>,
    pub logo: Option<Vec<u8>>,
}

impl VoucherImages {
    pub fn get(&self, slot: ImageSlot) -> Option<&[u8]> {
        match slot {
            ImageSlot::Exterior => self.exterior.as_deref(),
            ImageSlot::Lobby => self.lobby.as_deref(),
            ImageSlot::Room => self.room.as_deref(),
            ImageSlot::Logo => self.logo.as_deref(),
        }
    }

    pub fn set(&mut self, slot: ImageSlot, data: Option<Vec<u8>>) {
        match slot {
            ImageSlot::Exterior => self.exterior = data,
            ImageSlot::Lobby => self.lobby = data,
            ImageSlot::Room => self.room = data,
            ImageSlot::Logo => self.logo = data,
        }
    }
}

/// A rendered voucher document
#[derive(Debug, Clone)]
pub struct VoucherOutput {
    pub pdf: Vec<u8>,
    pub pages: usize,
    pub warnings: Vec<Warning>,
}

/// Images that decoded successfully
struct UsableImages<'a> {
    logo: Option<&'a [u8]>,
    row: [Option<&'a [u8]>; 3],
}

impl UsableImages<'_> {
    fn row_is_empty(&self) -> bool {
        self.row.iter().all(Option::is_none)
    }
}

/// Renders voucher requests with one configuration
pub struct VoucherRenderer<'a> {
    config: &'a VoucherConfig,
    images: &'a VoucherImages,
    today: Option<NaiveDate>,
}

impl<'a> VoucherRenderer<'a> {
    pub fn new(config: &'a VoucherConfig, images: &'a VoucherImages) -> Self {
        Self {
            config,
            images,
            today: None,
        }
    }

    /// Use a fixed date for booking dates and extraction fallbacks
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// The fixed date, or the local clock when none was given
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// Render raw LLM extraction output
    pub fn render_extraction(&self, raw: &str) -> Result<VoucherOutput> {
        let (request, mut warnings) = request_from_extraction(raw, self.today());
        let mut output = self.render(&request)?;
        warnings.append(&mut output.warnings);
        output.warnings = warnings;
        Ok(output)
    }

    /// Render one page per room, plus continuation pages when needed
    #[instrument(skip_all, fields(hotel = %request.hotel.name, rooms = request.rooms.len()))]
    pub fn render(&self, request: &VoucherRequest) -> Result<VoucherOutput> {
        let geometry = self.config.page.geometry()?;
        let ladder = self.config.terms.ladder()?;
        let terms = &self.config.terms;
        let fitter = PaginatedDocumentFitter::new(REGULAR, ladder).with_config(FitterConfig {
            paragraph_padding: 2.0 * terms.padding_y,
            border_padding: 0.0,
            horizontal_padding: terms.padding_x,
        });

        let mut warnings = Vec::new();
        let mut request = request.clone();
        if request.ensure_room() {
            record(&mut warnings, Warning::NoRooms);
        }
        if request.fix_date_order() {
            record(&mut warnings, Warning::DatesSwapped);
        }
        let booking_date = request.booking_date.unwrap_or_else(|| self.today());

        let mut doc = PdfDocument::new();
        doc.set_title(&format!("{} - {}", self.config.brand.title, request.hotel.name));
        let images = self.usable_images(&mut doc, &mut warnings);

        for (index, room) in request.rooms.iter().enumerate() {
            let page = doc.add_page();
            debug!(page, room = index + 1, "room page allocated");

            let mut y = self.draw_header(&mut doc, page, &geometry, &images)?;
            y = self.draw_image_row(&mut doc, page, &geometry, &images, y)?;

            let sections =
                room_sections(&request, index, booking_date, &self.config.check_in_policy);
            for section in &sections {
                y = match section {
                    Section::Boxed { title, rows } => {
                        self.draw_boxed_section(&mut doc, page, &geometry, title, rows, y)?
                    }
                    Section::PolicyTable {
                        title,
                        header,
                        rows,
                    } => {
                        self.draw_policy_table(&mut doc, page, &geometry, title, header, rows, y)?
                    }
                };
            }
            self.draw_footer(&mut doc, page, &geometry)?;

            let lines = terms.lines_for(&room.lead_guest());
            let placement = fitter.place(
                y - TERMS_TITLE_DROP,
                geometry.footer_top(),
                geometry.content_top() - TERMS_TITLE_DROP,
                &lines,
                geometry.content_width(),
                terms.overflow.into(),
            );

            let (terms_page, title_y) = if placement.new_page {
                let next = doc.add_page();
                self.draw_footer(&mut doc, next, &geometry)?;
                record(&mut warnings, Warning::ContinuationPage { page: next });
                (next, geometry.content_top())
            } else {
                (page, y)
            };

            self.draw_heading(
                &mut doc,
                terms_page,
                geometry.margin_left,
                title_y,
                &terms.title,
                TERMS_TITLE_SIZE,
            )?;
            self.draw_terms(&mut doc, terms_page, &geometry, &placement.fit, placement.y_top)?;
            if placement.overlaps_footer {
                record(&mut warnings, Warning::FooterOverlap { page: terms_page });
            }
        }

        let pdf = doc.to_bytes()?;
        debug!(pages = doc.page_count(), bytes = pdf.len(), "voucher rendered");
        Ok(VoucherOutput {
            pdf,
            pages: doc.page_count(),
            warnings,
        })
    }

    /// Decode every supplied image once and keep the ones that work
    fn usable_images(
        &self,
        doc: &mut PdfDocument,
        warnings: &mut Vec<Warning>,
    ) -> UsableImages<'a> {
        let mut check = |slot: ImageSlot| -> Option<&'a [u8]> {
            let data = self.images.get(slot)?;
            match doc.image_size(data) {
                Ok(_) => Some(data),
                Err(e) => {
                    record(
                        warnings,
                        Warning::ImageSkipped {
                            slot,
                            reason: e.to_string(),
                        },
                    );
                    None
                }
            }
        };

        let row = ImageSlot::ROW.map(&mut check);
        let logo = check(ImageSlot::Logo);
        if logo.is_none() {
            record(warnings, Warning::LogoMissing);
        }
        UsableImages { logo, row }
    }

    fn draw_heading(
        &self,
        doc: &mut PdfDocument,
        page: usize,
        x: f64,
        y: f64,
        text: &str,
        size: f64,
    ) -> Result<()> {
        doc.set_font(BOLD, size);
        doc.set_text_color(self.config.brand.primary.into());
        doc.insert_text(text, page, x, y, Align::Left)?;
        Ok(())
    }

    /// Watermark, logo (or company name) and title; returns the cursor
    fn draw_header(
        &self,
        doc: &mut PdfDocument,
        page: usize,
        geometry: &PageGeometry,
        images: &UsableImages<'_>,
    ) -> Result<f64> {
        let brand = &self.config.brand;
        let cx = geometry.center_x();
        let mut y = geometry.content_top();

        match images.logo {
            Some(logo) => {
                let (w, h) = WATERMARK_SIZE;
                doc.begin_alpha(page, WATERMARK_ALPHA)?;
                doc.insert_image_scaled(
                    logo,
                    page,
                    cx - w / 2.0,
                    geometry.height / 2.0 - h / 2.0,
                    w,
                    h,
                    ImageScaleMode::FitBox,
                )?;
                doc.end_alpha(page)?;

                let (w, h) = LOGO_SIZE;
                doc.insert_image_scaled(
                    logo,
                    page,
                    cx - w / 2.0,
                    y - h,
                    w,
                    h,
                    ImageScaleMode::FitBox,
                )?;
            }
            None => {
                doc.set_font(BOLD, COMPANY_NAME_SIZE);
                doc.set_text_color(brand.primary.into());
                doc.insert_text(&brand.company_name, page, cx, y - 35.0, Align::Center)?;
            }
        }
        y -= HEADER_DROP;

        doc.set_font(BOLD, TITLE_SIZE);
        doc.set_text_color(brand.primary.into());
        doc.insert_text(&brand.title, page, cx, y, Align::Center)?;
        Ok(y - TITLE_DROP)
    }

    /// Three equal photo slots; skipped entirely without any photo
    fn draw_image_row(
        &self,
        doc: &mut PdfDocument,
        page: usize,
        geometry: &PageGeometry,
        images: &UsableImages<'_>,
        y: f64,
    ) -> Result<f64> {
        if images.row_is_empty() {
            return Ok(y);
        }

        let width = (geometry.content_width() - 2.0 * IMAGE_GAP) / 3.0;
        for (i, data) in images.row.iter().enumerate() {
            if let Some(data) = data {
                let x = geometry.margin_left + i as f64 * (width + IMAGE_GAP);
                doc.insert_image_scaled(
                    data,
                    page,
                    x,
                    y - IMAGE_HEIGHT,
                    width,
                    IMAGE_HEIGHT,
                    ImageScaleMode::FitBox,
                )?;
            }
        }
        Ok(y - IMAGE_HEIGHT - IMAGE_ROW_DROP)
    }

    fn draw_boxed_section(
        &self,
        doc: &mut PdfDocument,
        page: usize,
        geometry: &PageGeometry,
        title: &str,
        rows: &[Row],
        y: f64,
    ) -> Result<f64> {
        let brand = &self.config.brand;
        let left = geometry.margin_left;
        let width = geometry.content_width();
        let padding = Padding::new(8.0, 8.0, 4.0, 1.0);

        let header_table = TableLayout::new(vec![width], padding);
        let header = header_table.measure_row(&[Cell::new(
            title,
            &BOLD,
            SECTION_TITLE_SIZE,
            SECTION_TITLE_SIZE * LEADING_RATIO,
        )]);

        let table = TableLayout::key_value(width, KEY_COLUMN, padding);
        let offsets = table.column_offsets();
        let row_leading = ROW_SIZE * LEADING_RATIO;
        let measured: Vec<_> = rows
            .iter()
            .map(|row| {
                let value = match row.style {
                    ValueStyle::Bold => Cell::new(&row.value, &BOLD, ROW_SIZE, row_leading),
                    ValueStyle::Plain => {
                        Cell::new(&row.value, &REGULAR, ROW_SIZE, ADDRESS_LEADING)
                    }
                };
                table.measure_row(&[Cell::new(&row.key, &BOLD, ROW_SIZE, row_leading), value])
            })
            .collect();
        let total = header.height + measured.iter().map(|r| r.height).sum::<f64>();

        let header_lines = header.lines.first().map(Vec::as_slice).unwrap_or(&[]);
        let title_style = TextStyle::new(
            BOLD,
            SECTION_TITLE_SIZE,
            SECTION_TITLE_SIZE * LEADING_RATIO,
            brand.primary.into(),
        );
        draw_lines(doc, page, left + padding.left, y - padding.top, header_lines, &title_style)?;
        doc.draw_line(
            page,
            left,
            y - header.height,
            left + width,
            y - header.height,
            &LineStyle::new(0.6, light_grey()),
        )?;

        let mut row_top = y - header.height;
        for (row, measured_row) in rows.iter().zip(&measured) {
            let key_style = TextStyle::new(BOLD, ROW_SIZE, row_leading, Color::black());
            let value_style = match row.style {
                ValueStyle::Bold => key_style,
                ValueStyle::Plain => {
                    TextStyle::new(REGULAR, ROW_SIZE, ADDRESS_LEADING, address_grey())
                }
            };
            for (col, style) in [key_style, value_style].iter().enumerate() {
                let lines = measured_row.lines.get(col).map(Vec::as_slice).unwrap_or(&[]);
                let x = left + offsets[col] + padding.left;
                draw_lines(doc, page, x, row_top - padding.top, lines, style)?;
            }
            row_top -= measured_row.height;
        }

        doc.draw_rect(
            page,
            left,
            y - total,
            width,
            total,
            &PaintMode::Stroke(LineStyle::new(1.0, brand.accent.into())),
        )?;
        Ok(y - total - SECTION_GAP)
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_policy_table(
        &self,
        doc: &mut PdfDocument,
        page: usize,
        geometry: &PageGeometry,
        title: &str,
        header: &[String; 2],
        rows: &[[String; 2]],
        y: f64,
    ) -> Result<f64> {
        let brand = &self.config.brand;
        let accent: Color = brand.accent.into();
        let left = geometry.margin_left;
        let width = geometry.content_width();

        let mut y = y - POLICY_GAP;
        self.draw_heading(doc, page, left, y, title, POLICY_TITLE_SIZE)?;
        y -= POLICY_TITLE_DROP;

        let padding = Padding::new(5.0, 5.0, 2.0, 2.0);
        let table = TableLayout::key_value(width, POLICY_KEY_COLUMN, padding);
        let offsets = table.column_offsets();
        let header_leading = POLICY_HEADER_SIZE * LEADING_RATIO;
        let row_leading = POLICY_ROW_SIZE * LEADING_RATIO;

        let header_row = table.measure_row(&[
            Cell::new(&header[0], &BOLD, POLICY_HEADER_SIZE, header_leading),
            Cell::new(&header[1], &BOLD, POLICY_HEADER_SIZE, header_leading),
        ]);
        let body: Vec<_> = rows
            .iter()
            .map(|[key, value]| {
                table.measure_row(&[
                    Cell::new(key, &BOLD, POLICY_ROW_SIZE, row_leading),
                    Cell::new(value, &REGULAR, POLICY_ROW_SIZE, row_leading),
                ])
            })
            .collect();
        let total = header_row.height + body.iter().map(|r| r.height).sum::<f64>();

        doc.draw_rect(
            page,
            left,
            y - header_row.height,
            width,
            header_row.height,
            &PaintMode::Fill(brand.primary.into()),
        )?;
        let header_style = TextStyle::new(BOLD, POLICY_HEADER_SIZE, header_leading, Color::white());
        for (col, lines) in header_row.lines.iter().enumerate() {
            let x = left + offsets[col] + padding.left;
            draw_lines(doc, page, x, y - padding.top, lines, &header_style)?;
        }

        let grid = LineStyle::new(0.5, accent);
        let styles = [
            TextStyle::new(BOLD, POLICY_ROW_SIZE, row_leading, Color::black()),
            TextStyle::new(REGULAR, POLICY_ROW_SIZE, row_leading, Color::black()),
        ];
        let mut row_top = y - header_row.height;
        for row in &body {
            doc.draw_line(page, left, row_top, left + width, row_top, &grid)?;
            for (col, lines) in row.lines.iter().enumerate() {
                let x = left + offsets[col] + padding.left;
                draw_lines(doc, page, x, row_top - padding.top, lines, &styles[col.min(1)])?;
            }
            row_top -= row.height;
        }

        let divider_x = left + POLICY_KEY_COLUMN;
        doc.draw_line(page, divider_x, y, divider_x, y - total, &grid)?;
        doc.draw_rect(
            page,
            left,
            y - total,
            width,
            total,
            &PaintMode::Stroke(LineStyle::new(1.0, accent)),
        )?;
        Ok(y - total - POLICY_DROP)
    }

    /// Draw a fitted terms block whose top edge is `y_top`
    fn draw_terms(
        &self,
        doc: &mut PdfDocument,
        page: usize,
        geometry: &PageGeometry,
        fit: &FitResult,
        y_top: f64,
    ) -> Result<()> {
        let terms = &self.config.terms;
        let left = geometry.margin_left;
        let width = geometry.content_width();
        let candidate = fit.candidate;
        let style = TextStyle::new(REGULAR, candidate.font_size, candidate.leading, Color::black());
        let separator = LineStyle::new(0.25, separator_grey());

        let mut row_top = y_top;
        for (i, lines) in fit.lines.iter().enumerate() {
            let x = left + terms.padding_x;
            draw_lines(doc, page, x, row_top - terms.padding_y, lines, &style)?;
            row_top -= lines.len() as f64 * candidate.leading + 2.0 * terms.padding_y;
            if i + 1 < fit.lines.len() {
                doc.draw_line(page, left, row_top, left + width, row_top, &separator)?;
            }
        }

        if fit.height > 0.0 {
            doc.draw_rect(
                page,
                left,
                y_top - fit.height,
                width,
                fit.height,
                &PaintMode::Stroke(LineStyle::new(1.0, self.config.brand.accent.into())),
            )?;
        }
        Ok(())
    }

    /// Accent rule across the page, issuer lines and the seal
    fn draw_footer(
        &self,
        doc: &mut PdfDocument,
        page: usize,
        geometry: &PageGeometry,
    ) -> Result<()> {
        let brand = &self.config.brand;
        let line_y = self.config.page.footer_line_y;
        doc.draw_line(
            page,
            0.0,
            line_y,
            geometry.width,
            line_y,
            &LineStyle::new(brand.footer_line_width, brand.accent.into()),
        )?;

        let mut issuer = vec![format!("Issued by: {}", brand.company_name)];
        if let Some(email) = &brand.email {
            issuer.push(format!("Email: {email}"));
        }
        let style = TextStyle::new(BOLD, ISSUER_SIZE, ISSUER_LEADING, brand.primary.into());
        let top = ISSUER_BASELINE + ISSUER_SIZE;
        draw_lines(doc, page, geometry.margin_left, top, &issuer, &style)?;

        draw_seal(doc, page, &brand.seal, geometry.width - SEAL_INSET_X, SEAL_Y, SEAL_SIZE)
    }
}

/// Font, size, leading and color for a run of lines
#[derive(Debug, Clone, Copy)]
struct TextStyle {
    font: StandardFont,
    size: f64,
    leading: f64,
    color: Color,
}

impl TextStyle {
    fn new(font: StandardFont, size: f64, leading: f64, color: Color) -> Self {
        Self {
            font,
            size,
            leading,
            color,
        }
    }
}

/// Draw lines top-down; the first baseline sits one font size below `top`
fn draw_lines(
    doc: &mut PdfDocument,
    page: usize,
    x: f64,
    top: f64,
    lines: &[String],
    style: &TextStyle,
) -> Result<()> {
    doc.set_font(style.font, style.size);
    doc.set_text_color(style.color);
    let mut baseline = top - style.size;
    for line in lines {
        doc.insert_text(line, page, x, baseline, Align::Left)?;
        baseline -= style.leading;
    }
    Ok(())
}

/// Double ring with centered lettering and optional arc text
fn draw_seal(
    doc: &mut PdfDocument,
    page: usize,
    seal: &SealStyle,
    x: f64,
    y: f64,
    size: f64,
) -> Result<()> {
    let color: Color = seal.color.into();
    let cx = x + size / 2.0;
    let cy = y + size / 2.0;
    let r_outer = size / 2.0;
    let r_inner = r_outer - 4.0;

    doc.begin_alpha(page, seal.ring_alpha)?;
    doc.draw_circle(
        page,
        cx,
        cy,
        r_outer,
        &PaintMode::Stroke(LineStyle::new(seal.outer_line_width, color)),
    )?;
    doc.draw_circle(
        page,
        cx,
        cy,
        r_inner,
        &PaintMode::Stroke(LineStyle::new(seal.inner_line_width, color)),
    )?;
    doc.end_alpha(page)?;

    doc.begin_alpha(page, seal.text_alpha)?;
    doc.set_text_color(color);
    doc.set_font(BOLD, 10.0);
    doc.insert_text(&seal.title, page, cx, cy + 4.0, Align::Center)?;
    doc.set_font(BOLD, 7.0);
    doc.insert_text(&seal.subtitle, page, cx, cy - seal.subtitle_offset, Align::Center)?;

    doc.set_font(BOLD, 6.0);
    let radius = r_inner - 4.0;
    if let Some(text) = &seal.arc_top {
        // clockwise from upper left, letters upright toward the center
        draw_arc_text(doc, page, (cx, cy), radius, text, 140.0, -10.0, -90.0)?;
    }
    if let Some(text) = &seal.arc_bottom {
        draw_arc_text(doc, page, (cx, cy), radius, text, 235.0, 12.0, 90.0)?;
    }
    doc.end_alpha(page)?;
    Ok(())
}

/// Place one character per angle step along a circle
#[allow(clippy::too_many_arguments)]
fn draw_arc_text(
    doc: &mut PdfDocument,
    page: usize,
    center: (f64, f64),
    radius: f64,
    text: &str,
    start_deg: f64,
    step_deg: f64,
    rotation_offset: f64,
) -> Result<()> {
    for (i, ch) in text.chars().enumerate() {
        let angle = start_deg + i as f64 * step_deg;
        let rad = angle.to_radians();
        let tx = center.0 + radius * rad.cos();
        let ty = center.1 + radius * rad.sin();
        doc.insert_text_rotated(&ch.to_string(), page, tx, ty, angle + rotation_offset)?;
    }
    Ok(())
}
