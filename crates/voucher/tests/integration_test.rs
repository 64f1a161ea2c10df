//! Integration tests for voucher rendering
//!
//! Documents are rendered end to end and parsed back with lopdf.

use chrono::NaiveDate;
use pdf_core::encode_win_ansi_hex;
use pretty_assertions::assert_eq;
use std::io::Cursor;
use voucher::config::OverflowMode;
use voucher::{
    parse_config, CancellationPolicy, GuestRoom, HotelInfo, ImageSlot, VoucherConfig,
    VoucherImages, VoucherRenderer, VoucherRequest, Warning,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()
}

fn create_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 120, 40]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Jpeg)
        .unwrap();
    bytes
}

fn create_test_png() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(8, 4, image::Rgba([13, 38, 89, 255]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

fn sample_request() -> VoucherRequest {
    VoucherRequest {
        hotel: HotelInfo {
            name: "Grand Palace Hotel".into(),
            city: Some("Bangkok".into()),
            address_line1: "1 Main Road".into(),
            address_line2: "Bangkok 10110".into(),
            phone: "+66 2 000 0000".into(),
            ..HotelInfo::default()
        },
        check_in: NaiveDate::from_ymd_opt(2025, 9, 28).unwrap(),
        check_out: NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
        room_type: "Deluxe King".into(),
        meal_plan: "Breakfast Only".into(),
        room_size: None,
        cancellation: CancellationPolicy::NonRefundable,
        rooms: vec![
            GuestRoom {
                guest_name: "JOHN SMITH".into(),
                confirmation_no: "ABC123".into(),
                adults: 2,
            },
            GuestRoom {
                guest_name: "JANE SMITH".into(),
                confirmation_no: "XYZ789".into(),
                adults: 1,
            },
        ],
        same_confirmation: false,
        booking_date: None,
    }
}

/// Default config with a terms block short enough to always fit
fn short_terms_config() -> VoucherConfig {
    let mut config = VoucherConfig::default();
    config.terms.lines = vec![
        "1. Voucher Validity: Must be presented at hotel front desk.".into(),
        "2. Identification: Guest(s) {lead_guest} must present valid ID.".into(),
    ];
    config
}

/// Terms far taller than the space left under the fixed sections
fn long_terms_config(overflow: OverflowMode) -> VoucherConfig {
    let mut config = VoucherConfig::default();
    config.terms.lines = (1..=40)
        .map(|i| format!("{i}. Additional condition that applies to this stay."))
        .collect();
    config.terms.overflow = overflow;
    config
}

fn page_contents(pdf: &[u8]) -> Vec<String> {
    let doc = lopdf::Document::load_mem(pdf).unwrap();
    doc.get_pages()
        .values()
        .map(|id| String::from_utf8_lossy(&doc.get_page_content(*id).unwrap()).to_string())
        .collect()
}

#[test]
fn test_one_page_per_room() {
    let config = short_terms_config();
    let images = VoucherImages::default();
    let output = VoucherRenderer::new(&config, &images)
        .with_today(today())
        .render(&sample_request())
        .unwrap();

    assert!(output.pdf.starts_with(b"%PDF"));
    assert_eq!(output.pages, 2);
    assert_eq!(page_contents(&output.pdf).len(), 2);
    assert_eq!(output.warnings, vec![Warning::LogoMissing]);
}

#[test]
fn test_room_details_on_their_own_page() {
    let config = short_terms_config();
    let images = VoucherImages::default();
    let output = VoucherRenderer::new(&config, &images)
        .with_today(today())
        .render(&sample_request())
        .unwrap();

    let pages = page_contents(&output.pdf);
    assert!(pages[0].contains(&encode_win_ansi_hex("JOHN SMITH")));
    assert!(pages[0].contains(&encode_win_ansi_hex("ABC123")));
    assert!(pages[1].contains(&encode_win_ansi_hex("JANE SMITH")));
    assert!(pages[1].contains(&encode_win_ansi_hex("XYZ789")));
    assert!(!pages[1].contains(&encode_win_ansi_hex("ABC123")));

    // booking date falls back to the renderer's today
    assert!(pages[0].contains(&encode_win_ansi_hex("01 Aug 2025")));
    // lead guest is substituted into the terms
    assert!(pages[1].contains(&encode_win_ansi_hex(
        "2. Identification: Guest(s) JANE SMITH must present valid ID."
    )));
}

#[test]
fn test_same_confirmation_repeats_first_room() {
    let config = short_terms_config();
    let images = VoucherImages::default();
    let mut request = sample_request();
    request.same_confirmation = true;

    let output = VoucherRenderer::new(&config, &images)
        .with_today(today())
        .render(&request)
        .unwrap();

    let pages = page_contents(&output.pdf);
    assert!(pages[1].contains(&encode_win_ansi_hex("ABC123")));
    assert!(!pages[1].contains(&encode_win_ansi_hex("XYZ789")));
}

#[test]
fn test_long_terms_move_to_continuation_page() {
    let config = long_terms_config(OverflowMode::NewPage);
    let images = VoucherImages::default();
    let mut request = sample_request();
    request.rooms.truncate(1);

    let output = VoucherRenderer::new(&config, &images)
        .with_today(today())
        .render(&request)
        .unwrap();

    assert_eq!(output.pages, 2);
    assert!(output
        .warnings
        .contains(&Warning::ContinuationPage { page: 2 }));
    assert!(!output
        .warnings
        .iter()
        .any(|w| matches!(w, Warning::FooterOverlap { .. })));

    let pages = page_contents(&output.pdf);
    let title = encode_win_ansi_hex(&config.terms.title);
    assert!(!pages[0].contains(&title));
    assert!(pages[1].contains(&title));
    assert!(pages[1].contains(&encode_win_ansi_hex(
        "40. Additional condition that applies to this stay."
    )));
}

#[test]
fn test_continuation_pages_follow_their_room() {
    let config = long_terms_config(OverflowMode::NewPage);
    let images = VoucherImages::default();
    let output = VoucherRenderer::new(&config, &images)
        .with_today(today())
        .render(&sample_request())
        .unwrap();

    assert_eq!(output.pages, 4);
    let pages = page_contents(&output.pdf);
    assert!(pages[2].contains(&encode_win_ansi_hex("JANE SMITH")));
    assert!(output
        .warnings
        .contains(&Warning::ContinuationPage { page: 4 }));
}

#[test]
fn test_clamp_reports_footer_overlap() {
    let config = long_terms_config(OverflowMode::Clamp);
    let images = VoucherImages::default();
    let mut request = sample_request();
    request.rooms.truncate(1);

    let output = VoucherRenderer::new(&config, &images)
        .with_today(today())
        .render(&request)
        .unwrap();

    assert_eq!(output.pages, 1);
    assert!(output
        .warnings
        .contains(&Warning::FooterOverlap { page: 1 }));
    assert!(!output
        .warnings
        .iter()
        .any(|w| matches!(w, Warning::ContinuationPage { .. })));
}

#[test]
fn test_default_voucher_with_images_fits_one_page() {
    let config = VoucherConfig::default();
    let mut images = VoucherImages::default();
    images.set(ImageSlot::Exterior, Some(create_test_jpeg(64, 48)));
    images.set(ImageSlot::Logo, Some(create_test_png()));

    let mut request = sample_request();
    request.rooms.truncate(1);
    let output = VoucherRenderer::new(&config, &images)
        .with_today(today())
        .render(&request)
        .unwrap();

    assert_eq!(output.pages, 1);
    assert_eq!(page_contents(&output.pdf).len(), 1);
    assert!(!output
        .warnings
        .iter()
        .any(|w| matches!(w, Warning::ContinuationPage { .. })));

    let first = &page_contents(&output.pdf)[0];
    assert!(first.contains(&encode_win_ansi_hex(&config.terms.title)));
    assert!(first.contains(&encode_win_ansi_hex("10. Bedding: Subject to availability.")));
}

#[test]
fn test_footer_names_the_issuer() {
    let config = short_terms_config();
    let images = VoucherImages::default();
    let output = VoucherRenderer::new(&config, &images)
        .with_today(today())
        .render(&sample_request())
        .unwrap();

    for page in page_contents(&output.pdf) {
        assert!(page.contains(&encode_win_ansi_hex("Issued by: Odaduu Travel DMC")));
        assert!(page.contains("40 25 Td"));
        // no email configured, so no second line
        assert!(!page.contains("40 13 Td"));
    }
}

#[test]
fn test_footer_prints_brand_email() {
    let config = parse_config(
        r#"{ "brand": { "companyName": "Acme Travel", "email": "desk@acme.example" } }"#,
    )
    .unwrap();
    let images = VoucherImages::default();
    let mut request = sample_request();
    request.rooms.truncate(1);

    let output = VoucherRenderer::new(&config, &images)
        .with_today(today())
        .render(&request)
        .unwrap();

    let first = &page_contents(&output.pdf)[0];
    assert!(first.contains(&encode_win_ansi_hex("Issued by: Acme Travel")));
    assert!(first.contains(&encode_win_ansi_hex("Email: desk@acme.example")));
    assert!(first.contains("40 25 Td"));
    assert!(first.contains("40 13 Td"));
}

#[test]
fn test_missing_logo_prints_company_name() {
    let config = short_terms_config();
    let images = VoucherImages::default();
    let output = VoucherRenderer::new(&config, &images)
        .with_today(today())
        .render(&sample_request())
        .unwrap();

    let pages = page_contents(&output.pdf);
    assert!(pages[0].contains(&encode_win_ansi_hex("Odaduu Travel DMC")));
    assert!(!pages[0].contains("/GS40 gs"));
}

#[test]
fn test_logo_draws_watermark() {
    let config = short_terms_config();
    let images = VoucherImages {
        logo: Some(create_test_png()),
        ..VoucherImages::default()
    };
    let output = VoucherRenderer::new(&config, &images)
        .with_today(today())
        .render(&sample_request())
        .unwrap();

    assert!(output.warnings.is_empty());
    let pages = page_contents(&output.pdf);
    assert!(pages[0].contains("/GS40 gs"));
    assert!(!pages[0].contains(&encode_win_ansi_hex("Odaduu Travel DMC")));
    // watermark plus logo
    assert_eq!(pages[0].matches(" Do").count(), 2);
}

#[test]
fn test_image_row() {
    let config = short_terms_config();
    let mut images = VoucherImages::default();
    images.set(ImageSlot::Exterior, Some(create_test_jpeg(64, 48)));
    images.set(ImageSlot::Room, Some(create_test_jpeg(32, 32)));

    let mut request = sample_request();
    request.rooms.truncate(1);
    let output = VoucherRenderer::new(&config, &images)
        .with_today(today())
        .render(&request)
        .unwrap();

    let pages = page_contents(&output.pdf);
    assert_eq!(pages[0].matches(" Do").count(), 2);
}

#[test]
fn test_undecodable_image_is_skipped() {
    let config = short_terms_config();
    let mut images = VoucherImages::default();
    images.set(ImageSlot::Exterior, Some(create_test_jpeg(64, 48)));
    images.set(ImageSlot::Lobby, Some(b"not an image".to_vec()));

    let mut request = sample_request();
    request.rooms.truncate(1);
    let output = VoucherRenderer::new(&config, &images)
        .with_today(today())
        .render(&request)
        .unwrap();

    assert_eq!(output.pages, 1);
    assert!(output.warnings.iter().any(|w| matches!(
        w,
        Warning::ImageSkipped {
            slot: ImageSlot::Lobby,
            ..
        }
    )));
    let pages = page_contents(&output.pdf);
    assert_eq!(pages[0].matches(" Do").count(), 1);
}

#[test]
fn test_fly_goldfinch_preset() {
    let config = parse_config(r#"{ "preset": "flyGoldfinch" }"#).unwrap();
    let images = VoucherImages::default();
    let mut request = sample_request();
    request.rooms.truncate(1);

    let output = VoucherRenderer::new(&config, &images)
        .with_today(today())
        .render(&request)
        .unwrap();

    let first = &page_contents(&output.pdf)[0];
    assert!(first.contains(&encode_win_ansi_hex("FLY GOLDFINCH")));
    assert!(first.contains(&encode_win_ansi_hex("GOLDFINCH")));
    // this seal has no arc lettering
    assert_eq!(first.matches(" Tm").count(), 0);
}

#[test]
fn test_odaduu_seal_has_arc_text() {
    let config = short_terms_config();
    let images = VoucherImages::default();
    let mut request = sample_request();
    request.rooms.truncate(1);

    let output = VoucherRenderer::new(&config, &images)
        .with_today(today())
        .render(&request)
        .unwrap();

    let first = &page_contents(&output.pdf)[0];
    let arc_chars = "CERTIFIED VOUCHER".len() + "OFFICIAL".len();
    assert_eq!(first.matches(" Tm").count(), arc_chars);
}

#[test]
fn test_swapped_dates_are_reported() {
    let config = short_terms_config();
    let images = VoucherImages::default();
    let mut request = sample_request();
    std::mem::swap(&mut request.check_in, &mut request.check_out);

    let output = VoucherRenderer::new(&config, &images)
        .with_today(today())
        .render(&request)
        .unwrap();

    assert!(output.warnings.contains(&Warning::DatesSwapped));
    let first = &page_contents(&output.pdf)[0];
    assert!(first.contains(&encode_win_ansi_hex("28 Sep 2025")));
}

#[test]
fn test_request_without_rooms_renders_blank_room() {
    let config = short_terms_config();
    let images = VoucherImages::default();
    let mut request = sample_request();
    request.rooms.clear();

    let output = VoucherRenderer::new(&config, &images)
        .with_today(today())
        .render(&request)
        .unwrap();

    assert_eq!(output.pages, 1);
    assert_eq!(output.warnings, vec![Warning::NoRooms, Warning::LogoMissing]);
    let first = &page_contents(&output.pdf)[0];
    assert!(first.contains(&encode_win_ansi_hex("Grand Palace Hotel")));
    assert!(first.contains(&encode_win_ansi_hex(
        "2. Identification: Guest(s) Guest must present valid ID."
    )));
}

#[test]
fn test_render_extraction() {
    let raw = r#"```json
    {
        "hotel_name": "Grand Palace Hotel",
        "checkin_raw": "28 Sept 2025",
        "checkout_raw": "1 Oct 2025",
        "rooms": [
            {"guest_name": "JOHN SMITH", "confirmation_no": 884512, "room_type": "Deluxe King"}
        ]
    }
    ```"#;

    let config = short_terms_config();
    let images = VoucherImages::default();
    let output = VoucherRenderer::new(&config, &images)
        .with_today(today())
        .render_extraction(raw)
        .unwrap();

    assert_eq!(output.pages, 1);
    assert_eq!(output.warnings, vec![Warning::LogoMissing]);
    let first = &page_contents(&output.pdf)[0];
    assert!(first.contains(&encode_win_ansi_hex("884512")));
    assert!(first.contains(&encode_win_ansi_hex("28 Sep 2025")));
}

#[test]
fn test_unreadable_extraction_still_renders() {
    let config = short_terms_config();
    let images = VoucherImages::default();
    let output = VoucherRenderer::new(&config, &images)
        .with_today(today())
        .render_extraction("the model refused to answer")
        .unwrap();

    assert_eq!(output.pages, 1);
    assert!(matches!(
        output.warnings.first(),
        Some(Warning::ExtractionFailed { .. })
    ));
    assert!(output.warnings.contains(&Warning::LogoMissing));
}
