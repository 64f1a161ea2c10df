//! Image handling for PDF documents
//!
//! JPEG data is passed through with `DCTDecode`. PNG data is decoded and
//! re-compressed with `FlateDecode`; an alpha channel becomes a separate
//! soft mask so transparent logos stay transparent.

use crate::{PdfError, Result};
use image::{DynamicImage, ImageDecoder, ImageReader};
use lopdf::{Dictionary, Object, Stream};
use std::io::{Cursor, Write};

impl From<image::ImageError> for PdfError {
    fn from(err: image::ImageError) -> Self {
        PdfError::ImageError(err.to_string())
    }
}

/// Detected image format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

/// Image scaling mode for insert_image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageScaleMode {
    /// Stretch to exact dimensions
    #[default]
    Stretch,
    /// Fit within bounding box, preserving aspect ratio, centered in the box
    FitBox,
}

/// Calculate display dimensions based on scaling mode
///
/// Returns `(width, height)` in points.
pub fn calculate_scaled_dimensions(
    original_width: u32,
    original_height: u32,
    target_width: f64,
    target_height: f64,
    mode: ImageScaleMode,
) -> (f64, f64) {
    match mode {
        ImageScaleMode::Stretch => (target_width, target_height),
        ImageScaleMode::FitBox => {
            if original_width == 0 || original_height == 0 {
                return (0.0, 0.0);
            }
            let width_ratio = target_width / original_width as f64;
            let height_ratio = target_height / original_height as f64;
            let scale = width_ratio.min(height_ratio);
            (
                original_width as f64 * scale,
                original_height as f64 * scale,
            )
        }
    }
}

/// Detect image format from magic bytes
pub fn detect_format(data: &[u8]) -> Result<ImageFormat> {
    if data.len() < 8 {
        return Err(PdfError::ImageError("Image data too short".to_string()));
    }

    if data[0] == 0xFF && data[1] == 0xD8 && data[2] == 0xFF {
        return Ok(ImageFormat::Jpeg);
    }

    if data[0..8] == [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A] {
        return Ok(ImageFormat::Png);
    }

    Err(PdfError::ImageError("Unknown image format".to_string()))
}

/// JPEG frame header fields needed for embedding
#[derive(Debug, Clone, Copy)]
struct JpegInfo {
    width: u32,
    height: u32,
    num_components: u8,
}

/// Scan JPEG markers for the first start-of-frame segment
///
/// SOF layout: marker (2) + length (2) + precision (1) + height (2) +
/// width (2) + component count (1).
fn get_jpeg_info(data: &[u8]) -> Result<JpegInfo> {
    let mut i = 2;
    while i + 10 < data.len() {
        if data[i] != 0xFF {
            i += 1;
            continue;
        }

        let marker = data[i + 1];

        // SOF0..SOF15 except DHT (C4), JPG (C8) and DAC (CC)
        if (0xC0..=0xCF).contains(&marker) && marker != 0xC4 && marker != 0xC8 && marker != 0xCC {
            let height = u16::from_be_bytes([data[i + 5], data[i + 6]]) as u32;
            let width = u16::from_be_bytes([data[i + 7], data[i + 8]]) as u32;
            return Ok(JpegInfo {
                width,
                height,
                num_components: data[i + 9],
            });
        }

        let length = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        if length < 2 {
            break;
        }
        i += 2 + length;
    }

    Err(PdfError::ImageError("Could not parse JPEG info".to_string()))
}

fn zlib(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Image XObject for PDF embedding
#[derive(Debug, Clone)]
pub struct ImageXObject {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Color space ("DeviceRGB", "DeviceGray", "DeviceCMYK")
    pub color_space: &'static str,
    /// PDF filter ("DCTDecode" for JPEG, "FlateDecode" for PNG)
    pub filter: &'static str,
    /// Encoded image data
    pub data: Vec<u8>,
    /// Zlib-compressed 8-bit alpha channel, if the source had one
    pub alpha: Option<Vec<u8>>,
}

impl ImageXObject {
    /// Create an XObject from JPEG or PNG bytes
    pub fn decode(data: &[u8]) -> Result<Self> {
        match detect_format(data)? {
            ImageFormat::Jpeg => Self::from_jpeg(data),
            ImageFormat::Png => Self::from_png(data),
        }
    }

    /// Create XObject from JPEG data
    pub fn from_jpeg(data: &[u8]) -> Result<Self> {
        let info = get_jpeg_info(data)?;

        let color_space = match info.num_components {
            1 => "DeviceGray",
            4 => "DeviceCMYK",
            _ => "DeviceRGB",
        };

        Ok(Self {
            width: info.width,
            height: info.height,
            color_space,
            filter: "DCTDecode",
            data: data.to_vec(),
            alpha: None,
        })
    }

    /// Create XObject from PNG data
    pub fn from_png(data: &[u8]) -> Result<Self> {
        let reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
        let decoder = reader.into_decoder()?;
        let (width, height) = decoder.dimensions();
        let color_type = decoder.color_type();
        let image = DynamicImage::from_decoder(decoder)?;

        let (raw, color_space, alpha) = match color_type {
            image::ColorType::L8 | image::ColorType::L16 => {
                (image.to_luma8().into_raw(), "DeviceGray", None)
            }
            image::ColorType::La8 | image::ColorType::La16 => {
                let la = image.to_luma_alpha8();
                let mut gray = Vec::with_capacity((width * height) as usize);
                let mut alpha = Vec::with_capacity((width * height) as usize);
                for pixel in la.pixels() {
                    gray.push(pixel[0]);
                    alpha.push(pixel[1]);
                }
                (gray, "DeviceGray", Some(alpha))
            }
            image::ColorType::Rgba8 | image::ColorType::Rgba16 => {
                let rgba = image.to_rgba8();
                let mut rgb = Vec::with_capacity((width * height * 3) as usize);
                let mut alpha = Vec::with_capacity((width * height) as usize);
                for pixel in rgba.pixels() {
                    rgb.extend_from_slice(&pixel.0[..3]);
                    alpha.push(pixel[3]);
                }
                (rgb, "DeviceRGB", Some(alpha))
            }
            _ => (image.to_rgb8().into_raw(), "DeviceRGB", None),
        };

        // fully opaque masks are dropped
        let alpha = match alpha {
            Some(a) if a.iter().any(|&v| v != 255) => Some(zlib(&a)?),
            _ => None,
        };

        Ok(Self {
            width,
            height,
            color_space,
            filter: "FlateDecode",
            data: zlib(&raw)?,
            alpha,
        })
    }

    fn base_dict(&self, color_space: &str, filter: &str, len: usize) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.set("Type", Object::Name(b"XObject".to_vec()));
        dict.set("Subtype", Object::Name(b"Image".to_vec()));
        dict.set("Width", self.width as i64);
        dict.set("Height", self.height as i64);
        dict.set("ColorSpace", Object::Name(color_space.as_bytes().to_vec()));
        dict.set("BitsPerComponent", 8i64);
        dict.set("Filter", Object::Name(filter.as_bytes().to_vec()));
        dict.set("Length", len as i64);
        dict
    }

    /// Convert to lopdf Stream object
    ///
    /// `smask` is the object id of the soft mask stream, when one was added.
    pub fn to_pdf_stream(&self, smask: Option<lopdf::ObjectId>) -> Stream {
        let mut dict = self.base_dict(self.color_space, self.filter, self.data.len());
        if let Some(id) = smask {
            dict.set("SMask", Object::Reference(id));
        }
        Stream::new(dict, self.data.clone())
    }

    /// Soft mask stream for the alpha channel, if any
    pub fn to_smask_stream(&self) -> Option<Stream> {
        self.alpha.as_ref().map(|alpha| {
            let dict = self.base_dict("DeviceGray", "FlateDecode", alpha.len());
            Stream::new(dict, alpha.clone())
        })
    }
}

/// Generate operators to draw image at position
///
/// `(x, y)` is the lower-left corner in PDF coordinates.
pub fn generate_image_operators(
    image_name: &str,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> Vec<u8> {
    format!("q\n{width} 0 0 {height} {x} {y} cm\n/{image_name} Do\nQ\n").into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_png(img: DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_detect_jpeg() {
        let jpeg_header = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];
        assert_eq!(detect_format(&jpeg_header).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_detect_png() {
        let png_header = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(detect_format(&png_header).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_detect_unknown_and_short() {
        assert!(detect_format(&[0u8; 8]).is_err());
        assert!(detect_format(&[0xFF, 0xD8]).is_err());
    }

    #[test]
    fn test_jpeg_info_from_sof0() {
        let jpeg = vec![
            0xFF, 0xD8, // SOI
            0xFF, 0xC0, // SOF0
            0x00, 0x11, // Length
            0x08, // Precision
            0x00, 0x64, // Height (100)
            0x00, 0xC8, // Width (200)
            0x03, // Components
            0x01, 0x22, 0x00, 0x02, 0x11, 0x01, 0x03, 0x11, 0x01, 0xFF, 0xD9,
        ];

        let xobject = ImageXObject::decode(&jpeg).unwrap();
        assert_eq!(xobject.width, 200);
        assert_eq!(xobject.height, 100);
        assert_eq!(xobject.color_space, "DeviceRGB");
        assert_eq!(xobject.filter, "DCTDecode");
        assert!(xobject.alpha.is_none());
    }

    #[test]
    fn test_jpeg_info_invalid() {
        let data = vec![0xFF, 0xD8, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x00];
        assert!(get_jpeg_info(&data).is_err());
    }

    #[test]
    fn test_png_rgb_has_no_mask() {
        let png = encode_png(DynamicImage::new_rgb8(4, 3));
        let xobject = ImageXObject::decode(&png).unwrap();
        assert_eq!((xobject.width, xobject.height), (4, 3));
        assert_eq!(xobject.color_space, "DeviceRGB");
        assert!(xobject.to_smask_stream().is_none());
    }

    #[test]
    fn test_png_transparent_gets_soft_mask() {
        // new_rgba8 is fully transparent black
        let png = encode_png(DynamicImage::new_rgba8(2, 2));
        let xobject = ImageXObject::decode(&png).unwrap();
        let smask = xobject.to_smask_stream().unwrap();
        assert_eq!(
            smask.dict.get(b"ColorSpace").unwrap().as_name().unwrap(),
            b"DeviceGray"
        );
    }

    #[test]
    fn test_to_pdf_stream_links_smask() {
        let xobject = ImageXObject {
            width: 100,
            height: 50,
            color_space: "DeviceRGB",
            filter: "DCTDecode",
            data: vec![1, 2, 3, 4, 5],
            alpha: None,
        };

        let stream = xobject.to_pdf_stream(Some((7, 0)));
        let dict = &stream.dict;
        assert_eq!(dict.get(b"Subtype").unwrap().as_name().unwrap(), b"Image");
        assert_eq!(dict.get(b"Width").unwrap().as_i64().unwrap(), 100);
        assert_eq!(dict.get(b"SMask").unwrap().as_reference().unwrap(), (7, 0));
        assert_eq!(stream.content, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_generate_image_operators() {
        let ops = generate_image_operators("Im1", 100.0, 200.0, 50.0, 75.0);
        let ops_str = String::from_utf8(ops).unwrap();
        assert!(ops_str.contains("50 0 0 75 100 200 cm"));
        assert!(ops_str.contains("/Im1 Do"));
    }

    #[test]
    fn test_fit_box_width_limited() {
        let (w, h) = calculate_scaled_dimensions(800, 600, 100.0, 200.0, ImageScaleMode::FitBox);
        assert_eq!((w, h), (100.0, 75.0));
    }

    #[test]
    fn test_fit_box_height_limited() {
        let (w, h) = calculate_scaled_dimensions(600, 800, 200.0, 100.0, ImageScaleMode::FitBox);
        assert_eq!((w, h), (75.0, 100.0));
    }

    #[test]
    fn test_fit_box_degenerate_source() {
        let (w, h) = calculate_scaled_dimensions(0, 800, 200.0, 100.0, ImageScaleMode::FitBox);
        assert_eq!((w, h), (0.0, 0.0));
    }

    #[test]
    fn test_stretch() {
        let (w, h) = calculate_scaled_dimensions(800, 600, 10.0, 20.0, ImageScaleMode::Stretch);
        assert_eq!((w, h), (10.0, 20.0));
    }
}
