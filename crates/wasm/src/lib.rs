//! WASM bindings for the voucher generator
//!
//! # Example (JavaScript)
//!
//! ```javascript
//! import init, { VoucherGenerator } from 'voucher-wasm';
//!
//! await init();
//!
//! const generator = VoucherGenerator.fromConfig('{"preset": "flyGoldfinch"}');
//! generator.setImage('exterior', exteriorBytes);
//! generator.setLogo(logoBytes);
//!
//! const pdf = generator.render(requestJson);
//! console.log(JSON.parse(generator.warnings()));
//! ```

use chrono::NaiveDate;
use voucher::{
    ImageSlot, VoucherConfig, VoucherImages, VoucherOutput, VoucherRenderer, VoucherRequest,
    Warning,
};
use wasm_bindgen::prelude::*;

// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[cfg(target_arch = "wasm32")]
fn today() -> NaiveDate {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(
        now.get_full_year() as i32,
        now.get_month() + 1,
        now.get_date(),
    )
    .unwrap_or(NaiveDate::MIN)
}

#[cfg(not(target_arch = "wasm32"))]
fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(target_arch = "wasm32")]
fn log_warnings(warnings: &[Warning]) {
    for warning in warnings {
        web_sys::console::warn_1(&JsValue::from_str(&warning.to_string()));
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn log_warnings(_warnings: &[Warning]) {}

/// Voucher renderer holding a config and image bytes between renders
#[wasm_bindgen]
pub struct VoucherGenerator {
    config: VoucherConfig,
    images: VoucherImages,
    warnings: Vec<Warning>,
}

#[wasm_bindgen]
impl VoucherGenerator {
    /// Create a generator with the default brand and layout
    #[wasm_bindgen(constructor)]
    pub fn new() -> VoucherGenerator {
        VoucherGenerator {
            config: VoucherConfig::default(),
            images: VoucherImages::default(),
            warnings: Vec::new(),
        }
    }

    /// Create a generator from config JSON
    ///
    /// @param json - Config JSON string (may name a brand `preset`)
    /// @returns VoucherGenerator instance
    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(json: &str) -> Result<VoucherGenerator, JsValue> {
        let config = VoucherConfig::from_json(json).map_err(js_error)?;
        Ok(VoucherGenerator {
            config,
            ..VoucherGenerator::new()
        })
    }

    /// Set or replace a photo
    ///
    /// @param slot - "exterior", "lobby", "room" or "logo"
    /// @param data - JPEG or PNG bytes (Uint8Array)
    #[wasm_bindgen(js_name = setImage)]
    pub fn set_image(&mut self, slot: &str, data: &[u8]) -> Result<(), JsValue> {
        let slot: ImageSlot = slot.parse().map_err(js_error)?;
        self.images.set(slot, Some(data.to_vec()));
        Ok(())
    }

    /// Remove a previously set image
    #[wasm_bindgen(js_name = clearImage)]
    pub fn clear_image(&mut self, slot: &str) -> Result<(), JsValue> {
        let slot: ImageSlot = slot.parse().map_err(js_error)?;
        self.images.set(slot, None);
        Ok(())
    }

    /// Set the brand logo used for the header and watermark
    ///
    /// @param data - JPEG or PNG bytes (Uint8Array)
    #[wasm_bindgen(js_name = setLogo)]
    pub fn set_logo(&mut self, data: &[u8]) {
        self.images.set(ImageSlot::Logo, Some(data.to_vec()));
    }

    /// Render a booking request
    ///
    /// @param requestJson - Booking request JSON string
    /// @returns PDF bytes (Uint8Array)
    pub fn render(&mut self, request_json: &str) -> Result<Vec<u8>, JsValue> {
        let request: VoucherRequest = serde_json::from_str(request_json).map_err(js_error)?;
        self.render_request(&request)
    }

    /// Render a booking request given as a plain object
    ///
    /// @param request - Booking request object
    /// @returns PDF bytes (Uint8Array)
    #[wasm_bindgen(js_name = renderObject)]
    pub fn render_object(&mut self, request: JsValue) -> Result<Vec<u8>, JsValue> {
        let request: VoucherRequest = serde_wasm_bindgen::from_value(request)?;
        self.render_request(&request)
    }

    /// Render raw model output after normalizing it into a request
    ///
    /// @param raw - Model output, optionally wrapped in a code fence
    /// @returns PDF bytes (Uint8Array)
    #[wasm_bindgen(js_name = renderExtraction)]
    pub fn render_extraction(&mut self, raw: &str) -> Result<Vec<u8>, JsValue> {
        let output = self
            .renderer()
            .render_extraction(raw)
            .map_err(js_error)?;
        Ok(self.finish(output))
    }

    /// Warnings from the last render as a JSON array string
    pub fn warnings(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.warnings).map_err(js_error)
    }

    /// Warnings from the last render as plain objects
    #[wasm_bindgen(js_name = warningsObject)]
    pub fn warnings_object(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.warnings)?)
    }
}

impl VoucherGenerator {
    fn renderer(&self) -> VoucherRenderer<'_> {
        VoucherRenderer::new(&self.config, &self.images).with_today(today())
    }

    fn render_request(&mut self, request: &VoucherRequest) -> Result<Vec<u8>, JsValue> {
        let output = self.renderer().render(request).map_err(js_error)?;
        Ok(self.finish(output))
    }

    fn finish(&mut self, output: VoucherOutput) -> Vec<u8> {
        log_warnings(&output.warnings);
        self.warnings = output.warnings;
        output.pdf
    }
}

impl Default for VoucherGenerator {
    fn default() -> Self {
        Self::new()
    }
}
