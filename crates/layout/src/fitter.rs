//! Auto-shrink fitting of a paragraph block above the footer band
//!
//! The fitter walks a ladder of `(font_size, leading)` candidates from
//! largest to smallest and picks the first one whose wrapped height fits
//! the space left on the page. When nothing fits it hands back the
//! smallest candidate flagged as overflowed; what happens next is decided
//! by an [`OverflowPolicy`] in [`PaginatedDocumentFitter::place`].

use crate::{wrap_text, LayoutError, Result, TextMeasure};
use tracing::debug;

/// A font size and the baseline-to-baseline distance that goes with it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontCandidate {
    pub font_size: f64,
    pub leading: f64,
}

impl FontCandidate {
    /// Used when a ladder is empty or entirely invalid
    pub const FALLBACK: FontCandidate = FontCandidate::new(7.0, 8.6);

    pub const fn new(font_size: f64, leading: f64) -> Self {
        Self { font_size, leading }
    }

    /// Six sizes from 7.0 down to 5.7
    pub fn standard_ladder() -> Vec<Self> {
        [
            (7.0, 8.6),
            (6.7, 8.2),
            (6.4, 7.8),
            (6.1, 7.5),
            (5.9, 7.2),
            (5.7, 7.0),
        ]
        .into_iter()
        .map(|(size, leading)| Self::new(size, leading))
        .collect()
    }

    /// Evenly stepped ladder
    ///
    /// Size goes from `start_size` down to `min_size` (inclusive) by `step`.
    /// Leading shrinks by the same step but never below `leading_floor`.
    pub fn stepped(
        start_size: f64,
        start_leading: f64,
        min_size: f64,
        step: f64,
        leading_floor: f64,
    ) -> Result<Vec<Self>> {
        let values = [start_size, start_leading, min_size, step, leading_floor];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(LayoutError::InvalidLadder("values must be finite".into()));
        }
        if step <= 0.0 {
            return Err(LayoutError::InvalidLadder(format!(
                "step must be positive, got {}",
                step
            )));
        }
        if min_size <= 0.0 || start_size < min_size {
            return Err(LayoutError::InvalidLadder(format!(
                "sizes must satisfy 0 < {} <= {}",
                min_size, start_size
            )));
        }
        if start_leading <= 0.0 || leading_floor <= 0.0 {
            return Err(LayoutError::InvalidLadder("leading must be positive".into()));
        }

        let count = ((start_size - min_size) / step + 1e-9).floor() as usize + 1;
        Ok((0..count)
            .map(|i| {
                let shrink = i as f64 * step;
                Self::new(
                    round_micro(start_size - shrink),
                    round_micro((start_leading - shrink).max(leading_floor)),
                )
            })
            .collect())
    }

    fn is_valid(&self) -> bool {
        self.font_size.is_finite()
            && self.leading.is_finite()
            && self.font_size > 0.0
            && self.leading > 0.0
    }
}

fn round_micro(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

/// Spacing applied around the fitted block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitterConfig {
    /// Added once per paragraph
    pub paragraph_padding: f64,
    /// Added above and below the whole block
    pub border_padding: f64,
    /// Removed from both sides of the wrap width
    pub horizontal_padding: f64,
}

impl Default for FitterConfig {
    fn default() -> Self {
        Self {
            paragraph_padding: 2.0,
            border_padding: 0.0,
            horizontal_padding: 0.0,
        }
    }
}

/// Outcome of fitting a block
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    pub candidate: FontCandidate,
    /// Position of `candidate` in the fitter's ladder
    pub index: usize,
    pub height: f64,
    pub overflowed: bool,
    /// Wrapped lines per paragraph at `candidate`
    pub lines: Vec<Vec<String>>,
}

/// What to do when the block does not fit on the current page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Move the block to a fresh page and refit there
    NewPage,
    /// Draw at the smallest size on the current page and accept the overlap
    #[default]
    Clamp,
}

/// Where the block ends up after applying an [`OverflowPolicy`]
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub fit: FitResult,
    /// Top edge of the block
    pub y_top: f64,
    /// The block needs a page after the current one
    pub new_page: bool,
    /// The block reaches into the footer band
    pub overlaps_footer: bool,
}

/// Fits paragraph blocks into the space above a footer band
pub struct PaginatedDocumentFitter<M: TextMeasure> {
    measure: M,
    candidates: Vec<FontCandidate>,
    config: FitterConfig,
}

impl<M: TextMeasure> PaginatedDocumentFitter<M> {
    /// Create a fitter over a ladder ordered largest to smallest
    ///
    /// Invalid candidates are dropped and the rest sorted by descending
    /// size. An empty ladder falls back to [`FontCandidate::FALLBACK`].
    pub fn new(measure: M, candidates: Vec<FontCandidate>) -> Self {
        let mut candidates: Vec<FontCandidate> =
            candidates.into_iter().filter(FontCandidate::is_valid).collect();
        candidates.sort_by(|a, b| b.font_size.total_cmp(&a.font_size));
        if candidates.is_empty() {
            candidates.push(FontCandidate::FALLBACK);
        }

        Self {
            measure,
            candidates,
            config: FitterConfig::default(),
        }
    }

    pub fn with_config(mut self, config: FitterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn candidates(&self) -> &[FontCandidate] {
        &self.candidates
    }

    pub fn config(&self) -> &FitterConfig {
        &self.config
    }

    /// Wrap every paragraph at `candidate` and measure the block height
    pub fn measure_block<S: AsRef<str>>(
        &self,
        content_lines: &[S],
        content_width: f64,
        candidate: FontCandidate,
    ) -> (Vec<Vec<String>>, f64) {
        if content_lines.is_empty() {
            return (Vec::new(), 0.0);
        }

        let wrap_width = content_width - 2.0 * self.config.horizontal_padding;
        let mut height = 2.0 * self.config.border_padding;
        let wrapped: Vec<Vec<String>> = content_lines
            .iter()
            .map(|paragraph| {
                let lines = wrap_text(
                    &self.measure,
                    paragraph.as_ref(),
                    candidate.font_size,
                    wrap_width,
                );
                height += lines.len() as f64 * candidate.leading + self.config.paragraph_padding;
                lines
            })
            .collect();

        (wrapped, height)
    }

    /// Pick the largest candidate whose block fits `available_height`
    ///
    /// Negative or NaN space counts as zero. When nothing fits the smallest
    /// candidate comes back with `overflowed` set.
    pub fn fit<S: AsRef<str>>(
        &self,
        available_height: f64,
        content_lines: &[S],
        content_width: f64,
    ) -> FitResult {
        let available = if available_height.is_nan() {
            0.0
        } else {
            available_height.max(0.0)
        };

        let mut last = None;
        for (index, candidate) in self.candidates.iter().enumerate() {
            let (lines, height) = self.measure_block(content_lines, content_width, *candidate);
            if height <= available {
                debug!(
                    font_size = candidate.font_size,
                    leading = candidate.leading,
                    height,
                    available,
                    "block fits"
                );
                return FitResult {
                    candidate: *candidate,
                    index,
                    height,
                    overflowed: false,
                    lines,
                };
            }
            last = Some((index, *candidate, lines, height));
        }

        // the ladder is never empty, so `last` is always set here
        let (index, candidate, lines, height) = last.unwrap_or_else(|| {
            (0, FontCandidate::FALLBACK, Vec::new(), 0.0)
        });
        debug!(
            font_size = candidate.font_size,
            height, available, "block overflows at smallest candidate"
        );
        FitResult {
            candidate,
            index,
            height,
            overflowed: true,
            lines,
        }
    }

    /// Fit the block at `cursor_y` and apply `policy` if it overflows
    ///
    /// `footer_top` is the lowest y the block may reach and
    /// `page_body_top` is where a block starts on a fresh page.
    pub fn place<S: AsRef<str>>(
        &self,
        cursor_y: f64,
        footer_top: f64,
        page_body_top: f64,
        content_lines: &[S],
        content_width: f64,
        policy: OverflowPolicy,
    ) -> Placement {
        let fit = self.fit(cursor_y - footer_top, content_lines, content_width);
        if !fit.overflowed {
            return Placement {
                fit,
                y_top: cursor_y,
                new_page: false,
                overlaps_footer: false,
            };
        }

        // a fresh page only helps if it offers more room than we have
        let fresh_page_helps = page_body_top > cursor_y;
        match policy {
            OverflowPolicy::NewPage if fresh_page_helps => {
                let refit = self.fit(page_body_top - footer_top, content_lines, content_width);
                debug!(
                    overflowed = refit.overflowed,
                    font_size = refit.candidate.font_size,
                    "block moved to a new page"
                );
                let overlaps_footer = refit.overflowed;
                Placement {
                    fit: refit,
                    y_top: page_body_top,
                    new_page: true,
                    overlaps_footer,
                }
            }
            _ => Placement {
                fit,
                y_top: cursor_y,
                new_page: false,
                overlaps_footer: true,
            },
        }
    }
}
