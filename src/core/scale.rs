use crate::error::{ChartError, ChartResult};

/// Linear mapping from a value domain onto a pixel span of given length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64) -> ChartResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(ChartError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    /// Maps `value` to `[0, span_px]`, `domain_start` landing on `0`.
    pub fn domain_to_pixel(self, value: f64, span_px: f64) -> ChartResult<f64> {
        if !span_px.is_finite() || span_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "pixel span must be finite and > 0".to_owned(),
            ));
        }
        if !value.is_finite() {
            return Err(ChartError::InvalidData("value must be finite".to_owned()));
        }

        let span = self.domain_end - self.domain_start;
        let normalized = (value - self.domain_start) / span;
        Ok(normalized * span_px)
    }

    pub fn pixel_to_domain(self, pixel: f64, span_px: f64) -> ChartResult<f64> {
        if !span_px.is_finite() || span_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "pixel span must be finite and > 0".to_owned(),
            ));
        }
        if !pixel.is_finite() {
            return Err(ChartError::InvalidData("pixel must be finite".to_owned()));
        }

        let span = self.domain_end - self.domain_start;
        Ok(self.domain_start + pixel / span_px * span)
    }
}
