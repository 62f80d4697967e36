use crate::Result;
use crate::config::Color;
use ohno::bail;
use palette::{LinSrgb, Mix, Srgb};

/// Maps a cancer risk probability to a color by normalizing `log10(risk)`
/// between the configured bounds and interpolating between evenly spaced
/// ramp stops in linear RGB.
#[derive(Debug, Clone)]
pub struct RiskRamp {
    stops: Vec<LinSrgb<f64>>,
    min_log_risk: f64,
    max_log_risk: f64,
}

impl RiskRamp {
    /// Build a ramp from configured stops and risk bounds.
    ///
    /// # Errors
    ///
    /// Returns an error when fewer than two stops are given or the bounds
    /// don't form a positive, increasing risk interval.
    pub fn new(stops: &[Color], min_risk: f64, max_risk: f64) -> Result<Self> {
        if stops.len() < 2 {
            bail!("color ramp needs at least two stops, got {}", stops.len());
        }
        if min_risk <= 0.0 || max_risk <= 0.0 {
            bail!("risk bounds must be positive probabilities (min {min_risk}, max {max_risk})");
        }
        if min_risk >= max_risk {
            bail!("min risk {min_risk} must be below max risk {max_risk}");
        }

        Ok(Self {
            stops: stops.iter().map(|color| color.0.into_format::<f64>().into_linear()).collect(),
            min_log_risk: min_risk.log10(),
            max_log_risk: max_risk.log10(),
        })
    }

    /// Color for a risk value, or `None` when the risk is not a positive
    /// probability (log10 is undefined there).
    ///
    /// Risks outside the configured bounds clamp to the ramp's ends.
    #[must_use]
    pub fn color_for(&self, risk: f64) -> Option<Srgb<f64>> {
        if risk <= 0.0 || !risk.is_finite() {
            return None;
        }

        let normalized = ((risk.log10() - self.min_log_risk) / (self.max_log_risk - self.min_log_risk)).clamp(0.0, 1.0);

        #[expect(clippy::cast_precision_loss, reason = "Stop counts are tiny")]
        let scaled = normalized * (self.stops.len() - 1) as f64;
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "scaled is clamped to [0, stops - 1]"
        )]
        let segment = (scaled.floor() as usize).min(self.stops.len() - 2);
        #[expect(clippy::cast_precision_loss, reason = "Stop counts are tiny")]
        let fraction = scaled - segment as f64;

        let mixed = self.stops[segment].mix(self.stops[segment + 1], fraction);
        Some(Srgb::from_linear(mixed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_ramp() -> RiskRamp {
        let config = crate::config::Config::default();
        RiskRamp::new(&config.ramp, config.min_risk, config.max_risk).unwrap()
    }

    #[test]
    fn test_bounds_map_to_ramp_ends() {
        let ramp = default_ramp();

        // Blue at the minimum risk, red at the maximum.
        let low = ramp.color_for(8.6e-6).unwrap();
        assert!(low.blue > 0.99 && low.red < 0.01);

        let high = ramp.color_for(1.5e-4).unwrap();
        assert!(high.red > 0.99 && high.blue < 0.01);
    }

    #[test]
    fn test_out_of_range_risks_clamp() {
        let ramp = default_ramp();
        assert_eq!(ramp.color_for(1.0e-9), ramp.color_for(8.6e-6));
        assert_eq!(ramp.color_for(0.5), ramp.color_for(1.5e-4));
    }

    #[test]
    fn test_non_positive_risk_has_no_color() {
        let ramp = default_ramp();
        assert!(ramp.color_for(0.0).is_none());
        assert!(ramp.color_for(-1.0e-5).is_none());
        assert!(ramp.color_for(f64::NAN).is_none());
    }

    #[test]
    fn test_midpoint_interpolates_between_stops() {
        let stops = [
            Color(palette::Srgb::new(0u8, 0, 0)),
            Color(palette::Srgb::new(255u8, 255, 255)),
        ];
        let ramp = RiskRamp::new(&stops, 1.0e-4, 1.0e-2).unwrap();

        // Geometric midpoint of the bounds is the ramp's halfway point.
        let mid = ramp.color_for(1.0e-3).unwrap();
        assert!(mid.red > 0.1 && mid.red < 0.9);
        assert!((mid.red - mid.green).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_construction_rejected() {
        let stops = [Color(palette::Srgb::new(0u8, 0, 0))];
        assert!(RiskRamp::new(&stops, 1.0e-5, 1.0e-4).is_err());

        let stops = [
            Color(palette::Srgb::new(0u8, 0, 0)),
            Color(palette::Srgb::new(255u8, 255, 255)),
        ];
        assert!(RiskRamp::new(&stops, 1.0e-4, 1.0e-5).is_err());
        assert!(RiskRamp::new(&stops, 0.0, 1.0e-5).is_err());
    }
}
