use crate::poi::CENTRE_STRIP_HALF_WIDTH;
use crate::prelude::{GeoError, GeoResult};
use crate::projection::DEFAULT_FIELD_OF_VIEW_DEG;
use crate::radar::GestureThresholds;
use serde::{Deserialize, Serialize};

/// User-tunable settings of the POI overlay. Every field has a default, so
/// a partial document is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub radar_range_km: f64,
    pub field_of_view_deg: f64,
    pub gestures: GestureThresholds,
    pub centre_half_width: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            radar_range_km: 10.0,
            field_of_view_deg: DEFAULT_FIELD_OF_VIEW_DEG,
            gestures: GestureThresholds::default(),
            centre_half_width: CENTRE_STRIP_HALF_WIDTH,
        }
    }
}

impl OverlayConfig {
    pub fn validate(&self) -> GeoResult<()> {
        if !(self.radar_range_km > 0.0 && self.radar_range_km.is_finite()) {
            return Err(GeoError::InvalidInput(format!(
                "radar_range_km must be positive, got {}",
                self.radar_range_km
            )));
        }
        if !(self.field_of_view_deg > 0.0 && self.field_of_view_deg < 180.0) {
            return Err(GeoError::InvalidInput(format!(
                "field_of_view_deg must lie in (0, 180), got {}",
                self.field_of_view_deg
            )));
        }
        if self.centre_half_width < 0.0 {
            return Err(GeoError::InvalidInput(format!(
                "centre_half_width must not be negative, got {}",
                self.centre_half_width
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config: OverlayConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, OverlayConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn nested_thresholds_are_partially_overridable() {
        let config: OverlayConfig =
            serde_json::from_str(r#"{"radar_range_km": 2.5, "gestures": {"min_velocity": 50}}"#)
                .unwrap();
        assert_eq!(config.radar_range_km, 2.5);
        assert_eq!(config.gestures.min_velocity, 50.0);
        assert_eq!(config.gestures.min_distance, 120.0);
    }

    #[test]
    fn out_of_range_values_fail_validation() {
        let mut config = OverlayConfig::default();
        config.field_of_view_deg = 180.0;
        assert!(config.validate().is_err());

        let mut config = OverlayConfig::default();
        config.radar_range_km = -1.0;
        assert!(config.validate().is_err());
    }
}
