//! Custom validation functions shared across configuration sections.

use validator::ValidationError;

use crate::monitor::ThresholdBandConfig;

/// The critical bound must sit on the failing side of the warning bound:
/// above it for regular metrics, below it for inverted ones.
pub fn validate_band_ordering(band: &ThresholdBandConfig) -> Result<(), ValidationError> {
    let ordered = if band.inverted {
        band.critical < band.warning
    } else {
        band.critical > band.warning
    };
    if ordered {
        Ok(())
    } else {
        let mut error = ValidationError::new("band_ordering");
        error.message = Some("critical bound must be stricter than warning bound".into());
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordered_bands() {
        assert!(validate_band_ordering(&ThresholdBandConfig {
            warning: 75.0,
            critical: 90.0,
            inverted: false,
        })
        .is_ok());
        assert!(validate_band_ordering(&ThresholdBandConfig {
            warning: 40.0,
            critical: 20.0,
            inverted: true,
        })
        .is_ok());
    }

    #[test]
    fn rejects_inverted_ordering() {
        assert!(validate_band_ordering(&ThresholdBandConfig {
            warning: 75.0,
            critical: 60.0,
            inverted: false,
        })
        .is_err());
    }
}
