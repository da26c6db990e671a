//! Tunable thresholds for the issue detector.

/// Detector settings.
///
/// # Examples
/// ```
/// use wikilink_core::DetectorConfig;
///
/// let config = DetectorConfig::default();
/// assert!((config.distance_warning_km - 2.0).abs() < f64::EPSILON);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DetectorConfig {
    /// Distance above which an informational report notes that the feature
    /// is far from the location stored on its wikidata entry.
    pub distance_warning_km: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            distance_warning_km: 2.0,
        }
    }
}
