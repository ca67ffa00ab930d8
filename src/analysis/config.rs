use super::Error;
use serde::Deserialize;

/// Distance and angle thresholds of a bridge analysis.
///
/// Deserializes from TOML; missing keys keep their defaults.
///
/// ```
/// use water_bridge::BridgeConfig;
///
/// let config = BridgeConfig::from_toml_str("max_total_distance = 6.0").unwrap();
/// assert_eq!(config.residue_water_distance(), 3.0);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    /// Upper bound on residue-water-residue path length, in Å.
    pub max_total_distance: f64,
    /// Residue-water proximity cutoff in Å; half of `max_total_distance` when unset.
    pub max_residue_water_distance: Option<f64>,
    /// Donor-acceptor distance cutoff for hydrogen bonds, in Å.
    pub hbond_distance_cutoff: f64,
    /// Minimum donor-hydrogen-acceptor angle for hydrogen bonds, in degrees.
    pub hbond_angle_cutoff: f64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            max_total_distance: 7.0,
            max_residue_water_distance: None,
            hbond_distance_cutoff: 3.5,
            hbond_angle_cutoff: 120.0,
        }
    }
}

impl BridgeConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, Error> {
        let config: BridgeConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn residue_water_distance(&self) -> f64 {
        self.max_residue_water_distance
            .unwrap_or(self.max_total_distance / 2.0)
    }

    /// Rejects non-positive or non-finite distances and angles outside `(0, 180]`.
    pub fn validate(&self) -> Result<(), Error> {
        let distances = [
            ("max_total_distance", self.max_total_distance),
            ("max_residue_water_distance", self.residue_water_distance()),
            ("hbond_distance_cutoff", self.hbond_distance_cutoff),
        ];
        for (name, value) in distances {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::invalid_config(format!(
                    "{name} must be a positive distance, got {value}"
                )));
            }
        }

        let angle = self.hbond_angle_cutoff;
        if !angle.is_finite() || angle <= 0.0 || angle > 180.0 {
            return Err(Error::invalid_config(format!(
                "hbond_angle_cutoff must lie in (0, 180] degrees, got {angle}"
            )));
        }

        Ok(())
    }
}
