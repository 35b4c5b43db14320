use serde::{Deserialize, Serialize};

/// Base of the exponential slider map: `factor = SLIDER_BASE ^ slider`.
pub const SLIDER_BASE: f64 = 1.5;

/// `totalScaling` used by the "reset" presets. Real catalog distances are in
/// kilometres, so the reset view starts zoomed far out.
pub const RESET_TOTAL_SCALING: f64 = 0.005;

/// Longest moon trail window, in seconds either side of now. Each second
/// costs 120 trail samples per moon.
pub const MAX_MOON_PATH_LENGTH: f64 = 60.0;

/// Configuration State shared by every component.
///
/// A flat key-value record; the serialized form is what the host persists.
/// Scaling factors are multiplicative and always strictly positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Multiplies every angular speed.
    pub time_scaling: f64,
    /// Multiplies every radius, distance and size.
    pub total_scaling: f64,
    pub star_size_scaling: f64,
    pub planet_distance_scaling: f64,
    pub planet_size_scaling: f64,
    /// Draw planet orbit circles.
    pub planet_paths: bool,
    pub moon_distance_scaling: f64,
    pub moon_size_scaling: f64,
    /// Draw moon trails.
    pub moon_paths: bool,
    /// Half-width of the moon trail window, in seconds.
    pub moon_path_length: f64,
    /// Camera pan in simulation-space units.
    pub offset_x: f64,
    pub offset_y: f64,
    /// Name of the body the camera is centred on; empty for manual pan.
    pub focus: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            time_scaling: 1.0,
            total_scaling: 1.0,
            star_size_scaling: 1.0,
            planet_distance_scaling: 1.0,
            planet_size_scaling: 1.0,
            planet_paths: true,
            moon_distance_scaling: 1.0,
            moon_size_scaling: 1.0,
            moon_paths: true,
            moon_path_length: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            focus: String::new(),
        }
    }
}

impl Settings {
    /// Parse a persisted settings blob. Missing keys take their defaults and
    /// out-of-range factors are repaired.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// Serialize for persistence.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Replace non-positive or non-finite scaling factors with 1 and clamp a
    /// negative trail length to 0.
    pub fn sanitize(&mut self) {
        let factors: [(&str, &mut f64); 7] = [
            ("timeScaling", &mut self.time_scaling),
            ("totalScaling", &mut self.total_scaling),
            ("starSizeScaling", &mut self.star_size_scaling),
            ("planetDistanceScaling", &mut self.planet_distance_scaling),
            ("planetSizeScaling", &mut self.planet_size_scaling),
            ("moonDistanceScaling", &mut self.moon_distance_scaling),
            ("moonSizeScaling", &mut self.moon_size_scaling),
        ];
        for (key, value) in factors {
            if !(value.is_finite() && *value > 0.0) {
                log::warn!("settings: {key} = {value} is not a positive factor, using 1");
                *value = 1.0;
            }
        }

        if !self.moon_path_length.is_finite() || self.moon_path_length < 0.0 {
            log::warn!("settings: moonPathLength = {} clamped to 0", self.moon_path_length);
            self.moon_path_length = 0.0;
        } else if self.moon_path_length > MAX_MOON_PATH_LENGTH {
            log::warn!(
                "settings: moonPathLength = {} clamped to {MAX_MOON_PATH_LENGTH}",
                self.moon_path_length
            );
            self.moon_path_length = MAX_MOON_PATH_LENGTH;
        }
        if !self.offset_x.is_finite() {
            self.offset_x = 0.0;
        }
        if !self.offset_y.is_finite() {
            self.offset_y = 0.0;
        }
    }

    /// Restore everything, including pan and focus, to the reset preset.
    pub fn reset(&mut self) {
        *self = Self {
            total_scaling: RESET_TOTAL_SCALING,
            ..Self::default()
        };
    }

    /// Restore only the time and size/distance factors.
    pub fn reset_scaling(&mut self) {
        let defaults = Self::default();
        self.total_scaling = RESET_TOTAL_SCALING;
        self.time_scaling = defaults.time_scaling;
        self.star_size_scaling = defaults.star_size_scaling;
        self.planet_distance_scaling = defaults.planet_distance_scaling;
        self.planet_size_scaling = defaults.planet_size_scaling;
        self.moon_distance_scaling = defaults.moon_distance_scaling;
        self.moon_size_scaling = defaults.moon_size_scaling;
    }

    /// Assign a numeric field by its persisted key. Booleans take `value != 0`.
    /// Returns false for unknown keys and for factors that are not positive.
    pub fn set(&mut self, key: &str, value: f64) -> bool {
        let factor = match key {
            "timeScaling" => &mut self.time_scaling,
            "totalScaling" => &mut self.total_scaling,
            "starSizeScaling" => &mut self.star_size_scaling,
            "planetDistanceScaling" => &mut self.planet_distance_scaling,
            "planetSizeScaling" => &mut self.planet_size_scaling,
            "moonDistanceScaling" => &mut self.moon_distance_scaling,
            "moonSizeScaling" => &mut self.moon_size_scaling,
            "planetPaths" => {
                self.planet_paths = value != 0.0;
                return true;
            }
            "moonPaths" => {
                self.moon_paths = value != 0.0;
                return true;
            }
            "moonPathLength" => {
                self.moon_path_length = if value.is_nan() {
                    0.0
                } else {
                    value.clamp(0.0, MAX_MOON_PATH_LENGTH)
                };
                return true;
            }
            "offsetX" => {
                self.offset_x = value;
                return true;
            }
            "offsetY" => {
                self.offset_y = value;
                return true;
            }
            _ => return false,
        };
        if value.is_finite() && value > 0.0 {
            *factor = value;
            true
        } else {
            false
        }
    }

    /// Whether the camera is following a body rather than manual pan.
    pub fn has_focus(&self) -> bool {
        !self.focus.is_empty()
    }
}

/// Map a linear slider position to a multiplicative factor.
pub fn scaling_from_slider(slider: f64) -> f64 {
    SLIDER_BASE.powf(slider)
}

/// Inverse of [`scaling_from_slider`], for positioning a slider from a factor.
pub fn slider_from_scaling(factor: f64) -> f64 {
    factor.ln() / SLIDER_BASE.ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let settings = Settings::from_json(r#"{ "timeScaling": 4.0 }"#).unwrap();
        assert_eq!(settings.time_scaling, 4.0);
        assert_eq!(settings.total_scaling, 1.0);
        assert!(settings.planet_paths);
        assert!(settings.moon_paths);
        assert_eq!(settings.moon_path_length, 1.0);
        assert!(settings.focus.is_empty());
    }

    #[test]
    fn stored_false_toggle_is_kept() {
        let settings = Settings::from_json(r#"{ "planetPaths": false }"#).unwrap();
        assert!(!settings.planet_paths);
        assert!(settings.moon_paths);
    }

    #[test]
    fn non_positive_factors_are_repaired() {
        let settings =
            Settings::from_json(r#"{ "totalScaling": 0, "moonSizeScaling": -2, "moonPathLength": -1 }"#)
                .unwrap();
        assert_eq!(settings.total_scaling, 1.0);
        assert_eq!(settings.moon_size_scaling, 1.0);
        assert_eq!(settings.moon_path_length, 0.0);
    }

    #[test]
    fn moon_path_length_is_capped() {
        let settings = Settings::from_json(r#"{ "moonPathLength": 1e9 }"#).unwrap();
        assert_eq!(settings.moon_path_length, MAX_MOON_PATH_LENGTH);

        let mut settings = Settings::default();
        assert!(settings.set("moonPathLength", 1e9));
        assert_eq!(settings.moon_path_length, MAX_MOON_PATH_LENGTH);
        assert!(settings.set("moonPathLength", f64::NAN));
        assert_eq!(settings.moon_path_length, 0.0);
        assert!(settings.set("moonPathLength", 2.5));
        assert_eq!(settings.moon_path_length, 2.5);
    }

    #[test]
    fn json_keys_are_camel_case() {
        let mut settings = Settings::default();
        settings.focus = "Earth".into();
        let json = settings.to_json().unwrap();
        assert!(json.contains("\"planetDistanceScaling\""));
        assert!(json.contains("\"focus\":\"Earth\""));
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn reset_restores_preset() {
        let mut settings = Settings::default();
        settings.offset_x = 50.0;
        settings.focus = "Mars".into();
        settings.moon_paths = false;
        settings.reset();
        assert_eq!(settings.total_scaling, RESET_TOTAL_SCALING);
        assert_eq!(settings.offset_x, 0.0);
        assert!(settings.moon_paths);
        assert!(!settings.has_focus());
    }

    #[test]
    fn reset_scaling_keeps_camera() {
        let mut settings = Settings::default();
        settings.offset_y = -20.0;
        settings.focus = "Io".into();
        settings.planet_size_scaling = 3.0;
        settings.reset_scaling();
        assert_eq!(settings.planet_size_scaling, 1.0);
        assert_eq!(settings.offset_y, -20.0);
        assert_eq!(settings.focus, "Io");
    }

    #[test]
    fn set_rejects_bad_factor() {
        let mut settings = Settings::default();
        assert!(settings.set("totalScaling", 2.5));
        assert!(!settings.set("totalScaling", 0.0));
        assert!(!settings.set("nope", 1.0));
        assert_eq!(settings.total_scaling, 2.5);
        assert!(settings.set("moonPaths", 0.0));
        assert!(!settings.moon_paths);
    }

    #[test]
    fn slider_map_is_exponential() {
        assert!((scaling_from_slider(0.0) - 1.0).abs() < 1e-12);
        assert!((scaling_from_slider(2.0) - 2.25).abs() < 1e-12);
        assert!((slider_from_scaling(scaling_from_slider(-3.5)) + 3.5).abs() < 1e-9);
    }
}
