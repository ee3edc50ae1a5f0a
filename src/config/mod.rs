//! Tunables for the cove, loaded once at startup.
//!
//! Native builds read `assets/cove.ron`; browser builds read the same RON
//! text from localStorage. A missing source is normal and yields defaults.
//! A malformed source is logged and also yields defaults.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::shared::*;

#[cfg(not(target_arch = "wasm32"))]
pub const CONFIG_PATH: &str = "assets/cove.ron";
#[cfg(target_arch = "wasm32")]
pub const CONFIG_STORAGE_KEY: &str = "fishing_cove.config";

const MAX_PARTICLES_PER_KIND: usize = 64;
/// Longest allowed wait for a bite, in seconds.
const MAX_BITE_WAIT: f32 = 600.0;

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        // Tests and embedders may insert their own config first.
        if !app.world().contains_resource::<CoveConfig>() {
            app.insert_resource(load_config());
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoveConfig {
    /// Ambient particle pool sizes. The pool never grows or shrinks.
    pub firefly_count: usize,
    pub butterfly_count: usize,
    pub leaf_count: usize,
    /// Grid cell the player starts on.
    pub start_x: i32,
    pub start_y: i32,
    /// In-game hour when the cove opens (0.0 - 24.0).
    pub start_hour: f32,
    /// In-game minutes that pass per real second.
    pub minutes_per_second: f32,
    /// Opacity of the constant edge vignette.
    pub vignette_alpha: f32,
    /// Bounds for the random wait before a fish bites, in seconds.
    pub bite_wait_min: f32,
    pub bite_wait_max: f32,
}

impl Default for CoveConfig {
    fn default() -> Self {
        Self {
            firefly_count: 14,
            butterfly_count: 6,
            leaf_count: 8,
            start_x: 10,
            start_y: 5,
            start_hour: 9.0,
            minutes_per_second: 4.0,
            vignette_alpha: 0.12,
            bite_wait_min: 2.0,
            bite_wait_max: 6.0,
        }
    }
}

impl CoveConfig {
    pub fn particle_total(&self) -> usize {
        self.firefly_count + self.butterfly_count + self.leaf_count
    }

    /// Pull every field back into a usable range.
    pub fn clamped(mut self) -> Self {
        self.firefly_count = self.firefly_count.min(MAX_PARTICLES_PER_KIND);
        self.butterfly_count = self.butterfly_count.min(MAX_PARTICLES_PER_KIND);
        self.leaf_count = self.leaf_count.min(MAX_PARTICLES_PER_KIND);
        self.start_x = self.start_x.clamp(0, MAP_WIDTH as i32 - 1);
        self.start_y = self.start_y.clamp(0, MAP_HEIGHT as i32 - 1);
        self.start_hour = if self.start_hour.is_finite() {
            self.start_hour.rem_euclid(24.0)
        } else {
            CoveConfig::default().start_hour
        };
        self.minutes_per_second = if self.minutes_per_second.is_finite() {
            self.minutes_per_second.clamp(0.0, 600.0)
        } else {
            CoveConfig::default().minutes_per_second
        };
        self.vignette_alpha = if self.vignette_alpha.is_finite() {
            self.vignette_alpha.clamp(0.0, 1.0)
        } else {
            CoveConfig::default().vignette_alpha
        };
        // Leave room for a one-second window under the ceiling.
        self.bite_wait_min = if self.bite_wait_min.is_finite() {
            self.bite_wait_min.clamp(0.1, MAX_BITE_WAIT - 1.0)
        } else {
            CoveConfig::default().bite_wait_min
        };
        if !self.bite_wait_max.is_finite() || self.bite_wait_max <= self.bite_wait_min {
            self.bite_wait_max = self.bite_wait_min + 1.0;
        }
        self.bite_wait_max = self.bite_wait_max.min(MAX_BITE_WAIT);
        self
    }
}

/// Parse RON text into a clamped config. Missing fields take defaults.
pub fn parse_config(text: &str) -> Result<CoveConfig, String> {
    ron::from_str::<CoveConfig>(text)
        .map(CoveConfig::clamped)
        .map_err(|e| format!("Config parse failed: {}", e))
}

/// Resolve the config from its platform source, falling back to defaults.
pub fn load_config() -> CoveConfig {
    match read_config_source() {
        Ok(Some(text)) => match parse_config(&text) {
            Ok(config) => {
                info!("[Config] Loaded cove config: {:?}", config);
                config
            }
            Err(e) => {
                warn!("[Config] {}, using defaults", e);
                CoveConfig::default()
            }
        },
        Ok(None) => {
            info!("[Config] No cove config found, using defaults");
            CoveConfig::default()
        }
        Err(e) => {
            warn!("[Config] {}, using defaults", e);
            CoveConfig::default()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn read_config_source() -> Result<Option<String>, String> {
    let path = std::path::Path::new(CONFIG_PATH);
    if !path.exists() {
        return Ok(None);
    }
    std::fs::read_to_string(path)
        .map(Some)
        .map_err(|e| format!("Read failed for {}: {}", path.display(), e))
}

#[cfg(target_arch = "wasm32")]
fn read_config_source() -> Result<Option<String>, String> {
    let window = web_sys::window().ok_or_else(|| "No browser window".to_string())?;
    let storage = window
        .local_storage()
        .map_err(|e| format!("localStorage unavailable: {:?}", e))?;
    let Some(storage) = storage else {
        return Ok(None);
    };
    storage
        .get_item(CONFIG_STORAGE_KEY)
        .map_err(|e| format!("localStorage read failed: {:?}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = parse_config("(firefly_count: 3)").unwrap();
        assert_eq!(config.firefly_count, 3);
        assert_eq!(config.butterfly_count, CoveConfig::default().butterfly_count);
        assert_eq!(config.start_x, 10);
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let err = parse_config("(firefly_count: \"many\"").unwrap_err();
        assert!(err.starts_with("Config parse failed"), "got {}", err);
    }

    #[test]
    fn test_clamp_pulls_start_cell_into_map() {
        let config = CoveConfig {
            start_x: 99,
            start_y: -4,
            ..Default::default()
        }
        .clamped();
        assert_eq!(config.start_x, MAP_WIDTH as i32 - 1);
        assert_eq!(config.start_y, 0);
    }

    #[test]
    fn test_clamp_caps_particle_pools() {
        let config = CoveConfig {
            firefly_count: 10_000,
            ..Default::default()
        }
        .clamped();
        assert_eq!(config.firefly_count, MAX_PARTICLES_PER_KIND);
    }

    #[test]
    fn test_clamp_repairs_inverted_bite_window() {
        let config = CoveConfig {
            bite_wait_min: 5.0,
            bite_wait_max: 1.0,
            ..Default::default()
        }
        .clamped();
        assert!(config.bite_wait_max > config.bite_wait_min);
    }

    #[test]
    fn test_huge_bite_wait_is_capped() {
        let config = parse_config("(bite_wait_min: 1e20)").unwrap();
        assert!(config.bite_wait_min < config.bite_wait_max);
        assert!(config.bite_wait_max <= MAX_BITE_WAIT);

        let config = parse_config("(bite_wait_min: 3.0, bite_wait_max: 1e30)").unwrap();
        assert_eq!(config.bite_wait_min, 3.0);
        assert_eq!(config.bite_wait_max, MAX_BITE_WAIT);
    }

    #[test]
    fn test_start_hour_wraps() {
        let config = CoveConfig {
            start_hour: 26.5,
            ..Default::default()
        }
        .clamped();
        assert!((config.start_hour - 2.5).abs() < 1e-4);
    }
}
