//! Render settings and preferences
//!
//! Read as JSON: LocalStorage on web, `fireball.json` on native.

use serde::{Deserialize, Serialize};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// Fraction of the canvas size the surface is rendered at.
    /// Every pixel runs the full raymarch, so this is the main cost knob.
    pub fn render_scale(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.5,
            QualityPreset::Medium => 0.75,
            QualityPreset::High => 1.0,
        }
    }
}

/// Which browser graphics API to ask wgpu for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BackendPreference {
    /// WebGPU where available, WebGL otherwise
    #[default]
    Auto,
    WebGpu,
    WebGl,
}

impl BackendPreference {
    pub fn backends(&self) -> wgpu::Backends {
        match self {
            BackendPreference::Auto => wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            BackendPreference::WebGpu => wgpu::Backends::BROWSER_WEBGPU,
            BackendPreference::WebGl => wgpu::Backends::GL,
        }
    }
}

/// Render settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Render at device pixel ratio instead of CSS pixels
    pub high_dpi: bool,
    /// Graphics API preference
    pub backend: BackendPreference,

    // === Native preview ===
    pub preview_width: u32,
    pub preview_height: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            high_dpi: true,
            backend: BackendPreference::Auto,
            preview_width: 640,
            preview_height: 360,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Surface size in pixels for a canvas of `client_w` x `client_h` CSS pixels
    pub fn surface_size(&self, client_w: u32, client_h: u32, device_pixel_ratio: f64) -> (u32, u32) {
        let dpr = if self.high_dpi { device_pixel_ratio.max(1.0) } else { 1.0 };
        let scale = dpr * self.quality.render_scale() as f64;
        let w = ((client_w as f64 * scale).round() as u32).max(1);
        let h = ((client_h as f64 * scale).round() as u32).max(1);
        (w, h)
    }

    /// Parse settings JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "fireball_settings";

    /// Settings file (used only on native)
    #[allow(dead_code)]
    const SETTINGS_FILE: &'static str = "fireball.json";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Load settings from `fireball.json` in the working directory
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        match std::fs::read_to_string(Self::SETTINGS_FILE) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", Self::SETTINGS_FILE);
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring {}: {}", Self::SETTINGS_FILE, e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.quality, QualityPreset::Medium);
        assert!(settings.high_dpi);
        assert_eq!(settings.backend, BackendPreference::Auto);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{ "quality": "High" }"#).unwrap();
        assert_eq!(settings.quality, QualityPreset::High);
        assert_eq!(settings.preview_width, 640);
        assert_eq!(settings.backend, BackendPreference::Auto);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Settings::from_json(r#"{ "quality": "Ultra" }"#).is_err());
        assert!(Settings::from_json("not json").is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = Settings::from_preset(QualityPreset::Low);
        settings.backend = BackendPreference::WebGl;
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_preset_names_match_json() {
        for preset in [QualityPreset::Low, QualityPreset::Medium, QualityPreset::High] {
            let json = serde_json::to_string(&preset).unwrap();
            assert_eq!(json, format!("\"{}\"", preset.as_str()));
        }
    }

    #[test]
    fn test_surface_size_scaling() {
        let mut settings = Settings::from_preset(QualityPreset::High);
        assert_eq!(settings.surface_size(800, 600, 2.0), (1600, 1200));
        settings.high_dpi = false;
        assert_eq!(settings.surface_size(800, 600, 2.0), (800, 600));
        settings.quality = QualityPreset::Low;
        assert_eq!(settings.surface_size(800, 600, 2.0), (400, 300));
        assert_eq!(settings.surface_size(0, 0, 1.0), (1, 1));
    }

    #[test]
    fn test_backend_mapping() {
        assert_eq!(BackendPreference::WebGl.backends(), wgpu::Backends::GL);
        assert!(BackendPreference::Auto.backends().contains(wgpu::Backends::BROWSER_WEBGPU));
    }
}
