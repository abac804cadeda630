//! TOML configuration for backdrop scenes.
//!
//! The scene variants differ mostly in cosmetic constants (ring speed,
//! octave count, palette colors), so those constants live here as
//! configuration with defaults matching the shipped look, rather than as
//! magic numbers scattered through the field code.

use fieldgen::{FbmParams, Palette, RippleParams, Rgba, SceneKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SceneConfig {
    pub version: u32,
    /// Scene id: `drift`, `plasma`, or `halftone`.
    #[serde(default = "default_scene")]
    pub scene: String,
    /// Field evaluation backend; the renderer picks a default per scene
    /// when unset.
    #[serde(default)]
    pub backend: Option<BackendSetting>,
    /// Optional FPS cap; 0 or absent means every refresh callback.
    #[serde(default)]
    pub fps: Option<f32>,
    /// Seed for blob placement in the drift scene.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub fade: FadeSettings,
    #[serde(default)]
    pub palette: PaletteSettings,
    #[serde(default)]
    pub ripple: RippleSettings,
    #[serde(default)]
    pub noise: NoiseSettings,
    #[serde(default)]
    pub plasma: PlasmaSettings,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            version: 1,
            scene: default_scene(),
            backend: None,
            fps: None,
            seed: None,
            fade: FadeSettings::default(),
            palette: PaletteSettings::default(),
            ripple: RippleSettings::default(),
            noise: NoiseSettings::default(),
            plasma: PlasmaSettings::default(),
        }
    }
}

fn default_scene() -> String {
    SceneKind::default().id().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendSetting {
    Cpu,
    Gpu,
}

/// Entrance fade played on the very first run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FadeSettings {
    /// Duration in seconds; 0 disables the fade entirely.
    #[serde(default = "default_fade_duration")]
    pub duration: f32,
    #[serde(default)]
    pub curve: FadeCurveSetting,
}

impl Default for FadeSettings {
    fn default() -> Self {
        Self {
            duration: default_fade_duration(),
            curve: FadeCurveSetting::default(),
        }
    }
}

fn default_fade_duration() -> f32 {
    1.2
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FadeCurveSetting {
    Linear,
    #[default]
    Smoothstep,
    EaseInOut,
}

/// Theme colors as hex strings; validated when resolved.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaletteSettings {
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default = "default_ink")]
    pub ink: String,
    #[serde(default = "default_accents")]
    pub accents: Vec<String>,
}

impl Default for PaletteSettings {
    fn default() -> Self {
        Self {
            background: default_background(),
            ink: default_ink(),
            accents: default_accents(),
        }
    }
}

fn default_background() -> String {
    "#111321".to_string()
}

fn default_ink() -> String {
    "#9b2064".to_string()
}

fn default_accents() -> Vec<String> {
    vec![
        "#9b206426".to_string(),
        "#b24a831f".to_string(),
        "#21233933".to_string(),
        "#2c2f4a2e".to_string(),
    ]
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RippleSettings {
    pub speed: f32,
    pub thickness: f32,
    pub time_decay: f32,
    pub distance_decay: f32,
}

impl Default for RippleSettings {
    fn default() -> Self {
        let defaults = RippleParams::default();
        Self {
            speed: defaults.speed,
            thickness: defaults.thickness,
            time_decay: defaults.time_decay,
            distance_decay: defaults.distance_decay,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NoiseSettings {
    pub octaves: u32,
    pub lacunarity: f32,
    pub gain: f32,
    /// Advance rate of the noise time axis, units per second.
    pub drift: f32,
    /// Lattice cells per surface pixel.
    pub frequency: f32,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        let defaults = FbmParams::default();
        Self {
            octaves: defaults.octaves,
            lacunarity: defaults.lacunarity,
            gain: defaults.gain,
            drift: 0.05,
            frequency: 0.008,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlasmaSettings {
    pub intensity: f32,
}

impl Default for PlasmaSettings {
    fn default() -> Self {
        Self { intensity: 0.15 }
    }
}

impl SceneConfig {
    /// Parses and validates a configuration document.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.scene_kind()?;
        self.resolved_palette()?;
        if self.noise.octaves == 0 {
            return Err(ConfigError::Invalid(
                "noise.octaves must be at least 1".to_string(),
            ));
        }
        if self.ripple.speed <= 0.0 || self.ripple.thickness <= 0.0 {
            return Err(ConfigError::Invalid(
                "ripple.speed and ripple.thickness must be positive".to_string(),
            ));
        }
        if self.fade.duration < 0.0 {
            return Err(ConfigError::Invalid(
                "fade.duration must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    pub fn scene_kind(&self) -> Result<SceneKind, ConfigError> {
        SceneKind::from_id(&self.scene).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "unknown scene '{}' (expected one of: {})",
                self.scene,
                SceneKind::all()
                    .iter()
                    .map(|kind| kind.id())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })
    }

    pub fn resolved_palette(&self) -> Result<Palette, ConfigError> {
        let parse = |text: &str| {
            Rgba::from_hex(text).map_err(|err| ConfigError::Invalid(err.to_string()))
        };
        Ok(Palette {
            background: parse(&self.palette.background)?,
            ink: parse(&self.palette.ink)?,
            accents: self
                .palette
                .accents
                .iter()
                .map(|text| parse(text))
                .collect::<Result<_, _>>()?,
        })
    }

    pub fn fbm_params(&self) -> FbmParams {
        FbmParams {
            octaves: self.noise.octaves,
            lacunarity: self.noise.lacunarity,
            gain: self.noise.gain,
        }
    }

    pub fn ripple_params(&self) -> RippleParams {
        RippleParams {
            speed: self.ripple.speed,
            thickness: self.ripple.thickness,
            time_decay: self.ripple.time_decay,
            distance_decay: self.ripple.distance_decay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_document_uses_defaults() {
        let config = SceneConfig::from_toml_str("version = 1").unwrap();
        assert_eq!(config.scene_kind().unwrap(), SceneKind::Halftone);
        assert_eq!(config.fps, None);
        assert_eq!(config.noise.octaves, 5);
        assert!((config.noise.lacunarity - 1.25).abs() < 1e-6);
        assert!((config.fade.duration - 1.2).abs() < 1e-6);
        assert_eq!(config.fade.curve, FadeCurveSetting::Smoothstep);
    }

    #[test]
    fn full_document_round_trips() {
        let config = SceneConfig::from_toml_str(
            r##"
version = 1
scene = "drift"
backend = "cpu"
fps = 30
seed = 7

[fade]
duration = 0.5
curve = "ease-in-out"

[palette]
background = "#000000"
ink = "#ffffff"
accents = ["#ff000040", "#00ff0040"]

[ripple]
speed = 240
thickness = 25

[noise]
octaves = 3
lacunarity = 2.0
"##,
        )
        .unwrap();

        assert_eq!(config.scene_kind().unwrap(), SceneKind::Drift);
        assert_eq!(config.backend, Some(BackendSetting::Cpu));
        assert_eq!(config.fps, Some(30.0));
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.fade.curve, FadeCurveSetting::EaseInOut);
        let palette = config.resolved_palette().unwrap();
        assert_eq!(palette.accents.len(), 2);
        assert_eq!(config.ripple_params().speed, 240.0);
        // Unspecified ripple fields keep their defaults.
        assert!((config.ripple_params().time_decay - 0.8).abs() < 1e-6);
        assert_eq!(config.fbm_params().octaves, 3);
    }

    #[test]
    fn unknown_scene_is_rejected() {
        let err = SceneConfig::from_toml_str(
            r#"
version = 1
scene = "aurora"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("aurora"));
    }

    #[test]
    fn malformed_palette_color_is_rejected() {
        let err = SceneConfig::from_toml_str(
            r#"
version = 1

[palette]
background = "not-a-color"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn zero_octaves_is_rejected() {
        let err = SceneConfig::from_toml_str(
            r#"
version = 1

[noise]
octaves = 0
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("octaves"));
    }

    #[test]
    fn default_palette_parses() {
        let config = SceneConfig::default();
        let palette = config.resolved_palette().unwrap();
        assert_eq!(palette.accents.len(), 4);
        assert!(palette.accents[0].a < 0.2);
    }
}
