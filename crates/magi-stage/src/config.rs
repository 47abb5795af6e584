//! Layered configuration system
//!
//! Config is loaded with three layers of precedence (highest wins):
//! 1. Environment variables: `MAGI_FPS`, `MAGI_PARTICLES`, `MAGI_MATRIX_COLOR`
//! 2. Project-local: `.magi/config.toml`
//! 3. Global: `~/.magi/config.toml`

use magi_core::{Color, DeviceProfile, EffectBudget, MagiError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One config file. Every key is optional so layers only override what they set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageConfigFile {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub render: RenderSection,
    #[serde(default)]
    pub matrix: MatrixSection,
    #[serde(default)]
    pub particles: ParticlesSection,
    #[serde(default)]
    pub device: DeviceSection,
    #[serde(default)]
    pub viewport: ViewportSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderSection {
    pub fps: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatrixSection {
    pub font_size: Option<f32>,
    pub color: Option<Color>,
    pub worker: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParticlesSection {
    pub capacity: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceSection {
    pub mobile: Option<bool>,
    pub touch: Option<bool>,
    pub memory_gb: Option<f32>,
    pub cores: Option<u32>,
    pub reduced_motion: Option<bool>,
    #[serde(alias = "offscreen_transfer")]
    pub offscreen: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewportSection {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub device_pixel_ratio: Option<f32>,
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageConfig {
    pub seed: u64,
    pub render: RenderConfig,
    pub matrix: MatrixConfig,
    pub particles: ParticlesConfig,
    pub device: DeviceProfile,
    pub viewport: ViewportConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Overrides the tier's frame rate
    pub fps: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixConfig {
    pub font_size: f32,
    pub color: Color,
    /// Allow the worker-thread renderer
    pub worker: bool,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            color: Color::MAGI_GREEN,
            worker: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticlesConfig {
    /// Overrides the tier's pool size
    pub capacity: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportConfig {
    pub width: u32,
    pub height: u32,
    pub device_pixel_ratio: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            device_pixel_ratio: 1.0,
        }
    }
}

fn default_seed() -> u64 {
    0x4d41_4749
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            render: RenderConfig::default(),
            matrix: MatrixConfig::default(),
            particles: ParticlesConfig::default(),
            device: DeviceProfile::default(),
            viewport: ViewportConfig::default(),
        }
    }
}

impl StageConfig {
    /// Load config with layered precedence: global < project < env vars
    pub fn load() -> Result<Self> {
        let mut layers = Vec::new();
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                layers.push(global_path);
            }
        }
        let local_path = PathBuf::from(".magi/config.toml");
        if local_path.exists() {
            layers.push(local_path);
        }
        Self::resolve(&layers, |key| std::env::var(key).ok())
    }

    /// Load config from a single file, still honoring env overrides
    pub fn load_from_file(path: &Path) -> Result<Self> {
        Self::resolve(&[path.to_path_buf()], |key| std::env::var(key).ok())
    }

    /// Apply `layers` in order over the defaults, then the variables `env` yields
    pub fn resolve(layers: &[PathBuf], env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        for path in layers {
            let layer = Self::load_file(path)?;
            config.merge(layer);
        }
        config.apply_env_overrides(env)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let layer: StageConfigFile = toml::from_str(content)?;
        let mut config = Self::default();
        config.merge(layer);
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(fps) = self.render.fps {
            if !fps.is_finite() || fps <= 0.0 {
                return Err(MagiError::InvalidConfig(format!("render.fps must be positive, got {}", fps)));
            }
        }
        if !self.matrix.font_size.is_finite() || self.matrix.font_size <= 0.0 {
            return Err(MagiError::InvalidConfig(format!(
                "matrix.font_size must be positive, got {}",
                self.matrix.font_size
            )));
        }
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(MagiError::InvalidConfig("viewport must not be empty".to_string()));
        }
        Ok(())
    }

    /// The device's effect budget with config overrides applied
    pub fn budget(&self) -> EffectBudget {
        let mut budget = self.device.budget();
        if let Some(fps) = self.render.fps {
            budget.target_fps = fps;
        }
        if let Some(capacity) = self.particles.capacity {
            budget.particle_count = capacity;
        }
        budget
    }

    pub fn viewport(&self) -> (u32, u32) {
        (self.viewport.width, self.viewport.height)
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".magi").join("config.toml"))
    }

    fn load_file(path: &Path) -> Result<StageConfigFile> {
        let content = std::fs::read_to_string(path)?;
        let config: StageConfigFile = toml::from_str(&content).map_err(|e| {
            MagiError::InvalidConfig(format!("Failed to parse config {}: {}", path.display(), e))
        })?;
        Ok(config)
    }

    fn merge(&mut self, overlay: StageConfigFile) {
        if let Some(seed) = overlay.seed {
            self.seed = seed;
        }
        if overlay.render.fps.is_some() {
            self.render.fps = overlay.render.fps;
        }

        let matrix = overlay.matrix;
        if let Some(font_size) = matrix.font_size {
            self.matrix.font_size = font_size;
        }
        if let Some(color) = matrix.color {
            self.matrix.color = color;
        }
        if let Some(worker) = matrix.worker {
            self.matrix.worker = worker;
        }

        if overlay.particles.capacity.is_some() {
            self.particles.capacity = overlay.particles.capacity;
        }

        let device = overlay.device;
        let profile = &mut self.device;
        if let Some(mobile) = device.mobile {
            profile.mobile = mobile;
        }
        if let Some(touch) = device.touch {
            profile.touch = touch;
        }
        if let Some(memory_gb) = device.memory_gb {
            profile.memory_gb = memory_gb;
        }
        if let Some(cores) = device.cores {
            profile.cores = cores;
        }
        if let Some(reduced_motion) = device.reduced_motion {
            profile.reduced_motion = reduced_motion;
        }
        if let Some(offscreen) = device.offscreen {
            profile.offscreen_transfer = offscreen;
        }

        let viewport = overlay.viewport;
        if let Some(width) = viewport.width {
            self.viewport.width = width;
        }
        if let Some(height) = viewport.height {
            self.viewport.height = height;
        }
        if let Some(dpr) = viewport.device_pixel_ratio {
            self.viewport.device_pixel_ratio = dpr;
        }
    }

    fn apply_env_overrides(&mut self, env: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(fps) = env("MAGI_FPS") {
            let fps = fps
                .trim()
                .parse::<f64>()
                .map_err(|e| MagiError::InvalidConfig(format!("MAGI_FPS='{}': {}", fps, e)))?;
            self.render.fps = Some(fps);
        }
        if let Some(count) = env("MAGI_PARTICLES") {
            let count = count
                .trim()
                .parse::<usize>()
                .map_err(|e| MagiError::InvalidConfig(format!("MAGI_PARTICLES='{}': {}", count, e)))?;
            self.particles.capacity = Some(count);
        }
        if let Some(color) = env("MAGI_MATRIX_COLOR") {
            self.matrix.color = Color::parse(&color)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use magi_core::PerformanceTier;
    use std::collections::HashMap;
    use std::io::Write;

    fn temp_config(content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("magi_config_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    fn cleanup(path: &Path) {
        std::fs::remove_file(path).ok();
        std::fs::remove_dir(path.parent().unwrap()).ok();
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_load_config_from_file() {
        let path = temp_config(
            r##"
seed = 7

[render]
fps = 24.0

[matrix]
font_size = 20.0
color = "#00e5ff"
worker = false

[device]
mobile = true
memory_gb = 8.0
cores = 8

[viewport]
width = 390
height = 844
device_pixel_ratio = 3.0
"##,
        );
        let config = StageConfig::resolve(&[path.clone()], no_env).unwrap();

        assert_eq!(config.seed, 7);
        assert_eq!(config.render.fps, Some(24.0));
        assert_eq!(config.matrix.font_size, 20.0);
        assert_eq!(config.matrix.color, Color::from_hex(0x00e5ff));
        assert!(!config.matrix.worker);
        assert!(config.device.mobile);
        assert!(config.device.offscreen_transfer);
        assert_eq!(config.viewport(), (390, 844));
        assert_eq!(config.device.tier(), PerformanceTier::High);
        assert_eq!(config.budget().target_fps, 24.0);

        cleanup(&path);
    }

    #[test]
    fn test_later_layers_win() {
        let global = temp_config("[matrix]\ncolor = \"#ff4500\"\nfont_size = 12.0\n");
        let project = temp_config("[matrix]\ncolor = \"#39ff14\"\n");

        let config = StageConfig::resolve(&[global.clone(), project.clone()], no_env).unwrap();
        assert_eq!(config.matrix.color, Color::MAGI_GREEN);
        assert_eq!(config.matrix.font_size, 12.0);

        cleanup(&global);
        cleanup(&project);
    }

    #[test]
    fn test_env_var_override() {
        let path = temp_config("[render]\nfps = 60.0\n\n[particles]\ncapacity = 10\n");
        let env: HashMap<&str, &str> = [
            ("MAGI_FPS", "12"),
            ("MAGI_PARTICLES", "3"),
            ("MAGI_MATRIX_COLOR", "rgb(255, 140, 0)"),
        ]
        .into_iter()
        .collect();

        let config = StageConfig::resolve(&[path.clone()], |k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.render.fps, Some(12.0));
        assert_eq!(config.budget().particle_count, 3);
        assert_eq!(config.matrix.color, Color::rgba8(255, 140, 0, 1.0));

        cleanup(&path);
    }

    #[test]
    fn test_bad_env_value_is_an_error() {
        let result = StageConfig::resolve(&[], |k| (k == "MAGI_FPS").then(|| "fast".to_string()));
        assert!(matches!(result, Err(MagiError::InvalidConfig(_))));
    }

    #[test]
    fn test_validation() {
        assert!(StageConfig::from_toml_str("[render]\nfps = 0.0\n").is_err());
        assert!(StageConfig::from_toml_str("[matrix]\nfont_size = -1.0\n").is_err());
        assert!(StageConfig::from_toml_str("[viewport]\nwidth = 0\n").is_err());
        assert!(StageConfig::from_toml_str("[matrix]\ncolor = \"chartreuse\"\n").is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = std::env::temp_dir().join(format!("magi_missing_{}.toml", uuid::Uuid::new_v4()));
        assert!(matches!(
            StageConfig::resolve(&[path], no_env),
            Err(MagiError::IoError(_))
        ));
    }

    #[test]
    fn test_defaults_and_toml_roundtrip() {
        let config = StageConfig::default();
        assert_eq!(config.budget(), DeviceProfile::default().budget());

        let text = config.to_toml().unwrap();
        assert!(text.contains("[matrix]"));
        assert!(text.contains("color = \"#39ff14\""));
        let parsed: StageConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);

        // printed output loads back as a file layer too
        let mut custom = StageConfig::default();
        custom.device.offscreen_transfer = false;
        custom.particles.capacity = Some(40);
        let layered = StageConfig::from_toml_str(&custom.to_toml().unwrap()).unwrap();
        assert_eq!(layered, custom);
    }
}
