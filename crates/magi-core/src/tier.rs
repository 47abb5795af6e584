//! Device capability probing and the effect budget derived from it

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse device capability class. Derived once at startup, immutable after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceTier {
    Low,
    Medium,
    High,
    Ultra,
}

impl fmt::Display for PerformanceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PerformanceTier::Low => "low",
            PerformanceTier::Medium => "medium",
            PerformanceTier::High => "high",
            PerformanceTier::Ultra => "ultra",
        };
        f.write_str(name)
    }
}

/// What the host environment reports about the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    /// Phone/tablet class user agent
    #[serde(default)]
    pub mobile: bool,
    /// Primary input is touch
    #[serde(default)]
    pub touch: bool,
    /// Approximate device memory in GB
    #[serde(default = "default_memory_gb")]
    pub memory_gb: f32,
    /// Logical core count
    #[serde(default = "default_cores")]
    pub cores: u32,
    /// User asked for reduced motion / power saving
    #[serde(default)]
    pub reduced_motion: bool,
    /// Canvas control can be transferred to an offscreen surface
    #[serde(default = "default_true")]
    pub offscreen_transfer: bool,
}

fn default_memory_gb() -> f32 {
    4.0
}

fn default_cores() -> u32 {
    4
}

fn default_true() -> bool {
    true
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self {
            mobile: false,
            touch: false,
            memory_gb: default_memory_gb(),
            cores: default_cores(),
            reduced_motion: false,
            offscreen_transfer: true,
        }
    }
}

impl DeviceProfile {
    /// Profile of the machine this process runs on. Memory is not queryable
    /// portably, so it stays at the 4 GB default like an unreporting browser.
    pub fn detect() -> Self {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get() as u32)
            .unwrap_or_else(|_| default_cores());
        Self {
            cores,
            ..Self::default()
        }
    }

    /// Desktop is always `Ultra`; mobile devices are graded by memory and cores.
    pub fn tier(&self) -> PerformanceTier {
        if !self.mobile {
            return PerformanceTier::Ultra;
        }
        if self.memory_gb <= 2.0 || self.cores <= 2 {
            PerformanceTier::Low
        } else if self.memory_gb <= 4.0 || self.cores <= 4 {
            PerformanceTier::Medium
        } else {
            PerformanceTier::High
        }
    }

    pub fn budget(&self) -> EffectBudget {
        EffectBudget::for_profile(self)
    }
}

/// Derived constants that scale effect intensity to the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectBudget {
    pub tier: PerformanceTier,
    pub target_fps: f64,
    pub particle_count: usize,
    pub matrix_rain: bool,
    pub lcl: bool,
    pub particles: bool,
    pub sonic_wave: bool,
    pub cursor_trail: bool,
}

impl EffectBudget {
    pub fn for_profile(profile: &DeviceProfile) -> Self {
        let tier = profile.tier();
        let particle_count = if profile.reduced_motion {
            0
        } else {
            match tier {
                PerformanceTier::Low => 15,
                PerformanceTier::Medium => 30,
                PerformanceTier::High => 50,
                PerformanceTier::Ultra => 150,
            }
        };
        let animated = !profile.reduced_motion && tier != PerformanceTier::Low;

        Self {
            tier,
            target_fps: if profile.mobile { 20.0 } else { 30.0 },
            particle_count,
            matrix_rain: animated,
            lcl: !profile.mobile,
            particles: animated,
            sonic_wave: !profile.mobile || tier == PerformanceTier::High,
            cursor_trail: !profile.touch,
        }
    }
}
