//! Probe command

use anyhow::{Context, Result};
use magi_core::{DeviceProfile, EffectBudget};
use serde::Serialize;

pub struct ProbeArgs {
    pub mobile: bool,
    pub touch: bool,
    pub memory: Option<f32>,
    pub cores: Option<u32>,
    pub reduced_motion: bool,
}

#[derive(Serialize)]
struct ProbeOutput {
    profile: DeviceProfile,
    budget: EffectBudget,
}

pub fn run(args: ProbeArgs) -> Result<()> {
    let detected = DeviceProfile::detect();
    let profile = DeviceProfile {
        mobile: args.mobile,
        touch: args.touch,
        memory_gb: args.memory.unwrap_or(detected.memory_gb),
        cores: args.cores.unwrap_or(detected.cores),
        reduced_motion: args.reduced_motion,
        ..detected
    };
    if profile.memory_gb <= 0.0 || profile.cores == 0 {
        anyhow::bail!("memory and cores must be positive");
    }

    let output = ProbeOutput {
        budget: profile.budget(),
        profile,
    };
    let json = serde_json::to_string_pretty(&output).context("Failed to serialize probe")?;
    println!("{}", json);
    Ok(())
}
