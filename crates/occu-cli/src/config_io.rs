//! Simulation config files and command-line overrides.

use anyhow::{Context, Result, bail};
use occu_sim::{CovariateEffect, EffectType, SimulationConfig};
use std::path::Path;

use crate::SimArgs;

pub fn read_sim_config(path: &Path) -> Result<SimulationConfig> {
    let bytes =
        std::fs::read(path).with_context(|| format!("reading config {}", path.display()))?;
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("").to_ascii_lowercase();
    let cfg: SimulationConfig = if ext == "json" {
        serde_json::from_slice(&bytes)?
    } else {
        serde_yaml_ng::from_slice(&bytes)?
    };
    Ok(cfg)
}

/// Config file (or the built-in default) with command-line flags applied.
pub fn resolve_sim_config(args: &SimArgs) -> Result<SimulationConfig> {
    let mut cfg = match &args.config {
        Some(path) => read_sim_config(path)?,
        None => SimulationConfig::default(),
    };

    if let Some(v) = args.species {
        cfg.num_species = v;
    }
    if let Some(v) = args.sites {
        cfg.num_sites = v;
    }
    if let Some(v) = args.covariates {
        cfg.num_covariates = v;
    }
    if let Some(v) = args.surveys {
        cfg.num_surveys = v;
    }
    if let Some(v) = args.seed {
        cfg.seed = v;
    }

    if let Some(k) = args.fixed.iter().find(|k| args.random.contains(k)) {
        bail!("covariate {k} is flagged both --fixed and --random");
    }
    let flagged = args
        .fixed
        .iter()
        .map(|&k| (k, EffectType::Fixed))
        .chain(args.random.iter().map(|&k| (k, EffectType::Random)));
    for (k, effect) in flagged {
        match cfg.effects.iter_mut().find(|e| e.covariate == k) {
            Some(existing) => existing.effect = effect,
            None => cfg.effects.push(CovariateEffect {
                covariate: k,
                effect,
                slope: cfg.default_slope,
            }),
        }
    }

    tracing::debug!(?cfg, "resolved simulation config");
    Ok(cfg)
}

pub fn cmd_config_template(yaml: bool) -> Result<()> {
    let cfg = SimulationConfig::default();
    if yaml {
        print!("{}", serde_yaml_ng::to_string(&cfg)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&cfg)?);
    }
    Ok(())
}
