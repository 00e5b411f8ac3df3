//! Dataset commands: generate, replicates, validate, summarize, loglik.

use anyhow::{Context, Result, bail};
use occu_core::OccupancyData;
use occu_sim::{Simulation, SimulationConfig};
use serde::Deserialize;
use std::path::PathBuf;

use crate::SimArgs;
use crate::config_io::resolve_sim_config;

/// Either `generate --include-truth` output or a bare data list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DatasetJson {
    WithTruth(Simulation),
    Bare(OccupancyData),
}

fn read_dataset(input: &PathBuf) -> Result<DatasetJson> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("reading dataset {}", input.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} is neither a data list nor a simulation", input.display()))
}

fn simulation_json(
    cfg: &SimulationConfig,
    sim: &Simulation,
    include_truth: bool,
) -> Result<serde_json::Value> {
    if include_truth {
        Ok(serde_json::json!({
            "config": cfg,
            "data": sim.data,
            "truth": sim.truth,
        }))
    } else {
        Ok(serde_json::to_value(&sim.data)?)
    }
}

// ---------------------------------------------------------------------------
// generate / replicates
// ---------------------------------------------------------------------------

pub fn cmd_generate(args: &SimArgs, output: Option<&PathBuf>) -> Result<()> {
    let cfg = resolve_sim_config(args)?;
    let sim = occu_sim::generate_occupancy_dataset(&cfg)?;
    let value = simulation_json(&cfg, &sim, args.include_truth)?;
    crate::write_json(output, &value)
}

pub fn cmd_replicates(args: &SimArgs, n: usize, output: Option<&PathBuf>) -> Result<()> {
    let cfg = resolve_sim_config(args)?;
    let reps = occu_sim::generate_replicates(&cfg, n)?;
    let replicates = reps
        .iter()
        .map(|rep| {
            let rcfg = SimulationConfig { seed: rep.seed, ..cfg.clone() };
            simulation_json(&rcfg, &rep.simulation, args.include_truth)
        })
        .collect::<Result<Vec<_>>>()?;

    let value = serde_json::json!({
        "n_replicates": n,
        "base_seed": cfg.seed,
        "replicates": replicates,
    });
    crate::write_json(output, &value)
}

// ---------------------------------------------------------------------------
// validate / summarize / loglik
// ---------------------------------------------------------------------------

pub fn cmd_validate(input: &PathBuf) -> Result<()> {
    let data = match read_dataset(input)? {
        DatasetJson::WithTruth(sim) => sim.data,
        DatasetJson::Bare(data) => data,
    };
    data.validate()?;
    let value = serde_json::json!({
        "valid": true,
        "Nobs": data.n_obs,
        "n_species": data.n_species(),
        "n_covariates": data.n_covariates(),
    });
    crate::write_json(None, &value)
}

pub fn cmd_summarize(input: &PathBuf, output: Option<&PathBuf>) -> Result<()> {
    let summary = match read_dataset(input)? {
        DatasetJson::WithTruth(sim) => occu_sim::summarize(&sim.data, Some(&sim.truth))?,
        DatasetJson::Bare(data) => occu_sim::summarize(&data, None)?,
    };
    crate::write_json(output, &serde_json::to_value(&summary)?)
}

pub fn cmd_loglik(input: &PathBuf, pointwise: bool, output: Option<&PathBuf>) -> Result<()> {
    let sim = match read_dataset(input)? {
        DatasetJson::WithTruth(sim) => sim,
        DatasetJson::Bare(_) => {
            bail!("{} has no truth; generate it with --include-truth", input.display())
        }
    };
    let pw = occu_sim::pointwise_log_likelihood(&sim.data, &sim.truth.effects)?;
    let total: f64 = pw.iter().sum();

    let mut value = serde_json::json!({
        "Nobs": sim.data.n_obs,
        "log_likelihood": total,
    });
    if pointwise {
        value["pointwise"] = serde_json::json!(pw);
    }
    crate::write_json(output, &value)
}
