//! Per-species detection summaries of a long-format dataset.

use occu_core::{Error, OccupancyData, Result};
use serde::Serialize;

use crate::generator::OccupancyTruth;

/// Detection summary for one species.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeciesSummary {
    /// 1-indexed species id.
    pub species: u64,
    /// Rows (sites) for this species.
    pub n_sites: usize,
    /// Sites with at least one detection.
    pub n_detected_sites: usize,
    /// `n_detected_sites / n_sites`; a lower bound on true occupancy.
    pub naive_occupancy: f64,
    /// Sum of detection counts.
    pub total_detections: u64,
    /// Fraction of sites truly occupied, when the truth is known.
    pub true_occupancy: Option<f64>,
}

/// Whole-dataset summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    /// Number of rows.
    pub n_obs: usize,
    /// Number of species.
    pub n_species: usize,
    /// Number of covariate columns.
    pub n_covariates: usize,
    /// Sum of `J` over rows.
    pub total_surveys: u64,
    /// Fraction of rows with at least one detection.
    pub naive_occupancy: f64,
    /// Per-species breakdown, ordered by species id.
    pub species: Vec<SpeciesSummary>,
}

/// Summarize a dataset, optionally against the latent states it was drawn from.
pub fn summarize(data: &OccupancyData, truth: Option<&OccupancyTruth>) -> Result<DatasetSummary> {
    data.validate()?;
    if let Some(t) = truth {
        if t.z.len() != data.n_obs {
            return Err(Error::InvalidParameter(format!(
                "truth has {} latent states, data has {} rows",
                t.z.len(),
                data.n_obs
            )));
        }
    }

    let n_species = data.n_species();
    let mut n_sites = vec![0usize; n_species];
    let mut detected = vec![0usize; n_species];
    let mut totals = vec![0u64; n_species];
    let mut occupied = vec![0usize; n_species];

    for row in 0..data.n_obs {
        let s = (data.species[row] - 1) as usize;
        n_sites[s] += 1;
        totals[s] += data.y[row];
        if data.y[row] > 0 {
            detected[s] += 1;
        }
        if let Some(t) = truth {
            occupied[s] += usize::from(t.z[row]);
        }
    }

    let species = (0..n_species)
        .map(|s| SpeciesSummary {
            species: (s + 1) as u64,
            n_sites: n_sites[s],
            n_detected_sites: detected[s],
            naive_occupancy: detected[s] as f64 / n_sites[s] as f64,
            total_detections: totals[s],
            true_occupancy: truth.map(|_| occupied[s] as f64 / n_sites[s] as f64),
        })
        .collect();

    Ok(DatasetSummary {
        n_obs: data.n_obs,
        n_species,
        n_covariates: data.n_covariates(),
        total_surveys: data.j.iter().sum(),
        naive_occupancy: detected.iter().sum::<usize>() as f64 / data.n_obs as f64,
        species,
    })
}
