//! Long-format occupancy data contract.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One row per (species, site) pair, all columns aligned by row position.
///
/// Field names serialize to the names the inference engine's model text
/// refers to (`Y`, `Species`, `X`, `J`, `Nobs`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupancyData {
    /// Observed detection counts, each in `[0, J[i]]`.
    #[serde(rename = "Y")]
    pub y: Vec<u64>,

    /// 1-indexed species identifier per row.
    #[serde(rename = "Species")]
    pub species: Vec<u64>,

    /// Covariate row per observation (`Nobs × n_covariates`).
    #[serde(rename = "X")]
    pub x: Vec<Vec<f64>>,

    /// Number of repeat surveys per row.
    #[serde(rename = "J")]
    pub j: Vec<u64>,

    /// Number of rows.
    #[serde(rename = "Nobs")]
    pub n_obs: usize,
}

impl OccupancyData {
    /// Number of distinct species (largest 1-indexed id).
    pub fn n_species(&self) -> usize {
        self.species.iter().copied().max().unwrap_or(0) as usize
    }

    /// Number of covariate columns (0 for an empty table).
    pub fn n_covariates(&self) -> usize {
        self.x.first().map_or(0, Vec::len)
    }

    /// Check the shape and value ranges the inference engine relies on.
    pub fn validate(&self) -> Result<()> {
        if self.n_obs == 0 {
            return Err(Error::InvalidParameter("Nobs must be > 0".into()));
        }
        for (name, len) in [
            ("Y", self.y.len()),
            ("Species", self.species.len()),
            ("X", self.x.len()),
            ("J", self.j.len()),
        ] {
            if len != self.n_obs {
                return Err(Error::InvalidParameter(format!(
                    "{name} has length {len}, expected Nobs={}",
                    self.n_obs
                )));
            }
        }

        let k = self.n_covariates();
        for (row, xr) in self.x.iter().enumerate() {
            if xr.len() != k {
                return Err(Error::InvalidParameter(format!(
                    "X row {row} has {} columns, expected {k}",
                    xr.len()
                )));
            }
            if let Some(v) = xr.iter().find(|v| !v.is_finite()) {
                return Err(Error::InvalidParameter(format!("X row {row} contains {v}")));
            }
        }

        for row in 0..self.n_obs {
            if self.j[row] == 0 {
                return Err(Error::InvalidParameter(format!("J[{row}] must be >= 1")));
            }
            if self.y[row] > self.j[row] {
                return Err(Error::InvalidParameter(format!(
                    "Y[{row}]={} exceeds J[{row}]={}",
                    self.y[row], self.j[row]
                )));
            }
        }

        // Species ids must cover 1..=S without gaps, so S <= Nobs.
        for (row, &s) in self.species.iter().enumerate() {
            if s == 0 {
                return Err(Error::InvalidParameter(format!(
                    "Species[{row}] is 0; species ids are 1-indexed"
                )));
            }
            if s > self.n_obs as u64 {
                return Err(Error::InvalidParameter(format!(
                    "Species[{row}]={s} exceeds Nobs={}",
                    self.n_obs
                )));
            }
        }
        let mut seen = vec![false; self.n_species()];
        for &s in &self.species {
            seen[(s - 1) as usize] = true;
        }
        if let Some(missing) = seen.iter().position(|&b| !b) {
            return Err(Error::InvalidParameter(format!(
                "species id {} has no rows",
                missing + 1
            )));
        }
        Ok(())
    }
}
