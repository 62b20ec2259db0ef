//! Run parameters: the YAML document and its validation.
//!
//! Parameters are read from `<input>/para.yaml` and may be overridden
//! one-by-one from the command line. The document mirrors the historical
//! key set:
//!
//! ```yaml
//! program:
//!   scalar_switch: false
//!   Only_longitudinal: true
//!   2D_switch: true
//!   Processors_X: 2
//! grid: { Nx: 32, Ny: 32, Nz: 32 }
//! domain_dimension: { Lx: 1.0, Ly: 1.0, Lz: 1.0 }
//! structure_function: { q1: 1, q2: 4 }
//! test: { test_switch: true }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Domain, Grid, GridShape, OrderRange};

/// Errors raised while loading or validating the parameter document.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to open parameter file '{path}': {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },
    #[error("error reading parameter file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid boolean '{0}' (expected true, 1, false, or 0)")]
    InvalidSwitch(String),
    #[error("invalid parameters: {0}")]
    Invalid(String),
}

/// The full parameter document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Parameters {
    pub program: ProgramSection,
    pub grid: GridSection,
    pub domain_dimension: DomainSection,
    pub structure_function: OrderSection,
    pub test: TestSection,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgramSection {
    /// Compute scalar structure functions instead of velocity ones.
    pub scalar_switch: bool,
    /// Skip the transverse component, computing only the longitudinal one.
    #[serde(rename = "Only_longitudinal")]
    pub only_longitudinal: bool,
    /// Treat the input as 2D fields over (x, z).
    #[serde(rename = "2D_switch")]
    pub two_dimensional: bool,
    /// Ranks along the x axis of the process grid.
    #[serde(rename = "Processors_X")]
    pub processors_x: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GridSection {
    #[serde(rename = "Nx")]
    pub nx: usize,
    #[serde(rename = "Ny")]
    pub ny: usize,
    #[serde(rename = "Nz")]
    pub nz: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DomainSection {
    #[serde(rename = "Lx")]
    pub lx: f64,
    #[serde(rename = "Ly")]
    pub ly: f64,
    #[serde(rename = "Lz")]
    pub lz: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrderSection {
    pub q1: i32,
    pub q2: i32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestSection {
    pub test_switch: bool,
}

impl Parameters {
    /// Load and parse the YAML parameter document.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Open {
            path: path.display().to_string(),
            source,
        })?;
        let params: Parameters = serde_yaml::from_str(&content)?;
        Ok(params)
    }

    /// Check value-level constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.nx == 0 || self.grid.ny == 0 || self.grid.nz == 0 {
            return Err(ConfigError::Invalid(format!(
                "grid sizes must be positive, got {}x{}x{}",
                self.grid.nx, self.grid.ny, self.grid.nz
            )));
        }
        if self.structure_function.q1 > self.structure_function.q2 {
            return Err(ConfigError::Invalid(format!(
                "q1 ({}) must not exceed q2 ({})",
                self.structure_function.q1, self.structure_function.q2
            )));
        }
        if self.program.processors_x == 0 {
            return Err(ConfigError::Invalid(
                "Processors_X must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Grid geometry implied by the document.
    pub fn grid_geometry(&self) -> Grid {
        Grid::new(
            GridShape::new(self.grid.nx, self.grid.ny, self.grid.nz),
            Domain::new(
                self.domain_dimension.lx,
                self.domain_dimension.ly,
                self.domain_dimension.lz,
            ),
        )
    }

    /// Order range implied by the document.
    ///
    /// # Panics
    ///
    /// Panics if called before [`Parameters::validate`] on an inverted
    /// range.
    pub fn order_range(&self) -> OrderRange {
        OrderRange::new(self.structure_function.q1, self.structure_function.q2)
            .expect("validated order range")
    }
}

/// Parse a command-line boolean: `true`/`1` or `false`/`0`.
pub fn parse_switch(s: &str) -> Result<bool, ConfigError> {
    match s {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(ConfigError::InvalidSwitch(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "\
program:
  scalar_switch: false
  Only_longitudinal: true
  2D_switch: false
  Processors_X: 2
grid:
  Nx: 32
  Ny: 32
  Nz: 32
domain_dimension:
  Lx: 1.0
  Ly: 1.0
  Lz: 1.0
structure_function:
  q1: 1
  q2: 4
test:
  test_switch: true
";

    #[test]
    fn test_parse_document() {
        let p: Parameters = serde_yaml::from_str(DOC).unwrap();
        assert!(!p.program.scalar_switch);
        assert!(p.program.only_longitudinal);
        assert!(!p.program.two_dimensional);
        assert_eq!(p.program.processors_x, 2);
        assert_eq!(p.grid.nx, 32);
        assert_eq!(p.structure_function.q2, 4);
        assert!(p.test.test_switch);
        p.validate().unwrap();
    }

    #[test]
    fn test_missing_key_rejected() {
        let doc = DOC.replace("  Nz: 32\n", "");
        assert!(serde_yaml::from_str::<Parameters>(&doc).is_err());
    }

    #[test]
    fn test_inverted_orders_rejected() {
        let mut p: Parameters = serde_yaml::from_str(DOC).unwrap();
        p.structure_function.q1 = 5;
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_parse_switch() {
        assert!(parse_switch("true").unwrap());
        assert!(parse_switch("1").unwrap());
        assert!(!parse_switch("false").unwrap());
        assert!(!parse_switch("0").unwrap());
        assert!(parse_switch("yes").is_err());
    }

    #[test]
    fn test_grid_geometry() {
        let p: Parameters = serde_yaml::from_str(DOC).unwrap();
        let grid = p.grid_geometry();
        assert_eq!(grid.shape().half_nx(), 16);
        assert!((grid.dx() - 1.0 / 31.0).abs() < 1e-15);
    }
}
