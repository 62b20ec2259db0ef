//! High-level run pipeline.
//!
//! [`run`] executes one complete pass: validate parameters, build the
//! process grid, acquire fields (file read or TEST-mode generation),
//! compute, write the per-order result files, and optionally verify
//! against the analytic closed forms. Progress is reported on stdout in
//! the order the phases execute; all errors abort the run.

use std::path::PathBuf;
use std::time::Instant;

use ndarray::s;

use crate::analysis::{self, VerifyReport};
use crate::config::Parameters;
use crate::engine::{self, SfOutput};
use crate::error::SfResult;
use crate::field::FieldSet;
use crate::io::{self, Hdf5Error};
use crate::partition::ProcessGrid;
use crate::types::{Grid, OrderRange};

/// Dataset base names for input components and output tensors.
#[derive(Clone, Debug)]
pub struct DatasetNames {
    pub u: String,
    pub v: String,
    pub w: String,
    pub theta: String,
    pub pll_out: String,
    pub perp_out: String,
    pub scalar_out: String,
}

impl Default for DatasetNames {
    fn default() -> Self {
        Self {
            u: "U.V1r".into(),
            v: "U.V2r".into(),
            w: "U.V3r".into(),
            theta: "T.Fr".into(),
            pll_out: "SF_Grid_pll".into(),
            perp_out: "SF_Grid_perp".into(),
            scalar_out: "SF_Grid_scalar".into(),
        }
    }
}

/// Everything a run needs beyond the parameter document.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub params: Parameters,
    /// Total logical rank count P (px * py).
    pub ranks: usize,
    pub names: DatasetNames,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl RunConfig {
    /// Defaults: P = Processors_X (a 1-wide second axis), standard
    /// dataset names, `in/` and `out/` directories.
    pub fn new(params: Parameters) -> Self {
        let ranks = params.program.processors_x;
        Self {
            params,
            ranks,
            names: DatasetNames::default(),
            input_dir: PathBuf::from("in"),
            output_dir: PathBuf::from("out"),
        }
    }
}

/// Timing and verification outcome of a completed run.
#[derive(Clone, Copy, Debug)]
pub struct RunSummary {
    /// Wall-clock seconds spent in the compute phase.
    pub compute_seconds: f64,
    /// Wall-clock seconds for the whole run.
    pub total_seconds: f64,
    /// Present when TEST mode verified against the closed forms.
    pub verification: Option<VerifyReport>,
}

/// Execute one full run.
pub fn run(cfg: &RunConfig) -> SfResult<RunSummary> {
    let t_total = Instant::now();

    cfg.params.validate()?;
    let grid = cfg.params.grid_geometry();
    let orders = cfg.params.order_range();
    let program = &cfg.params.program;
    let shape = grid.shape();
    let half_n2 = if program.two_dimensional {
        shape.half_nz()
    } else {
        shape.half_ny()
    };

    let pgrid = ProcessGrid::new(cfg.ranks, program.processors_x, shape.half_nx(), half_n2)?;
    println!("\nNumber of processors in x direction: {}", pgrid.px());
    if program.two_dimensional {
        println!("Number of processors in z direction: {}", pgrid.py());
    } else {
        println!("Number of processors in y direction: {}", pgrid.py());
    }

    let fields = load_fields(cfg, &grid)?;

    println!(
        "\n{}",
        SfOutput::describe_computation(&fields, program.only_longitudinal)
    );
    let t_compute = Instant::now();
    let output = engine::compute(&fields, &grid, &pgrid, &orders, program.only_longitudinal);
    let compute_seconds = t_compute.elapsed().as_secs_f64();

    write_outputs(cfg, &output, &orders)?;

    let verification = if cfg.params.test.test_switch {
        println!("\nCOMMENCING TESTING OF THE CODE.");
        let (label, report) = analysis::verify(&output, &grid, &orders);
        if report.passed() {
            println!(
                "\n{label}: TEST_PASSED. The computed structure functions match the analytically obtained values."
            );
        } else {
            println!(
                "\n{label}: TEST_FAILED. The computed structure functions do NOT match the analytically obtained values."
            );
        }
        println!("MAXIMUM ERROR: {:e}", report.max_error);
        Some(report)
    } else {
        None
    };

    Ok(RunSummary {
        compute_seconds,
        total_seconds: t_total.elapsed().as_secs_f64(),
        verification,
    })
}

fn load_fields(cfg: &RunConfig, grid: &Grid) -> SfResult<FieldSet> {
    let program = &cfg.params.program;
    let (two_d, scalar) = (program.two_dimensional, program.scalar_switch);
    let s = grid.shape();

    if cfg.params.test.test_switch {
        println!(
            "\nWARNING: The code is running in TEST mode. It will generate velocity / scalar fields and will take them as inputs."
        );
        let profile = match (two_d, scalar) {
            (false, false) => "U = [x, y, z]",
            (true, false) => "U = [x, z]",
            (false, true) => "T = x + y + z",
            (true, true) => "T = x + z",
        };
        println!("\nGenerating the field: {profile}");
        let fields = FieldSet::linear_profile(grid, two_d, scalar);
        println!("Field has been generated.");
        return Ok(fields);
    }

    println!("Reading from the hdf5 files");
    let dir = &cfg.input_dir;
    let names = &cfg.names;
    let fields = match (two_d, scalar) {
        (true, true) => FieldSet::Scalar2D {
            theta: io::read_field_2d(dir, &names.theta, s.nx(), s.nz())?,
        },
        (true, false) => FieldSet::Vector2D {
            u: io::read_field_2d(dir, &names.u, s.nx(), s.nz())?,
            w: io::read_field_2d(dir, &names.w, s.nx(), s.nz())?,
        },
        (false, true) => FieldSet::Scalar3D {
            theta: io::read_field_3d(dir, &names.theta, s.nx(), s.ny(), s.nz())?,
        },
        (false, false) => FieldSet::Vector3D {
            u: io::read_field_3d(dir, &names.u, s.nx(), s.ny(), s.nz())?,
            v: io::read_field_3d(dir, &names.v, s.nx(), s.ny(), s.nz())?,
            w: io::read_field_3d(dir, &names.w, s.nx(), s.ny(), s.nz())?,
        },
    };
    Ok(fields)
}

fn write_outputs(cfg: &RunConfig, output: &SfOutput, orders: &OrderRange) -> SfResult<()> {
    if !io::hdf5_enabled() {
        if cfg.params.test.test_switch {
            eprintln!("NOTE: built without the 'hdf5' feature; result files are skipped.");
            return Ok(());
        }
        return Err(Hdf5Error::FeatureDisabled.into());
    }

    let dir = &cfg.output_dir;
    let names = &cfg.names;
    for (idx, q) in orders.exponents().enumerate() {
        match output {
            SfOutput::Vector2D { pll, perp } => {
                println!("\nWriting {q} order SF as function of lx and lz");
                let name = format!("{}{}", names.pll_out, q);
                io::write_tensor_2d(dir, &name, pll.slice(s![.., .., idx]))?;
                if let Some(perp) = perp {
                    let name = format!("{}{}", names.perp_out, q);
                    io::write_tensor_2d(dir, &name, perp.slice(s![.., .., idx]))?;
                }
            }
            SfOutput::Scalar2D { theta } => {
                println!("\nWriting {q} order SF as function of lx and lz");
                let name = format!("{}{}", names.scalar_out, q);
                io::write_tensor_2d(dir, &name, theta.slice(s![.., .., idx]))?;
            }
            SfOutput::Vector3D { pll, perp } => {
                println!("\nWriting {q} order SF as function of lx, ly, and lz");
                let name = format!("{}{}", names.pll_out, q);
                io::write_tensor_3d(dir, &name, pll.slice(s![.., .., .., idx]))?;
                if let Some(perp) = perp {
                    let name = format!("{}{}", names.perp_out, q);
                    io::write_tensor_3d(dir, &name, perp.slice(s![.., .., .., idx]))?;
                }
            }
            SfOutput::Scalar3D { theta } => {
                println!("\nWriting {q} order SF as function of lx, ly, and lz");
                let name = format!("{}{}", names.scalar_out, q);
                io::write_tensor_3d(dir, &name, theta.slice(s![.., .., .., idx]))?;
            }
        }
        println!("Writing completed");
    }
    Ok(())
}
