use std::path::PathBuf;
use std::process;

use clap::Parser;

use sfgrid::config::Parameters;
use sfgrid::error::SfResult;
use sfgrid::io::INPUT_CHECKLIST;
use sfgrid::runner::{self, RunConfig};

/// Structure functions over 2D/3D gridded turbulence fields.
///
/// All parameters are read from `<input>/para.yaml`; every option here
/// overrides one value from that document. Boolean options take
/// `true|1|false|0`.
#[derive(Parser)]
#[command(name = "sfgrid", about)]
struct Cli {
    /// Grid points along x
    #[arg(short = 'X', long = "nx", value_name = "NX")]
    nx: Option<usize>,
    /// Grid points along y
    #[arg(short = 'Y', long = "ny", value_name = "NY")]
    ny: Option<usize>,
    /// Grid points along z
    #[arg(short = 'Z', long = "nz", value_name = "NZ")]
    nz: Option<usize>,
    /// Domain extent along x
    #[arg(short = 'x', long = "lx", value_name = "LX")]
    lx: Option<f64>,
    /// Domain extent along y
    #[arg(short = 'y', long = "ly", value_name = "LY")]
    ly: Option<f64>,
    /// Domain extent along z
    #[arg(short = 'z', long = "lz", value_name = "LZ")]
    lz: Option<f64>,
    /// Ranks along the x axis of the process grid
    #[arg(short = 'p', long = "procs-x", value_name = "PX")]
    processors_x: Option<usize>,
    /// First order of the range
    #[arg(short = '1', long = "q1")]
    q1: Option<i32>,
    /// Last order of the range
    #[arg(short = '2', long = "q2")]
    q2: Option<i32>,
    /// Run in TEST mode (generate fields and verify)
    #[arg(short = 't', long = "test", value_parser = switch, value_name = "BOOL")]
    test: Option<bool>,
    /// Compute scalar instead of velocity structure functions
    #[arg(short = 's', long = "scalar", value_parser = switch, value_name = "BOOL")]
    scalar: Option<bool>,
    /// Treat the input as 2D fields over (x, z)
    #[arg(short = 'd', long = "two-dim", value_parser = switch, value_name = "BOOL")]
    two_dim: Option<bool>,
    /// Compute only the longitudinal component
    #[arg(short = 'l', long = "longitudinal", value_parser = switch, value_name = "BOOL")]
    longitudinal: Option<bool>,
    /// Dataset base of the x velocity component
    #[arg(short = 'U', long = "u-name", value_name = "NAME")]
    u_name: Option<String>,
    /// Dataset base of the y velocity component
    #[arg(short = 'V', long = "v-name", value_name = "NAME")]
    v_name: Option<String>,
    /// Dataset base of the z velocity component
    #[arg(short = 'W', long = "w-name", value_name = "NAME")]
    w_name: Option<String>,
    /// Output base of the transverse tensors
    #[arg(short = 'P', long = "perp-out", value_name = "NAME")]
    perp_out: Option<String>,
    /// Output base of the longitudinal tensors
    #[arg(short = 'L', long = "pll-out", value_name = "NAME")]
    pll_out: Option<String>,
    /// Output base of the scalar tensors
    #[arg(short = 'M', long = "scalar-out", value_name = "NAME")]
    scalar_out: Option<String>,
    /// Total logical rank count P (defaults to Processors_X)
    #[arg(short = 'n', long = "ranks", value_name = "P")]
    ranks: Option<usize>,
    /// Input directory holding para.yaml and the field files
    #[arg(short = 'i', long = "input", value_name = "DIR")]
    input: Option<PathBuf>,
    /// Output directory for the result files
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    output: Option<PathBuf>,
}

fn switch(s: &str) -> Result<bool, String> {
    sfgrid::parse_switch(s).map_err(|e| e.to_string())
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("\n{err}\n");
        if err.wants_checklist() {
            eprintln!("{INPUT_CHECKLIST}");
        }
        process::exit(1);
    }
}

fn run_cli() -> SfResult<()> {
    let cli = Cli::parse();

    let input_dir = cli.input.clone().unwrap_or_else(|| PathBuf::from("in"));
    let mut params = Parameters::from_yaml_file(&input_dir.join("para.yaml"))?;
    overlay(&mut params, &cli);

    let mut cfg = RunConfig::new(params);
    cfg.input_dir = input_dir;
    if let Some(dir) = cli.output {
        cfg.output_dir = dir;
    }
    if let Some(ranks) = cli.ranks {
        cfg.ranks = ranks;
    }
    if let Some(name) = cli.u_name {
        cfg.names.u = name;
    }
    if let Some(name) = cli.v_name {
        cfg.names.v = name;
    }
    if let Some(name) = cli.w_name {
        cfg.names.w = name;
    }
    if let Some(name) = cli.pll_out {
        cfg.names.pll_out = name;
    }
    if let Some(name) = cli.perp_out {
        cfg.names.perp_out = name;
    }
    if let Some(name) = cli.scalar_out {
        cfg.names.scalar_out = name;
    }

    let summary = runner::run(&cfg)?;

    println!(
        "\nTime elapsed for the parallel part: {:.6} s",
        summary.compute_seconds
    );
    println!("\nTotal time elapsed: {:.6} s", summary.total_seconds);
    println!("\nProgram ends.");
    Ok(())
}

fn overlay(params: &mut Parameters, cli: &Cli) {
    if let Some(v) = cli.nx {
        params.grid.nx = v;
    }
    if let Some(v) = cli.ny {
        params.grid.ny = v;
    }
    if let Some(v) = cli.nz {
        params.grid.nz = v;
    }
    if let Some(v) = cli.lx {
        params.domain_dimension.lx = v;
    }
    if let Some(v) = cli.ly {
        params.domain_dimension.ly = v;
    }
    if let Some(v) = cli.lz {
        params.domain_dimension.lz = v;
    }
    if let Some(v) = cli.processors_x {
        params.program.processors_x = v;
    }
    if let Some(v) = cli.q1 {
        params.structure_function.q1 = v;
    }
    if let Some(v) = cli.q2 {
        params.structure_function.q2 = v;
    }
    if let Some(v) = cli.test {
        params.test.test_switch = v;
    }
    if let Some(v) = cli.scalar {
        params.program.scalar_switch = v;
    }
    if let Some(v) = cli.two_dim {
        params.program.two_dimensional = v;
    }
    if let Some(v) = cli.longitudinal {
        params.program.only_longitudinal = v;
    }
}
