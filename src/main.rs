//! `heated_plate` command-line entry point.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use heated_plate::output::save_grid;
use heated_plate::{
    BoundaryConditions, HeatedPlate, PlateOptions, PowerOfTwoReporter, SolverOptions,
};

/// Solve for the steady state temperature distribution over a rectangular plate.
#[derive(Debug, Parser)]
#[command(name = "heated_plate", version, about)]
struct Args {
    /// Error tolerance; prompted for on stdin when omitted
    epsilon: Option<f64>,

    /// File the steady state solution is written to; prompted for when omitted
    output: Option<PathBuf>,

    /// Number of grid rows (M)
    #[arg(long, default_value_t = 1000)]
    rows: usize,

    /// Number of grid columns (N)
    #[arg(long, default_value_t = 1000)]
    cols: usize,

    /// Temperature of the south, west and east edges
    #[arg(long, default_value_t = 100.0)]
    hot: f64,

    /// Temperature of the north edge
    #[arg(long, default_value_t = 0.0)]
    cold: f64,

    /// Abort if the tolerance is not met after this many iterations
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Spread each pass over all available cores
    #[arg(long)]
    parallel: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    println!("HEATED_PLATE");
    println!("  A program to solve for the steady state temperature distribution");
    println!("  over a rectangular plate.");
    println!();
    println!("  Spatial grid of {} by {} points.", args.rows, args.cols);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let epsilon = match args.epsilon {
        Some(epsilon) => epsilon,
        None => prompt(&mut input, "Enter EPSILON, the error tolerance:")?
            .parse()
            .context("error reading in the value of EPSILON")?,
    };
    println!("  The iteration will be repeated until the change is <= {epsilon}");

    let output = match args.output {
        Some(path) => path,
        None => {
            let name = prompt(&mut input, "Enter OUTPUT_FILENAME, the name of the output file:")?;
            if name.is_empty() {
                bail!("error reading in the value of OUTPUT_FILENAME");
            }
            PathBuf::from(name)
        }
    };
    println!(
        "  The steady state solution will be written to \"{}\".",
        output.display()
    );

    let mut solver = SolverOptions::with_tolerance(epsilon).parallel(args.parallel);
    solver.max_iterations = args.max_iterations;
    let options = PlateOptions::default()
        .with_dimensions(args.rows, args.cols)
        .with_boundary(BoundaryConditions::heated_plate(args.hot, args.cold))
        .with_solver(solver);
    let plate = HeatedPlate::new(options).context("invalid plate configuration")?;

    let mut reporter = PowerOfTwoReporter::new(io::stdout());
    let solution = plate.solve_with_observer(&mut reporter)?;
    reporter
        .finish(&solution.summary)
        .context("failed to write progress")?;
    println!();
    println!("  Error tolerance achieved.");

    save_grid(&solution.grid, &output)
        .with_context(|| format!("failed to write {}", output.display()))?;
    log::info!("solution written to {}", output.display());
    println!();
    println!("HEATED_PLATE:");
    println!("  Normal end of execution.");
    Ok(())
}

fn prompt<R: BufRead>(input: &mut R, message: &str) -> Result<String> {
    println!();
    println!("  {message}");
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("unexpected end of input");
    }
    Ok(line.trim().to_string())
}
