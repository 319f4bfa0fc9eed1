use std::time::{Duration, Instant};

use clap::Parser;
use mazegen::{GenerationStatus, Generator, MazeGenerator, create_generator, maze::NoopObserver};

/// Time every generator on the same grid size, without rendering.
#[derive(Debug, Parser)]
struct Args {
    /// Runs per generator
    #[arg(default_value_t = 10)]
    iterations: usize,

    /// Maze width in cells
    #[arg(default_value_t = 100)]
    width: usize,

    /// Maze height in cells
    #[arg(default_value_t = 100)]
    height: usize,

    /// Seed of the first run, incremented for each following run
    #[arg(short, long)]
    seed: Option<u64>,
}

struct Report {
    total: Duration,
    iterations: usize,
}

fn profile(generator: Generator, args: &Args) -> Result<Report, Box<dyn std::error::Error>> {
    let mut report = Report {
        total: Duration::ZERO,
        iterations: 0,
    };
    for run in 0..args.iterations {
        let seed = args.seed.map(|seed| seed.wrapping_add(run as u64));
        let mut maze: Box<dyn MazeGenerator> =
            create_generator(generator, args.width, args.height, Box::new(NoopObserver), seed)?;

        let start = Instant::now();
        maze.initialize();
        let mut iterations = 0;
        while maze.generation_status() == GenerationStatus::Ongoing {
            maze.compute_one_generation_iteration();
            iterations += 1;
        }
        report.total += start.elapsed();
        report.iterations += iterations;

        if !maze.paths().is_spanning_tree() {
            return Err(format!("{} produced a grid that is not a spanning tree", generator).into());
        }
    }
    Ok(report)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    if args.iterations == 0 {
        return Ok(());
    }
    println!(
        "Profiling {} runs per generator on a {}x{} grid",
        args.iterations, args.width, args.height
    );
    for generator in Generator::ALL {
        let report = profile(generator, &args)?;
        println!(
            "{:<40} avg {:>10.3?}  total {:>10.3?}  avg iterations {}",
            generator.to_string(),
            report.total / args.iterations as u32,
            report.total,
            report.iterations / args.iterations,
        );
    }
    Ok(())
}
