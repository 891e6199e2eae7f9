//! Benchmark the projection strategies against a serial baseline.
//!
//! Run with: cargo run --release
//!
//! Usage:
//!   parproj                     Run the default size (1m points)
//!   parproj 100k 1m 8m          Run multiple sizes
//!   parproj --threads 12        Fix the parallel worker count
//!   parproj --compare-lifetime  Also run with per-point projectors
//!   parproj -n 5                Average timings over 5 iterations

use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::time::Instant;

use clap::Parser;
use glam::DVec3;
use surf_nearest::{Projection, SphericalSurface};

use parproj::report::{time_strategy, Report, StrategyTiming, EFFICIENCY_FLAG_PCT};
use parproj::strategy::{
    project_partitioned, project_serial, project_stealing, ProjectorPolicy,
};
use parproj::util::{format_count, parse_count, Timed};
use parproj::validate::{check_equivalence, check_membership};
use parproj::{scatter_points, StrategyError};

#[derive(Parser)]
#[command(name = "parproj")]
#[command(about = "Benchmark batch surface projection strategies")]
struct Args {
    /// Point counts to benchmark (e.g., 100k, 1m, 8m)
    #[arg(value_parser = parse_count)]
    sizes: Vec<usize>,

    /// Random seed
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Worker threads for the parallel strategies (default: all cores)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Sphere radius
    #[arg(long, default_value_t = 50.0)]
    radius: f64,

    /// Half-width of the cube the query points are drawn from
    #[arg(long, default_value_t = 100.0)]
    range: f64,

    /// Also run every strategy with a fresh projector per point
    #[arg(long)]
    compare_lifetime: bool,

    /// Number of iterations to average (useful on noisy machines)
    #[arg(short = 'n', long, default_value_t = 1)]
    repeat: usize,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let sizes: Vec<usize> = if args.sizes.is_empty() {
        vec![1_000_000]
    } else {
        args.sizes.clone()
    };

    let workers = args.threads.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1)
    });

    println!("Projection Strategy Benchmark");
    println!("=============================\n");
    println!("Configuration:");
    println!("  seed = {}", args.seed);
    println!("  workers = {}", workers);
    println!("  radius = {}", args.radius);
    println!("  range = +/-{}", args.range);
    println!(
        "  sizes = {:?}",
        sizes.iter().map(|&n| format_count(n)).collect::<Vec<_>>()
    );
    if args.repeat > 1 {
        println!("  repeat = {}", args.repeat);
    }

    let surface = SphericalSurface::new(DVec3::ZERO, args.radius);

    for &n in &sizes {
        println!("\n{}", "=".repeat(60));
        println!("Benchmarking n = {}", format_count(n));
        println!("{}", "=".repeat(60));

        let t_gen = Instant::now();
        let points = match scatter_points(n, -args.range, args.range, &surface, args.seed) {
            Ok(points) => points,
            Err(err) => {
                log::error!("point generation failed: {}", err);
                eprintln!("Point generation failed: {}", err);
                std::process::exit(1);
            }
        };
        println!(
            "Point generation: {:.1}ms",
            t_gen.elapsed().as_secs_f64() * 1000.0
        );

        if args.compare_lifetime {
            // Warmup run (discard results) to eliminate first-run bias
            print!("Warmup run... ");
            io::stdout().flush().unwrap();
            let mut scratch = vec![Projection::default(); points.len()];
            match project_serial(&points, &mut scratch, &surface, ProjectorPolicy::Reuse) {
                Ok(()) => println!("done"),
                Err(err) => println!("failed: {}", err),
            }
        }

        let reused = run_suite(&points, &surface, workers, ProjectorPolicy::Reuse, args.repeat);

        if args.compare_lifetime {
            println!("\n--- PER-POINT PROJECTORS ---");
            let per_point = run_suite(
                &points,
                &surface,
                workers,
                ProjectorPolicy::PerPoint,
                args.repeat,
            );
            print_lifetime_comparison(&reused, &per_point);
        }
    }

    println!("\nBenchmark complete.");
}

/// Run all three strategies under one projector policy, validate the results,
/// and print the speedup table. Returns the timings of the runs that
/// completed.
fn run_suite(
    points: &[DVec3],
    surface: &SphericalSurface,
    workers: usize,
    policy: ProjectorPolicy,
    repeat: usize,
) -> Vec<StrategyTiming> {
    let _suite = Timed::info("Strategy suite");
    let n = points.len();
    let mut serial_out = vec![Projection::default(); n];
    let mut partitioned_out = vec![Projection::default(); n];
    let mut stealing_out = vec![Projection::default(); n];

    let serial = run_timed("serial", 1, repeat, || {
        project_serial(points, &mut serial_out, surface, policy)
    });
    let partitioned = run_timed("static-partition", workers, repeat, || {
        project_partitioned(points, &mut partitioned_out, surface, workers, policy)
    });
    let stealing = run_timed("work-stealing", workers, repeat, || {
        project_stealing(points, &mut stealing_out, surface, workers, policy)
    });

    if serial.is_some() || partitioned.is_some() || stealing.is_some() {
        let _t = Timed::debug("Validation");
        println!("\nValidation:");
        if partitioned.is_some() {
            check_membership(&partitioned_out, surface)
                .print_summary("static-partition on-surface");
        }
        if stealing.is_some() {
            check_membership(&stealing_out, surface).print_summary("work-stealing on-surface");
        }
        if serial.is_some() {
            if partitioned.is_some() {
                check_equivalence(&serial_out, &partitioned_out)
                    .print_summary("serial vs static-partition");
            }
            if stealing.is_some() {
                check_equivalence(&serial_out, &stealing_out)
                    .print_summary("serial vs work-stealing");
            }
        }
    }

    let Some(serial) = serial else {
        println!("\nNo speedup table (serial baseline aborted).");
        return partitioned.into_iter().chain(stealing).collect();
    };

    let mut timings = vec![serial];
    timings.extend(partitioned);
    timings.extend(stealing);

    let report = Report::build(&timings);
    println!("\n{}", report);
    for row in report.suspect_rows() {
        println!(
            "  note: {} efficiency {:.1}% exceeds {:.0}% (timing noise or baseline interference)",
            row.name, row.efficiency_pct, EFFICIENCY_FLAG_PCT
        );
    }

    timings
}

/// Time one strategy `repeat` times and average, aborting on the first error.
fn run_timed(
    name: &'static str,
    workers: usize,
    repeat: usize,
    mut run: impl FnMut() -> Result<(), StrategyError>,
) -> Option<StrategyTiming> {
    let repeat = repeat.max(1);
    let mut times: Vec<f64> = Vec::with_capacity(repeat);

    for iter in 0..repeat {
        if repeat > 1 {
            print!("  {} iteration {}/{}... ", name, iter + 1, repeat);
            io::stdout().flush().unwrap();
        }
        match time_strategy(name, workers, &mut run) {
            Ok(timing) => {
                if repeat > 1 {
                    println!("{:.3}s", timing.seconds);
                }
                times.push(timing.seconds);
            }
            Err(err) => {
                if repeat > 1 {
                    println!("aborted");
                }
                log::error!("{} aborted: {}", name, err);
                println!("  {} aborted: {}", name, err);
                return None;
            }
        }
    }

    let avg = times.iter().sum::<f64>() / times.len() as f64;
    if repeat > 1 {
        let min = times.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = times.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        println!(
            "  {}: min {:.3}s / max {:.3}s / avg {:.3}s",
            name, min, max, avg
        );
    }

    Some(StrategyTiming {
        name,
        workers,
        seconds: avg,
    })
}

/// Print how much projector reuse bought over per-point construction.
fn print_lifetime_comparison(reused: &[StrategyTiming], per_point: &[StrategyTiming]) {
    println!("\n--- LIFETIME COMPARISON ---");
    for r in reused {
        let Some(p) = per_point.iter().find(|t| t.name == r.name) else {
            continue;
        };
        if r.seconds > 0.0 {
            println!(
                "  {:>16}: reused {:.3}s vs per-point {:.3}s ({:.2}x from reuse)",
                r.name,
                r.seconds,
                p.seconds,
                p.seconds / r.seconds
            );
        }
    }
}
