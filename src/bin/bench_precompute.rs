//! Benchmark the sector precomputation on synthetic k-space trajectories.
//!
//! Run with: cargo run --release --bin bench_precompute
//!
//! Usage:
//!   bench_precompute                   Run default size (1m samples)
//!   bench_precompute 100k 1m 10m       Run multiple sizes
//!   bench_precompute --parallel        Use the rayon code paths
//!   bench_precompute --trajectory radial --image 256 --osr 2
//!   bench_precompute --reference       Also time the comparison sort
//!
//! Set RUST_LOG=debug for per-phase timing from the library.

use std::f32::consts::PI;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use gridding_sectors::sample_sort::{comparison_sort, counting_sort};
use gridding_sectors::util::{format_rate, Timed};
use gridding_sectors::{precompute, Dimensions, PrecomputeConfig, SampleCoords};

fn parse_count(s: &str) -> Result<usize, String> {
    let s = s.to_lowercase();
    let (num_str, multiplier) = if s.ends_with('m') {
        (&s[..s.len() - 1], 1_000_000)
    } else if s.ends_with('k') {
        (&s[..s.len() - 1], 1_000)
    } else {
        (s.as_str(), 1)
    };

    num_str
        .parse::<f64>()
        .map(|n| (n * multiplier as f64) as usize)
        .map_err(|e| format!("Invalid number '{}': {}", s, e))
}

fn format_num(n: usize) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{}k", n / 1_000)
    } else {
        format!("{}", n)
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Trajectory {
    /// Uniform random samples over the whole cube
    Uniform,
    /// Radial spokes through the center (dense near k = 0)
    Radial,
    /// Stack of planar spirals along z
    Spiral,
}

#[derive(Parser)]
#[command(name = "bench_precompute")]
#[command(about = "Benchmark sector assignment, sorting and offset table construction")]
struct Args {
    /// Sample counts to benchmark (e.g., 100k, 1m, 10M)
    #[arg(value_parser = parse_count)]
    sizes: Vec<usize>,

    /// Base image width (isotropic)
    #[arg(long, default_value_t = 128)]
    image: usize,

    /// Oversampling ratio applied to the image size
    #[arg(long, default_value_t = 1.5)]
    osr: f64,

    /// Sector width in grid cells
    #[arg(long, default_value_t = 8)]
    sector_width: usize,

    /// Sample trajectory
    #[arg(long, value_enum, default_value_t = Trajectory::Uniform)]
    trajectory: Trajectory,

    /// Random seed
    #[arg(short, long, default_value_t = 12345)]
    seed: u64,

    /// Use the parallel assignment and sort
    #[arg(long)]
    parallel: bool,

    /// Also time the comparison sort and check it agrees
    #[arg(long)]
    reference: bool,

    /// Number of iterations to run (useful for profiling)
    #[arg(short = 'n', long, default_value_t = 1)]
    repeat: usize,
}

fn generate_samples(n: usize, trajectory: Trajectory, seed: u64) -> SampleCoords {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let (mut xs, mut ys, mut zs) = (
        Vec::with_capacity(n),
        Vec::with_capacity(n),
        Vec::with_capacity(n),
    );

    match trajectory {
        Trajectory::Uniform => {
            for _ in 0..n {
                xs.push(rng.gen_range(-0.5..=0.5));
                ys.push(rng.gen_range(-0.5..=0.5));
                zs.push(rng.gen_range(-0.5..=0.5));
            }
        }
        Trajectory::Radial => {
            let per_spoke = 256usize;
            for i in 0..n {
                if i % per_spoke == 0 {
                    // new random direction
                    let z: f32 = rng.gen_range(-1.0..1.0);
                    let theta: f32 = rng.gen_range(0.0..2.0 * PI);
                    let r = (1.0 - z * z).sqrt();
                    xs.push(r * theta.cos());
                    ys.push(r * theta.sin());
                    zs.push(z);
                    continue;
                }
                let base = i - i % per_spoke;
                let t = (i % per_spoke) as f32 / per_spoke as f32 - 0.5;
                let (dx, dy, dz) = (xs[base], ys[base], zs[base]);
                xs.push(dx * t);
                ys.push(dy * t);
                zs.push(dz * t);
            }
            // Spoke starts hold the direction; move them onto the spoke.
            for base in (0..n).step_by(per_spoke) {
                xs[base] *= -0.5;
                ys[base] *= -0.5;
                zs[base] *= -0.5;
            }
        }
        Trajectory::Spiral => {
            let turns = 16.0;
            let layers = 64usize;
            let per_layer = n.div_ceil(layers).max(1);
            for i in 0..n {
                let layer = i / per_layer;
                let t = (i % per_layer) as f32 / per_layer as f32;
                let r = 0.5 * t;
                let angle = 2.0 * PI * turns * t;
                xs.push((r * angle.cos()).clamp(-0.5, 0.5));
                ys.push((r * angle.sin()).clamp(-0.5, 0.5));
                zs.push(layer as f32 / layers as f32 - 0.5);
            }
        }
    }

    SampleCoords::new_3d(xs, ys, zs).expect("axes generated with equal length")
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    println!("Sector Precomputation Benchmark");
    println!("===============================\n");

    let sizes: Vec<usize> = if args.sizes.is_empty() {
        vec![1_000_000]
    } else {
        args.sizes
    };

    let config = match PrecomputeConfig::from_image(
        Dimensions::isotropic(args.image),
        args.osr,
        args.sector_width,
    ) {
        Ok(config) => config.with_parallel(args.parallel),
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };
    let sector_dims = match config.validate() {
        Ok(dims) => dims,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    println!("Configuration:");
    println!("  seed = {}", args.seed);
    println!("  trajectory = {:?}", args.trajectory);
    println!("  grid = {} (image {} x osr {})", config.grid, args.image, args.osr);
    println!(
        "  sectors = {} ({} total, width {})",
        sector_dims,
        sector_dims.count(),
        args.sector_width
    );
    println!("  parallel = {}", args.parallel);
    println!(
        "  sizes = {:?}",
        sizes.iter().map(|&n| format_num(n)).collect::<Vec<_>>()
    );
    if args.repeat > 1 {
        println!("  repeat = {}", args.repeat);
    }

    for &n in &sizes {
        println!("\n{}", "=".repeat(60));
        println!("Benchmarking n = {}", format_num(n));
        println!("{}", "=".repeat(60));

        let timer = Timed::info("generate samples", n);
        let samples = generate_samples(n, args.trajectory, args.seed);
        println!(
            "Sample generation: {:.1}ms",
            timer.finish().as_secs_f64() * 1000.0
        );

        for iter in 0..args.repeat {
            let t0 = Instant::now();
            let result = match precompute(&samples, &config) {
                Ok(result) => result,
                Err(e) => {
                    eprintln!("Precomputation failed: {e}");
                    std::process::exit(1);
                }
            };
            let elapsed = t0.elapsed();

            if args.repeat > 1 {
                println!("\n--- iteration {} ---", iter + 1);
            }
            let timings = result.timings();
            println!("  Total time:    {:>8.1}ms", elapsed.as_secs_f64() * 1000.0);
            println!("  Throughput:    {:>8}", format_rate(n, elapsed));
            println!(
                "  validate {:.1}ms | assign {:.1}ms | sort {:.1}ms | offsets {:.1}ms",
                timings.validate.as_secs_f64() * 1000.0,
                timings.assign.as_secs_f64() * 1000.0,
                timings.sort.as_secs_f64() * 1000.0,
                timings.offsets.as_secs_f64() * 1000.0,
            );

            if iter == 0 {
                let stats = result.stats();
                println!(
                    "  Sectors: {} empty / {} | samples per sector min={} max={} avg={:.1}",
                    stats.empty_sectors,
                    stats.num_sectors,
                    stats.min_samples_per_sector,
                    stats.max_samples_per_sector,
                    stats.avg_samples_per_sector
                );
            }

            if args.reference && iter == 0 {
                let sector_count = result.num_sectors();
                let t0 = Instant::now();
                let counted = counting_sort(result.assignment(), sector_count);
                let counting_ms = t0.elapsed().as_secs_f64() * 1000.0;

                let t0 = Instant::now();
                let compared = comparison_sort(result.assignment(), sector_count);
                let comparison_ms = t0.elapsed().as_secs_f64() * 1000.0;

                let agree = counted == compared && compared.permutation == result.permutation();
                println!(
                    "  Reference: counting {:.1}ms vs comparison {:.1}ms ({:.1}x) agree={}",
                    counting_ms,
                    comparison_ms,
                    comparison_ms / counting_ms.max(1e-9),
                    agree
                );
            }
        }
    }
}
