//! Life Evolve CLI - Run pattern searches from JSON configuration.

use std::num::ParseIntError;
use std::path::PathBuf;
use std::time::Instant;

use life_evolve::{
    compute::{Simulation, evolution::EvolutionEngine},
    schema::{self, EvolutionConfig, PatternName, SimulationConfig},
};

/// Empty cells kept around a stamped pattern.
const PATTERN_MARGIN: usize = 4;

/// Generations played by `--pattern` when no count is given.
const DEFAULT_PATTERN_STEPS: u64 = 30;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    match args[1].as_str() {
        "--example" => print_example_config(),
        "--pattern" => {
            let Some(name) = args.get(2) else {
                eprintln!("--pattern needs a pattern name");
                print_usage(&args[0]);
                std::process::exit(1);
            };
            let steps = parse_steps(args.get(3).map(String::as_str)).unwrap_or_else(|e| {
                eprintln!("Invalid steps {:?}: {}", args[3], e);
                std::process::exit(1);
            });
            run_pattern(name, steps);
        }
        path => run_search(PathBuf::from(path)),
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <config.json>", program);
    eprintln!("       {} --pattern <name> [steps]", program);
    eprintln!("       {} --example", program);
    eprintln!();
    eprintln!("Evolve Game of Life starting patterns, or play a catalog pattern.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  config.json  Path to evolution configuration file");
    eprintln!("  name         One of:");
    for pattern in PatternName::ALL {
        eprintln!("                 {}", pattern);
    }
    eprintln!(
        "  steps        Number of generations to play (default: {})",
        DEFAULT_PATTERN_STEPS
    );
}

/// Optional step count argument; absent means the default.
fn parse_steps(arg: Option<&str>) -> Result<u64, ParseIntError> {
    arg.map_or(Ok(DEFAULT_PATTERN_STEPS), str::parse)
}

fn run_search(config_path: PathBuf) {
    let config = EvolutionConfig::from_json_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Error loading {}: {}", config_path.display(), e);
        std::process::exit(1);
    });

    let mut engine = EvolutionEngine::new(config.clone()).unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    });

    println!("Life Evolve Search");
    println!("==================");
    println!(
        "Grid: {}x{}",
        config.base_config.rows, config.base_config.cols
    );
    println!("Population: {}", config.population.size);
    println!("Generations: {}", config.population.max_generations);
    println!("Horizon: {}", config.evaluation.horizon);
    println!("Seed: {}", engine.seed());
    println!();

    let start = Instant::now();
    let result = engine
        .run_with_callback(|progress| {
            println!(
                "  Generation {}/{}: best={} avg={:.2} ({:?})",
                progress.generation,
                progress.total_generations,
                progress.generation_best,
                progress.avg_fitness,
                progress.phase
            );
        })
        .unwrap_or_else(|e| {
            eprintln!("Search failed: {}", e);
            std::process::exit(1);
        });

    println!();
    println!("Best pattern (fitness {}):", result.best.fitness);
    println!("{}", result.best.genome);

    // Replay the winner the way the fitness function saw it.
    let mut sim = Simulation::new(config.base_config.clone());
    if let Err(e) = sim.load(&result.best.genome) {
        eprintln!("Cannot load best pattern: {}", e);
        std::process::exit(1);
    }
    sim.run(u64::from(config.evaluation.horizon));
    let stats = sim.stats();
    println!(
        "After {} generations: {} alive cells",
        stats.generation, stats.alive_cells
    );
    println!();
    println!(
        "Evaluations: {} in {:.2}s ({:?})",
        result.stats.total_evaluations,
        start.elapsed().as_secs_f32(),
        result.stats.stop_reason
    );
}

fn run_pattern(name: &str, steps: u64) {
    let cells = schema::pattern::lookup(name).unwrap_or_else(|e| {
        eprintln!("{}", e);
        std::process::exit(1);
    });

    let height = cells.iter().map(|&(r, _)| r + 1).max().unwrap_or(0);
    let width = cells.iter().map(|&(_, c)| c + 1).max().unwrap_or(0);
    let config = SimulationConfig {
        rows: height + 2 * PATTERN_MARGIN,
        cols: width + 2 * PATTERN_MARGIN,
    };

    let mut sim = Simulation::new(config);
    if let Err(e) = sim.stamp(name, (PATTERN_MARGIN, PATTERN_MARGIN)) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    loop {
        let stats = sim.stats();
        println!("Generation {} ({} alive):", stats.generation, stats.alive_cells);
        println!("{}", sim.grid());
        if stats.generation >= steps {
            break;
        }
        sim.step();
    }
}

fn print_example_config() {
    let config = EvolutionConfig {
        random_seed: Some(42),
        ..Default::default()
    };

    match serde_json::to_string_pretty(&config) {
        Ok(json) => {
            println!("Example configuration (config.json):");
            println!("{}", json);
        }
        Err(e) => {
            eprintln!("Error serializing config: {}", e);
            std::process::exit(1);
        }
    }
}
