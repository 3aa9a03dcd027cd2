//! Spiralling Cells CLI - Run the automaton headless from JSON configuration or an archive.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use spiralling_cells::{
    archive::{ARCHIVE_EXTENSION, ArchiveSource, load_archive, save_archive},
    compute::{Automaton, AutomatonStats},
    schema::{AutomatonConfig, Seed},
};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "--example" {
        print_example_config();
        return;
    }

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json|state.spca> [steps] [output.spca]", args[0]);
        eprintln!();
        eprintln!("Run the Spiralling Cells automaton headless.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to run configuration (or a .spca archive to resume)");
        eprintln!("  steps        Number of generations (default: 100)");
        eprintln!("  output.spca  Write the final state to this archive");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    let input_path = PathBuf::from(&args[1]);
    let steps: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(100);
    let output_path = args.get(3).map(PathBuf::from);

    let mut automaton = if input_path
        .extension()
        .is_some_and(|e| e == ARCHIVE_EXTENSION)
    {
        let state = load_archive(&input_path).unwrap_or_else(|e| {
            eprintln!("Error loading archive: {}", e);
            std::process::exit(1);
        });
        Automaton::from_archive(state).unwrap_or_else(|e| {
            eprintln!("Error restoring archive: {}", e);
            std::process::exit(1);
        })
    } else {
        let (config, seed) = load_config(&input_path);
        Automaton::from_seed(config, &seed).unwrap_or_else(|e| {
            eprintln!("Error creating automaton: {}", e);
            std::process::exit(1);
        })
    };

    let config = automaton.config().clone();
    let neighbourhood = config.neighbourhood;

    println!("Spiralling Cells");
    println!("================");
    println!(
        "Grid: {}x{} ({} states, {} neighbourhood)",
        config.width, config.height, config.num_states, neighbourhood
    );
    println!("Starting iteration: {}", automaton.iteration());
    println!("Steps: {}", steps);
    println!();

    let initial_stats = AutomatonStats::from_automaton(&automaton, neighbourhood);
    println!("Initial state:");
    print_stats(&initial_stats);
    println!();

    println!("Running automaton...");
    let start = Instant::now();

    for i in 0..steps {
        automaton.step(neighbourhood);

        // Print progress every 10%
        if (i + 1) % (steps / 10).max(1) == 0 {
            let elapsed = start.elapsed().as_secs_f32();
            let steps_per_sec = (i + 1) as f32 / elapsed;
            println!(
                "  Step {}/{}: iteration={}, entropy={:.3}, {:.1} steps/s",
                i + 1,
                steps,
                automaton.iteration(),
                automaton.entropy(neighbourhood),
                steps_per_sec
            );
        }
    }

    let elapsed = start.elapsed();
    let final_stats = AutomatonStats::from_automaton(&automaton, neighbourhood);

    println!();
    println!("Final state:");
    print_stats(&final_stats);
    println!();
    println!(
        "Time: {:.2}s ({:.1} steps/s)",
        elapsed.as_secs_f32(),
        steps as f32 / elapsed.as_secs_f32()
    );

    if let Some(path) = output_path {
        let state = automaton.to_archive(ArchiveSource::Current);
        if let Err(e) = save_archive(&path, &state) {
            eprintln!("Error saving archive: {}", e);
            std::process::exit(1);
        }
        println!("Saved final state to {}", path.display());
    }
}

/// Load a JSON configuration and its optional sibling `<name>.seed.json`.
fn load_config(config_path: &Path) -> (AutomatonConfig, Seed) {
    let config_str = fs::read_to_string(config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let config: AutomatonConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    let seed_path = config_path.with_extension("seed.json");
    let seed: Seed = if seed_path.exists() {
        let seed_str = fs::read_to_string(&seed_path).unwrap_or_else(|e| {
            eprintln!("Error reading seed file: {}", e);
            std::process::exit(1);
        });
        serde_json::from_str(&seed_str).unwrap_or_else(|e| {
            eprintln!("Error parsing seed: {}", e);
            std::process::exit(1);
        })
    } else {
        Seed::default()
    };

    (config, seed)
}

fn print_stats(stats: &AutomatonStats) {
    println!("  Iteration: {}", stats.iteration);
    println!("  Min dist (entropy): {:.3}", stats.entropy);
    println!(
        "  States present: {}/{}",
        stats.distinct_states,
        stats.state_counts.len()
    );
    println!("  Population: {:?}", stats.state_counts);
}

fn print_example_config() {
    let config = AutomatonConfig::default();
    let seed = Seed::random(Some(42));

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing config: {}", e),
    }
    println!();
    println!("Example seed (config.seed.json):");
    match serde_json::to_string_pretty(&seed) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing seed: {}", e),
    }
}
