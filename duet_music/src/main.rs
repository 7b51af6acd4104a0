// Duet melody generator — CLI entry point.
//
// Generates a melody and a counter-melody and writes both to a MIDI file
// named after the current local time. With no flags it uses the built-in
// settings (eight four-beat notes per voice) and a time-derived seed.
//
// Usage:
//   duet [OPTIONS]
//     --seed <N>       RNG seed (default: derived from the clock)
//     --out-dir <DIR>  Directory for the .mid file (default: .)
//     --length <N>     Length budget of each voice in beats (default: 32)
//     --json           Also print both voices as JSON
//
// Set RUST_LOG=debug to see every pitch decision.

use chrono::Local;
use duet_music::compose::{DuetConfig, compose};
use duet_music::midi::write_duet;
use duet_prng::DuetRng;
use std::path::PathBuf;

struct Args {
    seed: Option<u64>,
    out_dir: PathBuf,
    length: Option<u32>,
    json: bool,
}

fn main() {
    env_logger::init();
    let args = parse_args();

    let seed = args.seed.unwrap_or_else(clock_seed);
    let mut config = DuetConfig::default();
    if let Some(length) = args.length {
        config = config.with_length(length);
    }

    println!("=== Duet ===");
    println!("Seed: {}", seed);
    println!(
        "Length: {} beats per voice",
        config.melody.target_length
    );

    let mut rng = DuetRng::new(seed);
    let duet = compose(&config, &mut rng);
    print!("{}", duet.summary());

    if args.json {
        match serde_json::to_string_pretty(&duet) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize voices: {e}");
                std::process::exit(1);
            }
        }
    }

    match write_duet(&duet, &args.out_dir, Local::now().naive_local()) {
        Ok(path) => println!("Wrote {}", path.display()),
        Err(e) => {
            eprintln!("Error writing MIDI: {e}");
            std::process::exit(1);
        }
    }
}

fn clock_seed() -> u64 {
    Local::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Local::now().timestamp_micros()) as u64
}

/// Parse command-line arguments. Plain `std::env::args()` matching.
fn parse_args() -> Args {
    let mut args = Args {
        seed: None,
        out_dir: PathBuf::from("."),
        length: None,
        json: false,
    };
    let argv: Vec<String> = std::env::args().collect();
    let mut i = 1;

    while i < argv.len() {
        match argv[i].as_str() {
            "--seed" => {
                i += 1;
                args.seed = Some(argv.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--seed requires a non-negative integer");
                    std::process::exit(1);
                }));
            }
            "--out-dir" => {
                i += 1;
                args.out_dir = argv.get(i).map(PathBuf::from).unwrap_or_else(|| {
                    eprintln!("--out-dir requires a path");
                    std::process::exit(1);
                });
            }
            "--length" => {
                i += 1;
                args.length = Some(argv.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--length requires a non-negative integer");
                    std::process::exit(1);
                }));
            }
            "--json" => args.json = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    args
}

fn print_usage() {
    println!("Usage: duet [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --seed <N>       RNG seed (default: derived from the clock)");
    println!("  --out-dir <DIR>  Directory for the .mid file (default: .)");
    println!("  --length <N>     Length of each voice in beats (default: 32)");
    println!("  --json           Also print both voices as JSON");
    println!("  --help, -h       Show this help");
}
