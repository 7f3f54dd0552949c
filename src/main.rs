//! Bowlsim - headless cricket bowling machine simulator
//!
//! Bowls a batch of deliveries and reports landing accuracy.

use bowlsim::constants::{ERROR_ACCEPTABLE, ERROR_EXCELLENT};
use bowlsim::simulation::{RunConfig, run_deliveries};

fn usage() {
    println!("Usage: bowlsim [options]");
    println!();
    println!("Options:");
    println!("  --deliveries <n>   Number of deliveries to bowl (default: 6)");
    println!("  --seed <n>         Seed target selection for a reproducible run");
    println!("  --speed <m/s>      Delivery speed override");
    println!("  --fps <n>          Simulation step rate (default: 60)");
    println!("  --json             Print the stats as JSON instead of a report");
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        usage();
        return;
    }

    let deliveries = args
        .iter()
        .position(|a| a == "--deliveries")
        .and_then(|i| args.get(i + 1).and_then(|s| s.parse::<u32>().ok()))
        .unwrap_or(6);
    let seed = args
        .iter()
        .position(|a| a == "--seed")
        .and_then(|i| args.get(i + 1).and_then(|s| s.parse::<u64>().ok()));
    let speed = args
        .iter()
        .position(|a| a == "--speed")
        .and_then(|i| args.get(i + 1).and_then(|s| s.parse::<f32>().ok()));
    let fps = args
        .iter()
        .position(|a| a == "--fps")
        .and_then(|i| args.get(i + 1).and_then(|s| s.parse::<f32>().ok()))
        .unwrap_or(60.0);
    let json = args.iter().any(|a| a == "--json");

    let config = RunConfig {
        deliveries,
        seed,
        speed,
        fps,
        log: !json,
        ..Default::default()
    };

    let stats = run_deliveries(&config);

    if json {
        match serde_json::to_string_pretty(&stats) {
            Ok(out) => println!("{}", out),
            Err(e) => eprintln!("Failed to serialize stats: {}", e),
        }
        return;
    }

    println!();
    println!("=== Bowling accuracy report ===");
    println!("Deliveries bowled:   {}", stats.bowled);
    println!("Pitched on target:   {}", stats.landed);
    println!("Came to rest:        {}", stats.stopped);
    println!("Wicket hits:         {}", stats.wickets);
    println!("Faults:              {}", stats.faults);
    if stats.landed > 0 {
        println!();
        println!("Mean landing error:  {:.3} m", stats.mean_error);
        println!("Max landing error:   {:.3} m", stats.max_error);
        println!(
            "Excellent (<= {:.1} m): {}",
            ERROR_EXCELLENT, stats.excellent
        );
        println!(
            "Acceptable (<= {:.1} m): {}",
            ERROR_ACCEPTABLE, stats.acceptable
        );
        println!("Poor:                {}", stats.poor);
    }
}
