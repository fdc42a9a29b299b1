use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use tennis_scheduler::config::parse_cli_args;
use tennis_scheduler::display::{print_player_stats, print_schedule, write_schedule_to_file};
use tennis_scheduler::form::export_schedule_csv;
use tennis_scheduler::parser::load_roster;
use tennis_scheduler::schedule::{generate_balanced, normalize_roster};
use tennis_scheduler::web;

fn print_usage() {
    println!("Tennis match scheduler");
    println!();
    println!("Usage:");
    println!("  tennis-scheduler <roster.csv> [--mode singles|men|women|mixed] [--games 4|6]");
    println!("                   [--hours H] [--trials N] [--seed S] [--start HH:MM] [--out FILE]");
    println!("  tennis-scheduler web [port]");
    println!();
    println!("The roster CSV needs a name and a gender column.");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tennis_scheduler=info,actix_web=info".into()),
        )
        .init();

    // Check if we should run in web mode
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.first().map(String::as_str) == Some("web") {
        let port = args.get(1)
            .cloned()
            .or_else(|| std::env::var("PORT").ok())
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8080);

        info!("Starting web server on port {}", port);
        println!("Access the API at http://localhost:{}/api/schedule", port);

        web::start_server(port).await?;
        return Ok(());
    }

    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    // CLI mode
    let options = match parse_cli_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            std::process::exit(2);
        }
    };
    let settings = &options.settings;

    let players = load_roster(&options.roster_path)?;
    let roster = normalize_roster(&players, settings.mode);
    let total_matches = settings.total_matches();
    println!("Loaded {} players ({} byes added)", players.len(), roster.len() - players.len());
    println!("Total matches: {}", total_matches);

    let mut rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let balanced = match generate_balanced(settings.mode, &roster, total_matches, settings.trials, &mut rng) {
        Ok(balanced) => balanced,
        Err(e) => {
            warn!(error = %e, "could not build schedule");
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    print_schedule(settings.mode.label(), &balanced.schedule, settings.start_time, settings.match_minutes());
    print_player_stats(&balanced.schedule, settings.mode, &roster);
    println!("\nSpread: {} (after {} trials)", balanced.spread, balanced.trials_run);

    if let Some(out) = &options.output_path {
        if out.extension().and_then(|e| e.to_str()) == Some("csv") {
            export_schedule_csv(&balanced.schedule, out, settings.start_time, settings.match_minutes())?;
        } else {
            write_schedule_to_file(
                settings.mode.label(),
                &balanced.schedule,
                settings.start_time,
                settings.match_minutes(),
                &out.to_string_lossy(),
            )?;
        }
        println!("Schedule saved to {}", out.display());
    }

    Ok(())
}
