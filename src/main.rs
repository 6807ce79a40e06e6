//! Hall Sentinel - Entry Point
//!
//! Sets up logging and configuration, seeds the sensor field, and runs an
//! operator console over the simulation core. The console stands in for the
//! facility dashboard: it reads state, advances ticks, and emits operator
//! intents (mode changes, acknowledgements, suppression, resets).

use clap::Parser;
use hall_sentinel::core::config::{config, set_config, SimulationConfig};
use hall_sentinel::core::error::Result;
use hall_sentinel::core::types::AlertId;
use hall_sentinel::hall::{generate_sensors, FacilityLayout, HallState, LinkState};
use hall_sentinel::narrative::remote::RemoteAnalyzer;
use hall_sentinel::narrative::{analyze_with_fallback, AnalysisFocus};
use hall_sentinel::simulation::{
    acknowledge_hazard, actuate_suppression, run_simulation_tick, SimulationEvent, SimulationMode,
};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tokio::runtime::Runtime;

/// Operator console for the hall thermal simulation
#[derive(Parser)]
#[command(name = "hall-sentinel", version, about)]
struct Args {
    /// Path to a TOML config overriding the reference hall constants
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for a reproducible simulation run
    #[arg(long)]
    seed: Option<u64>,

    /// Run this many ticks headless, print the final status, and exit
    #[arg(long)]
    ticks: Option<u64>,
}

fn main() -> Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter("hall_sentinel=info")
        .init();

    let args = Args::parse();

    if let Some(path) = &args.config {
        let cfg = SimulationConfig::load(path)?;
        if set_config(cfg).is_err() {
            tracing::warn!("config already initialized, --config ignored");
        }
    }

    let mut rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let layout = FacilityLayout::default();
    let mut state = HallState::new(generate_sensors(&layout));
    tracing::info!("sensor field seeded with {} nodes", state.sensors.len());

    // Headless mode: advance and report, no console
    if let Some(n) = args.ticks {
        for _ in 0..n {
            for event in run_simulation_tick(&mut state, &mut rng) {
                print_event(&event);
            }
        }
        display_detailed_status(&state);
        return Ok(());
    }

    // Create the async runtime for the remote analysis endpoints
    let rt = Runtime::new()?;
    let remote = RemoteAnalyzer::from_env();

    println!("\n=== HALL SENTINEL ===");
    println!("Thermal sensor network simulation with hazard monitoring");
    println!();
    println!("Commands:");
    println!("  tick / t            - Advance simulation by one tick");
    println!("  run <n>             - Run n ticks back to back");
    println!("  watch <n>           - Run n ticks paced at the tick interval");
    println!("  status / s          - Show detailed status");
    println!("  sensors             - List sensor extremes");
    println!("  sensor <id>         - Show one sensor's telemetry");
    println!("  mode <name>         - Set mode (normal|fire|leak|hvac|chaos|drill)");
    println!("  hazards             - List alerts");
    println!("  ack <id>            - Acknowledge an alert");
    println!("  suppress <id>       - Actuate suppression against an alert");
    println!("  focus <f>           - Narrative focus (hse|maintenance|diagnostic)");
    println!("  link <id> <on|off>  - Force a sensor's telemetry link");
    println!("  analyze             - Run remote analysis (local fallback)");
    println!("  image               - Fetch a rendered thermal image");
    println!("  reset               - Re-seed the field, clear alerts");
    println!("  quit / q            - Exit");
    println!();

    // Main console loop
    loop {
        display_status(&state);

        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input == "quit" || input == "q" {
            break;
        }

        if input == "tick" || input == "t" {
            for event in run_simulation_tick(&mut state, &mut rng) {
                print_event(&event);
            }
            println!("Tick {} complete.", state.current_tick);
            continue;
        }

        if input == "status" || input == "s" {
            display_detailed_status(&state);
            continue;
        }

        if input == "sensors" {
            display_sensor_extremes(&state);
            continue;
        }

        if let Some(id) = input.strip_prefix("sensor ") {
            match state.sensor(id.trim()) {
                Some(s) => println!(
                    "  {} [{:?}/{:?}] at ({:.1}, {:.1}, {:.1}): {:.2}°C, drift {:+.2}, humidity {:.0}%",
                    s.id, s.kind, s.link, s.position.x, s.position.y, s.position.z,
                    s.temperature, s.drift, s.humidity
                ),
                None => println!("No sensor named '{}'.", id.trim()),
            }
            continue;
        }

        if let Some(n) = input.strip_prefix("run ") {
            if let Ok(n) = n.trim().parse::<u32>() {
                println!("Running {} ticks...", n);
                for _ in 0..n {
                    for event in run_simulation_tick(&mut state, &mut rng) {
                        print_event(&event);
                    }
                }
                println!("Completed {} ticks. Now at tick {}.", n, state.current_tick);
            } else {
                println!("Usage: run <number>");
            }
            continue;
        }

        if let Some(n) = input.strip_prefix("watch ") {
            if let Ok(n) = n.trim().parse::<u32>() {
                let period = Duration::from_millis(config().tick_interval_ms);
                for _ in 0..n {
                    for event in run_simulation_tick(&mut state, &mut rng) {
                        print_event(&event);
                    }
                    display_status(&state);
                    std::thread::sleep(period);
                }
            } else {
                println!("Usage: watch <number>");
            }
            continue;
        }

        if let Some(name) = input.strip_prefix("mode ") {
            match name.trim().parse::<SimulationMode>() {
                Ok(mode) => {
                    state.set_mode(mode);
                    println!("Mode set to {mode}.");
                }
                Err(e) => println!("{e}"),
            }
            continue;
        }

        if input == "hazards" {
            if state.alerts.is_empty() {
                println!("No alerts.");
            }
            for alert in &state.alerts {
                println!(
                    "  {} [{}] ({:?}){} - {}",
                    alert.id,
                    alert.category,
                    alert.level,
                    if alert.resolved { " resolved" } else { "" },
                    alert.message
                );
            }
            continue;
        }

        if let Some(id) = input.strip_prefix("ack ") {
            match id.trim().parse::<AlertId>() {
                Ok(id) => {
                    if acknowledge_hazard(&mut state, id) {
                        println!("Hazard acknowledged.");
                    } else {
                        println!("No alert with that id.");
                    }
                }
                Err(_) => println!("Not an alert id. Use `hazards` to list them."),
            }
            continue;
        }

        if let Some(id) = input.strip_prefix("suppress ") {
            match id.trim().parse::<AlertId>() {
                Ok(id) => {
                    if actuate_suppression(&mut state, id) {
                        println!("Suppression engaged. Hall cooling toward target.");
                    } else {
                        println!("No unresolved alert with that id.");
                    }
                }
                Err(_) => println!("Not an alert id. Use `hazards` to list them."),
            }
            continue;
        }

        if let Some(f) = input.strip_prefix("focus ") {
            match f.trim().parse::<AnalysisFocus>() {
                Ok(focus) => {
                    state.set_focus(focus);
                    println!("Narrative focus set to {focus}.");
                }
                Err(e) => println!("{e}"),
            }
            continue;
        }

        if let Some(rest) = input.strip_prefix("link ") {
            let mut parts = rest.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some(id), Some("on")) => {
                    if !state.set_link(id, LinkState::Online) {
                        println!("No sensor named '{id}'.");
                    }
                }
                (Some(id), Some("off")) => {
                    if !state.set_link(id, LinkState::Offline) {
                        println!("No sensor named '{id}'.");
                    }
                }
                _ => println!("Usage: link <id> <on|off>"),
            }
            continue;
        }

        if input == "analyze" {
            let line =
                rt.block_on(analyze_with_fallback(Some(&remote), &state.sensors, &state.status));
            state.status.last_analysis = line.clone();
            println!("{line}");
            continue;
        }

        if input == "image" {
            match rt.block_on(remote.thermal_image(&state.sensors, &state.status)) {
                Ok(b64) => {
                    std::fs::write("thermal-image.b64", &b64)?;
                    println!(
                        "Thermal image received ({} base64 bytes), written to thermal-image.b64",
                        b64.len()
                    );
                }
                Err(e) => {
                    tracing::warn!("thermal imaging unavailable: {e}");
                    println!("Thermal imaging unavailable.");
                }
            }
            continue;
        }

        if input == "reset" {
            state.reset(generate_sensors(&layout));
            println!("System reset.");
            continue;
        }

        println!("Unknown command. Try: tick, run <n>, mode <name>, hazards, status, quit");
    }

    println!(
        "\nGoodbye. Final state: {} sensors, {} ticks elapsed, {} alert(s) on record.",
        state.sensors.len(),
        state.current_tick,
        state.alerts.len()
    );
    Ok(())
}

/// Display a brief status summary
fn display_status(state: &HallState) {
    let s = &state.status;
    println!();
    println!(
        "--- Tick {} | Mode {} | Avg {:.1}°C (min {:.1} / peak {:.1}) ---",
        state.current_tick, state.mode, s.average_temp, s.min_temp, s.peak_temp
    );
    println!(
        "  Fire alarm: {} | HVAC: {} | Stability: {:.1}% | Incidents: {}",
        if s.fire_alarm { "ACTIVE" } else { "clear" },
        if s.hvac_active { "active" } else { "idle" },
        s.stability_index,
        s.active_incidents
    );
    println!();
}

/// Display the full status snapshot, alert list, and recent log
fn display_detailed_status(state: &HallState) {
    let s = &state.status;
    println!();
    println!("=== Status (Tick {}) ===", state.current_tick);
    println!("  Mode: {} | Focus: {}", state.mode, s.analysis_focus);
    println!(
        "  Avg {:.2}°C | Peak {:.2}°C | Min {:.2}°C",
        s.average_temp, s.peak_temp, s.min_temp
    );
    println!(
        "  Fire alarm: {} | HVAC: {} | Stability: {:.1}% | Est. draw: {:.1} kVA",
        if s.fire_alarm { "ACTIVE" } else { "clear" },
        if s.hvac_active { "active" } else { "idle" },
        s.stability_index,
        s.estimated_kva
    );
    println!("  Online sensors: {}/{}", state.online_count(), state.sensors.len());
    println!("  Analysis: {}", s.last_analysis);

    if !state.alerts.is_empty() {
        println!("  Alerts:");
        for alert in &state.alerts {
            println!(
                "    {} [{}] ({:?}){} - {}",
                alert.id,
                alert.category,
                alert.level,
                if alert.resolved { " resolved" } else { "" },
                alert.message
            );
        }
    }

    println!("  Log:");
    for line in s.logs.iter().take(8) {
        println!("    {line}");
    }
    println!();
}

/// Display the hottest and coldest nodes plus any offline ones
fn display_sensor_extremes(state: &HallState) {
    let mut online: Vec<_> = state.sensors.iter().filter(|s| s.is_online()).collect();
    online.sort_by(|a, b| b.temperature.total_cmp(&a.temperature));

    println!();
    for s in online.iter().take(5) {
        println!("  hot  {:>12}  {:.2}°C (drift {:+.2})", s.id, s.temperature, s.drift);
    }
    for s in online.iter().rev().take(3) {
        println!("  cold {:>12}  {:.2}°C (drift {:+.2})", s.id, s.temperature, s.drift);
    }
    for s in state.sensors.iter().filter(|s| !s.is_online()) {
        println!("  OFFLINE {:>9}", s.id);
    }
    println!();
}

fn print_event(event: &SimulationEvent) {
    match event {
        SimulationEvent::HazardRaised { category, level, message } => {
            println!("  !! [{category}] ({level:?}) {message}");
        }
        SimulationEvent::SuppressionComplete { peak } => {
            println!("  -- Suppression complete at peak {peak:.1}°C. Mode reverted to Normal.");
        }
    }
}
