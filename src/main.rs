use chrono::{Local, Timelike, Utc};
use clap::Parser;
use colored::Colorize;
use parkalloc::allocation::AllocationResult;
use parkalloc::facility::{Facility, FacilityError};
use parkalloc::inventory::Inventory;
use parkalloc::spot::{ParkingSpot, SpotRow};
use parkalloc::time::TimeOfDay;
use parkalloc::vehicle::{VehicleEntry, VehicleType};
use parkalloc::wire::{AllocateRequest, AllocateResponse, ExitRequest, ExitResponse, StatusResponse};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};
use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tabled::Tabled;
use tabled::settings::Style;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "parkalloc", about = "Parking spot allocation console")]
struct Args {
    /// JSON scenario with the initial spot inventory
    #[arg(short, long, value_name = "FILE", env = "PARKALLOC_SCENARIO")]
    scenario: Option<PathBuf>,

    /// Number of floors when no scenario is given
    #[arg(long, default_value_t = 4, env = "PARKALLOC_FLOORS")]
    floors: u32,

    /// Spots on each floor when no scenario is given
    #[arg(long, default_value_t = 10, env = "PARKALLOC_SPOTS_PER_FLOOR")]
    spots_per_floor: u32,
}

#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct CompleteHelper {
    pub commands: Vec<String>,
}

impl Completer for CompleteHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, _pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let candidates = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: format!("{} ", cmd),
            })
            .collect();

        Ok((0, candidates))
    }
}

const PAGE_ROWS: usize = 20;

fn paginate(content: &str) -> std::io::Result<()> {
    let mut pager = Command::new("less")
        .arg("-R")
        .stdin(Stdio::piped())
        .spawn()
        // Fallback to 'more' if 'less' isn't available
        .or_else(|_| Command::new("more").stdin(Stdio::piped()).spawn())?;

    if let Some(mut stdin) = pager.stdin.take() {
        if let Err(e) = stdin.write_all(content.as_bytes()) {
            // Broken pipe is common if the user quits the pager early
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                return Err(e);
            }
        }
    }

    pager.wait()?;
    Ok(())
}

fn print_table<T: Tabled>(rows: &[T]) {
    let mut table = tabled::Table::new(rows);
    table.with(Style::rounded());
    table.with(tabled::settings::Alignment::left());
    let rendered = table.to_string();
    if rows.len() > PAGE_ROWS && paginate(&rendered).is_ok() {
        return;
    }
    println!("{}", rendered);
}

fn now() -> TimeOfDay {
    let local = Local::now();
    TimeOfDay::from_minutes(local.hour() as u64 * 60 + local.minute() as u64)
}

fn time_arg(raw: Option<&&str>) -> Result<TimeOfDay, Box<dyn Error>> {
    Ok(match raw {
        Some(raw) => raw.parse()?,
        None => now(),
    })
}

fn report(plate: &str, result: &AllocationResult) {
    let message = AllocateResponse::from_result(plate, result).message;
    if result.is_success() {
        println!("{}", message.green());
    } else {
        println!("{}", message.yellow());
    }
}

fn list(facility: &Facility, filter: &str) {
    let inventory = facility.inventory();
    let rows = match filter {
        "f" | "free" => inventory.available().map(ParkingSpot::row).collect::<Vec<SpotRow>>(),
        other => inventory
            .spots()
            .iter()
            .filter(|s| match other {
                "o" | "occupied" => s.is_occupied(),
                // one-based floor number
                other => match other.parse::<u32>() {
                    Ok(n) => n >= 1 && s.floor == n - 1,
                    Err(_) => true,
                },
            })
            .map(ParkingSpot::row)
            .collect(),
    };

    if rows.is_empty() {
        println!("No matching spots found.");
    } else {
        print_table(&rows);
    }
}

fn stats(facility: &Facility) {
    let stats = facility.statistics();
    println!(
        "{} spots, {} occupied, {} free ({:.1}% occupancy)",
        stats.total_spots, stats.occupied_spots, stats.available_spots, stats.occupancy_rate
    );
    println!(
        "government: {}  private: {}  public: {}",
        stats.vehicle_types.government, stats.vehicle_types.private, stats.vehicle_types.public
    );
    let rows = stats.floor_statistics.iter().map(|f| f.row()).collect::<Vec<_>>();
    print_table(&rows);
}

fn api(facility: &mut Facility, sub: &str, body: &str) -> Result<(), Box<dyn Error>> {
    match sub {
        "status" => {
            let status = StatusResponse::new(facility.inventory().spots(), Utc::now());
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        "allocate" => {
            let request: AllocateRequest = serde_json::from_str(body)?;
            let entry = request.into_entry()?;
            info!(plate = %entry.license_plate, priority = request.priority()?, "allocation request");
            let response = match facility.admit(&entry) {
                Ok(result) => AllocateResponse::from_result(&entry.license_plate, &result),
                Err(err @ FacilityError::AlreadyParked(_)) => AllocateResponse::rejected(err.to_string()),
                Err(err) => return Err(err.into()),
            };
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        "exit" => {
            let request: ExitRequest = serde_json::from_str(body)?;
            let response = match facility.depart(&request.vehicle_plate_num, request.exit_time_of_day()) {
                Ok(record) => ExitResponse::from_record(&record),
                Err(FacilityError::NotParked(plate)) => ExitResponse::not_parked(&plate),
                Err(err) => return Err(err.into()),
            };
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        "request" => {
            let args = body.split_whitespace().collect::<Vec<_>>();
            if let [plate, kind, hours] = args[..] {
                let entry = VehicleEntry::new(plate, kind.parse()?, now(), hours.parse()?);
                let request = AllocateRequest::from_entry(&entry, Utc::now());
                println!("{}", serde_json::to_string(&request)?);
            } else {
                println!("Usage: api request <plate> <type> <hours>");
            }
        }
        _ => println!("Usage: api status | api allocate <json> | api exit <json> | api request <plate> <type> <h>"),
    }
    Ok(())
}

fn help() {
    println!("\nAvailable Commands:");
    println!("  ls [filter]                     - List spots; filter: f - free, o - occupied, <n> - floor n");
    println!("  park <plate> <type> <h> [HH:MM] - Admit a vehicle (type: government, private, public) staying <h> hours");
    println!("  leave <plate> [HH:MM]           - Release the spot held by <plate>");
    println!("  spot <id>                       - Show a single spot");
    println!("  stats                           - Show occupancy per floor and vehicle type");
    println!("  history <plate>                 - Show finished stays of <plate>");
    println!("  api status                      - Print the inventory as a status response");
    println!("  api allocate <json>             - Handle a JSON allocation request");
    println!("  api exit <json>                 - Handle a JSON exit request");
    println!("  api request <plate> <type> <h>  - Print the JSON allocation request for a vehicle");
    println!("  help / ?                        - Show this help menu");
    println!("  exit / quit                     - Leave the console\n");
}

/// Runs one console line. Returns `false` when the user asked to quit.
fn execute(facility: &mut Facility, line: &str) -> Result<bool, Box<dyn Error>> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts[0] {
        "ls" => list(facility, parts.get(1).copied().unwrap_or("a")),
        "park" => {
            if let (Some(plate), Some(kind), Some(hours)) = (parts.get(1), parts.get(2), parts.get(3)) {
                let vehicle_type = kind.parse::<VehicleType>()?;
                let hours = hours.parse::<f64>()?;
                let entry = VehicleEntry::new(plate, vehicle_type, time_arg(parts.get(4))?, hours);
                let result = facility.admit(&entry)?;
                report(&entry.license_plate, &result);
            } else {
                println!("Usage: park <plate> <type> <hours> [HH:MM]");
            }
        }
        "leave" => {
            if let Some(plate) = parts.get(1) {
                let record = facility.depart(plate, time_arg(parts.get(2))?)?;
                println!(
                    "{}",
                    format!(
                        "Vehicle {} left Floor {}, Spot {} after {}.",
                        record.license_plate,
                        record.floor + 1,
                        record.spot_id,
                        record.duration()
                    )
                    .green()
                );
            } else {
                println!("Usage: leave <plate> [HH:MM]");
            }
        }
        "spot" => {
            if let Some(id) = parts.get(1) {
                match facility.inventory().get(id.parse()?) {
                    Some(spot) => print_table(&[spot.row()]),
                    None => println!("Spot {} does not exist.", id),
                }
            } else {
                println!("Usage: spot <id>");
            }
        }
        "stats" => stats(facility),
        "history" => {
            if let Some(plate) = parts.get(1) {
                let stays = facility.history(plate).cloned().collect::<Vec<_>>();
                if stays.is_empty() {
                    println!("No finished stays for {}.", plate);
                } else {
                    print_table(&stays);
                }
            } else {
                println!("Usage: history <plate>");
            }
        }
        "api" => {
            let sub = parts.get(1).copied().unwrap_or("");
            let body = line
                .trim_start()
                .strip_prefix("api")
                .map(|rest| rest.trim_start())
                .and_then(|rest| rest.strip_prefix(sub))
                .unwrap_or("")
                .trim();
            api(facility, sub, body)?;
        }
        "help" | "?" => help(),
        "exit" | "quit" => return Ok(false),
        other => println!("Unknown command: {}", other),
    }
    Ok(true)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .init();

    let args = Args::parse();
    let inventory = match &args.scenario {
        Some(path) => {
            let inventory = Inventory::load_from_file(path)?;
            println!("Garage online. Loaded {} spots from {}", inventory.spots().len(), path.display());
            inventory
        }
        None => {
            let inventory = Inventory::with_layout(args.floors, args.spots_per_floor)?;
            println!(
                "Garage online. {} floors with {} spots each",
                args.floors, args.spots_per_floor
            );
            inventory
        }
    };
    info!(spots = inventory.spots().len(), floors = inventory.floors().len(), "inventory ready");
    let mut facility = Facility::new(inventory);

    let config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let helper = CompleteHelper {
        commands: ["ls", "park", "leave", "spot", "stats", "history", "api", "help", "exit"]
            .iter()
            .map(|c| c.to_string())
            .collect(),
    };

    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(helper));

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                rl.add_history_entry(trimmed)?;

                match execute(&mut facility, trimmed) {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(err) => println!("{} {}", "Error:".red(), err),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
