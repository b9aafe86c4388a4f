use clap::{Parser, Subcommand};
use sf_app::{project_service, run_service, AppResult, DeviceReport, RunRequest};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sf-cli")]
#[command(
    about = "SensorFlow CLI - plant sensor enrichment and event detection",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate project file syntax and structure
    Validate {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
    },
    /// List devices in a project
    Devices {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
    },
    /// Enrich device data and write points as JSON lines
    Run {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
        /// Device to run (repeatable); all devices when omitted
        #[arg(short, long = "device")]
        devices: Vec<String>,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print each device's derived-field units
        #[arg(long)]
        units: bool,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Devices { project_path } => cmd_devices(&project_path),
        Commands::Run {
            project_path,
            devices,
            output,
            units,
        } => cmd_run(&project_path, devices, output.as_deref(), units),
    }
}

fn cmd_validate(project_path: &Path) -> AppResult<()> {
    eprintln!("Validating project: {}", project_path.display());
    let project = project_service::load_project(project_path)?;
    eprintln!(
        "✓ Project '{}' is valid ({} devices)",
        project.name,
        project.devices.len()
    );
    Ok(())
}

fn cmd_devices(project_path: &Path) -> AppResult<()> {
    let project = project_service::load_project(project_path)?;
    let devices = project_service::list_devices(&project);

    if devices.is_empty() {
        println!("No devices found in project");
    } else {
        println!("Devices in project:");
        for d in devices {
            println!(
                "  {} - {} ({} columns{})",
                d.id,
                d.use_case,
                d.header_count,
                if d.has_data { "" } else { ", no data file" }
            );
        }
    }
    Ok(())
}

fn cmd_run(
    project_path: &Path,
    device_ids: Vec<String>,
    output: Option<&Path>,
    show_units: bool,
) -> AppResult<()> {
    let request = RunRequest {
        project_path,
        device_ids,
    };
    let response = run_service::run_project(&request)?;

    let mut out: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    for report in &response.reports {
        for point in &report.points {
            serde_json::to_writer(&mut out, point)?;
            writeln!(out)?;
        }
    }
    out.flush()?;

    for report in &response.reports {
        print_report(report, show_units);
    }

    let mut failures = response.failures.into_iter();
    match failures.next() {
        None => Ok(()),
        Some((id, first)) => {
            eprintln!("✗ {id}: {first}");
            for (id, err) in failures {
                eprintln!("✗ {id}: {err}");
            }
            Err(first)
        }
    }
}

fn print_report(report: &DeviceReport, show_units: bool) {
    eprintln!(
        "✓ {} ({}): {} rows -> {} points in {:.3}s",
        report.device_id,
        report.use_case,
        report.rows,
        report.points.len(),
        report.elapsed_s
    );
    if report.property_failures > 0 {
        eprintln!(
            "  {} property lookups unresolved (fields left null)",
            report.property_failures
        );
    }
    if show_units {
        for (field, unit) in &report.units {
            eprintln!("  {field:<28} {unit}");
        }
    }
}
