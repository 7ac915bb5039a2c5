//! hwsnap - one-shot hardware and OS snapshot.
//!
//! Usage:
//!   hwsnap                      # text report with built-in defaults
//!   hwsnap -c /etc/hwsnap.yaml  # load settings from YAML
//!   hwsnap -f json              # snapshot and diagnostics as JSON
//!   hwsnap -q -f json           # errors only on stderr

use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::level_filters::LevelFilter;
use tracing::{Level, debug, error, info};
use tracing_subscriber::EnvFilter;

use hwsnap::collector::{Collector, Diagnostics, RealFs};
use hwsnap::config::Config;
use hwsnap::fmt::{
    FmtStyle, display_or_unknown, format_bytes, format_opt_bytes, format_opt_percent,
};
use hwsnap::model::Snapshot;

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Point-in-time hardware and OS snapshot for Linux.
#[derive(Parser)]
#[command(name = "hwsnap", about = "Hardware and OS snapshot collector", version)]
struct Args {
    /// YAML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let config = match &args.config {
        Some(path) => match Config::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    let mut collector = match Collector::new(RealFs::new(), &config.paths) {
        Ok(collector) => collector,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let (snapshot, diagnostics) = collector.collect_snapshot(&config);
    if let Some(timing) = collector.last_timing() {
        debug!(
            total_ms = timing.total.as_millis() as u64,
            devices_ms = timing.devices.as_millis() as u64,
            temps_ms = timing.temps.as_millis() as u64,
            "collection timing"
        );
    }
    info!(
        diagnostics = diagnostics.len(),
        "collected {}",
        describe_snapshot(&snapshot)
    );

    let output = match args.format {
        OutputFormat::Json => {
            let document = serde_json::json!({
                "snapshot": snapshot,
                "diagnostics": diagnostics,
            });
            match serde_json::to_string_pretty(&document) {
                Ok(json) => json,
                Err(e) => {
                    error!("failed to serialize snapshot: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
        OutputFormat::Text => {
            let mut report = String::new();
            if let Err(e) = write_report(&mut report, &snapshot, &diagnostics) {
                error!("failed to render report: {}", e);
                return ExitCode::FAILURE;
            }
            report
        }
    };
    println!("{}", output);
    ExitCode::SUCCESS
}

/// Initializes the tracing subscriber on stderr.
/// Default level is INFO; `RUST_LOG` overrides.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Describes the contents of a snapshot for logging.
fn describe_snapshot(snapshot: &Snapshot) -> String {
    let parts = [
        (snapshot.cpus.len(), "cpus"),
        (snapshot.disks.len(), "disks"),
        (snapshot.mounts.len(), "mounts"),
        (snapshot.devices.len(), "devices"),
        (snapshot.network.len(), "interfaces"),
        (snapshot.raid.len(), "raid arrays"),
        (snapshot.temps.len(), "sensors"),
    ];
    parts
        .iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, what)| format!("{} {}", n, what))
        .collect::<Vec<_>>()
        .join(", ")
}

fn write_report(
    out: &mut String,
    s: &Snapshot,
    diagnostics: &Diagnostics,
) -> std::fmt::Result {
    writeln!(out, "Collected:  {}", s.collected_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
    writeln!(out, "OS:         {}", display_or_unknown(s.os.as_deref()))?;
    writeln!(out, "Kernel:     {}", display_or_unknown(s.kernel.as_deref()))?;
    writeln!(out, "Hostname:   {}", display_or_unknown(s.hostname.as_deref()))?;
    if let Some(uptime) = &s.uptime {
        writeln!(out, "Uptime:     {}", uptime.text)?;
    }
    if let Some(load) = &s.load {
        writeln!(
            out,
            "Load:       {:.2} {:.2} {:.2}",
            load.now, load.five_min, load.fifteen_min
        )?;
    }

    if let Some(mem) = &s.memory {
        writeln!(out, "\nMemory")?;
        writeln!(
            out,
            "  physical  {} total, {} free",
            format_bytes(mem.total, FmtStyle::Detail),
            format_bytes(mem.free, FmtStyle::Detail)
        )?;
        writeln!(
            out,
            "  swap      {} total, {} free, {} cached",
            format_bytes(mem.swap_total, FmtStyle::Detail),
            format_bytes(mem.swap_free, FmtStyle::Detail),
            format_bytes(mem.swap_cached, FmtStyle::Detail)
        )?;
        for swap in &mem.swaps {
            writeln!(
                out,
                "  {:<16} {:<9} {} used of {}",
                swap.device,
                swap.kind,
                format_bytes(swap.used, FmtStyle::Compact),
                format_bytes(swap.size, FmtStyle::Compact)
            )?;
        }
    }

    if !s.cpus.is_empty() {
        writeln!(out, "\nProcessors ({})", s.cpus.len())?;
        for (i, cpu) in s.cpus.iter().enumerate() {
            writeln!(
                out,
                "  cpu{:<3} {} {} @ {} MHz",
                i,
                display_or_unknown(cpu.vendor.as_deref()),
                display_or_unknown(cpu.model.as_deref()),
                display_or_unknown(cpu.mhz)
            )?;
        }
    }

    if !s.disks.is_empty() {
        writeln!(out, "\nStorage")?;
        for disk in &s.disks {
            writeln!(
                out,
                "  {:<10} {} {}{}  reads {} writes {}",
                disk.device,
                display_or_unknown(disk.vendor.as_deref()),
                display_or_unknown(disk.name.as_deref()),
                if disk.removable { " (removable)" } else { "" },
                display_or_unknown(disk.reads),
                display_or_unknown(disk.writes)
            )?;
        }
    }

    if !s.mounts.is_empty() {
        writeln!(out, "\nMounts")?;
        for m in &s.mounts {
            writeln!(
                out,
                "  {:<20} {:<20} {:<6} {:>9} {:>9} {:>5}",
                m.device,
                m.mount_point,
                m.fs_type,
                format_opt_bytes(m.size, FmtStyle::Compact),
                format_opt_bytes(m.used, FmtStyle::Compact),
                format_opt_percent(m.used_percent)
            )?;
        }
    }

    if !s.raid.is_empty() {
        writeln!(out, "\nRAID")?;
        for array in &s.raid {
            let members: Vec<_> = array.members.iter().map(|m| m.device.as_str()).collect();
            writeln!(
                out,
                "  {} {} raid{} [{}/{}] [{}] {}",
                array.device,
                array.status,
                array.level,
                array.total_count,
                array.active_count,
                array.chart,
                members.join(" ")
            )?;
        }
    }

    if !s.devices.is_empty() {
        writeln!(out, "\nDevices")?;
        for dev in &s.devices {
            writeln!(out, "  {:<4} {}: {}", dev.bus, dev.vendor, dev.device)?;
        }
    }

    if !s.network.is_empty() {
        writeln!(out, "\nNetwork")?;
        for iface in &s.network {
            writeln!(
                out,
                "  {:<10} {:?} rx {} tx {}",
                iface.name,
                iface.state,
                format_bytes(iface.received.bytes, FmtStyle::Compact),
                format_bytes(iface.sent.bytes, FmtStyle::Compact)
            )?;
        }
    }

    if !s.wifi.is_empty() {
        writeln!(out, "\nWireless")?;
        for link in &s.wifi {
            writeln!(
                out,
                "  {:<10} link {} level {} noise {}",
                link.device, link.quality_link, link.quality_level, link.quality_noise
            )?;
        }
    }

    if !s.batteries.is_empty() {
        writeln!(out, "\nBatteries")?;
        for bat in &s.batteries {
            writeln!(out, "  {} {} {}", bat.device, bat.percentage_label(), bat.state)?;
        }
    }

    if !s.temps.is_empty() {
        writeln!(out, "\nSensors")?;
        for t in &s.temps {
            writeln!(out, "  {:<12} {:<24} {} {}", t.path, t.name, t.value, t.unit)?;
        }
    }

    if !diagnostics.is_empty() {
        writeln!(out, "\nDiagnostics")?;
        for d in diagnostics.iter() {
            writeln!(out, "  {}", d)?;
        }
    }
    Ok(())
}
