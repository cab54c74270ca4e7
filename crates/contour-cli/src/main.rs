use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use contour_lib::{
    config::{parse_pulse_map, read_config, PipelineConfig},
    intervals::{BoundaryPolicy, IntervalIndex},
    io::table as table_io,
    labeling::label,
    normalize::normalize,
    overlap::Keep,
    pipeline::run_pipeline,
    resample::{summarize, PulseCounts},
    signal::{Interval, Point},
};
use log::info;
use serde::Serialize;
use std::{
    io,
    path::{Path, PathBuf},
};

#[derive(Parser)]
#[command(
    name = "contour",
    version,
    about = "Contour: interval labeling and piecewise pulse resampling"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Policy {
    #[value(name = "left-closed-right-open")]
    LeftClosedRightOpen,
    #[value(name = "left-open-right-closed")]
    LeftOpenRightClosed,
    #[value(name = "closed")]
    Closed,
}

impl From<Policy> for BoundaryPolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::LeftClosedRightOpen => BoundaryPolicy::LeftClosedRightOpen,
            Policy::LeftOpenRightClosed => BoundaryPolicy::LeftOpenRightClosed,
            Policy::Closed => BoundaryPolicy::Closed,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum KeepSide {
    Left,
    Right,
}

impl From<KeepSide> for Keep {
    fn from(side: KeepSide) -> Self {
        match side {
            KeepSide::Left => Keep::Left,
            KeepSide::Right => Keep::Right,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
}

#[derive(Args)]
struct TableArgs {
    /// CSV with group_id,timestamp,value
    #[arg(long)]
    points: PathBuf,
    /// CSV with group_id,interval_index,label,start_time,end_time
    #[arg(long)]
    intervals: PathBuf,
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,
    /// Write CSV to this file instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args)]
struct ResampleArgs {
    #[arg(long, value_enum, default_value = "left-closed-right-open")]
    boundary_policy: Policy,
    /// Same pulse count for every interval
    #[arg(long, default_value_t = 10, conflicts_with = "pulses_per_interval")]
    pulses: usize,
    /// Per-interval counts, e.g. "1=15,2=14,3=14"
    #[arg(long)]
    pulses_per_interval: Option<String>,
    /// Drop duplicated boundary pulses, keeping the left or right copy
    #[arg(long, value_enum)]
    keep: Option<KeepSide>,
    #[arg(long)]
    normalize_time: bool,
}

impl ResampleArgs {
    fn to_config(&self) -> Result<PipelineConfig> {
        let pulses_per_section = match &self.pulses_per_interval {
            Some(text) => parse_pulse_map(text)?,
            None => PulseCounts::Uniform(self.pulses),
        };
        Ok(PipelineConfig {
            boundary_policy: self.boundary_policy.into(),
            keep: self.keep.map(Keep::from),
            normalize_time: self.normalize_time,
            pulses_per_section,
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Assign points to the intervals containing them
    Label {
        #[command(flatten)]
        tables: TableArgs,
        #[arg(long, value_enum, default_value = "left-closed-right-open")]
        boundary_policy: Policy,
    },
    /// Label points, then rescale each interval's time axis to [0, 1]
    Normalize {
        #[command(flatten)]
        tables: TableArgs,
        #[arg(long, value_enum, default_value = "left-closed-right-open")]
        boundary_policy: Policy,
    },
    /// Label → (normalize) → resample → (resolve boundaries) in one shot
    Resample {
        #[command(flatten)]
        tables: TableArgs,
        #[command(flatten)]
        options: ResampleArgs,
    },
    /// Run the resampling pipeline from a TOML config file
    Pipeline {
        #[command(flatten)]
        tables: TableArgs,
        #[arg(long)]
        config: PathBuf,
    },
    /// Per-interval pulse counts and value ranges after resampling
    Summarize {
        #[command(flatten)]
        tables: TableArgs,
        #[command(flatten)]
        options: ResampleArgs,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Label {
            tables,
            boundary_policy,
        } => cmd_label(&tables, boundary_policy.into(), false)?,
        Commands::Normalize {
            tables,
            boundary_policy,
        } => cmd_label(&tables, boundary_policy.into(), true)?,
        Commands::Resample { tables, options } => cmd_resample(&tables, &options.to_config()?)?,
        Commands::Pipeline { tables, config } => cmd_pipeline(&tables, &config)?,
        Commands::Summarize { tables, options } => cmd_summarize(&tables, &options.to_config()?)?,
    }
    Ok(())
}

fn load_tables(tables: &TableArgs) -> Result<(Vec<Point>, Vec<Interval>)> {
    let points = table_io::read_points(&tables.points)?;
    let intervals = table_io::read_intervals(&tables.intervals)?;
    info!(
        "loaded {} points and {} intervals",
        points.len(),
        intervals.len()
    );
    Ok((points, intervals))
}

fn emit<T: Serialize>(tables: &TableArgs, records: &[T]) -> Result<()> {
    if let Some(path) = tables.out.as_deref() {
        return write_csv_file(path, records);
    }
    match tables.format {
        OutputFormat::Json => {
            for record in records {
                println!("{}", serde_json::to_string(record)?);
            }
        }
        OutputFormat::Csv => table_io::write_records_to(io::stdout().lock(), records)?,
    }
    Ok(())
}

fn write_csv_file<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    table_io::write_records(path, records)?;
    info!("wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

fn cmd_label(tables: &TableArgs, policy: BoundaryPolicy, normalize_time: bool) -> Result<()> {
    let (points, intervals) = load_tables(tables)?;
    let index = IntervalIndex::new(&intervals)?;
    let labeled = label(&points, &index, policy);
    let labeled = if normalize_time {
        normalize(&labeled)?
    } else {
        labeled
    };
    emit(tables, &labeled)
}

fn cmd_resample(tables: &TableArgs, cfg: &PipelineConfig) -> Result<()> {
    let (points, intervals) = load_tables(tables)?;
    let pulses = run_pipeline(&points, &intervals, cfg)?;
    emit(tables, &pulses)
}

fn cmd_pipeline(tables: &TableArgs, config: &Path) -> Result<()> {
    let cfg = read_config(config)?;
    cmd_resample(tables, &cfg)
}

fn cmd_summarize(tables: &TableArgs, cfg: &PipelineConfig) -> Result<()> {
    let (points, intervals) = load_tables(tables)?;
    let pulses = run_pipeline(&points, &intervals, cfg)?;
    emit(tables, &summarize(&pulses))
}
