//! Convert a Fusion 360 tool library (Library.json) to a LinuxCNC tool table.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use ngcseam::{init_logging, TeeWriter};
use ngcseam_toollib::{
    convert_file, parse_pocket_map, ConvertOptions, PocketPolicy, SortKey, ZSource, ZSourceKind,
    DEFAULT_TOOL_TABLE,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ZSourceArg {
    /// 0.000 for every tool (touch-off workflow)
    Zero,
    /// geometry.assemblyGaugeLength
    Assembly,
    /// Constant from --z-value
    Value,
}

impl From<ZSourceArg> for ZSourceKind {
    fn from(arg: ZSourceArg) -> Self {
        match arg {
            ZSourceArg::Zero => ZSourceKind::Zero,
            ZSourceArg::Assembly => ZSourceKind::Assembly,
            ZSourceArg::Value => ZSourceKind::Value,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SortArg {
    Tool,
    Pocket,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Tool => SortKey::Tool,
            SortArg::Pocket => SortKey::Pocket,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "ngcseam-toollib",
    version,
    long_version = ngcseam::LONG_VERSION,
    about = "Convert Fusion 360 Library.json to LinuxCNC tool.tbl"
)]
struct Args {
    /// Path to Fusion 360 Library.json
    input: PathBuf,

    /// Output tool.tbl path
    #[arg(short, long, default_value = DEFAULT_TOOL_TABLE)]
    output: PathBuf,

    /// Z length source
    #[arg(long, value_enum, default_value_t = ZSourceArg::Zero, conflicts_with = "z_zero")]
    z_source: ZSourceArg,

    /// Shorthand for --z-source zero
    #[arg(long)]
    z_zero: bool,

    /// Constant Z length (mm); implies --z-source value
    #[arg(long, allow_negative_numbers = true)]
    z_value: Option<f64>,

    /// Force the same pocket number for all tools
    #[arg(long, allow_negative_numbers = true)]
    pocket_fixed: Option<i64>,

    /// Pocket = tool + offset (e.g. offset 100: T5 => P105)
    #[arg(long, allow_negative_numbers = true)]
    pocket_offset: Option<i64>,

    /// Explicit pocket map like 'T1:5,T2:3,T40:1'
    #[arg(long)]
    pocket_map: Option<String>,

    /// Sort output by tool or pocket
    #[arg(long, value_enum, default_value_t = SortArg::Tool)]
    sort: SortArg,

    /// Enable verbose debug output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn options(&self) -> anyhow::Result<ConvertOptions> {
        let kind = if self.z_zero {
            ZSourceKind::Zero
        } else {
            self.z_source.into()
        };
        let map = match &self.pocket_map {
            Some(mapping) => parse_pocket_map(mapping)?,
            None => Default::default(),
        };

        Ok(ConvertOptions {
            z_source: ZSource::resolve(kind, self.z_value)?,
            pockets: PocketPolicy::new()
                .with_map(map)
                .with_fixed(self.pocket_fixed)
                .with_offset(self.pocket_offset),
            sort: self.sort.into(),
        })
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let options = args.options()?;
    let table = convert_file(&args.input, &args.output, &options)
        .with_context(|| format!("Failed to convert {}", args.input.display()))?;

    if table.skipped > 0 {
        tracing::info!("Skipped {} entries without a tool number", table.skipped);
    }
    println!("Wrote {}", args.output.display());
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(err) = init_logging(args.verbose, TeeWriter::console()) {
        eprintln!("Error: {:#}", err);
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
