use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::Parser;

use cargo_report::capture::{CaptureConfig, ImageSurface};
use cargo_report::model::{LoadPlan, ReportData};
use cargo_report::report::LayoutConfig;

/// Export a computed container load plan as a 2x PNG and/or a PDF report.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// JSON file with `container` and the optimizer's `result`
    #[arg(short, long)]
    input: PathBuf,

    /// PNG frame dumped from the 3D viewer
    #[arg(short, long)]
    surface: Option<PathBuf>,

    /// Directory the exports are written to
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Write the PNG export
    #[arg(long)]
    image: bool,

    /// Write the PDF report (default when neither --image nor --pdf is given)
    #[arg(long)]
    pdf: bool,

    /// JSON file overriding layout constants
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Report date, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    date: Option<NaiveDate>,
}

fn run(args: Args) -> cargo_report::Result<()> {
    let plan: LoadPlan = serde_json::from_slice(&std::fs::read(&args.input)?)?;
    let layout: LayoutConfig = match &args.layout {
        Some(path) => serde_json::from_slice(&std::fs::read(path)?)?,
        None => LayoutConfig::default(),
    };
    let date = args
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let surface = args
        .surface
        .as_deref()
        .map(ImageSurface::open)
        .transpose()?;
    if surface.is_none() {
        log::warn!("no --surface given, nothing to export");
    }

    let capture_config = CaptureConfig::default();
    let want_pdf = args.pdf || !args.image;

    futures::executor::block_on(async {
        if args.image {
            if let Some(path) =
                cargo_report::export_image(surface.as_ref(), &args.out_dir, date, &capture_config).await?
            {
                println!("{}", path.display());
            }
        }
        if want_pdf {
            let data = ReportData::new(&plan.container, &plan.result, date);
            if let Some(path) = cargo_report::export_report(
                surface.as_ref(),
                &data,
                &args.out_dir,
                &capture_config,
                &layout,
            )
            .await?
            {
                println!("{}", path.display());
            }
        }
        Ok::<(), cargo_report::Error>(())
    })
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
