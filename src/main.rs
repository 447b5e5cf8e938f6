use encircled_energy::{scale::Fixed, Analysis, ImageSource, NpyImage, Report};
use glob::glob;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "encircled-energy",
    about = "Centroid, background and encircled energy of focal plane images"
)]
struct Opt {
    /// Numpy image files or glob patterns (e.g. "captures/*.npy")
    #[structopt(required = true)]
    images: Vec<String>,
    /// Study radius [mm]
    #[structopt(long, default_value = "1.5")]
    radius_mm: f64,
    /// Study radius [px], overrides the radius in mm
    #[structopt(long)]
    radius_px: Option<usize>,
    /// Plate scale [px/mm], defaults to the ASI294 camera scale
    #[structopt(long)]
    pixels_per_mm: Option<f64>,
    /// Analyze the images in parallel
    #[structopt(short, long)]
    parallel: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let mut sources = vec![];
    for pattern in &opt.images {
        for path in glob(pattern)? {
            sources.push(NpyImage::new(path?));
        }
    }
    if sources.is_empty() {
        anyhow::bail!("no image matching {:?}", opt.images);
    }
    log::info!("Found {} images", sources.len());

    let mut analysis = Analysis::default().study_radius_mm(opt.radius_mm);
    if let Some(radius) = opt.radius_px {
        analysis = analysis.study_radius_pixels(radius);
    }
    if let Some(scale) = opt.pixels_per_mm {
        analysis = analysis.scale(Fixed(scale));
    }

    let results: Vec<_> = if opt.parallel {
        analysis.run_batch(&sources)
    } else {
        sources
            .iter()
            .map(|source| (source.name(), analysis.run(source)))
            .collect()
    };

    let mut reports: Vec<Report> = vec![];
    for (name, result) in results {
        match result {
            Ok(report) => {
                println!("{report}");
                reports.push(report);
            }
            Err(e) => log::warn!("{name}: {e}"),
        }
    }

    println!("SUMMARY:");
    println!(" - # of images: {}/{}", reports.len(), sources.len());
    if !reports.is_empty() {
        println!("    {:^24}: {:^12} {:^12}", "IMAGE", "EE50 [mm]", "EE95 [mm]");
        let mm = |v: Option<f64>| v.map_or_else(|| String::from("n/a"), |v| format!("{v:.3}"));
        for report in &reports {
            println!(
                "  - {:24}: {:>12} {:>12}",
                report.name,
                mm(report.ee50_mm()),
                mm(report.ee95_mm())
            );
        }
    }

    Ok(())
}
