use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use vein_detect::tools::{
    dataset_iter, dataset_root_from_env, grayscale_stats, load_config, load_rgb, mask_stats,
    smoke_from_env, write_outputs, write_stats_json,
};
use vein_detect::{Detection, VeinConfig, detect_veins};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "veintool", version, about = "Hand vein detection CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run vein detection on a single image
    Detect {
        /// Path to the input image.
        #[arg(long)]
        image: PathBuf,
        /// Directory for hand_mask.png, enhanced.png, vein_mask.png and overlay.png.
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// JSON config file; missing fields keep their defaults.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Path to write the statistics as JSON.
        #[arg(long)]
        stats_json: Option<PathBuf>,
    },
    /// Run detection on every image of a dataset in parallel
    Batch {
        /// Dataset root (defaults to VEIN_DATASET_ROOT or data/hands).
        #[arg(long)]
        root: Option<PathBuf>,
        /// Process at most this many images.
        #[arg(long)]
        limit: Option<usize>,
        /// Only process the images listed in `_smoke.txt`.
        #[arg(long)]
        smoke: bool,
        /// JSON config file; missing fields keep their defaults.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the default configuration as JSON
    Config,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Detect {
            image,
            out_dir,
            config,
            stats_json,
        } => detect_cmd(&image, out_dir.as_deref(), config.as_deref(), stats_json.as_deref()),
        Command::Batch {
            root,
            limit,
            smoke,
            config,
        } => batch_cmd(root, limit, smoke, config.as_deref()),
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&VeinConfig::default())?);
            Ok(())
        }
    }
}

fn detect_cmd(
    image: &Path,
    out_dir: Option<&Path>,
    config: Option<&Path>,
    stats_json: Option<&Path>,
) -> CliResult<()> {
    let config = load_config(config)?;
    let rgb = load_rgb(image).map_err(|e| -> CliError {
        format!("Failed to load image {}: {}", image.display(), e).into()
    })?;
    let (width, height) = rgb.dimensions();
    println!("Image: {} ({}x{})", image.display(), width, height);

    let start = Instant::now();
    let detection = detect_veins(&rgb, &config)?;
    let elapsed = start.elapsed();

    let analysis = match detection {
        Detection::Complete(analysis) => analysis,
        Detection::NoHandDetected { .. } => {
            println!("No hand detected ({:.1} ms)", elapsed.as_secs_f64() * 1000.0);
            return Ok(());
        }
    };

    let gray = grayscale_stats(&analysis.enhanced);
    let hand = mask_stats(&analysis.hand_mask);
    let veins = mask_stats(&analysis.vein_mask);
    println!(
        "Enhanced range: {}-{}, average: {}",
        gray.min, gray.max, gray.avg
    );
    println!(
        "Hand mask: {} px ({:.2}% of image), vein mask: {} px",
        hand.set_pixels,
        hand.set_ratio * 100.0,
        veins.set_pixels
    );
    println!(
        "Contours: {} accepted, {} rejected ({:.1} ms)",
        analysis.accepted.len(),
        analysis.rejected.len(),
        elapsed.as_secs_f64() * 1000.0
    );
    println!();
    print!("{}", analysis.statistics);

    if let Some(dir) = out_dir {
        for path in write_outputs(dir, &analysis)? {
            tracing::info!("Wrote {}", path.display());
        }
    }
    if let Some(path) = stats_json {
        write_stats_json(path, &analysis.statistics)?;
        tracing::info!("Statistics written to {}", path.display());
    }

    Ok(())
}

fn batch_cmd(
    root: Option<PathBuf>,
    limit: Option<usize>,
    smoke: bool,
    config: Option<&Path>,
) -> CliResult<()> {
    let config = load_config(config)?;
    let root = root.unwrap_or_else(dataset_root_from_env);
    let smoke = smoke || smoke_from_env();
    let images: Vec<PathBuf> = dataset_iter(&root, limit, smoke).collect();
    if images.is_empty() {
        println!("No images found in {}", root.display());
        return Ok(());
    }

    let start = Instant::now();
    let lines: Vec<(bool, String)> = images
        .par_iter()
        .map(|path| {
            let rgb = match load_rgb(path) {
                Ok(rgb) => rgb,
                Err(e) => return (false, format!("{}: load failed: {}", path.display(), e)),
            };
            match detect_veins(&rgb, &config) {
                Ok(Detection::Complete(analysis)) => (
                    true,
                    format!(
                        "{}: {} veins, {} accepted",
                        path.display(),
                        analysis.statistics.count(),
                        analysis.accepted.len()
                    ),
                ),
                Ok(Detection::NoHandDetected { .. }) => {
                    (false, format!("{}: no hand detected", path.display()))
                }
                Err(e) => (false, format!("{}: {}", path.display(), e)),
            }
        })
        .collect();

    let mut complete = 0usize;
    for (ok, line) in &lines {
        if *ok {
            complete += 1;
        }
        println!("{}", line);
    }
    println!(
        "Analysed {}/{} images in {:.2} s",
        complete,
        lines.len(),
        start.elapsed().as_secs_f64()
    );

    Ok(())
}
