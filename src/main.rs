// Example runner for the `hina` library: builds a dataset from a
// directory-per-class tree, shuffles and splits it, logs a summary and can dump
// one sample back to disk as a PNG for a quick visual check.

use anyhow::{Context, bail};
use hina::logging::{LogConfig, init_logging};
use hina::{
    BuildConfig, BuildOutput, ColorMode, DatasetBuilder, ScanErrorPolicy, build_parallel,
    encode_png_as,
};
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};

const USAGE: &str = "Usage: hina <dataset_root> [--color] [--resize WxH] [--seed N] \
[--train-fraction F] [--preview out.png] [--strict] [--parallel] [--verbose]";

#[derive(Debug)]
struct Args {
    root: PathBuf,
    config: BuildConfig,
    seed: u64,
    train_fraction: f64,
    preview: Option<PathBuf>,
    parallel: bool,
    verbose: bool,
}

fn parse_args(raw: &[String]) -> anyhow::Result<Args> {
    let mut iter = raw.iter();
    let root = iter.next().context(USAGE)?;
    let mut args = Args {
        root: PathBuf::from(root),
        config: BuildConfig::default(),
        seed: 0,
        train_fraction: 0.8,
        preview: None,
        parallel: false,
        verbose: false,
    };

    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "--color" => args.config = args.config.color_mode(ColorMode::Color),
            "--strict" => args.config = args.config.scan_errors(ScanErrorPolicy::Fail),
            "--parallel" => args.parallel = true,
            "--verbose" => args.verbose = true,
            "--resize" => {
                let value = iter.next().context("--resize needs WxH")?;
                let (w, h) = value
                    .split_once('x')
                    .with_context(|| format!("invalid size '{}', expected WxH", value))?;
                args.config = args.config.resize_to(w.parse()?, h.parse()?);
            }
            "--seed" => {
                args.seed = iter.next().context("--seed needs a number")?.parse()?;
            }
            "--train-fraction" => {
                args.train_fraction = iter.next().context("--train-fraction needs a number")?.parse()?;
            }
            "--preview" => {
                args.preview = Some(PathBuf::from(iter.next().context("--preview needs a path")?));
            }
            other => bail!("unknown argument '{}'\n{}", other, USAGE),
        }
    }

    Ok(args)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let raw: Vec<String> = env::args().skip(1).collect();
    if raw.is_empty() {
        println!("{}", USAGE);
        return Ok(());
    }
    let args = parse_args(&raw)?;

    let log_config = if args.verbose { LogConfig::verbose() } else { LogConfig::default() };
    init_logging(&log_config)?;

    let BuildOutput {
        mut dataset,
        classes,
        scan_errors,
    } = if args.parallel {
        build_parallel(&args.root, args.config.clone(), None).await?
    } else {
        DatasetBuilder::new(args.config.clone()).build(&args.root)?
    };

    for err in &scan_errors {
        warn!("Tolerated scan error: {}", err);
    }
    if dataset.is_empty() {
        bail!("no samples found under {:?}", args.root);
    }

    let counts = dataset.class_counts(classes.len());
    for (label, name) in classes.iter() {
        info!("  [{}] {}: {} samples", label, name, counts[label as usize]);
    }
    match dataset.uniform_shape() {
        Some(shape) => info!("All samples are {}x{}x{}", shape.width, shape.height, shape.channels),
        None => info!("Samples have mixed shapes; pass --resize to normalise them"),
    }

    dataset.shuffle_seeded(args.seed);
    let (train, eval) = dataset.split(args.train_fraction)?;
    info!("Split into {} training and {} evaluation samples", train.len(), eval.len());

    if let Some(path) = &args.preview {
        let source = if train.is_empty() { &eval } else { &train };
        if let Some((pixels, label, shape)) = source.get(0) {
            let mode = if shape.channels == 1 { ColorMode::Grayscale } else { ColorMode::Color };
            encode_png_as(pixels, shape.width, shape.height, mode, path)?;
            info!(
                "Wrote preview of a '{}' sample to {:?}",
                classes.name_of(label).unwrap_or("?"),
                path
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_flags_into_build_config() {
        let args = parse_args(&strings(&[
            "data", "--color", "--resize", "28x14", "--seed", "9", "--strict", "--preview", "p.png",
        ]))
        .unwrap();

        assert_eq!(args.root, PathBuf::from("data"));
        assert_eq!(args.config.color_mode, ColorMode::Color);
        assert_eq!(args.config.resize_to, Some((28, 14)));
        assert_eq!(args.config.scan_errors, ScanErrorPolicy::Fail);
        assert_eq!(args.seed, 9);
        assert_eq!(args.preview, Some(PathBuf::from("p.png")));
        assert!(!args.parallel);
    }

    #[test]
    fn rejects_unknown_flags_and_bad_sizes() {
        assert!(parse_args(&strings(&["data", "--fast"])).is_err());
        assert!(parse_args(&strings(&["data", "--resize", "28"])).is_err());
        assert!(parse_args(&strings(&["data", "--seed"])).is_err());
    }
}
