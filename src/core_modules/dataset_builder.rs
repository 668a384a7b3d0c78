// THEORY:
// The `DatasetBuilder` is the orchestrator of the whole pipeline. It is not a
// decoder or a scanner itself; it sequences them and assembles the result.
//
// Key architectural principles:
// 1.  **Folder = Class**: Every directory directly under the root is one class.
//     Classes are labelled 0, 1, 2, ... in discovery order (name order when the
//     config asks for sorting), and the numbering is returned as a `ClassIndex`.
// 2.  **Plan, then Load**: Building happens in two steps. `plan` walks the tree
//     and produces an ordered list of `(path, label)` jobs. Loading turns each job
//     into a buffer. Keeping the steps apart lets the parallel builder reuse the
//     exact same plan, so both builders yield identical datasets.
// 3.  **Two Severities**: Listing failures are soft and follow the configured
//     `ScanErrorPolicy`. Decode failures are hard and abort the build.
// 4.  **No Implicit Resize**: Images keep their native resolution unless
//     `resize_to` is set, in which case every buffer goes through the resampler
//     right after decoding.

use crate::config::{BuildConfig, ScanErrorPolicy};
use crate::core_modules::class_index::ClassIndex;
use crate::core_modules::dataset::Dataset;
use crate::core_modules::directory_scanner::{ScanEntry, ScanOptions, ScanOutcome, scan_dir};
use crate::core_modules::image_codec::decode;
use crate::core_modules::pixel_buffer::pixel_buffer::{ImageShape, Label, PixelBuffer};
use crate::core_modules::resampler::resampler::resize_shape;
use crate::error::{Result, ScanError};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Everything a build produces.
#[derive(Debug, Clone, Default)]
pub struct BuildOutput {
    pub dataset: Dataset,
    pub classes: ClassIndex,
    /// Listing failures tolerated under `ScanErrorPolicy::Collect`.
    pub scan_errors: Vec<ScanError>,
}

/// One file to decode and the label it will carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadJob {
    pub path: PathBuf,
    pub label: Label,
}

/// The ordered work list for a build, produced before any image is decoded.
#[derive(Debug, Clone, Default)]
pub struct BuildPlan {
    pub classes: ClassIndex,
    pub jobs: Vec<LoadJob>,
    pub scan_errors: Vec<ScanError>,
}

/// Sequential dataset builder.
pub struct DatasetBuilder {
    config: BuildConfig,
}

impl DatasetBuilder {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Scans `root`, decodes every image and assembles the dataset.
    pub fn build(&self, root: &Path) -> Result<BuildOutput> {
        info!("Building dataset from {:?}", root);
        let plan = plan(root, &self.config)?;

        let mut dataset = Dataset::with_capacity(plan.jobs.len());
        for job in &plan.jobs {
            let (pixels, shape) = load_sample(&job.path, &self.config)?;
            dataset.push(pixels, job.label, shape);
        }

        info!(
            "Built dataset: {} samples across {} classes",
            dataset.len(),
            plan.classes.len()
        );
        Ok(BuildOutput {
            dataset,
            classes: plan.classes,
            scan_errors: plan.scan_errors,
        })
    }
}

/// Walks `root` and lists every file to load, in label order.
pub fn plan(root: &Path, config: &BuildConfig) -> Result<BuildPlan> {
    let options = ScanOptions {
        sorted: config.sorted,
    };
    let mut plan = BuildPlan::default();

    let root_scan = scan_dir(root, options);
    let root_entries = absorb(root_scan, config.scan_errors, &mut plan.scan_errors)?;

    for entry in root_entries {
        if !entry.is_dir {
            debug!("Skipping non-directory {:?} at dataset root", entry.path);
            continue;
        }

        let label = plan.classes.register(entry.name());
        let mut files = Vec::new();
        let mut visited = HashSet::new();
        collect_files(
            &entry.path,
            config,
            &mut visited,
            &mut files,
            &mut plan.scan_errors,
        )?;

        if files.is_empty() {
            warn!("Class '{}' (label {}) has no files", entry.name(), label);
        } else {
            debug!("Class '{}' (label {}): {} files", entry.name(), label, files.len());
        }
        plan.jobs
            .extend(files.into_iter().map(|path| LoadJob { path, label }));
    }

    Ok(plan)
}

/// Decodes one file with the configured color mode and applies the optional resize.
pub fn load_sample(path: &Path, config: &BuildConfig) -> Result<(PixelBuffer, ImageShape)> {
    let decoded = decode(path, config.color_mode)?;
    let shape = decoded.shape();

    match config.resize_to {
        Some((width, height)) => resize_shape(&decoded.pixels, shape, width, height),
        None => Ok((decoded.pixels, shape)),
    }
}

/// Gathers the files of one class folder. `visited` holds the canonical path of
/// every directory already listed for this class, so a symlink that leads back
/// into the tree is listed once.
fn collect_files(
    dir: &Path,
    config: &BuildConfig,
    visited: &mut HashSet<PathBuf>,
    files: &mut Vec<PathBuf>,
    scan_errors: &mut Vec<ScanError>,
) -> Result<()> {
    // An unresolvable path falls through to `scan_dir`, which reports it.
    if let Ok(real) = fs::canonicalize(dir) {
        if !visited.insert(real) {
            debug!("Skipping already listed directory {:?}", dir);
            return Ok(());
        }
    }

    let scan = scan_dir(dir, ScanOptions { sorted: config.sorted });
    for entry in absorb(scan, config.scan_errors, scan_errors)? {
        if !entry.is_dir {
            files.push(entry.path);
        } else if config.recursive {
            collect_files(&entry.path, config, visited, files, scan_errors)?;
        } else {
            debug!("Skipping nested directory {:?}", entry.path);
        }
    }
    Ok(())
}

/// Applies the scan error policy to one listing and hands back its entries.
fn absorb(
    outcome: ScanOutcome,
    policy: ScanErrorPolicy,
    collected: &mut Vec<ScanError>,
) -> Result<Vec<ScanEntry>> {
    if let Some(first) = outcome.errors.first() {
        if policy == ScanErrorPolicy::Fail {
            return Err(first.clone().into());
        }
    }
    collected.extend(outcome.errors);
    Ok(outcome.entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::image_codec::encode_png;
    use crate::core_modules::pixel_buffer::pixel_buffer::ColorMode;
    use crate::error::HinaError;

    /// Writes `count` solid-color RGBA PNGs of `width x height` into `root/class`.
    fn write_class(root: &Path, class: &str, count: usize, width: u32, height: u32) {
        let dir = root.join(class);
        fs::create_dir_all(&dir).unwrap();
        for i in 0..count {
            let value = (i * 20) as u8;
            let buffer = vec![value; (width * height * 4) as usize];
            encode_png(&buffer, width, height, &dir.join(format!("img_{i}.png")))
                .expect("Error Saving File.");
        }
    }

    #[test]
    fn two_classes_yield_aligned_labels() {
        let root = tempfile::tempdir().expect("tempdir");
        write_class(root.path(), "class_a", 3, 4, 4);
        write_class(root.path(), "class_b", 5, 4, 4);

        let output = DatasetBuilder::new(BuildConfig::default())
            .build(root.path())
            .unwrap();

        assert_eq!(output.dataset.len(), 8);
        assert_eq!(output.dataset.labels(), &[0, 0, 0, 1, 1, 1, 1, 1]);
        assert_eq!(output.classes.label_of("class_a"), Some(0));
        assert_eq!(output.classes.label_of("class_b"), Some(1));
        assert!(output.scan_errors.is_empty());
        // Grayscale by default: one sample per pixel.
        assert!(output.dataset.images().iter().all(|img| img.len() == 16));
    }

    #[test]
    fn native_resolutions_are_kept_without_resize() {
        let root = tempfile::tempdir().expect("tempdir");
        write_class(root.path(), "small", 1, 2, 2);
        write_class(root.path(), "large", 1, 6, 3);

        let output = DatasetBuilder::new(BuildConfig::default())
            .build(root.path())
            .unwrap();

        assert_eq!(output.dataset.uniform_shape(), None);
        assert_eq!(output.dataset.shapes()[0], ImageShape::new(6, 3, 1));
        assert_eq!(output.dataset.shapes()[1], ImageShape::new(2, 2, 1));
    }

    #[test]
    fn resize_to_produces_uniform_color_samples() {
        let root = tempfile::tempdir().expect("tempdir");
        write_class(root.path(), "small", 2, 2, 2);
        write_class(root.path(), "large", 2, 9, 5);

        let config = BuildConfig::default()
            .color_mode(ColorMode::Color)
            .resize_to(4, 4);
        let output = DatasetBuilder::new(config).build(root.path()).unwrap();

        assert_eq!(output.dataset.uniform_shape(), Some(ImageShape::new(4, 4, 4)));
        assert!(output.dataset.images().iter().all(|img| img.len() == 64));
    }

    #[test]
    fn non_image_file_aborts_the_build() {
        let root = tempfile::tempdir().expect("tempdir");
        write_class(root.path(), "class_a", 2, 2, 2);
        fs::write(root.path().join("class_a").join("readme.txt"), b"hello").unwrap();

        let result = DatasetBuilder::new(BuildConfig::default()).build(root.path());

        assert!(matches!(result, Err(HinaError::Decode { .. })));
    }

    #[test]
    fn root_files_are_not_classes_and_empty_classes_keep_their_label() {
        let root = tempfile::tempdir().expect("tempdir");
        fs::write(root.path().join("labels.csv"), b"x").unwrap();
        fs::create_dir(root.path().join("a_empty")).unwrap();
        write_class(root.path(), "b_full", 2, 2, 2);

        let output = DatasetBuilder::new(BuildConfig::default())
            .build(root.path())
            .unwrap();

        assert_eq!(output.classes.len(), 2);
        assert_eq!(output.dataset.labels(), &[1, 1]);
    }

    #[test]
    fn nested_directories_only_followed_when_recursive() {
        let root = tempfile::tempdir().expect("tempdir");
        write_class(root.path(), "class_a", 1, 2, 2);
        write_class(&root.path().join("class_a"), "deeper", 2, 2, 2);

        let flat = DatasetBuilder::new(BuildConfig::default())
            .build(root.path())
            .unwrap();
        let deep = DatasetBuilder::new(BuildConfig::default().recursive(true))
            .build(root.path())
            .unwrap();

        assert_eq!(flat.dataset.len(), 1);
        assert_eq!(deep.dataset.len(), 3);
        assert_eq!(deep.classes.len(), 1);
    }

    #[test]
    fn missing_root_is_soft_unless_strict() {
        let root = tempfile::tempdir().expect("tempdir");
        let missing = root.path().join("nope");

        let lenient = DatasetBuilder::new(BuildConfig::default())
            .build(&missing)
            .unwrap();
        assert!(lenient.dataset.is_empty());
        assert_eq!(lenient.scan_errors.len(), 1);

        let strict = DatasetBuilder::new(BuildConfig::default().scan_errors(ScanErrorPolicy::Fail))
            .build(&missing);
        assert!(matches!(strict, Err(HinaError::Scan(_))));
    }

    #[test]
    fn plan_lists_jobs_in_label_order() {
        let root = tempfile::tempdir().expect("tempdir");
        write_class(root.path(), "x", 2, 1, 1);
        write_class(root.path(), "y", 1, 1, 1);

        let plan = plan(root.path(), &BuildConfig::default()).unwrap();

        let labels: Vec<Label> = plan.jobs.iter().map(|j| j.label).collect();
        assert_eq!(labels, vec![0, 0, 1]);
        assert!(plan.jobs[0].path.ends_with("x/img_0.png"));
    }

    #[cfg(unix)]
    #[test]
    fn recursive_build_lists_a_looping_symlink_once() {
        let root = tempfile::tempdir().expect("tempdir");
        write_class(root.path(), "class_a", 1, 2, 2);
        write_class(root.path(), "class_b", 2, 2, 2);
        let class_a = root.path().join("class_a");
        std::os::unix::fs::symlink(".", class_a.join("loop")).unwrap();
        std::os::unix::fs::symlink(root.path(), class_a.join("up")).unwrap();

        let output = DatasetBuilder::new(BuildConfig::default().recursive(true))
            .build(root.path())
            .unwrap();

        // `up` reaches class_b's folder from inside class_a, so those files count
        // for class_a too, but nothing is listed twice within a class.
        let counts = output.dataset.class_counts(output.classes.len());
        assert_eq!(counts, vec![3, 2]);
        assert!(output.scan_errors.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn scan_failure_inside_a_class_follows_the_policy() {
        let root = tempfile::tempdir().expect("tempdir");
        write_class(root.path(), "a_ok", 2, 2, 2);
        write_class(root.path(), "b_broken", 1, 2, 2);
        write_class(root.path(), "c_ok", 1, 2, 2);
        let broken = root.path().join("b_broken").join("dangling.png");
        std::os::unix::fs::symlink(root.path().join("gone.png"), &broken).unwrap();

        let lenient = DatasetBuilder::new(BuildConfig::default())
            .build(root.path())
            .unwrap();
        assert_eq!(lenient.classes.label_of("b_broken"), Some(1));
        assert_eq!(lenient.classes.label_of("c_ok"), Some(2));
        assert_eq!(lenient.dataset.labels(), &[0, 0, 1, 2]);
        assert_eq!(lenient.scan_errors.len(), 1);
        assert_eq!(lenient.scan_errors[0].path, broken);

        let strict = DatasetBuilder::new(BuildConfig::default().scan_errors(ScanErrorPolicy::Fail))
            .build(root.path());
        assert!(matches!(strict, Err(HinaError::Scan(ref e)) if e.path == broken));
    }

    #[cfg(unix)]
    #[test]
    fn unlistable_class_folder_keeps_its_label_when_lenient() {
        use std::os::unix::fs::PermissionsExt;

        let root = tempfile::tempdir().expect("tempdir");
        write_class(root.path(), "a_ok", 1, 2, 2);
        write_class(root.path(), "b_locked", 1, 2, 2);
        write_class(root.path(), "c_ok", 2, 2, 2);
        let locked = root.path().join("b_locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        // Permission bits do not stop a privileged user from listing.
        let listable = fs::read_dir(&locked).is_ok();

        let lenient = DatasetBuilder::new(BuildConfig::default()).build(root.path());
        let strict = DatasetBuilder::new(BuildConfig::default().scan_errors(ScanErrorPolicy::Fail))
            .build(root.path());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        if listable {
            return;
        }

        let lenient = lenient.unwrap();
        assert_eq!(lenient.classes.len(), 3);
        assert_eq!(lenient.dataset.labels(), &[0, 2, 2]);
        assert_eq!(lenient.scan_errors.len(), 1);
        assert_eq!(lenient.scan_errors[0].path, locked);
        assert!(matches!(strict, Err(HinaError::Scan(_))));
    }
}
