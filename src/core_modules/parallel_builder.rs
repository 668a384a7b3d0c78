// THEORY:
// The `ParallelBuilder` produces exactly the same `BuildOutput` as the sequential
// `DatasetBuilder`, but decodes images concurrently. Decoding dominates build
// time and each image is independent, so it fans out well.
//
// Key architectural principles:
// 1.  **Same Plan**: The directory walk is the sequential `plan` step, run once on
//     a blocking thread. Labels and sample order therefore cannot differ between
//     the two builders.
// 2.  **Real Fan-Out, Single Join**: One decode future is created per file and
//     all of them are driven together and joined at one point. A semaphore caps
//     how many blocking decodes are in flight (one per core by default) so a
//     large dataset does not hold every intermediate image at once.
// 3.  **All or Nothing**: The caller awaits a single result. The first decode
//     failure fails the build; no partially-filled dataset is ever returned.
// 4.  **Exclusive Ownership**: Each task owns its path and the buffer it decodes,
//     and hands the buffer over whole when it finishes. No state is shared
//     between images beyond the read-only config.

use crate::config::BuildConfig;
use crate::core_modules::dataset::Dataset;
use crate::core_modules::dataset_builder::{BuildOutput, load_sample, plan};
use crate::error::{HinaError, Result};
use futures::future::try_join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::info;

/// Default number of concurrent decodes.
pub fn default_parallelism() -> usize {
    num_cpus::get().max(1)
}

/// Builds a dataset from `root`, decoding up to `max_in_flight` images at a time.
pub async fn build_parallel(
    root: &Path,
    config: BuildConfig,
    max_in_flight: Option<usize>,
) -> Result<BuildOutput> {
    let max_in_flight = max_in_flight.unwrap_or_else(default_parallelism).max(1);
    info!("Building dataset from {:?} with {} decode workers", root, max_in_flight);

    let config = Arc::new(config);
    let plan = {
        let root = root.to_path_buf();
        let config = Arc::clone(&config);
        tokio::task::spawn_blocking(move || plan(&root, &config))
            .await
            .map_err(|e| HinaError::Task(e.to_string()))??
    };

    let permits = Arc::new(Semaphore::new(max_in_flight));
    let paths: Vec<PathBuf> = plan.jobs.iter().map(|job| job.path.clone()).collect();
    let samples = run_blocking_bounded(paths, permits, move |path: PathBuf| {
        load_sample(&path, &config)
    })
    .await?;

    let mut dataset = Dataset::with_capacity(samples.len());
    for ((pixels, shape), job) in samples.into_iter().zip(plan.jobs.iter()) {
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

/// Runs `work` on the blocking pool once per item, at most as many at a time as
/// `permits` allows, and returns the results in item order. Each permit lives
/// inside its blocking closure, so a decode left running after an early error
/// still counts against the bound until it returns.
async fn run_blocking_bounded<I, T, F>(
    items: Vec<I>,
    permits: Arc<Semaphore>,
    work: F,
) -> Result<Vec<T>>
where
    I: Send + 'static,
    T: Send + 'static,
    F: Fn(I) -> Result<T> + Send + Sync + 'static,
{
    let work = Arc::new(work);
    let tasks = items.into_iter().map(|item| {
        let permits = Arc::clone(&permits);
        let work = Arc::clone(&work);
        async move {
            let permit = permits
                .acquire_owned()
                .await
                .map_err(|e| HinaError::Task(e.to_string()))?;
            tokio::task::spawn_blocking(move || {
                let _permit = permit;
                work(item)
            })
            .await
            .map_err(|e| HinaError::Task(e.to_string()))?
        }
    });
    try_join_all(tasks).await
}
