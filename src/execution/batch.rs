//! Batch processing: one filter over a folder of images.
//!
//! The engine is stateless, so items run in parallel on the rayon pool
//! with nothing shared but the engine and a resolved settings value.

use crate::core::error::{BatchError, StudioResult};
use crate::core::types::{ImageFormat, ImageValue};
use crate::core::variant::FilterVariant;
use crate::execution::backend::{FilterSettings, VisionBackend};
use crate::execution::engine::ApplyEngine;
use crate::execution::store::ParameterStore;
use rayon::prelude::*;
use std::collections::hash_map::{Entry, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

/// Find image files in `dir` whose file name matches `pattern`.
///
/// Results are sorted so batch output order is stable.
pub fn collect_inputs(dir: &Path, pattern: &str, recursive: bool) -> Result<Vec<PathBuf>, BatchError> {
    let matcher = glob::Pattern::new(pattern).map_err(|e| BatchError::InvalidPattern {
        pattern: pattern.to_string(),
        error: e.to_string(),
    })?;

    let walker = WalkDir::new(dir).max_depth(if recursive { usize::MAX } else { 1 });

    let mut inputs: Vec<PathBuf> = walker
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|path| {
            let is_image = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| ImageFormat::known_extensions().contains(&e.to_lowercase().as_str()))
                .unwrap_or(false);
            let name_matches = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| matcher.matches(n))
                .unwrap_or(false);
            is_image && name_matches
        })
        .collect();

    if inputs.is_empty() {
        return Err(BatchError::NoInputsFound {
            dir: dir.display().to_string(),
            pattern: pattern.to_string(),
        });
    }

    inputs.sort();
    Ok(inputs)
}

/// A batch to run.
#[derive(Debug, Clone)]
pub struct BatchJob {
    /// Images to process
    pub inputs: Vec<PathBuf>,
    /// Directory the inputs were collected from; subfolders are mirrored
    /// under `output_dir`
    pub input_dir: PathBuf,
    /// Existing directory receiving the results
    pub output_dir: PathBuf,
    /// Filter applied to every image
    pub variant: FilterVariant,
    /// Format of the written files
    pub output_format: ImageFormat,
}

impl BatchJob {
    /// Where the result for `input` is written.
    ///
    /// The input's folder relative to `input_dir` is kept, so inputs with
    /// the same file name in different subfolders do not collide.
    pub fn output_path(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("image");
        let subdir = input
            .parent()
            .and_then(|parent| parent.strip_prefix(&self.input_dir).ok())
            .unwrap_or_else(|| Path::new(""));
        self.output_dir.join(subdir).join(format!(
            "{}_{}.{}",
            stem,
            self.variant.id(),
            self.output_format.extension()
        ))
    }

    /// Split inputs into those with a unique output path and failures for
    /// those whose path was already claimed by an earlier input.
    fn claim_outputs(&self) -> (Vec<&Path>, Vec<BatchError>) {
        let mut owners: HashMap<PathBuf, &Path> = HashMap::new();
        let mut unique = Vec::with_capacity(self.inputs.len());
        let mut collisions = Vec::new();

        for input in &self.inputs {
            match owners.entry(self.output_path(input)) {
                Entry::Vacant(slot) => {
                    slot.insert(input);
                    unique.push(input.as_path());
                }
                Entry::Occupied(slot) => collisions.push(BatchError::ItemFailed {
                    path: input.display().to_string(),
                    error: format!(
                        "output {} is already written for {}",
                        slot.key().display(),
                        slot.get().display()
                    ),
                }),
            }
        }

        (unique, collisions)
    }
}

/// Outcome of a batch.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Files written
    pub written: Vec<PathBuf>,
    /// Inputs that failed, with the error
    pub failed: Vec<BatchError>,
    /// Wall time in milliseconds
    pub duration_ms: u64,
}

impl BatchReport {
    /// Total number of items attempted.
    pub fn total(&self) -> usize {
        self.written.len() + self.failed.len()
    }

    /// Whether every item succeeded.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs batch jobs with one engine and one parameter store.
pub struct BatchProcessor<'a, B: VisionBackend> {
    engine: &'a ApplyEngine<B>,
    store: &'a ParameterStore,
}

impl<'a, B: VisionBackend> BatchProcessor<'a, B> {
    /// Create a processor.
    pub fn new(engine: &'a ApplyEngine<B>, store: &'a ParameterStore) -> Self {
        Self { engine, store }
    }

    /// Process every input of the job in parallel.
    pub fn run(&self, job: &BatchJob) -> StudioResult<BatchReport> {
        if !job.output_dir.is_dir() {
            return Err(BatchError::OutputDirectoryMissing {
                path: job.output_dir.display().to_string(),
            }
            .into());
        }

        let settings = FilterSettings::resolve(job.variant, self.store)?;
        let started = Instant::now();
        log::info!(
            "Batch: applying '{}' to {} images",
            job.variant,
            job.inputs.len()
        );

        let (unique, collisions) = job.claim_outputs();
        let results: Vec<Result<PathBuf, BatchError>> = unique
            .par_iter()
            .map(|input| self.process_one(job, settings, input))
            .collect();

        let mut report = BatchReport::default();
        for result in results.into_iter().chain(collisions.into_iter().map(Err)) {
            match result {
                Ok(path) => report.written.push(path),
                Err(e) => {
                    log::warn!("{}", e);
                    report.failed.push(e);
                }
            }
        }
        report.duration_ms = started.elapsed().as_millis() as u64;

        log::info!(
            "Batch done: {}/{} written in {}ms",
            report.written.len(),
            report.total(),
            report.duration_ms
        );
        Ok(report)
    }

    fn process_one(&self, job: &BatchJob, settings: FilterSettings, input: &Path) -> Result<PathBuf, BatchError> {
        let failed = |error: String| BatchError::ItemFailed {
            path: input.display().to_string(),
            error,
        };

        let source = ImageValue::load_or_empty(input);
        if source.is_empty() {
            return Err(failed("could not decode image".to_string()));
        }

        let output = self.engine.apply_settings(settings, &source);
        if output.is_empty() {
            return Err(failed("filter produced no image".to_string()));
        }

        let path = job.output_path(input);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| failed(e.to_string()))?;
        }
        output.save(&path).map_err(|e| failed(e.to_string()))?;
        log::debug!("Wrote {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::StudioError;
    use crate::filters::catalog::FilterCatalog;
    use image::{DynamicImage, Rgb, RgbImage};
    use std::sync::Arc;

    fn write_sample(path: &Path) {
        let image = DynamicImage::ImageRgb8(RgbImage::from_fn(24, 24, |x, y| {
            if x > 8 && y > 8 { Rgb([250, 250, 250]) } else { Rgb([10, 10, 10]) }
        }));
        image.save(path).unwrap();
    }

    fn store() -> ParameterStore {
        ParameterStore::new(Arc::new(FilterCatalog::with_builtins()))
    }

    #[test]
    fn test_collect_inputs_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        write_sample(&dir.path().join("b.png"));
        write_sample(&dir.path().join("a.png"));
        fs::write(dir.path().join("notes.txt"), "not an image").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        write_sample(&dir.path().join("nested").join("c.png"));

        let flat = collect_inputs(dir.path(), "*", false).unwrap();
        let names: Vec<_> = flat.iter().map(|p| p.file_name().unwrap().to_str().unwrap()).collect();
        assert_eq!(names, vec!["a.png", "b.png"]);

        let deep = collect_inputs(dir.path(), "*", true).unwrap();
        assert_eq!(deep.len(), 3);

        let only_a = collect_inputs(dir.path(), "a*", true).unwrap();
        assert_eq!(only_a.len(), 1);
    }

    #[test]
    fn test_collect_inputs_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            collect_inputs(dir.path(), "*", false),
            Err(BatchError::NoInputsFound { .. })
        ));
        assert!(matches!(
            collect_inputs(dir.path(), "[", false),
            Err(BatchError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_run_batch() {
        let input_dir = tempfile::tempdir().unwrap();
        let output_dir = tempfile::tempdir().unwrap();
        write_sample(&input_dir.path().join("one.png"));
        write_sample(&input_dir.path().join("two.png"));
        fs::write(input_dir.path().join("broken.png"), "garbage").unwrap();

        let job = BatchJob {
            inputs: collect_inputs(input_dir.path(), "*", false).unwrap(),
            input_dir: input_dir.path().to_path_buf(),
            output_dir: output_dir.path().to_path_buf(),
            variant: FilterVariant::EdgeDetect,
            output_format: ImageFormat::Png,
        };

        let engine = ApplyEngine::new();
        let store = store();
        let report = BatchProcessor::new(&engine, &store).run(&job).unwrap();

        assert_eq!(report.total(), 3);
        assert_eq!(report.written.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert!(!report.is_success());
        assert!(output_dir.path().join("one_edge_detect.png").exists());
        assert!(output_dir.path().join("two_edge_detect.png").exists());
    }

    #[test]
    fn test_missing_output_directory() {
        let job = BatchJob {
            inputs: vec![PathBuf::from("a.png")],
            input_dir: PathBuf::new(),
            output_dir: PathBuf::from("/definitely/not/here"),
            variant: FilterVariant::Cartoonize,
            output_format: ImageFormat::Png,
        };
        let engine = ApplyEngine::new();
        let store = store();
        let err = BatchProcessor::new(&engine, &store).run(&job).unwrap_err();
        assert!(matches!(err, StudioError::Batch(BatchError::OutputDirectoryMissing { .. })));
    }

    #[test]
    fn test_output_path() {
        let job = BatchJob {
            inputs: Vec::new(),
            input_dir: PathBuf::from("in"),
            output_dir: PathBuf::from("out"),
            variant: FilterVariant::FisheyeWarp,
            output_format: ImageFormat::Jpeg,
        };
        assert_eq!(
            job.output_path(Path::new("in/photo.png")),
            PathBuf::from("out/photo_fisheye_warp.jpg")
        );
        assert_eq!(
            job.output_path(Path::new("in/trip/photo.png")),
            PathBuf::from("out/trip/photo_fisheye_warp.jpg")
        );
    }

    #[test]
    fn test_shared_stems_do_not_overwrite() {
        let input_dir = tempfile::tempdir().unwrap();
        let output_dir = tempfile::tempdir().unwrap();
        for sub in ["a", "b"] {
            fs::create_dir(input_dir.path().join(sub)).unwrap();
            write_sample(&input_dir.path().join(sub).join("photo.png"));
        }
        write_sample(&input_dir.path().join("photo.jpg"));
        write_sample(&input_dir.path().join("photo.png"));

        let job = BatchJob {
            inputs: collect_inputs(input_dir.path(), "*", true).unwrap(),
            input_dir: input_dir.path().to_path_buf(),
            output_dir: output_dir.path().to_path_buf(),
            variant: FilterVariant::EdgeDetect,
            output_format: ImageFormat::Png,
        };

        let engine = ApplyEngine::new();
        let store = store();
        let report = BatchProcessor::new(&engine, &store).run(&job).unwrap();

        assert_eq!(report.total(), 4);
        assert_eq!(report.written.len(), 3);
        assert_eq!(report.failed.len(), 1);
        assert!(matches!(
            &report.failed[0],
            BatchError::ItemFailed { path, .. }
                if *path == input_dir.path().join("photo.png").display().to_string()
        ));

        let on_disk: Vec<PathBuf> = WalkDir::new(output_dir.path())
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .collect();
        assert_eq!(on_disk.len(), report.written.len());
        assert!(output_dir.path().join("a").join("photo_edge_detect.png").exists());
        assert!(output_dir.path().join("b").join("photo_edge_detect.png").exists());
    }

    #[test]
    fn test_gif_output_of_gray_filter() {
        let input_dir = tempfile::tempdir().unwrap();
        let output_dir = tempfile::tempdir().unwrap();
        write_sample(&input_dir.path().join("scan.png"));

        let job = BatchJob {
            inputs: collect_inputs(input_dir.path(), "*", false).unwrap(),
            input_dir: input_dir.path().to_path_buf(),
            output_dir: output_dir.path().to_path_buf(),
            variant: FilterVariant::EdgeDetect,
            output_format: ImageFormat::Gif,
        };

        let engine = ApplyEngine::new();
        let store = store();
        let report = BatchProcessor::new(&engine, &store).run(&job).unwrap();

        assert!(report.is_success(), "{:?}", report.failed);
        assert!(output_dir.path().join("scan_edge_detect.gif").exists());
    }
}
