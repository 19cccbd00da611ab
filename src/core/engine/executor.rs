//! Engine execution implementation.

use super::types::{ClassificationOutcome, ExecutionMode, FileOutcome, DEFAULT_WORKERS};
use crate::core::hasher::{hasher_for, ContentHasher, DigestAlgorithm};
use crate::core::quality::{BlurDetector, SharpnessClassifier, DEFAULT_BLUR_THRESHOLD};
use crate::core::report::{RunReport, SinkFailure};
use crate::core::scanner::{list_entries, FileHandle, ScanConfig};
use crate::core::sink::{DirectorySink, FileSink, NullSink, OutputDirs};
use crate::core::tracker::DuplicateTracker;
use crate::error::{ConfigError, HashError, TriageError};
use crate::events::{null_sender, Event, EventSender, FileEvent, RunEvent};
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// Configuration for the engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Folder whose entries are classified
    pub input_dir: PathBuf,
    /// Where duplicates, blurry and sharp photos are copied
    pub outputs: OutputDirs,
    /// Laplacian variance below which a photo is blurry
    pub blur_threshold: f64,
    /// Worker pool size for concurrent runs
    pub workers: usize,
    /// Content digest used for duplicate detection
    pub algorithm: DigestAlgorithm,
    /// Input folder listing options
    pub scan: ScanConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            outputs: OutputDirs::default(),
            blur_threshold: DEFAULT_BLUR_THRESHOLD,
            workers: DEFAULT_WORKERS,
            algorithm: DigestAlgorithm::Sha256,
            scan: ScanConfig::default(),
        }
    }
}

/// Builder for engine configuration
pub struct EngineBuilder {
    config: EngineConfig,
    sink: Option<Box<dyn FileSink>>,
    hasher: Option<Box<dyn ContentHasher>>,
    blur_detector: Option<Box<dyn BlurDetector>>,
}

impl EngineBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            sink: None,
            hasher: None,
            blur_detector: None,
        }
    }

    /// Start from an existing configuration
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the folder to classify
    pub fn input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.input_dir = dir.into();
        self
    }

    /// Set the three output folders
    pub fn outputs(mut self, outputs: OutputDirs) -> Self {
        self.config.outputs = outputs;
        self
    }

    /// Put the output folders under one root
    pub fn output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.outputs = OutputDirs::under(root.into());
        self
    }

    /// Set the blur threshold
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.config.blur_threshold = threshold;
        self
    }

    /// Set the worker pool size
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// Set the digest algorithm
    pub fn algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.config.algorithm = algorithm;
        self
    }

    /// Set folder listing options
    pub fn scan_config(mut self, scan: ScanConfig) -> Self {
        self.config.scan = scan;
        self
    }

    /// Use a custom sink
    pub fn sink(mut self, sink: Box<dyn FileSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Classify without copying anything
    pub fn dry_run(self, dry_run: bool) -> Self {
        if dry_run {
            self.sink(Box::new(NullSink))
        } else {
            self
        }
    }

    /// Use a custom content hasher instead of the configured algorithm
    pub fn hasher(mut self, hasher: Box<dyn ContentHasher>) -> Self {
        self.hasher = Some(hasher);
        self
    }

    /// Replace the Laplacian-variance blur policy
    pub fn blur_detector(mut self, detector: Box<dyn BlurDetector>) -> Self {
        self.blur_detector = Some(detector);
        self
    }

    /// Validate the configuration and build the engine
    pub fn build(self) -> Result<ClassificationEngine, ConfigError> {
        let config = self.config;

        if config.workers == 0 {
            return Err(ConfigError::InvalidWorkers {
                value: config.workers,
            });
        }

        if !config.blur_threshold.is_finite() || config.blur_threshold < 0.0 {
            return Err(ConfigError::InvalidThreshold {
                value: config.blur_threshold,
            });
        }

        let threshold = config.blur_threshold;
        Ok(ClassificationEngine {
            hasher: self
                .hasher
                .unwrap_or_else(|| hasher_for(config.algorithm)),
            blur_detector: self
                .blur_detector
                .unwrap_or_else(|| Box::new(SharpnessClassifier::new(threshold))),
            sink: self.sink.unwrap_or_else(|| Box::new(DirectorySink)),
            config,
        })
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome plus the copy failure it may have caused
struct Processed {
    outcome: FileOutcome,
    sink_failure: Option<SinkFailure>,
}

/// Both strategies run over the same folder
#[derive(Debug, Clone)]
pub struct Comparison {
    pub sequential: RunReport,
    pub concurrent: RunReport,
}

impl Comparison {
    /// How many times faster the concurrent run was
    pub fn speedup(&self) -> Option<f64> {
        let concurrent = self.concurrent.elapsed_secs();
        if concurrent > 0.0 {
            Some(self.sequential.elapsed_secs() / concurrent)
        } else {
            None
        }
    }
}

/// Classifies the photos of one folder
pub struct ClassificationEngine {
    config: EngineConfig,
    hasher: Box<dyn ContentHasher>,
    blur_detector: Box<dyn BlurDetector>,
    sink: Box<dyn FileSink>,
}

impl ClassificationEngine {
    /// Create a new engine builder
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Classify one file against `tracker` and copy it to its output folder.
    ///
    /// Never fails: problems with the file are folded into the outcome and
    /// a failed copy is logged.
    pub fn classify(&self, file: &FileHandle, tracker: &DuplicateTracker) -> FileOutcome {
        self.process(file, tracker, &null_sender()).outcome
    }

    fn decide(&self, file: &FileHandle, tracker: &DuplicateTracker) -> ClassificationOutcome {
        // Directories, FIFOs and devices are not photos; opening a FIFO
        // would block until a writer shows up.
        match fs::metadata(&file.path) {
            Ok(metadata) if metadata.is_file() => {}
            _ => return ClassificationOutcome::NotFound,
        }

        let digest = match self.hasher.digest_file(&file.path) {
            Ok(digest) => digest,
            Err(HashError::NotFound { .. }) => return ClassificationOutcome::NotFound,
            Err(e) => {
                tracing::warn!(error = %e, "Unreadable file reported as not found");
                return ClassificationOutcome::NotFound;
            }
        };

        if tracker.check_and_insert(digest) {
            ClassificationOutcome::Duplicate
        } else if self.blur_detector.is_blurry(&file.path) {
            ClassificationOutcome::Blurry
        } else {
            ClassificationOutcome::Sharp
        }
    }

    fn process(
        &self,
        file: &FileHandle,
        tracker: &DuplicateTracker,
        events: &EventSender,
    ) -> Processed {
        let outcome = self.decide(file, tracker);
        tracing::debug!(file = %file.name, outcome = %outcome, "Classified");

        let sink_failure = outcome.destination().and_then(|destination| {
            let dir = self.config.outputs.dir_for(destination);
            match self.sink.copy(&file.path, dir) {
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!(error = %e, "Copy failed, continuing");
                    events.send(Event::File(FileEvent::SinkFailed {
                        path: file.path.clone(),
                        message: e.to_string(),
                    }));
                    Some(SinkFailure {
                        path: file.path.clone(),
                        message: e.to_string(),
                    })
                }
            }
        });

        Processed {
            outcome: FileOutcome {
                file: file.clone(),
                outcome,
            },
            sink_failure,
        }
    }

    /// Run one strategy over the input folder
    pub fn run(&self, mode: ExecutionMode) -> Result<RunReport, TriageError> {
        self.run_with_events(mode, &null_sender())
    }

    /// Classify one file at a time, in listing order
    pub fn run_sequential(&self) -> Result<RunReport, TriageError> {
        self.run(ExecutionMode::Sequential)
    }

    /// Classify on a pool of the configured size
    pub fn run_concurrent(&self) -> Result<RunReport, TriageError> {
        self.run(ExecutionMode::Concurrent {
            workers: self.config.workers,
        })
    }

    /// Run the sequential strategy, then the concurrent one
    pub fn compare(&self, events: &EventSender) -> Result<Comparison, TriageError> {
        let sequential = self.run_with_events(ExecutionMode::Sequential, events)?;
        let concurrent = self.run_with_events(
            ExecutionMode::Concurrent {
                workers: self.config.workers,
            },
            events,
        )?;
        Ok(Comparison {
            sequential,
            concurrent,
        })
    }

    /// Run one strategy with event reporting.
    ///
    /// Each call starts from an empty duplicate tracker. Only batch-level
    /// failures return `Err`; every listed file gets exactly one outcome.
    pub fn run_with_events(
        &self,
        mode: ExecutionMode,
        events: &EventSender,
    ) -> Result<RunReport, TriageError> {
        if let ExecutionMode::Concurrent { workers: 0 } = mode {
            return Err(ConfigError::InvalidWorkers { value: 0 }.into());
        }

        let start_time = Instant::now();
        let mut report = RunReport::new(mode);

        let files = list_entries(&self.config.input_dir, &self.config.scan)?;
        let total = files.len();

        tracing::info!(
            %mode,
            input = %self.config.input_dir.display(),
            files = total,
            "Starting run"
        );
        events.send(Event::Run(RunEvent::Started {
            mode,
            total_files: total,
        }));

        if let Err(e) = self.sink.prepare(&self.config.outputs) {
            tracing::warn!(error = %e, "Could not prepare output folders");
        }

        let tracker = DuplicateTracker::new();
        let completed = AtomicUsize::new(0);

        let on_done = |processed: &Processed| {
            let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
            events.send(Event::File(FileEvent::Classified {
                path: processed.outcome.file.path.clone(),
                outcome: processed.outcome.outcome,
                completed: done,
                total,
            }));
        };

        match mode {
            ExecutionMode::Sequential => {
                for file in &files {
                    let processed = self.process(file, &tracker, events);
                    on_done(&processed);
                    record(&mut report, processed);
                }
            }
            ExecutionMode::Concurrent { workers } => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .thread_name(|i| format!("triage-worker-{}", i))
                    .build()
                    .map_err(|e| ConfigError::ThreadPool(e.to_string()))?;

                let (sender, receiver) = crossbeam_channel::unbounded();
                let tracker = &tracker;
                let on_done = &on_done;

                // Blocks until every spawned task has finished.
                pool.scope(|scope| {
                    for file in &files {
                        let sender = sender.clone();
                        scope.spawn(move |_| {
                            let processed = self.process(file, tracker, events);
                            on_done(&processed);
                            let _ = sender.send(processed);
                        });
                    }
                });
                drop(sender);

                for processed in receiver.iter() {
                    record(&mut report, processed);
                }
            }
        }

        let report = report.finish(start_time.elapsed());
        let counts = report.counts();

        tracing::info!(
            %mode,
            elapsed_secs = report.elapsed_secs(),
            duplicates = counts.duplicate,
            blurry = counts.blurry,
            sharp = counts.sharp,
            not_found = counts.not_found,
            distinct = tracker.len(),
            "Run complete"
        );
        events.send(Event::Run(RunEvent::Completed {
            mode,
            elapsed_ms: report.elapsed.as_millis() as u64,
            counts,
        }));

        Ok(report)
    }
}

fn record(report: &mut RunReport, processed: Processed) {
    report.push(processed.outcome);
    if let Some(failure) = processed.sink_failure {
        report.push_sink_failure(failure);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hasher::ContentDigest;
    use crate::core::report::OutcomeCounts;
    use crate::error::SinkError;
    use crate::events::EventChannel;
    use image::{GrayImage, ImageBuffer, Luma};
    use std::path::Path;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn checkerboard() -> GrayImage {
        ImageBuffer::from_fn(48, 48, |x, y| {
            if (x / 4 + y / 4) % 2 == 0 {
                Luma([0])
            } else {
                Luma([255])
            }
        })
    }

    fn flat(value: u8) -> GrayImage {
        ImageBuffer::from_fn(48, 48, |_, _| Luma([value]))
    }

    /// a.png and b.png identical and sharp, c.png blurry
    fn sample_folder() -> (TempDir, TempDir) {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        checkerboard().save(input.path().join("a.png")).unwrap();
        fs::copy(input.path().join("a.png"), input.path().join("b.png")).unwrap();
        flat(100).save(input.path().join("c.png")).unwrap();
        (input, output)
    }

    fn engine_for(input: &TempDir, output: &TempDir) -> ClassificationEngine {
        ClassificationEngine::builder()
            .input_dir(input.path())
            .output_root(output.path())
            .build()
            .unwrap()
    }

    /// Records copies instead of performing them
    #[derive(Default)]
    struct RecordingSink {
        copies: Mutex<Vec<(PathBuf, PathBuf)>>,
    }

    impl FileSink for RecordingSink {
        fn copy(&self, source: &Path, dir: &Path) -> Result<PathBuf, SinkError> {
            self.copies
                .lock()
                .unwrap()
                .push((source.to_path_buf(), dir.to_path_buf()));
            Ok(dir.join(source.file_name().unwrap()))
        }

        fn prepare(&self, _dirs: &OutputDirs) -> Result<(), SinkError> {
            Ok(())
        }
    }

    /// Lets a test inspect a `RecordingSink` after handing it to the engine
    struct SharedSink(std::sync::Arc<RecordingSink>);

    impl FileSink for SharedSink {
        fn copy(&self, source: &Path, dir: &Path) -> Result<PathBuf, SinkError> {
            self.0.copy(source, dir)
        }
    }

    struct FailingSink;

    impl FileSink for FailingSink {
        fn copy(&self, source: &Path, dir: &Path) -> Result<PathBuf, SinkError> {
            Err(SinkError::Copy {
                from: source.to_path_buf(),
                to: dir.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "read-only"),
            })
        }
    }

    #[test]
    fn builder_rejects_zero_workers() {
        let result = ClassificationEngine::builder().workers(0).build();
        assert!(matches!(result, Err(ConfigError::InvalidWorkers { value: 0 })));
    }

    #[test]
    fn builder_rejects_bad_threshold() {
        assert!(ClassificationEngine::builder().threshold(f64::NAN).build().is_err());
        assert!(ClassificationEngine::builder().threshold(-1.0).build().is_err());
        assert!(ClassificationEngine::builder().threshold(0.0).build().is_ok());
    }

    #[test]
    fn builder_defaults() {
        let engine = ClassificationEngine::builder().build().unwrap();
        assert_eq!(engine.config().workers, 4);
        assert_eq!(engine.config().blur_threshold, 100.0);
        assert_eq!(engine.config().algorithm, DigestAlgorithm::Sha256);
    }

    #[test]
    fn missing_file_is_not_found() {
        let engine = ClassificationEngine::builder().dry_run(true).build().unwrap();
        let tracker = DuplicateTracker::new();

        let outcome = engine.classify(&FileHandle::new("/nonexistent/ghost.jpg"), &tracker);

        assert_eq!(outcome.outcome, ClassificationOutcome::NotFound);
        assert!(tracker.is_empty());
    }

    #[test]
    fn subdirectory_is_not_found() {
        let (input, _output) = sample_folder();
        let nested = input.path().join("nested");
        fs::create_dir(&nested).unwrap();
        let engine = ClassificationEngine::builder().dry_run(true).build().unwrap();

        let outcome = engine.classify(&FileHandle::new(nested), &DuplicateTracker::new());

        assert_eq!(outcome.outcome, ClassificationOutcome::NotFound);
    }

    #[cfg(unix)]
    #[test]
    fn fifo_entry_is_not_found_and_batch_completes() {
        let (input, output) = sample_folder();
        let fifo = input.path().join("pipe.jpg");
        let status = std::process::Command::new("mkfifo")
            .arg(&fifo)
            .status()
            .unwrap();
        assert!(status.success());

        let input_dir = input.path().to_path_buf();
        let output_dir = output.path().to_path_buf();
        let (done_tx, done_rx) = crossbeam_channel::bounded(1);
        std::thread::spawn(move || {
            let engine = ClassificationEngine::builder()
                .input_dir(input_dir)
                .output_root(output_dir)
                .build()
                .unwrap();
            let single = engine.classify(&FileHandle::new(&fifo), &DuplicateTracker::new());
            let report = engine.run_concurrent();
            let _ = done_tx.send((single, report));
        });

        let (single, report) = done_rx
            .recv_timeout(std::time::Duration::from_secs(30))
            .expect("run blocked on a FIFO entry");
        assert_eq!(single.outcome, ClassificationOutcome::NotFound);

        let report = report.unwrap();
        assert_eq!(report.total_files(), 4);
        assert_eq!(report.counts().not_found, 1);
        assert!(report
            .outcome_lines()
            .contains(&"pipe.jpg : Not found".to_string()));
    }

    #[test]
    fn unreadable_file_is_not_found_and_never_copied() {
        struct BrokenHasher;
        impl ContentHasher for BrokenHasher {
            fn digest_reader(
                &self,
                _reader: &mut dyn std::io::Read,
            ) -> std::io::Result<ContentDigest> {
                Err(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "denied",
                ))
            }

            fn algorithm(&self) -> DigestAlgorithm {
                DigestAlgorithm::Sha256
            }
        }

        let (input, _output) = sample_folder();
        let sink = std::sync::Arc::new(RecordingSink::default());
        let engine = ClassificationEngine::builder()
            .output_root("/out")
            .sink(Box::new(SharedSink(sink.clone())))
            .hasher(Box::new(BrokenHasher))
            .build()
            .unwrap();
        let tracker = DuplicateTracker::new();

        let outcome = engine.classify(&FileHandle::new(input.path().join("a.png")), &tracker);

        assert_eq!(outcome.outcome, ClassificationOutcome::NotFound);
        assert!(tracker.is_empty());
        assert!(sink.copies.lock().unwrap().is_empty());
    }

    #[test]
    fn duplicate_skips_blur_check_and_goes_to_duplicates() {
        let (input, _output) = sample_folder();
        let sink = std::sync::Arc::new(RecordingSink::default());

        let engine = ClassificationEngine::builder()
            .output_root("/out")
            .sink(Box::new(SharedSink(sink.clone())))
            .build()
            .unwrap();
        let tracker = DuplicateTracker::new();

        let first = engine.classify(&FileHandle::new(input.path().join("a.png")), &tracker);
        let second = engine.classify(&FileHandle::new(input.path().join("b.png")), &tracker);

        assert_eq!(first.outcome, ClassificationOutcome::Sharp);
        assert_eq!(second.outcome, ClassificationOutcome::Duplicate);

        let copies = sink.copies.lock().unwrap();
        assert_eq!(copies.len(), 2);
        assert_eq!(copies[0].1, PathBuf::from("/out/sharp"));
        assert_eq!(copies[1].1, PathBuf::from("/out/duplicates"));
    }

    #[test]
    fn custom_blur_policy_is_used() {
        struct AlwaysBlurry;
        impl BlurDetector for AlwaysBlurry {
            fn is_blurry(&self, _path: &Path) -> bool {
                true
            }
        }

        let (input, _output) = sample_folder();
        let engine = ClassificationEngine::builder()
            .dry_run(true)
            .blur_detector(Box::new(AlwaysBlurry))
            .build()
            .unwrap();

        let outcome = engine.classify(
            &FileHandle::new(input.path().join("a.png")),
            &DuplicateTracker::new(),
        );
        assert_eq!(outcome.outcome, ClassificationOutcome::Blurry);
    }

    #[test]
    fn sequential_run_reports_in_listing_order() {
        let (input, output) = sample_folder();
        let report = engine_for(&input, &output).run_sequential().unwrap();

        assert_eq!(
            report.outcome_lines(),
            vec!["a.png : Sharp", "b.png : Duplicate", "c.png : Blurry"]
        );
        assert!(report.lines().last().unwrap().starts_with("Sequential processing time: "));
    }

    #[test]
    fn run_copies_into_output_folders() {
        let (input, output) = sample_folder();
        engine_for(&input, &output).run_sequential().unwrap();

        assert!(output.path().join("sharp/a.png").exists());
        assert!(output.path().join("duplicates/b.png").exists());
        assert!(output.path().join("blurry/c.png").exists());
        assert!(input.path().join("a.png").exists());
    }

    #[test]
    fn concurrent_run_matches_sequential_counts() {
        let (input, output) = sample_folder();
        let engine = engine_for(&input, &output);

        let sequential = engine.run_sequential().unwrap();
        let concurrent = engine.run_concurrent().unwrap();

        assert_eq!(sequential.counts(), concurrent.counts());
        assert_eq!(concurrent.total_files(), 3);
        assert_eq!(concurrent.mode, ExecutionMode::Concurrent { workers: 4 });
    }

    #[test]
    fn run_with_zero_workers_is_rejected() {
        let (input, output) = sample_folder();
        let result = engine_for(&input, &output).run(ExecutionMode::Concurrent { workers: 0 });
        assert!(matches!(result, Err(TriageError::Config(_))));
    }

    #[test]
    fn missing_input_folder_is_an_error() {
        let engine = ClassificationEngine::builder()
            .input_dir("/nonexistent/photos")
            .dry_run(true)
            .build()
            .unwrap();
        assert!(matches!(engine.run_sequential(), Err(TriageError::Scan(_))));
    }

    #[test]
    fn sink_failures_do_not_stop_the_batch() {
        let (input, output) = sample_folder();
        let engine = ClassificationEngine::builder()
            .input_dir(input.path())
            .output_root(output.path())
            .sink(Box::new(FailingSink))
            .build()
            .unwrap();

        let report = engine.run_concurrent().unwrap();

        assert_eq!(report.total_files(), 3);
        assert_eq!(report.sink_failures.len(), 3);
    }

    #[test]
    fn events_follow_the_run() {
        let (input, output) = sample_folder();
        let engine = engine_for(&input, &output);
        let (sender, receiver) = EventChannel::new();

        engine
            .run_with_events(ExecutionMode::Concurrent { workers: 2 }, &sender)
            .unwrap();
        drop(sender);

        let events: Vec<Event> = receiver.iter().collect();
        assert!(matches!(
            events.first(),
            Some(Event::Run(RunEvent::Started { total_files: 3, .. }))
        ));
        let classified = events
            .iter()
            .filter(|e| matches!(e, Event::File(FileEvent::Classified { .. })))
            .count();
        assert_eq!(classified, 3);
        match events.last() {
            Some(Event::Run(RunEvent::Completed { counts, .. })) => {
                assert_eq!(
                    *counts,
                    OutcomeCounts {
                        not_found: 0,
                        duplicate: 1,
                        blurry: 1,
                        sharp: 1,
                    }
                );
            }
            other => panic!("unexpected last event: {:?}", other),
        }
    }

    #[test]
    fn comparison_runs_both_strategies() {
        let (input, output) = sample_folder();
        let comparison = engine_for(&input, &output).compare(&null_sender()).unwrap();

        assert_eq!(comparison.sequential.mode, ExecutionMode::Sequential);
        assert_eq!(
            comparison.sequential.counts(),
            comparison.concurrent.counts()
        );
    }
}
