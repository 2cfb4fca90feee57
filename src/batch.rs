//! Batch processing of many input documents.
//!
//! Documents share nothing, so they run in parallel on rayon. A fatal error
//! for one document is recorded in the report and the batch moves on.
//!
//! # Example
//!
//! ```no_run
//! use relayout::batch::BatchProcessor;
//! use std::path::PathBuf;
//!
//! let report = BatchProcessor::new()
//!     .with_output_dir("out")
//!     .run(&[PathBuf::from("a.json"), PathBuf::from("b.json")]);
//! println!("{} of {} succeeded", report.succeeded(), report.len());
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crossbeam_channel::Sender;
use rayon::prelude::*;

use crate::backend::BackendRegistry;
use crate::error::Result;
use crate::layout::LayoutOptions;
use crate::render::OutputFormat;

/// Outcome of processing one input.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    /// The record was written.
    Success {
        output: PathBuf,
        items: usize,
        tables: usize,
        warnings: usize,
    },
    /// The document could not be processed; nothing was written.
    Failure { error: String },
}

/// Result for one input file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileResult {
    pub input: PathBuf,
    pub outcome: FileOutcome,
}

impl FileResult {
    /// Whether the file was processed successfully.
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, FileOutcome::Success { .. })
    }
}

/// Per-file results of a batch run, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub results: Vec<FileResult>,
}

impl BatchReport {
    /// Number of inputs.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Check if the batch had no inputs.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Number of successful inputs.
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    /// Number of failed inputs.
    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    /// Check if every input succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }

    /// Failed inputs with their error messages.
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.results.iter().filter_map(|r| match &r.outcome {
            FileOutcome::Failure { error } => Some((r.input.as_path(), error.as_str())),
            FileOutcome::Success { .. } => None,
        })
    }
}

/// Progress notifications from [`BatchProcessor::run_with_events`].
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    /// The batch is starting.
    Started { total: usize },
    /// One input finished, successfully or not.
    FileFinished(FileResult),
    /// Every input has been processed.
    Finished { succeeded: usize, failed: usize },
}

/// Runs the reconstruction pipeline over many inputs.
#[derive(Clone)]
pub struct BatchProcessor {
    options: LayoutOptions,
    format: OutputFormat,
    output_dir: Option<PathBuf>,
    parallel: bool,
    registry: Arc<BackendRegistry>,
}

impl BatchProcessor {
    /// Create a processor with default options.
    pub fn new() -> Self {
        Self {
            options: LayoutOptions::default(),
            format: OutputFormat::default(),
            output_dir: None,
            parallel: true,
            registry: Arc::new(BackendRegistry::with_defaults()),
        }
    }

    /// Set the layout options used for every document.
    pub fn with_options(mut self, options: LayoutOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Write outputs into `dir` instead of next to the inputs.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Use a custom backend registry.
    pub fn with_registry(mut self, registry: BackendRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    /// Process documents one at a time.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Output path for an input.
    ///
    /// `<output_dir>/<stem>.<ext>` when an output directory is set, otherwise
    /// `<input_dir>/<stem>.layout.<ext>`.
    pub fn output_path_for(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "output".to_string());
        let ext = self.format.extension();

        match &self.output_dir {
            Some(dir) => dir.join(format!("{}.{}", stem, ext)),
            None => {
                let parent = input.parent().unwrap_or_else(|| Path::new(""));
                parent.join(format!("{}.layout.{}", stem, ext))
            }
        }
    }

    /// Output paths for a whole batch, in input order.
    ///
    /// Inputs that would land on the same path (same stem in different
    /// directories, with an output directory set) get a numeric suffix:
    /// `x.json`, `x_2.json`, `x_3.json`.
    pub fn output_paths_for(&self, inputs: &[PathBuf]) -> Vec<PathBuf> {
        let mut taken = HashSet::with_capacity(inputs.len());
        inputs
            .iter()
            .map(|input| {
                let base = self.output_path_for(input);
                let mut output = base.clone();
                let mut n = 2;
                while !taken.insert(output.clone()) {
                    output = numbered(&base, n);
                    n += 1;
                }
                if output != base {
                    log::warn!(
                        "{} would overwrite {}, writing {} instead",
                        input.display(),
                        base.display(),
                        output.display()
                    );
                }
                output
            })
            .collect()
    }

    /// Process one input and write its output.
    pub fn process_file(&self, input: &Path) -> FileResult {
        self.process_file_to(input, self.output_path_for(input))
    }

    fn process_file_to(&self, input: &Path, output: PathBuf) -> FileResult {
        let outcome = match self.try_process(input, output) {
            Ok(outcome) => outcome,
            Err(e) => {
                log::warn!("Failed to process {}: {}", input.display(), e);
                FileOutcome::Failure {
                    error: e.to_string(),
                }
            }
        };

        FileResult {
            input: input.to_path_buf(),
            outcome,
        }
    }

    fn try_process(&self, input: &Path, output: PathBuf) -> Result<FileOutcome> {
        let intake = self.registry.load(input)?;
        let record = crate::assembler::DocumentAssembler::new(self.options.clone())
            .assemble(input.display().to_string(), intake);

        crate::write_record(&record, &output, self.format)?;

        Ok(FileOutcome::Success {
            output,
            items: record.metadata.item_count,
            tables: record.metadata.table_count,
            warnings: record.metadata.warnings,
        })
    }

    /// Process every input and return the per-file report.
    pub fn run(&self, inputs: &[PathBuf]) -> BatchReport {
        self.run_inner(inputs, None)
    }

    /// Process every input, streaming progress over `events`.
    ///
    /// A dropped receiver does not stop the batch.
    pub fn run_with_events(&self, inputs: &[PathBuf], events: Sender<BatchEvent>) -> BatchReport {
        self.run_inner(inputs, Some(events))
    }

    fn run_inner(&self, inputs: &[PathBuf], events: Option<Sender<BatchEvent>>) -> BatchReport {
        let notify = |event: BatchEvent| {
            if let Some(tx) = &events {
                let _ = tx.send(event);
            }
        };

        notify(BatchEvent::Started {
            total: inputs.len(),
        });
        log::debug!("Batch of {} inputs (parallel: {})", inputs.len(), self.parallel);

        let outputs = self.output_paths_for(inputs);
        let process = |(input, output): (&PathBuf, &PathBuf)| {
            let result = self.process_file_to(input, output.clone());
            notify(BatchEvent::FileFinished(result.clone()));
            result
        };

        let results: Vec<FileResult> = if self.parallel {
            inputs.par_iter().zip(outputs.par_iter()).map(process).collect()
        } else {
            inputs.iter().zip(outputs.iter()).map(process).collect()
        };

        let report = BatchReport { results };
        notify(BatchEvent::Finished {
            succeeded: report.succeeded(),
            failed: report.failed(),
        });
        report
    }
}

/// `dir/x.json` with `n = 2` becomes `dir/x_2.json`.
fn numbered(path: &Path, n: usize) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, n, ext.to_string_lossy()),
        None => format!("{}_{}", stem, n),
    };
    path.with_file_name(name)
}

impl Default for BatchProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::JsonFormat;

    #[test]
    fn test_output_path_with_dir() {
        let processor = BatchProcessor::new().with_output_dir("/out");
        assert_eq!(
            processor.output_path_for(Path::new("/in/scan.json")),
            PathBuf::from("/out/scan.json")
        );
    }

    #[test]
    fn test_output_path_next_to_input() {
        let processor = BatchProcessor::new();
        assert_eq!(
            processor.output_path_for(Path::new("/in/scan.json")),
            PathBuf::from("/in/scan.layout.json")
        );

        let processor = BatchProcessor::new().with_format(OutputFormat::Text);
        assert_eq!(
            processor.output_path_for(Path::new("scan.json")),
            PathBuf::from("scan.layout.txt")
        );

        let processor = BatchProcessor::new().with_format(OutputFormat::Json(JsonFormat::Compact));
        assert_eq!(
            processor.output_path_for(Path::new("a/b.json")),
            PathBuf::from("a/b.layout.json")
        );
    }

    #[test]
    fn test_shared_stems_get_distinct_outputs() {
        let processor = BatchProcessor::new().with_output_dir("/out");
        let inputs = vec![
            PathBuf::from("/a/x.json"),
            PathBuf::from("/b/x.json"),
            PathBuf::from("/c/y.json"),
            PathBuf::from("/d/x.json"),
        ];

        assert_eq!(
            processor.output_paths_for(&inputs),
            vec![
                PathBuf::from("/out/x.json"),
                PathBuf::from("/out/x_2.json"),
                PathBuf::from("/out/y.json"),
                PathBuf::from("/out/x_3.json"),
            ]
        );
    }

    #[test]
    fn test_numbered_name_skips_taken_paths() {
        let processor = BatchProcessor::new().with_output_dir("/out");
        let inputs = vec![
            PathBuf::from("/a/x.json"),
            PathBuf::from("/b/x_2.json"),
            PathBuf::from("/c/x.json"),
        ];

        let outputs = processor.output_paths_for(&inputs);
        assert_eq!(outputs[2], PathBuf::from("/out/x_3.json"));
    }

    #[test]
    fn test_report_counts() {
        let report = BatchReport {
            results: vec![
                FileResult {
                    input: PathBuf::from("a.json"),
                    outcome: FileOutcome::Success {
                        output: PathBuf::from("a.layout.json"),
                        items: 3,
                        tables: 0,
                        warnings: 0,
                    },
                },
                FileResult {
                    input: PathBuf::from("b.json"),
                    outcome: FileOutcome::Failure {
                        error: "Input not found: b.json".to_string(),
                    },
                },
            ],
        };

        assert_eq!(report.len(), 2);
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);
        assert!(!report.all_succeeded());
        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures, vec![(Path::new("b.json"), "Input not found: b.json")]);
    }

    #[test]
    fn test_missing_input_is_reported() {
        let result = BatchProcessor::new().process_file(Path::new("/no/such/input.json"));
        assert!(!result.is_success());
    }
}
