//! Benchmark Execution
//!
//! Every candidate file becomes one task on the current-thread runtime. Tasks
//! interleave at their suspension points (after loading and while awaiting
//! async benchmarks), but inside a task every benchmark runs to completion
//! before the next one starts.
//!
//! ## Failure Isolation
//!
//! A failing benchmark stops its own module only. Returned errors and
//! timeouts are caught inside the task; a panic unwinds the task and surfaces
//! as a `JoinError` when the runner joins it. Either way the module's result
//! carries a `failure` marker and the remaining modules still run.
//!
//! ## Data Flow
//!
//! ```text
//! PathBuf ──▶ ModuleLoader ──▶ Module ──▶ select_exports
//!                                            │
//!                                            ▼
//!                                 Invoker (warm-up, then N timed)
//!                                            │
//!                                            ▼
//!                          FileResult (bench) / ComparisonRanking (compare)
//! ```

use crate::console::Console;
use crate::discover::{RunMode, is_benchmark_file, select_exports};
use quickbench_core::{
    BenchmarkUnit, DEFAULT_ITERATIONS, Export, FunctionScore, InvokeError, Invoker, Module,
    ModuleLoader, Timer,
};
use quickbench_report::{ComparisonRanking, DEFAULT_FIXED, FileResult, round_to};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::task::JoinError;

/// Configuration for one run
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Bench or compare
    pub mode: RunMode,
    /// Exact export names to run; `None` runs every prefixed export
    pub functions: Option<Vec<String>>,
    /// Measured invocations per benchmark
    pub iterations: u32,
    /// Per-invocation timeout
    pub timeout: Option<Duration>,
    /// Decimal places for rounded output
    pub fixed: u32,
    /// Record `totalTimeMs` per module (bench mode with explicit precision)
    pub report_total_time: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            mode: RunMode::Bench,
            functions: None,
            iterations: DEFAULT_ITERATIONS,
            timeout: None,
            fixed: DEFAULT_FIXED,
            report_total_time: false,
        }
    }
}

/// A module that stopped early
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleFailure {
    /// Module path
    pub file: String,
    /// What went wrong
    pub message: String,
}

/// Everything a run produced, in file order
#[derive(Debug, Default)]
pub struct RunReport {
    /// Bench mode: one result per benchmark file
    pub files: Vec<FileResult>,
    /// Compare mode: one ranking per comparison group
    pub rankings: Vec<ComparisonRanking>,
    /// Modules that stopped early
    pub failures: Vec<ModuleFailure>,
    /// Benchmarks executed across all modules
    pub total_benchmarks: usize,
}

impl RunReport {
    /// Whether every module finished
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    fn absorb(&mut self, outcome: ModuleOutcome) {
        match outcome {
            ModuleOutcome::Skipped => {}
            ModuleOutcome::Bench(result) => {
                if let Some(message) = &result.failure {
                    self.failures.push(ModuleFailure {
                        file: result.file_name.clone(),
                        message: message.clone(),
                    });
                }
                self.files.push(result);
            }
            ModuleOutcome::Compare {
                file,
                rankings,
                failure,
            } => {
                self.rankings.extend(rankings);
                if let Some(message) = failure {
                    self.failures.push(ModuleFailure { file, message });
                }
            }
        }
    }
}

/// Exports a module would run, without running them
#[derive(Debug, Clone, PartialEq)]
pub struct ModulePlan {
    /// Module path
    pub file: String,
    /// Selected export names in enumeration order
    pub exports: Vec<String>,
    /// Load error, if the module could not be resolved
    pub error: Option<String>,
}

enum ModuleOutcome {
    /// Not a benchmark file
    Skipped,
    Bench(FileResult),
    Compare {
        file: String,
        rankings: Vec<ComparisonRanking>,
        failure: Option<String>,
    },
}

impl ModuleOutcome {
    fn failed(mode: RunMode, file: String, message: String) -> Self {
        match mode {
            RunMode::Bench => {
                let mut result = FileResult::new(file);
                result.failure = Some(message);
                ModuleOutcome::Bench(result)
            }
            RunMode::Compare => ModuleOutcome::Compare {
                file,
                rankings: Vec::new(),
                failure: Some(message),
            },
        }
    }
}

/// Runs candidate files as concurrent module tasks
pub struct Runner {
    loader: Arc<dyn ModuleLoader>,
    options: Arc<RunOptions>,
    console: Console,
    invoker: Invoker,
}

impl Runner {
    /// Create a runner
    pub fn new(loader: Arc<dyn ModuleLoader>, options: RunOptions, console: Console) -> Self {
        let invoker = Invoker::new(options.iterations).with_timeout(options.timeout);
        Self {
            loader,
            options: Arc::new(options),
            console,
            invoker,
        }
    }

    /// Run every file and collect results in file order.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn run(&self, files: Vec<PathBuf>) -> RunReport {
        let completed = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = files
            .into_iter()
            .map(|path| {
                let task = ModuleTask {
                    loader: Arc::clone(&self.loader),
                    options: Arc::clone(&self.options),
                    console: self.console.clone(),
                    invoker: self.invoker,
                    completed: Arc::clone(&completed),
                };
                let file_name = path.display().to_string();
                (file_name, tokio::spawn(task.run(path)))
            })
            .collect();

        let mut report = RunReport::default();
        for (file_name, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(join_error) => {
                    let message = panic_message(join_error);
                    report_failure(&self.console, &file_name, &message);
                    ModuleOutcome::failed(self.options.mode, file_name, message)
                }
            };
            report.absorb(outcome);
        }

        report.total_benchmarks = completed.load(Ordering::SeqCst);
        report
    }

    /// List what `run` would execute
    pub fn plan(&self, files: &[PathBuf]) -> Vec<ModulePlan> {
        files
            .iter()
            .filter(|path| is_benchmark_file(path))
            .map(|path| {
                let file = path.display().to_string();
                match self.loader.load(path) {
                    Ok(module) => ModulePlan {
                        file,
                        exports: self
                            .select(&module)
                            .into_iter()
                            .map(|export| export.name().to_string())
                            .collect(),
                        error: None,
                    },
                    Err(e) => ModulePlan {
                        file,
                        exports: Vec::new(),
                        error: Some(e.to_string()),
                    },
                }
            })
            .collect()
    }

    fn select<'m>(&self, module: &'m Module) -> Vec<&'m Export> {
        select_exports(module, self.options.mode, self.options.functions.as_deref())
    }
}

/// State moved into one module task
struct ModuleTask {
    loader: Arc<dyn ModuleLoader>,
    options: Arc<RunOptions>,
    console: Console,
    invoker: Invoker,
    completed: Arc<AtomicUsize>,
}

impl ModuleTask {
    async fn run(self, path: PathBuf) -> ModuleOutcome {
        let file_name = path.display().to_string();
        if !is_benchmark_file(&path) {
            tracing::debug!(file = %file_name, "not a benchmark file, skipping");
            return ModuleOutcome::Skipped;
        }

        self.console.progress(format_args!("Found {}", file_name));

        let module = match self.load(&path) {
            Ok(module) => module,
            Err(message) => {
                report_failure(&self.console, &file_name, &message);
                return ModuleOutcome::failed(self.options.mode, file_name, message);
            }
        };

        // Let sibling modules start before this one begins measuring
        tokio::task::yield_now().await;

        match self.options.mode {
            RunMode::Bench => ModuleOutcome::Bench(self.run_bench(file_name, &module).await),
            RunMode::Compare => self.run_compare(file_name, &module).await,
        }
    }

    fn load(&self, path: &Path) -> Result<Module, String> {
        self.loader.load(path).map_err(|e| e.to_string())
    }

    async fn run_bench(&self, file_name: String, module: &Module) -> FileResult {
        let mut result = FileResult::new(file_name);
        let functions = self.options.functions.as_deref();
        let timer = Timer::start();

        for export in select_exports(module, RunMode::Bench, functions) {
            match self.measure(&export.to_unit()).await {
                Ok(score) => result
                    .file_scores
                    .insert(export.name(), score.average_latency_ms),
                Err(e) => {
                    result.failure = Some(e.to_string());
                    break;
                }
            }
        }

        if self.options.report_total_time {
            result.total_time_ms = Some(round_to(timer.stop(), self.options.fixed));
        }
        if let Some(message) = &result.failure {
            report_failure(&self.console, &result.file_name, message);
        }
        result
    }

    async fn run_compare(&self, file_name: String, module: &Module) -> ModuleOutcome {
        let functions = self.options.functions.as_deref();
        let mut rankings = Vec::new();
        let mut failure = None;

        'groups: for export in select_exports(module, RunMode::Compare, functions) {
            let group = match export.to_group() {
                Ok(group) => group,
                Err(e) => {
                    failure = Some(e.to_string());
                    break;
                }
            };

            let mut scores = Vec::with_capacity(group.units.len());
            for unit in &group.units {
                match self.measure(unit).await {
                    Ok(score) => scores.push(score),
                    Err(e) => {
                        failure = Some(e.to_string());
                        break 'groups;
                    }
                }
            }
            rankings.push(ComparisonRanking::from_scores(group.name, scores));
        }

        if let Some(message) = &failure {
            report_failure(&self.console, &file_name, message);
        }
        ModuleOutcome::Compare {
            file: file_name,
            rankings,
            failure,
        }
    }

    async fn measure(&self, unit: &BenchmarkUnit) -> Result<FunctionScore, InvokeError> {
        self.completed.fetch_add(1, Ordering::SeqCst);
        self.console.progress(format_args!("Running {}", unit.name()));
        let score = self.invoker.run(unit).await?;
        self.console
            .progress(format_args!("Took {}ms on average", score.average_latency_ms));
        Ok(score)
    }
}

fn report_failure(console: &Console, file: &str, message: &str) {
    tracing::warn!(file, "module stopped: {}", message);
    console.progress(format_args!("Failed {}: {}", file, message));
}

fn panic_message(error: JoinError) -> String {
    match error.try_into_panic() {
        Ok(panic) => {
            let message = if let Some(s) = panic.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            format!("panicked: {}", message)
        }
        Err(error) => error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::Capture;
    use quickbench_core::Registry;
    use std::sync::Mutex;

    type EventLog = Arc<Mutex<Vec<&'static str>>>;

    fn runner(registry: Registry, options: RunOptions) -> (Runner, Capture) {
        let capture = Capture::default();
        let console = Console::with_writer(true, capture.clone());
        (Runner::new(Arc::new(registry), options, console), capture)
    }

    fn paths(files: &[&str]) -> Vec<PathBuf> {
        files.iter().map(PathBuf::from).collect()
    }

    fn logging_unit(name: &'static str, log: &EventLog, event: &'static str) -> BenchmarkUnit {
        let log = Arc::clone(log);
        BenchmarkUnit::asynchronous(name, move || {
            let log = Arc::clone(&log);
            async move {
                log.lock().unwrap().push(event);
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
        })
    }

    fn explode() {
        panic!("kaboom")
    }

    fn alpha_module() -> Module {
        Module::new("/virtual/alpha_bench.rs")
            .unit(BenchmarkUnit::sync("bench_alpha", || {}))
            .unit(BenchmarkUnit::sync("helper_not_bench", || {}))
            .unit(BenchmarkUnit::sync("bench_beta", || {}))
    }

    #[tokio::test]
    async fn test_bench_mode_runs_prefixed_exports() {
        let registry = Registry::new().with_module(alpha_module());
        let (runner, capture) = runner(registry, RunOptions::default());

        let report = runner.run(paths(&["/virtual/alpha_bench.rs"])).await;

        assert!(report.is_success());
        assert_eq!(report.files.len(), 1);
        let names: Vec<_> = report.files[0].file_scores.names().collect();
        assert_eq!(names, ["bench_alpha", "bench_beta"]);
        assert_eq!(report.total_benchmarks, 2);
        assert!(report.files[0].total_time_ms.is_none());

        let out = capture.contents();
        assert!(out.contains("Found /virtual/alpha_bench.rs\n"));
        assert!(out.contains("Running bench_alpha\n"));
        assert!(out.contains("ms on average\n"));
        assert!(!out.contains("helper_not_bench"));
    }

    #[tokio::test]
    async fn test_allow_list() {
        let registry = Registry::new().with_module(alpha_module());
        let options = RunOptions {
            functions: Some(vec!["bench_alpha".to_string(), "bench_missing".to_string()]),
            ..RunOptions::default()
        };
        let (runner, _) = runner(registry, options);

        let report = runner.run(paths(&["/virtual/alpha_bench.rs"])).await;
        let names: Vec<_> = report.files[0].file_scores.names().collect();
        assert_eq!(names, ["bench_alpha"]);
    }

    #[tokio::test]
    async fn test_non_benchmark_files_are_skipped() {
        let registry = Registry::new()
            .with_module(alpha_module())
            .with_module(
                Module::new("/virtual/utils.rs").unit(BenchmarkUnit::sync("bench_util", || {})),
            );
        let (runner, capture) = runner(registry, RunOptions::default());

        let report = runner
            .run(paths(&["/virtual/utils.rs", "/virtual/alpha_bench.rs"]))
            .await;

        assert_eq!(report.files.len(), 1);
        assert_eq!(report.files[0].file_name, "/virtual/alpha_bench.rs");
        assert!(!capture.contents().contains("utils"));
    }

    #[tokio::test]
    async fn test_functions_in_a_module_run_sequentially() {
        let log = EventLog::default();
        let registry = Registry::new().with_module(
            Module::new("/virtual/seq_bench.rs")
                .unit(logging_unit("bench_first", &log, "first"))
                .unit(logging_unit("bench_second", &log, "second")),
        );
        let options = RunOptions {
            iterations: 2,
            ..RunOptions::default()
        };
        let (runner, _) = runner(registry, options);

        runner.run(paths(&["/virtual/seq_bench.rs"])).await;

        let events = log.lock().unwrap().clone();
        let mut expected = vec!["first"; 5];
        expected.extend(vec!["second"; 5]);
        assert_eq!(events, expected);
    }

    #[tokio::test]
    async fn test_modules_interleave() {
        let log = EventLog::default();
        let registry = Registry::new()
            .with_module(
                Module::new("/virtual/one_bench.rs").unit(logging_unit("bench_one", &log, "one")),
            )
            .with_module(
                Module::new("/virtual/two_bench.rs").unit(logging_unit("bench_two", &log, "two")),
            );
        let options = RunOptions {
            iterations: 1,
            ..RunOptions::default()
        };
        let (runner, _) = runner(registry, options);

        let report = runner
            .run(paths(&["/virtual/one_bench.rs", "/virtual/two_bench.rs"]))
            .await;

        let events = log.lock().unwrap().clone();
        let first_two = events.iter().position(|e| *e == "two").unwrap();
        let last_one = events.iter().rposition(|e| *e == "one").unwrap();
        assert!(first_two < last_one, "modules did not interleave: {:?}", events);

        // Results are still joined in file order
        let files: Vec<_> = report.files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(files, ["/virtual/one_bench.rs", "/virtual/two_bench.rs"]);
        assert_eq!(report.total_benchmarks, 2);
    }

    #[tokio::test]
    async fn test_returned_error_stops_only_its_module() {
        let registry = Registry::new()
            .with_module(
                Module::new("/virtual/broken_bench.rs")
                    .unit(BenchmarkUnit::sync("bench_ok", || {}))
                    .unit(BenchmarkUnit::sync("bench_fail", || Err::<(), _>("boom")))
                    .unit(BenchmarkUnit::sync("bench_after", || {})),
            )
            .with_module(alpha_module());
        let (runner, capture) = runner(registry, RunOptions::default());

        let report = runner
            .run(paths(&["/virtual/broken_bench.rs", "/virtual/alpha_bench.rs"]))
            .await;

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].file, "/virtual/broken_bench.rs");

        let broken = &report.files[0];
        assert_eq!(broken.file_scores.names().collect::<Vec<_>>(), ["bench_ok"]);
        assert!(broken.failure.as_deref().unwrap().contains("boom"));
        assert!(report.files[1].is_success());
        assert_eq!(report.files[1].file_scores.len(), 2);
        assert!(capture.contents().contains("Failed /virtual/broken_bench.rs: "));
    }

    #[tokio::test]
    async fn test_panic_is_isolated() {
        let registry = Registry::new()
            .with_module(
                Module::new("/virtual/panic_bench.rs")
                    .unit(BenchmarkUnit::sync("bench_explode", explode)),
            )
            .with_module(alpha_module());
        let (runner, _) = runner(registry, RunOptions::default());

        let report = runner
            .run(paths(&["/virtual/panic_bench.rs", "/virtual/alpha_bench.rs"]))
            .await;

        assert_eq!(report.files.len(), 2);
        let panicked = &report.files[0];
        assert!(panicked.file_scores.is_empty());
        assert_eq!(panicked.failure.as_deref(), Some("panicked: kaboom"));
        assert!(report.files[1].is_success());
    }

    #[tokio::test]
    async fn test_missing_module_is_a_failure() {
        let (runner, _) = runner(Registry::new(), RunOptions::default());
        let report = runner.run(paths(&["/nowhere/ghost_bench.rs"])).await;

        assert_eq!(report.files.len(), 1);
        assert!(report.files[0].failure.is_some());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.total_benchmarks, 0);
    }

    #[tokio::test]
    async fn test_timeout_marks_failure() {
        let registry = Registry::new().with_module(Module::new("/virtual/slow_bench.rs").unit(
            BenchmarkUnit::asynchronous("bench_slow", || {
                tokio::time::sleep(Duration::from_millis(200))
            }),
        ));
        let options = RunOptions {
            timeout: Some(Duration::from_millis(10)),
            ..RunOptions::default()
        };
        let (runner, _) = runner(registry, options);

        let report = runner.run(paths(&["/virtual/slow_bench.rs"])).await;
        assert!(report.files[0].failure.as_deref().unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn test_total_time_with_explicit_precision() {
        let registry = Registry::new().with_module(alpha_module());
        let options = RunOptions {
            fixed: 2,
            report_total_time: true,
            ..RunOptions::default()
        };
        let (runner, _) = runner(registry, options);

        let report = runner.run(paths(&["/virtual/alpha_bench.rs"])).await;
        let total = report.files[0].total_time_ms.unwrap();
        assert!(total >= 0.0);
        assert_eq!(total, round_to(total, 2));
    }

    #[tokio::test]
    async fn test_compare_mode_ranks_group_members() {
        let registry = Registry::new().with_module(
            Module::new("/virtual/sort_bench.rs")
                .unit(BenchmarkUnit::sync("bench_ignored", || {}))
                .group("compare_speed", || {
                    vec![
                        BenchmarkUnit::sync("slow", || {
                            std::thread::sleep(Duration::from_millis(3))
                        }),
                        BenchmarkUnit::sync("fast", || {}),
                    ]
                }),
        );
        let options = RunOptions {
            mode: RunMode::Compare,
            iterations: 1,
            ..RunOptions::default()
        };
        let (runner, capture) = runner(registry, options);

        let report = runner.run(paths(&["/virtual/sort_bench.rs"])).await;

        assert!(report.files.is_empty());
        assert_eq!(report.rankings.len(), 1);
        let ranking = &report.rankings[0];
        assert_eq!(ranking.name, "compare_speed");
        assert_eq!(ranking.entries[0].name, "fast");
        assert_eq!(ranking.entries[0].relative_slowdown, 1.0);
        assert_eq!(ranking.entries[1].name, "slow");
        assert!(ranking.entries[1].relative_slowdown > 1.0);
        assert!(!capture.contents().contains("bench_ignored"));
    }

    #[tokio::test]
    async fn test_compare_mode_rejects_plain_functions() {
        let registry = Registry::new().with_module(
            Module::new("/virtual/plain_bench.rs")
                .unit(BenchmarkUnit::sync("compare_plain", || {})),
        );
        let options = RunOptions {
            mode: RunMode::Compare,
            ..RunOptions::default()
        };
        let (runner, _) = runner(registry, options);

        let report = runner.run(paths(&["/virtual/plain_bench.rs"])).await;
        assert!(report.rankings.is_empty());
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].message.contains("not a comparison group"));
    }

    #[test]
    fn test_plan_lists_selected_exports() {
        let registry = Registry::new().with_module(alpha_module());
        let (runner, _) = runner(registry, RunOptions::default());

        let plan = runner.plan(&paths(&[
            "/virtual/alpha_bench.rs",
            "/virtual/utils.rs",
            "/nowhere/ghost_bench.rs",
        ]));

        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].exports, ["bench_alpha", "bench_beta"]);
        assert!(plan[0].error.is_none());
        assert!(plan[1].error.is_some());
    }
}
