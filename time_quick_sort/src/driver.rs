use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use qsort::sortio::{self, OutputLayout};
use qsort::stats::{average_time_report, execution_time_report};
use qsort::{
    BatchItem, BatchOutcome, BatchRunner, CompletedSort, ItemError, Mwc256, QuickSorter,
    SizeLabel, time_sort,
};
use rand::SeedableRng;
use tracing::{info, warn};

use crate::chart::plot_average_times;
use crate::config::{BatchConfig, GenerateArgs, GroupSpec, SortArgs};

pub fn make_sorter(seed: Option<u64>) -> QuickSorter {
    match seed {
        Some(seed) => QuickSorter::with_seed(seed),
        None => QuickSorter::from_clock(),
    }
}

/// Single-file mode: read, time the sort, write the sorted numbers (and the
/// elapsed time if asked). Returns the elapsed milliseconds.
#[tracing::instrument(skip_all, fields(input = %args.input.display()))]
pub fn sort_file(args: &SortArgs) -> Result<f64> {
    let mut data = sortio::read_numbers(&args.input)?;
    let mut sorter = make_sorter(args.seed);

    let elapsed_ms = time_sort(&mut sorter, &mut data)?;
    info!(n = data.len(), elapsed_ms, "sorted");

    sortio::write_sorted(&args.output, &data)?;
    if let Some(path) = &args.time_output {
        sortio::write_elapsed(path, elapsed_ms)?;
    }

    Ok(elapsed_ms)
}

/// One input file and the label it will be timed under
#[derive(Debug, Clone)]
pub struct PlannedInput {
    pub path: PathBuf,
    pub label: Option<SizeLabel>,
    /// Earlier input that already owns this input's output files
    pub clash: Option<PathBuf>,
}

/// List every input of every group, in group order then file-name order.
///
/// Outputs are named by label and file stem, so a later input with the same
/// pair as an earlier one (`a/x.txt` and `b/x.txt`, or `x.txt` and `x.csv`)
/// is marked as clashing instead of silently overwriting the first.
pub fn plan_inputs(groups: &[GroupSpec]) -> Result<Vec<PlannedInput>> {
    let mut plan = Vec::new();
    let mut owners: HashMap<(SizeLabel, String), PathBuf> = HashMap::new();

    for group in groups {
        let files = sortio::list_input_files(&group.dir)
            .with_context(|| format!("cannot list input directory {}", group.dir.display()))?;

        info!(dir = %group.dir.display(), files = files.len(), "input group");
        if files.is_empty() {
            warn!(dir = %group.dir.display(), "input directory has no files");
        }

        let declared = group.label();
        if let Some(label) = &declared {
            if !sortio::is_plain_component(label.as_str()) {
                anyhow::bail!("size label {:?} is not a plain directory name", label.as_str());
            }
        }
        for path in files {
            let label = declared.clone().or_else(|| sortio::infer_label(&path));
            let clash = label.as_ref().and_then(|label| {
                let key = (label.clone(), sortio::file_stem(&path));
                match owners.entry(key) {
                    Entry::Occupied(owner) => Some(owner.get().clone()),
                    Entry::Vacant(slot) => {
                        slot.insert(path.clone());
                        None
                    }
                }
            });
            if let Some(first) = &clash {
                warn!(path = %path.display(), first = %first.display(), "duplicate output name");
            }
            plan.push(PlannedInput { path, label, clash });
        }
    }

    Ok(plan)
}

fn load_item(input: PlannedInput) -> BatchItem {
    let id = input.path.display().to_string();
    let Some(label) = input.label else {
        return BatchItem::unlabeled(id, ItemError::Unlabeled { path: input.path });
    };
    if let Some(first) = input.clash {
        let error = ItemError::DuplicateOutput {
            path: input.path,
            first,
        };
        return BatchItem::failed(id, label, error);
    }

    match sortio::read_numbers(&input.path) {
        Ok(values) => BatchItem::new(id, label, values),
        Err(e) => BatchItem::failed(id, label, e.into()),
    }
}

/// The item id is the input path
fn write_outputs(layout: &OutputLayout, done: &CompletedSort) -> Result<(), ItemError> {
    let input = Path::new(&done.id);
    sortio::write_sorted(layout.sorted_path(&done.label, input), &done.sorted)?;
    sortio::write_elapsed(layout.time_path(&done.label, input), done.elapsed_ms)?;
    Ok(())
}

/// Batch mode: sort every file of every group, write per-file outputs and
/// the two aggregate reports under the output root, then the average-time
/// chart unless it is turned off.
#[tracing::instrument(skip_all, fields(output = %config.output_dir.display()))]
pub fn run_batch(config: &BatchConfig) -> Result<BatchOutcome> {
    let layout = OutputLayout::new(&config.output_dir);
    let plan = plan_inputs(&config.groups)?;

    let mut runner = BatchRunner::new(make_sorter(config.seed), config.on_error);
    let items = plan.into_iter().map(load_item);
    let mut outcome = runner.run(items, |done| write_outputs(&layout, done))?;

    // declared sizes get a row even when none of their files made it
    for label in config.groups.iter().filter_map(GroupSpec::label) {
        outcome.table.declare(label);
    }

    let report_path = layout.execution_time_report_path();
    sortio::write_file(&report_path, execution_time_report(&outcome.table))?;
    let average_path = layout.average_time_report_path();
    sortio::write_file(&average_path, average_time_report(&outcome.table))?;
    info!(
        report = %report_path.display(),
        averages = %average_path.display(),
        "reports written"
    );

    if config.chart {
        let chart_path = layout.average_chart_path();
        let drawn = plot_average_times(&outcome.table, &chart_path)
            .with_context(|| format!("cannot draw chart {}", chart_path.display()))?;
        if drawn {
            info!(chart = %chart_path.display(), "chart written");
        } else {
            warn!("no numeric size with samples, chart skipped");
        }
    }

    Ok(outcome)
}

/// Write random fixtures; returns the paths written
pub fn generate(args: &GenerateArgs) -> Result<Vec<PathBuf>> {
    if args.sizes.is_empty() {
        anyhow::bail!("at least one size is required");
    }
    let mut rng = match args.seed {
        Some(seed) => Mwc256::seed_from_u64(seed),
        None => Mwc256::from_clock(),
    };
    let paths = sortio::generate_fixtures(&args.dir, &args.sizes, args.files, &mut rng)?;
    info!(dir = %args.dir.display(), files = paths.len(), "fixtures generated");
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsort::FailurePolicy;
    use std::fs;
    use tempfile::tempdir;

    fn write(path: &Path, text: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    #[test]
    fn test_sort_file() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.txt");
        write(&input, "5 -2 3.14 0");

        let args = SortArgs {
            input: input.clone(),
            output: dir.path().join("out/sorted.txt"),
            time_output: Some(dir.path().join("out/time.txt")),
            seed: Some(3),
        };
        let elapsed = sort_file(&args).unwrap();
        assert!(elapsed >= 0.0);

        let sorted = fs::read_to_string(&args.output).unwrap();
        assert_eq!(sorted.trim(), "-2 0 3.14 5");
        let time: f64 = fs::read_to_string(dir.path().join("out/time.txt"))
            .unwrap()
            .trim()
            .parse()
            .unwrap();
        assert_eq!(time, elapsed);
    }

    #[test]
    fn test_sort_file_empty_input() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("empty.txt");
        write(&input, "");

        let args = SortArgs {
            input,
            output: dir.path().join("sorted.txt"),
            time_output: None,
            seed: None,
        };
        let err = sort_file(&args).unwrap_err();
        assert!(err.to_string().contains("empty"));
        assert!(!args.output.exists());
    }

    #[test]
    fn test_plan_inputs_infers_labels() {
        let dir = tempdir().unwrap();
        write(&dir.path().join("mixed/10-0.txt"), "1");
        write(&dir.path().join("mixed/100-0.txt"), "1");
        write(&dir.path().join("mixed/notes.txt"), "1");
        write(&dir.path().join("fixed/a.txt"), "1");

        let groups = vec![
            GroupSpec::new(dir.path().join("fixed"), Some("7")),
            GroupSpec::new(dir.path().join("mixed"), None),
        ];
        let plan = plan_inputs(&groups).unwrap();
        let labels: Vec<Option<String>> = plan
            .iter()
            .map(|p| p.label.as_ref().map(|l| l.to_string()))
            .collect();
        assert_eq!(
            labels,
            vec![
                Some("7".to_string()),
                Some("10".to_string()),
                Some("100".to_string()),
                None
            ]
        );
    }

    #[test]
    fn test_run_batch_writes_outputs_and_reports() {
        let dir = tempdir().unwrap();
        let inputs = dir.path().join("inputs");
        write(&inputs.join("10-0.txt"), "3 1 2");
        write(&inputs.join("10-1.txt"), "9 8 7 6");
        write(&inputs.join("100-0.txt"), "5 -2 3.14 0");

        let out = dir.path().join("out");
        let config = BatchConfig {
            output_dir: out.clone(),
            on_error: FailurePolicy::Continue,
            seed: Some(11),
            chart: true,
            groups: vec![GroupSpec::new(&inputs, None)],
        };

        let outcome = run_batch(&config).unwrap();
        assert!(outcome.is_success());
        assert_eq!(outcome.completed, 3);

        let sorted = fs::read_to_string(out.join("sorted/10/10-1-sorted.txt")).unwrap();
        assert_eq!(sorted.trim(), "6 7 8 9");
        assert!(out.join("execution-times/100/100-0-exe-time.txt").is_file());

        let report = fs::read_to_string(out.join("executionTime.txt")).unwrap();
        assert!(report.starts_with("Input Size\tExecution Time (ms)\n"));
        assert_eq!(report.lines().count(), 4);

        let averages = fs::read_to_string(out.join("averageExecutionTime.txt")).unwrap();
        let rows: Vec<&str> = averages.lines().skip(1).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("10\t"));
        assert!(rows[1].starts_with("100\t"));

        assert!(out.join("averageExecutionTime.svg").is_file());
    }

    #[test]
    fn test_run_batch_without_chart() {
        let dir = tempdir().unwrap();
        let inputs = dir.path().join("inputs");
        write(&inputs.join("10-0.txt"), "3 1 2");

        let out = dir.path().join("out");
        let config = BatchConfig {
            output_dir: out.clone(),
            chart: false,
            groups: vec![GroupSpec::new(&inputs, None)],
            ..BatchConfig::default()
        };

        run_batch(&config).unwrap();
        assert!(out.join("averageExecutionTime.txt").is_file());
        assert!(!out.join("averageExecutionTime.svg").exists());
    }

    #[test]
    fn test_same_stem_in_one_bucket_is_not_overwritten() {
        let dir = tempdir().unwrap();
        write(&dir.path().join("a/x.txt"), "2 1");
        write(&dir.path().join("b/x.txt"), "9 8 7");
        write(&dir.path().join("b/x.csv"), "5 4");

        let out = dir.path().join("out");
        let config = BatchConfig {
            output_dir: out.clone(),
            chart: false,
            groups: vec![
                GroupSpec::new(dir.path().join("a"), Some("10")),
                GroupSpec::new(dir.path().join("b"), Some("10")),
            ],
            ..BatchConfig::default()
        };

        let outcome = run_batch(&config).unwrap();
        assert_eq!(outcome.completed, 1);
        assert_eq!(outcome.failures.len(), 2);
        assert!(
            outcome
                .failures
                .iter()
                .all(|f| matches!(f.error, ItemError::DuplicateOutput { .. }))
        );

        // the first input keeps its output and is the only timing recorded
        let sorted = fs::read_to_string(out.join("sorted/10/x-sorted.txt")).unwrap();
        assert_eq!(sorted.trim(), "1 2");
        assert_eq!(outcome.table.len(), 1);
    }

    #[test]
    fn test_same_stem_in_different_buckets_is_fine() {
        let dir = tempdir().unwrap();
        write(&dir.path().join("a/x.txt"), "2 1");
        write(&dir.path().join("b/x.txt"), "9 8 7");

        let plan = plan_inputs(&[
            GroupSpec::new(dir.path().join("a"), Some("10")),
            GroupSpec::new(dir.path().join("b"), Some("100")),
        ])
        .unwrap();
        assert!(plan.iter().all(|p| p.clash.is_none()));
    }

    #[test]
    fn test_escaping_label_writes_nothing() {
        let dir = tempdir().unwrap();
        let inputs = dir.path().join("inputs");
        write(&inputs.join("a.txt"), "2 1");

        let config = BatchConfig {
            output_dir: dir.path().join("out"),
            groups: vec![GroupSpec {
                dir: inputs,
                size: Some("../../escaped".to_string()),
            }],
            ..BatchConfig::default()
        };

        assert!(config.validate().is_err());
        assert!(run_batch(&config).is_err());
        assert!(!dir.path().join("escaped").exists());
    }

    #[test]
    fn test_run_batch_isolates_failures() {
        let dir = tempdir().unwrap();
        let inputs = dir.path().join("inputs");
        write(&inputs.join("a.txt"), "");
        write(&inputs.join("b.txt"), "2 1");
        let empty_group = dir.path().join("nothing");
        fs::create_dir_all(&empty_group).unwrap();

        let config = BatchConfig {
            output_dir: dir.path().join("out"),
            on_error: FailurePolicy::Continue,
            seed: Some(1),
            chart: false,
            groups: vec![
                GroupSpec::new(&inputs, Some("10")),
                GroupSpec::new(&empty_group, Some("1000")),
            ],
        };

        let outcome = run_batch(&config).unwrap();
        assert_eq!(outcome.completed, 1);
        assert_eq!(outcome.failures.len(), 1);
        assert!(!dir.path().join("out/sorted/10/a-sorted.txt").exists());

        let averages = fs::read_to_string(dir.path().join("out/averageExecutionTime.txt")).unwrap();
        assert!(averages.contains("1000\tNaN"));
    }

    #[test]
    fn test_run_batch_abort() {
        let dir = tempdir().unwrap();
        let inputs = dir.path().join("inputs");
        write(&inputs.join("a.txt"), "not numbers");
        write(&inputs.join("b.txt"), "2 1");

        let config = BatchConfig {
            output_dir: dir.path().join("out"),
            on_error: FailurePolicy::Abort,
            seed: Some(1),
            chart: false,
            groups: vec![GroupSpec::new(&inputs, Some("10"))],
        };

        assert!(run_batch(&config).is_err());
        assert!(!dir.path().join("out/sorted/10/b-sorted.txt").exists());
        assert!(!dir.path().join("out/executionTime.txt").exists());
    }

    #[test]
    fn test_unlabeled_file_fails_item() {
        let dir = tempdir().unwrap();
        let inputs = dir.path().join("inputs");
        write(&inputs.join("data.txt"), "1 2");

        let config = BatchConfig {
            output_dir: dir.path().join("out"),
            on_error: FailurePolicy::Continue,
            seed: Some(1),
            chart: false,
            groups: vec![GroupSpec::new(&inputs, None)],
        };

        let outcome = run_batch(&config).unwrap();
        assert_eq!(outcome.failures.len(), 1);
        assert!(matches!(outcome.failures[0].error, ItemError::Unlabeled { .. }));

        // no report row for files without a size
        let averages = fs::read_to_string(dir.path().join("out/averageExecutionTime.txt")).unwrap();
        assert_eq!(averages.lines().count(), 1);
    }

    #[test]
    fn test_unlabeled_file_next_to_labeled_ones() {
        let dir = tempdir().unwrap();
        let inputs = dir.path().join("inputs");
        write(&inputs.join("10-0.txt"), "2 1");
        write(&inputs.join("notes.txt"), "1 2");

        let config = BatchConfig {
            output_dir: dir.path().join("out"),
            chart: false,
            groups: vec![GroupSpec::new(&inputs, None)],
            ..BatchConfig::default()
        };

        let outcome = run_batch(&config).unwrap();
        assert_eq!(outcome.completed, 1);
        let averages = fs::read_to_string(dir.path().join("out/averageExecutionTime.txt")).unwrap();
        let labels: Vec<&str> = averages
            .lines()
            .skip(1)
            .map(|l| l.split('\t').next().unwrap())
            .collect();
        assert_eq!(labels, vec!["10"]);
    }

    #[test]
    fn test_generate() {
        let dir = tempdir().unwrap();
        let args = GenerateArgs {
            dir: dir.path().join("fixtures"),
            files: 2,
            sizes: vec![10, 100],
            seed: Some(4),
        };
        let paths = generate(&args).unwrap();
        assert_eq!(paths.len(), 4);
        assert_eq!(sortio::read_numbers(&paths[3]).unwrap().len(), 100);
    }
}
