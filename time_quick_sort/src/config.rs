use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use qsort::sortio;
use qsort::{FailurePolicy, SizeLabel};
use serde::Deserialize;

/// Randomized quicksort with execution-time measurement
#[derive(Debug, Parser)]
#[command(name = "time_quick_sort")]
#[command(about = "Sort files of floating-point numbers with a randomized quicksort and time each sort")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sort one file and report how long the sort took
    Sort(SortArgs),
    /// Sort every file of one or more directories and aggregate timings by size
    Batch(BatchArgs),
    /// Write random input files named <size>-<index>.txt
    Generate(GenerateArgs),
}

#[derive(Debug, Clone, Args)]
pub struct SortArgs {
    /// File of whitespace-separated numbers
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Where to write the sorted numbers
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Also write the elapsed milliseconds to this file
    #[arg(long)]
    pub time_output: Option<PathBuf>,

    /// Seed for pivot selection (default: system clock)
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Args)]
pub struct BatchArgs {
    /// Input group as DIR=SIZE, or DIR alone to take sizes from <size>-<n> file names
    #[arg(long = "group", short = 'g', value_name = "DIR[=SIZE]")]
    pub groups: Vec<GroupSpec>,

    /// TOML file describing the batch
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Root directory for sorted files, timings and reports
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,

    /// What to do when an input fails: continue or abort
    #[arg(long, value_name = "POLICY")]
    pub on_error: Option<FailurePolicy>,

    /// Seed for pivot selection (default: system clock)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Prompt for <directory> <size> pairs on stdin
    #[arg(long)]
    pub interactive: bool,

    /// Skip the average-time chart
    #[arg(long)]
    pub no_chart: bool,
}

#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Directory to write the files into
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Number of files per size
    #[arg(long, default_value_t = 25)]
    pub files: usize,

    /// Comma-separated list of sizes
    #[arg(long, value_delimiter = ',', default_values_t = [10usize, 100, 1000])]
    pub sizes: Vec<usize>,

    /// Seed for the generated values (default: system clock)
    #[arg(long)]
    pub seed: Option<u64>,
}

/// A directory of inputs and the size label its files belong to.
/// Without a size, each file's label comes from its name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupSpec {
    pub dir: PathBuf,
    #[serde(default)]
    pub size: Option<String>,
}

impl GroupSpec {
    pub fn new(dir: impl Into<PathBuf>, size: Option<&str>) -> Self {
        Self {
            dir: dir.into(),
            size: size.map(str::to_string),
        }
    }

    pub fn label(&self) -> Option<SizeLabel> {
        self.size.as_deref().map(SizeLabel::new)
    }
}

impl FromStr for GroupSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (dir, size) = match s.rsplit_once('=') {
            Some((dir, size)) => (dir, Some(size.trim())),
            None => (s, None),
        };
        if dir.trim().is_empty() {
            return Err(format!("missing directory in group {:?}", s));
        }
        match size {
            Some("") => return Err(format!("missing size after '=' in group {:?}", s)),
            Some(size) if !sortio::is_plain_component(size) => {
                return Err(format!("size {:?} cannot be used as a directory name", size));
            }
            _ => {}
        }
        Ok(GroupSpec::new(dir.trim(), size))
    }
}

/// Batch settings, from a TOML file and/or the command line
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    pub output_dir: PathBuf,
    pub on_error: FailurePolicy,
    pub seed: Option<u64>,
    /// Draw averageExecutionTime.svg after the reports
    pub chart: bool,
    pub groups: Vec<GroupSpec>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            on_error: FailurePolicy::default(),
            seed: None,
            chart: true,
            groups: Vec::new(),
        }
    }
}

impl BatchConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: BatchConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.groups.is_empty() {
            anyhow::bail!("no input groups given (use --group, --config or --interactive)");
        }

        for group in &self.groups {
            if !group.dir.is_dir() {
                anyhow::bail!("input directory {} does not exist", group.dir.display());
            }
            if let Some(label) = group.label() {
                if label.is_empty() {
                    anyhow::bail!("empty size label for {}", group.dir.display());
                }
                // labels become directories under output_dir
                if !sortio::is_plain_component(label.as_str()) {
                    anyhow::bail!(
                        "size label {:?} for {} is not a plain directory name",
                        label.as_str(),
                        group.dir.display()
                    );
                }
            }
        }

        if self.output_dir.as_os_str().is_empty() {
            anyhow::bail!("output_dir must not be empty");
        }

        Ok(())
    }
}

impl BatchArgs {
    /// Merge file config, command line and interactively entered groups.
    /// Command-line values override the file; groups accumulate.
    pub fn resolve(&self, prompted: Vec<GroupSpec>) -> Result<BatchConfig> {
        let mut config = match &self.config {
            Some(path) => BatchConfig::from_file(path)
                .map_err(|e| anyhow::anyhow!("cannot load config {}: {}", path.display(), e))?,
            None => BatchConfig::default(),
        };

        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(policy) = self.on_error {
            config.on_error = policy;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.no_chart {
            config.chart = false;
        }
        config.groups.extend(self.groups.iter().cloned());
        config.groups.extend(prompted);

        Ok(config)
    }
}
