pub mod chart;
pub mod config;
pub mod driver;
pub mod prompt;

pub use chart::{average_points, plot_average_times};
pub use config::{BatchArgs, BatchConfig, Cli, Command, GenerateArgs, GroupSpec, SortArgs};
pub use driver::{generate, make_sorter, plan_inputs, run_batch, sort_file};
pub use prompt::{parse_group_line, prompt_groups};
