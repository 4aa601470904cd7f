use std::fmt::Write;

use crate::TimingTable;

pub const EXECUTION_TIME_HEADER: &str = "Input Size\tExecution Time (ms)";
pub const AVERAGE_TIME_HEADER: &str = "Input Size\tAverage Execution Time (ms)";

/// One row per sample: `<label>\t<elapsed ms>`
pub fn execution_time_report(table: &TimingTable) -> String {
    let mut out = String::new();
    out.push_str(EXECUTION_TIME_HEADER);
    out.push('\n');
    for record in table.records() {
        // writing into a String cannot fail
        let _ = writeln!(out, "{}\t{}", record.label, record.elapsed_ms);
    }
    out
}

/// One row per label: `<label>\t<mean ms>`; an empty bucket reports NaN
pub fn average_time_report(table: &TimingTable) -> String {
    let mut out = String::new();
    out.push_str(AVERAGE_TIME_HEADER);
    out.push('\n');
    for summary in table.summaries() {
        let _ = writeln!(out, "{}\t{}", summary.label, summary.mean.unwrap_or(f64::NAN));
    }
    out
}
