mod report;
mod stats;
mod timing;

pub use report::*;
pub use stats::*;
pub use timing::*;
