mod mwc256;
mod qsorts;
mod rands;

pub use mwc256::*;
pub use qsorts::*;
pub use rands::*;
