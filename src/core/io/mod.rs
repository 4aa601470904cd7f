mod generate;
mod layout;
mod read;

pub use generate::*;
pub use layout::*;
pub use read::*;

pub mod write;
pub use write::*;
