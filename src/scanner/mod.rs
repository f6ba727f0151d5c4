pub mod field;
pub mod flatten;
pub mod report;

pub use field::*;
pub use flatten::*;
pub use report::*;
