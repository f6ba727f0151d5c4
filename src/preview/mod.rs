pub mod config;
pub mod escape;
pub mod renderer;

pub use config::*;
pub use escape::*;
pub use renderer::*;
