pub mod logging;
pub use logging::*;

// downstream crates reach the facade through base::log
pub use log;
