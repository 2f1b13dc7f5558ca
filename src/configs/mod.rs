pub mod analysis;
pub mod base;
pub mod devices;
pub mod haptics;
pub mod logging;

pub use analysis::*;
pub use base::*;
pub use devices::*;
pub use haptics::*;
pub use logging::*;
