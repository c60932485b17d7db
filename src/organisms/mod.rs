mod components;
mod behavior;
mod ecosystem_stats;
mod genetics;
mod tuning;

pub use components::*;
pub use behavior::*;
pub use ecosystem_stats::*;
pub use genetics::*;
pub use tuning::*;
