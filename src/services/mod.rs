pub mod filter;
pub mod usage;

pub use filter::{FilterSpec, WeekendToggle};
pub use usage::UsageService;
