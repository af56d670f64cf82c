pub mod formatter;

pub use crate::scoring::format_amount;
pub use formatter::{format_report, format_score, format_simulation, should_use_colors};
