//! Dashboard module
//!
//! Drives the home screen: the filtered transaction list, the income and
//! expense totals, and the spending chart for the selected time frame.

mod aggregation;
mod filter;
mod view_model;

pub use aggregation::{SpendingPoint, TimeFrame, spending_by_time_frame};
pub use filter::{ActiveFilter, FilterCriteria, Totals, month_bounds};
pub use view_model::{HomeState, HomeViewModel};
