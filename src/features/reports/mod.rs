//! Productivity reports.
//!
//! Reports are computed from completed tasks:
//! - Overall productivity and estimate accuracy
//! - Hours worked per day
//! - Most productive hour, weekday and month
//! - Time from creation to completion per task

pub mod chart;
pub mod filter;
pub mod stats;

pub use chart::render_bar_chart;
pub use filter::ReportFilter;
pub use stats::{
    DailyProductivity, DailySummary, ProductiveTimes, ProductivityStats, TimeSpentEntry,
    NOT_AVAILABLE,
};
