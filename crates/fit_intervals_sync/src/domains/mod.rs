//! Per-metric logic turning Google Fit readings into wellness updates.
//!
//! - [`wellness`]: gap detection over the ledger and update merging
//! - [`window`]: local dates to UTC query windows
//! - [`sleep`]: grouping sessions into nights
//! - [`heart_rate`]: resting and sleeping heart rate
//! - [`weight`]: daily weight
//! - [`blood_pressure`]: first reading of the day

pub mod blood_pressure;
pub mod heart_rate;
pub mod sleep;
pub mod weight;
pub mod wellness;
pub mod window;
