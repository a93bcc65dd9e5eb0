use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use intervals_icu_client::{WellnessRecord, WellnessUpdate, utils::date_range};

/// Dates in the compared window whose ledger entry lacks a value, per metric.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WellnessGaps {
    pub weight: BTreeSet<NaiveDate>,
    pub resting_hr: BTreeSet<NaiveDate>,
    pub sleep: BTreeSet<NaiveDate>,
    /// Keyed on `systolic`; the two pressures are always written together.
    pub blood_pressure: BTreeSet<NaiveDate>,
}

impl WellnessGaps {
    /// Dates the nightly fetch has to cover: every missing sleep or resting
    /// heart rate, plus `today`, whose values are refreshed on every run.
    pub fn nightly_dates(&self, today: NaiveDate) -> BTreeSet<NaiveDate> {
        self.sleep
            .union(&self.resting_hr)
            .copied()
            .chain(std::iter::once(today))
            .collect()
    }
}

/// Find the gaps in `[oldest, newest]`. A day with no record at all is
/// missing every metric.
pub fn find_gaps(records: &[WellnessRecord], oldest: NaiveDate, newest: NaiveDate) -> WellnessGaps {
    let by_date: BTreeMap<NaiveDate, &WellnessRecord> = records
        .iter()
        .filter_map(|r| r.date().map(|d| (d, r)))
        .collect();

    let mut gaps = WellnessGaps::default();
    for date in date_range(oldest, newest) {
        let record = by_date.get(&date);
        let missing =
            |field: fn(&WellnessRecord) -> Option<f64>| record.and_then(|r| field(r)).is_none();

        if missing(|r| r.weight) {
            gaps.weight.insert(date);
        }
        if missing(|r| r.resting_hr) {
            gaps.resting_hr.insert(date);
        }
        if missing(|r| r.sleep_secs) {
            gaps.sleep.insert(date);
        }
        if missing(|r| r.systolic) {
            gaps.blood_pressure.insert(date);
        }
    }
    gaps
}

/// Fold `batch` into `updates`, later batches winning per field.
pub fn merge_updates(
    updates: &mut BTreeMap<NaiveDate, WellnessUpdate>,
    batch: BTreeMap<NaiveDate, WellnessUpdate>,
) {
    for (date, update) in batch {
        if update.is_empty() {
            continue;
        }
        updates.entry(date).or_default().merge(update);
    }
}
