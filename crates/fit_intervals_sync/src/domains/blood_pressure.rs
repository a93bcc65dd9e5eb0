use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeZone};
use google_fit_client::measurements::BloodPressure;
use intervals_icu_client::WellnessUpdate;

/// The earliest reading of each local date. Morning measurements are the
/// ones worth comparing day to day.
pub fn first_daily_reading<Tz: TimeZone>(
    samples: &[BloodPressure],
    tz: &Tz,
) -> BTreeMap<NaiveDate, BloodPressure> {
    let mut firsts: BTreeMap<NaiveDate, BloodPressure> = BTreeMap::new();
    for bp in samples {
        firsts
            .entry(bp.time.with_timezone(tz).date_naive())
            .and_modify(|cur| {
                if bp.time < cur.time {
                    *cur = *bp;
                }
            })
            .or_insert(*bp);
    }
    firsts
}

pub fn to_update(bp: &BloodPressure) -> WellnessUpdate {
    let mmhg = |v: f64| (v.is_finite() && v >= 0.0).then(|| v.round() as u32);
    match (mmhg(bp.systolic), mmhg(bp.diastolic)) {
        (Some(systolic), Some(diastolic)) => WellnessUpdate {
            systolic: Some(systolic),
            diastolic: Some(diastolic),
            ..Default::default()
        },
        _ => WellnessUpdate::default(),
    }
}
