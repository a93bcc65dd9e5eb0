use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeZone};
use google_fit_client::measurements::WeightSample;

/// Mean weight per local date, rounded to 100 g.
pub fn daily_weight<Tz: TimeZone>(
    samples: &[WeightSample],
    tz: &Tz,
) -> BTreeMap<NaiveDate, f64> {
    let mut per_date: BTreeMap<NaiveDate, (f64, u32)> = BTreeMap::new();
    for s in samples {
        let slot = per_date
            .entry(s.time.with_timezone(tz).date_naive())
            .or_default();
        slot.0 += s.kilograms;
        slot.1 += 1;
    }
    per_date
        .into_iter()
        .map(|(date, (sum, n))| (date, (sum / f64::from(n) * 10.0).round() / 10.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ClockChange;
    use chrono::{FixedOffset, Utc};

    fn w(day: u32, hour: u32, kg: f64) -> WeightSample {
        WeightSample {
            time: Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap(),
            kilograms: kg,
        }
    }

    #[test]
    fn averages_and_rounds_per_day() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let out = daily_weight(&[w(1, 7, 70.04), w(1, 20, 70.5), w(3, 7, 69.96)], &tz);
        let d = |day| NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[&d(1)], 70.3);
        assert_eq!(out[&d(3)], 70.0);
    }

    #[test]
    fn late_evening_weighing_belongs_to_local_day() {
        let tz = FixedOffset::west_opt(6 * 3600).unwrap();
        let out = daily_weight(&[w(2, 3, 80.0)], &tz);
        assert!(out.contains_key(&NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()));
    }

    #[test]
    fn summer_evening_weighing_uses_summer_offset() {
        // The zone is on +01:00 in March and +02:00 by July.
        let tz = ClockChange::default();
        let july = WeightSample {
            time: Utc.with_ymd_and_hms(2025, 7, 9, 22, 30, 0).unwrap(),
            kilograms: 71.0,
        };
        let out = daily_weight(&[july, w(1, 23, 70.0)], &tz);
        assert_eq!(out[&NaiveDate::from_ymd_opt(2025, 7, 10).unwrap()], 71.0);
        assert_eq!(out[&NaiveDate::from_ymd_opt(2025, 3, 2).unwrap()], 70.0);
        assert_eq!(out.len(), 2);
    }
}
