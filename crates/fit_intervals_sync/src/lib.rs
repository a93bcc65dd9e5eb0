//! Fills gaps in an intervals.icu wellness ledger from Google Fit.
//!
//! One [`WellnessSync::run`] reads the ledger for the configured window,
//! works out which days lack sleep, heart rate, weight or blood pressure,
//! fetches those from Google Fit and writes back only what was missing.
//! Today's sleep and heart rate are refreshed on every run.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{Days, Local, NaiveDate, TimeZone};
use google_fit_client::GoogleFitClient;
use google_fit_client::measurements::HeartRateSample;
use intervals_icu_client::{IntervalsClient, WellnessUpdate};
use metrics::counter;
use serde::Serialize;
use tracing::{debug, info, trace, warn};

pub mod config;
pub mod domains;
pub mod error;
pub mod logging;
pub mod middleware;
mod test_utils;

pub use config::SyncConfig;
pub use error::{SyncError, SyncResult};

use domains::wellness::{WellnessGaps, find_gaps, merge_updates};
use domains::window::{Window, day_window, sleep_window};
use domains::{blood_pressure, heart_rate, sleep, weight};

type DailyUpdates = BTreeMap<NaiveDate, WellnessUpdate>;

/// Outcome of one run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Days written, or that would have been in a dry run.
    pub dates_updated: usize,
    pub fields_updated: usize,
    /// Metrics left out of this run because Google Fit failed to provide them.
    pub skipped: Vec<&'static str>,
    pub dry_run: bool,
}

/// Dates are local to `Tz`, so each reading takes the offset in force when
/// it was taken.
#[derive(Clone)]
pub struct WellnessSync<Tz: TimeZone = Local> {
    intervals: Arc<dyn IntervalsClient>,
    fit: Arc<dyn GoogleFitClient>,
    config: SyncConfig,
    tz: Tz,
}

impl WellnessSync {
    /// Dates follow the machine's time zone.
    pub fn new(
        intervals: Arc<dyn IntervalsClient>,
        fit: Arc<dyn GoogleFitClient>,
        config: SyncConfig,
    ) -> Self {
        Self {
            intervals,
            fit,
            config,
            tz: Local,
        }
    }
}

impl<Tz: TimeZone> WellnessSync<Tz> {
    pub fn with_timezone<T: TimeZone>(self, tz: T) -> WellnessSync<T> {
        WellnessSync {
            intervals: self.intervals,
            fit: self.fit,
            config: self.config,
            tz,
        }
    }

    pub async fn run(&self, today: NaiveDate) -> SyncResult<SyncReport> {
        let oldest = today
            .checked_sub_days(Days::new(u64::from(self.config.days_to_compare)))
            .ok_or_else(|| {
                SyncError::Config(format!(
                    "cannot look back {} days from {today}",
                    self.config.days_to_compare
                ))
            })?;
        info!(user = %self.config.user, %oldest, %today, "comparing wellness ledger");

        let records = self.intervals.get_wellness(oldest, today).await?;
        let gaps = find_gaps(&records, oldest, today);
        debug!(
            weight = gaps.weight.len(),
            resting_hr = gaps.resting_hr.len(),
            sleep = gaps.sleep.len(),
            blood_pressure = gaps.blood_pressure.len(),
            "missing wellness values"
        );

        let mut report = SyncReport {
            dry_run: self.config.dry_run,
            ..Default::default()
        };
        let mut updates = DailyUpdates::new();

        match self.nightly_updates(&gaps, today, &mut report.skipped).await {
            Ok(batch) => merge_updates(&mut updates, batch),
            Err(e) => skip("sleep", e, &mut report.skipped)?,
        }
        match self.weight_updates(&gaps.weight).await {
            Ok(batch) => merge_updates(&mut updates, batch),
            Err(e) => skip("weight", e, &mut report.skipped)?,
        }
        match self.blood_pressure_updates(&gaps.blood_pressure).await {
            Ok(batch) => merge_updates(&mut updates, batch),
            Err(e) => skip("blood_pressure", e, &mut report.skipped)?,
        }

        self.apply(updates, &mut report).await?;
        info!(
            user = %self.config.user,
            dates = report.dates_updated,
            fields = report.fields_updated,
            skipped = ?report.skipped,
            dry_run = report.dry_run,
            "wellness sync finished"
        );
        Ok(report)
    }

    /// Sleep time and heart rate for the nights ending on missing dates.
    async fn nightly_updates(
        &self,
        gaps: &WellnessGaps,
        today: NaiveDate,
        skipped: &mut Vec<&'static str>,
    ) -> SyncResult<DailyUpdates> {
        let dates = gaps.nightly_dates(today);
        debug!(dates = ?dates, "dates requested from Google Fit");
        let Some(window) = sleep_window(&dates, self.config.sleep_day_border, &self.tz)? else {
            return Ok(DailyUpdates::new());
        };

        let sessions = self.fit.get_sleep_sessions(window.start, window.end).await?;
        info!(sessions = sessions.len(), "received sleep sessions from Google Fit");
        let nights = sleep::nightly_sleep(sessions, &self.tz);

        let wanted =
            |set: &BTreeSet<NaiveDate>, date: &NaiveDate| *date == today || set.contains(date);
        let needs_heart_rate = nights.keys().any(|d| wanted(&gaps.resting_hr, d));
        let (samples, resting) = if needs_heart_rate {
            match self.heart_rate_samples(window).await {
                Ok(found) => found,
                Err(e) => {
                    skip("heart_rate", e, skipped)?;
                    Default::default()
                }
            }
        } else {
            Default::default()
        };

        let mut out = DailyUpdates::new();
        for (date, night) in nights {
            let mut update = WellnessUpdate::default();
            if wanted(&gaps.sleep, &date) {
                update.sleep_secs = Some(night.asleep.num_seconds());
            }
            if wanted(&gaps.resting_hr, &date) {
                let session = &night.longest;
                let in_session: Vec<HeartRateSample> =
                    heart_rate::samples_within(&samples, session.interval())
                        .copied()
                        .collect();
                for (segment, bpm) in heart_rate::per_segment_heart_rate(session, &in_session) {
                    trace!(%date, %segment, bpm = ?bpm, "segment heart rate");
                }
                update.resting_hr =
                    heart_rate::resting_heart_rate(&resting, &in_session, date, &self.tz)
                        .and_then(heart_rate::round_bpm);
                update.avg_sleeping_hr = heart_rate::sleeping_heart_rate(session, &in_session)
                    .and_then(heart_rate::round_bpm);
            }
            debug!(%date, sessions = night.sessions, ?update, "night summary");
            out.insert(date, update);
        }
        Ok(out)
    }

    async fn heart_rate_samples(
        &self,
        window: Window,
    ) -> SyncResult<(Vec<HeartRateSample>, Vec<HeartRateSample>)> {
        let samples = self.fit.get_heart_rate(window.start, window.end).await?;
        let resting = self
            .fit
            .get_resting_heart_rate(window.start, window.end)
            .await?;
        Ok((samples, resting))
    }

    async fn weight_updates(&self, missing: &BTreeSet<NaiveDate>) -> SyncResult<DailyUpdates> {
        let Some(window) = day_window(missing, &self.tz)? else {
            return Ok(DailyUpdates::new());
        };
        let samples = self.fit.get_weight(window.start, window.end).await?;
        let daily = weight::daily_weight(&samples, &self.tz);
        Ok(missing
            .iter()
            .filter_map(|date| {
                let kilograms = *daily.get(date)?;
                Some((
                    *date,
                    WellnessUpdate {
                        weight: Some(kilograms),
                        ..Default::default()
                    },
                ))
            })
            .collect())
    }

    async fn blood_pressure_updates(
        &self,
        missing: &BTreeSet<NaiveDate>,
    ) -> SyncResult<DailyUpdates> {
        let Some(window) = day_window(missing, &self.tz)? else {
            return Ok(DailyUpdates::new());
        };
        let readings = self
            .fit
            .get_blood_pressure(window.start, window.end)
            .await?;
        let firsts = blood_pressure::first_daily_reading(&readings, &self.tz);
        Ok(missing
            .iter()
            .filter_map(|date| Some((*date, blood_pressure::to_update(firsts.get(date)?))))
            .collect())
    }

    async fn apply(&self, updates: DailyUpdates, report: &mut SyncReport) -> SyncResult<()> {
        for (date, update) in updates {
            let fields = update.field_names();
            info!(
                user = %self.config.user,
                %date,
                ?fields,
                dry_run = self.config.dry_run,
                "updating wellness data"
            );
            debug!(?update, "wellness values");
            if !self.config.dry_run {
                self.intervals.update_wellness(date, &update).await?;
                for field in &fields {
                    counter!("fit_sync_fields_updated_total", "field" => *field).increment(1);
                }
            }
            report.dates_updated += 1;
            report.fields_updated += fields.len();
        }
        Ok(())
    }
}

/// Record a skipped metric, or hand back errors that must end the run.
fn skip(metric: &'static str, err: SyncError, skipped: &mut Vec<&'static str>) -> SyncResult<()> {
    if err.is_fatal() {
        return Err(err);
    }
    warn!(metric, error = %err, "skipping metric for this run");
    counter!("fit_sync_batches_skipped_total", "metric" => metric).increment(1);
    skipped.push(metric);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        ClockChange, MockFit, MockIntervals, bp_point, fp_point, raw_session, stage_point,
    };
    use chrono::{DateTime, FixedOffset, Utc};
    use google_fit_client::{DataSource, FitError};
    use intervals_icu_client::WellnessRecord;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap()
    }

    fn complete(day: u32) -> WellnessRecord {
        WellnessRecord {
            id: d(day).to_string(),
            weight: Some(70.0),
            resting_hr: Some(50.0),
            avg_sleeping_hr: Some(52.0),
            sleep_secs: Some(27_000.0),
            systolic: Some(118.0),
            diastolic: Some(76.0),
        }
    }

    /// Ledger for 7..=10 March: the 9th lacks sleep, heart rate and weight,
    /// the 10th has no record.
    fn ledger() -> Vec<WellnessRecord> {
        let mut ninth = complete(9);
        ninth.sleep_secs = None;
        ninth.resting_hr = None;
        ninth.weight = None;
        vec![complete(7), complete(8), ninth]
    }

    fn fit() -> MockFit {
        MockFit {
            sessions: vec![
                raw_session(at(8, 22), at(9, 6)),
                raw_session(at(9, 23), at(10, 7)),
            ],
            ..Default::default()
        }
        .with_points(
            DataSource::SleepSegment,
            vec![stage_point(at(8, 23), at(9, 5), 4)],
        )
        .with_points(
            DataSource::HeartRate,
            vec![
                fp_point(at(9, 0), 50.0),
                fp_point(at(9, 3), 54.0),
                fp_point(at(10, 1), 60.0),
            ],
        )
        .with_points(
            DataSource::Weight,
            vec![fp_point(at(9, 7), 70.04), fp_point(at(9, 20), 70.5)],
        )
        .with_points(DataSource::BloodPressure, vec![bp_point(at(10, 7), 118.0, 76.0)])
    }

    fn config(dry_run: bool) -> SyncConfig {
        SyncConfig {
            days_to_compare: 3,
            dry_run,
            ..Default::default()
        }
    }

    fn sync(
        intervals: &Arc<MockIntervals>,
        fit: MockFit,
        dry_run: bool,
    ) -> WellnessSync<FixedOffset> {
        WellnessSync::new(intervals.clone(), Arc::new(fit), config(dry_run))
            .with_timezone(FixedOffset::east_opt(0).unwrap())
    }

    #[tokio::test]
    async fn fills_only_missing_values() {
        let intervals = Arc::new(MockIntervals::with_records(ledger()));
        let report = sync(&intervals, fit(), false).run(d(10)).await.unwrap();

        let updates = intervals.updates().await;
        assert_eq!(updates.len(), 2);

        let (date, ninth) = &updates[0];
        assert_eq!(*date, d(9));
        assert_eq!(ninth.sleep_secs, Some(8 * 3600));
        assert_eq!(ninth.resting_hr, Some(52));
        assert_eq!(ninth.avg_sleeping_hr, Some(52));
        assert_eq!(ninth.weight, Some(70.3));
        assert_eq!(ninth.systolic, None);

        let (date, tenth) = &updates[1];
        assert_eq!(*date, d(10));
        assert_eq!(tenth.sleep_secs, Some(8 * 3600));
        assert_eq!(tenth.resting_hr, Some(60));
        assert_eq!(tenth.systolic, Some(118));
        assert_eq!(tenth.diastolic, Some(76));
        assert_eq!(tenth.weight, None);

        assert_eq!(report.dates_updated, 2);
        assert_eq!(report.fields_updated, 4 + 5);
        assert!(report.skipped.is_empty());
    }

    #[tokio::test]
    async fn dry_run_reports_without_writing() {
        let intervals = Arc::new(MockIntervals::with_records(ledger()));
        let report = sync(&intervals, fit(), true).run(d(10)).await.unwrap();
        assert!(intervals.updates().await.is_empty());
        assert!(report.dry_run);
        assert_eq!(report.dates_updated, 2);
    }

    #[tokio::test]
    async fn today_is_refreshed_even_when_complete() {
        let records: Vec<_> = (7..=10).map(complete).collect();
        let intervals = Arc::new(MockIntervals::with_records(records));
        sync(&intervals, fit(), false).run(d(10)).await.unwrap();

        let updates = intervals.updates().await;
        assert_eq!(updates.len(), 1);
        let (date, today) = &updates[0];
        assert_eq!(*date, d(10));
        assert_eq!(today.field_names(), vec!["restingHR", "avgSleepingHR", "sleepSecs"]);
    }

    #[tokio::test]
    async fn unavailable_source_skips_only_that_metric() {
        let intervals = Arc::new(MockIntervals::with_records(ledger()));
        let mut fit = fit();
        fit.unavailable.insert(DataSource::BloodPressure);
        fit.unavailable.insert(DataSource::HeartRate);
        let report = sync(&intervals, fit, false).run(d(10)).await.unwrap();

        assert_eq!(report.skipped, vec!["heart_rate", "blood_pressure"]);
        let updates = intervals.updates().await;
        assert_eq!(updates[0].1.sleep_secs, Some(8 * 3600));
        assert_eq!(updates[0].1.weight, Some(70.3));
        assert!(updates.iter().all(|(_, u)| u.systolic.is_none() && u.resting_hr.is_none()));
    }

    #[tokio::test]
    async fn bad_sleep_data_skips_sleep() {
        let intervals = Arc::new(MockIntervals::with_records(ledger()));
        let fit = fit().with_points(
            DataSource::SleepSegment,
            vec![stage_point(at(8, 23), at(9, 5), 42)],
        );
        let report = sync(&intervals, fit, false).run(d(10)).await.unwrap();

        assert_eq!(report.skipped, vec!["sleep"]);
        let updates = intervals.updates().await;
        assert!(updates.iter().all(|(_, u)| u.sleep_secs.is_none()));
        assert_eq!(updates[0].1.weight, Some(70.3));
    }

    #[tokio::test]
    async fn expired_token_aborts_run() {
        let intervals = Arc::new(MockIntervals::with_records(ledger()));
        let fit = MockFit {
            unauthorized: true,
            ..fit()
        };
        let err = sync(&intervals, fit, false).run(d(10)).await.unwrap_err();
        assert!(matches!(err, SyncError::Fit(FitError::Auth(_))));
        assert!(intervals.updates().await.is_empty());
    }

    #[tokio::test]
    async fn ledger_failure_aborts_run() {
        let intervals = Arc::new(MockIntervals::failing());
        let err = sync(&intervals, fit(), false).run(d(10)).await.unwrap_err();
        assert!(matches!(err, SyncError::Intervals(_)));
    }

    #[tokio::test]
    async fn summer_readings_use_summer_offset() {
        let intervals = Arc::new(MockIntervals::with_records(Vec::new()));
        let july = |day, hour, min| Utc.with_ymd_and_hms(2025, 7, day, hour, min, 0).unwrap();
        let fit = MockFit::default().with_points(
            DataSource::Weight,
            vec![fp_point(july(9, 22, 30), 71.0), fp_point(july(10, 22, 30), 72.0)],
        );
        let today = NaiveDate::from_ymd_opt(2025, 7, 10).unwrap();
        let config = SyncConfig {
            days_to_compare: 1,
            ..Default::default()
        };
        WellnessSync::new(intervals.clone(), Arc::new(fit), config)
            .with_timezone(ClockChange::default())
            .run(today)
            .await
            .unwrap();

        // 22:30 UTC is past midnight at +02:00; the second weighing falls on
        // the 11th, outside the window.
        let updates = intervals.updates().await;
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].0, today);
        assert_eq!(updates[0].1.weight, Some(71.0));
    }
}
