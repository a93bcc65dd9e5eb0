//! Typed readings parsed from heart rate, weight and blood pressure points.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::RawDataPoint;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HeartRateSample {
    pub time: DateTime<Utc>,
    pub bpm: f64,
}

impl HeartRateSample {
    pub fn from_point(point: &RawDataPoint) -> Option<Self> {
        Some(Self {
            time: point.start_time(),
            bpm: point.fp_value(0)?,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct WeightSample {
    pub time: DateTime<Utc>,
    pub kilograms: f64,
}

impl WeightSample {
    pub fn from_point(point: &RawDataPoint) -> Option<Self> {
        Some(Self {
            time: point.start_time(),
            kilograms: point.fp_value(0)?,
        })
    }
}

/// Systolic and diastolic pressure in mmHg.
///
/// Example point:
/// ```json
/// {"dataTypeName": "com.google.blood_pressure",
///  "startTimeNanos": "1623052800000000000",
///  "endTimeNanos": "1623052800000000000",
///  "value": [{"fpVal": 110, "mapVal": []}, {"fpVal": 70, "mapVal": []},
///            {"mapVal": []}, {"mapVal": []}]}
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BloodPressure {
    pub time: DateTime<Utc>,
    pub systolic: f64,
    pub diastolic: f64,
}

impl BloodPressure {
    pub fn from_point(point: &RawDataPoint) -> Option<Self> {
        Some(Self {
            time: point.start_time(),
            systolic: point.fp_value(0)?,
            diastolic: point.fp_value(1)?,
        })
    }
}

/// Parse every point with `parse`, dropping (and logging) points that lack
/// the expected values.
pub(crate) fn parse_points<T>(
    points: &[RawDataPoint],
    parse: impl Fn(&RawDataPoint) -> Option<T>,
) -> Vec<T> {
    points
        .iter()
        .filter_map(|p| {
            let parsed = parse(p);
            if parsed.is_none() {
                tracing::warn!(
                    data_type = p.data_type_name.as_deref().unwrap_or("unknown"),
                    start_nanos = p.start_time_nanos,
                    "skipping data point without expected values"
                );
            }
            parsed
        })
        .collect()
}
