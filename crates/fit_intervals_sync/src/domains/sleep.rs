use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use chrono::{Duration, NaiveDate, TimeZone};
use google_fit_client::sleep::SleepSession;

/// Everything slept during the night ending on one local date.
#[derive(Clone, Debug)]
pub struct NightlySleep {
    /// Asleep time summed over every session ending that date, naps included.
    pub asleep: Duration,
    /// The main session, used for heart rate.
    pub longest: SleepSession,
    pub sessions: usize,
}

/// Group sessions by the local date they end on.
pub fn nightly_sleep<Tz: TimeZone>(
    sessions: Vec<SleepSession>,
    tz: &Tz,
) -> BTreeMap<NaiveDate, NightlySleep> {
    let mut nights: BTreeMap<NaiveDate, NightlySleep> = BTreeMap::new();
    for session in sessions {
        match nights.entry(session.date_in(tz)) {
            Entry::Vacant(slot) => {
                slot.insert(NightlySleep {
                    asleep: session.asleep_duration(),
                    longest: session,
                    sessions: 1,
                });
            }
            Entry::Occupied(mut slot) => {
                let night = slot.get_mut();
                night.asleep += session.asleep_duration();
                night.sessions += 1;
                if session.duration() > night.longest.duration() {
                    night.longest = session;
                }
            }
        }
    }
    nights
}
