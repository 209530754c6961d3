use super::pilot::Pilot;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Day-over-day drift of one pilot's monotonic counters, stamped with the
/// UTC calendar date of observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyDelta {
    pub date: NaiveDate,
    pub matches: i64,
    pub kills: i64,
    pub deaths: i64,
    pub score: i64,
    /// Hours of additional flight time; `None` when either side of the pair
    /// is unavailable or malformed.
    pub flight_time: Option<f64>,
}

impl DailyDelta {
    /// Diff `new` against `old` for the fixed counter set. `new` is the
    /// already-merged view of the pilot, so fields untouched by the update
    /// contribute a zero delta.
    pub fn between(old: &Pilot, new: &Pilot, date: NaiveDate) -> Self {
        let flight_time = match (old.flight_time(), new.flight_time()) {
            (Ok(Some(before)), Ok(Some(after))) => Some(after - before),
            _ => None,
        };

        Self {
            date,
            matches: counter(new.matches()) - counter(old.matches()),
            kills: counter(new.kills()) - counter(old.kills()),
            deaths: counter(new.deaths()) - counter(old.deaths()),
            score: counter(new.score()) - counter(old.score()),
            flight_time,
        }
    }

    /// True when every tracked counter is unchanged.
    pub fn is_zero(&self) -> bool {
        self.matches == 0
            && self.kills == 0
            && self.deaths == 0
            && self.score == 0
            && self.flight_time.unwrap_or(0.0) == 0.0
    }
}

fn counter(value: Option<i64>) -> i64 {
    value.unwrap_or(0)
}
