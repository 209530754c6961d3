use crate::core::{Result, value};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw upstream payload: a JSON object keyed by upstream field names.
pub type RawPayload = Map<String, Value>;

/// One tracked pilot at the latest known point in time.
///
/// Attributes are kept verbatim as the upstream payload and exposed through
/// typed accessors; merging fresher data is last-write-wins per field, with
/// fields absent from the new payload left untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pilot {
    data: RawPayload,
    last_observed: NaiveDate,
}

impl Pilot {
    pub fn new(data: RawPayload, observed: NaiveDate) -> Self {
        Self {
            data,
            last_observed: observed,
        }
    }

    /// UTC calendar date of the most recent observation. This is what makes
    /// "first observation of the day" decidable for delta bookkeeping.
    pub fn last_observed(&self) -> NaiveDate {
        self.last_observed
    }

    pub(crate) fn touch(&mut self, date: NaiveDate) {
        if date > self.last_observed {
            self.last_observed = date;
        }
    }

    /// Overlay fresher upstream fields onto the record.
    pub fn merge(&mut self, data: &RawPayload) {
        for (key, value) in data {
            self.data.insert(key.clone(), value.clone());
        }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    pub fn fields(&self) -> &RawPayload {
        &self.data
    }

    pub fn handle(&self) -> Option<&str> {
        self.field("nickname").and_then(value::as_str)
    }

    /// Elapsed flight time in fractional hours. `Ok(None)` when the field is
    /// absent, `Err(MalformedDuration)` when it cannot be parsed.
    pub fn flight_time(&self) -> Result<Option<f64>> {
        value::flight_time_hours(self.field("flight_time"))
    }

    pub fn matches(&self) -> Option<i64> {
        self.field("matches").and_then(value::as_i64)
    }

    pub fn kills(&self) -> Option<i64> {
        self.field("kills").and_then(value::as_i64)
    }

    pub fn deaths(&self) -> Option<i64> {
        self.field("deaths").and_then(value::as_i64)
    }

    pub fn score(&self) -> Option<i64> {
        self.field("score").and_then(value::as_i64)
    }

    pub fn rank(&self) -> Option<i64> {
        self.field("rank").and_then(value::as_i64)
    }

    pub fn rank_score(&self) -> Option<f64> {
        self.field("rank_score").and_then(value::as_f64)
    }

    pub fn score_minute(&self) -> Option<f64> {
        self.field("score_minute").and_then(value::as_f64)
    }

    pub fn damage_dealt(&self) -> Option<i64> {
        self.field("damage_dealt").and_then(value::as_i64)
    }

    pub fn damage_taken(&self) -> Option<i64> {
        self.field("damage_taken").and_then(value::as_i64)
    }

    pub fn damage_ratio(&self) -> Option<f64> {
        self.field("damage_ratio").and_then(value::as_f64)
    }

    pub fn kill_death_ratio(&self) -> Option<f64> {
        self.field("kill_death_ratio").and_then(value::as_f64)
    }

    /// Most-flown ship as `(name, usage ratio)`, from the detail payload.
    pub fn favorite_ship(&self) -> Option<(String, f64)> {
        self.first_ranked_entry("ship")
    }

    /// Preferred input device as `(name, usage ratio)`.
    pub fn favorite_input(&self) -> Option<(String, f64)> {
        self.first_ranked_entry("favorite_input")
    }

    fn first_ranked_entry(&self, field: &str) -> Option<(String, f64)> {
        let first = self.field(field)?.as_array()?.first()?;
        let name = first.get("name").and_then(value::as_str)?;
        let ratio = first.get("ratio").and_then(value::as_f64)?;
        Some((name.to_string(), ratio))
    }
}
