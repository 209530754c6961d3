use super::delta::DailyDelta;
use super::pilot::{Pilot, RawPayload};
use crate::core::SyncError;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// What a single `observe` call did to the board.
#[derive(Debug, Default)]
pub struct ObserveOutcome {
    /// The identity was new and a fresh record was inserted.
    pub inserted: bool,
    /// A `DailyDelta` was appended for the observation date.
    pub delta_created: bool,
    /// Data-quality problems found while deriving fields, to be reported
    /// keyed by the observed identity.
    pub warnings: Vec<SyncError>,
}

/// One store partition: the current-state table for a game mode plus its
/// dated history of day-over-day deltas.
///
/// `latest` only grows or is updated in place; entries are never removed,
/// and every identity present in any `history[date]` also exists in
/// `latest`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Board {
    latest: HashMap<String, Pilot>,
    history: BTreeMap<NaiveDate, HashMap<String, DailyDelta>>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, handle: &str) -> bool {
        self.latest.contains_key(handle)
    }

    pub fn pilot(&self, handle: &str) -> Option<&Pilot> {
        self.latest.get(handle)
    }

    pub fn pilots(&self) -> impl Iterator<Item = (&String, &Pilot)> {
        self.latest.iter()
    }

    pub fn len(&self) -> usize {
        self.latest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_empty()
    }

    /// Dates for which delta history exists, oldest first.
    pub fn history_dates(&self) -> Vec<NaiveDate> {
        self.history.keys().copied().collect()
    }

    pub fn deltas_on(&self, date: NaiveDate) -> Option<&HashMap<String, DailyDelta>> {
        self.history.get(&date)
    }

    /// Fold an upstream payload into the board under today's UTC date.
    pub fn observe(&mut self, handle: &str, payload: RawPayload) -> ObserveOutcome {
        self.observe_at(handle, payload, Utc::now().date_naive())
    }

    /// Date-parameterized [`observe`](Self::observe); the sole mutation
    /// point of the board.
    ///
    /// A brand-new identity is inserted as-is. For a known identity the
    /// payload is merged last-write-wins, and a `DailyDelta` is appended iff
    /// this is the first observation of that identity on `date` and at
    /// least one tracked counter moved; later same-day observations never
    /// recompute the snapshot.
    pub fn observe_at(&mut self, handle: &str, payload: RawPayload, date: NaiveDate) -> ObserveOutcome {
        let mut outcome = ObserveOutcome::default();

        let Some(existing) = self.latest.get_mut(handle) else {
            let pilot = Pilot::new(payload, date);
            if let Err(warning) = pilot.flight_time() {
                outcome.warnings.push(warning);
            }
            self.latest.insert(handle.to_string(), pilot);
            outcome.inserted = true;
            return outcome;
        };

        let first_of_day = existing.last_observed() < date;

        let mut updated = existing.clone();
        updated.merge(&payload);
        if let Err(warning) = updated.flight_time() {
            outcome.warnings.push(warning);
        }

        if first_of_day {
            let delta = DailyDelta::between(existing, &updated, date);
            if !delta.is_zero() {
                self.history
                    .entry(date)
                    .or_default()
                    .insert(handle.to_string(), delta);
                outcome.delta_created = true;
            }
        }

        updated.touch(date);
        *existing = updated;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(fields: serde_json::Value) -> RawPayload {
        fields.as_object().cloned().unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_first_observation_inserts_without_delta() {
        let mut board = Board::new();
        let outcome = board.observe_at(
            "alice",
            payload(json!({"nickname": "alice", "matches": 1, "flight_time": "1:00:00"})),
            date("2026-08-01"),
        );

        assert!(outcome.inserted);
        assert!(!outcome.delta_created);
        assert!(board.contains("alice"));
        assert!(board.history_dates().is_empty());
    }

    #[test]
    fn test_update_on_a_new_day_creates_one_delta() {
        let mut board = Board::new();
        board.observe_at(
            "alice",
            payload(json!({"matches": 10, "score": 100, "flight_time": "2:00:00"})),
            date("2026-08-01"),
        );

        let outcome = board.observe_at(
            "alice",
            payload(json!({"matches": 12, "score": 150, "flight_time": "2:30:00"})),
            date("2026-08-02"),
        );
        assert!(outcome.delta_created);

        let deltas = board.deltas_on(date("2026-08-02")).unwrap();
        let delta = &deltas["alice"];
        assert_eq!(delta.matches, 2);
        assert_eq!(delta.score, 50);
        assert!((delta.flight_time.unwrap() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_same_day_updates_do_not_recompute_the_delta() {
        let mut board = Board::new();
        board.observe_at(
            "alice",
            payload(json!({"matches": 10})),
            date("2026-08-01"),
        );
        board.observe_at(
            "alice",
            payload(json!({"matches": 12})),
            date("2026-08-02"),
        );
        let outcome = board.observe_at(
            "alice",
            payload(json!({"matches": 20})),
            date("2026-08-02"),
        );

        assert!(!outcome.delta_created);
        // The first update of the day wins; the snapshot still reads +2.
        let deltas = board.deltas_on(date("2026-08-02")).unwrap();
        assert_eq!(deltas["alice"].matches, 2);
        // The current-state table still advanced.
        assert_eq!(board.pilot("alice").unwrap().matches(), Some(20));
    }

    #[test]
    fn test_observe_is_idempotent_for_unchanged_payloads() {
        let mut board = Board::new();
        let fields = json!({"matches": 5, "score": 50, "flight_time": "1:00:00"});
        board.observe_at("alice", payload(fields.clone()), date("2026-08-01"));

        let outcome = board.observe_at("alice", payload(fields.clone()), date("2026-08-02"));
        assert!(!outcome.delta_created);
        let outcome = board.observe_at("alice", payload(fields), date("2026-08-02"));
        assert!(!outcome.delta_created);

        assert!(board.deltas_on(date("2026-08-02")).is_none());
    }

    #[test]
    fn test_detail_merge_on_insert_day_creates_no_delta() {
        let mut board = Board::new();
        board.observe_at(
            "alice",
            payload(json!({"matches": 1, "flight_time": "1:00:00"})),
            date("2026-08-01"),
        );

        // Enrichment result lands later the same day.
        let outcome = board.observe_at(
            "alice",
            payload(json!({"matches": 1, "kill_death_ratio": 1.2})),
            date("2026-08-01"),
        );

        assert!(!outcome.inserted);
        assert!(!outcome.delta_created);
        assert_eq!(
            board.pilot("alice").unwrap().kill_death_ratio(),
            Some(1.2)
        );
    }

    #[test]
    fn test_malformed_flight_time_warns_but_keeps_the_record() {
        let mut board = Board::new();
        let outcome = board.observe_at(
            "bob",
            payload(json!({"nickname": "bob", "flight_time": "??"})),
            date("2026-08-01"),
        );

        assert!(outcome.inserted);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(matches!(
            outcome.warnings[0],
            SyncError::MalformedDuration(_)
        ));
        assert!(board.contains("bob"));
    }

    #[test]
    fn test_history_identities_always_exist_in_latest() {
        let mut board = Board::new();
        board.observe_at("alice", payload(json!({"matches": 1})), date("2026-08-01"));
        board.observe_at("alice", payload(json!({"matches": 2})), date("2026-08-02"));

        for day in board.history_dates() {
            for handle in board.deltas_on(day).unwrap().keys() {
                assert!(board.contains(handle));
            }
        }
    }
}
