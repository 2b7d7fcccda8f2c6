//! Policy run schedule.

use chrono::{DateTime, Duration, Months, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How often a policy runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunFrequency {
    /// Every hour.
    Hourly,
    /// Every day.
    #[default]
    Daily,
    /// Every seven days.
    Weekly,
    /// Every calendar month.
    Monthly,
    /// Any frequency name this build does not recognise.
    #[serde(other)]
    Unknown,
}

impl RunFrequency {
    /// Returns the next run time after `from`, `None` for unknown frequencies.
    #[must_use]
    pub fn next_after(self, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::Hourly => from.checked_add_signed(Duration::hours(1)),
            Self::Daily => from.checked_add_signed(Duration::days(1)),
            Self::Weekly => from.checked_add_signed(Duration::days(7)),
            Self::Monthly => from.checked_add_months(Months::new(1)),
            Self::Unknown => None,
        }
    }
}

impl std::fmt::Display for RunFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Hourly => "HOURLY",
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// When a policy last ran and will next run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PolicySchedule {
    /// Run cadence.
    #[serde(default)]
    pub run_frequency: RunFrequency,
    /// Time of the last completed run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_run_at: Option<DateTime<Utc>>,
    /// Time the next run is due.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_run_at: Option<DateTime<Utc>>,
}

impl PolicySchedule {
    /// Creates a schedule that has never run.
    #[must_use]
    pub const fn new(run_frequency: RunFrequency) -> Self {
        Self {
            run_frequency,
            last_run_at: None,
            next_run_at: None,
        }
    }

    /// A schedule with no `nextRunAt` is due immediately.
    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_run_at.map_or(true, |next| next <= now)
    }

    /// Records a run at `now` and computes the next due time.
    pub fn advance(&mut self, now: DateTime<Utc>) {
        self.last_run_at = Some(now);
        self.next_run_at = self.run_frequency.next_after(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn frequencies_advance() {
        let now = at(2024, 1, 31, 9);
        assert_eq!(RunFrequency::Hourly.next_after(now), Some(at(2024, 1, 31, 10)));
        assert_eq!(RunFrequency::Daily.next_after(now), Some(at(2024, 2, 1, 9)));
        assert_eq!(RunFrequency::Weekly.next_after(now), Some(at(2024, 2, 7, 9)));
        // Month-end clamps to the last day of February.
        assert_eq!(RunFrequency::Monthly.next_after(now), Some(at(2024, 2, 29, 9)));
        assert_eq!(RunFrequency::Unknown.next_after(now), None);
    }

    #[test]
    fn never_run_schedule_is_due() {
        let schedule = PolicySchedule::new(RunFrequency::Daily);
        assert!(schedule.is_due(at(2024, 1, 1, 0)));
    }

    #[test]
    fn advance_sets_next_run() {
        let mut schedule = PolicySchedule::new(RunFrequency::Weekly);
        let now = at(2024, 3, 1, 12);
        schedule.advance(now);

        assert_eq!(schedule.last_run_at, Some(now));
        assert!(!schedule.is_due(at(2024, 3, 7, 12)));
        assert!(schedule.is_due(at(2024, 3, 8, 12)));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn frequency() -> impl Strategy<Value = RunFrequency> {
            prop_oneof![
                Just(RunFrequency::Hourly),
                Just(RunFrequency::Daily),
                Just(RunFrequency::Weekly),
                Just(RunFrequency::Monthly),
            ]
        }

        proptest! {
            #[test]
            fn advanced_schedule_is_not_due_until_next_run(
                frequency in frequency(),
                offset in 0i64..4_000_000_000,
            ) {
                let now = at(1990, 1, 1, 0) + Duration::seconds(offset);
                let mut schedule = PolicySchedule::new(frequency);
                schedule.advance(now);

                let next = schedule.next_run_at.unwrap();
                prop_assert!(next > now);
                prop_assert!(!schedule.is_due(now));
                prop_assert!(schedule.is_due(next));
            }
        }
    }
}
