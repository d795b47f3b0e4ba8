//! Recurrence rules and the predicate deciding whether a task is due.
//!
//! [`is_due_on`] is total: a malformed rule never errors, it simply never
//! fires. Write paths call [`Recurrence::validate`] so malformed rules are
//! rejected before they reach storage.

use std::fmt;

use jiff::civil::{self, Date};
use log::warn;
use serde::{Deserialize, Serialize};

use super::Task;
use crate::error::{PlannerError, Result};

/// Day of the week, Monday first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl From<civil::Weekday> for Weekday {
    fn from(value: civil::Weekday) -> Self {
        match value {
            civil::Weekday::Monday => Weekday::Monday,
            civil::Weekday::Tuesday => Weekday::Tuesday,
            civil::Weekday::Wednesday => Weekday::Wednesday,
            civil::Weekday::Thursday => Weekday::Thursday,
            civil::Weekday::Friday => Weekday::Friday,
            civil::Weekday::Saturday => Weekday::Saturday,
            civil::Weekday::Sunday => Weekday::Sunday,
        }
    }
}

impl std::str::FromStr for Weekday {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mon" | "monday" => Ok(Weekday::Monday),
            "tue" | "tuesday" => Ok(Weekday::Tuesday),
            "wed" | "wednesday" => Ok(Weekday::Wednesday),
            "thu" | "thursday" => Ok(Weekday::Thursday),
            "fri" | "friday" => Ok(Weekday::Friday),
            "sat" | "saturday" => Ok(Weekday::Saturday),
            "sun" | "sunday" => Ok(Weekday::Sunday),
            _ => Err(format!("Invalid weekday: {s}")),
        }
    }
}

impl Weekday {
    pub fn short_name(&self) -> &'static str {
        match self {
            Weekday::Monday => "Mon",
            Weekday::Tuesday => "Tue",
            Weekday::Wednesday => "Wed",
            Weekday::Thursday => "Thu",
            Weekday::Friday => "Fri",
            Weekday::Saturday => "Sat",
            Weekday::Sunday => "Sun",
        }
    }

    fn is_workday(self) -> bool {
        !matches!(self, Weekday::Saturday | Weekday::Sunday)
    }
}

/// The pattern deciding which calendar dates a task is due.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Recurrence {
    /// Never scheduled automatically
    #[default]
    AdHoc,
    /// Every day
    Daily,
    /// Monday through Friday
    Weekdays,
    /// On each listed weekday
    Weekly { weekdays: Vec<Weekday> },
    /// Every `interval_days` days counted from the task's anchor date
    NDays { interval_days: u32 },
    /// On a fixed day of the month; months without that day are skipped
    MonthlyDate { day: u8 },
    /// On the n-th (or, when negative, n-th from last) weekday of the month
    MonthlyDay { occurrence: i8, weekday: Weekday },
    /// Once a year on `month`/`day`
    Yearly { month: u8, day: u8 },
}

impl Recurrence {
    /// Whether the rule fires on `date`. `anchor` is only consulted by
    /// [`Recurrence::NDays`].
    pub fn fires_on(&self, date: Date, anchor: Date) -> bool {
        match self {
            Recurrence::AdHoc => false,
            Recurrence::Daily => true,
            Recurrence::Weekdays => Weekday::from(date.weekday()).is_workday(),
            Recurrence::Weekly { weekdays } => {
                weekdays.contains(&Weekday::from(date.weekday()))
            }
            Recurrence::NDays { interval_days } => {
                n_days_fires(date, anchor, *interval_days)
            }
            Recurrence::MonthlyDate { day } => date.day() as i16 == *day as i16,
            Recurrence::MonthlyDay {
                occurrence,
                weekday,
            } => monthly_day_fires(date, *occurrence, *weekday),
            Recurrence::Yearly { month, day } => {
                date.month() as i16 == *month as i16 && date.day() as i16 == *day as i16
            }
        }
    }

    /// Check the structural invariants of the rule.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| -> Result<()> {
            Err(PlannerError::validation("recurrence").with_reason(reason))
        };
        match self {
            Recurrence::Weekly { weekdays } if weekdays.is_empty() => {
                invalid("weekly recurrence needs at least one weekday")
            }
            Recurrence::NDays { interval_days } if *interval_days < 1 => {
                invalid("n-days interval must be at least 1")
            }
            Recurrence::MonthlyDate { day } if !(1..=31).contains(day) => {
                invalid("day of month must be between 1 and 31")
            }
            Recurrence::MonthlyDay { occurrence, .. }
                if *occurrence == 0 || !(-5..=5).contains(occurrence) =>
            {
                invalid("occurrence must be 1..5 or -1..-5")
            }
            Recurrence::Yearly { month, day } => {
                // 2024 is a leap year, so Feb 29 is accepted.
                if Date::new(2024, *month as i8, *day as i8).is_err() {
                    invalid("month/day is not a calendar date")
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }

    /// Short machine name, matching the serialized tag.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Recurrence::AdHoc => "ad_hoc",
            Recurrence::Daily => "daily",
            Recurrence::Weekdays => "weekdays",
            Recurrence::Weekly { .. } => "weekly",
            Recurrence::NDays { .. } => "n_days",
            Recurrence::MonthlyDate { .. } => "monthly_date",
            Recurrence::MonthlyDay { .. } => "monthly_day",
            Recurrence::Yearly { .. } => "yearly",
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recurrence::AdHoc => write!(f, "ad hoc"),
            Recurrence::Daily => write!(f, "daily"),
            Recurrence::Weekdays => write!(f, "weekdays"),
            Recurrence::Weekly { weekdays } => {
                let days: Vec<&str> = weekdays.iter().map(Weekday::short_name).collect();
                write!(f, "weekly on {}", days.join(", "))
            }
            Recurrence::NDays { interval_days } => write!(f, "every {interval_days} days"),
            Recurrence::MonthlyDate { day } => write!(f, "monthly on day {day}"),
            Recurrence::MonthlyDay {
                occurrence,
                weekday,
            } => {
                if *occurrence == -1 {
                    write!(f, "monthly on the last {}", weekday.short_name())
                } else if *occurrence < 0 {
                    write!(f, "monthly on {} {} from the end", -occurrence, weekday.short_name())
                } else {
                    write!(f, "monthly on {} #{occurrence}", weekday.short_name())
                }
            }
            Recurrence::Yearly { month, day } => write!(f, "yearly on {month:02}-{day:02}"),
        }
    }
}

fn n_days_fires(date: Date, anchor: Date, interval_days: u32) -> bool {
    if interval_days < 1 {
        warn!("n-days recurrence with interval {interval_days} never fires");
        return false;
    }
    if date < anchor {
        return false;
    }
    match anchor.until(date) {
        Ok(span) => span.get_days() as i64 % interval_days as i64 == 0,
        Err(e) => {
            warn!("cannot measure days from {anchor} to {date}: {e}");
            false
        }
    }
}

fn monthly_day_fires(date: Date, occurrence: i8, weekday: Weekday) -> bool {
    if Weekday::from(date.weekday()) != weekday {
        return false;
    }
    let day = date.day();
    if occurrence > 0 {
        // 1-based count of this weekday from the 1st up to and including `date`
        (day - 1) / 7 + 1 == occurrence
    } else if occurrence < 0 {
        // Same count taken backwards from the month's last day
        (date.days_in_month() - day) / 7 + 1 == -occurrence
    } else {
        warn!("monthly-day recurrence with occurrence 0 never fires");
        false
    }
}

/// Whether `task`'s recurrence rule fires on `date`.
///
/// The n-days anchor is the task's last completed date when known, else the
/// date it was created.
pub fn is_due_on(task: &Task, date: Date) -> bool {
    task.recurrence.fires_on(date, task.anchor_date())
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    const ANCHOR: Date = date(2026, 1, 1);

    fn fires(rule: &Recurrence, d: Date) -> bool {
        rule.fires_on(d, ANCHOR)
    }

    #[test]
    fn test_ad_hoc_never_fires() {
        let mut d = date(2026, 1, 1);
        for _ in 0..60 {
            assert!(!fires(&Recurrence::AdHoc, d));
            d = d.tomorrow().expect("valid date");
        }
    }

    #[test]
    fn test_daily_always_fires() {
        assert!(fires(&Recurrence::Daily, date(2026, 2, 28)));
        assert!(fires(&Recurrence::Daily, date(1999, 12, 31)));
    }

    #[test]
    fn test_weekdays() {
        // 2026-01-05 is a Monday
        assert!(fires(&Recurrence::Weekdays, date(2026, 1, 5)));
        assert!(fires(&Recurrence::Weekdays, date(2026, 1, 9)));
        assert!(!fires(&Recurrence::Weekdays, date(2026, 1, 10)));
        assert!(!fires(&Recurrence::Weekdays, date(2026, 1, 11)));
    }

    #[test]
    fn test_weekly_matches_weekday_set_for_every_day() {
        let set = vec![Weekday::Tuesday, Weekday::Saturday];
        let rule = Recurrence::Weekly {
            weekdays: set.clone(),
        };
        let mut d = date(2026, 1, 1);
        for _ in 0..70 {
            let expected = set.contains(&Weekday::from(d.weekday()));
            assert_eq!(fires(&rule, d), expected, "mismatch on {d}");
            d = d.tomorrow().expect("valid date");
        }
    }

    #[test]
    fn test_weekly_with_empty_set_never_fires() {
        let rule = Recurrence::Weekly { weekdays: vec![] };
        assert!(!fires(&rule, date(2026, 1, 5)));
        assert!(rule.validate().is_err());
    }

    #[test]
    fn test_n_days_from_anchor() {
        let anchor = date(2026, 1, 10);
        for k in 1..=7u32 {
            let rule = Recurrence::NDays { interval_days: k };
            let mut d = date(2026, 1, 1);
            for _ in 0..40 {
                let expected = if d < anchor {
                    false
                } else {
                    let days = anchor.until(d).expect("span").get_days() as u32;
                    days % k == 0
                };
                assert_eq!(rule.fires_on(d, anchor), expected, "k={k} d={d}");
                d = d.tomorrow().expect("valid date");
            }
        }
    }

    #[test]
    fn test_n_days_fires_on_anchor_day() {
        let rule = Recurrence::NDays { interval_days: 3 };
        assert!(rule.fires_on(date(2026, 3, 1), date(2026, 3, 1)));
        assert!(!rule.fires_on(date(2026, 3, 2), date(2026, 3, 1)));
        assert!(rule.fires_on(date(2026, 3, 4), date(2026, 3, 1)));
    }

    #[test]
    fn test_n_days_across_month_and_year_boundary() {
        let rule = Recurrence::NDays { interval_days: 7 };
        assert!(rule.fires_on(date(2026, 1, 4), date(2025, 12, 28)));
        assert!(!rule.fires_on(date(2026, 1, 5), date(2025, 12, 28)));
    }

    #[test]
    fn test_n_days_zero_interval_degrades_to_not_due() {
        let rule = Recurrence::NDays { interval_days: 0 };
        assert!(!rule.fires_on(date(2026, 1, 1), date(2026, 1, 1)));
        assert!(rule.validate().is_err());
    }

    #[test]
    fn test_monthly_date() {
        let rule = Recurrence::MonthlyDate { day: 15 };
        assert!(fires(&rule, date(2026, 1, 15)));
        assert!(!fires(&rule, date(2026, 1, 14)));
    }

    #[test]
    fn test_monthly_date_does_not_clamp_short_months() {
        let rule = Recurrence::MonthlyDate { day: 31 };
        assert!(fires(&rule, date(2026, 1, 31)));
        assert!(!fires(&rule, date(2026, 2, 28)));
        assert!(!fires(&rule, date(2026, 4, 30)));
    }

    #[test]
    fn test_monthly_day_last_friday() {
        let rule = Recurrence::MonthlyDay {
            occurrence: -1,
            weekday: Weekday::Friday,
        };
        assert!(fires(&rule, date(2026, 1, 30)));
        assert!(!fires(&rule, date(2026, 1, 23)));
        // February 2026: last Friday is the 27th
        assert!(fires(&rule, date(2026, 2, 27)));
        assert!(!fires(&rule, date(2026, 2, 20)));
    }

    #[test]
    fn test_monthly_day_first_monday() {
        let rule = Recurrence::MonthlyDay {
            occurrence: 1,
            weekday: Weekday::Monday,
        };
        assert!(fires(&rule, date(2026, 1, 5)));
        assert!(!fires(&rule, date(2026, 1, 12)));
        // A Tuesday in the first week never matches a Monday rule
        assert!(!fires(&rule, date(2026, 1, 6)));
    }

    #[test]
    fn test_monthly_day_second_to_last() {
        let rule = Recurrence::MonthlyDay {
            occurrence: -2,
            weekday: Weekday::Friday,
        };
        assert!(fires(&rule, date(2026, 1, 23)));
        assert!(!fires(&rule, date(2026, 1, 30)));
    }

    #[test]
    fn test_yearly() {
        let rule = Recurrence::Yearly { month: 1, day: 1 };
        for year in [2024, 2025, 2026, 2030] {
            assert!(fires(&rule, date(year, 1, 1)));
            assert!(!fires(&rule, date(year, 1, 2)));
            assert!(!fires(&rule, date(year, 12, 1)));
        }
    }

    #[test]
    fn test_validate_accepts_leap_day_and_rejects_bad_month() {
        assert!(Recurrence::Yearly { month: 2, day: 29 }.validate().is_ok());
        assert!(Recurrence::Yearly { month: 13, day: 1 }.validate().is_err());
        assert!(Recurrence::MonthlyDate { day: 0 }.validate().is_err());
        assert!(
            Recurrence::MonthlyDay {
                occurrence: 0,
                weekday: Weekday::Monday
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn test_serde_tagged_representation() {
        let rule = Recurrence::MonthlyDay {
            occurrence: -1,
            weekday: Weekday::Friday,
        };
        let json = serde_json::to_string(&rule).expect("serialize");
        assert_eq!(
            json,
            r#"{"type":"monthly_day","occurrence":-1,"weekday":"friday"}"#
        );
        let back: Recurrence = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, rule);
    }

    #[test]
    fn test_display() {
        let rule = Recurrence::Weekly {
            weekdays: vec![Weekday::Monday, Weekday::Thursday],
        };
        assert_eq!(rule.to_string(), "weekly on Mon, Thu");
        assert_eq!(
            Recurrence::MonthlyDay {
                occurrence: -1,
                weekday: Weekday::Friday
            }
            .to_string(),
            "monthly on the last Fri"
        );
    }
}
