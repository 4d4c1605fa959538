use crate::error::{AppError, Result};
use crate::models::{FilterParams, Record};
use crate::repositories::dataset::{parse_timestamp, WEEKDAY, WEEKEND};
use chrono::NaiveDateTime;
use std::collections::BTreeSet;

/// Value an unfilled form field sends for `load_type`.
const LOAD_TYPE_PLACEHOLDER: &str = "load_type";

/// Weekend/weekday selection parsed once per request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WeekendToggle {
    #[default]
    Unset,
    Weekend,
    Weekday,
}

impl WeekendToggle {
    /// `"true"` and `"1"` (any case) select weekends; any other non-blank
    /// value selects weekdays.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None => WeekendToggle::Unset,
            Some(s) if s.trim().is_empty() => WeekendToggle::Unset,
            Some(s) if is_truthy(s) => WeekendToggle::Weekend,
            Some(_) => WeekendToggle::Weekday,
        }
    }

    fn week_status(&self) -> Option<&'static str> {
        match self {
            WeekendToggle::Unset => None,
            WeekendToggle::Weekend => Some(WEEKEND),
            WeekendToggle::Weekday => Some(WEEKDAY),
        }
    }
}

fn is_truthy(s: &str) -> bool {
    let lower = s.to_lowercase();
    lower == "true" || lower == "1"
}

/// Split a comma separated list, dropping blank tokens.
fn token_set(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().filter(|s| !s.is_empty())
}

fn parse_bound(name: &str, raw: &str) -> Result<NaiveDateTime> {
    parse_timestamp(raw)
        .ok_or_else(|| AppError::InvalidInput(format!("Invalid {name} date: '{raw}'")))
}

/// The active predicates of one request. Inactive predicates are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub load_types: Option<BTreeSet<String>>,
    pub days_of_week: Option<BTreeSet<String>>,
    pub weekend: WeekendToggle,
}

impl FilterSpec {
    /// Build the predicate set from raw query parameters.
    ///
    /// An unparseable `start` or `end` is rejected rather than ignored.
    pub fn from_params(params: &FilterParams) -> Result<Self> {
        let start = non_empty(&params.start)
            .map(|raw| parse_bound("start", raw))
            .transpose()?;
        let end = non_empty(&params.end)
            .map(|raw| parse_bound("end", raw))
            .transpose()?;

        let load_types = non_empty(&params.load_type)
            .filter(|raw| *raw != LOAD_TYPE_PLACEHOLDER)
            .map(token_set)
            .filter(|set| !set.is_empty());

        let weekend = WeekendToggle::parse(params.weekend.as_deref());

        // A pinned weekend makes the day-of-week list redundant.
        let days_of_week = non_empty(&params.dow)
            .filter(|_| weekend != WeekendToggle::Weekend)
            .map(token_set)
            .filter(|set| !set.is_empty());

        Ok(Self {
            start,
            end,
            load_types,
            days_of_week,
            weekend,
        })
    }

    pub fn matches(&self, record: &Record) -> bool {
        if let Some(start) = self.start {
            if !record.timestamp.is_some_and(|ts| ts >= start) {
                return false;
            }
        }
        if let Some(end) = self.end {
            if !record.timestamp.is_some_and(|ts| ts <= end) {
                return false;
            }
        }
        if let Some(allowed) = &self.load_types {
            if !allowed.contains(&record.load_type) {
                return false;
            }
        }
        if let Some(allowed) = &self.days_of_week {
            if !allowed.contains(&record.day_of_week) {
                return false;
            }
        }
        if let Some(status) = self.weekend.week_status() {
            if record.week_status != status {
                return false;
            }
        }
        true
    }

    /// Records satisfying every active predicate, in input order.
    pub fn apply<'a, I>(&self, records: I) -> Vec<&'a Record>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}
