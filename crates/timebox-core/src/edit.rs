//! Intake of raw subtask edit-form values.
//!
//! Durations must be whole non-negative minutes or the edit is rejected. A
//! start time needs both a `YYYY-MM-DD` date and an `HH:MM` time; a missing or
//! unparsable pair clears the start so the chain cascade assigns one.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::scheduler::{parse_clock, SchedulerConfig};
use crate::task::SubTask;

/// Raw values as typed into an edit form. `None` means "field not touched".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditForm {
    pub text: Option<String>,
    pub duration: Option<String>,
    #[serde(rename = "break")]
    pub break_minutes: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
}

/// What an edit does to the scheduled start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StartEdit {
    #[default]
    Keep,
    Clear,
    Set(DateTime<Utc>),
}

/// A validated edit to one subtask.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtaskEdit {
    pub text: Option<String>,
    pub duration_minutes: Option<u32>,
    pub break_minutes: Option<u32>,
    pub start: StartEdit,
}

impl SubtaskEdit {
    /// Validate a form against the local date/time rules of `config`.
    pub fn from_form(form: &EditForm, config: &SchedulerConfig) -> Result<Self, ValidationError> {
        let duration_minutes = form
            .duration
            .as_deref()
            .map(|v| parse_minutes("duration", v))
            .transpose()?;
        let break_minutes = form
            .break_minutes
            .as_deref()
            .map(|v| parse_minutes("break", v))
            .transpose()?;

        let start = match (form.date.as_deref(), form.time.as_deref()) {
            (None, None) => StartEdit::Keep,
            (Some(date), Some(time)) => match parse_local_start(date, time, config) {
                Some(instant) => StartEdit::Set(instant),
                None => StartEdit::Clear,
            },
            _ => StartEdit::Clear,
        };

        Ok(Self {
            text: form.text.clone(),
            duration_minutes,
            break_minutes,
            start,
        })
    }

    /// Write the edited fields into `subtask`.
    pub fn apply(&self, subtask: &mut SubTask) {
        if let Some(text) = &self.text {
            subtask.text = text.clone();
        }
        if let Some(minutes) = self.duration_minutes {
            subtask.duration_minutes = minutes;
        }
        if let Some(minutes) = self.break_minutes {
            subtask.break_minutes = minutes;
        }
        match self.start {
            StartEdit::Keep => {}
            StartEdit::Clear => subtask.scheduled_start_time = None,
            StartEdit::Set(instant) => subtask.scheduled_start_time = Some(instant),
        }
    }
}

/// Parse a whole, non-negative minute count.
pub fn parse_minutes(field: &str, value: &str) -> Result<u32, ValidationError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| ValidationError::InvalidMinutes {
            field: field.to_string(),
            value: value.to_string(),
        })
}

fn parse_local_start(date: &str, time: &str, config: &SchedulerConfig) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
    let time = parse_clock(time)?;
    Some(config.local_to_utc(date.and_time(time)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn form(duration: Option<&str>, date: Option<&str>, time: Option<&str>) -> EditForm {
        EditForm {
            duration: duration.map(String::from),
            date: date.map(String::from),
            time: time.map(String::from),
            ..EditForm::default()
        }
    }

    #[test]
    fn valid_date_and_time_set_the_start() {
        let edit = SubtaskEdit::from_form(
            &form(Some("45"), Some("2024-03-01"), Some("09:30")),
            &SchedulerConfig::default(),
        )
        .unwrap();
        assert_eq!(edit.duration_minutes, Some(45));
        assert_eq!(edit.start, StartEdit::Set("2024-03-01T09:30:00Z".parse().unwrap()));
    }

    #[test]
    fn local_time_is_shifted_by_offset() {
        let config = SchedulerConfig {
            utc_offset: FixedOffset::west_opt(5 * 3600).unwrap(),
            ..SchedulerConfig::default()
        };
        let edit = SubtaskEdit::from_form(&form(None, Some("2024-03-01"), Some("09:30")), &config).unwrap();
        assert_eq!(edit.start, StartEdit::Set("2024-03-01T14:30:00Z".parse().unwrap()));
    }

    #[test]
    fn partial_or_invalid_start_clears_it() {
        let config = SchedulerConfig::default();
        let only_time = SubtaskEdit::from_form(&form(None, None, Some("09:30")), &config).unwrap();
        assert_eq!(only_time.start, StartEdit::Clear);

        let bad_date = SubtaskEdit::from_form(&form(None, Some("2024-02-30"), Some("09:30")), &config).unwrap();
        assert_eq!(bad_date.start, StartEdit::Clear);

        let untouched = SubtaskEdit::from_form(&form(Some("10"), None, None), &config).unwrap();
        assert_eq!(untouched.start, StartEdit::Keep);
    }

    #[test]
    fn malformed_durations_are_rejected() {
        let config = SchedulerConfig::default();
        for bad in ["-5", "ten", "2.5", ""] {
            let err = SubtaskEdit::from_form(&form(Some(bad), None, None), &config).unwrap_err();
            assert!(matches!(err, ValidationError::InvalidMinutes { .. }), "{bad}");
        }

        let bad_break = EditForm {
            break_minutes: Some("x".into()),
            ..EditForm::default()
        };
        assert!(SubtaskEdit::from_form(&bad_break, &config).is_err());
    }

    #[test]
    fn apply_writes_only_touched_fields() {
        let mut subtask = SubTask::new("s", "Draft")
            .with_durations(25, 5)
            .scheduled_at("2024-03-01T09:00:00Z".parse().unwrap());
        let edit = SubtaskEdit {
            break_minutes: Some(10),
            start: StartEdit::Clear,
            ..SubtaskEdit::default()
        };
        edit.apply(&mut subtask);
        assert_eq!(subtask.duration_minutes, 25);
        assert_eq!(subtask.break_minutes, 10);
        assert!(subtask.scheduled_start_time.is_none());
        assert_eq!(subtask.text, "Draft");
    }
}
