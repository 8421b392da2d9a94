//! Cross-platform date entry.
//!
//! # Responsibility
//! - Turn user interaction into a committed calendar date under two input
//!   modalities: a native picker widget and free-text `YYYY-MM-DD` entry.
//! - Keep both modalities behind one `DateEntry` strategy selected by the host
//!   platform at construction.
//!
//! # Invariants
//! - Committed values are always local midnight of a valid calendar day.
//! - The maximum bound is inclusive and defaults to the current moment.
//! - A rejected input never changes the committed value.

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$").expect("valid iso date regex"));

/// Placeholder shown by the text modality.
pub const TEXT_PLACEHOLDER: &str = "YYYY-MM-DD";
/// Helper line shown under the text modality.
pub const TEXT_HELPER: &str = "Format: YYYY-MM-DD";
/// Longest accepted text buffer, matching the ISO form length.
pub const TEXT_MAX_LENGTH: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateInputError {
    #[error("date `{0}` does not match YYYY-MM-DD")]
    Malformed(String),
    #[error("date `{0}` is not a valid calendar date")]
    InvalidCalendarDate(String),
    #[error("date {date} is after the maximum allowed date {maximum}")]
    AfterMaximum { date: NaiveDate, maximum: NaiveDate },
    #[error("{entry} date entry does not accept {event} input")]
    UnsupportedEvent {
        entry: &'static str,
        event: &'static str,
    },
}

/// Host platform, used to pick the date entry modality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Ios,
    Android,
    Web,
}

impl Platform {
    /// Platform this binary was compiled for.
    ///
    /// Desktop targets have no native date picker and use the text modality.
    pub fn current() -> Self {
        if cfg!(target_os = "ios") {
            Self::Ios
        } else if cfg!(target_os = "android") {
            Self::Android
        } else {
            Self::Web
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ios" => Some(Self::Ios),
            "android" => Some(Self::Android),
            "web" => Some(Self::Web),
            _ => None,
        }
    }
}

/// Which input modality a `DateEntry` implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateEntryKind {
    Picker,
    Text,
}

impl DateEntryKind {
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Ios | Platform::Android => Self::Picker,
            Platform::Web => Self::Text,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Picker => "picker",
            Self::Text => "text",
        }
    }
}

/// Upper bound for selectable dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaximumDate {
    /// The moment the bound is evaluated.
    #[default]
    Now,
    At(DateTime<Local>),
}

impl MaximumDate {
    pub fn resolve(self) -> DateTime<Local> {
        match self {
            Self::Now => Local::now(),
            Self::At(moment) => moment,
        }
    }
}

/// One user interaction with a date control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateEntryEvent<'a> {
    /// Text buffer changed to the given contents.
    Text(&'a str),
    /// Native picker reported a selection.
    Picked(NaiveDate),
}

impl DateEntryEvent<'_> {
    fn label(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Picked(_) => "picker",
        }
    }
}

/// Date entry strategy.
pub trait DateEntry {
    fn kind(&self) -> DateEntryKind;

    /// Formats a committed value for display in this modality.
    fn display(&self, value: &DateTime<Local>) -> String;

    /// Converts one event into a candidate value, or rejects it.
    fn accept(
        &self,
        event: DateEntryEvent<'_>,
        maximum: MaximumDate,
    ) -> Result<DateTime<Local>, DateInputError>;
}

/// Native modal picker. The widget enforces the maximum bound itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct PickerDateEntry;

impl DateEntry for PickerDateEntry {
    fn kind(&self) -> DateEntryKind {
        DateEntryKind::Picker
    }

    fn display(&self, value: &DateTime<Local>) -> String {
        format_long(value.date_naive())
    }

    fn accept(
        &self,
        event: DateEntryEvent<'_>,
        _maximum: MaximumDate,
    ) -> Result<DateTime<Local>, DateInputError> {
        match event {
            DateEntryEvent::Picked(date) => Ok(select_from_picker(date)),
            other => Err(DateInputError::UnsupportedEvent {
                entry: DateEntryKind::Picker.as_str(),
                event: other.label(),
            }),
        }
    }
}

/// Free-text entry validated against `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextDateEntry;

impl DateEntry for TextDateEntry {
    fn kind(&self) -> DateEntryKind {
        DateEntryKind::Text
    }

    fn display(&self, value: &DateTime<Local>) -> String {
        format_iso(value.date_naive())
    }

    fn accept(
        &self,
        event: DateEntryEvent<'_>,
        maximum: MaximumDate,
    ) -> Result<DateTime<Local>, DateInputError> {
        match event {
            DateEntryEvent::Text(text) => parse_text_date(text, maximum.resolve()),
            other => Err(DateInputError::UnsupportedEvent {
                entry: DateEntryKind::Text.as_str(),
                event: other.label(),
            }),
        }
    }
}

/// Builds the strategy for a given modality.
pub fn entry_for(kind: DateEntryKind) -> Box<dyn DateEntry + Send + Sync> {
    match kind {
        DateEntryKind::Picker => Box::new(PickerDateEntry),
        DateEntryKind::Text => Box::new(TextDateEntry),
    }
}

/// Form-level date control state.
///
/// Owns the committed value, the raw text buffer and the entry strategy.
pub struct DateField {
    entry: Box<dyn DateEntry + Send + Sync>,
    value: DateTime<Local>,
    text: String,
    maximum: MaximumDate,
}

impl DateField {
    /// Creates a field for the given platform with an initial committed value.
    pub fn new(platform: Platform, initial: DateTime<Local>) -> Self {
        Self::with_entry(entry_for(DateEntryKind::for_platform(platform)), initial)
    }

    pub fn with_entry(entry: Box<dyn DateEntry + Send + Sync>, initial: DateTime<Local>) -> Self {
        Self {
            entry,
            text: format_iso(initial.date_naive()),
            value: initial,
            maximum: MaximumDate::Now,
        }
    }

    pub fn with_maximum(mut self, maximum: MaximumDate) -> Self {
        self.maximum = maximum;
        self
    }

    pub fn kind(&self) -> DateEntryKind {
        self.entry.kind()
    }

    pub fn value(&self) -> DateTime<Local> {
        self.value
    }

    /// Raw text buffer, including edits that did not parse.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Bound handed to the native widget; text entry checks it on parse.
    pub fn maximum_date(&self) -> DateTime<Local> {
        self.maximum.resolve()
    }

    pub fn display(&self) -> String {
        self.entry.display(&self.value)
    }

    /// Text modality edit. On a text field the buffer always follows the
    /// input; the committed value changes only when the input parses.
    /// Picker fields leave both untouched.
    pub fn input_text(&mut self, text: &str) -> Result<DateTime<Local>, DateInputError> {
        if self.kind() == DateEntryKind::Text {
            self.text = text.to_string();
        }
        self.apply(DateEntryEvent::Text(text))
    }

    /// Picker modality selection. Also rewrites the text buffer.
    pub fn pick(&mut self, date: NaiveDate) -> Result<DateTime<Local>, DateInputError> {
        let committed = self.apply(DateEntryEvent::Picked(date))?;
        self.text = format_iso(committed.date_naive());
        Ok(committed)
    }

    fn apply(&mut self, event: DateEntryEvent<'_>) -> Result<DateTime<Local>, DateInputError> {
        match self.entry.accept(event, self.maximum) {
            Ok(value) => {
                self.value = value;
                Ok(value)
            }
            Err(err) => {
                debug!(
                    "event=date_input module=date_input status=rejected entry={} error={}",
                    self.entry.kind().as_str(),
                    err
                );
                Err(err)
            }
        }
    }
}

/// Parses strict `YYYY-MM-DD` text into local midnight of that day.
///
/// # Errors
/// - `Malformed` when the text is not exactly four, two and two ASCII digits.
/// - `InvalidCalendarDate` for days that do not exist (e.g. `2024-02-30`).
/// - `AfterMaximum` when local midnight of the day is later than `maximum`.
pub fn parse_text_date(
    text: &str,
    maximum: DateTime<Local>,
) -> Result<DateTime<Local>, DateInputError> {
    let captures = ISO_DATE_RE
        .captures(text)
        .ok_or_else(|| DateInputError::Malformed(text.to_string()))?;

    let field = |index: usize| -> Result<u32, DateInputError> {
        captures[index]
            .parse::<u32>()
            .map_err(|_| DateInputError::Malformed(text.to_string()))
    };
    let year = i32::try_from(field(1)?).map_err(|_| DateInputError::Malformed(text.to_string()))?;
    let date = NaiveDate::from_ymd_opt(year, field(2)?, field(3)?)
        .ok_or_else(|| DateInputError::InvalidCalendarDate(text.to_string()))?;

    let midnight =
        local_midnight(date).ok_or_else(|| DateInputError::InvalidCalendarDate(text.to_string()))?;
    if midnight > maximum {
        return Err(DateInputError::AfterMaximum {
            date,
            maximum: maximum.date_naive(),
        });
    }
    Ok(midnight)
}

/// Commits a picker selection. The picker only offers valid, in-bound days.
pub fn select_from_picker(date: NaiveDate) -> DateTime<Local> {
    // Every calendar day has at least one local instant within its first hours.
    local_midnight(date).unwrap_or_else(Local::now)
}

/// Local midnight of `date`.
///
/// When midnight falls into a DST gap, the first representable instant of the
/// day is used instead.
pub fn local_midnight(date: NaiveDate) -> Option<DateTime<Local>> {
    let start = date.and_hms_opt(0, 0, 0)?;
    (0..=2)
        .map(|hours| start + Duration::hours(hours))
        .find_map(|candidate| Local.from_local_datetime(&candidate).earliest())
}

/// Default birth date offered by profile and friend forms.
pub fn default_birth_date() -> DateTime<Local> {
    NaiveDate::from_ymd_opt(2000, 1, 1)
        .and_then(local_midnight)
        .unwrap_or_else(Local::now)
}

/// Long display form, e.g. `January 1, 2000`.
pub fn format_long(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// ISO display form, e.g. `2000-01-01`.
pub fn format_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::{
        format_iso, format_long, local_midnight, parse_text_date, DateEntryKind, DateField,
        DateInputError, MaximumDate, Platform,
    };
    use chrono::{DateTime, Local, NaiveDate, Timelike};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    fn midnight(y: i32, m: u32, d: u32) -> DateTime<Local> {
        local_midnight(day(y, m, d)).expect("local midnight")
    }

    #[test]
    fn parse_accepts_valid_date_at_local_midnight() {
        let parsed = parse_text_date("2023-05-15", midnight(2025, 1, 1)).expect("valid date");
        assert_eq!(parsed, midnight(2023, 5, 15));
        assert_eq!(parsed.date_naive(), day(2023, 5, 15));
    }

    #[test]
    fn parse_rejects_impossible_calendar_day() {
        let err = parse_text_date("2024-02-30", midnight(2025, 1, 1)).expect_err("feb 30");
        assert_eq!(err, DateInputError::InvalidCalendarDate("2024-02-30".into()));
    }

    #[test]
    fn parse_accepts_leap_day() {
        let parsed = parse_text_date("2024-02-29", midnight(2025, 1, 1)).expect("leap day");
        assert_eq!(parsed.date_naive(), day(2024, 2, 29));
    }

    #[test]
    fn parse_rejects_non_matching_shapes() {
        for text in [
            "",
            "2023-5-15",
            "23-05-15",
            "2023/05/15",
            " 2023-05-15",
            "2023-05-15 ",
            "2023-05-15T00:00",
            "２０２３-05-15",
        ] {
            let err = parse_text_date(text, midnight(2025, 1, 1)).expect_err(text);
            assert!(matches!(err, DateInputError::Malformed(_)), "{text}: {err}");
        }
    }

    #[test]
    fn maximum_bound_is_inclusive() {
        let max = midnight(2025, 1, 1);
        assert!(parse_text_date("2025-01-01", max).is_ok());

        let err = parse_text_date("2025-01-02", max).expect_err("after max");
        assert_eq!(
            err,
            DateInputError::AfterMaximum {
                date: day(2025, 1, 2),
                maximum: day(2025, 1, 1),
            }
        );
    }

    #[test]
    fn platform_selects_modality() {
        assert_eq!(
            DateEntryKind::for_platform(Platform::Ios),
            DateEntryKind::Picker
        );
        assert_eq!(
            DateEntryKind::for_platform(Platform::Android),
            DateEntryKind::Picker
        );
        assert_eq!(
            DateEntryKind::for_platform(Platform::Web),
            DateEntryKind::Text
        );
        assert_eq!(Platform::parse(" Web "), Some(Platform::Web));
        assert_eq!(Platform::parse("desktop"), None);
    }

    #[test]
    fn text_field_keeps_previous_value_on_rejection() {
        let mut field = DateField::new(Platform::Web, midnight(2000, 1, 1))
            .with_maximum(MaximumDate::At(midnight(2025, 1, 1)));

        assert!(field.input_text("2024-02-30").is_err());
        assert_eq!(field.value(), midnight(2000, 1, 1));
        assert_eq!(field.text(), "2024-02-30");

        assert!(field.input_text("2024-0").is_err());
        assert_eq!(field.value(), midnight(2000, 1, 1));

        let committed = field.input_text("2023-05-15").expect("valid");
        assert_eq!(committed, midnight(2023, 5, 15));
        assert_eq!(field.value(), midnight(2023, 5, 15));
        assert_eq!(field.display(), "2023-05-15");
    }

    #[test]
    fn text_field_rejects_day_after_maximum_without_committing() {
        let mut field = DateField::new(Platform::Web, midnight(2020, 6, 1))
            .with_maximum(MaximumDate::At(midnight(2025, 1, 1)));

        let err = field.input_text("2025-01-02").expect_err("after maximum");
        assert!(matches!(err, DateInputError::AfterMaximum { .. }));
        assert_eq!(field.value(), midnight(2020, 6, 1));
        assert_eq!(field.display(), "2020-06-01");

        let committed = field.input_text("2025-01-01").expect("bound is inclusive");
        assert_eq!(field.value(), committed);
    }

    #[test]
    fn picker_field_commits_and_syncs_text_buffer() {
        let mut field = DateField::new(Platform::Ios, midnight(2000, 1, 1));
        assert_eq!(field.display(), "January 1, 2000");

        let committed = field.pick(day(1994, 11, 3)).expect("picker selection");
        assert_eq!(committed.date_naive(), day(1994, 11, 3));
        assert_eq!(committed.hour(), 0);
        assert_eq!(field.text(), "1994-11-03");
        assert_eq!(field.display(), "November 3, 1994");
    }

    #[test]
    fn strategies_reject_foreign_events() {
        let mut picker = DateField::new(Platform::Android, midnight(2000, 1, 1));
        let err = picker.input_text("2001-01-01").expect_err("picker ignores text");
        assert!(matches!(err, DateInputError::UnsupportedEvent { .. }));
        assert_eq!(picker.value(), midnight(2000, 1, 1));
        assert_eq!(picker.text(), "2000-01-01");

        let mut text = DateField::new(Platform::Web, midnight(2000, 1, 1));
        assert!(text.pick(day(2001, 1, 1)).is_err());
        assert_eq!(text.value(), midnight(2000, 1, 1));
        assert_eq!(text.text(), "2000-01-01");
    }

    #[test]
    fn default_maximum_is_now() {
        let field = DateField::new(Platform::Web, midnight(2000, 1, 1));
        let before = Local::now();
        let max = field.maximum_date();
        assert!(max >= before);
    }

    #[test]
    fn formats_long_and_iso_forms() {
        assert_eq!(format_long(day(2000, 1, 1)), "January 1, 2000");
        assert_eq!(format_iso(day(2000, 1, 1)), "2000-01-01");
    }
}
