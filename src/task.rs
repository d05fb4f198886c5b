//! Task record and its pipe-delimited line format

use std::fmt;

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Field separator of the line format.
pub const SEPARATOR: char = '|';

const FIELD_COUNT: usize = 7;

/// Largest id a task may carry. The store needs one more value above it for
/// its next-id counter.
pub const MAX_ID: u32 = u32::MAX - 1;

/// A value picked from a numbered sub-menu and stored by its display name.
pub trait MenuOption: Copy + PartialEq + fmt::Display + 'static {
    /// Sub-menu heading, e.g. `Category`.
    const LABEL: &'static str;
    /// Variants in menu order.
    const ALL: &'static [Self];

    fn name(self) -> &'static str;

    /// Maps a 1-based menu choice to a variant.
    fn from_choice(choice: i64) -> Option<Self> {
        let index = usize::try_from(choice).ok()?.checked_sub(1)?;
        Self::ALL.get(index).copied()
    }

    /// Decodes a stored name. Unrecognized names fall back to the last
    /// variant, which is how existing task files have always been read.
    fn from_name(name: &str) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.name() == name)
            .unwrap_or(Self::ALL[Self::ALL.len() - 1])
    }
}

macro_rules! menu_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $label)] $variant),+
        }

        impl MenuOption for $name {
            const LABEL: &'static str = stringify!($name);
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

menu_enum! {
    /// Task category
    Category {
        Work => "Work",
        Personal => "Personal",
        Urgent => "Urgent",
    }
}

menu_enum! {
    /// Task priority level
    Priority {
        Low => "Low",
        Medium => "Medium",
        High => "High",
    }
}

menu_enum! {
    /// Task progress
    Status {
        Pending => "Pending",
        InProgress => "In Progress",
        Completed => "Completed",
    }
}

/// A due date in `YYYY-MM-DD` shape.
///
/// Only the shape is checked: ten characters with dashes at positions 4 and 7.
/// Values such as `9999-99-99` are accepted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DueDate(String);

impl DueDate {
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let bytes = text.as_bytes();
        if bytes.len() == 10 && bytes[4] == b'-' && bytes[7] == b'-' {
            Ok(Self(text.to_string()))
        } else {
            Err(ParseError::InvalidDueDate(text.to_string()))
        }
    }

    /// The local calendar date.
    pub fn today() -> Self {
        Self(Local::now().format("%Y-%m-%d").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DueDate {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DueDate> for String {
    fn from(value: DueDate) -> Self {
        value.0
    }
}

impl fmt::Display for DueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether `text` can be stored in a text field or due date without breaking
/// the line format.
pub fn is_storable_text(text: &str) -> bool {
    !text.contains([SEPARATOR, '\n', '\r'])
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub due_date: DueDate,
    pub status: Status,
}

impl Task {
    /// Encodes the task as `id|title|description|category|priority|due|status`.
    ///
    /// Text fields are written as-is; a `|` inside them produces a line that
    /// will not decode back to the same task.
    pub fn to_line(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}|{}|{}",
            self.id,
            self.title,
            self.description,
            self.category,
            self.priority,
            self.due_date,
            self.status
        )
    }

    pub fn from_line(line: &str) -> Result<Self, ParseError> {
        let fields: Vec<&str> = line.split(SEPARATOR).collect();
        if fields.len() != FIELD_COUNT {
            return Err(ParseError::FieldCount(fields.len()));
        }

        let id = fields[0]
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|id| (1..=MAX_ID).contains(id))
            .ok_or_else(|| ParseError::InvalidId(fields[0].to_string()))?;

        Ok(Self {
            id,
            title: fields[1].to_string(),
            description: fields[2].to_string(),
            category: Category::from_name(fields[3]),
            priority: Priority::from_name(fields[4]),
            due_date: DueDate::parse(fields[5])?,
            status: Status::from_name(fields[6]),
        })
    }

    /// Past due and not yet completed.
    pub fn is_overdue(&self, today: &DueDate) -> bool {
        self.status != Status::Completed && self.due_date < *today
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Task {
        Task {
            id: 3,
            title: "Finish Report".to_string(),
            description: "Complete the quarterly financial report.".to_string(),
            category: Category::Work,
            priority: Priority::High,
            due_date: DueDate::parse("2024-05-15").unwrap(),
            status: Status::InProgress,
        }
    }

    #[test]
    fn test_to_line() {
        assert_eq!(
            sample().to_line(),
            "3|Finish Report|Complete the quarterly financial report.|Work|High|2024-05-15|In Progress"
        );
    }

    #[test]
    fn test_line_round_trip() {
        let task = sample();
        assert_eq!(Task::from_line(&task.to_line()).unwrap(), task);

        let mut empty_text = sample();
        empty_text.title.clear();
        empty_text.description.clear();
        assert_eq!(Task::from_line(&empty_text.to_line()).unwrap(), empty_text);
    }

    #[test]
    fn test_separator_in_title_breaks_round_trip() {
        let mut task = sample();
        task.title = "a|b".to_string();
        assert_eq!(Task::from_line(&task.to_line()), Err(ParseError::FieldCount(8)));
    }

    #[test]
    fn test_unknown_names_fall_back_to_last_variant() {
        let task = Task::from_line("1|t|d|Hobby|Critical|2024-01-01|Blocked").unwrap();
        assert_eq!(task.category, Category::Urgent);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.status, Status::Completed);
    }

    #[test]
    fn test_from_line_rejects_bad_id() {
        assert_eq!(
            Task::from_line("abc|t|d|Work|Low|2024-01-01|Pending"),
            Err(ParseError::InvalidId("abc".to_string()))
        );
        assert_eq!(
            Task::from_line("0|t|d|Work|Low|2024-01-01|Pending"),
            Err(ParseError::InvalidId("0".to_string()))
        );
    }

    #[test]
    fn test_from_line_rejects_id_at_u32_max() {
        let line = format!("{}|t|d|Work|Low|2024-01-01|Pending", u32::MAX);
        assert_eq!(
            Task::from_line(&line),
            Err(ParseError::InvalidId(u32::MAX.to_string()))
        );

        let line = format!("{MAX_ID}|t|d|Work|Low|2024-01-01|Pending");
        assert_eq!(Task::from_line(&line).unwrap().id, MAX_ID);
    }

    #[test]
    fn test_from_line_rejects_field_count() {
        assert_eq!(
            Task::from_line("1|t|d|Work|Low|2024-01-01"),
            Err(ParseError::FieldCount(6))
        );
    }

    #[test]
    fn test_due_date_shape() {
        assert!(DueDate::parse("2024-05-15").is_ok());
        assert!(DueDate::parse("9999-99-99").is_ok());
        assert!(DueDate::parse("2024/05/15").is_err());
        assert!(DueDate::parse("15-05-2024").is_err());
        assert!(DueDate::parse("2024-5-15").is_err());
        assert!(DueDate::parse("").is_err());
    }

    #[test]
    fn test_from_choice() {
        assert_eq!(Category::from_choice(1), Some(Category::Work));
        assert_eq!(Priority::from_choice(2), Some(Priority::Medium));
        assert_eq!(Status::from_choice(3), Some(Status::Completed));
        assert_eq!(Status::from_choice(0), None);
        assert_eq!(Status::from_choice(4), None);
        assert_eq!(Category::from_choice(-1), None);
    }

    #[test]
    fn test_is_overdue() {
        let today = DueDate::parse("2024-06-01").unwrap();
        let mut task = sample();
        assert!(task.is_overdue(&today));

        task.status = Status::Completed;
        assert!(!task.is_overdue(&today));

        task.status = Status::Pending;
        task.due_date = DueDate::parse("2024-06-01").unwrap();
        assert!(!task.is_overdue(&today));
    }

    #[test]
    fn test_is_storable_text() {
        assert!(is_storable_text("Buy milk"));
        assert!(is_storable_text(""));
        assert!(!is_storable_text("a|b"));
        assert!(!is_storable_text("line\nbreak"));
    }

    #[test]
    fn test_json_uses_display_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["status"], "In Progress");
        assert_eq!(json["due_date"], "2024-05-15");

        let bad = r#"{"id":1,"title":"t","description":"","category":"Work","priority":"Low","due_date":"soon","status":"Pending"}"#;
        assert!(serde_json::from_str::<Task>(bad).is_err());
    }
}
