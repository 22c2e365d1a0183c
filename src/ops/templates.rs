//! Starter-document templates seeded into a fresh space.
//!
//! Generators emit documents through the regular builder, so every
//! template round-trips through extraction and splitting by
//! construction. Timestamps are passed in by the caller; templates
//! never read the clock.

use chrono::{DateTime, Datelike, Local, Timelike, Weekday};

use crate::model::document::DocumentType;
use crate::model::field::{ExtractedMetadata, FieldKey, FieldSet, FieldValue};
use crate::model::history::{HistoryRow, HistoryTable};
use crate::model::marker::{ListName, MarkerKind};
use crate::parse::document_serializer::build_document;
use crate::parse::history_serializer::reconstruct_history;
use crate::parse::marker_serializer::encode;

/// A new action file.
pub fn action(
    name: &str,
    status: &str,
    focus_date: Option<&str>,
    due_date: Option<&str>,
    effort: &str,
    created: DateTime<Local>,
) -> String {
    let mut fields = FieldSet::from_extracted(&ExtractedMetadata::default());
    fields.set(FieldKey::Title, FieldValue::text(name));
    fields.set(FieldKey::Status, FieldValue::text(status));
    fields.set(
        FieldKey::FocusDateTime,
        FieldValue::text(focus_date.unwrap_or("")),
    );
    fields.set(FieldKey::DueDate, FieldValue::text(due_date.unwrap_or("")));
    fields.set(FieldKey::Effort, FieldValue::text(effort));
    fields.set(
        FieldKey::CreatedDateTime,
        FieldValue::text(created.to_rfc3339()),
    );

    let body = "## Notes\n<!-- Add any additional notes or details about this action here -->";
    build_document(DocumentType::Action, &fields, body)
}

/// A new project README.
pub fn project_readme(
    name: &str,
    description: &str,
    due_date: Option<&str>,
    status: &str,
    created: DateTime<Local>,
) -> String {
    let mut fields = FieldSet::from_extracted(&ExtractedMetadata::default());
    fields.set(FieldKey::Title, FieldValue::text(name));
    fields.set(FieldKey::ProjectStatus, FieldValue::text(status));
    fields.set(FieldKey::DueDate, FieldValue::text(due_date.unwrap_or("")));
    fields.set(
        FieldKey::CreatedDate,
        FieldValue::text(created.format("%Y-%m-%d").to_string()),
    );

    let body = format!(
        "## Description\n{}\n\n## Actions\nActions for this project are stored as individual markdown files in this directory.",
        description
    );
    build_document(DocumentType::Project, &fields, &body)
}

/// A new habit file with an empty status, a focus time, and a one-row
/// starter history table.
pub fn habit(name: &str, frequency: &str, created: DateTime<Local>) -> String {
    habit_with_notes(name, frequency, created, None)
}

fn habit_with_notes(
    name: &str,
    frequency: &str,
    created: DateTime<Local>,
    notes: Option<&str>,
) -> String {
    let mut fields = FieldSet::from_extracted(&ExtractedMetadata::default());
    fields.set(FieldKey::Title, FieldValue::text(name));
    fields.set(FieldKey::HabitStatus, FieldValue::Flag(false));
    fields.set(FieldKey::HabitFrequency, FieldValue::text(frequency));
    fields.set(
        FieldKey::FocusDateTime,
        FieldValue::text(created.to_rfc3339()),
    );
    fields.set(
        FieldKey::CreatedDate,
        FieldValue::text(created.format("%Y-%m-%d").to_string()),
    );

    let history = HistoryTable {
        intro: "## History".to_string(),
        header: HistoryTable::default_header(),
        rows: vec![HistoryRow::new(
            created.format("%Y-%m-%d").to_string(),
            created.format("%H:%M").to_string(),
            "To Do",
            "Created",
            "Initial habit creation",
        )],
        outro: String::new(),
    };

    let mut body = String::new();
    if let Some(notes) = notes {
        body.push_str("## Notes\n");
        body.push_str(notes);
        body.push_str("\n\n");
    }
    body.push_str(&reconstruct_history(&history));

    build_document(DocumentType::Habit, &fields, &body)
}

/// Seed habit: review the day's actions each morning at nine.
pub fn morning_review_habit(now: DateTime<Local>) -> String {
    habit_with_notes(
        "Morning Review",
        "daily",
        at_hour(now, 9),
        Some("Review today's actions and priorities. Check calendar, update task statuses, and set focus for the day."),
    )
}

/// Seed habit: journal each evening at eight.
pub fn evening_journal_habit(now: DateTime<Local>) -> String {
    habit_with_notes(
        "Evening Journal",
        "daily",
        at_hour(now, 20),
        Some("Reflect on the day's accomplishments and lessons learned. Write down three things you're grateful for."),
    )
}

/// Seed habit: full weekly review on Sunday afternoon.
pub fn weekly_review_habit(now: DateTime<Local>) -> String {
    let mut sunday = now;
    while sunday.weekday() != Weekday::Sun {
        sunday = sunday + chrono::Duration::days(1);
    }
    habit_with_notes(
        "Weekly Review",
        "weekly",
        at_hour(sunday, 14),
        Some("Process all inboxes to zero, review project and action lists, and clean up."),
    )
}

fn at_hour(now: DateTime<Local>, hour: u32) -> DateTime<Local> {
    now.with_hour(hour)
        .and_then(|t| t.with_minute(0))
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now)
}

/// A horizon file: prose plus a live list placeholder for the
/// documents that sit at that horizon.
pub fn horizon_file(title: &str, altitude: &str, blurb: &str, list: ListName) -> String {
    format!(
        "# {} ({})\n\n{}\n\n## Current\n{}\n\n## Review\nUpdate this list during your weekly review.\n",
        title,
        altitude,
        blurb,
        encode(MarkerKind::ListPlaceholder(list), "", "")
    )
}

/// The welcome file dropped into a freshly initialized space.
pub const WELCOME: &str = "\
# Welcome to Your Space

## Projects
Each project is a folder with a README.md and individual action files.

## Habits
Recurring routines, each with frequency, status, and a history log.

## Horizons
Areas of Focus, Goals, Vision, and Purpose files for the higher
altitudes of review.

## Cabinet
Reference material that needs no action.

Capture, clarify, organize, reflect, engage.
";
