//! Organization charter form
//!
//! [`charter_form`] lays out the two-page "Create New Organization" form
//! over a shared [`RecordStore`]. [`NewOrganization::from_record`] turns the
//! finished record into the insert payload.

use std::sync::Arc;

use clubhouse_core::{field_keys, FieldKey, FieldValue, Record, RecordStore};
use clubhouse_forms::{
    check_select, drop_select, page, section, text_field, upload, FieldIssue, MultiPageForm,
    Requirements, TextField,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::UserId;

field_keys! {
    /// Fields of an organization charter
    pub enum CharterField {
        Name => "name",
        Url => "url",
        Socials => "socials",
        Picture => "picture",
        Mission => "mission",
        Purpose => "purpose",
        Benefit => "benefit",
        AppointmentProcedures => "appointment_procedures",
        Uniqueness => "uniqueness",
        MeetingSchedule => "meeting_schedule",
        MeetingDays => "meeting_days",
        Keywords => "keywords",
        Tags => "tags",
        CommitmentLevel => "commitment_level",
        JoinInstructions => "join_instructions",
    }
}

/// A blank charter: every text field empty, no picture
pub fn empty_charter() -> Record<CharterField> {
    CharterField::all()
        .iter()
        .filter(|field| **field != CharterField::Picture)
        .fold(Record::new(), |record, field| record.with(*field, ""))
}

fn essay(field: &str, label: &str, description: &str, requirements: Requirements) -> TextField {
    text_field(field)
        .label(label)
        .multiline()
        .rows(4)
        .requirements(requirements)
        .description(description)
}

/// The organization creation form
pub fn charter_form(store: Arc<RecordStore<CharterField>>) -> MultiPageForm<CharterField> {
    let basic_info = page("Basic Info")
        .child(
            section()
                .bg("red")
                .child(
                    text_field("name")
                        .label("Name")
                        .required()
                        .requirements(Requirements::new().min_char(3).max_char(40).only_alpha()),
                )
                .child(
                    text_field("url").label("Url").required().requirements(
                        Requirements::new()
                            .min_char(3)
                            .max_char(40)
                            .disable_spaces()
                            .only_alpha(),
                    ),
                ),
        )
        .child(
            drop_select("commitment_level")
                .label("Commitment Level")
                .required()
                .selection("NONE", "None")
                .selection("LOW", "Low")
                .selection("MEDIUM", "Medium")
                .selection("HIGH", "High"),
        )
        .child(text_field("socials").label("Socials (optional)"))
        .child(upload("picture").display().accept("image/*"));

    let charter_info = page("Charter Information")
        .child(essay(
            "mission",
            "Mission",
            "A quick blurb of what this organization is all about",
            Requirements::new().min_char(20).max_char(150),
        ))
        .child(essay(
            "purpose",
            "Purpose",
            "This will serve as the official description of the club. Please include a brief \
             statement about what is expected of general members involved in the club.",
            Requirements::new().min_words(100).max_words(400),
        ))
        .child(essay(
            "benefit",
            "Benefit",
            "How will this activity benefit the Stuyvesant community?",
            Requirements::new().min_words(200).max_words(400),
        ))
        .child(essay(
            "appointment_procedures",
            "Appointment Procedures",
            "What are the leadership positions and how are they appointed? Are there any \
             specific protocols members are expected to follow? What is the policy for transfer \
             of leadership between school years? How will leaders be removed if necessary?",
            Requirements::new().min_words(50).max_words(400),
        ))
        .child(essay(
            "uniqueness",
            "Uniqueness",
            "What makes your organization unique?",
            Requirements::new().min_words(75).max_words(400),
        ))
        .child(
            text_field("meeting_schedule")
                .label("Meeting Schedule")
                .rows(4)
                .requirements(Requirements::new().min_char(50).max_char(1000))
                .description(
                    "Something like \"Our meeting schedule varies throughout the year, but we \
                     meet at least once a month and up to 3 times in the Spring.\"",
                ),
        )
        .child(
            check_select("meeting_days")
                .label("Meeting Days")
                .selection("MONDAY", "Monday")
                .selection("TUESDAY", "Tuesday")
                .selection("WEDNESDAY", "Wednesday")
                .selection("THURSDAY", "Thursday")
                .selection("FRIDAY", "Friday")
                .joined(","),
        );

    MultiPageForm::new("Create New Organization", store)
        .page(basic_info)
        .page(charter_info)
        .submit_text("Create Activity")
}

/// Requirement violations of a finished charter, checked against every page
pub fn charter_issues(record: &Record<CharterField>) -> Result<Vec<FieldIssue<CharterField>>> {
    let store = Arc::new(RecordStore::new(record.clone()));
    Ok(charter_form(store).validate_all()?)
}

/// Insert payload for a new organization
///
/// The picture is always `None` here; it is attached after upload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrganization {
    pub creator_id: UserId,
    pub name: String,
    pub url: String,
    pub socials: String,
    pub picture: Option<String>,
    pub mission: String,
    pub purpose: String,
    pub benefit: String,
    pub appointment_procedures: String,
    pub uniqueness: String,
    pub meeting_schedule: String,
    pub meeting_days: String,
    pub keywords: String,
    pub tags: String,
    pub commitment_level: String,
    pub join_instructions: String,
}

fn text_of(record: &Record<CharterField>, field: CharterField) -> String {
    match record.get(field) {
        Some(FieldValue::Set(items)) => items.join(","),
        Some(value) => value.as_text().unwrap_or_default().to_string(),
        None => String::new(),
    }
}

impl NewOrganization {
    pub fn from_record(record: &Record<CharterField>, creator_id: UserId) -> Self {
        let text = |field| text_of(record, field);
        Self {
            creator_id,
            name: text(CharterField::Name),
            url: text(CharterField::Url),
            socials: text(CharterField::Socials),
            picture: None,
            mission: text(CharterField::Mission),
            purpose: text(CharterField::Purpose),
            benefit: text(CharterField::Benefit),
            appointment_procedures: text(CharterField::AppointmentProcedures),
            uniqueness: text(CharterField::Uniqueness),
            meeting_schedule: text(CharterField::MeetingSchedule),
            meeting_days: text(CharterField::MeetingDays),
            keywords: text(CharterField::Keywords),
            tags: text(CharterField::Tags),
            commitment_level: text(CharterField::CommitmentLevel),
            join_instructions: text(CharterField::JoinInstructions),
        }
    }
}
