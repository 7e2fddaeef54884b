//! End-to-end workflow tests for clubhouse_app
//!
//! Each scenario drives a workflow against the in-memory fakes and checks
//! both the remote calls issued and the notices shown.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use clubhouse_core::{FileBlob, RecordStore};
use tracing_subscriber::EnvFilter;

use crate::fake::{FakeBackend, FakeStorage, RecordingNotifier};
use crate::prelude::*;
use crate::{
    AvailabilityUpdate, Booking, Compensation, Meeting, Room, SagaStep, Severity, ValidationError,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn rooms() -> Vec<Room> {
    vec![
        Room::new(1, "101", 1),
        Room::new(2, "202", 2),
        Room::new(3, "303", 3),
    ]
}

fn utc(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, h, m, 0).unwrap()
}

fn new_year() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

async fn open_new_meeting(backend: &FakeBackend, notifier: &RecordingNotifier) -> MeetingEditor {
    let mut editor = MeetingEditor::new(&AppConfig::default(), new_year()).unwrap();
    editor.load_rooms(backend, notifier).await.unwrap();
    editor.refresh_availability(backend, notifier).await.unwrap();
    editor
}

// ============================================================================
// Meetings
// ============================================================================

#[tokio::test]
async fn test_end_before_start_is_rejected_locally() {
    init_tracing();
    let backend = FakeBackend::with_rooms(rooms());
    let notifier = RecordingNotifier::default();
    let mut editor = MeetingEditor::new(&AppConfig::default(), new_year()).unwrap();

    editor.set_title("Club Sync");
    editor.set_start(Some(utc(15, 45)));
    editor.set_end(Some(utc(14, 45)));

    let saved = Arc::new(Mutex::new(false));
    let flag = saved.clone();
    let err = editor
        .save(&backend, &notifier, 1, move |_, _| *flag.lock().unwrap() = true)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::Validation(ValidationError::EndBeforeStart)
    ));
    assert!(backend.calls().await.is_empty());
    assert!(!*saved.lock().unwrap());
    assert!(editor.is_open());
    assert_eq!(
        notifier.errors(),
        vec!["Meeting end time cannot be before meeting start time.".to_string()]
    );
}

#[tokio::test]
async fn test_insert_with_available_room() {
    init_tracing();
    let backend = FakeBackend::with_rooms(rooms());
    let notifier = RecordingNotifier::default();
    let mut editor = open_new_meeting(&backend, &notifier).await;

    editor.set_title("Club Sync");
    editor.set_end(Some(utc(16, 45)));
    editor.refresh_availability(&backend, &notifier).await.unwrap();
    assert!(editor.select_room(Some(2)));

    let seen = Arc::new(Mutex::new(None));
    let sink = seen.clone();
    let meeting = editor
        .save(&backend, &notifier, 7, move |meeting, is_insert| {
            *sink.lock().unwrap() = Some((meeting.clone(), is_insert));
        })
        .await
        .unwrap();

    let payload = backend.last_payload().await.unwrap();
    assert_eq!(payload["room_id"], 2);
    assert_eq!(payload["organization_id"], 7);
    assert_eq!(payload["title"], "Club Sync");
    assert_eq!(backend.count("insert_meeting").await, 1);

    let (saved, is_insert) = seen.lock().unwrap().clone().unwrap();
    assert!(is_insert);
    assert_eq!(saved, meeting);
    assert_eq!(saved.room, Some(Room::new(2, "202", 2)));
    assert!(!editor.is_open());
    assert_eq!(notifier.last().unwrap().message, "Meeting created!");
}

#[tokio::test]
async fn test_update_keeps_own_room_and_omits_organization() {
    init_tracing();
    let backend = FakeBackend::with_rooms(rooms());
    backend
        .set_bookings(vec![Booking {
            room_id: 1,
            meeting_id: 99,
        }])
        .await;
    let notifier = RecordingNotifier::default();
    let existing = Meeting {
        id: 99,
        title: "Practice".into(),
        description: String::new(),
        start_time: utc(15, 0),
        end_time: utc(16, 0),
        is_public: true,
        room: Some(Room::new(1, "101", 1)),
    };

    let mut editor = MeetingEditor::edit(&AppConfig::default(), &existing);
    editor.load_rooms(&backend, &notifier).await.unwrap();
    let update = editor.refresh_availability(&backend, &notifier).await.unwrap();

    assert_eq!(
        update,
        AvailabilityUpdate::Updated {
            available: 3,
            cleared_selection: false,
        }
    );
    assert_eq!(editor.room_id(), Some(1));

    let mut flags = Vec::new();
    editor
        .save(&backend, &notifier, 7, |_, is_insert| flags.push(is_insert))
        .await
        .unwrap();

    assert_eq!(flags, vec![false]);
    assert_eq!(backend.count("update_meeting").await, 1);
    assert!(backend.last_payload().await.unwrap().get("organization_id").is_none());
    assert_eq!(notifier.last().unwrap().message, "Meeting updated!");
}

#[tokio::test]
async fn test_widening_window_clears_booked_selection() {
    init_tracing();
    let backend = FakeBackend::with_rooms(rooms());
    let notifier = RecordingNotifier::default();
    let mut editor = open_new_meeting(&backend, &notifier).await;
    assert!(editor.select_room(Some(2)));

    // Another meeting holds room 2 later in the afternoon.
    backend
        .set_bookings(vec![Booking {
            room_id: 2,
            meeting_id: 5,
        }])
        .await;
    editor.set_end(Some(utc(18, 0)));
    let update = editor.refresh_availability(&backend, &notifier).await.unwrap();

    assert_eq!(
        update,
        AvailabilityUpdate::Updated {
            available: 2,
            cleared_selection: true,
        }
    );
    assert_eq!(editor.room_id(), None);
    let offered: Vec<_> = editor.available_rooms().iter().map(|room| room.id).collect();
    assert_eq!(offered, vec![1, 3]);
    assert_eq!(
        backend.windows.lock().await.last().map(|window| window.end),
        Some(utc(18, 0))
    );
}

#[tokio::test]
async fn test_save_rechecks_stale_room_and_rejects_booked_one() {
    init_tracing();
    let backend = FakeBackend::with_rooms(rooms());
    let notifier = RecordingNotifier::default();
    let mut editor = open_new_meeting(&backend, &notifier).await;
    editor.set_title("Club Sync");
    assert!(editor.select_room(Some(2)));

    backend
        .set_bookings(vec![Booking {
            room_id: 2,
            meeting_id: 5,
        }])
        .await;
    editor.set_end(Some(utc(18, 0)));
    assert!(editor.availability_stale());

    let mut called = false;
    let err = editor
        .save(&backend, &notifier, 7, |_, _| called = true)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::Validation(ValidationError::RoomUnavailable)
    ));
    assert!(!called);
    assert_eq!(editor.room_id(), None);
    assert!(editor.is_open());
    assert_eq!(backend.count("booked_rooms").await, 2);
    assert_eq!(backend.count("insert_meeting").await, 0);
    assert_eq!(
        notifier.errors(),
        vec!["The selected room is no longer available. Pick another room.".to_string()]
    );
}

#[tokio::test]
async fn test_save_rechecks_stale_room_and_keeps_free_one() {
    init_tracing();
    let backend = FakeBackend::with_rooms(rooms());
    let notifier = RecordingNotifier::default();
    let mut editor = open_new_meeting(&backend, &notifier).await;
    editor.set_title("Club Sync");
    assert!(editor.select_room(Some(3)));
    editor.set_end(Some(utc(18, 0)));

    editor.save(&backend, &notifier, 7, |_, _| {}).await.unwrap();

    assert_eq!(backend.count("booked_rooms").await, 2);
    assert_eq!(backend.last_payload().await.unwrap()["room_id"], 3);
    assert!(!editor.availability_stale());
}

#[tokio::test]
async fn test_missing_bound_keeps_stale_availability() {
    init_tracing();
    let backend = FakeBackend::with_rooms(rooms());
    let notifier = RecordingNotifier::default();
    let mut editor = open_new_meeting(&backend, &notifier).await;
    assert!(editor.select_room(Some(3)));
    assert!(!editor.availability_stale());

    editor.set_end(None);
    let update = editor.refresh_availability(&backend, &notifier).await.unwrap();

    assert_eq!(update, AvailabilityUpdate::Skipped);
    assert!(editor.availability_stale());
    assert_eq!(editor.available_rooms().len(), 3);
    assert_eq!(editor.room_id(), Some(3));
    assert_eq!(backend.count("booked_rooms").await, 1);
}

#[tokio::test]
async fn test_room_fetch_failure_leaves_list_empty() {
    init_tracing();
    let backend = FakeBackend::with_rooms(rooms());
    backend.fail("list_rooms").await;
    let notifier = RecordingNotifier::default();
    let mut editor = MeetingEditor::new(&AppConfig::default(), new_year()).unwrap();

    let err = editor.load_rooms(&backend, &notifier).await.unwrap_err();

    assert!(matches!(err, AppError::Remote { operation: "fetch rooms", .. }));
    assert!(editor.all_rooms().is_empty());
    assert_eq!(
        notifier.errors(),
        vec!["Error fetching rooms. Contact it@stuysu.org for support.".to_string()]
    );
}

#[tokio::test]
async fn test_booking_lookup_failure_keeps_previous_availability() {
    init_tracing();
    let backend = FakeBackend::with_rooms(rooms());
    let notifier = RecordingNotifier::default();
    let mut editor = open_new_meeting(&backend, &notifier).await;
    assert!(editor.select_room(Some(1)));

    backend.fail("booked_rooms").await;
    editor.set_end(Some(utc(17, 0)));
    assert!(editor.refresh_availability(&backend, &notifier).await.is_err());

    assert_eq!(editor.available_rooms().len(), 3);
    assert_eq!(editor.room_id(), Some(1));
    assert_eq!(
        notifier.last().unwrap().message,
        "Error fetching booked rooms. Contact it@stuysu.org for support."
    );
}

#[tokio::test]
async fn test_save_failure_changes_nothing() {
    init_tracing();
    let backend = FakeBackend::with_rooms(rooms());
    let notifier = RecordingNotifier::default();
    let mut editor = open_new_meeting(&backend, &notifier).await;
    editor.set_title("Club Sync");
    backend.fail("insert_meeting").await;

    let mut called = false;
    let result = editor.save(&backend, &notifier, 7, |_, _| called = true).await;

    assert!(result.is_err());
    assert!(!called);
    assert!(editor.is_open());
    assert!(editor.is_insert());
    assert_eq!(
        notifier.last().unwrap().message,
        "Error creating meeting. Contact it@stuysu.org for support."
    );
}

// ============================================================================
// Organization creation
// ============================================================================

fn finished_charter(with_picture: bool) -> clubhouse_core::Record<CharterField> {
    let record = empty_charter()
        .with(CharterField::Name, "Chess")
        .with(CharterField::Url, "chess")
        .with(CharterField::CommitmentLevel, "LOW");
    if with_picture {
        record.with(
            CharterField::Picture,
            FileBlob::new("logo.png", "image/png", vec![0u8; 16]),
        )
    } else {
        record
    }
}

#[tokio::test]
async fn test_charter_form_submit_creates_organization() {
    init_tracing();
    let backend = FakeBackend::default();
    let storage = FakeStorage::default();
    let notifier = RecordingNotifier::default();
    let config = AppConfig::default();

    let store = Arc::new(RecordStore::new(empty_charter()));
    let mut form = charter_form(store.clone());
    let rendered = form.render().unwrap();
    rendered.control(CharterField::Name).unwrap().input("Chess").unwrap();
    rendered.control(CharterField::Url).unwrap().input("chess").unwrap();
    let rendered = form.render().unwrap();
    rendered.control(CharterField::CommitmentLevel).unwrap().select("LOW").unwrap();
    assert!(form.next());

    let record = form.submit_with(|record| record).unwrap();
    let created = CreateOrganization::new(&backend, &storage, &notifier, &config)
        .run(&record, 42, Utc::now())
        .await
        .unwrap();

    assert_eq!(created.redirect, "/chess");
    assert_eq!(created.picture_url, None);
    assert!(storage.calls().await.is_empty());
    let payload = backend.last_payload().await.unwrap();
    assert_eq!(payload["creator_id"], 42);
    assert!(payload["picture"].is_null());
    assert_eq!(notifier.last().unwrap().message, "Organization created!");
}

#[tokio::test]
async fn test_incomplete_charter_is_never_inserted() {
    init_tracing();
    let backend = FakeBackend::default();
    let storage = FakeStorage::default();
    let notifier = RecordingNotifier::default();
    let config = AppConfig::default();

    let report = CreateOrganization::new(&backend, &storage, &notifier, &config)
        .execute(&empty_charter(), 42, Utc::now())
        .await;

    assert!(report.completed.is_empty());
    assert_eq!(report.failed, None);
    assert!(report.compensations.is_empty());
    assert!(matches!(
        report.outcome,
        Err(AppError::Validation(ValidationError::InvalidCharter { field: "name" }))
    ));
    assert_eq!(backend.count("insert_organization").await, 0);
    assert!(storage.calls().await.is_empty());
    assert_eq!(
        notifier.errors(),
        vec!["Charter field `name` is missing or invalid.".to_string()]
    );
}

#[tokio::test]
async fn test_picture_is_uploaded_and_attached() {
    init_tracing();
    let backend = FakeBackend::default();
    let storage = FakeStorage::default();
    let notifier = RecordingNotifier::default();
    let config = AppConfig::default();
    let now = utc(12, 0);

    let report = CreateOrganization::new(&backend, &storage, &notifier, &config)
        .execute(&finished_charter(true), 42, now)
        .await;

    assert_eq!(
        report.completed,
        vec![
            SagaStep::InsertOrganization,
            SagaStep::UploadPicture,
            SagaStep::ResolvePublicUrl,
            SagaStep::PatchPictureUrl,
        ]
    );
    let created = report.into_result().unwrap();
    let path = format!(
        "public-files/org-pictures/{}/{}-logo.png",
        created.organization_id,
        now.timestamp_millis()
    );
    assert_eq!(storage.paths().await, vec![path.clone()]);
    assert_eq!(
        created.picture_url.as_deref(),
        Some(format!("https://storage.test/{path}").as_str())
    );
    let stored = backend.organizations.lock().await;
    assert_eq!(stored[&created.organization_id].picture, created.picture_url);
}

#[tokio::test]
async fn test_insert_failure_needs_no_compensation() {
    init_tracing();
    let backend = FakeBackend::default();
    backend.fail("insert_organization").await;
    let storage = FakeStorage::default();
    let notifier = RecordingNotifier::default();
    let config = AppConfig::default();

    let report = CreateOrganization::new(&backend, &storage, &notifier, &config)
        .execute(&finished_charter(true), 42, Utc::now())
        .await;

    assert_eq!(report.failed, Some(SagaStep::InsertOrganization));
    assert!(report.compensations.is_empty());
    assert!(matches!(report.outcome, Err(AppError::Remote { .. })));
    assert!(storage.calls().await.is_empty());
    assert_eq!(
        notifier.errors(),
        vec!["Error creating organization. Contact it@stuysu.org for support.".to_string()]
    );
}

#[tokio::test]
async fn test_upload_failure_deletes_organization() {
    init_tracing();
    let backend = FakeBackend::default();
    let storage = FakeStorage::default();
    storage.fail("upload").await;
    let notifier = RecordingNotifier::default();
    let config = AppConfig::default();

    let report = CreateOrganization::new(&backend, &storage, &notifier, &config)
        .execute(&finished_charter(true), 42, Utc::now())
        .await;

    assert_eq!(report.failed, Some(SagaStep::UploadPicture));
    assert_eq!(report.compensations.len(), 1);
    assert!(matches!(
        report.compensations[0].compensation,
        Compensation::DeleteOrganization(_)
    ));
    assert!(report.compensations[0].succeeded);
    assert!(backend.organizations.lock().await.is_empty());
    assert!(matches!(
        report.outcome,
        Err(AppError::PartialFailure {
            step: SagaStep::UploadPicture,
            compensated: true,
            ..
        })
    ));
    assert_eq!(
        notifier.last().unwrap().message,
        "Error uploading image to storage. Contact it@stuysu.org for support."
    );
}

#[tokio::test]
async fn test_patch_failure_unwinds_newest_first() {
    init_tracing();
    let backend = FakeBackend::default();
    backend.fail("set_organization_picture").await;
    let storage = FakeStorage::default();
    let notifier = RecordingNotifier::default();
    let config = AppConfig::default();

    let report = CreateOrganization::new(&backend, &storage, &notifier, &config)
        .execute(&finished_charter(true), 42, Utc::now())
        .await;

    assert_eq!(report.failed, Some(SagaStep::PatchPictureUrl));
    let undone: Vec<_> = report
        .compensations
        .iter()
        .map(|outcome| matches!(outcome.compensation, Compensation::RemovePicture { .. }))
        .collect();
    assert_eq!(undone, vec![true, false]);
    assert!(storage.paths().await.is_empty());
    assert!(backend.organizations.lock().await.is_empty());
    assert_eq!(
        notifier.last().unwrap().message,
        "Error uploading image to organization. Contact it@stuysu.org for support."
    );
}

#[tokio::test]
async fn test_failed_compensation_is_retried_then_reported() {
    init_tracing();
    let backend = FakeBackend::default();
    backend.fail("delete_organization").await;
    let storage = FakeStorage::default();
    storage.fail("public_url").await;
    let notifier = RecordingNotifier::default();
    let config = AppConfig {
        compensation_attempts: 3,
        ..AppConfig::default()
    };

    let report = CreateOrganization::new(&backend, &storage, &notifier, &config)
        .execute(&finished_charter(true), 42, Utc::now())
        .await;

    assert_eq!(report.failed, Some(SagaStep::ResolvePublicUrl));
    let delete = report
        .compensations
        .iter()
        .find(|outcome| matches!(outcome.compensation, Compensation::DeleteOrganization(_)))
        .unwrap();
    assert_eq!(delete.attempts, 3);
    assert!(!delete.succeeded);
    assert_eq!(backend.count("delete_organization").await, 3);
    assert!(matches!(
        report.outcome,
        Err(AppError::PartialFailure {
            compensated: false,
            ..
        })
    ));
    assert_eq!(backend.organizations.lock().await.len(), 1);
}

// ============================================================================
// Strikes
// ============================================================================

#[tokio::test]
async fn test_issue_and_delete_strike() {
    init_tracing();
    let backend = FakeBackend::default();
    let notifier = RecordingNotifier::default();
    let mut board = StrikeBoard::new(&AppConfig::default());

    board.select_organization(3, "Chess", &backend, &notifier).await.unwrap();
    assert!(board.strikes().is_empty());

    board.set_reason("Missed charter deadline");
    let strike = board.issue(&backend, &notifier).await.unwrap();
    assert_eq!(board.reason(), "");
    assert_eq!(board.strikes(), &[strike.clone()]);
    assert_eq!(backend.last_payload().await.unwrap()["organization_id"], 3);

    board.delete(strike.id, &backend, &notifier).await.unwrap();
    assert!(board.strikes().is_empty());
    assert_eq!(notifier.last().unwrap().message, "Strike deleted!");
}

#[tokio::test]
async fn test_failed_delete_keeps_strike() {
    init_tracing();
    let backend = FakeBackend::default();
    let notifier = RecordingNotifier::default();
    let mut board = StrikeBoard::new(&AppConfig::default());
    board.select_organization(3, "Chess", &backend, &notifier).await.unwrap();
    board.set_reason("Inactive");
    let id = board.issue(&backend, &notifier).await.unwrap().id;

    backend.fail("delete_strike").await;
    assert!(board.delete(id, &backend, &notifier).await.is_err());

    assert_eq!(board.strikes().len(), 1);
    let last = notifier.last().unwrap();
    assert_eq!(last.severity, Severity::Error);
    assert_eq!(
        last.message,
        "Error deleting strike. Contact it@stuysu.org for support."
    );
}

#[tokio::test]
async fn test_strike_needs_organization_and_reason() {
    init_tracing();
    let backend = FakeBackend::default();
    let notifier = RecordingNotifier::default();
    let mut board = StrikeBoard::new(&AppConfig::default());

    board.set_reason("Something");
    assert!(matches!(
        board.issue(&backend, &notifier).await,
        Err(AppError::Validation(ValidationError::NoOrganization))
    ));

    board.select_organization(3, "Chess", &backend, &notifier).await.unwrap();
    assert_eq!(board.reason(), "");
    assert!(matches!(
        board.issue(&backend, &notifier).await,
        Err(AppError::Validation(ValidationError::MissingReason))
    ));
    assert_eq!(backend.count("issue_strike").await, 0);
}

#[tokio::test]
async fn test_switching_organization_replaces_list() {
    init_tracing();
    let backend = FakeBackend::default();
    let notifier = RecordingNotifier::default();
    let mut board = StrikeBoard::new(&AppConfig::default());
    board.select_organization(3, "Chess", &backend, &notifier).await.unwrap();
    board.set_reason("Late");
    board.issue(&backend, &notifier).await.unwrap();

    backend.fail("list_strikes").await;
    assert!(board
        .select_organization(4, "Robotics", &backend, &notifier)
        .await
        .is_err());

    assert!(board.strikes().is_empty());
    assert_eq!(board.organization_name(), Some("Robotics"));
    assert_eq!(
        notifier.last().unwrap().message,
        "Failed to load strikes. Contact it@stuysu.org for support."
    );
}
