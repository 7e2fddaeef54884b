//! In-memory collaborators for tests
//!
//! Each fake records the operations it served, keeps the last serialized
//! payload it received, and can be told to fail any operation by name.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex as StdMutex, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use clubhouse_core::FileBlob;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::backend::{Backend, ObjectStorage};
use crate::charter::NewOrganization;
use crate::error::BackendError;
use crate::model::{
    Booking, BookingWindow, Meeting, MeetingId, MeetingPayload, OrganizationId, Room, Strike,
    StrikeId, StrikeRequest,
};
use crate::notify::{Notice, Notifier, Severity};

struct FailSwitch(Mutex<HashSet<&'static str>>);

impl FailSwitch {
    fn new() -> Self {
        Self(Mutex::new(HashSet::new()))
    }

    async fn check(&self, operation: &'static str) -> Result<(), BackendError> {
        if self.0.lock().await.contains(operation) {
            return Err(BackendError(format!("{operation} unavailable")));
        }
        Ok(())
    }
}

/// In-memory [`Backend`]
pub struct FakeBackend {
    pub rooms: Mutex<Vec<Room>>,
    /// Returned for every window
    pub bookings: Mutex<Vec<Booking>>,
    pub meetings: Mutex<HashMap<MeetingId, Meeting>>,
    pub organizations: Mutex<HashMap<OrganizationId, NewOrganization>>,
    pub strikes: Mutex<HashMap<OrganizationId, Vec<Strike>>>,
    /// Windows passed to `booked_rooms`, in call order
    pub windows: Mutex<Vec<BookingWindow>>,
    /// Operation names, in call order
    pub calls: Mutex<Vec<&'static str>>,
    pub last_payload: Mutex<Option<serde_json::Value>>,
    pub next_id: AtomicU64,
    failing: FailSwitch,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            rooms: Mutex::new(Vec::new()),
            bookings: Mutex::new(Vec::new()),
            meetings: Mutex::new(HashMap::new()),
            organizations: Mutex::new(HashMap::new()),
            strikes: Mutex::new(HashMap::new()),
            windows: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            last_payload: Mutex::new(None),
            next_id: AtomicU64::new(1),
            failing: FailSwitch::new(),
        }
    }
}

impl FakeBackend {
    pub fn with_rooms(rooms: Vec<Room>) -> Self {
        Self {
            rooms: Mutex::new(rooms),
            ..Self::default()
        }
    }

    /// Make `operation` fail until [`recover`](Self::recover) is called
    pub async fn fail(&self, operation: &'static str) {
        self.failing.0.lock().await.insert(operation);
    }

    pub async fn recover(&self, operation: &'static str) {
        self.failing.0.lock().await.remove(operation);
    }

    pub async fn set_bookings(&self, bookings: Vec<Booking>) {
        *self.bookings.lock().await = bookings;
    }

    pub async fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().await.clone()
    }

    /// Number of times `operation` was called
    pub async fn count(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|call| **call == operation)
            .count()
    }

    pub async fn last_payload(&self) -> Option<serde_json::Value> {
        self.last_payload.lock().await.clone()
    }

    async fn enter(&self, operation: &'static str) -> Result<(), BackendError> {
        self.calls.lock().await.push(operation);
        self.failing.check(operation).await
    }

    async fn record_payload<T: Serialize + Sync>(&self, payload: &T) -> Result<(), BackendError> {
        let value = serde_json::to_value(payload).map_err(|err| BackendError(err.to_string()))?;
        *self.last_payload.lock().await = Some(value);
        Ok(())
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) as i64
    }

    async fn meeting_from(&self, id: MeetingId, payload: &MeetingPayload) -> Meeting {
        let room = match payload.room_id {
            Some(room_id) => self
                .rooms
                .lock()
                .await
                .iter()
                .find(|room| room.id == room_id)
                .cloned(),
            None => None,
        };
        Meeting {
            id,
            title: payload.title.clone(),
            description: payload.description.clone(),
            start_time: payload.start_time,
            end_time: payload.end_time,
            is_public: payload.is_public,
            room,
        }
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn list_rooms(&self) -> Result<Vec<Room>, BackendError> {
        self.enter("list_rooms").await?;
        Ok(self.rooms.lock().await.clone())
    }

    async fn booked_rooms(&self, window: &BookingWindow) -> Result<Vec<Booking>, BackendError> {
        self.enter("booked_rooms").await?;
        self.windows.lock().await.push(*window);
        Ok(self.bookings.lock().await.clone())
    }

    async fn insert_meeting(&self, payload: &MeetingPayload) -> Result<Meeting, BackendError> {
        self.enter("insert_meeting").await?;
        self.record_payload(payload).await?;
        let meeting = self.meeting_from(self.allocate_id(), payload).await;
        self.meetings.lock().await.insert(meeting.id, meeting.clone());
        Ok(meeting)
    }

    async fn update_meeting(
        &self,
        id: MeetingId,
        payload: &MeetingPayload,
    ) -> Result<Meeting, BackendError> {
        self.enter("update_meeting").await?;
        self.record_payload(payload).await?;
        let meeting = self.meeting_from(id, payload).await;
        self.meetings.lock().await.insert(id, meeting.clone());
        Ok(meeting)
    }

    async fn insert_organization(
        &self,
        organization: &NewOrganization,
    ) -> Result<OrganizationId, BackendError> {
        self.enter("insert_organization").await?;
        self.record_payload(organization).await?;
        let id = self.allocate_id();
        self.organizations
            .lock()
            .await
            .insert(id, organization.clone());
        Ok(id)
    }

    async fn set_organization_picture(
        &self,
        id: OrganizationId,
        url: &str,
    ) -> Result<(), BackendError> {
        self.enter("set_organization_picture").await?;
        match self.organizations.lock().await.get_mut(&id) {
            Some(organization) => {
                organization.picture = Some(url.to_string());
                Ok(())
            }
            None => Err(BackendError(format!("organization {id} missing"))),
        }
    }

    async fn delete_organization(&self, id: OrganizationId) -> Result<(), BackendError> {
        self.enter("delete_organization").await?;
        self.organizations.lock().await.remove(&id);
        Ok(())
    }

    async fn list_strikes(&self, organization: OrganizationId) -> Result<Vec<Strike>, BackendError> {
        self.enter("list_strikes").await?;
        Ok(self
            .strikes
            .lock()
            .await
            .get(&organization)
            .cloned()
            .unwrap_or_default())
    }

    async fn issue_strike(&self, request: &StrikeRequest) -> Result<Strike, BackendError> {
        self.enter("issue_strike").await?;
        self.record_payload(request).await?;
        let strike = Strike {
            id: self.allocate_id(),
            reason: request.reason.clone(),
            created_at: Utc::now(),
            organization_name: None,
            issuer: None,
        };
        self.strikes
            .lock()
            .await
            .entry(request.organization_id)
            .or_default()
            .push(strike.clone());
        Ok(strike)
    }

    async fn delete_strike(&self, id: StrikeId) -> Result<(), BackendError> {
        self.enter("delete_strike").await?;
        for strikes in self.strikes.lock().await.values_mut() {
            strikes.retain(|strike| strike.id != id);
        }
        Ok(())
    }
}

/// In-memory [`ObjectStorage`] keyed by `bucket/path`
pub struct FakeStorage {
    pub files: Mutex<HashMap<String, FileBlob>>,
    pub calls: Mutex<Vec<&'static str>>,
    failing: FailSwitch,
}

impl Default for FakeStorage {
    fn default() -> Self {
        Self {
            files: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            failing: FailSwitch::new(),
        }
    }
}

impl FakeStorage {
    pub async fn fail(&self, operation: &'static str) {
        self.failing.0.lock().await.insert(operation);
    }

    pub async fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().await.clone()
    }

    pub async fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.files.lock().await.keys().cloned().collect();
        paths.sort();
        paths
    }

    async fn enter(&self, operation: &'static str) -> Result<(), BackendError> {
        self.calls.lock().await.push(operation);
        self.failing.check(operation).await
    }
}

#[async_trait]
impl ObjectStorage for FakeStorage {
    async fn upload(&self, bucket: &str, path: &str, file: &FileBlob) -> Result<(), BackendError> {
        self.enter("upload").await?;
        self.files
            .lock()
            .await
            .insert(format!("{bucket}/{path}"), file.clone());
        Ok(())
    }

    async fn public_url(&self, bucket: &str, path: &str) -> Result<String, BackendError> {
        self.enter("public_url").await?;
        let key = format!("{bucket}/{path}");
        if !self.files.lock().await.contains_key(&key) {
            return Err(BackendError(format!("{key} not found")));
        }
        Ok(format!("https://storage.test/{key}"))
    }

    async fn remove(&self, bucket: &str, path: &str) -> Result<(), BackendError> {
        self.enter("remove").await?;
        self.files.lock().await.remove(&format!("{bucket}/{path}"));
        Ok(())
    }
}

/// [`Notifier`] that keeps every notice
#[derive(Default)]
pub struct RecordingNotifier {
    notices: StdMutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices().pop()
    }

    pub fn errors(&self) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter(|notice| notice.severity == Severity::Error)
            .map(|notice| notice.message)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        tracing::debug!(severity = ?notice.severity, message = %notice.message, "Notice");
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}
