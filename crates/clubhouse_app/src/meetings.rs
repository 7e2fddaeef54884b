//! Meeting upsert dialog
//!
//! [`MeetingEditor`] holds the dialog state for creating or editing one
//! meeting. Room availability is recomputed on demand: after the rooms load
//! and after every change to the time window, the caller awaits
//! [`MeetingEditor::refresh_availability`].

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::availability::{available_rooms, booked_room_ids};
use crate::backend::Backend;
use crate::config::AppConfig;
use crate::error::{AppError, Result, ValidationError};
use crate::model::{BookingWindow, Meeting, MeetingId, MeetingPayload, OrganizationId, Room, RoomId};
use crate::notify::{support_message, Notifier};

/// What a call to [`MeetingEditor::refresh_availability`] did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AvailabilityUpdate {
    /// Start or end is unset; the previous availability was kept
    Skipped,
    Updated {
        available: usize,
        /// The selected room was booked by another meeting and got unset
        cleared_selection: bool,
    },
}

/// State of the meeting upsert dialog
#[derive(Clone, Debug)]
pub struct MeetingEditor {
    id: Option<MeetingId>,
    title: String,
    description: String,
    room_id: Option<RoomId>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    is_public: bool,
    all_rooms: Vec<Room>,
    available_rooms: Vec<Room>,
    availability_stale: bool,
    open: bool,
    support_email: String,
}

fn at(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(time))
}

impl MeetingEditor {
    /// Dialog for a new meeting on `today` at the configured default time
    pub fn new(config: &AppConfig, today: NaiveDate) -> Result<Self> {
        let time = config
            .meeting_time()
            .map_err(|err| AppError::Config(format!("{err:#}")))?;
        let default = at(today, time);
        Ok(Self {
            id: None,
            title: String::new(),
            description: String::new(),
            room_id: None,
            start: Some(default),
            end: Some(default),
            is_public: config.default_meeting_public,
            all_rooms: Vec::new(),
            available_rooms: Vec::new(),
            availability_stale: true,
            open: true,
            support_email: config.support_email.clone(),
        })
    }

    /// Dialog prefilled from an existing meeting
    pub fn edit(config: &AppConfig, meeting: &Meeting) -> Self {
        Self {
            id: Some(meeting.id),
            title: meeting.title.clone(),
            description: meeting.description.clone(),
            room_id: meeting.room.as_ref().map(|room| room.id),
            start: Some(meeting.start_time),
            end: Some(meeting.end_time),
            is_public: meeting.is_public,
            all_rooms: Vec::new(),
            available_rooms: Vec::new(),
            availability_stale: true,
            open: true,
            support_email: config.support_email.clone(),
        }
    }

    pub fn id(&self) -> Option<MeetingId> {
        self.id
    }

    pub fn is_insert(&self) -> bool {
        self.id.is_none()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Selected room, `None` for virtual
    pub fn room_id(&self) -> Option<RoomId> {
        self.room_id
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    pub fn is_public(&self) -> bool {
        self.is_public
    }

    pub fn all_rooms(&self) -> &[Room] {
        &self.all_rooms
    }

    /// Rooms offered for selection
    pub fn available_rooms(&self) -> &[Room] {
        &self.available_rooms
    }

    /// Whether [`available_rooms`](Self::available_rooms) predates the
    /// current window
    pub fn availability_stale(&self) -> bool {
        self.availability_stale
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// The current window, if both bounds are set
    pub fn window(&self) -> Option<BookingWindow> {
        Some(BookingWindow {
            start: self.start?,
            end: self.end?,
        })
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_public(&mut self, is_public: bool) {
        self.is_public = is_public;
    }

    pub fn set_start(&mut self, start: Option<DateTime<Utc>>) {
        self.start = start;
        self.availability_stale = true;
    }

    pub fn set_end(&mut self, end: Option<DateTime<Utc>>) {
        self.end = end;
        self.availability_stale = true;
    }

    /// Move the meeting to `date`, keeping both times of day
    ///
    /// An unset end becomes the new start.
    pub fn set_day(&mut self, date: NaiveDate) {
        let start_time = self.start.map(|start| start.time()).unwrap_or(NaiveTime::MIN);
        let start = at(date, start_time);
        self.start = Some(start);
        self.end = Some(match self.end {
            Some(end) => at(date, end.time()),
            None => start,
        });
        self.availability_stale = true;
    }

    /// Select a room, or `None` for a virtual meeting
    ///
    /// Returns `false` and leaves the selection alone if the room is not
    /// currently available.
    pub fn select_room(&mut self, room: Option<RoomId>) -> bool {
        match room {
            Some(id) if !self.available_rooms.iter().any(|r| r.id == id) => false,
            _ => {
                self.room_id = room;
                true
            }
        }
    }

    /// Fetch every room
    ///
    /// On failure the room list stays empty and an error notice is shown.
    pub async fn load_rooms(&mut self, backend: &dyn Backend, notifier: &dyn Notifier) -> Result<()> {
        match backend.list_rooms().await {
            Ok(rooms) => {
                tracing::debug!(count = rooms.len(), "Loaded rooms");
                self.all_rooms = rooms;
                self.availability_stale = true;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to fetch rooms");
                notifier.error(&support_message("Error fetching rooms", &self.support_email));
                Err(AppError::remote("fetch rooms", err))
            }
        }
    }

    /// Recompute the rooms bookable in the current window
    ///
    /// With a bound unset nothing is fetched and the last-known availability
    /// stays in place, marked stale. A selected room booked by another
    /// meeting is unset.
    pub async fn refresh_availability(
        &mut self,
        backend: &dyn Backend,
        notifier: &dyn Notifier,
    ) -> Result<AvailabilityUpdate> {
        let Some(window) = self.window() else {
            self.availability_stale = true;
            return Ok(AvailabilityUpdate::Skipped);
        };

        let bookings = match backend.booked_rooms(&window).await {
            Ok(bookings) => bookings,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to fetch booked rooms");
                notifier.error(&support_message("Error fetching booked rooms", &self.support_email));
                return Err(AppError::remote("fetch booked rooms", err));
            }
        };

        let booked = booked_room_ids(&bookings, self.id);
        let cleared_selection = match self.room_id {
            Some(room) if booked.contains(&room) => {
                self.room_id = None;
                true
            }
            _ => false,
        };
        self.available_rooms = available_rooms(&self.all_rooms, &bookings, self.id);
        self.availability_stale = false;

        tracing::debug!(
            available = self.available_rooms.len(),
            booked = booked.len(),
            cleared_selection,
            "Recomputed room availability"
        );

        Ok(AvailabilityUpdate::Updated {
            available: self.available_rooms.len(),
            cleared_selection,
        })
    }

    /// Check the dialog can be saved, returning the window
    pub fn validate(&self) -> std::result::Result<BookingWindow, ValidationError> {
        if self.title.is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        let start = self.start.ok_or(ValidationError::MissingStart)?;
        let end = self.end.ok_or(ValidationError::MissingEnd)?;
        if end < start {
            return Err(ValidationError::EndBeforeStart);
        }
        Ok(BookingWindow { start, end })
    }

    fn payload(&self, window: BookingWindow, organization: Option<OrganizationId>) -> MeetingPayload {
        MeetingPayload {
            organization_id: organization,
            title: self.title.clone(),
            description: self.description.clone(),
            room_id: self.room_id,
            start_time: window.start,
            end_time: window.end,
            is_public: self.is_public,
        }
    }

    /// Validate, then insert or update the meeting
    ///
    /// Invalid input is rejected without a remote call. A selected room is
    /// re-checked first when availability is stale; if another meeting now
    /// holds it the selection is cleared and the save is rejected. On success
    /// `on_save` receives the persisted meeting and whether it was an
    /// insert, and the dialog closes. On failure nothing local changes.
    pub async fn save<F>(
        &mut self,
        backend: &dyn Backend,
        notifier: &dyn Notifier,
        organization: OrganizationId,
        on_save: F,
    ) -> Result<Meeting>
    where
        F: FnOnce(&Meeting, bool) + Send,
    {
        let window = match self.validate() {
            Ok(window) => window,
            Err(err) => {
                notifier.error(&err.to_string());
                return Err(err.into());
            }
        };

        // A room picked before the window last changed may since have been booked.
        if self.availability_stale && self.room_id.is_some() {
            let update = self.refresh_availability(backend, notifier).await?;
            if let AvailabilityUpdate::Updated {
                cleared_selection: true,
                ..
            } = update
            {
                let err = ValidationError::RoomUnavailable;
                notifier.error(&err.to_string());
                return Err(err.into());
            }
        }

        let is_insert = self.is_insert();
        let saved = match self.id {
            Some(id) => backend.update_meeting(id, &self.payload(window, None)).await,
            None => {
                backend
                    .insert_meeting(&self.payload(window, Some(organization)))
                    .await
            }
        };

        let meeting = match saved {
            Ok(meeting) => meeting,
            Err(err) => {
                tracing::warn!(error = %err, is_insert, "Failed to save meeting");
                notifier.error(&support_message("Error creating meeting", &self.support_email));
                return Err(AppError::remote(
                    if is_insert { "create meeting" } else { "update meeting" },
                    err,
                ));
            }
        };

        tracing::info!(meeting = meeting.id, is_insert, "Saved meeting");
        notifier.success(if is_insert {
            "Meeting created!"
        } else {
            "Meeting updated!"
        });
        on_save(&meeting, is_insert);
        self.close();
        Ok(meeting)
    }
}
