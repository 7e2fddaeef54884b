//! Clubhouse Application Services
//!
//! The organization-facing workflows of the activities platform, written
//! against abstract remote collaborators:
//!
//! - [`Backend`]: the relational store and its server functions
//! - [`ObjectStorage`]: file storage for uploaded pictures
//! - [`Notifier`]: transient user-facing notices
//!
//! # Workflows
//!
//! - **Meetings**: [`MeetingEditor`] drives the upsert dialog, keeping the
//!   room list filtered by [`available_rooms`] for the chosen time window.
//! - **Charters**: [`charter_form`] builds the two-page organization form and
//!   [`CreateOrganization`] persists it as a compensating saga.
//! - **Strikes**: [`StrikeBoard`] lists, issues and deletes strikes.
//! - **Members**: [`MemberRoster`] sorts active members and builds the
//!   mailing list.
//!
//! Identity (current user, current organization) is always passed in
//! explicitly.
//!
//! # Example
//!
//! ```ignore
//! use clubhouse_app::prelude::*;
//!
//! let config = AppConfig::load("clubhouse.toml".as_ref())?;
//! let mut editor = MeetingEditor::new(&config, today)?;
//! editor.load_rooms(&backend, &notifier).await?;
//! editor.set_title("Club Sync");
//! editor.refresh_availability(&backend, &notifier).await?;
//! editor.save(&backend, &notifier, org_id, |meeting, is_insert| { /* ... */ }).await?;
//! ```

mod availability;
mod backend;
mod charter;
mod config;
mod error;
pub mod fake;
mod meetings;
mod members;
mod model;
mod notify;
mod saga;
mod strikes;

#[cfg(test)]
mod tests;

pub use availability::{available_rooms, booked_room_ids};
pub use backend::{Backend, ObjectStorage};
pub use charter::{charter_form, charter_issues, empty_charter, CharterField, NewOrganization};
pub use config::AppConfig;
pub use error::{AppError, BackendError, Result, ValidationError};
pub use meetings::{AvailabilityUpdate, MeetingEditor};
pub use members::{MemberRoster, MemberRow};
pub use model::{
    Booking, BookingWindow, MeetingId, Meeting, MeetingPayload, MemberUser, Membership,
    OrganizationId, Role, Room, RoomId, Strike, StrikeId, StrikeIssuer, StrikeRequest, UserId,
};
pub use notify::{support_message, Notice, Notifier, Severity};
pub use saga::{
    Compensation, CompensationOutcome, CreateOrganization, Created, SagaReport, SagaStep,
};
pub use strikes::StrikeBoard;

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::backend::{Backend, ObjectStorage};
    pub use crate::charter::{charter_form, empty_charter, CharterField};
    pub use crate::config::AppConfig;
    pub use crate::error::{AppError, Result};
    pub use crate::meetings::MeetingEditor;
    pub use crate::notify::{Notice, Notifier};
    pub use crate::saga::CreateOrganization;
    pub use crate::strikes::StrikeBoard;
}
