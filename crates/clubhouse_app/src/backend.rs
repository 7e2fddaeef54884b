//! Remote collaborators
//!
//! Everything the workflows need from the outside world goes through these
//! two traits. Implementations decide transport and overlap semantics;
//! [`crate::fake`] provides in-memory versions for tests.

use async_trait::async_trait;
use clubhouse_core::FileBlob;

use crate::charter::NewOrganization;
use crate::error::BackendError;
use crate::model::{
    Booking, BookingWindow, Meeting, MeetingId, MeetingPayload, OrganizationId, Room, Strike,
    StrikeId, StrikeRequest,
};

/// Relational store and server functions
#[async_trait]
pub trait Backend: Send + Sync {
    /// Every room, in display order
    async fn list_rooms(&self) -> Result<Vec<Room>, BackendError>;

    /// Bookings overlapping `window`
    async fn booked_rooms(&self, window: &BookingWindow) -> Result<Vec<Booking>, BackendError>;

    async fn insert_meeting(&self, payload: &MeetingPayload) -> Result<Meeting, BackendError>;

    async fn update_meeting(
        &self,
        id: MeetingId,
        payload: &MeetingPayload,
    ) -> Result<Meeting, BackendError>;

    /// Insert an organization and return its id
    async fn insert_organization(
        &self,
        organization: &NewOrganization,
    ) -> Result<OrganizationId, BackendError>;

    async fn set_organization_picture(
        &self,
        id: OrganizationId,
        url: &str,
    ) -> Result<(), BackendError>;

    async fn delete_organization(&self, id: OrganizationId) -> Result<(), BackendError>;

    async fn list_strikes(&self, organization: OrganizationId) -> Result<Vec<Strike>, BackendError>;

    /// Invoke the strike-issuing server function
    async fn issue_strike(&self, request: &StrikeRequest) -> Result<Strike, BackendError>;

    async fn delete_strike(&self, id: StrikeId) -> Result<(), BackendError>;
}

/// File storage for uploaded pictures
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn upload(&self, bucket: &str, path: &str, file: &FileBlob) -> Result<(), BackendError>;

    /// Public URL of an uploaded object
    async fn public_url(&self, bucket: &str, path: &str) -> Result<String, BackendError>;

    async fn remove(&self, bucket: &str, path: &str) -> Result<(), BackendError>;
}
