//! Records exchanged with the backend

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type RoomId = i64;
pub type MeetingId = i64;
pub type OrganizationId = i64;
pub type UserId = i64;
pub type StrikeId = i64;

/// A bookable room
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub floor: i32,
}

impl Room {
    pub fn new(id: RoomId, name: impl Into<String>, floor: i32) -> Self {
        Self {
            id,
            name: name.into(),
            floor,
        }
    }
}

/// A room held by a meeting during some window
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub room_id: RoomId,
    pub meeting_id: MeetingId,
}

/// Candidate meeting time window
///
/// What counts as overlapping this window is up to the backend's lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// A persisted meeting with its joined room
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: MeetingId,
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_public: bool,
    pub room: Option<Room>,
}

/// Columns written by a meeting insert or update
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingPayload {
    /// Set on insert only
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub organization_id: Option<OrganizationId>,
    pub title: String,
    pub description: String,
    /// `None` for a virtual meeting
    pub room_id: Option<RoomId>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_public: bool,
}

/// Body of the strike-issuing server function
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrikeRequest {
    pub organization_id: OrganizationId,
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrikeIssuer {
    pub first_name: String,
    pub last_name: String,
    pub picture: Option<String>,
}

/// A strike against an organization
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strike {
    pub id: StrikeId,
    pub reason: String,
    pub created_at: DateTime<Utc>,
    pub organization_name: Option<String>,
    pub issuer: Option<StrikeIssuer>,
}

/// Membership role, highest rank first
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Creator,
    Admin,
    Advisor,
    Member,
}

impl Default for Role {
    fn default() -> Self {
        Role::Member
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberUser {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub picture: Option<String>,
    #[serde(default)]
    pub is_faculty: bool,
}

/// A user's membership in an organization
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub id: i64,
    #[serde(default)]
    pub role: Role,
    pub role_name: Option<String>,
    pub active: bool,
    pub user: Option<MemberUser>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_update_payload_omits_organization() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 15, 45, 0).unwrap();
        let payload = MeetingPayload {
            organization_id: None,
            title: "Club Sync".into(),
            description: String::new(),
            room_id: None,
            start_time: at,
            end_time: at,
            is_public: true,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("organization_id").is_none());
        assert!(json["room_id"].is_null());
    }

    #[test]
    fn test_role_wire_names_and_rank() {
        let role: Role = serde_json::from_str("\"ADVISOR\"").unwrap();
        assert_eq!(role, Role::Advisor);
        assert!(Role::Creator < Role::Admin);
        assert!(Role::Advisor < Role::Member);
    }
}
