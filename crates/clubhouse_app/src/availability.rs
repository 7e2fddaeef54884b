//! Room-availability filter
//!
//! Given every room and the bookings overlapping a window, a room is
//! available unless some *other* meeting holds it. The meeting under edit
//! never blocks its own room.

use std::collections::HashSet;

use crate::model::{Booking, MeetingId, Room, RoomId};

/// Rooms held during the window by meetings other than `editing`
pub fn booked_room_ids(bookings: &[Booking], editing: Option<MeetingId>) -> HashSet<RoomId> {
    bookings
        .iter()
        .filter(|booking| Some(booking.meeting_id) != editing)
        .map(|booking| booking.room_id)
        .collect()
}

/// `rooms` minus those booked by other meetings, order preserved
pub fn available_rooms(rooms: &[Room], bookings: &[Booking], editing: Option<MeetingId>) -> Vec<Room> {
    let booked = booked_room_ids(bookings, editing);
    rooms
        .iter()
        .filter(|room| !booked.contains(&room.id))
        .cloned()
        .collect()
}
