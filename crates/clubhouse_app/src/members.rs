//! Organization member roster

use crate::model::{Membership, Role, UserId};

/// One active member, flattened for display
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberRow {
    pub membership_id: i64,
    pub user_id: Option<UserId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub picture: Option<String>,
    pub role: Role,
    pub role_name: Option<String>,
    pub is_faculty: bool,
}

impl MemberRow {
    fn from_membership(membership: &Membership) -> Self {
        let user = membership.user.as_ref();
        Self {
            membership_id: membership.id,
            user_id: user.map(|u| u.id),
            first_name: user.map_or_else(|| "First".to_string(), |u| u.first_name.clone()),
            last_name: user.map_or_else(|| "Last".to_string(), |u| u.last_name.clone()),
            email: user.map(|u| u.email.clone()).unwrap_or_default(),
            picture: user.and_then(|u| u.picture.clone()),
            role: membership.role,
            role_name: membership.role_name.clone(),
            is_faculty: user.is_some_and(|u| u.is_faculty),
        }
    }
}

/// Active members sorted by rank, as seen by one viewer
#[derive(Clone, Debug)]
pub struct MemberRoster {
    rows: Vec<MemberRow>,
    viewer_role: Option<Role>,
}

impl MemberRoster {
    /// Build the roster from every membership of the organization
    ///
    /// Inactive memberships are dropped. The viewer's role is looked up
    /// among all memberships.
    pub fn new(memberships: &[Membership], viewer: UserId) -> Self {
        let mut rows: Vec<MemberRow> = memberships
            .iter()
            .filter(|membership| membership.active)
            .map(MemberRow::from_membership)
            .collect();
        rows.sort_by(|a, b| {
            a.role
                .cmp(&b.role)
                .then_with(|| a.last_name.cmp(&b.last_name))
                .then_with(|| a.first_name.cmp(&b.first_name))
        });

        let viewer_role = memberships
            .iter()
            .find(|membership| membership.user.as_ref().is_some_and(|u| u.id == viewer))
            .map(|membership| membership.role);

        Self { rows, viewer_role }
    }

    pub fn rows(&self) -> &[MemberRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Every member email, comma-joined for pasting into a mail client
    pub fn email_list(&self) -> String {
        self.rows
            .iter()
            .filter(|row| !row.email.is_empty())
            .map(|row| row.email.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn viewer_role(&self) -> Option<Role> {
        self.viewer_role
    }

    pub fn viewer_is_creator(&self) -> bool {
        self.viewer_role == Some(Role::Creator)
    }

    pub fn viewer_is_admin(&self) -> bool {
        self.viewer_role == Some(Role::Admin)
    }
}
