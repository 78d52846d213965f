//! User-profile record, partial updates, and the demo fixture.
//!
//! The persisted shape is camelCase JSON. Records written by older builds
//! may lack optional fields; those deserialize to their defaults, and every
//! notification flag that is absent defaults to enabled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Demo avatar shown for the seeded profile.
pub const DEFAULT_AVATAR_URL: &str = "https://lh3.googleusercontent.com/aida-public/AB6AXuAD5kGYELEbQZ_gA1bZ66c0xfnW41Hatxev5Wrv5AXYrRVzzqiYeBDwDvBP-oAylwd_Um2SpwSigXeyX9pfgdXVbneSr_EYtLdbvKCJHCCHblKr5g6kEGVcXqt7JUo89zuw_X8I6jFae_QLXOYCK5Spr63Fu9P-z2vXuPOS39eONGCUCcp-WXuzu62NqKGPbWjfienr6pXwAidc_kC9_6XBM1T9GIa5-9ux4TvY4vTlEOltfEW2xQVf3ZiEb4XLpKkAtHip5FK-W0Ig";

/// 2022-02-14T00:00:00Z, the seeded profile's join date.
const DEFAULT_JOIN_DATE_SECS: i64 = 1_644_796_800;

fn enabled() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Notification opt-ins. All three flags are always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferences {
    #[serde(default = "enabled")]
    pub research_updates: bool,
    #[serde(default = "enabled")]
    pub weekly_digest: bool,
    #[serde(default = "enabled")]
    pub new_feedback: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            research_updates: true,
            weekly_digest: true,
            new_feedback: true,
        }
    }
}

/// The mutable account record a user can view and edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub avatar_url: String,
    pub join_date: Timestamp,
    #[serde(default)]
    pub notifications: NotificationPreferences,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl Profile {
    /// Apply `patch` over this record, replacing only the named fields, and
    /// stamp `updated_at` with `now`.
    pub fn apply(&self, patch: &ProfilePatch, now: Timestamp) -> Profile {
        let mut next = self.clone();
        if let Some(name) = &patch.name {
            next.name = name.clone();
        }
        if let Some(email) = &patch.email {
            next.email = email.clone();
        }
        if let Some(role) = &patch.role {
            next.role = role.clone();
        }
        if let Some(bio) = &patch.bio {
            next.bio = bio.clone();
        }
        if let Some(avatar_url) = &patch.avatar_url {
            next.avatar_url = avatar_url.clone();
        }
        if let Some(notifications) = patch.notifications {
            next.notifications = notifications;
        }
        next.updated_at = Some(now);
        next
    }
}

/// The seeded demo profile used when nothing is stored.
pub fn default_profile() -> Profile {
    Profile {
        id: "user_001".into(),
        name: "Sophia Carter".into(),
        email: "sophia.carter@example.com".into(),
        role: "Client".into(),
        bio: "Product strategist passionate about co-creating with consumers.".into(),
        avatar_url: DEFAULT_AVATAR_URL.into(),
        join_date: DateTime::<Utc>::from_timestamp(DEFAULT_JOIN_DATE_SECS, 0).unwrap_or_default(),
        notifications: NotificationPreferences::default(),
        updated_at: None,
    }
}

// ---------------------------------------------------------------------------
// Partial updates
// ---------------------------------------------------------------------------

/// A partial profile. `None` fields are left untouched when applied.
///
/// `id` and `join_date` are not editable and therefore absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 120, message = "Name must be between 1 and 120 characters"))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "Email address is invalid"))]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000, message = "Bio must be at most 1000 characters"))]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notifications: Option<NotificationPreferences>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Layer `other` on top of `self`; fields set in `other` win.
    pub fn overlay(self, other: ProfilePatch) -> ProfilePatch {
        ProfilePatch {
            name: other.name.or(self.name),
            email: other.email.or(self.email),
            role: other.role.or(self.role),
            bio: other.bio.or(self.bio),
            avatar_url: other.avatar_url.or(self.avatar_url),
            notifications: other.notifications.or(self.notifications),
        }
    }

    /// Run field validation, flattening failures into a [`CoreError`].
    pub fn ensure_valid(&self) -> Result<(), CoreError> {
        self.validate().map_err(CoreError::from)
    }
}

impl From<&Profile> for ProfilePatch {
    /// A patch naming every editable field of `profile`.
    fn from(profile: &Profile) -> Self {
        Self {
            name: Some(profile.name.clone()),
            email: Some(profile.email.clone()),
            role: Some(profile.role.clone()),
            bio: Some(profile.bio.clone()),
            avatar_url: Some(profile.avatar_url.clone()),
            notifications: Some(profile.notifications),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
