//! Events, their dashboards and calendar entries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::catalog::{Addon, EventGroup, GuestType, Package};
use super::page::SortOrder;
use super::user::User;

/// Public link slug of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slug {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDto {
    /// UUID
    pub id: String,
    pub title: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:mm`
    pub time: String,
    pub user_dto: User,
    pub event_group_dto: EventGroup,
    #[serde(rename = "_packageDto")]
    pub package_dto: Package,
    #[serde(default)]
    pub guest_type_dto: Option<GuestType>,
    #[serde(default)]
    pub addons: Vec<Addon>,
    #[serde(default)]
    pub notification_emails: Vec<String>,
    pub limit_guests: u32,
    pub escorts_limit: u32,
    #[serde(default)]
    pub slugs: Vec<Slug>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventPayload {
    pub title: String,
    pub date: String,
    pub time: String,
    pub slugs: Vec<Slug>,
    pub user_id: i64,
    pub event_group_id: i64,
    pub package_id: i64,
    pub addon_ids: Vec<i64>,
    pub guest_type_id: i64,
    pub notification_emails: Vec<String>,
    pub limit_guests: u32,
    pub escorts_limit: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventPayload {
    pub id: String,
    pub title: String,
    pub date: String,
    pub time: String,
    pub slugs: Vec<Slug>,
    pub user_id: i64,
    pub event_group_id: i64,
    pub package_id: i64,
    pub addon_ids: Vec<i64>,
    pub guest_type_id: i64,
    pub notification_emails: Vec<String>,
    pub limit_guests: u32,
    pub escorts_limit: u32,
}

/// Event table filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_init: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_end: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRef {
    pub id: i64,
    pub title: String,
}

/// Compact event row used by pickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventListItem {
    pub id: String,
    pub title: String,
    pub date: String,
    pub time: String,
    pub package: PackageRef,
}

/// Attendance summary shown on an event's dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStats {
    pub id: String,
    pub title: String,
    pub date: String,
    pub time: String,
    pub total_guests: u32,
    pub total_assisting: u32,
    pub total_not_assisting: u32,
    pub total_unconfirmed: u32,
    #[serde(rename = "_package")]
    pub package: Package,
    pub event_group: EventGroup,
}

/// One calendar cell entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub date: String,
    pub time: String,
    pub title: String,
}

/// Inclusive calendar window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarRange {
    pub date_begin: NaiveDate,
    pub date_end: NaiveDate,
}
