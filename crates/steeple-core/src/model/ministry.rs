// ABOUTME: Ministry roster types: public staff bios, volunteer servants, and service schedules.
// ABOUTME: Staff bios sort by their stored `order`; schedules are keyed by service date.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StaffMember {
    pub id: String,
    pub name: String,
    pub role: String,
    pub bio: String,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Display position on the staff page, ascending.
    pub order: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServantRole {
    #[default]
    Worship,
    Ushers,
    Kids,
    Media,
    Prayer,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Servant {
    pub id: String,
    pub name: String,
    pub role: ServantRole,
    pub email: String,
    pub phone: String,
    pub availability: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleAssignments {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worship_leader: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kids: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ushers: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MinistrySchedule {
    pub id: String,
    pub date: String,
    pub event: String,
    pub assignments: ScheduleAssignments,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
