// ABOUTME: User accounts with client-trusted role strings and the academy progress sub-record.
// ABOUTME: Roles gate features by plain comparison; nothing here enforces authorization.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Role string attached to a user. Used purely for feature gating.
///
/// Roles outside the known set are kept verbatim in `Other`, so a record
/// carrying one still decodes and is written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Pastor,
    Staff,
    Worship,
    #[default]
    Member,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::Pastor => "pastor",
            Role::Staff => "staff",
            Role::Worship => "worship",
            Role::Member => "member",
            Role::Other(role) => role,
        }
    }

    /// Roles allowed into the admin panel.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::Pastor | Role::Staff)
    }

    /// Roles allowed to purge the community chat.
    pub fn can_moderate_chat(&self) -> bool {
        matches!(self, Role::Admin | Role::Pastor)
    }
}

impl From<String> for Role {
    fn from(role: String) -> Self {
        match role.as_str() {
            "admin" => Role::Admin,
            "pastor" => Role::Pastor,
            "staff" => Role::Staff,
            "worship" => Role::Worship,
            "member" => Role::Member,
            _ => Role::Other(role),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(role) => role,
            known => known.as_str().to_string(),
        }
    }
}

/// Serving team a member belongs to. Unknown team names survive in `Other`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MinistryTeam {
    Worship,
    Ushers,
    Kids,
    Prayer,
    Media,
    #[default]
    None,
    Other(String),
}

impl From<String> for MinistryTeam {
    fn from(team: String) -> Self {
        match team.as_str() {
            "worship" => MinistryTeam::Worship,
            "ushers" => MinistryTeam::Ushers,
            "kids" => MinistryTeam::Kids,
            "prayer" => MinistryTeam::Prayer,
            "media" => MinistryTeam::Media,
            "none" => MinistryTeam::None,
            _ => MinistryTeam::Other(team),
        }
    }
}

impl From<MinistryTeam> for String {
    fn from(team: MinistryTeam) -> Self {
        let name = match team {
            MinistryTeam::Worship => "worship",
            MinistryTeam::Ushers => "ushers",
            MinistryTeam::Kids => "kids",
            MinistryTeam::Prayer => "prayer",
            MinistryTeam::Media => "media",
            MinistryTeam::None => "none",
            MinistryTeam::Other(team) => return team,
        };
        name.to_string()
    }
}

/// A student's academy journey, stored inline on the user record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProgress {
    pub completed_lessons: Vec<String>,
    pub enrolled_courses: Vec<String>,
    pub certificates: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProgress {
    /// Mark a lesson complete. Returns false if it already was.
    pub fn complete_lesson(&mut self, lesson_id: &str) -> bool {
        push_unique(&mut self.completed_lessons, lesson_id)
    }

    /// Enroll in a course. Returns false if already enrolled.
    pub fn enroll(&mut self, course_id: &str) -> bool {
        push_unique(&mut self.enrolled_courses, course_id)
    }

    /// Award a course certificate. Returns false if already awarded.
    pub fn award_certificate(&mut self, course_id: &str) -> bool {
        push_unique(&mut self.certificates, course_id)
    }

    pub fn has_completed(&self, lesson_id: &str) -> bool {
        self.completed_lessons.iter().any(|id| id == lesson_id)
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) -> bool {
    if list.iter().any(|v| v == value) {
        return false;
    }
    list.push(value.to_string());
    true
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub is_opted_in_chat: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enrolled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joined_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ministry_team: Option<MinistryTeam>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<UserProgress>,
    /// Stored fields without a typed counterpart, written back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Progress sub-record, created empty on first use.
    pub fn progress_mut(&mut self) -> &mut UserProgress {
        self.progress.get_or_insert_with(UserProgress::default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_gates() {
        assert!(Role::Admin.is_staff());
        assert!(Role::Staff.is_staff());
        assert!(!Role::Worship.is_staff());
        assert!(Role::Pastor.can_moderate_chat());
        assert!(!Role::Staff.can_moderate_chat());
    }

    #[test]
    fn progress_is_created_on_first_use_and_deduplicates() {
        let mut user = User {
            id: "u1".to_string(),
            ..User::default()
        };
        assert!(user.progress.is_none());

        assert!(user.progress_mut().complete_lesson("l1"));
        assert!(!user.progress_mut().complete_lesson("l1"));
        assert_eq!(user.progress.as_ref().unwrap().completed_lessons, vec!["l1"]);
    }

    #[test]
    fn user_reads_stored_camel_case() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": "u1",
            "email": "ruth@example.org",
            "name": "Ruth",
            "role": "pastor",
            "isOptedInChat": true,
            "progress": {"completedLessons": ["l1"]}
        }))
        .unwrap();
        assert_eq!(user.role, Role::Pastor);
        assert!(user.is_opted_in_chat);
        let progress = user.progress.unwrap();
        assert!(progress.has_completed("l1"));
        assert!(progress.enrolled_courses.is_empty());
    }

    #[test]
    fn unknown_role_and_team_survive_a_rewrite() {
        let stored = serde_json::json!({
            "id": "u1",
            "role": "elder",
            "ministryTeam": "greeters",
            "isOptedInChat": false,
            "favoriteHymn": "Amazing Grace"
        });
        let user: User = serde_json::from_value(stored.clone()).unwrap();
        assert_eq!(user.role, Role::Other("elder".to_string()));
        assert!(!user.role.is_staff());
        assert_eq!(user.role.as_str(), "elder");

        let written = serde_json::to_value(&user).unwrap();
        assert_eq!(written["role"], "elder");
        assert_eq!(written["ministryTeam"], "greeters");
        assert_eq!(written["favoriteHymn"], "Amazing Grace");
    }
}
