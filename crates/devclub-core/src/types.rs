//! Domain types exchanged with the `DevClub` API

use crate::{Error, Result};
use chrono::{Datelike, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A commune, with its daira and wilaya
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    /// Row id
    pub id: i64,
    /// Commune name (Arabic script)
    pub commune_name: String,
    /// Commune name transliterated
    #[serde(default)]
    pub commune_name_ascii: String,
    /// Daira name
    #[serde(default)]
    pub daira_name: String,
    /// Daira name transliterated
    #[serde(default)]
    pub daira_name_ascii: String,
    /// Wilaya code, e.g. `"16"`
    pub wilaya_code: String,
    /// Wilaya name
    pub wilaya_name: String,
    /// Wilaya name transliterated
    #[serde(default)]
    pub wilaya_name_ascii: String,
}

impl City {
    /// Value the join form submits for this commune
    ///
    /// The transliterated name, or the native one when no transliteration
    /// exists.
    pub fn commune_value(&self) -> &str {
        if self.commune_name_ascii.is_empty() {
            &self.commune_name
        } else {
            &self.commune_name_ascii
        }
    }
}

/// A faculty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faculty {
    /// Row id
    pub id: i64,
    /// Display name
    pub faculty_name: String,
    /// Creation time
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    /// Last update
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

/// A department, owned by one faculty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Row id
    pub id: i64,
    /// Display name
    pub department_name: String,
    /// Owning faculty
    pub faculty_id: i64,
    /// Creation time
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    /// Last update
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

/// Member registration fields, held in memory until submitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct RegistrationDraft {
    /// Student registration number
    #[validate(length(min = 1, message = "Registration number is required"))]
    pub registration_number: String,

    /// Registration year
    #[validate(length(min = 1, message = "Registration year is required"))]
    pub registration_year: String,

    /// Full name
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,

    /// Email, also the OTP recipient
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    /// Account password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// Wilaya code
    #[validate(length(min = 1, message = "Wilaya is required"))]
    pub wilaya_code: String,

    /// Commune name within the wilaya
    #[validate(length(min = 1, message = "Commune is required"))]
    pub commune_name: String,

    /// Selected faculty
    #[validate(required(message = "Faculty is required"))]
    pub faculty_id: Option<i64>,

    /// Selected department, filtered by faculty
    #[validate(required(message = "Department is required"))]
    pub department_id: Option<i64>,

    /// Study level, e.g. `L3`
    #[validate(length(min = 1, message = "Level is required"))]
    pub level: String,
}

/// Field order used to report the first missing field
const DRAFT_FIELDS: [&str; 10] = [
    "registration_number",
    "registration_year",
    "full_name",
    "email",
    "password",
    "wilaya_code",
    "commune_name",
    "faculty_id",
    "department_id",
    "level",
];

impl Default for RegistrationDraft {
    fn default() -> Self {
        Self {
            registration_number: String::new(),
            registration_year: Utc::now().year().to_string(),
            full_name: String::new(),
            email: String::new(),
            password: String::new(),
            wilaya_code: String::new(),
            commune_name: String::new(),
            faculty_id: None,
            department_id: None,
            level: String::new(),
        }
    }
}

impl RegistrationDraft {
    /// Check that every required field is present
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for the first missing field, in form order.
    pub fn check_required(&self) -> Result<()> {
        let Err(errors) = self.validate() else {
            return Ok(());
        };

        let failing = errors.field_errors();
        let field = DRAFT_FIELDS
            .iter()
            .copied()
            .find(|field| failing.contains_key(*field))
            .unwrap_or("form");
        let message = failing
            .get(field)
            .and_then(|errs| errs.first())
            .and_then(|err| err.message.as_ref())
            .map_or_else(|| format!("{field} is required"), ToString::to_string);

        Err(Error::validation(field, message))
    }
}

/// Server acknowledgement of a registration; no token is issued yet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisteredUser {
    /// Row id
    pub id: i64,
    /// Email the code was sent to
    pub email: String,
    /// Full name
    pub full_name: String,
    /// False until the code is verified
    pub is_active: bool,
}

/// Body of `POST /auth/verify-otp`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpVerification {
    /// Email the code was sent to
    pub email: String,
    /// The code as typed
    pub otp_code: String,
}

/// Token issued by login or verification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Bearer token; may be absent on a malformed success
    #[serde(default)]
    pub access_token: Option<String>,
    /// Token type, normally `bearer`
    #[serde(default)]
    pub token_type: Option<String>,
}

impl TokenResponse {
    /// The token, if present and non-empty
    pub fn token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|token| !token.is_empty())
    }
}

/// Signed-in administrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminProfile {
    /// Row id
    pub id: i64,
    /// Login email
    pub email: String,
    /// Display name
    pub full_name: String,
    /// Super-admin flag
    #[serde(default)]
    pub is_super_admin: bool,
}

/// One admin login record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginHistoryEntry {
    /// Row id
    pub id: i64,
    /// Admin who logged in
    pub admin_id: i64,
    /// Login timestamp (server local, no offset)
    pub login_time: NaiveDateTime,
    /// Client address
    #[serde(default)]
    pub ip_address: Option<String>,
    /// Client user agent
    #[serde(default)]
    pub user_agent: Option<String>,
}

/// Dashboard aggregates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Analytics {
    /// Event counters
    pub events: EventStats,
    /// Announcement counters
    pub announcements: AnnouncementStats,
    /// Club member counters
    pub students: StudentStats,
    /// Registered user counters
    pub users: UserStats,
}

/// Event counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventStats {
    /// All events
    pub total: u64,
    /// Events still ahead
    pub upcoming: u64,
    /// Finished events
    pub completed: u64,
    /// Average attendance
    pub avg_participants: u64,
}

/// Announcement counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnnouncementStats {
    /// All announcements
    pub total: u64,
    /// Active and unexpired
    pub active: u64,
    /// High priority
    pub high_priority: u64,
}

/// Club member counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StudentStats {
    /// All members
    pub total: u64,
    /// Active memberships
    pub active: u64,
    /// Members with the organizer role
    pub organizers: u64,
    /// Joined in the last 30 days
    pub new_members: u64,
}

/// Registered user counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserStats {
    /// All users
    pub total: u64,
    /// Verified users
    pub active: u64,
    /// Registered in the last 30 days
    pub new_users: u64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn complete_draft() -> RegistrationDraft {
        RegistrationDraft {
            registration_number: "R100".to_string(),
            registration_year: "2024".to_string(),
            full_name: "Amina Benali".to_string(),
            email: "a@b.com".to_string(),
            password: "Aa1!aaaa".to_string(),
            wilaya_code: "16".to_string(),
            commune_name: "Bab Ezzouar".to_string(),
            faculty_id: Some(1),
            department_id: Some(3),
            level: "L3".to_string(),
        }
    }

    #[test]
    fn test_commune_value_prefers_transliteration() {
        let mut city: City = serde_json::from_str(
            r#"{"id": 2, "commune_name": "وهران", "commune_name_ascii": "Oran",
                "wilaya_code": "31", "wilaya_name": "Oran"}"#,
        )
        .unwrap();
        assert_eq!(city.commune_value(), "Oran");

        city.commune_name_ascii.clear();
        assert_eq!(city.commune_value(), "وهران");
    }

    #[test]
    fn test_complete_draft_passes() {
        assert!(complete_draft().check_required().is_ok());
    }

    #[test]
    fn test_missing_field_reported_in_form_order() {
        let mut draft = complete_draft();
        draft.email.clear();
        draft.level.clear();

        match draft.check_required() {
            Err(Error::Validation { field, message }) => {
                assert_eq!(field, "email");
                assert_eq!(message, "Email is required");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_faculty_reported() {
        let mut draft = complete_draft();
        draft.faculty_id = None;

        match draft.check_required() {
            Err(Error::Validation { field, .. }) => assert_eq!(field, "faculty_id"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_default_draft_uses_current_year() {
        let draft = RegistrationDraft::default();
        assert_eq!(draft.registration_year, Utc::now().year().to_string());
        assert!(draft.check_required().is_err());
    }

    #[test]
    fn test_draft_serializes_ids_as_numbers() {
        let value = serde_json::to_value(complete_draft()).unwrap();
        assert_eq!(value["faculty_id"], 1);
        assert_eq!(value["department_id"], 3);
        assert_eq!(value["registration_number"], "R100");
    }

    #[test]
    fn test_token_response_ignores_empty_token() {
        let response: TokenResponse =
            serde_json::from_str(r#"{"access_token": "", "token_type": "bearer"}"#).unwrap();
        assert!(response.token().is_none());

        let response: TokenResponse = serde_json::from_str(r#"{"token_type": "bearer"}"#).unwrap();
        assert!(response.token().is_none());

        let response: TokenResponse =
            serde_json::from_str(r#"{"access_token": "abc", "token_type": "bearer"}"#).unwrap();
        assert_eq!(response.token(), Some("abc"));
    }

    #[test]
    fn test_analytics_camel_case_fields() {
        let json = r#"{
            "events": {"total": 5, "upcoming": 2, "completed": 3, "avgParticipants": 0},
            "announcements": {"total": 4, "active": 2, "highPriority": 1},
            "students": {"total": 40, "active": 35, "organizers": 3, "newMembers": 6},
            "users": {"total": 50, "active": 44, "newUsers": 9}
        }"#;

        let analytics: Analytics = serde_json::from_str(json).unwrap();

        assert_eq!(analytics.events.upcoming, 2);
        assert_eq!(analytics.announcements.high_priority, 1);
        assert_eq!(analytics.students.new_members, 6);
        assert_eq!(analytics.users.new_users, 9);
    }

    #[test]
    fn test_login_history_entry_parses_naive_timestamp() {
        let json = r#"{
            "id": 7, "admin_id": 1,
            "login_time": "2024-03-15T10:20:30.123456",
            "ip_address": "10.0.0.2", "user_agent": null
        }"#;

        let entry: LoginHistoryEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, 7);
        assert_eq!(entry.ip_address.as_deref(), Some("10.0.0.2"));
        assert!(entry.user_agent.is_none());
    }
}
