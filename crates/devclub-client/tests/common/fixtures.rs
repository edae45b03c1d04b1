//! Test fixtures and sample data

use devclub_core::types::RegistrationDraft;
use serde_json::{Value, json};

/// Token the mock backend hands out
pub const ISSUED_TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.admin.signature";

/// A complete registration draft
pub fn complete_draft() -> RegistrationDraft {
    RegistrationDraft {
        registration_number: "R100".to_string(),
        registration_year: "2024".to_string(),
        full_name: "Amina Benali".to_string(),
        email: "a@b.com".to_string(),
        password: "Aa1!aaaa".to_string(),
        wilaya_code: "16".to_string(),
        commune_name: "Alger Centre".to_string(),
        faculty_id: Some(1),
        department_id: Some(3),
        level: "L2".to_string(),
    }
}

/// Body returned by a successful registration
pub fn registered_user() -> Value {
    json!({"id": 7, "email": "a@b.com", "full_name": "Amina Benali", "is_active": false})
}

/// Body returned by a successful verification or login
pub fn token_response(token: &str) -> Value {
    json!({"access_token": token, "token_type": "bearer"})
}

/// Admin profile body
pub fn admin_profile() -> Value {
    json!({"id": 1, "email": "admin@devclub.dz", "full_name": "Club Admin", "is_super_admin": true})
}

/// Login history body, oldest first
pub fn login_history() -> Value {
    json!([
        {"id": 1, "admin_id": 1, "login_time": "2024-03-01T08:30:00", "ip_address": "10.0.0.2", "user_agent": "curl"},
        {"id": 2, "admin_id": 1, "login_time": "2024-03-09T17:05:12.123456", "ip_address": null, "user_agent": null}
    ])
}

/// Analytics body
pub fn analytics() -> Value {
    json!({
        "events": {"total": 12, "upcoming": 3, "completed": 9, "avgParticipants": 0},
        "announcements": {"total": 8, "active": 5, "highPriority": 2},
        "students": {"total": 140, "active": 120, "organizers": 6, "newMembers": 14},
        "users": {"total": 150, "active": 131, "newUsers": 9}
    })
}

/// Two communes of two wilayas
pub fn cities() -> Value {
    json!([
        {"id": 1, "commune_name": "Alger Centre", "commune_name_ascii": "Alger Centre", "daira_name": "Sidi M'Hamed",
         "daira_name_ascii": "Sidi M'Hamed", "wilaya_code": "16", "wilaya_name": "Alger", "wilaya_name_ascii": "Alger"},
        {"id": 2, "commune_name": "Oran", "commune_name_ascii": "Oran", "daira_name": "Oran",
         "daira_name_ascii": "Oran", "wilaya_code": "31", "wilaya_name": "Oran", "wilaya_name_ascii": "Oran"}
    ])
}

/// Faculty list
pub fn faculties() -> Value {
    json!([
        {"id": 1, "faculty_name": "Faculty of Computer Science"},
        {"id": 2, "faculty_name": "Faculty of Mathematics"}
    ])
}

/// Departments of faculty 1
pub fn departments() -> Value {
    json!([
        {"id": 3, "department_name": "Software Engineering", "faculty_id": 1},
        {"id": 4, "department_name": "Networks", "faculty_id": 1}
    ])
}
