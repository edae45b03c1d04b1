//! Small helpers shared by the flows and the CLI

/// Password strength score from 0 to 5
///
/// One point each for: at least 8 characters, a lowercase letter, an
/// uppercase letter, a digit, and any other character.
pub fn password_strength(password: &str) -> u8 {
    let checks = [
        password.chars().count() >= 8,
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_ascii_alphanumeric()),
    ];
    let passed = checks.iter().filter(|passed| **passed).count();
    u8::try_from(passed).unwrap_or(u8::MAX)
}

/// Label shown next to the strength meter
pub const fn strength_label(score: u8) -> &'static str {
    match score {
        0..=2 => "Weak",
        3 | 4 => "Medium",
        _ => "Strong",
    }
}

/// Format whole seconds as `MM:SS`
pub fn format_countdown(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Mask a bearer token for display, keeping only its last four characters
pub fn mask_token(token: &str) -> String {
    let visible: String = token
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("****{visible}")
}
