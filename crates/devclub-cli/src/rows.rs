//! Table columns for the admin screens

use devclub_client::screens::{
    Announcement, BlogPost, EventItem, Member, RegistrationRecord, badge_tone,
};

/// A record printable as one table row
pub trait Row {
    /// Column headings
    const HEADERS: &'static [&'static str];

    /// Cell values, in heading order
    fn cells(&self) -> Vec<String>;
}

/// Status text with its badge colour, e.g. `Active (green)`
fn badge(label: &str) -> String {
    let tone = format!("{:?}", badge_tone(label)).to_lowercase();
    format!("{label} ({tone})")
}

impl Row for Member {
    const HEADERS: &'static [&'static str] = &[
        "ID", "Name", "Email", "Reg. number", "Department", "Level", "Status", "Joined",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.email.clone(),
            self.registration_number.clone(),
            self.department.clone(),
            self.level.clone(),
            badge(&self.status),
            self.join_date.to_string(),
        ]
    }
}

impl Row for EventItem {
    const HEADERS: &'static [&'static str] =
        &["ID", "Title", "Date", "Location", "Attendees", "Status"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            self.date.to_string(),
            self.location.clone(),
            self.attendees.to_string(),
            badge(&self.status),
        ]
    }
}

impl Row for Announcement {
    const HEADERS: &'static [&'static str] = &["ID", "Title", "Date", "Priority", "Status"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            self.date.to_string(),
            badge(&self.priority),
            badge(&self.status),
        ]
    }
}

impl Row for BlogPost {
    const HEADERS: &'static [&'static str] =
        &["ID", "Title", "Category", "Author", "Date", "Views", "Status"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            self.category.clone(),
            self.author.clone(),
            self.date.to_string(),
            self.views.to_string(),
            badge(&self.status),
        ]
    }
}

impl Row for RegistrationRecord {
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Email", "Date", "Status"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.email.clone(),
            self.date.to_string(),
            badge(&self.status),
        ]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use devclub_client::screens::Resource;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cells_match_headers() {
        for member in Member::seed() {
            assert_eq!(member.cells().len(), Member::HEADERS.len());
        }
        for post in BlogPost::seed() {
            assert_eq!(post.cells().len(), BlogPost::HEADERS.len());
        }
    }

    #[test]
    fn test_badge_includes_tone() {
        assert_eq!(badge("Active"), "Active (green)");
        assert_eq!(badge("High"), "High (red)");
    }
}
