//! Admin resource screens
//!
//! Each screen is a list of records plus a search string and facet filters.
//! The visible list is recomputed from scratch on every call. None of the
//! mutations have a backend yet; they fail with
//! [`Error::NotImplemented`](devclub_core::Error::NotImplemented) and tell the
//! user so.

use crate::notify::{Notice, Notifier};
use crate::routes::Route;
use chrono::NaiveDate;
use devclub_core::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Facet value meaning "no restriction"
pub const ALL: &str = "all";

/// A record shown on an admin screen
pub trait Resource: Clone + Serialize + Send + Sync {
    /// Singular noun used in notices
    const NOUN: &'static str;
    /// Facets this resource can be filtered by
    const FACETS: &'static [&'static str];

    /// Stable identifier
    fn id(&self) -> i64;

    /// Values the search string is matched against
    fn search_fields(&self) -> Vec<&str>;

    /// Value of facet `name`, if the resource has it
    fn facet(&self, name: &str) -> Option<&str>;

    /// Records the screen starts with
    fn seed() -> Vec<Self>;
}

/// Search string plus facet selections
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Filter {
    query: String,
    facets: BTreeMap<String, String>,
}

impl Filter {
    /// Current search string
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Selected value of facet `name`, `None` when it is `all`
    pub fn facet(&self, name: &str) -> Option<&str> {
        self.facets.get(name).map(String::as_str)
    }

    /// Replace the search string
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Select a facet value; `all` or an empty value clears it
    pub fn set_facet(&mut self, name: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case(ALL) {
            self.facets.remove(name);
        } else {
            self.facets.insert(name.to_string(), value.to_string());
        }
    }

    /// Whether `item` passes the search string and every selected facet
    pub fn matches<T: Resource>(&self, item: &T) -> bool {
        let needle = self.query.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || item
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));

        matches_search
            && self.facets.iter().all(|(name, wanted)| {
                item.facet(name)
                    .is_some_and(|value| value.eq_ignore_ascii_case(wanted))
            })
    }
}

/// A searchable, filterable list of `T`
pub struct ResourceScreen<T: Resource> {
    items: Vec<T>,
    filter: Filter,
    notifier: Arc<dyn Notifier>,
}

impl<T: Resource + fmt::Debug> fmt::Debug for ResourceScreen<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceScreen")
            .field("items", &self.items)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

impl<T: Resource> ResourceScreen<T> {
    /// Screen over explicit records
    pub fn new(items: Vec<T>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            items,
            filter: Filter::default(),
            notifier,
        }
    }

    /// Screen over the built-in records
    pub fn seeded(notifier: Arc<dyn Notifier>) -> Self {
        Self::new(T::seed(), notifier)
    }

    /// Every record, unfiltered
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Current filter
    pub const fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Records passing the current filter, in list order
    pub fn visible(&self) -> Vec<&T> {
        self.items
            .iter()
            .filter(|item| self.filter.matches(*item))
            .collect()
    }

    /// Look up a record by id
    pub fn get(&self, id: i64) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Replace the search string
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.filter.set_query(query);
    }

    /// Select a facet value
    ///
    /// # Errors
    ///
    /// Returns a validation error if this screen has no such facet.
    pub fn set_facet(&mut self, name: &str, value: &str) -> Result<()> {
        let name = name.trim().to_lowercase();
        if !T::FACETS.contains(&name.as_str()) {
            return Err(Error::validation(
                name.clone(),
                format!(
                    "Unknown filter '{name}', expected one of: {}",
                    T::FACETS.join(", ")
                ),
            ));
        }
        self.filter.set_facet(&name, value);
        Ok(())
    }

    /// Reset search and facets
    pub fn clear_filters(&mut self) {
        self.filter = Filter::default();
    }

    /// Create a record
    ///
    /// # Errors
    ///
    /// Always fails: there is no backend for this yet.
    pub fn create(&self) -> Result<()> {
        self.unsupported("create")
    }

    /// Update record `id`
    ///
    /// # Errors
    ///
    /// Always fails: there is no backend for this yet.
    pub fn update(&self, id: i64) -> Result<()> {
        debug!(id, noun = T::NOUN, "Update requested");
        self.unsupported("update")
    }

    /// Delete record `id`
    ///
    /// # Errors
    ///
    /// Always fails: there is no backend for this yet.
    pub fn delete(&self, id: i64) -> Result<()> {
        debug!(id, noun = T::NOUN, "Delete requested");
        self.unsupported("delete")
    }

    fn unsupported(&self, action: &str) -> Result<()> {
        let err = Error::not_implemented(format!("{} {action}", T::NOUN));
        self.notifier
            .notify(Notice::info("Not available", err.to_string()));
        Err(err)
    }
}

impl ResourceScreen<Member> {
    /// Approve a pending member
    ///
    /// # Errors
    ///
    /// Always fails: there is no backend for this yet.
    pub fn approve(&self, id: i64) -> Result<()> {
        debug!(id, "Approve requested");
        self.unsupported("approve")
    }

    /// Reject a pending member
    ///
    /// # Errors
    ///
    /// Always fails: there is no backend for this yet.
    pub fn reject(&self, id: i64) -> Result<()> {
        debug!(id, "Reject requested");
        self.unsupported("reject")
    }
}

/// Colour family for a status or priority badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tone {
    /// Good state
    Green,
    /// Waiting or middling
    Yellow,
    /// Bad or urgent
    Red,
    /// Scheduled
    Blue,
    /// Anything else
    Gray,
}

/// Badge colour for a status, priority or similar label
pub fn badge_tone(label: &str) -> Tone {
    match label.to_lowercase().as_str() {
        "active" | "completed" | "published" | "low" => Tone::Green,
        "pending" | "draft" | "medium" => Tone::Yellow,
        "inactive" | "high" | "rejected" => Tone::Red,
        "upcoming" => Tone::Blue,
        _ => Tone::Gray,
    }
}

/// Which admin screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScreenKind {
    /// Club members
    Members,
    /// Club events
    Events,
    /// Announcements
    Announcements,
    /// Blog posts
    Blog,
    /// Registration history
    Registrations,
}

impl ScreenKind {
    /// Every screen
    pub const ALL: [Self; 5] = [
        Self::Members,
        Self::Events,
        Self::Announcements,
        Self::Blog,
        Self::Registrations,
    ];

    /// Route the screen lives at
    pub const fn route(self) -> Route {
        match self {
            Self::Members => Route::AdminMembers,
            Self::Events => Route::AdminEvents,
            Self::Announcements => Route::AdminAnnouncements,
            Self::Blog => Route::AdminBlog,
            Self::Registrations => Route::AdminRegistrationHistory,
        }
    }

    /// Short name used on the command line
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Members => "members",
            Self::Events => "events",
            Self::Announcements => "announcements",
            Self::Blog => "blog",
            Self::Registrations => "registrations",
        }
    }

    /// Facets the screen supports
    pub const fn facets(self) -> &'static [&'static str] {
        match self {
            Self::Members => Member::FACETS,
            Self::Events => EventItem::FACETS,
            Self::Announcements => Announcement::FACETS,
            Self::Blog => BlogPost::FACETS,
            Self::Registrations => RegistrationRecord::FACETS,
        }
    }
}

impl fmt::Display for ScreenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScreenKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted || kind.route().path() == wanted)
            .ok_or_else(|| Error::validation("screen", format!("Unknown screen '{s}'")))
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// A club member
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    /// Identifier
    pub id: i64,
    /// Full name
    pub name: String,
    /// Email address
    pub email: String,
    /// University registration number
    pub registration_number: String,
    /// Department name
    pub department: String,
    /// Study level, e.g. `L3`
    pub level: String,
    /// `Active` or `Inactive`
    pub status: String,
    /// Date joined
    pub join_date: NaiveDate,
}

impl Resource for Member {
    const NOUN: &'static str = "Member";
    const FACETS: &'static [&'static str] = &["status", "level"];

    fn id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str(), self.registration_number.as_str()]
    }

    fn facet(&self, name: &str) -> Option<&str> {
        match name {
            "status" => Some(self.status.as_str()),
            "level" => Some(self.level.as_str()),
            _ => None,
        }
    }

    fn seed() -> Vec<Self> {
        let member = |id, name: &str, email: &str, reg: &str, dept: &str, level: &str, status: &str, joined| Self {
            id,
            name: name.to_string(),
            email: email.to_string(),
            registration_number: reg.to_string(),
            department: dept.to_string(),
            level: level.to_string(),
            status: status.to_string(),
            join_date: joined,
        };
        vec![
            member(1, "John Doe", "john@example.com", "202131000101", "Computer Science", "L3", "Active", date(2023, 1, 15)),
            member(2, "Jane Smith", "jane@example.com", "202031000202", "Engineering", "M1", "Active", date(2023, 2, 1)),
            member(3, "Mike Johnson", "mike@example.com", "202231000303", "Mathematics", "L2", "Inactive", date(2023, 3, 10)),
        ]
    }
}

/// A club event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventItem {
    /// Identifier
    pub id: i64,
    /// Event title
    pub title: String,
    /// Event date
    pub date: NaiveDate,
    /// Venue
    pub location: String,
    /// `Upcoming` or `Completed`
    pub status: String,
    /// Expected or actual attendance
    pub attendees: u32,
    /// Short description
    pub description: String,
}

impl Resource for EventItem {
    const NOUN: &'static str = "Event";
    const FACETS: &'static [&'static str] = &["status"];

    fn id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str()]
    }

    fn facet(&self, name: &str) -> Option<&str> {
        (name == "status").then_some(self.status.as_str())
    }

    fn seed() -> Vec<Self> {
        let event = |id, title: &str, day, location: &str, status: &str, attendees, description: &str| Self {
            id,
            title: title.to_string(),
            date: date(2024, 3, day),
            location: location.to_string(),
            status: status.to_string(),
            attendees,
            description: description.to_string(),
        };
        vec![
            event(1, "Web Development Workshop", 15, "Main Hall", "Upcoming", 45,
                "Learn the basics of web development with HTML, CSS, and JavaScript."),
            event(2, "AI Conference", 20, "Auditorium", "Upcoming", 100,
                "Explore the latest developments in Artificial Intelligence."),
            event(3, "Coding Competition", 25, "Computer Lab", "Completed", 30,
                "Annual coding competition for all skill levels."),
        ]
    }
}

/// An announcement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Announcement {
    /// Identifier
    pub id: i64,
    /// Heading
    pub title: String,
    /// Body text
    pub content: String,
    /// Publication date
    pub date: NaiveDate,
    /// `Active` or `Inactive`
    pub status: String,
    /// `High`, `Medium` or `Low`
    pub priority: String,
}

impl Resource for Announcement {
    const NOUN: &'static str = "Announcement";
    const FACETS: &'static [&'static str] = &["status", "priority"];

    fn id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.content.as_str()]
    }

    fn facet(&self, name: &str) -> Option<&str> {
        match name {
            "status" => Some(self.status.as_str()),
            "priority" => Some(self.priority.as_str()),
            _ => None,
        }
    }

    fn seed() -> Vec<Self> {
        let announcement = |id, title: &str, content: &str, day, status: &str, priority: &str| Self {
            id,
            title: title.to_string(),
            content: content.to_string(),
            date: date(2024, 3, day),
            status: status.to_string(),
            priority: priority.to_string(),
        };
        vec![
            announcement(1, "Important Club Meeting",
                "There will be a club meeting next week to discuss upcoming events.", 10, "Active", "High"),
            announcement(2, "Workshop Registration",
                "Registration for the Web Development workshop is now open.", 12, "Active", "Medium"),
            announcement(3, "Club Elections", "Club elections will be held next month.", 15, "Inactive", "High"),
        ]
    }
}

/// A blog post
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlogPost {
    /// Identifier
    pub id: i64,
    /// Title
    pub title: String,
    /// Topic
    pub category: String,
    /// Author name
    pub author: String,
    /// Publication date
    pub date: NaiveDate,
    /// `published` or `draft`
    pub status: String,
    /// View count
    pub views: u64,
}

impl Resource for BlogPost {
    const NOUN: &'static str = "Blog post";
    const FACETS: &'static [&'static str] = &["category", "status"];

    fn id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str()]
    }

    fn facet(&self, name: &str) -> Option<&str> {
        match name {
            "category" => Some(self.category.as_str()),
            "status" => Some(self.status.as_str()),
            _ => None,
        }
    }

    fn seed() -> Vec<Self> {
        let post = |id, title: &str, category: &str, author: &str, day, status: &str, views| Self {
            id,
            title: title.to_string(),
            category: category.to_string(),
            author: author.to_string(),
            date: date(2024, 3, day),
            status: status.to_string(),
            views,
        };
        vec![
            post(1, "Getting Started with Web Development", "Web Development", "John Doe", 15, "published", 1200),
            post(2, "The Future of AI in Technology", "Artificial Intelligence", "Jane Smith", 12, "draft", 800),
            post(3, "Mobile App Development Best Practices", "Mobile Development", "Mike Johnson", 10, "published", 1500),
            post(4, "Cybersecurity Fundamentals", "Security", "Sarah Wilson", 8, "published", 900),
        ]
    }
}

/// A past registration attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationRecord {
    /// Identifier
    pub id: i64,
    /// Applicant name
    pub name: String,
    /// Applicant email
    pub email: String,
    /// Submission date
    pub date: NaiveDate,
    /// `completed` or `pending`
    pub status: String,
}

impl Resource for RegistrationRecord {
    const NOUN: &'static str = "Registration";
    const FACETS: &'static [&'static str] = &["status"];

    fn id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str()]
    }

    fn facet(&self, name: &str) -> Option<&str> {
        (name == "status").then_some(self.status.as_str())
    }

    fn seed() -> Vec<Self> {
        vec![
            Self {
                id: 1,
                name: "أحمد محمد".to_string(),
                email: "ahmed@example.com".to_string(),
                date: date(2024, 3, 15),
                status: "completed".to_string(),
            },
            Self {
                id: 2,
                name: "سارة أحمد".to_string(),
                email: "sara@example.com".to_string(),
                date: date(2024, 3, 14),
                status: "pending".to_string(),
            },
        ]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::notify::{Level, RecordingNotifier};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    fn members() -> (ResourceScreen<Member>, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        (ResourceScreen::seeded(notifier.clone()), notifier)
    }

    fn ids<T: Resource>(screen: &ResourceScreen<T>) -> Vec<i64> {
        screen.visible().iter().map(|item| item.id()).collect()
    }

    #[test]
    fn test_unfiltered_shows_everything() {
        let (screen, _) = members();
        assert_eq!(ids(&screen), vec![1, 2, 3]);
    }

    #[rstest]
    #[case("jane", vec![2])]
    #[case("JOHN", vec![1, 3])]
    #[case("@example.com", vec![1, 2, 3])]
    #[case("202231", vec![3])]
    #[case("nobody", vec![])]
    fn test_member_search(#[case] query: &str, #[case] expected: Vec<i64>) {
        let (mut screen, _) = members();
        screen.set_query(query);
        assert_eq!(ids(&screen), expected);
    }

    #[test]
    fn test_member_facets_combine() {
        let (mut screen, _) = members();
        screen.set_facet("status", "active").unwrap();
        assert_eq!(ids(&screen), vec![1, 2]);

        screen.set_facet("level", "M1").unwrap();
        assert_eq!(ids(&screen), vec![2]);

        screen.set_facet("status", "all").unwrap();
        screen.set_facet("level", "All").unwrap();
        assert_eq!(ids(&screen), vec![1, 2, 3]);
    }

    #[test]
    fn test_unknown_facet_rejected() {
        let (mut screen, _) = members();
        let err = screen.set_facet("priority", "High").unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn test_mutations_are_not_faked() {
        let (screen, notifier) = members();

        let err = screen.approve(1).unwrap_err();
        assert!(matches!(err, Error::NotImplemented { .. }));
        assert!(screen.delete(2).is_err());

        let notices = notifier.notices();
        assert_eq!(notices.len(), 2);
        assert!(notices.iter().all(|n| n.level == Level::Info));
        assert_eq!(
            notices.first().map(|n| n.description.as_str()),
            Some("Member approve is not supported yet")
        );
    }

    #[test]
    fn test_announcement_priority_facet() {
        let mut screen: ResourceScreen<Announcement> =
            ResourceScreen::seeded(Arc::new(RecordingNotifier::new()));
        screen.set_facet("priority", "high").unwrap();
        assert_eq!(ids(&screen), vec![1, 3]);
        screen.set_query("elections");
        assert_eq!(ids(&screen), vec![3]);
    }

    #[test]
    fn test_blog_search_title_only() {
        let mut screen: ResourceScreen<BlogPost> =
            ResourceScreen::seeded(Arc::new(RecordingNotifier::new()));
        screen.set_query("Jane");
        assert!(screen.visible().is_empty());
        screen.set_query("development");
        assert_eq!(ids(&screen), vec![1, 3]);
    }

    #[test]
    fn test_registration_status_facet() {
        let mut screen: ResourceScreen<RegistrationRecord> =
            ResourceScreen::seeded(Arc::new(RecordingNotifier::new()));
        screen.set_facet("status", "pending").unwrap();
        assert_eq!(ids(&screen), vec![2]);
    }

    #[rstest]
    #[case("Active", Tone::Green)]
    #[case("pending", Tone::Yellow)]
    #[case("High", Tone::Red)]
    #[case("Upcoming", Tone::Blue)]
    #[case("whatever", Tone::Gray)]
    fn test_badge_tone(#[case] label: &str, #[case] tone: Tone) {
        assert_eq!(badge_tone(label), tone);
    }

    #[rstest]
    #[case("members", ScreenKind::Members)]
    #[case("Blog", ScreenKind::Blog)]
    #[case("/admin/registration-history", ScreenKind::Registrations)]
    fn test_screen_kind_parse(#[case] input: &str, #[case] kind: ScreenKind) {
        assert_eq!(input.parse::<ScreenKind>().unwrap(), kind);
    }

    proptest! {
        #[test]
        fn prop_filter_is_idempotent(query in "[a-zA-Z@. ]{0,8}", status in prop::sample::select(vec!["all", "Active", "Inactive", "x"])) {
            let (mut screen, _) = members();
            screen.set_query(query);
            screen.set_facet("status", status).unwrap();

            let first: Vec<Member> = screen.visible().into_iter().cloned().collect();
            let mut refiltered = ResourceScreen::new(first.clone(), Arc::new(RecordingNotifier::new()));
            refiltered.set_query(screen.filter().query().to_string());
            refiltered.set_facet("status", status).unwrap();
            let second: Vec<Member> = refiltered.visible().into_iter().cloned().collect();

            prop_assert_eq!(first, second);
        }
    }
}
