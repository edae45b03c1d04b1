//! Static content of the public pages

use crate::routes::Route;
use serde::Serialize;
use std::fmt;

/// One entry in a section: a card, a stat, an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    /// Heading of the entry
    pub title: String,
    /// Body text
    pub body: String,
    /// Secondary line such as a date or author
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<String>,
}

impl Item {
    fn new(title: &str, body: &str) -> Self {
        Self {
            title: title.to_string(),
            body: body.to_string(),
            meta: None,
        }
    }

    fn with_meta(title: &str, body: &str, meta: &str) -> Self {
        Self {
            meta: Some(meta.to_string()),
            ..Self::new(title, body)
        }
    }
}

/// A titled group of entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Section heading
    pub heading: String,
    /// Entries in display order
    pub items: Vec<Item>,
}

impl Section {
    fn new(heading: &str, items: Vec<Item>) -> Self {
        Self {
            heading: heading.to_string(),
            items,
        }
    }
}

/// A display-only page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    /// Route the page is served at
    pub route: Route,
    /// Main heading
    pub title: String,
    /// Line under the heading
    pub subtitle: String,
    /// Body sections
    pub sections: Vec<Section>,
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "=".repeat(self.title.chars().count()))?;
        writeln!(f, "{}", self.subtitle)?;
        for section in &self.sections {
            writeln!(f)?;
            writeln!(f, "## {}", section.heading)?;
            for item in &section.items {
                match &item.meta {
                    Some(meta) => writeln!(f, "- {} ({meta})", item.title)?,
                    None => writeln!(f, "- {}", item.title)?,
                }
                if !item.body.is_empty() {
                    writeln!(f, "  {}", item.body)?;
                }
            }
        }
        Ok(())
    }
}

/// Content for a public route; `None` for flows and admin screens
pub fn page_for(route: Route) -> Option<Page> {
    let page = match route {
        Route::Home => home(),
        Route::About => about(),
        Route::Events => events(),
        Route::Announcements => announcements(),
        Route::Blog => blog(),
        Route::President => president(),
        Route::Contact => contact(),
        _ => return None,
    };
    Some(page)
}

fn page(route: Route, subtitle: &str, sections: Vec<Section>) -> Page {
    Page {
        route,
        title: route.title().to_string(),
        subtitle: subtitle.to_string(),
        sections,
    }
}

fn home() -> Page {
    page(
        Route::Home,
        "Join our community of developers and innovators",
        vec![
            Section::new(
                "Why join DevClub",
                vec![
                    Item::new(
                        "Hands-on Learning",
                        "Learn by doing with real-world projects and practical workshops that build your portfolio.",
                    ),
                    Item::new(
                        "Vibrant Community",
                        "Connect with like-minded developers, share knowledge, and collaborate on exciting projects.",
                    ),
                    Item::new(
                        "Expert Mentorship",
                        "Get guidance from experienced developers and industry professionals who are passionate about teaching.",
                    ),
                    Item::new(
                        "Innovation Hub",
                        "Explore cutting-edge technologies and develop innovative solutions to real-world problems.",
                    ),
                ],
            ),
            Section::new(
                "Our impact",
                vec![
                    Item::with_meta("Active Members", "500+", "+20%"),
                    Item::with_meta("Success Stories", "200+", "+15%"),
                    Item::with_meta("Projects Launched", "100+", "+25%"),
                    Item::with_meta("Industry Partners", "20+", "+10%"),
                ],
            ),
            Section::new(
                "Upcoming events",
                vec![
                    Item::with_meta(
                        "Web Development Workshop",
                        "Tech Hub, Room 101. 25 of 30 spots taken.",
                        "15 April 2024, 14:00 - 17:00",
                    ),
                    Item::with_meta(
                        "Game Development Hackathon",
                        "Computer Lab 2. 35 of 50 spots taken.",
                        "20 April 2024, 09:00 - 18:00",
                    ),
                ],
            ),
        ],
    )
}

fn about() -> Page {
    page(
        Route::About,
        "A student community building skills through projects, workshops and mentorship",
        vec![Section::new(
            "Our values",
            vec![
                Item::new(
                    "Technical Excellence",
                    "We strive for technical excellence in everything we do, from coding practices to project delivery.",
                ),
                Item::new(
                    "Community First",
                    "Our community is at the heart of everything we do. We believe in the power of collaboration and shared learning.",
                ),
                Item::new(
                    "Innovation",
                    "We encourage creative thinking and innovative solutions to tackle real-world challenges.",
                ),
                Item::new(
                    "Continuous Learning",
                    "We believe in lifelong learning and provide opportunities for continuous growth and development.",
                ),
            ],
        )],
    )
}

fn events() -> Page {
    page(
        Route::Events,
        "Workshops, talks and meetups",
        vec![
            Section::new(
                "Upcoming",
                vec![
                    Item::with_meta("Web Development Workshop", "Virtual Event", "2024-03-15"),
                    Item::with_meta("Tech Career Panel", "Main Hall", "2024-03-20"),
                ],
            ),
            Section::new(
                "Past",
                vec![
                    Item::with_meta("Introduction to React", "Virtual Event", "2024-02-15"),
                    Item::with_meta("Networking Night", "Community Center", "2024-02-01"),
                ],
            ),
        ],
    )
}

fn announcements() -> Page {
    page(
        Route::Announcements,
        "News from the club",
        vec![Section::new(
            "Latest",
            vec![
                Item::with_meta(
                    "New Workshop Series Starting Soon",
                    "We're excited to announce a new series of workshops focused on modern web development. Stay tuned for more details!",
                    "2024-03-10",
                ),
                Item::with_meta(
                    "Registration Open for March Events",
                    "Registration is now open for all March events. Don't miss out on these exciting opportunities!",
                    "2024-03-05",
                ),
                Item::with_meta(
                    "Important: Platform Maintenance",
                    "Our platform will undergo maintenance this weekend. Please save your work and log out before the scheduled time.",
                    "2024-03-01",
                ),
                Item::with_meta(
                    "New Feature Release",
                    "We've just released new features to improve your learning experience. Check out the updates in your dashboard!",
                    "2024-02-28",
                ),
                Item::with_meta(
                    "Community Guidelines Update",
                    "We've updated our community guidelines to ensure a better experience for everyone. Please review the changes.",
                    "2024-02-25",
                ),
            ],
        )],
    )
}

fn blog() -> Page {
    page(
        Route::Blog,
        "Articles written by club members",
        vec![Section::new(
            "Posts",
            vec![
                Item::with_meta(
                    "Getting Started with Web Development",
                    "Learn the basics of HTML, CSS, and JavaScript to kickstart your web development journey.",
                    "Web Development, John Doe, March 15, 2024",
                ),
                Item::with_meta(
                    "The Future of AI in Technology",
                    "Explore how artificial intelligence is shaping the future of technology and our daily lives.",
                    "Artificial Intelligence, Jane Smith, March 12, 2024",
                ),
                Item::with_meta(
                    "Mobile App Development Best Practices",
                    "Discover the essential practices for creating successful mobile applications.",
                    "Mobile Development, Mike Johnson, March 10, 2024",
                ),
                Item::with_meta(
                    "Cybersecurity Fundamentals",
                    "Learn the basics of cybersecurity and how to protect your digital assets.",
                    "Security, Sarah Wilson, March 8, 2024",
                ),
            ],
        )],
    )
}

fn president() -> Page {
    page(
        Route::President,
        "John Doe, Full Stack Developer & Club President",
        vec![
            Section::new(
                "About me",
                vec![Item::new(
                    "Bio",
                    "Passionate about technology and community building. Leading the DevClub to new heights in innovation and technical excellence.",
                )],
            ),
            Section::new(
                "Featured projects",
                vec![
                    Item::new(
                        "E-Commerce Platform",
                        "Built a full-stack e-commerce platform using React and Node.js",
                    ),
                    Item::new(
                        "AI Chat Application",
                        "Developed a real-time chat application with AI integration",
                    ),
                    Item::new(
                        "Mobile App Development",
                        "Created a cross-platform mobile app using React Native",
                    ),
                ],
            ),
            Section::new(
                "Skills",
                vec![
                    Item::with_meta("Frontend Development", "", "90%"),
                    Item::with_meta("Backend Development", "", "85%"),
                    Item::with_meta("Mobile Development", "", "80%"),
                    Item::with_meta("UI/UX Design", "", "75%"),
                    Item::with_meta("Project Management", "", "90%"),
                ],
            ),
        ],
    )
}

fn contact() -> Page {
    page(
        Route::Contact,
        "Questions, partnerships or ideas: get in touch",
        vec![Section::new(
            "Reach us",
            vec![
                Item::new("Email", "contact@devclub.dz"),
                Item::new("Join", "Create an account from the Join page to become a member"),
            ],
        )],
    )
}
