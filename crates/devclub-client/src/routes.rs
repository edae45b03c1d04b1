//! Route table and navigation chrome

use serde::Serialize;
use std::fmt;

/// Every page the application can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Route {
    /// `/`
    Home,
    /// `/about`
    About,
    /// `/events`
    Events,
    /// `/announcements`
    Announcements,
    /// `/login`
    Login,
    /// `/join`
    Join,
    /// `/verify-email`
    VerifyEmail,
    /// `/president`
    President,
    /// `/blog`
    Blog,
    /// `/contact`
    Contact,
    /// `/register`
    Register,
    /// `/verify-otp`
    VerifyOtp,
    /// `/admin/login`
    AdminLogin,
    /// `/admin/dashboard`
    AdminDashboard,
    /// `/admin/members`
    AdminMembers,
    /// `/admin/events`
    AdminEvents,
    /// `/admin/announcements`
    AdminAnnouncements,
    /// `/admin/blog`
    AdminBlog,
    /// `/admin/registration-history`
    AdminRegistrationHistory,
}

/// Frame drawn around a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Chrome {
    /// Navbar above, footer below
    Public,
    /// Admin sidebar, no navbar or footer
    Admin,
    /// Page renders alone
    Bare,
}

/// A labelled link in one of the navigation bars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavLink {
    /// Visible text
    pub label: &'static str,
    /// Target path; may point outside the route table
    pub path: &'static str,
}

/// Where a successful email verification lands
pub const POST_VERIFICATION_ROUTE: Route = Route::Home;

impl Route {
    /// All routes in table order
    pub const ALL: [Self; 19] = [
        Self::Home,
        Self::About,
        Self::Events,
        Self::Announcements,
        Self::Login,
        Self::Join,
        Self::VerifyEmail,
        Self::President,
        Self::Blog,
        Self::Contact,
        Self::Register,
        Self::VerifyOtp,
        Self::AdminLogin,
        Self::AdminDashboard,
        Self::AdminMembers,
        Self::AdminEvents,
        Self::AdminAnnouncements,
        Self::AdminBlog,
        Self::AdminRegistrationHistory,
    ];

    /// URL path of this route
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::About => "/about",
            Self::Events => "/events",
            Self::Announcements => "/announcements",
            Self::Login => "/login",
            Self::Join => "/join",
            Self::VerifyEmail => "/verify-email",
            Self::President => "/president",
            Self::Blog => "/blog",
            Self::Contact => "/contact",
            Self::Register => "/register",
            Self::VerifyOtp => "/verify-otp",
            Self::AdminLogin => "/admin/login",
            Self::AdminDashboard => "/admin/dashboard",
            Self::AdminMembers => "/admin/members",
            Self::AdminEvents => "/admin/events",
            Self::AdminAnnouncements => "/admin/announcements",
            Self::AdminBlog => "/admin/blog",
            Self::AdminRegistrationHistory => "/admin/registration-history",
        }
    }

    /// Resolve a path, sending anything unknown to `/`
    ///
    /// Query strings, fragments and trailing slashes are ignored.
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };

        Self::ALL
            .into_iter()
            .find(|route| route.path() == normalized)
            .unwrap_or(Self::Home)
    }

    /// Admin pages other than the login page need a token
    pub const fn requires_auth(self) -> bool {
        matches!(
            self,
            Self::AdminDashboard
                | Self::AdminMembers
                | Self::AdminEvents
                | Self::AdminAnnouncements
                | Self::AdminBlog
                | Self::AdminRegistrationHistory
        )
    }

    /// Frame this route renders inside
    pub const fn chrome(self) -> Chrome {
        match self {
            Self::Contact | Self::Register | Self::VerifyOtp | Self::AdminLogin => Chrome::Bare,
            Self::AdminDashboard
            | Self::AdminMembers
            | Self::AdminEvents
            | Self::AdminAnnouncements
            | Self::AdminBlog
            | Self::AdminRegistrationHistory => Chrome::Admin,
            _ => Chrome::Public,
        }
    }

    /// Page title
    pub const fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::About => "About Us",
            Self::Events => "Events",
            Self::Announcements => "Announcements",
            Self::Login => "Login",
            Self::Join => "Join DevClub",
            Self::VerifyEmail => "Email Verification",
            Self::President => "Club President",
            Self::Blog => "Blog",
            Self::Contact => "Contact",
            Self::Register => "Register",
            Self::VerifyOtp => "Verify Code",
            Self::AdminLogin => "Admin Login",
            Self::AdminDashboard => "Dashboard",
            Self::AdminMembers => "Members",
            Self::AdminEvents => "Events Management",
            Self::AdminAnnouncements => "Announcements Management",
            Self::AdminBlog => "Blog Management",
            Self::AdminRegistrationHistory => "Registration History",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Decide where a navigation request to `requested` actually lands
///
/// Admin pages without a token go to the login page; the login page with a
/// token forwards to the dashboard.
pub const fn guard(requested: Route, authenticated: bool) -> Route {
    match requested {
        Route::AdminLogin if authenticated => Route::AdminDashboard,
        route if route.requires_auth() && !authenticated => Route::AdminLogin,
        route => route,
    }
}

/// Links in the public navbar
pub const NAVBAR_LINKS: [NavLink; 6] = [
    NavLink { label: "Home", path: "/" },
    NavLink { label: "About", path: "/about" },
    NavLink { label: "Events", path: "/events" },
    NavLink { label: "Announcements", path: "/announcements" },
    NavLink { label: "Blog", path: "/blog" },
    NavLink { label: "Join Us", path: "/join" },
];

/// Quick links in the public footer
pub const FOOTER_LINKS: [NavLink; 4] = [
    NavLink { label: "About Us", path: "/about" },
    NavLink { label: "Events", path: "/events" },
    NavLink { label: "Community", path: "/community" },
    NavLink { label: "Contact", path: "/contact" },
];

/// Entries in the admin sidebar
pub const SIDEBAR_LINKS: [NavLink; 6] = [
    NavLink { label: "Dashboard", path: "/admin/dashboard" },
    NavLink { label: "Members", path: "/admin/members" },
    NavLink { label: "Events", path: "/admin/events" },
    NavLink { label: "Announcements", path: "/admin/announcements" },
    NavLink { label: "Blog Posts", path: "/admin/blog" },
    NavLink { label: "Registrations", path: "/admin/registration-history" },
];

/// Links shown around `route`, navbar first then footer or sidebar
pub fn links_for(route: Route) -> Vec<NavLink> {
    match route.chrome() {
        Chrome::Public => NAVBAR_LINKS.iter().chain(FOOTER_LINKS.iter()).copied().collect(),
        Chrome::Admin => SIDEBAR_LINKS.to_vec(),
        Chrome::Bare => Vec::new(),
    }
}
