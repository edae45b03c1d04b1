//! Admin dashboard bootstrap

use crate::api_client::ApiClient;
use crate::notify::{Notice, Notifier};
use crate::routes::Route;
use crate::session::MountGuard;
use devclub_core::Error;
use devclub_core::types::{AdminProfile, Analytics, LoginHistoryEntry};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Everything the dashboard renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardData {
    /// Signed-in admin
    pub profile: AdminProfile,
    /// Recent logins
    pub login_history: Vec<LoginHistoryEntry>,
    /// Aggregated counters
    pub analytics: Analytics,
}

/// A headline number on the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryCard {
    /// Card heading
    pub label: &'static str,
    /// Main figure
    pub value: u64,
    /// Secondary line
    pub detail: String,
}

impl DashboardData {
    /// Headline cards derived from the analytics
    pub fn summary_cards(&self) -> Vec<SummaryCard> {
        let a = &self.analytics;
        vec![
            SummaryCard {
                label: "Members",
                value: a.students.total,
                detail: format!(
                    "{} active, {} new this month",
                    a.students.active, a.students.new_members
                ),
            },
            SummaryCard {
                label: "Events",
                value: a.events.total,
                detail: format!(
                    "{} upcoming, {} completed",
                    a.events.upcoming, a.events.completed
                ),
            },
            SummaryCard {
                label: "Announcements",
                value: a.announcements.total,
                detail: format!(
                    "{} active, {} high priority",
                    a.announcements.active, a.announcements.high_priority
                ),
            },
            SummaryCard {
                label: "Users",
                value: a.users.total,
                detail: format!("{} verified, {} new", a.users.active, a.users.new_users),
            },
        ]
    }

    /// Up to `limit` logins, newest first
    pub fn recent_logins(&self, limit: usize) -> Vec<&LoginHistoryEntry> {
        let mut entries: Vec<&LoginHistoryEntry> = self.login_history.iter().collect();
        entries.sort_by(|a, b| b.login_time.cmp(&a.login_time));
        entries.truncate(limit);
        entries
    }
}

/// Outcome of a bootstrap
#[derive(Debug)]
pub enum DashboardState {
    /// All three fetches succeeded
    Ready(Box<DashboardData>),
    /// No token, or the token was rejected; now on the login page
    Redirected,
    /// A non-auth failure; shown as an error panel with a retry button
    Failed(Error),
    /// The screen went away before the responses arrived
    Abandoned,
}

impl DashboardState {
    /// Message for the error panel, if the bootstrap failed
    pub fn failure_message(&self) -> Option<String> {
        match self {
            Self::Failed(e) => Some(e.user_message()),
            _ => None,
        }
    }
}

impl PartialEq for DashboardState {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Ready(a), Self::Ready(b)) => a == b,
            (Self::Redirected, Self::Redirected) | (Self::Abandoned, Self::Abandoned) => true,
            (Self::Failed(a), Self::Failed(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

/// Dashboard screen
pub struct Dashboard {
    api: ApiClient,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("session", self.api.session())
            .finish_non_exhaustive()
    }
}

impl Dashboard {
    /// Create the screen
    pub fn new(api: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        Self { api, notifier }
    }

    /// Enter the dashboard
    ///
    /// Without a token this redirects at once and sends nothing. Otherwise the
    /// profile, login history and analytics are requested concurrently; the
    /// first failure aborts the whole render, so a partial dashboard is never
    /// produced.
    pub async fn bootstrap(&self, mount: &MountGuard) -> DashboardState {
        let session = self.api.session();
        if !session.is_authenticated() {
            debug!("No token, redirecting to login");
            session.navigate(Route::AdminLogin);
            return DashboardState::Redirected;
        }

        let fetched = tokio::try_join!(
            self.api.get_admin_profile(),
            self.api.get_admin_login_history(),
            self.api.get_analytics(),
        );

        if !mount.is_mounted() {
            debug!("Dashboard unmounted before data arrived, discarding");
            return DashboardState::Abandoned;
        }

        match fetched {
            Ok((profile, login_history, analytics)) => DashboardState::Ready(Box::new(DashboardData {
                profile,
                login_history,
                analytics,
            })),
            Err(e) if e.is_authentication() => {
                // The client already cleared the token; make sure we are on the
                // login page even if the failure was the local token check.
                if session.current_route() != Route::AdminLogin {
                    session.evict();
                }
                self.notifier.notify(Notice::error(
                    "Session Expired",
                    "Please log in again to continue",
                ));
                DashboardState::Redirected
            }
            Err(e) => {
                warn!("Dashboard failed to load: {}", e);
                self.notifier.notify(Notice::from_error("Error", &e));
                DashboardState::Failed(e)
            }
        }
    }

    /// Retry after a failure: a full bootstrap, not a scoped refetch
    pub async fn retry(&self, mount: &MountGuard) -> DashboardState {
        self.bootstrap(mount).await
    }

    /// Sign out from the dashboard header
    ///
    /// # Errors
    ///
    /// Returns an error if the token store cannot be cleared.
    pub fn logout(&self) -> devclub_core::Result<()> {
        self.api.session().end()?;
        self.api.session().navigate(Route::AdminLogin);
        Ok(())
    }
}
