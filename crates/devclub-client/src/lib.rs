//! `DevClub` client: API access, session handling and the page flows built on it

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod admin_auth;
pub mod api_client;
pub mod content;
pub mod dashboard;
pub mod notify;
pub mod registration;
pub mod routes;
pub mod screens;
pub mod session;

pub use admin_auth::AdminAuthFlow;
pub use api_client::ApiClient;
pub use dashboard::{Dashboard, DashboardState};
pub use notify::{Notice, Notifier, RecordingNotifier, TracingNotifier};
pub use registration::{RegistrationFlow, RegistrationState};
pub use routes::Route;
pub use screens::{ResourceScreen, ScreenKind};
pub use session::{
    FileTokenStore, HistoryNavigator, MemoryTokenStore, MountGuard, Navigator, SessionContext,
    TokenStore,
};
