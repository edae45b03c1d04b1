//! Member registration and email verification
//!
//! ```text
//! Filling ──submit──▶ Submitting ──ok──▶ AwaitingOtp ──6th char──▶ VerifyingOtp ──ok──▶ Verified
//!    ▲                    │                  ▲                          │
//!    └──────error─────────┘                  └─────────error────────────┘
//! ```
//!
//! Errors never halt the flow: they are reported through the notifier and
//! control returns to the state the user can act from.

use crate::api_client::ApiClient;
use crate::notify::{Notice, Notifier};
use crate::routes::POST_VERIFICATION_ROUTE;
use chrono::{DateTime, Utc};
use devclub_core::config::RegistrationConfig;
use devclub_core::types::{City, Department, Faculty, RegistrationDraft};
use devclub_core::utils::{format_countdown, password_strength, strength_label};
use devclub_core::{Error, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Where the registration flow stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RegistrationState {
    /// Editing the draft
    Filling,
    /// Registration request in flight
    Submitting,
    /// Registered; waiting for the emailed code
    AwaitingOtp,
    /// Verification request in flight
    VerifyingOtp,
    /// Code accepted and session established
    Verified,
}

/// Cosmetic countdown shown next to the code input
///
/// It only gates the resend action. The server alone decides whether a code
/// has expired, so an elapsed countdown never blocks verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OtpCountdown {
    seconds: u64,
    started_at: Option<DateTime<Utc>>,
}

impl OtpCountdown {
    /// Countdown of `seconds`, not yet started
    pub const fn new(seconds: u64) -> Self {
        Self {
            seconds,
            started_at: None,
        }
    }

    /// Restart from the full duration at `now`
    pub fn start(&mut self, now: DateTime<Utc>) {
        self.started_at = Some(now);
    }

    /// Whether the countdown was ever started
    pub const fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Whole seconds left at `now`
    pub fn remaining(&self, now: DateTime<Utc>) -> u64 {
        let Some(started_at) = self.started_at else {
            return 0;
        };
        let elapsed = u64::try_from((now - started_at).num_seconds()).unwrap_or(0);
        self.seconds.saturating_sub(elapsed)
    }

    /// `MM:SS` left at `now`
    pub fn display(&self, now: DateTime<Utc>) -> String {
        format_countdown(self.remaining(now))
    }

    /// Whether resend is unlocked at `now`
    pub fn can_resend(&self, now: DateTime<Utc>) -> bool {
        self.is_started() && self.remaining(now) == 0
    }
}

/// Lists backing the location and faculty selectors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceData {
    /// All communes
    pub cities: Vec<City>,
    /// All faculties
    pub faculties: Vec<Faculty>,
    /// Departments of the selected faculty
    pub departments: Vec<Department>,
    /// Communes of the selected wilaya
    pub communes: Vec<City>,
}

impl ReferenceData {
    /// Distinct wilayas as `(code, name)`, in first-seen order
    pub fn wilayas(&self) -> Vec<(String, String)> {
        let mut seen: Vec<(String, String)> = Vec::new();
        for city in &self.cities {
            if !seen.iter().any(|(code, _)| *code == city.wilaya_code) {
                seen.push((city.wilaya_code.clone(), city.wilaya_name.clone()));
            }
        }
        seen
    }
}

/// Registration and code verification for one prospective member
pub struct RegistrationFlow {
    api: ApiClient,
    notifier: Arc<dyn Notifier>,
    draft: RegistrationDraft,
    state: RegistrationState,
    otp: String,
    otp_length: usize,
    countdown: OtpCountdown,
    reference: ReferenceData,
}

impl std::fmt::Debug for RegistrationFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationFlow")
            .field("state", &self.state)
            .field("email", &self.draft.email)
            .field("otp_chars", &self.otp.chars().count())
            .finish_non_exhaustive()
    }
}

impl RegistrationFlow {
    /// Start a flow with default settings and an empty draft
    pub fn new(api: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_settings(api, notifier, &RegistrationConfig::default())
    }

    /// Start a flow with explicit code length and countdown
    pub fn with_settings(
        api: ApiClient,
        notifier: Arc<dyn Notifier>,
        settings: &RegistrationConfig,
    ) -> Self {
        Self {
            api,
            notifier,
            draft: RegistrationDraft::default(),
            state: RegistrationState::Filling,
            otp: String::new(),
            otp_length: settings.otp_length,
            countdown: OtpCountdown::new(settings.otp_countdown_secs),
            reference: ReferenceData::default(),
        }
    }

    /// Current state
    pub const fn state(&self) -> RegistrationState {
        self.state
    }

    /// The draft being edited
    pub const fn draft(&self) -> &RegistrationDraft {
        &self.draft
    }

    /// Mutable access to the draft; only meaningful while filling
    pub const fn draft_mut(&mut self) -> &mut RegistrationDraft {
        &mut self.draft
    }

    /// Replace the whole draft
    pub fn set_draft(&mut self, draft: RegistrationDraft) {
        self.draft = draft;
    }

    /// Code characters typed so far
    pub fn otp_input(&self) -> &str {
        &self.otp
    }

    /// Resend countdown
    pub const fn countdown(&self) -> &OtpCountdown {
        &self.countdown
    }

    /// Loaded selector lists
    pub const fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// Strength score and label of the drafted password
    pub fn password_strength(&self) -> (u8, &'static str) {
        let score = password_strength(&self.draft.password);
        (score, strength_label(score))
    }

    /// Load cities and faculties together
    ///
    /// # Errors
    ///
    /// Returns the first failure of either request, after notifying.
    pub async fn load_reference_data(&mut self) -> Result<()> {
        let loaded = tokio::try_join!(self.api.get_cities(), self.api.get_faculties());
        match loaded {
            Ok((cities, faculties)) => {
                debug!(cities = cities.len(), faculties = faculties.len(), "Reference data loaded");
                self.reference.cities = cities;
                self.reference.faculties = faculties;
                Ok(())
            }
            Err(e) => {
                self.notifier
                    .notify(Notice::error("Error", "Failed to load initial data"));
                Err(e)
            }
        }
    }

    /// Choose a faculty and load its departments
    ///
    /// A previously chosen department that does not belong to the new list is
    /// dropped from the draft. If the list cannot be loaded, the department
    /// selector is emptied so no department of another faculty survives.
    ///
    /// # Errors
    ///
    /// Returns the request failure, after notifying.
    pub async fn select_faculty(&mut self, faculty_id: i64) -> Result<()> {
        self.draft.faculty_id = Some(faculty_id);
        match self.api.get_departments_by_faculty(faculty_id).await {
            Ok(departments) => {
                if let Some(selected) = self.draft.department_id
                    && !departments.iter().any(|d| d.id == selected)
                {
                    self.draft.department_id = None;
                }
                self.reference.departments = departments;
                Ok(())
            }
            Err(e) => {
                self.reference.departments.clear();
                self.draft.department_id = None;
                self.notifier
                    .notify(Notice::error("Error", "Failed to load departments"));
                Err(e)
            }
        }
    }

    /// Choose a wilaya and load its communes
    ///
    /// The drafted commune is kept only if the new list offers it, compared by
    /// [`City::commune_value`]. If the list cannot be loaded, the commune
    /// selector is emptied.
    ///
    /// # Errors
    ///
    /// Returns the request failure, after notifying.
    pub async fn select_wilaya(&mut self, wilaya_code: &str) -> Result<()> {
        self.draft.wilaya_code = wilaya_code.to_string();
        match self.api.get_cities_by_wilaya(wilaya_code).await {
            Ok(communes) => {
                if !communes
                    .iter()
                    .any(|c| c.commune_value() == self.draft.commune_name)
                {
                    self.draft.commune_name.clear();
                }
                self.reference.communes = communes;
                Ok(())
            }
            Err(e) => {
                self.reference.communes.clear();
                self.draft.commune_name.clear();
                self.notifier
                    .notify(Notice::error("Error", "Failed to load cities"));
                Err(e)
            }
        }
    }

    /// Submit the draft
    ///
    /// Missing fields fail before any request. On success the flow waits for
    /// the code and the countdown restarts at `now`; no token exists yet.
    ///
    /// # Errors
    ///
    /// Returns the validation or request error; the draft is kept and the
    /// state is back to [`RegistrationState::Filling`].
    pub async fn submit(&mut self, now: DateTime<Utc>) -> Result<RegistrationState> {
        if self.state != RegistrationState::Filling {
            return Err(Error::validation(
                "state",
                "Registration has already been submitted",
            ));
        }

        if let Err(e) = self.draft.check_required() {
            self.notifier.notify(Notice::from_error("Error", &e));
            return Err(e);
        }

        self.state = RegistrationState::Submitting;
        match self.api.register(&self.draft).await {
            Ok(user) => {
                info!(email = %user.email, "Registration accepted, awaiting code");
                self.state = RegistrationState::AwaitingOtp;
                self.otp.clear();
                self.countdown.start(now);
                self.notifier.notify(Notice::success(
                    "Success",
                    "Registration successful. Please check your email for OTP code.",
                ));
                Ok(self.state)
            }
            Err(e) => {
                warn!("Registration failed: {}", e);
                self.state = RegistrationState::Filling;
                self.notifier.notify(Notice::from_error("Error", &e));
                Err(e)
            }
        }
    }

    /// Type one code character
    ///
    /// The character that completes the code triggers verification.
    /// Characters beyond the code length are ignored.
    ///
    /// # Errors
    ///
    /// Returns the verification failure, or a validation error outside the
    /// code-entry state.
    pub async fn push_otp_char(&mut self, ch: char) -> Result<RegistrationState> {
        self.ensure_awaiting_code()?;
        if self.otp.chars().count() >= self.otp_length {
            return Ok(self.state);
        }
        self.otp.push(ch);
        if self.otp.chars().count() == self.otp_length {
            self.verify().await
        } else {
            Ok(self.state)
        }
    }

    /// Replace the typed code at once, e.g. from a paste
    ///
    /// A complete code triggers exactly one verification; a shorter one is
    /// only recorded.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an over-long code, or the verification
    /// failure.
    pub async fn enter_otp(&mut self, code: &str) -> Result<RegistrationState> {
        self.ensure_awaiting_code()?;
        let length = code.chars().count();
        if length > self.otp_length {
            let e = Error::validation(
                "otp_code",
                format!("Verification code must be {} characters", self.otp_length),
            );
            self.notifier.notify(Notice::from_error("Error", &e));
            return Err(e);
        }
        self.otp = code.to_string();
        if length == self.otp_length {
            self.verify().await
        } else {
            Ok(self.state)
        }
    }

    /// Wait for the code of an earlier registration
    ///
    /// Puts the flow straight into code entry for `email`, as when the user
    /// comes back to the verification page. The resend countdown is not
    /// started since the code was sent in another session.
    pub fn resume(&mut self, email: &str) {
        self.draft.email = email.trim().to_string();
        self.otp.clear();
        self.state = RegistrationState::AwaitingOtp;
    }

    /// Submit a whole code, refusing anything but the full length
    ///
    /// Used where the code arrives in one piece and a short code cannot be
    /// completed later, e.g. a command-line argument.
    ///
    /// # Errors
    ///
    /// Returns a validation error, without any request, unless the code has
    /// exactly the configured length; otherwise the verification failure.
    pub async fn submit_otp(&mut self, code: &str) -> Result<RegistrationState> {
        self.ensure_awaiting_code()?;
        let code = code.trim();
        if code.chars().count() != self.otp_length {
            let e = Error::validation(
                "otp_code",
                format!("Verification code must be {} characters", self.otp_length),
            );
            self.notifier.notify(Notice::from_error("Error", &e));
            return Err(e);
        }
        self.enter_otp(code).await
    }

    /// Clear the typed code
    pub fn clear_otp(&mut self) {
        self.otp.clear();
    }

    /// Ask for a new code
    ///
    /// Locked while the countdown runs. Once unlocked the request is still
    /// refused: the backend exposes no resend endpoint, and whether a resend
    /// would invalidate the current code is unknown. The countdown is not
    /// reset and the typed code is kept.
    ///
    /// # Errors
    ///
    /// Always returns an error: validation while locked, not-implemented
    /// afterwards.
    pub fn resend_otp(&self, now: DateTime<Utc>) -> Result<()> {
        if self.state != RegistrationState::AwaitingOtp {
            return Err(Error::validation("state", "No verification code is pending"));
        }
        if !self.countdown.can_resend(now) {
            return Err(Error::validation(
                "otp_code",
                format!("You can request a new code in {}", self.countdown.display(now)),
            ));
        }
        let e = Error::not_implemented("Resending the verification code");
        self.notifier.notify(Notice::info("Resend", e.user_message()));
        Err(e)
    }

    fn ensure_awaiting_code(&self) -> Result<()> {
        if self.state == RegistrationState::AwaitingOtp {
            Ok(())
        } else {
            Err(Error::validation("state", "No verification code is pending"))
        }
    }

    async fn verify(&mut self) -> Result<RegistrationState> {
        self.state = RegistrationState::VerifyingOtp;
        let code = self.otp.clone();
        let outcome = self
            .api
            .verify_otp(&self.draft.email, &code)
            .await
            .and_then(|response| {
                let token = response
                    .token()
                    .ok_or_else(|| Error::Authentication("No access token received".to_string()))?;
                self.api.session().establish(token)
            });

        match outcome {
            Ok(()) => {
                info!(email = %self.draft.email, "Email verified");
                self.state = RegistrationState::Verified;
                self.notifier
                    .notify(Notice::success("Success", "Account verified successfully"));
                self.api.session().navigate(POST_VERIFICATION_ROUTE);
                Ok(self.state)
            }
            Err(e) => {
                warn!("Verification failed: {}", e);
                self.state = RegistrationState::AwaitingOtp;
                self.otp.clear();
                self.notifier.notify(Notice::from_error("Error", &e));
                Err(e)
            }
        }
    }
}
