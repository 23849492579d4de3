//! Application state management for Sitedesk.
//!
//! This module contains the core `App` struct that manages all application
//! state: the session guard and route guard, the admin collections, login
//! form state, and background task coordination. All mutation happens on the
//! UI loop; background tasks only send results over the channel.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::api::{ApiClient, ApiError, AuthApi};
use crate::auth::{AccessDecision, RouteGuard, SessionGuard, TokenStore};
use crate::config::Config;
use crate::models::{BlogPost, CareerApplication, ContactInquiry, UserProfile};
use crate::utils::contains_ignore_case;

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
/// A full refresh produces four messages; 16 leaves plenty of headroom.
const CHANNEL_BUFFER_SIZE: usize = 16;

/// Maximum length for email input in the login form
const MAX_EMAIL_LENGTH: usize = 64;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Number of items to scroll on page up/down
pub const PAGE_SCROLL_SIZE: usize = 10;

/// Generic login failure message. Deliberately the same for bad credentials
/// and transport problems; the real cause only goes to the log.
const LOGIN_FAILED_MESSAGE: &str = "Invalid email or password";

pub fn can_add_email_char(email: &str) -> bool {
    email.len() < MAX_EMAIL_LENGTH
}

pub fn can_add_password_char(password: &str) -> bool {
    password.len() < MAX_PASSWORD_LENGTH
}

// ============================================================================
// UI State Types
// ============================================================================

/// Main navigation tabs of the admin area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Posts,
    Applications,
    Inquiries,
}

impl Tab {
    /// Get the display title for this tab.
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Posts => "Posts",
            Tab::Applications => "Applications",
            Tab::Inquiries => "Inquiries",
        }
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Tab::Posts => Tab::Applications,
            Tab::Applications => Tab::Inquiries,
            Tab::Inquiries => Tab::Posts,
        }
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            Tab::Posts => Tab::Inquiries,
            Tab::Applications => Tab::Posts,
            Tab::Inquiries => Tab::Applications,
        }
    }
}

/// Current UI focus area (list panel or detail panel)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Detail,
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    ShowingHelp,
    ConfirmingDelete,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoginFocus {
    Email,
    Password,
    Button,
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Result types from background tasks, sent through an MPSC channel back to
/// the main loop, which applies them to app state.
enum RefreshResult {
    /// Startup verification finished; `Some` carries the verified profile
    SessionVerified(Option<UserProfile>),
    /// Blog posts fetched successfully
    Posts(Vec<BlogPost>),
    /// Career applications fetched successfully
    Applications(Vec<CareerApplication>),
    /// Contact inquiries fetched successfully
    Inquiries(Vec<ContactInquiry>),
    /// Signal that all refresh tasks have completed
    RefreshComplete,
    /// An error occurred during refresh
    Error(String),
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub guard: SessionGuard,
    pub route_guard: RouteGuard,
    pub api: ApiClient,

    // UI state
    pub state: AppState,
    pub current_tab: Tab,
    pub focus: Focus,
    pub search_query: String,

    // Login form state
    pub login_email: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,

    // Admin collections
    pub posts: Vec<BlogPost>,
    pub applications: Vec<CareerApplication>,
    pub inquiries: Vec<ContactInquiry>,

    // Selection indices (into the filtered views)
    pub posts_selection: usize,
    pub applications_selection: usize,
    pub inquiries_selection: usize,

    // Background task channel
    refresh_rx: mpsc::Receiver<RefreshResult>,
    refresh_tx: mpsc::Sender<RefreshResult>,

    // Status message
    pub status_message: Option<String>,
    pub refreshing: bool,
}

impl App {
    /// Create a new application instance
    pub fn new() -> Result<Self> {
        debug!("App::new() starting");
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let base_url = config.effective_api_base_url();
        debug!(base_url = %base_url, "Backend configured");
        let api = ApiClient::new(base_url)?;

        let data_dir = config.data_dir().unwrap_or_else(|_| PathBuf::from("./data"));
        let store = TokenStore::new(data_dir);

        // The guard reads the persisted token here; with one present the
        // session starts out Verifying and the route guard shows the
        // loading screen until `start_session_verification` reports back.
        let guard = SessionGuard::new(Arc::new(api.clone()), store);

        let login_email = std::env::var("SITEDESK_EMAIL")
            .ok()
            .or_else(|| config.last_email.clone())
            .unwrap_or_default();

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Ok(Self {
            config,
            guard,
            route_guard: RouteGuard::new(),
            api,

            state: AppState::Normal,
            current_tab: Tab::Posts,
            focus: Focus::List,
            search_query: String::new(),

            login_email,
            login_password: String::new(),
            login_focus: LoginFocus::Email,
            login_error: None,

            posts: Vec::new(),
            applications: Vec::new(),
            inquiries: Vec::new(),

            posts_selection: 0,
            applications_selection: 0,
            inquiries_selection: 0,

            refresh_rx: rx,
            refresh_tx: tx,

            status_message: None,
            refreshing: false,
        })
    }

    /// Access decision for the admin subtree, consulted on every frame
    pub fn access(&self) -> AccessDecision {
        self.route_guard.decide(self.guard.session())
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Kick off the startup verification on a background task so the UI can
    /// render the loading state while the call is in flight. Does nothing
    /// when no token was persisted (the session already resolved).
    pub fn start_session_verification(&mut self) {
        let Some(token) = self.guard.pending_token() else {
            return;
        };

        info!("Verifying persisted session token");
        let api = self.api.clone();
        let tx = self.refresh_tx.clone();

        tokio::spawn(async move {
            let outcome = match api.verify_token(&token).await {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!(error = %e, "Stored session token failed verification");
                    None
                }
            };
            Self::send_result(&tx, RefreshResult::SessionVerified(outcome)).await;
        });
    }

    /// Attempt login with the credentials from the login form. On success the
    /// admin data refresh starts immediately; on any failure the form shows
    /// the generic message and nothing else changes.
    pub async fn attempt_login(&mut self) {
        let email = self.login_email.trim().to_string();
        let password = self.login_password.clone();

        if email.is_empty() || password.is_empty() {
            self.login_error = Some("Email and password required".to_string());
            return;
        }

        self.login_error = None;

        if self.guard.login(&email, &password).await {
            self.config.last_email = Some(email);
            if let Err(e) = self.config.save() {
                warn!(error = %e, "Failed to save config");
            }

            if let Some(token) = self.guard.token() {
                self.api.set_token(token.to_string());
            }

            self.login_password.clear();
            self.refresh_all_background();
        } else {
            self.login_error = Some(LOGIN_FAILED_MESSAGE.to_string());
        }
    }

    /// Sign out: clear the session, the persisted token, and every piece of
    /// protected data. The route guard redirects to the login screen on the
    /// next frame.
    pub fn logout(&mut self) {
        self.guard.logout();
        self.api.clear_token();

        self.posts.clear();
        self.applications.clear();
        self.inquiries.clear();
        self.posts_selection = 0;
        self.applications_selection = 0;
        self.inquiries_selection = 0;
        self.search_query.clear();
        self.focus = Focus::List;

        self.login_password.clear();
        self.login_focus = if self.login_email.is_empty() {
            LoginFocus::Email
        } else {
            LoginFocus::Password
        };
        self.login_error = None;
        self.status_message = None;
        self.refreshing = false;
        info!("Signed out");
    }

    // =========================================================================
    // Background Data Refresh
    // =========================================================================

    /// Spawn a background task to refresh all admin collections
    pub fn refresh_all_background(&mut self) {
        if self.guard.token().is_none() {
            warn!("No token available for refresh");
            return;
        }

        info!("Starting background refresh of admin data");
        let api = self.api.clone();
        let tx = self.refresh_tx.clone();

        tokio::spawn(async move {
            let (posts, applications, inquiries) = tokio::join!(
                api.fetch_posts(),
                api.fetch_applications(),
                api.fetch_inquiries(),
            );

            Self::send_fetch_result(&tx, "Posts", posts, RefreshResult::Posts).await;
            Self::send_fetch_result(&tx, "Applications", applications, RefreshResult::Applications)
                .await;
            Self::send_fetch_result(&tx, "Inquiries", inquiries, RefreshResult::Inquiries).await;
            Self::send_result(&tx, RefreshResult::RefreshComplete).await;
        });

        self.refreshing = true;
        self.status_message = Some("Refreshing data...".to_string());
    }

    /// Helper to send refresh results, logging any channel errors
    async fn send_result(tx: &mpsc::Sender<RefreshResult>, result: RefreshResult) {
        if let Err(e) = tx.send(result).await {
            error!(error = %e, "Failed to send refresh result - channel closed");
        }
    }

    /// Helper to send a successful fetch result or an error
    async fn send_fetch_result<T, F>(
        tx: &mpsc::Sender<RefreshResult>,
        name: &str,
        result: Result<T, ApiError>,
        wrapper: F,
    ) where
        F: FnOnce(T) -> RefreshResult,
    {
        match result {
            Ok(data) => {
                debug!("{} fetched successfully", name);
                Self::send_result(tx, wrapper(data)).await;
            }
            Err(e) => {
                error!(error = %e, "{} fetch failed", name);
                Self::send_result(tx, RefreshResult::Error(format!("{}: {}", name, e))).await;
            }
        }
    }

    /// Check for completed background tasks and process results
    pub fn check_background_tasks(&mut self) {
        let mut results = Vec::new();
        while let Ok(result) = self.refresh_rx.try_recv() {
            results.push(result);
        }
        for result in results {
            self.process_refresh_result(result);
        }
    }

    /// Process a single result from a background task
    fn process_refresh_result(&mut self, result: RefreshResult) {
        match result {
            RefreshResult::SessionVerified(profile) => {
                self.guard.complete_verification(profile);
                if self.guard.is_authenticated() {
                    if let Some(token) = self.guard.token() {
                        self.api.set_token(token.to_string());
                    }
                    self.refresh_all_background();
                }
                // Verification failure needs no message: the route guard
                // lands on the login screen, which says it all
            }
            RefreshResult::Posts(data) => {
                self.posts = data;
                self.clamp_selections();
            }
            RefreshResult::Applications(data) => {
                self.applications = data;
                self.clamp_selections();
            }
            RefreshResult::Inquiries(data) => {
                self.inquiries = data;
                self.clamp_selections();
            }
            RefreshResult::RefreshComplete => {
                self.refreshing = false;
                // Only clear progress messages, preserve errors
                if let Some(ref msg) = self.status_message {
                    if !msg.starts_with("Error:") {
                        self.status_message = None;
                    }
                }
            }
            RefreshResult::Error(msg) => {
                error!(error = %msg, "Background task error");
                self.status_message = Some(format!("Error: {}", Self::friendly_error(&msg)));
            }
        }
    }

    /// Simplify common error messages for the status bar
    fn friendly_error(msg: &str) -> String {
        let lower = msg.to_lowercase();
        if lower.contains("unauthorized") || lower.contains("401") {
            "Session expired. Please sign in again.".to_string()
        } else if lower.contains("network") || lower.contains("connect") {
            "Network error. Check your connection.".to_string()
        } else if lower.contains("timed out") || lower.contains("timeout") {
            "Request timed out. Please try again.".to_string()
        } else {
            msg.to_string()
        }
    }

    // =========================================================================
    // Filtered views and selection
    // =========================================================================

    pub fn get_filtered_posts(&self) -> Vec<&BlogPost> {
        if self.search_query.is_empty() {
            self.posts.iter().collect()
        } else {
            self.posts
                .iter()
                .filter(|p| {
                    contains_ignore_case(&p.title, &self.search_query)
                        || contains_ignore_case(p.author_display(), &self.search_query)
                })
                .collect()
        }
    }

    pub fn get_filtered_applications(&self) -> Vec<&CareerApplication> {
        if self.search_query.is_empty() {
            self.applications.iter().collect()
        } else {
            self.applications
                .iter()
                .filter(|a| {
                    contains_ignore_case(&a.name, &self.search_query)
                        || contains_ignore_case(&a.position, &self.search_query)
                })
                .collect()
        }
    }

    pub fn get_filtered_inquiries(&self) -> Vec<&ContactInquiry> {
        if self.search_query.is_empty() {
            self.inquiries.iter().collect()
        } else {
            self.inquiries
                .iter()
                .filter(|i| {
                    contains_ignore_case(&i.name, &self.search_query)
                        || contains_ignore_case(i.subject_display(), &self.search_query)
                })
                .collect()
        }
    }

    /// Number of rows in the current tab's filtered list
    pub fn current_list_len(&self) -> usize {
        match self.current_tab {
            Tab::Posts => self.get_filtered_posts().len(),
            Tab::Applications => self.get_filtered_applications().len(),
            Tab::Inquiries => self.get_filtered_inquiries().len(),
        }
    }

    pub fn current_selection(&self) -> usize {
        match self.current_tab {
            Tab::Posts => self.posts_selection,
            Tab::Applications => self.applications_selection,
            Tab::Inquiries => self.inquiries_selection,
        }
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.current_list_len();
        if len == 0 {
            return;
        }
        let current = self.current_selection() as isize;
        let next = (current + delta).clamp(0, len as isize - 1) as usize;
        match self.current_tab {
            Tab::Posts => self.posts_selection = next,
            Tab::Applications => self.applications_selection = next,
            Tab::Inquiries => self.inquiries_selection = next,
        }
    }

    /// Keep selections inside the filtered lists after data or query changes
    pub fn clamp_selections(&mut self) {
        self.posts_selection = self
            .posts_selection
            .min(self.get_filtered_posts().len().saturating_sub(1));
        self.applications_selection = self
            .applications_selection
            .min(self.get_filtered_applications().len().saturating_sub(1));
        self.inquiries_selection = self
            .inquiries_selection
            .min(self.get_filtered_inquiries().len().saturating_sub(1));
    }

    // =========================================================================
    // Admin operations
    // =========================================================================

    /// Publish or unpublish the selected blog post
    pub async fn toggle_selected_post_published(&mut self) {
        let target = self
            .get_filtered_posts()
            .get(self.posts_selection)
            .map(|p| (p.id.clone(), p.published));
        let Some((id, published)) = target else {
            return;
        };

        match self.api.set_post_published(&id, !published).await {
            Ok(updated) => {
                let label = updated.status_label();
                self.status_message = Some(format!("Post marked {}", label));
                if let Some(existing) = self.posts.iter_mut().find(|p| p.id == id) {
                    *existing = updated;
                }
            }
            Err(e) => {
                error!(error = %e, "Failed to update post");
                self.status_message = Some(format!("Error: {}", Self::friendly_error(&e.to_string())));
            }
        }
    }

    /// Advance the selected application to the next review status
    pub async fn advance_selected_application_status(&mut self) {
        let target = self
            .get_filtered_applications()
            .get(self.applications_selection)
            .map(|a| (a.id.clone(), a.status));
        let Some((id, status)) = target else {
            return;
        };

        match self.api.set_application_status(&id, status.next()).await {
            Ok(updated) => {
                self.status_message = Some(format!("Application marked {}", updated.status.label()));
                if let Some(existing) = self.applications.iter_mut().find(|a| a.id == id) {
                    *existing = updated;
                }
            }
            Err(e) => {
                error!(error = %e, "Failed to update application");
                self.status_message = Some(format!("Error: {}", Self::friendly_error(&e.to_string())));
            }
        }
    }

    /// Toggle the read flag on the selected inquiry
    pub async fn toggle_selected_inquiry_read(&mut self) {
        let target = self
            .get_filtered_inquiries()
            .get(self.inquiries_selection)
            .map(|i| (i.id.clone(), i.read));
        let Some((id, read)) = target else {
            return;
        };

        match self.api.set_inquiry_read(&id, !read).await {
            Ok(updated) => {
                let label = if updated.read { "read" } else { "unread" };
                self.status_message = Some(format!("Inquiry marked {}", label));
                if let Some(existing) = self.inquiries.iter_mut().find(|i| i.id == id) {
                    *existing = updated;
                }
            }
            Err(e) => {
                error!(error = %e, "Failed to update inquiry");
                self.status_message = Some(format!("Error: {}", Self::friendly_error(&e.to_string())));
            }
        }
    }

    /// Label for the delete confirmation dialog, if something is selected
    pub fn selected_item_label(&self) -> Option<String> {
        match self.current_tab {
            Tab::Posts => self
                .get_filtered_posts()
                .get(self.posts_selection)
                .map(|p| format!("post \"{}\"", p.title)),
            Tab::Applications => self
                .get_filtered_applications()
                .get(self.applications_selection)
                .map(|a| format!("application from {}", a.name)),
            Tab::Inquiries => self
                .get_filtered_inquiries()
                .get(self.inquiries_selection)
                .map(|i| format!("inquiry from {}", i.name)),
        }
    }

    /// Delete the selected item on the current tab (after confirmation)
    pub async fn delete_selected(&mut self) {
        match self.current_tab {
            Tab::Posts => {
                let id = self
                    .get_filtered_posts()
                    .get(self.posts_selection)
                    .map(|p| p.id.clone());
                let Some(id) = id else { return };
                match self.api.delete_post(&id).await {
                    Ok(()) => {
                        self.posts.retain(|p| p.id != id);
                        self.status_message = Some("Post deleted".to_string());
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to delete post");
                        self.status_message =
                            Some(format!("Error: {}", Self::friendly_error(&e.to_string())));
                    }
                }
            }
            Tab::Applications => {
                let id = self
                    .get_filtered_applications()
                    .get(self.applications_selection)
                    .map(|a| a.id.clone());
                let Some(id) = id else { return };
                match self.api.delete_application(&id).await {
                    Ok(()) => {
                        self.applications.retain(|a| a.id != id);
                        self.status_message = Some("Application deleted".to_string());
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to delete application");
                        self.status_message =
                            Some(format!("Error: {}", Self::friendly_error(&e.to_string())));
                    }
                }
            }
            Tab::Inquiries => {
                let id = self
                    .get_filtered_inquiries()
                    .get(self.inquiries_selection)
                    .map(|i| i.id.clone());
                let Some(id) = id else { return };
                match self.api.delete_inquiry(&id).await {
                    Ok(()) => {
                        self.inquiries.retain(|i| i.id != id);
                        self.status_message = Some("Inquiry deleted".to_string());
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to delete inquiry");
                        self.status_message =
                            Some(format!("Error: {}", Self::friendly_error(&e.to_string())));
                    }
                }
            }
        }
        self.clamp_selections();
    }
}
