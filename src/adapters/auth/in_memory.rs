//! In-memory auth service for tests and local demos.
//!
//! Holds accounts and the current session in memory and publishes auth
//! events on a broadcast channel, like the hosted auth services do.
//!
//! # Panics
//!
//! Methods may panic if internal locks are poisoned. This adapter is not
//! meant for production.
//!
//! # Example
//!
//! ```ignore
//! let auth = InMemoryAuthService::new()
//!     .with_account("ada@example.com", "secret1", identity.clone());
//!
//! let creds = Credentials::new("ada@example.com", "secret1", 6)?;
//! let signed_in = auth.sign_in(&creds, SignInPolicy::VERIFIED_ONLY).await?;
//! assert_eq!(signed_in, identity);
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::domain::foundation::{
    AuthError, Credentials, Identity, SignInPolicy, SignUpProfile, UserId,
};
use crate::domain::session::AuthEvent;
use crate::ports::AuthService;

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
struct Account {
    password: String,
    identity: Identity,
}

/// Auth service backed by in-process maps.
#[derive(Debug)]
pub struct InMemoryAuthService {
    /// Accounts keyed by lowercased email
    accounts: RwLock<HashMap<String, Account>>,
    session: RwLock<Option<Identity>>,
    events: broadcast::Sender<AuthEvent>,
    /// Optional error to return from every call
    force_error: RwLock<Option<AuthError>>,
    /// Number of upcoming session lookups that fail as unavailable
    failing_lookups: AtomicUsize,
    lookup_delay: RwLock<Option<Duration>>,
    lookup_count: AtomicUsize,
}

impl Default for InMemoryAuthService {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryAuthService {
    /// Creates a service with no accounts and nobody signed in.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            accounts: RwLock::new(HashMap::new()),
            session: RwLock::new(None),
            events,
            force_error: RwLock::new(None),
            failing_lookups: AtomicUsize::new(0),
            lookup_delay: RwLock::new(None),
            lookup_count: AtomicUsize::new(0),
        }
    }

    /// Registers an account that can sign in with the given password.
    pub fn with_account(
        self,
        email: impl Into<String>,
        password: impl Into<String>,
        identity: Identity,
    ) -> Self {
        self.add_account(email, password, identity);
        self
    }

    /// Starts with `identity` already signed in.
    pub fn with_session(self, identity: Identity) -> Self {
        *self.session.write().unwrap() = Some(identity);
        self
    }

    /// Forces every call to return the specified error.
    pub fn with_error(self, error: AuthError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    /// Delays every session lookup, to exercise timeouts.
    pub fn with_lookup_delay(self, delay: Duration) -> Self {
        *self.lookup_delay.write().unwrap() = Some(delay);
        self
    }

    /// Makes the next `count` session lookups fail as unavailable.
    pub fn fail_next_lookups(&self, count: usize) {
        self.failing_lookups.store(count, Ordering::SeqCst);
    }

    /// Clears the forced error and returns to normal operation.
    pub fn clear_error(&self) {
        *self.force_error.write().unwrap() = None;
    }

    /// Sets the forced error at runtime.
    pub fn set_error(&self, error: AuthError) {
        *self.force_error.write().unwrap() = Some(error);
    }

    /// Registers an account at runtime.
    pub fn add_account(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
        identity: Identity,
    ) {
        let account = Account {
            password: password.into(),
            identity,
        };
        self.accounts
            .write()
            .unwrap()
            .insert(email.into().to_lowercase(), account);
    }

    /// Marks an account's email as verified.
    pub fn verify_email(&self, email: &str) {
        if let Some(account) = self.accounts.write().unwrap().get_mut(&email.to_lowercase()) {
            account.identity.email_verified = true;
        }
    }

    /// Publishes an event as if it came from the hosted service.
    pub fn emit(&self, event: AuthEvent) {
        match &event {
            AuthEvent::SignedIn(identity) => {
                *self.session.write().unwrap() = Some(identity.clone());
            }
            AuthEvent::SignedOut | AuthEvent::SessionExpired => {
                *self.session.write().unwrap() = None;
            }
            AuthEvent::RefreshFailed { .. } => {}
        }
        // No receivers is fine: nobody is listening yet.
        let _ = self.events.send(event);
    }

    /// Ends the session from the service side.
    pub fn expire_session(&self) {
        self.emit(AuthEvent::SessionExpired);
    }

    /// Ends the session without publishing an event, as when a token
    /// lapses while nobody is asking.
    pub fn end_session_silently(&self) {
        *self.session.write().unwrap() = None;
    }

    /// Returns how many session lookups have been made.
    pub fn lookup_count(&self) -> usize {
        self.lookup_count.load(Ordering::SeqCst)
    }

    /// Returns the number of registered accounts.
    pub fn account_count(&self) -> usize {
        self.accounts.read().unwrap().len()
    }

    fn forced_error(&self) -> Option<AuthError> {
        self.force_error.read().unwrap().clone()
    }
}

#[async_trait]
impl AuthService for InMemoryAuthService {
    async fn current_session(&self) -> Result<Option<Identity>, AuthError> {
        self.lookup_count.fetch_add(1, Ordering::SeqCst);

        let delay = *self.lookup_delay.read().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = self.forced_error() {
            return Err(error);
        }

        let failing = self
            .failing_lookups
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if failing.is_ok() {
            return Err(AuthError::service_unavailable("simulated lookup failure"));
        }

        Ok(self.session.read().unwrap().clone())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    async fn sign_up(
        &self,
        credentials: &Credentials,
        profile: &SignUpProfile,
    ) -> Result<Identity, AuthError> {
        if let Some(error) = self.forced_error() {
            return Err(error);
        }

        let key = credentials.email.to_lowercase();
        let mut accounts = self.accounts.write().unwrap();
        if accounts.contains_key(&key) {
            return Err(AuthError::UserAlreadyExists);
        }

        let identity = Identity::new(
            UserId::new(Uuid::new_v4().to_string())?,
            credentials.email.clone(),
            Some(profile.full_name.clone()),
            false,
        );
        accounts.insert(
            key,
            Account {
                password: credentials.password.clone(),
                identity: identity.clone(),
            },
        );
        Ok(identity)
    }

    async fn sign_in(
        &self,
        credentials: &Credentials,
        policy: SignInPolicy,
    ) -> Result<Identity, AuthError> {
        if let Some(error) = self.forced_error() {
            return Err(error);
        }

        let identity = {
            let accounts = self.accounts.read().unwrap();
            match accounts.get(&credentials.email.to_lowercase()) {
                Some(account) if account.password == credentials.password => {
                    account.identity.clone()
                }
                _ => return Err(AuthError::InvalidCredentials),
            }
        };

        policy.admit(&identity)?;
        self.emit(AuthEvent::SignedIn(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        if let Some(error) = self.forced_error() {
            return Err(error);
        }
        self.emit(AuthEvent::SignedOut);
        Ok(())
    }
}
