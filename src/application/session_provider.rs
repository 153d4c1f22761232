//! SessionProvider - the one cached view of who is signed in.
//!
//! A background task owns the state. It resolves the initial session with a
//! bounded lookup, then applies auth events one at a time in the order the
//! auth service published them. Readers get a snapshot through a `watch`
//! channel and never block the task.
//!
//! ```text
//! spawn ──► initial lookup (timeout, one retry) ──► SignedIn | SignedOut
//!                                                      │
//!           auth events / refresh ◄────────────────────┘
//! ```
//!
//! Failures at the auth service are reported to listeners as no-op changes
//! and never replace a cached identity.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, RwLock};

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::domain::foundation::Identity;
use crate::domain::session::{AuthEvent, ChangeCause, IdentityChange, IdentityStatus};
use crate::ports::AuthService;

/// Handle returned by [`SessionProvider::on_identity_change`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(Uuid);

type Listener = Arc<dyn Fn(&IdentityChange) + Send + Sync>;

enum Command {
    Refresh(oneshot::Sender<()>),
}

/// State shared between the handle and the provider task.
struct Shared {
    state: watch::Sender<IdentityStatus>,
    listeners: RwLock<Vec<(ListenerId, Listener)>>,
}

impl Shared {
    fn listeners(&self) -> Vec<Listener> {
        self.listeners
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect()
    }

    fn current(&self) -> IdentityStatus {
        self.state.borrow().clone()
    }

    /// Replaces the state and notifies every listener.
    ///
    /// A transition to the status already held is dropped, so one
    /// underlying change reaches listeners once however many sources
    /// report it.
    fn apply(&self, status: IdentityStatus, cause: ChangeCause) {
        if *self.state.borrow() == status {
            tracing::debug!(cause = ?cause, "identity unchanged, nothing to deliver");
            return;
        }
        self.state.send_replace(status.clone());
        self.notify(IdentityChange::new(status, cause));
    }

    /// Notifies listeners of a failure without touching the state.
    fn report_failure(&self, reason: String) {
        let change = IdentityChange::new(self.current(), ChangeCause::ServiceFailure { reason });
        self.notify(change);
    }

    fn notify(&self, change: IdentityChange) {
        for listener in self.listeners() {
            if catch_unwind(AssertUnwindSafe(|| listener(&change))).is_err() {
                tracing::error!(cause = ?change.cause, "identity listener panicked");
            }
        }
    }
}

/// Caches the current identity and fans auth changes out to listeners.
pub struct SessionProvider {
    shared: Arc<Shared>,
    commands: mpsc::UnboundedSender<Command>,
}

impl SessionProvider {
    /// Starts the provider and its initial session lookup.
    ///
    /// Returns immediately with the state `Pending`. The task stops when
    /// the returned handle is dropped.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn spawn(auth: Arc<dyn AuthService>, config: SessionConfig) -> Self {
        let (state, _) = watch::channel(IdentityStatus::Pending);
        let shared = Arc::new(Shared {
            state,
            listeners: RwLock::new(Vec::new()),
        });
        let (commands, command_rx) = mpsc::unbounded_channel();

        // Subscribe before the lookup so no event is missed in between.
        let events = auth.subscribe();

        let task = ProviderTask {
            auth,
            config,
            shared: shared.clone(),
        };
        tokio::spawn(task.run(events, command_rx));

        Self { shared, commands }
    }

    /// Returns the cached identity state without waiting.
    pub fn current_identity(&self) -> IdentityStatus {
        self.shared.current()
    }

    /// Returns the signed-in identity, if any.
    pub fn identity(&self) -> Option<Identity> {
        self.shared.current().identity().cloned()
    }

    /// Registers a listener for every identity change.
    ///
    /// Listeners run on the provider task, in event order. A listener added
    /// before the initial lookup finishes also sees the initial resolution.
    pub fn on_identity_change<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&IdentityChange) + Send + Sync + 'static,
    {
        let id = ListenerId(Uuid::new_v4());
        self.shared
            .listeners
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push((id, Arc::new(listener)));
        id
    }

    /// Unregisters a listener. Returns false if it was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.shared.listeners.write().unwrap_or_else(|e| e.into_inner());
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    /// Returns a receiver that observes every state replacement.
    pub fn watch(&self) -> watch::Receiver<IdentityStatus> {
        self.shared.state.subscribe()
    }

    /// Waits until the initial lookup has finished and returns the state.
    pub async fn resolved(&self) -> IdentityStatus {
        let mut rx = self.shared.state.subscribe();
        let status = match rx.wait_for(IdentityStatus::is_resolved).await {
            Ok(status) => status.clone(),
            Err(_) => self.shared.current(),
        };
        status
    }

    /// Re-queries the auth service and applies the result.
    ///
    /// Runs on the provider task after any events already queued. A missing
    /// session while signed in is reported as an expiry; a failure leaves
    /// the state unchanged.
    pub async fn refresh(&self) -> IdentityStatus {
        let (done, wait) = oneshot::channel();
        if self.commands.send(Command::Refresh(done)).is_ok() {
            let _ = wait.await;
        }
        self.shared.current()
    }
}

impl std::fmt::Debug for SessionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionProvider")
            .field("state", &self.shared.current())
            .finish_non_exhaustive()
    }
}

struct ProviderTask {
    auth: Arc<dyn AuthService>,
    config: SessionConfig,
    shared: Arc<Shared>,
}

impl ProviderTask {
    async fn run(
        self,
        mut events: broadcast::Receiver<AuthEvent>,
        mut commands: mpsc::UnboundedReceiver<Command>,
    ) {
        let initial = self.resolve_initial().await;
        tracing::debug!(signed_in = initial.is_signed_in(), "initial identity resolved");
        self.shared.apply(initial, ChangeCause::InitialResolution);

        let mut events_open = true;
        loop {
            tokio::select! {
                biased;

                event = events.recv(), if events_open => match event {
                    Ok(event) => self.handle_event(event),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "auth events dropped, re-querying session");
                        self.refresh().await;
                    }
                    Err(RecvError::Closed) => {
                        tracing::warn!("auth event stream closed");
                        events_open = false;
                    }
                },

                command = commands.recv() => match command {
                    Some(Command::Refresh(done)) => {
                        self.refresh().await;
                        let _ = done.send(());
                    }
                    None => break,
                },
            }
        }

        tracing::debug!("session provider stopped");
    }

    /// Looks up the current session, bounded by the configured timeout.
    ///
    /// One retry is made after a timeout or a transient failure when
    /// enabled. Every other outcome resolves to `SignedOut`.
    async fn resolve_initial(&self) -> IdentityStatus {
        let attempts = if self.config.retry_once { 2 } else { 1 };
        let timeout = self.config.resolve_timeout();

        for attempt in 1..=attempts {
            match tokio::time::timeout(timeout, self.auth.current_session()).await {
                Ok(Ok(identity)) => return IdentityStatus::from(identity),
                Ok(Err(e)) if e.is_transient() => {
                    tracing::warn!(attempt, error = %e, "initial session lookup failed");
                }
                Ok(Err(e)) => {
                    tracing::warn!(attempt, error = %e, "initial session lookup rejected");
                    break;
                }
                Err(_) => {
                    tracing::warn!(
                        attempt,
                        timeout_ms = self.config.resolve_timeout_ms,
                        "initial session lookup timed out"
                    );
                }
            }
        }

        IdentityStatus::SignedOut
    }

    fn handle_event(&self, event: AuthEvent) {
        tracing::debug!(event = event.kind(), "auth event");
        match event {
            AuthEvent::SignedIn(identity) => {
                self.shared
                    .apply(IdentityStatus::SignedIn(identity), ChangeCause::SignedIn);
            }
            AuthEvent::SignedOut => {
                self.shared.apply(IdentityStatus::SignedOut, ChangeCause::SignedOut);
            }
            AuthEvent::SessionExpired => {
                self.shared
                    .apply(IdentityStatus::SignedOut, ChangeCause::SessionExpired);
            }
            AuthEvent::RefreshFailed { reason } => {
                tracing::warn!(reason = %reason, "session refresh failed, keeping identity");
                self.shared.report_failure(reason);
            }
        }
    }

    async fn refresh(&self) {
        match self.auth.current_session().await {
            Ok(Some(identity)) => {
                if self.shared.current().identity() != Some(&identity) {
                    self.shared
                        .apply(IdentityStatus::SignedIn(identity), ChangeCause::SignedIn);
                }
            }
            Ok(None) => {
                if self.shared.current().is_signed_in() {
                    self.shared
                        .apply(IdentityStatus::SignedOut, ChangeCause::SessionExpired);
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "session refresh failed, keeping identity");
                self.shared.report_failure(e.to_string());
            }
        }
    }
}
