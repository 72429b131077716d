use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::ApiError;

// ── IdentityProvider ────────────────────────────────────────────────

/// The session as seen by the client: whether it has loaded, whether a user
/// is signed in, and a bearer token on demand.
///
/// The client never talks to an identity vendor directly. Whatever owns the
/// session (a browser SDK bridge, a CLI token file, a test fixture) sits
/// behind this trait.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    /// The provider has finished restoring its session state.
    fn is_loaded(&self) -> bool;

    fn is_signed_in(&self) -> bool;

    /// Current bearer token. `Ok(None)` means there is no usable session.
    async fn token(&self) -> Result<Option<String>, ApiError>;

    /// Start the external sign-in flow. Called on a missing token or a 401.
    fn redirect_to_sign_in(&self);
}

// ── StaticIdentity ──────────────────────────────────────────────────

type RedirectHook = Box<dyn Fn() + Send + Sync>;

/// A session whose token was obtained out of band (a saved login, a test
/// fixture). Always loaded; signed in iff it holds a token.
///
/// Redirects are counted, and optionally forwarded to a hook so a front end
/// can react (print a hint, open a browser).
pub struct StaticIdentity {
    token: Option<String>,
    redirects: AtomicUsize,
    on_redirect: Option<RedirectHook>,
}

impl StaticIdentity {
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            token: (!token.trim().is_empty()).then_some(token),
            redirects: AtomicUsize::new(0),
            on_redirect: None,
        }
    }

    /// Loaded, but nobody is signed in.
    pub fn signed_out() -> Self {
        Self {
            token: None,
            redirects: AtomicUsize::new(0),
            on_redirect: None,
        }
    }

    pub fn with_redirect_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_redirect = Some(Box::new(hook));
        self
    }

    /// Number of times sign-in has been requested.
    pub fn redirect_count(&self) -> usize {
        self.redirects.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IdentityProvider for StaticIdentity {
    fn is_loaded(&self) -> bool {
        true
    }

    fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }

    async fn token(&self) -> Result<Option<String>, ApiError> {
        Ok(self.token.clone())
    }

    fn redirect_to_sign_in(&self) {
        self.redirects.fetch_add(1, Ordering::SeqCst);
        tracing::warn!("sign-in required");
        if let Some(hook) = &self.on_redirect {
            hook();
        }
    }
}
