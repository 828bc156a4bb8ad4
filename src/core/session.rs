//! Session state machine gating access to the tools.
//!
//! Authentication is a demo: any submit signs the user in. There is no
//! credential check and no logout.

/// Which form is shown before signing in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthView {
    /// Login form.
    #[default]
    Login,
    /// Sign up form.
    Signup,
}

impl AuthView {
    /// Returns the form title.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Signup => "Sign Up",
        }
    }
}

/// Session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Session {
    /// Not signed in; showing the given form.
    LoggedOut { view: AuthView },
    /// Signed in.
    LoggedIn,
}

impl Default for Session {
    fn default() -> Self {
        Self::LoggedOut {
            view: AuthView::Login,
        }
    }
}

/// Transitions accepted by [`Session::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    SubmitLogin,
    SubmitSignup,
    SwitchToSignup,
    SwitchToLogin,
}

impl Session {
    /// Returns true once the user has logged in or signed up.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::LoggedIn)
    }

    /// Returns the visible auth form, or `None` when signed in.
    #[must_use]
    pub const fn auth_view(&self) -> Option<AuthView> {
        match self {
            Self::LoggedOut { view } => Some(*view),
            Self::LoggedIn => None,
        }
    }

    /// Applies a transition. Actions that do not apply to the current state
    /// leave it unchanged.
    pub fn apply(&mut self, action: SessionAction) {
        let next = match (*self, action) {
            (Self::LoggedOut { .. }, SessionAction::SubmitLogin | SessionAction::SubmitSignup) => {
                tracing::info!(?action, "session authenticated");
                Self::LoggedIn
            }
            (Self::LoggedOut { .. }, SessionAction::SwitchToSignup) => Self::LoggedOut {
                view: AuthView::Signup,
            },
            (Self::LoggedOut { .. }, SessionAction::SwitchToLogin) => Self::LoggedOut {
                view: AuthView::Login,
            },
            (Self::LoggedIn, _) => {
                tracing::debug!(?action, "ignoring session action while logged in");
                Self::LoggedIn
            }
        };
        *self = next;
    }
}
