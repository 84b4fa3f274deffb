use crate::domain::model::{AuthPayload, ThemeMode, User};
use crate::domain::ports::Storage;
use crate::utils::error::{AppError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub token: String,
    pub refresh_token: String,
    pub is_auth: bool,
    pub loading: bool,
    pub theme: ThemeMode,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            token: String::new(),
            refresh_token: String::new(),
            is_auth: false,
            loading: true,
            theme: ThemeMode::Light,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    Login(AuthPayload),
    Logout,
    SetUser(User),
    TriggerTheme(Option<ThemeMode>),
}

pub fn reduce(state: AuthState, action: AuthAction) -> AuthState {
    match action {
        AuthAction::Login(payload) => AuthState {
            user: payload.user.or(state.user),
            token: payload.access_token,
            refresh_token: payload.refresh_token,
            is_auth: true,
            loading: false,
            ..state
        },
        AuthAction::Logout => AuthState {
            user: None,
            token: String::new(),
            refresh_token: String::new(),
            is_auth: false,
            loading: false,
            ..state
        },
        AuthAction::SetUser(user) => AuthState {
            user: Some(user),
            ..state
        },
        AuthAction::TriggerTheme(theme) => AuthState {
            theme: theme.unwrap_or_default(),
            ..state
        },
    }
}

pub const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredTokens {
    pub token: String,
    #[serde(default)]
    pub refresh_token: String,
}

/// Auth state plus the token file that outlives the process.
pub struct Session<S: Storage> {
    storage: S,
    state: AuthState,
}

impl<S: Storage> Session<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            state: AuthState::default(),
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Reads persisted tokens, if any. The session counts as authenticated until
    /// the API says otherwise.
    pub async fn restore(&mut self) -> Result<Option<StoredTokens>> {
        let tokens = match self.storage.read_file(SESSION_FILE).await {
            Ok(bytes) => serde_json::from_slice::<StoredTokens>(&bytes)?,
            Err(AppError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                self.state.loading = false;
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        if tokens.token.is_empty() {
            self.state.loading = false;
            return Ok(None);
        }

        self.state = reduce(
            std::mem::take(&mut self.state),
            AuthAction::Login(AuthPayload {
                access_token: tokens.token.clone(),
                refresh_token: tokens.refresh_token.clone(),
                user: None,
            }),
        );
        Ok(Some(tokens))
    }

    pub async fn dispatch(&mut self, action: AuthAction) -> Result<()> {
        match &action {
            AuthAction::Login(payload) => {
                let tokens = StoredTokens {
                    token: payload.access_token.clone(),
                    refresh_token: payload.refresh_token.clone(),
                };
                self.storage
                    .write_file(SESSION_FILE, &serde_json::to_vec_pretty(&tokens)?)
                    .await?;
                tracing::debug!("Session tokens saved");
            }
            AuthAction::Logout => {
                self.storage.remove_file(SESSION_FILE).await?;
                tracing::debug!("Session tokens removed");
            }
            AuthAction::SetUser(_) | AuthAction::TriggerTheme(_) => {}
        }

        self.state = reduce(std::mem::take(&mut self.state), action);
        Ok(())
    }

    pub fn token(&self) -> Option<&str> {
        Some(self.state.token.as_str()).filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::LocalStorage;
    use tempfile::TempDir;

    fn payload() -> AuthPayload {
        AuthPayload {
            access_token: "access-1".to_string(),
            refresh_token: "refresh-1".to_string(),
            user: Some(User {
                first_name: "Ann".to_string(),
                theme: Some(ThemeMode::Dark),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_login_then_logout() {
        let state = reduce(AuthState::default(), AuthAction::Login(payload()));
        assert!(state.is_auth);
        assert!(!state.loading);
        assert_eq!(state.token, "access-1");
        assert_eq!(state.refresh_token, "refresh-1");
        assert_eq!(state.user.as_ref().unwrap().first_name, "Ann");

        let state = reduce(state, AuthAction::Logout);
        assert!(!state.is_auth);
        assert!(state.token.is_empty());
        assert!(state.refresh_token.is_empty());
        assert!(state.user.is_none());
    }

    #[test]
    fn test_theme_defaults_to_light() {
        let state = reduce(AuthState::default(), AuthAction::TriggerTheme(Some(ThemeMode::Dark)));
        assert_eq!(state.theme, ThemeMode::Dark);

        let state = reduce(state, AuthAction::TriggerTheme(None));
        assert_eq!(state.theme, ThemeMode::Light);
    }

    #[tokio::test]
    async fn test_session_persists_and_clears_tokens() {
        let dir = TempDir::new().unwrap();

        let mut session = Session::new(LocalStorage::new(dir.path()));
        session.dispatch(AuthAction::Login(payload())).await.unwrap();
        assert_eq!(session.token(), Some("access-1"));

        let mut restored = Session::new(LocalStorage::new(dir.path()));
        let tokens = restored.restore().await.unwrap().unwrap();
        assert_eq!(tokens.refresh_token, "refresh-1");
        assert!(restored.state().is_auth);

        restored.dispatch(AuthAction::Logout).await.unwrap();
        assert!(restored.token().is_none());

        let mut after_logout = Session::new(LocalStorage::new(dir.path()));
        assert!(after_logout.restore().await.unwrap().is_none());
        assert!(!after_logout.state().loading);
    }
}
