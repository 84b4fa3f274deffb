use crate::api::ApiClient;
use crate::domain::model::InviteCheck;
use crate::utils::error::Result;
use std::sync::atomic::{AtomicBool, Ordering};

/// Lets a side-effecting call through once per owner.
#[derive(Debug, Default)]
pub struct OnceGuard {
    fired: AtomicBool,
}

impl OnceGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// True for the first caller only.
    pub fn try_acquire(&self) -> bool {
        self.fired
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }
}

/// Accept-invite flow: the invite token is checked at most once per flow.
pub struct InviteFlow<'a> {
    client: &'a ApiClient,
    guard: OnceGuard,
}

impl<'a> InviteFlow<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self {
            client,
            guard: OnceGuard::new(),
        }
    }

    /// `Ok(None)` when the check already ran for this flow.
    pub async fn check(&self, token: &str) -> Result<Option<InviteCheck>> {
        if token.is_empty() || !self.guard.try_acquire() {
            return Ok(None);
        }
        let response = self.client.check_invite(token).await?;
        if response.data.user_exists {
            tracing::info!("Invite already accepted by an existing user");
        }
        Ok(Some(response.data))
    }
}

/// Recover-password flow: the recovery token is checked at most once per flow.
pub struct RecoverPasswordFlow<'a> {
    client: &'a ApiClient,
    guard: OnceGuard,
}

impl<'a> RecoverPasswordFlow<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self {
            client,
            guard: OnceGuard::new(),
        }
    }

    /// `Ok(Some(true))` when the token is valid, `Ok(None)` when already checked.
    pub async fn check(&self, token: &str) -> Result<Option<bool>> {
        if token.is_empty() || !self.guard.try_acquire() {
            return Ok(None);
        }
        self.client.check_token(token).await?;
        Ok(Some(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_guard_fires_once() {
        let guard = OnceGuard::new();
        assert!(!guard.has_fired());
        assert!(guard.try_acquire());
        assert!(!guard.try_acquire());
        assert!(guard.has_fired());
    }

    #[test]
    fn test_guards_are_independent() {
        let first = OnceGuard::new();
        let second = OnceGuard::new();
        assert!(first.try_acquire());
        assert!(second.try_acquire());
    }

    #[tokio::test]
    async fn test_guard_under_contention() {
        let guard = Arc::new(OnceGuard::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let guard = guard.clone();
                tokio::spawn(async move { guard.try_acquire() })
            })
            .collect();

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }
}
