//! The login page: one form whose outcomes are published as notifications.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::form::{Credentials, Field, LoginForm, SubmitOutcome};
use crate::notify::{Notification, Notifier, drain};
use crate::verifier::CredentialVerifier;

pub struct LoginPage {
    form: LoginForm,
    notifier: Notifier,
    /// Held for the whole of one submit or sign-up, so the notifications collected while holding it
    /// are exactly the ones that event caused.
    dispatch: Mutex<()>,
}

impl LoginPage {
    pub fn new(verifier: Arc<dyn CredentialVerifier>) -> Self {
        let notifier = Notifier::new();

        let form = LoginForm::new(verifier)
            .on_login_success({
                let notifier = notifier.clone();
                move |credentials| {
                    tracing::info!(username = %credentials.username, "login successful");
                    notifier.send(Notification::login_succeeded(&credentials));
                }
            })
            .on_sign_up({
                let notifier = notifier.clone();
                move || {
                    tracing::info!("sign up requested");
                    notifier.send(Notification::SignUpRequested);
                }
            });

        Self {
            form,
            notifier,
            dispatch: Mutex::new(()),
        }
    }

    pub fn form(&self) -> &LoginForm {
        &self.form
    }

    /// Take `values` into the form and submit it, returning the outcome together with the
    /// notifications this submission published.
    ///
    /// If another submit or sign-up of this page is still being handled, nothing changes and the
    /// outcome is [`SubmitOutcome::Busy`].
    pub async fn submit(&self, values: Credentials) -> (SubmitOutcome, Vec<Notification>) {
        let Ok(_dispatch) = self.dispatch.try_lock() else {
            return (SubmitOutcome::Busy, Vec::new());
        };

        let mut rx = self.notifier.subscribe();
        self.form.edit(Field::Username, values.username);
        self.form.edit(Field::Password, values.password);

        let outcome = self.form.submit().await;
        (outcome, drain(&mut rx))
    }

    /// Activate sign-up and return the notifications it published, or `None` if the control is
    /// currently disabled.
    pub fn sign_up(&self) -> Option<Vec<Notification>> {
        let Ok(_dispatch) = self.dispatch.try_lock() else {
            return None;
        };

        let mut rx = self.notifier.subscribe();
        self.form.sign_up().then(|| drain(&mut rx))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::verifier::SimulatedVerifier;

    fn page(delay: Duration) -> Arc<LoginPage> {
        Arc::new(LoginPage::new(Arc::new(SimulatedVerifier::new(delay))))
    }

    #[tokio::test]
    async fn test_success_returns_masked_notification() {
        let page = page(Duration::ZERO);

        let (outcome, notifications) = page.submit(Credentials::new("alice", "secret123")).await;

        assert_eq!(outcome, SubmitOutcome::Succeeded);
        assert_eq!(
            notifications,
            [Notification::LoginSucceeded {
                username: "alice".into(),
                password_hint: "sec".into()
            }]
        );
    }

    #[tokio::test]
    async fn test_invalid_submit_returns_nothing() {
        let page = page(Duration::ZERO);

        let (outcome, notifications) = page.submit(Credentials::default()).await;

        assert!(matches!(outcome, SubmitOutcome::Invalid(_)), "{outcome:?}");
        assert!(notifications.is_empty());
    }

    #[test]
    fn test_sign_up_returns_notification() {
        let page = page(Duration::ZERO);

        assert_eq!(page.sign_up(), Some(vec![Notification::SignUpRequested]));
        assert_eq!(page.form().view().username, "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_events_keep_their_own_notifications() {
        let page = page(Duration::from_millis(1500));

        let handle = tokio::spawn({
            let page = page.clone();
            async move { page.submit(Credentials::new("alice", "secret123")).await }
        });
        tokio::task::yield_now().await;

        assert_eq!(page.sign_up(), None);
        let (outcome, notifications) = page.submit(Credentials::new("bob", "")).await;
        assert_eq!(outcome, SubmitOutcome::Busy);
        assert!(notifications.is_empty());

        let (outcome, notifications) = handle.await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Succeeded);
        assert_eq!(notifications.len(), 1);
        assert!(matches!(
            &notifications[0],
            Notification::LoginSucceeded { username, .. } if username == "alice"
        ));
    }

    #[tokio::test]
    async fn test_sequential_events_do_not_leak() {
        let page = page(Duration::ZERO);

        assert_eq!(page.sign_up().map(|n| n.len()), Some(1));
        let (_, notifications) = page.submit(Credentials::new("", "pw")).await;

        assert!(notifications.is_empty());
    }
}
