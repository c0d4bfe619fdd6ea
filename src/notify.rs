//! User-facing notifications published by a page and rendered by whoever subscribes.

use tokio::sync::broadcast;

use crate::form::Credentials;

const CAPACITY: usize = 16;

/// Number of password characters revealed in a success notification.
const PASSWORD_HINT_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    LoginSucceeded {
        username: String,
        password_hint: String,
    },
    SignUpRequested,
}

impl Notification {
    pub fn login_succeeded(credentials: &Credentials) -> Self {
        Self::LoginSucceeded {
            username: credentials.username.clone(),
            password_hint: credentials.password.chars().take(PASSWORD_HINT_LEN).collect(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Notification::LoginSucceeded { .. } => "Login Successful!",
            Notification::SignUpRequested => "Sign up action triggered!",
        }
    }

    pub fn lines(&self) -> Vec<String> {
        match self {
            Notification::LoginSucceeded {
                username,
                password_hint,
            } => vec![
                format!("Username: {username}"),
                format!("Password: {password_hint}... (masked)"),
            ],
            Notification::SignUpRequested => {
                vec!["Sign up is not available yet.".to_owned()]
            }
        }
    }
}

#[derive(Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notification>,
}

impl Notifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CAPACITY);
        Self { tx }
    }

    pub fn send(&self, notification: Notification) {
        if self.tx.send(notification).is_err() {
            tracing::debug!("notification dropped, no subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }
}

/// Collect everything currently queued on `rx` without waiting.
pub fn drain(rx: &mut broadcast::Receiver<Notification>) -> Vec<Notification> {
    let mut notifications = Vec::new();

    loop {
        match rx.try_recv() {
            Ok(notification) => notifications.push(notification),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "notifications lagged");
            }
            Err(_) => break,
        }
    }

    notifications
}
