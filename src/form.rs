//! Login form state machine.
//!
//! A [`LoginForm`] holds the current field values, validation errors and the submission flag of
//! one form instance. Validation runs against a static schema; a successful submission hands the
//! credentials to a [`CredentialVerifier`] and then to the `on_login_success` callback.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use crate::verifier::{CredentialVerifier, VerifyError};

/// Username and password as submitted by the user.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Username,
    Password,
}

impl Field {
    pub const ALL: [Field; 2] = [Field::Username, Field::Password];

    pub fn name(self) -> &'static str {
        match self {
            Field::Username => "username",
            Field::Password => "password",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Username => "Username",
            Field::Password => "Password",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Field::Username => "Enter your username",
            Field::Password => "Enter your password",
        }
    }

    pub fn input_type(self) -> &'static str {
        match self {
            Field::Username => "text",
            Field::Password => "password",
        }
    }
}

#[derive(thiserror::Error, Debug)]
#[error("unknown field: {0}")]
pub struct UnknownField(String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "username" => Ok(Field::Username),
            "password" => Ok(Field::Password),
            _ => Err(UnknownField(s.to_owned())),
        }
    }
}

/// A single rule of the validation schema.
struct Rule {
    field: Field,
    min_len: usize,
    message: &'static str,
}

const SCHEMA: [Rule; 2] = [
    Rule {
        field: Field::Username,
        min_len: 1,
        message: "Username is required.",
    },
    Rule {
        field: Field::Password,
        min_len: 1,
        message: "Password is required.",
    },
];

/// Field-level validation errors, in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<(Field, &'static str)>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0
            .iter()
            .find_map(|(f, message)| (*f == field).then_some(*message))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.0.iter().copied()
    }

    fn set(&mut self, field: Field, message: Option<&'static str>) {
        self.0.retain(|(f, _)| *f != field);
        if let Some(message) = message {
            self.0.push((field, message));
            self.0.sort_by_key(|(f, _)| *f);
        }
    }
}

fn check(field: Field, value: &str) -> Option<&'static str> {
    SCHEMA
        .iter()
        .filter(|rule| rule.field == field)
        .find(|rule| value.chars().count() < rule.min_len)
        .map(|rule| rule.message)
}

/// Validate `credentials` against the schema.
pub fn validate(credentials: &Credentials) -> FieldErrors {
    let mut errors = FieldErrors::default();

    for field in Field::ALL {
        let value = match field {
            Field::Username => &credentials.username,
            Field::Password => &credentials.password,
        };
        errors.set(field, check(field, value));
    }

    errors
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed, nothing was sent.
    Invalid(FieldErrors),
    /// Verified and `on_login_success` was invoked.
    Succeeded,
    /// The verifier refused the credentials.
    Rejected(VerifyError),
    /// A submission is already in flight.
    Busy,
}

/// Snapshot of a form used for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub username: String,
    pub password: String,
    pub errors: FieldErrors,
    pub submitting: bool,
    pub submit_error: Option<String>,
}

impl FormView {
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Username => &self.username,
            Field::Password => &self.password,
        }
    }
}

type LoginSuccessFn = dyn Fn(Credentials) + Send + Sync;
type SignUpFn = dyn Fn() + Send + Sync;

#[derive(Default)]
struct Inner {
    values: Credentials,
    errors: FieldErrors,
    submitting: bool,
    submitted: bool,
    submit_error: Option<String>,
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new("", "")
    }
}

pub struct LoginForm {
    verifier: Arc<dyn CredentialVerifier>,
    on_login_success: Option<Box<LoginSuccessFn>>,
    on_sign_up: Option<Box<SignUpFn>>,
    inner: Mutex<Inner>,
}

impl LoginForm {
    pub fn new(verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self {
            verifier,
            on_login_success: None,
            on_sign_up: None,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Set the callback invoked with the credentials after a verified submission.
    pub fn on_login_success(mut self, callback: impl Fn(Credentials) + Send + Sync + 'static) -> Self {
        self.on_login_success = Some(Box::new(callback));
        self
    }

    /// Set the callback invoked when the sign-up control is activated.
    pub fn on_sign_up(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_sign_up = Some(Box::new(callback));
        self
    }

    pub fn state(&self) -> FormState {
        if self.inner.lock().unwrap().submitting {
            FormState::Submitting
        } else {
            FormState::Idle
        }
    }

    pub fn view(&self) -> FormView {
        let inner = self.inner.lock().unwrap();

        FormView {
            username: inner.values.username.clone(),
            password: inner.values.password.clone(),
            errors: inner.errors.clone(),
            submitting: inner.submitting,
            submit_error: inner.submit_error.clone(),
        }
    }

    /// Update a field value and return its current validation error.
    ///
    /// Edits are dropped while a submission is in flight. Once the form has been submitted at least
    /// once, the edited field is re-validated immediately.
    pub fn edit(&self, field: Field, value: impl Into<String>) -> Option<&'static str> {
        let mut inner = self.inner.lock().unwrap();

        if inner.submitting {
            return inner.errors.get(field);
        }

        let value = value.into();

        if inner.submitted {
            let error = check(field, &value);
            inner.errors.set(field, error);
        }

        match field {
            Field::Username => inner.values.username = value,
            Field::Password => inner.values.password = value,
        }

        inner.errors.get(field)
    }

    /// Validate and, if valid, verify the current values.
    pub async fn submit(&self) -> SubmitOutcome {
        let credentials = {
            let mut inner = self.inner.lock().unwrap();

            if inner.submitting {
                tracing::debug!("submission already in flight");
                return SubmitOutcome::Busy;
            }

            inner.submitted = true;
            inner.submit_error = None;
            inner.errors = validate(&inner.values);

            if !inner.errors.is_empty() {
                tracing::debug!(errors = ?inner.errors, "validation failed");
                return SubmitOutcome::Invalid(inner.errors.clone());
            }

            inner.submitting = true;
            inner.values.clone()
        };

        tracing::debug!(?credentials, "login form submitted");
        let result = self.verifier.verify(&credentials).await;

        {
            let mut inner = self.inner.lock().unwrap();
            inner.submitting = false;

            if let Err(err) = &result {
                inner.submit_error = Some(err.to_string());
            }
        }

        match result {
            Ok(()) => {
                if let Some(callback) = &self.on_login_success {
                    callback(credentials);
                }
                SubmitOutcome::Succeeded
            }
            Err(err) => {
                tracing::warn!(username = %credentials.username, %err, "verification failed");
                SubmitOutcome::Rejected(err)
            }
        }
    }

    /// Activate the sign-up control. Returns `false` if the control is disabled.
    pub fn sign_up(&self) -> bool {
        if self.inner.lock().unwrap().submitting {
            return false;
        }

        match &self.on_sign_up {
            Some(callback) => callback(),
            None => tracing::debug!("sign up clicked"),
        }

        true
    }
}
