use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use maud::{Markup, html};
use serde::Deserialize;

use crate::extract::InstanceId;
use crate::form::{Credentials, Field, FormView, SubmitOutcome};
use crate::page::LoginPage;
use crate::{Instances, assets, partials};

const HX_REDIRECT: HeaderName = HeaderName::from_static("hx-redirect");
const HX_RESWAP: HeaderName = HeaderName::from_static("hx-reswap");

/// How often a form rendered mid-submission asks for its current state.
const POLL_TRIGGER: &str = "load delay:500ms";

const INPUT: &str = "w-full p-2 rounded border border-gray-300 dark:border-gray-600 bg-white dark:bg-gray-700 text-gray-900 dark:text-gray-100 placeholder-gray-500 dark:placeholder-gray-400 focus:outline-none focus:ring-2 focus:ring-sky-500";

fn field_error(field: Field, error: Option<&str>) -> Markup {
    html! {
        p id={ (field.name()) "-error" } class="text-sm font-medium text-red-600 dark:text-red-400" {
            @if let Some(error) = error { (error) }
        }
    }
}

fn input(view: &FormView, field: Field) -> Markup {
    html! {
        div class="flex flex-col gap-2" {
            label for=(field.name()) class="text-sm font-medium" { (field.label()) }
            input id=(field.name())
                type=(field.input_type())
                name=(field.name())
                value=(view.value(field))
                placeholder=(field.placeholder())
                class=(INPUT)
                disabled[view.submitting]
                hx-post={ "/f/login/field/" (field.name()) }
                hx-trigger="input changed delay:300ms"
                hx-target={ "#" (field.name()) "-error" }
                hx-swap="outerHTML"
                {}
            (field_error(field, view.errors.get(field)))
        }
    }
}

/// Render the login form region.
///
/// `class` is appended to the outer container. A form rendered while a submission is in flight
/// re-fetches itself until the submission is over.
pub(crate) fn login_form(view: &FormView, class: Option<&str>) -> Markup {
    let container = partials::classes("w-full flex flex-col gap-6", class);

    html! {
        div #login-form
            class=(container)
            hx-get=[view.submitting.then_some("/f/login")]
            hx-trigger=[view.submitting.then_some(POLL_TRIGGER)]
            hx-swap=[view.submitting.then_some("outerHTML")] {
            h1 class="text-3xl font-bold text-left" { "Log in" }

            form class={ "space-y-4" @if view.submitting { " submitting" } }
                hx-post="/f/login"
                hx-target="#login-form"
                hx-swap="outerHTML"
                hx-sync="this:drop"
                hx-disabled-elt="find input, find button, #sign-up"
                novalidate {
                @for field in Field::ALL {
                    (input(view, field))
                }

                @if let Some(error) = &view.submit_error {
                    p role="alert" class="text-sm font-medium text-red-600 dark:text-red-400" { (error) }
                }

                button type="submit"
                    class="w-full flex items-center justify-center px-6 py-2 cursor-pointer bg-sky-600 text-white font-semibold rounded-md hover:bg-sky-700 focus:outline-none focus:ring-2 focus:ring-sky-500 focus:ring-offset-2"
                    disabled[view.submitting] {
                    span class="htmx-indicator" { (assets::icons::spinner()) }
                    "Log in"
                }
            }

            p class="text-sm text-center text-gray-500 dark:text-gray-400" {
                "or, "
                button #sign-up type="button"
                    class="font-medium cursor-pointer text-sky-600 hover:underline focus:outline-none focus:ring-2 focus:ring-sky-500 rounded-sm"
                    disabled[view.submitting]
                    hx-post="/f/signup"
                    hx-target="#notifications"
                    hx-swap="beforeend" {
                    "sign up"
                }
            }
        }
    }
}

fn restart() -> Response {
    ([(HX_REDIRECT, "/")], StatusCode::OK).into_response()
}

/// Leave whatever the request targeted untouched.
fn unchanged() -> Response {
    ([(HX_RESWAP, "none")], StatusCode::NO_CONTENT).into_response()
}

fn lookup(instances: &Instances, InstanceId(id): InstanceId) -> Option<Arc<LoginPage>> {
    let page = id.as_deref().and_then(|id| instances.get(id));

    if page.is_none() {
        tracing::debug!(?id, "unknown form instance");
    }

    page
}

#[derive(Deserialize)]
pub(crate) struct LoginFields {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

pub(crate) async fn submit(
    State(instances): State<Instances>,
    id: InstanceId,
    axum::extract::Form(fields): axum::extract::Form<LoginFields>,
) -> Response {
    let Some(page) = lookup(&instances, id) else {
        return restart();
    };

    let (outcome, notifications) = page
        .submit(Credentials::new(fields.username, fields.password))
        .await;
    tracing::debug!(?outcome, "submit handled");

    if outcome == SubmitOutcome::Busy {
        return unchanged();
    }

    let markup = html! {
        (login_form(&page.form().view(), None))
        (partials::notification::notifications(&notifications, true))
    };

    markup.into_response()
}

/// Current state of the form, without notifications.
pub(crate) async fn current(State(instances): State<Instances>, id: InstanceId) -> Response {
    let Some(page) = lookup(&instances, id) else {
        return restart();
    };

    login_form(&page.form().view(), None).into_response()
}

#[derive(Deserialize)]
pub(crate) struct FieldValue {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

pub(crate) async fn validate_field(
    State(instances): State<Instances>,
    id: InstanceId,
    Path(name): Path<String>,
    axum::extract::Form(value): axum::extract::Form<FieldValue>,
) -> Result<Response, StatusCode> {
    let field = name.parse::<Field>().map_err(|_| StatusCode::NOT_FOUND)?;

    let Some(page) = lookup(&instances, id) else {
        return Ok(restart());
    };

    let value = match field {
        Field::Username => value.username,
        Field::Password => value.password,
    }
    .unwrap_or_default();

    let error = page.form().edit(field, value);

    Ok(field_error(field, error).into_response())
}

pub(crate) async fn sign_up(State(instances): State<Instances>, id: InstanceId) -> Response {
    let Some(page) = lookup(&instances, id) else {
        return restart();
    };

    match page.sign_up() {
        Some(notifications) => {
            partials::notification::notifications(&notifications, false).into_response()
        }
        None => {
            tracing::debug!("sign up ignored while submitting");
            unchanged()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FieldErrors;

    fn view() -> FormView {
        FormView {
            username: String::new(),
            password: String::new(),
            errors: FieldErrors::default(),
            submitting: false,
            submit_error: None,
        }
    }

    #[test]
    fn test_idle_form_is_enabled() {
        let html = login_form(&view(), None).into_string();

        assert!(html.contains("<h1"), "{html}");
        assert!(html.contains(r#"placeholder="Enter your username""#), "{html}");
        assert!(html.contains(r#"type="password""#), "{html}");
        assert!(!html.contains(" disabled"), "{html}");
        assert!(!html.contains("is required"), "{html}");
        assert!(!html.contains("hx-get"), "{html}");
    }

    #[test]
    fn test_submitting_form_is_disabled() {
        let view = FormView {
            submitting: true,
            ..view()
        };
        let html = login_form(&view, None).into_string();

        // two inputs, submit and sign up
        assert_eq!(html.matches(" disabled").count(), 4, "{html}");
        assert!(html.contains("space-y-4 submitting"), "{html}");
        assert!(html.contains(r#"hx-get="/f/login""#), "{html}");
        assert!(html.contains(r#"hx-trigger="load delay:500ms""#), "{html}");
    }

    #[test]
    fn test_field_errors_rendered_inline() {
        let view = FormView {
            errors: crate::form::validate(&crate::form::Credentials::default()),
            ..view()
        };
        let html = login_form(&view, None).into_string();

        let username = html.find("Username is required.").expect("username error");
        let password = html.find("Password is required.").expect("password error");
        assert!(username < password);
    }

    #[test]
    fn test_submit_error_rendered() {
        let view = FormView {
            submit_error: Some("Invalid username or password.".into()),
            ..view()
        };
        let html = login_form(&view, None).into_string();
        assert!(html.contains(r#"role="alert""#), "{html}");
    }

    #[test]
    fn test_values_are_kept() {
        let view = FormView {
            username: "alice".into(),
            ..view()
        };
        let html = login_form(&view, Some("mt-4")).into_string();
        assert!(html.contains(r#"value="alice""#), "{html}");
        assert!(html.contains("w-full flex flex-col gap-6 mt-4"), "{html}");
    }
}
