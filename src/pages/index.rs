use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::SignedCookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use maud::{Markup, html};

use crate::extract::{INSTANCE_COOKIE, InstanceId};
use crate::{Instances, partials};

/// Render the login page with a fresh form instance, replacing the session's previous one.
pub(crate) async fn index(
    jar: SignedCookieJar,
    State(instances): State<Instances>,
    InstanceId(id): InstanceId,
) -> Result<(SignedCookieJar, Markup), StatusCode> {
    let (id, page) = instances.open(id.as_deref()).map_err(|err| {
        tracing::error!(?err, "failed to create form instance");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let cookie = Cookie::build((INSTANCE_COOKIE, id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .build();

    let content = html! {
        (partials::login_form::login_form(&page.form().view(), None))
        div #notifications {}
    };

    Ok((jar.add(cookie), partials::layout::layout(None, content)))
}
