use std::convert::Infallible;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::extract::SignedCookieJar;
use axum_extra::extract::cookie::Key;

/// Name of the signed cookie carrying the form instance id.
pub(crate) const INSTANCE_COOKIE: &str = "login-form";

/// Extract the form instance id from the signed session cookie, if present and untampered.
#[derive(Debug)]
pub(crate) struct InstanceId(pub Option<String>);

impl<S> FromRequestParts<S> for InstanceId
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = SignedCookieJar::<Key>::from_request_parts(parts, state).await;

        let id = jar
            .ok()
            .and_then(|jar| jar.get(INSTANCE_COOKIE))
            .map(|cookie| cookie.value_trimmed().to_owned());

        Ok(InstanceId(id))
    }
}
