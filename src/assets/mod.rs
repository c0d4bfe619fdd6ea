use axum::http::header;
use axum::response::IntoResponse;

pub(crate) mod icons;

pub(crate) async fn css() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], include_str!("app.css"))
}
