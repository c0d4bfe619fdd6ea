pub(crate) mod head;
pub(crate) mod layout;
pub(crate) mod login_form;
pub(crate) mod notification;

/// Append an optional extra class token to a base class list.
pub(crate) fn classes(base: &str, extra: Option<&str>) -> String {
    match extra.map(str::trim) {
        Some(extra) if !extra.is_empty() => format!("{base} {extra}"),
        _ => base.to_owned(),
    }
}
