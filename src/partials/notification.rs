use maud::{Markup, html};

use crate::assets;
use crate::notify::Notification;

/// Render one notification as an open, dismissible dialog.
pub(crate) fn notification(notification: &Notification) -> Markup {
    html! {
        dialog open
            role="alertdialog"
            class="notification fixed inset-x-0 top-8 mx-auto w-80 rounded-lg shadow-lg p-4 bg-white dark:bg-gray-700 text-gray-900 dark:text-gray-100" {
            div class="flex items-start gap-2" {
                div class="flex flex-col flex-grow gap-1" {
                    p class="font-semibold" { (notification.title()) }
                    @for line in notification.lines() {
                        p class="text-sm" { (line) }
                    }
                }
                button type="button"
                    class="cursor-pointer text-gray-400 hover:text-gray-600 dark:hover:text-gray-200"
                    aria-label="Dismiss"
                    onclick="this.closest('dialog').remove()" {
                    (assets::icons::close())
                }
            }
        }
    }
}

/// Render `notifications` for appending to the `#notifications` region.
///
/// With `oob` set the fragment is marked for an htmx out-of-band swap, so it can ride along with a
/// response that targets something else.
pub(crate) fn notifications(notifications: &[Notification], oob: bool) -> Markup {
    html! {
        @if oob {
            @if !notifications.is_empty() {
                div hx-swap-oob="beforeend:#notifications" {
                    @for n in notifications { (notification(n)) }
                }
            }
        } @else {
            @for n in notifications { (notification(n)) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::Credentials;

    #[test]
    fn test_login_notification_masks_password() {
        let n = Notification::login_succeeded(&Credentials::new("alice", "secret123"));
        let html = notification(&n).into_string();

        assert!(html.contains("Login Successful!"), "{html}");
        assert!(html.contains("Username: alice"), "{html}");
        assert!(html.contains("Password: sec..."), "{html}");
        assert!(!html.contains("secret123"), "{html}");
    }

    #[test]
    fn test_oob_wrapper() {
        let html = notifications(&[Notification::SignUpRequested], true).into_string();
        assert!(html.contains(r#"hx-swap-oob="beforeend:#notifications""#), "{html}");

        let html = notifications(&[Notification::SignUpRequested], false).into_string();
        assert!(!html.contains("hx-swap-oob"), "{html}");
        assert!(html.contains("Sign up action triggered!"), "{html}");
    }

    #[test]
    fn test_empty_oob_renders_nothing() {
        assert_eq!(notifications(&[], true).into_string(), "");
    }
}
