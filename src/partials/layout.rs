use maud::{DOCTYPE, Markup, html};

use crate::partials;

const CONTAINER: &str = "flex justify-center items-center h-screen bg-gray-100 dark:bg-gray-900 font-sans";

/// Render a full document with `content` centered in a fixed-width card.
///
/// `class` is appended to the outermost container.
pub(crate) fn layout(class: Option<&str>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            (partials::head::head())
            body {
                div class=(partials::classes(CONTAINER, class)) {
                    div class="w-96 bg-white dark:bg-gray-800 text-gray-900 dark:text-gray-100 p-8 rounded-lg shadow-md" {
                        main class="w-full flex flex-col gap-4" {
                            (content)
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_inside_main() {
        let html = layout(None, html! { p #inner { "hello" } }).into_string();
        let main = html.find("<main").expect("main exists");
        let inner = html.find(r#"<p id="inner">hello</p>"#).expect("content rendered");
        assert!(main < inner, "{html}");
        assert!(html.starts_with("<!DOCTYPE html>"), "{html}");
    }

    #[test]
    fn test_extra_class_on_container() {
        let html = layout(Some("bg-sky-50"), html! {}).into_string();
        assert!(html.contains(&format!(r#"class="{CONTAINER} bg-sky-50""#)), "{html}");
    }

    #[test]
    fn test_fixed_width_card() {
        let html = layout(None, html! {}).into_string();
        assert!(html.contains("w-96"), "{html}");
    }
}
