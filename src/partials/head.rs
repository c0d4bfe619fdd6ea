use maud::{Markup, html};

pub(crate) fn head() -> Markup {
    html! {
        head {
            meta charset="utf-8";
            meta name="viewport" content="width=device-width, initial-scale=1.0";
            script src="https://cdn.tailwindcss.com" {}
            link rel="stylesheet" type="text/css" href="/app.css";
            script src="https://unpkg.com/htmx.org@2.0.4/dist/htmx.min.js" integrity="sha384-HGfztofotfshcF7+8n44JQL2oJmowVChPTg48S+jvZoztPfvwD79OC/LTtG6dMp+" crossorigin="anonymous" {}
            title { "Log in" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_loads_htmx_and_styles() {
        let html = head().into_string();
        assert!(html.contains("htmx.min.js"), "{html}");
        assert!(html.contains(r#"href="/app.css""#), "{html}");
        assert!(html.contains("<title>Log in</title>"), "{html}");
    }
}
