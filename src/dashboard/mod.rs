//! Dashboard module - positions web interface
//!
//! Provides the single-page dashboard and the password page.
//! Separated into HTML, CSS, and JS submodules for maintainability.
//!
//! # Architecture
//! - `html.rs`: Page structure and login form
//! - `css.rs`: Styling with CSS custom properties
//! - `js.rs`: Snapshot loading and per-account tabs
//! - `format.rs`: Number formatting used by the snapshot projection

mod css;
pub mod format;
mod html;
mod js;

/// Generate the complete dashboard HTML page
pub fn dashboard_html() -> String {
    page("Hyperliquid Positions", html::TEMPLATE, js::SCRIPT)
}

/// Generate the password page, optionally flagging a rejected attempt
pub fn login_html(rejected: bool) -> String {
    let error = if rejected {
        r#"<p class="error">😕 Password incorrect</p>"#
    } else {
        ""
    };
    page(
        "Hyperliquid Positions",
        &html::LOGIN_TEMPLATE.replace("{error}", error),
        "",
    )
}

fn page(title: &str, body: &str, script: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
{css}
    </style>
</head>
<body>
{body}
    <script>
{script}
    </script>
</body>
</html>"#,
        css = css::STYLES,
    )
}
