//! Dashboard module - Options analytics web interface
//!
//! Server-rendered pages over the analytics backend.
//! Separated into layout, fragment, and asset submodules for maintainability.
//!
//! # Architecture
//! - `html.rs`: Page bodies and tool forms
//! - `render.rs`: Fragments for backend results
//! - `chart.rs`: SVG payoff diagram
//! - `css.rs`: Styling with CSS custom properties
//! - `js.rs`: Table toggles, confirmations, leg selection

mod chart;
mod css;
pub mod html;
mod js;
pub mod render;

pub use render::{error_fragment, json_result, notice_fragment};

/// Message shown above the page body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flash {
    Notice(String),
    Error(String),
}

impl Flash {
    fn render(&self) -> String {
        match self {
            Flash::Notice(message) => notice_fragment(message),
            Flash::Error(message) => format!(r#"<div class="flash-error">{}</div>"#, error_fragment(message)),
        }
    }
}

/// Generate a complete dashboard HTML page
pub fn page(title: &str, logged_in: bool, flash: Option<&Flash>, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} | Options Analytics</title>
    <style>
{css}
    </style>
</head>
<body>
    <div class="container">
        {header}
        {flash}
        {body}
    </div>
    <script>
{js}
    </script>
</body>
</html>"#,
        title = render::escape(title),
        header = html::header(logged_in),
        flash = flash.map(Flash::render).unwrap_or_default(),
        css = css::STYLES,
        js = js::SCRIPT
    )
}

/// Login page, optionally with a message from the last attempt
pub fn login_page(flash: Option<&Flash>) -> String {
    page("Login", false, flash, html::login_form())
}
