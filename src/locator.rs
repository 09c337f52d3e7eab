// src/locator.rs
use std::fmt;

use thirtyfour::By;

/// A way of pointing at an element on the workspace page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locator {
    /// Plain CSS selector.
    Css(&'static str),
    /// Any element whose own text is exactly this.
    Text(&'static str),
    /// A button whose text contains this.
    ButtonText(&'static str),
}

impl Locator {
    pub fn to_by(&self) -> By {
        match self {
            Locator::Css(css) => By::Css(*css),
            Locator::Text(text) => By::XPath(format!(
                "//*[normalize-space(text())={}]",
                xpath_literal(text)
            )),
            Locator::ButtonText(text) => By::XPath(format!(
                "//button[contains(normalize-space(.), {})]",
                xpath_literal(text)
            )),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(css) => f.write_str(css),
            Locator::Text(text) => write!(f, "text='{text}'"),
            Locator::ButtonText(text) => write!(f, "button:has-text('{text}')"),
        }
    }
}

/// Quote a string for use inside an XPath expression.
fn xpath_literal(text: &str) -> String {
    if !text.contains('\'') {
        format!("'{text}'")
    } else if !text.contains('"') {
        format!("\"{text}\"")
    } else {
        let parts: Vec<String> = text.split('\'').map(|p| format!("'{p}'")).collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}
