use crate::error::{Error, Result};
use crate::utils::sanitize;
use regex::Regex;

/// Renders the constrained Markdown subset the model is prompted to emit
/// into HTML.
///
/// Rewrite order is fixed: headings, bold links, plain links, bold text,
/// line breaks. Order matters: bold must not re-wrap the link text of an
/// already-converted bold link.
pub struct MarkdownRenderer {
    h3: Regex,
    h2: Regex,
    h1: Regex,
    bold_link: Regex,
    link: Regex,
    bold: Regex,
}

impl MarkdownRenderer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            h3: compile(r"(?m)^### (.+)$")?,
            h2: compile(r"(?m)^## (.+)$")?,
            h1: compile(r"(?m)^# (.+)$")?,
            bold_link: compile(r"\*\*\[([^\]]+)\]\(([^)]+)\)\*\*")?,
            link: compile(r"\[([^\]]+)\]\(([^)]+)\)")?,
            bold: compile(r"\*\*([^*]+)\*\*")?,
        })
    }

    pub fn render(&self, text: &str) -> String {
        let result = self
            .h3
            .replace_all(text, "<h3><strong>$1</strong></h3>")
            .into_owned();
        let result = self
            .h2
            .replace_all(&result, "<h2><strong>$1</strong></h2>")
            .into_owned();
        let result = self
            .h1
            .replace_all(&result, "<h1><strong>$1</strong></h1>")
            .into_owned();
        let result = self
            .bold_link
            .replace_all(
                &result,
                r#"<strong><a href="$2" target="_blank">$1</a></strong>"#,
            )
            .into_owned();
        let result = self
            .link
            .replace_all(&result, r#"<a href="$2" target="_blank">$1</a>"#)
            .into_owned();
        let result = self
            .bold
            .replace_all(&result, "<strong>$1</strong>")
            .into_owned();
        let result = result.replace('\n', "<br>");

        sanitize::sanitize_html(&result)
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::Internal(format!("Invalid markdown pattern: {e}")))
}
