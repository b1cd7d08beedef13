// Sanitization utilities
use ammonia;

/// Sanitize HTML content using ammonia for comprehensive XSS protection.
/// `target` is kept on anchors so rendered links open in a new tab.
pub fn sanitize_html(text: &str) -> String {
    let mut builder = ammonia::Builder::default();
    builder.add_tag_attributes("a", &["target"]);
    builder.clean(text).to_string()
}
