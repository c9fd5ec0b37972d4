//! Shields.io badge markdown.

/// Renders shields.io badges as markdown images wrapped in links.
#[derive(Debug, Clone)]
pub struct BadgeFormatter {
    base_url: String,
}

impl Default for BadgeFormatter {
    fn default() -> Self {
        Self {
            base_url: "https://img.shields.io/badge".to_string(),
        }
    }
}

impl BadgeFormatter {
    /// Create a formatter using the public shields.io endpoint.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different badge service endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Badge image URL for `label`, `message` and `color`.
    #[must_use]
    pub fn image_url(&self, label: &str, message: &str, color: &str) -> String {
        format!(
            "{}/{}-{}-{}.svg",
            self.base_url,
            escape(label),
            escape(message),
            color
        )
    }

    /// Badge image linking to `link`, or a bare image when `link` is empty.
    #[must_use]
    pub fn badge(&self, label: &str, message: &str, color: &str, link: &str) -> String {
        let image = format!("![{label}]({})", self.image_url(label, message, color));
        if link.is_empty() {
            image
        } else {
            format!("[{image}]({link})")
        }
    }
}

/// Shields.io path escaping: dashes and underscores are doubled, spaces become underscores.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '-' => out.push_str("--"),
            '_' => out.push_str("__"),
            ' ' => out.push('_'),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_markdown() {
        let badge = BadgeFormatter::new().badge(
            "Bintray",
            "1.1.0",
            "green",
            "https://bintray.com/org/repo",
        );
        assert_eq!(
            badge,
            "[![Bintray](https://img.shields.io/badge/Bintray-1.1.0-green.svg)](https://bintray.com/org/repo)"
        );
    }

    #[test]
    fn test_badge_without_link() {
        let badge = BadgeFormatter::new().badge("contributors", "2", "blue", "");
        assert_eq!(
            badge,
            "![contributors](https://img.shields.io/badge/contributors-2-blue.svg)"
        );
    }

    #[test]
    fn test_badge_escaping() {
        let url = BadgeFormatter::new().image_url("maven central", "2.0.0-beta_1", "blue");
        assert_eq!(
            url,
            "https://img.shields.io/badge/maven_central-2.0.0--beta__1-blue.svg"
        );
    }

    #[test]
    fn test_custom_base_url() {
        let url = BadgeFormatter::new()
            .with_base_url("https://badges.example.com/")
            .image_url("contributors", "3", "blue");
        assert_eq!(url, "https://badges.example.com/contributors-3-blue.svg");
    }
}
