//! Header text placed above generated release notes.

/// Attribution line appended by [`AttributionHeader`].
pub const ATTRIBUTION: &str =
    "*Release notes were automatically generated by [shipkit](https://github.com/shipkit/shipkit)*";

/// Supplies the pre-rendered header of a release notes section.
pub trait HeaderProvider {
    /// Render the header from the configured header text.
    fn header(&self, configured: &str) -> String;
}

/// Uses the configured header verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfiguredHeader;

impl HeaderProvider for ConfiguredHeader {
    fn header(&self, configured: &str) -> String {
        configured.to_string()
    }
}

/// Configured header followed by an attribution line.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributionHeader;

impl HeaderProvider for AttributionHeader {
    fn header(&self, configured: &str) -> String {
        let configured = configured.trim_end();
        if configured.is_empty() {
            format!("{ATTRIBUTION}\n\n")
        } else {
            format!("{configured}\n\n{ATTRIBUTION}\n\n")
        }
    }
}
