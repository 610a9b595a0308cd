// SVG2Icon - core/validate.rs
//
// Lightweight content checks on user-supplied SVG before it is rendered.
// Not a sanitiser: it reports problems, it does not rewrite the document.

use regex::Regex;
use std::sync::OnceLock;

/// Outcome of validating one SVG document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SvgValidation {
    /// Problems that should stop generation unless forced.
    pub errors: Vec<String>,

    /// Problems that are reported but do not block generation.
    pub warnings: Vec<String>,
}

impl SvgValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

struct Patterns {
    script: Regex,
    event_handler: Regex,
    external_href: Regex,
    svg_open: Regex,
    svg_close: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        script: compile(r"(?is)<script\b"),
        event_handler: compile(r"(?i)\b(?:onclick|onload|onerror|onmouseover)\s*="),
        external_href: compile(r#"(?i)(?:xlink:)?href\s*=\s*["'](?:[a-z][a-z0-9+.-]*:|//)"#),
        svg_open: compile(r"(?i)<svg\b[^>]*>"),
        svg_close: compile(r"(?i)</svg\s*>"),
    })
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in validation pattern must compile")
}

/// Check SVG text for active content and structural problems.
///
/// Errors: `<script>` elements, inline event handlers, a missing `<svg>` tag.
/// Warnings: external `href`/`xlink:href` references (other than `data:`),
/// a missing `</svg>` close tag.
pub fn validate_svg(content: &str) -> SvgValidation {
    let p = patterns();
    let mut report = SvgValidation::default();

    if p.script.is_match(content) {
        report
            .errors
            .push("SVG contains script tags which are not allowed for security reasons".to_string());
    }

    if p.event_handler.is_match(content) {
        report.errors.push(
            "SVG contains event handlers which are not allowed for security reasons".to_string(),
        );
    }

    if !p.svg_open.is_match(content) {
        report
            .errors
            .push("Content does not appear to be a valid SVG (missing <svg> tag)".to_string());
    }

    let has_external = p.external_href.find_iter(content).any(|m| {
        let value = m.as_str().to_ascii_lowercase();
        !value.ends_with("data:")
    });
    if has_external {
        report.warnings.push(
            "SVG contains external references which may not render in all contexts".to_string(),
        );
    }

    if !p.svg_close.is_match(content) {
        report
            .warnings
            .push("SVG may be incomplete (missing closing </svg> tag)".to_string());
    }

    report
}

/// Validate raw bytes; non-UTF-8 input is checked lossily.
pub fn validate_svg_bytes(bytes: &[u8]) -> SvgValidation {
    validate_svg(&String::from_utf8_lossy(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_svg_passes() {
        let report = validate_svg(r#"<svg xmlns="http://www.w3.org/2000/svg"><rect/></svg>"#);
        assert!(report.is_valid());
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    }

    #[test]
    fn test_script_is_error() {
        let report = validate_svg("<svg><SCRIPT>alert(1)</SCRIPT></svg>");
        assert!(!report.is_valid());
        assert!(report.errors[0].contains("script"));
    }

    #[test]
    fn test_event_handler_is_error() {
        let report = validate_svg(r#"<svg onload="x()"></svg>"#);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("event handlers"));
    }

    #[test]
    fn test_missing_root_is_error() {
        let report = validate_svg("<html></html>");
        assert!(report.errors.iter().any(|e| e.contains("missing <svg> tag")));
    }

    #[test]
    fn test_external_reference_is_warning() {
        let report = validate_svg(
            r#"<svg><image xlink:href="https://example.com/a.png"/></svg>"#,
        );
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_internal_and_data_references_are_fine() {
        let report = validate_svg(
            r##"<svg><use xlink:href="#a"/><image href="data:image/png;base64,AAAA"/></svg>"##,
        );
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    }

    #[test]
    fn test_unclosed_svg_is_warning() {
        let report = validate_svg(r#"<svg xmlns="http://www.w3.org/2000/svg">"#);
        assert!(report.is_valid());
        assert!(report.warnings[0].contains("</svg>"));
    }
}
