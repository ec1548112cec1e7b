use regex::Regex;
use std::sync::OnceLock;

pub const PLACEHOLDER: &str = "/placeholder.svg";
const INTERNAL_PREFIX: &str = "/api/images/";
const CLOUDINARY_HOST: &str = "res.cloudinary.com";

fn hex24() -> &'static Regex {
    static HEX24: OnceLock<Regex> = OnceLock::new();
    HEX24.get_or_init(|| Regex::new(r"^[a-f0-9]{24}$").expect("Failed to compile hex id regex"))
}

/// True when the reference is a bare content-store object id.
pub fn is_object_id(reference: &str) -> bool {
    hex24().is_match(&reference.to_ascii_lowercase())
}

/// Resolve a stored image reference into a fetchable URL.
///
/// Total over string input and pure: it runs during render and must never
/// touch the environment or fail. Falsy input falls back to the placeholder;
/// everything else maps to exactly one of the known reference shapes.
pub fn resolve(reference: &str) -> String {
    if reference.is_empty() {
        return PLACEHOLDER.to_string();
    }

    // External host URLs pass through untouched.
    if reference.contains(CLOUDINARY_HOST) || reference.starts_with("http") {
        return reference.to_string();
    }

    // Bare content-store object id.
    if is_object_id(reference) {
        return format!("{INTERNAL_PREFIX}{reference}");
    }

    // Legacy static path: the last segment may be an object id that was
    // prefixed with /images/ by an old migration.
    if let Some(rest) = reference.strip_prefix("/images/") {
        if let Some(filename) = rest.rsplit('/').next() {
            if is_object_id(filename) {
                return format!("{INTERNAL_PREFIX}{filename}");
            }
        }
        return reference.to_string();
    }

    // Bare relative filename.
    if !reference.starts_with('/') {
        return format!("/{reference}");
    }

    reference.to_string()
}

/// Extract the content-store id from a direct or legacy reference.
pub fn extract_object_id(reference: &str) -> Option<&str> {
    if reference.is_empty() {
        return None;
    }
    if is_object_id(reference) {
        return Some(reference);
    }
    if reference.contains('/') {
        let filename = reference.rsplit('/').next()?;
        if is_object_id(filename) {
            return Some(filename);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const OBJECT_ID: &str = "64a1b2c3d4e5f6a7b8c9d0e1";

    #[test]
    fn empty_input_returns_placeholder() {
        assert_eq!(resolve(""), PLACEHOLDER);
    }

    #[test]
    fn absolute_urls_pass_through() {
        assert_eq!(resolve("https://example.com/a.jpg"), "https://example.com/a.jpg");
        assert_eq!(resolve("http://example.com/a.jpg"), "http://example.com/a.jpg");
    }

    #[test]
    fn cloudinary_urls_pass_through() {
        let url = "https://res.cloudinary.com/demo/image/upload/v1/coffee.jpg";
        assert_eq!(resolve(url), url);
    }

    #[test]
    fn object_id_maps_to_internal_endpoint() {
        assert_eq!(resolve(OBJECT_ID), format!("/api/images/{OBJECT_ID}"));
    }

    #[test]
    fn object_id_is_case_insensitive() {
        let upper = OBJECT_ID.to_uppercase();
        assert_eq!(resolve(&upper), format!("/api/images/{upper}"));
    }

    #[test]
    fn legacy_path_with_object_id_is_rewritten() {
        let legacy = format!("/images/products/{OBJECT_ID}");
        assert_eq!(resolve(&legacy), format!("/api/images/{OBJECT_ID}"));
    }

    #[test]
    fn legacy_path_without_object_id_passes_through() {
        assert_eq!(resolve("/images/hero.png"), "/images/hero.png");
    }

    #[test]
    fn bare_filename_gets_root_prefix() {
        assert_eq!(resolve("coffee.png"), "/coffee.png");
    }

    #[test]
    fn resolver_is_idempotent() {
        let legacy = format!("/images/products/{OBJECT_ID}");
        let inputs: [&str; 6] = [
            "",
            OBJECT_ID,
            "https://res.cloudinary.com/demo/image/upload/x.jpg",
            "/images/hero.png",
            "coffee.png",
            legacy.as_str(),
        ];
        for input in inputs {
            let once = resolve(input);
            assert_eq!(resolve(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn resolver_is_total_and_non_empty() {
        for input in ["", "x", "/", "абв", "not-hex-but-24-chars-xx", "   "] {
            assert!(!resolve(input).is_empty());
        }
    }

    #[test]
    fn extract_handles_direct_and_legacy_shapes() {
        assert_eq!(extract_object_id(OBJECT_ID), Some(OBJECT_ID));
        let legacy = format!("/images/products/{OBJECT_ID}");
        assert_eq!(extract_object_id(&legacy), Some(OBJECT_ID));
        assert_eq!(extract_object_id("/images/hero.png"), None);
        assert_eq!(extract_object_id(""), None);
    }
}
