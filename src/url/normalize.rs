use url::Url;

/// Recognized scheme prefixes for target URLs
const ACCEPTED_PREFIXES: &[&str] = &["http://", "https://"];

/// Cleans a raw cell value from the input table
///
/// Surrounding whitespace and stray quote characters are removed. Commas are
/// part of the value: sales lead URLs carry them in their last path segment.
///
/// # Examples
///
/// ```
/// use kumade::url::clean_input_value;
///
/// assert_eq!(clean_input_value("  \"https://x.com/in/a\" "), "https://x.com/in/a");
/// assert_eq!(
///     clean_input_value("https://x.com/sales/lead/ACw1,NAME_SEARCH,x9"),
///     "https://x.com/sales/lead/ACw1,NAME_SEARCH,x9"
/// );
/// ```
pub fn clean_input_value(raw: &str) -> &str {
    raw.trim().trim_matches(|c| c == '"' || c == '\'').trim()
}

/// Returns true if the value starts with a recognized scheme prefix
pub fn is_http_url(value: &str) -> bool {
    let lower = value.trim_start().to_ascii_lowercase();
    ACCEPTED_PREFIXES.iter().any(|p| lower.starts_with(p))
}

/// Resolves an href against the page it was found on
///
/// Returns None for empty hrefs, fragment-only links, non-navigational schemes
/// and anything that does not resolve to an http(s) URL.
pub fn absolutize(href: &str, base: Option<&Url>) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:") || href.starts_with("data:") {
        return None;
    }

    let resolved = match Url::parse(href) {
        Ok(url) => url,
        Err(::url::ParseError::RelativeUrlWithoutBase) => base?.join(href).ok()?,
        Err(_) => return None,
    };

    if resolved.scheme() == "http" || resolved.scheme() == "https" {
        Some(resolved.to_string())
    } else {
        None
    }
}
