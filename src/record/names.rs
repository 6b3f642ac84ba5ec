/// Location split into its administrative parts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationParts {
    pub city: String,
    pub state: String,
    pub country: String,
}

/// Splits a full name on the first whitespace run
///
/// # Examples
///
/// ```
/// use kumade::record::split_name;
///
/// assert_eq!(split_name("Jane  van Doe"), ("Jane", "van Doe"));
/// assert_eq!(split_name("Cher"), ("Cher", ""));
/// ```
pub fn split_name(full: &str) -> (&str, &str) {
    let full = full.trim();
    match full.find(char::is_whitespace) {
        Some(idx) => (&full[..idx], full[idx..].trim()),
        None => (full, ""),
    }
}

/// Splits a comma-separated location
///
/// Three parts map to city, state and country; two to city and country; one to
/// country. With more than three parts the first is the city, the last is the
/// country and the middle parts are joined as the state.
pub fn split_location(location: &str) -> LocationParts {
    let parts: Vec<&str> = location
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    match parts.as_slice() {
        [] => LocationParts::default(),
        [country] => LocationParts {
            country: country.to_string(),
            ..LocationParts::default()
        },
        [city, country] => LocationParts {
            city: city.to_string(),
            state: String::new(),
            country: country.to_string(),
        },
        [city, middle @ .., country] => LocationParts {
            city: city.to_string(),
            state: middle.join(", "),
            country: country.to_string(),
        },
    }
}
