use std::fmt;
use url::Url;

/// Page-layout family of a target URL
///
/// Each variant routes to its own set of field specifications because the two
/// layouts share almost no markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variant {
    /// Public profile page on the primary site
    Profile,
    /// Lead page inside the sales tool
    Sales,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Profile, Variant::Sales];

    /// Tag written into the `Variant` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Sales => "sales",
        }
    }

    pub fn from_tag(s: &str) -> Option<Self> {
        match s.trim() {
            "profile" => Some(Self::Profile),
            "sales" => Some(Self::Sales),
            _ => None,
        }
    }

    /// Human-readable name used in operator prompts
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Profile => "LinkedIn",
            Self::Sales => "Sales Navigator",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Layout family of a linked organization page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanyLayout {
    Profile,
    Sales,
}

/// Classifies a target URL into its page-layout variant
///
/// A URL belongs to the sales tool when any host label or any path segment is
/// exactly `sales`. Everything else, including strings that do not parse as a
/// URL, is a primary-site profile. The function is pure and deterministic.
///
/// # Examples
///
/// ```
/// use kumade::url::{classify, Variant};
///
/// assert_eq!(classify("https://www.linkedin.com/in/jane-doe/"), Variant::Profile);
/// assert_eq!(classify("https://www.linkedin.com/sales/lead/ACw,NAME"), Variant::Sales);
/// ```
pub fn classify(url: &str) -> Variant {
    let Ok(parsed) = Url::parse(url.trim()) else {
        return Variant::Profile;
    };

    let host_is_sales = parsed
        .host_str()
        .map(|host| host.split('.').any(|label| label.eq_ignore_ascii_case("sales")))
        .unwrap_or(false);

    if host_is_sales || path_segments(&parsed).any(|s| s.eq_ignore_ascii_case("sales")) {
        Variant::Sales
    } else {
        Variant::Profile
    }
}

/// Classifies an organization URL discovered on a profile page
///
/// Sales-tool company pages live under `/sales/company/`.
pub fn classify_company(url: &str) -> CompanyLayout {
    let Ok(parsed) = Url::parse(url.trim()) else {
        return CompanyLayout::Profile;
    };

    let segments: Vec<&str> = path_segments(&parsed).collect();
    let is_sales = segments
        .windows(2)
        .any(|pair| pair[0].eq_ignore_ascii_case("sales") && pair[1].eq_ignore_ascii_case("company"));

    if is_sales {
        CompanyLayout::Sales
    } else {
        CompanyLayout::Profile
    }
}

fn path_segments(url: &Url) -> impl Iterator<Item = &str> {
    url.path_segments()
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_urls() {
        assert_eq!(classify("https://www.linkedin.com/in/jane-doe/"), Variant::Profile);
        assert_eq!(classify("https://linkedin.com/in/jane"), Variant::Profile);
        assert_eq!(classify("http://www.linkedin.com/in/x?trk=1"), Variant::Profile);
    }

    #[test]
    fn test_sales_urls() {
        assert_eq!(
            classify("https://www.linkedin.com/sales/lead/ACwAAA,NAME_SEARCH,abc"),
            Variant::Sales
        );
        assert_eq!(classify("https://sales.example.com/people/1"), Variant::Sales);
        assert_eq!(classify("https://www.linkedin.com/SALES/people/1"), Variant::Sales);
    }

    #[test]
    fn test_sales_substring_is_not_a_segment() {
        assert_eq!(
            classify("https://www.linkedin.com/in/salesperson-of-the-year"),
            Variant::Profile
        );
        assert_eq!(classify("https://wholesales.example.com/in/x"), Variant::Profile);
    }

    #[test]
    fn test_unparseable_defaults_to_profile() {
        assert_eq!(classify("not a url"), Variant::Profile);
        assert_eq!(classify(""), Variant::Profile);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let urls = [
            "https://www.linkedin.com/in/jane",
            "https://www.linkedin.com/sales/lead/1",
            "garbage",
        ];
        for url in urls {
            let first = classify(url);
            for _ in 0..10 {
                assert_eq!(classify(url), first);
            }
        }
    }

    #[test]
    fn test_variant_tags() {
        for variant in Variant::ALL {
            assert_eq!(Variant::from_tag(variant.as_str()), Some(variant));
        }
        assert_eq!(Variant::from_tag("unknown"), None);
    }

    #[test]
    fn test_classify_company() {
        assert_eq!(
            classify_company("https://www.linkedin.com/sales/company/1234"),
            CompanyLayout::Sales
        );
        assert_eq!(
            classify_company("https://www.linkedin.com/company/acme/"),
            CompanyLayout::Profile
        );
        assert_eq!(classify_company("nope"), CompanyLayout::Profile);
    }
}
