//! Declarative extraction strategies
//!
//! A [`FieldSpec`] is an ordered list of [`ExtractionStrategy`] values. Each
//! strategy names how to locate nodes, how to read a string from them, the
//! transforms applied to that string and the predicates it must satisfy.

use crate::url::absolutize;
use regex::Regex;
use url::Url;

/// Values shorter than this (in characters, after trimming) are rejected
pub const MIN_VALUE_LEN: usize = 2;

/// How matching nodes are located
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// A CSS selector
    Css(String),

    /// Elements matching `css` whose text contains `needle`, ignoring case
    Text { css: String, needle: String },

    /// Walks child steps such as `section[1]/div[2]/h1` from each `anchor` match
    ///
    /// Steps count 1-based among same-tag element children.
    Path { anchor: String, path: String },

    /// Elements matching `css` whose `attr` value matches `pattern`
    AttrPattern {
        css: String,
        attr: String,
        pattern: String,
    },
}

/// How a string is read from the located nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Read {
    /// Text of the first node
    Text,

    /// Text of the first node whose processed value is accepted
    FirstValid,

    /// Text of every node, joined; repeated adjacent values are dropped
    Joined(String),

    /// The first attribute value that is accepted after processing
    Attr(String),

    /// Distinct accepted attribute values, joined, up to `limit`
    AttrAll {
        attr: String,
        separator: String,
        limit: usize,
    },

    /// Distinct `text|href` pairs for links, joined, up to `limit`
    LabelledLinks { separator: String, limit: usize },
}

/// Post-processing applied to a read value, in declared order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform {
    Trim,

    /// Removes every match of a regular expression
    StripRegex(String),

    /// Removes every occurrence of a literal substring
    Remove(String),

    /// Removes a prefix, ignoring ASCII case
    StripPrefix(String),

    /// Keeps the text before the first occurrence of a delimiter
    Before(String),

    /// Keeps the first non-empty line
    FirstLine,

    /// Trims paragraphs, drops empty ones and rejoins them with a blank line
    Paragraphs,

    /// Resolves a link against the page URL
    Absolutize,
}

/// A predicate the final value must satisfy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accept {
    /// At least this many characters
    MinLen(usize),

    /// Contains at least one of these substrings
    ContainsAny(Vec<String>),

    /// Contains none of these substrings
    ContainsNone(Vec<String>),

    /// Contains an ASCII digit
    HasDigit,
}

/// One named rule for producing a field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionStrategy {
    pub name: String,
    pub locator: Locator,
    pub read: Read,
    pub transforms: Vec<Transform>,
    pub accept: Vec<Accept>,
}

/// A field name and its ordered strategies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub strategies: Vec<ExtractionStrategy>,
}

impl Locator {
    /// A short human-readable description used as a default strategy name
    pub fn describe(&self) -> String {
        match self {
            Self::Css(css) => css.clone(),
            Self::Text { css, needle } => format!("{} ~ \"{}\"", css, needle),
            Self::Path { anchor, path } => format!("{} / {}", anchor, path),
            Self::AttrPattern { css, attr, pattern } => {
                format!("{}[{} =~ /{}/]", css, attr, pattern)
            }
        }
    }
}

impl ExtractionStrategy {
    pub fn new(locator: Locator) -> Self {
        Self {
            name: locator.describe(),
            locator,
            read: Read::Text,
            transforms: Vec::new(),
            accept: Vec::new(),
        }
    }

    /// Text of the first element matching `css`
    pub fn css(css: &str) -> Self {
        Self::new(Locator::Css(css.to_string()))
    }

    /// Elements matching `css` whose text contains `needle`
    pub fn text(css: &str, needle: &str) -> Self {
        Self::new(Locator::Text {
            css: css.to_string(),
            needle: needle.to_string(),
        })
    }

    /// A structural path below `anchor`
    pub fn path(anchor: &str, path: &str) -> Self {
        Self::new(Locator::Path {
            anchor: anchor.to_string(),
            path: path.to_string(),
        })
    }

    /// Elements matching `css` whose `attr` matches `pattern`
    pub fn attr_pattern(css: &str, attr: &str, pattern: &str) -> Self {
        Self::new(Locator::AttrPattern {
            css: css.to_string(),
            attr: attr.to_string(),
            pattern: pattern.to_string(),
        })
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn read(mut self, read: Read) -> Self {
        self.read = read;
        self
    }

    /// Reads the first accepted value of `attr`
    pub fn attr(self, attr: &str) -> Self {
        self.read(Read::Attr(attr.to_string()))
    }

    /// Reads the first node whose value is accepted
    pub fn first_valid(self) -> Self {
        self.read(Read::FirstValid)
    }

    /// Joins the text of every match
    pub fn joined(self, separator: &str) -> Self {
        self.read(Read::Joined(separator.to_string()))
    }

    pub fn then(mut self, transform: Transform) -> Self {
        self.transforms.push(transform);
        self
    }

    pub fn accept(mut self, accept: Accept) -> Self {
        self.accept.push(accept);
        self
    }

    /// Rejects values shorter than `len` characters
    pub fn min_len(self, len: usize) -> Self {
        self.accept(Accept::MinLen(len))
    }

    pub fn containing_any(self, needles: &[&str]) -> Self {
        self.accept(Accept::ContainsAny(to_strings(needles)))
    }

    pub fn containing_none(self, needles: &[&str]) -> Self {
        self.accept(Accept::ContainsNone(to_strings(needles)))
    }
}

impl FieldSpec {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            strategies: Vec::new(),
        }
    }

    /// Appends a strategy after the existing ones
    pub fn with(mut self, strategy: ExtractionStrategy) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// A field with one plain CSS strategy per selector, in order
    pub fn from_selectors(name: &str, selectors: &[&str]) -> Self {
        selectors
            .iter()
            .fold(Self::new(name), |spec, css| spec.with(ExtractionStrategy::css(css)))
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl Transform {
    /// Applies the transform; None means the strategy missed
    pub fn apply(&self, value: String, base: Option<&Url>) -> Option<String> {
        let out = match self {
            Self::Trim => value.trim().to_string(),
            Self::StripRegex(pattern) => match Regex::new(pattern) {
                Ok(re) => re.replace_all(&value, "").into_owned(),
                Err(e) => {
                    tracing::trace!("Invalid pattern '{}': {}", pattern, e);
                    return None;
                }
            },
            Self::Remove(needle) => value.replace(needle.as_str(), ""),
            Self::StripPrefix(prefix) => {
                let trimmed = value.trim_start();
                match trimmed.get(..prefix.len()) {
                    Some(head) if head.eq_ignore_ascii_case(prefix) => {
                        trimmed[prefix.len()..].to_string()
                    }
                    _ => trimmed.to_string(),
                }
            }
            Self::Before(delimiter) => match value.find(delimiter.as_str()) {
                Some(idx) => value[..idx].to_string(),
                None => value,
            },
            Self::FirstLine => value
                .lines()
                .map(str::trim)
                .find(|l| !l.is_empty())
                .unwrap_or("")
                .to_string(),
            Self::Paragraphs => normalize_paragraphs(&value),
            Self::Absolutize => absolutize(&value, base)?,
        };
        Some(out)
    }
}

/// Trims paragraphs, drops empty ones and separates the rest by a blank line
pub fn normalize_paragraphs(text: &str) -> String {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }

    paragraphs.join("\n\n")
}

impl Accept {
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Self::MinLen(len) => value.chars().count() >= *len,
            Self::ContainsAny(needles) => needles.iter().any(|n| value.contains(n.as_str())),
            Self::ContainsNone(needles) => !needles.iter().any(|n| value.contains(n.as_str())),
            Self::HasDigit => value.chars().any(|c| c.is_ascii_digit()),
        }
    }
}

/// Applies transforms then acceptance checks to a raw value
pub fn finish(strategy: &ExtractionStrategy, raw: String, base: Option<&Url>) -> Option<String> {
    let mut value = raw;
    for transform in &strategy.transforms {
        value = transform.apply(value, base)?;
    }

    let value = value.trim();
    if value.chars().count() < MIN_VALUE_LEN {
        return None;
    }
    if strategy.accept.iter().all(|a| a.accepts(value)) {
        Some(value.to_string())
    } else {
        None
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
