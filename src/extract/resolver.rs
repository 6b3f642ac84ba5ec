//! Field resolution
//!
//! One algorithm serves every field: try each strategy in order and return
//! the first value that survives its transforms and acceptance checks. A
//! strategy that finds nothing, or whose selector or pattern is invalid, is
//! simply skipped. Resolution never fails; an unresolved field is empty.

use crate::extract::dom::{element_text, normalize_text, Scope};
use crate::extract::strategy::{finish, ExtractionStrategy, FieldSpec, Locator, Read};
use crate::url::absolutize;
use regex::Regex;
use scraper::ElementRef;

/// The outcome of resolving one field, with instrumentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The resolved value, empty when every strategy missed
    pub value: String,

    /// 0-based index of the strategy that produced the value
    pub winner: Option<usize>,

    /// Number of strategies tried
    pub attempted: usize,
}

/// Resolves a field against a scope
///
/// # Returns
///
/// The first accepted strategy value, or an empty string.
pub fn resolve(scope: &Scope<'_>, spec: &FieldSpec) -> String {
    resolve_traced(scope, spec).value
}

/// Resolves a field and reports which strategy won
pub fn resolve_traced(scope: &Scope<'_>, spec: &FieldSpec) -> Resolution {
    for (idx, strategy) in spec.strategies.iter().enumerate() {
        match apply_strategy(scope, strategy) {
            Some(value) => {
                tracing::debug!(
                    "{}: resolved by strategy {} ({})",
                    spec.name,
                    idx,
                    strategy.name
                );
                return Resolution {
                    value,
                    winner: Some(idx),
                    attempted: idx + 1,
                };
            }
            None => {
                tracing::trace!("{}: strategy '{}' missed", spec.name, strategy.name);
            }
        }
    }

    tracing::debug!("{}: no strategy matched", spec.name);
    Resolution {
        value: String::new(),
        winner: None,
        attempted: spec.strategies.len(),
    }
}

/// Runs a single strategy, returning its accepted value
pub fn apply_strategy(scope: &Scope<'_>, strategy: &ExtractionStrategy) -> Option<String> {
    let nodes = locate(scope, &strategy.locator)?;
    if nodes.is_empty() {
        return None;
    }
    let base = scope.base();

    match &strategy.read {
        Read::Text => finish(strategy, element_text(nodes[0]), base),

        Read::FirstValid => nodes
            .iter()
            .find_map(|node| finish(strategy, element_text(*node), base)),

        Read::Joined(separator) => {
            let mut parts: Vec<String> = Vec::new();
            for node in &nodes {
                let text = element_text(*node);
                if text.is_empty() || parts.last() == Some(&text) {
                    continue;
                }
                parts.push(text);
            }
            finish(strategy, parts.join(separator), base)
        }

        Read::Attr(attr) => nodes.iter().find_map(|node| {
            let value = node.value().attr(attr)?;
            finish(strategy, normalize_text(value), base)
        }),

        Read::AttrAll {
            attr,
            separator,
            limit,
        } => {
            let mut values: Vec<String> = Vec::new();
            for node in &nodes {
                if values.len() >= *limit {
                    break;
                }
                let Some(raw) = node.value().attr(attr) else {
                    continue;
                };
                if let Some(value) = finish(strategy, normalize_text(raw), base) {
                    if !values.contains(&value) {
                        values.push(value);
                    }
                }
            }
            non_empty(values.join(separator))
        }

        Read::LabelledLinks { separator, limit } => {
            let mut pairs: Vec<String> = Vec::new();
            for node in &nodes {
                if pairs.len() >= *limit {
                    break;
                }
                let Some(label) = finish(strategy, element_text(*node), base) else {
                    continue;
                };
                let Some(href) = node.value().attr("href").and_then(|h| absolutize(h, base))
                else {
                    continue;
                };
                let pair = format!("{}|{}", label, href);
                if !pairs.contains(&pair) {
                    pairs.push(pair);
                }
            }
            non_empty(pairs.join(separator))
        }
    }
}

/// Finds the nodes a locator selects, or None when it cannot be evaluated
pub fn locate<'a>(scope: &Scope<'a>, locator: &Locator) -> Option<Vec<ElementRef<'a>>> {
    match locator {
        Locator::Css(css) => scope.select(css),

        Locator::Text { css, needle } => {
            let needle = needle.to_lowercase();
            let nodes = scope.select(css)?;
            Some(
                nodes
                    .into_iter()
                    .filter(|node| element_text(*node).to_lowercase().contains(&needle))
                    .collect(),
            )
        }

        Locator::Path { anchor, path } => {
            let steps = parse_path(path)?;
            let anchors = scope.select(anchor)?;
            Some(
                anchors
                    .into_iter()
                    .filter_map(|a| walk_path(a, &steps))
                    .collect(),
            )
        }

        Locator::AttrPattern { css, attr, pattern } => {
            let re = match Regex::new(pattern) {
                Ok(re) => re,
                Err(e) => {
                    tracing::trace!("Invalid pattern '{}': {}", pattern, e);
                    return None;
                }
            };
            let nodes = scope.select(css)?;
            Some(
                nodes
                    .into_iter()
                    .filter(|node| node.value().attr(attr).is_some_and(|v| re.is_match(v)))
                    .collect(),
            )
        }
    }
}

/// One structural step: the `nth` (1-based) element child named `tag`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathStep {
    pub tag: String,
    pub nth: usize,
}

/// Parses `section[1]/div[2]/h1` into steps; a bare tag means `[1]`
///
/// Returns None for malformed paths.
pub fn parse_path(path: &str) -> Option<Vec<PathStep>> {
    let mut steps = Vec::new();
    for part in path.split('/').map(str::trim).filter(|p| !p.is_empty()) {
        let (tag, nth) = match part.split_once('[') {
            Some((tag, rest)) => {
                let n = rest.strip_suffix(']')?.trim().parse::<usize>().ok()?;
                (tag.trim(), n)
            }
            None => (part, 1),
        };
        if tag.is_empty() || nth == 0 {
            tracing::trace!("Invalid path step '{}'", part);
            return None;
        }
        steps.push(PathStep {
            tag: tag.to_ascii_lowercase(),
            nth,
        });
    }
    if steps.is_empty() {
        None
    } else {
        Some(steps)
    }
}

fn walk_path<'a>(anchor: ElementRef<'a>, steps: &[PathStep]) -> Option<ElementRef<'a>> {
    let mut current = anchor;
    for step in steps {
        current = current
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|child| step.tag == "*" || child.value().name() == step.tag)
            .nth(step.nth - 1)?;
    }
    Some(current)
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
