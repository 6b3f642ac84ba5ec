//! List locators for repeated sections such as experience and education

use crate::extract::dom::{select_all, Scope};
use crate::extract::resolver::locate;
use crate::extract::strategy::Locator;
use scraper::ElementRef;
use std::collections::HashSet;

/// One way of finding the items of a list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListLocator {
    /// Items selected directly
    Css(String),

    /// Items under the nearest `<section>` enclosing the first `anchor` match
    Section { anchor: String, item: String },

    /// Items under the element reached by a structural path from `anchor`
    Path {
        anchor: String,
        path: String,
        item: String,
    },
}

/// A named list and its ordered locators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSpec {
    pub name: String,
    pub locators: Vec<ListLocator>,
}

impl ListSpec {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            locators: Vec::new(),
        }
    }

    pub fn css(mut self, css: &str) -> Self {
        self.locators.push(ListLocator::Css(css.to_string()));
        self
    }

    pub fn section(mut self, anchor: &str, item: &str) -> Self {
        self.locators.push(ListLocator::Section {
            anchor: anchor.to_string(),
            item: item.to_string(),
        });
        self
    }

    pub fn path(mut self, anchor: &str, path: &str, item: &str) -> Self {
        self.locators.push(ListLocator::Path {
            anchor: anchor.to_string(),
            path: path.to_string(),
            item: item.to_string(),
        });
        self
    }
}

/// Items of a list, from the first locator that finds any
///
/// Items nested inside another matched item are dropped so a grouped entry
/// counts once.
pub fn locate_items<'a>(scope: &Scope<'a>, spec: &ListSpec) -> Vec<ElementRef<'a>> {
    for locator in &spec.locators {
        let items = items_for(scope, locator).unwrap_or_default();
        if !items.is_empty() {
            let items = outermost(items);
            tracing::debug!("{}: {} items", spec.name, items.len());
            return items;
        }
    }
    tracing::debug!("{}: no items found", spec.name);
    Vec::new()
}

fn items_for<'a>(scope: &Scope<'a>, locator: &ListLocator) -> Option<Vec<ElementRef<'a>>> {
    match locator {
        ListLocator::Css(css) => scope.select(css),

        ListLocator::Section { anchor, item } => {
            let anchor_el = scope.select(anchor)?.into_iter().next()?;
            let container = if anchor_el.value().name() == "section" {
                anchor_el
            } else {
                anchor_el
                    .ancestors()
                    .filter_map(ElementRef::wrap)
                    .find(|e| e.value().name() == "section")?
            };
            select_all(container, item)
        }

        ListLocator::Path { anchor, path, item } => {
            let containers = locate(
                scope,
                &Locator::Path {
                    anchor: anchor.clone(),
                    path: path.clone(),
                },
            )?;
            let container = containers.into_iter().next()?;
            select_all(container, item)
        }
    }
}

fn outermost(items: Vec<ElementRef<'_>>) -> Vec<ElementRef<'_>> {
    let ids: HashSet<_> = items.iter().map(|e| e.id()).collect();
    items
        .into_iter()
        .filter(|e| !e.ancestors().any(|a| ids.contains(&a.id())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::dom::element_text;
    use scraper::Html;

    const PAGE: &str = r#"
        <html><body><main>
          <section>
            <div id="experience"></div>
            <ul>
              <li class="item"><b>Role A</b>
                <ul><li class="item"><b>Nested role</b></li></ul>
              </li>
              <li class="item"><b>Role B</b></li>
            </ul>
          </section>
          <section>
            <div id="education"></div>
            <ul><li class="item"><b>School</b></li></ul>
          </section>
          <div id="scroll-to-experience-section">
            <div><ul><li class="entry">Sales role</li><li class="entry">Older role</li></ul></div>
          </div>
        </main></body></html>
    "#;

    fn texts(spec: &ListSpec) -> Vec<String> {
        let doc = Html::parse_document(PAGE);
        let scope = Scope::document(&doc, None);
        locate_items(&scope, spec)
            .into_iter()
            .map(|e| element_text(e).lines().next().unwrap_or("").to_string())
            .collect()
    }

    #[test]
    fn test_section_anchor_scopes_items() {
        let spec = ListSpec::new("experience").section("#experience", "li.item");
        assert_eq!(texts(&spec), vec!["Role A", "Role B"]);

        let spec = ListSpec::new("education").section("#education", "li.item");
        assert_eq!(texts(&spec), vec!["School"]);
    }

    #[test]
    fn test_path_locator() {
        let spec =
            ListSpec::new("experience").path("#scroll-to-experience-section", "div/ul", "li.entry");
        assert_eq!(texts(&spec), vec!["Sales role", "Older role"]);
    }

    #[test]
    fn test_falls_through_to_next_locator() {
        let spec = ListSpec::new("experience")
            .section("#missing", "li")
            .css("li[[")
            .css("li.entry");
        assert_eq!(texts(&spec), vec!["Sales role", "Older role"]);
    }

    #[test]
    fn test_no_items() {
        let spec = ListSpec::new("experience").css("li.none");
        assert!(texts(&spec).is_empty());
    }
}
