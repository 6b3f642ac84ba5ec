//! Reveal actions
//!
//! Some content only renders after a "show more" style toggle is clicked.
//! A reveal action clicks the first trigger present on the page and pauses so
//! the expanded content can render. A page without any trigger is not an
//! error; the caller simply reads what is already there.

use crate::browser::PageDriver;
use std::time::Duration;

/// One clickable element that reveals content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub css: String,
    /// Case-insensitive text the element must contain
    pub text: Option<String>,
}

/// Ordered triggers for one piece of hidden content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealAction {
    pub name: String,
    pub triggers: Vec<Trigger>,
}

impl RevealAction {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            triggers: Vec::new(),
        }
    }

    pub fn css(mut self, css: &str) -> Self {
        self.triggers.push(Trigger {
            css: css.to_string(),
            text: None,
        });
        self
    }

    pub fn text(mut self, css: &str, text: &str) -> Self {
        self.triggers.push(Trigger {
            css: css.to_string(),
            text: Some(text.to_string()),
        });
        self
    }

    /// Clicks the first present trigger, then waits `settle`
    ///
    /// # Returns
    ///
    /// `true` when a trigger was clicked.
    pub async fn run(&self, driver: &dyn PageDriver, settle: Duration) -> bool {
        for trigger in &self.triggers {
            match driver.click(&trigger.css, trigger.text.as_deref()).await {
                Ok(true) => {
                    tracing::debug!("{}: clicked '{}'", self.name, trigger.css);
                    if !settle.is_zero() {
                        tokio::time::sleep(settle).await;
                    }
                    return true;
                }
                Ok(false) => {
                    tracing::trace!("{}: trigger '{}' not present", self.name, trigger.css);
                }
                Err(e) => {
                    tracing::trace!("{}: trigger '{}' failed: {}", self.name, trigger.css, e);
                }
            }
        }
        tracing::debug!("{}: nothing to reveal", self.name);
        false
    }
}
