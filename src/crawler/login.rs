//! Manual login gate
//!
//! Before any profile is visited the operator logs in by hand in the browser
//! window. The run blocks until the operator acknowledges on the console.

use crate::url::{classify, Variant};
use crate::{KumadeError, Result};
use async_trait::async_trait;
use std::io::BufRead;

/// Source of the "login completed" acknowledgement
#[async_trait(?Send)]
pub trait LoginGate {
    /// Blocks until the operator confirms they are logged in for `variant`
    async fn wait_for_login(&self, variant: Variant) -> Result<()>;
}

/// Prompts on stdout and waits for Enter on stdin
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleGate;

#[async_trait(?Send)]
impl LoginGate for ConsoleGate {
    async fn wait_for_login(&self, variant: Variant) -> Result<()> {
        println!();
        println!("=== {} login ===", variant.display_name());
        println!("Log in to {} in the browser window.", variant.display_name());
        println!("Press Enter here once you are logged in...");

        let read = tokio::task::spawn_blocking(|| {
            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line).map(|n| (n, line))
        })
        .await
        .map_err(|e| KumadeError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;

        match read? {
            (0, _) => Err(KumadeError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "stdin closed before login was confirmed",
            ))),
            _ => {
                println!("✓ Continuing with {}", variant.display_name());
                Ok(())
            }
        }
    }
}

/// A gate that is already open, for sessions that are logged in up front
#[derive(Debug, Default, Clone, Copy)]
pub struct PreAuthenticated;

#[async_trait(?Send)]
impl LoginGate for PreAuthenticated {
    async fn wait_for_login(&self, variant: Variant) -> Result<()> {
        tracing::debug!("Skipping {} login prompt", variant.display_name());
        Ok(())
    }
}

/// Variants that need a login, in prompt order: sales tool first
pub fn login_order(urls: &[String]) -> Vec<Variant> {
    let has = |v: Variant| urls.iter().any(|u| classify(u) == v);
    [Variant::Sales, Variant::Profile]
        .into_iter()
        .filter(|v| has(*v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_login_order_sales_first() {
        let order = login_order(&urls(&[
            "https://www.linkedin.com/in/jane",
            "https://www.linkedin.com/sales/lead/ACw1",
        ]));
        assert_eq!(order, vec![Variant::Sales, Variant::Profile]);
    }

    #[test]
    fn test_login_order_single_variant() {
        let order = login_order(&urls(&["https://www.linkedin.com/in/jane"]));
        assert_eq!(order, vec![Variant::Profile]);
        assert!(login_order(&[]).is_empty());
    }

    #[tokio::test]
    async fn test_pre_authenticated_gate() {
        assert!(PreAuthenticated.wait_for_login(Variant::Sales).await.is_ok());
    }
}
