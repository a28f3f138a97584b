//! Selector helpers built on script evaluation.

use std::time::Duration;

use serde_json::Value;

use super::PageSession;
use crate::cdp::error::CdpError;

/// Quote a string as a JavaScript literal.
fn js_string(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

fn exists_expr(selector: &str) -> String {
    format!("document.querySelector({}) !== null", js_string(selector))
}

fn any_exists_expr(selectors: &[&str]) -> String {
    if selectors.is_empty() {
        return "false".to_string();
    }
    selectors
        .iter()
        .map(|s| format!("({})", exists_expr(s)))
        .collect::<Vec<_>>()
        .join(" || ")
}

fn button_expr(text: &str) -> String {
    format!(
        "Array.from(document.querySelectorAll('button')).find((b) => b.textContent.includes({}))",
        js_string(text)
    )
}

impl PageSession {
    /// Whether at least one element matches `selector`.
    pub async fn exists(&self, selector: &str) -> Result<bool, CdpError> {
        self.evaluate_bool(&exists_expr(selector)).await
    }

    /// Wait until `selector` matches.
    pub async fn wait_for_selector(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), CdpError> {
        self.wait_until(&exists_expr(selector), timeout, selector)
            .await
    }

    /// Wait until any of `selectors` matches.
    pub async fn wait_for_any(
        &self,
        selectors: &[&str],
        timeout: Duration,
        what: &str,
    ) -> Result<(), CdpError> {
        self.wait_until(&any_exists_expr(selectors), timeout, what)
            .await
    }

    /// Focus the first element matching `selector`. Inputs also get their
    /// current value selected so typed text replaces it.
    pub async fn focus(&self, selector: &str) -> Result<(), CdpError> {
        let expr = format!(
            r#"(() => {{
                const el = document.querySelector({});
                if (!el) return false;
                el.focus();
                if (typeof el.select === 'function') el.select();
                return true;
            }})()"#,
            js_string(selector)
        );
        if self.evaluate_bool(&expr).await? {
            Ok(())
        } else {
            Err(CdpError::ElementNotFound(selector.to_string()))
        }
    }

    /// Click the first button whose text contains `text`. Returns `false`
    /// when there is no such button.
    pub async fn click_button_with_text(&self, text: &str) -> Result<bool, CdpError> {
        let expr = format!(
            "(() => {{ const b = {}; if (!b) return false; b.click(); return true; }})()",
            button_expr(text)
        );
        self.evaluate_bool(&expr).await
    }
}
