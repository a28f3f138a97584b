//! Script evaluation.

use serde_json::{Value, json};

use super::PageSession;
use crate::cdp::error::CdpError;

impl PageSession {
    /// Evaluate an expression and return its JSON value.
    ///
    /// Promises are awaited. A thrown exception becomes
    /// [`CdpError::JavaScript`].
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true
                })),
            )
            .await?;

        if let Some(exception) = result.get("exceptionDetails") {
            return Err(CdpError::JavaScript(exception_message(exception)));
        }

        Ok(result["result"]["value"].clone())
    }

    /// Evaluate an expression expected to produce a boolean. Anything else
    /// counts as `false`.
    pub async fn evaluate_bool(&self, expression: &str) -> Result<bool, CdpError> {
        Ok(self.evaluate(expression).await?.as_bool().unwrap_or(false))
    }
}

/// Prefer the thrown value's description over the generic "Uncaught" text.
fn exception_message(exception: &Value) -> String {
    exception["exception"]["description"]
        .as_str()
        .or_else(|| exception["text"].as_str())
        .unwrap_or("unknown error")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exception_message_prefers_description() {
        let details = json!({
            "text": "Uncaught",
            "exception": {"description": "TypeError: x is null"}
        });
        assert_eq!(exception_message(&details), "TypeError: x is null");
    }

    #[test]
    fn test_exception_message_falls_back() {
        assert_eq!(exception_message(&json!({"text": "Uncaught"})), "Uncaught");
        assert_eq!(exception_message(&json!({})), "unknown error");
    }
}
