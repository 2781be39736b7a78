//! The "exposable service" capability a published component provides.

use async_trait::async_trait;
use serde_json::Value;

/// Failure raised by a service while handling a remote call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceFault {
    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("operation failed: {0}")]
    Failed(String),
}

impl ServiceFault {
    /// Shorthand for deserializing an operation's input payload.
    ///
    /// # Errors
    /// Returns `ServiceFault::InvalidInput` if `input` does not match `T`.
    pub fn parse_input<T: serde::de::DeserializeOwned>(input: Value) -> Result<T, Self> {
        serde_json::from_value(input).map_err(|e| Self::InvalidInput(e.to_string()))
    }
}

/// Operations a component makes remotely invocable once it is bound to an endpoint.
///
/// The protocol runtime only ever talks to a component through this trait.
#[async_trait]
pub trait ExposableService: Send + Sync + 'static {
    /// Names of the operations this service answers to.
    fn operations(&self) -> &'static [&'static str];

    /// Handle a single call. `input` is the decoded request payload.
    async fn invoke(&self, operation: &str, input: Value) -> Result<Value, ServiceFault>;

    fn supports(&self, operation: &str) -> bool {
        self.operations().contains(&operation)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    struct Greeter;

    #[async_trait]
    impl ExposableService for Greeter {
        fn operations(&self) -> &'static [&'static str] {
            &["greet"]
        }

        async fn invoke(&self, operation: &str, input: Value) -> Result<Value, ServiceFault> {
            #[derive(Deserialize)]
            struct GreetInput {
                who: String,
            }

            match operation {
                "greet" => {
                    let input: GreetInput = ServiceFault::parse_input(input)?;
                    Ok(json!({ "greeting": format!("hello, {}", input.who) }))
                }
                other => Err(ServiceFault::UnknownOperation(other.to_owned())),
            }
        }
    }

    #[tokio::test]
    async fn invoke_known_operation() {
        let out = Greeter
            .invoke("greet", json!({ "who": "bob" }))
            .await
            .unwrap();
        assert_eq!(out, json!({ "greeting": "hello, bob" }));
    }

    #[tokio::test]
    async fn invalid_input_is_reported_as_fault() {
        let err = Greeter.invoke("greet", json!({ "nope": 1 })).await.unwrap_err();
        assert!(matches!(err, ServiceFault::InvalidInput(_)));
    }

    #[test]
    fn supports_checks_declared_operations() {
        assert!(Greeter.supports("greet"));
        assert!(!Greeter.supports("wave"));
    }
}
