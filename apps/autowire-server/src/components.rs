//! Components managed by this server. Each one is registered through
//! `inventory`; the discovery pass publishes those carrying a web service name.

use std::sync::Arc;

use async_trait::async_trait;
use autowire::{
    ComponentRegistration, ComponentType, ExposableService, ManagedComponent, ServiceFault,
};
use serde::Deserialize;
use serde_json::{Value, json};

/// Returns whatever it receives.
pub struct EchoService;

impl ManagedComponent for EchoService {
    fn as_exposable(self: Arc<Self>) -> Option<Arc<dyn ExposableService>> {
        Some(self)
    }
}

#[async_trait]
impl ExposableService for EchoService {
    fn operations(&self) -> &'static [&'static str] {
        &["echo"]
    }

    async fn invoke(&self, operation: &str, input: Value) -> Result<Value, ServiceFault> {
        match operation {
            "echo" => Ok(input),
            other => Err(ServiceFault::UnknownOperation(other.to_owned())),
        }
    }
}

/// Integer arithmetic on `{ "a": .., "b": .. }`.
pub struct CalculatorService;

#[derive(Deserialize)]
struct Operands {
    a: i64,
    b: i64,
}

impl CalculatorService {
    fn compute(operation: &str, ops: &Operands) -> Result<i64, ServiceFault> {
        let result = match operation {
            "add" => ops.a.checked_add(ops.b),
            "subtract" => ops.a.checked_sub(ops.b),
            "multiply" => ops.a.checked_mul(ops.b),
            "divide" => {
                if ops.b == 0 {
                    return Err(ServiceFault::InvalidInput("division by zero".to_owned()));
                }
                ops.a.checked_div(ops.b)
            }
            other => return Err(ServiceFault::UnknownOperation(other.to_owned())),
        };
        result.ok_or_else(|| ServiceFault::Failed(format!("{operation} overflowed")))
    }
}

impl ManagedComponent for CalculatorService {
    fn as_exposable(self: Arc<Self>) -> Option<Arc<dyn ExposableService>> {
        Some(self)
    }
}

#[async_trait]
impl ExposableService for CalculatorService {
    fn operations(&self) -> &'static [&'static str] {
        &["add", "subtract", "multiply", "divide"]
    }

    async fn invoke(&self, operation: &str, input: Value) -> Result<Value, ServiceFault> {
        let ops: Operands = ServiceFault::parse_input(input)?;
        let result = Self::compute(operation, &ops)?;
        Ok(json!({ "result": result }))
    }
}

/// Managed but not network-exposed.
pub struct AuditTrail;

impl ManagedComponent for AuditTrail {}

#[allow(clippy::unnecessary_wraps)]
fn make_echo() -> anyhow::Result<Arc<dyn ManagedComponent>> {
    Ok(Arc::new(EchoService))
}

#[allow(clippy::unnecessary_wraps)]
fn make_calculator() -> anyhow::Result<Arc<dyn ManagedComponent>> {
    Ok(Arc::new(CalculatorService))
}

#[allow(clippy::unnecessary_wraps)]
fn make_audit_trail() -> anyhow::Result<Arc<dyn ManagedComponent>> {
    Ok(Arc::new(AuditTrail))
}

autowire::inventory::submit! {
    ComponentRegistration {
        name: "echoService",
        ty: ComponentType::web_service(concat!(module_path!(), "::EchoService"), "EchoService"),
        factory: make_echo,
    }
}

autowire::inventory::submit! {
    ComponentRegistration {
        name: "calculatorService",
        ty: ComponentType::web_service(
            concat!(module_path!(), "::CalculatorService"),
            "CalculatorService",
        ),
        factory: make_calculator,
    }
}

autowire::inventory::submit! {
    ComponentRegistration {
        name: "auditTrail",
        ty: ComponentType::plain(concat!(module_path!(), "::AuditTrail")),
        factory: make_audit_trail,
    }
}
