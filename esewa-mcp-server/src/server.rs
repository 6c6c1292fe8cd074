//! MCP tool server.
//!
//! Registers the four payment tools and `healthCheck` with rmcp. Operation
//! failures are returned as successful tool calls whose JSON payload carries
//! `error`; protocol errors are reserved for serialization problems.

use std::{sync::Arc, time::Instant};

use esewa_mcp_bridge::{
    EsewaGateway,
    mcp::{
        self, CreatePaymentSessionParams, GetPaymentStatusParams, RefundPaymentParams,
        VerifyTransactionParams,
    },
};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use tracing::info;

use crate::observability::{HealthReport, check_configuration};

const INSTRUCTIONS: &str = "eSewa ePay v2 payments. Create a payment session to obtain a \
    redirect URL, then verify the transaction after the payer returns. Refunds and status \
    lookups take the transaction id used at session creation. Failed operations return an \
    `error` field (and `status: \"FAILED\"` except for session creation).";

/// MCP server exposing eSewa gateway operations.
#[derive(Clone)]
pub struct EsewaServer {
    gateway: Arc<EsewaGateway>,
    started: Instant,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl EsewaServer {
    /// Creates a server over a shared gateway.
    pub fn new(gateway: Arc<EsewaGateway>) -> Self {
        Self { gateway, started: Instant::now(), tool_router: Self::tool_router() }
    }

    #[tool(
        name = "createPaymentSession",
        description = "Create an eSewa payment session and return the URL to redirect the payer to."
    )]
    async fn create_payment_session(
        &self,
        Parameters(params): Parameters<CreatePaymentSessionParams>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = mcp::create_payment_session(&self.gateway, params).await;
        Ok(CallToolResult::success(vec![Content::json(outcome)?]))
    }

    #[tool(
        name = "verifyTransaction",
        description = "Verify a transaction's status with eSewa using its id and total amount. \
            The amount is sent without trailing fractional zeros (500.00 is queried as 500)."
    )]
    async fn verify_transaction(
        &self,
        Parameters(params): Parameters<VerifyTransactionParams>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = mcp::verify_transaction(&self.gateway, params).await;
        Ok(CallToolResult::success(vec![Content::json(outcome)?]))
    }

    #[tool(name = "refundPayment", description = "Request a refund for a completed transaction.")]
    async fn refund_payment(
        &self,
        Parameters(params): Parameters<RefundPaymentParams>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = mcp::refund_payment(&self.gateway, params).await;
        Ok(CallToolResult::success(vec![Content::json(outcome)?]))
    }

    #[tool(name = "getPaymentStatus", description = "Look up the current status of a transaction.")]
    async fn get_payment_status(
        &self,
        Parameters(params): Parameters<GetPaymentStatusParams>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = mcp::get_payment_status(&self.gateway, params).await;
        Ok(CallToolResult::success(vec![Content::json(outcome)?]))
    }

    #[tool(
        name = "healthCheck",
        description = "Report server version, uptime and merchant configuration checks."
    )]
    async fn health_check(&self) -> Result<CallToolResult, McpError> {
        let report = self.health_report();
        info!(status = report.status.as_str(), "health check");
        let json = report.to_json().map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

impl EsewaServer {
    fn health_report(&self) -> HealthReport {
        let config = self.gateway.config();
        let checks = check_configuration(config, self.gateway.endpoints());
        HealthReport {
            status: HealthReport::compute_status(&checks),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            merchant_code: config.merchant_code.clone(),
            environment: config.environment.as_str().to_owned(),
            uptime_secs: self.started.elapsed().as_secs(),
            checks,
        }
    }
}

#[tool_handler]
impl ServerHandler for EsewaServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(INSTRUCTIONS.to_owned()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use esewa_mcp_bridge::{MerchantConfig, merchant::EndpointConfig};
    use rust_decimal::Decimal;
    use serde_json::Value;

    use super::*;

    fn unreachable_server() -> EsewaServer {
        let base = "http://127.0.0.1:1";
        let config = MerchantConfig {
            endpoints: EndpointConfig {
                session: Some(format!("{base}/session")),
                verify: Some(format!("{base}/verify/")),
                refund: Some(format!("{base}/refund")),
                status: Some(format!("{base}/status/")),
            },
            ..Default::default()
        };
        let gateway = EsewaGateway::from_config(Arc::new(config)).expect("gateway should build");
        EsewaServer::new(Arc::new(gateway))
    }

    fn payload(result: &CallToolResult) -> Value {
        let result = serde_json::to_value(result).expect("serializable result");
        let text = result["content"][0]["text"].as_str().expect("text content");
        serde_json::from_str(text).expect("JSON payload")
    }

    #[test]
    fn test_get_info_enables_tools() {
        let info = unreachable_server().get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.is_some_and(|text| text.contains("eSewa")));
    }

    #[test]
    fn test_tool_names_registered() {
        let server = unreachable_server();
        let mut names: Vec<String> =
            server.tool_router.list_all().into_iter().map(|tool| tool.name.to_string()).collect();
        names.sort();
        assert_eq!(
            names,
            [
                "createPaymentSession",
                "getPaymentStatus",
                "healthCheck",
                "refundPayment",
                "verifyTransaction"
            ]
        );
    }

    #[test]
    fn test_verify_description_mentions_amount_normalization() {
        let server = unreachable_server();
        let tool = server
            .tool_router
            .list_all()
            .into_iter()
            .find(|tool| tool.name == "verifyTransaction")
            .expect("verify tool registered");
        assert!(tool.description.is_some_and(|text| text.contains("500.00 is queried as 500")));
    }

    #[tokio::test]
    async fn test_gateway_failure_is_successful_tool_call() {
        let server = unreachable_server();

        let result = server
            .refund_payment(Parameters(RefundPaymentParams {
                transaction_id: "TXN1".to_owned(),
                amount: Decimal::from(100),
            }))
            .await
            .expect("tool call should succeed");

        assert_ne!(result.is_error, Some(true));
        let payload = payload(&result);
        assert_eq!(payload["status"], "FAILED");
        assert!(payload["error"].as_str().is_some_and(|e| !e.is_empty()));
    }

    #[tokio::test]
    async fn test_invalid_params_return_error_payload() {
        let server = unreachable_server();

        let result = server
            .create_payment_session(Parameters(CreatePaymentSessionParams {
                amount: Decimal::ZERO,
                transaction_id: "TXN1".to_owned(),
                product_name: "Book".to_owned(),
                return_url: "https://shop.example/ok".to_owned(),
                cancel_url: "https://shop.example/cancel".to_owned(),
                merchant_code: None,
            }))
            .await
            .expect("tool call should succeed");

        let payload = payload(&result);
        assert!(payload.get("status").is_none());
        assert!(payload["error"].as_str().is_some_and(|e| e.contains("amount")));
    }

    #[tokio::test]
    async fn test_health_check_reports_configuration() {
        let server = unreachable_server();

        let result = server.health_check().await.expect("tool call should succeed");
        let payload = payload(&result);
        assert_eq!(payload["merchant_code"], "EPAYTEST");
        assert_eq!(payload["environment"], "sandbox");
        // loopback endpoints are plain HTTP
        assert_eq!(payload["status"], "degraded");
    }
}
