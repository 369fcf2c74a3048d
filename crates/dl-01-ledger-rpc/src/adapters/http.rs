//! HTTP Ledger Adapter
//!
//! Implements `LedgerRpc` against the chain JSON API. Reads go to
//! `/v1/chain/*`; submissions go to the configured signing relay.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared_types::{Action, Block, ChainInfo, TableRows, TableRowsRequest, TransactOptions, TransactResult};
use tracing::debug;

use crate::config::RpcConfig;
use crate::errors::RpcError;
use crate::ports::LedgerRpc;

/// Ledger reached over HTTP.
pub struct HttpLedgerRpc {
    client: Client,
    config: RpcConfig,
}

#[derive(Serialize)]
struct GetBlockParams {
    block_num_or_id: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TransactRequest<'a> {
    actions: &'a [Action],
    blocks_behind: u32,
    expire_seconds: u32,
}

#[derive(Deserialize)]
struct ProcessedReceipt {
    status: String,
}

#[derive(Deserialize)]
struct Processed {
    id: String,
    #[serde(deserialize_with = "shared_types::u64_from_number_or_string")]
    block_num: u64,
    receipt: ProcessedReceipt,
}

#[derive(Deserialize)]
struct TransactResponse {
    processed: Processed,
}

/// Error body returned by the chain API.
#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    error: serde_json::Value,
}

impl HttpLedgerRpc {
    /// Create a new adapter.
    pub fn new(config: RpcConfig) -> Result<Self, RpcError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()
            .map_err(|e| RpcError::Transport(e.to_string()))?;

        Ok(Self { client, config })
    }

    async fn post<P: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        url: &str,
        body: &P,
    ) -> Result<R, RpcError> {
        debug!("[dl-01] POST {}", url);

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))?;

        if !status.is_success() {
            // Chain API reports contract assertion failures as 500 with a JSON body.
            if let Ok(api_error) = serde_json::from_str::<ApiErrorBody>(&text) {
                if !api_error.error.is_null() {
                    return Err(RpcError::Rejected(format!(
                        "{}: {}",
                        api_error.message, api_error.error
                    )));
                }
            }
            return Err(RpcError::Status {
                code: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| RpcError::Decode(e.to_string()))
    }
}

#[async_trait]
impl LedgerRpc for HttpLedgerRpc {
    async fn get_info(&self) -> Result<ChainInfo, RpcError> {
        self.post(&self.config.chain_url("get_info"), &serde_json::json!({}))
            .await
    }

    async fn get_table_rows(&self, request: &TableRowsRequest) -> Result<TableRows, RpcError> {
        self.post(&self.config.chain_url("get_table_rows"), request)
            .await
    }

    async fn get_block(&self, block_num: u64) -> Result<Block, RpcError> {
        let params = GetBlockParams {
            block_num_or_id: block_num,
        };
        match self.post(&self.config.chain_url("get_block"), &params).await {
            Err(RpcError::Rejected(msg)) if msg.contains("Could not find block") => {
                Err(RpcError::BlockNotFound(block_num))
            }
            other => other,
        }
    }

    async fn submit_transaction(
        &self,
        actions: Vec<Action>,
        options: TransactOptions,
    ) -> Result<TransactResult, RpcError> {
        let request = TransactRequest {
            actions: &actions,
            blocks_behind: options.blocks_behind,
            expire_seconds: options.expire_seconds,
        };
        let response: TransactResponse = self.post(&self.config.transact_url(), &request).await?;

        Ok(TransactResult {
            block_num: response.processed.block_num,
            transaction_id: response.processed.id,
            status: response.processed.receipt.status,
        })
    }
}
