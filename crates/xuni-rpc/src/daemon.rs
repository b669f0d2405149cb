//! Daemon RPC client.
//!
//! Typed async methods for the UltraNote Infinity daemon: JSON-RPC
//! methods on `/json_rpc` plus the plain-JSON handlers (`/getinfo`,
//! `/getheight`, `/gettransactions`, `/sendrawtransaction`).

use crate::client::{ClientConfig, RpcClient};
use crate::error::{expect, RpcError};
use crate::resolve::{resolve_address, DnsLookup, TxtLookup};
use crate::validate::{array_of, is_address, is_hex64, is_hex_string};
use serde::Deserialize;
use serde_json::{json, Value};

// =============================================================================
// Response Types
// =============================================================================

/// Daemon `/getinfo` response.
#[derive(Debug, Clone, Deserialize)]
pub struct DaemonInfo {
    pub height: u64,
    pub difficulty: u64,
    #[serde(default)]
    pub tx_count: u64,
    #[serde(default)]
    pub tx_pool_size: u64,
    #[serde(default)]
    pub alt_blocks_count: u64,
    #[serde(default)]
    pub outgoing_connections_count: u64,
    #[serde(default)]
    pub incoming_connections_count: u64,
    #[serde(default)]
    pub white_peerlist_size: u64,
    #[serde(default)]
    pub grey_peerlist_size: u64,
    #[serde(default)]
    pub last_known_block_index: u64,
    #[serde(default)]
    pub status: String,
    /// Catch-all for additional fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Block header from the `getblockheader*` methods.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockHeader {
    pub height: u64,
    pub hash: String,
    pub prev_hash: String,
    pub timestamp: u64,
    pub nonce: u32,
    pub difficulty: u64,
    pub reward: u64,
    #[serde(default)]
    pub depth: u64,
    #[serde(default)]
    pub major_version: u8,
    #[serde(default)]
    pub minor_version: u8,
    #[serde(default)]
    pub orphan_status: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Block template from `getblocktemplate`.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockTemplate {
    pub blocktemplate_blob: String,
    pub difficulty: u64,
    pub height: u64,
    pub reserved_offset: u32,
    #[serde(default)]
    pub status: String,
}

/// Status-only responses (`submitblock`, `/sendrawtransaction`).
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResult {
    #[serde(default)]
    pub status: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Deserialize)]
struct CountResult {
    count: u64,
}

#[derive(Deserialize)]
struct HeightResult {
    height: u64,
}

#[derive(Deserialize)]
struct BlockHeaderResult {
    block_header: BlockHeader,
}

#[derive(Deserialize)]
struct CurrencyIdResult {
    currency_id_blob: String,
}

// =============================================================================
// Option Types
// =============================================================================

/// Options for `getblocktemplate`.
#[derive(Debug, Clone)]
pub struct BlockTemplateOptions {
    /// Wallet address mining rewards go to. May be an alias.
    pub address: String,
    /// Bytes to reserve in the coinbase extra; must be in `[0, 255]`.
    pub reserve_size: u64,
}

async fn normalize_block_template<L: TxtLookup>(
    lookup: &L,
    opts: BlockTemplateOptions,
) -> Result<Value, RpcError> {
    let address = resolve_address(lookup, &opts.address).await?;
    if !is_address(&address) {
        return Err(RpcError::validation("address", expect::ADDR));
    }
    if opts.reserve_size > 255 {
        return Err(RpcError::ReserveSizeOutOfRange);
    }
    Ok(json!({
        "wallet_address": address,
        "reserve_size": opts.reserve_size,
    }))
}

// =============================================================================
// DaemonRpc
// =============================================================================

/// Async RPC client for the UltraNote Infinity daemon.
pub struct DaemonRpc<L = DnsLookup> {
    client: RpcClient,
    lookup: L,
}

impl DaemonRpc {
    /// Client for the daemon at `url`, resolving aliases over DNS.
    pub fn new(url: &str) -> Self {
        Self {
            client: RpcClient::new(url),
            lookup: DnsLookup::new(),
        }
    }

    /// Client for the daemon endpoint of `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, RpcError> {
        Ok(Self {
            client: RpcClient::daemon(config)?,
            lookup: DnsLookup::new(),
        })
    }
}

impl<L: TxtLookup> DaemonRpc<L> {
    /// Client with a custom TXT lookup.
    pub fn with_lookup(client: RpcClient, lookup: L) -> Self {
        Self { client, lookup }
    }

    /// The underlying HTTP client.
    pub fn client(&self) -> &RpcClient {
        &self.client
    }

    // =========================================================================
    // JSON-RPC methods
    // =========================================================================

    /// Number of blocks in the chain.
    pub async fn count(&self) -> Result<u64, RpcError> {
        let val = self.client.call("getblockcount", json!({})).await?;
        let res: CountResult = serde_json::from_value(val)?;
        Ok(res.count)
    }

    /// Hash of the block at `height`.
    pub async fn block_hash_by_height(&self, height: u64) -> Result<String, RpcError> {
        // Positional params; the method predates object params.
        let val = self.client.call("on_getblockhash", json!([height])).await?;
        Ok(serde_json::from_value(val)?)
    }

    /// Header of the block with `hash`.
    pub async fn block_header_by_hash(&self, hash: &str) -> Result<BlockHeader, RpcError> {
        if !is_hex64(hash) {
            return Err(RpcError::validation("hash", expect::HEX64));
        }
        let val = self
            .client
            .call("getblockheaderbyhash", json!({ "hash": hash }))
            .await?;
        let res: BlockHeaderResult = serde_json::from_value(val)?;
        Ok(res.block_header)
    }

    /// Header of the block at `height`.
    pub async fn block_header_by_height(&self, height: u64) -> Result<BlockHeader, RpcError> {
        let val = self
            .client
            .call("getblockheaderbyheight", json!({ "height": height }))
            .await?;
        let res: BlockHeaderResult = serde_json::from_value(val)?;
        Ok(res.block_header)
    }

    /// Header of the chain tip.
    pub async fn last_block_header(&self) -> Result<BlockHeader, RpcError> {
        let val = self.client.call("getlastblockheader", json!({})).await?;
        let res: BlockHeaderResult = serde_json::from_value(val)?;
        Ok(res.block_header)
    }

    /// Full block details as free-form JSON.
    pub async fn block(&self, hash: &str) -> Result<Value, RpcError> {
        if !is_hex64(hash) {
            return Err(RpcError::validation("hash", expect::HEX64));
        }
        self.client.call("f_block_json", json!({ "hash": hash })).await
    }

    /// Abbreviated details of the 30 blocks preceding `height`.
    pub async fn blocks(&self, height: u64) -> Result<Value, RpcError> {
        self.client
            .call("f_blocks_list_json", json!({ "height": height }))
            .await
    }

    /// Transaction details as free-form JSON.
    pub async fn transaction(&self, hash: &str) -> Result<Value, RpcError> {
        if !is_hex64(hash) {
            return Err(RpcError::validation("hash", expect::HEX64));
        }
        self.client
            .call("f_transaction_json", json!({ "hash": hash }))
            .await
    }

    /// Transactions currently in the pool.
    pub async fn transaction_pool(&self) -> Result<Value, RpcError> {
        self.client
            .call("f_on_transactions_pool_json", json!({}))
            .await
    }

    /// The network's currency id blob.
    pub async fn currency_id(&self) -> Result<String, RpcError> {
        let val = self.client.call("getcurrencyid", json!({})).await?;
        let res: CurrencyIdResult = serde_json::from_value(val)?;
        Ok(res.currency_id_blob)
    }

    /// Block template for mining. The reward address may be an alias.
    pub async fn block_template(
        &self,
        opts: BlockTemplateOptions,
    ) -> Result<BlockTemplate, RpcError> {
        let params = normalize_block_template(&self.lookup, opts).await?;
        let val = self.client.call("getblocktemplate", params).await?;
        Ok(serde_json::from_value(val)?)
    }

    /// Submit a mined block blob.
    pub async fn submit_block(&self, block: &str) -> Result<StatusResult, RpcError> {
        if !is_hex_string(block) {
            return Err(RpcError::validation("block", expect::HEX));
        }
        let val = self.client.call("submitblock", json!([block])).await?;
        Ok(serde_json::from_value(val)?)
    }

    // =========================================================================
    // Plain-JSON handlers
    // =========================================================================

    /// Daemon state and network statistics.
    pub async fn info(&self) -> Result<DaemonInfo, RpcError> {
        let val = self.client.post("/getinfo", &json!({})).await?;
        Ok(serde_json::from_value(val)?)
    }

    /// Current chain height.
    pub async fn index(&self) -> Result<u64, RpcError> {
        let val = self.client.post("/getheight", &json!({})).await?;
        let res: HeightResult = serde_json::from_value(val)?;
        Ok(res.height)
    }

    /// Raw transactions for the given hashes.
    pub async fn transactions(&self, hashes: &[String]) -> Result<Value, RpcError> {
        if !array_of(hashes, |h| is_hex64(h)) {
            return Err(RpcError::validation("txs", expect::HEX64_ARRAY));
        }
        self.client
            .post("/gettransactions", &json!({ "txs_hashes": hashes }))
            .await
    }

    /// Broadcast a raw transaction blob.
    pub async fn send_raw_transaction(&self, raw_tx: &str) -> Result<StatusResult, RpcError> {
        if !is_hex_string(raw_tx) {
            return Err(RpcError::validation("rawTx", expect::HEX));
        }
        let val = self
            .client
            .post("/sendrawtransaction", &json!({ "tx_as_hex": raw_tx }))
            .await?;
        Ok(serde_json::from_value(val)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;

    fn addr() -> String {
        format!("Xuni{}", "4".repeat(95))
    }

    struct NoLookup;

    impl TxtLookup for NoLookup {
        fn txt_records(
            &self,
            name: &str,
        ) -> impl Future<Output = Result<Vec<String>, RpcError>> + Send {
            let name = name.to_string();
            async move { panic!("unexpected TXT lookup for {name}") }
        }
    }

    struct FixedLookup(String);

    impl TxtLookup for FixedLookup {
        fn txt_records(
            &self,
            _name: &str,
        ) -> impl Future<Output = Result<Vec<String>, RpcError>> + Send {
            let record = format!("oa1:xuni recipient_address={};", self.0);
            async move { Ok(vec![record]) }
        }
    }

    #[tokio::test]
    async fn test_block_template_params() {
        let opts = BlockTemplateOptions {
            address: addr(),
            reserve_size: 8,
        };
        let params = normalize_block_template(&NoLookup, opts).await.unwrap();
        assert_eq!(
            params,
            json!({ "wallet_address": addr(), "reserve_size": 8 })
        );
    }

    #[tokio::test]
    async fn test_block_template_reserve_size_bounds() {
        for (size, ok) in [(0, true), (255, true), (256, false)] {
            let opts = BlockTemplateOptions {
                address: addr(),
                reserve_size: size,
            };
            let res = normalize_block_template(&NoLookup, opts).await;
            if ok {
                assert!(res.is_ok(), "reserve_size {size} should pass");
            } else {
                assert!(matches!(
                    res.unwrap_err(),
                    RpcError::ReserveSizeOutOfRange
                ));
            }
        }
    }

    #[tokio::test]
    async fn test_block_template_resolves_alias() {
        let opts = BlockTemplateOptions {
            address: "pool.example.org".to_string(),
            reserve_size: 0,
        };
        let params = normalize_block_template(&FixedLookup(addr()), opts)
            .await
            .unwrap();
        assert_eq!(params["wallet_address"], json!(addr()));
    }

    // Validation failures surface before any request is attempted, so
    // these run against an unreachable endpoint.

    #[tokio::test]
    async fn test_transactions_rejects_malformed_hashes() {
        let d = DaemonRpc::with_lookup(RpcClient::new("http://127.0.0.1:1"), NoLookup);
        let err = d
            .transactions(&["nope".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(&err, RpcError::Validation { field, .. } if field == "txs"));
    }

    #[tokio::test]
    async fn test_submit_block_rejects_non_hex() {
        let d = DaemonRpc::with_lookup(RpcClient::new("http://127.0.0.1:1"), NoLookup);
        let err = d.submit_block("zzzz").await.unwrap_err();
        assert_eq!(err.to_string(), "block must be a hexadecimal string");
    }

    #[tokio::test]
    async fn test_block_template_rejects_bad_address() {
        let opts = BlockTemplateOptions {
            address: "nodot".to_string(),
            reserve_size: 0,
        };
        let err = normalize_block_template(&NoLookup, opts).await.unwrap_err();
        assert!(matches!(err, RpcError::InvalidAddressOrAlias { .. }));
    }
}
