//! Wallet RPC client.
//!
//! Typed async methods for both wallet RPC dialects served by the
//! UltraNote Infinity wallet service: the legacy simplewallet methods
//! (`getbalance`, `transfer`, ...) and the walletd methods
//! (`getStatus`, `sendTransaction`, ...). Every parameterized operation
//! runs its options through a normalizer that validates shapes, resolves
//! aliased recipients, fills defaults, and builds a fresh params object;
//! caller input is never mutated.

use crate::client::{ClientConfig, RpcClient};
use crate::error::{expect, RpcError};
use crate::resolve::{resolve_address, resolve_addresses, resolve_transfers, DnsLookup, TxtLookup};
use crate::validate::{array_of, is_address, is_hex64, is_hex_string, is_transfer};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Smallest allowed mixin.
pub const MIN_MIXIN: u64 = 2;
/// Largest allowed mixin.
pub const MAX_MIXIN: u64 = 10;
/// Unlock height applied when the caller omits one.
pub const DEFAULT_UNLOCK_HEIGHT: u64 = 10;
/// Base fee in raw units.
pub const DEFAULT_FEE: u64 = 10_000;
/// Additional fee per message character, in raw units.
pub const DEFAULT_CHARACTER_FEE: u64 = 1_000;

// =============================================================================
// Option Types
// =============================================================================

/// A single transfer destination. `amount` is a raw amount; no decimal
/// scaling is applied here. A `message` raises the default fee by
/// [`DEFAULT_CHARACTER_FEE`] per character.
#[derive(Debug, Clone, Serialize)]
pub struct Transfer {
    pub address: String,
    pub amount: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Options for the legacy `transfer` method ([`WalletRpc::send`]).
#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    pub transfers: Vec<Transfer>,
    pub payment_id: Option<String>,
    /// Defaults to [`MIN_MIXIN`]; must stay within `[MIN_MIXIN, MAX_MIXIN]`.
    pub mix_in: Option<u64>,
    /// Defaults to the base fee plus the per-character message fee.
    pub fee: Option<u64>,
    /// Defaults to [`DEFAULT_UNLOCK_HEIGHT`].
    pub unlock_height: Option<u64>,
}

/// Options for the walletd `sendTransaction` and
/// `createDelayedTransaction` methods.
#[derive(Debug, Clone, Default)]
pub struct TransactionOptions {
    pub transfers: Vec<Transfer>,
    /// Source addresses; sent as `sourceAddresses`.
    pub addresses: Option<Vec<String>>,
    pub change_address: Option<String>,
    pub payment_id: Option<String>,
    /// Free-form transaction extra, as a string.
    pub extra: Option<String>,
    /// Sent as `anonymity`; defaults to [`MIN_MIXIN`].
    pub mix_in: Option<u64>,
    /// For `sendTransaction` the default is the message-weighted fee; for
    /// `createDelayedTransaction` it is [`DEFAULT_FEE`] per transfer.
    pub fee: Option<u64>,
    /// Sent as `unlockTime`; defaults to [`DEFAULT_UNLOCK_HEIGHT`].
    pub unlock_height: Option<u64>,
}

/// Options for `sendFusionTransaction`.
#[derive(Debug, Clone, Default)]
pub struct FusionOptions {
    /// Outputs below this raw amount are considered for fusion.
    pub threshold: u64,
    /// Addresses whose outputs to consolidate; absent means the whole
    /// wallet.
    pub addresses: Option<Vec<String>>,
    pub destination_address: Option<String>,
    /// Sent as `anonymity`; defaults to [`MIN_MIXIN`].
    pub mix_in: Option<u64>,
}

/// Pagination filter for the legacy `get_messages` method.
#[derive(Debug, Clone, Default)]
pub struct MessagesFilter {
    pub first_tx_id: Option<u64>,
    pub tx_limit: Option<u64>,
}

/// Block-range query for `getTransactionHashes` / `getTransactions`.
/// Exactly one of `first_block_index` or `block_hash` anchors the range.
#[derive(Debug, Clone, Default)]
pub struct TransactionsQuery {
    pub block_count: u64,
    pub first_block_index: Option<u64>,
    pub block_hash: Option<String>,
    pub payment_id: Option<String>,
    pub addresses: Option<Vec<String>>,
}

// =============================================================================
// Response Types
// =============================================================================

/// Balance from the legacy `getbalance`.
#[derive(Debug, Clone, Deserialize)]
pub struct Balance {
    pub available_balance: u64,
    pub locked_amount: u64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Per-address balance from the walletd `getBalance`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressBalance {
    pub available_balance: u64,
    pub locked_amount: u64,
    #[serde(default)]
    pub locked_deposit_balance: u64,
    #[serde(default)]
    pub unlocked_deposit_balance: u64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Sync status from `getStatus`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub block_count: u64,
    pub known_block_count: u64,
    pub last_block_hash: String,
    pub peer_count: u64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// View key pair from `getViewKey`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewKey {
    pub view_secret_key: String,
}

/// Spend keys for one address from `getSpendKeys`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendKeys {
    pub spend_secret_key: String,
    pub spend_public_key: String,
}

/// Result of the legacy `transfer`.
#[derive(Debug, Clone, Deserialize)]
pub struct TransferResult {
    #[serde(default)]
    pub tx_hash: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Result of walletd methods that return a single transaction hash.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionHashResult {
    #[serde(default)]
    pub transaction_hash: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Per-block transaction hashes from `getTransactionHashes`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockTransactionHashes {
    pub block_hash: String,
    #[serde(default)]
    pub transaction_hashes: Vec<String>,
}

/// Result of `getTransactionHashes`.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionHashesResult {
    #[serde(default)]
    pub items: Vec<BlockTransactionHashes>,
}

/// Per-block transactions from `getTransactions`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockTransactions {
    pub block_hash: String,
    #[serde(default)]
    pub transactions: Vec<Value>,
}

/// Result of `getTransactions`.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionsResult {
    #[serde(default)]
    pub items: Vec<BlockTransactions>,
}

/// Incoming payments for one payment id from `get_payments`.
#[derive(Debug, Clone, Deserialize)]
pub struct Payments {
    #[serde(default)]
    pub payments: Vec<Value>,
}

/// Result of `estimateFusion`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FusionEstimate {
    #[serde(default)]
    pub fusion_ready_count: u64,
    #[serde(default)]
    pub total_output_count: u64,
}

#[derive(Deserialize)]
struct HeightResult {
    height: u64,
}

#[derive(Deserialize)]
struct AddressResult {
    address: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddressesResult {
    addresses: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntegratedAddressResult {
    integrated_address: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlockHashesResult {
    block_hashes: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionHashListResult {
    #[serde(default)]
    transaction_hashes: Vec<String>,
}

// =============================================================================
// Request Normalizers
// =============================================================================

fn default_transfer_fee(transfers: &[Transfer]) -> u64 {
    DEFAULT_FEE
        + transfers
            .iter()
            .filter_map(|t| t.message.as_ref())
            .map(|m| m.len() as u64 * DEFAULT_CHARACTER_FEE)
            .sum::<u64>()
}

fn check_mixin(mix_in: Option<u64>) -> Result<u64, RpcError> {
    let mix_in = mix_in.unwrap_or(MIN_MIXIN);
    if !(MIN_MIXIN..=MAX_MIXIN).contains(&mix_in) {
        return Err(RpcError::MixinOutOfRange);
    }
    Ok(mix_in)
}

async fn resolve_transfer_list<L: TxtLookup>(
    lookup: &L,
    transfers: Vec<Transfer>,
) -> Result<Vec<Transfer>, RpcError> {
    if transfers.is_empty() {
        return Err(RpcError::validation("transfers", expect::TRANSFERS));
    }
    let transfers = resolve_transfers(lookup, transfers).await?;
    if !array_of(&transfers, is_transfer) {
        return Err(RpcError::validation("transfers", expect::TRANSFERS));
    }
    Ok(transfers)
}

async fn resolve_address_list<L: TxtLookup>(
    lookup: &L,
    field: &str,
    addresses: Vec<String>,
) -> Result<Vec<String>, RpcError> {
    let addresses = resolve_addresses(lookup, addresses).await?;
    if !array_of(&addresses, |a| is_address(a)) {
        return Err(RpcError::validation(field, expect::ADDR_ARRAY));
    }
    Ok(addresses)
}

async fn resolve_single_address<L: TxtLookup>(
    lookup: &L,
    field: &str,
    address: &str,
) -> Result<String, RpcError> {
    let resolved = resolve_address(lookup, address).await?;
    if !is_address(&resolved) {
        return Err(RpcError::validation(field, expect::ADDR));
    }
    Ok(resolved)
}

fn check_payment_id(payment_id: Option<&String>) -> Result<(), RpcError> {
    if let Some(id) = payment_id {
        if !is_hex64(id) {
            return Err(RpcError::validation("paymentId", expect::HEX64));
        }
    }
    Ok(())
}

/// Params for the legacy `transfer` method.
async fn normalize_send<L: TxtLookup>(lookup: &L, opts: SendOptions) -> Result<Value, RpcError> {
    let transfers = resolve_transfer_list(lookup, opts.transfers).await?;
    check_payment_id(opts.payment_id.as_ref())?;
    let mix_in = check_mixin(opts.mix_in)?;
    let unlock_height = opts.unlock_height.unwrap_or(DEFAULT_UNLOCK_HEIGHT);
    let fee = opts.fee.unwrap_or_else(|| default_transfer_fee(&transfers));
    let mut params = json!({
        "destinations": transfers,
        "mixin": mix_in,
        "fee": fee,
        "unlock_time": unlock_height,
    });
    if let Some(id) = opts.payment_id {
        params["payment_id"] = json!(id);
    }
    Ok(params)
}

/// Params for `sendTransaction` / `createDelayedTransaction`. The two
/// differ only in the fee default: delayed transactions charge
/// [`DEFAULT_FEE`] per transfer with no message weighting.
async fn normalize_transaction<L: TxtLookup>(
    lookup: &L,
    opts: TransactionOptions,
    delayed: bool,
) -> Result<Value, RpcError> {
    let transfers = resolve_transfer_list(lookup, opts.transfers).await?;
    let source_addresses = match opts.addresses {
        Some(addresses) => Some(resolve_address_list(lookup, "addresses", addresses).await?),
        None => None,
    };
    let change_address = match opts.change_address {
        Some(address) => Some(resolve_single_address(lookup, "changeAddress", &address).await?),
        None => None,
    };
    check_payment_id(opts.payment_id.as_ref())?;
    let anonymity = check_mixin(opts.mix_in)?;
    let unlock_time = opts.unlock_height.unwrap_or(DEFAULT_UNLOCK_HEIGHT);
    let fee = opts.fee.unwrap_or_else(|| {
        if delayed {
            DEFAULT_FEE * transfers.len() as u64
        } else {
            default_transfer_fee(&transfers)
        }
    });
    let mut params = json!({
        "transfers": transfers,
        "anonymity": anonymity,
        "fee": fee,
        "unlockTime": unlock_time,
    });
    if let Some(addresses) = source_addresses {
        params["sourceAddresses"] = json!(addresses);
    }
    if let Some(address) = change_address {
        params["changeAddress"] = json!(address);
    }
    if let Some(id) = opts.payment_id {
        params["paymentId"] = json!(id);
    }
    if let Some(extra) = opts.extra {
        params["extra"] = json!(extra);
    }
    Ok(params)
}

/// Params for `sendFusionTransaction`. Absent `addresses` is treated as
/// an empty list (whole-wallet fusion); a `destinationAddress` is
/// resolved and validated whenever present.
async fn normalize_fusion<L: TxtLookup>(
    lookup: &L,
    opts: FusionOptions,
) -> Result<Value, RpcError> {
    let addresses = match opts.addresses {
        Some(addresses) => resolve_address_list(lookup, "addresses", addresses).await?,
        None => Vec::new(),
    };
    let destination = match opts.destination_address {
        Some(address) => {
            Some(resolve_single_address(lookup, "destinationAddress", &address).await?)
        }
        None => None,
    };
    let anonymity = check_mixin(opts.mix_in)?;
    let mut params = json!({
        "threshold": opts.threshold,
        "anonymity": anonymity,
        "addresses": addresses,
    });
    if let Some(address) = destination {
        params["destinationAddress"] = json!(address);
    }
    Ok(params)
}

/// Params for `getTransactionHashes` / `getTransactions`.
async fn normalize_transactions_query<L: TxtLookup>(
    lookup: &L,
    query: TransactionsQuery,
) -> Result<Value, RpcError> {
    if query.first_block_index.is_none() && query.block_hash.is_none() {
        return Err(RpcError::MissingBlockRef);
    }
    if let Some(hash) = &query.block_hash {
        if !is_hex64(hash) {
            return Err(RpcError::validation("blockHash", expect::HEX64));
        }
    }
    check_payment_id(query.payment_id.as_ref())?;
    let addresses = match query.addresses {
        Some(addresses) => Some(resolve_address_list(lookup, "addresses", addresses).await?),
        None => None,
    };
    let mut params = json!({ "blockCount": query.block_count });
    if let Some(index) = query.first_block_index {
        params["firstBlockIndex"] = json!(index);
    }
    if let Some(hash) = query.block_hash {
        params["blockHash"] = json!(hash);
    }
    if let Some(id) = query.payment_id {
        params["paymentId"] = json!(id);
    }
    if let Some(addresses) = addresses {
        params["addresses"] = json!(addresses);
    }
    Ok(params)
}

// =============================================================================
// WalletRpc
// =============================================================================

/// Async RPC client for the UltraNote Infinity wallet service.
pub struct WalletRpc<L = DnsLookup> {
    client: RpcClient,
    lookup: L,
}

impl WalletRpc {
    /// Client for the wallet at `url`, resolving aliases over DNS.
    pub fn new(url: &str) -> Self {
        Self {
            client: RpcClient::new(url),
            lookup: DnsLookup::new(),
        }
    }

    /// Client for the wallet endpoint of `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, RpcError> {
        Ok(Self {
            client: RpcClient::wallet(config)?,
            lookup: DnsLookup::new(),
        })
    }
}

impl<L: TxtLookup> WalletRpc<L> {
    /// Client with a custom TXT lookup.
    pub fn with_lookup(client: RpcClient, lookup: L) -> Self {
        Self { client, lookup }
    }

    /// The underlying HTTP client.
    pub fn client(&self) -> &RpcClient {
        &self.client
    }

    // =========================================================================
    // Legacy simplewallet RPC
    // =========================================================================

    /// Unspent outputs of the wallet.
    pub async fn outputs(&self) -> Result<Value, RpcError> {
        self.client.call("get_outputs", json!({})).await
    }

    /// Current wallet blockchain height.
    pub async fn height(&self) -> Result<u64, RpcError> {
        let val = self.client.call("get_height", json!({})).await?;
        let res: HeightResult = serde_json::from_value(val)?;
        Ok(res.height)
    }

    /// Wallet balance.
    pub async fn balance(&self) -> Result<Balance, RpcError> {
        let val = self.client.call("getbalance", json!({})).await?;
        Ok(serde_json::from_value(val)?)
    }

    /// Transaction messages, optionally paged.
    pub async fn messages(&self, filter: MessagesFilter) -> Result<Value, RpcError> {
        let mut params = json!({});
        if let Some(id) = filter.first_tx_id {
            params["first_tx_id"] = json!(id);
        }
        if let Some(limit) = filter.tx_limit {
            params["tx_limit"] = json!(limit);
        }
        self.client.call("get_messages", params).await
    }

    /// Incoming payments carrying `payment_id`.
    pub async fn payments(&self, payment_id: &str) -> Result<Payments, RpcError> {
        if !is_hex64(payment_id) {
            return Err(RpcError::validation("paymentId", expect::HEX64));
        }
        let val = self
            .client
            .call("get_payments", json!({ "payment_id": payment_id }))
            .await?;
        Ok(serde_json::from_value(val)?)
    }

    /// Transfer history.
    pub async fn transfers(&self) -> Result<Value, RpcError> {
        self.client.call("get_transfers", json!({})).await
    }

    /// Save the wallet to disk.
    pub async fn store(&self) -> Result<(), RpcError> {
        self.client.call("store", json!({})).await?;
        Ok(())
    }

    /// Discard local wallet cache and rescan from the start.
    pub async fn reset(&self) -> Result<(), RpcError> {
        self.client.call("reset", json!({})).await?;
        Ok(())
    }

    /// Consolidate dust outputs.
    pub async fn optimize(&self) -> Result<Value, RpcError> {
        self.client.call("optimize", json!({})).await
    }

    /// Send a transaction via the legacy `transfer` method.
    pub async fn send(&self, opts: SendOptions) -> Result<TransferResult, RpcError> {
        let params = normalize_send(&self.lookup, opts).await?;
        let val = self.client.call("transfer", params).await?;
        Ok(serde_json::from_value(val)?)
    }

    // =========================================================================
    // walletd RPC
    // =========================================================================

    /// Rescan from scratch, or replace the wallet with one derived from
    /// `view_secret_key` before rescanning.
    pub async fn reset_or_replace(&self, view_secret_key: Option<&str>) -> Result<(), RpcError> {
        let mut params = json!({});
        if let Some(key) = view_secret_key {
            if !is_hex64(key) {
                return Err(RpcError::validation("viewSecretKey", expect::HEX64));
            }
            params["viewSecretKey"] = json!(key);
        }
        self.client.call("reset", params).await?;
        Ok(())
    }

    /// Sync status.
    pub async fn status(&self) -> Result<Status, RpcError> {
        let val = self.client.call("getStatus", json!({})).await?;
        Ok(serde_json::from_value(val)?)
    }

    /// Balance of one address. Accepts an alias.
    pub async fn get_balance(&self, address: &str) -> Result<AddressBalance, RpcError> {
        let address = resolve_single_address(&self.lookup, "address", address).await?;
        let val = self
            .client
            .call("getBalance", json!({ "address": address }))
            .await?;
        Ok(serde_json::from_value(val)?)
    }

    /// Create a new address in the container.
    pub async fn create_address(&self) -> Result<String, RpcError> {
        let val = self.client.call("createAddress", json!({})).await?;
        let res: AddressResult = serde_json::from_value(val)?;
        Ok(res.address)
    }

    /// Delete an address from the container. Accepts an alias.
    pub async fn delete_address(&self, address: &str) -> Result<(), RpcError> {
        let address = resolve_single_address(&self.lookup, "address", address).await?;
        self.client
            .call("deleteAddress", json!({ "address": address }))
            .await?;
        Ok(())
    }

    /// All addresses in the container.
    pub async fn get_addresses(&self) -> Result<Vec<String>, RpcError> {
        let val = self.client.call("getAddresses", json!({})).await?;
        let res: AddressesResult = serde_json::from_value(val)?;
        Ok(res.addresses)
    }

    /// The container's view secret key.
    pub async fn get_view_secret_key(&self) -> Result<String, RpcError> {
        let val = self.client.call("getViewKey", json!({})).await?;
        let res: ViewKey = serde_json::from_value(val)?;
        Ok(res.view_secret_key)
    }

    /// Spend keys for one address. Accepts an alias.
    pub async fn get_spend_keys(&self, address: &str) -> Result<SpendKeys, RpcError> {
        let address = resolve_single_address(&self.lookup, "address", address).await?;
        let val = self
            .client
            .call("getSpendKeys", json!({ "address": address }))
            .await?;
        Ok(serde_json::from_value(val)?)
    }

    /// Build an integrated address from an address and a payment id.
    /// Accepts an alias for the address.
    pub async fn create_integrated(
        &self,
        address: &str,
        payment_id: &str,
    ) -> Result<String, RpcError> {
        let address = resolve_single_address(&self.lookup, "address", address).await?;
        if !is_hex64(payment_id) {
            return Err(RpcError::validation("paymentId", expect::HEX64));
        }
        let val = self
            .client
            .call(
                "createIntegrated",
                json!({ "address": address, "payment_id": payment_id }),
            )
            .await?;
        let res: IntegratedAddressResult = serde_json::from_value(val)?;
        Ok(res.integrated_address)
    }

    /// Hashes of `block_count` blocks starting at `first_block_index`.
    pub async fn get_block_hashes(
        &self,
        first_block_index: u64,
        block_count: u64,
    ) -> Result<Vec<String>, RpcError> {
        let val = self
            .client
            .call(
                "getBlockHashes",
                json!({ "firstBlockIndex": first_block_index, "blockCount": block_count }),
            )
            .await?;
        let res: BlockHashesResult = serde_json::from_value(val)?;
        Ok(res.block_hashes)
    }

    /// Details of one wallet transaction.
    pub async fn get_transaction(&self, hash: &str) -> Result<Value, RpcError> {
        if !is_hex64(hash) {
            return Err(RpcError::validation("hash", expect::HEX64));
        }
        self.client
            .call("getTransaction", json!({ "transactionHash": hash }))
            .await
    }

    /// Unconfirmed transaction hashes, optionally filtered by address.
    /// Each address entry may be an alias.
    pub async fn get_unconfirmed_transaction_hashes(
        &self,
        addresses: Option<Vec<String>>,
    ) -> Result<Vec<String>, RpcError> {
        let mut params = json!({});
        if let Some(addresses) = addresses {
            let addresses = resolve_address_list(&self.lookup, "addresses", addresses).await?;
            params["addresses"] = json!(addresses);
        }
        let val = self
            .client
            .call("getUnconfirmedTransactionHashes", params)
            .await?;
        let res: TransactionHashListResult = serde_json::from_value(val)?;
        Ok(res.transaction_hashes)
    }

    /// Transaction hashes within a block range.
    pub async fn get_transaction_hashes(
        &self,
        query: TransactionsQuery,
    ) -> Result<TransactionHashesResult, RpcError> {
        let params = normalize_transactions_query(&self.lookup, query).await?;
        let val = self.client.call("getTransactionHashes", params).await?;
        Ok(serde_json::from_value(val)?)
    }

    /// Full transactions within a block range.
    pub async fn get_transactions(
        &self,
        query: TransactionsQuery,
    ) -> Result<TransactionsResult, RpcError> {
        let params = normalize_transactions_query(&self.lookup, query).await?;
        let val = self.client.call("getTransactions", params).await?;
        Ok(serde_json::from_value(val)?)
    }

    /// Send a transaction via the walletd dialect.
    pub async fn send_transaction(
        &self,
        opts: TransactionOptions,
    ) -> Result<TransactionHashResult, RpcError> {
        let params = normalize_transaction(&self.lookup, opts, false).await?;
        let val = self.client.call("sendTransaction", params).await?;
        Ok(serde_json::from_value(val)?)
    }

    /// Build a transaction and hold it for later submission.
    pub async fn create_delayed_transaction(
        &self,
        opts: TransactionOptions,
    ) -> Result<TransactionHashResult, RpcError> {
        let params = normalize_transaction(&self.lookup, opts, true).await?;
        let val = self.client.call("createDelayedTransaction", params).await?;
        Ok(serde_json::from_value(val)?)
    }

    /// Hashes of held delayed transactions.
    pub async fn get_delayed_transaction_hashes(&self) -> Result<Vec<String>, RpcError> {
        let val = self
            .client
            .call("getDelayedTransactionHashes", json!({}))
            .await?;
        let res: TransactionHashListResult = serde_json::from_value(val)?;
        Ok(res.transaction_hashes)
    }

    /// Discard a held delayed transaction.
    pub async fn delete_delayed_transaction(&self, hash: &str) -> Result<(), RpcError> {
        if !is_hex64(hash) {
            return Err(RpcError::validation("hash", expect::HEX64));
        }
        self.client
            .call("deleteDelayedTransaction", json!({ "transactionHash": hash }))
            .await?;
        Ok(())
    }

    /// Submit a held delayed transaction.
    pub async fn send_delayed_transaction(&self, hash: &str) -> Result<(), RpcError> {
        if !is_hex64(hash) {
            return Err(RpcError::validation("hash", expect::HEX64));
        }
        self.client
            .call("sendDelayedTransaction", json!({ "transactionHash": hash }))
            .await?;
        Ok(())
    }

    /// Decode messages embedded in a transaction extra blob.
    pub async fn get_messages_from_extra(&self, extra: &str) -> Result<Value, RpcError> {
        if !is_hex_string(extra) {
            return Err(RpcError::validation("extra", expect::HEX));
        }
        self.client
            .call("getMessagesFromExtra", json!({ "extra": extra }))
            .await
    }

    /// Lock `amount` as a deposit under `address`. Accepts an alias.
    pub async fn create_deposit(
        &self,
        address: &str,
        amount: u64,
    ) -> Result<TransactionHashResult, RpcError> {
        let address = resolve_single_address(&self.lookup, "address", address).await?;
        let val = self
            .client
            .call(
                "createDeposit",
                json!({ "address": address, "amount": amount }),
            )
            .await?;
        Ok(serde_json::from_value(val)?)
    }

    /// Count outputs that a fusion at `threshold` would consolidate.
    /// Each address entry may be an alias.
    pub async fn estimate_fusion(
        &self,
        threshold: u64,
        addresses: Option<Vec<String>>,
    ) -> Result<FusionEstimate, RpcError> {
        let mut params = json!({ "threshold": threshold });
        if let Some(addresses) = addresses {
            let addresses = resolve_address_list(&self.lookup, "addresses", addresses).await?;
            params["addresses"] = json!(addresses);
        }
        let val = self.client.call("estimateFusion", params).await?;
        Ok(serde_json::from_value(val)?)
    }

    /// Consolidate small outputs into fewer larger ones.
    pub async fn send_fusion_transaction(
        &self,
        opts: FusionOptions,
    ) -> Result<TransactionHashResult, RpcError> {
        let params = normalize_fusion(&self.lookup, opts).await?;
        let val = self.client.call("sendFusionTransaction", params).await?;
        Ok(serde_json::from_value(val)?)
    }
}
