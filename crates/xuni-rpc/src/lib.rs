//! UltraNote Infinity RPC client library.
//!
//! Typed async clients for the UltraNote Infinity daemon and wallet
//! JSON-RPC interfaces. Every parameterized call validates its inputs,
//! fills documented defaults (fee, mixin, unlock height), and resolves
//! OpenAlias-style recipient names to addresses before anything goes on
//! the wire.
//!
//! # Example
//!
//! ```ignore
//! use xuni_rpc::{SendOptions, Transfer, WalletRpc};
//!
//! #[tokio::main]
//! async fn main() {
//!     let wallet = WalletRpc::new("http://localhost:8070");
//!     let result = wallet
//!         .send(SendOptions {
//!             transfers: vec![Transfer {
//!                 address: "donate.ultranote.org".into(),
//!                 amount: 1_000_000,
//!                 message: None,
//!             }],
//!             ..Default::default()
//!         })
//!         .await
//!         .unwrap();
//!     println!("sent: {}", result.tx_hash);
//! }
//! ```

pub mod client;
pub mod daemon;
pub mod error;
pub mod resolve;
pub mod validate;
pub mod wallet;

pub use client::{ClientConfig, RpcClient};
pub use daemon::DaemonRpc;
pub use error::RpcError;
pub use resolve::{DnsLookup, TxtLookup};
pub use wallet::{
    FusionOptions, SendOptions, TransactionOptions, Transfer, TransactionsQuery, WalletRpc,
};

/// Default RPC ports.
pub mod ports {
    pub const DAEMON: u16 = 43000;
    pub const WALLET: u16 = 8070;
}
