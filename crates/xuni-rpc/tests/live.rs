//! Live integration tests against running services.
//!
//! Run with: cargo test -p xuni-rpc --test live -- --ignored
//!
//! Requires a daemon at XUNI_DAEMON_URL (default: http://127.0.0.1:43000)
//! and a wallet at XUNI_WALLET_URL (default: http://127.0.0.1:8070).

use xuni_rpc::{DaemonRpc, WalletRpc};

fn daemon() -> DaemonRpc {
    let url = std::env::var("XUNI_DAEMON_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:43000".to_string());
    DaemonRpc::new(&url)
}

fn wallet() -> WalletRpc {
    let url = std::env::var("XUNI_WALLET_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:8070".to_string());
    WalletRpc::new(&url)
}

#[tokio::test]
#[ignore]
async fn test_daemon_info() {
    let d = daemon();
    let info = d.info().await.expect("getinfo failed");
    assert!(info.height > 0, "height should be positive");
    println!("Daemon height: {}", info.height);
    println!("Difficulty: {}", info.difficulty);
}

#[tokio::test]
#[ignore]
async fn test_daemon_count_matches_header() {
    let d = daemon();
    let count = d.count().await.expect("getblockcount failed");
    let header = d.last_block_header().await.expect("getlastblockheader failed");
    assert!(count >= header.height, "count should cover the tip");
    println!("Block count: {count}, tip: {}", header.height);
}

#[tokio::test]
#[ignore]
async fn test_daemon_block_hash_round_trip() {
    let d = daemon();
    let hash = d.block_hash_by_height(0).await.expect("on_getblockhash failed");
    assert_eq!(hash.len(), 64, "genesis hash should be 64 hex chars");
    let header = d
        .block_header_by_hash(&hash)
        .await
        .expect("getblockheaderbyhash failed");
    assert_eq!(header.height, 0);
}

#[tokio::test]
#[ignore]
async fn test_wallet_status() {
    let w = wallet();
    let status = w.status().await.expect("getStatus failed");
    assert!(status.block_count > 0);
    println!(
        "Wallet at {}/{} blocks, {} peers",
        status.block_count, status.known_block_count, status.peer_count
    );
}

#[tokio::test]
#[ignore]
async fn test_wallet_addresses_are_well_formed() {
    let w = wallet();
    let addresses = w.get_addresses().await.expect("getAddresses failed");
    assert!(!addresses.is_empty(), "container should hold an address");
    for address in &addresses {
        assert!(
            xuni_rpc::validate::is_address(address),
            "malformed address: {address}"
        );
    }
}
