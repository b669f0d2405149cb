//! OpenAlias-style recipient resolution.
//!
//! Maps a domain-like recipient name (e.g. `donate.ultranote.org`) to an
//! address by scanning the name's DNS TXT records for an `oa1:xuni`
//! record carrying a `recipient_address=` field. Strings that already
//! parse as addresses pass through untouched, so normalizers hand every
//! address-bearing field to [`resolve_address`] unconditionally.

use crate::error::RpcError;
use crate::validate::{is_address, is_integrated_address};
use crate::wallet::Transfer;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use log::debug;
use std::future::Future;
use std::time::Duration;

/// Marker token an alias TXT record must carry.
const TXT_MARKER: &str = "oa1:xuni";
/// Key whose value is the resolved address.
const RECIPIENT_KEY: &str = "recipient_address=";
/// Upper bound on a single TXT query attempt.
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// TXT record source for alias resolution.
///
/// The production implementation is [`DnsLookup`]; tests substitute
/// in-memory stubs.
pub trait TxtLookup {
    /// Return the TXT record strings published under `name`, with each
    /// record's character-string parts concatenated.
    fn txt_records(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Vec<String>, RpcError>> + Send;
}

/// DNS-backed TXT lookup using the default resolver configuration.
pub struct DnsLookup {
    resolver: TokioAsyncResolver,
}

impl DnsLookup {
    pub fn new() -> Self {
        let mut opts = ResolverOpts::default();
        opts.timeout = LOOKUP_TIMEOUT;
        Self {
            resolver: TokioAsyncResolver::tokio(ResolverConfig::default(), opts),
        }
    }
}

impl Default for DnsLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl TxtLookup for DnsLookup {
    fn txt_records(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Vec<String>, RpcError>> + Send {
        async move {
            let lookup = self.resolver.txt_lookup(name).await.map_err(|e| {
                RpcError::AliasResolution {
                    alias: name.to_string(),
                    reason: e.to_string(),
                }
            })?;
            Ok(lookup
                .iter()
                .map(|txt| {
                    txt.txt_data()
                        .iter()
                        .map(|part| String::from_utf8_lossy(part))
                        .collect::<String>()
                })
                .collect())
        }
    }
}

/// Resolve one address-or-alias string.
///
/// A string that already satisfies the address predicates is returned
/// unchanged without touching the network. A string with no `.` is
/// rejected outright as neither an address nor an alias. Otherwise the
/// name's TXT records are scanned in order and the first record carrying
/// the `oa1:xuni` marker yields the value of its `recipient_address=`
/// field, terminated by `;`.
pub async fn resolve_address<L: TxtLookup>(lookup: &L, input: &str) -> Result<String, RpcError> {
    if is_address(input) || is_integrated_address(input) {
        return Ok(input.to_string());
    }
    if !input.contains('.') {
        return Err(RpcError::InvalidAddressOrAlias {
            input: input.to_string(),
        });
    }
    debug!("resolving alias {input}");
    let records = lookup.txt_records(input).await?;
    for record in &records {
        if !record.contains(TXT_MARKER) {
            continue;
        }
        if let Some(rest) = record.split(RECIPIENT_KEY).nth(1) {
            let value = rest.split(';').next().unwrap_or("").trim();
            if !value.is_empty() {
                debug!("alias {input} resolved");
                return Ok(value.to_string());
            }
        }
    }
    Err(RpcError::AliasResolution {
        alias: input.to_string(),
        reason: format!("no TXT record with an {TXT_MARKER} recipient_address field"),
    })
}

/// Resolve every transfer address, sequentially in list order.
pub async fn resolve_transfers<L: TxtLookup>(
    lookup: &L,
    transfers: Vec<Transfer>,
) -> Result<Vec<Transfer>, RpcError> {
    let mut resolved = Vec::with_capacity(transfers.len());
    for mut transfer in transfers {
        transfer.address = resolve_address(lookup, &transfer.address).await?;
        resolved.push(transfer);
    }
    Ok(resolved)
}

/// Resolve every address string, sequentially in list order.
pub async fn resolve_addresses<L: TxtLookup>(
    lookup: &L,
    addresses: Vec<String>,
) -> Result<Vec<String>, RpcError> {
    let mut resolved = Vec::with_capacity(addresses.len());
    for address in addresses {
        resolved.push(resolve_address(lookup, &address).await?);
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn addr() -> String {
        format!("Xuni{}", "2".repeat(95))
    }

    /// Serves a fixed record set and counts invocations.
    struct StaticLookup {
        records: Vec<String>,
        calls: AtomicUsize,
    }

    impl StaticLookup {
        fn new(records: Vec<String>) -> Self {
            Self {
                records,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl TxtLookup for StaticLookup {
        fn txt_records(
            &self,
            _name: &str,
        ) -> impl Future<Output = Result<Vec<String>, RpcError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let records = self.records.clone();
            async move { Ok(records) }
        }
    }

    /// Fails the test if any lookup is attempted.
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

    /// Always fails with a DNS-style error.
    struct FailingLookup;

    impl TxtLookup for FailingLookup {
        fn txt_records(
            &self,
            name: &str,
        ) -> impl Future<Output = Result<Vec<String>, RpcError>> + Send {
            let name = name.to_string();
            async move {
                Err(RpcError::AliasResolution {
                    alias: name,
                    reason: "no records found".to_string(),
                })
            }
        }
    }

    #[tokio::test]
    async fn test_valid_address_is_passed_through_without_lookup() {
        let a = addr();
        let resolved = resolve_address(&NoLookup, &a).await.unwrap();
        assert_eq!(resolved, a);
    }

    #[tokio::test]
    async fn test_integrated_address_is_passed_through_without_lookup() {
        let a = format!("Xuni{}", "e".repeat(183));
        let resolved = resolve_address(&NoLookup, &a).await.unwrap();
        assert_eq!(resolved, a);
    }

    #[tokio::test]
    async fn test_string_without_dot_is_rejected_without_lookup() {
        let err = resolve_address(&NoLookup, "notanalias").await.unwrap_err();
        assert!(matches!(err, RpcError::InvalidAddressOrAlias { .. }));
    }

    #[tokio::test]
    async fn test_marker_record_resolves() {
        let a = addr();
        let lookup = StaticLookup::new(vec![
            "v=spf1 include:example.org ~all".to_string(),
            format!("oa1:xuni recipient_address={a}; recipient_name=Donations;"),
        ]);
        let resolved = resolve_address(&lookup, "donate.example.org").await.unwrap();
        assert_eq!(resolved, a);
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_record_without_terminator_resolves() {
        let a = addr();
        let lookup = StaticLookup::new(vec![format!("oa1:xuni recipient_address={a}")]);
        let resolved = resolve_address(&lookup, "donate.example.org").await.unwrap();
        assert_eq!(resolved, a);
    }

    #[tokio::test]
    async fn test_no_marker_record_fails() {
        let lookup = StaticLookup::new(vec![
            "v=spf1 -all".to_string(),
            "oa1:btc recipient_address=1abc;".to_string(),
        ]);
        let err = resolve_address(&lookup, "donate.example.org").await.unwrap_err();
        assert!(matches!(err, RpcError::AliasResolution { .. }));
    }

    #[tokio::test]
    async fn test_lookup_failure_propagates() {
        let err = resolve_address(&FailingLookup, "donate.example.org")
            .await
            .unwrap_err();
        match err {
            RpcError::AliasResolution { alias, reason } => {
                assert_eq!(alias, "donate.example.org");
                assert_eq!(reason, "no records found");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_batch_resolution_in_list_order() {
        let a = addr();
        let lookup = StaticLookup::new(vec![format!("oa1:xuni recipient_address={a};")]);
        let resolved = resolve_addresses(
            &lookup,
            vec![a.clone(), "one.example.org".into(), "two.example.org".into()],
        )
        .await
        .unwrap();
        assert_eq!(resolved, vec![a.clone(), a.clone(), a]);
        // Only the two aliases hit the resolver.
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 2);
    }
}
