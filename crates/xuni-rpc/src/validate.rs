//! Shape predicates for RPC inputs.
//!
//! Pure boolean classifiers over a single value; they never panic and
//! never allocate. Request normalization goes through these instead of
//! re-implementing checks inline.

use crate::wallet::Transfer;

/// Prefix every UltraNote Infinity address starts with.
pub const ADDRESS_PREFIX: &str = "Xuni";
/// Length of a standard address.
pub const ADDRESS_LEN: usize = 99;
/// Length of an integrated address (standard address plus payment id).
pub const INTEGRATED_ADDRESS_LEN: usize = 187;

/// True iff `s` is a 99-character string beginning with `Xuni`.
pub fn is_address(s: &str) -> bool {
    s.len() == ADDRESS_LEN && s.starts_with(ADDRESS_PREFIX)
}

/// True iff `s` is a 187-character integrated address beginning with `Xuni`.
pub fn is_integrated_address(s: &str) -> bool {
    s.len() == INTEGRATED_ADDRESS_LEN && s.starts_with(ADDRESS_PREFIX)
}

/// True iff `s` is exactly 64 hexadecimal digits.
pub fn is_hex64(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// True iff `s` contains only hexadecimal digits. The empty string passes.
pub fn is_hex_string(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// True iff `n` is a non-negative integer.
pub fn is_non_negative(n: i64) -> bool {
    n >= 0
}

/// True iff `t` is a well-formed transfer. The amount and optional
/// message are already shaped by the type; only the address needs a
/// runtime check.
pub fn is_transfer(t: &Transfer) -> bool {
    is_address(&t.address)
}

/// True iff every element of `items` satisfies `pred`. Vacuously true
/// for an empty slice.
pub fn array_of<T>(items: &[T], pred: impl Fn(&T) -> bool) -> bool {
    items.iter().all(pred)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr() -> String {
        format!("Xuni{}", "1".repeat(95))
    }

    #[test]
    fn test_address_shape() {
        assert!(is_address(&addr()));
        assert!(!is_address(&format!("Xuni{}", "1".repeat(94))), "too short");
        assert!(!is_address(&format!("Xuni{}", "1".repeat(96))), "too long");
        assert!(!is_address(&format!("Yuni{}", "1".repeat(95))), "wrong prefix");
        assert!(!is_address(""));
    }

    #[test]
    fn test_integrated_address_shape() {
        let integrated = format!("Xuni{}", "f".repeat(183));
        assert!(is_integrated_address(&integrated));
        assert!(!is_integrated_address(&addr()), "standard length is not integrated");
        assert!(!is_address(&integrated), "integrated length is not standard");
    }

    #[test]
    fn test_hex64() {
        let h = "a".repeat(64);
        assert!(is_hex64(&h));
        assert!(is_hex64(&"A1".repeat(32)), "mixed case allowed");
        assert!(!is_hex64(&"a".repeat(63)));
        assert!(!is_hex64(&"a".repeat(65)));
        assert!(!is_hex64(&format!("{}g", "a".repeat(63))));
    }

    #[test]
    fn test_hex_string() {
        assert!(is_hex_string(""));
        assert!(is_hex_string("deadBEEF01"));
        assert!(!is_hex_string("deadbeet"));
        assert!(!is_hex_string("0x00"));
    }

    #[test]
    fn test_non_negative() {
        assert!(is_non_negative(0));
        assert!(is_non_negative(1));
        assert!(!is_non_negative(-1));
    }

    #[test]
    fn test_transfer() {
        let good = Transfer {
            address: addr(),
            amount: 100,
            message: None,
        };
        assert!(is_transfer(&good));
        let bad = Transfer {
            address: "not-an-address".to_string(),
            amount: 100,
            message: Some("hi".to_string()),
        };
        assert!(!is_transfer(&bad));
    }

    #[test]
    fn test_array_of() {
        let hashes = vec!["a".repeat(64), "b".repeat(64)];
        assert!(array_of(&hashes, |h| is_hex64(h)));
        let mixed = vec!["a".repeat(64), "nope".to_string()];
        assert!(!array_of(&mixed, |h| is_hex64(h)));
        let empty: Vec<String> = Vec::new();
        assert!(array_of(&empty, |h| is_hex64(h)), "vacuously true");
    }
}
