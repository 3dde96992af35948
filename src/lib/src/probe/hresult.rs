//! HRESULT extraction and decoding for management-interface failures.

use regex::Regex;
use std::sync::OnceLock;

fn code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"0x([0-9A-Fa-f]{8})").unwrap())
}

/// WBEM status codes known to come back from the TPM device query.
fn name(hr: u32) -> &'static str {
    match hr {
        0x8004_1001 => "WBEM_E_FAILED",
        0x8004_1002 => "WBEM_E_NOT_FOUND",
        0x8004_1003 => "WBEM_E_ACCESS_DENIED",
        0x8004_1010 => "WBEM_E_INVALID_CLASS",
        _ => "UNKNOWN",
    }
}

/// Extract the first 8-hex-digit status code from an error text and
/// decode it. `None` when the text carries no code pattern.
pub fn decode(text: &str) -> Option<String> {
    let captures = code_pattern().captures(text)?;
    // Eight hex digits always fit a u32.
    let hr = u32::from_str_radix(&captures[1], 16).ok()?;
    Some(format!("hresult=0x{hr:08X}:{}", name(hr)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_denied_decodes_exactly() {
        assert_eq!(
            decode("query failed with 0x80041003 (access denied)").as_deref(),
            Some("hresult=0x80041003:WBEM_E_ACCESS_DENIED")
        );
    }

    #[test]
    fn test_known_codes() {
        assert_eq!(
            decode("0x80041001").as_deref(),
            Some("hresult=0x80041001:WBEM_E_FAILED")
        );
        assert_eq!(
            decode("0x80041002").as_deref(),
            Some("hresult=0x80041002:WBEM_E_NOT_FOUND")
        );
        assert_eq!(
            decode("0x80041010").as_deref(),
            Some("hresult=0x80041010:WBEM_E_INVALID_CLASS")
        );
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(
            decode("boom 0xdeadbeef").as_deref(),
            Some("hresult=0xDEADBEEF:UNKNOWN")
        );
    }

    #[test]
    fn test_lowercase_digits_are_accepted() {
        assert_eq!(
            decode("0x80041003 vs 0x80041003").as_deref(),
            Some("hresult=0x80041003:WBEM_E_ACCESS_DENIED")
        );
    }

    #[test]
    fn test_no_pattern() {
        assert_eq!(decode("access denied"), None);
        // Seven digits is not a status code.
        assert_eq!(decode("0x8004100"), None);
    }
}
