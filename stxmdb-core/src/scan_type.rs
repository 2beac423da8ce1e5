//! Acquisition-mode tags recorded by the STXM control software.

/// Every scan type the indexer knows about.
///
/// An unfiltered query matches this list rather than any value, so records
/// tagged with something else never show up unless asked for by name.
pub const KNOWN_SCAN_TYPES: [&str; 12] = [
    "detector image",
    "osa image",
    "osa focus",
    "sample focus",
    "sample point spectrum",
    "sample line spectrum",
    "sample image",
    "sample image stack",
    "generic scan",
    "coarse image scan",
    "coarse goni scan",
    "tomography scan",
];

/// Returns true if `tag` is one of [`KNOWN_SCAN_TYPES`].
#[must_use]
pub fn is_known_scan_type(tag: &str) -> bool {
    KNOWN_SCAN_TYPES.contains(&tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tags_are_exact_matches() {
        assert!(is_known_scan_type("sample focus"));
        assert!(!is_known_scan_type("Sample Focus"));
        assert!(!is_known_scan_type("sample focus "));
    }
}
