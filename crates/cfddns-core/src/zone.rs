//! Record name normalisation and zone derivation
//!
//! The zone defaults to the record's registrable domain (public suffix plus
//! one label), computed from the embedded public suffix list. Names under
//! suffixes the list does not know fall back to the last label as suffix,
//! so `foo.bar.tld` still yields `bar.tld`.

/// Normalise a record or zone name for comparison and lookup
///
/// Trims whitespace, drops a trailing root dot and lowercases.
pub fn normalize_name(name: &str) -> String {
    name.trim().trim_end_matches('.').to_ascii_lowercase()
}

/// Derive the registrable domain owning `name`
///
/// Returns `None` when `name` is itself a public suffix or has no
/// registrable part.
pub fn registrable_domain(name: &str) -> Option<String> {
    let name = normalize_name(name);
    if name.is_empty() || name.split('.').any(str::is_empty) {
        return None;
    }

    psl::domain_str(&name).map(str::to_string)
}
