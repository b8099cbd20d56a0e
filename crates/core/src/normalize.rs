use unicode_normalization::UnicodeNormalization;

/// Folds a slot value or dataset cell into its lookup key: NFKC, then full
/// Unicode lowercase. Surrounding whitespace is not part of the key.
pub fn lookup_key(raw: &str) -> String {
    let folded: String = raw.trim().nfkc().collect();
    folded.to_lowercase()
}
