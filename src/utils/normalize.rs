/// Canonical form used for every identifier comparison against sheet data:
/// surrounding whitespace removed, lowercased.
pub fn canon(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn canon_eq(a: &str, b: &str) -> bool {
    canon(a) == canon(b)
}
