/// Computes the content hash of a piece of text.
///
/// The digest is a `blake3` hash rendered as 64 lowercase hex characters. Identical input
/// always yields the identical digest, which makes it suitable as a stable file name.
///
/// # Example
///
/// ```
/// use quarry_utils::hash::hash_str;
///
/// let key = hash_str("SELECT * FROM `users`");
/// assert_eq!(key.len(), 64);
/// ```
pub fn hash_str(text: &str) -> String {
    blake3::hash(text.as_bytes()).to_hex().to_string()
}
