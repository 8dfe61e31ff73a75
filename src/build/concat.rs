//! Fragment concatenation.

/// Separator used when the configuration does not name one.
pub const DEFAULT_SEPARATOR: &str = "\n\n";

/// Join fragments with `separator`, without a trailing separator.
///
/// Fragment content is copied byte-for-byte.
pub fn concat_fragments<S: AsRef<str>>(fragments: &[S], separator: &str) -> String {
    let total: usize = fragments.iter().map(|f| f.as_ref().len()).sum::<usize>()
        + separator.len() * fragments.len().saturating_sub(1);

    let mut body = String::with_capacity(total);
    for (i, fragment) in fragments.iter().enumerate() {
        if i > 0 {
            body.push_str(separator);
        }
        body.push_str(fragment.as_ref());
    }
    body
}
