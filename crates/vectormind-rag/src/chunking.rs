//! Fixed-stride text chunking

/// Split `text` into consecutive, non-overlapping chunks of `chunk_size` characters.
///
/// Sizes count Unicode scalar values, not bytes, so multi-byte text is never
/// split inside a character. The last chunk may be shorter. Concatenating the
/// chunks in order gives back `text` exactly.
///
/// `chunk_size` must be non-zero; configuration validation guarantees that
/// before a pipeline is built.
pub fn chunk_text(text: &str, chunk_size: usize) -> Vec<&str> {
    assert!(chunk_size > 0, "chunk_size must be non-zero");

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (offset, _) in text.char_indices() {
        if count == chunk_size {
            chunks.push(&text[start..offset]);
            start = offset;
            count = 0;
        }
        count += 1;
    }

    if start < text.len() {
        chunks.push(&text[start..]);
    }

    chunks
}
