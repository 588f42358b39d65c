/*!
 * Sentence-based text chunking.
 *
 * Chapter markup is sent to the model in pieces so a long chapter never
 * exceeds the context window. Text is split on sentence boundaries
 * (". ") and sentences are greedily packed into chunks of roughly
 * `max_chunk_size` bytes. Dropping each chunk's trailing period and
 * rejoining the chunks with ". " reconstructs the input text exactly.
 */

/// Split text into chunks of at most `max_chunk_size` bytes, breaking on
/// sentence boundaries
///
/// A sentence longer than `max_chunk_size` becomes a chunk of its own
/// rather than being split mid-sentence, so the bound is nominal. Every
/// returned chunk ends with a period, which the sentence split removed
/// everywhere except at the end of the input.
///
/// # Arguments
/// * `text` - The text to split
/// * `max_chunk_size` - Target upper bound on chunk length in bytes
///
/// # Returns
/// * `Vec<String>` - The chunks, in input order
pub fn split_by_sentence(text: &str, max_chunk_size: usize) -> Vec<String> {
    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();

    for sentence in text.split(". ") {
        if current.len() + sentence.len() > max_chunk_size {
            if !current.is_empty() {
                chunks.push(current);
            }
            current = sentence.to_string();
        } else {
            // The separator is restored here and trimmed off the first
            // chunk below, so interior boundaries survive verbatim.
            current.push_str(". ");
            current.push_str(sentence);
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    if let Some(first) = chunks.first_mut() {
        if let Some(stripped) = first.strip_prefix(". ") {
            *first = stripped.to_string();
        }
    }

    for chunk in &mut chunks {
        chunk.push('.');
    }

    chunks
}
