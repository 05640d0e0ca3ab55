//! Prompt construction under the character ceiling.

/// Return at most `limit` leading characters of `text`.
///
/// Counts Unicode scalar values, never splits a character, and never rewraps the text.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

/// Wrap document text in the fixed summarization instructions.
pub fn build_prompt(text: &str, language: &str, max_summary_chars: usize) -> String {
    format!(
        "Summarize the core content of the following Word document in concise, clear {language}, \
         covering its main points:\n\
         {text}\n\
         Requirements:\n\
         1. At most {max_summary_chars} characters\n\
         2. Clear logic; bullet points are optional\n\
         3. No redundant information\n"
    )
}
