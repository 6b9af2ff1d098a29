//! Greedy word wrapping for formatted doc comments

/// Pack `words` into lines of at most `limit` characters.
///
/// A word goes onto the current line when the line plus one space plus the
/// word still fits; otherwise it starts a new line. Words are never split,
/// so a single word longer than `limit` gets a line of its own.
pub fn wrap_words<'a, I>(words: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in words {
        let word_len = word.chars().count();
        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= limit {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Re-flow `lines` paragraph by paragraph.
///
/// Paragraphs are separated by blank lines; each separator survives as one
/// empty output line.
pub fn wrap_paragraphs<S: AsRef<str>>(lines: &[S], limit: usize) -> Vec<String> {
    let mut output = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();

    for line in lines {
        let line = line.as_ref();
        if line.trim().is_empty() {
            output.extend(wrap_words(paragraph.drain(..), limit));
            output.push(String::new());
        } else {
            paragraph.extend(line.split_whitespace());
        }
    }
    output.extend(wrap_words(paragraph, limit));
    output
}
