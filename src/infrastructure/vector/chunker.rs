//! Sentence-aware text chunking
//!
//! Splits an utterance on sentence-terminal punctuation (ASCII and CJK
//! fullwidth forms) and greedily packs sentences into chunks of bounded
//! character length.

/// Characters that end a sentence.
const SENTENCE_TERMINATORS: [char; 6] = ['.', '!', '?', '。', '！', '？'];

/// Separator placed between sentences packed into the same chunk.
const JOIN_SEPARATOR: &str = "。";

/// Default maximum chunk length, in characters.
pub const DEFAULT_MAX_LENGTH: usize = 500;

/// Greedy sentence packer.
///
/// Chunks never exceed `max_length` characters unless a single sentence is
/// longer on its own. Dropping chunks that are too short to be useful is the
/// caller's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    max_length: usize,
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LENGTH)
    }
}

impl Chunker {
    /// Create a chunker. A zero `max_length` is raised to 1.
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length: max_length.max(1),
        }
    }

    pub const fn max_length(&self) -> usize {
        self.max_length
    }

    /// Split `text` into ordered chunks.
    ///
    /// Every text is split into sentences and repacked, so sentences inside
    /// a chunk are always joined with `。`. Text without any sentence content
    /// is returned as the sole chunk.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut current_len = 0usize;

        for sentence in split_sentences(text) {
            let sentence_len = sentence.chars().count();
            let joined_len = if current.is_empty() {
                sentence_len
            } else {
                current_len + JOIN_SEPARATOR.chars().count() + sentence_len
            };

            if joined_len > self.max_length && !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }

            if !current.is_empty() {
                current.push_str(JOIN_SEPARATOR);
                current_len += JOIN_SEPARATOR.chars().count();
            }
            current.push_str(sentence);
            current_len += sentence_len;
        }

        if !current.is_empty() {
            chunks.push(current);
        }

        if chunks.is_empty() {
            return vec![text.to_string()];
        }

        chunks
    }
}

/// Split on sentence terminators, trimming and discarding empty fragments.
pub fn split_sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| SENTENCE_TERMINATORS.contains(&c))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
