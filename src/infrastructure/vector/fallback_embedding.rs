//! Deterministic fallback embedding
//!
//! Produces token-frequency hash vectors when no remote embedding provider is
//! reachable. Quality is far below a real model, but output is fully
//! deterministic and has the same dimensionality as the remote vectors so
//! both can live in one store.

/// Positions each token is scattered into.
const POSITIONS_PER_TOKEN: usize = 5;

/// Weight added per token occurrence at each position.
const FREQUENCY_WEIGHT: f32 = 0.1;

/// Hash-based embedder with a fixed output dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackEmbedder {
    dimensions: usize,
}

impl FallbackEmbedder {
    /// Create an embedder producing `dimensions`-length vectors (minimum 1).
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    pub const fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Embed text as an L2-normalized token-frequency hash vector.
    ///
    /// Text with no tokens yields the all-zero vector.
    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimensions];

        for (token, frequency) in token_frequencies(text) {
            let hash = token_hash(&token);
            for i in 0..POSITIONS_PER_TOKEN {
                let position = (hash + i) % self.dimensions;
                embedding[position] += frequency as f32 * FREQUENCY_WEIGHT;
            }
        }

        // f64 accumulation keeps the norm stable across many dimensions
        let magnitude = embedding
            .iter()
            .map(|x| f64::from(*x) * f64::from(*x))
            .sum::<f64>()
            .sqrt();

        if magnitude > 0.0 {
            for val in &mut embedding {
                *val = (f64::from(*val) / magnitude) as f32;
            }
        }

        embedding
    }
}

/// Whether `c` is a CJK ideograph.
pub const fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{3400}'..='\u{4DBF}'
        | '\u{4E00}'..='\u{9FFF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{20000}'..='\u{2A6DF}'
    )
}

/// Split text into lowercase word runs and single CJK ideographs.
///
/// CJK runs are split per ideograph so that a short query like "黑马项目"
/// shares tokens with a longer run such as "黑马项目讨论了".
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut word = String::new();

    for c in text.chars() {
        if is_cjk(c) {
            if !word.is_empty() {
                tokens.push(std::mem::take(&mut word));
            }
            tokens.push(c.to_string());
        } else if c.is_alphanumeric() || c == '_' {
            word.extend(c.to_lowercase());
        } else if !word.is_empty() {
            tokens.push(std::mem::take(&mut word));
        }
    }

    if !word.is_empty() {
        tokens.push(word);
    }

    tokens
}

/// Token counts in first-seen order.
fn token_frequencies(text: &str) -> Vec<(String, usize)> {
    let mut frequencies: Vec<(String, usize)> = Vec::new();
    for token in tokenize(text) {
        match frequencies.iter_mut().find(|(t, _)| *t == token) {
            Some((_, count)) => *count += 1,
            None => frequencies.push((token, 1)),
        }
    }
    frequencies
}

/// 32-bit `h * 31 + unit` string hash over UTF-16 code units, as a
/// non-negative integer.
pub fn token_hash(token: &str) -> usize {
    let hash = token
        .encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)));
    hash.unsigned_abs() as usize
}
