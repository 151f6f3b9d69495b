//! Token counting
//!
//! Counts model-specific tokens with the BPE encodings shipped in
//! `tiktoken-rs`. Counting is infallible: if an encoding table cannot be
//! loaded the counter degrades to a character estimate and logs once.

use std::fmt;

use tiktoken_rs::CoreBPE;

/// Approximate characters per token used by the fallback estimate
const CHARS_PER_TOKEN: usize = 4;

/// Longest run without whitespace handed to the BPE merge in one piece.
///
/// Merging is quadratic in piece length, so minified or generated text with
/// no break points is cut into runs of at most this many bytes.
const MAX_RUN_BYTES: usize = 256;

/// Text is encoded in segments of roughly this size, cut before whitespace.
const SEGMENT_BYTES: usize = 8 * 1024;

/// Anything that can turn text into a token count.
///
/// Implementations must be pure: the same text always yields the same count.
pub trait TokenCounter: Send + Sync {
    fn count(&self, text: &str) -> usize;
}

/// BPE encoding families understood by the counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    /// GPT-4o and o-series models
    O200kBase,
    /// GPT-4 and GPT-3.5 chat models
    Cl100kBase,
    /// Codex and late davinci completion models
    P50kBase,
    /// GPT-3 era models
    R50kBase,
}

impl Encoding {
    /// Pick the encoding family for a model name.
    ///
    /// Unknown models fall back to `cl100k_base`.
    pub fn for_model(model: &str) -> Self {
        let model = model.to_lowercase();

        if model.starts_with("gpt-4o")
            || model.starts_with("gpt-4.1")
            || model.starts_with("o1")
            || model.starts_with("o3")
            || model.starts_with("o4")
        {
            Encoding::O200kBase
        } else if model.starts_with("gpt-4")
            || model.starts_with("gpt-3.5")
            || model.starts_with("text-embedding")
        {
            Encoding::Cl100kBase
        } else if model.starts_with("text-davinci-002")
            || model.starts_with("text-davinci-003")
            || model.starts_with("code-")
        {
            Encoding::P50kBase
        } else if model.starts_with("davinci")
            || model.starts_with("curie")
            || model.starts_with("babbage")
            || model.starts_with("ada")
        {
            Encoding::R50kBase
        } else {
            Encoding::Cl100kBase
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Encoding::O200kBase => "o200k_base",
            Encoding::Cl100kBase => "cl100k_base",
            Encoding::P50kBase => "p50k_base",
            Encoding::R50kBase => "r50k_base",
        }
    }

    fn load(&self) -> eyre::Result<CoreBPE> {
        let bpe = match self {
            Encoding::O200kBase => tiktoken_rs::o200k_base(),
            Encoding::Cl100kBase => tiktoken_rs::cl100k_base(),
            Encoding::P50kBase => tiktoken_rs::p50k_base(),
            Encoding::R50kBase => tiktoken_rs::r50k_base(),
        };
        bpe.map_err(|e| eyre::eyre!("Failed to load {} encoding: {e}", self.name()))
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Counter backed by a tiktoken BPE table.
pub struct BpeCounter {
    encoding: Encoding,
    bpe: Option<CoreBPE>,
}

impl BpeCounter {
    pub fn new(encoding: Encoding) -> Self {
        let bpe = match encoding.load() {
            Ok(bpe) => Some(bpe),
            Err(e) => {
                log::warn!("{e}; falling back to character estimate");
                None
            }
        };

        Self { encoding, bpe }
    }

    /// Whether counts come from the real BPE table rather than the estimate
    pub fn is_exact(&self) -> bool {
        self.bpe.is_some()
    }
}

impl TokenCounter for BpeCounter {
    fn count(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }

        match &self.bpe {
            Some(bpe) => segments(text)
                .map(|segment| bpe.encode_with_special_tokens(segment).len())
                .sum(),
            None => estimate_tokens(text),
        }
    }
}

/// Split `text` into slices the BPE can encode in bounded time.
///
/// Short ordinary text comes back as a single slice, so its count is the
/// exact whole-text count. Cuts land on char boundaries and depend only on
/// the text, keeping counts deterministic.
fn segments(text: &str) -> impl Iterator<Item = &str> {
    let mut start = 0;
    let mut run_start = 0;
    let mut cuts = Vec::new();

    for (i, ch) in text.char_indices() {
        if ch.is_whitespace() {
            // Cut before the whitespace so it stays attached to the next word
            if i - start >= SEGMENT_BYTES {
                cuts.push(i);
                start = i;
            }
            run_start = i + ch.len_utf8();
        } else if i - run_start >= MAX_RUN_BYTES {
            cuts.push(i);
            start = i;
            run_start = i;
        }
    }

    let mut prev = 0;
    cuts.into_iter()
        .chain(std::iter::once(text.len()))
        .map(move |cut| {
            let segment = &text[prev..cut];
            prev = cut;
            segment
        })
}

impl fmt::Debug for BpeCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BpeCounter")
            .field("encoding", &self.encoding)
            .field("exact", &self.is_exact())
            .finish()
    }
}

/// Counter that only uses the character estimate.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicCounter;

impl TokenCounter for HeuristicCounter {
    fn count(&self, text: &str) -> usize {
        estimate_tokens(text)
    }
}

/// Rough token estimate: one token per started group of four characters.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}
