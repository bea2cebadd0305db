//! Raw marked-up verses, as stored per module.
//!
//! The store yields structured markup, not HTML: rendering is the passage
//! slice's job. A verse is a list of [`Segment`]s so every optional layer
//! (Strong's tags, morphology, notes, red letter) stays addressable without
//! re-parsing text.

use crate::error::CorpusError;
use lectio_domain::modules::ModuleId;
use lectio_domain::reference::VerseRange;
use std::fmt::Debug;

/// One word token with its optional annotations.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Word {
    pub text: String,
    /// Stable per-word id used for interlinear gloss alignment.
    pub word_id: Option<u32>,
    /// Strong's number, e.g. `H7225`.
    pub strongs: Option<String>,
    /// Morphology code, e.g. `V-Qal-Perf-3ms`.
    pub morph: Option<String>,
    pub red_letter: bool,
}

impl Word {
    #[must_use]
    pub fn plain(text: &str) -> Self {
        Self { text: text.to_owned(), ..Self::default() }
    }
}

/// A span of a verse's native markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Word(Word),
    /// Punctuation and whitespace carried verbatim.
    Punct(String),
    /// A translators' footnote anchored at this position.
    Note(String),
    /// A cross-reference to another passage, by OSIS id.
    CrossRef(String),
}

/// A single verse of a module, keyed by ordinal under the module's own
/// versification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawVerse {
    pub ordinal: u32,
    /// OSIS id, e.g. `Gen.1.1`.
    pub osis_id: String,
    pub chapter: u32,
    pub verse: u32,
    /// Section heading that starts at this verse, if any.
    pub heading: Option<String>,
    pub segments: Vec<Segment>,
}

impl RawVerse {
    /// Concatenates word and punctuation segments, skipping notes and
    /// cross-references.
    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Word(w) => out.push_str(&w.text),
                Segment::Punct(p) => out.push_str(p),
                Segment::Note(_) | Segment::CrossRef(_) => {}
            }
        }
        out.trim().to_owned()
    }
}

/// Fetches raw marked-up verses for a module.
///
/// The result is sparse: modules (commentaries especially) need not cover
/// every ordinal of their versification. A missing module is
/// [`CorpusError::ReadFailed`]; a missing verse is simply absent.
pub trait PassageStore: Debug + Send + Sync {
    /// Verses of `module` within `range`, ascending by ordinal.
    ///
    /// # Errors
    /// [`CorpusError::ReadFailed`] when the module's data cannot be read.
    fn verses(&self, module: &ModuleId, range: VerseRange) -> Result<Vec<RawVerse>, CorpusError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_skips_annotations() {
        let verse = RawVerse {
            ordinal: 1,
            osis_id: "Gen.1.1".to_owned(),
            chapter: 1,
            verse: 1,
            heading: None,
            segments: vec![
                Segment::Word(Word::plain("In")),
                Segment::Punct(" ".to_owned()),
                Segment::Word(Word::plain("the")),
                Segment::Note("Or, at the first".to_owned()),
                Segment::Punct(" ".to_owned()),
                Segment::Word(Word::plain("beginning")),
                Segment::Punct(".".to_owned()),
            ],
        };
        assert_eq!(verse.plain_text(), "In the beginning.");
    }
}
