//! Built-in sample corpus.
//!
//! A small, fully public-domain corpus (KJV / World English Bible excerpts)
//! used by the dev server and the integration tests. Two versification
//! schemes are seeded so conversion and neighbour-collapse paths are
//! exercisable: `lxx-aligned` merges the second chapter of Psalms into a
//! single verse.

use crate::store::{RawVerse, Segment, Word};
use crate::versification::{BookSpec, Scheme};
use crate::{Corpus, CorpusError};
use lectio_domain::features::Capabilities;
use lectio_domain::modules::{Category, ModuleId, ModuleInfo};

/// Scheme shared by KJV, WEB, ILX and TSK.
pub const STANDARD: &str = "standard";
/// Divergent scheme used by the LXXE module.
pub const LXX_ALIGNED: &str = "lxx-aligned";

#[must_use]
pub fn standard_scheme() -> Scheme {
    Scheme::new(
        STANDARD,
        vec![
            BookSpec::new("Gen", "Genesis", &[3]).abbrev("Gn"),
            BookSpec::new("Ps", "Psalms", &[2, 2]).abbrev("Psa").abbrev("Psalm"),
            BookSpec::new("John", "John", &[2, 2, 3]).abbrev("Jn"),
        ],
    )
}

#[must_use]
pub fn lxx_scheme() -> Scheme {
    Scheme::new(
        LXX_ALIGNED,
        vec![
            BookSpec::new("Gen", "Genesis", &[3]),
            BookSpec::new("Ps", "Psalms", &[2, 1]),
            BookSpec::new("John", "John", &[2, 2, 3]),
        ],
    )
}

fn module(
    id: &str,
    name: &str,
    language: &str,
    category: Category,
    capabilities: Capabilities,
    versification: &str,
) -> ModuleInfo {
    ModuleInfo {
        id: ModuleId::new(id),
        name: name.to_owned(),
        language: language.to_owned(),
        category,
        capabilities,
        versification: versification.into(),
    }
}

/// Splits prose into word/punctuation segments, assigning sequential word
/// ids. Punctuation here is always single-byte ASCII.
fn split_words(text: &str, red: bool, next_id: &mut u32) -> Vec<Segment> {
    let mut out = Vec::new();
    for (i, token) in text.split_whitespace().enumerate() {
        if i > 0 {
            out.push(Segment::Punct(" ".to_owned()));
        }
        let trailing = token.chars().rev().take_while(|c| c.is_ascii_punctuation()).count();
        let (word, punct) = token.split_at(token.len() - trailing);
        if !word.is_empty() {
            out.push(Segment::Word(Word {
                text: word.to_owned(),
                word_id: Some(*next_id),
                strongs: None,
                morph: None,
                red_letter: red,
            }));
            *next_id += 1;
        }
        if !punct.is_empty() {
            out.push(Segment::Punct(punct.to_owned()));
        }
    }
    out
}

/// Builds a verse from `(text, red_letter)` runs resolved against `scheme`.
fn verse(scheme: &Scheme, reference: &str, parts: &[(&str, bool)]) -> RawVerse {
    let resolved = scheme.resolve(reference).expect("sample corpus reference is valid");
    let ordinal = resolved.range.start_ordinal;
    let key = scheme.key_of(ordinal).expect("sample corpus ordinal is valid");
    let mut next_id = 1u32;
    let mut segments = Vec::new();
    for (i, (text, red)) in parts.iter().enumerate() {
        if i > 0 {
            segments.push(Segment::Punct(" ".to_owned()));
        }
        segments.extend(split_words(text, *red, &mut next_id));
    }
    RawVerse {
        ordinal,
        osis_id: resolved.osis_id,
        chapter: key.chapter,
        verse: key.verse,
        heading: None,
        segments,
    }
}

fn plain(scheme: &Scheme, reference: &str, text: &str) -> RawVerse {
    verse(scheme, reference, &[(text, false)])
}

fn with_heading(mut v: RawVerse, heading: &str) -> RawVerse {
    v.heading = Some(heading.to_owned());
    v
}

/// Attaches Strong's/morphology tags to the named words of a verse.
fn tag(mut v: RawVerse, tags: &[(&str, &str, &str)]) -> RawVerse {
    for segment in &mut v.segments {
        if let Segment::Word(word) = segment
            && let Some((_, strongs, morph)) =
                tags.iter().find(|(text, _, _)| word.text.eq_ignore_ascii_case(text))
        {
            word.strongs = Some((*strongs).to_owned());
            word.morph = Some((*morph).to_owned());
        }
    }
    v
}

fn kjv_verses(scheme: &Scheme) -> Vec<RawVerse> {
    vec![
        with_heading(
            plain(scheme, "Gen 1:1", "In the beginning God created the heaven and the earth."),
            "The Creation",
        ),
        plain(
            scheme,
            "Gen 1:2",
            "And the earth was without form, and void; and darkness was upon the face of the deep. And the Spirit of God moved upon the face of the waters.",
        ),
        plain(scheme, "Gen 1:3", "And God said, Let there be light: and there was light."),
        plain(
            scheme,
            "Ps 1:1",
            "Blessed is the man that walketh not in the counsel of the ungodly, nor standeth in the way of sinners, nor sitteth in the seat of the scornful.",
        ),
        plain(
            scheme,
            "Ps 1:2",
            "But his delight is in the law of the LORD; and in his law doth he meditate day and night.",
        ),
        plain(scheme, "Ps 2:1", "Why do the heathen rage, and the people imagine a vain thing?"),
        plain(
            scheme,
            "Ps 2:2",
            "The kings of the earth set themselves, and the rulers take counsel together, against the LORD, and against his anointed, saying,",
        ),
        plain(
            scheme,
            "John 1:1",
            "In the beginning was the Word, and the Word was with God, and the Word was God.",
        ),
        plain(scheme, "John 1:2", "The same was in the beginning with God."),
        plain(
            scheme,
            "John 2:1",
            "And the third day there was a marriage in Cana of Galilee; and the mother of Jesus was there:",
        ),
        plain(scheme, "John 2:2", "And both Jesus was called, and his disciples, to the marriage."),
        plain(
            scheme,
            "John 3:1",
            "There was a man of the Pharisees, named Nicodemus, a ruler of the Jews:",
        ),
        plain(
            scheme,
            "John 3:2",
            "The same came to Jesus by night, and said unto him, Rabbi, we know that thou art a teacher come from God: for no man can do these miracles that thou doest, except God be with him.",
        ),
        verse(
            scheme,
            "John 3:3",
            &[
                ("Jesus answered and said unto him,", false),
                (
                    "Verily, verily, I say unto thee, Except a man be born again, he cannot see the kingdom of God.",
                    true,
                ),
            ],
        ),
    ]
}

fn web_verses(scheme: &Scheme) -> Vec<RawVerse> {
    vec![
        tag(
            plain(scheme, "Gen 1:1", "In the beginning, God created the heavens and the earth."),
            &[
                ("beginning", "H7225", "Noun-fs"),
                ("God", "H430", "Noun-mp"),
                ("created", "H1254", "V-Qal-Perf-3ms"),
                ("heavens", "H8064", "Noun-mp"),
                ("earth", "H776", "Noun-fs"),
            ],
        ),
        plain(
            scheme,
            "Gen 1:2",
            "The earth was formless and empty. Darkness was on the surface of the deep and God's Spirit was hovering over the surface of the waters.",
        ),
        plain(
            scheme,
            "Gen 1:3",
            "God said, \"Let there be light,\" and there was light.",
        ),
        plain(
            scheme,
            "John 3:1",
            "Now there was a man of the Pharisees named Nicodemus, a ruler of the Jews.",
        ),
        plain(
            scheme,
            "John 3:2",
            "The same came to him by night, and said to him, \"Rabbi, we know that you are a teacher come from God, for no one can do these signs that you do, unless God is with him.\"",
        ),
        verse(
            scheme,
            "John 3:3",
            &[
                ("Jesus answered him,", false),
                (
                    "\"Most certainly, I tell you, unless one is born anew, he can't see God's Kingdom.\"",
                    true,
                ),
            ],
        ),
    ]
}

fn lxxe_verses(scheme: &Scheme) -> Vec<RawVerse> {
    vec![
        plain(scheme, "Gen 1:1", "In the beginning God made the heaven and the earth."),
        plain(
            scheme,
            "Gen 1:2",
            "But the earth was unsightly and unfurnished, and darkness was over the deep, and the Spirit of God moved over the water.",
        ),
        plain(scheme, "Gen 1:3", "And God said, Let there be light, and there was light."),
        plain(
            scheme,
            "Ps 2:1",
            "Wherefore did the heathen rage, and the nations imagine vain things?",
        ),
    ]
}

/// Word-by-word transliteration gloss aligned with KJV Gen 1:1 word ids.
fn ilx_verses(scheme: &Scheme) -> Vec<RawVerse> {
    let glosses = [
        "be", "reshit", "bara", "Elohim", "et", "ha-shamayim", "ve-et", "ha-aretz", "---", "---",
    ];
    let resolved = scheme.resolve("Gen 1:1").expect("sample corpus reference is valid");
    let segments = glosses
        .iter()
        .enumerate()
        .flat_map(|(i, gloss)| {
            let mut parts = Vec::new();
            if i > 0 {
                parts.push(Segment::Punct(" ".to_owned()));
            }
            parts.push(Segment::Word(Word {
                text: (*gloss).to_owned(),
                word_id: Some(i as u32 + 1),
                strongs: None,
                morph: None,
                red_letter: false,
            }));
            parts
        })
        .collect();
    vec![RawVerse {
        ordinal: resolved.range.start_ordinal,
        osis_id: resolved.osis_id,
        chapter: 1,
        verse: 1,
        heading: None,
        segments,
    }]
}

fn tsk_verses(scheme: &Scheme) -> Vec<RawVerse> {
    let mut v = plain(scheme, "Gen 1:1", "The foundation verse of the whole canon.");
    v.segments.push(Segment::Note("Compare the prologue of the fourth gospel.".to_owned()));
    v.segments.push(Segment::CrossRef("John.1.1".to_owned()));
    vec![v]
}

/// Builds the sample corpus, panicking only on a broken fixture.
#[must_use]
pub fn sample_corpus() -> Corpus {
    try_sample_corpus().expect("sample corpus is internally consistent")
}

/// Fallible variant of [`sample_corpus`].
///
/// # Errors
/// [`CorpusError::UnknownScheme`] if a fixture module names a scheme that
/// was not seeded; impossible unless the fixture itself is edited.
pub fn try_sample_corpus() -> Result<Corpus, CorpusError> {
    let standard = standard_scheme();
    let lxx = lxx_scheme();

    let reading_caps = Capabilities::RED_LETTER
        | Capabilities::HEADINGS
        | Capabilities::NOTES
        | Capabilities::CROSS_REFS
        | Capabilities::WORD_IDS;

    Corpus::builder()
        .scheme(standard.clone())
        .scheme(lxx.clone())
        .module(
            module("KJV", "King James Version", "en", Category::Bible, reading_caps, STANDARD),
            kjv_verses(&standard),
        )
        .module(
            module(
                "WEB",
                "World English Bible",
                "en",
                Category::Bible,
                reading_caps | Capabilities::STRONGS | Capabilities::MORPHOLOGY,
                STANDARD,
            ),
            web_verses(&standard),
        )
        .module(
            module(
                "LXXE",
                "Septuagint in English",
                "en",
                Category::Bible,
                Capabilities::HEADINGS,
                LXX_ALIGNED,
            ),
            lxxe_verses(&lxx),
        )
        .module(
            module(
                "ILX",
                "Interlinear Gloss",
                "he",
                Category::Bible,
                Capabilities::WORD_IDS,
                STANDARD,
            ),
            ilx_verses(&standard),
        )
        .module(
            module(
                "TSK",
                "Treasury of Knowledge",
                "en",
                Category::Commentary,
                Capabilities::NOTES | Capabilities::CROSS_REFS,
                STANDARD,
            ),
            tsk_verses(&standard),
        )
        .init()
}
