//! Turns raw marked-up verses into display-ready HTML.
//!
//! Rendering is a pure fold over the verse segments: each applied feature
//! contributes one layer of markup, and layers always appear in feature
//! declaration order so two renders of the same inputs are byte-identical.
//! Text content is HTML-escaped; markup is generated, never passed through.

use crate::error::PassageError;
use fxhash::FxHashMap;
use lectio_corpus::{PassageStore, RawVerse, ResolvedPassage, Segment, VersificationService};
use lectio_domain::features::Feature;
use lectio_domain::modules::ModuleInfo;
use lectio_domain::reference::VerseRange;
use std::fmt::Write as _;

/// Gloss lines keyed by base ordinal, then by word id within the verse.
pub(crate) type GlossMap = FxHashMap<u32, FxHashMap<u32, String>>;

/// Stateless HTML renderer over the store and versification collaborators.
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a> {
    pub(crate) store: &'a dyn PassageStore,
    pub(crate) versification: &'a dyn VersificationService,
}

impl<'a> Renderer<'a> {
    #[must_use]
    pub fn new(store: &'a dyn PassageStore, versification: &'a dyn VersificationService) -> Self {
        Self { store, versification }
    }

    /// Renders one module's text for a resolved range. With `gloss` set, each
    /// word that carries a stable id gets the gloss module's aligned line
    /// beneath it (the interlinear layout).
    ///
    /// The store is sparse, so absent ordinals (common for commentaries)
    /// simply render nothing.
    ///
    /// # Errors
    /// Store and versification failures propagate as [`PassageError`].
    pub fn single(
        &self,
        module: &ModuleInfo,
        resolved: &ResolvedPassage,
        features: &[Feature],
        gloss: Option<&ModuleInfo>,
    ) -> Result<String, PassageError> {
        let verses = self.store.verses(&module.id, resolved.range)?;
        let gloss_map = match gloss {
            Some(gloss_module) => Some(self.gloss_map(gloss_module, resolved)?),
            None => None,
        };

        let mut html = String::new();
        let _ = write!(
            html,
            r#"<div class="passage" data-module="{}" data-osis="{}">"#,
            module.id, resolved.osis_id
        );
        for verse in &verses {
            if features.contains(&Feature::Headings) {
                if let Some(heading) = &verse.heading {
                    let _ = write!(html, r#"<h3 class="heading">{}</h3>"#, escape(heading));
                }
            }
            let _ = write!(html, r#"<span class="verse-block" data-osis="{}">"#, verse.osis_id);
            html.push_str(&verse_number(verse, features));
            render_segments(
                &mut html,
                verse,
                features,
                gloss_map.as_ref().and_then(|map| map.get(&verse.ordinal)),
            );
            html.push_str("</span>");
        }
        html.push_str("</div>");
        Ok(html)
    }

    /// Collects the gloss module's word texts for each base ordinal of the
    /// resolved range, aligned through versification mapping.
    fn gloss_map(
        &self,
        gloss: &ModuleInfo,
        resolved: &ResolvedPassage,
    ) -> Result<GlossMap, PassageError> {
        let base_scheme = self.versification.scheme(&resolved.versification)?;
        let gloss_scheme = self.versification.scheme(&gloss.versification)?;

        let mut map = GlossMap::default();
        for ordinal in resolved.range.start_ordinal..=resolved.range.end_ordinal {
            let Some(key) = base_scheme.key_of(ordinal) else { continue };
            let Some(mapped) = gloss_scheme.map_key_from(&base_scheme, &key) else { continue };
            let verses = self.store.verses(&gloss.id, VerseRange::new(mapped, mapped))?;
            let Some(verse) = verses.first() else { continue };
            let words: FxHashMap<u32, String> = verse
                .segments
                .iter()
                .filter_map(|segment| match segment {
                    Segment::Word(word) => word.word_id.map(|id| (id, word.text.clone())),
                    _ => None,
                })
                .collect();
            map.insert(ordinal, words);
        }
        Ok(map)
    }
}

/// Verse-number markup for the start of a verse block, or nothing when
/// neither numbering feature is applied.
pub(crate) fn verse_number(verse: &RawVerse, features: &[Feature]) -> String {
    if features.contains(&Feature::VerseNumbers) {
        format!(r#"<span class="verse">{}</span>"#, verse.verse)
    } else if features.contains(&Feature::TinyVerseNumbers) {
        format!(r#"<span class="verse tiny">{}:{}</span>"#, verse.chapter, verse.verse)
    } else {
        String::new()
    }
}

/// Renders the segment list of one verse into `html`.
pub(crate) fn render_segments(
    html: &mut String,
    verse: &RawVerse,
    features: &[Feature],
    gloss: Option<&FxHashMap<u32, String>>,
) {
    for segment in &verse.segments {
        match segment {
            Segment::Word(word) => {
                let mut token = escape(&word.text);
                if word.red_letter && features.contains(&Feature::RedLetter) {
                    token = format!(r#"<span class="red">{token}</span>"#);
                }
                if features.contains(&Feature::Strongs) {
                    if let Some(strongs) = &word.strongs {
                        let _ = write!(token, r#"<sup class="strongs">{}</sup>"#, escape(strongs));
                    }
                }
                if features.contains(&Feature::Morphology) {
                    if let Some(morph) = &word.morph {
                        let _ = write!(token, r#"<sup class="morph">{}</sup>"#, escape(morph));
                    }
                }
                let gloss_line = gloss
                    .and_then(|words| word.word_id.and_then(|id| words.get(&id)));
                match gloss_line {
                    Some(line) => {
                        let _ = write!(
                            html,
                            r#"<span class="word-block"><span class="text">{token}</span><span class="gloss">{}</span></span>"#,
                            escape(line)
                        );
                    }
                    None => html.push_str(&token),
                }
            }
            Segment::Punct(text) => html.push_str(&escape(text)),
            Segment::Note(text) if features.contains(&Feature::Notes) => {
                let _ = write!(html, r#"<span class="note">{}</span>"#, escape(text));
            }
            Segment::CrossRef(osis) if features.contains(&Feature::CrossReferences) => {
                let _ = write!(
                    html,
                    r#"<a class="xref" data-osis="{0}">{0}</a>"#,
                    escape(osis)
                );
            }
            Segment::Note(_) | Segment::CrossRef(_) => {}
        }
    }
}

/// Minimal HTML escape for text content and attribute values.
pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectio_corpus::Word;

    fn verse(segments: Vec<Segment>) -> RawVerse {
        RawVerse {
            ordinal: 1,
            osis_id: "Gen.1.1".to_owned(),
            chapter: 1,
            verse: 1,
            heading: None,
            segments,
        }
    }

    #[test]
    fn escapes_text_content() {
        let mut html = String::new();
        let v = verse(vec![Segment::Word(Word::plain("<script>"))]);
        render_segments(&mut html, &v, &[], None);
        assert_eq!(html, "&lt;script&gt;");
    }

    #[test]
    fn annotations_follow_declaration_order() {
        let word = Word {
            text: "beginning".to_owned(),
            word_id: None,
            strongs: Some("H7225".to_owned()),
            morph: Some("N-fs".to_owned()),
            red_letter: false,
        };
        let mut html = String::new();
        let v = verse(vec![Segment::Word(word)]);
        render_segments(&mut html, &v, &[Feature::Strongs, Feature::Morphology], None);
        assert_eq!(
            html,
            r#"beginning<sup class="strongs">H7225</sup><sup class="morph">N-fs</sup>"#
        );
    }

    #[test]
    fn red_letter_only_renders_when_applied() {
        let word = Word { text: "Verily".to_owned(), red_letter: true, ..Word::default() };
        let mut html = String::new();
        render_segments(&mut html, &verse(vec![Segment::Word(word.clone())]), &[], None);
        assert_eq!(html, "Verily");

        let mut html = String::new();
        render_segments(
            &mut html,
            &verse(vec![Segment::Word(word)]),
            &[Feature::RedLetter],
            None,
        );
        assert_eq!(html, r#"<span class="red">Verily</span>"#);
    }

    #[test]
    fn notes_and_xrefs_are_gated() {
        let v = verse(vec![
            Segment::Word(Word::plain("word")),
            Segment::Note("a note".to_owned()),
            Segment::CrossRef("John.1.1".to_owned()),
        ]);
        let mut bare = String::new();
        render_segments(&mut bare, &v, &[], None);
        assert_eq!(bare, "word");

        let mut full = String::new();
        render_segments(&mut full, &v, &[Feature::Notes, Feature::CrossReferences], None);
        assert!(full.contains(r#"<span class="note">a note</span>"#));
        assert!(full.contains(r#"<a class="xref" data-osis="John.1.1">John.1.1</a>"#));
    }

    #[test]
    fn verse_number_styles() {
        let v = verse(vec![]);
        assert_eq!(verse_number(&v, &[Feature::VerseNumbers]), r#"<span class="verse">1</span>"#);
        assert_eq!(
            verse_number(&v, &[Feature::TinyVerseNumbers]),
            r#"<span class="verse tiny">1:1</span>"#
        );
        assert_eq!(verse_number(&v, &[]), "");
    }
}
