//! Multi-version layouts: by-verse stacking, continuous paragraphs and the
//! column table.
//!
//! The leftmost module is the base: rows are keyed by its versification, its
//! verse numbering labels every row, and the other modules' verses are pulled
//! onto those rows through versification mapping. An entry whose own
//! numbering disagrees with the row carries a small secondary number. A
//! module with no text for a row renders an empty placeholder so columns
//! never drift out of step.

use crate::error::PassageError;
use crate::renderer::{Renderer, escape, render_segments, verse_number};
use fxhash::FxHashMap;
use lectio_corpus::{RawVerse, ResolvedPassage};
use lectio_domain::features::Feature;
use lectio_domain::modules::{DisplayMode, ModuleInfo};
use std::fmt::Write as _;

struct Column<'m> {
    info: &'m ModuleInfo,
    /// Fetched verses re-keyed by base-scheme ordinal.
    verses: FxHashMap<u32, RawVerse>,
}

impl Renderer<'_> {
    /// Renders `modules` (leftmost first) interleaved over the base-resolved
    /// range. `mode` must be one of the multi-version layouts.
    ///
    /// # Errors
    /// Store and versification failures propagate as [`PassageError`].
    pub fn interleaved(
        &self,
        modules: &[ModuleInfo],
        reference: &str,
        base: &ResolvedPassage,
        features: &[Feature],
        mode: DisplayMode,
    ) -> Result<String, PassageError> {
        debug_assert!(mode.is_multi_version());
        let base_scheme = self.versification.scheme(&base.versification)?;

        let mut columns = Vec::with_capacity(modules.len());
        for info in modules {
            let resolved_here =
                self.versification.convert(reference, &base.versification, &info.versification)?;
            let scheme = self.versification.scheme(&info.versification)?;
            let mut verses = FxHashMap::default();
            for verse in self.store.verses(&info.id, resolved_here.range)? {
                let Some(key) = scheme.key_of(verse.ordinal) else { continue };
                let Some(row) = base_scheme.map_key_from(&scheme, &key) else { continue };
                // When conversion collapses two verses onto one row the
                // earlier verse keeps it.
                verses.entry(row).or_insert(verse);
            }
            columns.push(Column { info, verses });
        }

        let rows = base.range.start_ordinal..=base.range.end_ordinal;
        let html = match mode {
            DisplayMode::InterleavedByVerse => by_verse(base, &columns, rows, features),
            DisplayMode::InterleavedContinuous => continuous(base, &columns, rows, features),
            DisplayMode::Column => column_table(base, &columns, rows, features),
            DisplayMode::Single | DisplayMode::Interlinear => unreachable!(),
        };
        Ok(html)
    }
}

/// Number label for a row: the leftmost module's verse when present.
fn row_label(columns: &[Column<'_>], row: u32, features: &[Feature]) -> String {
    columns
        .first()
        .and_then(|column| column.verses.get(&row))
        .map(|verse| verse_number(verse, features))
        .unwrap_or_default()
}

/// Secondary number for a non-base entry: emitted small whenever the entry's
/// own chapter:verse disagrees with the row label's.
fn secondary_number(
    base_verse: Option<&RawVerse>,
    verse: &RawVerse,
    features: &[Feature],
) -> String {
    let numbering = features.contains(&Feature::VerseNumbers)
        || features.contains(&Feature::TinyVerseNumbers);
    if !numbering
        || base_verse.is_some_and(|b| b.chapter == verse.chapter && b.verse == verse.verse)
    {
        return String::new();
    }
    format!(r#"<span class="verse tiny">{}:{}</span>"#, verse.chapter, verse.verse)
}

fn verse_text(verse: &RawVerse, features: &[Feature]) -> String {
    let mut html = String::new();
    render_segments(&mut html, verse, features, None);
    html
}

fn by_verse(
    base: &ResolvedPassage,
    columns: &[Column<'_>],
    rows: impl Iterator<Item = u32>,
    features: &[Feature],
) -> String {
    let mut html = format!(
        r#"<div class="passage interleaved" data-osis="{}">"#,
        escape(&base.osis_id)
    );
    for row in rows {
        let base_verse = columns.first().and_then(|column| column.verses.get(&row));
        let _ = write!(html, r#"<div class="verse-group">{}"#, row_label(columns, row, features));
        for (index, column) in columns.iter().enumerate() {
            match column.verses.get(&row) {
                Some(verse) => {
                    let secondary = if index == 0 {
                        String::new()
                    } else {
                        secondary_number(base_verse, verse, features)
                    };
                    let _ = write!(
                        html,
                        r#"<div class="version" data-module="{}"><span class="module-label">{}</span>{secondary}{}</div>"#,
                        column.info.id,
                        column.info.id,
                        verse_text(verse, features)
                    );
                }
                None => {
                    let _ = write!(
                        html,
                        r#"<div class="version empty" data-module="{}"></div>"#,
                        column.info.id
                    );
                }
            }
        }
        html.push_str("</div>");
    }
    html.push_str("</div>");
    html
}

fn continuous(
    base: &ResolvedPassage,
    columns: &[Column<'_>],
    rows: impl Iterator<Item = u32>,
    features: &[Feature],
) -> String {
    let mut html = format!(
        r#"<div class="passage interleaved continuous" data-osis="{}">"#,
        escape(&base.osis_id)
    );
    for row in rows {
        let base_verse = columns.first().and_then(|column| column.verses.get(&row));
        for (index, column) in columns.iter().enumerate() {
            let Some(verse) = column.verses.get(&row) else { continue };
            let label = if index == 0 {
                row_label(columns, row, features)
            } else {
                secondary_number(base_verse, verse, features)
            };
            let _ = write!(
                html,
                r#"<p class="version" data-module="{}">{label}{}</p>"#,
                column.info.id,
                verse_text(verse, features)
            );
        }
    }
    html.push_str("</div>");
    html
}

fn column_table(
    base: &ResolvedPassage,
    columns: &[Column<'_>],
    rows: impl Iterator<Item = u32>,
    features: &[Feature],
) -> String {
    let mut html = format!(
        r#"<table class="passage columns" data-osis="{}"><thead><tr>"#,
        escape(&base.osis_id)
    );
    for column in columns {
        let _ = write!(html, "<th>{}</th>", column.info.id);
    }
    html.push_str("</tr></thead><tbody>");
    for row in rows {
        let base_verse = columns.first().and_then(|column| column.verses.get(&row));
        html.push_str("<tr>");
        for (index, column) in columns.iter().enumerate() {
            match column.verses.get(&row) {
                Some(verse) => {
                    let label = if index == 0 {
                        row_label(columns, row, features)
                    } else {
                        secondary_number(base_verse, verse, features)
                    };
                    let _ = write!(html, "<td>{label}{}</td>", verse_text(verse, features));
                }
                None => html.push_str(r#"<td class="empty"></td>"#),
            }
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    html
}
