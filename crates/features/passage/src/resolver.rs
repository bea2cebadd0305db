//! Ordinal-addressed resolution with chapter rounding.
//!
//! Textual references resolve through the versification service directly;
//! this module covers the numbered-verse path, where the client supplies raw
//! ordinals plus a rounding instruction.

use crate::error::PassageError;
use lectio_corpus::{ResolvedPassage, Scheme};
use lectio_domain::reference::{Rounding, VerseRange};

/// Resolves a pair of ordinals under `scheme`, applying `rounding` to the end
/// of the range. Reversed endpoints are reordered before rounding.
///
/// # Errors
/// [`PassageError::NoSuchKey`] when either ordinal falls outside the scheme.
pub fn resolve_ordinals(
    scheme: &Scheme,
    start: u32,
    end: u32,
    rounding: Rounding,
) -> Result<ResolvedPassage, PassageError> {
    let no_such_key = |ordinal: u32| PassageError::NoSuchKey {
        reference: format!("verse ordinal {ordinal}").into(),
        versification: scheme.id().to_string().into(),
    };

    if scheme.key_of(start).is_none() {
        return Err(no_such_key(start));
    }
    if scheme.key_of(end).is_none() {
        return Err(no_such_key(end));
    }

    let range = VerseRange::new(start, end);
    let range = match rounding {
        Rounding::Up => {
            let chapter = scheme
                .chapter_bounds(range.end_ordinal)
                .ok_or_else(|| no_such_key(range.end_ordinal))?;
            VerseRange::new(range.start_ordinal, chapter.end_ordinal)
        }
        Rounding::Down => {
            let chapter = scheme
                .chapter_bounds(range.end_ordinal)
                .ok_or_else(|| no_such_key(range.end_ordinal))?;
            // Never truncate past the start of the request.
            VerseRange::new(range.start_ordinal, chapter.start_ordinal.max(range.start_ordinal))
        }
        Rounding::None => range,
    };

    let osis_id =
        scheme.osis_of_range(range).ok_or_else(|| no_such_key(range.start_ordinal))?;
    Ok(ResolvedPassage { range, osis_id, versification: scheme.id().clone() })
}
