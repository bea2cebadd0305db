//! Versification schemes: books, chapters, verse ordinals and reference
//! parsing.
//!
//! A [`Scheme`] assigns a stable 1-based ordinal to every verse it knows
//! about. All reference arithmetic (resolution, chapter navigation, rounding,
//! conversion between schemes) happens against this table. Chapters with a
//! zero verse count are legal; navigation skips them.

use crate::error::CorpusError;
use lectio_domain::reference::{ChapterKey, Direction, VerseRange, VersificationId};

/// One book of a scheme: identity plus per-chapter verse counts.
#[derive(Debug, Clone)]
pub struct BookSpec {
    /// OSIS identifier, e.g. `Gen`.
    pub osis: String,
    /// Display name, e.g. `Genesis`.
    pub name: String,
    /// Extra accepted spellings, e.g. `Gn`.
    pub abbrevs: Vec<String>,
    /// Verse count per chapter; index 0 is chapter 1. Zero marks an empty
    /// chapter.
    pub chapters: Vec<u32>,
}

impl BookSpec {
    #[must_use]
    pub fn new(osis: &str, name: &str, chapters: &[u32]) -> Self {
        Self {
            osis: osis.to_owned(),
            name: name.to_owned(),
            abbrevs: Vec::new(),
            chapters: chapters.to_vec(),
        }
    }

    #[must_use]
    pub fn abbrev(mut self, abbrev: &str) -> Self {
        self.abbrevs.push(abbrev.to_owned());
        self
    }

    fn matches(&self, token: &str) -> bool {
        self.osis.eq_ignore_ascii_case(token)
            || self.name.eq_ignore_ascii_case(token)
            || self.abbrevs.iter().any(|a| a.eq_ignore_ascii_case(token))
    }
}

/// A fully-resolved verse position within a scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerseKey {
    pub book: usize,
    pub chapter: u32,
    pub verse: u32,
}

/// A resolved reference: ordinal range plus its OSIS identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPassage {
    pub range: VerseRange,
    pub osis_id: String,
    pub versification: VersificationId,
}

/// Book metadata surfaced by the book-name lookahead.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookName {
    pub osis: String,
    pub display_name: String,
    pub chapter_count: u32,
}

/// An immutable verse-ordinal table for one versification.
#[derive(Debug, Clone)]
pub struct Scheme {
    id: VersificationId,
    books: Vec<BookSpec>,
    /// `offsets[b][c]` is the ordinal of the verse before chapter `c + 1` of
    /// book `b`, so `ordinal = offsets[b][c] + verse`.
    offsets: Vec<Vec<u32>>,
    total: u32,
}

impl Scheme {
    #[must_use]
    pub fn new(id: impl Into<VersificationId>, books: Vec<BookSpec>) -> Self {
        let mut offsets = Vec::with_capacity(books.len());
        let mut running = 0u32;
        for book in &books {
            let mut chapter_offsets = Vec::with_capacity(book.chapters.len());
            for count in &book.chapters {
                chapter_offsets.push(running);
                running += count;
            }
            offsets.push(chapter_offsets);
        }
        Self { id: id.into(), books, offsets, total: running }
    }

    #[must_use]
    pub fn id(&self) -> &VersificationId {
        &self.id
    }

    #[must_use]
    pub fn max_ordinal(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn books(&self) -> &[BookSpec] {
        &self.books
    }

    fn book_index(&self, token: &str) -> Option<usize> {
        self.books.iter().position(|b| b.matches(token))
    }

    /// Ordinal of `(book, chapter, verse)`, all 1-based except `book`.
    #[must_use]
    pub fn ordinal(&self, book: usize, chapter: u32, verse: u32) -> Option<u32> {
        let spec = self.books.get(book)?;
        if chapter == 0 || verse == 0 {
            return None;
        }
        let count = *spec.chapters.get(chapter as usize - 1)?;
        if verse > count {
            return None;
        }
        Some(self.offsets[book][chapter as usize - 1] + verse)
    }

    /// Inverse of [`Scheme::ordinal`].
    #[must_use]
    pub fn key_of(&self, ordinal: u32) -> Option<VerseKey> {
        if ordinal == 0 || ordinal > self.total {
            return None;
        }
        for (book, spec) in self.books.iter().enumerate() {
            for (chapter_idx, count) in spec.chapters.iter().enumerate() {
                let offset = self.offsets[book][chapter_idx];
                if ordinal > offset && ordinal <= offset + count {
                    return Some(VerseKey {
                        book,
                        chapter: chapter_idx as u32 + 1,
                        verse: ordinal - offset,
                    });
                }
            }
        }
        None
    }

    /// OSIS id for a single verse, e.g. `Gen.1.1`.
    #[must_use]
    pub fn osis_of(&self, key: &VerseKey) -> String {
        format!("{}.{}.{}", self.books[key.book].osis, key.chapter, key.verse)
    }

    /// OSIS id for an ordinal range: a single verse, a whole chapter, or a
    /// dash-joined pair.
    #[must_use]
    pub fn osis_of_range(&self, range: VerseRange) -> Option<String> {
        let start = self.key_of(range.start_ordinal)?;
        let end = self.key_of(range.end_ordinal)?;
        if start == end {
            return Some(self.osis_of(&start));
        }
        if start.book == end.book && start.chapter == end.chapter {
            let count = self.books[start.book].chapters[start.chapter as usize - 1];
            if start.verse == 1 && end.verse == count {
                return Some(format!("{}.{}", self.books[start.book].osis, start.chapter));
            }
        }
        Some(format!("{}-{}", self.osis_of(&start), self.osis_of(&end)))
    }

    /// Whole-chapter ordinal bounds for the chapter containing `ordinal`.
    #[must_use]
    pub fn chapter_bounds(&self, ordinal: u32) -> Option<VerseRange> {
        let key = self.key_of(ordinal)?;
        let offset = self.offsets[key.book][key.chapter as usize - 1];
        let count = self.books[key.book].chapters[key.chapter as usize - 1];
        Some(VerseRange::new(offset + 1, offset + count))
    }

    /// Chapter key for navigation labels, e.g. `Ps.2` / `Psalms 2`.
    #[must_use]
    pub fn chapter_key(&self, book: usize, chapter: u32) -> ChapterKey {
        ChapterKey {
            osis_id: format!("{}.{chapter}", self.books[book].osis),
            display_name: format!("{} {chapter}", self.books[book].name),
        }
    }

    /// Previous/next non-empty chapter relative to the chapter containing
    /// `ordinal`. `None` at the corpus boundary.
    #[must_use]
    pub fn sibling_chapter(&self, ordinal: u32, direction: Direction) -> Option<ChapterKey> {
        let key = self.key_of(ordinal)?;
        let mut book = key.book;
        let mut chapter = key.chapter;
        loop {
            match direction {
                Direction::Previous => {
                    if chapter > 1 {
                        chapter -= 1;
                    } else if book > 0 {
                        book -= 1;
                        chapter = self.books[book].chapters.len() as u32;
                        if chapter == 0 {
                            continue;
                        }
                    } else {
                        return None;
                    }
                }
                Direction::Next => {
                    if (chapter as usize) < self.books[book].chapters.len() {
                        chapter += 1;
                    } else if book + 1 < self.books.len() {
                        book += 1;
                        chapter = 1;
                        if self.books[book].chapters.is_empty() {
                            continue;
                        }
                    } else {
                        return None;
                    }
                }
            }
            // Empty chapters are skipped, not surfaced.
            if self.books[book].chapters.get(chapter as usize - 1).copied().unwrap_or(0) > 0 {
                return Some(self.chapter_key(book, chapter));
            }
        }
    }

    /// Books whose display name, OSIS id or abbreviation starts with
    /// `prefix` (case-insensitive). An empty prefix lists every book.
    #[must_use]
    pub fn book_names(&self, prefix: &str) -> Vec<BookName> {
        let needle = prefix.trim().to_lowercase();
        self.books
            .iter()
            .filter(|b| {
                needle.is_empty()
                    || b.name.to_lowercase().starts_with(&needle)
                    || b.osis.to_lowercase().starts_with(&needle)
                    || b.abbrevs.iter().any(|a| a.to_lowercase().starts_with(&needle))
            })
            .map(|b| BookName {
                osis: b.osis.clone(),
                display_name: b.name.clone(),
                chapter_count: b.chapters.len() as u32,
            })
            .collect()
    }

    fn no_such_key(&self, reference: &str) -> CorpusError {
        CorpusError::NoSuchKey {
            reference: reference.to_owned().into(),
            versification: self.id.to_string().into(),
        }
    }

    /// Resolves a textual reference to an ordinal range.
    ///
    /// Accepted forms: `Book`, `Book 3`, `Book 3:16`, `Book 3:16-18`,
    /// `Book 1-2`, `Book 1-2:3`, and the OSIS spellings `Book.3`, `Book.3.16`.
    ///
    /// # Errors
    /// [`CorpusError::NoSuchKey`] when the book is unknown or the
    /// chapter/verse falls outside the scheme.
    pub fn resolve(&self, reference: &str) -> Result<ResolvedPassage, CorpusError> {
        let trimmed = reference.trim();
        if trimmed.is_empty() {
            return Err(self.no_such_key(reference));
        }

        let (head, tail) = match trimmed.rsplit_once('-') {
            // A dash inside a book name ("Song-of-Songs") is not a range.
            Some((head, tail)) if tail.chars().all(|c| c.is_ascii_digit() || c == ':') => {
                (head.trim(), Some(tail.trim()))
            }
            _ => (trimmed, None),
        };

        let (book, chapter, verse) = self.parse_head(head).ok_or_else(|| self.no_such_key(reference))?;

        let start = match (chapter, verse) {
            (Some(c), Some(v)) => self.ordinal(book, c, v),
            (Some(c), None) => self.first_verse_of_chapter(book, c),
            (None, _) => self.first_verse_of_book(book),
        }
        .ok_or_else(|| self.no_such_key(reference))?;

        let end = match (chapter, verse, tail) {
            (Some(c), Some(_), Some(tail)) => {
                let (end_c, end_v) = match tail.split_once(':') {
                    Some((ec, ev)) => (
                        ec.parse::<u32>().ok().ok_or_else(|| self.no_such_key(reference))?,
                        ev.parse::<u32>().ok().ok_or_else(|| self.no_such_key(reference))?,
                    ),
                    None => (c, tail.parse::<u32>().ok().ok_or_else(|| self.no_such_key(reference))?),
                };
                self.ordinal(book, end_c, end_v)
            }
            (Some(_), Some(_), None) => Some(start),
            // "Gen 1-2" spans whole chapters; "Gen 1-2:3" ends mid-chapter.
            (Some(_), None, Some(tail)) => match tail.split_once(':') {
                Some((ec, ev)) => {
                    let end_c = ec.parse::<u32>().ok().ok_or_else(|| self.no_such_key(reference))?;
                    let end_v = ev.parse::<u32>().ok().ok_or_else(|| self.no_such_key(reference))?;
                    self.ordinal(book, end_c, end_v)
                }
                None => {
                    let end_c = tail.parse::<u32>().ok().ok_or_else(|| self.no_such_key(reference))?;
                    self.last_verse_of_chapter(book, end_c)
                }
            },
            (Some(c), None, None) => self.last_verse_of_chapter(book, c),
            // A range tail on a whole-book reference has no start anchor.
            (None, _, Some(_)) => return Err(self.no_such_key(reference)),
            (None, _, None) => self.last_verse_of_book(book),
        }
        .ok_or_else(|| self.no_such_key(reference))?;

        if end < start {
            return Err(self.no_such_key(reference));
        }

        let range = VerseRange::new(start, end);
        let osis_id = self.osis_of_range(range).ok_or_else(|| self.no_such_key(reference))?;
        Ok(ResolvedPassage { range, osis_id, versification: self.id.clone() })
    }

    /// Splits `head` into a book plus optional chapter and verse numbers.
    fn parse_head(&self, head: &str) -> Option<(usize, Option<u32>, Option<u32>)> {
        let normalised = head.replace(['.', ':'], " ");
        let tokens: Vec<&str> = normalised.split_whitespace().collect();
        if tokens.is_empty() {
            return None;
        }

        // Longest leading token run naming a book wins, so "Song of Songs 2"
        // parses before "Song".
        for split in (1..=tokens.len()).rev() {
            let candidate = tokens[..split].join(" ");
            let Some(book) = self.book_index(&candidate) else { continue };
            let rest = &tokens[split..];
            return match rest {
                [] => Some((book, None, None)),
                [c] => Some((book, c.parse().ok(), None)),
                [c, v] => Some((book, c.parse().ok(), v.parse().ok())),
                _ => None,
            }
            .filter(|(_, c, v)| {
                // A non-numeric chapter/verse token is a parse failure, not
                // a whole-book reference.
                (rest.is_empty() || c.is_some()) && (rest.len() < 2 || v.is_some())
            });
        }
        None
    }

    fn first_verse_of_chapter(&self, book: usize, chapter: u32) -> Option<u32> {
        self.ordinal(book, chapter, 1)
    }

    fn last_verse_of_chapter(&self, book: usize, chapter: u32) -> Option<u32> {
        let count = *self.books.get(book)?.chapters.get(chapter as usize - 1)?;
        self.ordinal(book, chapter, count)
    }

    fn first_verse_of_book(&self, book: usize) -> Option<u32> {
        let spec = self.books.get(book)?;
        (1..=spec.chapters.len() as u32).find_map(|c| self.first_verse_of_chapter(book, c))
    }

    fn last_verse_of_book(&self, book: usize) -> Option<u32> {
        let spec = self.books.get(book)?;
        (1..=spec.chapters.len() as u32).rev().find_map(|c| self.last_verse_of_chapter(book, c))
    }

    /// Maps a key from another scheme onto this one, collapsing missing
    /// verses to the nearest surviving neighbour: verse clamps to the target
    /// chapter length, chapter clamps to the target book length.
    #[must_use]
    pub fn map_key_from(&self, source: &Self, key: &VerseKey) -> Option<u32> {
        let osis = &source.books[key.book].osis;
        let book = self.book_index(osis)?;
        let spec = &self.books[book];
        if spec.chapters.is_empty() {
            return None;
        }
        let chapter = key.chapter.min(spec.chapters.len() as u32).max(1);
        let count = spec.chapters[chapter as usize - 1];
        if count == 0 {
            // Collapsed into an empty chapter: fall back to its last
            // non-empty predecessor.
            return (1..chapter)
                .rev()
                .find(|c| spec.chapters[*c as usize - 1] > 0)
                .and_then(|c| self.last_verse_of_chapter(book, c));
        }
        let verse = key.verse.min(count).max(1);
        self.ordinal(book, chapter, verse)
    }
}
