//! # Corpus Infrastructure
//!
//! This crate owns the three collaborator interfaces the passage pipeline
//! consumes — [`ModuleCatalog`], [`VersificationService`] and
//! [`PassageStore`] — together with [`Corpus`], an in-memory implementation
//! of all three used by the dev server and the test suites.
//!
//! ## Concurrency
//!
//! The corpus is read-mostly. Lookups take a read lock; install/remove (the
//! external mutation flows) take the corpus-wide write lock. Schemes are
//! handed out as `Arc<Scheme>` snapshots, so a lookup keeps a consistent view
//! even if a module is removed mid-flight.
//!
//! ## Example
//!
//! ```rust
//! use lectio_corpus::{Corpus, ModuleCatalog};
//! use lectio_domain::modules::ModuleId;
//!
//! let corpus = lectio_corpus::sample::sample_corpus();
//! assert!(corpus.is_installed(&ModuleId::new("KJV")));
//! ```

mod catalog;
mod error;
pub mod sample;
mod store;
mod versification;

pub use crate::catalog::ModuleCatalog;
pub use crate::error::CorpusError;
pub use crate::store::{PassageStore, RawVerse, Segment, Word};
pub use crate::versification::{BookName, BookSpec, ResolvedPassage, Scheme, VerseKey};

use fxhash::FxHashMap;
use lectio_domain::modules::{Category, ModuleId, ModuleInfo};
use lectio_domain::reference::{ChapterKey, Direction, VerseRange, VersificationId};
use parking_lot::RwLock;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::info;

/// Converts references between versifications and resolves them to ordinal
/// ranges.
///
/// Everything is derived from [`VersificationService::scheme`]; the named
/// operations exist so callers do not repeat the parse/map dance.
pub trait VersificationService: Debug + Send + Sync {
    /// Snapshot of the named scheme.
    ///
    /// # Errors
    /// [`CorpusError::UnknownScheme`] when the scheme is not registered.
    fn scheme(&self, id: &VersificationId) -> Result<Arc<Scheme>, CorpusError>;

    /// Resolves a textual reference to an ordinal range under `versification`.
    ///
    /// # Errors
    /// [`CorpusError::NoSuchKey`] when the reference cannot parse or resolve.
    fn resolve(
        &self,
        reference: &str,
        versification: &VersificationId,
    ) -> Result<ResolvedPassage, CorpusError> {
        self.scheme(versification)?.resolve(reference)
    }

    /// Re-expresses a reference under another scheme. Verses missing from the
    /// target collapse to the nearest surviving neighbour.
    ///
    /// # Errors
    /// [`CorpusError::NoSuchKey`] when the reference does not resolve in the
    /// source scheme or its book is absent from the target.
    fn convert(
        &self,
        reference: &str,
        from: &VersificationId,
        to: &VersificationId,
    ) -> Result<ResolvedPassage, CorpusError> {
        let src = self.scheme(from)?;
        let dst = self.scheme(to)?;
        let resolved = src.resolve(reference)?;

        let no_key = || CorpusError::NoSuchKey {
            reference: reference.to_owned().into(),
            versification: dst.id().to_string().into(),
        };
        let start_key = src.key_of(resolved.range.start_ordinal).ok_or_else(no_key)?;
        let end_key = src.key_of(resolved.range.end_ordinal).ok_or_else(no_key)?;
        let start = dst.map_key_from(&src, &start_key).ok_or_else(no_key)?;
        let end = dst.map_key_from(&src, &end_key).ok_or_else(no_key)?;

        let range = VerseRange::new(start, end);
        let osis_id = dst.osis_of_range(range).ok_or_else(no_key)?;
        Ok(ResolvedPassage { range, osis_id, versification: dst.id().clone() })
    }

    /// Previous/next non-empty chapter relative to `reference`. `None` at
    /// corpus boundaries.
    ///
    /// # Errors
    /// [`CorpusError::NoSuchKey`] when the reference does not resolve.
    fn sibling(
        &self,
        reference: &str,
        versification: &VersificationId,
        direction: Direction,
    ) -> Result<Option<ChapterKey>, CorpusError> {
        let scheme = self.scheme(versification)?;
        let resolved = scheme.resolve(reference)?;
        Ok(scheme.sibling_chapter(resolved.range.start_ordinal, direction))
    }

    /// Widens a sub-chapter reference to its enclosing chapter.
    ///
    /// # Errors
    /// [`CorpusError::NoSuchKey`] when the reference does not resolve.
    fn expand_to_chapter(
        &self,
        versification: &VersificationId,
        reference: &str,
    ) -> Result<ChapterKey, CorpusError> {
        let scheme = self.scheme(versification)?;
        let resolved = scheme.resolve(reference)?;
        let key = scheme
            .key_of(resolved.range.start_ordinal)
            .ok_or_else(|| CorpusError::NoSuchKey {
                reference: reference.to_owned().into(),
                versification: versification.to_string().into(),
            })?;
        Ok(scheme.chapter_key(key.book, key.chapter))
    }
}

#[derive(Debug)]
struct ModuleEntry {
    info: ModuleInfo,
    verses: FxHashMap<u32, RawVerse>,
}

#[derive(Debug, Default)]
struct CorpusState {
    schemes: FxHashMap<VersificationId, Arc<Scheme>>,
    modules: FxHashMap<ModuleId, ModuleEntry>,
}

/// Inner state of the [`Corpus`] wrapper.
#[derive(Debug)]
pub struct CorpusInner {
    state: RwLock<CorpusState>,
}

/// In-memory corpus: catalog, versification registry and verse store in one
/// handle. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Corpus {
    inner: Arc<CorpusInner>,
}

impl Corpus {
    /// Creates a new [`CorpusBuilder`].
    pub fn builder() -> CorpusBuilder {
        CorpusBuilder::default()
    }

    /// Installs (or replaces) a module under the corpus-wide write lock.
    ///
    /// # Errors
    /// [`CorpusError::UnknownScheme`] when the module names an unregistered
    /// versification.
    pub fn install(
        &self,
        info: ModuleInfo,
        verses: Vec<RawVerse>,
    ) -> Result<(), CorpusError> {
        let mut state = self.inner.state.write();
        if !state.schemes.contains_key(&info.versification) {
            return Err(CorpusError::UnknownScheme {
                versification: info.versification.to_string().into(),
            });
        }
        info!(module = %info.id, verses = verses.len(), "Installing module");
        let verses = verses.into_iter().map(|v| (v.ordinal, v)).collect();
        state.modules.insert(info.id.clone(), ModuleEntry { info, verses });
        Ok(())
    }

    /// Removes a module; returns whether it was installed.
    pub fn remove(&self, id: &ModuleId) -> bool {
        let removed = self.inner.state.write().modules.remove(id).is_some();
        if removed {
            info!(module = %id, "Removed module");
        }
        removed
    }

    /// Registers an additional versification scheme.
    pub fn register_scheme(&self, scheme: Scheme) {
        let mut state = self.inner.state.write();
        state.schemes.insert(scheme.id().clone(), Arc::new(scheme));
    }
}

impl ModuleCatalog for Corpus {
    fn list_installed(&self, categories: &[Category], language: Option<&str>) -> Vec<ModuleInfo> {
        let state = self.inner.state.read();
        let mut modules: Vec<ModuleInfo> = state
            .modules
            .values()
            .filter(|entry| categories.is_empty() || categories.contains(&entry.info.category))
            .filter(|entry| {
                language.is_none_or(|lang| entry.info.language.eq_ignore_ascii_case(lang))
            })
            .map(|entry| entry.info.clone())
            .collect();
        modules.sort_by(|a, b| a.id.cmp(&b.id));
        modules
    }

    fn get(&self, id: &ModuleId) -> Option<ModuleInfo> {
        self.inner.state.read().modules.get(id).map(|entry| entry.info.clone())
    }
}

impl VersificationService for Corpus {
    fn scheme(&self, id: &VersificationId) -> Result<Arc<Scheme>, CorpusError> {
        self.inner.state.read().schemes.get(id).cloned().ok_or_else(|| {
            CorpusError::UnknownScheme { versification: id.to_string().into() }
        })
    }
}

impl PassageStore for Corpus {
    fn verses(&self, module: &ModuleId, range: VerseRange) -> Result<Vec<RawVerse>, CorpusError> {
        let state = self.inner.state.read();
        let entry = state
            .modules
            .get(module)
            .ok_or_else(|| CorpusError::ModuleNotFound { module: module.clone() })?;
        let mut verses: Vec<RawVerse> = (range.start_ordinal..=range.end_ordinal)
            .filter_map(|ordinal| entry.verses.get(&ordinal).cloned())
            .collect();
        verses.sort_by_key(|v| v.ordinal);
        Ok(verses)
    }
}

/// A fluent builder seeding schemes and modules before first use.
#[must_use = "builders do nothing unless you call .init()"]
#[derive(Debug, Default)]
pub struct CorpusBuilder {
    schemes: Vec<Scheme>,
    modules: Vec<(ModuleInfo, Vec<RawVerse>)>,
}

impl CorpusBuilder {
    pub fn scheme(mut self, scheme: Scheme) -> Self {
        self.schemes.push(scheme);
        self
    }

    pub fn module(mut self, info: ModuleInfo, verses: Vec<RawVerse>) -> Self {
        self.modules.push((info, verses));
        self
    }

    /// Consumes the builder and seeds the corpus.
    ///
    /// # Errors
    /// [`CorpusError::UnknownScheme`] when a module references a scheme that
    /// was not registered with the builder.
    pub fn init(self) -> Result<Corpus, CorpusError> {
        let corpus = Corpus { inner: Arc::new(CorpusInner { state: RwLock::new(CorpusState::default()) }) };
        for scheme in self.schemes {
            corpus.register_scheme(scheme);
        }
        for (info, verses) in self.modules {
            corpus.install(info, verses)?;
        }
        Ok(corpus)
    }
}
