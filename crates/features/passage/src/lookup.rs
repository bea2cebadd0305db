//! The lookup coordinator: one entry point per read operation.
//!
//! Holds the three collaborator handles and runs the fixed pipeline: parse
//! features, resolve modules, settle the display mode, trim, resolve the
//! reference, render, attach navigation. Synchronous throughout; deadlines
//! and cancellation belong to the transport edge.

use crate::error::PassageError;
use crate::renderer::Renderer;
use crate::resolver;
use lectio_corpus::{
    BookName, Corpus, ModuleCatalog, PassageStore, RawVerse, VersificationService,
};
use lectio_domain::features::Feature;
use lectio_domain::modules::{Category, DisplayMode, ModuleId, ModuleInfo};
use lectio_domain::passage::PassageResult;
use lectio_domain::reference::{ChapterKey, Direction, Rounding, VersificationId};
use lectio_options::registry;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// The collaborators a lookup needs, wired once at startup.
#[derive(Debug, Clone)]
pub struct Services {
    pub catalog: Arc<dyn ModuleCatalog>,
    pub versification: Arc<dyn VersificationService>,
    pub store: Arc<dyn PassageStore>,
}

impl Services {
    /// Wires all three handles to one shared corpus.
    #[must_use]
    pub fn from_corpus(corpus: &Corpus) -> Self {
        let shared = Arc::new(corpus.clone());
        Self { catalog: shared.clone(), versification: shared.clone(), store: shared }
    }
}

/// A textual-reference lookup request, straight off the wire.
#[derive(Debug, Clone, Default)]
pub struct PassageRequest {
    pub version: String,
    pub reference: String,
    /// Comma-separated feature tokens. Absent means module defaults.
    pub options: Option<String>,
    /// Comma-separated extra version initials.
    pub extra_versions: Option<String>,
    /// Client hint for the multi-version layout.
    pub display_mode: Option<String>,
}

/// A numbered-verse lookup request.
#[derive(Debug, Clone)]
pub struct OrdinalRequest {
    pub version: String,
    pub start_ordinal: u32,
    pub end_ordinal: u32,
    pub rounding: Rounding,
    pub options: Option<String>,
    pub extra_versions: Option<String>,
}

/// Location of a reference under a target versification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyInfo {
    pub osis_id: String,
    pub versification: VersificationId,
    pub start_ordinal: u32,
    pub end_ordinal: u32,
}

/// The passage lookup service. Cheap to clone; all state lives behind the
/// collaborator handles.
#[derive(Debug, Clone)]
pub struct LookupService {
    services: Services,
}

impl LookupService {
    #[must_use]
    pub fn new(services: Services) -> Self {
        Self { services }
    }

    fn module(&self, initials: &str) -> Result<ModuleInfo, PassageError> {
        let id = ModuleId::new(initials);
        self.services.catalog.get(&id).ok_or(PassageError::ModuleNotFound { module: id })
    }

    /// Resolves every initials token of the comma-separated list, failing on
    /// the first one that is not installed.
    fn extra_modules(&self, csv: Option<&str>) -> Result<Vec<ModuleInfo>, PassageError> {
        csv.unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| self.module(token))
            .collect()
    }

    fn requested_features(
        options: Option<&str>,
        mode: DisplayMode,
        base: &ModuleInfo,
    ) -> Vec<Feature> {
        match options {
            Some(csv) => lectio_options::parse_csv(csv),
            None => registry::defaults_for(mode, base),
        }
    }

    /// Looks up a passage by textual reference.
    ///
    /// # Errors
    /// [`PassageError::ModuleNotFound`] for unknown initials,
    /// [`PassageError::NoSuchKey`] for unresolvable references, and store
    /// failures as [`PassageError::ModuleReadFailed`].
    pub fn lookup(&self, request: &PassageRequest) -> Result<PassageResult, PassageError> {
        let base = self.module(&request.version)?;
        let extras = self.extra_modules(request.extra_versions.as_deref())?;
        let mode = DisplayMode::resolve(request.display_mode.as_deref(), extras.len());
        let requested = Self::requested_features(request.options.as_deref(), mode, &base);

        let outcome = lectio_options::trim(&requested, &base, &extras, mode);
        for removal in &outcome.removed {
            debug!(feature = %removal.feature, reason = ?removal.reason, "Trimmed feature");
        }

        let resolved =
            self.services.versification.resolve(&request.reference, &base.versification)?;

        let renderer = Renderer::new(&*self.services.store, &*self.services.versification);
        let html = if mode.is_multi_version() {
            let mut modules = Vec::with_capacity(extras.len() + 1);
            modules.push(base.clone());
            modules.extend(extras.iter().cloned());
            renderer.interleaved(&modules, &request.reference, &resolved, &outcome.kept, mode)?
        } else {
            let gloss = match mode {
                DisplayMode::Interlinear => extras.first(),
                _ => None,
            };
            renderer.single(&base, &resolved, &outcome.kept, gloss)?
        };

        let previous_chapter = self.services.versification.sibling(
            &request.reference,
            &base.versification,
            Direction::Previous,
        )?;
        let next_chapter = self.services.versification.sibling(
            &request.reference,
            &base.versification,
            Direction::Next,
        )?;

        let result = PassageResult {
            html,
            osis_id: resolved.osis_id,
            versification: resolved.versification,
            start_ordinal: resolved.range.start_ordinal,
            end_ordinal: resolved.range.end_ordinal,
            applied_features: outcome.kept.clone(),
            selected_features: outcome.selected(),
            removed_features: outcome.removed,
            available_features: registry::available_for(&base, &extras, mode),
            previous_chapter,
            next_chapter,
        };
        debug_assert!(result.invariants_hold());
        Ok(result)
    }

    /// Looks up a passage by raw verse ordinals. Always renders the base
    /// module alone; extra versions only tighten the feature trim.
    ///
    /// # Errors
    /// As [`LookupService::lookup`].
    pub fn lookup_by_ordinals(
        &self,
        request: &OrdinalRequest,
    ) -> Result<PassageResult, PassageError> {
        let base = self.module(&request.version)?;
        let extras = self.extra_modules(request.extra_versions.as_deref())?;
        let mode = DisplayMode::Single;
        let requested = Self::requested_features(request.options.as_deref(), mode, &base);
        let outcome = lectio_options::trim(&requested, &base, &extras, mode);

        let scheme = self.services.versification.scheme(&base.versification)?;
        let resolved = resolver::resolve_ordinals(
            &scheme,
            request.start_ordinal,
            request.end_ordinal,
            request.rounding,
        )?;

        let renderer = Renderer::new(&*self.services.store, &*self.services.versification);
        let html = renderer.single(&base, &resolved, &outcome.kept, None)?;

        let result = PassageResult {
            html,
            osis_id: resolved.osis_id.clone(),
            versification: resolved.versification,
            start_ordinal: resolved.range.start_ordinal,
            end_ordinal: resolved.range.end_ordinal,
            applied_features: outcome.kept.clone(),
            selected_features: outcome.selected(),
            removed_features: outcome.removed,
            available_features: registry::available_for(&base, &extras, mode),
            previous_chapter: scheme.sibling_chapter(resolved.range.start_ordinal, Direction::Previous),
            next_chapter: scheme.sibling_chapter(resolved.range.end_ordinal, Direction::Next),
        };
        debug_assert!(result.invariants_hold());
        Ok(result)
    }

    /// Installed modules of the given categories, optionally filtered by
    /// language.
    #[must_use]
    pub fn versions(&self, categories: &[Category], language: Option<&str>) -> Vec<ModuleInfo> {
        self.services.catalog.list_installed(categories, language)
    }

    /// Features a UI may offer for this module combination.
    ///
    /// # Errors
    /// [`PassageError::ModuleNotFound`] for unknown initials.
    pub fn available_features(
        &self,
        version: &str,
        extra_versions: Option<&str>,
        display_mode: Option<&str>,
    ) -> Result<Vec<Feature>, PassageError> {
        let base = self.module(version)?;
        let extras = self.extra_modules(extra_versions)?;
        let mode = DisplayMode::resolve(display_mode, extras.len());
        Ok(registry::available_for(&base, &extras, mode))
    }

    /// Books of the module's versification matching `prefix`.
    ///
    /// # Errors
    /// [`PassageError::ModuleNotFound`] for unknown initials.
    pub fn book_names(&self, version: &str, prefix: &str) -> Result<Vec<BookName>, PassageError> {
        let base = self.module(version)?;
        let scheme = self.services.versification.scheme(&base.versification)?;
        Ok(scheme.book_names(prefix))
    }

    /// Previous/next non-empty chapter, `None` at corpus boundaries.
    ///
    /// # Errors
    /// [`PassageError::NoSuchKey`] when the reference does not resolve.
    pub fn sibling_chapter(
        &self,
        version: &str,
        reference: &str,
        direction: Direction,
    ) -> Result<Option<ChapterKey>, PassageError> {
        let base = self.module(version)?;
        Ok(self.services.versification.sibling(reference, &base.versification, direction)?)
    }

    /// Widens a sub-chapter reference to its enclosing chapter.
    ///
    /// # Errors
    /// [`PassageError::NoSuchKey`] when the reference does not resolve.
    pub fn expand_to_chapter(
        &self,
        version: &str,
        reference: &str,
    ) -> Result<ChapterKey, PassageError> {
        let base = self.module(version)?;
        Ok(self.services.versification.expand_to_chapter(&base.versification, reference)?)
    }

    /// Resolves `reference` under `version`'s scheme. With `source_version`
    /// set, the reference is read in the source scheme first and converted.
    ///
    /// # Errors
    /// [`PassageError::NoSuchKey`] when the reference does not resolve in
    /// either scheme.
    pub fn key_info(
        &self,
        version: &str,
        reference: &str,
        source_version: Option<&str>,
    ) -> Result<KeyInfo, PassageError> {
        let target = self.module(version)?;
        let resolved = match source_version {
            Some(source) => {
                let source = self.module(source)?;
                self.services.versification.convert(
                    reference,
                    &source.versification,
                    &target.versification,
                )?
            }
            None => self.services.versification.resolve(reference, &target.versification)?,
        };
        Ok(KeyInfo {
            osis_id: resolved.osis_id,
            versification: resolved.versification,
            start_ordinal: resolved.range.start_ordinal,
            end_ordinal: resolved.range.end_ordinal,
        })
    }

    /// Unmarked-up text of a passage, for copy/share surfaces. With
    /// `first_verse_only`, just the opening verse.
    ///
    /// # Errors
    /// As [`LookupService::lookup`].
    pub fn plain_text(
        &self,
        version: &str,
        reference: &str,
        first_verse_only: bool,
    ) -> Result<String, PassageError> {
        let base = self.module(version)?;
        let resolved = self.services.versification.resolve(reference, &base.versification)?;
        let mut verses = self.services.store.verses(&base.id, resolved.range)?;
        if first_verse_only {
            verses.truncate(1);
        }
        Ok(verses.iter().map(RawVerse::plain_text).collect::<Vec<_>>().join(" "))
    }
}
