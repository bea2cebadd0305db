//! Lookup results and option-trimming records.

use crate::features::Feature;
use crate::reference::{ChapterKey, VersificationId};
use serde::{Deserialize, Serialize};

/// Why a requested feature was removed before rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrimReason {
    IncompatibleWithMode,
    NotSupportedByModule,
    ConflictsWithOtherFeature,
}

/// A feature that was requested but could not be applied, with exactly one
/// reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrimmedOption {
    pub feature: Feature,
    pub reason: TrimReason,
}

/// The complete outcome of a passage lookup. Immutable once constructed.
///
/// `selected_features` is the UI echo contract: applied features plus the
/// trimmed ones, so the client re-checks every box the user ticked even when
/// a feature could not be honoured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassageResult {
    /// Display-ready HTML fragment.
    pub html: String,
    /// OSIS identifier of the rendered range, e.g. `John.3.16`.
    pub osis_id: String,
    pub versification: VersificationId,
    pub start_ordinal: u32,
    pub end_ordinal: u32,
    /// Features that actually shaped the HTML. Always a subset of the request.
    pub applied_features: Vec<Feature>,
    /// Applied plus trimmed, in declaration order.
    pub selected_features: Vec<Feature>,
    pub removed_features: Vec<TrimmedOption>,
    /// Registry features the UI may offer for this module combination.
    pub available_features: Vec<Feature>,
    pub previous_chapter: Option<ChapterKey>,
    pub next_chapter: Option<ChapterKey>,
}

impl PassageResult {
    /// Checks the result invariants; used by tests and debug assertions.
    #[must_use]
    pub fn invariants_hold(&self) -> bool {
        let applied_disjoint_from_removed =
            self.applied_features.iter().all(|f| {
                self.removed_features.iter().all(|r| r.feature != *f)
            });
        let selected_is_union = self
            .selected_features
            .iter()
            .all(|f| {
                self.applied_features.contains(f)
                    || self.removed_features.iter().any(|r| r.feature == *f)
            })
            && self.applied_features.iter().all(|f| self.selected_features.contains(f))
            && self.removed_features.iter().all(|r| self.selected_features.contains(&r.feature));
        applied_disjoint_from_removed
            && selected_is_union
            && self.start_ordinal <= self.end_ordinal
    }
}
