//! Trims a requested feature set to what the chosen modules and display mode
//! can honour simultaneously.
//!
//! Trimming never fails: every removal is recorded with exactly one reason so
//! the client can re-check the boxes the user ticked (the UI echo contract).

use lectio_domain::features::Feature;
use lectio_domain::modules::{DisplayMode, ModuleInfo};
use lectio_domain::passage::{TrimReason, TrimmedOption};
use strum::IntoEnumIterator;

/// The outcome of a trim: what survives and what was removed, both in
/// declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrimOutcome {
    pub kept: Vec<Feature>,
    pub removed: Vec<TrimmedOption>,
}

impl TrimOutcome {
    /// Applied plus trimmed, in declaration order: the `selected` echo set.
    #[must_use]
    pub fn selected(&self) -> Vec<Feature> {
        let mut selected: Vec<Feature> = self
            .kept
            .iter()
            .copied()
            .chain(self.removed.iter().map(|r| r.feature))
            .collect();
        selected.sort_unstable();
        selected
    }
}

/// Trims `requested` against the base module, the extra modules and the
/// display mode.
///
/// Deterministic regardless of the iteration order of `requested`: features
/// are visited in declaration order. Extra modules always constrain the
/// capability intersection, even when the final mode renders the base module
/// alone.
#[must_use]
pub fn trim(
    requested: &[Feature],
    base: &ModuleInfo,
    extras: &[ModuleInfo],
    mode: DisplayMode,
) -> TrimOutcome {
    let intersection = extras
        .iter()
        .fold(base.capabilities, |caps, module| caps & module.capabilities);

    let mut kept = Vec::with_capacity(requested.len());
    let mut removed = Vec::new();

    for feature in Feature::iter().filter(|f| requested.contains(f)) {
        if !feature.allowed_in(mode) {
            removed.push(TrimmedOption { feature, reason: TrimReason::IncompatibleWithMode });
        } else if !intersection.contains(feature.required_capabilities()) {
            removed.push(TrimmedOption { feature, reason: TrimReason::NotSupportedByModule });
        } else {
            kept.push(feature);
        }
    }

    // Conflict pass: of each incompatible pair, the later-declared feature
    // loses.
    let mut conflicted = Vec::new();
    for (i, feature) in kept.iter().enumerate() {
        for later in &kept[i + 1..] {
            if feature.incompatible_with().contains(later) && !conflicted.contains(later) {
                conflicted.push(*later);
            }
        }
    }
    for feature in conflicted {
        kept.retain(|f| *f != feature);
        removed.push(TrimmedOption { feature, reason: TrimReason::ConflictsWithOtherFeature });
    }
    removed.sort_unstable_by_key(|r| r.feature);

    TrimOutcome { kept, removed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectio_domain::features::Capabilities;
    use lectio_domain::modules::{Category, ModuleId};
    use lectio_domain::reference::VersificationId;

    fn module(id: &str, caps: Capabilities) -> ModuleInfo {
        ModuleInfo {
            id: ModuleId::new(id),
            name: id.to_owned(),
            language: "en".to_owned(),
            category: Category::Bible,
            capabilities: caps,
            versification: VersificationId::new("standard"),
        }
    }

    #[test]
    fn unsupported_features_are_removed_with_reason() {
        let base = module("KJV", Capabilities::RED_LETTER);
        let outcome =
            trim(&[Feature::VerseNumbers, Feature::Strongs], &base, &[], DisplayMode::Single);
        assert_eq!(outcome.kept, vec![Feature::VerseNumbers]);
        assert_eq!(
            outcome.removed,
            vec![TrimmedOption {
                feature: Feature::Strongs,
                reason: TrimReason::NotSupportedByModule
            }]
        );
    }

    #[test]
    fn mode_incompatibility_wins_over_capability() {
        // Strongs is not allowed in interleaved modes even when every module
        // could supply it.
        let base = module("WEB", Capabilities::all());
        let extra = module("KJV", Capabilities::all());
        let outcome =
            trim(&[Feature::Strongs], &base, &[extra], DisplayMode::InterleavedByVerse);
        assert!(outcome.kept.is_empty());
        assert_eq!(outcome.removed[0].reason, TrimReason::IncompatibleWithMode);
    }

    #[test]
    fn extras_constrain_even_in_single_mode() {
        let base = module("WEB", Capabilities::all());
        let bare = module("LXXE", Capabilities::HEADINGS);
        let outcome = trim(&[Feature::Strongs], &base, &[bare], DisplayMode::Single);
        assert_eq!(outcome.removed[0].reason, TrimReason::NotSupportedByModule);
    }

    #[test]
    fn conflicts_drop_the_later_declared_feature() {
        let base = module("KJV", Capabilities::all());
        let outcome = trim(
            &[Feature::TinyVerseNumbers, Feature::VerseNumbers],
            &base,
            &[],
            DisplayMode::InterleavedByVerse,
        );
        assert_eq!(outcome.kept, vec![Feature::VerseNumbers]);
        assert_eq!(
            outcome.removed,
            vec![TrimmedOption {
                feature: Feature::TinyVerseNumbers,
                reason: TrimReason::ConflictsWithOtherFeature
            }]
        );
    }

    #[test]
    fn selected_is_the_union_of_kept_and_removed() {
        let base = module("KJV", Capabilities::RED_LETTER);
        let requested = [Feature::VerseNumbers, Feature::RedLetter, Feature::Morphology];
        let outcome = trim(&requested, &base, &[], DisplayMode::Single);
        let mut expected = requested.to_vec();
        expected.sort_unstable();
        assert_eq!(outcome.selected(), expected);
    }
}
