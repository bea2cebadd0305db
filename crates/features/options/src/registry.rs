//! The feature registry: pure data over [`Feature`] declaration order.
//!
//! Ordering matters everywhere here — UI state is keyed off stable positions,
//! so every listing follows enum declaration order.

use lectio_domain::features::Feature;
use lectio_domain::modules::{DisplayMode, ModuleInfo};
use serde::Serialize;
use strum::IntoEnumIterator;
use tracing::debug;

/// A feature plus the metadata a UI needs to present it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedFeature {
    pub feature: Feature,
    pub display_name: &'static str,
    pub default_enabled: bool,
}

/// Every feature, in declaration order.
#[must_use]
pub fn all() -> Vec<Feature> {
    Feature::iter().collect()
}

/// UI metadata for one feature.
#[must_use]
pub fn explain(feature: Feature) -> EnrichedFeature {
    EnrichedFeature {
        feature,
        display_name: feature.display_name(),
        default_enabled: feature.default_enabled(),
    }
}

/// Default-on features that the mode allows and the module supports.
#[must_use]
pub fn defaults_for(mode: DisplayMode, module: &ModuleInfo) -> Vec<Feature> {
    Feature::iter()
        .filter(|f| f.default_enabled())
        .filter(|f| f.allowed_in(mode))
        .filter(|f| module.capabilities.contains(f.required_capabilities()))
        .collect()
}

/// Features a UI may offer as toggles for this module combination: allowed in
/// the mode and supported by every participating module. Distinct from the
/// per-request kept set — a feature can be available yet not requested.
#[must_use]
pub fn available_for(
    base: &ModuleInfo,
    extras: &[ModuleInfo],
    mode: DisplayMode,
) -> Vec<Feature> {
    let intersection = extras
        .iter()
        .fold(base.capabilities, |caps, module| caps & module.capabilities);
    Feature::iter()
        .filter(|f| f.allowed_in(mode))
        .filter(|f| intersection.contains(f.required_capabilities()))
        .collect()
}

/// Parses the comma-separated wire form into features, deduplicated and in
/// declaration order. Unknown tokens are dropped silently (logged at debug).
#[must_use]
pub fn parse_csv(options: &str) -> Vec<Feature> {
    let mut requested = Vec::new();
    for token in options.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match token.parse::<Feature>() {
            Ok(feature) => {
                if !requested.contains(&feature) {
                    requested.push(feature);
                }
            }
            Err(_) => debug!(token, "Dropping unknown feature token"),
        }
    }
    requested.sort_unstable();
    requested
}

/// Inverse of [`parse_csv`].
#[must_use]
pub fn to_csv(features: &[Feature]) -> String {
    features.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
}
