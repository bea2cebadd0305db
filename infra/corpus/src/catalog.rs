//! Module catalog interface.

use lectio_domain::features::Capabilities;
use lectio_domain::modules::{Category, ModuleId, ModuleInfo};
use std::fmt::Debug;

/// Read access to installed module metadata.
///
/// Implementations must support concurrent readers; mutation (install,
/// remove) happens behind a catalog-wide write lock owned by the
/// implementation.
pub trait ModuleCatalog: Debug + Send + Sync {
    /// Installed modules of the given categories, optionally filtered by
    /// language, sorted by initials.
    fn list_installed(&self, categories: &[Category], language: Option<&str>) -> Vec<ModuleInfo>;

    /// Metadata for one module, `None` when not installed.
    fn get(&self, id: &ModuleId) -> Option<ModuleInfo>;

    fn is_installed(&self, id: &ModuleId) -> bool {
        self.get(id).is_some()
    }

    fn capabilities(&self, id: &ModuleId) -> Option<Capabilities> {
        self.get(id).map(|info| info.capabilities)
    }
}
