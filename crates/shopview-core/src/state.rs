// ── Catalogue state ──
//
// `LoadPhase` is what the loader writes into its watch channel.
// `CatalogueState` is the read-only `{products, loading, error}` view of a
// phase that rendering surfaces consume.

use std::sync::Arc;

use crate::model::Product;

/// Shared, immutable product list. Replaced wholesale, never mutated.
pub type ProductList = Arc<Vec<Arc<Product>>>;

/// Lifecycle of the one load a catalogue performs.
///
/// Transitions only go `Idle → Loading → Loaded | Failed`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Loaded(ProductList),
    Failed,
}

impl LoadPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Loaded(_) | Self::Failed)
    }
}

/// Snapshot handed to rendering surfaces.
///
/// `loading` and `error` are never both set.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogueState {
    products: ProductList,
    loading: bool,
    error: bool,
}

impl CatalogueState {
    pub fn products(&self) -> &[Arc<Product>] {
        &self.products
    }

    pub fn product_list(&self) -> &ProductList {
        &self.products
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_error(&self) -> bool {
        self.error
    }
}

/// The observable state before the first load resolves.
impl Default for CatalogueState {
    fn default() -> Self {
        Self::from(&LoadPhase::Idle)
    }
}

impl From<&LoadPhase> for CatalogueState {
    fn from(phase: &LoadPhase) -> Self {
        match phase {
            // Idle only exists for the instant between construction and
            // `load()`, so it already reads as loading.
            LoadPhase::Idle | LoadPhase::Loading => Self {
                products: ProductList::default(),
                loading: true,
                error: false,
            },
            LoadPhase::Loaded(list) => Self {
                products: Arc::clone(list),
                loading: false,
                error: false,
            },
            LoadPhase::Failed => Self {
                products: ProductList::default(),
                loading: false,
                error: true,
            },
        }
    }
}
