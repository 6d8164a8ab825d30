#![forbid(unsafe_code)]

//! Drill-down navigation inside the sheet: brands, then a brand's
//! categories, then the clothes of one category.

use tracing::debug;

/// The level the sheet content is showing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BrowseView {
    #[default]
    Brands,
    Categories {
        brand: String,
    },
    Clothes {
        brand: String,
        category: String,
    },
}

/// What a back press did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackOutcome {
    /// Moved up one level.
    SteppedUp,
    /// Already at the top level; the sheet should close.
    CloseRequested,
}

/// Display names for catalog ids.
pub trait CatalogNames {
    fn brand_name(&self, brand: &str) -> Option<&str>;
    fn category_name(&self, brand: &str, category: &str) -> Option<&str>;
}

/// Browse state with drill-down and back navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowseState {
    view: BrowseView,
}

impl BrowseState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn view(&self) -> &BrowseView {
        &self.view
    }

    #[must_use]
    pub fn selected_brand(&self) -> Option<&str> {
        match &self.view {
            BrowseView::Brands => None,
            BrowseView::Categories { brand } | BrowseView::Clothes { brand, .. } => Some(brand),
        }
    }

    #[must_use]
    pub fn selected_category(&self) -> Option<&str> {
        match &self.view {
            BrowseView::Clothes { category, .. } => Some(category),
            _ => None,
        }
    }

    /// Show the categories of `brand`. Valid from any level.
    pub fn select_brand(&mut self, brand: impl Into<String>) {
        let brand = brand.into();
        debug!(%brand, "browse: brand selected");
        self.view = BrowseView::Categories { brand };
    }

    /// Show the clothes of `category`. Ignored unless a brand's categories
    /// are showing.
    pub fn select_category(&mut self, category: impl Into<String>) -> bool {
        let BrowseView::Categories { brand } = &self.view else {
            return false;
        };
        let category = category.into();
        debug!(%brand, %category, "browse: category selected");
        self.view = BrowseView::Clothes {
            brand: brand.clone(),
            category,
        };
        true
    }

    /// Step up one level.
    pub fn back(&mut self) -> BackOutcome {
        self.view = match std::mem::take(&mut self.view) {
            BrowseView::Clothes { brand, .. } => BrowseView::Categories { brand },
            BrowseView::Categories { .. } => BrowseView::Brands,
            BrowseView::Brands => return BackOutcome::CloseRequested,
        };
        BackOutcome::SteppedUp
    }

    /// Return to the brand list with no selection.
    pub fn reset(&mut self) {
        self.view = BrowseView::Brands;
    }

    /// Header title for the current level.
    #[must_use]
    pub fn title<'a>(&'a self, names: &'a dyn CatalogNames) -> &'a str {
        match &self.view {
            BrowseView::Brands => "Browse Brands",
            BrowseView::Categories { brand } => names.brand_name(brand).unwrap_or("Categories"),
            BrowseView::Clothes { brand, category } => {
                names.category_name(brand, category).unwrap_or("Clothes")
            }
        }
    }
}
