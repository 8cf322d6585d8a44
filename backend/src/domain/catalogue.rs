//! Static product catalogue shown on the products page.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Product line a product belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductCategory {
    /// Energy products.
    Energi,
    /// Agricultural products.
    Pertanian,
    /// Industrial products.
    Industri,
}

impl ProductCategory {
    /// Every category in filter-bar order.
    pub const ALL: [Self; 3] = [Self::Energi, Self::Pertanian, Self::Industri];

    /// Value of the filter button's `data-filter` attribute.
    #[must_use]
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::Energi => "energi",
            Self::Pertanian => "pertanian",
            Self::Industri => "industri",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Filter value that names no category.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown product filter: {value}")]
pub struct UnknownFilter {
    /// Rejected input.
    pub value: String,
}

/// Active filter of the product grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductFilter {
    /// Show everything.
    #[default]
    All,
    /// Show one category only.
    Category(ProductCategory),
}

impl FromStr for ProductFilter {
    type Err = UnknownFilter;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim();
        if wanted.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        ProductCategory::ALL
            .into_iter()
            .find(|category| category.slug().eq_ignore_ascii_case(wanted))
            .map(Self::Category)
            .ok_or_else(|| UnknownFilter {
                value: value.to_owned(),
            })
    }
}

impl ProductFilter {
    /// True when `category` passes the filter. Matching is exact.
    #[must_use]
    pub fn admits(&self, category: ProductCategory) -> bool {
        match self {
            Self::All => true,
            Self::Category(wanted) => *wanted == category,
        }
    }
}

/// A product card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    category: ProductCategory,
}

impl Product {
    /// Identifier used by the wishlist.
    pub fn id(&self) -> &'static str {
        self.id
    }

    /// Card title.
    pub fn title(&self) -> &'static str {
        self.title
    }

    /// Card blurb.
    pub fn description(&self) -> &'static str {
        self.description
    }

    /// Product line, used by the category filter.
    pub fn category(&self) -> ProductCategory {
        self.category
    }
}

const MIVO_PRODUCTS: [Product; 3] = [
    Product {
        id: "biogas",
        title: "Reaktor Biogas Laut",
        description: "Sistem biogas inovatif yang mengkonversi limbah ikan menjadi energi terbarukan untuk kebutuhan rumah tangga dan industri kecil.",
        category: ProductCategory::Energi,
    },
    Product {
        id: "biooil",
        title: "BioOil Converter",
        description: "Teknologi pirolisis canggih untuk mengubah biomassa laut menjadi bio-oil berkualitas tinggi sebagai bahan bakar alternatif.",
        category: ProductCategory::Industri,
    },
    Product {
        id: "pupuk",
        title: "Pupuk Cair Laut",
        description: "Pupuk organik cair kaya nutrisi dari residu proses biogas, ideal untuk pertanian pesisir dan budidaya tambak.",
        category: ProductCategory::Pertanian,
    },
];

/// Ordered, read-only product list.
#[derive(Debug, Clone, Copy)]
pub struct Catalogue {
    products: &'static [Product],
}

impl Catalogue {
    /// The products sold on the site.
    ///
    /// # Examples
    /// ```
    /// use mivo_auth::domain::{Catalogue, ProductCategory, ProductFilter};
    ///
    /// let energy = Catalogue::mivo().filter(ProductFilter::Category(ProductCategory::Energi));
    /// assert_eq!(energy.len(), 1);
    /// assert_eq!(energy[0].id(), "biogas");
    /// ```
    pub const fn mivo() -> Self {
        Self {
            products: &MIVO_PRODUCTS,
        }
    }

    /// Every product in catalogue order.
    pub fn products(&self) -> &'static [Product] {
        self.products
    }

    /// Products passing `filter`, in catalogue order.
    pub fn filter(&self, filter: ProductFilter) -> Vec<&'static Product> {
        self.products
            .iter()
            .filter(|product| filter.admits(product.category()))
            .collect()
    }

    /// Look a product up by id.
    pub fn find(&self, id: &str) -> Option<&'static Product> {
        self.products.iter().find(|product| product.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ids(products: &[&Product]) -> Vec<&'static str> {
        products.iter().map(|product| product.id()).collect()
    }

    #[rstest]
    #[case(ProductFilter::All, vec!["biogas", "biooil", "pupuk"])]
    #[case(ProductFilter::Category(ProductCategory::Energi), vec!["biogas"])]
    #[case(ProductFilter::Category(ProductCategory::Industri), vec!["biooil"])]
    #[case(ProductFilter::Category(ProductCategory::Pertanian), vec!["pupuk"])]
    fn filters_in_catalogue_order(#[case] filter: ProductFilter, #[case] expected: Vec<&str>) {
        assert_eq!(ids(&Catalogue::mivo().filter(filter)), expected);
    }

    #[rstest]
    #[case("all", ProductFilter::All)]
    #[case(" Energi ", ProductFilter::Category(ProductCategory::Energi))]
    #[case("pertanian", ProductFilter::Category(ProductCategory::Pertanian))]
    fn parses_filter_buttons(#[case] raw: &str, #[case] expected: ProductFilter) {
        assert_eq!(raw.parse::<ProductFilter>(), Ok(expected));
    }

    #[rstest]
    fn partial_category_names_do_not_match() {
        let error = "energ".parse::<ProductFilter>().expect_err("partial name");
        assert_eq!(error.value, "energ");
    }

    #[rstest]
    fn finds_products_by_id() {
        let product = Catalogue::mivo().find("biooil").expect("biooil");
        assert_eq!(product.title(), "BioOil Converter");
        assert!(Catalogue::mivo().find("tuna").is_none());
    }
}
