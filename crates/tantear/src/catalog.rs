//! Marketplace catalogue constants
//!
//! Categories and locations as the site renders them. Menu labels are what
//! the dropdowns show; display names are the labels a results page may carry
//! in its header after searching within that category.

/// A top-level marketplace category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Real estate listings.
    Property,
    /// Vehicle listings.
    Motors,
    /// Job listings.
    Jobs,
    /// Commercial and agricultural listings.
    BusinessFarmingIndustry,
}

impl Category {
    /// The option text shown in the category dropdown.
    #[must_use]
    pub const fn menu_label(self) -> &'static str {
        match self {
            Self::Property => "Trade Me Property",
            Self::Motors => "Trade Me Motors",
            Self::Jobs => "Trade Me Jobs",
            Self::BusinessFarmingIndustry => "Business, farming & industry",
        }
    }

    /// Labels a results page header may carry for this category.
    #[must_use]
    pub const fn display_names(self) -> &'static [&'static str] {
        match self {
            Self::Property => &["Property", "Properties"],
            Self::Motors => &["Motors", "Motors for sale"],
            Self::Jobs => &["Jobs"],
            Self::BusinessFarmingIndustry => &["Business, farming & industry"],
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.menu_label())
    }
}

/// A region option in the location dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// The whole country; no districts.
    NewZealand,
    /// The whole island; no districts.
    NorthIsland,
    /// Northland region.
    Northland,
    /// Wellington region.
    Wellington,
}

impl Region {
    /// The option text shown in the region dropdown.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NewZealand => "New Zealand",
            Self::NorthIsland => "North Island",
            Self::Northland => "Northland",
            Self::Wellington => "Wellington",
        }
    }

    /// The "All of {region}" district option, when the region has districts.
    #[must_use]
    pub const fn all_of(self) -> Option<&'static str> {
        match self {
            Self::NewZealand | Self::NorthIsland => None,
            Self::Northland => Some("All of Northland"),
            Self::Wellington => Some("All of Wellington"),
        }
    }

    /// District options for the region, in dropdown order.
    #[must_use]
    pub const fn districts(self) -> &'static [&'static str] {
        match self {
            Self::NewZealand | Self::NorthIsland => &[],
            Self::Northland => &[
                "All of Northland",
                "Dargaville",
                "Kaikohe",
                "Kaitaia",
                "Kawakawa",
                "Kerikeri",
                "Mangawhai",
                "Maungaturoto",
                "Paihia",
                "Whangarei",
            ],
            Self::Wellington => &[
                "All of Wellington",
                "Kapiti",
                "Lower Hutt City",
                "Porirua",
                "Upper Hutt City",
                "Wellington City",
            ],
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_display_names() {
        assert_eq!(Category::Property.display_names(), &["Property", "Properties"]);
        assert_eq!(Category::Property.menu_label(), "Trade Me Property");
    }

    #[test]
    fn test_regions_without_districts() {
        assert!(Region::NewZealand.districts().is_empty());
        assert_eq!(Region::NewZealand.all_of(), None);
        assert!(Region::NorthIsland.districts().is_empty());
    }

    #[test]
    fn test_all_of_is_first_district() {
        for region in [Region::Northland, Region::Wellington] {
            let all_of = region.all_of().unwrap();
            assert_eq!(region.districts().first().copied(), Some(all_of));
            assert!(all_of.ends_with(region.label()));
        }
    }
}
