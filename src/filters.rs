//! Search filters and their query-string fragments.

use tracing::warn;

use crate::error::ScrapeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Filter {
    pub name: &'static str,
    pub fragment: &'static str,
    pub label: &'static str,
}

const FILTERS: [Filter; 17] = [
    Filter {
        name: "only_digiplus",
        fragment: "only_plus=1",
        label: "Only DigiPlus",
    },
    Filter {
        name: "only_supermarkets",
        fragment: "only_fresh=1",
        label: "Only supermarkets",
    },
    Filter {
        name: "ship_by_seller",
        fragment: "has_ship_by_seller=1",
        label: "Ship by the seller",
    },
    Filter {
        name: "jet_delivery",
        fragment: "has_jet_delivery=1",
        label: "Fast delivery",
    },
    Filter {
        name: "available_items",
        fragment: "has_selling_stock=1",
        label: "Only available items",
    },
    Filter {
        name: "available_in_stores",
        fragment: "has_ready_to_shipment=1",
        label: "Only available in Digikala's stores",
    },
    Filter {
        name: "seller_digikala",
        fragment: "seller_types[0]=digikala",
        label: "Sells by Digikala itself",
    },
    Filter {
        name: "seller_official",
        fragment: "seller_types[1]=official",
        label: "Sells officially",
    },
    Filter {
        name: "seller_trusted",
        fragment: "seller_types[2]=trusted",
        label: "Sells by trusted sellers",
    },
    Filter {
        name: "seller_indigenous",
        fragment: "seller_types[3]=roosta",
        label: "Sells by indigenous sellers",
    },
    Filter {
        name: "most_relevant",
        fragment: "sort=22",
        label: "Most relevant",
    },
    Filter {
        name: "most_viewed",
        fragment: "sort=4",
        label: "Most viewed",
    },
    Filter {
        name: "newest",
        fragment: "sort=1",
        label: "Newest",
    },
    Filter {
        name: "best_selling",
        fragment: "sort=7",
        label: "Best selling",
    },
    Filter {
        name: "cheapest",
        fragment: "sort=20",
        label: "Cheapest",
    },
    Filter {
        name: "most_expensive",
        fragment: "sort=21",
        label: "Most expensive",
    },
    Filter {
        name: "fastest_post",
        fragment: "sort=25",
        label: "Fastest post",
    },
];

/// Immutable, insertion-ordered filter name -> fragment table.
#[derive(Debug, Clone)]
pub struct FilterTable {
    filters: Vec<Filter>,
}

impl Default for FilterTable {
    fn default() -> Self {
        Self {
            filters: FILTERS.to_vec(),
        }
    }
}

impl FilterTable {
    pub fn iter(&self) -> impl Iterator<Item = &Filter> {
        self.filters.iter()
    }

    pub fn fragment(&self, name: &str) -> Result<&'static str, ScrapeError> {
        self.filters
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.fragment)
            .ok_or_else(|| ScrapeError::UnknownFilter(name.to_string()))
    }

    /// Joins the fragments of `names` with `&`, keeping the given order.
    /// Fails on the first unknown name.
    pub fn query<S: AsRef<str>>(&self, names: &[S]) -> Result<String, ScrapeError> {
        let fragments = names
            .iter()
            .map(|n| self.fragment(n.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(fragments.join("&"))
    }

    /// Maps 1-based menu indices to filter names, in table order.
    /// Out-of-range indices are dropped.
    pub fn names_by_indices(&self, indices: &[usize]) -> Vec<String> {
        for &idx in indices {
            if idx == 0 || idx > self.filters.len() {
                warn!("ignoring filter index {idx}, expected 1..={}", self.filters.len());
            }
        }
        self.filters
            .iter()
            .enumerate()
            .filter(|(i, _)| indices.contains(&(i + 1)))
            .map(|(_, f)| f.name.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_seventeen_unique_names() {
        let table = FilterTable::default();
        assert_eq!(table.iter().count(), 17);
        let mut names: Vec<_> = table.iter().map(|f| f.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 17);
    }

    #[test]
    fn query_keeps_supplied_order() {
        let table = FilterTable::default();
        let q = table.query(&["cheapest", "only_digiplus", "seller_trusted"]).unwrap();
        assert_eq!(q, "sort=20&only_plus=1&seller_types[2]=trusted");
    }

    #[test]
    fn seller_types_stay_independently_addressable() {
        let table = FilterTable::default();
        let q = table.query(&["seller_indigenous", "seller_digikala"]).unwrap();
        assert_eq!(q, "seller_types[3]=roosta&seller_types[0]=digikala");
    }

    #[test]
    fn every_name_contributes_exactly_one_fragment() {
        let table = FilterTable::default();
        let names: Vec<&str> = table.iter().map(|f| f.name).collect();
        let q = table.query(&names).unwrap();
        assert_eq!(q.split('&').count(), 17);
        assert_eq!(table.query::<&str>(&[]).unwrap(), "");
    }

    #[test]
    fn unknown_filter_is_rejected() {
        let table = FilterTable::default();
        let err = table.query(&["newest", "free_shipping"]).unwrap_err();
        assert!(matches!(err, ScrapeError::UnknownFilter(name) if name == "free_shipping"));
    }

    #[test]
    fn indices_resolve_in_table_order() {
        let table = FilterTable::default();
        let names = table.names_by_indices(&[15, 1, 99, 0]);
        assert_eq!(names, vec!["only_digiplus", "cheapest"]);
    }
}
