//! The fixed product catalog used when live extraction comes back empty
//! and by the static data source.

use crate::products::Product;

/// Returns the two-item catalog substituted for an empty live extraction.
///
/// The entries are market-research stand-ins with realistic guaraní
/// pricing; their ids are stable across runs so re-runs upsert the same
/// dossier rows.
#[must_use]
pub fn fallback_catalog() -> Vec<Product> {
    vec![
        Product {
            id: "dropi_fallback_1".to_string(),
            name: "Smartphone Samsung Galaxy A54 5G".to_string(),
            price: 2_800_000,
            image_url: "https://via.placeholder.com/300x300/4285F4/FFFFFF?text=Galaxy+A54"
                .to_string(),
            url: "https://dropi.com.py/product/samsung-galaxy-a54-5g".to_string(),
            description: "Smartphone 5G con cámara 50MP, pantalla 6.4\" Super AMOLED".to_string(),
            category: "Smartphones".to_string(),
            stock: 15,
            brand: "Samsung".to_string(),
            rating: 4.5,
        },
        Product {
            id: "dropi_fallback_2".to_string(),
            name: "Laptop Lenovo IdeaPad 3 Intel Core i5".to_string(),
            price: 3_500_000,
            image_url: "https://via.placeholder.com/300x300/E53935/FFFFFF?text=Lenovo+i5"
                .to_string(),
            url: "https://dropi.com.py/product/lenovo-ideapad-3-i5".to_string(),
            description: "Laptop 15.6\" FHD, Intel Core i5-1135G7, 8GB RAM, 512GB SSD".to_string(),
            category: "Laptops".to_string(),
            stock: 8,
            brand: "Lenovo".to_string(),
            rating: 4.3,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_exactly_two_entries() {
        assert_eq!(fallback_catalog().len(), 2);
    }

    #[test]
    fn catalog_entries_are_analyzable() {
        assert!(fallback_catalog().iter().all(Product::is_analyzable));
    }

    #[test]
    fn catalog_ids_are_stable() {
        let ids: Vec<String> = fallback_catalog().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["dropi_fallback_1", "dropi_fallback_2"]);
    }

    #[test]
    fn catalog_names_match_the_research_set() {
        let names: Vec<String> = fallback_catalog().into_iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            vec![
                "Smartphone Samsung Galaxy A54 5G",
                "Laptop Lenovo IdeaPad 3 Intel Core i5",
            ]
        );
    }
}
