//! Bundled sample catalog
//!
//! Used by the demo server and the test suites. Tags are the German
//! storefront tags the advisor's keyword heuristics are tuned for.

use advisor_core::{ProductId, ProductRecord, StrainType, Terpene};

use crate::Catalog;

/// The demo dispensary catalog.
pub fn sample_catalog() -> Catalog {
    Catalog::new(vec![
        ProductRecord {
            id: ProductId(1),
            name: "Northern Lights".to_string(),
            category: "Blüten".to_string(),
            strain: StrainType::Indica,
            price: 9.5,
            thc: "18%".to_string(),
            cbd: "0,4%".to_string(),
            effects: vec![
                "Entspannung".to_string(),
                "Schlaf".to_string(),
                "Schmerzlinderung".to_string(),
            ],
            benefits: vec![
                "Lindert chronische Schmerzen".to_string(),
                "Hilft bei Schlafstörungen".to_string(),
            ],
            terpenes: vec![Terpene::new("Myrcen", 0.8), Terpene::new("Caryophyllen", 0.3)],
            flavors: vec!["Erdig".to_string(), "Süß".to_string()],
            images: vec!["/images/products/northern-lights.jpg".to_string()],
        },
        ProductRecord {
            id: ProductId(2),
            name: "Sour Diesel".to_string(),
            category: "Blüten".to_string(),
            strain: StrainType::Sativa,
            price: 11.0,
            thc: "20%".to_string(),
            cbd: "0,2%".to_string(),
            effects: vec![
                "Energie".to_string(),
                "Fokus".to_string(),
                "Kreativität".to_string(),
            ],
            benefits: vec![
                "Steigert die Konzentration".to_string(),
                "Hilft bei Müdigkeit".to_string(),
            ],
            terpenes: vec![Terpene::new("Limonen", 0.6), Terpene::new("Pinen", 0.2)],
            flavors: vec!["Zitrus".to_string(), "Diesel".to_string()],
            images: vec!["/images/products/sour-diesel.jpg".to_string()],
        },
        ProductRecord {
            id: ProductId(3),
            name: "ACDC".to_string(),
            category: "Blüten".to_string(),
            strain: StrainType::Hybrid,
            price: 8.0,
            thc: "1%".to_string(),
            cbd: "14%".to_string(),
            effects: vec!["Beruhigung".to_string(), "Klarheit".to_string()],
            benefits: vec![
                "Lindert Angst und Stress".to_string(),
                "Entzündungshemmend".to_string(),
            ],
            terpenes: vec![Terpene::new("Myrcen", 0.4)],
            flavors: vec!["Kräuter".to_string()],
            images: vec!["/images/products/acdc.jpg".to_string()],
        },
        ProductRecord {
            id: ProductId(4),
            name: "OG Kush".to_string(),
            category: "Blüten".to_string(),
            strain: StrainType::Hybrid,
            price: 12.0,
            thc: "22%".to_string(),
            cbd: "0,3%".to_string(),
            effects: vec!["Entspannung".to_string(), "Euphorie".to_string()],
            benefits: vec![
                "Stressabbau".to_string(),
                "Appetitanregend".to_string(),
            ],
            terpenes: vec![Terpene::new("Caryophyllen", 0.5), Terpene::new("Linalool", 0.2)],
            flavors: vec!["Kiefer".to_string(), "Erdig".to_string()],
            images: vec!["/images/products/og-kush.jpg".to_string()],
        },
        ProductRecord {
            id: ProductId(5),
            name: "Blue Dream".to_string(),
            category: "Blüten".to_string(),
            strain: StrainType::Hybrid,
            price: 10.5,
            thc: "17%".to_string(),
            cbd: "1%".to_string(),
            effects: vec!["Gelassenheit".to_string(), "Kreativität".to_string()],
            benefits: vec![
                "Mildert Schmerzen und Verspannungen".to_string(),
                "Stimmungsaufhellend".to_string(),
            ],
            terpenes: vec![Terpene::new("Myrcen", 0.7), Terpene::new("Pinen", 0.3)],
            flavors: vec!["Beere".to_string(), "Süß".to_string()],
            images: vec!["/images/products/blue-dream.jpg".to_string()],
        },
        ProductRecord {
            id: ProductId(6),
            name: "Granddaddy Purple".to_string(),
            category: "Blüten".to_string(),
            strain: StrainType::Indica,
            price: 10.0,
            thc: "19%".to_string(),
            cbd: "0,3%".to_string(),
            effects: vec!["Schlaf".to_string(), "Tiefenentspannung".to_string()],
            benefits: vec![
                "Bei Schlaflosigkeit".to_string(),
                "Appetitanregend".to_string(),
            ],
            terpenes: vec![Terpene::new("Linalool", 0.4), Terpene::new("Myrcen", 0.6)],
            flavors: vec!["Traube".to_string()],
            images: vec!["/images/products/granddaddy-purple.jpg".to_string()],
        },
        ProductRecord {
            id: ProductId(7),
            name: "Jack Herer".to_string(),
            category: "Blüten".to_string(),
            strain: StrainType::Sativa,
            price: 11.5,
            thc: "18%".to_string(),
            cbd: "0,5%".to_string(),
            effects: vec!["Fokus".to_string(), "Energie".to_string()],
            benefits: vec![
                "Fördert Kreativität und Konzentration".to_string(),
            ],
            terpenes: vec![Terpene::new("Terpinolen", 0.5)],
            flavors: vec!["Würzig".to_string(), "Kiefer".to_string()],
            images: vec!["/images/products/jack-herer.jpg".to_string()],
        },
        ProductRecord {
            id: ProductId(8),
            name: "Harlequin".to_string(),
            category: "Blüten".to_string(),
            strain: StrainType::Sativa,
            price: 9.0,
            thc: "5%".to_string(),
            cbd: "9%".to_string(),
            effects: vec!["Beruhigung".to_string(), "Schmerzlinderung".to_string()],
            benefits: vec![
                "Lindert Angst".to_string(),
                "Bei chronischen Schmerzen".to_string(),
            ],
            terpenes: vec![Terpene::new("Myrcen", 0.5), Terpene::new("Pinen", 0.4)],
            flavors: vec!["Mango".to_string(), "Erdig".to_string()],
            images: vec!["/images/products/harlequin.jpg".to_string()],
        },
    ])
}
