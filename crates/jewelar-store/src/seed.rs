//! Built-in demo catalog.
//!
//! Eight pieces across every category. Five of them can be tried on.

use async_trait::async_trait;
use chrono::DateTime;
use jewelar_core::types::{PositioningData, Product, ProductCategory, ProductMaterial, TryOnZone};

use crate::catalog::ProductSource;
use crate::error::StoreResult;

/// 2023-01-01T00:00:00Z
const CATALOG_EPOCH: i64 = 1_672_531_200;

const PEXELS: &str = "https://images.pexels.com/photos";

struct Seed {
    id: u32,
    name: &'static str,
    description: &'static str,
    price: i64,
    category: ProductCategory,
    material: ProductMaterial,
    size: &'static str,
    stock: i64,
    photos: [u32; 2],
    model: &'static str,
    zone: Option<TryOnZone>,
    scale: f64,
}

const SEEDS: [Seed; 8] = [
    Seed {
        id: 1,
        name: "Diamond Stud Earrings",
        description: "Classic diamond stud earrings with a total of 1 carat weight. Perfect for everyday elegance.",
        price: 15000,
        category: ProductCategory::Earrings,
        material: ProductMaterial::Gold,
        size: "5mm",
        stock: 10,
        photos: [10909386, 11638635],
        model: "diamond-studs",
        zone: Some(TryOnZone::Ears),
        scale: 1.0,
    },
    Seed {
        id: 2,
        name: "Sapphire Pendant Necklace",
        description: "Elegant sapphire pendant necklace set in 18k white gold with diamond accents.",
        price: 22000,
        category: ProductCategory::Necklaces,
        material: ProductMaterial::WhiteGold,
        size: "18 inches",
        stock: 5,
        photos: [12114719, 10971177],
        model: "sapphire-necklace",
        zone: Some(TryOnZone::Neck),
        scale: 1.2,
    },
    Seed {
        id: 3,
        name: "Emerald Cut Engagement Ring",
        description: "Stunning emerald cut diamond ring with a platinum band and pavé setting.",
        price: 35000,
        category: ProductCategory::Rings,
        material: ProductMaterial::Platinum,
        size: "6",
        stock: 3,
        photos: [5442447, 10954429],
        model: "emerald-ring",
        zone: None,
        scale: 1.0,
    },
    Seed {
        id: 4,
        name: "Pearl Drop Earrings",
        description: "Elegant freshwater pearl drop earrings with 14k gold detailing.",
        price: 12000,
        category: ProductCategory::Earrings,
        material: ProductMaterial::Gold,
        size: "8mm pearls",
        stock: 8,
        photos: [10971171, 10971167],
        model: "pearl-earrings",
        zone: Some(TryOnZone::Ears),
        scale: 1.1,
    },
    Seed {
        id: 5,
        name: "Gold Bangle Bracelet",
        description: "Classic 18k gold bangle bracelet with a modern twist design.",
        price: 18000,
        category: ProductCategory::Bracelets,
        material: ProductMaterial::Gold,
        size: "Medium",
        stock: 6,
        photos: [10971174, 12114720],
        model: "gold-bangle",
        zone: None,
        scale: 1.0,
    },
    Seed {
        id: 6,
        name: "Ruby Statement Necklace",
        description: "Luxurious ruby statement necklace with diamond accents in 18k rose gold setting.",
        price: 45000,
        category: ProductCategory::Necklaces,
        material: ProductMaterial::RoseGold,
        size: "16 inches",
        stock: 2,
        photos: [8100784, 12114719],
        model: "ruby-necklace",
        zone: Some(TryOnZone::Neck),
        scale: 1.3,
    },
    Seed {
        id: 7,
        name: "Diamond Tennis Bracelet",
        description: "Classic diamond tennis bracelet with 5 carats of round brilliant diamonds.",
        price: 28000,
        category: ProductCategory::Bracelets,
        material: ProductMaterial::WhiteGold,
        size: "7 inches",
        stock: 4,
        photos: [11025044, 10970936],
        model: "tennis-bracelet",
        zone: None,
        scale: 1.0,
    },
    Seed {
        id: 8,
        name: "Diamond Nose Stud",
        description: "Delicate diamond nose stud in 14k yellow gold with a 0.1 carat diamond.",
        price: 5000,
        category: ProductCategory::NoseRings,
        material: ProductMaterial::Gold,
        size: "2mm",
        stock: 15,
        photos: [10971158, 10971166],
        model: "nose-stud",
        zone: Some(TryOnZone::Nose),
        scale: 0.8,
    },
];

impl Seed {
    fn to_product(&self) -> Product {
        let created_at =
            DateTime::from_timestamp(CATALOG_EPOCH + (self.id as i64 - 1) * 86_400, 0)
                .unwrap_or_default();

        Product {
            id: self.id.to_string(),
            name: self.name.to_string(),
            description: self.description.to_string(),
            price_paise: self.price,
            category: self.category,
            material: self.material,
            size: self.size.to_string(),
            stock_quantity: self.stock,
            image_urls: self
                .photos
                .iter()
                .map(|p| format!("{}/{}/pexels-photo-{}.jpeg", PEXELS, p, p))
                .collect(),
            model_3d_url: format!("/models/{}.glb", self.model),
            try_on_enabled: self.zone.is_some(),
            try_on_zone: self.zone,
            model_scale: self.scale,
            positioning_data: self.zone.map(|_| PositioningData::default()),
            created_at,
        }
    }
}

/// The demo catalog, in display order.
pub fn demo_products() -> Vec<Product> {
    SEEDS.iter().map(Seed::to_product).collect()
}

/// [`ProductSource`] backed by [`demo_products`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SeedCatalog;

#[async_trait]
impl ProductSource for SeedCatalog {
    async fn fetch_products(&self) -> StoreResult<Vec<Product>> {
        Ok(demo_products())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_demo_catalog_shape() {
        let products = demo_products();
        assert_eq!(products.len(), 8);
        assert_eq!(products.iter().filter(|p| p.supports_try_on()).count(), 5);

        for category in ProductCategory::ALL {
            assert!(products.iter().any(|p| p.category == category));
        }
    }

    #[test]
    fn test_seed_fields() {
        let products = demo_products();
        let ring = &products[2];
        assert_eq!(ring.name, "Emerald Cut Engagement Ring");
        assert!(!ring.try_on_enabled);
        assert!(ring.positioning_data.is_none());
        assert_eq!(ring.model_3d_url, "/models/emerald-ring.glb");

        let stud = &products[7];
        assert_eq!(stud.price().paise(), 5000);
        assert_eq!(stud.try_on_zone, Some(TryOnZone::Nose));
        assert_eq!(
            stud.primary_image(),
            Some("https://images.pexels.com/photos/10971158/pexels-photo-10971158.jpeg")
        );
        assert_eq!(stud.created_at.day(), 8);
        assert_eq!(stud.created_at.year(), 2023);
    }
}
