//! Demo catalogue used by the `seed` command.

use std::sync::Arc;

use tracing::info;

use crate::application::repos::{
    CreateProductParams, ProductsRepo, RepoError, SliderParams, SlidersRepo,
};
use crate::domain::entities::ColorVariant;
use crate::domain::pricing;

const SAMPLE_IMAGE: &str = "https://images.unsplash.com/photo-1596755094514-f87e34085b2c?auto=format&fit=crop&w=1600&q=80";
const SAMPLE_REGULAR_PRICE: i64 = 3200;
const SAMPLE_OFFER_PRICE: i64 = 2499;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub product_created: bool,
    pub slider_created: bool,
}

#[derive(Clone)]
pub struct DemoCatalogSeeder {
    products: Arc<dyn ProductsRepo>,
    sliders: Arc<dyn SlidersRepo>,
}

impl DemoCatalogSeeder {
    pub fn new(products: Arc<dyn ProductsRepo>, sliders: Arc<dyn SlidersRepo>) -> Self {
        Self { products, sliders }
    }

    /// Inserts one sample product and one slide, each only when its collection is empty.
    pub async fn seed(&self) -> Result<SeedReport, RepoError> {
        let mut report = SeedReport::default();

        if self.products.count_products().await? == 0 {
            let product = self.products.create_product(sample_product()).await?;
            info!(
                target = "storefront::seed",
                product_id = %product.id,
                "Sample product created"
            );
            report.product_created = true;
        }

        if self.sliders.count_sliders().await? == 0 {
            let slider = self.sliders.create_slider(sample_slider()).await?;
            info!(
                target = "storefront::seed",
                slider_id = %slider.id,
                "Sample slider created"
            );
            report.slider_created = true;
        }

        Ok(report)
    }
}

fn sample_product() -> CreateProductParams {
    CreateProductParams {
        name: "রয়েল সিল্ক পাঞ্জাবি".to_string(),
        description: "উচ্চমানের সিল্ক কাপড়ে তৈরি, হাতে তৈরি এমব্রয়ডারি, ফিটিং ডিজাইন".to_string(),
        size: "S, M, L, XL, XXL".to_string(),
        regular_price: SAMPLE_REGULAR_PRICE,
        offer_price: SAMPLE_OFFER_PRICE,
        offer_percentage: pricing::offer_percentage(SAMPLE_REGULAR_PRICE, SAMPLE_OFFER_PRICE)
            .unwrap_or(0),
        colors: vec![ColorVariant {
            name: "লাল ও সোনালী".to_string(),
            code: "#dc2626".to_string(),
            image: SAMPLE_IMAGE.to_string(),
            is_local_image: false,
        }],
        is_active: true,
    }
}

fn sample_slider() -> SliderParams {
    SliderParams {
        slide_number: 1,
        title: "রয়েল সিল্ক".to_string(),
        subtitle: "পাঞ্জাবি".to_string(),
        description: "হাতে তৈরি এমব্রয়ডারি, উচ্চমানের সিল্ক কাপড়, রাজকীয় অভিজ্ঞতা".to_string(),
        image_url: SAMPLE_IMAGE.to_string(),
        is_local_image: false,
        badge_text: Some("প্রিমিয়াম কালেকশন".to_string()),
        badge_color: Some("red".to_string()),
        price: Some(SAMPLE_OFFER_PRICE),
        original_price: Some(SAMPLE_REGULAR_PRICE),
        is_active: true,
    }
}
