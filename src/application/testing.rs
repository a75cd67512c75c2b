//! In-memory adapters shared by service tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::images::{ObjectStore, ObjectStoreError};
use crate::application::notify::{Notification, Notifier, NotifyError};
use crate::application::pagination::PageRequest;
use crate::application::repos::{
    AdminsRepo, CreateAdminParams, CreateOrderParams, CreateProductParams, CreateReviewParams,
    ORDER_ID_CONSTRAINT, OrdersRepo, ProductsRepo, RepoError, ReviewsRepo, SettingsRepo,
    SliderParams, SlidersRepo, StoreHealth, UpdateOrderStatusParams, UpdateProductParams,
};
use crate::domain::entities::{
    AdminRecord, OrderRecord, ProductRecord, ReviewRecord, SiteSettingsRecord, SliderRecord,
};
use crate::domain::types::OrderStatus;

pub(crate) const PNG_1X1: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE,
    0x42, 0x60, 0x82,
];

/// Insertion-ordered tables; "newest first" means reverse insertion order.
#[derive(Default)]
pub(crate) struct MemoryRepositories {
    products: Mutex<Vec<ProductRecord>>,
    orders: Mutex<Vec<OrderRecord>>,
    reviews: Mutex<Vec<ReviewRecord>>,
    sliders: Mutex<Vec<SliderRecord>>,
    settings: Mutex<Option<SiteSettingsRecord>>,
    admins: Mutex<Vec<AdminRecord>>,
}

fn count(len: usize) -> u64 {
    u64::try_from(len).expect("count fits")
}

#[async_trait]
impl ProductsRepo for MemoryRepositories {
    async fn list_products(&self, active_only: bool) -> Result<Vec<ProductRecord>, RepoError> {
        let products = self.products.lock().expect("products lock");
        Ok(products
            .iter()
            .rev()
            .filter(|product| !active_only || product.is_active)
            .cloned()
            .collect())
    }

    async fn find_product(&self, id: Uuid) -> Result<Option<ProductRecord>, RepoError> {
        let products = self.products.lock().expect("products lock");
        Ok(products.iter().find(|product| product.id == id).cloned())
    }

    async fn create_product(
        &self,
        params: CreateProductParams,
    ) -> Result<ProductRecord, RepoError> {
        let record = ProductRecord {
            id: Uuid::new_v4(),
            name: params.name,
            description: params.description,
            size: params.size,
            regular_price: params.regular_price,
            offer_price: params.offer_price,
            offer_percentage: params.offer_percentage,
            colors: params.colors,
            is_active: params.is_active,
            created_at: OffsetDateTime::now_utc(),
        };
        self.products
            .lock()
            .expect("products lock")
            .push(record.clone());
        Ok(record)
    }

    async fn update_product(
        &self,
        params: UpdateProductParams,
    ) -> Result<ProductRecord, RepoError> {
        let mut products = self.products.lock().expect("products lock");
        let product = products
            .iter_mut()
            .find(|product| product.id == params.id)
            .ok_or(RepoError::NotFound)?;
        product.name = params.name;
        product.description = params.description;
        product.size = params.size;
        product.regular_price = params.regular_price;
        product.offer_price = params.offer_price;
        product.offer_percentage = params.offer_percentage;
        product.colors = params.colors;
        product.is_active = params.is_active;
        Ok(product.clone())
    }

    async fn delete_product(&self, id: Uuid) -> Result<(), RepoError> {
        let mut products = self.products.lock().expect("products lock");
        let before = products.len();
        products.retain(|product| product.id != id);
        if products.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn count_products(&self) -> Result<u64, RepoError> {
        Ok(count(self.products.lock().expect("products lock").len()))
    }

    async fn product_names(&self, ids: &[Uuid]) -> Result<Vec<(Uuid, String)>, RepoError> {
        let products = self.products.lock().expect("products lock");
        Ok(products
            .iter()
            .filter(|product| ids.contains(&product.id))
            .map(|product| (product.id, product.name.clone()))
            .collect())
    }
}

#[async_trait]
impl OrdersRepo for MemoryRepositories {
    async fn create_order(&self, params: CreateOrderParams) -> Result<OrderRecord, RepoError> {
        let mut orders = self.orders.lock().expect("orders lock");
        if orders.iter().any(|order| order.order_id == params.order_id) {
            return Err(RepoError::Duplicate {
                constraint: ORDER_ID_CONSTRAINT.to_string(),
            });
        }
        let now = OffsetDateTime::now_utc();
        let record = OrderRecord {
            id: Uuid::new_v4(),
            order_id: params.order_id,
            customer_name: params.customer_name,
            phone: params.phone,
            address: params.address,
            product_id: params.product_id,
            product_name: params.product_name,
            color: params.color,
            size: params.size,
            quantity: params.quantity,
            total_price: params.total_price,
            delivery_charge: params.delivery_charge,
            payment_method: params.payment_method,
            status: OrderStatus::Pending,
            notes: params.notes,
            is_read: false,
            created_at: now,
            updated_at: now,
        };
        orders.push(record.clone());
        Ok(record)
    }

    async fn find_order(&self, id: Uuid) -> Result<Option<OrderRecord>, RepoError> {
        let orders = self.orders.lock().expect("orders lock");
        Ok(orders.iter().find(|order| order.id == id).cloned())
    }

    async fn list_orders(
        &self,
        status: Option<OrderStatus>,
        page: PageRequest,
    ) -> Result<Vec<OrderRecord>, RepoError> {
        let orders = self.orders.lock().expect("orders lock");
        Ok(orders
            .iter()
            .rev()
            .filter(|order| status.is_none_or(|status| order.status == status))
            .skip(usize::try_from(page.offset()).expect("offset fits"))
            .take(page.limit as usize)
            .cloned()
            .collect())
    }

    async fn count_orders(&self, status: Option<OrderStatus>) -> Result<u64, RepoError> {
        let orders = self.orders.lock().expect("orders lock");
        Ok(count(
            orders
                .iter()
                .filter(|order| status.is_none_or(|status| order.status == status))
                .count(),
        ))
    }

    async fn sum_total_price(&self, status: OrderStatus) -> Result<i64, RepoError> {
        let orders = self.orders.lock().expect("orders lock");
        Ok(orders
            .iter()
            .filter(|order| order.status == status)
            .map(|order| order.total_price)
            .sum())
    }

    async fn recent_orders(&self, limit: u32) -> Result<Vec<OrderRecord>, RepoError> {
        let orders = self.orders.lock().expect("orders lock");
        Ok(orders.iter().rev().take(limit as usize).cloned().collect())
    }

    async fn update_order_status(
        &self,
        params: UpdateOrderStatusParams,
    ) -> Result<OrderRecord, RepoError> {
        let mut orders = self.orders.lock().expect("orders lock");
        let order = orders
            .iter_mut()
            .find(|order| order.id == params.id)
            .ok_or(RepoError::NotFound)?;
        order.status = params.status;
        order.notes = params.notes;
        order.updated_at = params.updated_at;
        Ok(order.clone())
    }

    async fn list_unread_orders(&self) -> Result<Vec<OrderRecord>, RepoError> {
        let orders = self.orders.lock().expect("orders lock");
        Ok(orders
            .iter()
            .rev()
            .filter(|order| !order.is_read)
            .cloned()
            .collect())
    }

    async fn count_unread_orders(&self) -> Result<u64, RepoError> {
        let orders = self.orders.lock().expect("orders lock");
        Ok(count(orders.iter().filter(|order| !order.is_read).count()))
    }

    async fn mark_order_read(&self, id: Uuid) -> Result<(), RepoError> {
        let mut orders = self.orders.lock().expect("orders lock");
        let order = orders
            .iter_mut()
            .find(|order| order.id == id)
            .ok_or(RepoError::NotFound)?;
        order.is_read = true;
        Ok(())
    }

    async fn mark_all_orders_read(&self) -> Result<u64, RepoError> {
        let mut orders = self.orders.lock().expect("orders lock");
        let mut flipped = 0;
        for order in orders.iter_mut().filter(|order| !order.is_read) {
            order.is_read = true;
            flipped += 1;
        }
        Ok(flipped)
    }
}

#[async_trait]
impl ReviewsRepo for MemoryRepositories {
    async fn create_review(&self, params: CreateReviewParams) -> Result<ReviewRecord, RepoError> {
        let record = ReviewRecord {
            id: Uuid::new_v4(),
            name: params.name,
            location: params.location,
            text: params.text,
            rating: params.rating,
            is_approved: params.is_approved,
            is_read: false,
            created_at: OffsetDateTime::now_utc(),
        };
        self.reviews
            .lock()
            .expect("reviews lock")
            .push(record.clone());
        Ok(record)
    }

    async fn list_reviews(
        &self,
        approved: Option<bool>,
        limit: Option<u32>,
    ) -> Result<Vec<ReviewRecord>, RepoError> {
        let reviews = self.reviews.lock().expect("reviews lock");
        Ok(reviews
            .iter()
            .rev()
            .filter(|review| approved.is_none_or(|approved| review.is_approved == approved))
            .take(limit.map_or(usize::MAX, |limit| limit as usize))
            .cloned()
            .collect())
    }

    async fn approve_review(&self, id: Uuid) -> Result<ReviewRecord, RepoError> {
        let mut reviews = self.reviews.lock().expect("reviews lock");
        let review = reviews
            .iter_mut()
            .find(|review| review.id == id)
            .ok_or(RepoError::NotFound)?;
        review.is_approved = true;
        Ok(review.clone())
    }

    async fn delete_review(&self, id: Uuid) -> Result<(), RepoError> {
        let mut reviews = self.reviews.lock().expect("reviews lock");
        let before = reviews.len();
        reviews.retain(|review| review.id != id);
        if reviews.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn count_reviews(&self, approved: Option<bool>) -> Result<u64, RepoError> {
        let reviews = self.reviews.lock().expect("reviews lock");
        Ok(count(
            reviews
                .iter()
                .filter(|review| approved.is_none_or(|approved| review.is_approved == approved))
                .count(),
        ))
    }

    async fn list_unread_reviews(&self) -> Result<Vec<ReviewRecord>, RepoError> {
        let reviews = self.reviews.lock().expect("reviews lock");
        Ok(reviews
            .iter()
            .rev()
            .filter(|review| !review.is_read)
            .cloned()
            .collect())
    }

    async fn count_unread_reviews(&self) -> Result<u64, RepoError> {
        let reviews = self.reviews.lock().expect("reviews lock");
        Ok(count(reviews.iter().filter(|review| !review.is_read).count()))
    }

    async fn mark_review_read(&self, id: Uuid) -> Result<(), RepoError> {
        let mut reviews = self.reviews.lock().expect("reviews lock");
        let review = reviews
            .iter_mut()
            .find(|review| review.id == id)
            .ok_or(RepoError::NotFound)?;
        review.is_read = true;
        Ok(())
    }

    async fn mark_all_reviews_read(&self) -> Result<u64, RepoError> {
        let mut reviews = self.reviews.lock().expect("reviews lock");
        let mut flipped = 0;
        for review in reviews.iter_mut().filter(|review| !review.is_read) {
            review.is_read = true;
            flipped += 1;
        }
        Ok(flipped)
    }
}

fn apply_slider(record: &mut SliderRecord, params: SliderParams) {
    record.slide_number = params.slide_number;
    record.title = params.title;
    record.subtitle = params.subtitle;
    record.description = params.description;
    record.image_url = params.image_url;
    record.is_local_image = params.is_local_image;
    record.badge_text = params.badge_text;
    record.badge_color = params.badge_color;
    record.price = params.price;
    record.original_price = params.original_price;
    record.is_active = params.is_active;
}

#[async_trait]
impl SlidersRepo for MemoryRepositories {
    async fn list_sliders(&self, active_only: bool) -> Result<Vec<SliderRecord>, RepoError> {
        let sliders = self.sliders.lock().expect("sliders lock");
        let mut listed: Vec<SliderRecord> = sliders
            .iter()
            .filter(|slider| !active_only || slider.is_active)
            .cloned()
            .collect();
        listed.sort_by_key(|slider| slider.slide_number);
        Ok(listed)
    }

    async fn find_slider(&self, id: Uuid) -> Result<Option<SliderRecord>, RepoError> {
        let sliders = self.sliders.lock().expect("sliders lock");
        Ok(sliders.iter().find(|slider| slider.id == id).cloned())
    }

    async fn create_slider(&self, params: SliderParams) -> Result<SliderRecord, RepoError> {
        let mut record = SliderRecord {
            id: Uuid::new_v4(),
            slide_number: 0,
            title: String::new(),
            subtitle: String::new(),
            description: String::new(),
            image_url: String::new(),
            is_local_image: false,
            badge_text: None,
            badge_color: None,
            price: None,
            original_price: None,
            is_active: false,
            created_at: OffsetDateTime::now_utc(),
        };
        apply_slider(&mut record, params);
        self.sliders
            .lock()
            .expect("sliders lock")
            .push(record.clone());
        Ok(record)
    }

    async fn update_slider(
        &self,
        id: Uuid,
        params: SliderParams,
    ) -> Result<SliderRecord, RepoError> {
        let mut sliders = self.sliders.lock().expect("sliders lock");
        let slider = sliders
            .iter_mut()
            .find(|slider| slider.id == id)
            .ok_or(RepoError::NotFound)?;
        apply_slider(slider, params);
        Ok(slider.clone())
    }

    async fn delete_slider(&self, id: Uuid) -> Result<(), RepoError> {
        let mut sliders = self.sliders.lock().expect("sliders lock");
        let before = sliders.len();
        sliders.retain(|slider| slider.id != id);
        if sliders.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn count_sliders(&self) -> Result<u64, RepoError> {
        Ok(count(self.sliders.lock().expect("sliders lock").len()))
    }
}

#[async_trait]
impl SettingsRepo for MemoryRepositories {
    async fn load_site_settings(&self) -> Result<Option<SiteSettingsRecord>, RepoError> {
        Ok(self.settings.lock().expect("settings lock").clone())
    }

    async fn ensure_site_settings(
        &self,
        defaults: SiteSettingsRecord,
    ) -> Result<SiteSettingsRecord, RepoError> {
        let mut settings = self.settings.lock().expect("settings lock");
        Ok(settings.get_or_insert(defaults).clone())
    }

    async fn upsert_site_settings(
        &self,
        record: SiteSettingsRecord,
    ) -> Result<SiteSettingsRecord, RepoError> {
        *self.settings.lock().expect("settings lock") = Some(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl AdminsRepo for MemoryRepositories {
    async fn find_admin(&self, username: &str) -> Result<Option<AdminRecord>, RepoError> {
        let admins = self.admins.lock().expect("admins lock");
        Ok(admins
            .iter()
            .find(|admin| admin.username == username)
            .cloned())
    }

    async fn count_admins(&self) -> Result<u64, RepoError> {
        Ok(count(self.admins.lock().expect("admins lock").len()))
    }

    async fn create_admin(&self, params: CreateAdminParams) -> Result<AdminRecord, RepoError> {
        let mut admins = self.admins.lock().expect("admins lock");
        if admins.iter().any(|admin| admin.username == params.username) {
            return Err(RepoError::Duplicate {
                constraint: "admins_username_key".to_string(),
            });
        }
        let record = AdminRecord {
            id: Uuid::new_v4(),
            username: params.username,
            password_hash: params.password_hash,
            last_login: None,
            created_at: OffsetDateTime::now_utc(),
        };
        admins.push(record.clone());
        Ok(record)
    }

    async fn record_login(&self, id: Uuid, at: OffsetDateTime) -> Result<(), RepoError> {
        let mut admins = self.admins.lock().expect("admins lock");
        let admin = admins
            .iter_mut()
            .find(|admin| admin.id == id)
            .ok_or(RepoError::NotFound)?;
        admin.last_login = Some(at);
        Ok(())
    }
}

#[async_trait]
impl StoreHealth for MemoryRepositories {
    async fn ping(&self) -> Result<(), RepoError> {
        Ok(())
    }
}

/// Orders store whose every call fails.
pub(crate) struct FailingOrdersRepo;

fn unavailable<T>() -> Result<T, RepoError> {
    Err(RepoError::Persistence("store unavailable".to_string()))
}

#[async_trait]
impl OrdersRepo for FailingOrdersRepo {
    async fn create_order(&self, _params: CreateOrderParams) -> Result<OrderRecord, RepoError> {
        unavailable()
    }

    async fn find_order(&self, _id: Uuid) -> Result<Option<OrderRecord>, RepoError> {
        unavailable()
    }

    async fn list_orders(
        &self,
        _status: Option<OrderStatus>,
        _page: PageRequest,
    ) -> Result<Vec<OrderRecord>, RepoError> {
        unavailable()
    }

    async fn count_orders(&self, _status: Option<OrderStatus>) -> Result<u64, RepoError> {
        unavailable()
    }

    async fn sum_total_price(&self, _status: OrderStatus) -> Result<i64, RepoError> {
        unavailable()
    }

    async fn recent_orders(&self, _limit: u32) -> Result<Vec<OrderRecord>, RepoError> {
        unavailable()
    }

    async fn update_order_status(
        &self,
        _params: UpdateOrderStatusParams,
    ) -> Result<OrderRecord, RepoError> {
        unavailable()
    }

    async fn list_unread_orders(&self) -> Result<Vec<OrderRecord>, RepoError> {
        unavailable()
    }

    async fn count_unread_orders(&self) -> Result<u64, RepoError> {
        unavailable()
    }

    async fn mark_order_read(&self, _id: Uuid) -> Result<(), RepoError> {
        unavailable()
    }

    async fn mark_all_orders_read(&self) -> Result<u64, RepoError> {
        unavailable()
    }
}

#[async_trait]
impl StoreHealth for FailingOrdersRepo {
    async fn ping(&self) -> Result<(), RepoError> {
        unavailable()
    }
}

/// Product and slider store that reads as empty and rejects every write.
pub(crate) struct RejectingCatalogRepo;

#[async_trait]
impl ProductsRepo for RejectingCatalogRepo {
    async fn list_products(&self, _active_only: bool) -> Result<Vec<ProductRecord>, RepoError> {
        Ok(Vec::new())
    }

    async fn find_product(&self, _id: Uuid) -> Result<Option<ProductRecord>, RepoError> {
        Ok(None)
    }

    async fn create_product(
        &self,
        _params: CreateProductParams,
    ) -> Result<ProductRecord, RepoError> {
        unavailable()
    }

    async fn update_product(
        &self,
        _params: UpdateProductParams,
    ) -> Result<ProductRecord, RepoError> {
        unavailable()
    }

    async fn delete_product(&self, _id: Uuid) -> Result<(), RepoError> {
        unavailable()
    }

    async fn count_products(&self) -> Result<u64, RepoError> {
        Ok(0)
    }

    async fn product_names(&self, _ids: &[Uuid]) -> Result<Vec<(Uuid, String)>, RepoError> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl SlidersRepo for RejectingCatalogRepo {
    async fn list_sliders(&self, _active_only: bool) -> Result<Vec<SliderRecord>, RepoError> {
        Ok(Vec::new())
    }

    async fn find_slider(&self, _id: Uuid) -> Result<Option<SliderRecord>, RepoError> {
        Ok(None)
    }

    async fn create_slider(&self, _params: SliderParams) -> Result<SliderRecord, RepoError> {
        unavailable()
    }

    async fn update_slider(
        &self,
        _id: Uuid,
        _params: SliderParams,
    ) -> Result<SliderRecord, RepoError> {
        unavailable()
    }

    async fn delete_slider(&self, _id: Uuid) -> Result<(), RepoError> {
        unavailable()
    }

    async fn count_sliders(&self) -> Result<u64, RepoError> {
        Ok(0)
    }
}

#[derive(Default)]
pub(crate) struct MemoryObjectStore {
    objects: Mutex<HashMap<String, Bytes>>,
}

impl MemoryObjectStore {
    pub(crate) fn len(&self) -> usize {
        self.objects.lock().expect("store lock").len()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, key: &str, data: Bytes) -> Result<(), ObjectStoreError> {
        self.objects
            .lock()
            .expect("store lock")
            .insert(key.to_string(), data);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes, ObjectStoreError> {
        self.objects
            .lock()
            .expect("store lock")
            .get(key)
            .cloned()
            .ok_or(ObjectStoreError::NotFound)
    }

    async fn delete(&self, key: &str) -> Result<(), ObjectStoreError> {
        self.objects.lock().expect("store lock").remove(key);
        Ok(())
    }
}

/// Captures sent notifications; `failing()` records nothing and returns an error.
#[derive(Default)]
pub(crate) struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
    fail: bool,
}

impl RecordingNotifier {
    pub(crate) fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Waits for at least `expected` notifications from the spawned dispatch tasks.
    pub(crate) async fn wait_for(&self, expected: usize) -> Vec<Notification> {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        loop {
            let sent = self.sent.lock().expect("sent lock").clone();
            if sent.len() >= expected || tokio::time::Instant::now() >= deadline {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::Transport("relay unreachable".to_string()));
        }
        self.sent
            .lock()
            .expect("sent lock")
            .push(notification.clone());
        Ok(())
    }
}
