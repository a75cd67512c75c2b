use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::application::repos::{OrdersRepo, ProductsRepo, RepoError, ReviewsRepo};
use crate::domain::entities::OrderRecord;
use crate::domain::types::OrderStatus;

pub const RECENT_ORDERS_LIMIT: u32 = 5;

#[derive(Debug, Error)]
#[error("failed to compute dashboard metric `{metric}`")]
pub struct DashboardError {
    pub metric: &'static str,
    #[source]
    pub source: RepoError,
}

fn repo_failure(metric: &'static str) -> impl FnOnce(RepoError) -> DashboardError {
    move |source| DashboardError { metric, source }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentOrder {
    #[serde(flatten)]
    pub order: OrderRecord,
    /// Current catalogue name when the referenced product still exists.
    pub current_product_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_orders: u64,
    pub pending_orders: u64,
    pub delivered_orders: u64,
    pub total_revenue: i64,
    pub total_products: u64,
    pub total_reviews: u64,
    pub pending_reviews: u64,
    pub unread_orders: u64,
    pub unread_reviews: u64,
    pub recent_orders: Vec<RecentOrder>,
}

#[derive(Clone)]
pub struct DashboardService {
    orders: Arc<dyn OrdersRepo>,
    products: Arc<dyn ProductsRepo>,
    reviews: Arc<dyn ReviewsRepo>,
}

impl DashboardService {
    pub fn new(
        orders: Arc<dyn OrdersRepo>,
        products: Arc<dyn ProductsRepo>,
        reviews: Arc<dyn ReviewsRepo>,
    ) -> Self {
        Self {
            orders,
            products,
            reviews,
        }
    }

    pub async fn stats(&self) -> Result<DashboardStats, DashboardError> {
        let (
            total_orders,
            pending_orders,
            delivered_orders,
            total_revenue,
            total_products,
            total_reviews,
            pending_reviews,
            unread_orders,
            unread_reviews,
            recent,
        ) = tokio::try_join!(
            async {
                self.orders
                    .count_orders(None)
                    .await
                    .map_err(repo_failure("totalOrders"))
            },
            async {
                self.orders
                    .count_orders(Some(OrderStatus::Pending))
                    .await
                    .map_err(repo_failure("pendingOrders"))
            },
            async {
                self.orders
                    .count_orders(Some(OrderStatus::Delivered))
                    .await
                    .map_err(repo_failure("deliveredOrders"))
            },
            async {
                self.orders
                    .sum_total_price(OrderStatus::Delivered)
                    .await
                    .map_err(repo_failure("totalRevenue"))
            },
            async {
                self.products
                    .count_products()
                    .await
                    .map_err(repo_failure("totalProducts"))
            },
            async {
                self.reviews
                    .count_reviews(None)
                    .await
                    .map_err(repo_failure("totalReviews"))
            },
            async {
                self.reviews
                    .count_reviews(Some(false))
                    .await
                    .map_err(repo_failure("pendingReviews"))
            },
            async {
                self.orders
                    .count_unread_orders()
                    .await
                    .map_err(repo_failure("unreadOrders"))
            },
            async {
                self.reviews
                    .count_unread_reviews()
                    .await
                    .map_err(repo_failure("unreadReviews"))
            },
            self.recent_orders(),
        )?;

        Ok(DashboardStats {
            total_orders,
            pending_orders,
            delivered_orders,
            total_revenue,
            total_products,
            total_reviews,
            pending_reviews,
            unread_orders,
            unread_reviews,
            recent_orders: recent,
        })
    }

    async fn recent_orders(&self) -> Result<Vec<RecentOrder>, DashboardError> {
        let orders = self
            .orders
            .recent_orders(RECENT_ORDERS_LIMIT)
            .await
            .map_err(repo_failure("recentOrders"))?;

        let mut product_ids: Vec<Uuid> = orders.iter().filter_map(|o| o.product_id).collect();
        product_ids.sort_unstable();
        product_ids.dedup();

        let names: HashMap<Uuid, String> = if product_ids.is_empty() {
            HashMap::new()
        } else {
            self.products
                .product_names(&product_ids)
                .await
                .map_err(repo_failure("recentOrders"))?
                .into_iter()
                .collect()
        };

        Ok(orders
            .into_iter()
            .map(|order| {
                let current_product_name = order
                    .product_id
                    .and_then(|id| names.get(&id).cloned());
                RecentOrder {
                    order,
                    current_product_name,
                }
            })
            .collect())
    }
}
