use std::sync::Arc;

use thiserror::Error;
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::counters::{ORDER_ID_COLLISIONS_TOTAL, ORDERS_CREATED_TOTAL};
use crate::application::error::{FieldViolation, ensure_non_negative};
use crate::application::notify::{Notification, NotificationDispatcher};
use crate::application::pagination::{PageRequest, Paginated};
use crate::application::repos::{
    CreateOrderParams, ORDER_ID_CONSTRAINT, OrdersRepo, RepoError, UpdateOrderStatusParams,
};
use crate::domain::entities::OrderRecord;
use crate::domain::error::DomainError;
use crate::domain::order_id::generate_order_id;
use crate::domain::types::OrderStatus;

pub const MAX_ORDER_ID_ATTEMPTS: usize = 3;
pub const DEFAULT_PAYMENT_METHOD: &str = "cash_on_delivery";

#[derive(Debug, Error)]
pub enum OrderError {
    #[error(transparent)]
    Validation(#[from] FieldViolation),
    #[error(transparent)]
    Transition(#[from] DomainError),
    #[error("order not found")]
    NotFound,
    #[error("could not allocate a unique order id after {attempts} attempts")]
    Conflict { attempts: usize },
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for OrderError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => Self::NotFound,
            other => Self::Repo(other),
        }
    }
}

/// Public order submission. Required fields are optional here so that a missing
/// field can be reported by name.
#[derive(Debug, Clone, Default)]
pub struct CreateOrderCommand {
    pub customer_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub product_id: Option<Uuid>,
    pub product_name: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub quantity: Option<i32>,
    pub total_price: Option<i64>,
    pub delivery_charge: Option<i64>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateOrderStatusCommand {
    pub status: OrderStatus,
    /// `Some` replaces the stored notes; `None` keeps them.
    pub notes: Option<String>,
}

type OrderIdGenerator = Arc<dyn Fn() -> String + Send + Sync>;

#[derive(Clone)]
pub struct OrderService {
    repo: Arc<dyn OrdersRepo>,
    notifications: NotificationDispatcher,
    strict_transitions: bool,
    next_order_id: OrderIdGenerator,
}

impl OrderService {
    pub fn new(
        repo: Arc<dyn OrdersRepo>,
        notifications: NotificationDispatcher,
        strict_transitions: bool,
    ) -> Self {
        Self {
            repo,
            notifications,
            strict_transitions,
            next_order_id: Arc::new(generate_order_id),
        }
    }

    pub fn with_id_generator(
        mut self,
        generator: impl Fn() -> String + Send + Sync + 'static,
    ) -> Self {
        self.next_order_id = Arc::new(generator);
        self
    }

    pub async fn place_order(&self, command: CreateOrderCommand) -> Result<OrderRecord, OrderError> {
        let customer_name = required_text(command.customer_name, "customerName")?;
        let phone = required_text(command.phone, "phone")?;
        let address = required_text(command.address, "address")?;
        let product_name = required_text(command.product_name, "productName")?;
        let color = required_text(command.color, "color")?;
        let size = required_text(command.size, "size")?;

        let quantity = command
            .quantity
            .ok_or_else(|| FieldViolation::required("quantity"))?;
        if quantity < 1 {
            return Err(FieldViolation::invalid("quantity", "must be at least 1").into());
        }

        let total_price = command
            .total_price
            .ok_or_else(|| FieldViolation::required("totalPrice"))?;
        ensure_non_negative(total_price, "totalPrice")?;

        let delivery_charge = command.delivery_charge.unwrap_or(0);
        ensure_non_negative(delivery_charge, "deliveryCharge")?;

        let payment_method = command
            .payment_method
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string());

        let mut params = CreateOrderParams {
            order_id: String::new(),
            customer_name,
            phone,
            address,
            product_id: command.product_id,
            product_name,
            color,
            size,
            quantity,
            total_price,
            delivery_charge,
            payment_method,
            notes: command.notes.filter(|value| !value.trim().is_empty()),
        };

        for attempt in 1..=MAX_ORDER_ID_ATTEMPTS {
            params.order_id = (self.next_order_id)();
            match self.repo.create_order(params.clone()).await {
                Ok(order) => {
                    metrics::counter!(ORDERS_CREATED_TOTAL).increment(1);
                    info!(
                        target = "storefront::orders",
                        order_id = %order.order_id,
                        total_price = order.total_price,
                        "Order placed"
                    );
                    self.notifications.dispatch(Notification::new_order(&order));
                    return Ok(order);
                }
                Err(RepoError::Duplicate { constraint }) if constraint == ORDER_ID_CONSTRAINT => {
                    metrics::counter!(ORDER_ID_COLLISIONS_TOTAL).increment(1);
                    warn!(
                        target = "storefront::orders",
                        order_id = %params.order_id,
                        attempt,
                        "Order id collision; regenerating"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(OrderError::Conflict {
            attempts: MAX_ORDER_ID_ATTEMPTS,
        })
    }

    pub async fn list(
        &self,
        status: Option<OrderStatus>,
        page: PageRequest,
    ) -> Result<Paginated<OrderRecord>, OrderError> {
        let (items, total) = tokio::try_join!(
            self.repo.list_orders(status, page),
            self.repo.count_orders(status)
        )?;
        Ok(Paginated::new(items, total, page))
    }

    pub async fn find(&self, id: Uuid) -> Result<OrderRecord, OrderError> {
        self.repo.find_order(id).await?.ok_or(OrderError::NotFound)
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        command: UpdateOrderStatusCommand,
    ) -> Result<OrderRecord, OrderError> {
        let current = self.find(id).await?;

        if self.strict_transitions {
            current.status.ensure_transition(command.status)?;
        }

        let notes = match command.notes {
            Some(notes) => Some(notes),
            None => current.notes,
        };

        let updated = self
            .repo
            .update_order_status(UpdateOrderStatusParams {
                id,
                status: command.status,
                notes,
                updated_at: OffsetDateTime::now_utc(),
            })
            .await?;

        info!(
            target = "storefront::orders",
            order_id = %updated.order_id,
            from = %current.status,
            to = %updated.status,
            "Order status updated"
        );

        Ok(updated)
    }
}

fn required_text(value: Option<String>, field: &'static str) -> Result<String, FieldViolation> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| FieldViolation::required(field))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::application::testing::{MemoryRepositories, RecordingNotifier};
    use crate::domain::order_id::{ORDER_ID_LEN, ORDER_ID_PREFIX};

    fn valid_command() -> CreateOrderCommand {
        CreateOrderCommand {
            customer_name: Some("Rahim".to_string()),
            phone: Some("01700000000".to_string()),
            address: Some("Mirpur, Dhaka".to_string()),
            product_id: None,
            product_name: Some("Eid Special".to_string()),
            color: Some("White".to_string()),
            size: Some("L".to_string()),
            quantity: Some(2),
            total_price: Some(3060),
            delivery_charge: Some(60),
            payment_method: None,
            notes: None,
        }
    }

    fn service(repos: &Arc<MemoryRepositories>, strict: bool) -> OrderService {
        OrderService::new(repos.clone(), NotificationDispatcher::disabled(), strict)
    }

    #[tokio::test]
    async fn place_order_assigns_identifier_and_defaults() {
        let repos = Arc::new(MemoryRepositories::default());
        let order = service(&repos, true)
            .place_order(valid_command())
            .await
            .expect("order placed");

        assert_eq!(order.order_id.len(), ORDER_ID_LEN);
        assert!(order.order_id.starts_with(ORDER_ID_PREFIX));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_method, DEFAULT_PAYMENT_METHOD);
        assert!(!order.is_read);
    }

    #[tokio::test]
    async fn missing_phone_is_rejected_without_persisting() {
        let repos = Arc::new(MemoryRepositories::default());
        let mut command = valid_command();
        command.phone = None;

        let err = service(&repos, true)
            .place_order(command)
            .await
            .expect_err("missing phone");

        assert!(matches!(err, OrderError::Validation(ref v) if v.field == "phone"));
        assert_eq!(repos.count_orders(None).await.expect("count"), 0);
    }

    #[tokio::test]
    async fn zero_quantity_is_rejected() {
        let repos = Arc::new(MemoryRepositories::default());
        let mut command = valid_command();
        command.quantity = Some(0);

        let err = service(&repos, true)
            .place_order(command)
            .await
            .expect_err("zero quantity");
        assert!(matches!(err, OrderError::Validation(ref v) if v.field == "quantity"));
    }

    #[tokio::test]
    async fn identifier_collision_is_retried() {
        let repos = Arc::new(MemoryRepositories::default());
        let ids = Arc::new(Mutex::new(vec![
            "RT0000011111".to_string(),
            "RT0000011111".to_string(),
            "RT0000022222".to_string(),
        ]));
        let service = service(&repos, true).with_id_generator(move || {
            ids.lock().expect("ids").remove(0)
        });

        let first = service.place_order(valid_command()).await.expect("first");
        let second = service.place_order(valid_command()).await.expect("second");

        assert_eq!(first.order_id, "RT0000011111");
        assert_eq!(second.order_id, "RT0000022222");
    }

    #[tokio::test]
    async fn persistent_collision_surfaces_conflict() {
        let repos = Arc::new(MemoryRepositories::default());
        let service =
            service(&repos, true).with_id_generator(|| "RT0000011111".to_string());

        service.place_order(valid_command()).await.expect("first");
        let err = service
            .place_order(valid_command())
            .await
            .expect_err("collision");
        assert!(matches!(
            err,
            OrderError::Conflict {
                attempts: MAX_ORDER_ID_ATTEMPTS
            }
        ));
    }

    #[tokio::test]
    async fn placing_order_sends_notification() {
        let repos = Arc::new(MemoryRepositories::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let service = OrderService::new(
            repos.clone(),
            NotificationDispatcher::new(notifier.clone()),
            true,
        );

        let order = service.place_order(valid_command()).await.expect("placed");
        let sent = notifier.wait_for(1).await;
        assert_eq!(sent[0].subject, format!("New order {}", order.order_id));
    }

    #[tokio::test]
    async fn failing_notifier_does_not_fail_order() {
        let repos = Arc::new(MemoryRepositories::default());
        let notifier = Arc::new(RecordingNotifier::failing());
        let service = OrderService::new(
            repos.clone(),
            NotificationDispatcher::new(notifier.clone()),
            true,
        );

        service.place_order(valid_command()).await.expect("placed");
        assert_eq!(repos.count_orders(None).await.expect("count"), 1);
    }

    #[tokio::test]
    async fn cancel_pending_order_overwrites_notes() {
        let repos = Arc::new(MemoryRepositories::default());
        let service = service(&repos, true);
        let mut command = valid_command();
        command.notes = Some("call first".to_string());
        let order = service.place_order(command).await.expect("placed");

        let cancelled = service
            .update_status(
                order.id,
                UpdateOrderStatusCommand {
                    status: OrderStatus::Cancelled,
                    notes: Some("customer changed mind".to_string()),
                },
            )
            .await
            .expect("cancelled");

        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert_eq!(cancelled.notes.as_deref(), Some("customer changed mind"));
        assert!(cancelled.updated_at >= order.updated_at);

        let reloaded = service.find(order.id).await.expect("reload");
        assert_eq!(reloaded.status, OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn strict_mode_rejects_leaving_terminal_state() {
        let repos = Arc::new(MemoryRepositories::default());
        let service = service(&repos, true);
        let order = service.place_order(valid_command()).await.expect("placed");

        service
            .update_status(
                order.id,
                UpdateOrderStatusCommand {
                    status: OrderStatus::Delivered,
                    notes: None,
                },
            )
            .await
            .expect("delivered");

        let err = service
            .update_status(
                order.id,
                UpdateOrderStatusCommand {
                    status: OrderStatus::Pending,
                    notes: None,
                },
            )
            .await
            .expect_err("terminal");
        assert!(matches!(err, OrderError::Transition(_)));
    }

    #[tokio::test]
    async fn permissive_mode_allows_any_status() {
        let repos = Arc::new(MemoryRepositories::default());
        let service = service(&repos, false);
        let order = service.place_order(valid_command()).await.expect("placed");

        for status in [OrderStatus::Delivered, OrderStatus::Pending] {
            let updated = service
                .update_status(order.id, UpdateOrderStatusCommand { status, notes: None })
                .await
                .expect("permissive update");
            assert_eq!(updated.status, status);
        }
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let repos = Arc::new(MemoryRepositories::default());
        let err = service(&repos, true)
            .update_status(
                Uuid::new_v4(),
                UpdateOrderStatusCommand {
                    status: OrderStatus::Confirmed,
                    notes: None,
                },
            )
            .await
            .expect_err("missing");
        assert!(matches!(err, OrderError::NotFound));
    }

    #[tokio::test]
    async fn list_filters_and_paginates() {
        let repos = Arc::new(MemoryRepositories::default());
        let service = service(&repos, true);
        for _ in 0..5 {
            service.place_order(valid_command()).await.expect("placed");
        }
        let first = service.list(None, PageRequest::default()).await.expect("list");
        service
            .update_status(
                first.items[0].id,
                UpdateOrderStatusCommand {
                    status: OrderStatus::Shipped,
                    notes: None,
                },
            )
            .await
            .expect("shipped");

        let page = service
            .list(None, PageRequest::new(Some(2), Some(2)))
            .await
            .expect("page 2");
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 3);

        let shipped = service
            .list(Some(OrderStatus::Shipped), PageRequest::default())
            .await
            .expect("shipped");
        assert_eq!(shipped.total, 1);
        assert_eq!(shipped.items[0].status, OrderStatus::Shipped);
    }

    #[test]
    fn placed_orders_are_counted() {
        use metrics_util::debugging::{DebugValue, DebuggingRecorder};

        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();
        let repos = Arc::new(MemoryRepositories::default());
        let service = service(&repos, true);

        metrics::with_local_recorder(&recorder, || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("runtime");
            runtime.block_on(async {
                service.place_order(valid_command()).await.expect("first");
                service.place_order(valid_command()).await.expect("second");
            });
        });

        let counted = snapshotter
            .snapshot()
            .into_vec()
            .into_iter()
            .find(|(key, _, _, _)| key.key().name() == ORDERS_CREATED_TOTAL)
            .map(|(_, _, _, value)| value);
        assert!(matches!(counted, Some(DebugValue::Counter(2))));
    }
}
