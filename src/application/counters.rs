//! Counter names emitted by the storefront services, with their descriptions.

use metrics::Unit;

pub const ORDERS_CREATED_TOTAL: &str = "storefront_orders_created_total";
pub const ORDER_ID_COLLISIONS_TOTAL: &str = "storefront_order_id_collisions_total";
pub const REVIEWS_SUBMITTED_TOTAL: &str = "storefront_reviews_submitted_total";
pub const IMAGES_STORED_TOTAL: &str = "storefront_images_stored_total";
pub const NOTIFICATIONS_FAILED_TOTAL: &str = "storefront_notifications_failed_total";

pub struct CounterDescriptor {
    pub name: &'static str,
    pub unit: Unit,
    pub help: &'static str,
}

/// Every counter the storefront records; described once at startup.
pub const COUNTERS: &[CounterDescriptor] = &[
    CounterDescriptor {
        name: ORDERS_CREATED_TOTAL,
        unit: Unit::Count,
        help: "Cash-on-delivery orders placed through the storefront.",
    },
    CounterDescriptor {
        name: ORDER_ID_COLLISIONS_TOTAL,
        unit: Unit::Count,
        help: "Order id collisions that forced a regenerated id.",
    },
    CounterDescriptor {
        name: REVIEWS_SUBMITTED_TOTAL,
        unit: Unit::Count,
        help: "Customer reviews submitted for moderation.",
    },
    CounterDescriptor {
        name: IMAGES_STORED_TOTAL,
        unit: Unit::Count,
        help: "Product, slider and general images written to upload storage.",
    },
    CounterDescriptor {
        name: NOTIFICATIONS_FAILED_TOTAL,
        unit: Unit::Count,
        help: "Order or review notifications the mail relay did not accept.",
    },
];
