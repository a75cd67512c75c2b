use std::sync::Arc;

use crate::application::auth::AdminAuthService;
use crate::application::catalog::CatalogService;
use crate::application::dashboard::DashboardService;
use crate::application::images::ImageIngestService;
use crate::application::notifications::InboxService;
use crate::application::orders::OrderService;
use crate::application::reviews::ReviewService;
use crate::application::settings::SettingsService;
use crate::application::sliders::SliderService;

#[derive(Clone)]
pub struct ApiState {
    pub auth: Arc<AdminAuthService>,
    pub catalog: Arc<CatalogService>,
    pub orders: Arc<OrderService>,
    pub reviews: Arc<ReviewService>,
    pub sliders: Arc<SliderService>,
    pub settings: Arc<SettingsService>,
    pub dashboard: Arc<DashboardService>,
    pub inbox: Arc<InboxService>,
    pub images: Arc<ImageIngestService>,
}
