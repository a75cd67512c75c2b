use std::{future::IntoFuture, process, sync::Arc, time::Instant};

use storefront::{
    application::{
        auth::{AdminAuthService, Credentials, StoredAdminVerifier},
        catalog::CatalogService,
        dashboard::DashboardService,
        error::AppError,
        images::ImageIngestService,
        notifications::InboxService,
        orders::OrderService,
        repos::{AdminsRepo, OrdersRepo, ProductsRepo, ReviewsRepo, SettingsRepo, SlidersRepo},
        reviews::ReviewService,
        seed::DemoCatalogSeeder,
        settings::SettingsService,
        sliders::SliderService,
    },
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, ApiState, HttpState, RouterState},
        mail, telemetry,
        uploads::UploadStorage,
    },
};
use tokio::signal;
use tokio::sync::watch;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Seed(_) => run_seed(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let state = build_router_state(repositories, &settings)?;

    let seeded = state
        .api
        .auth
        .ensure_seed_admin()
        .await
        .map_err(|err| AppError::unexpected(format!("failed to seed administrator: {err}")))?;
    if !seeded {
        info!(
            target = "storefront::auth",
            "Administrator already present; configured credential left unused"
        );
    }

    state
        .api
        .settings
        .load()
        .await
        .map_err(|err| AppError::unexpected(format!("failed to load site settings: {err}")))?;

    if !settings.notifications.is_enabled() {
        info!(
            target = "storefront::notifications",
            "Mail relay not configured; order and review notifications are disabled"
        );
    }

    serve_http(&settings, state).await
}

async fn run_seed(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let products: Arc<dyn ProductsRepo> = repositories.clone();
    let sliders: Arc<dyn SlidersRepo> = repositories.clone();

    let report = DemoCatalogSeeder::new(products, sliders)
        .seed()
        .await
        .map_err(|err| AppError::unexpected(format!("failed to seed catalogue: {err}")))?;

    info!(
        target = "storefront::seed",
        product_created = report.product_created,
        slider_created = report.slider_created,
        "Seed completed"
    );
    Ok(())
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))?;

    let pool = PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| InfraError::database(err.to_string()))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| InfraError::database(err.to_string()))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

fn build_router_state(
    repositories: Arc<PostgresRepositories>,
    settings: &config::Settings,
) -> Result<RouterState, AppError> {
    let products_repo: Arc<dyn ProductsRepo> = repositories.clone();
    let orders_repo: Arc<dyn OrdersRepo> = repositories.clone();
    let reviews_repo: Arc<dyn ReviewsRepo> = repositories.clone();
    let sliders_repo: Arc<dyn SlidersRepo> = repositories.clone();
    let settings_repo: Arc<dyn SettingsRepo> = repositories.clone();
    let admins_repo: Arc<dyn AdminsRepo> = repositories.clone();

    let upload_storage = Arc::new(
        UploadStorage::new(settings.uploads.directory.clone()).map_err(InfraError::Io)?,
    );
    let max_image_bytes = usize::try_from(settings.uploads.max_image_bytes.get())
        .map_err(|_| InfraError::configuration("uploads.max_image_bytes exceeds usize"))?;
    let images = ImageIngestService::new(upload_storage.clone(), max_image_bytes);

    let notifications = mail::dispatcher_from_settings(&settings.notifications)?;

    let auth = AdminAuthService::new(
        Arc::new(StoredAdminVerifier::new(admins_repo.clone())),
        admins_repo,
        Credentials {
            username: settings.admin.username.clone(),
            password: settings.admin.password.clone(),
        },
    );

    let api = ApiState {
        auth: Arc::new(auth),
        catalog: Arc::new(CatalogService::new(products_repo.clone(), images.clone())),
        orders: Arc::new(OrderService::new(
            orders_repo.clone(),
            notifications.clone(),
            settings.orders.strict_transitions,
        )),
        reviews: Arc::new(ReviewService::new(reviews_repo.clone(), notifications)),
        sliders: Arc::new(SliderService::new(sliders_repo, images.clone())),
        settings: Arc::new(SettingsService::new(settings_repo)),
        dashboard: Arc::new(DashboardService::new(
            orders_repo.clone(),
            products_repo,
            reviews_repo.clone(),
        )),
        inbox: Arc::new(InboxService::new(orders_repo, reviews_repo)),
        images: Arc::new(images),
    };

    let http = HttpState {
        store: repositories,
        objects: upload_storage,
        started_at: Instant::now(),
    };

    Ok(RouterState { http, api })
}

async fn serve_http(settings: &config::Settings, state: RouterState) -> Result<(), AppError> {
    let router = http::build_router(state);
    let addr = settings.server.addr;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| InfraError::Bind { addr, source })?;
    info!(target = "storefront::http", %addr, "Listening");

    let (stopping_tx, mut stopping_rx) = watch::channel(false);
    let server = axum::serve(listener, router.into_make_service()).with_graceful_shutdown(
        async move {
            shutdown_signal().await;
            let _ = stopping_tx.send(true);
        },
    );

    // Open connections get `graceful_shutdown` to drain once a signal arrives.
    let drain_limit = settings.server.graceful_shutdown;
    tokio::select! {
        result = server.into_future() => {
            result.map_err(|err| AppError::unexpected(format!("server error: {err}")))?;
        }
        _ = async {
            if stopping_rx.wait_for(|stopping| *stopping).await.is_ok() {
                tokio::time::sleep(drain_limit).await;
            } else {
                std::future::pending::<()>().await;
            }
        } => {
            warn!(
                target = "storefront::http",
                timeout_secs = drain_limit.as_secs(),
                "Graceful shutdown timed out; closing remaining connections"
            );
        }
    }

    info!(target = "storefront::http", "Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(target = "storefront::http", error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!(target = "storefront::http", "Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!(
                    target = "storefront::http",
                    "Received terminate signal, shutting down"
                );
            }
            Err(err) => {
                error!(target = "storefront::http", error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
