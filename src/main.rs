use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;
use tracing::info;

use coopcredit::config::AppConfig;
use coopcredit::error::AppError;
use coopcredit::telemetry;
use coopcredit::underwriting::{
    underwriting_router, Affiliate, AffiliateId, AffiliateStatus, ApplicationId,
    ApplicationRequest, ApplicationStatus, CreditApplication, EligibilityPolicy, RepositoryError,
    RiskScorer, UnderwritingRepository, UnderwritingService,
};

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Cooperative Credit Underwriting",
    about = "Run the cooperative credit underwriting service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run one deterministic underwriting pass and print the decision
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct DemoArgs {
    /// Document number driving the deterministic base score
    #[arg(long, default_value = "1234567890")]
    document: String,
    /// Requested amount
    #[arg(long, default_value = "10000000")]
    amount: Decimal,
    /// Term in months
    #[arg(long, default_value_t = 24)]
    term: u32,
    /// Annual interest rate percentage
    #[arg(long, default_value = "12.5")]
    rate: Decimal,
    /// Declared monthly income
    #[arg(long, default_value = "5000000")]
    income: Decimal,
    /// Existing monthly debt obligations
    #[arg(long, default_value = "0")]
    debt: Decimal,
}

/// In-memory aggregate store. Persistence proper is an external collaborator;
/// this adapter is enough to run the service standalone and in demos.
#[derive(Default)]
struct MemoryStore {
    affiliates: Mutex<HashMap<AffiliateId, Affiliate>>,
    applications: Mutex<HashMap<ApplicationId, CreditApplication>>,
}

impl MemoryStore {
    fn seeded(affiliate: Affiliate) -> Self {
        let store = Self::default();
        store
            .affiliates
            .lock()
            .expect("affiliate mutex poisoned")
            .insert(affiliate.id, affiliate);
        store
    }
}

impl UnderwritingRepository for MemoryStore {
    fn affiliate(&self, id: AffiliateId) -> Result<Option<Affiliate>, RepositoryError> {
        Ok(self
            .affiliates
            .lock()
            .expect("affiliate mutex poisoned")
            .get(&id)
            .cloned())
    }

    fn insert_application(
        &self,
        application: CreditApplication,
    ) -> Result<CreditApplication, RepositoryError> {
        let mut guard = self.applications.lock().expect("application mutex poisoned");
        if guard.contains_key(&application.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(application.id, application.clone());
        Ok(application)
    }

    fn update_application(&self, application: CreditApplication) -> Result<(), RepositoryError> {
        self.applications
            .lock()
            .expect("application mutex poisoned")
            .insert(application.id, application);
        Ok(())
    }

    fn application(
        &self,
        id: ApplicationId,
    ) -> Result<Option<CreditApplication>, RepositoryError> {
        Ok(self
            .applications
            .lock()
            .expect("application mutex poisoned")
            .get(&id)
            .cloned())
    }

    fn applications_for_affiliate(
        &self,
        id: AffiliateId,
    ) -> Result<Vec<CreditApplication>, RepositoryError> {
        let guard = self.applications.lock().expect("application mutex poisoned");
        let mut applications: Vec<_> = guard
            .values()
            .filter(|application| application.affiliate_id == id)
            .cloned()
            .collect();
        applications.sort_by_key(|application| application.id.0);
        Ok(applications)
    }

    fn has_pending_application(&self, id: AffiliateId) -> Result<bool, RepositoryError> {
        let guard = self.applications.lock().expect("application mutex poisoned");
        Ok(guard.values().any(|application| {
            application.affiliate_id == id && application.status == ApplicationStatus::Pending
        }))
    }
}

fn demo_affiliate(document_number: String) -> Affiliate {
    Affiliate {
        id: AffiliateId(1),
        document_type: "CC".to_string(),
        document_number,
        first_name: "Demo".to_string(),
        last_name: "Affiliate".to_string(),
        email: "demo@coopcredit.example".to_string(),
        phone: "3000000000".to_string(),
        salary: dec!(6_000_000),
        affiliation_date: NaiveDate::from_ymd_opt(2020, 1, 1),
        status: AffiliateStatus::Active,
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Demo(args) => run_demo(args),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let store = Arc::new(MemoryStore::seeded(demo_affiliate("1234567890".to_string())));
    let service = Arc::new(UnderwritingService::new(
        store,
        Arc::new(RiskScorer::default()),
        EligibilityPolicy::default(),
    ));

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(underwriting_router(service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "credit underwriting service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        document,
        amount,
        term,
        rate,
        income,
        debt,
    } = args;

    let store = Arc::new(MemoryStore::seeded(demo_affiliate(document)));
    let service = UnderwritingService::new(
        store,
        Arc::new(RiskScorer::default()),
        EligibilityPolicy::default(),
    );

    let request = ApplicationRequest {
        requested_amount: Some(amount),
        term_months: Some(term),
        interest_rate: rate,
        monthly_income: Some(income),
        current_debt: Some(debt),
        purpose: "Demo underwriting run".to_string(),
    };

    let submitted = service.submit(AffiliateId(1), request)?;
    let evaluated = service.evaluate(submitted.id)?;

    println!(
        "{}",
        serde_json::to_string_pretty(&evaluated).expect("application serializes")
    );
    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
