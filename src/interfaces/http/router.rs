//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, patch, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::customers::{CustomerStatistics, InstallationTypeShare, StatusShare};
use crate::application::dashboard::{
    CityShare, ConsumptionBucket, ConversionRates, ConversionReport, EnergyReport, Funnel,
    GeographicReport, InstallationEnergyShare, LeadQuality, OverviewReport, PerformanceReport,
    SalesDay, SalesReport, StateShare, SustainabilityImpact, TimelineDay, TimelineReport,
    TimelineSummary, TypeStatusShare,
};
use crate::application::{CustomerService, DashboardService, UserService};
use crate::domain::solar::{CustomerSummary, FinancialEstimate, SolarEstimate, SolarSystemEstimate};
use crate::domain::{CustomerStatus, CustomerType, InstallationType, RepositoryProvider, UserRole};
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::common::MessageResponse;
use crate::interfaces::http::middleware::{auth_middleware, AuthState};
use crate::interfaces::http::modules::{
    auth, customers, dashboard, health, metrics, request_id_middleware, users,
};

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token from /auth/login or /auth/register"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        metrics::prometheus_metrics,
        // Auth
        auth::login,
        auth::register,
        auth::profile,
        auth::change_password,
        // Users
        users::list_users,
        users::get_user,
        users::update_user,
        users::toggle_status,
        // Customers
        customers::create_customer,
        customers::list_customers,
        customers::customer_statistics,
        customers::get_customer,
        customers::solar_potential,
        customers::update_customer,
        customers::delete_customer,
        // Dashboard
        dashboard::overview,
        dashboard::sales_metrics,
        dashboard::performance_metrics,
        dashboard::geographic_metrics,
        dashboard::timeline_metrics,
        dashboard::conversion_metrics,
        dashboard::energy_analysis,
    ),
    components(
        schemas(
            MessageResponse,
            health::HealthResponse,
            health::ComponentHealth,
            auth::LoginRequest,
            auth::RegisterRequest,
            auth::ChangePasswordRequest,
            auth::LoginResponse,
            auth::UserInfo,
            auth::ProfileResponse,
            users::UserDto,
            users::UpdateUserRequest,
            UserRole,
            customers::CreateCustomerRequest,
            customers::UpdateCustomerRequest,
            customers::CustomerDto,
            CustomerStatus,
            CustomerType,
            InstallationType,
            CustomerStatistics,
            StatusShare,
            InstallationTypeShare,
            SolarEstimate,
            CustomerSummary,
            SolarSystemEstimate,
            FinancialEstimate,
            OverviewReport,
            SalesReport,
            SalesDay,
            PerformanceReport,
            TypeStatusShare,
            LeadQuality,
            GeographicReport,
            CityShare,
            StateShare,
            TimelineReport,
            TimelineDay,
            TimelineSummary,
            ConversionReport,
            Funnel,
            ConversionRates,
            EnergyReport,
            InstallationEnergyShare,
            ConsumptionBucket,
            SustainabilityImpact,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness, database health and Prometheus metrics"),
        (name = "Authentication", description = "Login, registration and password management"),
        (name = "Users", description = "User accounts and activation"),
        (name = "Customers", description = "Customer records and solar-potential estimates"),
        (name = "Dashboard", description = "Aggregated sales, funnel and energy reports"),
    ),
    info(
        title = "Solar CRM API",
        version = "1.0.0",
        description = "Customer management and solar-potential estimation for solar installers",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Everything the router needs from the running service
pub struct RouterContext {
    pub db: DatabaseConnection,
    pub repos: Arc<dyn RepositoryProvider>,
    pub jwt_config: JwtConfig,
    /// Empty or `*` allows any origin
    pub cors_allowed_origins: Vec<String>,
    pub metrics_handle: PrometheusHandle,
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT]);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(parsed).allow_credentials(true)
}

/// Create the API router with all routes
pub fn create_api_router(ctx: RouterContext) -> Router {
    let user_service = Arc::new(UserService::new(ctx.repos.clone(), ctx.jwt_config));
    let customer_service = Arc::new(CustomerService::new(ctx.repos.clone()));
    let dashboard_service = Arc::new(DashboardService::new(ctx.repos));

    let middleware_state = AuthState {
        user_service: user_service.clone(),
    };
    let require_auth = || middleware::from_fn_with_state(middleware_state.clone(), auth_middleware);

    let auth_state = auth::AuthHandlerState { user_service };

    // Auth routes: profile and password change are protected, login and
    // register are public
    let auth_routes = Router::new()
        .route("/profile", get(auth::profile))
        .route("/change-password", patch(auth::change_password))
        .route_layer(require_auth())
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .with_state(auth_state.clone());

    let user_routes = Router::new()
        .route("/", get(users::list_users))
        .route("/{id}", get(users::get_user).patch(users::update_user))
        .route("/{id}/toggle-status", patch(users::toggle_status))
        .layer(require_auth())
        .with_state(auth_state);

    let customer_routes = Router::new()
        .route(
            "/",
            get(customers::list_customers).post(customers::create_customer),
        )
        .route("/statistics", get(customers::customer_statistics))
        .route(
            "/{id}",
            get(customers::get_customer)
                .patch(customers::update_customer)
                .delete(customers::delete_customer),
        )
        .route("/{id}/solar-potential", get(customers::solar_potential))
        .layer(require_auth())
        .with_state(customers::CustomerHandlerState { customer_service });

    let dashboard_routes = Router::new()
        .route("/overview", get(dashboard::overview))
        .route("/metrics/sales", get(dashboard::sales_metrics))
        .route("/metrics/performance", get(dashboard::performance_metrics))
        .route("/metrics/geographic", get(dashboard::geographic_metrics))
        .route("/metrics/timeline", get(dashboard::timeline_metrics))
        .route("/metrics/conversion", get(dashboard::conversion_metrics))
        .route("/metrics/energy-analysis", get(dashboard::energy_analysis))
        .layer(require_auth())
        .with_state(dashboard::DashboardHandlerState { dashboard_service });

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState {
            db: ctx.db,
            started_at: Arc::new(Instant::now()),
        });

    let metrics_routes = Router::new()
        .route("/metrics", get(metrics::prometheus_metrics))
        .with_state(metrics::MetricsState {
            handle: ctx.metrics_handle,
        });

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .nest("/customers", customer_routes)
        .nest("/dashboard", dashboard_routes)
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&ctx.cors_allowed_origins))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::infrastructure::database::test_support::memory_db;
    use crate::infrastructure::SeaOrmRepositoryProvider;

    const SECRET: &str = "router-test-secret";

    struct TestApp {
        router: Router,
        users: UserService,
    }

    async fn test_app() -> TestApp {
        let db = memory_db().await;
        let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let jwt_config = JwtConfig::new(SECRET, 1);
        let router = create_api_router(RouterContext {
            db,
            repos: repos.clone(),
            jwt_config: jwt_config.clone(),
            cors_allowed_origins: vec![],
            metrics_handle: PrometheusBuilder::new().build_recorder().handle(),
        });
        TestApp {
            router,
            users: UserService::new(repos, jwt_config),
        }
    }

    impl TestApp {
        async fn send(
            &self,
            method: &str,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> Response {
            let mut req = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                req = req.header(header::AUTHORIZATION, format!("Bearer {}", token));
            }
            let body = match body {
                Some(json) => {
                    req = req.header(header::CONTENT_TYPE, "application/json");
                    Body::from(serde_json::to_vec(&json).unwrap())
                }
                None => Body::empty(),
            };
            self.router
                .clone()
                .oneshot(req.body(body).unwrap())
                .await
                .unwrap()
        }

        async fn register(&self, email: &str) -> String {
            let resp = self
                .send(
                    "POST",
                    "/auth/register",
                    None,
                    Some(json!({"name": "Ana", "email": email, "password": "secret1"})),
                )
                .await;
            assert_eq!(resp.status(), StatusCode::CREATED);
            read_json(resp).await["data"]["access_token"]
                .as_str()
                .unwrap()
                .to_string()
        }

        async fn admin_token(&self) -> String {
            self.users
                .ensure_admin("Admin", "admin@example.com", "admin123")
                .await
                .unwrap();
            self.users
                .login("admin@example.com", "admin123")
                .await
                .unwrap()
                .access_token
        }
    }

    async fn read_json(resp: Response) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn customer_body(email: &str, consumption: Option<f64>) -> Value {
        let mut body = json!({
            "name": "Maria Souza",
            "email": email,
            "phone": "11999990000",
            "address": "Rua A, 10",
            "city": "Campinas",
            "state": "SP",
            "zipCode": "13000-000",
            "monthlyEnergyBill": 420.0
        });
        if let Some(kwh) = consumption {
            body["monthlyEnergyConsumption"] = json!(kwh);
        }
        body
    }

    #[tokio::test]
    async fn health_reports_database_ok() {
        let app = test_app().await;
        let resp = app.send("GET", "/health", None, None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = read_json(resp).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["database"]["status"], "ok");
    }

    #[tokio::test]
    async fn openapi_document_lists_routes() {
        let app = test_app().await;
        let resp = app.send("GET", "/api-doc/openapi.json", None, None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = read_json(resp).await;
        assert!(json["paths"]["/customers/{id}/solar-potential"].is_object());
        assert!(json["paths"]["/dashboard/metrics/energy-analysis"].is_object());
        assert!(json["components"]["securitySchemes"]["bearer_auth"].is_object());
    }

    #[tokio::test]
    async fn protected_routes_need_a_token() {
        let app = test_app().await;
        for uri in ["/customers", "/dashboard/overview", "/users", "/auth/profile"] {
            let resp = app.send("GET", uri, None, None).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        }
    }

    #[tokio::test]
    async fn login_returns_user_and_token() {
        let app = test_app().await;
        app.register("ana@example.com").await;

        let resp = app
            .send(
                "POST",
                "/auth/login",
                None,
                Some(json!({"email": "ana@example.com", "password": "secret1"})),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = read_json(resp).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["user"]["email"], "ana@example.com");
        assert_eq!(json["data"]["user"]["role"], "user");
        assert!(json["data"]["access_token"].is_string());

        let bad = app
            .send(
                "POST",
                "/auth/login",
                None,
                Some(json!({"email": "ana@example.com", "password": "wrong-pw"})),
            )
            .await;
        assert_eq!(bad.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn register_validates_and_rejects_duplicates() {
        let app = test_app().await;
        let short = app
            .send(
                "POST",
                "/auth/register",
                None,
                Some(json!({"name": "Ana", "email": "ana@example.com", "password": "123"})),
            )
            .await;
        assert_eq!(short.status(), StatusCode::UNPROCESSABLE_ENTITY);

        app.register("ana@example.com").await;
        let dup = app
            .send(
                "POST",
                "/auth/register",
                None,
                Some(json!({"name": "Ana", "email": "ana@example.com", "password": "secret1"})),
            )
            .await;
        assert_eq!(dup.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn profile_and_password_change() {
        let app = test_app().await;
        let token = app.register("ana@example.com").await;

        let profile = read_json(app.send("GET", "/auth/profile", Some(&token), None).await).await;
        assert_eq!(profile["data"]["email"], "ana@example.com");
        assert!(profile["data"]["userId"].is_string());

        let wrong = app
            .send(
                "PATCH",
                "/auth/change-password",
                Some(&token),
                Some(json!({"currentPassword": "nope-nope", "newPassword": "newsecret"})),
            )
            .await;
        assert_eq!(wrong.status(), StatusCode::BAD_REQUEST);

        let ok = app
            .send(
                "PATCH",
                "/auth/change-password",
                Some(&token),
                Some(json!({"currentPassword": "secret1", "newPassword": "newsecret"})),
            )
            .await;
        assert_eq!(ok.status(), StatusCode::OK);
        assert!(read_json(ok).await["data"]["message"].is_string());

        assert!(app.users.login("ana@example.com", "newsecret").await.is_ok());
    }

    #[tokio::test]
    async fn user_admin_routes_require_admin_role() {
        let app = test_app().await;
        // The default admin is only created while no user exists
        let admin_token = app.admin_token().await;
        let user_token = app.register("ana@example.com").await;

        let forbidden = app.send("GET", "/users", Some(&user_token), None).await;
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

        let listed = app.send("GET", "/users", Some(&admin_token), None).await;
        assert_eq!(listed.status(), StatusCode::OK);
        let users = read_json(listed).await;
        assert_eq!(users["data"].as_array().unwrap().len(), 2);
        assert!(users["data"][0].get("passwordHash").is_none());

        let ana_id = app
            .users
            .login("ana@example.com", "secret1")
            .await
            .unwrap()
            .user
            .id;
        let toggled = app
            .send(
                "PATCH",
                &format!("/users/{}/toggle-status", ana_id),
                Some(&admin_token),
                None,
            )
            .await;
        assert_eq!(toggled.status(), StatusCode::OK);
        assert_eq!(read_json(toggled).await["data"]["isActive"], false);

        // The deactivated user's token stops working
        let after = app.send("GET", "/auth/profile", Some(&user_token), None).await;
        assert_eq!(after.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn users_can_only_update_themselves() {
        let app = test_app().await;
        app.admin_token().await;
        let token = app.register("ana@example.com").await;
        let admin = app
            .users
            .login("admin@example.com", "admin123")
            .await
            .unwrap()
            .user;

        let resp = app
            .send(
                "PATCH",
                &format!("/users/{}", admin.id),
                Some(&token),
                Some(json!({"name": "Mallory"})),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn customer_crud_flow() {
        let app = test_app().await;
        let token = app.register("ana@example.com").await;

        let created = app
            .send(
                "POST",
                "/customers",
                Some(&token),
                Some(customer_body("maria@example.com", Some(350.0))),
            )
            .await;
        assert_eq!(created.status(), StatusCode::CREATED);
        let created = read_json(created).await;
        assert_eq!(created["data"]["status"], "lead");
        assert_eq!(created["data"]["installationType"], "residential");
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let dup = app
            .send(
                "POST",
                "/customers",
                Some(&token),
                Some(customer_body("maria@example.com", None)),
            )
            .await;
        assert_eq!(dup.status(), StatusCode::CONFLICT);

        let updated = app
            .send(
                "PATCH",
                &format!("/customers/{}", id),
                Some(&token),
                Some(json!({"status": "client"})),
            )
            .await;
        assert_eq!(updated.status(), StatusCode::OK);
        assert_eq!(read_json(updated).await["data"]["status"], "client");

        let listed = read_json(
            app.send("GET", "/customers?status=client&city=campinas", Some(&token), None)
                .await,
        )
        .await;
        assert_eq!(listed["data"].as_array().unwrap().len(), 1);

        let stats = read_json(app.send("GET", "/customers/statistics", Some(&token), None).await).await;
        assert_eq!(stats["data"]["totalCustomers"], 1);

        let deleted = app
            .send("DELETE", &format!("/customers/{}", id), Some(&token), None)
            .await;
        assert_eq!(deleted.status(), StatusCode::OK);

        let gone = app
            .send("GET", &format!("/customers/{}", id), Some(&token), None)
            .await;
        assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn customer_validation_errors_are_422() {
        let app = test_app().await;
        let token = app.register("ana@example.com").await;

        let mut body = customer_body("maria@example.com", None);
        body["state"] = json!("SAO");
        let resp = app.send("POST", "/customers", Some(&token), Some(body)).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(read_json(resp).await["success"], false);
    }

    #[tokio::test]
    async fn solar_potential_needs_consumption() {
        let app = test_app().await;
        let token = app.register("ana@example.com").await;

        let with = read_json(
            app.send(
                "POST",
                "/customers",
                Some(&token),
                Some(customer_body("with@example.com", Some(350.0))),
            )
            .await,
        )
        .await;
        let without = read_json(
            app.send(
                "POST",
                "/customers",
                Some(&token),
                Some(customer_body("without@example.com", None)),
            )
            .await,
        )
        .await;

        let estimate = app
            .send(
                "GET",
                &format!("/customers/{}/solar-potential", with["data"]["id"].as_str().unwrap()),
                Some(&token),
                None,
            )
            .await;
        assert_eq!(estimate.status(), StatusCode::OK);
        let estimate = read_json(estimate).await;
        assert_eq!(estimate["data"]["solarSystem"]["numberOfPanels"], 6);
        assert_eq!(estimate["data"]["solarSystem"]["canInstall"], true);

        let missing = app
            .send(
                "GET",
                &format!(
                    "/customers/{}/solar-potential",
                    without["data"]["id"].as_str().unwrap()
                ),
                Some(&token),
                None,
            )
            .await;
        assert_eq!(missing.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn dashboard_reports_are_served() {
        let app = test_app().await;
        let token = app.register("ana@example.com").await;
        app.send(
            "POST",
            "/customers",
            Some(&token),
            Some(customer_body("maria@example.com", Some(350.0))),
        )
        .await;

        let overview = read_json(app.send("GET", "/dashboard/overview", Some(&token), None).await).await;
        assert_eq!(overview["data"]["totalCustomers"], 1);
        assert_eq!(overview["data"]["newCustomersThisMonth"], 1);

        for uri in [
            "/dashboard/metrics/sales?period=week",
            "/dashboard/metrics/performance",
            "/dashboard/metrics/geographic",
            "/dashboard/metrics/timeline?days=7",
            "/dashboard/metrics/conversion",
            "/dashboard/metrics/energy-analysis",
        ] {
            let resp = app.send("GET", uri, Some(&token), None).await;
            assert_eq!(resp.status(), StatusCode::OK, "{}", uri);
        }

        let energy = read_json(
            app.send("GET", "/dashboard/metrics/energy-analysis", Some(&token), None)
                .await,
        )
        .await;
        assert_eq!(
            energy["data"]["consumptionDistribution"].as_array().unwrap().len(),
            5
        );
    }

    #[tokio::test]
    async fn oversized_timeline_window_is_bad_request() {
        let app = test_app().await;
        let token = app.register("ana@example.com").await;

        let resp = app
            .send("GET", "/dashboard/metrics/timeline?days=4294967295", Some(&token), None)
            .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = read_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "days must be at most 3650");
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let app = test_app().await;
        let resp = app.send("GET", "/health", None, None).await;
        assert!(resp.headers().contains_key("x-request-id"));
    }

    #[test]
    fn wildcard_origin_list_allows_any() {
        // Constructing the layer must not panic for either form
        let _ = cors_layer(&["*".to_string()]);
        let _ = cors_layer(&["http://localhost:5173".to_string()]);
    }
}
