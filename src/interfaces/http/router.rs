//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{BookingService, OtpService, PaymentService};
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::modules::bookings::{self, BookingAppState};
use crate::interfaces::http::modules::health::{self, HealthState};
use crate::interfaces::http::modules::otp::{self, OtpAppState};
use crate::interfaces::http::modules::payments::{self, PaymentAppState};

/// Unified state for all routes. Axum extracts each handler's own
/// state via `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub booking_service: Arc<BookingService>,
    pub otp_service: Arc<OtpService>,
    pub payment_service: Arc<PaymentService>,
    pub db: DatabaseConnection,
    pub started_at: Arc<Instant>,
}

impl FromRef<AppState> for BookingAppState {
    fn from_ref(s: &AppState) -> Self {
        BookingAppState {
            booking_service: Arc::clone(&s.booking_service),
        }
    }
}

impl FromRef<AppState> for OtpAppState {
    fn from_ref(s: &AppState) -> Self {
        OtpAppState {
            otp_service: Arc::clone(&s.otp_service),
        }
    }
}

impl FromRef<AppState> for PaymentAppState {
    fn from_ref(s: &AppState) -> Self {
        PaymentAppState {
            payment_service: Arc::clone(&s.payment_service),
        }
    }
}

impl FromRef<AppState> for HealthState {
    fn from_ref(s: &AppState) -> Self {
        HealthState {
            db: s.db.clone(),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Bookings
        bookings::create_self_drive_booking,
        bookings::create_intercity_booking,
        bookings::get_booking,
        bookings::list_bookings,
        bookings::cancel_booking,
        bookings::check_availability,
        // OTP
        otp::verify_otp,
        otp::resend_otp,
        // Payments
        payments::create_payment_order,
        payments::verify_payment,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            // Bookings
            bookings::CreateSelfDriveRequest,
            bookings::CreateIntercityRequest,
            bookings::CancelBookingRequest,
            bookings::BookingDto,
            bookings::BookingViewDto,
            bookings::BookingDetailDto,
            bookings::SelfDriveDetailDto,
            bookings::IntercityDetailDto,
            bookings::AvailabilityDto,
            // OTP
            otp::VerifyOtpRequest,
            otp::ResendOtpRequest,
            // Payments
            payments::OrderDto,
            payments::CreateOrderResponse,
            payments::VerifyPaymentRequest,
        )
    ),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Bookings", description = "Booking creation, conflict checking and lifecycle"),
        (name = "OTP", description = "Pickup/drop handover codes"),
        (name = "Payments", description = "Gateway orders and callback verification"),
    ),
    info(
        title = "Zip Drive Booking API",
        version = "1.0.0",
        description = "Booking conflict-resolution and lifecycle engine for the Zip Drive marketplace",
        contact(name = "Zip Drive", email = "support@zipdrive.example")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    booking_service: Arc<BookingService>,
    otp_service: Arc<OtpService>,
    payment_service: Arc<PaymentService>,
    db: DatabaseConnection,
) -> Router {
    let state = AppState {
        booking_service,
        otp_service,
        payment_service,
        db,
        started_at: Arc::new(Instant::now()),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/api/v1/bookings/self-drive",
            post(bookings::create_self_drive_booking),
        )
        .route(
            "/api/v1/bookings/intercity",
            post(bookings::create_intercity_booking),
        )
        .route("/api/v1/bookings", get(bookings::list_bookings))
        .route("/api/v1/bookings/{id}", get(bookings::get_booking))
        .route("/api/v1/bookings/{id}/cancel", post(bookings::cancel_booking))
        .route("/api/v1/bookings/{id}/otp/verify", post(otp::verify_otp))
        .route("/api/v1/bookings/{id}/otp/resend", post(otp::resend_otp))
        .route(
            "/api/v1/bookings/{id}/payments/order",
            post(payments::create_payment_order),
        )
        .route(
            "/api/v1/bookings/{id}/payments/verify",
            post(payments::verify_payment),
        )
        .route(
            "/api/v1/cars/{id}/availability",
            get(bookings::check_availability),
        )
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::{Duration, Utc};
    use tower::ServiceExt;

    use crate::config::PaymentGatewayConfig;
    use crate::infrastructure::database::repositories::{
        SeaOrmDirectory, SeaOrmRepositoryProvider,
    };
    use crate::infrastructure::database::test_support::{seed_car, seed_user, test_db};
    use crate::infrastructure::email::LogNotifier;
    use crate::infrastructure::gateway::HmacPaymentGateway;

    async fn test_app() -> (Router, i32, i32) {
        let db = test_db().await;
        let host = seed_user(&db, "host@zipdrive.in", "HOST").await;
        let guest = seed_user(&db, "guest@zipdrive.in", "GUEST").await;
        let car = seed_car(&db, host, 100).await;

        let repos = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let directory = Arc::new(SeaOrmDirectory::new(db.clone()));
        let notifier = Arc::new(LogNotifier);
        let gateway = Arc::new(HmacPaymentGateway::new(PaymentGatewayConfig::default()));

        let booking_service = Arc::new(BookingService::new(
            repos.clone(),
            directory.clone(),
            notifier.clone(),
            0.18,
        ));
        let otp_service = Arc::new(OtpService::new(repos.clone(), directory, notifier));
        let payment_service = Arc::new(PaymentService::new(repos, gateway));

        let app = create_api_router(booking_service, otp_service, payment_service, db);
        (app, guest, car)
    }

    fn self_drive_body(guest: i32, car: i32) -> String {
        let start = Utc::now() + Duration::hours(24);
        let end = start + Duration::hours(4);
        format!(
            r#"{{
                "guest_id": {guest},
                "car_id": {car},
                "start_datetime": "{}",
                "end_datetime": "{}",
                "pickup_address": "MG Road, Bengaluru",
                "pickup_lat": 12.9756,
                "pickup_long": 77.6068,
                "drop_address": "MG Road, Bengaluru",
                "drop_lat": 12.9756,
                "drop_long": 77.6068,
                "insure_amount": 50
            }}"#,
            start.to_rfc3339(),
            end.to_rfc3339(),
        )
    }

    async fn post_json(app: &Router, uri: &str, body: String) -> StatusCode {
        app.clone()
            .oneshot(
                Request::post(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn health_endpoint_reports_ok() {
        let (app, _, _) = test_app().await;
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn booking_creation_and_conflict_over_http() {
        let (app, guest, car) = test_app().await;
        let body = self_drive_body(guest, car);

        let first = post_json(&app, "/api/v1/bookings/self-drive", body.clone()).await;
        assert_eq!(first, StatusCode::OK);

        let second = post_json(&app, "/api/v1/bookings/self-drive", body).await;
        assert_eq!(second, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn unknown_booking_is_404() {
        let (app, _, _) = test_app().await;
        let response = app
            .oneshot(
                Request::get("/api/v1/bookings/999")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_payload_is_422() {
        let (app, guest, car) = test_app().await;
        let body = self_drive_body(guest, car).replace("MG Road, Bengaluru", "");
        let status = post_json(&app, "/api/v1/bookings/self-drive", body).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn otp_verify_with_no_code_is_400() {
        let (app, guest, car) = test_app().await;
        post_json(&app, "/api/v1/bookings/self-drive", self_drive_body(guest, car)).await;

        let status = post_json(
            &app,
            "/api/v1/bookings/1/otp/verify",
            r#"{"otp_type":"PICKUP","code":"123456","verified_by":"GUEST"}"#.to_string(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
