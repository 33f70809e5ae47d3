// Route table
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    close_offer, dashboard_events, get_dashboard, health_check, open_bulk_offer,
    open_single_offer, reset, select_all, send_offer, set_filter, sign_in, sign_up,
    toggle_selection, upload,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/auth/signup", post(sign_up))
        .route("/auth/signin", post(sign_in))
        .route("/auth/logout", post(reset))
        .route("/reset", post(reset))
        .route(
            "/uploads",
            post(upload).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/events", get(dashboard_events))
        .route("/dashboard/filter", put(set_filter))
        .route("/dashboard/selection/all", post(select_all))
        .route("/dashboard/selection/:id/toggle", post(toggle_selection))
        .route("/offers", delete(close_offer))
        .route("/offers/bulk", post(open_bulk_offer))
        .route("/offers/single/:id", post(open_single_offer))
        .route("/offers/send", post(send_offer))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::auth_service::AuthService;
    use crate::application::dashboard_service::DashboardService;
    use crate::application::dashboard_service::tests::StubAnalyzer;
    use crate::application::sales_analyzer::SalesAnalyzer;
    use crate::domain::dashboard::tests::sample_data;
    use crate::infrastructure::credential_store::MemoryCredentialStore;
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use std::sync::atomic::Ordering;
    use std::time::Duration;
    use tower::ServiceExt;

    const BOUNDARY: &str = "X-SALES-BOUNDARY";

    fn app(analyzer: Arc<dyn SalesAnalyzer>) -> Router {
        let state = Arc::new(AppState {
            auth_service: AuthService::new(Arc::new(MemoryCredentialStore::default()), Duration::ZERO),
            dashboard_service: DashboardService::new(analyzer, Duration::from_millis(3000)),
        });
        build_router(state, 1024 * 1024)
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        send(app, request.body(body).unwrap()).await
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    fn multipart(file_name: &str, content_type: &str, content: &str) -> Request<Body> {
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\nContent-Type: {t}\r\n\r\n{c}\r\n--{b}--\r\n",
            b = BOUNDARY,
            f = file_name,
            t = content_type,
            c = content
        );
        Request::builder()
            .method(Method::POST)
            .uri("/uploads")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn signed_up(app: &Router) {
        let (status, _) = call(
            app,
            Method::POST,
            "/auth/signup",
            Some(json!({ "name": "A", "email": "a@x.com", "password": "123456" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = app(Arc::new(StubAnalyzer::ok(sample_data())));
        let response = app
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_sign_up_sign_in_scenario() {
        let app = app(Arc::new(StubAnalyzer::ok(sample_data())));
        signed_up(&app).await;
        call(&app, Method::POST, "/auth/logout", None).await;

        let (status, body) = call(
            &app,
            Method::POST,
            "/auth/signin",
            Some(json!({ "email": "a@x.com", "password": "wrong1" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid email or password");

        let (status, body) = call(
            &app,
            Method::POST,
            "/auth/signin",
            Some(json!({ "email": "a@x.com", "password": "123456" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["name"], "A");
        assert_eq!(body["dashboard"]["phase"]["name"], "awaitingUpload");
    }

    #[tokio::test]
    async fn test_sign_up_while_signed_in_keeps_account() {
        let app = app(Arc::new(StubAnalyzer::ok(sample_data())));
        signed_up(&app).await;

        let (status, _) = call(
            &app,
            Method::POST,
            "/auth/signup",
            Some(json!({ "name": "B", "email": "b@x.com", "password": "654321" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        call(&app, Method::POST, "/auth/logout", None).await;
        let (status, body) = call(
            &app,
            Method::POST,
            "/auth/signin",
            Some(json!({ "email": "a@x.com", "password": "123456" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["name"], "A");
    }

    #[tokio::test]
    async fn test_csv_upload_with_minimal_reply() {
        let mut data = sample_data();
        data.daily_sales.clear();
        data.top_categories.clear();
        data.top_customers.clear();
        let app = app(Arc::new(StubAnalyzer::ok(data)));
        signed_up(&app).await;

        let (status, view) = send(&app, multipart("sales.csv", "text/csv", "id,total\nC1,10")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["phase"]["name"], "ready");
        assert_eq!(view["cards"][0]["value"], 1);
        assert_eq!(view["cards"][1]["value"], 2);
        assert_eq!(view["cards"][2]["value"], 3);
        assert_eq!(view["dailySales"], json!([]));
        assert_eq!(view["topCategories"], json!([]));
        assert_eq!(view["customers"], json!([]));
    }

    #[tokio::test]
    async fn test_png_upload_is_rejected_locally() {
        let analyzer = Arc::new(StubAnalyzer::ok(sample_data()));
        let app = app(analyzer.clone());
        signed_up(&app).await;

        let (status, body) = send(&app, multipart("logo.png", "image/png", "PNG")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Unsupported file type"));
        assert_eq!(analyzer.calls.load(Ordering::SeqCst), 0);

        let (_, view) = call(&app, Method::GET, "/dashboard", None).await;
        assert_eq!(view["phase"]["name"], "awaitingUpload");
    }

    #[tokio::test]
    async fn test_incomplete_reply_returns_bad_gateway() {
        let app = app(Arc::new(StubAnalyzer::missing_field("dailySales")));
        signed_up(&app).await;

        let (status, body) = send(&app, multipart("sales.json", "application/json", "{}")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"].as_str().unwrap().contains("dailySales"));

        let (_, view) = call(&app, Method::GET, "/dashboard", None).await;
        assert_eq!(view["phase"]["name"], "awaitingUpload");
        assert!(view["error"].as_str().unwrap().contains("dailySales"));
    }

    #[tokio::test]
    async fn test_upload_before_login_conflicts() {
        let app = app(Arc::new(StubAnalyzer::ok(sample_data())));
        let (status, _) = send(&app, multipart("sales.csv", "text/csv", "a")).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_selection_cleared_by_filter() {
        let app = app(Arc::new(StubAnalyzer::ok(sample_data())));
        signed_up(&app).await;
        send(&app, multipart("sales.txt", "text/plain", "data")).await;

        call(&app, Method::POST, "/dashboard/selection/C2/toggle", None).await;
        let (_, view) = call(&app, Method::POST, "/dashboard/selection/C3/toggle", None).await;
        assert_eq!(view["selectedCount"], 2);

        let (status, view) = call(
            &app,
            Method::PUT,
            "/dashboard/filter",
            Some(json!({ "filter": "premium" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["selectedCount"], 0);
        assert_eq!(view["customers"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_offer_flow() {
        let app = app(Arc::new(StubAnalyzer::ok(sample_data())));
        signed_up(&app).await;
        send(&app, multipart("sales.csv", "text/csv", "data")).await;

        let (status, _) = call(&app, Method::POST, "/offers/bulk", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, view) = call(&app, Method::POST, "/dashboard/selection/all", None).await;
        assert_eq!(view["allSelected"], true);

        let (_, view) = call(&app, Method::POST, "/offers/bulk", None).await;
        assert_eq!(view["offer"]["recipients"].as_array().unwrap().len(), 4);

        let (status, view) = call(
            &app,
            Method::POST,
            "/offers/send",
            Some(json!({ "message": "Weekend deal", "channel": "whatsapp" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["offer"], Value::Null);
        assert_eq!(view["selectedCount"], 0);
        assert_eq!(view["notice"]["message"], "Offer sent to 4 customer(s) via WHATSAPP!");

        let (status, _) = call(&app, Method::DELETE, "/offers", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_reset_logs_out() {
        let app = app(Arc::new(StubAnalyzer::ok(sample_data())));
        signed_up(&app).await;
        send(&app, multipart("sales.csv", "text/csv", "data")).await;

        let (status, view) = call(&app, Method::POST, "/reset", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["phase"]["name"], "unauthenticated");
        assert_eq!(view["cards"], json!([]));
    }
}
