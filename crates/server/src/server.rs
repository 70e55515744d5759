use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use engine::{Engine, RateTable, users};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tokio::sync::RwLock;

use std::sync::Arc;

use crate::{accounts, budgets, categories, goals, rates, statistics, transactions};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
    /// Latest rate snapshot, replaced wholesale by the rate feed.
    pub rates: Arc<RwLock<Option<RateTable>>>,
}

async fn auth(
    auth_header: TypedHeader<Authorization<Basic>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user: Option<users::Model> = users::Entity::find()
        .filter(users::Column::Username.eq(auth_header.username()))
        .filter(users::Column::Password.eq(auth_header.password()))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let Some(user) = user else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/accounts", get(accounts::list).post(accounts::create))
        .route("/accounts/{id}", axum::routing::patch(accounts::update))
        .route(
            "/categories",
            get(categories::list).post(categories::create),
        )
        .route("/categories/{id}", axum::routing::patch(categories::update))
        .route("/transactions", get(transactions::list))
        .route("/income", post(transactions::income_new))
        .route("/expense", post(transactions::expense_new))
        .route("/transfer", post(transactions::transfer_new))
        .route(
            "/transactions/{id}",
            axum::routing::patch(transactions::update),
        )
        .route("/transactions/{id}/void", post(transactions::void_tx))
        .route("/budgets", get(budgets::list).post(budgets::create))
        .route(
            "/budgets/{id}",
            axum::routing::patch(budgets::update).delete(budgets::remove),
        )
        .route("/goals", get(goals::list).post(goals::create))
        .route("/goals/{id}", axum::routing::patch(goals::update))
        .route("/stats", get(statistics::get_stats))
        .route("/rates", get(rates::get))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(state, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, header};
    use base64::Engine as _;
    use chrono::Utc;
    use http_body_util::BodyExt;
    use migration::MigratorTrait;
    use sea_orm::{ConnectionTrait, Database, Statement};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn test_state(rates: Option<RateTable>) -> ServerState {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let backend = db.get_database_backend();
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password) VALUES (?, ?)",
            vec!["alice".into(), "password".into()],
        ))
        .await
        .unwrap();

        let engine = Engine::builder().database(db.clone()).build().await.unwrap();
        ServerState {
            engine: Arc::new(engine),
            db,
            rates: Arc::new(RwLock::new(rates)),
        }
    }

    fn basic_auth(username: &str, password: &str) -> String {
        let token =
            base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
        format!("Basic {token}")
    }

    async fn send(
        state: &ServerState,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = HttpRequest::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, basic_auth("alice", "password"));

        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = router(state.clone())
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    #[tokio::test]
    async fn wrong_credentials_are_rejected() {
        let state = test_state(None).await;

        let response = router(state.clone())
            .oneshot(
                HttpRequest::builder()
                    .method("GET")
                    .uri("/accounts")
                    .header(header::AUTHORIZATION, basic_auth("alice", "nope"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn account_create_and_list() {
        let state = test_state(None).await;

        let (status, created) = send(
            &state,
            "POST",
            "/accounts",
            Some(json!({"name": "Checking", "currency": "EUR", "opening_minor": 1000})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(created["id"].is_string());

        let (status, body) = send(&state, "GET", "/accounts", None).await;
        assert_eq!(status, StatusCode::OK);
        let accounts = body["accounts"].as_array().unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0]["name"], "Checking");
        assert_eq!(accounts[0]["currency"], "EUR");
        assert_eq!(accounts[0]["balance_minor"], 1000);

        // Same name again conflicts.
        let (status, _) = send(
            &state,
            "POST",
            "/accounts",
            Some(json!({"name": "Checking", "currency": "USD", "opening_minor": 0})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn income_moves_stats_and_transactions() {
        let state = test_state(None).await;

        let (_, created) = send(
            &state,
            "POST",
            "/accounts",
            Some(json!({"name": "Checking", "currency": "USD", "opening_minor": 0})),
        )
        .await;
        let account_id = created["id"].as_str().unwrap().to_string();

        let (status, _) = send(
            &state,
            "POST",
            "/income",
            Some(json!({
                "account_id": account_id,
                "amount_minor": 12_50,
                "category_id": null,
                "note": "salary",
                "occurred_at": Utc::now().to_rfc3339(),
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            &state,
            "GET",
            "/transactions",
            Some(json!({"account_id": account_id})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let txs = body["transactions"].as_array().unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0]["amount_minor"], 1250);
        assert_eq!(txs[0]["kind"], "income");

        let (status, body) = send(&state, "GET", "/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        let totals = body["totals"].as_array().unwrap();
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0]["currency"], "USD");
        assert_eq!(totals[0]["balance_minor"], 1250);
        assert_eq!(totals[0]["total_income_minor"], 1250);
    }

    #[tokio::test]
    async fn cross_currency_transfer_is_unprocessable() {
        let state = test_state(None).await;

        let (_, eur) = send(
            &state,
            "POST",
            "/accounts",
            Some(json!({"name": "Euro", "currency": "EUR", "opening_minor": 1000})),
        )
        .await;
        let (_, jpy) = send(
            &state,
            "POST",
            "/accounts",
            Some(json!({"name": "Yen", "currency": "JPY", "opening_minor": 1000})),
        )
        .await;

        let (status, body) = send(
            &state,
            "POST",
            "/transfer",
            Some(json!({
                "from_account_id": eur["id"],
                "to_account_id": jpy["id"],
                "amount_minor": 100,
                "note": null,
                "occurred_at": Utc::now().to_rfc3339(),
            })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("Currency mismatch"));
    }

    #[tokio::test]
    async fn rates_endpoint_serves_the_snapshot_or_404() {
        let state = test_state(None).await;
        let (status, _) = send(&state, "GET", "/rates", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let table = RateTable::new(
            engine::Currency::Usd,
            [(engine::Currency::Eur, 0.9)],
            Utc::now(),
        );
        let state = test_state(Some(table)).await;
        let (status, body) = send(&state, "GET", "/rates", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["base"], "USD");
        let entries = body["rates"].as_array().unwrap();
        assert!(
            entries
                .iter()
                .any(|entry| entry["currency"] == "EUR" && entry["rate"] == 0.9)
        );
    }

    #[tokio::test]
    async fn budgets_round_trip_with_spent() {
        let state = test_state(None).await;

        let (_, account) = send(
            &state,
            "POST",
            "/accounts",
            Some(json!({"name": "Checking", "currency": "EUR", "opening_minor": 100000})),
        )
        .await;
        let (_, category) = send(
            &state,
            "POST",
            "/categories",
            Some(json!({"name": "Groceries"})),
        )
        .await;

        let (status, _) = send(
            &state,
            "POST",
            "/budgets",
            Some(json!({
                "category_id": category["id"],
                "month": "2026-03",
                "limit_minor": 40_000,
                "currency": "EUR",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) = send(
            &state,
            "POST",
            "/expense",
            Some(json!({
                "account_id": account["id"],
                "amount_minor": 1500,
                "category_id": category["id"],
                "note": null,
                "occurred_at": "2026-03-10T12:00:00+00:00",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            &state,
            "GET",
            "/budgets",
            Some(json!({"month": "2026-03"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let budgets = body["budgets"].as_array().unwrap();
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets[0]["limit_minor"], 40_000);
        assert_eq!(budgets[0]["spent_minor"], 1500);
    }
}
