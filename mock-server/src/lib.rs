//! In-memory stand-in for the cinema booking API.
//!
//! Every route requires the `X-Client-Token` header. Routes behind a user
//! session additionally require `Authorization: Bearer <token>`, where the
//! token was issued by `POST /user-tokens`. Replies use the API envelope
//! `{"data": ...}`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const CLIENT_TOKEN_HEADER: &str = "x-client-token";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Chain {
    pub id: String,
    pub name: String,
    pub maximum_number_of_tickets: u32,
    pub introduction_instructions: String,
    pub how_to_redeem: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TicketType {
    pub id: String,
    pub chain_id: String,
    pub name: String,
    pub price: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub transaction_id: String,
    pub redirect_url: String,
    pub status: String,
    pub items: Value,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
}

#[derive(Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub name: String,
}

#[derive(Deserialize)]
pub struct CreateUserToken {
    pub email: String,
}

#[derive(Default)]
pub struct AppState {
    orders: RwLock<HashMap<String, Order>>,
    users: RwLock<HashMap<String, User>>,
    tokens: RwLock<HashMap<String, String>>,
    requests: AtomicUsize,
}

impl AppState {
    /// Number of requests received so far, rejected ones included.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Register a user and return a bearer token for them.
    pub async fn issue_token(&self, email: &str, name: &str) -> String {
        let user = User {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            name: name.to_string(),
        };
        let token = Uuid::new_v4().to_string();
        self.tokens.write().await.insert(token.clone(), user.id.clone());
        self.users.write().await.insert(user.id.clone(), user);
        token
    }
}

pub type Shared = Arc<AppState>;

pub fn chains() -> Vec<Chain> {
    (0..2)
        .map(|i| Chain {
            id: format!("chain-{i}"),
            name: format!("Chain {i}"),
            maximum_number_of_tickets: 100 + i,
            introduction_instructions: format!("Show voucher {i} at the counter"),
            how_to_redeem: format!("Redeem online with code {i}"),
        })
        .collect()
}

pub fn app() -> Router {
    app_with_state(Arc::new(AppState::default()))
}

pub fn app_with_state(state: Shared) -> Router {
    Router::new()
        .route("/chains", get(list_chains))
        .route("/chains/{id}/ticket-types", get(list_ticket_types))
        .route("/terms-conditions", get(terms_conditions))
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/{id}", get(get_order).patch(complete_order))
        .route("/users", post(create_user))
        .route("/users/me", get(current_user))
        .route("/user-tokens", post(create_user_token))
        .layer(middleware::from_fn_with_state(state.clone(), require_client_token))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_state(listener, Arc::new(AppState::default())).await
}

pub async fn run_with_state(listener: TcpListener, state: Shared) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

async fn require_client_token(State(state): State<Shared>, request: Request, next: Next) -> Result<Response, StatusCode> {
    state.requests.fetch_add(1, Ordering::SeqCst);
    let present = request
        .headers()
        .get(CLIENT_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| !v.is_empty());
    if !present {
        tracing::debug!(uri = %request.uri(), "missing client token");
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(next.run(request).await)
}

/// Resolve the bearer token to a user id.
async fn session_user(state: &AppState, headers: &HeaderMap) -> Result<String, StatusCode> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(StatusCode::UNAUTHORIZED)?;
    state
        .tokens
        .read()
        .await
        .get(token)
        .cloned()
        .ok_or(StatusCode::UNAUTHORIZED)
}

async fn list_chains(State(state): State<Shared>, headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    session_user(&state, &headers).await?;
    Ok(Json(json!({ "data": chains() })))
}

async fn list_ticket_types(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    session_user(&state, &headers).await?;
    if !chains().iter().any(|chain| chain.id == id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let ticket_types = vec![
        TicketType {
            id: format!("{id}-adult"),
            chain_id: id.clone(),
            name: "Adult".to_string(),
            price: 9.5,
        },
        TicketType {
            id: format!("{id}-child"),
            chain_id: id,
            name: "Child".to_string(),
            price: 6.0,
        },
    ];
    Ok(Json(json!({ "meta": { "count": ticket_types.len() }, "data": ticket_types })))
}

async fn terms_conditions() -> Json<Value> {
    Json(json!({ "data": { "id": "terms-1", "text": "Vouchers are non-refundable." } }))
}

async fn create_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(items): Json<Value>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    session_user(&state, &headers).await?;
    let order = Order {
        order_id: Uuid::new_v4().to_string(),
        transaction_id: Uuid::new_v4().to_string(),
        redirect_url: "https://payments.example.test/checkout".to_string(),
        status: "pending".to_string(),
        items,
    };
    let body = json!({
        "data": {
            "order_id": order.order_id,
            "transaction_id": order.transaction_id,
            "redirect_url": order.redirect_url,
        }
    });
    state.orders.write().await.insert(order.order_id.clone(), order);
    Ok((StatusCode::CREATED, Json(body)))
}

async fn list_orders(State(state): State<Shared>, headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    session_user(&state, &headers).await?;
    let orders: Vec<Order> = state.orders.read().await.values().cloned().collect();
    Ok(Json(json!({ "data": orders })))
}

async fn get_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    session_user(&state, &headers).await?;
    let orders = state.orders.read().await;
    let order = orders.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(json!({ "data": order })))
}

async fn complete_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    session_user(&state, &headers).await?;
    let mut orders = state.orders.write().await;
    let order = orders.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    order.status = "completed".to_string();
    Ok(Json(json!({ "data": { "order_id": order.order_id, "status": order.status } })))
}

async fn create_user(State(state): State<Shared>, Json(input): Json<CreateUser>) -> (StatusCode, Json<Value>) {
    let user = User {
        id: Uuid::new_v4().to_string(),
        email: input.email,
        name: input.name,
    };
    state.users.write().await.insert(user.id.clone(), user.clone());
    (StatusCode::CREATED, Json(json!({ "data": user })))
}

async fn current_user(State(state): State<Shared>, headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    let user_id = session_user(&state, &headers).await?;
    let users = state.users.read().await;
    let user = users.get(&user_id).ok_or(StatusCode::UNAUTHORIZED)?;
    Ok(Json(json!({ "data": user })))
}

async fn create_user_token(
    State(state): State<Shared>,
    Json(input): Json<CreateUserToken>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let user_id = state
        .users
        .read()
        .await
        .values()
        .find(|user| user.email == input.email)
        .map(|user| user.id.clone())
        .ok_or(StatusCode::UNAUTHORIZED)?;
    let token = Uuid::new_v4().to_string();
    state.tokens.write().await.insert(token.clone(), user_id);
    Ok((StatusCode::CREATED, Json(json!({ "data": { "token": token } }))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_serializes_with_api_field_names() {
        let json = serde_json::to_value(&chains()[0]).unwrap();
        assert_eq!(json["id"], "chain-0");
        assert_eq!(json["maximum_number_of_tickets"], 100);
        assert!(json["introduction_instructions"].is_string());
        assert!(json["how_to_redeem"].is_string());
    }

    #[test]
    fn create_user_rejects_missing_email() {
        let result: Result<CreateUser, _> = serde_json::from_str(r#"{"name":"Ann"}"#);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn issued_token_resolves_to_user() {
        let state = AppState::default();
        let token = state.issue_token("ann@example.test", "Ann").await;

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, format!("Bearer {token}").parse().unwrap());
        let user_id = session_user(&state, &headers).await.unwrap();
        assert_eq!(state.users.read().await[&user_id].email, "ann@example.test");
    }

    #[tokio::test]
    async fn unknown_bearer_is_unauthorized() {
        let state = AppState::default();
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer nope".parse().unwrap());
        assert_eq!(session_user(&state, &headers).await.unwrap_err(), StatusCode::UNAUTHORIZED);
    }
}
