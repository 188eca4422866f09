//! Axum router and all HTTP handlers for wst-daemon.
//!
//! `build_router` is the single entry point; `main.rs` calls it and attaches
//! middleware layers. Handlers are thin: parse, call `OrderAdmin`, map the
//! outcome to a status code and envelope.

use std::{convert::Infallible, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, put},
    Json, Router,
};
use futures_util::{Stream, StreamExt};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::error;
use uuid::Uuid;
use wst_cart::{checkout, Cart, ProductRef};
use wst_store::{AdminError, ListParams, StatusUpdate};

use crate::{
    api_types::{
        ApiData, ApiError, CheckoutItem, CheckoutRequest, HealthResponse, ListOrdersQuery, MyOrdersData,
        MyOrdersQuery, StatusConflictResponse, StatusRejectedResponse, StatusUpdatedResponse,
        StatusesData, UpdateStatusRequest,
    },
    state::{AppState, BusMsg},
};

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the complete application router wired to the given shared state.
///
/// Middleware layers (CORS, tracing) are **not** applied here; `main.rs`
/// attaches them after this call so tests can use the bare router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/health", get(health))
        .route("/v1/stream", get(stream))
        .route("/v1/orders", get(my_orders).post(place_order))
        .route("/v1/admin/orders", get(list_orders))
        .route("/v1/admin/orders/:id", get(get_order))
        .route("/v1/admin/orders/:id/status", put(update_order_status))
        .route("/v1/admin/statuses", get(list_statuses))
        .route("/v1/admin/stats/orders", get(order_stats))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn bad_request(msg: impl Into<String>) -> Response {
    (StatusCode::BAD_REQUEST, Json(ApiError::new(msg))).into_response()
}

fn parse_order_id(raw: &str) -> Result<Uuid, Response> {
    Uuid::parse_str(raw.trim()).map_err(|_| bad_request("Invalid order id"))
}

/// Lenient integer parse: anything unparsable (or zero) means "use the default".
fn parse_positive(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|n| *n > 0)
}

/// Map an `AdminError` to a response. Store internals are logged, never
/// returned to the client.
fn admin_failure(e: AdminError, action: &str) -> Response {
    match e {
        AdminError::MissingStatus | AdminError::MissingEmail => bad_request(e.to_string()),
        AdminError::NotFound(_) => {
            (StatusCode::NOT_FOUND, Json(ApiError::new(e.to_string()))).into_response()
        }
        AdminError::Conflict { current_status, .. } => (
            StatusCode::CONFLICT,
            Json(StatusConflictResponse {
                success: false,
                error: e.to_string(),
                current_status,
                allowed_next_status: current_status.next(),
            }),
        )
            .into_response(),
        AdminError::Store(inner) => {
            error!(error = %inner, action, "order store failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new(format!("Failed to {action}"))),
            )
                .into_response()
        }
    }
}

// ---------------------------------------------------------------------------
// GET /v1/health
// ---------------------------------------------------------------------------

pub(crate) async fn health(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            ok: true,
            service: st.build.service,
            version: st.build.version,
        }),
    )
}

// ---------------------------------------------------------------------------
// GET /v1/admin/orders
// ---------------------------------------------------------------------------

pub(crate) async fn list_orders(
    State(st): State<Arc<AppState>>,
    Query(q): Query<ListOrdersQuery>,
) -> Response {
    let params = ListParams {
        status: q.status,
        email: q.email,
        page: parse_positive(q.page.as_deref()),
        limit: parse_positive(q.limit.as_deref()),
    };
    match st.admin.list(&params) {
        Ok(page) => (StatusCode::OK, Json(ApiData::ok(page))).into_response(),
        Err(e) => admin_failure(e, "fetch orders"),
    }
}

// ---------------------------------------------------------------------------
// GET /v1/admin/orders/:id
// ---------------------------------------------------------------------------

pub(crate) async fn get_order(
    State(st): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Response {
    let id = match parse_order_id(&raw_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match st.admin.get(id) {
        Ok(order) => (StatusCode::OK, Json(ApiData::ok(order))).into_response(),
        Err(e) => admin_failure(e, "fetch order"),
    }
}

// ---------------------------------------------------------------------------
// PUT /v1/admin/orders/:id/status
// ---------------------------------------------------------------------------

/// Advance an order's status.
///
/// - 400 when the body has no `status` or the lifecycle refuses the move
///   (the body then carries `currentStatus` and `allowedNextStatus`).
/// - 404 unknown order, 409 lost a concurrent update.
/// - 200 for an applied change or a no-op (`changed: false`).
pub(crate) async fn update_order_status(
    State(st): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    body: Option<Json<UpdateStatusRequest>>,
) -> Response {
    let id = match parse_order_id(&raw_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let requested = body
        .and_then(|Json(b)| b.status)
        .unwrap_or_default();

    let update = match st.admin.update_status(id, &requested) {
        Ok(u) => u,
        Err(e) => return admin_failure(e, "update order status"),
    };

    match update {
        StatusUpdate::Applied {
            order,
            from,
            message,
        } => {
            let _ = st.bus.send(BusMsg::StatusChanged {
                order_id: order.id,
                from,
                to: order.status,
            });
            (
                StatusCode::OK,
                Json(StatusUpdatedResponse {
                    success: true,
                    message,
                    changed: true,
                    data: order,
                }),
            )
                .into_response()
        }
        StatusUpdate::NoOp { order, message } => (
            StatusCode::OK,
            Json(StatusUpdatedResponse {
                success: true,
                message,
                changed: false,
                data: order,
            }),
        )
            .into_response(),
        StatusUpdate::Rejected {
            message,
            current_status,
            allowed_next_status,
        } => {
            let _ = st.bus.send(BusMsg::LogLine {
                level: "warn".to_string(),
                msg: format!("order {id}: {message}"),
            });
            (
                StatusCode::BAD_REQUEST,
                Json(StatusRejectedResponse {
                    success: false,
                    error: message,
                    current_status,
                    allowed_next_status,
                }),
            )
                .into_response()
        }
    }
}

// ---------------------------------------------------------------------------
// GET /v1/admin/statuses
// ---------------------------------------------------------------------------

pub(crate) async fn list_statuses(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ApiData::ok(StatusesData {
            statuses: st.admin.statuses(),
        })),
    )
}

// ---------------------------------------------------------------------------
// GET /v1/admin/stats/orders
// ---------------------------------------------------------------------------

pub(crate) async fn order_stats(State(st): State<Arc<AppState>>) -> Response {
    match st.admin.stats() {
        Ok(stats) => (StatusCode::OK, Json(ApiData::ok(stats))).into_response(),
        Err(e) => admin_failure(e, "fetch stats"),
    }
}

// ---------------------------------------------------------------------------
// POST /v1/orders  (checkout)
// ---------------------------------------------------------------------------

pub(crate) async fn place_order(
    State(st): State<Arc<AppState>>,
    Json(req): Json<CheckoutRequest>,
) -> Response {
    let cart = match cart_from_items(req.items) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let quote = st.discount.quote(req.coupon.as_deref(), cart.total_price);
    let draft = match checkout(&cart, &quote, req.email.as_deref()) {
        Ok(d) => d,
        Err(e) => return bad_request(format!("Cannot place order: {e}")),
    };

    match st.admin.place_order(draft) {
        Ok(order) => {
            let _ = st.bus.send(BusMsg::OrderPlaced {
                order_id: order.id,
                total_price: order.total_price,
            });
            (StatusCode::CREATED, Json(ApiData::ok(order))).into_response()
        }
        Err(e) => admin_failure(e, "place order"),
    }
}

/// Rebuild a cart from submitted lines. Repeated product ids accumulate;
/// zero-quantity lines are skipped.
fn cart_from_items(items: Vec<CheckoutItem>) -> Result<Cart, Response> {
    let mut cart = Cart::new();
    for item in items {
        if item.qty == 0 {
            continue;
        }
        if item.price.raw() < 0 {
            return Err(bad_request(format!(
                "Invalid price for product {}",
                item.product_id
            )));
        }
        let already = cart.items.get(&item.product_id).map_or(0, |l| l.qty);
        let mut product = ProductRef::new(item.product_id.clone(), item.name, item.price);
        if let Some(image) = item.image {
            product.image = image;
        }
        cart.add(product)
            .map_err(|e| bad_request(format!("Invalid cart: {e}")))?;
        cart.update(&item.product_id, i64::from(already) + i64::from(item.qty))
            .map_err(|e| bad_request(format!("Invalid cart: {e}")))?;
    }
    Ok(cart)
}

// ---------------------------------------------------------------------------
// GET /v1/orders?email=  (customer history)
// ---------------------------------------------------------------------------

pub(crate) async fn my_orders(
    State(st): State<Arc<AppState>>,
    Query(q): Query<MyOrdersQuery>,
) -> Response {
    let email = q.email.unwrap_or_default();
    match st.admin.orders_for_email(&email) {
        Ok(orders) => (
            StatusCode::OK,
            Json(ApiData::ok(MyOrdersData {
                email: email.trim().to_lowercase(),
                orders,
            })),
        )
            .into_response(),
        Err(e) => admin_failure(e, "search orders"),
    }
}

// ---------------------------------------------------------------------------
// GET /v1/stream  (SSE)
// ---------------------------------------------------------------------------

pub(crate) async fn stream(State(st): State<Arc<AppState>>) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert("Cache-Control", HeaderValue::from_static("no-cache"));
    headers.insert("Connection", HeaderValue::from_static("keep-alive"));

    let rx = st.bus.subscribe();
    let events = broadcast_to_sse(rx);

    (headers, Sse::new(events).keep_alive(KeepAlive::new())).into_response()
}

fn broadcast_to_sse(
    rx: broadcast::Receiver<BusMsg>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    BroadcastStream::new(rx).filter_map(|msg| async move {
        match msg {
            Ok(m) => {
                let event_name = match &m {
                    BusMsg::Heartbeat { .. } => "heartbeat",
                    BusMsg::OrderPlaced { .. } => "order_placed",
                    BusMsg::StatusChanged { .. } => "status_changed",
                    BusMsg::LogLine { .. } => "log",
                };
                let data = serde_json::to_string(&m).ok()?;
                Some(Ok(Event::default().event(event_name).data(data)))
            }
            Err(_) => None, // lagged / closed
        }
    })
}
