// src/routes/orders.rs

use actix_web::dev::HttpServiceFactory;
use actix_web::{get, post, web, HttpResponse, Responder};
use chrono::Utc;
use serde::Deserialize;

use crate::middleware::session::{SessionBinder, SessionId};
use crate::services::catalog::Catalog;
use crate::services::order_flow;
use crate::services::pin::PinStore;
use crate::services::session::{Order, PendingOrder, SessionStore};
use crate::utils::errors::OrderError;
use crate::utils::types::ApiResponse;

#[derive(Debug, Deserialize)]
pub struct ConfirmParams {
    pub symbol: String,
    /// Literal units string as typed; decimal-place validation runs on it.
    pub units: String,
    pub market_price: f64,
}

#[derive(Debug, Deserialize)]
pub struct AuthorizeParams {
    pub pin: String,
}

fn order_error(e: OrderError) -> HttpResponse {
    let body = ApiResponse::<()> {
        success: false,
        message: Some(e.to_string()),
        data: None,
    };
    match e {
        OrderError::UnknownSymbol(_) | OrderError::NoPendingOrder => {
            HttpResponse::NotFound().json(body)
        }
        OrderError::PinMismatch => HttpResponse::Unauthorized().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

#[post("/confirm")]
pub async fn confirm(
    session_id: SessionId,
    params: web::Json<ConfirmParams>,
    catalog: web::Data<Catalog>,
    sessions: web::Data<SessionStore>,
) -> impl Responder {
    let staged = sessions.with(session_id.0, |s| {
        order_flow::start_purchase(&catalog, s, &params.symbol, &params.units, params.market_price)
    });

    match staged {
        Ok(staged_order) => HttpResponse::Ok().json(ApiResponse::<PendingOrder> {
            success: true,
            message: Some("Order staged, awaiting PIN".to_string()),
            data: Some(staged_order),
        }),
        Err(e) => order_error(e),
    }
}

#[get("/pending")]
pub async fn pending(session_id: SessionId, sessions: web::Data<SessionStore>) -> impl Responder {
    match sessions.with(session_id.0, |s| s.pending.clone()) {
        Some(p) => HttpResponse::Ok().json(ApiResponse::<PendingOrder> {
            success: true,
            message: None,
            data: Some(p),
        }),
        None => order_error(OrderError::NoPendingOrder),
    }
}

#[post("/authorize")]
pub async fn authorize(
    session_id: SessionId,
    params: web::Json<AuthorizeParams>,
    catalog: web::Data<Catalog>,
    sessions: web::Data<SessionStore>,
    pins: web::Data<PinStore>,
) -> impl Responder {
    let committed = sessions.with(session_id.0, |s| {
        order_flow::authorize_purchase(s, &pins, &params.pin, Utc::now())
    });

    match committed {
        Ok(order) => {
            let name = catalog
                .get(&order.symbol)
                .map(|a| a.name.clone())
                .unwrap_or_else(|| order.symbol.clone());
            HttpResponse::Ok().json(ApiResponse::<Order> {
                success: true,
                message: Some(format!("Buy order placed for {} ({})", name, order.symbol)),
                data: Some(order),
            })
        }
        Err(e) => order_error(e),
    }
}

#[get("")]
pub async fn list(session_id: SessionId, sessions: web::Data<SessionStore>) -> impl Responder {
    let orders = sessions.with(session_id.0, |s| s.orders_recent_first());
    HttpResponse::Ok().json(ApiResponse::<Vec<Order>> {
        success: true,
        message: None,
        data: Some(orders),
    })
}

pub fn orders_scope() -> impl HttpServiceFactory {
    web::scope("/api/orders")
        .wrap(SessionBinder)
        .service(confirm)
        .service(pending)
        .service(authorize)
        .service(list)
}
