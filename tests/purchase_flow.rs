// tests/purchase_flow.rs
use actix_web::cookie::Cookie;
use actix_web::{test, web, App};
use serde_json::{json, Value};
use sqlx::SqlitePool;

use coinsim_backend::middleware::session::SESSION_COOKIE;
use coinsim_backend::routes::orders::orders_scope;
use coinsim_backend::routes::market::market_scope;
use coinsim_backend::services::{catalog::Catalog, pin::PinStore, session::SessionStore};

macro_rules! test_app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(Catalog::standard()))
                .app_data(web::Data::new(SessionStore::new()))
                .app_data(web::Data::new(PinStore::new("1111")))
                .app_data(web::Data::new(Option::<SqlitePool>::None))
                .service(market_scope())
                .service(orders_scope()),
        )
        .await
    };
}

fn session_cookie(resp: &actix_web::dev::ServiceResponse) -> Cookie<'static> {
    resp.response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .expect("session cookie set on first touch")
        .into_owned()
}

#[actix_rt::test]
async fn full_purchase_flow_commits_exactly_one_order() {
    let app = test_app!();

    // CONFIRMING → AWAITING_PIN
    let req = test::TestRequest::post()
        .uri("/api/orders/confirm")
        .set_json(json!({"symbol": "BTC", "units": "2.00", "market_price": 94245.50}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let cookie = session_cookie(&resp);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["total_cost"].as_f64().unwrap(), 188_491.0);

    // Wrong PIN: 401, pending order survives for a retry.
    let req = test::TestRequest::post()
        .uri("/api/orders/authorize")
        .cookie(cookie.clone())
        .set_json(json!({"pin": "9999"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let req = test::TestRequest::get()
        .uri("/api/orders/pending")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    // Correct PIN commits.
    let req = test::TestRequest::post()
        .uri("/api/orders/authorize")
        .cookie(cookie.clone())
        .set_json(json!({"pin": "1111"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["symbol"], "BTC");
    assert_eq!(body["data"]["units"].as_f64().unwrap(), 2.0);
    assert_eq!(body["data"]["price"].as_f64().unwrap(), 94_245.50);

    // Replay after commit: the pending order is gone.
    let req = test::TestRequest::post()
        .uri("/api/orders/authorize")
        .cookie(cookie.clone())
        .set_json(json!({"pin": "1111"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    // Exactly one ledger entry.
    let req = test::TestRequest::get()
        .uri("/api/orders")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    let orders = body["data"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["symbol"], "BTC");
}

#[actix_rt::test]
async fn confirm_rejects_bad_units_and_unknown_symbols() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/orders/confirm")
        .set_json(json!({"symbol": "BTC", "units": "10.123", "market_price": 100.0}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].as_str().unwrap().contains("decimal places"));

    let req = test::TestRequest::post()
        .uri("/api/orders/confirm")
        .set_json(json!({"symbol": "BTC", "units": "0.5", "market_price": 100.0}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].as_str().unwrap().contains("at least 1.00"));

    let req = test::TestRequest::post()
        .uri("/api/orders/confirm")
        .set_json(json!({"symbol": "ZZZ", "units": "2.00", "market_price": 100.0}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_rt::test]
async fn malformed_pin_is_rejected_before_comparison() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/orders/confirm")
        .set_json(json!({"symbol": "ETH", "units": "3.00", "market_price": 6015.0}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let cookie = session_cookie(&resp);

    let req = test::TestRequest::post()
        .uri("/api/orders/authorize")
        .cookie(cookie.clone())
        .set_json(json!({"pin": "12ab"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].as_str().unwrap().contains("4 digits"));

    // The pending order is still there.
    let req = test::TestRequest::get()
        .uri("/api/orders/pending")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
}

#[actix_rt::test]
async fn authorize_without_pending_is_not_found() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/orders/authorize")
        .set_json(json!({"pin": "1111"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].as_str().unwrap().contains("No pending order"));
}

#[actix_rt::test]
async fn committed_orders_show_up_in_holdings() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/orders/confirm")
        .set_json(json!({"symbol": "BTC", "units": "2.00", "market_price": 94245.50}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let cookie = session_cookie(&resp);

    let req = test::TestRequest::post()
        .uri("/api/orders/authorize")
        .cookie(cookie.clone())
        .set_json(json!({"pin": "1111"}))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/api/market/quotes")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    let quotes = body["data"].as_array().unwrap();
    let btc = quotes.iter().find(|q| q["symbol"] == "BTC").unwrap();
    // 2.5 initial + 2.00 committed
    assert_eq!(btc["quantity"].as_f64().unwrap(), 4.5);
}

#[actix_rt::test]
async fn sessions_do_not_share_ledgers() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/orders/confirm")
        .set_json(json!({"symbol": "BTC", "units": "2.00", "market_price": 100.0}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let cookie = session_cookie(&resp);

    let req = test::TestRequest::post()
        .uri("/api/orders/authorize")
        .cookie(cookie)
        .set_json(json!({"pin": "1111"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    // A request without the cookie is a fresh session: empty ledger.
    let req = test::TestRequest::get().uri("/api/orders").to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}
