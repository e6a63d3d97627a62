//! Integration tests for Souq Levant.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p souq-levant-integration-tests
//! ```
//!
//! Nothing external is needed: each test starts a fake shop API and a real
//! storefront on ephemeral ports and drives the storefront over HTTP with a
//! cookie-keeping client, the way a browser would.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use reqwest::Client;
use serde_json::{Value, json};
use souq_levant_storefront::{app, config::StorefrontConfig, state::AppState};
use tokio::net::TcpListener;

/// How the fake shop API answers `POST /api/orders`.
#[derive(Debug, Clone)]
pub enum OrderReply {
    Accept,
    Reject { status: StatusCode, body: Value },
}

#[derive(Clone)]
struct FakeShop {
    reply: OrderReply,
    orders: Arc<Mutex<Vec<Value>>>,
}

/// The fixed catalog served by the fake shop API.
#[must_use]
pub fn catalog() -> Value {
    json!([
        {"id": 1, "title": "Zaatar", "description": "Aleppo blend", "price": 1000},
        {"id": 2, "title": "Olive oil soap", "price": 500, "image_url": "https://cdn.example/soap.jpg"},
        {"id": 3, "title": "Dried apricots", "price": 750}
    ])
}

async fn list_products(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let Some(q) = params.get("q").map(|q| q.to_lowercase()) else {
        return Json(catalog());
    };

    let matches: Vec<Value> = catalog()
        .as_array()
        .into_iter()
        .flatten()
        .filter(|p| {
            p["title"]
                .as_str()
                .is_some_and(|title| title.to_lowercase().contains(&q))
        })
        .cloned()
        .collect();
    Json(Value::Array(matches))
}

async fn place_order(State(shop): State<FakeShop>, Json(order): Json<Value>) -> (StatusCode, Json<Value>) {
    if let Ok(mut orders) = shop.orders.lock() {
        orders.push(order);
    }
    match shop.reply {
        OrderReply::Accept => (StatusCode::CREATED, Json(json!({"id": 501}))),
        OrderReply::Reject { status, body } => (status, Json(body)),
    }
}

/// A running storefront wired to a fake shop API.
pub struct TestContext {
    pub client: Client,
    pub storefront_url: String,
    orders: Arc<Mutex<Vec<Value>>>,
}

impl TestContext {
    /// Start a fake shop API answering orders with `reply`, and a storefront
    /// pointed at it.
    ///
    /// # Panics
    ///
    /// Panics if a listener cannot be bound or the storefront cannot be
    /// configured.
    pub async fn start(reply: OrderReply) -> Self {
        let orders = Arc::new(Mutex::new(Vec::new()));
        let shop = FakeShop {
            reply,
            orders: orders.clone(),
        };
        let shop_router = Router::new()
            .route("/api/products", get(list_products))
            .route("/api/orders", post(place_order))
            .with_state(shop);
        let shop_addr = serve(shop_router).await;

        let env = HashMap::from([
            ("STOREFRONT_BACKEND_URL", format!("http://{shop_addr}")),
            ("STOREFRONT_SESSION_IDLE_MINUTES", "5".to_string()),
        ]);
        let config = StorefrontConfig::from_lookup(|key| env.get(key).cloned())
            .expect("Failed to build storefront config");
        let state = AppState::new(config).expect("Failed to build storefront state");
        let storefront_addr = serve(app(state)).await;

        let client = Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            storefront_url: format!("http://{storefront_addr}"),
            orders,
        }
    }

    /// A second visitor on the same storefront, with its own cookie jar.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn another_visitor(&self) -> Self {
        Self {
            client: Client::builder()
                .cookie_store(true)
                .build()
                .expect("Failed to create HTTP client"),
            storefront_url: self.storefront_url.clone(),
            orders: self.orders.clone(),
        }
    }

    /// Build a URL on the storefront.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.storefront_url)
    }

    /// Order bodies the fake shop API has received so far.
    ///
    /// # Panics
    ///
    /// Panics if a shop handler panicked while holding the lock.
    #[must_use]
    pub fn received_orders(&self) -> Vec<Value> {
        self.orders.lock().expect("orders lock poisoned").clone()
    }

    /// Load the storefront page, which starts the session and fetches the
    /// catalog. Returns the page HTML.
    ///
    /// # Panics
    ///
    /// Panics if the page does not load.
    pub async fn visit(&self) -> String {
        let resp = self
            .client
            .get(self.url("/"))
            .send()
            .await
            .expect("Failed to load storefront");
        assert_eq!(resp.status(), StatusCode::OK);
        resp.text().await.expect("Failed to read page")
    }

    /// Post a form to the storefront.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("Failed to post form")
    }

    /// Add one unit of `product_id` and return the cart panel HTML.
    ///
    /// # Panics
    ///
    /// Panics unless the storefront answers 200.
    pub async fn add_to_cart(&self, product_id: i64) -> String {
        let id = product_id.to_string();
        let resp = self.post_form("/cart/add", &[("product_id", &id)]).await;
        assert_eq!(resp.status(), StatusCode::OK);
        resp.text().await.expect("Failed to read cart panel")
    }
}

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}
