//! Typed backend API
//!
//! [`PosApi`] is the seam between the store and the backend: one method per
//! route. [`RestPosApi`] implements it over any [`HttpClient`].

use async_trait::async_trait;
use shared::models::{
    Category, CategoryUpsert, MenuItem, MenuUpsert, Order, OrderCreate, Payment, PaymentCreate,
    Place, PlaceUpsert, RefundRequest,
};

use crate::http::HttpClient;
use crate::{ClientError, ClientResult};

/// Backend routes used by the store
#[async_trait]
pub trait PosApi: Send + Sync {
    // ========== Categories ==========
    async fn list_categories(&self, store_id: i64) -> ClientResult<Vec<Category>>;
    async fn create_category(&self, body: &CategoryUpsert) -> ClientResult<()>;
    async fn update_category(&self, body: &CategoryUpsert) -> ClientResult<()>;
    async fn delete_category(&self, category_id: i64) -> ClientResult<()>;

    // ========== Menus ==========
    async fn list_menus(&self, category_id: i64) -> ClientResult<Vec<MenuItem>>;
    async fn create_menu(&self, body: &MenuUpsert) -> ClientResult<()>;
    async fn update_menu(&self, body: &MenuUpsert) -> ClientResult<()>;
    async fn delete_menu(&self, menu_id: i64) -> ClientResult<()>;

    // ========== Places ==========
    async fn list_places(&self, store_id: i64) -> ClientResult<Vec<Place>>;
    async fn create_place(&self, body: &PlaceUpsert) -> ClientResult<()>;
    async fn update_place(&self, body: &PlaceUpsert) -> ClientResult<()>;
    async fn delete_place(&self, place_id: i64) -> ClientResult<()>;

    // ========== Orders ==========
    async fn create_order(&self, body: &OrderCreate) -> ClientResult<Order>;
    async fn list_orders(&self, store_id: i64) -> ClientResult<Vec<Order>>;
    /// Unpaid order of a place, `None` when the place has none
    async fn unpaid_order(&self, place_id: i64) -> ClientResult<Option<Order>>;

    // ========== Payments ==========
    async fn create_payment(&self, body: &PaymentCreate) -> ClientResult<Payment>;
    async fn payment(&self, payment_id: i64) -> ClientResult<Payment>;
    async fn refund_payment(&self, payment_id: i64, body: &RefundRequest) -> ClientResult<Payment>;
    async fn cancel_payment(&self, payment_id: i64) -> ClientResult<()>;
}

/// [`PosApi`] over REST
#[derive(Debug, Clone)]
pub struct RestPosApi<H> {
    http: H,
}

impl<H: HttpClient> RestPosApi<H> {
    pub fn new(http: H) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &H {
        &self.http
    }
}

#[async_trait]
impl<H: HttpClient> PosApi for RestPosApi<H> {
    async fn list_categories(&self, store_id: i64) -> ClientResult<Vec<Category>> {
        self.http.get(&format!("categories/all/{}", store_id)).await
    }

    async fn create_category(&self, body: &CategoryUpsert) -> ClientResult<()> {
        self.http.post("categories", body).await
    }

    async fn update_category(&self, body: &CategoryUpsert) -> ClientResult<()> {
        self.http.patch("categories", body).await
    }

    async fn delete_category(&self, category_id: i64) -> ClientResult<()> {
        self.http.delete(&format!("categories/{}", category_id)).await
    }

    async fn list_menus(&self, category_id: i64) -> ClientResult<Vec<MenuItem>> {
        self.http.get(&format!("menus/all/{}", category_id)).await
    }

    async fn create_menu(&self, body: &MenuUpsert) -> ClientResult<()> {
        self.http.post("menus", body).await
    }

    async fn update_menu(&self, body: &MenuUpsert) -> ClientResult<()> {
        self.http.patch("menus", body).await
    }

    async fn delete_menu(&self, menu_id: i64) -> ClientResult<()> {
        self.http.delete(&format!("menus/{}", menu_id)).await
    }

    async fn list_places(&self, store_id: i64) -> ClientResult<Vec<Place>> {
        self.http.get(&format!("places/all/{}", store_id)).await
    }

    async fn create_place(&self, body: &PlaceUpsert) -> ClientResult<()> {
        self.http.post("places", body).await
    }

    async fn update_place(&self, body: &PlaceUpsert) -> ClientResult<()> {
        self.http.patch("places", body).await
    }

    async fn delete_place(&self, place_id: i64) -> ClientResult<()> {
        self.http.delete(&format!("places/{}", place_id)).await
    }

    async fn create_order(&self, body: &OrderCreate) -> ClientResult<Order> {
        self.http.post("orders", body).await
    }

    async fn list_orders(&self, store_id: i64) -> ClientResult<Vec<Order>> {
        self.http.get(&format!("orders/all/{}", store_id)).await
    }

    async fn unpaid_order(&self, place_id: i64) -> ClientResult<Option<Order>> {
        let found: ClientResult<Option<Order>> =
            self.http.get(&format!("orders/unpaid/{}", place_id)).await;
        match found {
            Ok(order) => Ok(order),
            Err(ClientError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn create_payment(&self, body: &PaymentCreate) -> ClientResult<Payment> {
        self.http.post("pay", body).await
    }

    async fn payment(&self, payment_id: i64) -> ClientResult<Payment> {
        self.http.get(&format!("pay/{}", payment_id)).await
    }

    async fn refund_payment(&self, payment_id: i64, body: &RefundRequest) -> ClientResult<Payment> {
        self.http.patch(&format!("pay/{}", payment_id), body).await
    }

    async fn cancel_payment(&self, payment_id: i64) -> ClientResult<()> {
        self.http.delete(&format!("pay/{}", payment_id)).await
    }
}
