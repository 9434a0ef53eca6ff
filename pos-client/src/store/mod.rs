//! Client-side POS store
//!
//! [`PosStore`] is the explicit state container the composition root owns:
//! the category/menu cache, the seat layout, the in-progress order
//! selection and the sales history. All operations take `&self`; state
//! sits behind short-lived locks that are never held across an `.await`,
//! and every mutation is followed by a reload from the backend rather than
//! a local merge.
//!
//! Grid rules are checked before any mutating call. A rejected placement
//! returns [`ClientError::Placement`] and nothing is sent.

mod cache;
mod refresh;
mod selection;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use shared::layout::{SeatLayout, check_placement};
use shared::models::{
    Category, CategoryUpsert, GridCell, MenuItem, MenuUpsert, Order, OrderCreate, OrderLine,
    Payment, PaymentCreate, PaymentMethod, PlaceUpsert, RefundRequest,
};

use crate::api::{PosApi, RestPosApi};
use crate::http::NetworkHttpClient;
use crate::{ClientConfig, ClientError, ClientResult};

pub use cache::{CatalogCache, Completion, FetchTicket, Fetched};
pub use refresh::RefreshGuard;
pub use selection::{OrderSelection, SelectedItem};

/// Active place and its unpaid order
#[derive(Debug, Default)]
struct Session {
    place_id: Option<i64>,
    unpaid: Option<Order>,
}

#[derive(Debug)]
struct Sales {
    guard: RefreshGuard,
    orders: Vec<Order>,
}

pub struct PosStore<A> {
    api: A,
    store_id: i64,
    catalog: Mutex<CatalogCache>,
    seats: Mutex<Option<SeatLayout>>,
    selection: Mutex<OrderSelection>,
    session: Mutex<Session>,
    sales: Mutex<Sales>,
}

impl PosStore<RestPosApi<NetworkHttpClient>> {
    /// Store backed by the REST API described by `config`
    pub fn connect(config: &ClientConfig) -> ClientResult<Self> {
        let http = config.build_http_client()?;
        Ok(Self::new(RestPosApi::new(http), config))
    }
}

impl<A: PosApi> PosStore<A> {
    pub fn new(api: A, config: &ClientConfig) -> Self {
        Self {
            api,
            store_id: config.store_id,
            catalog: Mutex::new(CatalogCache::new()),
            seats: Mutex::new(None),
            selection: Mutex::new(OrderSelection::new()),
            session: Mutex::new(Session::default()),
            sales: Mutex::new(Sales {
                guard: RefreshGuard::new(Duration::from_millis(config.sales_refresh_interval_ms)),
                orders: Vec::new(),
            }),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn store_id(&self) -> i64 {
        self.store_id
    }

    // ========== Categories ==========

    /// Fetch and replace the store's category list.
    ///
    /// A failure is recorded as [`Fetched::Failed`] so the UI can render a
    /// disabled state; it is not retried.
    pub async fn load_categories(&self) -> ClientResult<Vec<Category>> {
        let seq = self.catalog.lock().begin_categories();
        let result = self.api.list_categories(self.store_id).await;

        let mut catalog = self.catalog.lock();
        match result {
            Ok(categories) => {
                catalog.complete_categories(seq, Fetched::Ready(categories.clone()));
                Ok(categories)
            }
            Err(e) => {
                tracing::warn!(store_id = self.store_id, "Failed to load categories: {}", e);
                catalog.complete_categories(seq, Fetched::Failed(e.to_string()));
                Err(e)
            }
        }
    }

    pub fn categories(&self) -> Fetched<Vec<Category>> {
        self.catalog.lock().categories().clone()
    }

    pub async fn create_category(
        &self,
        name: impl Into<String>,
        color_code: impl Into<String>,
        slot: Option<u32>,
    ) -> ClientResult<Vec<Category>> {
        let body = CategoryUpsert {
            category_id: None,
            store_id: self.store_id,
            category_name: name.into(),
            color_code: color_code.into(),
            slot,
        };
        self.api.create_category(&body).await?;
        tracing::info!(name = %body.category_name, "Category created");
        self.load_categories().await
    }

    pub async fn update_category(&self, mut body: CategoryUpsert) -> ClientResult<Vec<Category>> {
        let Some(category_id) = body.category_id else {
            return Err(ClientError::Validation("category_id is required for update".into()));
        };
        body.store_id = self.store_id;
        self.api.update_category(&body).await?;
        tracing::info!(category_id, "Category updated");
        self.load_categories().await
    }

    pub async fn delete_category(&self, category_id: i64) -> ClientResult<Vec<Category>> {
        self.api.delete_category(category_id).await?;
        tracing::info!(category_id, "Category deleted");
        self.invalidate(category_id);
        self.load_categories().await
    }

    // ========== Menus ==========

    /// Menu list of a category.
    ///
    /// Without `force_reload` a cached list is returned as-is and no
    /// request is made. A failed fetch leaves no cache entry behind.
    pub async fn load_menus(
        &self,
        category_id: i64,
        force_reload: bool,
    ) -> ClientResult<Arc<[MenuItem]>> {
        let ticket = {
            let mut catalog = self.catalog.lock();
            if !force_reload
                && let Some(items) = catalog.menus(category_id)
            {
                tracing::debug!(category_id, "Menu cache hit");
                return Ok(items);
            }
            catalog.begin_menus(category_id)
        };

        tracing::debug!(category_id, force_reload, "Fetching menus");
        let items = match self.api.list_menus(category_id).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(category_id, "Failed to load menus: {}", e);
                return Err(e);
            }
        };

        let completion = self.catalog.lock().complete_menus(ticket, items);
        Ok(completion.into_items())
    }

    /// Drop the cached menus of one category
    pub fn invalidate(&self, category_id: i64) {
        if self.catalog.lock().invalidate(category_id) {
            tracing::debug!(category_id, "Menu cache invalidated");
        }
    }

    pub fn cached_menus(&self, category_id: i64) -> Option<Arc<[MenuItem]>> {
        self.catalog.lock().menus(category_id)
    }

    async fn reload_menus(&self, category_id: i64) -> ClientResult<Arc<[MenuItem]>> {
        self.invalidate(category_id);
        self.load_menus(category_id, true).await
    }

    /// Add a menu item at its requested cell.
    pub async fn create_menu(&self, mut draft: MenuUpsert) -> ClientResult<Arc<[MenuItem]>> {
        draft.menu_id = None;
        draft.store_id = self.store_id;

        let current = self.load_menus(draft.category_id, false).await?;
        if let Err(e) = check_placement(&current, draft.cell(), draft.size_type, None) {
            tracing::warn!(category_id = draft.category_id, "Menu placement rejected: {}", e);
            return Err(e.into());
        }

        self.api.create_menu(&draft).await?;
        tracing::info!(
            category_id = draft.category_id,
            name = %draft.menu_name,
            cell = %draft.cell(),
            "Menu created"
        );
        self.reload_menus(draft.category_id).await
    }

    /// Modify a menu item (name, price, size or position).
    pub async fn update_menu(&self, mut update: MenuUpsert) -> ClientResult<Arc<[MenuItem]>> {
        let Some(menu_id) = update.menu_id else {
            return Err(ClientError::Validation("menu_id is required for update".into()));
        };
        update.store_id = self.store_id;

        let current = self.load_menus(update.category_id, false).await?;
        if let Err(e) = check_placement(&current, update.cell(), update.size_type, Some(menu_id)) {
            tracing::warn!(menu_id, "Menu placement rejected: {}", e);
            return Err(e.into());
        }

        self.api.update_menu(&update).await?;
        tracing::info!(menu_id, cell = %update.cell(), "Menu updated");

        // The item may have changed category; drop its old list as well
        let stale: Vec<i64> = {
            let catalog = self.catalog.lock();
            catalog
                .cached_categories()
                .filter(|&c| c != update.category_id)
                .filter(|&c| {
                    catalog
                        .menus(c)
                        .is_some_and(|items| items.iter().any(|i| i.menu_id == menu_id))
                })
                .collect()
        };
        for category_id in stale {
            self.invalidate(category_id);
        }

        self.reload_menus(update.category_id).await
    }

    /// Move a menu item to another cell of its category (drag and drop).
    ///
    /// Dropping an item back on its own cell succeeds without a request.
    pub async fn move_menu(
        &self,
        category_id: i64,
        menu_id: i64,
        to: GridCell,
    ) -> ClientResult<Arc<[MenuItem]>> {
        let current = self.load_menus(category_id, false).await?;
        let Some(item) = current.iter().find(|i| i.menu_id == menu_id) else {
            return Err(ClientError::NotFound(format!(
                "menu {} in category {}",
                menu_id, category_id
            )));
        };

        if let Err(e) = check_placement(&current, to, item.size_type, Some(menu_id)) {
            tracing::warn!(menu_id, %to, "Menu move rejected: {}", e);
            return Err(e.into());
        }
        if item.cell() == to {
            tracing::debug!(menu_id, %to, "Menu dropped on its own cell");
            return Ok(current);
        }

        let body = MenuUpsert::moved(item, self.store_id, to);
        self.api.update_menu(&body).await?;
        tracing::info!(menu_id, from = %item.cell(), %to, "Menu moved");
        self.reload_menus(category_id).await
    }

    pub async fn delete_menu(&self, category_id: i64, menu_id: i64) -> ClientResult<Arc<[MenuItem]>> {
        self.api.delete_menu(menu_id).await?;
        tracing::info!(category_id, menu_id, "Menu deleted");
        self.reload_menus(category_id).await
    }

    // ========== Places ==========

    pub async fn load_places(&self) -> ClientResult<SeatLayout> {
        let places = self.api.list_places(self.store_id).await?;
        let layout = SeatLayout::from_places(places);
        *self.seats.lock() = Some(layout.clone());
        Ok(layout)
    }

    pub fn seat_layout(&self) -> Option<SeatLayout> {
        self.seats.lock().clone()
    }

    async fn current_seats(&self) -> ClientResult<SeatLayout> {
        let cached = self.seats.lock().clone();
        match cached {
            Some(layout) => Ok(layout),
            None => self.load_places().await,
        }
    }

    pub async fn create_place(&self, mut body: PlaceUpsert) -> ClientResult<SeatLayout> {
        body.place_id = None;
        body.store_id = self.store_id;

        let layout = self.current_seats().await?;
        let slot = layout.check_slot(body.cell(), None)?;

        self.api.create_place(&body).await?;
        tracing::info!(name = %body.place_name, slot, "Place created");
        self.load_places().await
    }

    pub async fn update_place(&self, mut body: PlaceUpsert) -> ClientResult<SeatLayout> {
        let Some(place_id) = body.place_id else {
            return Err(ClientError::Validation("place_id is required for update".into()));
        };
        body.store_id = self.store_id;

        let layout = self.current_seats().await?;
        let Some((from, _)) = layout.find(place_id) else {
            return Err(ClientError::NotFound(format!("place {}", place_id)));
        };
        let slot = layout.check_slot(body.cell(), Some(place_id))?;

        self.api.update_place(&body).await?;
        tracing::info!(place_id, from, slot, "Place updated");
        self.load_places().await
    }

    pub async fn delete_place(&self, place_id: i64) -> ClientResult<SeatLayout> {
        self.api.delete_place(place_id).await?;
        tracing::info!(place_id, "Place deleted");
        self.load_places().await
    }

    // ========== Order selection ==========

    pub fn add_item(&self, name: &str, price: u64, menu_id: i64) {
        self.selection.lock().add_item(name, price, menu_id);
    }

    pub fn remove_item(&self, name: &str) -> bool {
        self.selection.lock().remove_item(name)
    }

    pub fn clear_selection(&self) {
        self.selection.lock().clear();
    }

    pub fn selection(&self) -> OrderSelection {
        self.selection.lock().clone()
    }

    pub fn selected_place(&self) -> Option<i64> {
        self.session.lock().place_id
    }

    pub fn unpaid_order(&self) -> Option<Order> {
        self.session.lock().unpaid.clone()
    }

    /// Make `place_id` the active place and look up its unpaid order.
    ///
    /// When the place has none, the current selection is cleared.
    pub async fn select_place(&self, place_id: i64) -> ClientResult<Option<Order>> {
        let unpaid = self.api.unpaid_order(place_id).await?;

        {
            let mut session = self.session.lock();
            session.place_id = Some(place_id);
            session.unpaid = unpaid.clone();
        }
        self.selection
            .lock()
            .sync_unpaid(Some(place_id), unpaid.as_ref().map(|o| o.order_id));

        tracing::debug!(place_id, has_unpaid = unpaid.is_some(), "Place selected");
        Ok(unpaid)
    }

    /// Submit the selection as an order for the active place
    pub async fn submit_order(&self) -> ClientResult<Order> {
        let Some(place_id) = self.selected_place() else {
            return Err(ClientError::Validation("No place selected".into()));
        };
        let items = self.selection.lock().to_order_lines();
        if items.is_empty() {
            return Err(ClientError::Validation("Order has no items".into()));
        }

        let body = OrderCreate {
            store_id: self.store_id,
            place_id,
            items,
        };
        let order = self.api.create_order(&body).await?;
        tracing::info!(order_id = order.order_id, place_id, "Order submitted");

        // Lines added while the request was in flight stay selected
        self.selection.lock().remove_submitted(&body.items);
        self.session.lock().unpaid = order.is_unpaid().then(|| order.clone());
        Ok(order)
    }

    // ========== Payments ==========

    /// Pay the active place's unpaid order in full
    pub async fn pay(&self, method: PaymentMethod) -> ClientResult<Payment> {
        let Some(order) = self.unpaid_order() else {
            return Err(ClientError::Validation("No unpaid order for the selected place".into()));
        };

        let body = PaymentCreate {
            order_id: order.order_id,
            amount: order.total_price,
            method,
        };
        let payment = self.api.create_payment(&body).await?;
        tracing::info!(
            order_id = order.order_id,
            payment_id = payment.payment_id,
            amount = payment.amount,
            "Order paid"
        );

        self.selection.lock().clear();
        self.session.lock().unpaid = None;
        Ok(payment)
    }

    pub async fn payment(&self, payment_id: i64) -> ClientResult<Payment> {
        self.api.payment(payment_id).await
    }

    /// Partially refund a payment, then reload the sales history so the
    /// refunded lines, total and status come from the backend.
    pub async fn refund(&self, payment_id: i64, lines: Vec<OrderLine>) -> ClientResult<Payment> {
        let body = RefundRequest { items: lines };
        let payment = self.api.refund_payment(payment_id, &body).await?;
        tracing::info!(payment_id, order_id = payment.order_id, "Payment refunded");

        self.reload_sales().await?;
        Ok(payment)
    }

    /// Cancel a payment, then reload the sales history and the active
    /// place's unpaid order.
    pub async fn cancel_payment(&self, payment_id: i64) -> ClientResult<()> {
        self.api.cancel_payment(payment_id).await?;
        tracing::info!(payment_id, "Payment cancelled");

        self.reload_sales().await?;
        if let Some(place_id) = self.selected_place() {
            let unpaid = self.api.unpaid_order(place_id).await?;
            self.session.lock().unpaid = unpaid;
        }
        Ok(())
    }

    // ========== Sales history ==========

    /// Reload the store's orders.
    ///
    /// Returns `Ok(None)` without a request when a refresh already ran
    /// inside the configured interval.
    pub async fn refresh_sales(&self) -> ClientResult<Option<Vec<Order>>> {
        if !self.sales.lock().guard.try_acquire(tokio::time::Instant::now()) {
            tracing::debug!("Sales refresh coalesced");
            return Ok(None);
        }

        self.fetch_sales().await.map(Some)
    }

    /// Reload the sales history regardless of the refresh interval
    async fn reload_sales(&self) -> ClientResult<Vec<Order>> {
        {
            // Restart the window from this reload
            let mut sales = self.sales.lock();
            sales.guard.reset();
            sales.guard.try_acquire(tokio::time::Instant::now());
        }
        self.fetch_sales().await
    }

    async fn fetch_sales(&self) -> ClientResult<Vec<Order>> {
        let orders = self.api.list_orders(self.store_id).await?;
        self.sales.lock().orders = orders.clone();
        Ok(orders)
    }

    pub fn sales_history(&self) -> Vec<Order> {
        self.sales.lock().orders.clone()
    }
}
