// pos-client/tests/store_flows.rs
// Store behaviour against an in-memory backend

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use pos_client::models::{
    Category, CategoryStyle, CategoryUpsert, GridCell, MenuItem, MenuUpsert, Order, OrderCreate,
    OrderLine, OrderStatus, Payment, PaymentCreate, PaymentMethod, PaymentStatus, Place,
    PlaceUpsert, RefundRequest, SizeType,
};
use pos_client::{
    CellOccupancy, ClientConfig, ClientError, ClientResult, Fetched, MenuGrid, PlacementError,
    PosApi, PosStore,
};

const STORE_ID: i64 = 1;

#[derive(Default)]
struct FakeBackend {
    calls: Mutex<Vec<String>>,
    categories: Mutex<Vec<Category>>,
    menus: Mutex<HashMap<i64, Vec<MenuItem>>>,
    /// When non-empty, `list_menus` answers from here (delay, items)
    scripted_menus: Mutex<VecDeque<(Duration, Vec<MenuItem>)>>,
    places: Mutex<Vec<Place>>,
    /// How long `create_order` takes to answer
    order_delay: Mutex<Duration>,
    unpaid: Mutex<HashMap<i64, Order>>,
    orders: Mutex<Vec<Order>>,
    payments: Mutex<HashMap<i64, Payment>>,
    offline: AtomicBool,
    next_id: AtomicI64,
}

impl FakeBackend {
    fn new() -> Self {
        Self {
            next_id: AtomicI64::new(100),
            ..Default::default()
        }
    }

    fn with_menus(self, category_id: i64, items: Vec<MenuItem>) -> Self {
        self.menus.lock().insert(category_id, items);
        self
    }

    fn record(&self, call: impl Into<String>) -> ClientResult<()> {
        self.calls.lock().push(call.into());
        if self.offline.load(Ordering::SeqCst) {
            return Err(ClientError::Api {
                status: reqwest::StatusCode::BAD_GATEWAY,
                message: "backend unreachable".into(),
            });
        }
        Ok(())
    }

    fn count(&self, prefix: &str) -> usize {
        self.calls.lock().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn mutations(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.starts_with("POST") || c.starts_with("PATCH") || c.starts_with("DELETE"))
            .count()
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn menu_price(&self, menu_id: i64) -> u64 {
        self.menus
            .lock()
            .values()
            .flatten()
            .find(|m| m.menu_id == menu_id)
            .map_or(0, |m| m.price)
    }
}

fn to_item(menu_id: i64, body: &MenuUpsert) -> MenuItem {
    MenuItem {
        menu_id,
        category_id: body.category_id,
        menu_name: body.menu_name.clone(),
        price: body.price,
        discount_rate: None,
        color_code: Some(body.color_code.clone()),
        size_type: body.size_type,
        position_x: body.position_x,
        position_y: body.position_y,
    }
}

#[async_trait]
impl PosApi for FakeBackend {
    async fn list_categories(&self, store_id: i64) -> ClientResult<Vec<Category>> {
        self.record(format!("GET categories/all/{store_id}"))?;
        Ok(self.categories.lock().clone())
    }

    async fn create_category(&self, body: &CategoryUpsert) -> ClientResult<()> {
        self.record("POST categories")?;
        let id = self.next_id();
        self.categories.lock().push(Category {
            id,
            store_id: body.store_id,
            name: body.category_name.clone(),
            style: CategoryStyle {
                color_code: body.color_code.clone(),
                slot: body.slot,
            },
        });
        Ok(())
    }

    async fn update_category(&self, body: &CategoryUpsert) -> ClientResult<()> {
        self.record("PATCH categories")?;
        let mut categories = self.categories.lock();
        if let Some(c) = categories.iter_mut().find(|c| Some(c.id) == body.category_id) {
            c.name = body.category_name.clone();
        }
        Ok(())
    }

    async fn delete_category(&self, category_id: i64) -> ClientResult<()> {
        self.record(format!("DELETE categories/{category_id}"))?;
        self.categories.lock().retain(|c| c.id != category_id);
        self.menus.lock().remove(&category_id);
        Ok(())
    }

    async fn list_menus(&self, category_id: i64) -> ClientResult<Vec<MenuItem>> {
        self.record(format!("GET menus/all/{category_id}"))?;
        let scripted = self.scripted_menus.lock().pop_front();
        if let Some((delay, items)) = scripted {
            tokio::time::sleep(delay).await;
            return Ok(items);
        }
        Ok(self.menus.lock().get(&category_id).cloned().unwrap_or_default())
    }

    async fn create_menu(&self, body: &MenuUpsert) -> ClientResult<()> {
        self.record("POST menus")?;
        let item = to_item(self.next_id(), body);
        self.menus.lock().entry(body.category_id).or_default().push(item);
        Ok(())
    }

    async fn update_menu(&self, body: &MenuUpsert) -> ClientResult<()> {
        self.record("PATCH menus")?;
        let menu_id = body.menu_id.unwrap_or_default();
        let mut menus = self.menus.lock();
        for items in menus.values_mut() {
            items.retain(|m| m.menu_id != menu_id);
        }
        menus
            .entry(body.category_id)
            .or_default()
            .push(to_item(menu_id, body));
        Ok(())
    }

    async fn delete_menu(&self, menu_id: i64) -> ClientResult<()> {
        self.record(format!("DELETE menus/{menu_id}"))?;
        for items in self.menus.lock().values_mut() {
            items.retain(|m| m.menu_id != menu_id);
        }
        Ok(())
    }

    async fn list_places(&self, store_id: i64) -> ClientResult<Vec<Place>> {
        self.record(format!("GET places/all/{store_id}"))?;
        Ok(self.places.lock().clone())
    }

    async fn create_place(&self, body: &PlaceUpsert) -> ClientResult<()> {
        self.record("POST places")?;
        let place_id = self.next_id();
        self.places.lock().push(Place {
            place_id,
            store_id: body.store_id,
            place_name: body.place_name.clone(),
            position_x: body.position_x,
            position_y: body.position_y,
            size_type: body.size_type,
        });
        Ok(())
    }

    async fn update_place(&self, body: &PlaceUpsert) -> ClientResult<()> {
        self.record("PATCH places")?;
        let mut places = self.places.lock();
        if let Some(p) = places.iter_mut().find(|p| Some(p.place_id) == body.place_id) {
            p.position_x = body.position_x;
            p.position_y = body.position_y;
            p.place_name = body.place_name.clone();
        }
        Ok(())
    }

    async fn delete_place(&self, place_id: i64) -> ClientResult<()> {
        self.record(format!("DELETE places/{place_id}"))?;
        self.places.lock().retain(|p| p.place_id != place_id);
        Ok(())
    }

    async fn create_order(&self, body: &OrderCreate) -> ClientResult<Order> {
        self.record("POST orders")?;
        let delay = *self.order_delay.lock();
        tokio::time::sleep(delay).await;
        let order = Order {
            order_id: self.next_id(),
            store_id: body.store_id,
            place_id: body.place_id,
            items: body.items.clone(),
            total_price: body
                .items
                .iter()
                .map(|l| self.menu_price(l.menu_id) * u64::from(l.quantity))
                .sum(),
            status: OrderStatus::Unpaid,
            created_at: Utc::now(),
            place_name: None,
        };
        self.unpaid.lock().insert(body.place_id, order.clone());
        self.orders.lock().push(order.clone());
        Ok(order)
    }

    async fn list_orders(&self, store_id: i64) -> ClientResult<Vec<Order>> {
        self.record(format!("GET orders/all/{store_id}"))?;
        Ok(self.orders.lock().clone())
    }

    async fn unpaid_order(&self, place_id: i64) -> ClientResult<Option<Order>> {
        self.record(format!("GET orders/unpaid/{place_id}"))?;
        Ok(self.unpaid.lock().get(&place_id).cloned())
    }

    async fn create_payment(&self, body: &PaymentCreate) -> ClientResult<Payment> {
        self.record("POST pay")?;
        self.unpaid.lock().retain(|_, o| o.order_id != body.order_id);
        for order in self.orders.lock().iter_mut().filter(|o| o.order_id == body.order_id) {
            order.status = OrderStatus::Paid;
        }
        let payment = Payment {
            payment_id: self.next_id(),
            order_id: body.order_id,
            amount: body.amount,
            method: body.method,
            status: PaymentStatus::Completed,
            paid_at: Utc::now(),
        };
        self.payments.lock().insert(payment.payment_id, payment.clone());
        Ok(payment)
    }

    async fn payment(&self, payment_id: i64) -> ClientResult<Payment> {
        self.record(format!("GET pay/{payment_id}"))?;
        self.payments
            .lock()
            .get(&payment_id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("payment {payment_id}")))
    }

    async fn refund_payment(&self, payment_id: i64, body: &RefundRequest) -> ClientResult<Payment> {
        self.record(format!("PATCH pay/{payment_id}"))?;
        let payment = {
            let mut payments = self.payments.lock();
            let payment = payments
                .get_mut(&payment_id)
                .ok_or_else(|| ClientError::NotFound(format!("payment {payment_id}")))?;
            payment.status = PaymentStatus::PartiallyRefunded;
            payment.clone()
        };

        let mut orders = self.orders.lock();
        if let Some(order) = orders.iter_mut().find(|o| o.order_id == payment.order_id) {
            for refund in &body.items {
                if let Some(line) = order.items.iter_mut().find(|l| l.menu_id == refund.menu_id) {
                    line.quantity = line.quantity.saturating_sub(refund.quantity);
                }
            }
            order.items.retain(|l| l.quantity > 0);
            order.total_price = order
                .items
                .iter()
                .map(|l| self.menu_price(l.menu_id) * u64::from(l.quantity))
                .sum();
            if order.items.is_empty() {
                order.status = OrderStatus::Refunded;
            }
        }
        Ok(payment)
    }

    /// Cancelling a payment reopens its order
    async fn cancel_payment(&self, payment_id: i64) -> ClientResult<()> {
        self.record(format!("DELETE pay/{payment_id}"))?;
        let payment = self
            .payments
            .lock()
            .remove(&payment_id)
            .ok_or_else(|| ClientError::NotFound(format!("payment {payment_id}")))?;

        let mut orders = self.orders.lock();
        if let Some(order) = orders.iter_mut().find(|o| o.order_id == payment.order_id) {
            order.status = OrderStatus::Unpaid;
            self.unpaid.lock().insert(order.place_id, order.clone());
        }
        Ok(())
    }
}

// ========== Fixtures ==========

fn menu(id: i64, name: &str, x: u32, y: u32, size: SizeType) -> MenuItem {
    MenuItem {
        menu_id: id,
        category_id: 1,
        menu_name: name.to_string(),
        price: 2000,
        discount_rate: None,
        color_code: None,
        size_type: size,
        position_x: x,
        position_y: y,
    }
}

fn draft(name: &str, x: u32, y: u32, size: SizeType) -> MenuUpsert {
    MenuUpsert {
        menu_id: None,
        category_id: 1,
        store_id: STORE_ID,
        menu_name: name.to_string(),
        price: 1500,
        color_code: "#FF0000".to_string(),
        size_type: size,
        position_x: x,
        position_y: y,
    }
}

fn place(id: i64, x: u32, y: u32) -> Place {
    Place {
        place_id: id,
        store_id: STORE_ID,
        place_name: format!("T{id}"),
        position_x: x,
        position_y: y,
        size_type: None,
    }
}

fn store(backend: FakeBackend) -> PosStore<FakeBackend> {
    PosStore::new(backend, &ClientConfig::new("http://unused", STORE_ID))
}

/// Store 1 with category "Drinks" holding Cola as a FULL item at (0, 0)
fn drinks_store() -> PosStore<FakeBackend> {
    let backend =
        FakeBackend::new().with_menus(1, vec![menu(10, "Cola", 0, 0, SizeType::Full)]);
    backend.categories.lock().push(Category {
        id: 1,
        store_id: STORE_ID,
        name: "Drinks".to_string(),
        style: CategoryStyle::default(),
    });
    store(backend)
}

// ========== Cache ==========

#[tokio::test]
async fn test_menu_cache_hit_issues_one_request() {
    let store = drinks_store();

    let first = store.load_menus(1, false).await.unwrap();
    let second = store.load_menus(1, false).await.unwrap();

    assert_eq!(store.api().count("GET menus/all/1"), 1);
    assert!(Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn test_invalidate_then_load_misses() {
    let store = drinks_store();
    store.load_menus(1, false).await.unwrap();

    store.invalidate(1);
    assert!(store.cached_menus(1).is_none());
    store.load_menus(1, false).await.unwrap();

    assert_eq!(store.api().count("GET menus/all/1"), 2);
}

#[tokio::test]
async fn test_invalidate_leaves_other_categories() {
    let backend = FakeBackend::new()
        .with_menus(1, vec![menu(10, "Cola", 0, 0, SizeType::Full)])
        .with_menus(2, vec![]);
    let store = store(backend);
    store.load_menus(1, false).await.unwrap();
    store.load_menus(2, false).await.unwrap();

    store.invalidate(1);
    store.load_menus(2, false).await.unwrap();

    assert!(store.cached_menus(2).is_some());
    assert_eq!(store.api().count("GET menus/all/2"), 1);
}

#[tokio::test]
async fn test_force_reload_refetches() {
    let store = drinks_store();
    store.load_menus(1, false).await.unwrap();
    store.load_menus(1, true).await.unwrap();
    assert_eq!(store.api().count("GET menus/all/1"), 2);
}

#[tokio::test]
async fn test_failed_loads_surface_errors() {
    let store = drinks_store();
    store.api().set_offline(true);

    assert!(store.load_categories().await.is_err());
    assert!(store.categories().is_failed());

    let err = store.load_menus(1, false).await.unwrap_err();
    assert!(err.is_remote());
    assert!(store.cached_menus(1).is_none());

    store.api().set_offline(false);
    let categories = store.load_categories().await.unwrap();
    assert_eq!(categories[0].name, "Drinks");
    assert!(matches!(store.categories(), Fetched::Ready(ref c) if c.len() == 1));
    assert_eq!(store.load_menus(1, false).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_overlapping_loads_keep_latest_request() {
    let store = drinks_store();
    {
        let mut scripted = store.api().scripted_menus.lock();
        scripted.push_back((Duration::from_millis(50), vec![menu(1, "Old", 0, 0, SizeType::Full)]));
        scripted.push_back((Duration::ZERO, vec![menu(2, "New", 0, 0, SizeType::Full)]));
    }

    let (old, new) = tokio::join!(store.load_menus(1, false), store.load_menus(1, true));

    assert_eq!(old.unwrap()[0].menu_name, "Old");
    assert_eq!(new.unwrap()[0].menu_name, "New");
    assert_eq!(store.cached_menus(1).unwrap()[0].menu_name, "New");
}

// ========== Placement ==========

#[tokio::test]
async fn test_half_on_full_cell_rejected_without_request() {
    let store = drinks_store();
    store.load_categories().await.unwrap();
    store.load_menus(1, false).await.unwrap();

    let err = store
        .create_menu(draft("Lemonade", 0, 0, SizeType::Half))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::Placement(PlacementError::CellHasFull { .. })
    ));

    let err = store
        .create_menu(draft("Water", 0, 0, SizeType::Full))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Placement(_)));
    assert_eq!(store.api().mutations(), 0);
}

#[tokio::test]
async fn test_two_halves_fill_a_cell() {
    let store = store(FakeBackend::new().with_menus(1, vec![]));

    let items = store
        .create_menu(draft("A", 2, 1, SizeType::Half))
        .await
        .unwrap();
    assert_eq!(items.len(), 1);

    let items = store
        .create_menu(draft("B", 2, 1, SizeType::Half))
        .await
        .unwrap();
    assert_eq!(items.len(), 2);
    let grid = MenuGrid::build(&items);
    assert_eq!(grid.occupancy(GridCell::new(2, 1)), CellOccupancy::TwoHalf);

    let err = store
        .create_menu(draft("C", 2, 1, SizeType::Half))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::Placement(PlacementError::CellFull { .. })
    ));
    assert_eq!(store.api().count("POST menus"), 2);
}

#[tokio::test]
async fn test_one_half_accepts_half_rejects_full() {
    let store = store(
        FakeBackend::new().with_menus(1, vec![menu(10, "Chips", 3, 3, SizeType::Half)]),
    );

    let err = store
        .create_menu(draft("Burger", 3, 3, SizeType::Full))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::Placement(PlacementError::FullOnHalf { .. })
    ));
    assert_eq!(store.api().mutations(), 0);

    store
        .create_menu(draft("Dip", 3, 3, SizeType::Half))
        .await
        .unwrap();
    assert_eq!(store.api().count("POST menus"), 1);
}

#[tokio::test]
async fn test_mutation_reloads_category() {
    let store = store(FakeBackend::new().with_menus(1, vec![]));
    store.load_menus(1, false).await.unwrap();

    store
        .create_menu(draft("A", 0, 0, SizeType::Full))
        .await
        .unwrap();

    assert_eq!(store.api().count("GET menus/all/1"), 2);
    assert_eq!(store.cached_menus(1).unwrap().len(), 1);
}

#[tokio::test]
async fn test_move_half_onto_own_cell_is_accepted() {
    let store = store(
        FakeBackend::new().with_menus(1, vec![menu(10, "Chips", 4, 2, SizeType::Half)]),
    );

    let items = store.move_menu(1, 10, GridCell::new(4, 2)).await.unwrap();
    assert_eq!(items[0].cell(), GridCell::new(4, 2));
    assert_eq!(store.api().mutations(), 0);
}

#[tokio::test]
async fn test_move_to_free_cell() {
    let store = drinks_store();

    let items = store.move_menu(1, 10, GridCell::new(5, 1)).await.unwrap();

    assert_eq!(store.api().count("PATCH menus"), 1);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].cell(), GridCell::new(5, 1));
}

#[tokio::test]
async fn test_move_onto_full_cell_rejected() {
    let store = store(FakeBackend::new().with_menus(
        1,
        vec![
            menu(10, "Cola", 0, 0, SizeType::Full),
            menu(11, "Chips", 1, 0, SizeType::Half),
        ],
    ));

    let err = store.move_menu(1, 11, GridCell::new(0, 0)).await.unwrap_err();
    assert!(matches!(err, ClientError::Placement(_)));

    let err = store.move_menu(1, 99, GridCell::new(2, 0)).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
    assert_eq!(store.api().mutations(), 0);
}

#[tokio::test]
async fn test_update_into_other_category_drops_old_list() {
    let backend = FakeBackend::new()
        .with_menus(1, vec![menu(10, "Cola", 0, 0, SizeType::Full)])
        .with_menus(2, vec![]);
    let store = store(backend);
    store.load_menus(1, false).await.unwrap();

    let mut update = draft("Cola", 0, 0, SizeType::Full);
    update.menu_id = Some(10);
    update.category_id = 2;
    let items = store.update_menu(update).await.unwrap();

    assert_eq!(items.len(), 1);
    assert!(store.cached_menus(1).is_none());
    assert!(store.load_menus(1, false).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_menu_reloads() {
    let store = drinks_store();
    store.load_menus(1, false).await.unwrap();

    let items = store.delete_menu(1, 10).await.unwrap();
    assert!(items.is_empty());
    assert_eq!(store.api().count("DELETE menus/10"), 1);
}

// ========== Categories ==========

#[tokio::test]
async fn test_category_lifecycle() {
    let store = drinks_store();
    store.load_menus(1, false).await.unwrap();

    let categories = store.create_category("Food", "#00FF00", Some(2)).await.unwrap();
    assert_eq!(categories.len(), 2);

    let food = categories.iter().find(|c| c.name == "Food").unwrap().id;
    let categories = store
        .update_category(CategoryUpsert {
            category_id: Some(food),
            store_id: STORE_ID,
            category_name: "Meals".to_string(),
            color_code: "#00FF00".to_string(),
            slot: None,
        })
        .await
        .unwrap();
    assert!(categories.iter().any(|c| c.name == "Meals"));

    let categories = store.delete_category(1).await.unwrap();
    assert_eq!(categories.len(), 1);
    assert!(store.cached_menus(1).is_none());
}

// ========== Places ==========

#[tokio::test]
async fn test_place_slots() {
    let backend = FakeBackend::new();
    backend.places.lock().push(place(7, 3, 2));
    let store = store(backend);

    let layout = store.load_places().await.unwrap();
    assert_eq!(layout.get(25).map(|p| p.place_id), Some(7));

    let body = PlaceUpsert {
        place_id: None,
        store_id: STORE_ID,
        place_name: "T8".to_string(),
        position_x: 3,
        position_y: 2,
        size_type: None,
    };
    let err = store.create_place(body.clone()).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Placement(PlacementError::SlotTaken { slot: 25, place_id: 7 })
    ));

    let err = store
        .create_place(PlaceUpsert {
            position_x: 11,
            ..body.clone()
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::Placement(PlacementError::SlotOutOfRange { .. })
    ));
    assert_eq!(store.api().mutations(), 0);

    let layout = store
        .create_place(PlaceUpsert {
            position_x: 4,
            ..body
        })
        .await
        .unwrap();
    assert_eq!(layout.places().count(), 2);
    assert!(layout.get(26).is_some());

    let layout = store.delete_place(7).await.unwrap();
    assert!(layout.get(25).is_none());
}

#[tokio::test]
async fn test_update_place() {
    let backend = FakeBackend::new();
    backend.places.lock().extend([place(7, 3, 2), place(8, 4, 2)]);
    let store = store(backend);

    let moved = PlaceUpsert {
        place_id: Some(7),
        store_id: STORE_ID,
        place_name: "T7".to_string(),
        position_x: 5,
        position_y: 2,
        size_type: None,
    };

    let err = store
        .update_place(PlaceUpsert {
            position_x: 4,
            ..moved.clone()
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::Placement(PlacementError::SlotTaken { slot: 26, place_id: 8 })
    ));

    let err = store
        .update_place(PlaceUpsert {
            place_id: Some(99),
            ..moved.clone()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
    assert_eq!(store.api().mutations(), 0);

    let layout = store.update_place(moved).await.unwrap();
    assert!(layout.get(25).is_none());
    assert_eq!(layout.get(27).map(|p| p.place_id), Some(7));
    assert_eq!(layout.find(7).map(|(slot, _)| slot), Some(27));
}

// ========== Selection and orders ==========

#[tokio::test]
async fn test_add_item_aggregates_by_name() {
    let store = drinks_store();
    store.add_item("Cola", 2000, 5);
    store.add_item("Cola", 2000, 5);

    let selection = store.selection();
    assert_eq!(selection.items().len(), 1);
    assert_eq!(selection.quantity_of("Cola"), 2);

    assert!(store.remove_item("Cola"));
    assert_eq!(store.selection().quantity_of("Cola"), 0);
    assert!(store.selection().is_empty());
}

#[tokio::test]
async fn test_tea_quantity() {
    let store = drinks_store();
    store.add_item("Tea", 1500, 11);
    assert_eq!(store.selection().items()[0].quantity, 1);
    store.add_item("Tea", 1500, 11);

    let selection = store.selection();
    assert_eq!(selection.items().len(), 1);
    assert_eq!(selection.items()[0].name, "Tea");
    assert_eq!(selection.items()[0].price, 1500);
    assert_eq!(selection.items()[0].quantity, 2);
}

#[tokio::test]
async fn test_place_without_unpaid_order_clears_selection() {
    let store = drinks_store();
    store.add_item("Cola", 2000, 10);

    let unpaid = store.select_place(7).await.unwrap();

    assert!(unpaid.is_none());
    assert_eq!(store.selected_place(), Some(7));
    assert!(store.selection().is_empty());
}

#[tokio::test]
async fn test_place_with_unpaid_order_keeps_selection() {
    let store = drinks_store();
    store.select_place(7).await.unwrap();
    store.add_item("Cola", 2000, 10);
    store.submit_order().await.unwrap();

    store.add_item("Cola", 2000, 10);
    let unpaid = store.select_place(7).await.unwrap();
    assert!(unpaid.is_some());
    assert_eq!(store.selection().quantity_of("Cola"), 1);
}

#[tokio::test]
async fn test_submit_and_pay() {
    let store = drinks_store();

    let err = store.submit_order().await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));

    store.select_place(7).await.unwrap();
    let err = store.submit_order().await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));

    store.add_item("Cola", 2000, 10);
    store.add_item("Cola", 2000, 10);
    let order = store.submit_order().await.unwrap();

    assert_eq!(order.items, vec![OrderLine::new(10, 2)]);
    assert_eq!(order.total_price, 4000);
    assert!(store.selection().is_empty());
    assert_eq!(store.unpaid_order().map(|o| o.order_id), Some(order.order_id));

    let payment = store.pay(PaymentMethod::Card).await.unwrap();
    assert_eq!(payment.amount, 4000);
    assert!(store.unpaid_order().is_none());
    assert!(matches!(
        store.pay(PaymentMethod::Cash).await.unwrap_err(),
        ClientError::Validation(_)
    ));

    let fetched = store.payment(payment.payment_id).await.unwrap();
    assert_eq!(fetched.order_id, order.order_id);
}

#[tokio::test]
async fn test_taps_during_submit_are_kept() {
    let store = drinks_store();
    *store.api().order_delay.lock() = Duration::from_millis(50);
    store.select_place(7).await.unwrap();
    store.add_item("Cola", 2000, 10);
    store.add_item("Cola", 2000, 10);

    let (order, ()) = tokio::join!(store.submit_order(), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        store.add_item("Cola", 2000, 10);
        store.add_item("Tea", 1500, 11);
    });

    assert_eq!(order.unwrap().items, vec![OrderLine::new(10, 2)]);
    let selection = store.selection();
    assert_eq!(selection.quantity_of("Cola"), 1);
    assert_eq!(selection.quantity_of("Tea"), 1);
}

/// Submit 2 x Cola for place 7 and pay it in cash
async fn paid_cola_order(store: &PosStore<FakeBackend>) -> Payment {
    store.select_place(7).await.unwrap();
    store.add_item("Cola", 2000, 10);
    store.add_item("Cola", 2000, 10);
    store.submit_order().await.unwrap();
    store.pay(PaymentMethod::Cash).await.unwrap()
}

#[tokio::test]
async fn test_refund_requeries_sales_history() {
    let store = drinks_store();
    let payment = paid_cola_order(&store).await;

    let orders = store.refresh_sales().await.unwrap().unwrap();
    assert_eq!(orders[0].total_price, 4000);
    assert_eq!(store.api().count("GET orders/all"), 1);

    // Inside the refresh interval; the refund still reloads
    let refunded = store
        .refund(payment.payment_id, vec![OrderLine::new(10, 1)])
        .await
        .unwrap();
    assert_eq!(refunded.status, PaymentStatus::PartiallyRefunded);
    assert_eq!(store.api().count("GET orders/all"), 2);

    let history = store.sales_history();
    assert_eq!(history[0].items, vec![OrderLine::new(10, 1)]);
    assert_eq!(history[0].total_price, 2000);
    assert_eq!(history[0].status, OrderStatus::Paid);

    // The reload restarted the window
    assert!(store.refresh_sales().await.unwrap().is_none());

    store
        .refund(payment.payment_id, vec![OrderLine::new(10, 1)])
        .await
        .unwrap();
    let history = store.sales_history();
    assert!(history[0].items.is_empty());
    assert_eq!(history[0].status, OrderStatus::Refunded);
}

#[tokio::test]
async fn test_cancel_payment_requeries_sales_and_unpaid_order() {
    let store = drinks_store();
    let payment = paid_cola_order(&store).await;
    assert!(store.unpaid_order().is_none());

    store.cancel_payment(payment.payment_id).await.unwrap();

    assert_eq!(store.api().count("GET orders/all"), 1);
    assert_eq!(store.sales_history()[0].status, OrderStatus::Unpaid);
    assert_eq!(
        store.unpaid_order().map(|o| o.order_id),
        Some(payment.order_id)
    );
    assert!(matches!(
        store.payment(payment.payment_id).await.unwrap_err(),
        ClientError::NotFound(_)
    ));
}

#[tokio::test]
async fn test_sales_refresh_is_coalesced() {
    let store = PosStore::new(
        FakeBackend::new(),
        &ClientConfig::new("http://unused", STORE_ID).with_sales_refresh_interval(60_000),
    );

    assert!(store.refresh_sales().await.unwrap().is_some());
    assert!(store.refresh_sales().await.unwrap().is_none());
    assert!(store.refresh_sales().await.unwrap().is_none());
    assert_eq!(store.api().count("GET orders/all"), 1);
}
