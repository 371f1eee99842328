//! State holder sitting between the store and whatever front end renders it.
//!
//! The controller owns the product list and the status line. Front ends do
//! not poke at that state directly; they call [`ListController::subscribe`]
//! and apply the [`ListEvent`]s that arrive on the returned channel. Commands
//! can run inline (`refresh`, `export_csv`) or on a one-shot background
//! thread (`initialize`, `spawn_refresh`, `spawn_export`). Each command
//! replaces state wholesale when it settles, so a front end never observes a
//! half-built product list.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use chrono::{DateTime, Local};
use tracing::{error, info, warn};

use crate::db::ProductStore;
use crate::error::StoreError;
use crate::export::Exporter;
use crate::models::Product;

pub const STATUS_READY: &str = "Ready to load data.";
pub const STATUS_LOADING: &str = "Loading data...";
pub const STATUS_NO_DATA: &str = "No data to export.";

/// Snapshot of everything a front end displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState {
    pub products: Vec<Product>,
    pub status_message: String,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            products: Vec::new(),
            status_message: STATUS_READY.to_string(),
        }
    }
}

/// Change notifications published to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    ProductsReplaced(Vec<Product>),
    StatusChanged(String),
}

impl ListEvent {
    /// Fold the event into a local copy of the state.
    pub fn apply(self, state: &mut ListState) {
        match self {
            ListEvent::ProductsReplaced(products) => state.products = products,
            ListEvent::StatusChanged(message) => state.status_message = message,
        }
    }
}

type Clock = fn() -> DateTime<Local>;

struct Inner {
    store: Box<dyn ProductStore>,
    exporter: Exporter,
    clock: Clock,
    state: Mutex<ListState>,
    subscribers: Mutex<Vec<Sender<ListEvent>>>,
    last_export: Mutex<Option<PathBuf>>,
}

/// Cloning is cheap; clones share the same state and subscribers.
#[derive(Clone)]
pub struct ListController {
    inner: Arc<Inner>,
}

impl ListController {
    pub fn new(store: impl ProductStore + 'static, exporter: Exporter) -> Self {
        Self::with_clock(store, exporter, Local::now)
    }

    /// Like [`ListController::new`], but export file names are taken from
    /// `clock` instead of the wall clock.
    pub fn with_clock(store: impl ProductStore + 'static, exporter: Exporter, clock: Clock) -> Self {
        Self {
            inner: Arc::new(Inner {
                store: Box::new(store),
                exporter,
                clock,
                state: Mutex::new(ListState::default()),
                subscribers: Mutex::new(Vec::new()),
                last_export: Mutex::new(None),
            }),
        }
    }

    /// Register a new listener. Events published after this call are
    /// delivered in order; dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> Receiver<ListEvent> {
        let (tx, rx) = mpsc::channel();
        lock(&self.inner.subscribers).push(tx);
        rx
    }

    pub fn snapshot(&self) -> ListState {
        lock(&self.inner.state).clone()
    }

    /// Path of the most recent successful export, if any.
    pub fn last_export(&self) -> Option<PathBuf> {
        lock(&self.inner.last_export).clone()
    }

    /// Kick off the first load on a background thread. Hosts call this once
    /// after wiring up their subscriptions.
    pub fn initialize(&self) -> JoinHandle<()> {
        self.spawn_refresh()
    }

    pub fn spawn_refresh(&self) -> JoinHandle<()> {
        let controller = self.clone();
        thread::spawn(move || controller.refresh())
    }

    pub fn spawn_export(&self) -> JoinHandle<()> {
        let controller = self.clone();
        thread::spawn(move || controller.export_csv())
    }

    /// Reload every product from the store. Failures end up in the status
    /// line and leave the current list untouched.
    pub fn refresh(&self) {
        self.set_status(STATUS_LOADING.to_string());

        match self.load() {
            Ok(products) => {
                let count = products.len();
                self.replace_products(products);
                info!(count, "loaded products");
                self.set_status(format!("Loaded {count} items."));
            }
            Err(err) => {
                error!(error = %err, "failed to load products");
                self.set_status(format!("Error: {err}"));
            }
        }
    }

    /// Write the current list to a timestamped CSV file.
    pub fn export_csv(&self) {
        let products = lock(&self.inner.state).products.clone();
        if products.is_empty() {
            self.set_status(STATUS_NO_DATA.to_string());
            return;
        }

        let now = (self.inner.clock)();
        match self.inner.exporter.write(&products, now) {
            Ok(file_name) => {
                if let Some(dir) = self.inner.exporter.dir() {
                    *lock(&self.inner.last_export) = Some(dir.join(&file_name));
                }
                info!(file = %file_name, rows = products.len(), "exported products");
                self.set_status(format!("Exported to Desktop: {file_name}"));
            }
            Err(err) => {
                warn!(error = %err, "csv export failed");
                self.set_status(format!("Error: {err}"));
            }
        }
    }

    fn load(&self) -> Result<Vec<Product>, StoreError> {
        self.inner.store.ensure_ready()?;
        self.inner.store.fetch_all_products()
    }

    fn replace_products(&self, products: Vec<Product>) {
        lock(&self.inner.state).products = products.clone();
        self.publish(ListEvent::ProductsReplaced(products));
    }

    fn set_status(&self, message: String) {
        lock(&self.inner.state).status_message = message.clone();
        self.publish(ListEvent::StatusChanged(message));
    }

    fn publish(&self, event: ListEvent) {
        lock(&self.inner.subscribers).retain(|tx| tx.send(event.clone()).is_ok());
    }
}

/// Poisoned locks are recovered; a panicked worker must not wedge the UI.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    use super::*;
    use crate::models::seed_products;

    struct MemoryStore(Vec<Product>);

    impl ProductStore for MemoryStore {
        fn ensure_ready(&self) -> Result<(), StoreError> {
            Ok(())
        }

        fn fetch_all_products(&self) -> Result<Vec<Product>, StoreError> {
            Ok(self.0.clone())
        }
    }

    struct BrokenStore;

    impl ProductStore for BrokenStore {
        fn ensure_ready(&self) -> Result<(), StoreError> {
            Err(StoreError::Database(rusqlite::Error::QueryReturnedNoRows))
        }

        fn fetch_all_products(&self) -> Result<Vec<Product>, StoreError> {
            unreachable!("ensure_ready fails first")
        }
    }

    fn fixed_clock() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn starts_ready_and_empty() {
        let controller = ListController::new(MemoryStore(seed_products()), Exporter::new(None));
        assert_eq!(controller.snapshot(), ListState::default());
        assert_eq!(controller.snapshot().status_message, "Ready to load data.");
    }

    #[test]
    fn refresh_replaces_products_and_reports_count() {
        let controller = ListController::new(MemoryStore(seed_products()), Exporter::new(None));
        controller.refresh();

        let state = controller.snapshot();
        assert_eq!(state.products, seed_products());
        assert_eq!(state.status_message, "Loaded 4 items.");
    }

    #[test]
    fn refresh_publishes_events_in_order() {
        let controller = ListController::new(MemoryStore(seed_products()), Exporter::new(None));
        let rx = controller.subscribe();
        controller.refresh();

        let events: Vec<ListEvent> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                ListEvent::StatusChanged("Loading data...".into()),
                ListEvent::ProductsReplaced(seed_products()),
                ListEvent::StatusChanged("Loaded 4 items.".into()),
            ]
        );
    }

    #[test]
    fn failed_refresh_reports_error_and_keeps_list() {
        let controller = ListController::new(BrokenStore, Exporter::new(None));
        controller.refresh();

        let state = controller.snapshot();
        assert!(state.products.is_empty());
        assert!(state.status_message.starts_with("Error: "), "{}", state.status_message);
    }

    #[test]
    fn export_with_no_products_writes_nothing() {
        let dir = tempdir().unwrap();
        let controller = ListController::new(
            MemoryStore(Vec::new()),
            Exporter::new(Some(dir.path().to_path_buf())),
        );
        controller.refresh();
        controller.export_csv();

        assert_eq!(controller.snapshot().status_message, "No data to export.");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
        assert!(controller.last_export().is_none());
    }

    #[test]
    fn export_writes_named_file_and_reports_it() {
        let dir = tempdir().unwrap();
        let products = vec![Product::new(5, "Widget, Pro", dec!(10.00), 3)];
        let controller = ListController::with_clock(
            MemoryStore(products),
            Exporter::new(Some(dir.path().to_path_buf())),
            fixed_clock,
        );
        controller.refresh();
        controller.export_csv();

        assert_eq!(
            controller.snapshot().status_message,
            "Exported to Desktop: Products_20240102_030405.csv"
        );
        let path = dir.path().join("Products_20240102_030405.csv");
        assert_eq!(controller.last_export(), Some(path.clone()));
        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "Id,Name,Price,Stock\n5,\"Widget, Pro\",10.00,3\n"
        );
    }

    #[test]
    fn export_failure_becomes_status() {
        let controller = ListController::new(MemoryStore(seed_products()), Exporter::new(None));
        controller.refresh();
        controller.export_csv();

        assert_eq!(
            controller.snapshot().status_message,
            "Error: the Desktop folder could not be located"
        );
    }

    #[test]
    fn initialize_loads_in_background() {
        let controller = ListController::new(MemoryStore(seed_products()), Exporter::new(None));
        let rx = controller.subscribe();
        controller.initialize().join().unwrap();

        let mut local = ListState::default();
        for event in rx.try_iter() {
            event.apply(&mut local);
        }
        assert_eq!(local, controller.snapshot());
        assert_eq!(local.products.len(), 4);
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let controller = ListController::new(MemoryStore(seed_products()), Exporter::new(None));
        drop(controller.subscribe());
        let rx = controller.subscribe();
        controller.refresh();

        assert_eq!(lock(&controller.inner.subscribers).len(), 1);
        assert_eq!(rx.try_iter().count(), 3);
    }
}
