//! Binary entry point: resolve locations, start file logging, wire the
//! SQLite store and the exporter into a controller, then hand the terminal
//! to the UI until the user quits.
use product_export::{init_logging, run_app, App, Exporter, ListController, Settings, SqliteStore};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;
    let _log_guard = init_logging(&settings.log_dir)?;
    info!(
        db = %settings.db_path.display(),
        export_dir = ?settings.export_dir,
        "starting product-export"
    );

    let store = SqliteStore::new(&settings.db_path);
    let exporter = Exporter::new(settings.export_dir.clone());
    let controller = ListController::new(store, exporter);

    let mut app = App::new(controller.clone());
    // The first load runs in the background; the UI picks it up on its next tick.
    let _initial_load = controller.initialize();

    let result = run_app(&mut app);
    info!("shutting down");
    result
}
