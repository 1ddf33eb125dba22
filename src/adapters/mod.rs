mod chrome_driver_launcher;
mod file_system_asset_store;
mod readiness_probe;

pub use chrome_driver_launcher::ChromeDriverLauncher;
pub use file_system_asset_store::FileSystemAssetStore;
pub use readiness_probe::HttpReadinessProbe;
