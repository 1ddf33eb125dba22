mod browser_launcher;
mod display_enumerator;

pub use browser_launcher::{BrowserLauncher, KioskSession};
pub use display_enumerator::DisplayEnumerator;
