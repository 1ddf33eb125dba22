pub mod kiosk_context;

pub use kiosk_context::KioskContext;
