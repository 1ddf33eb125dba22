mod display;
mod kiosk_settings;
pub mod kiosk_window;
mod media_upload;
mod staged_file;

pub use display::{Display, DisplayNameEntry};
pub use kiosk_settings::KioskSettings;
pub use kiosk_window::KioskWindow;
pub use media_upload::{
    check_file_name, is_plain_file_name, UploadForm, UploadReceipt, UploadRejection,
    UploadedFilePart, ValidatedUpload,
};
pub use staged_file::StagedFile;
