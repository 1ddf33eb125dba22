use serde::Serialize;
use std::fmt;

use crate::core::models::{Display, StagedFile};
use crate::global_constants;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadRejection {
    MissingFilePart,
    EmptyFileName,
    UnsupportedFileType,
    InvalidFileName,
    UnknownDisplay,
}

impl UploadRejection {
    pub fn reason(&self) -> &'static str {
        match self {
            UploadRejection::MissingFilePart => global_constants::ERROR_NO_FILE_PART,
            UploadRejection::EmptyFileName => global_constants::ERROR_NO_SELECTED_FILE,
            UploadRejection::UnsupportedFileType => global_constants::ERROR_INVALID_FILE_TYPE,
            UploadRejection::InvalidFileName => global_constants::ERROR_INVALID_FILE_NAME,
            UploadRejection::UnknownDisplay => global_constants::ERROR_UNKNOWN_DISPLAY,
        }
    }
}

impl fmt::Display for UploadRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// The file field of an upload. Its body is only staged when the file name
/// already passed [`check_file_name`].
#[derive(Debug)]
pub struct UploadedFilePart {
    pub file_name: String,
    pub staged_file: Option<StagedFile>,
}

/// Raw fields of an upload request, in whatever order the client sent them.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file_part: Option<UploadedFilePart>,
    pub display_name: Option<String>,
    pub display_id: Option<String>,
}

#[derive(Debug)]
pub struct ValidatedUpload {
    pub display: Display,
    pub file_name: String,
    pub staged_file: StagedFile,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadReceipt {
    pub message: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
}

impl UploadReceipt {
    pub fn for_display(display: &Display) -> Self {
        Self {
            message: global_constants::MESSAGE_UPLOAD_SUCCEEDED.to_string(),
            display_name: display.name(),
        }
    }
}

impl UploadForm {
    pub fn validate(self, displays: &[Display]) -> Result<ValidatedUpload, UploadRejection> {
        let file_part = self.file_part.ok_or(UploadRejection::MissingFilePart)?;
        check_file_name(&file_part.file_name)?;
        let staged_file = file_part
            .staged_file
            .ok_or(UploadRejection::MissingFilePart)?;

        let display = resolve_target_display(
            displays,
            self.display_id.as_deref(),
            self.display_name.as_deref(),
        )
        .ok_or(UploadRejection::UnknownDisplay)?;

        Ok(ValidatedUpload {
            display: display.clone(),
            file_name: file_part.file_name,
            staged_file,
        })
    }
}

/// The file-level checks, in the order their rejections are reported.
pub fn check_file_name(file_name: &str) -> Result<(), UploadRejection> {
    if file_name.is_empty() {
        return Err(UploadRejection::EmptyFileName);
    }

    if !is_allowed_media_file(file_name) {
        return Err(UploadRejection::UnsupportedFileType);
    }

    if !is_plain_file_name(file_name) {
        return Err(UploadRejection::InvalidFileName);
    }

    Ok(())
}

pub fn is_allowed_media_file(file_name: &str) -> bool {
    let extension = match file_name.rsplit_once('.') {
        Some((_, extension)) => extension.to_ascii_lowercase(),
        None => return false,
    };

    global_constants::ALLOWED_MEDIA_EXTENSIONS.contains(&extension.as_str())
}

pub fn is_plain_file_name(file_name: &str) -> bool {
    !file_name.contains('/')
        && !file_name.contains('\\')
        && file_name != "."
        && file_name != ".."
}

fn resolve_target_display<'a>(
    displays: &'a [Display],
    display_id: Option<&str>,
    display_name: Option<&str>,
) -> Option<&'a Display> {
    let display_id: usize = display_id?.trim().parse().ok()?;
    let display = displays.iter().find(|display| display.id == display_id)?;

    if display.name() != display_name? {
        log::warn!(
            "[UPLOAD] display name {:?} does not match display id {}",
            display_name,
            display_id
        );
        return None;
    }

    Some(display)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_displays() -> Vec<Display> {
        vec![
            Display::at_geometry(0, 0, 0, 1920, 1080),
            Display::at_geometry(1, 1920, 0, 1280, 1024),
        ]
    }

    fn create_staged_file() -> StagedFile {
        let path = std::env::temp_dir().join(format!("kiosk-upload-test-{}", uuid::Uuid::new_v4()));
        std::fs::write(&path, [1, 2, 3]).unwrap();
        StagedFile::new(path)
    }

    fn create_form(file_name: &str, display_name: &str, display_id: &str) -> UploadForm {
        UploadForm {
            file_part: Some(UploadedFilePart {
                file_name: file_name.to_string(),
                staged_file: Some(create_staged_file()),
            }),
            display_name: Some(display_name.to_string()),
            display_id: Some(display_id.to_string()),
        }
    }

    #[test]
    fn test_validate_accepts_allowed_file_for_known_display() {
        let form = create_form("poster.png", "Display 1", "1");

        let upload = form.validate(&create_test_displays()).unwrap();

        assert_eq!(upload.display.id, 1);
        assert_eq!(upload.file_name, "poster.png");
        assert_eq!(std::fs::read(upload.staged_file.path()).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_rejected_upload_discards_staged_file() {
        let form = create_form("poster.png", "Display 9", "9");
        let staged_path = form
            .file_part
            .as_ref()
            .and_then(|part| part.staged_file.as_ref())
            .map(|staged_file| staged_file.path().to_path_buf())
            .unwrap();

        let result = form.validate(&create_test_displays());

        assert_eq!(result.unwrap_err(), UploadRejection::UnknownDisplay);
        assert!(!staged_path.exists());
    }

    #[test]
    fn test_check_file_name_reports_empty_name_before_extension() {
        assert_eq!(check_file_name(""), Err(UploadRejection::EmptyFileName));
        assert_eq!(check_file_name("notes.txt"), Err(UploadRejection::UnsupportedFileType));
        assert_eq!(check_file_name("a/b.png"), Err(UploadRejection::InvalidFileName));
        assert_eq!(check_file_name("b.png"), Ok(()));
    }

    #[test]
    fn test_validate_without_file_part_is_rejected() {
        let form = UploadForm {
            file_part: None,
            display_name: Some("Display 0".to_string()),
            display_id: Some("0".to_string()),
        };

        let result = form.validate(&create_test_displays());

        assert_eq!(result.unwrap_err(), UploadRejection::MissingFilePart);
    }

    #[test]
    fn test_validate_checks_file_before_display() {
        let form = UploadForm {
            file_part: None,
            display_name: None,
            display_id: None,
        };

        let result = form.validate(&create_test_displays());

        assert_eq!(result.unwrap_err(), UploadRejection::MissingFilePart);
    }

    #[test]
    fn test_validate_with_empty_file_name_is_rejected() {
        let form = create_form("", "Display 0", "0");

        let result = form.validate(&create_test_displays());

        assert_eq!(result.unwrap_err(), UploadRejection::EmptyFileName);
    }

    #[test]
    fn test_validate_with_disallowed_extension_is_rejected() {
        let form = create_form("archive.zip", "Display 0", "0");

        let result = form.validate(&create_test_displays());

        assert_eq!(result.unwrap_err(), UploadRejection::UnsupportedFileType);
    }

    #[test]
    fn test_validate_with_path_in_file_name_is_rejected() {
        let form = create_form("../../etc/evil.png", "Display 0", "0");

        let result = form.validate(&create_test_displays());

        assert_eq!(result.unwrap_err(), UploadRejection::InvalidFileName);
    }

    #[test]
    fn test_validate_with_unknown_display_id_is_rejected() {
        let form = create_form("clip.mp4", "Display 7", "7");

        let result = form.validate(&create_test_displays());

        assert_eq!(result.unwrap_err(), UploadRejection::UnknownDisplay);
    }

    #[test]
    fn test_validate_with_mismatched_display_name_is_rejected() {
        let form = create_form("clip.mp4", "Display 0", "1");

        let result = form.validate(&create_test_displays());

        assert_eq!(result.unwrap_err(), UploadRejection::UnknownDisplay);
    }

    #[test]
    fn test_validate_with_missing_display_fields_is_rejected() {
        let mut form = create_form("clip.mp4", "Display 0", "0");
        form.display_id = None;

        let result = form.validate(&create_test_displays());

        assert_eq!(result.unwrap_err(), UploadRejection::UnknownDisplay);
    }

    #[test]
    fn test_is_allowed_media_file_covers_every_listed_extension() {
        for extension in global_constants::ALLOWED_MEDIA_EXTENSIONS {
            assert!(is_allowed_media_file(&format!("media.{}", extension)));
        }
    }

    #[test]
    fn test_is_allowed_media_file_ignores_case() {
        assert!(is_allowed_media_file("HOLIDAY.JPG"));
    }

    #[test]
    fn test_is_allowed_media_file_rejects_missing_extension() {
        assert!(!is_allowed_media_file("README"));
        assert!(!is_allowed_media_file("movie.mp4.exe"));
    }

    #[test]
    fn test_rejection_reasons_match_api_messages() {
        assert_eq!(UploadRejection::MissingFilePart.reason(), "No file part");
        assert_eq!(UploadRejection::EmptyFileName.reason(), "No selected file");
        assert_eq!(UploadRejection::UnsupportedFileType.to_string(), "Invalid file type");
    }

    #[test]
    fn test_upload_receipt_serializes_display_name_in_camel_case() {
        let receipt = UploadReceipt::for_display(&Display::at_geometry(0, 0, 0, 800, 600));

        let serialized = serde_json::to_value(&receipt).unwrap();

        assert_eq!(serialized["displayName"], "Display 0");
        assert_eq!(serialized["message"], "File uploaded successfully");
    }
}
