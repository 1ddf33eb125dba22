#![allow(dead_code)]

pub const APPLICATION_NAME: &str = "Kiosk Display Controller";
pub const APPLICATION_CONFIG_DIRECTORY: &str = "kiosk-display-controller";
pub const INSTANCE_LOCK_FILE_NAME: &str = "kiosk-display-controller.lock";

pub const LOG_TAG_MAIN: &str = "[MAIN]";
pub const LOG_TAG_DISPLAYS: &str = "[DISPLAYS]";
pub const LOG_TAG_BROWSER: &str = "[BROWSER]";
pub const LOG_TAG_ASSETS: &str = "[ASSETS]";
pub const LOG_TAG_HTTP: &str = "[HTTP]";
pub const LOG_TAG_UPLOAD: &str = "[UPLOAD]";
pub const LOG_TAG_READINESS: &str = "[READINESS]";
pub const LOG_TAG_NETWORK: &str = "[NETWORK]";

pub const ALLOWED_MEDIA_EXTENSIONS: [&str; 8] =
    ["pdf", "mp4", "webm", "ogg", "jpg", "jpeg", "png", "gif"];

pub const DISPLAY_NAME_PREFIX: &str = "Display";
pub const STAGING_DIRECTORY_NAME: &str = ".incoming";
pub const LAST_URL_FILE_NAME: &str = "last_url.txt";

pub const UPLOAD_PAGE_TEMPLATE: &str = "user_upload.html";
pub const DEFAULT_PAGE_TEMPLATE: &str = "default.html";
pub const FAVICON_FILE_NAME: &str = "favicon.ico";
pub const TEMPLATE_PLACEHOLDER_IP: [&str; 2] = ["{{ my_ip }}", "{{my_ip}}"];
pub const TEMPLATE_PLACEHOLDER_PORT: [&str; 2] = ["{{ port }}", "{{port}}"];

pub const DEFAULT_HTTP_PORT: u16 = 80;
pub const DEFAULT_ASSETS_DIRECTORY: &str = "assets";
pub const DEFAULT_TEMPLATES_DIRECTORY: &str = "templates";
pub const DEFAULT_READINESS_POLL_INTERVAL_MILLIS: u64 = 1000;
pub const DEFAULT_READINESS_TIMEOUT_SECONDS: u64 = 60;
pub const DEFAULT_MAX_UPLOAD_MEGABYTES: usize = 1024;

pub const DEFAULT_CHROMEDRIVER_PATH: &str = "chromedriver";
pub const ARM_CHROMEDRIVER_PATH: &str = "/usr/bin/chromedriver";
pub const ARM_BROWSER_BINARY_PATH: &str = "/usr/bin/chromium";
pub const CHROMEDRIVER_STARTUP_TIMEOUT_SECONDS: u64 = 20;
pub const CHROMEDRIVER_POLL_INTERVAL_MILLIS: u64 = 200;
pub const CHROMEDRIVER_LAUNCH_ATTEMPTS: usize = 2;
pub const DEFAULT_BROWSER_COMMAND_TIMEOUT_SECONDS: u64 = 30;

pub const LOCAL_ADDRESS_PROBE_TARGET: &str = "8.8.8.8:80";
pub const LOCAL_ADDRESS_FALLBACK: &str = "127.0.0.1";

pub const MESSAGE_UPLOAD_SUCCEEDED: &str = "File uploaded successfully";
pub const ERROR_NO_FILE_PART: &str = "No file part";
pub const ERROR_NO_SELECTED_FILE: &str = "No selected file";
pub const ERROR_INVALID_FILE_TYPE: &str = "Invalid file type";
pub const ERROR_INVALID_FILE_NAME: &str = "Invalid file name";
pub const ERROR_UNKNOWN_DISPLAY: &str = "Unknown display";
pub const ERROR_UPLOAD_FAILED: &str = "Failed to upload file";
pub const ERROR_NOT_FOUND: &str = "Not found";

pub const ERROR_CONTEXT_ENUMERATE_MONITORS: &str = "Unable to enumerate monitors";
pub const ERROR_CONTEXT_MONITOR_GEOMETRY: &str = "Unable to read monitor geometry";

pub const SETTINGS_FILE_NAME: &str = "settings.json";

pub const STARTUP_BANNER: &str = r#"
╔════════════════════════════════════════════════════════╗
║  Kiosk Display Controller                              ║
║                                                        ║
║  Upload media from any device on the network.          ║
║  Press Ctrl+C to exit                                  ║
║                                                        ║
╚════════════════════════════════════════════════════════╝
"#;
