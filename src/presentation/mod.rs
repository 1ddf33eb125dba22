mod api_error;
mod http_server;
mod page_renderer;

pub use http_server::start_http_server;
