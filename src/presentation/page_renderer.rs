use anyhow::{Context, Result};
use std::path::Path;

use crate::global_constants::{TEMPLATE_PLACEHOLDER_IP, TEMPLATE_PLACEHOLDER_PORT};

/// Reads `template_name` from `templates_directory` and fills in the host
/// address and port. `Ok(None)` when the template does not exist.
pub async fn render_page(
    templates_directory: &Path,
    template_name: &str,
    local_ip_address: &str,
    port: u16,
) -> Result<Option<String>> {
    let template_path = templates_directory.join(template_name);

    match tokio::fs::read_to_string(&template_path).await {
        Ok(contents) => Ok(Some(substitute_placeholders(
            &contents,
            local_ip_address,
            port,
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("failed to read template {:?}", template_path)),
    }
}

pub fn substitute_placeholders(contents: &str, local_ip_address: &str, port: u16) -> String {
    let port = port.to_string();
    let mut rendered = contents.to_string();

    for placeholder in TEMPLATE_PLACEHOLDER_IP {
        rendered = rendered.replace(placeholder, local_ip_address);
    }
    for placeholder in TEMPLATE_PLACEHOLDER_PORT {
        rendered = rendered.replace(placeholder, &port);
    }

    rendered
}
