use anyhow::Result;

use crate::core::models::Display;

pub trait DisplayEnumerator: Send + Sync {
    fn enumerate_displays(&self) -> Result<Vec<Display>>;
}
