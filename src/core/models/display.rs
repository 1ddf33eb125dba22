use serde::Serialize;

use crate::global_constants::DISPLAY_NAME_PREFIX;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Display {
    pub id: usize,
    pub x_position: i32,
    pub y_position: i32,
    pub width: u32,
    pub height: u32,
}

impl Display {
    pub fn at_geometry(id: usize, x_position: i32, y_position: i32, width: u32, height: u32) -> Self {
        log::debug!(
            "[DISPLAY] display {} at ({}, {}) {}x{}",
            id,
            x_position,
            y_position,
            width,
            height
        );

        Self {
            id,
            x_position,
            y_position,
            width,
            height,
        }
    }

    /// Name shown to the operator and used as the display's asset directory.
    pub fn name(&self) -> String {
        format!("{} {}", DISPLAY_NAME_PREFIX, self.id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DisplayNameEntry {
    pub id: usize,
    pub name: String,
}

impl From<&Display> for DisplayNameEntry {
    fn from(display: &Display) -> Self {
        Self {
            id: display.id,
            name: display.name(),
        }
    }
}
