use anyhow::{Context, Result};

use crate::core::interfaces::ports::DisplayEnumerator;
use crate::core::models::Display;
use crate::global_constants::{
    ERROR_CONTEXT_ENUMERATE_MONITORS, ERROR_CONTEXT_MONITOR_GEOMETRY, LOG_TAG_DISPLAYS,
};

struct MonitorGeometry {
    x_position: i32,
    y_position: i32,
    width: u32,
    height: u32,
}

pub struct XcapDisplayEnumerator;

impl XcapDisplayEnumerator {
    pub fn initialize() -> Self {
        log::debug!("{} initializing xcap display enumerator", LOG_TAG_DISPLAYS);
        Self
    }

    fn list_system_monitors(&self) -> Result<Vec<xcap::Monitor>> {
        xcap::Monitor::all().with_context(|| ERROR_CONTEXT_ENUMERATE_MONITORS)
    }

    fn read_monitor_geometry(&self, monitor: &xcap::Monitor) -> Result<MonitorGeometry> {
        Ok(MonitorGeometry {
            x_position: monitor.x().with_context(|| ERROR_CONTEXT_MONITOR_GEOMETRY)?,
            y_position: monitor.y().with_context(|| ERROR_CONTEXT_MONITOR_GEOMETRY)?,
            width: monitor.width().with_context(|| ERROR_CONTEXT_MONITOR_GEOMETRY)?,
            height: monitor.height().with_context(|| ERROR_CONTEXT_MONITOR_GEOMETRY)?,
        })
    }

    fn convert_geometries_to_displays(&self, geometries: Vec<MonitorGeometry>) -> Result<Vec<Display>> {
        if geometries.is_empty() {
            anyhow::bail!("no connected monitors found");
        }

        let displays = geometries
            .into_iter()
            .enumerate()
            .map(|(index, geometry)| {
                log::info!(
                    "{} found display {} at ({}, {}) {}x{}",
                    LOG_TAG_DISPLAYS,
                    index,
                    geometry.x_position,
                    geometry.y_position,
                    geometry.width,
                    geometry.height
                );
                Display::at_geometry(
                    index,
                    geometry.x_position,
                    geometry.y_position,
                    geometry.width,
                    geometry.height,
                )
            })
            .collect();

        Ok(displays)
    }
}

impl DisplayEnumerator for XcapDisplayEnumerator {
    fn enumerate_displays(&self) -> Result<Vec<Display>> {
        let monitors = self.list_system_monitors()?;
        let geometries = monitors
            .iter()
            .map(|monitor| self.read_monitor_geometry(monitor))
            .collect::<Result<Vec<_>>>()?;

        self.convert_geometries_to_displays(geometries)
    }
}
