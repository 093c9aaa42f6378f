//! Single-light and bulk operations.

use super::LedController;
use crate::color::{self, BLACK};
use crate::error::{LedringError, Result};
use crate::light::Light;
use crate::service::LightService;
use crate::wait::Sleeper;

impl<S: LightService, W: Sleeper> LedController<S, W> {
    /// All lights that belong to a named group, in service order.
    pub fn get_group_leds(&self) -> Result<Vec<Light>> {
        let response = self.service.get_all()?;
        Ok(response
            .lights
            .into_iter()
            .filter(Light::is_grouped)
            .collect())
    }

    /// A single light by id. If the service returns several, the first wins.
    pub fn get_light(&self, id: u32) -> Result<Light> {
        self.service
            .get_one(id)?
            .lights
            .into_iter()
            .next()
            .ok_or_else(|| LedringError::NotFound(format!("no light with id {id}")))
    }

    /// Set a light's color. Setting a color always powers the light on.
    pub fn set_led(&self, id: u32, color: &str) -> Result<()> {
        let color = color::normalize_color(color)?;
        self.service.set_one(id, &color, true)?;
        Ok(())
    }

    /// Delete a light from the service.
    pub fn delete_light(&self, id: u32) -> Result<()> {
        self.service.delete_one(id)
    }

    /// Turn every ring light off, in ring order. Stops at the first failure.
    pub fn turn_off_all_leds(&self) -> Result<()> {
        for &id in self.ring.ids() {
            self.service.set_one(id, BLACK, false)?;
        }
        Ok(())
    }

    /// First light in the service's collection.
    pub fn demo(&self) -> Result<Light> {
        self.service
            .get_all()?
            .lights
            .into_iter()
            .next()
            .ok_or_else(|| LedringError::NotFound("the service returned no lights".into()))
    }
}
