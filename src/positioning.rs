//! Flow layout: rows stack top to bottom, screens in a row sit left to right

use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

use crate::config::{Layout, ScreenRegistry};
use crate::types::{Position, Screen, ScreenKey};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("Screen_{0} not found in config")]
    UnknownScreen(ScreenKey),

    #[error("layout is wider or taller than {} pixels", u32::MAX)]
    Overflow,
}

/// Screen registry plus the offsets computed for the screens in the layout
#[derive(Debug)]
pub struct PositionedLayout<'a> {
    screens: &'a ScreenRegistry,
    positions: HashMap<ScreenKey, Position>,
}

/// A screen with its offset, as printed by `--print-layout`
#[derive(Debug, Serialize)]
pub struct PlacedScreen<'a> {
    #[serde(flatten)]
    pub screen: &'a Screen,
    pub position: Position,
}

impl<'a> PositionedLayout<'a> {
    pub fn position_of(&self, key: ScreenKey) -> Option<Position> {
        self.positions.get(&key).copied()
    }

    /// Screens that received a position, in registry order
    pub fn placed(&self) -> impl Iterator<Item = PlacedScreen<'a>> + '_ {
        self.screens.iter().filter_map(|screen| {
            self.position_of(screen.key)
                .map(|position| PlacedScreen { screen, position })
        })
    }
}

/// Assign every screen in `layout` its top-left offset
///
/// Each screen gets the running offset, then x advances by its width. At the
/// end of a row x returns to 0 and y advances by the row's tallest screen.
/// A key used twice keeps its last position.
pub fn compute_positions<'a>(
    layout: &Layout,
    screens: &'a ScreenRegistry,
) -> Result<PositionedLayout<'a>, PositionError> {
    let mut positions = HashMap::new();
    let mut offset = Position::ORIGIN;

    for row in layout.rows() {
        let mut row_height = 0;
        for &key in row {
            let screen = screens.get(key).ok_or(PositionError::UnknownScreen(key))?;
            positions.insert(key, offset);
            debug!(key, id = %screen.id, x = offset.x, y = offset.y, "Positioned screen");

            offset.x = offset
                .x
                .checked_add(screen.width)
                .ok_or(PositionError::Overflow)?;
            row_height = row_height.max(screen.height);
        }
        offset = Position::new(
            0,
            offset.y.checked_add(row_height).ok_or(PositionError::Overflow)?,
        );
    }

    Ok(PositionedLayout { screens, positions })
}
