//! MetaMode strings understood by nvidia-settings
//!
//! One entry per screen, `<id>: <W>x<H>_<rate> +<x>+<y> {ForceCompositionPipeline=On}`,
//! joined with `, `.

use crate::constants::nvidia::{COMPOSITION_TOKEN, MODE_SEPARATOR};
use crate::positioning::{PlacedScreen, PositionedLayout};

pub fn screen_mode(placed: &PlacedScreen<'_>) -> String {
    let PlacedScreen { screen, position } = placed;
    format!(
        "{}: {}_{} +{}+{} {}",
        screen.id,
        screen.resolution(),
        screen.refresh_rate,
        position.x,
        position.y,
        COMPOSITION_TOKEN
    )
}

/// Composite mode string for every placed, non-placeholder screen
///
/// Returns `None` when nothing would be sent to the driver.
pub fn composite(layout: &PositionedLayout<'_>) -> Option<String> {
    let modes: Vec<String> = layout
        .placed()
        .filter(|placed| !placed.screen.is_placeholder())
        .map(|placed| screen_mode(&placed))
        .collect();

    (!modes.is_empty()).then(|| modes.join(MODE_SEPARATOR))
}
