use serde::Serialize;

use crate::constants::nvidia;

/// Integer suffix of a `Screen_<key>` section, referenced by layout rows
pub type ScreenKey = u32;

/// Top-left corner of a screen in the combined desktop, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0, y: 0 };

    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// One monitor entry from the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Screen {
    pub key: ScreenKey,
    /// Output name as reported by xrandr, e.g. `DP-0`
    pub id: String,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub refresh_rate: u32,
}

impl Screen {
    /// `WxH`, as written in the config and in the MetaMode
    pub fn resolution(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    /// Placeholder screens (`DUMMY-<n>`) take up room in the layout but are
    /// never sent to the driver
    pub fn is_placeholder(&self) -> bool {
        self.id
            .strip_prefix(nvidia::PLACEHOLDER_PREFIX)
            .and_then(|rest| rest.chars().next())
            .is_some_and(|c| c.is_ascii_digit())
    }
}
