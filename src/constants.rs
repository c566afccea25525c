//! Application-wide constants
//!
//! Config file locations, INI names and the pieces of the MetaMode syntax
//! understood by nvidia-settings.

/// Config file location under the user's config directory
pub mod config {
    /// Application directory (`~/.config/nvx`)
    pub const APP_DIR: &str = "nvx";

    /// Config file name
    pub const FILENAME: &str = "nvx.conf";
}

/// INI section and option names
pub mod ini {
    /// Section holding the `Row_<n>` options
    pub const LAYOUT_SECTION: &str = "Layout";

    /// Prefix of layout row options (`Row_1`, `Row_2`, ...)
    pub const ROW_PREFIX: &str = "Row_";

    /// Prefix of screen sections (`Screen_1`, `Screen_2`, ...)
    pub const SCREEN_PREFIX: &str = "Screen_";

    pub const SCREEN_ID: &str = "ScreenID";
    pub const SCREEN_NAME: &str = "ScreenName";
    pub const SCREEN_RESOLUTION: &str = "ScreenResolution";
    pub const SCREEN_REFRESH_RATE: &str = "ScreenRefreshRate";
}

/// Template written on first run
pub mod defaults {
    pub const ROW: &str = "1";
    pub const SCREEN_SECTION: &str = "Screen_1";
    pub const SCREEN_ID: &str = "DP-0";
    pub const SCREEN_NAME: &str = "Screen 1";
    pub const SCREEN_RESOLUTION: &str = "1920x1080";
    pub const SCREEN_REFRESH_RATE: &str = "60";
}

/// nvidia-settings invocation
pub mod nvidia {
    /// External binary applying the MetaMode
    pub const PROGRAM: &str = "nvidia-settings";

    /// Flag preceding an `Attribute=Value` assignment
    pub const ASSIGN_FLAG: &str = "--assign";

    /// Attribute receiving the composite mode string
    pub const METAMODE_ATTRIBUTE: &str = "CurrentMetaMode";

    /// Appended to every screen's mode to avoid tearing
    pub const COMPOSITION_TOKEN: &str = "{ForceCompositionPipeline=On}";

    /// Separator between per-screen modes
    pub const MODE_SEPARATOR: &str = ", ";

    /// Screens whose id starts with this (followed by a digit) only reserve space
    pub const PLACEHOLDER_PREFIX: &str = "DUMMY-";
}

/// Process exit statuses
pub mod exit {
    /// Any validation, usage or command failure
    pub const FAILURE: u8 = 1;

    /// A template config was written and must be edited first
    pub const BOOTSTRAPPED: u8 = 2;
}
