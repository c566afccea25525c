//! Validated user configuration
//!
//! Turns the raw INI document into a [`UserConfig`], checking the layout,
//! every screen section and the layout's references in one pass so that the
//! user sees all problems at once.

use ini::Ini;
use thiserror::Error;

use super::layout::{Layout, LayoutError};
use super::screens::{ScreenError, ScreenRegistry};
use crate::constants::ini::LAYOUT_SECTION;
use crate::types::ScreenKey;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigIssue {
    #[error("no [Layout] section found in config")]
    MissingLayoutSection,

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Screen(#[from] ScreenError),

    #[error("layout references Screen_{0}, which is not defined in config")]
    UnknownScreen(ScreenKey),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration ({} problem(s)):{}", .0.len(), format_issues(.0))]
    Invalid(Vec<ConfigIssue>),
}

impl ConfigError {
    #[cfg(test)]
    pub fn issues(&self) -> &[ConfigIssue] {
        match self {
            ConfigError::Invalid(issues) => issues,
        }
    }
}

fn format_issues(issues: &[ConfigIssue]) -> String {
    issues.iter().map(|issue| format!("\n  - {issue}")).collect()
}

/// Layout and screens, both validated
#[derive(Debug, Clone)]
pub struct UserConfig {
    pub layout: Layout,
    pub screens: ScreenRegistry,
}

impl UserConfig {
    /// Validate an INI document
    ///
    /// When `layout_override` is given the `[Layout]` section is neither
    /// required nor parsed.
    pub fn from_ini(ini: &Ini, layout_override: Option<Layout>) -> Result<Self, ConfigError> {
        let mut issues = Vec::new();

        let layout = match layout_override {
            Some(layout) => Some(layout),
            None => match ini.section(Some(LAYOUT_SECTION)) {
                Some(section) => Layout::parse_section(section)
                    .map_err(|errors| issues.extend(errors.into_iter().map(ConfigIssue::from)))
                    .ok(),
                None => {
                    issues.push(ConfigIssue::MissingLayoutSection);
                    None
                }
            },
        };

        let screens = ScreenRegistry::from_ini(ini)
            .map_err(|errors| issues.extend(errors.into_iter().map(ConfigIssue::from)))
            .ok();

        if let (Some(layout), Some(screens)) = (&layout, &screens) {
            let mut unknown: Vec<ScreenKey> = Vec::new();
            for key in layout.keys().filter(|key| !screens.contains(*key)) {
                if !unknown.contains(&key) {
                    unknown.push(key);
                }
            }
            issues.extend(unknown.into_iter().map(ConfigIssue::UnknownScreen));
        }

        match (layout, screens) {
            (Some(layout), Some(screens)) if issues.is_empty() => Ok(Self { layout, screens }),
            _ => Err(ConfigError::Invalid(issues)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(contents: &str, layout_override: Option<Layout>) -> Result<UserConfig, ConfigError> {
        UserConfig::from_ini(&Ini::load_from_str(contents).unwrap(), layout_override)
    }

    const SCREENS: &str = "\
[Screen_1]
ScreenID = DP-0
ScreenName = Left
ScreenResolution = 1920x1080
ScreenRefreshRate = 60

[Screen_2]
ScreenID = DP-2
ScreenName = Right
ScreenResolution = 1920x1080
ScreenRefreshRate = 60
";

    #[test]
    fn test_valid_config() {
        let config = parse(&format!("[Layout]\nRow_1 = 1 2\n\n{SCREENS}"), None).unwrap();

        assert_eq!(config.layout.rows(), &[vec![1, 2]]);
        assert_eq!(config.screens.len(), 2);
    }

    #[test]
    fn test_missing_layout_section() {
        let err = parse(SCREENS, None).unwrap_err();
        assert_eq!(err.issues(), &[ConfigIssue::MissingLayoutSection]);
    }

    #[test]
    fn test_override_skips_layout_section() {
        // The broken [Layout] section is never looked at
        let contents = format!("[Layout]\nRow_1 = one\n\n{SCREENS}");
        let config = parse(&contents, Some(Layout::from_rows(vec![vec![2], vec![1]]))).unwrap();

        assert_eq!(config.layout.rows(), &[vec![2], vec![1]]);
    }

    #[test]
    fn test_unknown_screen_reference() {
        let err = parse(&format!("[Layout]\nRow_1 = 3 1\nRow_2 = 4 3\n\n{SCREENS}"), None).unwrap_err();

        // Each missing key is reported once
        assert_eq!(
            err.issues(),
            &[ConfigIssue::UnknownScreen(3), ConfigIssue::UnknownScreen(4)]
        );
    }

    #[test]
    fn test_issues_collected_across_sections() {
        let contents = "\
[Layout]
Row_1 = 1,2

[Screen_1]
ScreenID = abc
ScreenName = Broken
ScreenResolution = 1920x1080
ScreenRefreshRate = 60

[Screen_2]
ScreenID = DP-2
ScreenName = Also broken
ScreenResolution = big
ScreenRefreshRate = 60
";
        let err = parse(contents, None).unwrap_err();

        assert_eq!(err.issues().len(), 3);
        assert!(matches!(err.issues()[0], ConfigIssue::Layout(LayoutError::MalformedRow { .. })));
        assert!(matches!(err.issues()[1], ConfigIssue::Screen(ScreenError::InvalidId { .. })));
        assert!(matches!(
            err.issues()[2],
            ConfigIssue::Screen(ScreenError::InvalidResolution { .. })
        ));
    }

    #[test]
    fn test_error_message_lists_every_issue() {
        let err = parse("[Layout]\nRow_1 = 9\n", None).unwrap_err();
        let message = err.to_string();

        assert!(message.starts_with("invalid configuration (1 problem(s)):"));
        assert!(message.contains("\n  - config must contain at least one screen section"));
    }
}
