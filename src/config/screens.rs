//! Screen registry built from the `[Screen_<n>]` sections

use std::collections::HashMap;

use ini::{Ini, Properties};
use thiserror::Error;
use tracing::debug;

use crate::constants::ini::{
    SCREEN_ID, SCREEN_NAME, SCREEN_PREFIX, SCREEN_REFRESH_RATE, SCREEN_RESOLUTION,
};
use crate::types::{Screen, ScreenKey};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScreenError {
    #[error("[{section}] is missing the '{option}' option")]
    MissingOption { section: String, option: &'static str },

    #[error("[{section}] ScreenID must be a valid display ID, e.g. DP-0 or HDMI-2, got '{id}'")]
    InvalidId { section: String, id: String },

    #[error("[{section}] ScreenResolution must be in the format WxH, got '{value}'")]
    InvalidResolution { section: String, value: String },

    #[error("[{section}] ScreenRefreshRate must be an integer, got '{value}'")]
    InvalidRefreshRate { section: String, value: String },

    #[error("[{section}] sets '{option}' more than once")]
    DuplicateOption { section: String, option: &'static str },

    #[error("[{section}] screen number is out of range (at most {})", ScreenKey::MAX)]
    InvalidKey { section: String },

    #[error("[{section}] defines Screen_{key} a second time")]
    DuplicateKey { section: String, key: ScreenKey },

    #[error("config must contain at least one screen section, e.g. Screen_1")]
    NoScreens,
}

/// Every screen defined in the config, in file order
#[derive(Debug, Clone, Default)]
pub struct ScreenRegistry {
    screens: Vec<Screen>,
    by_key: HashMap<ScreenKey, usize>,
}

impl ScreenRegistry {
    /// Parse all `Screen_<n>` sections, collecting every problem found
    pub fn from_ini(ini: &Ini) -> Result<Self, Vec<ScreenError>> {
        let mut registry = Self::default();
        let mut errors = Vec::new();

        for (name, section) in ini.iter() {
            let Some((name, key)) = name.and_then(|n| section_key(n).map(|key| (n, key))) else {
                continue;
            };
            let Some(key) = key else {
                errors.push(ScreenError::InvalidKey {
                    section: name.to_string(),
                });
                continue;
            };
            match parse_screen(name, key, section) {
                Ok(screen) => {
                    if let Err(e) = registry.insert(name, screen) {
                        errors.push(e);
                    }
                }
                Err(mut screen_errors) => errors.append(&mut screen_errors),
            }
        }

        if registry.is_empty() && errors.is_empty() {
            errors.push(ScreenError::NoScreens);
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        debug!(screens = registry.len(), "Parsed screen sections");
        Ok(registry)
    }

    #[cfg(test)]
    pub fn from_screens(screens: impl IntoIterator<Item = Screen>) -> Result<Self, ScreenError> {
        let mut registry = Self::default();
        for screen in screens {
            let section = format!("{SCREEN_PREFIX}{}", screen.key);
            registry.insert(&section, screen)?;
        }
        Ok(registry)
    }

    fn insert(&mut self, section: &str, screen: Screen) -> Result<(), ScreenError> {
        if self.by_key.contains_key(&screen.key) {
            return Err(ScreenError::DuplicateKey {
                section: section.to_string(),
                key: screen.key,
            });
        }
        self.by_key.insert(screen.key, self.screens.len());
        self.screens.push(screen);
        Ok(())
    }

    pub fn get(&self, key: ScreenKey) -> Option<&Screen> {
        self.by_key.get(&key).map(|&index| &self.screens[index])
    }

    pub fn contains(&self, key: ScreenKey) -> bool {
        self.by_key.contains_key(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Screen> {
        self.screens.iter()
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }
}

/// `Screen_<n>` -> `Some(Some(n))`
///
/// `None` for any other section name, `Some(None)` when `n` does not fit a
/// [`ScreenKey`].
pub fn section_key(name: &str) -> Option<Option<ScreenKey>> {
    let digits = name.strip_prefix(SCREEN_PREFIX)?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(digits.parse().ok())
}

fn parse_screen(
    section_name: &str,
    key: ScreenKey,
    section: &Properties,
) -> Result<Screen, Vec<ScreenError>> {
    let mut errors = Vec::new();
    let mut required = |option: &'static str| {
        let value = section.get(option);
        if section.get_all(option).count() > 1 {
            errors.push(ScreenError::DuplicateOption {
                section: section_name.to_string(),
                option,
            });
        }
        if value.is_none() {
            errors.push(ScreenError::MissingOption {
                section: section_name.to_string(),
                option,
            });
        }
        value
    };

    let id = required(SCREEN_ID);
    let name = required(SCREEN_NAME);
    let resolution = required(SCREEN_RESOLUTION);
    let refresh_rate = required(SCREEN_REFRESH_RATE);

    let id = id.and_then(|id| {
        if is_valid_screen_id(id) {
            Some(id.to_string())
        } else {
            errors.push(ScreenError::InvalidId {
                section: section_name.to_string(),
                id: id.to_string(),
            });
            None
        }
    });

    let resolution = resolution.and_then(|value| {
        let parsed = parse_resolution(value);
        if parsed.is_none() {
            errors.push(ScreenError::InvalidResolution {
                section: section_name.to_string(),
                value: value.to_string(),
            });
        }
        parsed
    });

    let refresh_rate = refresh_rate.and_then(|value| {
        let parsed = value.trim().parse::<u32>().ok();
        if parsed.is_none() {
            errors.push(ScreenError::InvalidRefreshRate {
                section: section_name.to_string(),
                value: value.to_string(),
            });
        }
        parsed
    });

    match (id, name, resolution, refresh_rate) {
        (Some(id), Some(name), Some((width, height)), Some(refresh_rate)) if errors.is_empty() => {
            Ok(Screen {
                key,
                id,
                name: name.to_string(),
                width,
                height,
                refresh_rate,
            })
        }
        _ => Err(errors),
    }
}

/// `<word>-<digits>`, e.g. `DP-0`, `HDMI-2`, `DUMMY-1`
pub fn is_valid_screen_id(id: &str) -> bool {
    let Some((connector, index)) = id.split_once('-') else {
        return false;
    };
    !connector.is_empty()
        && connector.chars().all(|c| c.is_alphanumeric() || c == '_')
        && !index.is_empty()
        && index.chars().all(|c| c.is_ascii_digit())
}

/// `<width>x<height>` -> `(width, height)`
fn parse_resolution(value: &str) -> Option<(u32, u32)> {
    let (width, height) = value.split_once('x')?;
    let digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if !digits(width) || !digits(height) {
        return None;
    }
    Some((width.parse().ok()?, height.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(contents: &str) -> Result<ScreenRegistry, Vec<ScreenError>> {
        ScreenRegistry::from_ini(&Ini::load_from_str(contents).unwrap())
    }

    const TWO_SCREENS: &str = "\
[Screen_2]
ScreenID = HDMI-0
ScreenName = Side
ScreenResolution = 1280x1024
ScreenRefreshRate = 75

[Screen_1]
ScreenID = DP-0
ScreenName = Main
ScreenResolution = 2560x1440
ScreenRefreshRate = 144
";

    #[test]
    fn test_parse_screens_in_file_order() {
        let registry = load(TWO_SCREENS).unwrap();

        let keys: Vec<_> = registry.iter().map(|s| s.key).collect();
        assert_eq!(keys, vec![2, 1]);

        let main = registry.get(1).unwrap();
        assert_eq!(main.id, "DP-0");
        assert_eq!(main.name, "Main");
        assert_eq!((main.width, main.height), (2560, 1440));
        assert_eq!(main.refresh_rate, 144);
        assert!(registry.get(3).is_none());
    }

    #[test]
    fn test_non_screen_sections_ignored() {
        let contents = format!("[Layout]\nRow_1 = 1\n\n[Screen_x]\nScreenID = bad\n\n{TWO_SCREENS}");

        let registry = load(&contents).unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_malformed_screen_id() {
        let errors = load(
            "[Screen_1]\nScreenID = abc\nScreenName = A\nScreenResolution = 1920x1080\nScreenRefreshRate = 60\n",
        )
        .unwrap_err();

        assert_eq!(
            errors,
            vec![ScreenError::InvalidId {
                section: "Screen_1".to_string(),
                id: "abc".to_string(),
            }]
        );
    }

    #[test]
    fn test_all_problems_in_a_section_reported() {
        let errors = load("[Screen_1]\nScreenID = DP0\nScreenResolution = 1920*1080\nScreenRefreshRate = sixty\n")
            .unwrap_err();

        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ScreenError::MissingOption {
            section: "Screen_1".to_string(),
            option: SCREEN_NAME,
        }));
        assert!(errors.iter().any(|e| matches!(e, ScreenError::InvalidId { .. })));
        assert!(errors.iter().any(|e| matches!(e, ScreenError::InvalidResolution { .. })));
        assert!(errors.iter().any(|e| matches!(e, ScreenError::InvalidRefreshRate { .. })));
    }

    #[test]
    fn test_no_screen_sections() {
        assert_eq!(load("[Layout]\nRow_1 = 1\n").unwrap_err(), vec![ScreenError::NoScreens]);
    }

    #[test]
    fn test_duplicate_key() {
        let contents = format!(
            "{TWO_SCREENS}\n[Screen_01]\nScreenID = DP-4\nScreenName = Again\nScreenResolution = 800x600\nScreenRefreshRate = 60\n"
        );

        let errors = load(&contents).unwrap_err();
        assert_eq!(
            errors,
            vec![ScreenError::DuplicateKey {
                section: "Screen_01".to_string(),
                key: 1,
            }]
        );
    }

    #[test]
    fn test_out_of_range_section_number_reported() {
        let contents = format!(
            "{TWO_SCREENS}\n[Screen_4294967296]\nScreenID = abc\nScreenName = Huge\nScreenResolution = nope\nScreenRefreshRate = x\n"
        );

        let errors = load(&contents).unwrap_err();
        assert_eq!(
            errors,
            vec![ScreenError::InvalidKey {
                section: "Screen_4294967296".to_string(),
            }]
        );
    }

    #[test]
    fn test_repeated_option_reported() {
        let errors = load(
            "[Screen_1]\nScreenID = DP-0\nScreenID = HDMI-1\nScreenName = A\nScreenResolution = 1920x1080\nScreenRefreshRate = 60\n",
        )
        .unwrap_err();

        assert_eq!(
            errors,
            vec![ScreenError::DuplicateOption {
                section: "Screen_1".to_string(),
                option: SCREEN_ID,
            }]
        );
    }

    #[test]
    fn test_screen_id_validation() {
        assert!(is_valid_screen_id("DP-0"));
        assert!(is_valid_screen_id("HDMI-2"));
        assert!(is_valid_screen_id("DVI_D-10"));
        assert!(is_valid_screen_id("DUMMY-1"));
        assert!(!is_valid_screen_id("abc"));
        assert!(!is_valid_screen_id("DP-"));
        assert!(!is_valid_screen_id("-0"));
        assert!(!is_valid_screen_id("HDMI-A-0"));
        assert!(!is_valid_screen_id("DP-0 "));
    }

    #[test]
    fn test_resolution_parsing() {
        assert_eq!(parse_resolution("1920x1080"), Some((1920, 1080)));
        assert_eq!(parse_resolution("1920X1080"), None);
        assert_eq!(parse_resolution("x1080"), None);
        assert_eq!(parse_resolution("1920x1080@60"), None);
    }

    #[test]
    fn test_section_key() {
        assert_eq!(section_key("Screen_3"), Some(Some(3)));
        assert_eq!(section_key("Screen_4294967296"), Some(None));
        assert_eq!(section_key("Screen_"), None);
        assert_eq!(section_key("Layout"), None);
        assert_eq!(section_key("Screen_1b"), None);
    }

    #[test]
    fn test_from_screens_rejects_duplicates() {
        let screen = Screen {
            key: 1,
            id: "DP-0".to_string(),
            name: "Main".to_string(),
            width: 1920,
            height: 1080,
            refresh_rate: 60,
        };

        let result = ScreenRegistry::from_screens([screen.clone(), screen]);
        assert!(matches!(result, Err(ScreenError::DuplicateKey { key: 1, .. })));
    }
}
