//! Viewport profiles for device emulation.
//!
//! Each crawl pass runs under exactly one profile in its own fresh
//! browser page, so viewport-dependent behavior (responsive menus,
//! mobile-only overlays) is audited in isolation.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewportProfile {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
    pub device_scale_factor: f64,
    pub mobile: bool,
    /// Override applied when emulating a specific device.
    pub user_agent: Option<&'static str>,
}

pub const DESKTOP: ViewportProfile = ViewportProfile {
    name: "desktop",
    width: 1920,
    height: 1080,
    device_scale_factor: 1.0,
    mobile: false,
    user_agent: None,
};

/// iPhone 13 Pro.
pub const MOBILE: ViewportProfile = ViewportProfile {
    name: "mobile",
    width: 390,
    height: 844,
    device_scale_factor: 3.0,
    mobile: true,
    user_agent: Some(
        "Mozilla/5.0 (iPhone; CPU iPhone OS 15_0 like Mac OS X) AppleWebKit/605.1.15 \
         (KHTML, like Gecko) Version/15.0 Mobile/15E148 Safari/604.1",
    ),
};

/// iPad Pro 11.
pub const TABLET: ViewportProfile = ViewportProfile {
    name: "tablet",
    width: 834,
    height: 1194,
    device_scale_factor: 2.0,
    mobile: true,
    user_agent: Some(
        "Mozilla/5.0 (iPad; CPU OS 15_0 like Mac OS X) AppleWebKit/605.1.15 \
         (KHTML, like Gecko) Version/15.0 Mobile/15E148 Safari/604.1",
    ),
};

pub fn profile_by_name(name: &str) -> Option<ViewportProfile> {
    match name.trim().to_lowercase().as_str() {
        "desktop" => Some(DESKTOP),
        "mobile" => Some(MOBILE),
        "tablet" => Some(TABLET),
        _ => None,
    }
}

/// Resolve a comma-separated viewport list. Unknown names are returned
/// separately so the caller can warn and continue with the rest.
pub fn resolve_profiles(list: &str) -> (Vec<ViewportProfile>, Vec<String>) {
    let mut profiles = Vec::new();
    let mut unknown = Vec::new();

    for raw in list.split(',') {
        let name = raw.trim();
        if name.is_empty() {
            continue;
        }
        match profile_by_name(name) {
            Some(profile) if !profiles.contains(&profile) => profiles.push(profile),
            Some(_) => {}
            None => unknown.push(name.to_string()),
        }
    }

    (profiles, unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_resolve_case_insensitively() {
        let (profiles, unknown) = resolve_profiles("Desktop, MOBILE ,tablet");
        assert!(unknown.is_empty());
        let names: Vec<&str> = profiles.iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["desktop", "mobile", "tablet"]);
    }

    #[test]
    fn unknown_names_are_collected_not_fatal() {
        let (profiles, unknown) = resolve_profiles("desktop,watch,mobile");
        assert_eq!(profiles.len(), 2);
        assert_eq!(unknown, vec!["watch".to_string()]);
    }

    #[test]
    fn duplicates_resolve_once() {
        let (profiles, unknown) = resolve_profiles("desktop,desktop");
        assert_eq!(profiles.len(), 1);
        assert!(unknown.is_empty());
    }

    #[test]
    fn mobile_profile_emulates_a_phone() {
        assert_eq!(MOBILE.width, 390);
        assert_eq!(MOBILE.height, 844);
        assert_eq!(MOBILE.device_scale_factor, 3.0);
        assert!(MOBILE.mobile);
        assert!(MOBILE.user_agent.is_some());
        assert!(DESKTOP.user_agent.is_none());
    }
}
