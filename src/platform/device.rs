// Logbook - platform/device.rs
//
// Device-name supply. Device identity is an external concern: whatever
// string the host environment offers is taken as-is, with a fixed
// fallback when nothing is available. Hosts with a richer identity
// source (a UI device name, an MDM profile) pass it through the options
// instead.

use crate::util::constants;

/// Best-effort device name from the host environment.
pub fn device_name() -> String {
    for var in constants::DEVICE_NAME_ENV_VARS {
        if let Ok(value) = std::env::var(var) {
            if !value.trim().is_empty() {
                return value;
            }
        }
    }
    constants::DEFAULT_DEVICE_NAME.to_string()
}

/// Make a device name safe for use as a filename component.
///
/// Path separators (and the Windows drive colon) cannot appear in a
/// filename component; everything else, including spaces, passes through
/// unchanged.
pub fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '-',
            other => other,
        })
        .collect();
    if cleaned.trim().is_empty() {
        constants::DEFAULT_DEVICE_NAME.to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_name_is_never_empty() {
        assert!(!device_name().trim().is_empty());
    }

    #[test]
    fn test_sanitize_strips_path_separators() {
        assert_eq!(sanitize("Pete's iPhone"), "Pete's iPhone");
        assert_eq!(sanitize("lab/unit:3"), "lab-unit-3");
        assert_eq!(sanitize("a\\b"), "a-b");
    }

    #[test]
    fn test_sanitize_blank_falls_back() {
        assert_eq!(sanitize("   "), constants::DEFAULT_DEVICE_NAME);
    }
}
