//! Vessel name formatting and callsign derivation.
//!
//! Vessel templates carry a name pattern with a `{}` placeholder; the
//! generator fills it with a zero-padded three-digit serial. Announcements
//! refer to a vessel by its designation: the last whitespace-delimited
//! token of the full generated name.

/// Substitute the `{}` placeholder with a zero-padded three-digit serial.
///
/// A template without a placeholder is returned unchanged.
pub fn format_serial(template: &str, serial: u32) -> String {
    template.replacen("{}", &format!("{:03}", serial), 1)
}

/// The short callsign for a full vessel name: its last whitespace token.
///
/// Returns `None` for empty or all-whitespace names.
pub fn designation(full_name: &str) -> Option<&str> {
    full_name.split_whitespace().last()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_zero_padded() {
        assert_eq!(format_serial("Rescue {}", 7), "Rescue 007");
        assert_eq!(format_serial("Rescue {}", 42), "Rescue 042");
        assert_eq!(format_serial("Rescue {}", 999), "Rescue 999");
    }

    #[test]
    fn test_serial_without_placeholder() {
        assert_eq!(format_serial("Kestrel", 7), "Kestrel");
    }

    #[test]
    fn test_designation_last_token() {
        assert_eq!(designation("SDV Kestrel 014"), Some("014"));
        assert_eq!(designation("Meridian"), Some("Meridian"));
        assert_eq!(designation("  trailing spaces  "), Some("spaces"));
    }

    #[test]
    fn test_designation_empty() {
        assert_eq!(designation(""), None);
        assert_eq!(designation("   "), None);
    }
}
