//! Browser availability check.

use std::io::Write;
use std::path::PathBuf;

use cdp_adapter::detect_chrome_executable;
use tracing::{info, warn};

const INSTALL_HINTS: &[&str] = &[
    "No Chrome or Chromium executable was found.",
    "Install one of the following and run `webpilot setup` again:",
    "  - Google Chrome: https://www.google.com/chrome/",
    "  - Chromium (Debian/Ubuntu): sudo apt install chromium",
    "  - Chromium (macOS): brew install --cask chromium",
    "Or point WEBPILOT_CHROME at an existing executable.",
];

/// Locate the browser. `configured` wins over auto-detection when it exists.
pub fn locate_browser(configured: Option<PathBuf>) -> Option<PathBuf> {
    match configured {
        Some(path) if path.exists() => Some(path),
        Some(path) => {
            warn!(path = %path.display(), "configured browser path does not exist");
            detect_chrome_executable()
        }
        None => detect_chrome_executable(),
    }
}

/// Print where the browser is, or install hints. Returns whether one was found.
pub fn report_browser(found: Option<&PathBuf>, out: &mut dyn Write) -> std::io::Result<bool> {
    match found {
        Some(path) => {
            info!(path = %path.display(), "browser found");
            writeln!(out, "Browser found: {}", path.display())?;
            writeln!(out, "Setup complete. You can now run `webpilot browse` or `webpilot cua`.")?;
            Ok(true)
        }
        None => {
            for line in INSTALL_HINTS {
                writeln!(out, "{line}")?;
            }
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_browser_prints_hints() {
        let mut out = Vec::new();
        assert!(!report_browser(None, &mut out).unwrap());
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("WEBPILOT_CHROME"));
    }

    #[test]
    fn found_browser_prints_path() {
        let mut out = Vec::new();
        let path = PathBuf::from("/usr/bin/chromium");
        assert!(report_browser(Some(&path), &mut out).unwrap());
        assert!(String::from_utf8(out).unwrap().contains("/usr/bin/chromium"));
    }
}
