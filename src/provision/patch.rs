//! QtWebEngine version-pin relaxation.
//!
//! The macOS package bundles QtWebEngine 5.15.7, but its cmake metadata pins
//! an exact 5.15.6 match that the rest of the 5.15.2 install can never
//! satisfy. Rewriting the pin to 5.15.2 lets cmake accept the bundled build.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::Result;

const WEBENGINE_MODULES: [&str; 3] = ["Qt5WebEngine", "Qt5WebEngineCore", "Qt5WebEngineWidgets"];

/// Rewrite the exact-version pins in the WebEngine cmake configs.
///
/// A file without the pinned string is rewritten unchanged, so the patch is
/// idempotent; a missing file is an error.
pub(crate) fn relax_webengine_pins(full_path: &Path) -> Result<()> {
    for module in WEBENGINE_MODULES {
        let config = full_path
            .join("lib")
            .join("cmake")
            .join(module)
            .join(format!("{module}Config.cmake"));
        let search = format!("5.15.6 ${{_{module}_FIND_VERSION_EXACT}}");
        let replace = format!("5.15.2 ${{_{module}_FIND_VERSION_EXACT}}");

        info!("Patching {}", module);
        let data = fs::read_to_string(&config)?;
        fs::write(&config, data.replace(&search, &replace))?;
    }

    Ok(())
}
