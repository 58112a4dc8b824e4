use plotters::style::{register_font, FontStyle};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Family name every chart text style resolves to.
pub const FAMILY: &str = "sans-serif";

static INSTALLED: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Register the first readable TrueType file in `candidates` as the chart
/// font. Returns `true` if a font is available.
///
/// The plotters font registry is process-wide, so only the first call does
/// any work; later calls report its outcome.
pub fn install(candidates: &[PathBuf]) -> bool {
    INSTALLED
        .get_or_init(|| candidates.iter().find_map(|path| try_register(path)))
        .is_some()
}

/// Path of the registered font, if any.
pub fn installed() -> Option<&'static Path> {
    INSTALLED.get().and_then(|p| p.as_deref())
}

fn try_register(path: &Path) -> Option<PathBuf> {
    let bytes = std::fs::read(path).ok()?;
    // The registry wants `'static` data; only reached from the first `install`.
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());

    match register_font(FAMILY, FontStyle::Normal, bytes) {
        Ok(()) => {
            info!("Using chart font '{}'", path.display());
            Some(path.to_path_buf())
        }
        Err(_) => {
            warn!("Skipping font '{}': not a usable TrueType file", path.display());
            None
        }
    }
}
