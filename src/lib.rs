pub mod core;

use tracing_subscriber::EnvFilter;

pub use crate::core::error::{LauncherError, LauncherResult};
pub use crate::core::loaders::{LoaderDispatcher, ModLoaderDescriptor};
pub use crate::core::processors::{install, InstallProfile, InstallerPipeline};
pub use crate::core::setup::prepare;
pub use crate::core::state::AppState;

/// Install the structured logger. `RUST_LOG` overrides the default filter.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,modloader_install=debug")),
        )
        .try_init();
}
