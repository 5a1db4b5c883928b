//! Services module - launcher business logic with no UI dependencies.
//!
//! # Components
//!
//! - [`java_detection`]: finds an installed Java and reads its version
//! - [`launch_script`]: renders `start.sh`/`start.bat` and starts the game
//! - [`install`]: copies the bundled client into `<mc_dir>/versions/`
//! - [`ModuleManager`]: spawns and stops overlay processes, persists module flags
//!
//! Everything here takes explicit inputs (paths, settings, a spawner) so
//! it can be exercised from tests without a window.

pub mod install;
pub mod java_detection;
pub mod launch_script;
pub mod module_manager;

pub use install::{INSTALL_SUCCESS_MESSAGE, client_source_dir, install_client};
pub use java_detection::{detect_java, probe_java_version};
pub use launch_script::{generate_launch_script, launch_game, prepare_launch};
pub use module_manager::{ModuleManager, ModuleProcess, ModuleSpawner, ProcessSpawner};
