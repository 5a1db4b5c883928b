use crate::models::HudKind;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Command line for the single `karlauncher` binary.
///
/// With no subcommand the launcher window opens. The launcher starts each
/// overlay by re-running the binary as `karlauncher hud <module>`.
#[derive(Parser, Debug)]
#[command(name = "karlauncher", version, about = "Minecraft 1.8.8 launcher with status overlays")]
pub struct Cli {
    /// Directory holding settings.json, modules.json, karlauncher.yaml and logs
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<Utf8PathBuf>,

    /// Log at debug level regardless of karlauncher.yaml
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open the launcher window (the default)
    Launcher,

    /// Run one overlay module
    Hud {
        /// Module id: armor, fps, potion, target or keystrokes
        module: HudKind,
    },
}

impl Cli {
    /// Overlay this process runs, `None` for the launcher
    pub fn hud(&self) -> Option<HudKind> {
        match self.command {
            Some(Command::Hud { module }) => Some(module),
            Some(Command::Launcher) | None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_opens_launcher() {
        let cli = Cli::try_parse_from(["karlauncher"]).unwrap();
        assert_eq!(cli.command, None);
        assert_eq!(cli.hud(), None);
        assert!(cli.data_dir.is_none());
    }

    #[test]
    fn test_hud_subcommand() {
        let cli = Cli::try_parse_from(["karlauncher", "--data-dir", "/tmp/kl", "hud", "fps"]).unwrap();
        assert_eq!(cli.hud(), Some(HudKind::Fps));
        assert_eq!(cli.data_dir, Some(Utf8PathBuf::from("/tmp/kl")));
    }

    #[test]
    fn test_hud_accepts_legacy_script_names() {
        let cli = Cli::try_parse_from(["karlauncher", "hud", "TargetHUD.py"]).unwrap();
        assert_eq!(cli.hud(), Some(HudKind::Target));
    }

    #[test]
    fn test_unknown_module_is_rejected() {
        assert!(Cli::try_parse_from(["karlauncher", "hud", "radar"]).is_err());
    }

    #[test]
    fn test_global_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["karlauncher", "launcher", "--debug"]).unwrap();
        assert!(cli.debug);
        assert_eq!(cli.command, Some(Command::Launcher));
    }
}
