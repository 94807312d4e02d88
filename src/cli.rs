//! CLI argument definitions.
//!
//! Qtprep is a single-purpose step invoked by the prebuild, so there are no
//! subcommands; everything it needs arrives through a handful of flags and
//! the `VIRCADIA_*` environment variables.

use clap::Parser;
use std::path::PathBuf;

/// Qtprep - Qt provisioning for the prebuild pipeline.
#[derive(Debug, Parser)]
#[command(name = "qtprep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Build root directory the generated qt.cmake is written into
    #[arg(short, long, env = "QTPREP_BUILD_ROOT", default_value = ".")]
    pub build_root: PathBuf,

    /// Suppress download progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_root_defaults_to_current_directory() {
        let cli = Cli::try_parse_from(["qtprep"]).unwrap();
        assert_eq!(cli.build_root, PathBuf::from("."));
        assert!(!cli.quiet);
        assert!(!cli.debug);
    }

    #[test]
    fn build_root_flag_is_parsed() {
        let cli = Cli::try_parse_from(["qtprep", "--build-root", "/tmp/build"]).unwrap();
        assert_eq!(cli.build_root, PathBuf::from("/tmp/build"));
    }

    #[test]
    fn quiet_and_debug_flags_are_parsed() {
        let cli = Cli::try_parse_from(["qtprep", "-q", "--debug"]).unwrap();
        assert!(cli.quiet);
        assert!(cli.debug);
    }

    #[test]
    fn unknown_arguments_are_rejected() {
        assert!(Cli::try_parse_from(["qtprep", "--frobnicate"]).is_err());
    }
}
