// CLI definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "chorder")]
#[command(author, version, about = "GKOS chorded keyboard interpreter")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Keymap file (default: ~/.config/chorder/keymap.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read chords from stdin and type them on a virtual keyboard
    #[command(visible_alias = "r")]
    Run {
        /// Print key events instead of creating a uinput device
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Read touch/lift tokens (+ID, -ID, +xID) instead of entry indices
        #[arg(long)]
        contacts: bool,
    },

    /// Load and validate the keymap
    #[command(visible_aliases = ["validate", "c"])]
    Check,

    /// Print keymap entries
    #[command(visible_aliases = ["list", "ls"])]
    Show {
        /// Only show this map (name or index)
        #[arg(short, long)]
        map: Option<String>,
    },

    /// Generate a keymap file from a GKOS layout JSON file
    #[command(visible_alias = "gen")]
    Layout {
        /// Layout JSON file
        file: PathBuf,

        /// Write the keymap here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Resolve a key name to its kernel KEY_* symbol
    #[command(visible_alias = "sym")]
    Symname {
        /// Key name (A, BackSpace, KEY_ENTER, Shift_L, ...)
        name: String,

        /// Also print the numeric key code
        #[arg(long)]
        code: bool,
    },
}
