use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Config file (defaults are used when it does not exist)
    #[arg(short, long, default_value = "zero_sense.json")]
    pub config: PathBuf,

    /// Mirror every frame horizontally before classifying
    #[arg(long, default_value_t = false)]
    pub mirror: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a recorded hand trace through the swipe classifier
    Gesture {
        /// JSON trace: { "width", "height", "frames": [ {"points": [...]} | null ] }
        trace: PathBuf,
    },
    /// Replay a directory of frames with face landmark sidecars through the gaze classifier
    Gaze {
        /// Directory holding frame_*.png|jpg and matching frame_*.json
        dir: PathBuf,

        /// Write annotated frames here
        #[arg(long)]
        debug_dir: Option<PathBuf>,
    },
    /// Write the effective configuration to the config path
    InitConfig,
}
