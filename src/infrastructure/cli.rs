use clap::Parser;

use crate::utils::version;

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(author, version = version(), about)]
pub struct Cli {
    /// Frame rate, i.e. number of frames per second (defaults to the config value)
    #[arg(short, long, value_name = "FLOAT")]
    pub frame_rate: Option<f64>,

    /// Load modules without a terminal UI and print every mount
    #[arg(long)]
    pub headless: bool,

    /// Only offer this module; repeat to offer several
    #[arg(short, long = "module", value_name = "KEY")]
    pub modules: Vec<String>,
}
