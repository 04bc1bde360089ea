//! Command line tool for inspecting merge-mined headers.
//!
//! Checks hex-encoded headers against a set of consensus parameters and
//! decodes the values the auxpow rules derive from them.

mod args;
mod cmd;
mod util;

use std::process;

use args::Args;
use auxpow_common::logging::{self, LogFormat, LoggerConfig};
use tracing::Level;
use util::exec_subc;

fn main() {
    let args: Args = argh::from_env();

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let format = if args.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    logging::init(
        LoggerConfig::new("auxpow-tool")
            .with_default_level(level)
            .with_stdout_format(format),
    );

    if let Err(e) = exec_subc(args.subc) {
        eprintln!("ERROR\n{e:?}");
        process::exit(1);
    }
}
