use crate::cli::{Args, ColorChoice};
use crate::interpreter::EvalConfig;

pub struct AppConfig {
    pub color_enabled: bool,
    pub compact: bool,
    pub verbose: bool,
    pub eval: EvalConfig,
}

impl AppConfig {
    pub fn from_args(args: &Args) -> Self {
        let color_enabled = match args.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => atty::is(atty::Stream::Stderr) && atty::is(atty::Stream::Stdout),
        };

        let mut eval = EvalConfig::default();
        if let Some(max_depth) = args.max_depth {
            eval.max_depth = max_depth;
        }

        AppConfig {
            color_enabled,
            compact: args.compact,
            verbose: args.verbose,
            eval,
        }
    }

    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}
