use clap::{ArgAction, Parser};
use tracing_subscriber::filter::LevelFilter;

pub const PROMPT: &str = "jobsh$ ";

/// Interactive shell with POSIX-style job control.
#[derive(Parser, Debug)]
#[command(name = "jobsh", version, about)]
pub struct Config {
    /// Log more to standard error (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Do not print a prompt before reading each line.
    #[arg(short = 'p', long = "no-prompt")]
    pub no_prompt: bool,
}

impl Config {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    pub fn prompt(&self) -> Option<&'static str> {
        (!self.no_prompt).then_some(PROMPT)
    }

    /// Installs a stderr subscriber; `log` records reach it through the
    /// subscriber's log bridge.
    pub fn init_logging(&self) {
        let _ = tracing_subscriber::fmt()
            .with_max_level(self.log_level())
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}
