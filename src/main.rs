mod app;
mod builtins;
mod error;
mod exec;
mod manager;
mod models;
mod parser;
mod shell;
mod worker;

use clap::Parser;

use app::{cli, config::Config};
use exec::{signals, terminal::Terminal};
use shell::Shell;

fn main() {
    let config = Config::parse();
    config.init_logging();

    signals::ignore_job_control();
    let shell = Shell::new(Terminal::detect());

    let code = cli::run_cli(shell, config.prompt());
    std::process::exit(code);
}
