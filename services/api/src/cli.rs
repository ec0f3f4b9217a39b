use crate::demo::{run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use mock_interview::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Mock Interview",
    about = "Run timed mock interviews over HTTP or as a scripted terminal demo",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run a scripted interview in-process and print the scores
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// JSON file used to save and restore interview state
    #[arg(long)]
    pub(crate) snapshot: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["mock-interview-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn serve_flags_override_configuration() {
        let cli = Cli::try_parse_from([
            "mock-interview-api",
            "serve",
            "--port",
            "8088",
            "--snapshot",
            "state.json",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Serve(args)) => {
                assert_eq!(args.port, Some(8088));
                assert_eq!(args.snapshot, Some(PathBuf::from("state.json")));
                assert!(args.host.is_none());
            }
            other => panic!("expected serve, got {other:?}"),
        }
    }

    #[test]
    fn demo_accepts_answers_file() {
        let cli = Cli::try_parse_from(["mock-interview-api", "demo", "--answers-file", "a.txt"])
            .expect("parses");
        assert!(matches!(
            cli.command,
            Some(Command::Demo(DemoArgs { answers_file: Some(_), .. }))
        ));
    }
}
