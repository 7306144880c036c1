use std::process::ExitCode;

fn main() -> ExitCode {
    superclaw_cli::run()
}
