use std::process::ExitCode;

fn main() -> ExitCode {
    norrisbot_cli::run()
}
