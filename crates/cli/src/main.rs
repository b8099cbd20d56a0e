use std::process::ExitCode;

fn main() -> ExitCode {
    quotesearch_cli::run()
}
