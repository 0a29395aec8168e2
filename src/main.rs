use pdfa_validate::{Grammar, app};
use std::process::ExitCode;

fn main() -> ExitCode {
    app::launch(Grammar::Basic, std::env::args_os())
}
