use std::path::Path;
use std::process::{Command, Output};

use pdfa_validate::app;
use pdfa_validate::cli::parse_invocation;
use pdfa_validate::{Conformance, Grammar, Profile};

use super::mocks::StubAdapter;

pub const PDFA1B: Profile = Profile::Fixed(Conformance::A1b);

/// Captured result of one front-end run
#[derive(Debug)]
pub struct RunOutput {
    pub code: u8,
    pub stdout: String,
    pub stderr: String,
}

/// Run `args` through the front-end for `grammar` against a stub adapter
pub fn run_with(
    grammar: Grammar,
    args: &[&str],
    adapter: &mut StubAdapter,
    profile: Profile,
) -> RunOutput {
    let command_line = std::iter::once(grammar.program_name()).chain(args.iter().copied());
    let invocation = parse_invocation(grammar, command_line);

    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let code = app::run(
        grammar,
        &invocation,
        adapter,
        profile,
        &mut stdout,
        &mut stderr,
    );

    RunOutput {
        code,
        stdout: String::from_utf8(stdout).expect("stdout is UTF-8"),
        stderr: String::from_utf8(stderr).expect("stderr is UTF-8"),
    }
}

pub fn run_basic(args: &[&str], adapter: &mut StubAdapter) -> RunOutput {
    run_with(Grammar::Basic, args, adapter, PDFA1B)
}

/// Command for a built binary, isolated from user configuration
pub fn binary(exe: &str, work_dir: &Path) -> Command {
    let mut command = Command::new(exe);
    command
        .current_dir(work_dir)
        .env("HOME", work_dir)
        .env("XDG_CONFIG_HOME", work_dir.join("config"))
        .env_remove("PDFA_VALIDATE_CONFIG")
        .env_remove("PDFA_VALIDATE_PROFILE")
        .env_remove("PDFA_VALIDATE_STOP_ON_FIRST_ERROR")
        .env_remove("PDFA_VALIDATE_LOG_LEVEL")
        .env_remove("RUST_LOG");
    command
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
