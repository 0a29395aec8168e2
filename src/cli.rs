use clap::Parser;
use std::ffi::OsString;

/// Flag selecting XML output; only recognized as the first argument
pub const XML_FLAG: &str = "--xml";

/// Argument grammar of a front-end binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    /// `<file>` or `--xml <file>`
    Basic,
    /// `<key>` or `<key> <file>`
    KeyGated,
}

/// Output shape requested on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Plain,
    Xml,
}

/// What a command line asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Configure the licence key and print the engine version
    PrintVersion { key: String },
    Validate {
        path: String,
        format: OutputFormat,
        key: Option<String>,
    },
    UsageError,
}

impl Grammar {
    pub fn program_name(&self) -> &'static str {
        match self {
            Grammar::Basic => "pdfa-validate",
            Grammar::KeyGated => "pdfa-preflight",
        }
    }

    /// Single-line usage message
    pub fn usage(&self) -> &'static str {
        match self {
            Grammar::Basic => {
                "Require exactly one filename as command line argument or '--xml' as first argument followed by filename"
            }
            Grammar::KeyGated => "Require two arguments: preflight-key PDF-filename",
        }
    }

    /// Classify positional arguments. Never touches the filesystem.
    pub fn classify(&self, args: &[String]) -> Invocation {
        match (self, args) {
            (Grammar::Basic, [flag, path]) if flag == XML_FLAG => Invocation::Validate {
                path: path.clone(),
                format: OutputFormat::Xml,
                key: None,
            },
            (Grammar::Basic, [path]) if path != XML_FLAG => Invocation::Validate {
                path: path.clone(),
                format: OutputFormat::Plain,
                key: None,
            },
            (Grammar::KeyGated, [key]) => Invocation::PrintVersion { key: key.clone() },
            (Grammar::KeyGated, [key, path]) => Invocation::Validate {
                path: path.clone(),
                format: OutputFormat::Xml,
                key: Some(key.clone()),
            },
            _ => Invocation::UsageError,
        }
    }
}

/// Raw command line: every argument is positional
#[derive(Parser, Debug, Clone)]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    #[arg(num_args = 0.., allow_hyphen_values = true, trailing_var_arg = true)]
    pub args: Vec<String>,
}

impl Cli {
    pub fn invocation(&self, grammar: Grammar) -> Invocation {
        grammar.classify(&self.args)
    }
}

/// Decode a full command line (program name first) for `grammar`
///
/// Everything after the program name is handed to clap behind an explicit
/// `--`, so a user-supplied `--` is an ordinary argument.
pub fn parse_invocation<I, T>(grammar: Grammar, args: I) -> Invocation
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut args = args.into_iter().map(Into::<OsString>::into);
    let program = args
        .next()
        .unwrap_or_else(|| OsString::from(grammar.program_name()));
    let argv = [program, OsString::from("--")].into_iter().chain(args);

    match Cli::try_parse_from(argv) {
        Ok(cli) => cli.invocation(grammar),
        Err(_) => Invocation::UsageError,
    }
}
