use std::cell::RefCell;

use pdfa_validate::{AdapterError, Profile, Report, ValidatorAdapter};

type Respond = Box<dyn Fn(&str, Profile) -> Result<Report, AdapterError>>;

/// Adapter with a canned answer that records how it was driven
pub struct StubAdapter {
    respond: Respond,
    version: String,
    pub validated: RefCell<Vec<(String, Profile)>>,
    pub keys: Vec<String>,
}

/// One error as a stub engine would report it
#[derive(Debug, Clone)]
pub struct StubError {
    pub code: &'static str,
    pub details: &'static str,
    pub page: Option<&'static str>,
    pub fixable: Option<bool>,
}

impl StubError {
    pub fn new(code: &'static str, details: &'static str) -> Self {
        Self {
            code,
            details,
            page: None,
            fixable: None,
        }
    }

    pub fn on_page(mut self, page: &'static str) -> Self {
        self.page = Some(page);
        self
    }

    pub fn fixable(mut self, fixable: bool) -> Self {
        self.fixable = Some(fixable);
        self
    }
}

impl StubAdapter {
    pub fn responding(
        respond: impl Fn(&str, Profile) -> Result<Report, AdapterError> + 'static,
    ) -> Self {
        Self {
            respond: Box::new(respond),
            version: "stub engine 1.0".to_string(),
            validated: RefCell::new(Vec::new()),
            keys: Vec::new(),
        }
    }

    /// Every file passes
    pub fn valid() -> Self {
        Self::responding(|path, profile| Ok(Report::new(path, profile)))
    }

    /// Every file fails with `errors`, in order
    pub fn with_errors(errors: Vec<StubError>) -> Self {
        Self::responding(move |path, profile| {
            let mut report = Report::new(path, profile);
            for error in &errors {
                report.push_error(
                    error.code,
                    error.details,
                    error.page.map(str::to_string),
                    error.fixable,
                );
            }
            Ok(report)
        })
    }

    /// Opening any file fails
    pub fn io_failure() -> Self {
        Self::responding(|path, _| {
            Err(AdapterError::Io {
                path: path.to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "No such file or directory",
                ),
            })
        })
    }

    /// The engine hands back no result
    pub fn no_result() -> Self {
        Self::responding(|path, _| {
            Err(AdapterError::NoResult {
                path: path.to_string(),
            })
        })
    }

    /// The engine gives up with a chain of causes
    pub fn engine_failure() -> Self {
        Self::responding(|path, _| {
            Err(AdapterError::Engine {
                path: path.to_string(),
                source: anyhow::anyhow!("xref table is unreadable")
                    .context(format!("cannot parse '{}'", path)),
            })
        })
    }

    pub fn validated_paths(&self) -> Vec<String> {
        self.validated
            .borrow()
            .iter()
            .map(|(path, _)| path.clone())
            .collect()
    }
}

impl ValidatorAdapter for StubAdapter {
    fn validate(&self, path: &str, profile: Profile) -> Result<Report, AdapterError> {
        self.validated.borrow_mut().push((path.to_string(), profile));
        (self.respond)(path, profile)
    }

    fn engine_version(&self) -> String {
        self.version.clone()
    }

    fn set_license_key(&mut self, key: &str) {
        self.keys.push(key.to_string());
    }
}
