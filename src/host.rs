//! Facts about the machine a preflight run happens on.

use crate::config::{EnvProvider, SystemEnvProvider};

/// Host name of this machine
pub fn computer_name() -> Option<String> {
    #[cfg(unix)]
    {
        let mut buf = [0u8; 256];
        // SAFETY: buf is writable for buf.len() bytes; gethostname writes at most that many.
        let rc = unsafe { libc::gethostname(buf.as_mut_ptr().cast(), buf.len()) };
        if rc != 0 {
            return None;
        }
        let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
        let name = String::from_utf8_lossy(&buf[..end]).into_owned();
        (!name.is_empty()).then_some(name)
    }
    #[cfg(not(unix))]
    {
        SystemEnvProvider.get("COMPUTERNAME")
    }
}

pub fn operating_system() -> String {
    format!("{} {}", std::env::consts::OS, std::env::consts::ARCH)
}

pub fn user_name() -> Option<String> {
    user_name_from(&SystemEnvProvider)
}

pub fn user_name_from(env: &impl EnvProvider) -> Option<String> {
    env.get("USER")
        .or_else(|| env.get("USERNAME"))
        .filter(|name| !name.trim().is_empty())
}
