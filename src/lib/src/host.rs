//! Host environment identity used to select the probe strategy.

use sysinfo::System;

/// A snapshot of host identity strings, read once per run.
///
/// The classifier receives this by value instead of inspecting the live
/// host, so tests can construct arbitrary environments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEnv {
    /// Machine architecture string, e.g. `arm64`, `x86_64`, `aarch64`.
    pub machine: String,
    /// Operating system family, e.g. `macos`, `windows`, `linux`.
    pub system: String,
    /// Kernel release.
    pub release: String,
    /// Operating system version.
    pub version: String,
    /// Long OS description; on Windows this carries the edition.
    pub edition: String,
}

impl HostEnv {
    /// Read the live host identity.
    pub fn current() -> Self {
        HostEnv {
            machine: System::cpu_arch(),
            system: std::env::consts::OS.to_string(),
            release: System::kernel_version().unwrap_or_default(),
            version: System::os_version().unwrap_or_default(),
            edition: System::long_os_version().unwrap_or_default(),
        }
    }

    /// Apple silicon reports the `arm64` machine string and always
    /// carries a Secure Enclave, whatever the OS identity says.
    pub fn is_apple_silicon(&self) -> bool {
        self.machine == "arm64"
    }

    pub fn is_windows(&self) -> bool {
        self.system == "windows"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(machine: &str, system: &str) -> HostEnv {
        HostEnv {
            machine: machine.to_string(),
            system: system.to_string(),
            release: String::new(),
            version: String::new(),
            edition: String::new(),
        }
    }

    #[test]
    fn test_apple_silicon_is_machine_string_only() {
        assert!(env("arm64", "macos").is_apple_silicon());
        assert!(env("arm64", "windows").is_apple_silicon());
        assert!(env("arm64", "linux").is_apple_silicon());
        // Linux ARM hosts report `aarch64`, not `arm64`.
        assert!(!env("aarch64", "linux").is_apple_silicon());
        assert!(!env("x86_64", "macos").is_apple_silicon());
    }

    #[test]
    fn test_windows_detection() {
        assert!(env("x86_64", "windows").is_windows());
        assert!(!env("x86_64", "linux").is_windows());
        assert!(!env("x86_64", "macos").is_windows());
    }

    #[test]
    fn test_current_reads_something() {
        let host = HostEnv::current();
        assert!(!host.machine.is_empty());
        assert!(!host.system.is_empty());
    }
}
