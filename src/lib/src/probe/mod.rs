//! Platform classification and the single probe-and-report pass.
//!
//! The classifier is a strict three-way decision: Apple silicon wins
//! unconditionally, then Windows, then the portable ESAPI path. Each
//! branch is terminal; a run never revisits another strategy.
//!
//! Hardware bindings are modelled as capabilities resolved once at
//! startup ([`Binding`]): downstream logic branches on the resolved
//! capability, never on repeated load attempts.

use crate::error::ProbeError;
use crate::host::HostEnv;
use crate::report::{Branch, ProbeReport, ProbeStatus, RandomOrigin, Trail, TrailEvent};

pub mod esapi;
pub mod hresult;
pub mod windows;

#[cfg(windows)]
pub mod wmi;

pub use esapi::HardwareRandom;
pub use windows::{DeviceQuery, TpmDevice};

/// Number of random bytes requested as proof of availability.
pub const SAMPLE_LEN: usize = 16;

/// An optional hardware binding, resolved once at startup.
pub enum Binding<T> {
    Loaded(T),
    /// The binding could not be loaded; carries the failure detail.
    Unavailable(String),
}

/// The hardware capabilities available to one run.
///
/// `detect()` resolves the real host bindings; tests inject fakes to
/// exercise every branch on any machine.
pub struct HostProbes {
    /// Management-interface query for TPM device instances (Windows).
    pub devices: Binding<Box<dyn DeviceQuery>>,
    /// Hardware random sampler behind the ESAPI stack.
    pub hw_random: Binding<Box<dyn HardwareRandom>>,
}

impl HostProbes {
    /// Resolve the real host bindings.
    pub fn detect() -> Self {
        let devices = Self::detect_devices();
        let hw_random = esapi::resolve();
        if let Binding::Unavailable(reason) = &hw_random {
            log::debug!("esapi binding unavailable: {reason}");
        }
        HostProbes { devices, hw_random }
    }

    #[cfg(windows)]
    fn detect_devices() -> Binding<Box<dyn DeviceQuery>> {
        match wmi::WmiDeviceQuery::new() {
            Ok(query) => {
                log::debug!("management-interface binding initialized");
                Binding::Loaded(Box::new(query))
            }
            Err(e) => Binding::Unavailable(e.to_string()),
        }
    }

    #[cfg(not(windows))]
    fn detect_devices() -> Binding<Box<dyn DeviceQuery>> {
        Binding::Unavailable("management-interface query requires windows".to_string())
    }
}

/// Run one probe-and-report cycle.
///
/// Errors escape only on the portable path, when the sampler fails
/// after the binding resolved present; every other failure is folded
/// into the trail and the status line.
pub fn run(env: &HostEnv, probes: &HostProbes) -> Result<ProbeReport, ProbeError> {
    let mut trail = Trail::new();
    trail.push(TrailEvent::Architecture(env.machine.clone()));
    trail.push(TrailEvent::OperatingSystem {
        system: env.system.clone(),
        release: env.release.clone(),
        version: env.version.clone(),
        edition: env.edition.clone(),
    });

    if env.is_apple_silicon() {
        trail.push(TrailEvent::Detected(Branch::SecureEnclave));
        return Ok(ProbeReport {
            status: ProbeStatus::SecureEnclaveAvailable,
            sample: None,
            trail,
        });
    }

    if env.is_windows() {
        trail.push(TrailEvent::Detected(Branch::WindowsTpm));
        return windows_branch(probes, trail);
    }

    trail.push(TrailEvent::Detected(Branch::Portable));
    portable_branch(probes, trail)
}

fn windows_branch(probes: &HostProbes, mut trail: Trail) -> Result<ProbeReport, ProbeError> {
    let (present, detail) = windows::windows_tpm_info(&probes.devices);
    trail.push(TrailEvent::Wmi(detail));

    if !present {
        trail.push(TrailEvent::TpmMissing);
        return Ok(ProbeReport {
            status: ProbeStatus::TpmNotAvailable,
            sample: None,
            trail,
        });
    }

    let hardware_sample = match &probes.hw_random {
        Binding::Loaded(sampler) => {
            trail.push(TrailEvent::Esapi("load_ok".to_string()));
            match sampler.get_random(SAMPLE_LEN) {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    trail.push(TrailEvent::Esapi(format!("error:{e}")));
                    None
                }
            }
        }
        Binding::Unavailable(reason) => {
            trail.push(TrailEvent::Esapi(format!("load_error:{reason}")));
            None
        }
    };

    // A TPM declared present that cannot serve randomness degrades to an
    // OS random sample; the probe as a whole still succeeds.
    match hardware_sample {
        Some(bytes) => {
            trail.push(TrailEvent::RandomSource(RandomOrigin::Hardware));
            Ok(ProbeReport {
                status: ProbeStatus::TpmAvailable,
                sample: Some(bytes),
                trail,
            })
        }
        None => {
            let bytes = os_random(SAMPLE_LEN)?;
            trail.push(TrailEvent::RandomSource(RandomOrigin::OsFallback));
            Ok(ProbeReport {
                status: ProbeStatus::TpmAvailableFallback,
                sample: Some(bytes),
                trail,
            })
        }
    }
}

fn portable_branch(probes: &HostProbes, mut trail: Trail) -> Result<ProbeReport, ProbeError> {
    match &probes.hw_random {
        Binding::Loaded(sampler) => {
            trail.push(TrailEvent::Esapi("load_ok".to_string()));
            // No fallback on this path: a sampler failure after the
            // binding resolved present aborts the run.
            let bytes = sampler.get_random(SAMPLE_LEN)?;
            trail.push(TrailEvent::RandomSource(RandomOrigin::Hardware));
            Ok(ProbeReport {
                status: ProbeStatus::TpmAvailable,
                sample: Some(bytes),
                trail,
            })
        }
        Binding::Unavailable(reason) => {
            trail.push(TrailEvent::Esapi(format!("load_error:{reason}")));
            trail.push(TrailEvent::TpmMissing);
            trail.push(TrailEvent::RandomUnavailable);
            Ok(ProbeReport {
                status: ProbeStatus::TpmNotAvailable,
                sample: None,
                trail,
            })
        }
    }
}

fn os_random(len: usize) -> Result<Vec<u8>, ProbeError> {
    let mut buf = vec![0u8; len];
    getrandom::getrandom(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_random_length() {
        let bytes = os_random(SAMPLE_LEN).unwrap();
        assert_eq!(bytes.len(), SAMPLE_LEN);
    }
}
