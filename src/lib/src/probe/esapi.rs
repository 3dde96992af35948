//! Portable TPM access through the ESAPI stack.
//!
//! On non-Windows hosts, presence is decided by whether the stack
//! resolves at startup; nothing else is interrogated. The sampler opens
//! a session around each random request and releases it on drop, on
//! success and failure alike.

use super::Binding;
use crate::error::ProbeError;

/// Hardware random sampler behind the platform security API.
pub trait HardwareRandom {
    /// Request `len` hardware-generated random bytes.
    fn get_random(&self, len: usize) -> Result<Vec<u8>, ProbeError>;
}

/// Resolve the ESAPI binding once at startup.
#[cfg(feature = "tpm2")]
pub fn resolve() -> Binding<Box<dyn HardwareRandom>> {
    use tss_esapi::tcti_ldr::{DeviceConfig, TctiNameConf};
    use tss_esapi::Context;

    let tcti = TctiNameConf::from_environment_variable()
        .unwrap_or_else(|_| TctiNameConf::Device(DeviceConfig::default()));

    // The load check opens and immediately drops a context; samplers
    // open their own short-lived session later.
    match Context::new(tcti.clone()) {
        Ok(_) => {
            log::debug!("ESAPI context opened, TPM stack present");
            Binding::Loaded(Box::new(EsapiRandom { tcti }))
        }
        Err(e) => Binding::Unavailable(e.to_string()),
    }
}

#[cfg(not(feature = "tpm2"))]
pub fn resolve() -> Binding<Box<dyn HardwareRandom>> {
    Binding::Unavailable("esapi support not compiled in (enable the tpm2 feature)".to_string())
}

/// ESAPI-backed sampler. Each call opens a fresh context so the session
/// never outlives the single random request.
#[cfg(feature = "tpm2")]
pub struct EsapiRandom {
    tcti: tss_esapi::tcti_ldr::TctiNameConf,
}

#[cfg(feature = "tpm2")]
impl HardwareRandom for EsapiRandom {
    fn get_random(&self, len: usize) -> Result<Vec<u8>, ProbeError> {
        let mut context = tss_esapi::Context::new(self.tcti.clone())
            .map_err(|e| ProbeError::HardwareError(e.to_string()))?;
        let digest = context
            .get_random(len)
            .map_err(|e| ProbeError::HardwareError(e.to_string()))?;
        Ok(digest.as_slice().to_vec())
    }
}
