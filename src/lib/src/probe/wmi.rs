//! Live management-interface query for `Win32_Tpm` instances.

use super::windows::{DeviceQuery, TpmDevice};
use crate::error::ProbeError;
use serde::Deserialize;
use wmi::{COMLibrary, WMIConnection};

/// Namespace dedicated to TPM device objects.
const TPM_NAMESPACE: &str = r"root\CIMv2\Security\MicrosoftTpm";

#[derive(Deserialize, Debug)]
#[serde(rename = "Win32_Tpm")]
struct Win32Tpm {
    #[serde(rename = "IsEnabled_InitialValue")]
    is_enabled_initial_value: Option<bool>,
    #[serde(rename = "IsActivated_InitialValue")]
    is_activated_initial_value: Option<bool>,
    #[serde(rename = "IsOwned_InitialValue")]
    is_owned_initial_value: Option<bool>,
}

impl From<Win32Tpm> for TpmDevice {
    fn from(tpm: Win32Tpm) -> Self {
        TpmDevice {
            enabled: tpm.is_enabled_initial_value,
            activated: tpm.is_activated_initial_value,
            owned: tpm.is_owned_initial_value,
        }
    }
}

/// Device query backed by the live management interface.
pub struct WmiDeviceQuery {
    com: COMLibrary,
}

impl WmiDeviceQuery {
    /// Initialize the COM library. Failure here means the binding is
    /// unavailable, not that a TPM is absent.
    pub fn new() -> Result<Self, ProbeError> {
        let com = COMLibrary::new().map_err(|e| ProbeError::DeviceQueryError(e.to_string()))?;
        Ok(WmiDeviceQuery { com })
    }
}

impl DeviceQuery for WmiDeviceQuery {
    fn query(&self) -> Result<Vec<TpmDevice>, ProbeError> {
        let connection = WMIConnection::with_namespace_path(TPM_NAMESPACE, self.com)
            .map_err(|e| ProbeError::DeviceQueryError(e.to_string()))?;
        let instances: Vec<Win32Tpm> = connection
            .query()
            .map_err(|e| ProbeError::DeviceQueryError(e.to_string()))?;
        Ok(instances.into_iter().map(TpmDevice::from).collect())
    }
}
