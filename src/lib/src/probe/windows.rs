//! Windows TPM prober against the management-interface device query.

use super::hresult;
use super::Binding;
use crate::error::ProbeError;

/// A TPM device instance as reported by the management interface.
///
/// The initial-value flags may be absent on older firmware; an absent
/// enabled flag counts as not enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TpmDevice {
    pub enabled: Option<bool>,
    pub activated: Option<bool>,
    pub owned: Option<bool>,
}

/// Seam over the management-interface query, so the prober logic can be
/// exercised without a live Windows host.
pub trait DeviceQuery {
    /// Enumerate TPM device instances in the dedicated namespace.
    fn query(&self) -> Result<Vec<TpmDevice>, ProbeError>;
}

/// Probe for a TPM device object.
///
/// Never fails: every error is folded into the reason string of a
/// `(false, reason)` result. Presence equals the first instance's
/// enabled flag.
pub fn windows_tpm_info(devices: &Binding<Box<dyn DeviceQuery>>) -> (bool, String) {
    let query = match devices {
        Binding::Loaded(query) => query,
        Binding::Unavailable(reason) => return (false, format!("load_error:{reason}")),
    };

    match query.query() {
        Ok(instances) => match instances.first() {
            None => (false, "no_instances".to_string()),
            Some(device) => {
                let enabled = device.enabled.unwrap_or(false);
                let status = format!(
                    "enabled={},activated={},owned={}",
                    enabled,
                    flag(device.activated),
                    flag(device.owned)
                );
                (enabled, status)
            }
        },
        Err(e) => {
            let text = e.to_string();
            match hresult::decode(&text) {
                Some(decoded) => (false, decoded),
                None => (false, format!("query_error:{text}")),
            }
        }
    }
}

fn flag(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "true",
        Some(false) => "false",
        None => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<TpmDevice>);

    impl DeviceQuery for Fixed {
        fn query(&self) -> Result<Vec<TpmDevice>, ProbeError> {
            Ok(self.0.clone())
        }
    }

    struct Failing(&'static str);

    impl DeviceQuery for Failing {
        fn query(&self) -> Result<Vec<TpmDevice>, ProbeError> {
            Err(ProbeError::DeviceQueryError(self.0.to_string()))
        }
    }

    fn loaded(query: impl DeviceQuery + 'static) -> Binding<Box<dyn DeviceQuery>> {
        Binding::Loaded(Box::new(query))
    }

    #[test]
    fn test_unavailable_binding_reports_load_error() {
        let devices: Binding<Box<dyn DeviceQuery>> =
            Binding::Unavailable("com init failed".to_string());
        let (present, detail) = windows_tpm_info(&devices);
        assert!(!present);
        assert_eq!(detail, "load_error:com init failed");
    }

    #[test]
    fn test_zero_instances() {
        let (present, detail) = windows_tpm_info(&loaded(Fixed(vec![])));
        assert!(!present);
        assert_eq!(detail, "no_instances");
    }

    #[test]
    fn test_enabled_device() {
        let device = TpmDevice {
            enabled: Some(true),
            activated: Some(true),
            owned: Some(false),
        };
        let (present, detail) = windows_tpm_info(&loaded(Fixed(vec![device])));
        assert!(present);
        assert_eq!(detail, "enabled=true,activated=true,owned=false");
    }

    #[test]
    fn test_absent_flags_count_as_not_enabled() {
        let (present, detail) = windows_tpm_info(&loaded(Fixed(vec![TpmDevice::default()])));
        assert!(!present);
        assert_eq!(detail, "enabled=false,activated=unknown,owned=unknown");
    }

    #[test]
    fn test_only_first_instance_is_inspected() {
        let first = TpmDevice {
            enabled: Some(false),
            activated: None,
            owned: None,
        };
        let second = TpmDevice {
            enabled: Some(true),
            activated: Some(true),
            owned: Some(true),
        };
        let (present, _) = windows_tpm_info(&loaded(Fixed(vec![first, second])));
        assert!(!present);
    }

    #[test]
    fn test_query_error_with_known_hresult() {
        let (present, detail) =
            windows_tpm_info(&loaded(Failing("COM call returned 0x80041003")));
        assert!(!present);
        assert_eq!(detail, "hresult=0x80041003:WBEM_E_ACCESS_DENIED");
    }

    #[test]
    fn test_query_error_without_code_is_verbatim() {
        let (present, detail) = windows_tpm_info(&loaded(Failing("rpc server unavailable")));
        assert!(!present);
        assert_eq!(detail, "query_error:Device query error: rpc server unavailable");
    }
}
