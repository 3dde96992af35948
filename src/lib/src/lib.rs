//! Diagnostic probe for platform-backed trusted cryptographic modules.
//!
//! The probe classifies the host once (Apple silicon, Windows, or other),
//! checks the matching hardware trust module (Secure Enclave, a TPM
//! behind the Windows management interface, or a TPM behind an ESAPI
//! stack), and, when one is present, retrieves a short sample of
//! hardware-generated random bytes as proof of availability.
//!
//! `probe::run()` performs exactly one probe-and-report cycle over an
//! injected [`host::HostEnv`] and a set of resolved hardware bindings,
//! so every decision path can be exercised without the real host.

#![forbid(unsafe_code)]

mod error;

/// Host environment identity (architecture and OS strings)
pub mod host;

/// Platform classification and hardware probers
pub mod probe;

/// Debug trail, status vocabulary, and report rendering
pub mod report;

#[allow(unused_imports)]
pub use error::*;
pub use host::HostEnv;
pub use probe::{run, Binding, DeviceQuery, HardwareRandom, HostProbes, TpmDevice, SAMPLE_LEN};
pub use report::{Branch, ProbeReport, ProbeStatus, RandomOrigin, Trail, TrailEvent};

/// Re-exports of dependencies that appear in public signatures or that
/// downstream binaries are expected to share.
pub mod reexports {
    pub use {ct_codecs, getrandom, log, regex, sysinfo, thiserror};
}
