//! Debug trail and final report rendering.
//!
//! Trail entries are tagged events rather than preformatted strings, so
//! every stdout line is formatted in one place. The rendered contract:
//! status line first, the hex-encoded random sample (when one was
//! produced) on the next line, then the trail in accumulation order.

use ct_codecs::{Encoder, Hex};
use std::fmt;

/// Primary status vocabulary, always the first output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    SecureEnclaveAvailable,
    TpmAvailable,
    TpmAvailableFallback,
    TpmNotAvailable,
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeStatus::SecureEnclaveAvailable => write!(f, "SecureEnclave:available"),
            ProbeStatus::TpmAvailable => write!(f, "TPM:available"),
            ProbeStatus::TpmAvailableFallback => write!(f, "TPM:available_fallback"),
            ProbeStatus::TpmNotAvailable => write!(f, "TPM:not_available"),
        }
    }
}

/// Probe strategy selected by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    SecureEnclave,
    WindowsTpm,
    Portable,
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Branch::SecureEnclave => write!(f, "AppleSilicon"),
            Branch::WindowsTpm => write!(f, "Windows"),
            Branch::Portable => write!(f, "OtherOS"),
        }
    }
}

/// Origin of the random sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RandomOrigin {
    /// Bytes served by the hardware module itself.
    Hardware,
    /// Bytes from the OS random source after a hardware failure.
    OsFallback,
}

/// One tagged entry of the debug trail.
#[derive(Debug, Clone)]
pub enum TrailEvent {
    Architecture(String),
    OperatingSystem {
        system: String,
        release: String,
        version: String,
        edition: String,
    },
    Detected(Branch),
    Wmi(String),
    Esapi(String),
    RandomSource(RandomOrigin),
    TpmMissing,
    RandomUnavailable,
}

impl fmt::Display for TrailEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrailEvent::Architecture(machine) => write!(f, "Architecture:{machine}"),
            TrailEvent::OperatingSystem {
                system,
                release,
                version,
                edition,
            } => write!(
                f,
                "OS:{system} release:{release} version:{version} edition:{edition}"
            ),
            TrailEvent::Detected(branch) => write!(f, "Detected:{branch}"),
            TrailEvent::Wmi(detail) => write!(f, "WMI:{detail}"),
            TrailEvent::Esapi(detail) => write!(f, "ESAPI:{detail}"),
            TrailEvent::RandomSource(RandomOrigin::Hardware) => write!(f, "Random:TPM"),
            TrailEvent::RandomSource(RandomOrigin::OsFallback) => write!(f, "Random:OsRng"),
            TrailEvent::TpmMissing => write!(f, "TPM:not_present"),
            TrailEvent::RandomUnavailable => write!(f, "Random:Unavailable"),
        }
    }
}

/// Ordered debug trail accumulated over one run. Append-only; printed
/// once at the end of the run.
#[derive(Debug, Default)]
pub struct Trail {
    events: Vec<TrailEvent>,
}

impl Trail {
    pub fn new() -> Self {
        Trail { events: Vec::new() }
    }

    pub fn push(&mut self, event: TrailEvent) {
        self.events.push(event);
    }

    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.events.iter().map(|event| event.to_string())
    }
}

/// Outcome of one probe-and-report cycle.
#[derive(Debug)]
pub struct ProbeReport {
    pub status: ProbeStatus,
    pub sample: Option<Vec<u8>>,
    pub trail: Trail,
}

impl ProbeReport {
    /// Render the full stdout contract.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.status.to_string());
        out.push('\n');
        if let Some(sample) = &self.sample {
            out.push_str(&Hex::encode_to_string(sample).unwrap());
            out.push('\n');
        }
        for line in self.trail.lines() {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}
