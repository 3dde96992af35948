use trustprobe::reexports::log;
use trustprobe::{probe, HostEnv, HostProbes, ProbeError, ProbeStatus};

use clap::{crate_version, Arg, ArgAction, Command};

fn start() -> Result<(), ProbeError> {
    let matches = Command::new("trustprobe")
        .version(crate_version!())
        .about("Detects a platform-backed trusted cryptographic module and samples hardware randomness")
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .action(ArgAction::SetTrue)
                .help("Prints debugging information"),
        )
        .get_matches();

    let debug = matches.get_flag("debug");

    env_logger::builder()
        .format_timestamp(None)
        .format_level(false)
        .format_module_path(false)
        .format_target(false)
        .filter_level(if debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    let env = HostEnv::current();
    let probes = HostProbes::detect();
    let report = probe::run(&env, &probes)?;
    print!("{}", report.render());

    // The Secure Enclave branch terminates the process right after
    // reporting; the other branches fall through to normal termination.
    if report.status == ProbeStatus::SecureEnclaveAvailable {
        std::process::exit(0);
    }
    Ok(())
}

fn main() -> Result<(), ProbeError> {
    let res = start();
    match res {
        Ok(_) => {}
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
    Ok(())
}
