//! Entry point: parse arguments, load config, open the serial port, and run
//! the reader and commander tasks on their own threads.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::error;

use dagroot::commander;
use dagroot::config::Config;
use dagroot::logging;
use dagroot::reader;
use dagroot::rpl::LoggingRouteSink;
use dagroot::serial::SerialPort;

#[derive(Parser, Debug)]
#[command(about = "Serial companion for a 6TiSCH/RPL DODAG root mote")]
struct Opt {
    /// Serial device to open (e.g. /dev/ttyUSB0).
    #[arg(long)]
    device: PathBuf,

    /// Path to a JSON config file. Missing file means all defaults.
    #[arg(long, default_value = "dagroot.json")]
    config: PathBuf,

    /// Raise the log level above whatever the config file says (repeatable).
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let opt = Opt::parse();

    let mut config = match Config::load(&opt.config) {
        Ok(c) => c,
        Err(e) => {
            // Logging isn't initialized yet: this is the one place the
            // program reports an error straight to stderr.
            eprintln!("ERR failed to load config: {e}");
            return ExitCode::FAILURE;
        }
    };
    for _ in 0..opt.verbose {
        config.log_level = logging::bump_level(config.log_level);
    }
    logging::init(config.log_level);

    let port = match SerialPort::open(&opt.device) {
        Ok(p) => p,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let (reader_half, writer_half) = match (port.reader(), port.writer()) {
        (Ok(r), Ok(w)) => (r, w),
        (Err(e), _) | (_, Err(e)) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let commander_thread = match std::thread::Builder::new()
        .name("commander".into())
        .spawn(move || commander::run(writer_half))
    {
        Ok(handle) => handle,
        Err(e) => {
            error!("failed to spawn commander thread: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut sink = LoggingRouteSink;
    let reader_result = reader::run(reader_half, &mut sink);

    if let Err(e) = reader_result {
        error!("{e}");
        return ExitCode::FAILURE;
    }

    match commander_thread.join() {
        Ok(Ok(())) => ExitCode::SUCCESS,
        Ok(Err(e)) => {
            error!("{e}");
            ExitCode::FAILURE
        }
        Err(_) => {
            error!("commander thread panicked");
            ExitCode::FAILURE
        }
    }
}
