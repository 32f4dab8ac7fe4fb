use std::io;
use std::process::ExitCode;

use keyslot::console::Console;
use keyslot::logger::initialize_logger;

fn main() -> ExitCode {
    initialize_logger();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut console = Console::new(stdin.lock(), stdout.lock());
    match console.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("console session aborted: {e}");
            eprintln!("keyslot: {e}");
            ExitCode::FAILURE
        }
    }
}
