#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfstitch::command::Command;

fuzz_target!(|data: &[u8]| {
    let line = String::from_utf8_lossy(data);

    if let Ok(command) = Command::parse(&line) {
        // Anything that parses must survive a round through Debug.
        let _ = format!("{command:?}");
    }
});
