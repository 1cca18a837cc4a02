#![no_main]

use libfuzzer_sys::fuzz_target;

use ravel::DataFile;

fuzz_target!(|data: &[u8]| {
    // Loading arbitrary bytes must fail cleanly, never panic.
    let _ = DataFile::from_slice(data);
});
