#![no_main]

use asintota::instances::InstanceTable;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let _ = InstanceTable::from_csv_str(input, "id", &[]);
    }
});
