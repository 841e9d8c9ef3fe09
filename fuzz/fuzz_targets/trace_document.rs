#![no_main]

use asintota::event::TraceDocument;
use asintota::trace_folder::{fold_document, FoldLimits};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Malformed or unbalanced traces must error, never panic
        if let Ok(doc) = TraceDocument::from_json_str(input) {
            let limits = FoldLimits {
                max_stack_depth: 256,
                max_events: 4096,
            };
            let _ = fold_document(&doc, limits);
        }
    }
});
