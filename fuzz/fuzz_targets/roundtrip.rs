#![no_main]
use libfuzzer_sys::fuzz_target;
use lzw_codetable::{CodeTable, Step};

fuzz_target!(|data: &[u8]| {
    let mut table = CodeTable::new();
    let mut codes = vec![];
    for &byte in data {
        if let Step::Resolved { prefix, .. } = table.consume(byte) {
            codes.push(prefix);
        }
    }
    codes.extend(table.pending_code());

    // Every emitted code expands to what was consumed, in order.
    let mut compare = vec![];
    for &code in &codes {
        let seq = table.lookup(code).expect("emitted code was never assigned");
        compare.extend_from_slice(seq);
    }
    assert!(compare == data);
});
