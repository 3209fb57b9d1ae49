#![no_main]
use libfuzzer_sys::fuzz_target;
use lzw_codetable::{Code, CodeTable, FIRST_CODE};
use std::collections::HashMap;

fuzz_target!(|data: &[u8]| {
    let mut table = CodeTable::new();
    let mut reference: HashMap<Vec<u8>, Code> = (0..=255u8).map(|b| (vec![b], Code::from(b))).collect();
    let mut next = FIRST_CODE;
    let mut buffer = vec![];

    for &byte in data {
        table.consume(byte);

        buffer.push(byte);
        if !reference.contains_key(&buffer) {
            reference.insert(buffer.clone(), next);
            next += 1;
            buffer = vec![byte];
        }
    }

    assert_eq!(table.next_code(), next);
    assert_eq!(table.pending(), &buffer[..]);
    for (seq, &code) in &reference {
        assert_eq!(table.lookup(code), Some(&seq[..]));
    }
});
