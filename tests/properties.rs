use lzw_codetable::{Code, CodeTable, Step, CLEAR_CODE, END_CODE, FIRST_CODE, MAX_ENTRIES};
use std::collections::HashMap;

fn inputs() -> Vec<(&'static str, Vec<u8>)> {
    let mut noise = Vec::with_capacity(1 << 16);
    let mut state = 0x2545_f491u32;
    for _ in 0..1 << 16 {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        // A small alphabet to get long matches.
        noise.push(b'a' + (state % 4) as u8);
    }

    vec![
        ("lib", include_bytes!("../src/lib.rs").to_vec()),
        ("table", include_bytes!("../src/table.rs").to_vec()),
        ("trie", include_bytes!("../src/trie.rs").to_vec()),
        ("zeros", vec![0; 1 << 14]),
        ("noise", noise),
    ]
}

#[test]
fn assignment_is_monotonic() {
    for (name, data) in inputs() {
        let mut table = CodeTable::new();
        let mut last = FIRST_CODE - 1;
        for &byte in &data {
            if let Step::Resolved { assigned: Some(code), .. } = table.consume(byte) {
                assert_eq!(code, last + 1, "{}", name);
                last = code;
            }
        }

        assert_eq!(table.next_code(), last + 1, "{}", name);
        for code in 0..table.next_code() {
            let defined = table.lookup(code).is_some();
            assert_eq!(defined, code != CLEAR_CODE && code != END_CODE, "{} {}", name, code);
        }
    }
}

#[test]
fn new_codes_extend_known_prefix() {
    for (name, data) in inputs() {
        let mut table = CodeTable::new();
        for &byte in &data {
            let before = table.next_code();
            let pending = table.pending().to_vec();
            match table.consume(byte) {
                Step::Resolved { prefix, assigned: Some(code) } => {
                    assert!(prefix < before, "{}", name);
                    assert_eq!(code, before, "{}", name);
                    assert_eq!(table.lookup(prefix), Some(&pending[..]), "{}", name);

                    let mut expected = pending.clone();
                    expected.push(byte);
                    assert_eq!(table.lookup(code), Some(&expected[..]), "{}", name);
                    assert_eq!(table.find(&expected), Some(code), "{}", name);
                }
                Step::Resolved { assigned: None, .. } => assert!(table.is_full()),
                Step::Extended(code) => {
                    assert_eq!(table.next_code(), before, "{}", name);
                    let mut expected = pending.clone();
                    expected.push(byte);
                    assert_eq!(table.lookup(code), Some(&expected[..]), "{}", name);
                }
            }
        }
    }
}

#[test]
fn map_is_append_only() {
    for (name, data) in inputs() {
        let (head, tail) = data.split_at(data.len() / 2);
        let mut table = CodeTable::new();
        table.consume_all(head);

        let snapshot: Vec<Option<Vec<u8>>> = (0..table.next_code())
            .map(|code| table.lookup(code).map(<[u8]>::to_vec))
            .collect();

        table.consume_all(tail);
        for (code, seq) in (0..).zip(snapshot) {
            assert_eq!(table.lookup(code).map(<[u8]>::to_vec), seq, "{} {}", name, code);
        }
    }
}

#[test]
fn known_sequences_are_idempotent() {
    for (name, data) in inputs() {
        let mut table = CodeTable::new();
        table.consume_all(&data);
        let next = table.next_code();

        for code in (FIRST_CODE..next).step_by(7) {
            let seq = table.lookup(code).unwrap().to_vec();
            table.reset_match_buffer();
            table.consume_all(&seq);
            assert_eq!(table.next_code(), next, "{} {}", name, code);
            assert_eq!(table.pending_code(), Some(code), "{} {}", name, code);
        }
    }
}

/// Drive the table as an encoder would and check a decoder rebuilds the same codes.
#[test]
fn decoder_replays_assignments() {
    for (name, data) in inputs() {
        assert_replays(name, &data, CodeTable::new(), None);
    }
}

#[test]
fn limited_decoder_replays_assignments() {
    for (name, data) in inputs() {
        let table = CodeTable::with_max_entries(MAX_ENTRIES);
        let table = assert_replays(name, &data, table, Some(MAX_ENTRIES));
        assert!(table.next_code() as usize <= MAX_ENTRIES, "{}", name);
    }
}

#[test]
fn naive_model_agrees() {
    for (name, data) in inputs() {
        assert_model(name, &data, CodeTable::new(), None);
    }
}

#[test]
fn limited_naive_model_agrees() {
    for (name, data) in inputs() {
        assert_model(name, &data, CodeTable::with_max_entries(MAX_ENTRIES), Some(MAX_ENTRIES));
    }
}

#[test]
fn unlimited_table_never_refuses() {
    let (_, noise) = inputs().pop().unwrap();
    let mut table = CodeTable::new();
    for &byte in &noise {
        if let Step::Resolved { assigned, .. } = table.consume(byte) {
            assert!(assigned.is_some());
        }
    }

    assert!(table.next_code() as usize > MAX_ENTRIES);
    assert_eq!(table.code_size(), 12);
}

fn assert_replays(name: &str, data: &[u8], mut table: CodeTable, limit: Option<usize>) -> CodeTable {
    let mut codes = vec![];
    for &byte in data {
        if let Step::Resolved { prefix, .. } = table.consume(byte) {
            if limit.is_some() {
                assert!(prefix < 1 << table.code_size(), "{}", name);
            }
            codes.push(prefix);
        }
    }
    codes.extend(table.pending_code());

    let (decoded, dictionary) = decode(&codes, limit);
    assert!(decoded == data, "{}", name);
    assert_eq!(dictionary.len(), table.next_code() as usize, "{}", name);
    for (code, seq) in (0..).zip(&dictionary) {
        let expected = if seq.is_empty() { None } else { Some(&seq[..]) };
        assert_eq!(table.lookup(code), expected, "{} {}", name, code);
    }

    table
}

/// Compare against the table growth re-walking the whole pending match on every byte.
fn assert_model(name: &str, data: &[u8], mut table: CodeTable, limit: Option<usize>) {
    let mut model: HashMap<Vec<u8>, Code> = (0..=255u8).map(|b| (vec![b], Code::from(b))).collect();
    let mut next = FIRST_CODE;
    let mut buffer = vec![];

    for &byte in data {
        table.consume(byte);

        buffer.push(byte);
        if !model.contains_key(&buffer) {
            if limit.map_or(true, |limit| (next as usize) < limit) {
                model.insert(buffer.clone(), next);
                next += 1;
            }
            buffer = vec![byte];
        }
    }

    assert_eq!(table.next_code(), next, "{}", name);
    assert_eq!(table.pending(), &buffer[..], "{}", name);
    for (seq, &code) in &model {
        assert_eq!(table.find(seq), Some(code), "{}", name);
    }
}

fn decode(codes: &[Code], limit: Option<usize>) -> (Vec<u8>, Vec<Vec<u8>>) {
    let mut dictionary: Vec<Vec<u8>> = (0..=255u8).map(|b| vec![b]).collect();
    dictionary.push(vec![]);
    dictionary.push(vec![]);

    let mut out = vec![];
    let mut prev: Option<Vec<u8>> = None;
    for &code in codes {
        let code = code as usize;
        let entry = match (&prev, code.cmp(&dictionary.len())) {
            (_, std::cmp::Ordering::Less) => dictionary[code].clone(),
            (Some(prev), std::cmp::Ordering::Equal) => {
                let mut entry = prev.clone();
                entry.push(prev[0]);
                entry
            }
            _ => panic!("invalid code {}", code),
        };

        out.extend_from_slice(&entry);
        if let Some(mut prev) = prev.take() {
            if limit.map_or(true, |limit| dictionary.len() < limit) {
                prev.push(entry[0]);
                dictionary.push(prev);
            }
        }
        prev = Some(entry);
    }

    (out, dictionary)
}
