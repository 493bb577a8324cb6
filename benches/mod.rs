#![cfg(unstable)]
#![feature(test)]
extern crate test;

use falcon_json::{ondemand, tape, PaddedInput};

use std::str;

#[bench]
fn read_10kb_event_stacktrace_tape_simd(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/10kb_event_stacktrace.json");
    let owned = PaddedInput::copy_from(input);

    b.bytes = input.len() as u64;
    b.iter(|| {
        let mut parser = tape::Parser::new(input.len() + 64);
        parser.iterate(owned.as_padded()).unwrap()
    })
}

#[bench]
fn read_10kb_event_stacktrace_ondemand_simd(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/10kb_event_stacktrace.json");
    let owned = PaddedInput::copy_from(input);

    b.bytes = input.len() as u64;
    b.iter(|| {
        let mut parser = ondemand::Parser::new(input.len() + 64);
        let doc = parser.iterate(owned.as_padded()).unwrap();
        test::black_box(doc.get_root().unwrap());
    })
}

#[bench]
fn read_10kb_event_stacktrace_value_serde_json(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/10kb_event_stacktrace.json");

    b.bytes = input.len() as u64;
    b.iter(|| {
        let v: serde_json::Value = serde_json::from_slice(input).unwrap();
        v
    })
}

#[bench]
fn read_10kb_event_stacktrace_value_json(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/10kb_event_stacktrace.json");

    b.bytes = input.len() as u64;
    b.iter(|| {
        let v: json::JsonValue = json::parse(str::from_utf8(input).unwrap()).unwrap();
        v
    })
}

#[bench]
fn read_10kb_event_stacktrace_value_simd_json(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/10kb_event_stacktrace.json");

    b.bytes = input.len() as u64;
    b.iter(|| {
        let mut input = input.to_vec();
        let v = simd_json::to_borrowed_value(&mut input).unwrap();
        test::black_box(v);
    })
}

#[bench]
fn read_10kb_event_stacktrace_value_to_vec(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/10kb_event_stacktrace.json");

    b.bytes = input.len() as u64;
    b.iter(|| input.to_vec())
}

#[bench]
fn read_10kb_event_stacktrace_split(b: &mut test::Bencher) {
    let input = include_str!("../cases/10kb_event_stacktrace.json");

    b.bytes = input.len() as u64;
    b.iter(|| input.split('"').for_each(drop))
}

#[bench]
fn read_10kb_event_stacktrace_validate_utf8(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/10kb_event_stacktrace.json");

    b.bytes = input.len() as u64;
    b.iter(|| str::from_utf8(input).unwrap())
}

#[bench]
#[cfg(feature = "serde_json")]
fn read_10kb_event_stacktrace_tape_to_serde_json(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/10kb_event_stacktrace.json");
    let owned = PaddedInput::copy_from(input);

    b.bytes = input.len() as u64;
    b.iter(|| {
        let mut parser = tape::Parser::new(input.len() + 64);
        parser.iterate(owned.as_padded()).unwrap().to_value().unwrap()
    })
}

#[bench]
fn find_at_sign_m_field_10kb_event_stacktrace_ondemand(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/10kb_event_stacktrace.json");
    let owned = PaddedInput::copy_from(input);

    b.bytes = input.len() as u64;
    b.iter(|| {
        let mut parser = ondemand::Parser::new(input.len() + 64);
        let doc = parser.iterate(owned.as_padded()).unwrap();
        let obj = doc.get_root().unwrap().as_object().unwrap();
        let m = obj.find_field("@m").unwrap().get_string().unwrap();
        test::black_box(m.to_owned());
    })
}

#[bench]
fn find_at_sign_m_field_10kb_event_stacktrace_serde_json(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/10kb_event_stacktrace.json");

    b.bytes = input.len() as u64;
    b.iter(|| {
        let v: serde_json::Value = serde_json::from_slice(input).unwrap();

        let mut doc = match v {
            serde_json::Value::Object(doc) => doc,
            _ => panic!("expected a map"),
        };

        let m = match doc.remove("@m").unwrap() {
            serde_json::Value::String(m) => m,
            _ => panic!("expected a string"),
        };

        m
    })
}

#[bench]
fn unescape_at_sign_x_field_10kb_event_stacktrace(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/10kb_event_stacktrace.json");
    let owned = PaddedInput::copy_from(input);

    let mut parser = ondemand::Parser::new(input.len() + 64);
    let doc = parser.iterate(owned.as_padded()).unwrap();
    let obj = doc.get_root().unwrap().as_object().unwrap();
    let offset = obj.find_field("@x").unwrap().raw_json_token().unwrap();
    test::black_box(offset);

    b.bytes = input.len() as u64;
    b.iter(|| {
        let mut parser = ondemand::Parser::new(input.len() + 64);
        let doc = parser.iterate(owned.as_padded()).unwrap();
        let obj = doc.get_root().unwrap().as_object().unwrap();
        obj.find_field("@x").unwrap().get_string().unwrap().to_owned()
    })
}

#[bench]
fn iter_top_level_entries_600b_event_no_escape_ondemand(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/600b_event_no_escape.json");
    let owned = PaddedInput::copy_from(input);

    b.bytes = input.len() as u64;
    b.iter(|| {
        let mut parser = ondemand::Parser::new(input.len() + 64);
        let doc = parser.iterate(owned.as_padded()).unwrap();
        doc.get_root().unwrap().as_object().unwrap().iter().for_each(|f| {
            f.unwrap();
        })
    })
}

#[bench]
fn read_600b_event_no_escape_tape_simd(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/600b_event_no_escape.json");
    let owned = PaddedInput::copy_from(input);

    b.bytes = input.len() as u64;
    b.iter(|| {
        let mut parser = tape::Parser::new(input.len() + 64);
        parser.iterate(owned.as_padded()).unwrap()
    })
}

#[bench]
fn read_600b_event_no_escape_value_serde_json(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/600b_event_no_escape.json");

    b.bytes = input.len() as u64;
    b.iter(|| {
        let v: serde_json::Value = serde_json::from_slice(input).unwrap();
        v
    })
}

#[bench]
fn read_600b_event_no_escape_value_json(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/600b_event_no_escape.json");

    b.bytes = input.len() as u64;
    b.iter(|| {
        let v: json::JsonValue = json::parse(str::from_utf8(input).unwrap()).unwrap();
        v
    })
}

#[bench]
fn read_600b_event_no_escape_value_simd_json(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/600b_event_no_escape.json");

    b.bytes = input.len() as u64;
    b.iter(|| {
        let mut input = input.to_vec();
        let v = simd_json::to_borrowed_value(&mut input).unwrap();
        test::black_box(v);
    })
}

#[bench]
fn read_600b_event_no_escape_value_to_vec(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/600b_event_no_escape.json");

    b.bytes = input.len() as u64;
    b.iter(|| input.to_vec())
}

#[bench]
fn read_600b_event_no_escape_split(b: &mut test::Bencher) {
    let input = include_str!("../cases/600b_event_no_escape.json");

    b.bytes = input.len() as u64;
    b.iter(|| input.split('"').for_each(drop))
}

#[bench]
fn read_600b_event_no_escape_validate_utf8(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/600b_event_no_escape.json");

    b.bytes = input.len() as u64;
    b.iter(|| str::from_utf8(input).unwrap())
}
