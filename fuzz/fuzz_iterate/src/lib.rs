use falcon_json::{ondemand, tape, PaddedInput};

/// Exercise both stages on arbitrary bytes. Must never panic, and whenever
/// both modes accept the input, they must agree with each other and with
/// `serde_json` (spec §5 P5).
pub fn iterate(input: &[u8]) {
    let owned = PaddedInput::copy_from(input);

    let mut tape_parser = tape::Parser::new(input.len() + 1);
    let tape_result = tape_parser.iterate(owned.as_padded()).and_then(|doc| doc.to_value());

    let mut ondemand_parser = ondemand::Parser::new(input.len() + 1);
    let ondemand_result = ondemand_parser.iterate(owned.as_padded()).and_then(|doc| to_value(&doc));

    if let (Ok(tape_value), Ok(ondemand_value)) = (&tape_result, &ondemand_result) {
        assert_eq!(tape_value, ondemand_value, "tape and on-demand modes disagreed");

        if let Ok(expected) = serde_json::from_slice::<serde_json::Value>(input) {
            assert_eq!(*tape_value, expected, "disagreed with serde_json");
        }
    }
}

fn to_value(doc: &ondemand::Document<'_>) -> Result<serde_json::Value, falcon_json::Error> {
    value_to_value(doc.get_root()?)
}

fn value_to_value(value: ondemand::Value<'_>) -> Result<serde_json::Value, falcon_json::Error> {
    use std::str::FromStr;

    Ok(match value.value_type() {
        ondemand::ValueType::Null => serde_json::Value::Null,
        ondemand::ValueType::Bool => serde_json::Value::Bool(value.get_bool()?),
        ondemand::ValueType::String => serde_json::Value::String(value.get_string()?.to_owned()),
        ondemand::ValueType::Number => {
            if let Ok(token) = value.get_bigint_token() {
                match serde_json::Number::from_str(token) {
                    Ok(n) => serde_json::Value::Number(n),
                    Err(_) => serde_json::Value::String(token.to_owned()),
                }
            } else if let Ok(v) = value.get_int64() {
                serde_json::Value::Number(v.into())
            } else if let Ok(v) = value.get_uint64() {
                serde_json::Value::Number(v.into())
            } else {
                serde_json::Number::from_f64(value.get_double()?)
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null)
            }
        }
        ondemand::ValueType::Array => {
            let mut out = Vec::new();
            for element in value.as_array()?.iter() {
                out.push(value_to_value(element?)?);
            }
            serde_json::Value::Array(out)
        }
        ondemand::ValueType::Object => {
            let mut out = serde_json::Map::new();
            for field in value.as_object()?.iter() {
                let field = field?;
                out.insert(field.key.to_owned(), value_to_value(field.value)?);
            }
            serde_json::Value::Object(out)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::{fs, io::Read};

    #[test]
    fn inputs() {
        if let Ok(inputs) = fs::read_dir("../in") {
            for input in inputs {
                let input = input.expect("invalid file").path();

                println!("input: {:?}", input);

                let mut f = fs::File::open(input).expect("failed to open");
                let mut input = Vec::new();
                f.read_to_end(&mut input).expect("failed to read file");

                iterate(&input);
            }
        }
    }

    #[test]
    fn crashes() {
        if let Ok(crashes) = fs::read_dir("../../target/fuzz_iterate/crashes") {
            for crash in crashes {
                let crash = crash.expect("invalid file").path();

                println!("repro: {:?}", crash);

                let mut f = fs::File::open(crash).expect("failed to open");
                let mut crash = Vec::new();
                f.read_to_end(&mut crash).expect("failed to read file");

                iterate(&crash);
            }
        }
    }
}
