#![no_main]
use std::cell::RefCell;

use arbitrary::Arbitrary;
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use serde_json::{Map, Value};
use wiretok::{JsonError, JsonOptions, JsonParser, JsonToken};

const HEADER: usize = 5; // 1 flag + 4-byte seed

thread_local! {
    static RNG: RefCell<SmallRng> =
        RefCell::new(SmallRng::from_os_rng());
}

static WS_TABLE: &[&[u8]] = &[b" ", b"\t", b"\n", b"\r", b"\r\n"];

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

/// Mostly mutates bytes, but every tenth run rewrites the input as a stream
/// of whitespace-separated valid values.
fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8 & 0x01);
        data[1..5].copy_from_slice(&with_rng(|rng| rng.next_u32().to_le_bytes()));

        let mut prefix = HEADER;
        while prefix < size {
            let limit = max_size - prefix;
            prefix += append_whitespace(&mut data[prefix..], limit);
            prefix += append_value(&mut data[prefix..], size, max_size - prefix);
        }
        prefix
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

fn append_whitespace(buf: &mut [u8], limit: usize) -> usize {
    with_rng(|rng| {
        let mut written = 0;
        for _ in 0..rng.random_range(1..=4) {
            let w = WS_TABLE[rng.random_range(0..WS_TABLE.len())];
            if written + w.len() > limit {
                break;
            }
            buf[written..written + w.len()].copy_from_slice(w);
            written += w.len();
        }
        written
    })
}

fn append_value(data: &mut [u8], size: usize, limit: usize) -> usize {
    let value = loop {
        let s = with_rng(|rng| rng.random_range(size / 2..=size * 2));
        let bytes: Vec<u8> = with_rng(|rng| (0..s).map(|_| rng.random::<u8>()).collect());
        if let Ok(value) = ArbitraryValue::arbitrary(&mut arbitrary::Unstructured::new(&bytes)) {
            break value;
        }
    };

    let Ok(serialized) = serde_json::to_vec(&value.0) else {
        return 0;
    };
    let len = serialized.len().min(limit);
    data[..len].copy_from_slice(&serialized[..len]);
    len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

#[derive(Debug)]
struct ArbitraryValue(Value);

impl<'a> Arbitrary<'a> for ArbitraryValue {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let value = match u.choose_index(21)? {
            0 => Value::Null,
            1 => Value::Bool(u.arbitrary()?),
            2 => {
                let n: f64 = u.arbitrary()?;
                Value::Number(
                    serde_json::Number::from_f64(n).ok_or(arbitrary::Error::IncorrectFormat)?,
                )
            }
            3..=10 => Value::String(u.arbitrary()?),
            11..=15 => {
                let elems: Vec<ArbitraryValue> = u.arbitrary()?;
                Value::Array(elems.into_iter().map(|v| v.0).collect())
            }
            16..=20 => {
                let m: Vec<(String, ArbitraryValue)> = u.arbitrary()?;
                Value::Object(Map::from_iter(m.into_iter().map(|(k, v)| (k, v.0))))
            }
            _ => Err(arbitrary::Error::IncorrectFormat)?,
        };
        Ok(ArbitraryValue(value))
    }
}

/// Feeds every prefix in `prefixes`, then finishes on `data`.
fn tokenize(
    data: &[u8],
    prefixes: &[usize],
    options: JsonOptions,
    storage: &mut [JsonToken],
) -> Result<usize, JsonError> {
    let mut parser: JsonParser = JsonParser::with_options(storage, options);
    let mut written = 0;
    for &end in prefixes {
        written += parser.feed(&data[..end])?.written();
    }
    written += parser.finish(data)?.written();
    assert_eq!(written, parser.tokens().len());
    for token in parser.tokens() {
        let end = token.end.expect("finished document has open container");
        assert!(token.start <= end && end <= data.len() as u64);
    }
    Ok(parser.tokens().len())
}

fn parser(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }

    let options = JsonOptions {
        allow_multiple_values: data[0] & 1 != 0,
    };
    let split_seed = u32::from_le_bytes(data[1..5].try_into().unwrap()) as usize;
    let data = &data[HEADER..];

    let mut prefixes = Vec::new();
    let mut end = 0;
    while end < data.len() {
        end += split_seed % (data.len() - end) + 1;
        prefixes.push(end);
    }

    let mut whole_storage = vec![JsonToken::EMPTY; data.len() + 1];
    let mut split_storage = vec![JsonToken::EMPTY; data.len() + 1];
    let whole = tokenize(data, &[], options, &mut whole_storage);
    let split = tokenize(data, &prefixes, options, &mut split_storage);

    assert_eq!(whole.is_ok(), split.is_ok(), "{whole:?} vs {split:?}");
    if let (Ok(len), Ok(_)) = (whole, split) {
        assert_eq!(whole_storage[..len], split_storage[..len]);
    }
}

fuzz_target!(|data: &[u8]| parser(data));
