#![no_main]
use std::cell::RefCell;

use arbitrary::Arbitrary;
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use rdpjson::{Error, Lexer, ParserOptions, parse_str, parse_tokens, records};
use serde_json::{Map, Value};

const HEADER: usize = 1; // option flags
const DEPTH_LIMIT: usize = 64;

thread_local! {
    static RNG: RefCell<SmallRng> =
        RefCell::new(SmallRng::from_os_rng());
}

// Fragments that land a document one token away from valid or invalid.
static SPLICE_TABLE: &[&[u8]] = &[
    b" ", b"\n", b"\r\n", b"\t", b",", b":", b"{", b"}", b"[", b"]", b",]", b",}", b"\"k\":",
    b"null", b"-0.5e+3",
];

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if max_size <= HEADER {
        return fuzzer_mutate(data, size, max_size);
    }
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8 & 0x03);
        let limit = max_size - HEADER;
        HEADER + append_container(&mut data[HEADER..], limit)
    } else if seed.is_multiple_of(3) && size < max_size {
        splice(data, size, max_size)
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

/// Inserts one fragment from [`SPLICE_TABLE`] at a random offset after the
/// header. Returns the new size.
fn splice(data: &mut [u8], size: usize, max_size: usize) -> usize {
    with_rng(|rng| {
        let fragment = SPLICE_TABLE[rng.random_range(0..SPLICE_TABLE.len())];
        if size + fragment.len() > max_size || size < HEADER {
            return size;
        }
        let at = rng.random_range(HEADER..=size);
        data.copy_within(at..size, at + fragment.len());
        data[at..at + fragment.len()].copy_from_slice(fragment);
        size + fragment.len()
    })
}

/// Writes a serialized object or array, truncated to `limit` bytes.
fn append_container(data: &mut [u8], limit: usize) -> usize {
    let value = loop {
        let len = with_rng(|rng| rng.random_range(16..256));
        let bytes: Vec<u8> = with_rng(|rng| (0..len).map(|_| rng.random::<u8>()).collect());
        match ArbitraryValue::arbitrary(&mut arbitrary::Unstructured::new(&bytes)) {
            Ok(ArbitraryValue(value @ (Value::Array(_) | Value::Object(_)))) => break value,
            _ => continue,
        }
    };

    let serialized = if with_rng(|rng| rng.random_bool(0.5)) {
        serde_json::to_vec_pretty(&value)
    } else {
        serde_json::to_vec(&value)
    }
    .expect("Failed to serialize arbitrary value");

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

fn validate(data: &[u8]) {
    if data.len() <= HEADER {
        return;
    }

    let flags = data[0];
    let Ok(src) = std::str::from_utf8(&data[HEADER..]) else {
        return;
    };
    let options = ParserOptions {
        reject_trailing_commas: flags & 1 != 0,
        max_depth: if flags & 2 != 0 {
            Some(DEPTH_LIMIT)
        } else {
            ParserOptions::default().max_depth
        },
    };

    let outcome = parse_str(src, options);

    // Token records are a lossless carrier for the grammar.
    if let Ok(tokens) = Lexer::new(src).tokenize() {
        let decoded = records::decode(&records::encode(&tokens)).expect("records round-trip");
        let replayed = parse_tokens(decoded, options).map_err(Error::from);
        assert_eq!(
            outcome.as_ref().ok(),
            replayed.as_ref().ok(),
            "records changed the outcome for {src:?}"
        );
    }

    // Anything serde_json accepts with a container root is valid JSON, and
    // strict mode under the default depth limit must accept it too. The
    // default limit is above serde_json's own recursion limit.
    let rooted = matches!(src.trim_start().as_bytes().first(), Some(b'{' | b'['));
    if rooted
        && options.reject_trailing_commas
        && flags & 2 == 0
        && serde_json::from_str::<Value>(src).is_ok()
    {
        assert!(outcome.is_ok(), "rejected valid JSON {src:?}: {outcome:?}");
    }
}

fuzz_target!(|data: &[u8]| validate(data));
