use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sercbor::cbor::{compose_int, compose_uint, compose_with_major, CborDecoder, Expected};
use sercbor::{dump, dump_hex, load, load_hex, load_with, CborError, DecodeConfig};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Simple {
    a: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Tagged {
    name: String,
    tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SmallZoo {
    str: String,
    i: i32,
    nullable: Option<f64>,
    list: Vec<String>,
    map: BTreeMap<i32, bool>,
    inner: Simple,
    inners: Vec<Simple>,
}

fn zoo() -> SmallZoo {
    let mut map = BTreeMap::new();
    map.insert(1, true);
    map.insert(-2, false);
    SmallZoo {
        str: "Hello".into(),
        i: 10,
        nullable: None,
        list: vec!["abc".into(), "def".into(), "ghi".into()],
        map,
        inner: Simple { a: "lol".into() },
        inners: vec![Simple { a: "kek".into() }, Simple { a: "kek".into() }],
    }
}

#[test]
fn decode_scenarios_matrix() {
    assert_eq!(
        load_hex::<Simple>("bf616163737472ff").unwrap(),
        Simple { a: "str".into() }
    );
    assert_eq!(load_hex::<f64>("fb7e37e43c8800759c").unwrap(), 1e300);

    let bytes = hex::decode("0C1903E8").unwrap();
    let mut decoder = CborDecoder::new(&bytes[..]).unwrap();
    assert_eq!(decoder.next_number().unwrap(), 12);
    assert_eq!(decoder.next_number().unwrap(), 1000);
    assert!(decoder.is_exhausted());

    let bytes = hex::decode("203903e7").unwrap();
    let mut decoder = CborDecoder::new(&bytes[..]).unwrap();
    assert_eq!(decoder.next_number().unwrap(), -1);
    assert_eq!(decoder.next_number().unwrap(), -1000);
    assert!(decoder.is_exhausted());
}

#[test]
fn structural_wire_matrix() {
    assert_eq!(dump_hex(&Simple { a: "str".into() }).unwrap(), "bf616163737472ff");
    assert_eq!(
        dump_hex(&Tagged {
            name: "x".into(),
            tags: vec!["a".into()],
        })
        .unwrap(),
        "bf646e616d65617864746167739f6161ffff"
    );
    assert_eq!(dump_hex(&Vec::<u8>::new()).unwrap(), "9fff");
    assert_eq!(dump_hex(&BTreeMap::<String, u8>::new()).unwrap(), "9fff");
    assert_eq!(dump_hex(&Option::<Simple>::None).unwrap(), "f6");
    assert_eq!(dump_hex(&100000.0f32).unwrap(), "fa47c35000");
}

#[test]
fn round_trip_matrix() {
    let value = zoo();
    let bytes = dump(&value).unwrap();
    assert_eq!(bytes.first(), Some(&0xbf));
    assert_eq!(bytes.last(), Some(&0xff));
    assert_eq!(load::<SmallZoo>(&bytes).unwrap(), value);

    let mut with_value = zoo();
    with_value.nullable = Some(-0.25);
    let bytes = dump(&with_value).unwrap();
    assert_eq!(load::<SmallZoo>(&bytes).unwrap(), with_value);

    let tagged = Tagged {
        name: "name".into(),
        tags: vec!["one".into(), "two".into(), "three".into()],
    };
    assert_eq!(load::<Tagged>(&dump(&tagged).unwrap()).unwrap(), tagged);
}

#[test]
fn integer_header_boundaries() {
    let cases: &[(u64, usize)] = &[
        (0, 1),
        (23, 1),
        (24, 2),
        (255, 2),
        (256, 3),
        (65_535, 3),
        (65_536, 5),
        (u32::MAX as u64, 5),
        (u32::MAX as u64 + 1, 9),
        (u64::MAX, 9),
    ];
    for &(value, len) in cases {
        let header = compose_uint(value);
        assert_eq!(header.len(), len, "length of {value}");
        assert_eq!(load::<u64>(header.as_bytes()).unwrap(), value);
    }

    assert_eq!(
        compose_int(-1).as_bytes()[0],
        compose_uint(0).as_bytes()[0] | 0x20
    );
    assert_eq!(compose_int(i64::MIN).len(), 9);
    assert_eq!(load::<i64>(compose_int(i64::MIN).as_bytes()).unwrap(), i64::MIN);
    assert_eq!(compose_with_major(3, 24).as_bytes(), &[0x78, 0x18]);
}

#[test]
fn string_header_matrix() {
    let short = "a".repeat(23);
    let bytes = dump(&short).unwrap();
    assert_eq!(bytes[0], 0x77);
    assert_eq!(bytes.len(), 24);

    let long = "a".repeat(24);
    let bytes = dump(&long).unwrap();
    assert_eq!(&bytes[..2], &[0x78, 0x18]);
    assert_eq!(load::<String>(&bytes).unwrap(), long);

    let utf8 = "ünïcødé ✅".to_string();
    assert_eq!(load::<String>(&dump(&utf8).unwrap()).unwrap(), utf8);
}

#[test]
fn malformed_input_matrix() {
    match load_hex::<Vec<u8>>("bf01ff") {
        Err(CborError::Parsing {
            expected: Expected::Byte(0x9f),
            found: 0xbf,
        }) => {}
        other => panic!("unexpected {other:?}"),
    }

    assert!(load_hex::<u32>("1a0001").unwrap_err().is_eof());
    assert!(load_hex::<String>("6361").unwrap_err().is_eof());
    assert!(load_hex::<Simple>("bf61616373").unwrap_err().is_eof());
    assert!(matches!(
        load_hex::<String>("62c328"),
        Err(CborError::InvalidUtf8)
    ));
    assert!(load_hex::<f64>("fa47c35000").unwrap_err().is_parsing());
    assert!(load_hex::<u64>("3903e7").is_err());
    assert!(matches!(
        load_hex::<i64>("3b8000000000000000"),
        Err(CborError::UnsupportedMagnitude)
    ));
}

#[test]
fn trailing_bytes_matrix() {
    assert!(matches!(
        load_hex::<Simple>("bf616163737472ff00"),
        Err(CborError::TrailingBytes)
    ));
    let config = DecodeConfig::default().allow_trailing_bytes(true);
    let bytes = hex::decode("bf616163737472ff00").unwrap();
    assert_eq!(
        load_with::<Simple>(&bytes, &config).unwrap(),
        Simple { a: "str".into() }
    );
}
