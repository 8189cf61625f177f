//! Writer/Reader interplay over in-memory and chained sources.

use std::io::{Cursor, Read};

use sercbor_buffers::{BufferError, Reader, Writer};

// ---------------------------------------------------------------------------
// Writer -> Reader roundtrip
// ---------------------------------------------------------------------------

#[test]
fn roundtrip_bytes_through_cursor() {
    let mut w = Writer::new(Vec::new());
    w.u8(0x9f).unwrap();
    w.buf(&[0x61, 0x61]).unwrap();
    w.u8(0xff).unwrap();
    assert_eq!(w.written(), 4);
    let data = w.into_inner();

    let mut r = Reader::new(Cursor::new(data)).unwrap();
    assert_eq!(r.current(), Some(0x9f));
    assert_eq!(r.read_byte().unwrap(), Some(0x61));
    assert_eq!(r.read_exact(1).unwrap(), vec![0x61]);
    assert_eq!(r.read_byte().unwrap(), Some(0xff));
    assert_eq!(r.read_byte().unwrap(), None);
    assert!(r.is_at_end());
}

#[test]
fn read_into_leaves_lookahead_untouched() {
    let data = [0xfb, 1, 2, 3, 4, 5, 6, 7, 8, 0xf6];
    let mut r = Reader::new(&data[..]).unwrap();
    let mut payload = [0u8; 8];
    r.read_into(&mut payload).unwrap();
    assert_eq!(payload, [1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(r.current(), Some(0xfb));
    assert_eq!(r.read_byte().unwrap(), Some(0xf6));
}

// ---------------------------------------------------------------------------
// End of stream
// ---------------------------------------------------------------------------

#[test]
fn premature_end_is_never_a_short_buffer() {
    let data = [0x1b, 0x00, 0x00];
    let mut r = Reader::new(&data[..]).unwrap();
    match r.read_exact(8) {
        Err(BufferError::EndOfStream) => {}
        other => panic!("expected end of stream, got {other:?}"),
    }
}

#[test]
fn reads_across_chained_sources() {
    let first: &[u8] = &[0x19, 0x03];
    let second: &[u8] = &[0xe8, 0x0c];
    let mut r = Reader::new(first.chain(second)).unwrap();
    assert_eq!(r.read_exact(2).unwrap(), vec![0x03, 0xe8]);
    assert_eq!(r.read_byte().unwrap(), Some(0x0c));
    assert_eq!(r.consumed(), 4);
}
