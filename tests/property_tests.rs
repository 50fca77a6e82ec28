use proptest::prelude::*;

use linepack::{compress, decompress, decompress_bound};

fn pack_buffer(mut src: &[u8], level: u32) -> Vec<u8> {
    let mut packed = Vec::new();
    let mut buf = vec![0u8; decompress_bound()];
    while !src.is_empty() {
        let (read, written) = compress(&mut buf, src, level);
        assert!(read > 0);
        packed.extend_from_slice(&buf[..written]);
        src = &src[read..];
    }
    packed
}

fn unpack_buffer(packed: &[u8], raw_size: usize) -> Vec<u8> {
    let mut out = vec![0u8; raw_size.max(1)];
    let (read, written) = decompress(&mut out, packed).unwrap();
    assert_eq!(read, packed.len());
    out.truncate(written);
    out
}

proptest! {
    #[test]
    fn roundtrip_arbitrary_bytes(
        data in proptest::collection::vec(any::<u8>(), 0..4000),
        level in 0u32..=9,
    ) {
        let packed = pack_buffer(&data, level);
        prop_assert_eq!(unpack_buffer(&packed, data.len()), data);
    }

    #[test]
    fn roundtrip_line_shaped_text(
        lines in proptest::collection::vec("[ -~]{0,60}", 0..80),
        level in 0u32..=9,
    ) {
        let mut data = Vec::new();
        for line in &lines {
            data.extend_from_slice(line.as_bytes());
            data.push(b'\n');
        }
        let packed = pack_buffer(&data, level);
        prop_assert_eq!(unpack_buffer(&packed, data.len()), data);
    }
}
