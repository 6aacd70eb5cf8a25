//! Property tests over the codec: round-trip, prefix-freedom, determinism.

use proptest::prelude::*;

use huffzip::{
    FreqTable, HuffError, build_huffman_tree, compress, decode_header, decompress, derive_codes,
    padding_for,
};

fn skewed_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 1..4096),
        prop::collection::vec(0u8..4, 1..4096),
        (any::<u8>(), 1usize..2000).prop_map(|(b, n)| vec![b; n]),
    ]
}

proptest! {
    #[test]
    fn prop_round_trip(data in skewed_bytes()) {
        let packed = compress(&data).unwrap();
        prop_assert_eq!(decompress(&packed).unwrap(), data);
    }

    #[test]
    fn prop_codes_are_prefix_free(data in skewed_bytes()) {
        let tree = build_huffman_tree(&FreqTable::from_bytes(&data)).unwrap();
        let (codes, _) = derive_codes(&tree);
        let all: Vec<_> = codes.iter().map(|(_, c)| c.clone()).collect();
        for (i, a) in all.iter().enumerate() {
            prop_assert!(!a.is_empty());
            for (j, b) in all.iter().enumerate() {
                if i != j {
                    prop_assert!(!a.is_prefix_of(b));
                }
            }
        }
    }

    #[test]
    fn prop_padding_byte_matches_total_bits(data in skewed_bytes()) {
        let tree = build_huffman_tree(&FreqTable::from_bytes(&data)).unwrap();
        let (_, total_bits) = derive_codes(&tree);
        let packed = compress(&data).unwrap();
        let header = decode_header(&mut &packed[..]).unwrap();
        prop_assert_eq!(header.padding, padding_for(total_bits));
        prop_assert_eq!(packed.len() as u64 - header.len, total_bits.div_ceil(8));
    }

    #[test]
    fn prop_compression_is_deterministic(data in skewed_bytes()) {
        prop_assert_eq!(compress(&data).unwrap(), compress(&data).unwrap());
    }
}

#[test]
fn single_symbol_round_trip() {
    let data = vec![0x41u8; 1000];
    let packed = compress(&data).unwrap();
    assert_eq!(&packed[..5], &[0x00, 0x41, 0x01, b'1', 0x00]);
    assert_eq!(packed.len(), 5 + 125);
    assert_eq!(decompress(&packed).unwrap(), data);
}

#[test]
fn full_alphabet_round_trip() {
    let data: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
    let packed = compress(&data).unwrap();
    assert_eq!(packed[0], 255);
    assert_eq!(decompress(&packed).unwrap(), data);
}

#[test]
fn truncated_payload_is_rejected() {
    // every code bit is 1, so the cut byte exposes set padding bits
    let packed = compress(&[b'x'; 20]).unwrap();
    let err = decompress(&packed[..packed.len() - 1]).unwrap_err();
    assert!(matches!(err, HuffError::CorruptStream(_)), "{err:?}");
}

#[test]
fn truncated_payload_with_mixed_codes_is_rejected() {
    // C=0 A=10 B=11: 0000000 10 000000 11 10 11, 21 bits, padding 3
    let data = b"CCCCCCCACCCCCCBAB";
    let packed = compress(data).unwrap();
    let header = decode_header(&mut &packed[..]).unwrap();
    assert_eq!(header.padding, 3);
    assert_eq!(decompress(&packed).unwrap(), data);
    for cut in 1..=2 {
        let err = decompress(&packed[..packed.len() - cut]).unwrap_err();
        assert!(matches!(err, HuffError::CorruptStream(_)), "{err:?}");
    }
}

#[test]
fn aligned_truncation_on_a_code_boundary_decodes_short() {
    // 1000 one-bit codes fill 125 bytes exactly, padding 0: dropping a byte
    // leaves a stream that is still well formed, only shorter.
    let data = vec![0x41u8; 1000];
    let packed = compress(&data).unwrap();
    let header = decode_header(&mut &packed[..]).unwrap();
    assert_eq!(header.padding, 0);
    let short = decompress(&packed[..packed.len() - 1]).unwrap();
    assert_eq!(short, vec![0x41u8; 992]);

    let short = decompress(&compress(b"AAAABBBBAAAABBBB").unwrap()[..9]).unwrap();
    assert_eq!(short, b"AAAABBBB");
}

#[test]
fn header_only_input_is_rejected() {
    let packed = compress(b"hello").unwrap();
    let header = decode_header(&mut &packed[..]).unwrap();
    let err = decompress(&packed[..header.len as usize]).unwrap_err();
    assert!(matches!(err, HuffError::CorruptStream(_)));
}
