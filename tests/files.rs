use std::fs;

use tempfile::tempdir;

use huffzip::{
    HuffError, Silent, compress_file, compressed_path, decompress_file, decompressed_path,
};

#[test]
fn compress_then_decompress_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    let text = "It was the best of times, it was the worst of times.\n".repeat(200);
    fs::write(&input, &text).unwrap();

    let packed = compressed_path(&input);
    assert_eq!(packed, dir.path().join("notes.txt.abiz"));
    let report = compress_file(&input, &packed, &mut Silent).unwrap();
    assert_eq!(report.input_len, text.len() as u64);
    assert_eq!(fs::metadata(&packed).unwrap().len(), report.output_len());
    assert!(report.payload_len < report.input_len);

    let restored = decompressed_path(&packed).unwrap();
    assert_eq!(restored, dir.path().join("outputnotes.txt"));
    let back = decompress_file(&packed, &restored, &mut Silent).unwrap();
    assert_eq!(back.header_len, report.header_len);
    assert_eq!(back.output_len, text.len() as u64);
    assert_eq!(fs::read_to_string(&restored).unwrap(), text);
}

#[test]
fn empty_file_is_rejected_without_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("empty.bin");
    fs::write(&input, b"").unwrap();
    let packed = compressed_path(&input);

    let err = compress_file(&input, &packed, &mut Silent).unwrap_err();
    assert!(matches!(err, HuffError::EmptyInput));
    assert!(!packed.exists());
}

#[test]
fn missing_input_is_an_io_error() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("nope.txt");
    let err = compress_file(&input, &compressed_path(&input), &mut Silent).unwrap_err();
    assert!(matches!(err, HuffError::Io(_)));
}

#[test]
fn corrupt_payload_leaves_no_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("x.bin");
    fs::write(&input, [b'x'; 20]).unwrap();
    let packed = compressed_path(&input);
    compress_file(&input, &packed, &mut Silent).unwrap();

    let mut bytes = fs::read(&packed).unwrap();
    bytes.pop();
    fs::write(&packed, &bytes).unwrap();

    let restored = decompressed_path(&packed).unwrap();
    let err = decompress_file(&packed, &restored, &mut Silent).unwrap_err();
    assert!(matches!(err, HuffError::CorruptStream(_)));
    assert!(!restored.exists());
}

#[test]
fn garbage_header_is_malformed() {
    let dir = tempdir().unwrap();
    let packed = dir.path().join("junk.abiz");
    fs::write(&packed, [0x05, b'a', 0x00]).unwrap();
    let restored = decompressed_path(&packed).unwrap();

    let err = decompress_file(&packed, &restored, &mut Silent).unwrap_err();
    assert!(matches!(err, HuffError::MalformedHeader(_)));
    assert!(!restored.exists());
}
