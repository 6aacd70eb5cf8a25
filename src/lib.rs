//! # huffzip
//!
//! Order-0 Huffman compression of single files into a self-describing
//! `.abiz` container: an embedded code table followed by the packed payload.
//!
//! ```no_run
//! use huffzip::{compress_file, decompress_file, compressed_path, decompressed_path, Silent};
//! use std::path::Path;
//!
//! let input = Path::new("notes.txt");
//! let packed = compressed_path(input);
//! compress_file(input, &packed, &mut Silent)?;
//! decompress_file(&packed, &decompressed_path(&packed)?, &mut Silent)?;
//! # Ok::<(), huffzip::HuffError>(())
//! ```

pub mod bits;
pub mod error;
pub mod frequency;
pub mod header;
pub mod huffman;
pub mod progress;

mod source;

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Cursor, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

pub use bits::{BitPacker, BitUnpacker, pack, unpack};
pub use error::{HuffError, Result};
pub use frequency::{FreqTable, build_frequency_table};
pub use header::{Header, decode_header, encode_header, padding_for};
pub use huffman::{Code, CodeTable, HuffmanTree, Node, NodeId, build_huffman_tree, derive_codes};
pub use progress::{Percent, Progress, Silent};

pub const COMPRESSED_EXTENSION: &str = "abiz";
pub const DECOMPRESSED_PREFIX: &str = "output";

/// Summary of one compression run.
#[derive(Clone, Debug, PartialEq)]
pub struct CompressReport {
    pub input_len: u64,
    pub header_len: u64,
    pub payload_len: u64,
    pub padding: u8,
    pub unique_symbols: usize,
    pub entropy: f64,
}

impl CompressReport {
    pub fn output_len(&self) -> u64 {
        self.header_len + self.payload_len
    }

    /// Space saved relative to the input, in percent.
    pub fn ratio(&self) -> f64 {
        if self.input_len == 0 {
            return 0.0;
        }
        100.0 * (1.0 - self.output_len() as f64 / self.input_len as f64)
    }
}

/// Summary of one decompression run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecompressReport {
    pub input_len: u64,
    pub header_len: u64,
    pub output_len: u64,
}

/// Counting pass shared by the in-memory and file paths.
struct Plan {
    freq: FreqTable,
    codes: CodeTable,
    header: Vec<u8>,
    padding: u8,
}

fn plan(freq: FreqTable) -> Result<Plan> {
    let tree = build_huffman_tree(&freq)?;
    let (codes, total_bits) = derive_codes(&tree);
    let padding = padding_for(total_bits);
    debug!(
        "Predicted payload: {} bits ({} bytes), padding {}",
        total_bits,
        total_bits.div_ceil(8),
        padding
    );
    let header = encode_header(&codes, padding)?;
    Ok(Plan {
        freq,
        codes,
        header,
        padding,
    })
}

pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    if data.is_empty() {
        return Err(HuffError::EmptyInput);
    }
    let plan = plan(FreqTable::from_bytes(data))?;
    let mut out = plan.header.clone();
    pack(data, data.len() as u64, &plan.codes, &mut out, &mut Silent)?;
    Ok(out)
}

pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(data);
    let header = decode_header(&mut cursor)?;
    let payload_len = data.len() as u64 - header.len;
    let mut out = Vec::new();
    unpack(
        cursor,
        payload_len,
        &header.tree,
        header.padding,
        &mut out,
        &mut Silent,
    )?;
    Ok(out)
}

/// Compresses `input` into `output`, reading the input twice: once to count
/// bytes, once to encode them.
pub fn compress_file(
    input: &Path,
    output: &Path,
    progress: &mut dyn Progress,
) -> Result<CompressReport> {
    let input_len = fs::metadata(input)?.len();
    if input_len == 0 {
        return Err(HuffError::EmptyInput);
    }
    info!("Compressing {} ({} bytes)", input.display(), input_len);

    let freq = build_frequency_table(BufReader::new(File::open(input)?), input_len)?;
    let plan = plan(freq)?;

    let payload_len = with_cleanup(output, || {
        let mut sink = BufWriter::new(File::create(output)?);
        sink.write_all(&plan.header)?;
        let source = BufReader::new(File::open(input)?);
        pack(source, input_len, &plan.codes, &mut sink, progress)
    })?;

    let report = CompressReport {
        input_len,
        header_len: plan.header.len() as u64,
        payload_len,
        padding: plan.padding,
        unique_symbols: plan.freq.unique_symbols(),
        entropy: plan.freq.entropy(),
    };
    info!(
        "Wrote {} ({} bytes)",
        output.display(),
        report.output_len()
    );
    Ok(report)
}

pub fn decompress_file(
    input: &Path,
    output: &Path,
    progress: &mut dyn Progress,
) -> Result<DecompressReport> {
    let input_len = fs::metadata(input)?.len();
    info!("Decompressing {} ({} bytes)", input.display(), input_len);

    let mut source = BufReader::new(File::open(input)?);
    let header = decode_header(&mut source)?;
    let payload_len = input_len.saturating_sub(header.len);

    let output_len = with_cleanup(output, || {
        let mut sink = BufWriter::new(File::create(output)?);
        unpack(
            &mut source,
            payload_len,
            &header.tree,
            header.padding,
            &mut sink,
            progress,
        )
    })?;

    info!("Wrote {} ({} bytes)", output.display(), output_len);
    Ok(DecompressReport {
        input_len,
        header_len: header.len,
        output_len,
    })
}

/// Runs `write`, removing `output` if it fails so no partial file is left behind.
fn with_cleanup<T>(output: &Path, write: impl FnOnce() -> Result<T>) -> Result<T> {
    write().inspect_err(|_| {
        if let Err(e) = fs::remove_file(output) {
            warn!("Could not remove partial output {}: {}", output.display(), e);
        }
    })
}

/// `<input>.abiz`
pub fn compressed_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".");
    name.push(COMPRESSED_EXTENSION);
    PathBuf::from(name)
}

/// `output<stem>` next to `input`, where `<stem>` is the file name without
/// its `.abiz` extension.
pub fn decompressed_path(input: &Path) -> Result<PathBuf> {
    let bad_extension = || HuffError::BadExtension {
        path: input.to_path_buf(),
        extension: COMPRESSED_EXTENSION.to_string(),
    };
    if input.extension().and_then(|e| e.to_str()) != Some(COMPRESSED_EXTENSION) {
        return Err(bad_extension());
    }
    let stem = input.file_stem().ok_or_else(bad_extension)?;

    let mut name = std::ffi::OsString::from(DECOMPRESSED_PREFIX);
    name.push(stem);
    Ok(input.with_file_name(name))
}
