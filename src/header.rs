//! Self-describing preamble of a compressed file.
//!
//! ```text
//! [1 byte]   unique symbol count - 1
//! per symbol, in code discovery order:
//!   [1 byte] symbol
//!   [1 byte] code length L
//!   [L bytes] code, one ASCII '0' / '1' per bit
//! [1 byte]   padding: unused low bits of the last payload byte
//! ```

use std::io::{self, Read};

use log::{debug, trace};

use crate::error::{HuffError, Result};
use crate::huffman::{Code, CodeTable, HuffmanTree};

pub const MAX_CODE_LEN: usize = u8::MAX as usize;

/// Unused low bits in the final payload byte for a payload of `total_bits`.
pub fn padding_for(total_bits: u64) -> u8 {
    ((8 - total_bits % 8) % 8) as u8
}

pub fn encode_header(codes: &CodeTable, padding: u8) -> Result<Vec<u8>> {
    if codes.is_empty() {
        return Err(HuffError::EmptyInput);
    }
    if padding > 7 {
        return Err(HuffError::malformed(format!(
            "padding {} is out of range",
            padding
        )));
    }

    let entries: usize = codes.iter().map(|(_, c)| 2 + c.len()).sum();
    let mut bytes = Vec::with_capacity(2 + entries);
    // 0 means 1 symbol, 255 means 256.
    bytes.push((codes.len() - 1) as u8);

    for (byte, code) in codes.iter() {
        if code.len() > MAX_CODE_LEN {
            return Err(HuffError::CodeTooLong {
                byte,
                len: code.len(),
            });
        }
        bytes.push(byte);
        bytes.push(code.len() as u8);
        bytes.extend(code.bits().iter().map(|&bit| if bit { b'1' } else { b'0' }));
    }
    bytes.push(padding);

    debug!(
        "Header generated: {} symbols, padding {}, {} bytes",
        codes.len(),
        padding,
        bytes.len()
    );
    Ok(bytes)
}

/// Parsed header: the rebuilt code tree, the padding and the header's own size.
#[derive(Debug)]
pub struct Header {
    pub tree: HuffmanTree,
    pub padding: u8,
    pub len: u64,
}

struct HeaderReader<'a, R> {
    source: &'a mut R,
    consumed: u64,
}

impl<R: Read> HeaderReader<'_, R> {
    fn byte(&mut self, what: &str) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.fill(&mut buf, what)?;
        Ok(buf[0])
    }

    fn fill(&mut self, buf: &mut [u8], what: &str) -> Result<()> {
        match self.source.read_exact(buf) {
            Ok(()) => {
                self.consumed += buf.len() as u64;
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(HuffError::malformed(
                format!("input ends inside {} at offset {}", what, self.consumed),
            )),
            Err(e) => Err(e.into()),
        }
    }
}

pub fn decode_header<R: Read>(source: &mut R) -> Result<Header> {
    let mut reader = HeaderReader {
        source,
        consumed: 0,
    };
    let count = reader.byte("symbol count")? as usize + 1;
    debug!("Header declares {} unique symbols", count);

    let mut tree = HuffmanTree::with_empty_root();
    let mut seen = [false; 256];
    let mut raw = [0u8; MAX_CODE_LEN];

    for _ in 0..count {
        let byte = reader.byte("symbol entry")?;
        let len = reader.byte("code length")? as usize;
        if len == 0 {
            return Err(HuffError::malformed(format!(
                "byte {:#04x} has an empty code",
                byte
            )));
        }
        if std::mem::replace(&mut seen[byte as usize], true) {
            return Err(HuffError::malformed(format!(
                "byte {:#04x} is listed twice",
                byte
            )));
        }

        let code_bytes = &mut raw[..len];
        reader.fill(code_bytes, "code bits")?;
        let bits = code_bytes
            .iter()
            .map(|&c| match c {
                b'0' => Ok(false),
                b'1' => Ok(true),
                other => Err(HuffError::malformed(format!(
                    "invalid code character {:#04x} for byte {:#04x}",
                    other, byte
                ))),
            })
            .collect::<Result<Vec<bool>>>()?;
        let code = Code::new(bits);
        trace!("Header entry: byte {:#04x} code '{}'", byte, code);
        tree.insert_code(byte, &code)?;
    }

    let padding = reader.byte("padding")?;
    if padding > 7 {
        return Err(HuffError::malformed(format!(
            "padding {} is out of range",
            padding
        )));
    }

    debug!(
        "Header decoded: padding {}, {} bytes",
        padding, reader.consumed
    );
    Ok(Header {
        tree,
        padding,
        len: reader.consumed,
    })
}
