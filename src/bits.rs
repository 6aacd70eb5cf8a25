//! Bit packing of code sequences into bytes, most significant bit first,
//! and the tree walk that turns them back into bytes.

use std::io::{self, Read, Write};

use log::debug;

use crate::error::{HuffError, Result};
use crate::huffman::{Code, CodeTable, HuffmanTree, Node, NodeId};
use crate::progress::Progress;
use crate::source::for_each_chunk;

/// 8-bit accumulator over a byte sink.
pub struct BitPacker<W: Write> {
    sink: W,
    acc: u8,
    filled: u8,
    written: u64,
}

impl<W: Write> BitPacker<W> {
    pub fn new(sink: W) -> Self {
        BitPacker {
            sink,
            acc: 0,
            filled: 0,
            written: 0,
        }
    }

    pub fn push_bit(&mut self, bit: bool) -> io::Result<()> {
        if bit {
            self.acc |= 1 << (7 - self.filled);
        }
        self.filled += 1;
        if self.filled == 8 {
            self.flush_acc()?;
        }
        Ok(())
    }

    pub fn push_code(&mut self, code: &Code) -> io::Result<()> {
        for &bit in code.bits() {
            self.push_bit(bit)?;
        }
        Ok(())
    }

    fn flush_acc(&mut self) -> io::Result<()> {
        self.sink.write_all(&[self.acc])?;
        self.written += 1;
        self.acc = 0;
        self.filled = 0;
        Ok(())
    }

    /// Writes the pending partial byte, if any, and returns the sink with
    /// the number of bytes written.
    pub fn finish(mut self) -> io::Result<(W, u64)> {
        if self.filled > 0 {
            self.flush_acc()?;
        }
        self.sink.flush()?;
        Ok((self.sink, self.written))
    }
}

/// Encodes the first `length` bytes of `source` with `codes` into `sink`.
/// Returns the payload size in bytes.
pub fn pack<R, W>(
    source: R,
    length: u64,
    codes: &CodeTable,
    sink: W,
    progress: &mut dyn Progress,
) -> Result<u64>
where
    R: Read,
    W: Write,
{
    let mut packer = BitPacker::new(sink);
    for_each_chunk(source, length, |chunk, done| {
        for &b in chunk {
            let code = codes.get(b).ok_or(HuffError::UnmappedByte(b))?;
            packer.push_code(code)?;
        }
        progress.update(done, length);
        Ok(())
    })?;
    progress.finish();

    let (_, written) = packer.finish()?;
    debug!("Packed {} input bytes into {} payload bytes", length, written);
    Ok(written)
}

/// Walks a code tree one bit at a time, emitting a byte at every leaf.
pub struct BitUnpacker<'t> {
    tree: &'t HuffmanTree,
    cursor: NodeId,
}

impl<'t> BitUnpacker<'t> {
    pub fn new(tree: &'t HuffmanTree) -> Self {
        BitUnpacker {
            tree,
            cursor: tree.root(),
        }
    }

    /// Follows one bit; returns the decoded byte when a leaf is reached.
    pub fn step(&mut self, bit: bool) -> Result<Option<u8>> {
        let next = self.tree.child(self.cursor, bit).ok_or_else(|| {
            HuffError::corrupt("bit sequence leads outside the code tree")
        })?;
        match self.tree.node(next) {
            Node::Leaf { byte, .. } => {
                self.cursor = self.tree.root();
                Ok(Some(*byte))
            }
            Node::Internal { .. } => {
                self.cursor = next;
                Ok(None)
            }
        }
    }

    pub fn at_root(&self) -> bool {
        self.cursor == self.tree.root()
    }
}

/// Decodes `payload_len` bytes of `source` against `tree` into `sink`,
/// ignoring the `padding` low bits of the final byte. Returns the number of
/// bytes written.
pub fn unpack<R, W>(
    source: R,
    payload_len: u64,
    tree: &HuffmanTree,
    padding: u8,
    mut sink: W,
    progress: &mut dyn Progress,
) -> Result<u64>
where
    R: Read,
    W: Write,
{
    if payload_len == 0 {
        return Err(HuffError::corrupt("payload is empty"));
    }
    if padding > 7 {
        return Err(HuffError::corrupt(format!("padding {} is out of range", padding)));
    }

    let mut unpacker = BitUnpacker::new(tree);
    let mut out = Vec::new();
    let mut written = 0u64;

    let walked = for_each_chunk(source, payload_len, |chunk, done| {
        let chunk_start = done - chunk.len() as u64;
        for (i, &b) in chunk.iter().enumerate() {
            let is_last = chunk_start + i as u64 == payload_len - 1;
            let used = if is_last { 8 - padding } else { 8 };
            for shift in (8 - used..8).rev() {
                if let Some(byte) = unpacker.step(b & (1 << shift) != 0)? {
                    out.push(byte);
                }
            }
            if is_last && b & ((1u16 << padding) - 1) as u8 != 0 {
                return Err(HuffError::corrupt("padding bits of the final byte are not zero"));
            }
        }
        sink.write_all(&out)?;
        written += out.len() as u64;
        out.clear();
        progress.update(done, payload_len);
        Ok(())
    });
    progress.finish();

    match walked {
        Err(HuffError::Io(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
            return Err(HuffError::corrupt(e));
        }
        other => other?,
    }

    if !unpacker.at_root() {
        return Err(HuffError::corrupt("payload ends in the middle of a code"));
    }
    sink.flush()?;

    debug!("Unpacked {} payload bytes into {} bytes", payload_len, written);
    Ok(written)
}
