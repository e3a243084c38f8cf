use crate::{
    error::{Error, Result},
    instruction::{decode, DecodedInstruction},
    INSTRUCTION_SIZE,
};
use log::{debug, trace, warn};
use rayon::{prelude::*, ThreadPoolBuilder};
use std::{io, iter::FusedIterator};

/// Lazily decodes little-endian instruction words from a byte source.
///
/// Every word yields one item, in address order. Unrecognized words yield an error item and decoding
/// continues with the next word. A truncated final word or a read error ends the sequence.
/// Addresses wrap around at the end of the 32-bit address space.
pub struct Disassembler<R> {
    source: R,
    address: u32,
    finished: bool,
}

impl<R: io::Read> Disassembler<R> {
    /// Creates a disassembler which assigns `base` to the first word read from `source`.
    pub fn new(source: R, base: u32) -> Self {
        debug!("disassembling from base address {base:#x}");
        Self {
            source,
            address: base,
            finished: false,
        }
    }

    /// The address the next word will be decoded at.
    pub const fn address(&self) -> u32 {
        self.address
    }

    fn read_word(&mut self) -> Result<Option<u32>> {
        let mut buf = [0; INSTRUCTION_SIZE];
        let mut filled = 0;
        while filled < buf.len() {
            match self.source.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        match filled {
            0 => Ok(None),
            INSTRUCTION_SIZE => Ok(Some(u32::from_le_bytes(buf))),
            available => Err(Error::TruncatedInstruction {
                address: self.address,
                available,
            }),
        }
    }
}

impl<R: io::Read> Iterator for Disassembler<R> {
    type Item = Result<DecodedInstruction>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let word = match self.read_word() {
            Ok(Some(word)) => word,
            Ok(None) => {
                debug!("reached end of input at {:#x}", self.address);
                self.finished = true;
                return None;
            }
            Err(e) => {
                self.finished = true;
                return Some(Err(e));
            }
        };

        let address = self.address;
        self.address = word_address(address, 1);

        let result = decode(word, address);
        match &result {
            Ok(instr) => trace!("{address:#010x}: {word:#010x} {instr}"),
            Err(e) => trace!("{address:#010x}: {e}"),
        }
        Some(result)
    }
}

impl<R: io::Read> FusedIterator for Disassembler<R> {}

/// The address of the `index`th word after `base`.
fn word_address(base: u32, index: usize) -> u32 {
    base.wrapping_add((index as u32).wrapping_mul(INSTRUCTION_SIZE as u32))
}

/// Decodes an in-memory buffer on a pool of `workers` threads, or one per core if `workers` is zero.
///
/// The results are identical to collecting a [`Disassembler`] over the same bytes:
/// one entry per word in address order, followed by a truncation error if the length is not a multiple of four.
#[must_use]
pub fn decode_parallel(bytes: &[u8], base: u32, workers: usize) -> Vec<Result<DecodedInstruction>> {
    let words = bytes.len() / INSTRUCTION_SIZE;
    let remainder = bytes.len() % INSTRUCTION_SIZE;
    debug!("decoding {words} words on {workers} workers");

    let decode_all = || -> Vec<Result<DecodedInstruction>> {
        bytes
            .par_chunks_exact(INSTRUCTION_SIZE)
            .enumerate()
            .map(|(i, c)| {
                let word = u32::from_le_bytes([c[0], c[1], c[2], c[3]]);
                decode(word, word_address(base, i))
            })
            .collect()
    };

    let mut results = match ThreadPoolBuilder::new().num_threads(workers).build() {
        Ok(pool) => pool.install(decode_all),
        Err(e) => {
            warn!("failed to start a pool of {workers} threads, using the global pool: {e}");
            decode_all()
        }
    };

    if remainder != 0 {
        results.push(Err(Error::TruncatedInstruction {
            address: word_address(base, words),
            available: remainder,
        }));
    }
    results
}
