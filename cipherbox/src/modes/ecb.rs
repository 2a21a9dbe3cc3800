//! ECB: `C_i = E_K(P_i)`, every block independent of its neighbours.

use std::io::{Read, Write};

use crate::{
    BlockCipher, CipherError, bail,
    padding::{self, Padding},
    pool::WorkerPool,
    utils::split_blocks,
};

use super::read_chunk;

pub fn encrypt_bytes<C: BlockCipher>(
    cipher: &C,
    pool: &WorkerPool,
    scheme: Padding,
    data: &[u8],
) -> Result<Vec<u8>, CipherError> {
    let bs = cipher.block_size();
    let padded = padding::pad(data, bs, scheme);
    let blocks = pool.map_blocks(split_blocks(&padded, bs), |b| cipher.encrypt_block(b))?;
    Ok(blocks.concat())
}

pub fn decrypt_bytes<C: BlockCipher>(
    cipher: &C,
    pool: &WorkerPool,
    scheme: Padding,
    data: &[u8],
) -> Result<Vec<u8>, CipherError> {
    let bs = cipher.block_size();
    bail!(
        data.len() % bs != 0,
        CipherError::InvalidCiphertextLength(bs)
    );
    let blocks = pool.map_blocks(split_blocks(data, bs), |b| cipher.decrypt_block(b))?;
    padding::unpad(&blocks.concat(), bs, scheme)
}

pub fn encrypt_stream<C: BlockCipher, R: Read, W: Write>(
    cipher: &C,
    pool: &WorkerPool,
    scheme: Padding,
    src: &mut R,
    dst: &mut W,
    chunk_size: usize,
) -> Result<(), CipherError> {
    let bs = cipher.block_size();
    let mut carry: Vec<u8> = Vec::new();

    loop {
        let chunk = read_chunk(src, chunk_size)?;
        if chunk.is_empty() {
            break;
        }
        carry.extend_from_slice(&chunk);

        let full_len = carry.len() / bs * bs;
        let full: Vec<u8> = carry.drain(..full_len).collect();
        if !full.is_empty() {
            let blocks = pool.map_blocks(split_blocks(&full, bs), |b| cipher.encrypt_block(b))?;
            dst.write_all(&blocks.concat())?;
        }
    }

    // Only the final residue is padded.
    let padded = padding::pad(&carry, bs, scheme);
    if !padded.is_empty() {
        let blocks = pool.map_blocks(split_blocks(&padded, bs), |b| cipher.encrypt_block(b))?;
        dst.write_all(&blocks.concat())?;
    }
    Ok(())
}

pub fn decrypt_stream<C: BlockCipher, R: Read, W: Write>(
    cipher: &C,
    pool: &WorkerPool,
    scheme: Padding,
    src: &mut R,
    dst: &mut W,
    chunk_size: usize,
) -> Result<(), CipherError> {
    let bs = cipher.block_size();
    let mut carry: Vec<u8> = Vec::new();
    // One decrypted block is held back so the last one can be unpadded.
    let mut hold: Option<Vec<u8>> = None;

    loop {
        let chunk = read_chunk(src, chunk_size)?;
        if chunk.is_empty() {
            break;
        }
        carry.extend_from_slice(&chunk);

        let full_len = carry.len() / bs * bs;
        let full: Vec<u8> = carry.drain(..full_len).collect();
        if !full.is_empty() {
            let blocks = pool.map_blocks(split_blocks(&full, bs), |b| cipher.decrypt_block(b))?;
            for block in blocks {
                if let Some(previous) = hold.replace(block) {
                    dst.write_all(&previous)?;
                }
            }
        }
    }

    bail!(
        !carry.is_empty(),
        CipherError::InvalidCiphertextLength(bs)
    );
    if let Some(last) = hold {
        dst.write_all(&padding::unpad(&last, bs, scheme)?)?;
    }
    Ok(())
}
