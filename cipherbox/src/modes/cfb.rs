//! CFB: `C_i = P_i ⊕ E_K(C_{i−1})` with `C_0 = IV`.
//!
//! The primitive only ever runs in the encrypt direction; this is a
//! keystream mode, so no padding applies and the tail XORs against a
//! truncated keystream block. Decryption parallelises because every `E_K`
//! input is a ciphertext block already in hand.

use std::io::{Read, Write};

use crate::{
    BlockCipher, CipherError, bail,
    pool::WorkerPool,
    utils::{split_blocks, xor_bytes},
};

use super::{read_chunk, read_header};

pub fn encrypt_bytes<C: BlockCipher>(
    cipher: &C,
    iv: &[u8],
    data: &[u8],
) -> Result<Vec<u8>, CipherError> {
    let bs = cipher.block_size();
    let mut out = Vec::with_capacity(bs + data.len());
    out.extend_from_slice(iv);

    let full_len = data.len() / bs * bs;
    let mut prev = iv.to_vec();
    for block in data[..full_len].chunks(bs) {
        let keystream = cipher.encrypt_block(&prev)?;
        let encrypted = xor_bytes(block, &keystream);
        out.extend_from_slice(&encrypted);
        prev = encrypted;
    }

    let tail = &data[full_len..];
    if !tail.is_empty() {
        let keystream = cipher.encrypt_block(&prev)?;
        out.extend_from_slice(&xor_bytes(tail, &keystream[..tail.len()]));
    }
    Ok(out)
}

pub fn decrypt_bytes<C: BlockCipher>(
    cipher: &C,
    pool: &WorkerPool,
    data: &[u8],
) -> Result<Vec<u8>, CipherError> {
    let bs = cipher.block_size();
    bail!(data.len() < bs, CipherError::CiphertextTooShort(bs));

    let (iv, body) = data.split_at(bs);
    if body.is_empty() {
        return Ok(Vec::new());
    }

    let full_len = body.len() / bs * bs;
    let blocks = split_blocks(&body[..full_len], bs);
    let mut out = Vec::with_capacity(body.len());
    let mut prev: &[u8] = iv;

    if !blocks.is_empty() {
        // Every keystream input is known up front: the IV plus all
        // ciphertext blocks except the last.
        let mut inputs: Vec<&[u8]> = Vec::with_capacity(blocks.len());
        inputs.push(iv);
        inputs.extend_from_slice(&blocks[..blocks.len() - 1]);

        let keystreams = pool.map_blocks(inputs, |b| cipher.encrypt_block(b))?;
        for (block, keystream) in blocks.iter().zip(&keystreams) {
            out.extend_from_slice(&xor_bytes(block, keystream));
        }
        prev = blocks[blocks.len() - 1];
    }

    let tail = &body[full_len..];
    if !tail.is_empty() {
        let keystream = cipher.encrypt_block(prev)?;
        out.extend_from_slice(&xor_bytes(tail, &keystream[..tail.len()]));
    }
    Ok(out)
}

pub fn encrypt_stream<C: BlockCipher, R: Read, W: Write>(
    cipher: &C,
    iv: &[u8],
    src: &mut R,
    dst: &mut W,
    chunk_size: usize,
) -> Result<(), CipherError> {
    let bs = cipher.block_size();
    dst.write_all(iv)?;
    let mut prev = iv.to_vec();
    let mut carry: Vec<u8> = Vec::new();

    loop {
        let chunk = read_chunk(src, chunk_size)?;
        if chunk.is_empty() {
            break;
        }
        carry.extend_from_slice(&chunk);

        let full_len = carry.len() / bs * bs;
        let full: Vec<u8> = carry.drain(..full_len).collect();
        for block in full.chunks(bs) {
            let keystream = cipher.encrypt_block(&prev)?;
            let encrypted = xor_bytes(block, &keystream);
            dst.write_all(&encrypted)?;
            prev = encrypted;
        }
    }

    if !carry.is_empty() {
        let keystream = cipher.encrypt_block(&prev)?;
        dst.write_all(&xor_bytes(&carry, &keystream[..carry.len()]))?;
    }
    Ok(())
}

pub fn decrypt_stream<C: BlockCipher, R: Read, W: Write>(
    cipher: &C,
    pool: &WorkerPool,
    src: &mut R,
    dst: &mut W,
    chunk_size: usize,
) -> Result<(), CipherError> {
    let bs = cipher.block_size();
    // prev carries the last ciphertext block across chunk batches.
    let mut prev = read_header(src, bs)?;
    let mut carry: Vec<u8> = Vec::new();

    loop {
        let chunk = read_chunk(src, chunk_size)?;
        if chunk.is_empty() {
            break;
        }
        carry.extend_from_slice(&chunk);

        let full_len = carry.len() / bs * bs;
        let full: Vec<u8> = carry.drain(..full_len).collect();
        if full.is_empty() {
            continue;
        }

        let blocks = split_blocks(&full, bs);
        let mut inputs: Vec<&[u8]> = Vec::with_capacity(blocks.len());
        inputs.push(&prev);
        inputs.extend_from_slice(&blocks[..blocks.len() - 1]);

        let keystreams = pool.map_blocks(inputs, |b| cipher.encrypt_block(b))?;
        for (block, keystream) in blocks.iter().zip(&keystreams) {
            dst.write_all(&xor_bytes(block, keystream))?;
        }
        prev = blocks[blocks.len() - 1].to_vec();
    }

    if !carry.is_empty() {
        let keystream = cipher.encrypt_block(&prev)?;
        dst.write_all(&xor_bytes(&carry, &keystream[..carry.len()]))?;
    }
    Ok(())
}
