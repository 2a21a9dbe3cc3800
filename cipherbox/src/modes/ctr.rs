//! CTR: `O_j = E_K(nonce ∥ j)`, `C_j = P_j ⊕ O_j`.
//!
//! The nonce is half a block wide; the counter occupies the other half,
//! big-endian, starting at zero. Every counter value is known without any
//! data dependency, so both directions fan out over the pool.

use std::io::{Read, Write};

use crate::{BlockCipher, CipherError, bail, pool::WorkerPool, utils::xor_bytes};

use super::{read_chunk, read_header};

fn counter_block(nonce: &[u8], index: u128, block_size: usize) -> Vec<u8> {
    let half = block_size / 2;
    let mut block = Vec::with_capacity(block_size);
    block.extend_from_slice(nonce);
    block.extend_from_slice(&index.to_be_bytes()[16 - half..]);
    block
}

/// XOR `data` against keystream blocks for counters `first_counter ..`,
/// generating the keystream in parallel. Returns the transformed bytes and
/// the next unused counter value.
fn apply_keystream<C: BlockCipher>(
    cipher: &C,
    pool: &WorkerPool,
    nonce: &[u8],
    first_counter: u128,
    data: &[u8],
) -> Result<(Vec<u8>, u128), CipherError> {
    let bs = cipher.block_size();
    let full_blocks = data.len() / bs;

    let inputs: Vec<Vec<u8>> = (0..full_blocks as u128)
        .map(|offset| counter_block(nonce, first_counter + offset, bs))
        .collect();
    let keystreams = pool.map_blocks(inputs, |b| cipher.encrypt_block(b))?;

    let mut out = Vec::with_capacity(data.len());
    for (block, keystream) in data.chunks(bs).take(full_blocks).zip(&keystreams) {
        out.extend_from_slice(&xor_bytes(block, keystream));
    }

    let mut next_counter = first_counter + full_blocks as u128;
    let tail = &data[full_blocks * bs..];
    if !tail.is_empty() {
        let keystream = cipher.encrypt_block(&counter_block(nonce, next_counter, bs))?;
        out.extend_from_slice(&xor_bytes(tail, &keystream[..tail.len()]));
        next_counter += 1;
    }
    Ok((out, next_counter))
}

pub fn encrypt_bytes<C: BlockCipher>(
    cipher: &C,
    pool: &WorkerPool,
    nonce: &[u8],
    data: &[u8],
) -> Result<Vec<u8>, CipherError> {
    let mut out = Vec::with_capacity(nonce.len() + data.len());
    out.extend_from_slice(nonce);
    let (body, _) = apply_keystream(cipher, pool, nonce, 0, data)?;
    out.extend_from_slice(&body);
    Ok(out)
}

pub fn decrypt_bytes<C: BlockCipher>(
    cipher: &C,
    pool: &WorkerPool,
    data: &[u8],
) -> Result<Vec<u8>, CipherError> {
    let half = cipher.block_size() / 2;
    bail!(data.len() < half, CipherError::CiphertextTooShort(half));
    let (nonce, body) = data.split_at(half);
    let (out, _) = apply_keystream(cipher, pool, nonce, 0, body)?;
    Ok(out)
}

pub fn encrypt_stream<C: BlockCipher, R: Read, W: Write>(
    cipher: &C,
    pool: &WorkerPool,
    nonce: &[u8],
    src: &mut R,
    dst: &mut W,
    chunk_size: usize,
) -> Result<(), CipherError> {
    let bs = cipher.block_size();
    dst.write_all(nonce)?;
    let mut counter: u128 = 0;
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
            let (out, next) = apply_keystream(cipher, pool, nonce, counter, &full)?;
            dst.write_all(&out)?;
            counter = next;
        }
    }

    if !carry.is_empty() {
        let (out, _) = apply_keystream(cipher, pool, nonce, counter, &carry)?;
        dst.write_all(&out)?;
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
    let nonce = read_header(src, bs / 2)?;
    let mut counter: u128 = 0;
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
            let (out, next) = apply_keystream(cipher, pool, &nonce, counter, &full)?;
            dst.write_all(&out)?;
            counter = next;
        }
    }

    if !carry.is_empty() {
        let (out, _) = apply_keystream(cipher, pool, &nonce, counter, &carry)?;
        dst.write_all(&out)?;
    }
    Ok(())
}
