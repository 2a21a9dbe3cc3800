//! RANDOM_DELTA: `C_i = E_K(P_i ⊕ iv_i)` where `iv_0` and a per-message
//! delta are drawn fresh on every encryption and emitted as a two-block
//! `IV ∥ delta` header. The per-block IV advances by big-endian wrapping
//! addition: `iv_{i+1} = (iv_i + delta) mod 2^(8B)`.
//!
//! This construction interoperates only with itself.

use std::io::{Read, Write};

use crate::{
    BlockCipher, CipherError, bail,
    padding::{self, Padding},
    pool::WorkerPool,
    utils::{random_bytes, split_blocks, wrapping_add_be, xor_bytes},
};

use super::{read_chunk, read_header};

pub fn encrypt_bytes<C: BlockCipher>(
    cipher: &C,
    scheme: Padding,
    data: &[u8],
) -> Result<Vec<u8>, CipherError> {
    let bs = cipher.block_size();
    let padded = padding::pad(data, bs, scheme);

    let iv = random_bytes(bs);
    let delta = random_bytes(bs);

    let mut out = Vec::with_capacity(2 * bs + padded.len());
    out.extend_from_slice(&iv);
    out.extend_from_slice(&delta);

    let mut current_iv = iv;
    for block in padded.chunks(bs) {
        let encrypted = cipher.encrypt_block(&xor_bytes(block, &current_iv))?;
        out.extend_from_slice(&encrypted);
        current_iv = wrapping_add_be(&current_iv, &delta);
    }
    Ok(out)
}

pub fn decrypt_bytes<C: BlockCipher>(
    cipher: &C,
    pool: &WorkerPool,
    scheme: Padding,
    data: &[u8],
) -> Result<Vec<u8>, CipherError> {
    let bs = cipher.block_size();
    bail!(data.len() < 2 * bs, CipherError::CiphertextTooShort(2 * bs));

    let (header, body) = data.split_at(2 * bs);
    bail!(
        body.len() % bs != 0,
        CipherError::InvalidCiphertextLength(bs)
    );
    let (iv, delta) = header.split_at(bs);

    let decrypted = pool.map_blocks(split_blocks(body, bs), |b| cipher.decrypt_block(b))?;

    let mut plaintext = Vec::with_capacity(body.len());
    let mut current_iv = iv.to_vec();
    for block in &decrypted {
        plaintext.extend_from_slice(&xor_bytes(block, &current_iv));
        current_iv = wrapping_add_be(&current_iv, delta);
    }
    padding::unpad(&plaintext, bs, scheme)
}

pub fn encrypt_stream<C: BlockCipher, R: Read, W: Write>(
    cipher: &C,
    scheme: Padding,
    src: &mut R,
    dst: &mut W,
    chunk_size: usize,
) -> Result<(), CipherError> {
    let bs = cipher.block_size();
    let iv = random_bytes(bs);
    let delta = random_bytes(bs);
    dst.write_all(&iv)?;
    dst.write_all(&delta)?;

    let mut current_iv = iv;
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
            let encrypted = cipher.encrypt_block(&xor_bytes(block, &current_iv))?;
            dst.write_all(&encrypted)?;
            current_iv = wrapping_add_be(&current_iv, &delta);
        }
    }

    for block in padding::pad(&carry, bs, scheme).chunks(bs) {
        let encrypted = cipher.encrypt_block(&xor_bytes(block, &current_iv))?;
        dst.write_all(&encrypted)?;
        current_iv = wrapping_add_be(&current_iv, &delta);
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
    let header = read_header(src, 2 * bs)?;
    let (iv, delta) = header.split_at(bs);

    let mut current_iv = iv.to_vec();
    let mut carry: Vec<u8> = Vec::new();
    let mut hold: Option<Vec<u8>> = None;

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

        let decrypted = pool.map_blocks(split_blocks(&full, bs), |b| cipher.decrypt_block(b))?;
        for block in &decrypted {
            let plain = xor_bytes(block, &current_iv);
            if let Some(previous) = hold.replace(plain) {
                dst.write_all(&previous)?;
            }
            current_iv = wrapping_add_be(&current_iv, delta);
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
