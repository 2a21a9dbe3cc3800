//! PCBC: `C_i = E_K(P_i ⊕ P_{i−1} ⊕ C_{i−1})` with `P_0 = 0`, `C_0 = IV`.
//!
//! A single flipped ciphertext bit corrupts everything downstream, which is
//! the propagation this mode exists for; round-trips are still exact.

use std::io::{Read, Write};

use crate::{
    BlockCipher, CipherError, bail,
    padding::{self, Padding},
    pool::WorkerPool,
    utils::{split_blocks, xor_bytes},
};

use super::{read_chunk, read_header};

pub fn encrypt_bytes<C: BlockCipher>(
    cipher: &C,
    scheme: Padding,
    iv: &[u8],
    data: &[u8],
) -> Result<Vec<u8>, CipherError> {
    let bs = cipher.block_size();
    let padded = padding::pad(data, bs, scheme);

    let mut out = Vec::with_capacity(bs + padded.len());
    out.extend_from_slice(iv);
    let mut prev_cipher = iv.to_vec();
    let mut prev_plain = vec![0u8; bs];
    for block in padded.chunks(bs) {
        let mixed = xor_bytes(block, &xor_bytes(&prev_plain, &prev_cipher));
        let encrypted = cipher.encrypt_block(&mixed)?;
        out.extend_from_slice(&encrypted);
        prev_plain = block.to_vec();
        prev_cipher = encrypted;
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
    bail!(data.len() < bs, CipherError::CiphertextTooShort(bs));

    let (iv, body) = data.split_at(bs);
    if body.is_empty() {
        return Ok(Vec::new());
    }
    bail!(
        body.len() % bs != 0,
        CipherError::InvalidCiphertextLength(bs)
    );

    let blocks = split_blocks(body, bs);
    let decrypted = pool.map_blocks(blocks.clone(), |b| cipher.decrypt_block(b))?;

    let mut plaintext = Vec::with_capacity(body.len());
    let mut prev_cipher = iv.to_vec();
    let mut prev_plain = vec![0u8; bs];
    for (index, block) in decrypted.iter().enumerate() {
        let plain = xor_bytes(block, &xor_bytes(&prev_plain, &prev_cipher));
        plaintext.extend_from_slice(&plain);
        prev_plain = plain;
        prev_cipher = blocks[index].to_vec();
    }
    padding::unpad(&plaintext, bs, scheme)
}

pub fn encrypt_stream<C: BlockCipher, R: Read, W: Write>(
    cipher: &C,
    scheme: Padding,
    iv: &[u8],
    src: &mut R,
    dst: &mut W,
    chunk_size: usize,
) -> Result<(), CipherError> {
    let bs = cipher.block_size();
    dst.write_all(iv)?;
    let mut prev_cipher = iv.to_vec();
    let mut prev_plain = vec![0u8; bs];
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
            let mixed = xor_bytes(block, &xor_bytes(&prev_plain, &prev_cipher));
            let encrypted = cipher.encrypt_block(&mixed)?;
            dst.write_all(&encrypted)?;
            prev_plain = block.to_vec();
            prev_cipher = encrypted;
        }
    }

    for block in padding::pad(&carry, bs, scheme).chunks(bs) {
        let mixed = xor_bytes(block, &xor_bytes(&prev_plain, &prev_cipher));
        let encrypted = cipher.encrypt_block(&mixed)?;
        dst.write_all(&encrypted)?;
        prev_plain = block.to_vec();
        prev_cipher = encrypted;
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
    let mut prev_cipher = read_header(src, bs)?;
    let mut prev_plain = vec![0u8; bs];
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

        let blocks = split_blocks(&full, bs);
        let decrypted = pool.map_blocks(blocks.clone(), |b| cipher.decrypt_block(b))?;
        for (index, block) in decrypted.iter().enumerate() {
            let plain = xor_bytes(block, &xor_bytes(&prev_plain, &prev_cipher));
            if let Some(previous) = hold.replace(plain.clone()) {
                dst.write_all(&previous)?;
            }
            prev_plain = plain;
            prev_cipher = blocks[index].to_vec();
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
