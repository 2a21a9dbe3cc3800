//! OFB: `S_i = E_K(S_{i−1})`, `C_i = P_i ⊕ S_i`, `S_0 = IV`.
//!
//! The keystream chain depends only on itself, so both directions are the
//! same XOR and neither can be parallelised.

use std::io::{Read, Write};

use crate::{BlockCipher, CipherError, bail, utils::xor_bytes};

use super::{read_chunk, read_header};

/// Advance the keystream over `data`, block by block, truncating the final
/// keystream block to the tail length. Returns the transformed bytes and
/// leaves the final keystream state in `seed`.
fn keystream_xor<C: BlockCipher>(
    cipher: &C,
    seed: &mut Vec<u8>,
    data: &[u8],
) -> Result<Vec<u8>, CipherError> {
    let bs = cipher.block_size();
    let mut out = Vec::with_capacity(data.len());
    for block in data.chunks(bs) {
        *seed = cipher.encrypt_block(seed)?;
        out.extend_from_slice(&xor_bytes(block, &seed[..block.len()]));
    }
    Ok(out)
}

pub fn encrypt_bytes<C: BlockCipher>(
    cipher: &C,
    iv: &[u8],
    data: &[u8],
) -> Result<Vec<u8>, CipherError> {
    let mut out = Vec::with_capacity(iv.len() + data.len());
    out.extend_from_slice(iv);
    let mut seed = iv.to_vec();
    out.extend_from_slice(&keystream_xor(cipher, &mut seed, data)?);
    Ok(out)
}

pub fn decrypt_bytes<C: BlockCipher>(cipher: &C, data: &[u8]) -> Result<Vec<u8>, CipherError> {
    let bs = cipher.block_size();
    bail!(data.len() < bs, CipherError::CiphertextTooShort(bs));
    let (iv, body) = data.split_at(bs);
    let mut seed = iv.to_vec();
    keystream_xor(cipher, &mut seed, body)
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
    let mut seed = iv.to_vec();
    let mut carry: Vec<u8> = Vec::new();

    loop {
        let chunk = read_chunk(src, chunk_size)?;
        if chunk.is_empty() {
            break;
        }
        carry.extend_from_slice(&chunk);

        let full_len = carry.len() / bs * bs;
        let full: Vec<u8> = carry.drain(..full_len).collect();
        dst.write_all(&keystream_xor(cipher, &mut seed, &full)?)?;
    }

    if !carry.is_empty() {
        dst.write_all(&keystream_xor(cipher, &mut seed, &carry)?)?;
    }
    Ok(())
}

pub fn decrypt_stream<C: BlockCipher, R: Read, W: Write>(
    cipher: &C,
    src: &mut R,
    dst: &mut W,
    chunk_size: usize,
) -> Result<(), CipherError> {
    let bs = cipher.block_size();
    let mut seed = read_header(src, bs)?;
    let mut carry: Vec<u8> = Vec::new();

    loop {
        let chunk = read_chunk(src, chunk_size)?;
        if chunk.is_empty() {
            break;
        }
        carry.extend_from_slice(&chunk);

        let full_len = carry.len() / bs * bs;
        let full: Vec<u8> = carry.drain(..full_len).collect();
        dst.write_all(&keystream_xor(cipher, &mut seed, &full)?)?;
    }

    if !carry.is_empty() {
        dst.write_all(&keystream_xor(cipher, &mut seed, &carry)?)?;
    }
    Ok(())
}
