//! Small byte-level helpers shared by the primitives and mode engines.

use rand::RngCore;

/// XOR two equal-length byte slices into a fresh buffer.
pub fn xor_bytes(a: &[u8], b: &[u8]) -> Vec<u8> {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| x ^ y).collect()
}

/// Split `data` into `block_size` chunks. The final chunk may be shorter;
/// callers that require whole blocks slice the input beforehand.
pub fn split_blocks(data: &[u8], block_size: usize) -> Vec<&[u8]> {
    data.chunks(block_size).collect()
}

/// Draw `len` bytes from the thread-local CSPRNG.
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut buf);
    buf
}

/// Add two equal-length big-endian unsigned integers, wrapping modulo
/// 2^(8·len). RANDOM_DELTA advances its per-block IV with this.
pub fn wrapping_add_be(value: &[u8], addend: &[u8]) -> Vec<u8> {
    debug_assert_eq!(value.len(), addend.len());
    let mut out = value.to_vec();
    let mut carry = 0u16;
    for i in (0..out.len()).rev() {
        let sum = out[i] as u16 + addend[i] as u16 + carry;
        out[i] = (sum & 0xFF) as u8;
        carry = sum >> 8;
    }
    out
}
