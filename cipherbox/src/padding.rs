//! Block padding schemes.
//!
//! `pad` brings data up to a whole number of blocks; `unpad` validates and
//! strips what `pad` added. One deliberate quirk is preserved from the wire
//! format this engine must stay compatible with: input whose length is
//! already a multiple of the block size is returned unchanged by every
//! scheme, no full padding block is appended. `unpad` therefore tolerates
//! the absent-padding case (a trailing byte that cannot be a pad length
//! leaves the data untouched). Callers that need strict PKCS#7 must append
//! their own final block.

use std::fmt;
use std::str::FromStr;

use crate::{CipherError, bail, utils};

/// Padding scheme selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Padding {
    /// Fill with zero bytes; `unpad` strips trailing zeros.
    Zeros,
    /// `pad_len` copies of the byte `pad_len`.
    Pkcs7,
    /// Zero bytes, then a final byte holding `pad_len`.
    AnsiX923,
    /// Random bytes, then a final byte holding `pad_len`.
    Iso10126,
}

impl FromStr for Padding {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zeros" => Ok(Padding::Zeros),
            "pkcs7" => Ok(Padding::Pkcs7),
            "ansi-x923" | "x923" => Ok(Padding::AnsiX923),
            "iso-10126" | "iso10126" => Ok(Padding::Iso10126),
            other => Err(CipherError::UnknownPadding(other.to_string())),
        }
    }
}

impl fmt::Display for Padding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Padding::Zeros => "zeros",
            Padding::Pkcs7 => "pkcs7",
            Padding::AnsiX923 => "ansi-x923",
            Padding::Iso10126 => "iso-10126",
        };
        f.write_str(name)
    }
}

/// Extend `data` to the next multiple of `block_size`.
///
/// Aligned input (including empty input) is returned unchanged.
pub fn pad(data: &[u8], block_size: usize, padding: Padding) -> Vec<u8> {
    let rem = data.len() % block_size;
    if rem == 0 {
        return data.to_vec();
    }
    let pad_len = block_size - rem;

    let mut out = Vec::with_capacity(data.len() + pad_len);
    out.extend_from_slice(data);
    match padding {
        Padding::Zeros => out.extend(std::iter::repeat_n(0u8, pad_len)),
        Padding::Pkcs7 => out.extend(std::iter::repeat_n(pad_len as u8, pad_len)),
        Padding::AnsiX923 => {
            out.extend(std::iter::repeat_n(0u8, pad_len - 1));
            out.push(pad_len as u8);
        }
        Padding::Iso10126 => {
            out.extend_from_slice(&utils::random_bytes(pad_len - 1));
            out.push(pad_len as u8);
        }
    }
    out
}

/// Validate and strip padding from `data`.
///
/// For the length-byte schemes: a trailing byte outside `[1, block_size]`
/// (or empty input) means no padding was applied and the data is returned
/// as is; a plausible pad length whose pattern fails the scheme's check is
/// [`CipherError::InvalidPadding`]; input that is not a whole number of
/// blocks is [`CipherError::InvalidPaddingLength`].
pub fn unpad(data: &[u8], block_size: usize, padding: Padding) -> Result<Vec<u8>, CipherError> {
    if padding == Padding::Zeros {
        let end = data.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        return Ok(data[..end].to_vec());
    }

    if data.is_empty() {
        return Ok(Vec::new());
    }
    bail!(
        data.len() % block_size != 0,
        CipherError::InvalidPaddingLength
    );

    let pad_len = data[data.len() - 1] as usize;
    if pad_len < 1 || pad_len > block_size {
        return Ok(data.to_vec());
    }

    let body = data.len() - pad_len;
    match padding {
        Padding::Pkcs7 => bail!(
            data[body..].iter().any(|&b| b as usize != pad_len),
            CipherError::InvalidPadding
        ),
        Padding::AnsiX923 => bail!(
            data[body..data.len() - 1].iter().any(|&b| b != 0),
            CipherError::InvalidPadding
        ),
        // ISO 10126 fill bytes are random; only the length byte is checked.
        Padding::Iso10126 => {}
        Padding::Zeros => {}
    }

    Ok(data[..body].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pkcs7_pads_unaligned_data() {
        let out = pad(b"hello", 8, Padding::Pkcs7);
        assert_eq!(out.len(), 8);
        assert_eq!(&out[5..], &[3, 3, 3]);
        assert_eq!(unpad(&out, 8, Padding::Pkcs7).unwrap(), b"hello");
    }

    #[test]
    fn aligned_data_is_left_unchanged() {
        let data = b"messages";
        for scheme in [
            Padding::Zeros,
            Padding::Pkcs7,
            Padding::AnsiX923,
            Padding::Iso10126,
        ] {
            assert_eq!(pad(data, 8, scheme), data, "{scheme}");
        }
    }

    #[test]
    fn unpad_tolerates_absent_padding() {
        // 's' = 0x73 can never be a pad length for an 8-byte block.
        let data = b"messages";
        for scheme in [Padding::Pkcs7, Padding::AnsiX923, Padding::Iso10126] {
            assert_eq!(unpad(data, 8, scheme).unwrap(), data, "{scheme}");
        }
    }

    #[test]
    fn zeros_pads_and_strips() {
        let out = pad(b"ab", 4, Padding::Zeros);
        assert_eq!(out, b"ab\x00\x00");
        assert_eq!(unpad(&out, 4, Padding::Zeros).unwrap(), b"ab");
    }

    #[test]
    fn ansi_x923_layout() {
        let out = pad(b"abc", 8, Padding::AnsiX923);
        assert_eq!(&out[3..], &[0, 0, 0, 0, 5]);
        assert_eq!(unpad(&out, 8, Padding::AnsiX923).unwrap(), b"abc");
    }

    #[test]
    fn iso_10126_round_trips() {
        let out = pad(b"abc", 8, Padding::Iso10126);
        assert_eq!(out.len(), 8);
        assert_eq!(out[7], 5);
        assert_eq!(unpad(&out, 8, Padding::Iso10126).unwrap(), b"abc");
    }

    #[test]
    fn pkcs7_rejects_inconsistent_tail() {
        let data = b"bad\x04\x04\x04\x02\x04";
        assert!(matches!(
            unpad(data, 8, Padding::Pkcs7),
            Err(CipherError::InvalidPadding)
        ));
    }

    #[test]
    fn ansi_x923_rejects_nonzero_fill() {
        let data = b"bad\x00\x00\x07\x00\x05";
        assert!(matches!(
            unpad(data, 8, Padding::AnsiX923),
            Err(CipherError::InvalidPadding)
        ));
    }

    #[test]
    fn unpad_rejects_ragged_length() {
        let data = b"oops\x04\x04\x04";
        assert!(matches!(
            unpad(data, 8, Padding::Pkcs7),
            Err(CipherError::InvalidPaddingLength)
        ));
    }

    #[test]
    fn unpad_of_empty_input_is_empty() {
        for scheme in [
            Padding::Zeros,
            Padding::Pkcs7,
            Padding::AnsiX923,
            Padding::Iso10126,
        ] {
            assert_eq!(unpad(&[], 8, scheme).unwrap(), Vec::<u8>::new());
        }
    }
}
