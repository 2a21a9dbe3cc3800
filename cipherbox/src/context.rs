//! The symmetric context: parameter validation and wiring.
//!
//! A context owns one keyed primitive, a mode tag, a padding scheme, an
//! optional IV and the worker pool; the pool lives exactly as long as the
//! context. Public operations are synchronous: each call runs to completion
//! (fanning block work out over the pool) and returns the finished result.
//! There is no cancellation.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::debug;

use crate::{
    BlockCipher, CipherError, CipherMode, bail,
    modes::{cbc, cfb, ctr, ecb, ofb, pcbc, random_delta},
    padding::Padding,
    pool::WorkerPool,
    utils::random_bytes,
};

/// Chunk size used by the file entry points.
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

pub struct SymmetricContext<C: BlockCipher> {
    cipher: C,
    mode: CipherMode,
    padding: Padding,
    iv: Option<Vec<u8>>,
    pool: WorkerPool,
    block_size: usize,
}

impl<C: BlockCipher> SymmetricContext<C> {
    /// Key the primitive, validate the IV against the mode, and spin up the
    /// worker pool (`max_workers` threads, default 2× the available
    /// parallelism).
    ///
    /// An absent IV is drawn from the system RNG at encrypt time for the
    /// modes that need one. RANDOM_DELTA always generates its own header
    /// material; a supplied IV is still length-checked, then ignored.
    pub fn new(
        mut cipher: C,
        key: &[u8],
        mode: CipherMode,
        padding: Padding,
        iv: Option<Vec<u8>>,
        max_workers: Option<usize>,
    ) -> Result<Self, CipherError> {
        cipher.set_keys(key)?;
        let block_size = cipher.block_size();

        if let (Some(iv), Some(expected)) = (&iv, mode.iv_len(block_size)) {
            bail!(
                iv.len() != expected,
                CipherError::InvalidIv {
                    got: iv.len(),
                    expected,
                }
            );
        }

        let pool = WorkerPool::new(max_workers)?;
        debug!(
            %mode,
            %padding,
            block_size,
            workers = pool.workers(),
            "symmetric context ready"
        );
        Ok(Self {
            cipher,
            mode,
            padding,
            iv,
            pool,
            block_size,
        })
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn mode(&self) -> CipherMode {
        self.mode
    }

    /// The IV actually used for one encryption: the configured one, or a
    /// fresh draw of the mode's required length.
    fn next_iv(&self) -> Vec<u8> {
        let len = self
            .mode
            .iv_len(self.block_size)
            .expect("mode carries an IV");
        self.iv.clone().unwrap_or_else(|| random_bytes(len))
    }

    /// Encrypt a whole in-memory buffer. The returned ciphertext carries
    /// the mode's header (IV/nonce) in front of the body.
    pub fn encrypt_bytes(&self, data: &[u8]) -> Result<Vec<u8>, CipherError> {
        match self.mode {
            CipherMode::Ecb => ecb::encrypt_bytes(&self.cipher, &self.pool, self.padding, data),
            CipherMode::Cbc => cbc::encrypt_bytes(&self.cipher, self.padding, &self.next_iv(), data),
            CipherMode::Pcbc => {
                pcbc::encrypt_bytes(&self.cipher, self.padding, &self.next_iv(), data)
            }
            CipherMode::Cfb => cfb::encrypt_bytes(&self.cipher, &self.next_iv(), data),
            CipherMode::Ofb => ofb::encrypt_bytes(&self.cipher, &self.next_iv(), data),
            CipherMode::Ctr => ctr::encrypt_bytes(&self.cipher, &self.pool, &self.next_iv(), data),
            CipherMode::RandomDelta => {
                random_delta::encrypt_bytes(&self.cipher, self.padding, data)
            }
        }
    }

    /// Decrypt a whole in-memory buffer produced by
    /// [`encrypt_bytes`](Self::encrypt_bytes) (or the matching streaming
    /// entry point) under the same parameters.
    pub fn decrypt_bytes(&self, data: &[u8]) -> Result<Vec<u8>, CipherError> {
        match self.mode {
            CipherMode::Ecb => ecb::decrypt_bytes(&self.cipher, &self.pool, self.padding, data),
            CipherMode::Cbc => cbc::decrypt_bytes(&self.cipher, &self.pool, self.padding, data),
            CipherMode::Pcbc => pcbc::decrypt_bytes(&self.cipher, &self.pool, self.padding, data),
            CipherMode::Cfb => cfb::decrypt_bytes(&self.cipher, &self.pool, data),
            CipherMode::Ofb => ofb::decrypt_bytes(&self.cipher, data),
            CipherMode::Ctr => ctr::decrypt_bytes(&self.cipher, &self.pool, data),
            CipherMode::RandomDelta => {
                random_delta::decrypt_bytes(&self.cipher, &self.pool, self.padding, data)
            }
        }
    }

    /// Encrypt from a reader to a writer in `chunk_size` steps; the
    /// resident working set stays bounded by the chunk size plus a few
    /// blocks of carry.
    pub fn encrypt_stream<R: Read, W: Write>(
        &self,
        src: &mut R,
        dst: &mut W,
        chunk_size: usize,
    ) -> Result<(), CipherError> {
        match self.mode {
            CipherMode::Ecb => {
                ecb::encrypt_stream(&self.cipher, &self.pool, self.padding, src, dst, chunk_size)
            }
            CipherMode::Cbc => cbc::encrypt_stream(
                &self.cipher,
                self.padding,
                &self.next_iv(),
                src,
                dst,
                chunk_size,
            ),
            CipherMode::Pcbc => pcbc::encrypt_stream(
                &self.cipher,
                self.padding,
                &self.next_iv(),
                src,
                dst,
                chunk_size,
            ),
            CipherMode::Cfb => {
                cfb::encrypt_stream(&self.cipher, &self.next_iv(), src, dst, chunk_size)
            }
            CipherMode::Ofb => {
                ofb::encrypt_stream(&self.cipher, &self.next_iv(), src, dst, chunk_size)
            }
            CipherMode::Ctr => ctr::encrypt_stream(
                &self.cipher,
                &self.pool,
                &self.next_iv(),
                src,
                dst,
                chunk_size,
            ),
            CipherMode::RandomDelta => {
                random_delta::encrypt_stream(&self.cipher, self.padding, src, dst, chunk_size)
            }
        }
    }

    /// Streaming counterpart of [`decrypt_bytes`](Self::decrypt_bytes).
    pub fn decrypt_stream<R: Read, W: Write>(
        &self,
        src: &mut R,
        dst: &mut W,
        chunk_size: usize,
    ) -> Result<(), CipherError> {
        match self.mode {
            CipherMode::Ecb => {
                ecb::decrypt_stream(&self.cipher, &self.pool, self.padding, src, dst, chunk_size)
            }
            CipherMode::Cbc => {
                cbc::decrypt_stream(&self.cipher, &self.pool, self.padding, src, dst, chunk_size)
            }
            CipherMode::Pcbc => {
                pcbc::decrypt_stream(&self.cipher, &self.pool, self.padding, src, dst, chunk_size)
            }
            CipherMode::Cfb => cfb::decrypt_stream(&self.cipher, &self.pool, src, dst, chunk_size),
            CipherMode::Ofb => ofb::decrypt_stream(&self.cipher, src, dst, chunk_size),
            CipherMode::Ctr => ctr::decrypt_stream(&self.cipher, &self.pool, src, dst, chunk_size),
            CipherMode::RandomDelta => random_delta::decrypt_stream(
                &self.cipher,
                &self.pool,
                self.padding,
                src,
                dst,
                chunk_size,
            ),
        }
    }

    /// Encrypt `src` into `dst` with the default 1 MiB chunk size.
    pub fn encrypt_file(
        &self,
        src: impl AsRef<Path>,
        dst: impl AsRef<Path>,
    ) -> Result<(), CipherError> {
        self.encrypt_file_chunked(src, dst, DEFAULT_CHUNK_SIZE)
    }

    pub fn encrypt_file_chunked(
        &self,
        src: impl AsRef<Path>,
        dst: impl AsRef<Path>,
        chunk_size: usize,
    ) -> Result<(), CipherError> {
        let mut reader = BufReader::new(File::open(src.as_ref())?);
        let mut writer = BufWriter::new(File::create(dst.as_ref())?);
        self.encrypt_stream(&mut reader, &mut writer, chunk_size)?;
        writer.flush()?;
        debug!(src = %src.as_ref().display(), dst = %dst.as_ref().display(), "file encrypted");
        Ok(())
    }

    /// Decrypt `src` into `dst` with the default 1 MiB chunk size.
    ///
    /// On error the partial output is left behind; callers are expected to
    /// discard it.
    pub fn decrypt_file(
        &self,
        src: impl AsRef<Path>,
        dst: impl AsRef<Path>,
    ) -> Result<(), CipherError> {
        self.decrypt_file_chunked(src, dst, DEFAULT_CHUNK_SIZE)
    }

    pub fn decrypt_file_chunked(
        &self,
        src: impl AsRef<Path>,
        dst: impl AsRef<Path>,
        chunk_size: usize,
    ) -> Result<(), CipherError> {
        let mut reader = BufReader::new(File::open(src.as_ref())?);
        let mut writer = BufWriter::new(File::create(dst.as_ref())?);
        self.decrypt_stream(&mut reader, &mut writer, chunk_size)?;
        writer.flush()?;
        debug!(src = %src.as_ref().display(), dst = %dst.as_ref().display(), "file decrypted");
        Ok(())
    }
}
