use std::fs;

use anyhow::{Context, Result};
use cipherbox::{
    BlockCipher, CipherMode, Deal, Des, Padding, Rc4, Rijndael, SymmetricContext, TdesVariant,
    TripleDes,
};
use clap::Parser;

use crate::opts::{CipherChoice, Command, JobArgs, Opts};

mod opts;

#[derive(Clone, Copy)]
enum Direction {
    Encrypt,
    Decrypt,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let opts = Opts::parse();
    match opts.command {
        Command::Encrypt(args) => run(args, Direction::Encrypt),
        Command::Decrypt(args) => run(args, Direction::Decrypt),
    }
}

fn run(args: JobArgs, direction: Direction) -> Result<()> {
    let key = hex::decode(&args.key).context("key must be a hex string")?;

    // RC4 is a stream cipher with its own sequential path; modes, padding
    // and the worker pool do not apply.
    if matches!(args.cipher, CipherChoice::Rc4) {
        return run_rc4(&key, &args);
    }

    let mode: CipherMode = args.mode.parse()?;
    let padding: Padding = args.padding.parse()?;
    let iv = args
        .iv
        .as_deref()
        .map(hex::decode)
        .transpose()
        .context("IV must be a hex string")?;

    match args.cipher {
        CipherChoice::Des => run_block(Des::new(), &key, mode, padding, iv, &args, direction),
        CipherChoice::TdesEde => run_block(
            TripleDes::new(TdesVariant::Ede),
            &key,
            mode,
            padding,
            iv,
            &args,
            direction,
        ),
        CipherChoice::TdesEee => run_block(
            TripleDes::new(TdesVariant::Eee),
            &key,
            mode,
            padding,
            iv,
            &args,
            direction,
        ),
        CipherChoice::Deal => run_block(
            Deal::new(key.len() * 8)?,
            &key,
            mode,
            padding,
            iv,
            &args,
            direction,
        ),
        CipherChoice::Aes => run_block(
            Rijndael::aes(key.len())?,
            &key,
            mode,
            padding,
            iv,
            &args,
            direction,
        ),
        CipherChoice::Rc4 => unreachable!("handled above"),
    }
}

fn run_block<C: BlockCipher>(
    cipher: C,
    key: &[u8],
    mode: CipherMode,
    padding: Padding,
    iv: Option<Vec<u8>>,
    args: &JobArgs,
    direction: Direction,
) -> Result<()> {
    let context = SymmetricContext::new(cipher, key, mode, padding, iv, args.workers)?;
    match direction {
        Direction::Encrypt => context
            .encrypt_file(&args.input, &args.output)
            .with_context(|| format!("encrypting {}", args.input.display()))?,
        Direction::Decrypt => context
            .decrypt_file(&args.input, &args.output)
            .with_context(|| format!("decrypting {}", args.input.display()))?,
    }
    println!("{} -> {}", args.input.display(), args.output.display());
    Ok(())
}

fn run_rc4(key: &[u8], args: &JobArgs) -> Result<()> {
    let data = fs::read(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let mut rc4 = Rc4::new(key)?;
    fs::write(&args.output, rc4.crypt(&data))
        .with_context(|| format!("writing {}", args.output.display()))?;
    println!("{} -> {}", args.input.display(), args.output.display());
    Ok(())
}
