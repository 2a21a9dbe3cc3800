use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(version, about = "Encrypt and decrypt files with classic symmetric ciphers", long_about = None)]
pub struct Opts {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encrypt a file
    Encrypt(JobArgs),
    /// Decrypt a file
    Decrypt(JobArgs),
}

#[derive(Args, Debug)]
pub struct JobArgs {
    /// Cipher primitive
    #[arg(short, long, value_enum)]
    pub cipher: CipherChoice,

    /// Hex-encoded key. Its length selects the variant where the cipher
    /// allows several (DEAL 128/192/256, AES 128/192/256, 3DES 2/3-key).
    #[arg(short, long)]
    pub key: String,

    /// Mode of operation (ignored for rc4)
    #[arg(short, long, default_value = "cbc")]
    pub mode: String,

    /// Padding scheme (only consulted by the padded modes)
    #[arg(short, long, default_value = "pkcs7")]
    pub padding: String,

    /// Hex-encoded IV or CTR nonce; drawn from the system RNG if omitted
    #[arg(long)]
    pub iv: Option<String>,

    /// Worker threads (default: twice the available parallelism)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Input path
    pub input: PathBuf,

    /// Output path
    pub output: PathBuf,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum CipherChoice {
    Des,
    #[value(name = "3des-ede")]
    TdesEde,
    #[value(name = "3des-eee")]
    TdesEee,
    Deal,
    Aes,
    Rc4,
}
