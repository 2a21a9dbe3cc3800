use crate::{CipherError, Rc4};

macro_rules! rc4_stream_vectors {
    ($( $fn_name:ident: ( $key:expr , $plain:expr , $exp_cipher:expr ) ),*$(,)?) => {
        $(
            #[test]
            fn $fn_name() -> Result<(), CipherError> {
                let mut rc4 = Rc4::new($key)?;
                let cipher = rc4.encrypt($plain);
                assert_eq!($exp_cipher, hex::encode(&cipher));

                let mut rc4 = Rc4::new($key)?;
                assert_eq!(rc4.decrypt(&cipher), $plain);

                Ok(())
            }
        )*
    };
}

// Classic published keystream vectors.
rc4_stream_vectors! {
    rc4_vector_key_plaintext: (b"Key", b"Plaintext", "bbf316e8d940af0ad3"),
    rc4_vector_wiki_pedia: (b"Wiki", b"pedia", "1021bf0420"),
    rc4_vector_secret_dawn: (
        b"Secret",
        b"Attack at dawn",
        "45a01f645fc35b383552544b9bf5"
    ),
}

#[test]
fn keystream_advances_between_calls() -> Result<(), CipherError> {
    // Two calls must continue the keystream, not restart it.
    let mut whole = Rc4::new(b"Key")?;
    let expected = whole.crypt(b"Plaintext");

    let mut split = Rc4::new(b"Key")?;
    let mut out = split.crypt(b"Plain");
    out.extend_from_slice(&split.crypt(b"text"));
    assert_eq!(out, expected);

    Ok(())
}

#[test]
fn key_length_bounds() {
    assert!(matches!(
        Rc4::new(&[]),
        Err(CipherError::InvalidKeySize { got: 0, .. })
    ));
    assert!(matches!(
        Rc4::new(&[0u8; 257]),
        Err(CipherError::InvalidKeySize { got: 257, .. })
    ));
    assert!(Rc4::new(&[0x7F]).is_ok());
    assert!(Rc4::new(&[0x7F; 256]).is_ok());
}
