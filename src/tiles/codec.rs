use super::codes::{Code, Label, BLANK, EMPTY, IS_STAR, LETTER_MASK, NLETTERS};
use crate::error::Error;
use lazy_static::lazy_static;
use std::collections::HashMap;

const NCODE: usize = 128;

const ASCII_LC: &str = "abcdefghijklmnopqrstuvwxyz";

lazy_static! {
    static ref DEFAULT_CODEC: Codec = Codec::new();
}

/// Return the shared default codec.
pub(crate) fn codec() -> &'static Codec {
    &DEFAULT_CODEC
}

#[derive(Debug, Clone)]
struct CodeSet {
    encoder: HashMap<char, Code>,
    decoder: Vec<Option<char>>,
}

impl CodeSet {
    fn new() -> CodeSet {
        let mut encoder = HashMap::new();

        for (i, ch) in ASCII_LC.chars().enumerate() {
            let uc = ch.to_ascii_uppercase();
            encoder.insert(ch, i as u8 + 1);
            encoder.insert(uc, (i as u8 + 1) | IS_STAR);
        }
        encoder.insert('.', BLANK);
        encoder.insert(' ', EMPTY);

        let mut decoder = vec![None; NCODE];
        for (&k, &v) in &encoder {
            decoder[v as usize] = Some(k);
        }
        CodeSet { encoder, decoder }
    }
}

#[derive(Debug, Clone)]
/// Translate from board text to codes and vice versa.
/// Each square of the board text is translated to a code.
/// - 0: No tile (empty square, `' '`)
/// - 1 .. 26: `a` .. `z`
/// - 32: Blank tile `.` (a tile without a letter)
/// - 65 .. 90: `A` .. `Z` (star tile with letter `a`..`z`)
///
pub struct Codec {
    codeset: CodeSet,
}

impl Default for Codec {
    fn default() -> Codec {
        Codec::new()
    }
}

impl Codec {
    /// Return a new `Codec` for "a".."z", "A".."Z", "." and " ".
    pub fn new() -> Codec {
        Codec {
            codeset: CodeSet::new(),
        }
    }

    /// Encode a row of board text, and return a list of `u8` codes.
    /// ## Errors
    /// An error is returned if the string can not be encoded with the codec.
    /// ## Examples
    /// ```
    /// use wordfall_solver::{Codec, Error};
    /// let codec = Codec::new();
    /// let codes = codec.encode("azAZ. ")?;
    /// assert_eq!(codes, vec![1, 26, 65, 90, 32, 0]);
    /// # Ok::<(), Error>(())
    /// ```
    pub fn encode(&self, row: &str) -> Result<Vec<Code>, Error> {
        row.chars()
            .map(|ch| {
                self.codeset
                    .encoder
                    .get(&ch)
                    .copied()
                    .ok_or_else(|| Error::EncodeInvalidToken(String::from(ch)))
            })
            .collect()
    }

    /// Encode a dictionary word to letter labels. Only `a`..`z` are accepted.
    /// ## Errors
    /// If the word is empty or contains anything but lowercase ascii letters.
    pub fn encode_word(&self, word: &str) -> Result<Vec<Label>, Error> {
        if word.is_empty() {
            return Err(Error::InvalidWord(String::from(word)));
        }
        word.chars()
            .map(|ch| match self.codeset.encoder.get(&ch) {
                Some(&code) if (1..=NLETTERS as u8).contains(&code) => Ok(code),
                _ => Err(Error::InvalidWord(String::from(word))),
            })
            .collect()
    }

    /// Decode codes to a string. Unknown codes decode to `'?'`.
    /// ## Examples
    /// ```
    /// use wordfall_solver::Codec;
    /// let codec = Codec::new();
    /// assert_eq!(codec.decode(&[1, 26, 65, 90, 32, 0]), "azAZ. ");
    /// ```
    pub fn decode(&self, codes: &[Code]) -> String {
        codes.iter().map(|&code| self.decode_code(code)).collect()
    }

    /// Decode a single code.
    pub fn decode_code(&self, code: Code) -> char {
        self.codeset
            .decoder
            .get(code as usize)
            .copied()
            .flatten()
            .unwrap_or('?')
    }

    /// Decode a letter label (the star flag is ignored).
    pub fn decode_label(&self, label: Label) -> char {
        match label & LETTER_MASK {
            0 => self.decode_code(BLANK),
            l => self.decode_code(l),
        }
    }
}
