use super::codec::codec;
use super::codes::{Code, Label, BLANK, IS_STAR, LETTER_MASK, NLETTERS, UNINIT};
use crate::error::Error;
use crate::tileset;
use std::convert::TryFrom;
use std::fmt;
use std::num::NonZeroU8;

/// The face of a tile: a letter `a`..`z` or a blank, optionally marked as star.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Letter(NonZeroU8);

impl Default for Letter {
    fn default() -> Self {
        Self::new(UNINIT)
    }
}

impl Letter {
    fn new(code: Code) -> Letter {
        let code = NonZeroU8::new(code).expect("code can't be 0");
        Letter(code)
    }

    /// Return a plain letter with `label` 1..26.
    /// ## Errors
    /// If `label` is not a letter.
    pub fn from_label(label: Label) -> Result<Letter, Error> {
        if !(1..=NLETTERS as u8).contains(&label) {
            return Err(Error::InvalidLetterCode(label));
        }
        Ok(Letter::new(label))
    }

    /// Return new blank
    pub fn blank() -> Letter {
        Letter::new(BLANK)
    }

    /// Return this letter marked as star.
    pub fn with_star(self) -> Letter {
        Letter::new(self.code() | IS_STAR)
    }

    /// Get the raw code.
    pub fn code(&self) -> Code {
        self.0.get()
    }

    /// Get label for letter, ignoring the star attribute. A blank has label 0.
    /// ## Example
    /// ```
    /// use std::convert::TryFrom;
    /// use wordfall_solver::Letter;
    /// let letter = Letter::try_from(65)?;
    /// assert!(letter.is_star());
    /// assert_eq!(letter.label(), 1);
    /// # Ok::<(), wordfall_solver::Error>(())
    /// ```
    pub fn label(&self) -> Label {
        self.code() & LETTER_MASK
    }

    /// Check if this is a blank tile
    pub fn is_blank(&self) -> bool {
        self.label() == 0
    }

    /// Check if this is a star tile
    pub fn is_star(&self) -> bool {
        self.code() & IS_STAR != 0
    }

    /// Check if the letter clears its row when played
    pub fn is_rare(&self) -> bool {
        tileset::is_rare(self.label())
    }

    /// Points for this letter
    pub fn value(&self) -> u32 {
        tileset::points(self.label())
    }

    /// The lowercase letter, or `.` for a blank
    pub fn to_char(&self) -> char {
        codec().decode_label(self.label())
    }
}

impl fmt::Display for Letter {
    /// Board text representation: uppercase for star tiles.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", codec().decode_code(self.code()))
    }
}

impl TryFrom<Code> for Letter {
    type Error = Error;
    fn try_from(code: Code) -> Result<Self, Self::Error> {
        match code {
            1..=26 | 65..=90 | BLANK => Ok(Self::new(code)),
            _ => Err(Self::Error::InvalidLetterCode(code)),
        }
    }
}

impl From<Letter> for Code {
    fn from(letter: Letter) -> Code {
        letter.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter() -> Result<(), Error> {
        let q = Letter::try_from(17)?;
        assert_eq!(q.to_char(), 'q');
        assert!(q.is_rare());
        assert!(!q.is_star());
        assert_eq!(q.value(), 10);
        let q_star = q.with_star();
        assert_eq!(q_star.to_string(), "Q");
        assert_eq!(q_star.value(), 10);
        assert_eq!(q_star.label(), q.label());
        Ok(())
    }

    #[test]
    fn test_blank() {
        let blank = Letter::blank();
        assert!(blank.is_blank());
        assert!(!blank.is_rare());
        assert_eq!(blank.value(), 0);
        assert_eq!(blank.to_char(), '.');
        assert!(!Letter::from_label(1).unwrap().is_blank());
    }

    #[test]
    fn test_from_label() {
        assert_eq!(Letter::from_label(26).unwrap().to_char(), 'z');
        assert!(matches!(
            Letter::from_label(0),
            Err(Error::InvalidLetterCode(0))
        ));
        assert!(matches!(
            Letter::from_label(27),
            Err(Error::InvalidLetterCode(27))
        ));
    }

    #[test]
    fn test_invalid_code() {
        assert!(Letter::try_from(0).is_err());
        assert!(Letter::try_from(27).is_err());
        assert!(Letter::try_from(64).is_err());
    }
}
