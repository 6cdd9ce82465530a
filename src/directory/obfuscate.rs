//! ROT47 substitution used in place of password hashing.
//!
//! The printable range `'!'..='~'` holds 94 symbols and every symbol is
//! shifted by 47, half of the range, so applying the map twice yields the
//! input again. This is obfuscation, not cryptography.

const FIRST: u8 = b'!';
const RANGE: u8 = 94;
const SHIFT: u8 = 47;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ObfuscateError {
    #[error("character {character:?} at position {position} is outside the printable ASCII range")]
    OutOfRange { character: char, position: usize },
}

/// Rotate a single printable ASCII character by 47 places.
#[must_use]
pub const fn rot47(c: u8) -> Option<u8> {
    if c < FIRST || c >= FIRST + RANGE {
        return None;
    }
    Some(FIRST + (c - FIRST + SHIFT) % RANGE)
}

/// Obfuscate `input` character by character.
///
/// # Errors
/// Returns [`ObfuscateError::OutOfRange`] for the first character that is not
/// in `'!'..='~'` (space, control characters and non-ASCII included).
pub fn obfuscate(input: &str) -> Result<String, ObfuscateError> {
    input
        .chars()
        .enumerate()
        .map(|(position, character)| {
            u8::try_from(character)
                .ok()
                .and_then(rot47)
                .map(char::from)
                .ok_or(ObfuscateError::OutOfRange {
                    character,
                    position,
                })
        })
        .collect()
}
