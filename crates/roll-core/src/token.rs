//! The token carried inside every scannable code.
//!
//! Wire format: ASCII `PARTICIPANT_ID:<decimal id>`. This is the only
//! protocol shared between the provisioner and the scanner, so both sides go
//! through [`encode`] and [`decode`].

use crate::{Error, Result, participant::ParticipantId};

pub const TOKEN_PREFIX: &str = "PARTICIPANT_ID:";

/// Render the token for `id`.
pub fn encode(id: ParticipantId) -> String { format!("{TOKEN_PREFIX}{id}") }

/// Parse a scanned token back into a participant identity.
///
/// Trailing whitespace (a scanner's line ending) is ignored. The prefix must
/// match from the first byte and the remainder must be a positive decimal
/// integer with no sign.
pub fn decode(raw: &str) -> Result<ParticipantId> {
  let digits = raw
    .trim_end()
    .strip_prefix(TOKEN_PREFIX)
    .ok_or_else(|| Error::InvalidToken("Invalid QR code format".into()))?;

  if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
    return Err(Error::InvalidToken(format!(
      "participant id {digits:?} is not a decimal number"
    )));
  }

  match digits.parse::<i64>() {
    Ok(id) if id > 0 => Ok(ParticipantId(id)),
    _ => Err(Error::InvalidToken(format!(
      "participant id {digits:?} is out of range"
    ))),
  }
}
