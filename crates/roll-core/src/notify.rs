//! Outgoing invitation mail and the transport contract.

use crate::{Result, participant::Participant};

/// Used when the organiser does not supply a message.
pub const DEFAULT_MESSAGE: &str = "Please find your QR code for event attendance.";

pub const INVITATION_SUBJECT: &str = "Your QR Code for Event Attendance";

pub const ATTACHMENT_NAME: &str = "qr_code.png";

/// A composed message for one participant, attachment included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invitation {
  pub recipient_name:  String,
  pub recipient_email: String,
  pub subject:         String,
  pub body:            String,
  pub attachment_name: String,
  /// PNG bytes of the participant's code.
  pub attachment:      Vec<u8>,
}

impl Invitation {
  pub fn compose(participant: &Participant, message: &str, attachment: Vec<u8>) -> Self {
    let body = format!(
      "Dear {name},\n\n\
       {message}\n\n\
       Please find your QR code attached. Show this QR code at the event for \
       attendance marking.\n\n\
       Best regards,\n\
       Event Team\n",
      name = participant.name,
      message = message.trim(),
    );

    Self {
      recipient_name: participant.name.clone(),
      recipient_email: participant.email.clone(),
      subject: INVITATION_SUBJECT.to_owned(),
      body,
      attachment_name: ATTACHMENT_NAME.to_owned(),
      attachment,
    }
  }
}

/// Delivers invitations. Synchronous and object safe.
///
/// A failure concerns one recipient only; batch callers log it and move on.
pub trait Mailer: Send + Sync {
  fn send(&self, invitation: &Invitation) -> Result<()>;
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;
  use crate::participant::ParticipantId;

  fn participant() -> Participant {
    Participant {
      participant_id: ParticipantId(3),
      name:           "Grace Hopper".into(),
      email:          "grace@example.com".into(),
      code_path:      Some("codes/qr_3_deadbeef.png".into()),
      notified:       false,
      created_at:     Utc::now(),
    }
  }

  #[test]
  fn compose_addresses_the_participant() {
    let inv = Invitation::compose(&participant(), "  See you Friday.  ", vec![1, 2, 3]);
    assert_eq!(inv.recipient_email, "grace@example.com");
    assert_eq!(inv.subject, INVITATION_SUBJECT);
    assert!(inv.body.starts_with("Dear Grace Hopper,"));
    assert!(inv.body.contains("\n\nSee you Friday.\n\n"));
    assert!(inv.body.contains("Show this QR code at the event"));
    assert_eq!(inv.attachment_name, "qr_code.png");
    assert_eq!(inv.attachment, vec![1, 2, 3]);
  }
}
