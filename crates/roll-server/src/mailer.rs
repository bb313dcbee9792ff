//! SMTP delivery of invitations using Lettre.

use lettre::{
  Address, Message, SmtpTransport, Transport,
  message::{Attachment, Mailbox, MultiPart, SinglePart, header::ContentType},
  transport::smtp::authentication::Credentials,
};
use roll_core::{
  Error, Result,
  notify::{Invitation, Mailer},
};

use crate::config::MailSettings;

/// Sends invitations through a STARTTLS relay.
///
/// The transport is blocking; callers on the async runtime run [`Mailer::send`]
/// on the blocking pool.
#[derive(Clone)]
pub struct SmtpMailer {
  transport: SmtpTransport,
  from:      Mailbox,
}

impl SmtpMailer {
  pub fn new(settings: &MailSettings) -> Result<Self> {
    let from = settings
      .from
      .parse::<Mailbox>()
      .map_err(|e| Error::Transport(format!("invalid sender address {:?}: {e}", settings.from)))?;

    let transport = SmtpTransport::starttls_relay(&settings.host)
      .map_err(|e| Error::Transport(format!("SMTP relay error: {e}")))?
      .port(settings.port)
      .credentials(Credentials::new(
        settings.username.clone(),
        settings.password.clone(),
      ))
      .timeout(Some(settings.timeout))
      .build();

    Ok(Self { transport, from })
  }

  /// Build the `multipart/mixed` message: plain-text body plus PNG attachment.
  pub fn build_message(&self, invitation: &Invitation) -> Result<Message> {
    let address = invitation
      .recipient_email
      .parse::<Address>()
      .map_err(|e| Error::Transport(format!("invalid recipient address: {e}")))?;
    let to = Mailbox::new(Some(invitation.recipient_name.clone()), address);

    let png = ContentType::parse("image/png")
      .map_err(|e| Error::Transport(format!("content type: {e}")))?;

    Message::builder()
      .from(self.from.clone())
      .to(to)
      .subject(&invitation.subject)
      .multipart(
        MultiPart::mixed()
          .singlepart(SinglePart::plain(invitation.body.clone()))
          .singlepart(
            Attachment::new(invitation.attachment_name.clone())
              .body(invitation.attachment.clone(), png),
          ),
      )
      .map_err(|e| Error::Transport(format!("failed to build email: {e}")))
  }
}

impl Mailer for SmtpMailer {
  fn send(&self, invitation: &Invitation) -> Result<()> {
    let message = self.build_message(invitation)?;
    self
      .transport
      .send(&message)
      .map_err(|e| Error::Transport(format!("{}: {e}", invitation.recipient_email)))?;
    Ok(())
  }
}
