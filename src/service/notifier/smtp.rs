use async_trait::async_trait;
use handlebars::Handlebars;
use lettre::{
	message::{Mailbox, MultiPart},
	transport::smtp::authentication::Credentials,
	AsyncSmtpTransport,
	AsyncTransport,
	Message,
	Tokio1Executor,
};
use tracing::error;

use super::{NotificationContext, Notifier};
use crate::{
	models::ErrorType,
	utils::config::{EmailChangeConfig, SmtpConfig},
};

pub(super) struct RenderedMail {
	pub subject: String,
	pub text: String,
	pub html: Option<String>,
}

/// Sends the confirmation mail over SMTP, rendering the configured
/// handlebars templates.
pub struct SmtpNotifier {
	transport: AsyncSmtpTransport<Tokio1Executor>,
	handlebar: Handlebars<'static>,
	from: Mailbox,
	html_email_enabled: bool,
}

impl SmtpNotifier {
	pub fn new(
		smtp: &SmtpConfig,
		email_change: &EmailChangeConfig,
	) -> Result<Self, ErrorType> {
		let mut handlebar = Handlebars::new();
		handlebar.set_strict_mode(true);
		handlebar.register_template_string("subject", &email_change.subject_template)?;
		handlebar.register_template_string("text", &email_change.text_template)?;
		handlebar.register_template_string("html", &email_change.html_template)?;

		let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)?
			.credentials(Credentials::new(
				smtp.username.clone(),
				smtp.password.clone(),
			))
			.port(smtp.port)
			.build();

		Ok(Self {
			transport,
			handlebar,
			from: email_change.from_address.parse()?,
			html_email_enabled: email_change.html_email_enabled,
		})
	}

	pub(super) fn render(
		&self,
		context: &NotificationContext,
	) -> Result<RenderedMail, ErrorType> {
		// Mail subjects must not contain newlines
		let subject = self
			.handlebar
			.render("subject", context)?
			.lines()
			.collect::<String>();
		let text = self.handlebar.render("text", context)?;
		let html = if self.html_email_enabled {
			Some(self.handlebar.render("html", context)?)
		} else {
			None
		};
		Ok(RenderedMail {
			subject,
			text,
			html,
		})
	}
}

#[async_trait]
impl Notifier for SmtpNotifier {
	async fn notify(
		&self,
		new_email: &str,
		context: &NotificationContext,
	) -> Result<(), ErrorType> {
		let rendered = self.render(context)?;

		let builder = Message::builder()
			.from(self.from.clone())
			.to(new_email.parse()?)
			.subject(rendered.subject);
		let message = if let Some(html) = rendered.html {
			builder.multipart(MultiPart::alternative_plain_html(rendered.text, html))?
		} else {
			builder.body(rendered.text)?
		};

		self.transport.send(message).await.map_err(|err| {
			error!("Failed to send confirmation mail to `{new_email}`: {err}");
			ErrorType::NotificationFailed
		})?;

		Ok(())
	}
}
