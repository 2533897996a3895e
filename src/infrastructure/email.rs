//! Email notification adapters
//!
//! `SmtpNotifier` sends through lettre's blocking SMTP transport on a
//! blocking task. `LogNotifier` stands in for it when email is disabled
//! so every other code path behaves identically in development.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::info;

use crate::config::EmailConfig;
use crate::domain::notifier::{Notifier, NotifyError, NotifyPayload, TemplateKind};

/// Timestamps in message bodies are rendered in IST (UTC+05:30); the
/// rest of the system stays in UTC.
fn ist() -> FixedOffset {
    FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap()
}

fn render_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&ist()).format("%d %b %Y, %I:%M %p IST").to_string()
}

fn subject(kind: TemplateKind, payload: &NotifyPayload) -> String {
    match kind {
        TemplateKind::BookingInitiated => {
            format!("Booking #{} confirmed", payload.booking_id)
        }
        TemplateKind::PickupOtp => format!("Pickup OTP for booking #{}", payload.booking_id),
        TemplateKind::DropOtp => format!("Drop OTP for booking #{}", payload.booking_id),
    }
}

fn body(kind: TemplateKind, payload: &NotifyPayload) -> String {
    let code = payload.otp_code.as_deref().unwrap_or("------");
    match kind {
        TemplateKind::BookingInitiated => {
            let mut text = format!(
                "Hi {},\n\nYour booking #{} is confirmed.",
                payload.first_name, payload.booking_id
            );
            if let Some(total) = payload.total_amount {
                text.push_str(&format!(" Total amount: Rs. {}.", total));
            }
            if let Some(at) = payload.scheduled_at {
                text.push_str(&format!("\nPickup scheduled for {}.", render_time(at)));
            }
            text.push_str("\n\nThe Zip Drive team");
            text
        }
        TemplateKind::PickupOtp => format!(
            "Hi {},\n\nYour pickup OTP for booking #{} is {}.\n\
             Share it at handover{}. It is valid until the scheduled pickup time.\n\n\
             The Zip Drive team",
            payload.first_name,
            payload.booking_id,
            code,
            payload
                .scheduled_at
                .map(|at| format!(" ({})", render_time(at)))
                .unwrap_or_default(),
        ),
        TemplateKind::DropOtp => format!(
            "Hi {},\n\nThe drop OTP for booking #{} is {}.\n\
             Collect it from the guest at return{}.\n\n\
             The Zip Drive team",
            payload.first_name,
            payload.booking_id,
            code,
            payload
                .scheduled_at
                .map(|at| format!(" ({})", render_time(at)))
                .unwrap_or_default(),
        ),
    }
}

pub struct SmtpNotifier {
    config: EmailConfig,
    from: Mailbox,
}

impl SmtpNotifier {
    pub fn new(config: EmailConfig) -> Result<Self, NotifyError> {
        let from: Mailbox = format!("{} <{}>", config.from_name, config.from_email)
            .parse()
            .map_err(|e| NotifyError::Dispatch(format!("invalid from address: {}", e)))?;
        Ok(Self { config, from })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(
        &self,
        recipient: &str,
        kind: TemplateKind,
        payload: &NotifyPayload,
    ) -> Result<(), NotifyError> {
        let to: Mailbox = recipient
            .parse()
            .map_err(|e| NotifyError::Dispatch(format!("invalid recipient: {}", e)))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject(kind, payload))
            .body(body(kind, payload))
            .map_err(|e| NotifyError::Dispatch(e.to_string()))?;

        let transport = SmtpTransport::starttls_relay(&self.config.smtp_host)
            .map_err(|e| NotifyError::Dispatch(e.to_string()))?
            .port(self.config.smtp_port)
            .credentials(Credentials::new(
                self.config.username.clone(),
                self.config.password.clone(),
            ))
            .build();

        // lettre's SmtpTransport is blocking; keep it off the runtime.
        let result = tokio::task::spawn_blocking(move || transport.send(&email))
            .await
            .map_err(|e| NotifyError::Dispatch(e.to_string()))?;
        result.map_err(|e| NotifyError::Dispatch(e.to_string()))?;

        info!(recipient, template = kind.as_str(), "notification email sent");
        Ok(())
    }
}

/// Logs the notification instead of delivering it.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(
        &self,
        recipient: &str,
        kind: TemplateKind,
        payload: &NotifyPayload,
    ) -> Result<(), NotifyError> {
        info!(
            recipient,
            template = kind.as_str(),
            booking_id = payload.booking_id,
            "email disabled, notification logged only"
        );
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────
