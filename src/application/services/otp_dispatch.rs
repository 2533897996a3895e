//! OTP dispatch background task
//!
//! Periodic sweep over bookings entering their pickup or drop lead
//! window. Each pass is independent per booking: one failure is logged
//! and the sweep moves on, and the issuance idempotence in
//! [`OtpService::issue`] keeps repeated ticks from re-sending codes.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::otp::OtpService;
use crate::domain::booking::DueBooking;
use crate::domain::directory::Directory;
use crate::domain::notifier::{Notifier, NotifyPayload, TemplateKind};
use crate::domain::otp::OtpType;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::{DomainError, DomainResult};
use crate::shared::ShutdownSignal;

pub struct OtpDispatcher {
    repos: Arc<dyn RepositoryProvider>,
    otps: Arc<OtpService>,
    directory: Arc<dyn Directory>,
    notifier: Arc<dyn Notifier>,
    interval_secs: u64,
    lead_window_mins: i64,
}

impl OtpDispatcher {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        otps: Arc<OtpService>,
        directory: Arc<dyn Directory>,
        notifier: Arc<dyn Notifier>,
        interval_secs: u64,
        lead_window_mins: i64,
    ) -> Self {
        Self {
            repos,
            otps,
            directory,
            notifier,
            interval_secs,
            lead_window_mins,
        }
    }

    /// Spawn the sweep loop; it stops at the next tick after shutdown.
    pub fn start(self: Arc<Self>, shutdown: ShutdownSignal) {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(StdDuration::from_secs(self.interval_secs));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            info!(
                interval_secs = self.interval_secs,
                lead_window_mins = self.lead_window_mins,
                "otp dispatcher started"
            );
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let now = Utc::now();
                        self.run_pickup_pass(now).await;
                        self.run_drop_pass(now).await;
                    }
                    _ = shutdown.wait() => {
                        info!("otp dispatcher stopping");
                        break;
                    }
                }
            }
        });
    }

    /// Pickup sweep: CONFIRMED bookings whose start falls within the
    /// lead window get a pickup code, mailed to guest and host.
    pub async fn run_pickup_pass(&self, now: DateTime<Utc>) {
        let until = now + Duration::minutes(self.lead_window_mins);
        let due = match self.repos.bookings().find_due_for_pickup(now, until).await {
            Ok(due) => due,
            Err(e) => {
                warn!(error = %e, "pickup due query failed");
                return;
            }
        };
        debug!(count = due.len(), "pickup pass");
        for entry in due {
            if let Err(e) = self.dispatch(&entry, OtpType::Pickup).await {
                warn!(booking_id = entry.booking.id, error = %e, "pickup otp dispatch failed");
            }
        }
    }

    /// Drop sweep: ACTIVE bookings nearing their end time. The code is
    /// what the guest hands over, so it is mailed to the host only.
    pub async fn run_drop_pass(&self, now: DateTime<Utc>) {
        let until = now + Duration::minutes(self.lead_window_mins);
        let due = match self.repos.bookings().find_due_for_drop(now, until).await {
            Ok(due) => due,
            Err(e) => {
                warn!(error = %e, "drop due query failed");
                return;
            }
        };
        debug!(count = due.len(), "drop pass");
        for entry in due {
            if let Err(e) = self.dispatch(&entry, OtpType::Drop).await {
                warn!(booking_id = entry.booking.id, error = %e, "drop otp dispatch failed");
            }
        }
    }

    async fn dispatch(&self, entry: &DueBooking, otp_type: OtpType) -> DomainResult<()> {
        let Some(code) = self.otps.issue(&entry.booking, otp_type).await? else {
            // Already issued on an earlier tick (or unissuable).
            return Ok(());
        };

        let guest = self.lookup_user(entry.booking.guest_id).await?;
        let car = self
            .directory
            .get_car(entry.booking.car_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "car",
                field: "id",
                value: entry.booking.car_id.to_string(),
            })?;
        let host = self.lookup_user(car.host_id).await?;

        let payload = NotifyPayload {
            first_name: guest.first_name.clone(),
            booking_id: entry.booking.id,
            otp_code: Some(code),
            scheduled_at: Some(entry.scheduled_at),
            total_amount: None,
        };
        match otp_type {
            OtpType::Pickup => {
                self.send(&guest.email, TemplateKind::PickupOtp, &payload).await;
                let payload = NotifyPayload {
                    first_name: host.first_name.clone(),
                    ..payload
                };
                self.send(&host.email, TemplateKind::PickupOtp, &payload).await;
            }
            OtpType::Drop => {
                let payload = NotifyPayload {
                    first_name: host.first_name.clone(),
                    ..payload
                };
                self.send(&host.email, TemplateKind::DropOtp, &payload).await;
            }
        }
        info!(
            booking_id = entry.booking.id,
            otp_type = otp_type.as_str(),
            "otp issued and dispatched"
        );
        Ok(())
    }

    async fn send(&self, recipient: &str, kind: TemplateKind, payload: &NotifyPayload) {
        if let Err(e) = self.notifier.notify(recipient, kind, payload).await {
            warn!(
                booking_id = payload.booking_id,
                error = %e,
                "otp notification dispatch failed"
            );
        }
    }

    async fn lookup_user(&self, id: i32) -> DomainResult<crate::domain::directory::UserRef> {
        self.directory
            .get_user(id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "user",
                field: "id",
                value: id.to_string(),
            })
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::domain::booking::{
        Booking, BookingRepository, BookingStatus, NewSelfDriveBooking, PricingQuote, TimeWindow,
    };
    use crate::domain::notifier::NotifyError;
    use crate::domain::otp::OtpVerifier;
    use crate::infrastructure::database::repositories::{
        SeaOrmDirectory, SeaOrmRepositoryProvider,
    };
    use crate::infrastructure::database::test_support::{seed_car, seed_user, test_db};

    #[derive(Default)]
    struct RecordingNotifier {
        sent: std::sync::Mutex<Vec<(String, TemplateKind)>>,
    }

    impl RecordingNotifier {
        fn drain(&self) -> Vec<(String, TemplateKind)> {
            std::mem::take(&mut self.sent.lock().unwrap())
        }
    }

    #[async_trait::async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(
            &self,
            recipient: &str,
            kind: TemplateKind,
            _payload: &NotifyPayload,
        ) -> Result<(), NotifyError> {
            self.sent.lock().unwrap().push((recipient.to_string(), kind));
            Ok(())
        }
    }

    struct Fixture {
        dispatcher: OtpDispatcher,
        otps: Arc<OtpService>,
        notifier: Arc<RecordingNotifier>,
        booking: Booking,
        start: DateTime<Utc>,
    }

    async fn setup(start_offset_mins: i64) -> Fixture {
        let db = test_db().await;
        let host = seed_user(&db, "host@zipdrive.in", "HOST").await;
        let guest = seed_user(&db, "guest@zipdrive.in", "GUEST").await;
        let car = seed_car(&db, host, 100).await;

        let start = Utc::now() + Duration::minutes(start_offset_mins);
        let window = TimeWindow::new(start, start + Duration::hours(4)).unwrap();
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let (booking, _) = repos
            .bookings()
            .create_self_drive(NewSelfDriveBooking {
                guest_id: guest,
                car_id: car,
                window,
                pickup_address: "MG Road".into(),
                pickup_lat: 12.97,
                pickup_long: 77.60,
                drop_address: "MG Road".into(),
                drop_lat: 12.97,
                drop_long: 77.60,
                pricing: PricingQuote::compute(100, &window, 0, 0, 0, 0.18),
            })
            .await
            .unwrap();

        let directory: Arc<dyn Directory> = Arc::new(SeaOrmDirectory::new(db));
        let notifier = Arc::new(RecordingNotifier::default());
        let otps = Arc::new(OtpService::new(
            repos.clone(),
            directory.clone(),
            notifier.clone(),
        ));
        let dispatcher = OtpDispatcher::new(
            repos,
            otps.clone(),
            directory,
            notifier.clone(),
            60,
            30,
        );
        Fixture {
            dispatcher,
            otps,
            notifier,
            booking,
            start,
        }
    }

    #[tokio::test]
    async fn pickup_pass_mails_guest_and_host_exactly_once() {
        let fx = setup(20).await;
        let now = Utc::now();

        fx.dispatcher.run_pickup_pass(now).await;
        let sent = fx.notifier.drain();
        assert_eq!(sent.len(), 2);
        assert!(sent.iter().all(|(_, k)| *k == TemplateKind::PickupOtp));
        let recipients: Vec<&str> = sent.iter().map(|(r, _)| r.as_str()).collect();
        assert!(recipients.contains(&"guest@zipdrive.in"));
        assert!(recipients.contains(&"host@zipdrive.in"));

        // Second tick: code still valid, nothing goes out.
        fx.dispatcher.run_pickup_pass(now).await;
        assert!(fx.notifier.drain().is_empty());
    }

    #[tokio::test]
    async fn bookings_outside_the_lead_window_are_left_alone() {
        let fx = setup(90).await;
        fx.dispatcher.run_pickup_pass(Utc::now()).await;
        assert!(fx.notifier.drain().is_empty());
    }

    #[tokio::test]
    async fn drop_pass_targets_the_host_only() {
        // Window started in the past so the booking can go active and
        // its end falls inside a wide lead window.
        let fx = setup(5).await;

        // Walk the booking to ACTIVE through the pickup code.
        let code = fx
            .otps
            .issue(&fx.booking, OtpType::Pickup)
            .await
            .unwrap()
            .unwrap();
        fx.otps
            .verify(fx.booking.id, OtpType::Pickup, &code, OtpVerifier::Guest)
            .await
            .unwrap();
        fx.notifier.drain();

        // No drop due yet with the default 30-minute window.
        fx.dispatcher.run_drop_pass(Utc::now()).await;
        assert!(fx.notifier.drain().is_empty());

        // Sweep a window that reaches the scheduled end.
        let near_end = fx.start + Duration::hours(4) - Duration::minutes(10);
        fx.dispatcher.run_drop_pass(near_end).await;
        let sent = fx.notifier.drain();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0], ("host@zipdrive.in".to_string(), TemplateKind::DropOtp));

        // And it stays quiet on the next tick.
        fx.dispatcher.run_drop_pass(near_end).await;
        assert!(fx.notifier.drain().is_empty());

        let row = fx
            .dispatcher
            .repos
            .bookings()
            .find_by_id(fx.booking.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.status, BookingStatus::Active);
    }
}
