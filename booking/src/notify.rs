//! Notification dispatch.
//!
//! On a confirmed booking, two independent delivery attempts go out
//! concurrently: the customer confirmation and the business alert. Both
//! settle before the aggregated outcome is produced; neither failure
//! cancels or retries the other. Each attempt is checked against the
//! send-rate window first, and a missing customer email short-circuits
//! only the customer-side send.

use crate::config::{BusinessConfig, EmailConfig};
use crate::duration::format_minutes;
use crate::rate_limit::SendWindow;
use crate::types::BookingDraft;
use async_trait::async_trait;
use booking_flow_core::environment::Clock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Failure from the delivery provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider rejected the request
    #[error("provider rejected the request: {0}")]
    Rejected(String),

    /// The request never reached the provider
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Result of one delivery attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryOutcome {
    /// Whether the message was handed to the provider
    pub success: bool,
    /// Human-readable detail
    pub message: String,
}

impl DeliveryOutcome {
    fn delivered(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Aggregated outcome of the two-channel fan-out.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchOutcome {
    /// Customer confirmation attempt
    pub customer: DeliveryOutcome,
    /// Business alert attempt
    pub admin: DeliveryOutcome,
}

impl DispatchOutcome {
    /// Whether no channel got through at all.
    #[must_use]
    pub const fn all_failed(&self) -> bool {
        !self.customer.success && !self.admin.success
    }
}

/// An external email-delivery provider: one templated send at a time,
/// keyed by service and template identifiers with a flat parameter map.
#[async_trait]
pub trait NotificationProvider: Send + Sync {
    /// Delivers one templated message.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the provider rejects the request or
    /// cannot be reached.
    async fn deliver(
        &self,
        service_id: &str,
        template_id: &str,
        params: HashMap<String, String>,
    ) -> Result<(), ProviderError>;
}

/// HTTP provider speaking the `EmailJS` REST shape.
pub struct EmailJsProvider {
    http: reqwest::Client,
    api_url: String,
    public_key: String,
}

impl EmailJsProvider {
    /// Creates a provider against `api_url` authenticated by `public_key`.
    #[must_use]
    pub fn new(api_url: impl Into<String>, public_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.into(),
            public_key: public_key.into(),
        }
    }
}

#[async_trait]
impl NotificationProvider for EmailJsProvider {
    async fn deliver(
        &self,
        service_id: &str,
        template_id: &str,
        params: HashMap<String, String>,
    ) -> Result<(), ProviderError> {
        let body = serde_json::json!({
            "service_id": service_id,
            "template_id": template_id,
            "user_id": self.public_key,
            "template_params": params,
        });

        let response = self
            .http
            .post(&self.api_url)
            .json(&body)
            .send()
            .await
            .map_err(|error| ProviderError::Transport(error.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let detail = response.text().await.unwrap_or_default();
            Err(ProviderError::Rejected(format!("{status}: {detail}")))
        }
    }
}

/// Provider that logs instead of delivering. Used by the demo binary when
/// no real provider is configured.
#[derive(Debug, Default)]
pub struct ConsoleProvider;

#[async_trait]
impl NotificationProvider for ConsoleProvider {
    async fn deliver(
        &self,
        service_id: &str,
        template_id: &str,
        params: HashMap<String, String>,
    ) -> Result<(), ProviderError> {
        tracing::info!(service_id, template_id, ?params, "console delivery");
        Ok(())
    }
}

/// Fans a finished booking out to the two notification channels.
pub struct NotificationDispatcher {
    provider: Arc<dyn NotificationProvider>,
    send_window: SendWindow,
    clock: Arc<dyn Clock>,
    email: EmailConfig,
    business: BusinessConfig,
}

impl NotificationDispatcher {
    /// Creates a dispatcher.
    #[must_use]
    pub fn new(
        provider: Arc<dyn NotificationProvider>,
        send_window: SendWindow,
        clock: Arc<dyn Clock>,
        email: EmailConfig,
        business: BusinessConfig,
    ) -> Self {
        Self {
            provider,
            send_window,
            clock,
            email,
            business,
        }
    }

    /// Runs both delivery attempts concurrently and reports each outcome.
    ///
    /// All-settle semantics: both attempts complete, in either order,
    /// before the aggregate is returned.
    pub async fn dispatch(&self, draft: &BookingDraft) -> DispatchOutcome {
        let (customer, admin) = tokio::join!(
            self.send_customer_confirmation(draft),
            self.send_admin_alert(draft),
        );

        tracing::info!(
            customer_ok = customer.success,
            admin_ok = admin.success,
            "notification fan-out settled"
        );
        DispatchOutcome { customer, admin }
    }

    /// Sends the customer confirmation email.
    pub async fn send_customer_confirmation(&self, draft: &BookingDraft) -> DeliveryOutcome {
        if !self.send_window.can_send(self.clock.now()) {
            return DeliveryOutcome::failed("Too many requests. Please wait before trying again.");
        }

        if draft.contact.email.trim().is_empty() {
            return DeliveryOutcome::failed("No email address provided");
        }

        let (Some(service_id), Some(template_id)) =
            (&self.email.service_id, &self.email.customer_template_id)
        else {
            tracing::warn!("email provider not configured, skipping customer confirmation");
            return DeliveryOutcome::failed("Email service not configured");
        };

        let params = self.customer_params(draft);
        match self.provider.deliver(service_id, template_id, params).await {
            Ok(()) => {
                self.send_window.record_send(self.clock.now());
                DeliveryOutcome::delivered("Confirmation email sent successfully")
            }
            Err(error) => {
                tracing::error!(%error, "failed to send customer confirmation");
                DeliveryOutcome::failed("Failed to send confirmation email")
            }
        }
    }

    /// Sends the business alert email.
    pub async fn send_admin_alert(&self, draft: &BookingDraft) -> DeliveryOutcome {
        if !self.send_window.can_send(self.clock.now()) {
            return DeliveryOutcome::failed("Too many requests. Please wait before trying again.");
        }

        let (Some(service_id), Some(template_id)) =
            (&self.email.service_id, &self.email.admin_template_id)
        else {
            tracing::warn!("admin template not configured, skipping business alert");
            return DeliveryOutcome::failed("Admin email service not configured");
        };

        let params = self.admin_params(draft);
        match self.provider.deliver(service_id, template_id, params).await {
            Ok(()) => {
                self.send_window.record_send(self.clock.now());
                DeliveryOutcome::delivered("Admin notification sent successfully")
            }
            Err(error) => {
                tracing::error!(%error, "failed to send business alert");
                DeliveryOutcome::failed("Failed to send admin notification")
            }
        }
    }

    fn customer_params(&self, draft: &BookingDraft) -> HashMap<String, String> {
        let services: Vec<&str> = draft
            .services
            .services()
            .iter()
            .map(|s| s.name.as_str())
            .collect();

        let mut params = self.shared_params(draft);
        params.insert("to_email".into(), draft.contact.email.clone());
        params.insert("to_name".into(), draft.contact.full_name());
        params.insert("customer_name".into(), draft.contact.name.clone());
        params.insert("services".into(), services.join(", "));
        params.insert("business_name".into(), self.business.name.clone());
        params.insert("business_address".into(), self.business.address.clone());
        params.insert("business_maps_url".into(), self.business.maps_url.clone());
        params
    }

    fn admin_params(&self, draft: &BookingDraft) -> HashMap<String, String> {
        let services: Vec<String> = draft
            .services
            .services()
            .iter()
            .map(|s| format!("{} ({})", s.name, s.price))
            .collect();

        let customer_email = if draft.contact.email.trim().is_empty() {
            "Not provided".to_owned()
        } else {
            draft.contact.email.clone()
        };

        let mut params = self.shared_params(draft);
        params.insert("reply_to".into(), draft.contact.email.clone());
        params.insert("customer_name".into(), draft.contact.full_name());
        params.insert("customer_email".into(), customer_email);
        params.insert("services".into(), services.join(", "));
        params.insert(
            "booking_timestamp".into(),
            self.clock.now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        );
        params
    }

    fn shared_params(&self, draft: &BookingDraft) -> HashMap<String, String> {
        let notes = if draft.notes.trim().is_empty() {
            "No special notes".to_owned()
        } else {
            draft.notes.clone()
        };

        let mut params = HashMap::new();
        params.insert("customer_phone".into(), draft.contact.phone.clone());
        params.insert("appointment_date".into(), format_booking_date(draft));
        params.insert("appointment_time".into(), draft.time_slot_label());
        params.insert(
            "total_duration".into(),
            format!("{} minutes", draft.services.total_duration_minutes()),
        );
        params.insert(
            "total_price".into(),
            format!("${}", draft.services.total_price_dollars()),
        );
        params.insert("notes".into(), notes);
        params
    }
}

fn format_booking_date(draft: &BookingDraft) -> String {
    draft.date.map_or_else(
        || "Not selected".to_owned(),
        |d| d.format("%A, %B %d, %Y").to_string(),
    )
}

/// A formatted summary of the totals, used by the review step.
#[must_use]
pub fn booking_summary(draft: &BookingDraft) -> String {
    format!(
        "{} | {} | ${}",
        format_booking_date(draft),
        format_minutes(draft.services.total_duration_minutes()),
        draft.services.total_price_dollars()
    )
}
