//! Domain types for the booking workflow.
//!
//! The wizard accumulates a [`BookingDraft`] across four ordered steps; the
//! reducer owns every transition. All types here are plain owned data so
//! state snapshots stay cheap to clone and trivially serializable.

use crate::duration;
use crate::notify::DispatchOutcome;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// One offerable service from the static catalog.
///
/// Catalog entries are external input and never mutated: `price` stays the
/// currency-formatted string (`"$70"`) and `duration` the human-formatted
/// string (`"2h 30m"`) it arrived with; derived numbers go through the
/// parsers in [`crate::duration`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Stable catalog identifier
    pub id: u32,
    /// Display name
    pub name: String,
    /// Longer description shown on the selection step
    pub description: String,
    /// Currency-formatted price, e.g. `"$70"`
    pub price: String,
    /// Human-formatted duration, e.g. `"2h 30m"`
    pub duration: String,
    /// Catalog grouping, e.g. `"Manicure"`
    pub category: String,
}

/// The customer's chosen services: insertion-ordered, unique by id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    services: Vec<Service>,
}

impl Selection {
    /// Creates an empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            services: Vec::new(),
        }
    }

    /// Whether no service is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Number of selected services.
    #[must_use]
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether the service with `id` is selected.
    #[must_use]
    pub fn contains(&self, id: u32) -> bool {
        self.services.iter().any(|s| s.id == id)
    }

    /// The selected services in insertion order.
    #[must_use]
    pub fn services(&self) -> &[Service] {
        &self.services
    }

    /// Adds the service if absent, removes it if present.
    pub fn toggle(&mut self, service: Service) {
        if self.contains(service.id) {
            self.services.retain(|s| s.id != service.id);
        } else {
            self.services.push(service);
        }
    }

    /// Sum of the parsed service durations, in minutes.
    #[must_use]
    pub fn total_duration_minutes(&self) -> u32 {
        self.services
            .iter()
            .map(|s| duration::parse_duration_minutes(&s.duration))
            .sum()
    }

    /// Sum of the parsed service prices, in whole dollars.
    #[must_use]
    pub fn total_price_dollars(&self) -> u32 {
        self.services
            .iter()
            .map(|s| duration::parse_price_dollars(&s.price))
            .sum()
    }
}

/// Serialize a time-of-day as 24-hour `"HH:MM"`, the wire shape slots use.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M").map_err(de::Error::custom)
    }
}

/// A candidate appointment start on the 30-minute grid.
///
/// Slots are generated fresh per (date, total-duration) pair and never
/// patched afterwards; a change of inputs replaces the whole sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Slot start, formatted as 24-hour `"HH:MM"` at the boundary
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    /// Whether the slot can currently be booked
    pub available: bool,
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.start.format("%H:%M"))
    }
}

/// Contact details entered on the third step.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Given name
    pub name: String,
    /// Family name
    pub lastname: String,
    /// Phone number, permissive formatting
    pub phone: String,
    /// Email address for the confirmation message
    pub email: String,
}

impl Contact {
    /// `"name lastname"` for greetings and notification templates.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.lastname)
    }
}

/// The single mutable aggregate the wizard accumulates.
///
/// Each field is owned by exactly one step and replaced wholesale by that
/// step's completion; unvisited steps leave their fields at the defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingDraft {
    /// Selected services (step 1)
    pub services: Selection,
    /// Appointment date (step 2)
    pub date: Option<NaiveDate>,
    /// Appointment start time (step 2)
    pub time_slot: Option<NaiveTime>,
    /// Optional free-text note (step 2)
    pub notes: String,
    /// Customer contact details (step 3)
    pub contact: Contact,
}

impl BookingDraft {
    /// The chosen slot formatted as `"HH:MM"`, or a placeholder.
    #[must_use]
    pub fn time_slot_label(&self) -> String {
        self.time_slot.map_or_else(
            || "Not specified".to_owned(),
            |t| t.format("%H:%M").to_string(),
        )
    }
}

/// The four ordered wizard steps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardStep {
    /// Step 1: pick one or more services
    #[default]
    SelectingServices,
    /// Step 2: pick a date and an available time slot
    SelectingDateTime,
    /// Step 3: enter contact details
    EnteringContact,
    /// Step 4: review and confirm
    Confirming,
}

impl WizardStep {
    /// Number of steps.
    pub const COUNT: usize = 4;

    /// Zero-based position of this step.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::SelectingServices => 0,
            Self::SelectingDateTime => 1,
            Self::EnteringContact => 2,
            Self::Confirming => 3,
        }
    }

    /// The following step, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::SelectingServices => Some(Self::SelectingDateTime),
            Self::SelectingDateTime => Some(Self::EnteringContact),
            Self::EnteringContact => Some(Self::Confirming),
            Self::Confirming => None,
        }
    }

    /// The preceding step, if any.
    #[must_use]
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::SelectingServices => None,
            Self::SelectingDateTime => Some(Self::SelectingServices),
            Self::EnteringContact => Some(Self::SelectingDateTime),
            Self::Confirming => Some(Self::EnteringContact),
        }
    }
}

/// Category of a user-facing notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeKind {
    /// The current step's input failed validation
    ValidationBlocked,
    /// Submission blocked by the abuse guard
    RateLimited,
    /// Booking accepted
    Accepted,
    /// Booking accepted but no notification could be delivered
    AcceptedNotificationFailed,
}

/// A transient user-facing notice; replaced by the next one, cleared on
/// dismissal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// What kind of outcome this notice reports
    pub kind: NoticeKind,
    /// Human-readable message
    pub message: String,
}

impl Notice {
    /// Builds a notice.
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Full wizard state owned by the store.
#[derive(Clone, Debug, Serialize)]
pub struct BookingState {
    /// Current step
    pub step: WizardStep,
    /// Per-step completion flags, set before advancement
    pub completed: [bool; WizardStep::COUNT],
    /// The accumulating draft
    pub draft: BookingDraft,
    /// Slots computed for the current (date, total-duration) pair
    pub slots: Vec<TimeSlot>,
    /// Field errors for the current step, if its continue was rejected
    pub step_errors: Vec<crate::validate::FieldError>,
    /// Exclusive submission flag; confirm triggers are ignored while set
    pub submitting: bool,
    /// When the wizard was first shown (form-fill-time heuristic)
    pub form_opened_at: Option<DateTime<Utc>>,
    /// Latest user-facing notice
    pub notice: Option<Notice>,
}

impl Default for BookingState {
    fn default() -> Self {
        Self {
            step: WizardStep::default(),
            completed: [false; WizardStep::COUNT],
            draft: BookingDraft::default(),
            slots: Vec::new(),
            step_errors: Vec::new(),
            submitting: false,
            form_opened_at: None,
            notice: None,
        }
    }
}

impl BookingState {
    /// Whether step `step` has been completed.
    #[must_use]
    pub const fn is_completed(&self, step: WizardStep) -> bool {
        self.completed[step.index()]
    }
}

/// Every input the booking workflow can receive: user events from the four
/// steps, navigation, and the feedback action produced by the notification
/// fan-out effect.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum BookingAction {
    /// The wizard was shown; stamps the form-start time
    Open,
    /// Add/remove a catalog service from the selection
    ToggleService {
        /// The catalog entry to toggle
        service: Service,
    },
    /// Continue past the service-selection step
    ContinueServices,
    /// Pick an appointment date; recomputes slots and clears the chosen one
    SelectDate {
        /// The calendar date
        date: NaiveDate,
    },
    /// Pick a slot out of the currently computed available set
    SelectTimeSlot {
        /// Slot start time
        start: NaiveTime,
    },
    /// Replace the free-text note
    SetNotes {
        /// New note text
        notes: String,
    },
    /// Continue past the date/time step
    ContinueSchedule,
    /// Submit contact details and continue past the contact step
    SubmitContact {
        /// The entered contact details
        contact: Contact,
    },
    /// Go back one step
    Back,
    /// Jump back to an earlier step to edit it
    EditStep {
        /// Target step; forward jumps are ignored
        step: WizardStep,
    },
    /// Clear the current notice
    DismissNotice,
    /// Confirm the booking and start the submission
    Confirm {
        /// Hidden honeypot field; non-empty means bot traffic
        honeypot: String,
    },
    /// Feedback: the notification fan-out settled
    NotificationsSettled {
        /// Aggregated per-channel outcomes
        outcome: DispatchOutcome,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    fn service(id: u32) -> Service {
        catalog::default_catalog()
            .into_iter()
            .find(|s| s.id == id)
            .unwrap()
    }

    #[test]
    fn selection_is_unique_by_id() {
        let mut selection = Selection::new();
        selection.toggle(service(1));
        selection.toggle(service(2));
        assert_eq!(selection.len(), 2);

        // toggling an already-selected service removes it
        selection.toggle(service(1));
        assert_eq!(selection.len(), 1);
        assert!(!selection.contains(1));
        assert!(selection.contains(2));
    }

    #[test]
    fn selection_totals_derive_from_parsers() {
        let mut selection = Selection::new();
        selection.toggle(service(1)); // $100, 2h 30m
        selection.toggle(service(8)); // $15, 30m
        assert_eq!(selection.total_duration_minutes(), 180);
        assert_eq!(selection.total_price_dollars(), 115);
    }

    #[test]
    fn wizard_step_ordering() {
        assert_eq!(WizardStep::SelectingServices.index(), 0);
        assert_eq!(
            WizardStep::SelectingServices.next(),
            Some(WizardStep::SelectingDateTime)
        );
        assert_eq!(WizardStep::Confirming.next(), None);
        assert_eq!(WizardStep::SelectingServices.previous(), None);
        assert_eq!(
            WizardStep::Confirming.previous(),
            Some(WizardStep::EnteringContact)
        );
    }

    #[test]
    fn time_slot_serializes_as_hhmm() {
        let slot = TimeSlot {
            start: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            available: true,
        };
        let json = serde_json::to_string(&slot).unwrap();
        assert_eq!(json, r#"{"start":"09:30","available":true}"#);

        let back: TimeSlot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, slot);
    }
}
