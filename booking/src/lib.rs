//! # Booking Flow
//!
//! A walk-in appointment booking workflow for a single-location salon,
//! built on the reducer architecture from `booking-flow-core`.
//!
//! A customer selects one or more catalog services, picks an available
//! date/time consistent with business hours and the cumulative service
//! duration, enters contact details, reviews a summary, and confirms.
//! Confirmation is gated by an abuse-mitigation layer (submission rate
//! limits plus timing heuristics) and then fans out to two concurrent
//! notification deliveries whose outcomes are reported independently.
//!
//! ## Architecture
//!
//! ```text
//! catalog ─► Selection ─► availability (needs total duration)
//!                 │
//!                 ▼
//!     BookingReducer (wizard state machine)
//!                 │ Confirm
//!                 ▼
//!      SubmissionGuard (fill time, caps)
//!                 │ allowed + recorded
//!                 ▼
//!    NotificationDispatcher ─► customer + admin (join, all-settle)
//! ```
//!
//! Everything synchronous completes inside the reducer; the notification
//! fan-out is the single async effect. No booking is persisted: the
//! workflow's product is the accepted draft and its notifications.

pub mod availability;
pub mod catalog;
pub mod config;
pub mod duration;
pub mod notify;
pub mod rate_limit;
pub mod reducer;
pub mod storage;
pub mod types;
pub mod validate;

pub use config::Config;
pub use reducer::{BookingEnvironment, BookingReducer};
pub use types::{
    BookingAction, BookingDraft, BookingState, Contact, Notice, NoticeKind, Selection, Service,
    TimeSlot, WizardStep,
};
