//! The booking wizard state machine.
//!
//! Four ordered steps accumulate the draft: services, date/time, contact,
//! review. Forward movement happens only through the owning step's
//! completion event, and the completion flag is set before the step index
//! advances - progress rendering reads the flag during the transition.
//! Backward jumps are free and never discard entered data.
//!
//! Confirm is the single exclusive action: the abuse guard runs first, the
//! submission is recorded, and the notification fan-out goes out as the
//! one async effect in the workflow. Its settled outcome arrives back as
//! [`BookingAction::NotificationsSettled`].

use crate::availability::{self, BusinessCalendar};
use crate::notify::{DispatchOutcome, NotificationDispatcher};
use crate::rate_limit::{SubmissionGuard, Verdict, honeypot_is_human};
use crate::types::{BookingAction, BookingState, Notice, NoticeKind, WizardStep};
use crate::validate::{self, FieldError};
use booking_flow_core::effect::Effect;
use booking_flow_core::environment::Clock;
use booking_flow_core::reducer::{Effects, Reducer};
use booking_flow_core::smallvec;
use std::sync::Arc;

/// Injected dependencies for the booking reducer.
#[derive(Clone)]
pub struct BookingEnvironment {
    /// Time source
    pub clock: Arc<dyn Clock>,
    /// Business hours and blocked dates
    pub calendar: Arc<BusinessCalendar>,
    /// Submission abuse guard
    pub guard: Arc<SubmissionGuard>,
    /// Notification fan-out
    pub dispatcher: Arc<NotificationDispatcher>,
}

impl BookingEnvironment {
    /// Creates a `BookingEnvironment`.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        calendar: Arc<BusinessCalendar>,
        guard: Arc<SubmissionGuard>,
        dispatcher: Arc<NotificationDispatcher>,
    ) -> Self {
        Self {
            clock,
            calendar,
            guard,
            dispatcher,
        }
    }
}

/// Reducer for the booking wizard.
#[derive(Clone, Copy, Debug, Default)]
pub struct BookingReducer;

impl BookingReducer {
    /// Creates a `BookingReducer`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Handles a step's completion event: validate, flag, advance.
    fn complete_step(state: &mut BookingState, step: WizardStep) -> Effects<BookingAction> {
        // a completion event only acts on the step that owns it
        if state.step != step {
            tracing::debug!(?step, current = ?state.step, "stray completion event ignored");
            return smallvec![];
        }

        match validate::validate_step(step, &state.draft) {
            Ok(()) => {
                // flag before advancing
                state.completed[step.index()] = true;
                state.step_errors.clear();
                state.notice = None;
                if let Some(next) = step.next() {
                    state.step = next;
                }
            }
            Err(errors) => Self::reject(state, errors),
        }
        smallvec![]
    }

    /// Surfaces validation errors without moving the wizard.
    fn reject(state: &mut BookingState, errors: Vec<FieldError>) {
        tracing::debug!(count = errors.len(), "step validation failed");
        state.notice = Some(Notice::new(
            NoticeKind::ValidationBlocked,
            "Please complete the highlighted fields.",
        ));
        state.step_errors = errors;
    }

    /// Recomputes the slot sequence after the service set changed with a
    /// date already chosen. A previously chosen slot survives only if it is
    /// still present and available; otherwise the schedule step must be
    /// redone.
    fn resync_schedule(state: &mut BookingState, env: &BookingEnvironment) {
        let Some(date) = state.draft.date else {
            return;
        };

        let total = state.draft.services.total_duration_minutes();
        let previous = state.draft.time_slot.take();
        state.slots = availability::compute_slots(&env.calendar, date, total, env.clock.now());

        match previous {
            Some(chosen) if state.slots.iter().any(|s| s.start == chosen && s.available) => {
                state.draft.time_slot = Some(chosen);
            }
            Some(chosen) => {
                state.completed[WizardStep::SelectingDateTime.index()] = false;
                tracing::info!(
                    slot = %chosen.format("%H:%M"),
                    "chosen slot no longer fits the selected services"
                );
            }
            None => {}
        }
    }

    fn confirm(
        state: &mut BookingState,
        honeypot: &str,
        env: &BookingEnvironment,
    ) -> Effects<BookingAction> {
        // exclusive submission: repeated confirms are dropped, not queued
        if state.submitting {
            tracing::debug!("submission already in flight");
            return smallvec![];
        }
        if state.step != WizardStep::Confirming {
            return smallvec![];
        }

        if !honeypot_is_human(honeypot) {
            tracing::warn!("honeypot field was filled in, dropping submission");
            state.notice = Some(Notice::new(
                NoticeKind::RateLimited,
                "Your request could not be processed.",
            ));
            return smallvec![];
        }

        let now = env.clock.now();
        match env.guard.evaluate(state.form_opened_at, now) {
            Verdict::Blocked { message, .. } => {
                state.notice = Some(Notice::new(NoticeKind::RateLimited, message));
                smallvec![]
            }
            Verdict::Allowed => {
                state.submitting = true;
                state.notice = None;
                env.guard.record(now);

                let dispatcher = Arc::clone(&env.dispatcher);
                let draft = state.draft.clone();
                smallvec![Effect::future(async move {
                    let outcome = dispatcher.dispatch(&draft).await;
                    Some(BookingAction::NotificationsSettled { outcome })
                })]
            }
        }
    }

    /// The fan-out settled: the booking is accepted either way, only the
    /// notice differs. Resets the wizard for the next customer.
    fn settle(
        state: &mut BookingState,
        outcome: &DispatchOutcome,
        env: &BookingEnvironment,
    ) -> Effects<BookingAction> {
        if !state.submitting {
            tracing::debug!("settled outcome without submission in flight");
            return smallvec![];
        }

        let email_provided = !state.draft.contact.email.trim().is_empty();
        let notice = if outcome.all_failed() {
            Notice::new(
                NoticeKind::AcceptedNotificationFailed,
                "Appointment saved but notification failed. We will contact you shortly.",
            )
        } else {
            let mut message = "Appointment confirmed successfully!".to_owned();
            if outcome.customer.success && email_provided {
                message.push_str(" A confirmation email has been sent.");
            }
            Notice::new(NoticeKind::Accepted, message)
        };

        *state = BookingState::default();
        state.form_opened_at = Some(env.clock.now());
        state.notice = Some(notice);
        smallvec![]
    }
}

impl Reducer for BookingReducer {
    type State = BookingState;
    type Action = BookingAction;
    type Environment = BookingEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects<Self::Action> {
        match action {
            BookingAction::Open => {
                *state = BookingState::default();
                state.form_opened_at = Some(env.clock.now());
                smallvec![]
            }

            BookingAction::ToggleService { service } => {
                state.draft.services.toggle(service);
                state.step_errors.clear();
                Self::resync_schedule(state, env);
                smallvec![]
            }

            BookingAction::ContinueServices => {
                Self::complete_step(state, WizardStep::SelectingServices)
            }

            BookingAction::SelectDate { date } => {
                let today = env.clock.now().date_naive();
                if !availability::is_date_selectable(&env.calendar, date, today) {
                    tracing::debug!(%date, "unselectable date ignored");
                    return smallvec![];
                }
                state.draft.date = Some(date);
                state.draft.time_slot = None;
                state.slots = availability::compute_slots(
                    &env.calendar,
                    date,
                    state.draft.services.total_duration_minutes(),
                    env.clock.now(),
                );
                smallvec![]
            }

            BookingAction::SelectTimeSlot { start } => {
                if state.slots.iter().any(|s| s.start == start && s.available) {
                    state.draft.time_slot = Some(start);
                } else {
                    tracing::debug!(slot = %start.format("%H:%M"), "unavailable slot ignored");
                }
                smallvec![]
            }

            BookingAction::SetNotes { notes } => {
                state.draft.notes = notes;
                smallvec![]
            }

            BookingAction::ContinueSchedule => {
                Self::complete_step(state, WizardStep::SelectingDateTime)
            }

            BookingAction::SubmitContact { contact } => {
                if state.step != WizardStep::EnteringContact {
                    return smallvec![];
                }
                match validate::validate_contact(&contact) {
                    Ok(()) => {
                        state.draft.contact = contact;
                        Self::complete_step(state, WizardStep::EnteringContact)
                    }
                    Err(errors) => {
                        Self::reject(state, errors);
                        smallvec![]
                    }
                }
            }

            BookingAction::Back => {
                if state.submitting {
                    return smallvec![];
                }
                if let Some(previous) = state.step.previous() {
                    state.step = previous;
                    state.step_errors.clear();
                }
                smallvec![]
            }

            BookingAction::EditStep { step } => {
                if state.submitting {
                    return smallvec![];
                }
                if step.index() < state.step.index() {
                    state.step = step;
                    state.step_errors.clear();
                } else {
                    tracing::debug!(?step, "forward jump via edit ignored");
                }
                smallvec![]
            }

            BookingAction::DismissNotice => {
                state.notice = None;
                smallvec![]
            }

            BookingAction::Confirm { honeypot } => Self::confirm(state, &honeypot, env),

            BookingAction::NotificationsSettled { outcome } => {
                Self::settle(state, &outcome, env)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::config::{BusinessConfig, EmailConfig};
    use crate::notify::{ConsoleProvider, DeliveryOutcome};
    use crate::rate_limit::SendWindow;
    use crate::types::Contact;
    use booking_flow_testing::mocks::MemoryStore;
    use booking_flow_testing::{ReducerTest, assertions, test_clock};
    use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

    fn configured_email() -> EmailConfig {
        EmailConfig {
            api_url: "unused in tests".to_owned(),
            public_key: Some("pk".to_owned()),
            service_id: Some("svc".to_owned()),
            customer_template_id: Some("tmpl_customer".to_owned()),
            admin_template_id: Some("tmpl_admin".to_owned()),
        }
    }

    fn test_environment() -> BookingEnvironment {
        let clock = test_clock();
        BookingEnvironment::new(
            clock.clone(),
            Arc::new(BusinessCalendar::default()),
            Arc::new(SubmissionGuard::new(Arc::new(MemoryStore::new()))),
            Arc::new(NotificationDispatcher::new(
                Arc::new(ConsoleProvider),
                SendWindow::new(Arc::new(MemoryStore::new())),
                clock,
                configured_email(),
                BusinessConfig::default(),
            )),
        )
    }

    fn valid_contact() -> Contact {
        Contact {
            name: "Ada".to_owned(),
            lastname: "Lovelace".to_owned(),
            phone: "+1 514 555 0199".to_owned(),
            email: "ada@example.com".to_owned(),
        }
    }

    fn thursday() -> NaiveDate {
        // the day after the fixed test clock's Wednesday
        NaiveDate::from_ymd_opt(2026, 3, 5).unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    /// State parked on the review step with a complete, valid draft.
    fn ready_to_confirm(now: DateTime<Utc>) -> BookingState {
        let mut state = BookingState::default();
        state.form_opened_at = Some(now - Duration::minutes(5));
        state.draft.services.toggle(catalog::find(2).unwrap());
        state.draft.date = Some(thursday());
        state.draft.time_slot = Some(hm(14, 0));
        state.draft.contact = valid_contact();
        state.step = WizardStep::Confirming;
        state.completed = [true, true, true, false];
        state
    }

    #[test]
    fn open_resets_and_stamps_form_start() {
        let env = test_environment();
        let now = env.clock.now();

        ReducerTest::new(BookingReducer::new())
            .with_env(env)
            .given_state({
                let mut dirty = BookingState::default();
                dirty.draft.notes = "left over".to_owned();
                dirty.step = WizardStep::Confirming;
                dirty
            })
            .when_action(BookingAction::Open)
            .then_state(move |state| {
                assert_eq!(state.step, WizardStep::SelectingServices);
                assert_eq!(state.draft.notes, "");
                assert_eq!(state.form_opened_at, Some(now));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn continue_with_empty_selection_does_not_advance() {
        ReducerTest::new(BookingReducer::new())
            .with_env(test_environment())
            .given_state(BookingState::default())
            .when_action(BookingAction::ContinueServices)
            .then_state(|state| {
                assert_eq!(state.step, WizardStep::SelectingServices);
                assert!(!state.completed[0]);
                assert_eq!(state.step_errors.len(), 1);
                assert_eq!(state.step_errors[0].field, "services");
                assert!(matches!(
                    state.notice,
                    Some(Notice {
                        kind: NoticeKind::ValidationBlocked,
                        ..
                    })
                ));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn valid_selection_completes_then_advances() {
        ReducerTest::new(BookingReducer::new())
            .with_env(test_environment())
            .given_state(BookingState::default())
            .when_action(BookingAction::ToggleService {
                service: catalog::find(2).unwrap(),
            })
            .when_action(BookingAction::ContinueServices)
            .then_state(|state| {
                assert!(state.completed[0]);
                assert_eq!(state.step, WizardStep::SelectingDateTime);
                assert!(state.step_errors.is_empty());
            })
            .run();
    }

    #[test]
    fn selecting_a_date_computes_slots_and_clears_the_chosen_slot() {
        let mut state = BookingState::default();
        state.draft.services.toggle(catalog::find(2).unwrap()); // 2h
        state.step = WizardStep::SelectingDateTime;
        state.draft.time_slot = Some(hm(10, 0));

        ReducerTest::new(BookingReducer::new())
            .with_env(test_environment())
            .given_state(state)
            .when_action(BookingAction::SelectDate { date: thursday() })
            .then_state(|state| {
                assert_eq!(state.draft.date, Some(thursday()));
                assert_eq!(state.draft.time_slot, None);
                assert_eq!(state.slots.len(), 18);
                // 2h against a 19:00 close: 17:00 reaches it exactly
                assert!(
                    state
                        .slots
                        .iter()
                        .any(|s| s.start == hm(17, 0) && s.available)
                );
                assert!(
                    state
                        .slots
                        .iter()
                        .any(|s| s.start == hm(17, 30) && !s.available)
                );
            })
            .run();
    }

    #[test]
    fn past_and_closed_dates_are_ignored() {
        let env = test_environment();
        let yesterday = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2026, 3, 8).unwrap();

        ReducerTest::new(BookingReducer::new())
            .with_env(env)
            .given_state(BookingState::default())
            .when_action(BookingAction::SelectDate { date: yesterday })
            .when_action(BookingAction::SelectDate { date: sunday })
            .then_state(|state| {
                assert_eq!(state.draft.date, None);
                assert!(state.slots.is_empty());
            })
            .run();
    }

    #[test]
    fn only_available_slots_can_be_chosen() {
        let mut state = BookingState::default();
        state.draft.services.toggle(catalog::find(1).unwrap()); // 2h 30m

        ReducerTest::new(BookingReducer::new())
            .with_env(test_environment())
            .given_state(state)
            .when_action(BookingAction::SelectDate { date: thursday() })
            // 17:00 + 2h30m runs past close; ignored
            .when_action(BookingAction::SelectTimeSlot { start: hm(17, 0) })
            .then_state(|state| assert_eq!(state.draft.time_slot, None))
            .run();
    }

    #[test]
    fn schedule_continue_requires_date_and_slot() {
        let mut state = BookingState::default();
        state.draft.services.toggle(catalog::find(2).unwrap());
        state.step = WizardStep::SelectingDateTime;

        ReducerTest::new(BookingReducer::new())
            .with_env(test_environment())
            .given_state(state)
            .when_action(BookingAction::ContinueSchedule)
            .then_state(|state| {
                assert_eq!(state.step, WizardStep::SelectingDateTime);
                assert!(!state.completed[1]);
                let fields: Vec<_> = state.step_errors.iter().map(|e| e.field).collect();
                assert_eq!(fields, vec!["date", "timeSlot"]);
            })
            .run();
    }

    #[test]
    fn full_forward_walk_reaches_review() {
        ReducerTest::new(BookingReducer::new())
            .with_env(test_environment())
            .given_state(BookingState::default())
            .when_action(BookingAction::Open)
            .when_action(BookingAction::ToggleService {
                service: catalog::find(2).unwrap(),
            })
            .when_action(BookingAction::ContinueServices)
            .when_action(BookingAction::SelectDate { date: thursday() })
            .when_action(BookingAction::SelectTimeSlot { start: hm(14, 0) })
            .when_action(BookingAction::SetNotes {
                notes: "first visit".to_owned(),
            })
            .when_action(BookingAction::ContinueSchedule)
            .when_action(BookingAction::SubmitContact {
                contact: valid_contact(),
            })
            .then_state(|state| {
                assert_eq!(state.step, WizardStep::Confirming);
                assert_eq!(state.completed, [true, true, true, false]);
                assert_eq!(state.draft.notes, "first visit");
                assert_eq!(state.draft.contact.name, "Ada");
            })
            .run();
    }

    #[test]
    fn invalid_contact_stays_out_of_the_draft() {
        let mut state = BookingState::default();
        state.step = WizardStep::EnteringContact;

        let mut bad = valid_contact();
        bad.email = "not-an-email".to_owned();

        ReducerTest::new(BookingReducer::new())
            .with_env(test_environment())
            .given_state(state)
            .when_action(BookingAction::SubmitContact { contact: bad })
            .then_state(|state| {
                assert_eq!(state.step, WizardStep::EnteringContact);
                assert!(!state.completed[2]);
                // the draft keeps its defaults until the step validates
                assert_eq!(state.draft.contact, Contact::default());
                assert!(state.step_errors.iter().any(|e| e.field == "email"));
            })
            .run();
    }

    #[test]
    fn editing_an_earlier_step_preserves_later_data() {
        let env = test_environment();
        let state = ready_to_confirm(env.clock.now());

        ReducerTest::new(BookingReducer::new())
            .with_env(env)
            .given_state(state)
            .when_action(BookingAction::EditStep {
                step: WizardStep::SelectingServices,
            })
            .then_state(|state| {
                assert_eq!(state.step, WizardStep::SelectingServices);
                // completion flags and collected data survive the jump
                assert_eq!(state.completed, [true, true, true, false]);
                assert_eq!(state.draft.contact.name, "Ada");
                assert_eq!(state.draft.time_slot, Some(hm(14, 0)));
            })
            .run();
    }

    #[test]
    fn forward_jump_via_edit_is_ignored() {
        ReducerTest::new(BookingReducer::new())
            .with_env(test_environment())
            .given_state(BookingState::default())
            .when_action(BookingAction::EditStep {
                step: WizardStep::Confirming,
            })
            .then_state(|state| assert_eq!(state.step, WizardStep::SelectingServices))
            .run();
    }

    #[test]
    fn service_change_keeps_a_still_valid_slot() {
        let env = test_environment();
        let mut state = ready_to_confirm(env.clock.now());
        // recompute for the chosen date so slots reflect the 2h selection
        state.slots = availability::compute_slots(
            &env.calendar,
            thursday(),
            state.draft.services.total_duration_minutes(),
            env.clock.now(),
        );

        ReducerTest::new(BookingReducer::new())
            .with_env(env)
            .given_state(state)
            // add a 30m removal: 14:00 + 2h30m = 16:30, still inside hours
            .when_action(BookingAction::ToggleService {
                service: catalog::find(8).unwrap(),
            })
            .then_state(|state| {
                assert_eq!(state.draft.time_slot, Some(hm(14, 0)));
                assert!(state.completed[1]);
            })
            .run();
    }

    #[test]
    fn service_change_clears_an_overflowing_slot() {
        let env = test_environment();
        let mut state = ready_to_confirm(env.clock.now());
        state.draft.time_slot = Some(hm(17, 0)); // 2h ends exactly at close
        state.slots = availability::compute_slots(
            &env.calendar,
            thursday(),
            state.draft.services.total_duration_minutes(),
            env.clock.now(),
        );

        ReducerTest::new(BookingReducer::new())
            .with_env(env)
            .given_state(state)
            // adding 30m pushes 17:00 past the 19:00 close
            .when_action(BookingAction::ToggleService {
                service: catalog::find(8).unwrap(),
            })
            .then_state(|state| {
                assert_eq!(state.draft.time_slot, None);
                // the schedule step has to be redone
                assert!(!state.completed[1]);
                assert!(state.completed[0]);
            })
            .run();
    }

    #[test]
    fn confirm_while_submitting_is_dropped() {
        let env = test_environment();
        let mut state = ready_to_confirm(env.clock.now());
        state.submitting = true;

        ReducerTest::new(BookingReducer::new())
            .with_env(env)
            .given_state(state)
            .when_action(BookingAction::Confirm {
                honeypot: String::new(),
            })
            .then_state(|state| assert!(state.submitting))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn confirm_blocks_a_form_filled_too_quickly() {
        let env = test_environment();
        let mut state = ready_to_confirm(env.clock.now());
        state.form_opened_at = Some(env.clock.now() - Duration::seconds(2));

        ReducerTest::new(BookingReducer::new())
            .with_env(env)
            .given_state(state)
            .when_action(BookingAction::Confirm {
                honeypot: String::new(),
            })
            .then_state(|state| {
                assert!(!state.submitting);
                let notice = state.notice.as_ref().unwrap();
                assert_eq!(notice.kind, NoticeKind::RateLimited);
                assert!(notice.message.contains("take your time"));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn confirm_reports_the_minimum_interval_wait() {
        let env = test_environment();
        let now = env.clock.now();
        env.guard.record(now - Duration::seconds(10));

        ReducerTest::new(BookingReducer::new())
            .with_env(env.clone())
            .given_state(ready_to_confirm(now))
            .when_action(BookingAction::Confirm {
                honeypot: String::new(),
            })
            .then_state(|state| {
                let notice = state.notice.as_ref().unwrap();
                assert_eq!(notice.kind, NoticeKind::RateLimited);
                assert!(notice.message.contains("20 seconds"));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn filled_honeypot_blocks_without_recording() {
        let env = test_environment();
        let now = env.clock.now();

        ReducerTest::new(BookingReducer::new())
            .with_env(env.clone())
            .given_state(ready_to_confirm(now))
            .when_action(BookingAction::Confirm {
                honeypot: "https://spam.example".to_owned(),
            })
            .then_state(|state| {
                assert!(!state.submitting);
                assert!(matches!(
                    state.notice,
                    Some(Notice {
                        kind: NoticeKind::RateLimited,
                        ..
                    })
                ));
            })
            .then_effects(assertions::assert_no_effects)
            .run();

        // the dropped attempt never touched the submission counter
        assert!(
            env.guard
                .evaluate(Some(now - Duration::minutes(5)), now)
                .is_allowed()
        );
    }

    #[test]
    fn allowed_confirm_records_and_starts_the_fan_out() {
        let env = test_environment();

        ReducerTest::new(BookingReducer::new())
            .with_env(env.clone())
            .given_state(ready_to_confirm(env.clock.now()))
            .when_action(BookingAction::Confirm {
                honeypot: String::new(),
            })
            .then_state(|state| assert!(state.submitting))
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();

        // the submission was recorded before dispatch
        let now = env.clock.now();
        let verdict = env.guard.evaluate(Some(now - Duration::minutes(5)), now);
        assert!(matches!(verdict, Verdict::Blocked { .. }));
    }

    #[test]
    fn settled_success_resets_for_the_next_customer() {
        let env = test_environment();
        let mut state = ready_to_confirm(env.clock.now());
        state.submitting = true;

        ReducerTest::new(BookingReducer::new())
            .with_env(env)
            .given_state(state)
            .when_action(BookingAction::NotificationsSettled {
                outcome: DispatchOutcome {
                    customer: DeliveryOutcome {
                        success: true,
                        message: "sent".to_owned(),
                    },
                    admin: DeliveryOutcome {
                        success: true,
                        message: "sent".to_owned(),
                    },
                },
            })
            .then_state(|state| {
                assert!(!state.submitting);
                assert_eq!(state.step, WizardStep::SelectingServices);
                assert_eq!(state.completed, [false; 4]);
                assert!(state.draft.services.is_empty());
                assert!(state.form_opened_at.is_some());

                let notice = state.notice.as_ref().unwrap();
                assert_eq!(notice.kind, NoticeKind::Accepted);
                assert!(notice.message.contains("confirmation email has been sent"));
            })
            .run();
    }

    #[test]
    fn partial_failure_still_reads_as_accepted() {
        let env = test_environment();
        let mut state = ready_to_confirm(env.clock.now());
        state.submitting = true;

        ReducerTest::new(BookingReducer::new())
            .with_env(env)
            .given_state(state)
            .when_action(BookingAction::NotificationsSettled {
                outcome: DispatchOutcome {
                    customer: DeliveryOutcome {
                        success: false,
                        message: "failed".to_owned(),
                    },
                    admin: DeliveryOutcome {
                        success: true,
                        message: "sent".to_owned(),
                    },
                },
            })
            .then_state(|state| {
                let notice = state.notice.as_ref().unwrap();
                assert_eq!(notice.kind, NoticeKind::Accepted);
                // no email promise when the customer send failed
                assert!(!notice.message.contains("confirmation email"));
            })
            .run();
    }

    #[test]
    fn total_delivery_failure_changes_the_notice_only() {
        let env = test_environment();
        let mut state = ready_to_confirm(env.clock.now());
        state.submitting = true;

        ReducerTest::new(BookingReducer::new())
            .with_env(env)
            .given_state(state)
            .when_action(BookingAction::NotificationsSettled {
                outcome: DispatchOutcome {
                    customer: DeliveryOutcome {
                        success: false,
                        message: "failed".to_owned(),
                    },
                    admin: DeliveryOutcome {
                        success: false,
                        message: "failed".to_owned(),
                    },
                },
            })
            .then_state(|state| {
                // accepted, wizard reset; only the message differs
                assert_eq!(state.step, WizardStep::SelectingServices);
                let notice = state.notice.as_ref().unwrap();
                assert_eq!(notice.kind, NoticeKind::AcceptedNotificationFailed);
                assert!(notice.message.contains("We will contact you shortly"));
            })
            .run();
    }
}
