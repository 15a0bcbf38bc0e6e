//! CLI demo driving one full booking end to end.
//!
//! Walks the wizard through every step against the real store runtime,
//! then confirms and waits for the notification fan-out to settle. With no
//! email provider configured, deliveries go to the console provider.

use anyhow::{Context, Result};
use booking_flow::availability::{self, BusinessCalendar};
use booking_flow::notify::{
    ConsoleProvider, EmailJsProvider, NotificationDispatcher, NotificationProvider,
    booking_summary,
};
use booking_flow::rate_limit::{SendWindow, SubmissionGuard};
use booking_flow::storage::{FileStore, SessionStore};
use booking_flow::{
    BookingAction, BookingEnvironment, BookingReducer, BookingState, Config, Contact, catalog,
};
use booking_flow_core::environment::{Clock, SystemClock};
use booking_flow_runtime::Store;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env();
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let calendar = Arc::new(BusinessCalendar {
        blocked_dates: config.blocked_dates.clone(),
        ..BusinessCalendar::default()
    });

    let guard = Arc::new(SubmissionGuard::new(Arc::new(FileStore::open(
        &config.storage.rate_limit_path,
    ))));
    let send_window = SendWindow::new(Arc::new(SessionStore::new()));

    let provider: Arc<dyn NotificationProvider> = if config.email.is_configured() {
        Arc::new(EmailJsProvider::new(
            config.email.api_url.clone(),
            config.email.public_key.clone().unwrap_or_default(),
        ))
    } else {
        tracing::info!("no email provider configured, deliveries go to the console");
        Arc::new(ConsoleProvider)
    };

    let dispatcher = Arc::new(NotificationDispatcher::new(
        provider,
        send_window,
        Arc::clone(&clock),
        config.email.clone(),
        config.business.clone(),
    ));

    let env = BookingEnvironment::new(
        Arc::clone(&clock),
        Arc::clone(&calendar),
        guard,
        dispatcher,
    );
    let store = Store::new(BookingState::default(), BookingReducer::new(), env);

    println!("=== {} booking demo ===\n", config.business.name);
    store.send(BookingAction::Open).await?;

    // Step 1: services
    let manicure = catalog::find(2).context("catalog entry 2 missing")?;
    let removal = catalog::find(8).context("catalog entry 8 missing")?;
    println!("Selecting services:");
    for service in [&manicure, &removal] {
        println!("  - {} ({}, {})", service.name, service.duration, service.price);
    }
    store
        .send(BookingAction::ToggleService { service: manicure })
        .await?;
    store
        .send(BookingAction::ToggleService { service: removal })
        .await?;
    store.send(BookingAction::ContinueServices).await?;

    // Step 2: the next open day, first available slot
    let today = clock.now().date_naive();
    let date = (1..=14)
        .map(|offset| today + chrono::Duration::days(offset))
        .find(|candidate| availability::is_date_selectable(&calendar, *candidate, today))
        .context("no selectable date inside two weeks")?;
    store.send(BookingAction::SelectDate { date }).await?;

    let slot = store
        .state(|s| s.slots.iter().find(|slot| slot.available).map(|s| s.start))
        .await
        .context("no available slot on the chosen date")?;
    let total_minutes = store
        .state(|s| s.draft.services.total_duration_minutes())
        .await;
    let end = booking_flow::duration::estimated_end_time(slot, total_minutes);
    println!(
        "\nChosen {} at {} (until {})",
        date,
        slot.format("%H:%M"),
        end.format("%H:%M")
    );

    store.send(BookingAction::SelectTimeSlot { start: slot }).await?;
    store
        .send(BookingAction::SetNotes {
            notes: "First visit".to_owned(),
        })
        .await?;
    store.send(BookingAction::ContinueSchedule).await?;

    // Step 3: contact details
    store
        .send(BookingAction::SubmitContact {
            contact: Contact {
                name: "Ada".to_owned(),
                lastname: "Lovelace".to_owned(),
                phone: "+1 514 555 0199".to_owned(),
                email: "ada@example.com".to_owned(),
            },
        })
        .await?;

    // Step 4: review and confirm
    let summary = store.state(|s| booking_summary(&s.draft)).await;
    println!("Review: {summary}");

    println!("\nWaiting out the form-fill heuristic...");
    tokio::time::sleep(Duration::from_secs(5)).await;

    store
        .send(BookingAction::Confirm {
            honeypot: String::new(),
        })
        .await?;
    store.drain(Duration::from_secs(10)).await?;

    match store.state(|s| s.notice.clone()).await {
        Some(notice) => println!("\nOutcome: {}", notice.message),
        None => println!("\nOutcome: no notice produced"),
    }

    Ok(())
}
