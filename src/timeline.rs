use crate::clock::{hour_label, leading_hour};
use crate::export::{decode_amp, display_name, mailto_href, time24};
use crate::models::ReservationRecord;
use crate::state::AppState;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

pub const FIRST_HOUR: u32 = 8;
pub const LAST_HOUR: u32 = 24;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineCard {
    pub name: String,
    pub phone: String,
    pub services: String,
    pub date: String,
    pub time: String,
    pub share_href: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourSlot {
    pub hour: u32,
    pub label: String,
    pub cards: Vec<TimelineCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineView {
    pub generation: u64,
    pub slots: Vec<HourSlot>,
}

pub fn empty_slots() -> Vec<HourSlot> {
    (FIRST_HOUR..=LAST_HOUR)
        .map(|hour| HourSlot {
            hour,
            label: hour_label(hour),
            cards: Vec::new(),
        })
        .collect()
}

/// Places each reservation in the slot of its starting hour. Reservations
/// outside 08:00-24:00 are left off the grid.
pub fn build_slots<'a>(
    reservations: impl IntoIterator<Item = &'a ReservationRecord>,
    salon: &str,
) -> Vec<HourSlot> {
    let mut slots = empty_slots();
    for reservation in reservations {
        let start = time24(reservation);
        let Some(hour) = leading_hour(&start) else {
            continue;
        };
        let Some(slot) = slots.iter_mut().find(|slot| slot.hour == hour) else {
            continue;
        };
        slot.cards.push(card(reservation, &start, salon));
    }
    slots
}

fn card(reservation: &ReservationRecord, start: &str, salon: &str) -> TimelineCard {
    let name = display_name(reservation);
    let phone = decode_amp(&reservation.phone);
    let services = reservation.services.join(", ");
    let time = if reservation.time.is_empty() {
        start.to_string()
    } else {
        reservation.time.clone()
    };

    let subject = format!("Reservation — {name} on {} at {time}", reservation.date);
    let body = format!(
        "Client: {name}\nPhone: {phone}\nService: {services}\nDate: {}\nTime: {time}\n\n— Sent from {salon} system",
        reservation.date
    );

    TimelineCard {
        share_href: mailto_href("", &subject, &body),
        name,
        phone,
        services,
        date: reservation.date.clone(),
        time,
    }
}

/// Proof that a render was started, carrying its generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTicket(u64);

/// Holds the grid currently on display. Renders can overlap; each one takes
/// a generation number when it starts and its result is dropped if a newer
/// render started in the meantime.
#[derive(Clone, Default)]
pub struct TimelineRenderer {
    generation: Arc<AtomicU64>,
    displayed: Arc<RwLock<Option<TimelineView>>>,
}

impl TimelineRenderer {
    pub fn begin(&self) -> RenderTicket {
        RenderTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: RenderTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Shows `slots` unless a newer render has begun. Returns whether the
    /// result was kept.
    pub async fn commit(&self, ticket: RenderTicket, slots: Vec<HourSlot>) -> bool {
        let mut displayed = self.displayed.write().await;
        if !self.is_current(ticket) {
            debug!(generation = ticket.0, "dropping superseded timeline render");
            return false;
        }
        *displayed = Some(TimelineView {
            generation: ticket.0,
            slots,
        });
        true
    }

    pub async fn displayed(&self) -> Option<TimelineView> {
        self.displayed.read().await.clone()
    }

    /// Reads every reservation and rebuilds the grid.
    pub async fn render(&self, state: &AppState) -> bool {
        let ticket = self.begin();
        let reservations: Vec<ReservationRecord> = {
            let data = state.data.lock().await;
            data.reservations.values().cloned().collect()
        };
        let slots = build_slots(&reservations, &state.config.salon_name);
        self.commit(ticket, slots).await
    }
}
