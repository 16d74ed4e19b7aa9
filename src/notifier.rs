use crate::clock::local_timestamp;
use crate::models::ReservationRecord;
use crate::state::AppState;
use crate::store::Collection;
use chrono::Local;
use std::time::Duration;
use tracing::{debug, info};

/// Reservations starting within this window are flagged.
pub const UPCOMING_WINDOW_MS: i64 = 60 * 60 * 1000;

/// Absolute start of a reservation: the stored timestamp when it is usable,
/// otherwise derived from its local date and time.
pub fn reservation_timestamp(reservation: &ReservationRecord) -> i64 {
    if let Some(stamp) = reservation.timestamp.filter(|value| value.is_finite()) {
        return stamp as i64;
    }
    let time = first_non_empty(&[
        reservation.time.as_str(),
        reservation.time24.as_deref().unwrap_or(""),
    ])
    .unwrap_or("--:--");
    local_timestamp(&reservation.date, time)
}

/// `"<time> - <name> (<service>)"` for every reservation starting in the
/// next hour, in scan order.
pub fn upcoming_reservations(reservations: &Collection<ReservationRecord>, now_ms: i64) -> Vec<String> {
    let mut alerts = Vec::new();
    reservations.scan(|_, reservation| {
        let diff = reservation_timestamp(reservation) - now_ms;
        if diff > 0 && diff <= UPCOMING_WINDOW_MS {
            alerts.push(alert_line(reservation));
        }
    });
    alerts
}

fn alert_line(reservation: &ReservationRecord) -> String {
    let name = first_non_empty(&[reservation.client_name.as_str()]).unwrap_or("Unnamed Client");
    let time = first_non_empty(&[
        reservation.time.as_str(),
        reservation.time24.as_deref().unwrap_or(""),
    ])
    .unwrap_or("--:--");
    let services = reservation.services.join(", ");
    let service = first_non_empty(&[services.as_str()]).unwrap_or("No service");
    format!("{time} - {name} ({service})")
}

fn first_non_empty<'a>(candidates: &[&'a str]) -> Option<&'a str> {
    candidates.iter().copied().find(|value| !value.is_empty())
}

/// Rescans reservations and replaces the cached alert list.
pub async fn refresh(state: &AppState) -> usize {
    let upcoming = {
        let data = state.data.lock().await;
        upcoming_reservations(&data.reservations, Local::now().timestamp_millis())
    };
    let count = upcoming.len();
    *state.upcoming.write().await = upcoming;
    count
}

/// Runs once immediately and then on every tick of `every`.
pub fn spawn(state: AppState, every: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let count = refresh(&state).await;
            if count > 0 {
                info!(count, "upcoming reservations within the hour");
            } else {
                debug!("no upcoming reservations");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration as ChronoDuration};

    fn reservation_at(moment: DateTime<Local>, name: &str) -> ReservationRecord {
        ReservationRecord {
            client_name: name.to_string(),
            phone: "024".to_string(),
            services: vec!["Braids".to_string()],
            date: moment.format("%Y-%m-%d").to_string(),
            time: moment.format("%H:%M").to_string(),
            ..ReservationRecord::default()
        }
    }

    #[test]
    fn only_the_next_hour_is_flagged() {
        let now = Local::now();
        let mut reservations = Collection::default();
        reservations.insert(reservation_at(now + ChronoDuration::minutes(30), "Soon"));
        reservations.insert(reservation_at(now + ChronoDuration::minutes(90), "Later"));
        reservations.insert(reservation_at(now - ChronoDuration::minutes(5), "Late"));

        let upcoming = upcoming_reservations(&reservations, now.timestamp_millis());
        assert_eq!(upcoming.len(), 1);
        assert!(upcoming[0].ends_with("- Soon (Braids)"));
    }

    #[test]
    fn stored_timestamp_wins() {
        let now_ms = 1_700_000_000_000;
        let reservation = ReservationRecord {
            date: "1999-01-01".into(),
            time: "10:00".into(),
            timestamp: Some((now_ms + 10 * 60 * 1000) as f64),
            ..ReservationRecord::default()
        };
        let mut reservations = Collection::default();
        reservations.insert(reservation);

        let upcoming = upcoming_reservations(&reservations, now_ms);
        assert_eq!(upcoming, vec!["10:00 - Unnamed Client (No service)".to_string()]);
    }

    #[test]
    fn time24_is_used_when_display_time_is_missing() {
        let now = Local::now();
        let soon = now + ChronoDuration::minutes(20);
        let reservation = ReservationRecord {
            client_name: "Esi".into(),
            date: soon.format("%Y-%m-%d").to_string(),
            time24: Some(soon.format("%H:%M").to_string()),
            ..ReservationRecord::default()
        };
        let mut reservations = Collection::default();
        reservations.insert(reservation);

        let upcoming = upcoming_reservations(&reservations, now.timestamp_millis());
        assert_eq!(upcoming.len(), 1);
        assert!(upcoming[0].contains("Esi"));
    }

    #[test]
    fn unparsable_dates_never_alert() {
        let mut reservations = Collection::default();
        reservations.insert(ReservationRecord {
            date: "someday".into(),
            time: "10:00".into(),
            ..ReservationRecord::default()
        });
        assert!(upcoming_reservations(&reservations, Local::now().timestamp_millis()).is_empty());
    }
}
