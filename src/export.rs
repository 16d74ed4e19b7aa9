use crate::clock::to_24h;
use crate::models::{ClientRecord, ReservationRecord, ReviewRecord, RevenueSummary};
use crate::store::Collection;

pub const CLIENT_HEADERS: [&str; 9] = [
    "Name", "Phone", "Gender", "Services", "Date", "Time", "Staff", "Amount", "Payment",
];
pub const REVIEW_HEADERS: [&str; 5] = ["Name", "Service", "Rating", "Message", "Date"];

/// Quotes a field when it holds a comma, quote or newline, doubling any
/// embedded quotes.
pub fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

pub fn to_csv<R, F>(rows: impl IntoIterator<Item = R>) -> String
where
    R: IntoIterator<Item = F>,
    F: AsRef<str>,
{
    rows.into_iter()
        .map(|row| {
            row.into_iter()
                .map(|field| escape_csv(field.as_ref()))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn clients_csv(clients: &Collection<ClientRecord>) -> String {
    let mut rows: Vec<Vec<String>> = vec![CLIENT_HEADERS.iter().map(|h| h.to_string()).collect()];
    clients.scan(|_, client| {
        rows.push(vec![
            client.name.clone(),
            client.phone.clone(),
            client.gender.clone(),
            client.services.join("; "),
            client.date.clone(),
            client.time.clone(),
            client.staff.clone(),
            client.amount.clone(),
            client.payment_method.clone(),
        ]);
    });
    to_csv(rows)
}

pub fn revenue_csv(summary: &RevenueSummary, currency: &str, generated: &str) -> String {
    let money = |amount: f64| format!("{currency} {amount:.2}");
    let rows: Vec<Vec<String>> = vec![
        vec!["Category".into(), "Amount".into()],
        vec!["Daily Revenue".into(), money(summary.today_total)],
        vec!["Weekly Revenue".into(), money(summary.week_total)],
        vec!["Monthly Revenue".into(), money(summary.month_total)],
        vec!["Yearly Revenue".into(), money(summary.yearly_total)],
        Vec::new(),
        vec!["Generated".into(), generated.to_string()],
    ];
    to_csv(rows)
}

pub fn reviews_csv(reviews: &[&ReviewRecord]) -> String {
    let header: Vec<String> = REVIEW_HEADERS.iter().map(|h| h.to_string()).collect();
    let body = reviews.iter().map(|review| {
        vec![
            review.name.clone(),
            review.service.clone(),
            "⭐".repeat(usize::from(review.rating)),
            review.message.clone(),
            review.date.clone(),
        ]
    });
    to_csv(std::iter::once(header).chain(body))
}

pub fn mailto_href(to: &str, subject: &str, body: &str) -> String {
    format!(
        "mailto:{}?subject={}&body={}",
        urlencoding::encode(to),
        urlencoding::encode(subject),
        urlencoding::encode(body)
    )
}

/// Undoes HTML-escaped ampersands that older forms stored.
pub fn decode_amp(value: &str) -> String {
    value.replace("&amp;", "&")
}

pub fn display_name(reservation: &ReservationRecord) -> String {
    if reservation.client_name.is_empty() {
        "Unnamed Client".to_string()
    } else {
        decode_amp(&reservation.client_name)
    }
}

/// 24-hour start time used for ordering and placing a reservation.
pub fn time24(reservation: &ReservationRecord) -> String {
    match reservation.time24.as_deref() {
        Some(value) if !value.is_empty() => value.to_string(),
        _ if reservation.time.is_empty() => "00:00".to_string(),
        _ => to_24h(&reservation.time),
    }
}

pub fn reservation_line(reservation: &ReservationRecord, position: usize) -> String {
    let time = if reservation.time.is_empty() {
        reservation.time24.clone().unwrap_or_default()
    } else {
        reservation.time.clone()
    };
    format!(
        "{position}. {} {time} — {} ({}) — {}",
        reservation.date,
        display_name(reservation),
        decode_amp(&reservation.phone),
        reservation.services.join(", "),
    )
}

/// Mail link listing every reservation on `date`, earliest first. `None`
/// when the day is empty.
pub fn share_for_date(
    reservations: &Collection<ReservationRecord>,
    date: &str,
    salon: &str,
) -> Option<String> {
    let mut day = reservations.filter(|reservation| reservation.date == date);
    if day.is_empty() {
        return None;
    }
    day.sort_by_cached_key(|reservation| time24(reservation));

    let lines = day
        .iter()
        .enumerate()
        .map(|(index, reservation)| reservation_line(reservation, index + 1))
        .collect::<Vec<_>>()
        .join("\n");
    let subject = format!("Reservations for {date} — {salon}");
    let body = format!(
        "Hello,\n\nHere are the reservations for {date}:\n\n{lines}\n\n— Sent from {salon} system"
    );
    Some(mailto_href("", &subject, &body))
}
