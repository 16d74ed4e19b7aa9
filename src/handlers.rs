use crate::clock::{display_date, local_date_str};
use crate::errors::AppError;
use crate::export::{clients_csv, reviews_csv, revenue_csv, share_for_date};
use crate::models::{
    ClientListResponse, ClientQuery, ClientRecord, CreatedResponse, DashboardResponse, DateQuery,
    NewClientRequest, NewReviewRequest, NewServiceRequest, NotificationsResponse,
    ReservationRecord, RevenueQuery, RevenueResponse, RevenueView, ReviewQuery, ReviewRecord,
    ServiceRecord, ShareResponse, Stored,
};
use crate::notifier;
use crate::state::AppState;
use crate::stats::{dashboard_stats, filter_clients, revenue_series, revenue_summary, summary_cards, trend_for_day};
use crate::sync::{Topic, UPDATE};
use crate::timeline::{empty_slots, TimelineView};
use crate::ui::render_index;
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, IntoResponse,
    },
    Json,
};
use chrono::{Datelike, Local};
use std::convert::Infallible;
use tokio_stream::{Stream, StreamExt};
use tracing::{info, warn};

const DEFAULT_PAYMENT: &str = "Cash";
const MISSING_FIELDS: &str = "Please fill in all required fields (including at least one service).";

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_index(&state.config.salon_name, &state.config.currency))
}

pub async fn list_clients(
    State(state): State<AppState>,
    Query(query): Query<ClientQuery>,
) -> Json<ClientListResponse> {
    let data = state.data.lock().await;
    let matches = filter_clients(
        &data.clients,
        query.search.as_deref().unwrap_or(""),
        query.service.as_deref().unwrap_or(""),
    );
    let records: Vec<&ClientRecord> = matches.iter().map(|(_, client)| *client).collect();
    let summary = summary_cards(&records);
    let clients = matches
        .into_iter()
        .map(|(id, client)| Stored {
            id,
            record: client.clone(),
        })
        .collect();

    Json(ClientListResponse { clients, summary })
}

pub async fn add_client(
    State(state): State<AppState>,
    Json(payload): Json<NewClientRequest>,
) -> Result<Json<CreatedResponse>, AppError> {
    let client = client_from_request(payload)?;
    let name = client.name.clone();
    let id = state
        .write(Topic::Dashboard, |data| data.clients.insert(client))
        .await?;

    info!(id, %name, "client saved");
    Ok(Json(CreatedResponse { id }))
}

fn client_from_request(payload: NewClientRequest) -> Result<ClientRecord, AppError> {
    let trimmed = |value: String| value.trim().to_string();
    let services: Vec<String> = payload
        .services
        .into_iter()
        .map(trimmed)
        .filter(|service| !service.is_empty())
        .collect();
    let client = ClientRecord {
        name: trimmed(payload.name),
        phone: trimmed(payload.phone),
        gender: payload.gender,
        services,
        amount: trimmed(payload.amount),
        date: payload
            .date
            .filter(|date| !date.trim().is_empty())
            .unwrap_or_else(|| local_date_str(Local::now())),
        time: trimmed(payload.time),
        staff: trimmed(payload.staff),
        photo_data: payload.photo_data.unwrap_or_default(),
        payment_method: payload
            .payment_method
            .filter(|method| !method.is_empty())
            .unwrap_or_else(|| DEFAULT_PAYMENT.to_string()),
    };

    let missing = [&client.name, &client.phone, &client.gender, &client.time, &client.staff]
        .iter()
        .any(|value| value.is_empty());
    if missing || client.services.is_empty() {
        return Err(AppError::bad_request(MISSING_FIELDS));
    }
    Ok(client)
}

pub async fn delete_client(
    State(state): State<AppState>,
    Path(phone): Path<String>,
) -> Result<Json<Stored<ClientRecord>>, AppError> {
    let removed = state
        .write(Topic::Dashboard, |data| data.delete_client_by_phone(&phone))
        .await?;

    match removed {
        Some((id, record)) => {
            info!(id, "client deleted");
            Ok(Json(Stored { id, record }))
        }
        None => Err(AppError::not_found(format!("no client with phone {phone}"))),
    }
}

pub async fn dashboard(State(state): State<AppState>) -> Json<DashboardResponse> {
    let now = Local::now();
    let data = state.data.lock().await;
    Json(DashboardResponse {
        stats: dashboard_stats(&data.clients, now),
        trend: trend_for_day(&data.clients, now.date_naive()),
        currency: state.config.currency.clone(),
    })
}

pub async fn revenue(
    State(state): State<AppState>,
    Query(query): Query<RevenueQuery>,
) -> Result<Json<RevenueResponse>, AppError> {
    let view = match query.view.as_deref() {
        None | Some("") => RevenueView::Monthly,
        Some(value) => RevenueView::parse(value)
            .ok_or_else(|| AppError::bad_request("view must be daily, weekly, monthly or yearly"))?,
    };
    let today = Local::now().date_naive();
    let year = query.year.unwrap_or_else(|| today.year());

    let data = state.data.lock().await;
    let summary = revenue_summary(&data.clients, year, today);
    let series = revenue_series(&summary, view);

    Ok(Json(RevenueResponse {
        summary,
        view,
        series,
        currency: state.config.currency.clone(),
    }))
}

pub async fn list_reservations(State(state): State<AppState>) -> Json<Vec<Stored<ReservationRecord>>> {
    let data = state.data.lock().await;
    Json(
        data.reservations
            .iter()
            .map(|(id, record)| Stored {
                id,
                record: record.clone(),
            })
            .collect(),
    )
}

pub async fn add_reservation(
    State(state): State<AppState>,
    Json(reservation): Json<ReservationRecord>,
) -> Result<Json<CreatedResponse>, AppError> {
    if reservation.date.trim().is_empty() {
        return Err(AppError::bad_request("reservation date is required"));
    }
    let id = state
        .write(Topic::Reservations, |data| data.reservations.insert(reservation))
        .await?;
    notifier::refresh(&state).await;

    info!(id, "reservation saved");
    Ok(Json(CreatedResponse { id }))
}

pub async fn notifications(State(state): State<AppState>) -> Json<NotificationsResponse> {
    let upcoming = state.upcoming.read().await.clone();
    Json(NotificationsResponse { upcoming })
}

pub async fn timeline(State(state): State<AppState>) -> Json<TimelineView> {
    if !state.timeline.render(&state).await {
        warn!("timeline render superseded by a newer one");
    }
    let view = state.timeline.displayed().await.unwrap_or_else(|| TimelineView {
        generation: 0,
        slots: empty_slots(),
    });
    Json(view)
}

pub async fn list_services(State(state): State<AppState>) -> Json<Vec<String>> {
    let data = state.data.lock().await;
    Json(data.service_names())
}

pub async fn add_service(
    State(state): State<AppState>,
    Json(payload): Json<NewServiceRequest>,
) -> Result<Json<CreatedResponse>, AppError> {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::bad_request("service name is required"));
    }
    let id = state
        .write(Topic::Dashboard, |data| data.services.insert(ServiceRecord { name }))
        .await?;
    Ok(Json(CreatedResponse { id }))
}

pub async fn list_reviews(
    State(state): State<AppState>,
    Query(query): Query<ReviewQuery>,
) -> Json<Vec<Stored<ReviewRecord>>> {
    let service = review_filter(&query);
    let data = state.data.lock().await;
    Json(
        data.reviews
            .iter()
            .filter(|(_, review)| service.is_none_or(|wanted| review.service == wanted))
            .map(|(id, record)| Stored {
                id,
                record: record.clone(),
            })
            .collect(),
    )
}

fn review_filter(query: &ReviewQuery) -> Option<&str> {
    query
        .service
        .as_deref()
        .filter(|service| !service.is_empty() && *service != "All")
}

pub async fn add_review(
    State(state): State<AppState>,
    Json(payload): Json<NewReviewRequest>,
) -> Result<Json<CreatedResponse>, AppError> {
    if payload.name.trim().is_empty() || payload.service.trim().is_empty() {
        return Err(AppError::bad_request("name and service are required"));
    }
    let review = ReviewRecord {
        name: payload.name.trim().to_string(),
        service: payload.service.trim().to_string(),
        rating: payload.rating.min(5),
        message: payload.message,
        date: display_date(Local::now()),
    };
    let id = state
        .write(Topic::Dashboard, |data| data.reviews.insert(review))
        .await?;

    info!(id, "review submitted");
    Ok(Json(CreatedResponse { id }))
}

fn csv_download(filename: &str, body: String) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
}

pub async fn export_clients(State(state): State<AppState>) -> impl IntoResponse {
    let data = state.data.lock().await;
    csv_download("clients.csv", clients_csv(&data.clients))
}

pub async fn export_revenue(
    State(state): State<AppState>,
    Query(query): Query<RevenueQuery>,
) -> impl IntoResponse {
    let now = Local::now();
    let year = query.year.unwrap_or_else(|| now.year());
    let data = state.data.lock().await;
    let summary = revenue_summary(&data.clients, year, now.date_naive());
    let generated = now.format("%Y-%m-%d %H:%M:%S").to_string();
    csv_download(
        "revenue-summary.csv",
        revenue_csv(&summary, &state.config.currency, &generated),
    )
}

pub async fn export_reviews(
    State(state): State<AppState>,
    Query(query): Query<ReviewQuery>,
) -> impl IntoResponse {
    let service = review_filter(&query);
    let data = state.data.lock().await;
    let reviews = data
        .reviews
        .filter(|review| service.is_none_or(|wanted| review.service == wanted));
    csv_download("reviews.csv", reviews_csv(&reviews))
}

pub async fn share(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<ShareResponse>, AppError> {
    let date = query
        .date
        .filter(|date| !date.trim().is_empty())
        .unwrap_or_else(|| local_date_str(Local::now()));

    let data = state.data.lock().await;
    let href = share_for_date(&data.reservations, &date, &state.config.salon_name)
        .ok_or_else(|| AppError::not_found(format!("No reservations to share for {date}")))?;

    info!(%date, "share link built");
    Ok(Json(ShareResponse { date, href }))
}

pub async fn events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = state.sync.stream().map(|signal| {
        let payload = serde_json::to_string(&signal).unwrap_or_else(|_| "{}".to_string());
        Ok(Event::default().event(UPDATE).data(payload))
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}
