use crate::clock::{local_date_str, parse_local_date};
use crate::models::{
    Bucket, ChartSeries, ClientRecord, DashboardStats, RevenueSummary, RevenueView, SummaryCards,
    Trend, TrendDirection,
};
use crate::store::Collection;
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate};
use std::collections::{HashMap, HashSet};

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Reads the leading number of `text` the way a lenient form parser does:
/// `"40 cedis"` is 40, `"abc"` is 0.
pub fn parse_amount(text: &str) -> f64 {
    let trimmed = text.trim_start();
    let bytes = trimmed.as_bytes();
    let is_digit = |index: usize| bytes.get(index).is_some_and(u8::is_ascii_digit);

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_start = end;
    while is_digit(end) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let mut frac_end = end + 1;
        while is_digit(frac_end) {
            frac_end += 1;
        }
        let frac = frac_end - end - 1;
        if digits + frac > 0 {
            digits += frac;
            end = frac_end;
        }
    }
    if digits == 0 {
        return 0.0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_start = exp_end;
        while is_digit(exp_end) {
            exp_end += 1;
        }
        if exp_end > exp_start {
            end = exp_end;
        }
    }

    trimmed
        .get(..end)
        .and_then(|prefix| prefix.parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

pub fn revenue_trend(today: f64, yesterday: f64) -> Trend {
    let trend = |text: String, direction| Trend { text, direction };

    if yesterday == 0.0 {
        return if today > 0.0 {
            trend("🔼 +100% from yesterday".into(), TrendDirection::Up)
        } else if today < 0.0 {
            trend("🔽 -100% from yesterday".into(), TrendDirection::Down)
        } else {
            trend("No revenue yet".into(), TrendDirection::Flat)
        };
    }

    let diff = today - yesterday;
    let percent = (diff / yesterday * 100.0).abs();
    if diff > 0.0 {
        trend(format!("🔼 +{percent:.1}% from yesterday"), TrendDirection::Up)
    } else if diff < 0.0 {
        trend(format!("🔽 -{percent:.1}% from yesterday"), TrendDirection::Down)
    } else {
        trend("No change from yesterday".into(), TrendDirection::Flat)
    }
}

/// Compares the revenue of `today` with the day before, matching record
/// dates as exact strings.
pub fn trend_for_day(clients: &Collection<ClientRecord>, today: NaiveDate) -> Trend {
    let today_key = date_key(today);
    let yesterday_key = date_key(today - Duration::days(1));

    let mut today_total = 0.0;
    let mut yesterday_total = 0.0;
    clients.scan(|_, client| {
        if client.date == today_key {
            today_total += parse_amount(&client.amount);
        } else if client.date == yesterday_key {
            yesterday_total += parse_amount(&client.amount);
        }
    });

    revenue_trend(today_total, yesterday_total)
}

pub fn dashboard_stats(clients: &Collection<ClientRecord>, now: DateTime<Local>) -> DashboardStats {
    let today_key = local_date_str(now);
    let today = now.date_naive();

    let mut stats = DashboardStats {
        weekday_labels: WEEKDAY_LABELS.iter().map(|label| label.to_string()).collect(),
        ..DashboardStats::default()
    };
    let mut services = HashSet::new();
    let mut unique_clients = HashSet::new();

    clients.scan(|_, client| {
        unique_clients.insert((client.name.as_str(), client.phone.as_str()));
        services.extend(
            client
                .services
                .iter()
                .filter(|name| !name.is_empty())
                .map(String::as_str),
        );
        let amount = parse_amount(&client.amount);

        if client.date == today_key {
            stats.todays_visits += 1;
            stats.daily_revenue += amount;
        }

        if let Some(visit) = parse_local_date(&client.date) {
            if visit.year() == today.year() {
                stats.yearly_revenue += amount;
                if visit.month() == today.month() {
                    stats.monthly_revenue += amount;
                }
            }
            stats.weekly_visits[visit.weekday().num_days_from_sunday() as usize] += 1;
        }
    });

    stats.total_clients = unique_clients.len();
    stats.available_services = services.len();
    stats
}

/// Keeps clients whose name, phone, services or staff contain `search`
/// (case-insensitive) and, when `service` is set, who received it.
pub fn filter_clients<'a>(
    clients: &'a Collection<ClientRecord>,
    search: &str,
    service: &str,
) -> Vec<(u64, &'a ClientRecord)> {
    let needle = search.trim().to_lowercase();
    let mut matches = Vec::new();

    for (id, client) in clients.iter() {
        let services_text = client.services.join(", ");
        let matches_search = needle.is_empty()
            || client.name.to_lowercase().contains(&needle)
            || client.phone.to_lowercase().contains(&needle)
            || services_text.to_lowercase().contains(&needle)
            || client.staff.to_lowercase().contains(&needle);
        let matches_service = service.is_empty() || client.services.iter().any(|s| s == service);

        if matches_search && matches_service {
            matches.push((id, client));
        }
    }
    matches
}

/// First visit per phone counts as new, later ones as returning. Gender is
/// tallied only for the exact values `Female` and `Male`.
pub fn summary_cards(records: &[&ClientRecord]) -> SummaryCards {
    let mut seen_phones = HashSet::new();
    let mut cards = SummaryCards {
        total: records.len(),
        ..SummaryCards::default()
    };

    for client in records {
        if seen_phones.insert(client.phone.as_str()) {
            cards.new_clients += 1;
        } else {
            cards.returning_clients += 1;
        }
        match client.gender.as_str() {
            "Female" => cards.female += 1,
            "Male" => cards.male += 1,
            _ => {}
        }
    }
    cards
}

#[derive(Default)]
struct Buckets {
    order: Vec<Bucket>,
    index: HashMap<String, usize>,
}

impl Buckets {
    fn add(&mut self, label: String, amount: f64) {
        match self.index.get(&label) {
            Some(&slot) => self.order[slot].amount += amount,
            None => {
                self.index.insert(label.clone(), self.order.len());
                self.order.push(Bucket { label, amount });
            }
        }
    }

    fn total(&self, label: &str) -> f64 {
        self.index
            .get(label)
            .map_or(0.0, |&slot| self.order[slot].amount)
    }
}

/// Revenue of `year` bucketed per day, ISO week and month. Buckets keep the
/// order in which the scan first saw them.
pub fn revenue_summary(
    clients: &Collection<ClientRecord>,
    year: i32,
    today: NaiveDate,
) -> RevenueSummary {
    let mut daily = Buckets::default();
    let mut weekly = Buckets::default();
    let mut monthly = Buckets::default();
    let mut yearly_total = 0.0;

    clients.scan(|_, client| {
        if client.amount.is_empty() || client.date.is_empty() {
            return;
        }
        let Some(date) = parse_local_date(&client.date) else {
            return;
        };
        if date.year() != year {
            return;
        }
        let amount = parse_amount(&client.amount);
        daily.add(date_key(date), amount);
        weekly.add(week_label(date), amount);
        monthly.add(month_key(date), amount);
        yearly_total += amount;
    });

    RevenueSummary {
        year,
        today_total: daily.total(&date_key(today)),
        week_total: weekly.total(&week_label(today)),
        month_total: monthly.total(&month_key(today)),
        daily: daily.order,
        weekly: weekly.order,
        monthly: monthly.order,
        yearly_total,
    }
}

pub fn revenue_series(summary: &RevenueSummary, view: RevenueView) -> ChartSeries {
    let from_buckets = |buckets: &[Bucket]| ChartSeries {
        labels: buckets.iter().map(|bucket| bucket.label.clone()).collect(),
        values: buckets.iter().map(|bucket| bucket.amount).collect(),
    };

    match view {
        RevenueView::Daily => from_buckets(&summary.daily),
        RevenueView::Weekly => from_buckets(&summary.weekly),
        RevenueView::Monthly => from_buckets(&summary.monthly),
        RevenueView::Yearly => ChartSeries {
            labels: vec!["Total".to_string()],
            values: vec![summary.yearly_total],
        },
    }
}

fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

// Calendar year with the ISO week number, unpadded.
fn week_label(date: NaiveDate) -> String {
    format!("{}-W{}", date.year(), date.iso_week().week())
}
