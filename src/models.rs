use serde::{Deserialize, Deserializer, Serialize};

/// A completed visit. Created from the add-client form, never edited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredClient")]
pub struct ClientRecord {
    pub name: String,
    pub phone: String,
    pub gender: String,
    pub services: Vec<String>,
    /// Kept as entered; parsed leniently wherever money is summed.
    pub amount: String,
    pub date: String,
    pub time: String,
    pub staff: String,
    pub photo_data: String,
    pub payment_method: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredReservation")]
pub struct ReservationRecord {
    pub client_name: String,
    pub phone: String,
    pub services: Vec<String>,
    pub date: String,
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time24: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub date: String,
}

/// Older records carry a single `service` string, newer ones a `services`
/// list. Both shapes are accepted on read and normalised to a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceShape {
    Single(String),
    Many(Vec<String>),
    Missing,
}

impl ServiceShape {
    fn from_fields(service: Option<String>, services: Option<Vec<String>>) -> Self {
        match (services, service) {
            (Some(list), _) => ServiceShape::Many(list),
            (None, Some(single)) if !single.is_empty() => ServiceShape::Single(single),
            _ => ServiceShape::Missing,
        }
    }

    pub fn into_list(self) -> Vec<String> {
        match self {
            ServiceShape::Single(name) => vec![name],
            ServiceShape::Many(list) => list,
            ServiceShape::Missing => Vec::new(),
        }
    }
}

#[derive(Deserialize)]
struct StoredClient {
    #[serde(default)]
    name: String,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    gender: String,
    #[serde(default)]
    service: Option<String>,
    #[serde(default)]
    services: Option<Vec<String>>,
    #[serde(default, deserialize_with = "amount_text")]
    amount: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    time: String,
    #[serde(default)]
    staff: String,
    #[serde(default, alias = "photoData")]
    photo_data: Option<String>,
    #[serde(default, alias = "paymentMethod")]
    payment_method: Option<String>,
}

impl From<StoredClient> for ClientRecord {
    fn from(raw: StoredClient) -> Self {
        Self {
            services: ServiceShape::from_fields(raw.service, raw.services).into_list(),
            name: raw.name,
            phone: raw.phone,
            gender: raw.gender,
            amount: raw.amount,
            date: raw.date,
            time: raw.time,
            staff: raw.staff,
            photo_data: raw.photo_data.unwrap_or_default(),
            payment_method: raw.payment_method.unwrap_or_default(),
        }
    }
}

#[derive(Deserialize)]
struct StoredReservation {
    #[serde(default, alias = "clientName", alias = "ClientName")]
    client_name: Option<String>,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    service: Option<String>,
    #[serde(default)]
    services: Option<Vec<String>>,
    #[serde(default)]
    date: String,
    #[serde(default)]
    time: String,
    #[serde(default)]
    time24: Option<String>,
    #[serde(default)]
    timestamp: Option<f64>,
}

impl From<StoredReservation> for ReservationRecord {
    fn from(raw: StoredReservation) -> Self {
        Self {
            services: ServiceShape::from_fields(raw.service, raw.services).into_list(),
            client_name: raw.client_name.unwrap_or_default(),
            phone: raw.phone,
            date: raw.date,
            time: raw.time,
            time24: raw.time24.filter(|value| !value.is_empty()),
            timestamp: raw.timestamp,
        }
    }
}

fn amount_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Text(String),
        Number(f64),
    }

    Ok(match Option::<Amount>::deserialize(deserializer)? {
        Some(Amount::Text(text)) => text,
        Some(Amount::Number(value)) => value.to_string(),
        None => String::new(),
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stored<T> {
    pub id: u64,
    #[serde(flatten)]
    pub record: T,
}

#[derive(Debug, Deserialize)]
pub struct NewClientRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub staff: String,
    #[serde(default)]
    pub photo_data: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewReviewRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct NewServiceRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClientQuery {
    pub search: Option<String>,
    pub service: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RevenueQuery {
    pub year: Option<i32>,
    pub view: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReviewQuery {
    pub service: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub text: String,
    pub direction: TrendDirection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_clients: usize,
    pub todays_visits: usize,
    pub daily_revenue: f64,
    pub monthly_revenue: f64,
    pub yearly_revenue: f64,
    pub available_services: usize,
    pub weekday_labels: Vec<String>,
    pub weekly_visits: [u64; 7],
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryCards {
    pub total: usize,
    pub new_clients: usize,
    pub returning_clients: usize,
    pub female: usize,
    pub male: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClientListResponse {
    pub clients: Vec<Stored<ClientRecord>>,
    pub summary: SummaryCards,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub stats: DashboardStats,
    pub trend: Trend,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub label: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueSummary {
    pub year: i32,
    pub daily: Vec<Bucket>,
    pub weekly: Vec<Bucket>,
    pub monthly: Vec<Bucket>,
    pub yearly_total: f64,
    pub today_total: f64,
    pub week_total: f64,
    pub month_total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevenueView {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RevenueView {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            "yearly" => Some(Self::Yearly),
            _ => None,
        }
    }
}

/// Data handed to the chart renderer: one label per value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RevenueResponse {
    pub summary: RevenueSummary,
    pub view: RevenueView,
    pub series: ChartSeries,
    pub currency: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationsResponse {
    pub upcoming: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ShareResponse {
    pub date: String,
    pub href: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: u64,
}
