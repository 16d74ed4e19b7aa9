use chrono::{Duration as ChronoDuration, Local};
use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::{sleep, timeout};

#[derive(Debug, Deserialize)]
struct DashboardResponse {
    stats: DashboardStats,
    trend: Trend,
}

#[derive(Debug, Deserialize)]
struct DashboardStats {
    total_clients: usize,
    todays_visits: usize,
    weekly_visits: Vec<u64>,
}

#[derive(Debug, Deserialize)]
struct Trend {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ClientListResponse {
    clients: Vec<ClientRow>,
    summary: SummaryCards,
}

#[derive(Debug, Deserialize)]
struct ClientRow {
    id: u64,
    name: String,
    payment_method: String,
}

#[derive(Debug, Deserialize)]
struct SummaryCards {
    total: usize,
    new_clients: usize,
    returning_clients: usize,
}

#[derive(Debug, Deserialize)]
struct Created {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct Notifications {
    upcoming: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TimelineView {
    slots: Vec<HourSlot>,
}

#[derive(Debug, Deserialize)]
struct HourSlot {
    hour: u32,
    cards: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ReviewRow {
    name: String,
    service: String,
    rating: u8,
    date: String,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));
static PHONE_SEQ: AtomicU32 = AtomicU32::new(0);

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("salon_desk_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

fn unique_phone() -> String {
    let seq = PHONE_SEQ.fetch_add(1, Ordering::SeqCst);
    format!("0{}{seq:03}", std::process::id())
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/dashboard")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_salon_desk"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
        .env("SEED_SERVICES", "Braids,Nails")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn dashboard(client: &Client, server: &TestServer) -> DashboardResponse {
    client
        .get(format!("{}/api/dashboard", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn add_client(client: &Client, server: &TestServer, name: &str, phone: &str) -> u64 {
    let response = client
        .post(format!("{}/api/clients", server.base_url))
        .json(&serde_json::json!({
            "name": name,
            "phone": phone,
            "gender": "Female",
            "services": ["Braids"],
            "amount": "40",
            "time": "10:00",
            "staff": "Linda"
        }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    response.json::<Created>().await.unwrap().id
}

async fn clients_with_phone(client: &Client, server: &TestServer, phone: &str) -> ClientListResponse {
    client
        .get(format!("{}/api/clients", server.base_url))
        .query(&[("search", phone)])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_add_client_updates_dashboard() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = dashboard(&client, &server).await;
    add_client(&client, &server, "Ama", &unique_phone()).await;
    let after = dashboard(&client, &server).await;

    assert_eq!(after.stats.todays_visits, before.stats.todays_visits + 1);
    assert_eq!(after.stats.total_clients, before.stats.total_clients + 1);
    assert_eq!(after.stats.weekly_visits.len(), 7);
    assert!(after.trend.text.contains("yesterday") || after.trend.text == "No revenue yet");
}

#[tokio::test]
async fn http_add_client_requires_fields() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/clients", server.base_url))
        .json(&serde_json::json!({ "name": "Ama", "phone": "1", "services": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_delete_by_phone_removes_first_match_only() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let phone = unique_phone();

    let first = add_client(&client, &server, "First", &phone).await;
    let second = add_client(&client, &server, "Second", &phone).await;

    let listed = clients_with_phone(&client, &server, &phone).await;
    assert_eq!(listed.summary.total, 2);
    assert_eq!(listed.summary.new_clients, 1);
    assert_eq!(listed.summary.returning_clients, 1);
    assert_eq!(listed.clients[0].payment_method, "Cash");

    let response = client
        .delete(format!("{}/api/clients/by-phone/{phone}", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let remaining = clients_with_phone(&client, &server, &phone).await;
    assert_eq!(remaining.clients.len(), 1);
    assert_eq!(remaining.clients[0].id, second);
    assert_eq!(remaining.clients[0].name, "Second");
    assert_ne!(first, second);
}

#[tokio::test]
async fn http_clients_csv_escapes_fields() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    add_client(&client, &server, "O'Brien, \"the best\"", &unique_phone()).await;

    let response = client
        .get(format!("{}/export/clients.csv", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let body = response.text().await.unwrap();
    assert!(body.starts_with("Name,Phone,Gender,Services,Date,Time,Staff,Amount,Payment"));
    assert!(body.contains("\"O'Brien, \"\"the best\"\"\""));
}

#[tokio::test]
async fn http_reservation_within_the_hour_is_flagged() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let now = Local::now();
    for (name, offset) in [("Soon", 30), ("Later", 90), ("Missed", -5)] {
        let at = now + ChronoDuration::minutes(offset);
        let response = client
            .post(format!("{}/api/reservations", server.base_url))
            .json(&serde_json::json!({
                "clientName": name,
                "phone": "020",
                "services": ["Nails"],
                "date": at.format("%Y-%m-%d").to_string(),
                "time": at.format("%H:%M").to_string()
            }))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
    }

    let notes: Notifications = client
        .get(format!("{}/api/notifications", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(notes.upcoming.iter().any(|line| line.contains("Soon (Nails)")));
    assert!(!notes.upcoming.iter().any(|line| line.contains("Later")));
    assert!(!notes.upcoming.iter().any(|line| line.contains("Missed")));
}

#[tokio::test]
async fn http_timeline_has_fixed_hours() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/reservations", server.base_url))
        .json(&serde_json::json!({
            "clientName": "Planner",
            "date": "2030-01-01",
            "time": "11:30 AM"
        }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let view: TimelineView = client
        .get(format!("{}/api/timeline", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(view.slots.len(), 17);
    let eleven = view.slots.iter().find(|slot| slot.hour == 11).unwrap();
    assert!(eleven.cards.iter().any(|card| card["name"] == "Planner"));
}

#[tokio::test]
async fn http_services_seeded_and_writes_are_broadcast() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let names: Vec<String> = client
        .get(format!("{}/api/services", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(names.starts_with(&["Braids".to_string(), "Nails".to_string()]));

    let mut events = client
        .get(format!("{}/api/events", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(events.status().is_success());

    let response = client
        .post(format!("{}/api/services", server.base_url))
        .json(&serde_json::json!({ "name": "Pedicure" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let chunk = timeout(Duration::from_secs(3), events.chunk())
        .await
        .expect("no sync signal received")
        .unwrap()
        .expect("event stream closed");
    let text = String::from_utf8_lossy(&chunk);
    assert!(text.contains("event: update"));
    assert!(text.contains("dashboard"));
}

#[tokio::test]
async fn http_share_without_reservations_is_not_found() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/api/share", server.base_url))
        .query(&[("date", "1990-01-01")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

async fn reviews_for(client: &Client, server: &TestServer, service: &str) -> Vec<ReviewRow> {
    client
        .get(format!("{}/api/reviews", server.base_url))
        .query(&[("service", service)])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_reviews_submit_filter_and_export() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/reviews", server.base_url))
        .json(&serde_json::json!({ "name": "", "service": "Glow Facial", "rating": 4 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    for (name, service, rating, message) in [
        ("Adjoa", "Glow Facial", 9, "Lovely, thanks"),
        ("Kwame", "Beard Trim", 3, "ok"),
    ] {
        let response = client
            .post(format!("{}/api/reviews", server.base_url))
            .json(&serde_json::json!({
                "name": name,
                "service": service,
                "rating": rating,
                "message": message
            }))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
    }
    let today = Local::now().format("%-m/%-d/%Y").to_string();

    let facials = reviews_for(&client, &server, "Glow Facial").await;
    assert!(facials.iter().all(|review| review.service == "Glow Facial"));
    let adjoa = facials.iter().find(|review| review.name == "Adjoa").unwrap();
    assert_eq!(adjoa.rating, 5);
    assert_eq!(adjoa.date, today);

    for unfiltered in ["All", ""] {
        let all = reviews_for(&client, &server, unfiltered).await;
        assert!(all.iter().any(|review| review.name == "Adjoa"));
        assert!(all.iter().any(|review| review.name == "Kwame"));
    }

    let response = client
        .get(format!("{}/export/reviews.csv", server.base_url))
        .query(&[("service", "Glow Facial")])
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let body = response.text().await.unwrap();
    let mut lines = body.lines();
    assert_eq!(lines.next(), Some("Name,Service,Rating,Message,Date"));
    assert!(body.contains(&format!("Adjoa,Glow Facial,⭐⭐⭐⭐⭐,\"Lovely, thanks\",{today}")));
    assert!(!body.contains("Kwame"));
}
