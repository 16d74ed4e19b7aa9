pub fn render_index(salon_name: &str, currency: &str) -> String {
    INDEX_HTML
        .replace("{{SALON}}", &escape_html(salon_name))
        .replace("{{CURRENCY}}", &escape_html(currency))
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{SALON}}</title>
  <style>
    :root {
      --bg-1: #f8f3e6;
      --ink: #2b2a28;
      --accent: #aa2626;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.9);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      padding: 24px 18px 48px;
    }

    .app {
      width: min(1100px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    .card {
      background: var(--card);
      border-radius: 22px;
      box-shadow: var(--shadow);
      padding: 24px;
      display: grid;
      gap: 16px;
    }

    h1, h2 {
      margin: 0;
      font-family: "Georgia", serif;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 14px;
    }

    .stat {
      background: white;
      border-radius: 16px;
      padding: 14px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 6px;
    }

    .stat .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: #8b857d;
    }

    .stat .value {
      font-size: 1.5rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    .trend-indicator.up { color: #2d7a4b; }
    .trend-indicator.down { color: #c63b2b; }

    form {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 10px;
    }

    input, select {
      padding: 10px 12px;
      border-radius: 10px;
      border: 1px solid rgba(47, 72, 88, 0.2);
      font: inherit;
    }

    button, .button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 10px 18px;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
      text-decoration: none;
      text-align: center;
    }

    table {
      width: 100%;
      border-collapse: collapse;
    }

    th, td {
      text-align: left;
      padding: 8px;
      border-bottom: 1px solid rgba(47, 72, 88, 0.1);
    }

    #chart, #revenue-chart {
      width: 100%;
      height: 240px;
      display: block;
    }

    .chart-line { fill: none; stroke: var(--accent); stroke-width: 3; }
    .chart-point { fill: white; stroke: var(--accent); stroke-width: 2; }
    .chart-bar { fill: var(--accent-2); }
    .chart-grid { stroke: rgba(47, 72, 88, 0.12); }
    .chart-label { fill: #7a746d; font-size: 11px; }

    .timeline {
      display: grid;
      gap: 8px;
    }

    .hour-block {
      display: grid;
      grid-template-columns: 70px 1fr;
      gap: 10px;
      border-top: 1px dashed rgba(47, 72, 88, 0.2);
      padding-top: 6px;
    }

    .reservation-card {
      background: white;
      border-radius: 12px;
      padding: 8px 12px;
      margin-bottom: 6px;
      border-left: 4px solid var(--accent);
    }

    .reviews { list-style: none; padding: 0; }
    .review-card {
      background: white;
      border-radius: 12px;
      padding: 8px 12px;
      margin-bottom: 6px;
      border-left: 4px solid var(--accent-2);
    }

    .toolbar {
      display: flex;
      flex-wrap: wrap;
      gap: 10px;
      align-items: center;
    }

    #toast {
      position: fixed;
      bottom: 24px;
      right: 24px;
      background: var(--accent-2);
      color: white;
      padding: 12px 18px;
      border-radius: 12px;
      opacity: 0;
      transition: opacity 200ms ease;
    }

    #toast.show { opacity: 1; }
  </style>
</head>
<body>
  <main class="app">
    <header class="card">
      <h1>{{SALON}}</h1>
      <span id="revenueTrend" class="trend-indicator">No revenue yet</span>
    </header>

    <section class="card">
      <div class="panel">
        <div class="stat"><span class="label">Total clients</span><span id="totalClients" class="value">0</span></div>
        <div class="stat"><span class="label">Today's visits</span><span id="todaysVisits" class="value">0</span></div>
        <div class="stat"><span class="label">Daily revenue</span><span id="dailyRevenue" class="value">{{CURRENCY}} 0.00</span></div>
        <div class="stat"><span class="label">Monthly revenue</span><span id="monthlyRevenue" class="value">{{CURRENCY}} 0.00</span></div>
        <div class="stat"><span class="label">Services</span><span id="availableServices" class="value">0</span></div>
      </div>
      <h2>Visits by weekday</h2>
      <svg id="chart" role="img" aria-label="Visits by weekday"></svg>
    </section>

    <section class="card">
      <h2>Upcoming within the hour</h2>
      <ul id="notificationList"><li>No upcoming bookings</li></ul>
    </section>

    <section class="card">
      <h2>Add client</h2>
      <form id="addClientForm">
        <input id="clientName" placeholder="Name" required />
        <input id="clientPhone" placeholder="Phone" required />
        <select id="clientGender" required>
          <option value="">Gender</option>
          <option>Female</option>
          <option>Male</option>
        </select>
        <input id="clientServices" placeholder="Services (comma separated)" required />
        <input id="clientAmount" placeholder="Amount" />
        <input id="clientDate" type="date" />
        <input id="clientTime" type="time" required />
        <input id="clientStaff" placeholder="Staff" required />
        <select id="clientPaymentMethod">
          <option>Cash</option>
          <option>Mobile Money</option>
          <option>Card</option>
        </select>
        <input id="clientPhoto" type="file" accept="image/*" />
        <button type="submit">Save client</button>
      </form>
    </section>

    <section class="card">
      <div class="toolbar">
        <h2>Clients</h2>
        <input id="clientSearchInput" placeholder="Search" />
        <select id="serviceFilter"><option value="">All services</option></select>
        <a class="button" href="/export/clients.csv">Export CSV</a>
      </div>
      <div class="panel">
        <div class="stat"><span class="label">Listed</span><span id="totalClientsCard" class="value">0</span></div>
        <div class="stat"><span class="label">New</span><span id="newClients" class="value">0</span></div>
        <div class="stat"><span class="label">Returning</span><span id="returningClients" class="value">0</span></div>
        <div class="stat"><span class="label">Female</span><span id="femaleClients" class="value">0</span></div>
        <div class="stat"><span class="label">Male</span><span id="maleClients" class="value">0</span></div>
      </div>
      <table id="clientsTable">
        <thead>
          <tr><th>Name</th><th>Phone</th><th>Gender</th><th>Services</th><th>Date</th><th>Time</th><th>Staff</th><th>Amount</th><th>Payment</th><th></th></tr>
        </thead>
        <tbody></tbody>
      </table>
    </section>

    <section class="card">
      <div class="toolbar">
        <h2>Revenue</h2>
        <input id="yearSelect" type="number" min="2000" max="2100" />
        <select id="revenueView">
          <option value="daily">Daily</option>
          <option value="weekly">Weekly</option>
          <option value="monthly" selected>Monthly</option>
          <option value="yearly">Yearly</option>
        </select>
        <a class="button" id="exportRevenue" href="/export/revenue.csv">Export CSV</a>
      </div>
      <table id="revenueTable"><tbody></tbody></table>
      <svg id="revenue-chart" role="img" aria-label="Revenue"></svg>
    </section>

    <section class="card">
      <div class="toolbar">
        <h2>Reservations</h2>
        <input id="shareDate" type="date" />
        <button id="shareTodayBtn" type="button">Share by email</button>
      </div>
      <div id="timelineHours" class="timeline"></div>
    </section>
    <section class="card">
      <div class="toolbar">
        <h2>Reviews</h2>
        <select id="reviewFilter"><option value="All">All services</option></select>
        <a class="button" id="exportReviews" href="/export/reviews.csv">Export CSV</a>
      </div>
      <form id="reviewForm">
        <input id="reviewName" placeholder="Your name" required />
        <select id="reviewService" required></select>
        <select id="reviewRating">
          <option value="5">5 stars</option>
          <option value="4">4 stars</option>
          <option value="3">3 stars</option>
          <option value="2">2 stars</option>
          <option value="1">1 star</option>
        </select>
        <input id="reviewMessage" placeholder="Message" />
        <button type="submit">Submit review</button>
      </form>
      <ul id="reviewsContainer" class="reviews"></ul>
    </section>
  </main>
  <div id="toast"></div>

  <script>
    const currency = '{{CURRENCY}}';
    const $ = (id) => document.getElementById(id);

    const esc = (value) => String(value ?? '').replace(/[&<>"']/g, (ch) => ({
      '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#39;'
    })[ch]);

    const money = (value) => `${currency} ${Number(value || 0).toFixed(2)}`;

    const showToast = (message) => {
      const toast = $('toast');
      toast.textContent = message;
      toast.classList.add('show');
      setTimeout(() => toast.classList.remove('show'), 3000);
    };

    const getJson = async (url) => {
      const res = await fetch(url);
      if (!res.ok) {
        throw new Error((await res.text()) || `Request failed: ${url}`);
      }
      return res.json();
    };

    const renderLineChart = (svg, labels, values) => {
      const width = 600;
      const height = 240;
      const padX = 40;
      const padY = 30;
      const max = Math.max(1, ...values);
      const step = labels.length > 1 ? (width - padX * 2) / (labels.length - 1) : 0;
      const x = (i) => padX + i * step;
      const y = (v) => height - padY - (v / max) * (height - padY * 2);
      const path = values.map((v, i) => `${i === 0 ? 'M' : 'L'} ${x(i).toFixed(2)} ${y(v).toFixed(2)}`).join(' ');
      const points = values.map((v, i) => `<circle class="chart-point" cx="${x(i)}" cy="${y(v)}" r="4" />`).join('');
      const names = labels.map((l, i) => `<text class="chart-label" x="${x(i)}" y="${height - 8}" text-anchor="middle">${esc(l)}</text>`).join('');
      svg.setAttribute('viewBox', `0 0 ${width} ${height}`);
      svg.innerHTML = `<line class="chart-grid" x1="${padX}" y1="${y(0)}" x2="${width - padX}" y2="${y(0)}" />
        <path class="chart-line" d="${path}" />${points}${names}`;
    };

    const renderBarChart = (svg, labels, values) => {
      const width = 600;
      const height = 240;
      const pad = 30;
      if (!values.length) {
        svg.innerHTML = '<text class="chart-label" x="50%" y="50%" text-anchor="middle">No data yet</text>';
        return;
      }
      const max = Math.max(1, ...values);
      const slot = (width - pad * 2) / values.length;
      const bars = values.map((v, i) => {
        const h = (v / max) * (height - pad * 2);
        const bx = pad + i * slot + slot * 0.15;
        return `<rect class="chart-bar" x="${bx}" y="${height - pad - h}" width="${slot * 0.7}" height="${h}" rx="6" />
          <text class="chart-label" x="${bx + slot * 0.35}" y="${height - pad - h - 4}" text-anchor="middle">${esc(money(v))}</text>
          <text class="chart-label" x="${bx + slot * 0.35}" y="${height - 8}" text-anchor="middle">${esc(labels[i])}</text>`;
      }).join('');
      svg.setAttribute('viewBox', `0 0 ${width} ${height}`);
      svg.innerHTML = bars;
    };

    const loadDashboard = async () => {
      const { stats, trend } = await getJson('/api/dashboard');
      $('totalClients').textContent = stats.total_clients;
      $('todaysVisits').textContent = stats.todays_visits;
      $('dailyRevenue').textContent = money(stats.daily_revenue);
      $('monthlyRevenue').textContent = money(stats.monthly_revenue);
      $('availableServices').textContent = stats.available_services;
      const trendEl = $('revenueTrend');
      trendEl.textContent = trend.text;
      trendEl.className = `trend-indicator ${trend.direction === 'flat' ? '' : trend.direction}`;
      renderLineChart($('chart'), stats.weekday_labels, stats.weekly_visits);
    };

    const loadServices = async () => {
      const names = await getJson('/api/services');
      const filter = $('serviceFilter');
      const current = filter.value;
      filter.innerHTML = '<option value="">All services</option>' +
        names.map((name) => `<option value="${esc(name)}">${esc(name)}</option>`).join('');
      filter.value = current;

      const reviewFilter = $('reviewFilter');
      const currentReview = reviewFilter.value;
      reviewFilter.innerHTML = '<option value="All">All services</option>' +
        names.map((name) => `<option value="${esc(name)}">${esc(name)}</option>`).join('');
      reviewFilter.value = currentReview || 'All';
      $('reviewService').innerHTML = names.map((name) => `<option value="${esc(name)}">${esc(name)}</option>`).join('');
    };

    const loadReviews = async () => {
      const service = $('reviewFilter').value || 'All';
      const params = new URLSearchParams({ service });
      const reviews = await getJson(`/api/reviews?${params}`);
      $('exportReviews').href = `/export/reviews.csv?${params}`;
      $('reviewsContainer').innerHTML = reviews.length
        ? reviews.map((r) => `
          <li class="review-card">
            <strong>${esc(r.name)}</strong> on ${esc(r.service)}
            <span class="stars">${'&#11088;'.repeat(r.rating)}</span><br>
            ${esc(r.message)}<br>
            <small>${esc(r.date)}</small>
          </li>`).join('')
        : '<li>No reviews yet</li>';
    };

    const loadClients = async () => {
      const params = new URLSearchParams({
        search: $('clientSearchInput').value,
        service: $('serviceFilter').value
      });
      const { clients, summary } = await getJson(`/api/clients?${params}`);
      $('clientsTable').querySelector('tbody').innerHTML = clients.map((c) => `
        <tr>
          <td>${esc(c.name)}</td><td>${esc(c.phone)}</td><td>${esc(c.gender)}</td>
          <td>${esc(c.services.join(', ') || '-')}</td><td>${esc(c.date)}</td><td>${esc(c.time)}</td>
          <td>${esc(c.staff || '-')}</td><td>${esc(c.amount)}</td><td>${esc(c.payment_method || '-')}</td>
          <td><button type="button" data-phone="${esc(c.phone)}">Delete</button></td>
        </tr>`).join('');
      $('totalClientsCard').textContent = summary.total;
      $('newClients').textContent = summary.new_clients;
      $('returningClients').textContent = summary.returning_clients;
      $('femaleClients').textContent = summary.female;
      $('maleClients').textContent = summary.male;
    };

    const loadRevenue = async () => {
      const year = $('yearSelect').value;
      const view = $('revenueView').value;
      const { summary, series } = await getJson(`/api/revenue?year=${year}&view=${view}`);
      $('revenueTable').querySelector('tbody').innerHTML = `
        <tr><td>Daily Revenue</td><td>${money(summary.today_total)}</td></tr>
        <tr><td>Weekly Revenue</td><td>${money(summary.week_total)}</td></tr>
        <tr><td>Monthly Revenue</td><td>${money(summary.month_total)}</td></tr>
        <tr><td>Yearly Revenue</td><td>${money(summary.yearly_total)}</td></tr>`;
      $('exportRevenue').href = `/export/revenue.csv?year=${year}`;
      renderBarChart($('revenue-chart'), series.labels, series.values);
    };

    const loadNotifications = async () => {
      const { upcoming } = await getJson('/api/notifications');
      $('notificationList').innerHTML = upcoming.length
        ? upcoming.map((item) => `<li>${esc(item)}</li>`).join('')
        : '<li>No upcoming bookings</li>';
    };

    const loadTimeline = async () => {
      const { slots } = await getJson('/api/timeline');
      $('timelineHours').innerHTML = slots.map((slot) => `
        <div class="hour-block" data-hour="${slot.hour}">
          <strong class="time-label">${esc(slot.label)}</strong>
          <div>${slot.cards.map((card) => `
            <div class="reservation-card">
              <strong>${esc(card.name)}</strong>
              <a href="${esc(card.share_href)}" title="Share via email">&#9993;</a><br>
              ${esc(card.phone)}<br>
              ${esc(card.date)} at ${esc(card.time)}<br>
              ${esc(card.services)}
            </div>`).join('')}</div>
        </div>`).join('');
    };

    const openMailto = (href) => {
      try {
        const a = document.createElement('a');
        a.href = href;
        a.style.display = 'none';
        document.body.appendChild(a);
        a.click();
        document.body.removeChild(a);
      } catch (err) {
        console.warn('[share] link click failed', err);
      }
      setTimeout(() => { window.location.href = href; }, 50);
    };

    const readPhoto = (input) => new Promise((resolve) => {
      const file = input.files && input.files[0];
      if (!file) {
        resolve('');
        return;
      }
      const reader = new FileReader();
      reader.onload = () => resolve(reader.result || '');
      reader.onerror = () => resolve('');
      reader.readAsDataURL(file);
    });

    const report = (err) => showToast(err.message);

    const refreshClients = () => Promise.all([loadDashboard(), loadClients(), loadServices(), loadRevenue(), loadReviews()]).catch(report);
    const refreshReservations = () => Promise.all([loadTimeline(), loadNotifications()]).catch(report);

    $('addClientForm').addEventListener('submit', async (event) => {
      event.preventDefault();
      const payload = {
        name: $('clientName').value,
        phone: $('clientPhone').value,
        gender: $('clientGender').value,
        services: $('clientServices').value.split(',').map((s) => s.trim()).filter(Boolean),
        amount: $('clientAmount').value,
        date: $('clientDate').value || null,
        time: $('clientTime').value,
        staff: $('clientStaff').value,
        payment_method: $('clientPaymentMethod').value,
        photo_data: await readPhoto($('clientPhoto'))
      };
      const res = await fetch('/api/clients', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify(payload)
      });
      if (!res.ok) {
        showToast(await res.text());
        return;
      }
      event.target.reset();
      showToast('Client saved successfully!');
      refreshClients();
    });

    $('clientsTable').addEventListener('click', async (event) => {
      const phone = event.target.dataset && event.target.dataset.phone;
      if (!phone) {
        return;
      }
      await fetch(`/api/clients/by-phone/${encodeURIComponent(phone)}`, { method: 'DELETE' });
      refreshClients();
    });

    $('reviewForm').addEventListener('submit', async (event) => {
      event.preventDefault();
      const res = await fetch('/api/reviews', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({
          name: $('reviewName').value,
          service: $('reviewService').value,
          rating: Number($('reviewRating').value),
          message: $('reviewMessage').value
        })
      });
      if (!res.ok) {
        showToast(await res.text());
        return;
      }
      event.target.reset();
      showToast('Thank you for your review!');
      loadReviews().catch(report);
    });

    $('reviewFilter').addEventListener('change', () => loadReviews().catch(report));
    $('clientSearchInput').addEventListener('input', () => loadClients().catch(report));
    $('serviceFilter').addEventListener('change', () => loadClients().catch(report));
    $('yearSelect').addEventListener('change', () => loadRevenue().catch(report));
    $('revenueView').addEventListener('change', () => loadRevenue().catch(report));

    $('shareTodayBtn').addEventListener('click', async () => {
      const params = $('shareDate').value ? `?date=${$('shareDate').value}` : '';
      const res = await fetch(`/api/share${params}`);
      if (!res.ok) {
        showToast(await res.text());
        return;
      }
      const { href } = await res.json();
      openMailto(href);
    });

    // Other open tabs write too; recompute whenever any of them does.
    if (typeof EventSource !== 'undefined') {
      const events = new EventSource('/api/events');
      events.addEventListener('update', (msg) => {
        const signal = JSON.parse(msg.data || '{}');
        if (signal.topic === 'reservations') {
          refreshReservations();
        } else {
          refreshClients();
        }
      });
    }

    $('yearSelect').value = new Date().getFullYear();
    refreshClients();
    refreshReservations();
    setInterval(() => loadNotifications().catch(report), 60 * 1000);
  </script>
</body>
</html>
"#;
