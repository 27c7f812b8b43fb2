use crate::models::{Plant, PlantSummary, WaterLog};
use crate::schedule;
use chrono::{DateTime, Local, Utc};

pub fn render_dashboard(
    visible: &[&PlantSummary],
    total: usize,
    detail: Option<(&Plant, &[WaterLog])>,
    q: &str,
    show: &str,
    now: DateTime<Utc>,
) -> String {
    let cards = if visible.is_empty() {
        r#"<div class="small">No plants yet - add one with the form at left.</div>"#.to_string()
    } else {
        visible
            .iter()
            .map(|summary| plant_card(summary, now))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let detail_html = match detail {
        Some((plant, logs)) => detail_panel(plant, logs),
        None => String::new(),
    };

    let now_display = now.with_timezone(&Local).format("%b %d, %Y %H:%M").to_string();

    DASHBOARD_HTML
        .replace("{{Q}}", &escape_html(q))
        .replace("{{SHOW_ALL_SELECTED}}", if show == "due" { "" } else { "selected" })
        .replace("{{SHOW_DUE_SELECTED}}", if show == "due" { "selected" } else { "" })
        .replace("{{TOTAL}}", &total.to_string())
        .replace("{{SHOWING}}", &visible.len().to_string())
        .replace("{{CARDS}}", &cards)
        .replace("{{DETAIL}}", &detail_html)
        .replace("{{NOW}}", &now_display)
}

fn plant_card(summary: &PlantSummary, now: DateTime<Utc>) -> String {
    let plant = &summary.plant;

    let badge = match summary.next_watering.as_deref().and_then(schedule::parse_iso) {
        Some(next) if next <= now => r#"<div class="badge due">Water now</div>"#.to_string(),
        Some(next) => format!(
            r#"<div class="badge ok">Next: {}</div>"#,
            escape_html(&schedule::human_delta(next, now))
        ),
        None => r#"<div class="badge ok">No data</div>"#.to_string(),
    };

    let last_watered = summary
        .last_watered
        .as_deref()
        .and_then(schedule::display_datetime)
        .unwrap_or_else(|| "-".to_string());

    let subtitle = match plant.location.as_deref().filter(|l| !l.is_empty()) {
        Some(location) => format!(
            "{} &middot; {}",
            escape_html(plant.species.as_deref().unwrap_or("")),
            escape_html(location)
        ),
        None => escape_html(plant.species.as_deref().unwrap_or("")),
    };

    format!(
        r#"<div class="plant-card">
  <div class="plant-main">
    <div class="plant-head">
      <div>
        <div class="plant-name">{name}</div>
        <div class="small">{subtitle}</div>
      </div>
      {badge}
    </div>
    <div class="small plant-meta">Last watered: {last_watered} &middot; Interval: {interval}d</div>
  </div>
  <div class="plant-actions">
    <a class="btn" href="/plants/{id}">Open</a>
    <a class="btn" href="/plants/{id}/edit">Edit</a>
    <form method="post" action="/plants/{id}/delete">
      <button class="btn" type="submit" onclick="return confirm('Delete plant?');">Delete</button>
    </form>
  </div>
</div>"#,
        name = escape_html(&plant.name),
        subtitle = subtitle,
        badge = badge,
        last_watered = last_watered,
        interval = plant.water_interval_days,
        id = plant.id,
    )
}

fn detail_panel(plant: &Plant, logs: &[WaterLog]) -> String {
    let log_rows = logs
        .iter()
        .map(|log| {
            let when = schedule::display_datetime(&log.watered_at)
                .unwrap_or_else(|| log.watered_at.clone());
            format!(
                r#"<tr><td>{}</td><td class="small">{}</td></tr>"#,
                escape_html(&when),
                escape_html(log.note.as_deref().unwrap_or(""))
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let added = schedule::display_datetime(&plant.created_at).unwrap_or_default();

    DETAIL_HTML
        .replace("{{NAME}}", &escape_html(&plant.name))
        .replace("{{SPECIES}}", &escape_html(plant.species.as_deref().unwrap_or("")))
        .replace(
            "{{LOCATION}}",
            &escape_html(plant.location.as_deref().filter(|l| !l.is_empty()).unwrap_or("-")),
        )
        .replace("{{ADDED}}", &escape_html(&added))
        .replace(
            "{{NOTES}}",
            &escape_html(plant.notes.as_deref().filter(|n| !n.is_empty()).unwrap_or("-")),
        )
        .replace("{{INTERVAL}}", &plant.water_interval_days.to_string())
        .replace("{{ID}}", &plant.id.to_string())
        .replace("{{NOW_ISO}}", &schedule::now_iso())
        .replace("{{TODAY_DATE}}", &schedule::today_date_string())
        .replace("{{LOG_ROWS}}", &log_rows)
}

pub fn render_edit(plant: &Plant) -> String {
    EDIT_HTML
        .replace("{{NAME}}", &escape_html(&plant.name))
        .replace("{{SPECIES}}", &escape_html(plant.species.as_deref().unwrap_or("")))
        .replace("{{LOCATION}}", &escape_html(plant.location.as_deref().unwrap_or("")))
        .replace("{{INTERVAL}}", &plant.water_interval_days.to_string())
        .replace("{{NOTES}}", &escape_html(plant.notes.as_deref().unwrap_or("")))
        .replace("{{ID}}", &plant.id.to_string())
}

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Plant Watering Tracker</title>
  <style>
    :root {
      --bg: #fbf6f0;
      --card: #fffaf4;
      --muted: #6b5740;
      --accent: #b07a2f;
      --accent-2: #f2c57c;
      --green: #5aa469;
      --danger: #d9534f;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      padding: 28px;
      background: radial-gradient(700px 300px at 10% 10%, rgba(176, 122, 47, 0.06), transparent 20%),
        var(--bg);
      color: #2b2b2b;
      font-family: Inter, system-ui, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
    }

    .header {
      display: flex;
      align-items: center;
      gap: 16px;
      margin-bottom: 20px;
    }

    h1 {
      margin: 0;
      font-size: 22px;
    }

    .lead {
      color: var(--muted);
      font-size: 13px;
      margin-top: 6px;
    }

    .controls {
      margin-left: auto;
      display: flex;
      gap: 10px;
      align-items: center;
    }

    .btn {
      background: transparent;
      border: 1px solid rgba(0, 0, 0, 0.06);
      padding: 10px 14px;
      border-radius: 10px;
      cursor: pointer;
      font-weight: 700;
      font-size: 13px;
      color: inherit;
      text-decoration: none;
      display: inline-block;
    }

    .btn.primary {
      background: var(--accent);
      color: #111;
      border: none;
    }

    .grid {
      display: grid;
      grid-template-columns: 360px 1fr;
      gap: 22px;
      align-items: start;
    }

    .panel {
      background: var(--card);
      border-radius: 14px;
      padding: 16px;
      border: 1px solid rgba(0, 0, 0, 0.04);
      box-shadow: 0 10px 30px rgba(0, 0, 0, 0.04);
    }

    .form-row {
      margin-bottom: 10px;
    }

    label.small {
      display: block;
      font-size: 13px;
      color: var(--muted);
      margin-bottom: 6px;
    }

    input,
    select,
    textarea {
      width: 100%;
      padding: 10px;
      border-radius: 9px;
      border: 1px solid rgba(0, 0, 0, 0.06);
      font-size: 14px;
    }

    textarea {
      min-height: 120px;
      resize: vertical;
      font-family: monospace;
    }

    .list {
      display: flex;
      flex-direction: column;
      gap: 12px;
      margin-top: 12px;
    }

    .plant-card {
      display: flex;
      justify-content: space-between;
      align-items: flex-start;
      padding: 12px;
      border-radius: 12px;
      background: linear-gradient(180deg, #fff, #fffaf4);
      border: 1px solid rgba(0, 0, 0, 0.02);
    }

    .plant-main {
      flex: 1;
    }

    .plant-head {
      display: flex;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
    }

    .plant-name {
      font-weight: 800;
    }

    .plant-meta {
      margin-top: 10px;
    }

    .plant-actions {
      margin-left: 12px;
      display: flex;
      flex-direction: column;
      gap: 8px;
      align-items: flex-end;
    }

    .plant-actions form {
      margin: 0;
    }

    .badge {
      padding: 6px 8px;
      border-radius: 999px;
      font-weight: 700;
      font-size: 12px;
      white-space: nowrap;
    }

    .due {
      background: var(--danger);
      color: white;
    }

    .ok {
      background: var(--green);
      color: white;
    }

    .small {
      font-size: 12px;
      color: var(--muted);
    }

    .list-head {
      display: flex;
      justify-content: space-between;
      align-items: center;
    }

    .table {
      width: 100%;
      border-collapse: collapse;
      margin-top: 12px;
    }

    .table th {
      text-align: left;
      color: var(--muted);
      font-size: 13px;
      padding: 6px 0;
    }

    .table td {
      padding: 8px 0;
      border-top: 1px dashed rgba(0, 0, 0, 0.03);
      font-size: 14px;
    }

    .water-forms {
      margin-top: 8px;
      display: flex;
      gap: 8px;
      align-items: center;
      flex-wrap: wrap;
    }

    .water-forms input[type="text"],
    .water-forms input[type="date"] {
      width: auto;
    }

    .notes-body {
      white-space: pre-wrap;
    }

    .footer {
      margin-top: 18px;
      color: var(--muted);
      font-size: 13px;
      text-align: center;
    }

    @media (max-width: 900px) {
      .grid {
        grid-template-columns: 1fr;
      }
    }
  </style>
</head>
<body>
  <div class="header">
    <div>
      <h1>Plant Watering Tracker</h1>
      <div class="lead">Keep track of watering, locations and notes for your plants.</div>
    </div>
    <div class="controls">
      <a class="btn" href="/">Dashboard</a>
      <a class="btn" href="/plants/new">New Plant</a>
      <a class="btn" href="/export.csv">Export CSV</a>
      <button class="btn" type="button" onclick="clearAll()">Clear All</button>
    </div>
  </div>

  <div class="grid">
    <div>
      <div class="panel" id="new">
        <h3 style="margin-top:0">Quick Add Plant</h3>
        <form method="post" action="/plants/create">
          <div class="form-row">
            <label class="small">Name</label>
            <input name="name" placeholder="Monstera Deliciosa" required>
          </div>
          <div class="form-row">
            <label class="small">Species / Variety</label>
            <input name="species" placeholder="Monstera deliciosa">
          </div>
          <div class="form-row">
            <label class="small">Location (room/shelf)</label>
            <input name="location" placeholder="Living room / East shelf">
          </div>
          <div class="form-row">
            <label class="small">Water interval (days)</label>
            <input name="water_interval_days" type="number" min="1" value="7">
          </div>
          <div class="form-row">
            <label class="small">Notes</label>
            <textarea name="notes" placeholder="Light needs, fertilizer, etc"></textarea>
          </div>
          <div style="display:flex;gap:8px">
            <button class="btn primary" type="submit">Add Plant</button>
            <a class="btn" href="/">Cancel</a>
          </div>
        </form>
      </div>

      <div class="panel" style="margin-top:12px">
        <h3 style="margin-top:0">Filters</h3>
        <form method="get" action="/">
          <label class="small">Search</label>
          <input name="q" placeholder="name, species, location" value="{{Q}}">
          <label class="small" style="margin-top:8px">Show</label>
          <select name="show">
            <option value="all" {{SHOW_ALL_SELECTED}}>All plants</option>
            <option value="due" {{SHOW_DUE_SELECTED}}>Due for watering</option>
          </select>
          <div style="margin-top:8px;display:flex;gap:8px">
            <button class="btn" type="submit">Apply</button>
            <a class="btn" href="/">Reset</a>
          </div>
        </form>
      </div>
    </div>

    <div>
      <div class="panel">
        <div class="list-head">
          <div>
            <h2 style="margin:0">Plants</h2>
            <div class="small">Total: {{TOTAL}} &middot; Showing: {{SHOWING}}</div>
          </div>
          <div class="small">Updated: {{NOW}}</div>
        </div>
        <div class="list">
{{CARDS}}
        </div>
      </div>
{{DETAIL}}
      <div class="footer">Plant data saved to local SQLite &middot; {{NOW}}</div>
    </div>
  </div>

  <script>
    async function clearAll() {
      if (!confirm("Clear ALL plants and logs? This cannot be undone.")) return;
      let r = await fetch("/api/clear", { method: "POST" });
      let j = await r.json();
      alert("Deleted: " + (j.deleted_plants || 0) + " plants, " + (j.deleted_logs || 0) + " logs.");
      location.href = "/";
    }
  </script>
</body>
</html>
"#;

const DETAIL_HTML: &str = r#"      <div class="panel" style="margin-top:12px">
        <h3 style="margin-top:0">{{NAME}} &bull; {{SPECIES}}</h3>
        <div class="small">Location: {{LOCATION}} &middot; Added: {{ADDED}}</div>

        <div style="margin-top:12px">
          <h4 style="margin-bottom:6px">Notes</h4>
          <div class="small notes-body">{{NOTES}}</div>
        </div>

        <div style="margin-top:12px">
          <h4 style="margin-bottom:6px">Watering</h4>
          <div class="small">Interval: {{INTERVAL}} days</div>
          <div class="water-forms">
            <form method="post" action="/plants/{{ID}}/water">
              <input type="hidden" name="watered_at" value="{{NOW_ISO}}">
              <input type="text" name="note" placeholder="optional note">
              <button class="btn primary" type="submit">Log Water Now</button>
            </form>
            <form method="post" action="/plants/{{ID}}/water/date">
              <input type="date" name="date" value="{{TODAY_DATE}}">
              <button class="btn" type="submit">Log Date</button>
            </form>
          </div>

          <table class="table">
            <thead><tr><th>Date</th><th>Note</th></tr></thead>
            <tbody>
{{LOG_ROWS}}
            </tbody>
          </table>
        </div>
      </div>
"#;

const EDIT_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Edit Plant</title>
  <style>
    body {
      font-family: Inter, system-ui, "Segoe UI", Roboto, sans-serif;
      padding: 24px;
      background: #fbf6f0;
      color: #333;
    }

    .panel {
      background: white;
      padding: 18px;
      border-radius: 12px;
      max-width: 720px;
      margin: 24px auto;
      border: 1px solid rgba(0, 0, 0, 0.04);
    }

    label {
      display: block;
      font-size: 13px;
      color: #6b5740;
      margin-bottom: 4px;
    }

    input,
    textarea {
      width: 100%;
      padding: 10px;
      border-radius: 8px;
      border: 1px solid rgba(0, 0, 0, 0.06);
      margin-bottom: 8px;
      box-sizing: border-box;
    }

    textarea {
      min-height: 120px;
      font-family: monospace;
    }

    .btn {
      padding: 10px 12px;
      border-radius: 8px;
      border: none;
      cursor: pointer;
      font-weight: 700;
      text-decoration: none;
      color: #111;
      display: inline-block;
    }

    .actions {
      display: flex;
      gap: 8px;
      align-items: center;
    }
  </style>
</head>
<body>
  <div class="panel">
    <h2>Edit {{NAME}}</h2>
    <form method="post" action="/plants/{{ID}}/update">
      <label>Name</label>
      <input name="name" value="{{NAME}}" required>
      <label>Species</label>
      <input name="species" value="{{SPECIES}}">
      <label>Location</label>
      <input name="location" value="{{LOCATION}}">
      <label>Water interval days</label>
      <input name="water_interval_days" type="number" value="{{INTERVAL}}">
      <label>Notes</label>
      <textarea name="notes">{{NOTES}}</textarea>
      <div class="actions">
        <button class="btn" type="submit" style="background:#b07a2f">Save</button>
        <a class="btn" href="/" style="background:#eee">Cancel</a>
      </div>
    </form>
    <form method="post" action="/plants/{{ID}}/delete" style="margin-top:10px"
          onsubmit="return confirm('Delete?')">
      <button class="btn" style="background:#ddd">Delete</button>
    </form>
  </div>
</body>
</html>
"#;
