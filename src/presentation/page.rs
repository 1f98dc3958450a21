// Server-rendered dashboard page
use crate::application::dashboard_shell::DashboardSnapshot;
use crate::domain::chart::PanelState;
use crate::domain::prediction::PipelineKind;
use crate::domain::sidebar::NAV_ITEMS;
use crate::infrastructure::config::DashboardSettings;
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write;

const CHART_JS: &str = "https://cdn.jsdelivr.net/npm/chart.js@4";

const PAGE_SCRIPT: &str = r#"
async function act(url, body) {
  await fetch(url, {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: body === undefined ? undefined : JSON.stringify(body),
  });
  await fetch("/api/dashboard?wait=true");
  location.reload();
}
document.querySelectorAll("[data-year]").forEach((el) => {
  el.addEventListener("click", () => act("/api/filter/year", { year: el.dataset.year || null }));
});
document.querySelectorAll("[data-chart]").forEach((el) => {
  const spec = JSON.parse(el.textContent);
  const canvas = document.getElementById(el.dataset.chart);
  new Chart(canvas, {
    data: { labels: spec.labels, datasets: spec.datasets },
    options: {
      responsive: true,
      plugins: {
        legend: { position: spec.legendPosition },
        title: { display: true, text: spec.title },
      },
      scales: {
        x: { title: { display: true, text: spec.xAxis.title } },
        y: { title: { display: true, text: spec.yAxis.title }, beginAtZero: spec.yAxis.beginAtZero },
      },
    },
  });
});
document.addEventListener("mousedown", (event) => {
  const sidebar = document.getElementById("sidebar");
  if (sidebar && sidebar.dataset.collapsed === "false" && !sidebar.contains(event.target)) {
    act("/api/sidebar/collapse");
  }
});
"#;

pub fn render_home(snapshot: &DashboardSnapshot, settings: &DashboardSettings) -> String {
    let mut body = String::new();
    body.push_str(&render_top_bar(settings));
    body.push_str("<div class=\"layout\">");
    body.push_str(&render_sidebar(snapshot, "/"));
    body.push_str("<main>");
    body.push_str(&render_toolbar(snapshot));
    body.push_str("<div class=\"panels\">");
    body.push_str(&render_panel(PipelineKind::Attrition, &snapshot.attrition));
    body.push_str(&render_panel(PipelineKind::Shrinkage, &snapshot.shrinkage));
    body.push_str("</div></main></div>");

    let _ = write!(body, "<script src=\"{}\"></script>", CHART_JS);
    let _ = write!(body, "<script>{}</script>", PAGE_SCRIPT);

    document("Attrition Dashboard Prediction", &body)
}

pub fn render_placeholder(text: &str) -> String {
    document(text, &format!("<div>{}</div>", encode_text(text)))
}

fn document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\"><title>{}</title></head><body>{}</body></html>",
        encode_text(title),
        body
    )
}

fn render_top_bar(settings: &DashboardSettings) -> String {
    format!(
        "<header class=\"top-bar\"><div class=\"brand\"><img src=\"/logo.jpg\" alt=\"Logo\"><h1>{}</h1><span class=\"badge\">Pro</span></div>\
         <div class=\"profile\"><span class=\"bell\" title=\"Notifications\">&#128276;</span><span>{}</span></div></header>",
        encode_text(&settings.brand),
        encode_text(&settings.profile_name)
    )
}

fn render_sidebar(snapshot: &DashboardSnapshot, current_path: &str) -> String {
    let collapsed = snapshot.sidebar.is_collapsed;
    let mut html = format!("<nav id=\"sidebar\" data-collapsed=\"{}\"><ul>", collapsed);

    for item in NAV_ITEMS.iter() {
        let active = if item.href == current_path { " class=\"active\"" } else { "" };
        let label = if collapsed {
            String::new()
        } else {
            format!("<span>{}</span>", encode_text(item.name))
        };
        let _ = write!(
            html,
            "<li><a href=\"{}\"{} title=\"{}\">{}</a></li>",
            item.href,
            active,
            encode_double_quoted_attribute(item.name),
            label
        );
    }

    let arrow = if collapsed { "&#8250;" } else { "&#8249;" };
    let _ = write!(
        html,
        "</ul><button onclick=\"act('/api/sidebar/toggle')\">{}</button></nav>",
        arrow
    );
    html
}

fn render_toolbar(snapshot: &DashboardSnapshot) -> String {
    let mut html = String::from("<div class=\"toolbar\"><h1>Attrition Dashboard Prediction</h1>");

    let _ = write!(
        html,
        "<button onclick=\"act('/api/filter/sort')\">Sort by <span class=\"badge\">{}</span></button>",
        snapshot.sort_arrow
    );

    let active = snapshot
        .filter
        .active_year()
        .map(|year| encode_text(year).into_owned())
        .unwrap_or_else(|| "All years".to_string());
    let _ = write!(
        html,
        "<div class=\"filter\"><button onclick=\"act('/api/filter/selector')\">Filter by <span class=\"badge\">{}</span></button>",
        active
    );

    if snapshot.year_selector_open {
        html.push_str("<ul class=\"years\">");
        html.push_str("<li data-year=\"\">All years</li>");
        for year in &snapshot.available_years {
            let _ = write!(
                html,
                "<li data-year=\"{}\">{}</li>",
                encode_double_quoted_attribute(year),
                encode_text(year)
            );
        }
        html.push_str("</ul>");
    }
    html.push_str("</div>");

    html.push_str("<input type=\"text\" placeholder=\"Search anything here...\"></div>");
    html
}

fn render_panel(kind: PipelineKind, panel: &PanelState) -> String {
    let id = kind.as_str();
    let content = match panel {
        PanelState::Loading => "<div>Loading...</div>".to_string(),
        PanelState::NoData { message } => format!("<div>{}</div>", encode_text(message)),
        PanelState::Error { message, .. } => format!("<div>Error: {}</div>", encode_text(message)),
        PanelState::Ready { chart } => {
            let spec = serde_json::to_string(chart)
                .unwrap_or_else(|_| "null".to_string())
                .replace("</", "<\\/");
            format!(
                "<h3>{}</h3><canvas id=\"{id}-canvas\"></canvas><script type=\"application/json\" data-chart=\"{id}-canvas\">{}</script>",
                encode_text(&chart.title),
                spec,
                id = id
            )
        }
    };

    format!(
        "<section class=\"panel\" id=\"{}\"><h2>{}</h2>{}</section>",
        id,
        kind.heading(),
        content
    )
}
