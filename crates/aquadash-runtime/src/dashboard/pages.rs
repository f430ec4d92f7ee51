use axum::{extract::State, response::Html};

use aquadash_core::template::escape;

use super::DashboardState;

/// Page shell around the display region.
fn base_template(title: &str, refresh_secs: u64, banner_visible: bool, region: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta http-equiv="refresh" content="{refresh_secs}">
    <title>{title}</title>
    <link rel="stylesheet" href="/assets/styles.css">
</head>
<body>
    <header class="content-header">
        <h1>{title}</h1>
        <span class="version">v{version}</span>
    </header>
    <main class="content">
        <div id="alertmsg" class="{alert_class}" role="alert">
            Failed to load stats from the proxy. Showing the last good data.
        </div>
        <div id="stats">
{region}
        </div>
    </main>
</body>
</html>"#,
        title = escape(title),
        refresh_secs = refresh_secs,
        version = env!("CARGO_PKG_VERSION"),
        alert_class = if banner_visible { "alert" } else { "alert d-none" },
        region = region,
    )
}

/// Full page: banner plus the last good render.
pub async fn index(State(state): State<DashboardState>) -> Html<String> {
    let (display_state, region) = state.surface.read();
    let banner_visible = display_state == crate::display::DisplayState::Error;
    Html(base_template(
        &state.title,
        state.refresh_secs,
        banner_visible,
        &region,
    ))
}

/// The region contents alone.
pub async fn fragment(State(state): State<DashboardState>) -> Html<String> {
    Html(state.surface.region_html())
}
