use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

/// CSS styles.
pub async fn styles_css() -> Response {
    let css = r#"
:root {
    --bg-primary: #0f0f0f;
    --bg-secondary: #1a1a1a;
    --bg-tertiary: #252525;
    --text-primary: #ffffff;
    --text-secondary: #a0a0a0;
    --accent: #3b82f6;
    --success: #22c55e;
    --warning: #eab308;
    --error: #ef4444;
    --border: #333;
}

* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    background: var(--bg-primary);
    color: var(--text-primary);
    line-height: 1.6;
}

.content-header {
    display: flex;
    align-items: baseline;
    gap: 1rem;
    padding: 1rem 2rem;
    border-bottom: 1px solid var(--border);
}

.version {
    color: var(--text-secondary);
    font-size: 0.8rem;
}

.content {
    padding: 1.5rem 2rem;
}

.d-none {
    display: none !important;
}

.alert {
    background: rgba(239, 68, 68, 0.15);
    border: 1px solid var(--error);
    color: var(--error);
    border-radius: 6px;
    padding: 0.75rem 1rem;
    margin-bottom: 1rem;
}

.row {
    display: flex;
    flex-wrap: wrap;
    gap: 1rem;
}

.card {
    background: var(--bg-secondary);
    border: 1px solid var(--border);
    border-radius: 8px;
    padding: 1rem 1.25rem;
    margin-bottom: 1rem;
    flex: 1;
}

.card h3 {
    color: var(--text-secondary);
    font-size: 0.9rem;
    text-transform: uppercase;
    margin-bottom: 0.5rem;
}

dl {
    display: grid;
    grid-template-columns: max-content 1fr;
    gap: 0.25rem 1rem;
}

dt {
    color: var(--text-secondary);
}

table {
    width: 100%;
    border-collapse: collapse;
}

th, td {
    text-align: left;
    padding: 0.4rem 0.6rem;
    border-bottom: 1px solid var(--border);
}

th {
    color: var(--text-secondary);
    font-weight: 500;
}

tr:hover td {
    background: var(--bg-tertiary);
}

td.empty {
    color: var(--text-secondary);
    text-align: center;
}

code {
    color: var(--accent);
}

li.sick {
    color: var(--error);
}

li.healthy {
    color: var(--success);
}

.badge {
    display: inline-block;
    padding: 0 0.5rem;
    border-radius: 999px;
    font-size: 0.75rem;
}

.badge.success {
    background: rgba(34, 197, 94, 0.2);
    color: var(--success);
}

.badge.warning {
    background: rgba(234, 179, 8, 0.2);
    color: var(--warning);
}

.badge.error {
    background: rgba(239, 68, 68, 0.2);
    color: var(--error);
}
"#;

    (StatusCode::OK, [(header::CONTENT_TYPE, "text/css")], css).into_response()
}
