//! HTML pages for the landing page and the approval console.

use super::types::{ApproveOutcome, PairingSummary};

const STYLE: &str = r#"body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; background: #0f0f23; color: #fff; margin: 0; padding: 40px; }
h1 { font-size: 28px; margin: 0 0 16px; }
code { background: rgba(255,255,255,0.08); padding: 2px 6px; border-radius: 4px; }
input { padding: 10px; font-size: 18px; border: 1px solid #333; border-radius: 4px; text-transform: uppercase; }
button { padding: 10px 20px; background: #0066ff; color: #fff; border: none; border-radius: 4px; font-size: 18px; cursor: pointer; }
button:hover { background: #0052cc; }
table { border-collapse: collapse; margin-top: 8px; }
td, th { padding: 6px 14px; text-align: left; border-bottom: 1px solid #333; }
a { color: #4a90d9; }"#;

/// Endpoints advertised on the landing page.
const ENDPOINTS: &[(&str, &str, &str)] = &[
    ("GET", "/api/v1/health", "Health check"),
    ("GET", "/api/v1/version", "Version info"),
    ("POST", "/api/v1/auth/device/start", "Start pairing"),
    ("GET", "/api/v1/auth/device/status", "Check status"),
    ("POST", "/api/v1/auth/device/token", "Get tokens"),
    ("POST", "/api/v1/auth/refresh", "Refresh tokens"),
    ("POST", "/api/v1/auth/revoke", "Revoke tokens"),
    ("GET", "/console", "Approval console"),
];

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<title>{title}</title>
<style>
{STYLE}
</style>
</head>
<body>
{body}
</body>
</html>"#,
        title = html_escape(title),
    )
}

/// Render the landing page listing endpoints and active device codes.
///
/// The page reloads itself every `refresh_secs` seconds.
pub fn render_index(active: &[PairingSummary], refresh_secs: u64) -> String {
    let endpoints: String = ENDPOINTS
        .iter()
        .map(|(method, path, label)| format!("<li><code>{method} {path}</code> - {label}</li>\n"))
        .collect();

    let codes = if active.is_empty() {
        "<p>No active device codes.</p>".to_string()
    } else {
        let rows: String = active
            .iter()
            .map(|p| {
                format!(
                    "<tr><td><code>{}</code></td><td>{}</td><td>{}</td><td>{}s</td></tr>\n",
                    html_escape(&p.user_code),
                    p.status,
                    p.issued_at.format("%H:%M:%S UTC"),
                    p.remaining_secs,
                )
            })
            .collect();
        format!(
            "<table>\n<tr><th>User code</th><th>Status</th><th>Started</th><th>Expires in</th></tr>\n{rows}</table>"
        )
    };

    let body = format!(
        r#"<h1>Sys AI Box Mock Server</h1>
<p>This is a mock server for testing SwiftSweep integration.</p>
<h2>Endpoints:</h2>
<ul>
{endpoints}</ul>
<h2>Active Device Codes:</h2>
<div id="codes">
{codes}
</div>
<script>
setInterval(() => location.reload(), {refresh_ms});
</script>"#,
        refresh_ms = refresh_secs.max(1) * 1000,
    );

    page("Sys AI Box Mock", &body)
}

/// Render the console form that submits a user code to `/approve`.
pub fn render_console() -> String {
    page(
        "Sys AI Box Console",
        r#"<h1>Sys AI Box Console</h1>
<p>Enter the code from SwiftSweep to authorize:</p>
<form action="/approve" method="GET">
<input name="code" placeholder="Enter code" autocomplete="off" required autofocus>
<button type="submit">Approve</button>
</form>"#,
    )
}

/// Render the outcome of an approval whose code matched a pairing.
pub fn render_approved(code: &str, outcome: ApproveOutcome) -> String {
    let code = html_escape(code);
    let body = match outcome {
        ApproveOutcome::Authorized => format!(
            "<h1>Device Authorized!</h1>\n<p>Code <code>{code}</code> has been approved.</p>\n<p>You can now return to SwiftSweep.</p>"
        ),
        ApproveOutcome::AlreadyAuthorized => format!(
            "<h1>Already Approved</h1>\n<p>Code <code>{code}</code> was approved earlier. Nothing changed.</p>\n<p>You can return to SwiftSweep.</p>"
        ),
        ApproveOutcome::Expired => format!(
            "<h1>Code Expired</h1>\n<p>Code <code>{code}</code> has expired. Start pairing again from SwiftSweep.</p>\n<a href=\"/console\">Back to console</a>"
        ),
        ApproveOutcome::Consumed => format!(
            "<h1>Already Paired</h1>\n<p>Code <code>{code}</code> has already been used to issue tokens.</p>"
        ),
    };
    page("Sys AI Box Console", &body)
}

/// Render the page shown when no pairing carries the submitted code.
pub fn render_not_found(code: &str) -> String {
    page(
        "Sys AI Box Console",
        &format!(
            "<h1>Code Not Found</h1>\n<p>Code <code>{}</code> was not found or has expired.</p>\n<a href=\"/console\">Try again</a>",
            html_escape(code)
        ),
    )
}

/// Escape HTML special characters.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::server::pairing::types::PairingStatus;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<script>alert("xss")</script>"#),
            "&lt;script&gt;alert(&quot;xss&quot;)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_index_lists_endpoints_and_codes() {
        let active = vec![PairingSummary {
            user_code: "SWIFT-AB12".into(),
            status: PairingStatus::Pending,
            issued_at: Utc::now(),
            remaining_secs: 540,
        }];
        let html = render_index(&active, 5);

        assert!(html.contains("/api/v1/auth/device/start"));
        assert!(html.contains("SWIFT-AB12"));
        assert!(html.contains("540s"));
        assert!(html.contains("location.reload(), 5000"));
    }

    #[test]
    fn test_index_without_codes() {
        let html = render_index(&[], 5);
        assert!(html.contains("No active device codes."));
    }

    #[test]
    fn test_console_posts_to_approve() {
        let html = render_console();
        assert!(html.contains(r#"action="/approve""#));
        assert!(html.contains(r#"name="code""#));
    }

    #[test]
    fn test_approval_pages_escape_code() {
        let html = render_not_found("<b>X</b>");
        assert!(html.contains("Code Not Found"));
        assert!(html.contains("&lt;b&gt;X&lt;/b&gt;"));
        assert!(!html.contains("<b>X</b>"));

    }

    #[test]
    fn test_approval_page_per_outcome() {
        let render = |outcome| render_approved("SWIFT-AB12", outcome);

        assert!(render(ApproveOutcome::Authorized).contains("Device Authorized!"));
        assert!(render(ApproveOutcome::Expired).contains("Code Expired"));
        assert!(render(ApproveOutcome::Consumed).contains("Already Paired"));

        let again = render(ApproveOutcome::AlreadyAuthorized);
        assert!(again.contains("Already Approved"));
        assert!(!again.contains("Device Authorized!"));
    }
}
