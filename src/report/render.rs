//! Text and JSON rendering of a [`ScenarioSummary`]

use super::summary::{Entry, ScenarioSummary, UserView};
use crate::provisioning::OutcomeKind;
use crate::types::OutputFormat;

const RULE: &str = "==============================================";

/// Render the summary in the requested format
pub fn render(summary: &ScenarioSummary, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(render_text(summary)),
        OutputFormat::Json => render_json(summary),
    }
}

/// Pretty-printed JSON
pub fn render_json(summary: &ScenarioSummary) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(summary)
}

fn outcome_tag(kind: OutcomeKind) -> &'static str {
    match kind {
        OutcomeKind::Persisted => "OK",
        OutcomeKind::Simulated => "SIMULATED",
        OutcomeKind::Failed => "FAILED",
        OutcomeKind::Aborted => "SKIPPED",
    }
}

/// Header line plus failure or skip reason for an entry
fn write_header<T>(out: &mut String, title: &str, entry: &Entry<T>) {
    out.push_str(&format!("\n{} [{}] {}\n", title, outcome_tag(entry.outcome), entry.label));
    if let Some(error) = &entry.error {
        out.push_str(&format!("  - Error: {} (status {})\n", error.category, error.status_code));
        if !error.detail.is_empty() {
            out.push_str(&format!("  - Detail: {}\n", error.detail));
        }
        let rerun = if error.recoverable { "may succeed" } else { "unlikely to help" };
        out.push_str(&format!("  - Rerun: {}\n", rerun));
    }
    if let Some(missing) = entry.missing {
        out.push_str(&format!("  - Skipped: {} unavailable\n", missing));
    }
}

fn write_user(out: &mut String, title: &str, entry: &Entry<UserView>) {
    write_header(out, title, entry);
    if let Some(user) = &entry.record {
        out.push_str(&format!("  - ID: {} ({})\n", user.id, user.resolution));
        out.push_str(&format!("  - Name: {}\n", user.name));
        out.push_str(&format!("  - Email: {}\n", user.email));
        out.push_str(&format!("  - Password: {}\n", user.credential));
    }
}

/// Human-readable report, ending with login instructions
pub fn render_text(summary: &ScenarioSummary) -> String {
    let mut out = String::new();
    out.push_str("SCENARIO SUMMARY\n");
    out.push_str(&format!("{}\n", RULE));
    out.push_str(&format!("Evaluated at: {}\n", summary.evaluated_at));

    if let Some(owner) = &summary.owner {
        write_user(&mut out, "OWNER", owner);
    }
    for guest in &summary.guests {
        write_user(&mut out, "GUEST", guest);
    }

    for entry in &summary.properties {
        write_header(&mut out, "PROPERTY", entry);
        if let Some(property) = &entry.record {
            out.push_str(&format!("  - ID: {}\n", property.id));
            out.push_str(&format!("  - Address: {}\n", property.address));
            out.push_str(&format!("  - Owner ID: {}\n", property.owner_id));
        }
    }

    for entry in &summary.locks {
        write_header(&mut out, "LOCK", entry);
        if let Some(view) = &entry.record {
            out.push_str(&format!("  - ID: {}\n", view.lock.id));
            out.push_str(&format!("  - Model: {}\n", view.lock.model));
            out.push_str(&format!("  - State: {}\n", view.lock.state_label()));
            out.push_str(&format!("  - Property: {}\n", view.property_name));
        }
    }

    for entry in &summary.grants {
        write_header(&mut out, "ACCESS GRANT", entry);
        if let Some(grant) = &entry.record {
            out.push_str(&format!("  - ID: {}\n", grant.id));
            out.push_str(&format!("  - Guest ID: {} | Lock ID: {}\n", grant.guest_id, grant.lock_id));
            out.push_str(&format!("  - Window: {} .. {}\n", grant.start, grant.end));
            out.push_str(&format!("  - Status: {}\n", grant.status));
            if grant.simulated {
                out.push_str("  - NOTE: simulated locally, not stored by the API\n");
            }
        }
    }

    for entry in &summary.tokens {
        write_header(&mut out, "ACCESS TOKEN", entry);
        if let Some(token) = &entry.record {
            out.push_str(&format!("  - ID: {}\n", token.id));
            out.push_str(&format!("  - Code: {}\n", token.code));
            out.push_str(&format!("  - Lock ID: {}\n", token.lock_id));
            out.push_str(&format!("  - Uses: {}\n", token.usage));
            if let Some(expiry) = &token.expires_at {
                out.push_str(&format!("  - Expires: {}\n", expiry));
            }
            out.push_str(&format!("  - State: {}\n", token.state));
            if token.simulated {
                out.push_str("  - NOTE: simulated locally, not stored by the API\n");
            }
        }
    }

    write_instructions(&mut out, summary);

    let counts = summary.counts;
    out.push_str(&format!("\n{}\n", RULE));
    out.push_str(&format!(
        "Persisted: {} | Simulated: {} | Failed: {} | Skipped: {}\n",
        counts.persisted, counts.simulated, counts.failed, counts.aborted
    ));
    out
}

fn write_instructions(out: &mut String, summary: &ScenarioSummary) {
    let owner = summary.owner.as_ref().and_then(|e| e.record.as_ref());
    let guests: Vec<&UserView> = summary.guests.iter().filter_map(|e| e.record.as_ref()).collect();
    let tokens: Vec<_> = summary.tokens.iter().filter_map(|e| e.record.as_ref()).collect();
    if owner.is_none() && guests.is_empty() && tokens.is_empty() {
        return;
    }

    out.push_str("\nHOW TO USE\n");
    let mut step = 1;
    if let Some(owner) = owner {
        out.push_str(&format!("  {}. Log in as the owner to manage properties:\n", step));
        out.push_str(&format!("     - Email: {}\n", owner.email));
        out.push_str(&format!("     - Password: {}\n", owner.credential));
        step += 1;
    }
    for guest in guests {
        out.push_str(&format!("  {}. Log in as a guest to open locks:\n", step));
        out.push_str(&format!("     - Email: {}\n", guest.email));
        out.push_str(&format!("     - Password: {}\n", guest.credential));
        step += 1;
    }
    for token in tokens {
        out.push_str(&format!("  {}. Test token access:\n", step));
        out.push_str(&format!("     - Token code: {}\n", token.code));
        out.push_str(&format!("     - Lock ID: {}\n", token.lock_id));
        out.push_str(&format!("     - Uses: {}\n", token.usage));
        step += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::ScriptedTransport;
    use crate::api::{endpoints, ApiClient, HttpMethod};
    use crate::provisioning::ScenarioOrchestrator;
    use crate::schedule::{Clock, FixedClock};
    use crate::types::ScenarioConfig;

    fn summary(transport: ScriptedTransport) -> ScenarioSummary {
        let client = ApiClient::new("http://api.test", Box::new(transport));
        let clock = FixedClock::on_date(2025, 3, 31).unwrap();
        let run = ScenarioOrchestrator::new(&client, &clock).run(&ScenarioConfig::default()).unwrap();
        ScenarioSummary::build(&run, clock.now())
    }

    #[test]
    fn test_text_report_includes_login_instructions() {
        let transport = ScriptedTransport::new();
        transport
            .reply(HttpMethod::Post, endpoints::OWNERS, 201, r#"{"id": 1}"#)
            .reply(HttpMethod::Post, endpoints::GUEST_REGISTRATION, 201, r#"{"id": 2}"#)
            .reply(HttpMethod::Post, endpoints::PROPERTIES, 201, r#"{"id": 3}"#)
            .reply(HttpMethod::Post, endpoints::LOCK_CREATE, 201, r#"{"id": 4}"#)
            .reply(HttpMethod::Post, endpoints::TOKENS, 500, "token table missing");

        let text = render_text(&summary(transport));
        assert!(text.contains("OWNER [OK] carlos@email.com"));
        assert!(text.contains("- Password: abc123"));
        assert!(text.contains("- Password: password123"));
        assert!(text.contains("ACCESS TOKEN [SIMULATED]"));
        assert!(text.contains("- Token code: TOKEN123456"));
        assert!(text.contains("- Status: ACTIVE"));
    }

    #[test]
    fn test_text_report_shows_failures_and_skips() {
        let text = render_text(&summary(ScriptedTransport::new()));
        assert!(text.contains("OWNER [FAILED]"));
        assert!(text.contains("- Error: Transport (status 0)"));
        assert!(text.contains("- Rerun: may succeed"));
        assert!(text.contains("- Skipped: Owner unavailable"));
        assert!(!text.contains("HOW TO USE"));
    }

    #[test]
    fn test_json_rendering() {
        let json = render(&summary(ScriptedTransport::new()), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["counts"]["failed"], 2);
    }
}
