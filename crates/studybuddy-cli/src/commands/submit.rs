//! Submit command - send one form to its generation endpoint

use anyhow::Result;
use studybuddy_client::{
    DisplayContent, FormKind, FormPayload, FormSubmitter, ResultDisplay, StudyBuddyClient,
    SubmissionEvent, SubmissionState,
};
use tracing::debug;

use crate::output::OutputContext;

/// Submit a form and print the rendered outcome
pub async fn submit(
    client: StudyBuddyClient,
    kind: FormKind,
    fields: FormPayload,
    ctx: &OutputContext,
) -> Result<SubmissionState> {
    debug!("Submitting {} form with {} fields", kind, fields.len());

    let display = ResultDisplay::new();
    let mut updates = display.subscribe();
    let submitter = FormSubmitter::new(client, display.clone());

    // Mirror status text from the display onto the spinner
    let spinner = ctx.spinner(kind.status_text());
    let watcher = {
        let spinner = spinner.clone();
        tokio::spawn(async move {
            while updates.changed().await.is_ok() {
                let status = match updates.borrow_and_update().content {
                    DisplayContent::Status(text) => Some(text),
                    _ => None,
                };
                if let Some(text) = status {
                    spinner.set_message(text);
                }
            }
        })
    };

    let mut event = SubmissionEvent::new(fields);
    let state = submitter.submit(kind, &mut event).await;

    watcher.abort();
    spinner.finish_and_clear();

    ctx.print_outcome(&display.content());
    Ok(state)
}

/// Parse a `KEY=VALUE` form field argument
pub fn parse_field(arg: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", arg))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing field name in '{}'", arg));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Collect form fields from named flags and `--field` overrides.
///
/// Flags left unset are not part of the form. Extra fields are applied last,
/// so they override named flags with the same name.
pub fn collect_fields(named: &[(&str, Option<&String>)], extra: &[(String, String)]) -> FormPayload {
    let mut payload: FormPayload = named
        .iter()
        .filter_map(|(name, value)| value.map(|v| (*name, v.clone())))
        .collect();
    payload.extend(extra.iter().cloned());
    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_field() {
        assert_eq!(
            parse_field("study_story=none").unwrap(),
            ("study_story".to_string(), "none".to_string())
        );
        assert_eq!(
            parse_field("domains=DM, AE=x").unwrap(),
            ("domains".to_string(), "DM, AE=x".to_string())
        );
        assert_eq!(
            parse_field("note=").unwrap(),
            ("note".to_string(), String::new())
        );
    }

    #[test]
    fn test_parse_field_rejects() {
        assert!(parse_field("no_equals").is_err());
        assert!(parse_field("=value").is_err());
    }

    #[test]
    fn test_collect_fields() {
        let num_subjects = "10".to_string();
        let domain = "DM".to_string();
        let extra = vec![
            ("domain".to_string(), "AE".to_string()),
            ("site".to_string(), "01".to_string()),
        ];

        let payload = collect_fields(
            &[
                ("num_subjects", Some(&num_subjects)),
                ("domain", Some(&domain)),
                ("data_format", None),
            ],
            &extra,
        );

        assert_eq!(payload.len(), 3);
        assert_eq!(payload.get("num_subjects"), Some("10"));
        assert_eq!(payload.get("domain"), Some("AE"));
        assert_eq!(payload.get("site"), Some("01"));
        assert_eq!(payload.get("data_format"), None);
    }
}
