//! Reading drafts out of free-form provider text.

use pm_core::{DeltaPrototypes, PrdDraft, TestCaseDraft, TestStep};
use serde::Deserialize;
use tracing::debug;

use crate::error::{DraftError, DraftResult};

/// The slice from the first `{` to the last `}` inclusive. Anything the
/// provider wrote around the object is ignored.
pub fn extract_json(text: &str) -> DraftResult<&str> {
    let start = text.find('{').ok_or(DraftError::NoJsonFound)?;
    let end = text.rfind('}').ok_or(DraftError::NoJsonFound)?;
    if end <= start {
        return Err(DraftError::NoJsonFound);
    }
    Ok(&text[start..=end])
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPrd {
    overview: String,
    user_stories: Vec<String>,
    ui_design: String,
    backend_logic: String,
    diagrams: Vec<String>,
    solution_delta: String,
    #[serde(default)]
    delta_prototypes: Option<RawDeltaPrototypes>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDeltaPrototypes {
    current_state: Option<String>,
    proposed_changes: Option<String>,
    user_flow: Option<String>,
    api_linkages: Option<String>,
    corner_cases: Option<String>,
}

impl From<RawDeltaPrototypes> for DeltaPrototypes {
    fn from(raw: RawDeltaPrototypes) -> Self {
        let defaults = DeltaPrototypes::default();
        Self {
            current_state: raw.current_state.unwrap_or(defaults.current_state),
            proposed_changes: raw.proposed_changes.unwrap_or(defaults.proposed_changes),
            user_flow: raw.user_flow.unwrap_or(defaults.user_flow),
            api_linkages: raw.api_linkages.unwrap_or(defaults.api_linkages),
            corner_cases: raw.corner_cases.unwrap_or(defaults.corner_cases),
        }
    }
}

/// Parse a PRD reply. The narrative fields are required; a missing delta
/// prototype, or any missing field inside it, reads as "Not provided".
pub fn parse_prd(text: &str) -> DraftResult<PrdDraft> {
    let raw: RawPrd = serde_json::from_str(extract_json(text)?)?;

    Ok(PrdDraft {
        overview: raw.overview,
        user_stories: raw.user_stories,
        ui_design: raw.ui_design,
        backend_logic: raw.backend_logic,
        diagrams: raw.diagrams,
        solution_delta: raw.solution_delta,
        delta_prototypes: raw.delta_prototypes.unwrap_or_default().into(),
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTestCases {
    #[serde(default)]
    test_cases: Vec<RawTestCase>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTestCase {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    preconditions: Vec<String>,
    #[serde(default)]
    steps: Vec<RawStep>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStep {
    #[serde(default)]
    step_number: u32,
    action: String,
    expected_result: String,
}

/// Parse a test-case reply. An empty `testCases` list is an error so the
/// caller falls back to the canned cases. Step numbers are rewritten to
/// 1..=n when the provider's numbering is not already that.
pub fn parse_test_cases(text: &str) -> DraftResult<Vec<TestCaseDraft>> {
    let raw: RawTestCases = serde_json::from_str(extract_json(text)?)?;
    if raw.test_cases.is_empty() {
        return Err(DraftError::EmptyResponse("test cases"));
    }

    Ok(raw
        .test_cases
        .into_iter()
        .map(|case| {
            let mut draft = TestCaseDraft {
                title: case.title,
                description: case.description,
                preconditions: case.preconditions,
                steps: case
                    .steps
                    .into_iter()
                    .map(|s| TestStep::new(s.step_number, s.action, s.expected_result))
                    .collect(),
            };
            if draft.normalize_steps() {
                debug!(title = %draft.title, "Renumbered test steps");
            }
            draft
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRD_JSON: &str = r#"{
        "overview": "Adds search",
        "userStories": ["As a user, I want search"],
        "uiDesign": "Search bar",
        "backendLogic": "Index lookups",
        "diagrams": ["sequenceDiagram", "graph TD"],
        "solutionDelta": "New capability",
        "deltaPrototypes": {"currentState": "None", "userFlow": "Type and see"}
    }"#;

    #[test]
    fn test_extract_json_ignores_commentary() {
        let text = "Sure! Here is the document:\n```json\n{\"a\": {\"b\": 1}}\n```\nHope it helps.";
        assert_eq!(extract_json(text).unwrap(), "{\"a\": {\"b\": 1}}");
    }

    #[test]
    fn test_extract_json_missing_braces() {
        assert!(matches!(extract_json("no json here"), Err(DraftError::NoJsonFound)));
        assert!(matches!(extract_json("} backwards {"), Err(DraftError::NoJsonFound)));
        assert!(matches!(extract_json("{ unterminated"), Err(DraftError::NoJsonFound)));
    }

    #[test]
    fn test_parse_prd_fills_missing_delta_fields() {
        let prd = parse_prd(&format!("Result:\n{PRD_JSON}\nDone")).unwrap();
        assert_eq!(prd.overview, "Adds search");
        assert_eq!(prd.diagrams.len(), 2);
        assert_eq!(prd.delta_prototypes.current_state, "None");
        assert_eq!(prd.delta_prototypes.user_flow, "Type and see");
        assert_eq!(prd.delta_prototypes.proposed_changes, "Not provided");
        assert_eq!(prd.delta_prototypes.corner_cases, "Not provided");
    }

    #[test]
    fn test_parse_prd_without_delta_prototypes() {
        let text = r#"{"overview": "o", "userStories": [], "uiDesign": "u",
            "backendLogic": "b", "diagrams": [], "solutionDelta": "s"}"#;
        let prd = parse_prd(text).unwrap();
        assert_eq!(prd.delta_prototypes, DeltaPrototypes::default());
    }

    #[test]
    fn test_parse_prd_rejects_missing_narrative() {
        let err = parse_prd(r#"{"overview": "only this"}"#).unwrap_err();
        assert!(matches!(err, DraftError::InvalidJson(_)));
    }

    #[test]
    fn test_parse_prd_rejects_malformed_json() {
        let err = parse_prd("{ this is not json }").unwrap_err();
        assert!(matches!(err, DraftError::InvalidJson(_)));
    }

    #[test]
    fn test_parse_test_cases_renumbers_steps() {
        let text = r#"```json
        {"testCases": [{
            "title": "Login works",
            "description": "Happy path",
            "preconditions": ["Account exists"],
            "steps": [
                {"stepNumber": 3, "action": "Open page", "expectedResult": "Form shown"},
                {"stepNumber": 7, "action": "Submit", "expectedResult": "Signed in"}
            ]
        }]}
        ```"#;

        let cases = parse_test_cases(text).unwrap();
        assert_eq!(cases.len(), 1);
        let numbers: Vec<_> = cases[0].steps.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(cases[0].steps[0].action, "Open page");
    }

    #[test]
    fn test_parse_test_cases_empty_is_error() {
        assert!(matches!(
            parse_test_cases(r#"{"testCases": []}"#),
            Err(DraftError::EmptyResponse(_))
        ));
        assert!(matches!(
            parse_test_cases(r#"{"somethingElse": 1}"#),
            Err(DraftError::EmptyResponse(_))
        ));
    }
}
