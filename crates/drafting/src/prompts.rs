//! Prompt text sent to providers.

use std::fmt::Write;

use pm_core::{Bucket, Prd, Requirement, Squad};

/// The requirement fields that go into a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementBrief {
    pub title: String,
    pub description: String,
    pub bucket: String,
    pub squad: String,
}

impl RequirementBrief {
    pub fn new(requirement: &Requirement, bucket: &Bucket, squad: &Squad) -> Self {
        Self {
            title: requirement.title.clone(),
            description: requirement.description.clone(),
            bucket: bucket.name.as_str().to_string(),
            squad: squad.name.clone(),
        }
    }
}

fn write_header(prompt: &mut String, brief: &RequirementBrief) {
    let _ = writeln!(prompt, "Title: {}", brief.title);
    let _ = writeln!(prompt, "Description: {}", brief.description);
    let _ = writeln!(prompt, "Type: {}", brief.bucket);
    let _ = writeln!(prompt, "Team: {}", brief.squad);
}

pub fn prd_prompt(brief: &RequirementBrief) -> String {
    let mut prompt =
        String::from("Generate a comprehensive Product Requirements Document (PRD) for the following requirement:\n\n");
    write_header(&mut prompt, brief);

    prompt.push_str(
        r#"
Please include the following sections:

1. Overview: A brief summary of the requirement and its purpose.

2. User Stories: 3-5 user stories in the format "As a [user type], I want to [action] so that [benefit]".

3. UI Design: Detailed description of the user interface, including layout, components, and interactions.

4. Backend Logic: Technical implementation details, focusing on rendering and data flow.

5. Solution Delta: How this requirement changes or enhances the existing product.

6. Diagrams: Two Mermaid diagrams:
   a. A sequence diagram showing the interaction flow
   b. A component diagram showing the architecture

7. Delta Prototypes: Provide detailed descriptions for UI flow prototypes that visualize:
   a. The current state of the relevant screens
   b. The proposed changes to these screens
   c. The user flow between screens
   d. Field-wise API linkages showing which UI elements connect to which API endpoints
   e. Corner cases and how they're handled in the UI

Format the response as a JSON object with the following structure:
{
  "overview": "string",
  "userStories": ["string", "string", ...],
  "uiDesign": "string",
  "backendLogic": "string",
  "diagrams": ["string", "string"],
  "solutionDelta": "string",
  "deltaPrototypes": {
    "currentState": "string",
    "proposedChanges": "string",
    "userFlow": "string",
    "apiLinkages": "string",
    "cornerCases": "string"
  }
}
"#,
    );
    prompt
}

/// Test-case prompt. When a PRD exists its narrative fields are included.
pub fn test_case_prompt(brief: &RequirementBrief, prd: Option<&Prd>) -> String {
    let mut prompt =
        String::from("Generate comprehensive test cases for the following requirement:\n\n");
    write_header(&mut prompt, brief);

    if let Some(prd) = prd {
        let content = &prd.content;
        let delta = &content.delta_prototypes;
        prompt.push_str("\nAdditional PRD information:\n");
        let _ = writeln!(prompt, "Overview: {}", content.overview);
        let _ = writeln!(prompt, "UI Design: {}", content.ui_design);
        let _ = writeln!(prompt, "Backend Logic: {}", content.backend_logic);
        let _ = writeln!(prompt, "Solution Delta: {}", content.solution_delta);
        prompt.push_str("\nDelta Prototypes:\n");
        let _ = writeln!(prompt, "Current State: {}", delta.current_state);
        let _ = writeln!(prompt, "Proposed Changes: {}", delta.proposed_changes);
        let _ = writeln!(prompt, "User Flow: {}", delta.user_flow);
        let _ = writeln!(prompt, "API Linkages: {}", delta.api_linkages);
        let _ = writeln!(prompt, "Corner Cases: {}", delta.corner_cases);
    }

    prompt.push_str(
        r#"
Please generate at least 5 test cases covering:
1. Basic functionality
2. Edge cases
3. Error handling
4. Performance considerations
5. Integration with other components

Format the response as a JSON object with the following structure:
{
  "testCases": [
    {
      "title": "string",
      "description": "string",
      "preconditions": ["string", "string", ...],
      "steps": [
        {
          "stepNumber": number,
          "action": "string",
          "expectedResult": "string"
        },
        ...
      ]
    },
    ...
  ]
}
"#,
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use pm_core::{BucketKind, GeneratedBy, MetricInputs};

    fn brief() -> RequirementBrief {
        RequirementBrief {
            title: "Dark mode".to_string(),
            description: "Theme toggle".to_string(),
            bucket: "Feature".to_string(),
            squad: "Frontend".to_string(),
        }
    }

    #[test]
    fn test_brief_from_entities() {
        let bucket = Bucket::new(BucketKind::Capability, "Enhancements");
        let squad = Squad::new("QA", "Quality team");
        let requirement = Requirement::new(
            "Audit log",
            "Track changes",
            bucket.id,
            squad.id,
            MetricInputs::with_effort(2.0),
        );

        let brief = RequirementBrief::new(&requirement, &bucket, &squad);
        assert_eq!(brief.bucket, "Capability");
        assert_eq!(brief.squad, "QA");
        assert_eq!(brief.title, "Audit log");
    }

    #[test]
    fn test_prd_prompt_embeds_requirement() {
        let prompt = prd_prompt(&brief());
        assert!(prompt.contains("Title: Dark mode\n"));
        assert!(prompt.contains("Description: Theme toggle\n"));
        assert!(prompt.contains("Type: Feature\n"));
        assert!(prompt.contains("Team: Frontend\n"));
        assert!(prompt.contains("\"deltaPrototypes\""));
    }

    #[test]
    fn test_case_prompt_without_prd() {
        let prompt = test_case_prompt(&brief(), None);
        assert!(prompt.contains("Team: Frontend"));
        assert!(!prompt.contains("Additional PRD information"));
        assert!(prompt.contains("\"testCases\""));
    }

    #[test]
    fn test_case_prompt_with_prd() {
        let bucket = Bucket::new(BucketKind::Feature, "Features");
        let squad = Squad::new("Frontend", "UI team");
        let requirement = Requirement::new(
            "Dark mode",
            "Theme toggle",
            bucket.id,
            squad.id,
            MetricInputs::with_effort(2.0),
        );
        let mut draft = crate::fallback::fallback_prd("Dark mode");
        draft.overview = "Custom overview".to_string();
        let prd = Prd::from_draft(
            &requirement,
            draft,
            GeneratedBy {
                provider: "gemini".to_string(),
                model: "gemini-2.0-flash".to_string(),
            },
        );

        let prompt = test_case_prompt(&brief(), Some(&prd));
        assert!(prompt.contains("Overview: Custom overview\n"));
        assert!(prompt.contains("Current State: The current system does not have this functionality.\n"));
    }
}
