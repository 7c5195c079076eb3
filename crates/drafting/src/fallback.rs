//! Canned documents returned when a provider cannot produce a usable draft.

use pm_core::{DeltaPrototypes, PrdDraft, TestCaseDraft, TestStep};

const SEQUENCE_DIAGRAM: &str = "sequenceDiagram\n    participant User\n    participant UI\n    participant API\n    User->>UI: Interacts with feature\n    UI->>API: Sends request\n    API->>UI: Returns response\n    UI->>User: Updates display";

const COMPONENT_DIAGRAM: &str = "graph TD\n    A[Main Component] --> B[Sub Component 1]\n    A --> C[Sub Component 2]\n    B --> D[API Service]\n    C --> D";

pub fn fallback_prd(title: &str) -> PrdDraft {
    PrdDraft {
        overview: format!("This PRD covers the implementation of {title}."),
        user_stories: vec![
            format!("As a user, I want to use {title} so that I can improve my workflow."),
            format!(
                "As an administrator, I want to configure {title} so that it meets our organization's needs."
            ),
        ],
        ui_design: "The UI will consist of a main component with appropriate controls and feedback mechanisms."
            .to_string(),
        backend_logic: "The implementation will use React components with proper state management and API integration."
            .to_string(),
        diagrams: vec![SEQUENCE_DIAGRAM.to_string(), COMPONENT_DIAGRAM.to_string()],
        solution_delta: "This feature will enhance the existing product by adding new capabilities that address user needs."
            .to_string(),
        delta_prototypes: DeltaPrototypes {
            current_state: "The current system does not have this functionality.".to_string(),
            proposed_changes: "The proposed changes add a new interface for this feature.".to_string(),
            user_flow: "User navigates to the feature, interacts with controls, and receives feedback."
                .to_string(),
            api_linkages: "The UI components connect to backend APIs for data retrieval and updates."
                .to_string(),
            corner_cases: "Error states and edge cases are handled with appropriate feedback to the user."
                .to_string(),
        },
    }
}

fn logged_in_preconditions() -> Vec<String> {
    vec![
        "User is logged in".to_string(),
        "User has appropriate permissions".to_string(),
    ]
}

/// One basic-functionality case and one error-handling case.
pub fn fallback_test_cases(title: &str) -> Vec<TestCaseDraft> {
    vec![
        TestCaseDraft {
            title: format!("Basic Functionality Test for {title}"),
            description: format!("Verify that the basic functionality of {title} works as expected."),
            preconditions: logged_in_preconditions(),
            steps: vec![
                TestStep::new(1, "Navigate to the feature", "Feature is accessible"),
                TestStep::new(2, "Perform basic operation", "Operation completes successfully"),
                TestStep::new(3, "Verify results", "Results are as expected"),
            ],
        },
        TestCaseDraft {
            title: format!("Error Handling Test for {title}"),
            description: format!("Verify that errors are handled properly in {title}."),
            preconditions: logged_in_preconditions(),
            steps: vec![
                TestStep::new(1, "Navigate to the feature", "Feature is accessible"),
                TestStep::new(2, "Attempt an invalid operation", "System shows appropriate error message"),
                TestStep::new(3, "Verify system state", "System remains in a consistent state"),
            ],
        },
    ]
}
