//! Built-in catalog: four organisational pain points, four candidate solutions each

use super::{BoldnessTier, CatalogDefinition, GroupDefinition, OptionDefinition};

type SolutionRow = (&'static str, &'static str, &'static str);

const GROUPS: [(&str, &str, &str, [SolutionRow; 4]); 4] = [
    (
        "pain-point-manual-reporting",
        "Manual & Redundant Reporting",
        "Teams waste hours on reports that could be automated.",
        [
            (
                "solution-manual-reporting-power-bi",
                "Power BI Automation",
                "Automate the top 5 most common performance or compliance reports through Power BI.",
            ),
            (
                "solution-manual-reporting-genai-summaries",
                "GenAI Report Summaries",
                "Implement a generative AI tool that detects patterns and writes narrative summaries for departmental reports.",
            ),
            (
                "solution-manual-reporting-digital-forms",
                "Digital Request Forms",
                "Create a simple digital form for all departments to request data from each other, replacing email chains.",
            ),
            (
                "solution-manual-reporting-insights-hub",
                "Predictive Insights Hub",
                "Create a predictive insights hub that synthesizes data across service, workforce, and safety systems.",
            ),
        ],
    ),
    (
        "pain-point-data-process",
        "Inefficient Data & Processes",
        "Finding information is slow; data lives in disconnected systems.",
        [
            (
                "solution-data-process-ai-assistant",
                "AI-Powered Employee Assistant",
                "Deploy a single virtual assistant for employees to handle common queries on policies, pay, and benefits.",
            ),
            (
                "solution-data-process-tagging",
                "Intelligent Data Tagging",
                "Automatically tag, categorize, and link information across existing departmental databases.",
            ),
            (
                "solution-data-process-conversational-analytics",
                "Conversational Analytics",
                "Let leaders ask natural-language questions about performance and compliance.",
            ),
            (
                "solution-data-process-orchestrator",
                "Enterprise Work Orchestrator",
                "Dynamically allocate tasks and resources across departments in real time.",
            ),
        ],
    ),
    (
        "pain-point-communication",
        "Communication & Collaboration",
        "Information doesn't flow well between teams and departments.",
        [
            (
                "solution-communication-notifications",
                "Automated Notifications",
                "Automate email updates and alerts through adaptive notifications.",
            ),
            (
                "solution-communication-meeting-assistant",
                "AI Meeting Assistant",
                "Transcribe leadership meetings, identify action items, and flag miscommunications.",
            ),
            (
                "solution-communication-collab-spaces",
                "Real-Time Collaboration Spaces",
                "Create digital collaboration spaces using intelligent tags and dynamic search.",
            ),
            (
                "solution-communication-connection-engine",
                "AI Connection Engine",
                "Proactively connect employees working on related problems or with complementary skills.",
            ),
        ],
    ),
    (
        "pain-point-workload",
        "Workload & Workforce Management",
        "Hard to see capacity and balance work across teams.",
        [
            (
                "solution-workload-heatmap",
                "Workload Heat Map Dashboard",
                "A visual workload heat map so leadership can see capacity and bottlenecks across departments.",
            ),
            (
                "solution-workload-forecasting",
                "Predictive Resource Forecasting",
                "Forecast resource demand and training requirements from live operational data.",
            ),
            (
                "solution-workload-placeholder",
                "Exploratory Initiative",
                "A high-potential, undefined project to explore novel workforce management solutions.",
            ),
            (
                "solution-workload-talent-marketplace",
                "Dynamic Talent Marketplace",
                "A platform where employees are matched to visible projects and tasks by skills and capacity.",
            ),
        ],
    ),
];

/// Definition of the built-in catalog
///
/// Solutions are tiered by position: safe bet, wild card, moonshot, jackpot.
pub fn default_definition() -> CatalogDefinition {
    let groups = GROUPS
        .iter()
        .map(|(id, title, description, solutions)| GroupDefinition {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            options: solutions
                .iter()
                .zip(BoldnessTier::ALL)
                .map(|((option_id, option_title, option_description), tier)| OptionDefinition {
                    id: option_id.to_string(),
                    title: option_title.to_string(),
                    description: option_description.to_string(),
                    boldness: tier,
                    label: None,
                    group_id: Some(id.to_string()),
                })
                .collect(),
        })
        .collect();

    CatalogDefinition { groups }
}
