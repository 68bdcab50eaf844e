use super::domain::{Criterion, CriterionId, RatingDescriptions, DEFAULT_USER_RATING};

struct CriterionTemplate {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    low: &'static str,
    high: &'static str,
}

const DEFAULT_CRITERIA: &[CriterionTemplate] = &[
    CriterionTemplate {
        id: "scalability",
        name: "Scalability",
        description: "Ability to grow with portfolio size, user count, and project volume.",
        low: "Suited to a single team or a handful of projects",
        high: "Handles enterprise portfolios across many business units",
    },
    CriterionTemplate {
        id: "integrations",
        name: "Integrations & Extensibility",
        description: "Connectors, APIs, and extension points for the surrounding toolchain.",
        low: "Standalone with manual imports",
        high: "Broad native connectors and a documented open API",
    },
    CriterionTemplate {
        id: "easeOfUse",
        name: "Ease of Use",
        description: "How quickly project managers and contributors become productive.",
        low: "Requires dedicated administrators and training",
        high: "Intuitive for occasional users without training",
    },
    CriterionTemplate {
        id: "flexibility",
        name: "Flexibility & Customization",
        description: "Configurable workflows, fields, and views without custom code.",
        low: "Fixed process and data model",
        high: "Workflows and data model adapt to any methodology",
    },
    CriterionTemplate {
        id: "ppmFeatures",
        name: "Portfolio Management",
        description: "Demand intake, prioritization, resource and capacity planning, financials.",
        low: "Task and project tracking only",
        high: "Full portfolio lifecycle including scenario planning",
    },
    CriterionTemplate {
        id: "reporting",
        name: "Reporting & Analytics",
        description: "Dashboards, portfolio roll-ups, and ad hoc analysis.",
        low: "Static per-project reports",
        high: "Real-time cross-portfolio analytics with custom reports",
    },
    CriterionTemplate {
        id: "security",
        name: "Security & Compliance",
        description: "Access control, audit trails, certifications, and data residency.",
        low: "Basic user accounts",
        high: "SSO, granular permissions, audit logs, and certified hosting",
    },
];

/// Criteria the wizard starts from, each at the neutral importance rating.
pub fn default_criteria() -> Vec<Criterion> {
    DEFAULT_CRITERIA
        .iter()
        .map(|template| Criterion {
            id: CriterionId(template.id.to_string()),
            name: template.name.to_string(),
            description: template.description.to_string(),
            rating_descriptions: RatingDescriptions {
                low: template.low.to_string(),
                high: template.high.to_string(),
            },
            user_rating: DEFAULT_USER_RATING,
        })
        .collect()
}
