use tracing::error;

use super::labels::Category;

/// Department for anything the table does not cover.
pub const DEFAULT_DEPARTMENT: &str = "Customer Care";

const DEPARTMENTS: &[(Category, &str)] = &[
    (Category::DeliveryDelay, "Logistics"),
    (Category::PaymentIssue, "Finance"),
    (Category::TechnicalProblem, "IT Support"),
    (Category::RefundRequest, "Accounts"),
    (Category::GeneralInquiry, "Customer Care"),
];

/// Department owning `category`.
pub fn route(category: Category) -> &'static str {
    match DEPARTMENTS.iter().find(|(c, _)| *c == category) {
        Some((_, department)) => *department,
        None => {
            // Every category has a row; a miss means the table drifted from the enum.
            error!("No department mapped for {}, using {}", category, DEFAULT_DEPARTMENT);
            DEFAULT_DEPARTMENT
        }
    }
}

/// Department for a category given by name, e.g. one read back from a ticket.
pub fn route_name(category: &str) -> &'static str {
    category
        .parse::<Category>()
        .map(route)
        .unwrap_or(DEFAULT_DEPARTMENT)
}
