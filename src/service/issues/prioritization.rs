//! Severity partition, prioritization buckets and the impact matrix.
//!
//! All groupings keep detection order inside a group; nothing is sorted by
//! title or id.

use crate::domain::models::{
    BusinessImpact, FixComplexity, ImpactMatrix, Issue, IssueReport, IssuesBySeverity,
    Prioritization, Severity,
};

pub fn partition_by_severity(issues: Vec<Issue>) -> IssuesBySeverity {
    let mut grouped = IssuesBySeverity::default();
    for issue in issues {
        match issue.severity {
            Severity::Critical => grouped.critical.push(issue),
            Severity::High => grouped.high.push(issue),
            Severity::Medium => grouped.medium.push(issue),
            Severity::Low => grouped.low.push(issue),
        }
    }
    grouped
}

/// Timeline bucket for one issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Immediate,
    ShortTerm,
    LongTerm,
}

pub fn bucket(issue: &Issue) -> Bucket {
    let easy = issue.fix_complexity == FixComplexity::Easy;
    match issue.severity {
        Severity::Critical => Bucket::Immediate,
        Severity::High if easy => Bucket::Immediate,
        Severity::High => Bucket::ShortTerm,
        Severity::Medium if issue.business_impact == BusinessImpact::High => Bucket::ShortTerm,
        Severity::Medium | Severity::Low => Bucket::LongTerm,
    }
}

pub fn prioritize(issues: &IssuesBySeverity) -> Prioritization {
    let mut plan = Prioritization::default();
    for issue in issues.iter() {
        let id = issue.id.clone();
        if issue.is_quick_win() {
            plan.quick_wins.push(id.clone());
        }
        match bucket(issue) {
            Bucket::Immediate => plan.immediate.push(id),
            Bucket::ShortTerm => plan.short_term.push(id),
            Bucket::LongTerm => plan.long_term.push(id),
        }
    }
    plan
}

/// (severity ∈ {critical, high}) × (easy fix) quadrants.
pub fn impact_matrix(issues: &IssuesBySeverity) -> ImpactMatrix {
    let mut matrix = ImpactMatrix::default();
    for issue in issues.iter() {
        let id = issue.id.clone();
        let easy = issue.fix_complexity == FixComplexity::Easy;
        match (issue.severity.is_severe(), easy) {
            (true, true) => matrix.quick_wins.push(id),
            (true, false) => matrix.major_projects.push(id),
            (false, true) => matrix.fill_ins.push(id),
            (false, false) => matrix.thankless_tasks.push(id),
        }
    }
    matrix
}

pub fn build_report(issues: Vec<Issue>) -> IssueReport {
    let by_severity = partition_by_severity(issues);
    IssueReport {
        total: by_severity.len(),
        prioritization: prioritize(&by_severity),
        impact_matrix: impact_matrix(&by_severity),
        by_severity,
    }
}
