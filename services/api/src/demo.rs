use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;

use crate::infra::{standard_roster, InMemoryLeadRepository, InMemoryRoster, LogNotificationSink};
use leadflow::error::AppError;
use leadflow::workflows::import::CsvLeadImporter;
use leadflow::workflows::intake::{
    ContactMethod, LeadIntakeService, LeadRecord, LeadScorer, LeadSubmission, RoutingConfig,
    ScoredLead, ScoringConfig,
};

#[derive(Args, Debug)]
pub(crate) struct ScoreReportArgs {
    /// CSV lead export to score (Name, Email, Phone, Case Type, Message, ...)
    #[arg(long)]
    pub(crate) csv: PathBuf,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Optional CSV lead export to route instead of the built-in samples
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
}

/// Score an exported lead list without touching any roster: the pure half of
/// the pipeline, printed as a qualification report.
pub(crate) fn run_score_report(args: ScoreReportArgs) -> Result<(), AppError> {
    let submissions = CsvLeadImporter::from_path(&args.csv)?;
    let scorer = LeadScorer::new(ScoringConfig::standard());

    println!("Lead qualification report ({} leads)", submissions.len());
    println!();
    for submission in submissions {
        let scored = scorer.score(submission);
        render_scored_lead(&scored);
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let submissions = match args.csv {
        Some(path) => CsvLeadImporter::from_path(path)?,
        None => sample_submissions(),
    };

    let roster = standard_roster();
    let service = LeadIntakeService::new(
        Arc::new(roster.clone()),
        Arc::new(InMemoryLeadRepository::default()),
        Arc::new(LogNotificationSink),
        ScoringConfig::standard(),
        RoutingConfig::standard(),
    );

    println!("Lead intake demo ({} submissions)", submissions.len());
    for result in service.intake_batch(submissions) {
        match result {
            Ok(record) => render_routed_lead(&record),
            Err(err) => println!("\n! intake failed: {err}"),
        }
    }

    render_roster(&roster);
    Ok(())
}

fn render_scored_lead(scored: &ScoredLead) {
    println!(
        "- {} <{}> [{}]",
        scored.submission.name, scored.submission.email, scored.submission.case_type
    );
    println!(
        "  urgency {} | value {} | completeness {} | engagement {} | timing {}",
        scored.factors.urgency,
        scored.factors.case_value,
        scored.factors.completeness,
        scored.factors.engagement,
        scored.factors.timing
    );
    println!(
        "  aggregate {} -> {} | est. ${} | respond within {}",
        scored.aggregate,
        scored.qualification.label(),
        scored.estimated_value,
        scored.response_sla.label()
    );
}

fn render_routed_lead(record: &LeadRecord) {
    println!();
    render_scored_lead(&record.scored);
    if let Some(decision) = &record.decision {
        let member = decision
            .outcome
            .member_id()
            .map(|id| id.0.as_str())
            .unwrap_or("(queued)");
        println!(
            "  routed [{}] to {} / {} at {} priority",
            decision.outcome.label(),
            decision.team,
            member,
            decision.priority.label()
        );
        println!("  reason: {}", decision.reason);
        if !decision.alternatives.is_empty() {
            println!("  escalation: {}", decision.alternatives.join(" -> "));
        }
    }
}

fn render_roster(roster: &InMemoryRoster) {
    println!("\nRoster load after routing");
    for (team, members) in roster.snapshot() {
        println!("- {team}");
        for member in members {
            println!(
                "  {} {}/{} ({})",
                member.name,
                member.current_load,
                member.max_load,
                member.availability.label()
            );
        }
    }
}

fn sample_submissions() -> Vec<LeadSubmission> {
    vec![
        LeadSubmission {
            name: "Jordan Avery".to_string(),
            email: "jordan.avery@example.com".to_string(),
            phone: Some("515-555-0100".to_string()),
            case_type: "Personal Injury".to_string(),
            message: "Car accident on I-80 yesterday, injured and still at the hospital. \
                      How much does a consultation cost?"
                .to_string(),
            preferred_contact: Some(ContactMethod::Phone),
            location: Some("Des Moines, IA".to_string()),
            language: Some("en".to_string()),
        },
        LeadSubmission {
            name: "Priya Natarajan".to_string(),
            email: "priya.n@example.com".to_string(),
            phone: Some("515-555-0188".to_string()),
            case_type: "Business Law".to_string(),
            message: "We are reviewing a vendor contract and need counsel before the deadline \
                      next month. What are your fees for contract review?"
                .to_string(),
            preferred_contact: Some(ContactMethod::Email),
            location: Some("West Des Moines, IA".to_string()),
            language: None,
        },
        LeadSubmission {
            name: "Sam Lowe".to_string(),
            email: "sam.lowe@example.com".to_string(),
            phone: None,
            case_type: "General Inquiry".to_string(),
            message: "just curious about your services".to_string(),
            preferred_contact: None,
            location: None,
            language: None,
        },
    ]
}
