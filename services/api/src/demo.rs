use crate::infra::{default_answers, load_answers};
use clap::Args;
use mock_interview::error::AppError;
use mock_interview::interview::{
    Advance, AnswerOutcome, CandidateSummaryView, InterviewService, MemorySnapshotStore,
    NewCandidate, SnapshotStore, TickOutcome,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Text file with one answer per line; a blank line lets that question time out.
    #[arg(long)]
    pub(crate) answers_file: Option<PathBuf>,
    /// Candidate name shown in the demo output.
    #[arg(long, default_value = "Demo Candidate")]
    pub(crate) name: String,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let answers = match &args.answers_file {
        Some(path) => load_answers(path)?,
        None => default_answers(),
    };

    let service = InterviewService::new(Arc::new(MemorySnapshotStore::default()));
    let candidate = service.register_candidate(NewCandidate {
        name: args.name.clone(),
        email: "demo.candidate@example.com".to_string(),
        phone: Some("+1 555 010 0000".to_string()),
        resume_file_name: Some("demo-resume.pdf".to_string()),
        resume_data: None,
    })?;
    println!("Mock interview demo");
    println!("- Candidate {} ({})", candidate.name, candidate.id);

    let session = service.start_interview()?;
    println!(
        "- Session {} started with {} questions",
        session.session_id, session.total_questions
    );

    let mut script = answers.into_iter();
    loop {
        let Some(question) = service
            .current_session()?
            .and_then(|snapshot| snapshot.current_question)
        else {
            break;
        };
        println!(
            "\nQ{} [{} | {}s] {}",
            question.number, question.difficulty_label, question.time_limit_secs, question.text
        );

        let answer = script.next().unwrap_or_default();
        let outcome = answer_question(&service, question.number - 1, answer)?;
        println!("  score {}", outcome.score);

        if let Advance::Completed { .. } = outcome.next {
            break;
        }
    }

    let detail = service.candidate_detail(&candidate.id)?;
    render_result(&detail.candidate);

    let dashboard = service.dashboard()?;
    println!(
        "\nDashboard: {} candidate(s), {} completed, average score {}",
        dashboard.total_candidates, dashboard.completed, dashboard.average_score
    );
    Ok(())
}

/// Lets a third of the limit elapse before answering; a blank answer runs the clock out.
fn answer_question<S>(
    service: &InterviewService<S>,
    question_index: usize,
    answer: String,
) -> Result<AnswerOutcome, AppError>
where
    S: SnapshotStore + 'static,
{
    if answer.trim().is_empty() {
        loop {
            if let TickOutcome::Expired { .. } = service.tick(question_index)? {
                println!("  (no answer, time ran out)");
                return Ok(service.time_up(question_index)?);
            }
        }
    }

    let limit = service
        .current_session()?
        .and_then(|snapshot| snapshot.current_question)
        .map(|question| question.time_limit_secs)
        .unwrap_or(0);
    for _ in 0..limit / 3 {
        service.tick(question_index)?;
    }
    println!("  answer: {answer}");
    Ok(service.submit_answer(answer, None)?)
}

fn render_result(candidate: &CandidateSummaryView) {
    println!("\nResult for {}", candidate.name);
    match candidate.final_score {
        Some(score) => println!("- Final score: {score}/100"),
        None => println!("- Final score: unavailable"),
    }
    if let Some(summary) = &candidate.summary {
        println!("- Summary: {summary}");
    }
    println!("- Status: {}", candidate.status_label);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_answer_waits_for_time_up() {
        let service = InterviewService::new(Arc::new(MemorySnapshotStore::default()));
        service
            .register_candidate(NewCandidate {
                name: "Grace".to_string(),
                email: "grace@example.com".to_string(),
                phone: Some("5550001111".to_string()),
                resume_file_name: None,
                resume_data: None,
            })
            .expect("registered");
        service.start_interview().expect("started");

        let outcome = answer_question(&service, 0, String::new()).expect("timed out");
        assert_eq!(outcome.score, 0);
        assert_eq!(outcome.next, Advance::Next { question_index: 1 });

        // six of twenty seconds used: 60 + 20 * 14 / 20
        let outcome = answer_question(&service, 1, "a short but honest answer".to_string())
            .expect("answered");
        assert_eq!(outcome.score, 74);
    }

    #[test]
    fn scripted_demo_completes() {
        run_demo(DemoArgs {
            answers_file: None,
            name: "Scripted Candidate".to_string(),
        })
        .expect("demo runs");
    }
}
