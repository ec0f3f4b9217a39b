use metrics_exporter_prometheus::PrometheusHandle;
use mock_interview::error::AppError;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Scripted answers used by the demo when no file is given. Blank entries let the
/// question run out of time.
pub(crate) fn default_answers() -> Vec<String> {
    [
        "let and const are block scoped while var is function scoped; const also forbids reassignment.",
        "A closure is a function bundled with references to the variables of the scope it was created in, so it can keep reading them after that scope returns.",
        "Hooks let function components hold state and side effects: useState returns the current value and a setter, and useEffect runs after render whenever its dependencies change.",
        "SQL databases keep relational tables with a fixed schema and joins; NoSQL stores trade that for flexible documents or key-value data and easier horizontal scaling.",
        "",
        "Lazy load routes with React.lazy and Suspense, apply memoization with React.memo and useMemo, and split the bundle so each page ships only the code it needs.",
    ]
    .iter()
    .map(|answer| answer.to_string())
    .collect()
}

/// Reads one answer per line. A blank line stands for a question left to time out.
pub(crate) fn load_answers(path: &Path) -> Result<Vec<String>, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(raw.lines().map(|line| line.trim().to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_file_keeps_blank_lines_as_timeouts() {
        let path = std::env::temp_dir().join(format!(
            "mock-interview-answers-{}.txt",
            std::process::id()
        ));
        std::fs::write(&path, "first answer\n\n  third answer  \n").expect("written");

        let answers = load_answers(&path).expect("loads");
        assert_eq!(answers, vec!["first answer", "", "third answer"]);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_answers_file_is_an_io_error() {
        let result = load_answers(Path::new("/nonexistent/mock-interview/answers.txt"));
        assert!(matches!(result, Err(AppError::Io(_))));
    }

    #[test]
    fn default_script_answers_the_bank_in_order() {
        let bank = mock_interview::interview::QuestionBank::generate();
        let topics = ["let", "closure", "useState", "NoSQL", "", "memoization"];
        for ((question, answer), topic) in bank.iter().zip(default_answers()).zip(topics) {
            assert!(answer.contains(topic), "{answer:?} misses {topic:?}");
            assert!(
                question.text.contains(topic),
                "{topic:?} not in {:?}",
                question.text
            );
        }
        assert!(default_answers()[4].is_empty());
    }

    #[test]
    fn default_script_covers_every_question() {
        assert_eq!(
            default_answers().len(),
            mock_interview::interview::QUESTIONS_PER_SESSION
        );
    }
}
