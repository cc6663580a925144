use services::QuizResults;

/// Circumference of the score ring (r = 45 in a 100x100 viewBox).
pub const GAUGE_CIRCUMFERENCE: f64 = 2.0 * std::f64::consts::PI * 45.0;

pub const CONGRATULATIONS: &str = "Congratulations! Great job!";

#[derive(Clone, Debug, PartialEq)]
pub struct ResultRowVm {
    pub heading: String,
    pub prompt: String,
    pub confidence: &'static str,
    pub correct_answer: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResultsVm {
    pub score_label: String,
    pub weighted_label: String,
    pub gauge_dasharray: String,
    pub gauge_dashoffset: String,
    pub banner: Option<&'static str>,
    pub rows: Vec<ResultRowVm>,
}

#[must_use]
pub fn map_results(results: &QuizResults) -> ResultsVm {
    let clamped = results.score.clamp(0.0, 100.0);
    let offset = GAUGE_CIRCUMFERENCE * (1.0 - clamped / 100.0);

    ResultsVm {
        score_label: format!("{:.0}%", results.score),
        weighted_label: format!("Weighted by points: {:.0}%", results.weighted_score),
        gauge_dasharray: format!("{GAUGE_CIRCUMFERENCE:.3}"),
        gauge_dashoffset: format!("{offset:.3}"),
        banner: results.celebrate.then_some(CONGRATULATIONS),
        rows: results
            .rows
            .iter()
            .map(|row| ResultRowVm {
                heading: format!("Question {}", row.number),
                prompt: row.prompt.clone(),
                confidence: row.confidence_label(),
                correct_answer: row.correct_answer.clone(),
            })
            .collect(),
    }
}
