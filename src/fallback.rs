use std::future::Future;

/// Verdict on a single candidate: accept its value, or move on to the next one.
/// Both carry a record of what happened so callers can report the full trail.
pub enum Step<T, R> {
    Accept(T, R),
    Reject(R),
}

pub struct Outcome<T, R> {
    pub winner: Option<T>,
    /// One record per candidate tried, in call order.
    pub trail: Vec<R>,
}

/// Tries `candidates` one after another and stops at the first accepted value.
///
/// Attempts are awaited strictly in sequence; the next candidate is only
/// started once the previous one has been rejected.
pub async fn first_success<C, T, R, F, Fut>(
    candidates: impl IntoIterator<Item = C>,
    mut attempt: F,
) -> Outcome<T, R>
where
    F: FnMut(C) -> Fut,
    Fut: Future<Output = Step<T, R>>,
{
    let mut trail = Vec::new();
    for candidate in candidates {
        match attempt(candidate).await {
            Step::Accept(value, record) => {
                trail.push(record);
                return Outcome {
                    winner: Some(value),
                    trail,
                };
            }
            Step::Reject(record) => trail.push(record),
        }
    }
    Outcome {
        winner: None,
        trail,
    }
}
