use crate::api::Page;
use lists_core::ListsError;
use std::collections::HashSet;
use std::future::Future;
use tracing::{debug, info};

/// Outcome of feeding one page into the loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// More pages are needed.
    Continue,
    /// A termination condition was hit.
    Done,
}

/// Loop state for the pagination walk: accumulated unique names plus the
/// cursor for the next request.
#[derive(Debug)]
pub struct AggregateState {
    names: Vec<String>,
    seen: HashSet<String>,
    cursor: Option<String>,
    target: usize,
}

impl AggregateState {
    pub fn new(target: usize) -> Self {
        Self {
            names: Vec::new(),
            seen: HashSet::new(),
            cursor: None,
            target,
        }
    }

    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Pure step function: folds one page into the state and reports whether
    /// the walk is finished.
    ///
    /// Termination conditions, in order:
    /// - the page is empty (defensive, a misbehaving API must not loop us)
    /// - the target count is reached
    /// - the page carries no next cursor (upstream exhausted)
    /// - the next cursor equals the last one (upstream exhausted)
    pub fn push_page(&mut self, page: Page) -> StepOutcome {
        if page.names.is_empty() {
            debug!("empty page, stopping");
            return StepOutcome::Done;
        }

        for name in page.names {
            if self.names.len() >= self.target {
                break;
            }
            // Pagination cursors are not always strictly exclusive, so pages
            // can overlap. Keep the first-seen position.
            if self.seen.insert(name.clone()) {
                self.names.push(name);
            }
        }

        if self.names.len() >= self.target {
            return StepOutcome::Done;
        }

        match page.after {
            None => StepOutcome::Done,
            Some(next) if Some(next.as_str()) == self.cursor.as_deref() => {
                debug!("cursor repeated, stopping");
                StepOutcome::Done
            }
            Some(next) => {
                self.cursor = Some(next);
                StepOutcome::Continue
            }
        }
    }

    pub fn into_names(self) -> Vec<String> {
        self.names
    }
}

/// Walks the paginated listing until a termination condition is hit and
/// returns up to `target` unique names in first-seen rank order.
///
/// `fetch` is called with the cursor from the previous page (None for the
/// first request); one fetch is in flight at a time.
pub async fn aggregate<F, Fut>(target: usize, mut fetch: F) -> Result<Vec<String>, ListsError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page, ListsError>>,
{
    if target == 0 {
        return Ok(Vec::new());
    }

    let mut state = AggregateState::new(target);
    loop {
        let cursor = state.cursor().map(str::to_owned);
        let page = fetch(cursor).await?;
        if state.push_page(page) == StepOutcome::Done {
            break;
        }
    }

    let names = state.into_names();
    info!(count = names.len(), "aggregation complete");
    Ok(names)
}
