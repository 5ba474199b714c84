//! Folds streamed text fragments into the final reply.

use futures::{Stream, StreamExt};

use crate::Result;

/// Text used when a stream completes without producing any text.
pub const NO_RESPONSE_PLACEHOLDER: &str = "No response generated.";

/// Concatenates fragments in arrival order.
#[derive(Debug, Default, Clone)]
pub struct FragmentAccumulator {
    text: String,
    fragments: usize,
}

impl FragmentAccumulator {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one fragment.
    pub fn push(&mut self, fragment: &str) {
        if fragment.is_empty() {
            return;
        }
        self.text.push_str(fragment);
        self.fragments += 1;
    }

    /// The number of non-empty fragments folded so far.
    pub fn fragments(&self) -> usize {
        self.fragments
    }

    /// The text accumulated so far.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the folded text, or [`NO_RESPONSE_PLACEHOLDER`] if nothing was produced.
    pub fn finish(self) -> String {
        if self.text.is_empty() {
            NO_RESPONSE_PLACEHOLDER.to_string()
        } else {
            self.text
        }
    }
}

/// Drains a fragment stream, calling `on_fragment` for each fragment as it arrives.
///
/// The first error ends the fold; fragments received before it are discarded.
///
/// ```
/// use parley::accumulator::fold_fragments;
///
/// # tokio_test::block_on(async {
/// let fragments = futures::stream::iter(vec![Ok("Hel".to_string()), Ok("lo".to_string())]);
/// let mut seen = Vec::new();
/// let text = fold_fragments(fragments, |f| seen.push(f.to_string())).await.unwrap();
/// assert_eq!(text, "Hello");
/// assert_eq!(seen, vec!["Hel", "lo"]);
///
/// let empty = futures::stream::iter(Vec::<parley::Result<String>>::new());
/// assert_eq!(fold_fragments(empty, |_| {}).await.unwrap(), "No response generated.");
/// # })
/// ```
pub async fn fold_fragments<S, F>(stream: S, mut on_fragment: F) -> Result<String>
where
    S: Stream<Item = Result<String>>,
    F: FnMut(&str),
{
    let mut stream = std::pin::pin!(stream);
    let mut accumulator = FragmentAccumulator::new();
    while let Some(fragment) = stream.next().await {
        let fragment = fragment?;
        on_fragment(&fragment);
        accumulator.push(&fragment);
    }
    tracing::debug!(
        fragments = accumulator.fragments(),
        bytes = accumulator.text().len(),
        "reply folded"
    );
    Ok(accumulator.finish())
}
