use assetbox_core::CacheKey;
use smol_str::SmolStr;
use tracing::debug;

use crate::encoding::ContentEncoding;

/// Steps the middleware walks through while handling one request.
///
/// ```text
/// Initial -> Passthrough
/// Initial -> Matched -> NotModified
/// Initial -> Matched -> PollCache -> ServedFromCache
/// Initial -> Matched -> [PollCache ->] Execute -> Executed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Request received, nothing decided yet.
    Initial,
    /// An asset owns the request path; content type is set.
    Matched,
    /// Looking the response up in the cache.
    PollCache,
    /// Running the asset's producer.
    Execute,
    /// Terminal: `If-None-Match` matched, `304` written.
    NotModified,
    /// Terminal: cached bytes written.
    ServedFromCache,
    /// Terminal: produced bytes written.
    Executed,
    /// Terminal: no asset matched, next handler ran.
    Passthrough,
}

/// The single decision taken for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Handled downstream.
    Passthrough,
    /// Answered with `304 Not Modified`.
    NotModified,
    /// Answered from the response cache.
    ServedFromCache,
    /// Answered with freshly produced bytes.
    Executed,
}

impl Outcome {
    /// Value reported in the cache status header.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Outcome::Passthrough => "PASSTHROUGH",
            Outcome::NotModified => "NOT-MODIFIED",
            Outcome::ServedFromCache => "HIT",
            Outcome::Executed => "MISS",
        }
    }
}

/// What happened while handling one request.
#[derive(Debug, Clone)]
pub struct AssetContext {
    outcome: Outcome,
    route: Option<SmolStr>,
    lookup_key: Option<CacheKey>,
    encoding: ContentEncoding,
    states: Vec<State>,
}

impl AssetContext {
    pub(crate) fn new(route: &str) -> Self {
        let mut context = Self::initial();
        context.route = Some(SmolStr::new(route));
        context.transition(State::Matched);
        context
    }

    pub(crate) fn passthrough() -> Self {
        let mut context = Self::initial();
        context.finish(State::Passthrough, Outcome::Passthrough);
        context
    }

    fn initial() -> Self {
        AssetContext {
            outcome: Outcome::Passthrough,
            route: None,
            lookup_key: None,
            encoding: ContentEncoding::Identity,
            states: vec![State::Initial],
        }
    }

    pub(crate) fn transition(&mut self, state: State) {
        debug!(route = ?self.route, from = ?self.states.last(), to = ?state, "asset state transition");
        self.states.push(state);
    }

    pub(crate) fn finish(&mut self, state: State, outcome: Outcome) {
        self.transition(state);
        self.outcome = outcome;
    }

    pub(crate) fn set_lookup_key(&mut self, key: CacheKey) {
        self.lookup_key = Some(key);
    }

    pub(crate) fn set_encoding(&mut self, encoding: ContentEncoding) {
        self.encoding = encoding;
    }

    /// The decision taken.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Route of the matched asset.
    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    /// Key used for the response cache, if it was consulted.
    pub fn lookup_key(&self) -> Option<&CacheKey> {
        self.lookup_key.as_ref()
    }

    /// Content coding negotiated for the body.
    pub fn encoding(&self) -> ContentEncoding {
        self.encoding
    }

    /// Visited states, in order.
    pub fn states(&self) -> &[State] {
        &self.states
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passthrough_is_terminal_in_one_step() {
        let context = AssetContext::passthrough();
        assert_eq!(context.outcome(), Outcome::Passthrough);
        assert_eq!(context.states(), &[State::Initial, State::Passthrough]);
        assert_eq!(context.route(), None);
    }

    #[test]
    fn finish_records_state_and_outcome() {
        let mut context = AssetContext::new("/site.css");
        context.transition(State::PollCache);
        context.finish(State::ServedFromCache, Outcome::ServedFromCache);

        assert_eq!(context.route(), Some("/site.css"));
        assert_eq!(context.outcome().as_str(), "HIT");
        assert_eq!(
            context.states(),
            &[
                State::Initial,
                State::Matched,
                State::PollCache,
                State::ServedFromCache
            ]
        );
    }
}
