use alloc::collections::VecDeque;

use super::{Intent, IntentProvider};

/// No-hardware input source used during bring-up.
#[derive(Default, Debug, Clone, Copy)]
pub struct NoInput;

impl NoInput {
    pub const fn new() -> Self {
        Self
    }
}

impl IntentProvider for NoInput {
    type Error = core::convert::Infallible;

    fn poll_intent(&mut self) -> Result<Option<Intent>, Self::Error> {
        Ok(None)
    }
}

/// Queue of intents handed out one per poll.
#[derive(Default, Debug, Clone)]
pub struct ScriptedIntents {
    queue: VecDeque<Intent>,
}

impl ScriptedIntents {
    pub fn new<I>(intents: I) -> Self
    where
        I: IntoIterator<Item = Intent>,
    {
        Self {
            queue: intents.into_iter().collect(),
        }
    }

    pub fn push(&mut self, intent: Intent) {
        self.queue.push_back(intent);
    }
}

impl IntentProvider for ScriptedIntents {
    type Error = core::convert::Infallible;

    fn poll_intent(&mut self) -> Result<Option<Intent>, Self::Error> {
        Ok(self.queue.pop_front())
    }
}
