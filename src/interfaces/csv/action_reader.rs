use crate::domain::approval::Actor;
use crate::error::{BuyoutError, Result};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Submit,
    Approve,
    Reject,
}

/// One raw CSV row driving the approval workflow.
///
/// `approve` resolves the pending step positively (optionally escalating
/// further when the row sets `escalate`), `reject` negatively, `submit`
/// opens a new cycle.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct ActionRecord {
    pub action: ActionType,
    pub project: String,
    pub entry: String,
    #[serde(default)]
    pub actor_name: Option<String>,
    #[serde(default)]
    pub actor_email: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub escalate: Option<bool>,
}

impl ActionRecord {
    /// The acting identity, when the row names one.
    pub fn actor(&self) -> Option<Actor> {
        match (&self.actor_name, &self.actor_email) {
            (Some(name), Some(email)) => Some(Actor::new(name, email)),
            (Some(name), None) => Some(Actor::new(name, "")),
            _ => None,
        }
    }
}

/// Reads workflow actions from a CSV source, lazily deserializing rows.
pub struct ActionReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ActionReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn actions(self) -> impl Iterator<Item = Result<ActionRecord>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(BuyoutError::from))
    }
}
