//! Arithmetic actions: the worked example of an event union.

use serde::{Deserialize, Serialize};

use crate::filter::OfTypeStream;
use crate::stream::Observable;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Add {
    pub amount: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtract {
    pub amount: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Multiply {
    pub factor: i64,
}

tagged_union! {
    /// Actions on a running total, tagged by `type` on the wire.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(tag = "type")]
    pub enum Action: ActionType {
        #[serde(rename = "add")]
        Add = "add",
        #[serde(rename = "subtract")]
        Subtract = "subtract",
        #[serde(rename = "multiply")]
        Multiply = "multiply",
    }
}

impl Action {
    /// Apply this action to a running total.
    pub fn apply_to(&self, total: i64) -> i64 {
        match self {
            Action::Add(add) => total + add.amount,
            Action::Subtract(subtract) => total - subtract.amount,
            Action::Multiply(multiply) => total * multiply.factor,
        }
    }
}

/// Only the `add` actions of `source`, typed as [`Add`].
pub fn get_add_actions<S>(source: S) -> OfTypeStream<S, (Add,)>
where
    S: Observable<Item = Action>,
{
    source.pipe(&of_type!(Add))
}
