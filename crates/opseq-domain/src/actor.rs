use serde::{Deserialize, Serialize};

/// A polymorphic reference to whoever triggered an operation run. The
/// engine neither dereferences nor validates this pair — it is stored
/// and returned verbatim, mirroring a Rails-style polymorphic
/// `actor_type`/`actor_id` column pair.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActorRef {
    pub actor_type: Option<String>,
    pub actor_id: Option<String>,
}

impl ActorRef {
    pub fn system() -> Self {
        ActorRef { actor_type: Some("system".to_string()), actor_id: None }
    }

    pub fn new(actor_type: impl Into<String>, actor_id: impl Into<String>) -> Self {
        ActorRef { actor_type: Some(actor_type.into()), actor_id: Some(actor_id.into()) }
    }
}
