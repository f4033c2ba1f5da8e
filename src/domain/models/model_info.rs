use serde::{Deserialize, Serialize};

/// A remote model that can be selected for generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    id: String,
    display_name: String,
}

impl ModelInfo {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }

    /// Uses the id as the display name.
    pub fn from_id(id: impl Into<String>) -> Self {
        let id = id.into();
        Self::new(id.clone(), id)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn is_flash(&self) -> bool {
        self.id.to_lowercase().contains("flash")
    }
}

/// Orders models flash-first, then by id.
///
/// The sort key is `(!is_flash, id)`, so the result is a total order and
/// independent of the input order.
pub fn rank_models(mut models: Vec<ModelInfo>) -> Vec<ModelInfo> {
    models.sort_by(|a, b| {
        (!a.is_flash(), a.id.as_str()).cmp(&(!b.is_flash(), b.id.as_str()))
    });
    models
}
