use crate::geometry::DrawnGeometry;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::rc::Rc;
use uuid::Uuid;

/// A drawn geometry together with its properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Unique identifier for the feature
    pub id: Uuid,
    pub geometry: DrawnGeometry,
    pub properties: Map<String, Value>,
}

impl Feature {
    pub fn new(geometry: DrawnGeometry) -> Self {
        Self {
            id: Uuid::new_v4(),
            geometry,
            properties: Map::new(),
        }
    }

    pub fn set_property(&mut self, key: &str, value: impl Into<Value>) {
        self.properties.insert(key.to_owned(), value.into());
    }
}

/// In-memory store that finished drawings are added to
#[derive(Debug, Default, Clone)]
pub struct FeatureSource {
    features: Vec<Feature>,
}

/// Shared handle to a feature source, owned jointly by the map and its draw sessions
pub type FeatureSourceRef = Rc<RefCell<FeatureSource>>;

impl FeatureSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_ref() -> FeatureSourceRef {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn add_feature(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn get(&self, id: Uuid) -> Option<&Feature> {
        self.features.iter().find(|f| f.id == id)
    }

    pub fn remove(&mut self, id: Uuid) -> Option<Feature> {
        let index = self.features.iter().position(|f| f.id == id)?;
        Some(self.features.remove(index))
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn clear(&mut self) {
        self.features.clear();
    }
}
