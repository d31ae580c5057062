use crate::feature::Feature;
use crate::shape::ShapeType;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawEvent {
    /// First vertex placed
    DrawStart {
        shape: ShapeType,
    },
    /// Session finished; the feature has already been added to the bound source
    DrawEnd(Feature),
    /// Session discarded before completion
    DrawAbort {
        shape: ShapeType,
    },
}

impl DrawEvent {
    pub fn feature(&self) -> Option<&Feature> {
        match self {
            Self::DrawEnd(feature) => Some(feature),
            _ => None,
        }
    }
}
