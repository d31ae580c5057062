use crate::event::{DrawEvent, EventBus, EventHandler, SubscriptionId};
use crate::feature::{Feature, FeatureSourceRef};
use crate::geometry::{Coordinate, DrawnGeometry};
use crate::shape::{resolve_shape, PrimitiveType, ResolvedShape, ShapeError, ShapeType};
use thiserror::Error;

/// Callback invoked with every finished feature
pub type CompletionCallback = Box<dyn FnMut(&Feature)>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DrawError {
    #[error("No drawing in progress")]
    NotDrawing,
    #[error("{shape} needs at least {needed} vertices, got {got}")]
    TooFewVertices {
        shape: ShapeType,
        needed: usize,
        got: usize,
    },
    #[error("Interaction is detached")]
    Detached,
}

/// Request to start drawing a shape into a feature source
pub struct ShapeRequest {
    pub shape: ShapeType,
    pub source: FeatureSourceRef,
    pub on_complete: Option<CompletionCallback>,
}

impl ShapeRequest {
    pub fn new(shape: ShapeType, source: FeatureSourceRef) -> Self {
        Self {
            shape,
            source,
            on_complete: None,
        }
    }

    /// Build a request from a shape name such as `"Box"` or `"Square"`
    pub fn from_name(name: &str, source: FeatureSourceRef) -> Result<Self, ShapeError> {
        Ok(Self::new(name.parse()?, source))
    }

    pub fn on_complete(mut self, callback: impl FnMut(&Feature) + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }
}

/// Create a drawing interaction for `request`.
///
/// The completion callback, if any, fires on every finished draw until the
/// interaction is detached. Attaching the interaction to a map and detaching it
/// again is left to the caller.
pub fn create_draw(request: ShapeRequest) -> DrawInteraction {
    let ShapeRequest {
        shape,
        source,
        on_complete,
    } = request;

    let mut interaction = DrawInteraction::new(shape, source);
    if let Some(mut on_complete) = on_complete {
        let id = interaction.subscribe(Box::new(move |event: &DrawEvent| {
            if let DrawEvent::DrawEnd(feature) = event {
                on_complete(feature);
            }
        }));
        interaction.completion = Some(id);
    }
    interaction
}

/// Pointer-driven drawing session bound to a feature source.
///
/// The pointer path holds every committed vertex followed by the live pointer
/// position while a drawing is in progress.
pub struct DrawInteraction {
    shape: ShapeType,
    resolved: ResolvedShape,
    source: FeatureSourceRef,
    events: EventBus,
    completion: Option<SubscriptionId>,
    attached: bool,
    path: Vec<Coordinate>,
    sketch: Option<DrawnGeometry>,
}

impl std::fmt::Debug for DrawInteraction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawInteraction")
            .field("shape", &self.shape)
            .field("resolved", &self.resolved)
            .field("attached", &self.attached)
            .field("path", &self.path)
            .field("events", &self.events)
            .finish()
    }
}

impl DrawInteraction {
    pub fn new(shape: ShapeType, source: FeatureSourceRef) -> Self {
        Self {
            shape,
            resolved: resolve_shape(shape),
            source,
            events: EventBus::new(),
            completion: None,
            attached: true,
            path: Vec::new(),
            sketch: None,
        }
    }

    pub fn shape(&self) -> ShapeType {
        self.shape
    }

    pub fn resolved(&self) -> &ResolvedShape {
        &self.resolved
    }

    pub fn source(&self) -> &FeatureSourceRef {
        &self.source
    }

    pub fn is_drawing(&self) -> bool {
        !self.path.is_empty()
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Live preview of the shape being drawn
    pub fn sketch(&self) -> Option<&DrawnGeometry> {
        self.sketch.as_ref()
    }

    pub fn subscribe(&self, handler: Box<dyn EventHandler>) -> SubscriptionId {
        self.events.subscribe(handler)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Subscription created for the request's completion callback
    pub fn completion_subscription(&self) -> Option<SubscriptionId> {
        self.completion
    }

    /// Stop the interaction: discard any drawing in progress and drop every subscription.
    pub fn detach(&mut self) {
        if self.is_drawing() {
            self.abort_drawing();
        }
        self.events.clear();
        self.completion = None;
        self.attached = false;
    }

    /// Place a vertex. Returns the finished feature when this click completes the shape.
    pub fn handle_click(&mut self, coord: Coordinate) -> Option<Feature> {
        if !self.attached {
            return None;
        }

        if !self.is_drawing() {
            self.events.emit(DrawEvent::DrawStart { shape: self.shape });
            if self.resolved.primitive == PrimitiveType::Point {
                self.path.push(coord);
                return self.complete(1).ok();
            }
            self.path = vec![coord, coord];
            self.rebuild_sketch();
            return None;
        }

        if let Some(live) = self.path.last_mut() {
            *live = coord;
        }

        if self.resolved.primitive.is_two_point() {
            let committed = self.path.len();
            return self.complete(committed).ok();
        }

        let committed = self.path.len();
        if self.resolved.max_vertices.is_some_and(|max| committed >= max) {
            return self.complete(committed).ok();
        }

        self.path.push(coord);
        self.rebuild_sketch();
        None
    }

    /// Track the pointer while drawing
    pub fn handle_move(&mut self, coord: Coordinate) {
        if !self.attached || !self.is_drawing() {
            return;
        }
        if let Some(live) = self.path.last_mut() {
            *live = coord;
        }
        self.rebuild_sketch();
    }

    /// Finish the current drawing with the vertices placed so far
    pub fn finish_drawing(&mut self) -> Result<Feature, DrawError> {
        if !self.attached {
            return Err(DrawError::Detached);
        }
        if !self.is_drawing() {
            return Err(DrawError::NotDrawing);
        }

        let committed = if self.resolved.primitive.is_two_point() {
            self.path.len()
        } else {
            self.path.len() - 1
        };
        self.complete(committed)
    }

    /// Discard the current drawing
    pub fn abort_drawing(&mut self) {
        if !self.is_drawing() {
            return;
        }
        self.reset();
        self.events.emit(DrawEvent::DrawAbort { shape: self.shape });
    }

    fn min_vertices(&self) -> usize {
        match self.resolved.primitive {
            PrimitiveType::Point => 1,
            PrimitiveType::LineString | PrimitiveType::Circle => 2,
            PrimitiveType::Polygon => 3,
        }
    }

    fn rebuild_sketch(&mut self) {
        let previous = self.sketch.take();
        self.sketch = self.resolved.build_geometry(&self.path, previous);
    }

    fn complete(&mut self, committed: usize) -> Result<Feature, DrawError> {
        let needed = self.min_vertices();
        if committed < needed {
            return Err(DrawError::TooFewVertices {
                shape: self.shape,
                needed,
                got: committed,
            });
        }

        self.path.truncate(committed);
        let previous = self.sketch.take();
        let geometry = self
            .resolved
            .build_geometry(&self.path, previous)
            .ok_or(DrawError::NotDrawing)?;
        self.reset();

        let mut feature = Feature::new(geometry);
        feature.set_property("shape", self.shape.name());
        self.source.borrow_mut().add_feature(feature.clone());

        log::debug!("Finished {} drawing {}", self.shape, feature.id);
        self.events.emit(DrawEvent::DrawEnd(feature.clone()));
        Ok(feature)
    }

    fn reset(&mut self) {
        self.path.clear();
        self.sketch = None;
    }
}
