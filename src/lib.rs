#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod draw;
pub mod event;
pub mod export;
pub mod feature;
pub mod geometry;
pub mod measure;
pub mod shape;
pub mod stats;
pub mod util;

pub use config::{AppConfig, CanvasOptions, ExportConfig};
pub use draw::{create_draw, DrawError, DrawInteraction, ShapeRequest};
pub use event::{DrawEvent, EventBus, EventHandler, SubscriptionId};
pub use export::{download_map, ExportError, LayeredSurface, PendingExport, RenderSurface};
pub use feature::{Feature, FeatureSource, FeatureSourceRef};
pub use geometry::{Coordinate, DrawnGeometry};
pub use measure::{calculate_area, calculate_distance, measure_feature, Measurement, Notifier};
pub use shape::{resolve_shape, GeometryFunction, PrimitiveType, ResolvedShape, ShapeType};
pub use stats::{parse_default_geo_data, parse_geo_data, AggregationResult};
