use firemap::draw::{create_draw, DrawError, ShapeRequest};
use firemap::event::DrawEvent;
use firemap::feature::{Feature, FeatureSource};
use firemap::geometry::{Coordinate, DrawnGeometry};
use firemap::shape::ShapeType;
use std::cell::RefCell;
use std::rc::Rc;

fn coord(x: f64, y: f64) -> Coordinate {
    Coordinate { x, y }
}

// Helper to create a request whose finished features are collected
fn create_test_request(shape: ShapeType) -> (ShapeRequest, Rc<RefCell<Vec<Feature>>>) {
    let finished = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&finished);
    let request = ShapeRequest::new(shape, FeatureSource::new_ref())
        .on_complete(move |feature: &Feature| sink.borrow_mut().push(feature.clone()));
    (request, finished)
}

#[test]
fn test_box_draw_completes_on_second_click() {
    let (request, finished) = create_test_request(ShapeType::Box);
    let source = Rc::clone(&request.source);
    let mut draw = create_draw(request);

    assert!(draw.handle_click(coord(0.0, 0.0)).is_none());
    draw.handle_move(coord(1.0, 1.0));
    assert!(matches!(draw.sketch(), Some(DrawnGeometry::Polygon(_))));

    let feature = draw.handle_click(coord(2.0, 3.0)).unwrap();
    let ring = feature.geometry.exterior().unwrap();
    assert_eq!(ring.0[1], coord(0.0, 3.0));
    assert_eq!(ring.0[3], coord(2.0, 0.0));

    assert!(!draw.is_drawing());
    assert_eq!(source.borrow().len(), 1);
    assert_eq!(finished.borrow().len(), 1);
    assert_eq!(finished.borrow()[0].id, feature.id);
}

#[test]
fn test_callback_fires_on_every_draw_until_detached() {
    let (request, finished) = create_test_request(ShapeType::Point);
    let source = Rc::clone(&request.source);
    let mut draw = create_draw(request);
    assert!(draw.completion_subscription().is_some());

    draw.handle_click(coord(1.0, 1.0));
    draw.handle_click(coord(2.0, 2.0));
    assert_eq!(finished.borrow().len(), 2);

    draw.detach();
    assert!(draw.completion_subscription().is_none());
    assert!(draw.handle_click(coord(3.0, 3.0)).is_none());
    assert_eq!(finished.borrow().len(), 2);
    assert_eq!(source.borrow().len(), 2);
}

#[test]
fn test_unsubscribed_callback_stops_firing() {
    let (request, finished) = create_test_request(ShapeType::Point);
    let mut draw = create_draw(request);

    let id = draw.completion_subscription().unwrap();
    assert!(draw.unsubscribe(id));

    draw.handle_click(coord(1.0, 1.0));
    assert!(finished.borrow().is_empty());
    assert_eq!(draw.source().borrow().len(), 1);
}

#[test]
fn test_polygon_needs_three_vertices() {
    let source = FeatureSource::new_ref();
    let mut draw = create_draw(ShapeRequest::new(ShapeType::Polygon, Rc::clone(&source)));

    assert_eq!(draw.finish_drawing(), Err(DrawError::NotDrawing));

    draw.handle_click(coord(0.0, 0.0));
    draw.handle_click(coord(4.0, 0.0));
    assert_eq!(
        draw.finish_drawing(),
        Err(DrawError::TooFewVertices {
            shape: ShapeType::Polygon,
            needed: 3,
            got: 2
        })
    );

    draw.handle_click(coord(4.0, 4.0));
    draw.handle_move(coord(9.0, 9.0));
    let feature = draw.finish_drawing().unwrap();

    // The live pointer position is not part of the result; the ring is closed
    let ring = feature.geometry.exterior().unwrap();
    assert_eq!(ring.0.len(), 4);
    assert_eq!(ring.0.first(), ring.0.last());
    assert_eq!(source.borrow().len(), 1);
}

#[test]
fn test_square_draw_produces_regular_polygon() {
    let source = FeatureSource::new_ref();
    let mut draw = create_draw(ShapeRequest::new(ShapeType::Square, source));

    draw.handle_click(coord(0.0, 0.0));
    draw.handle_move(coord(0.5, 0.0));
    let feature = draw.handle_click(coord(1.0, 0.0)).unwrap();

    let ring = feature.geometry.exterior().unwrap();
    assert_eq!(ring.0.len(), 5);
    assert!((ring.0[1].x).abs() < 1e-9 && (ring.0[1].y - 1.0).abs() < 1e-9);
}

#[test]
fn test_circle_draw_keeps_center_and_radius() {
    let source = FeatureSource::new_ref();
    let mut draw = create_draw(ShapeRequest::new(ShapeType::Circle, source));

    draw.handle_click(coord(1.0, 1.0));
    let feature = draw.handle_click(coord(4.0, 5.0)).unwrap();
    match feature.geometry {
        DrawnGeometry::Circle { center, radius } => {
            assert_eq!(center, coord(1.0, 1.0));
            assert!((radius - 5.0).abs() < 1e-9);
        }
        other => panic!("expected a circle, got {:?}", other),
    }
}

#[test]
fn test_abort_emits_event_and_adds_nothing() {
    let source = FeatureSource::new_ref();
    let mut draw = create_draw(ShapeRequest::new(ShapeType::LineString, Rc::clone(&source)));

    let events = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&events);
    draw.subscribe(Box::new(move |event: &DrawEvent| log.borrow_mut().push(event.clone())));

    draw.handle_click(coord(0.0, 0.0));
    draw.handle_click(coord(1.0, 0.0));
    draw.abort_drawing();

    assert_eq!(
        *events.borrow(),
        vec![
            DrawEvent::DrawStart { shape: ShapeType::LineString },
            DrawEvent::DrawAbort { shape: ShapeType::LineString },
        ]
    );
    assert!(source.borrow().is_empty());
    assert!(draw.sketch().is_none());
}

#[test]
fn test_request_from_unknown_name_fails() {
    assert!(ShapeRequest::from_name("Hexagon", FeatureSource::new_ref()).is_err());
    let request = ShapeRequest::from_name("Box", FeatureSource::new_ref()).unwrap();
    assert_eq!(request.shape, ShapeType::Box);
}
