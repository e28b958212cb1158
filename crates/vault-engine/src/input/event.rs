use glam::Vec2;

/// Where a pointer sample came from. Touch samples read the first touch point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerSource {
    Mouse,
    Touch,
}

/// Input event types the engine understands.
/// Coordinates are container-local (origin at the container's top-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// The pointer moved to (x, y) inside the container.
    PointerMove { x: f32, y: f32, source: PointerSource },
    /// The pointer left the container (mouse leave or touch end).
    PointerLeave,
}

impl InputEvent {
    /// Build a move event from viewport-global client coordinates and the
    /// container's bounding-box origin.
    pub fn pointer_from_client(client: Vec2, container_origin: Vec2, source: PointerSource) -> Self {
        let local = client - container_origin;
        InputEvent::PointerMove {
            x: local.x,
            y: local.y,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_coordinates_become_container_local() {
        let event = InputEvent::pointer_from_client(
            Vec2::new(700.0, 420.0),
            Vec2::new(600.0, 300.0),
            PointerSource::Mouse,
        );
        assert_eq!(
            event,
            InputEvent::PointerMove {
                x: 100.0,
                y: 120.0,
                source: PointerSource::Mouse
            }
        );
    }

    #[test]
    fn touch_source_is_preserved() {
        match InputEvent::pointer_from_client(Vec2::ZERO, Vec2::ZERO, PointerSource::Touch) {
            InputEvent::PointerMove { source, .. } => assert_eq!(source, PointerSource::Touch),
            other => panic!("Expected PointerMove, got {:?}", other),
        }
    }
}
