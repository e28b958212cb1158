//! Mount/frame/teardown state machine shared by every host.
//!
//! ```text
//! Uninitialized --start()--> Running --teardown()--> TornDown
//!       |                                               ^
//!       +------------------teardown()-------------------+
//! ```
//!
//! `TornDown` is terminal: remounting or swapping the simulation's data means
//! building a fresh [`SimulationLoop`].

use log::{info, warn};
use thiserror::Error;

use crate::api::sim::{EngineContext, SimConfig, Simulation};
use crate::api::types::Viewport;
use crate::assets::paint::SurfaceProvider;
use crate::assets::textures::TextureRegistry;
use crate::input::event::InputEvent;
use crate::renderer::instance::RenderBuffer;
use crate::systems::render::build_render_buffer;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("host element missing: {0}")]
    MissingElement(String),
    #[error("host call failed: {0}")]
    Js(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Uninitialized,
    Running,
    TornDown,
}

/// Why `start` left the loop uninitialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotReady,
    ZeroArea,
    ViewportTooNarrow,
    AlreadyStarted,
}

/// The platform side of the loop: a drawing target, a frame scheduler and
/// input listeners.
pub trait FrameHost {
    /// Create the visible canvas sized to the viewport and install listeners.
    fn attach(&mut self, viewport: Viewport) -> Result<(), HostError>;

    /// Schedule the next frame callback.
    fn request_frame(&mut self) -> Result<(), HostError>;

    /// Cancel a pending frame callback, if any.
    fn cancel_frame(&mut self);

    /// Draw one frame.
    fn present(&mut self, buffer: &RenderBuffer, textures: &TextureRegistry) -> Result<(), HostError>;

    /// Remove the canvas and every listener `attach` installed.
    fn detach(&mut self);

    /// Surfaces used to paint sprite textures at init.
    fn surfaces(&mut self) -> &mut dyn SurfaceProvider;
}

pub struct SimulationLoop<S: Simulation, H: FrameHost> {
    sim: S,
    host: H,
    ctx: EngineContext,
    config: SimConfig,
    buffer: RenderBuffer,
    state: LoopState,
    frame_count: u64,
}

impl<S: Simulation, H: FrameHost> SimulationLoop<S, H> {
    pub fn new(sim: S, host: H) -> Self {
        let config = sim.config();
        let ctx = EngineContext::new(&config);
        Self {
            sim,
            host,
            ctx,
            config,
            buffer: RenderBuffer::new(),
            state: LoopState::Uninitialized,
            frame_count: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn simulation(&self) -> &S {
        &self.sim
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Build the world and schedule the first frame.
    ///
    /// Returns `Ok(Some(reason))` when a precondition failed; the loop stays
    /// `Uninitialized` and nothing is created.
    /// A host error during the first frame detaches the host and leaves the
    /// loop `TornDown`.
    pub fn start(&mut self, viewport: Viewport) -> Result<Option<SkipReason>, HostError> {
        if self.state != LoopState::Uninitialized {
            return Ok(Some(SkipReason::AlreadyStarted));
        }
        if !self.sim.is_ready() {
            info!("Simulation data not ready, staying idle");
            return Ok(Some(SkipReason::NotReady));
        }
        if viewport.window_width < self.config.min_viewport_width {
            info!(
                "Viewport {}px is below {}px, simulation disabled",
                viewport.window_width, self.config.min_viewport_width
            );
            return Ok(Some(SkipReason::ViewportTooNarrow));
        }
        if !viewport.has_area() {
            info!("Container has no area yet, staying idle");
            return Ok(Some(SkipReason::ZeroArea));
        }

        self.sim.init(&mut self.ctx, self.host.surfaces(), viewport);
        if let Err(e) = self.host.attach(viewport) {
            self.ctx.clear();
            return Err(e);
        }

        // Draw the initial positions before the first step.
        if let Err(e) = self.render().and_then(|()| self.host.request_frame()) {
            warn!("First frame failed, releasing container: {}", e);
            self.host.cancel_frame();
            self.host.detach();
            self.ctx.clear();
            self.buffer.clear();
            self.state = LoopState::TornDown;
            return Err(e);
        }
        self.state = LoopState::Running;
        info!(
            "Simulation started: {} entities, {} textures, {}x{}",
            self.ctx.scene.len(),
            self.ctx.textures.len(),
            viewport.container_width,
            viewport.container_height
        );
        Ok(None)
    }

    /// Advance one frame: update, step physics, draw, reschedule.
    /// Returns false once the loop is no longer running.
    pub fn frame(&mut self) -> Result<bool, HostError> {
        if self.state != LoopState::Running {
            return Ok(false);
        }
        self.sim.update(&mut self.ctx);
        self.ctx.step_physics();
        self.frame_count += 1;
        self.render()?;
        self.host.request_frame()?;
        Ok(true)
    }

    /// Deliver a pointer event. Ignored unless running.
    pub fn pointer(&mut self, event: InputEvent) {
        if self.state == LoopState::Running {
            self.sim.on_input(&mut self.ctx, event);
        }
    }

    /// Stop the loop and release everything. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        match self.state {
            LoopState::TornDown => return,
            LoopState::Running => {
                self.host.cancel_frame();
                self.host.detach();
            }
            LoopState::Uninitialized => {}
        }
        self.ctx.clear();
        self.buffer.clear();
        self.state = LoopState::TornDown;
        info!("Simulation torn down after {} frames", self.frame_count);
    }

    fn render(&mut self) -> Result<(), HostError> {
        build_render_buffer(self.ctx.scene.iter(), &mut self.buffer);
        self.host.present(&self.buffer, &self.ctx.textures).map_err(|e| {
            warn!("Frame presentation failed: {}", e);
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::raster::RasterProvider;
    use crate::components::entity::Entity;
    use crate::core::physics::{BodyDesc, ColliderDesc, ColliderMaterial};
    use glam::Vec2;

    #[derive(Default)]
    struct MockHost {
        attached: u32,
        detached: u32,
        requested: u32,
        cancelled: u32,
        presented: Vec<u32>,
        refuse_frames: bool,
        raster: RasterProvider,
    }

    impl FrameHost for MockHost {
        fn attach(&mut self, _viewport: Viewport) -> Result<(), HostError> {
            self.attached += 1;
            Ok(())
        }
        fn request_frame(&mut self) -> Result<(), HostError> {
            self.requested += 1;
            if self.refuse_frames {
                return Err(HostError::Js("requestAnimationFrame unavailable".into()));
            }
            Ok(())
        }
        fn cancel_frame(&mut self) {
            self.cancelled += 1;
        }
        fn present(&mut self, buffer: &RenderBuffer, _textures: &TextureRegistry) -> Result<(), HostError> {
            self.presented.push(buffer.instance_count());
            Ok(())
        }
        fn detach(&mut self) {
            self.detached += 1;
        }
        fn surfaces(&mut self) -> &mut dyn SurfaceProvider {
            &mut self.raster
        }
    }

    struct Dropper {
        ready: bool,
        moves: Vec<InputEvent>,
    }

    impl Simulation for Dropper {
        fn is_ready(&self) -> bool {
            self.ready
        }

        fn init(&mut self, ctx: &mut EngineContext, surfaces: &mut dyn SurfaceProvider, viewport: Viewport) {
            let surface = surfaces.create_surface(8).unwrap();
            let texture = ctx.textures.insert("ball", surface.finish().unwrap());
            let id = ctx.next_id();
            let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius: 4.0 })
                .with_position(Vec2::new(viewport.container_width / 2.0, 0.0));
            ctx.spawn_with_body(
                Entity::new(id).with_sprite(texture),
                desc,
                ColliderMaterial::default(),
            );
        }

        fn on_input(&mut self, _ctx: &mut EngineContext, event: InputEvent) {
            self.moves.push(event);
        }
    }

    fn dropper(ready: bool) -> SimulationLoop<Dropper, MockHost> {
        SimulationLoop::new(Dropper { ready, moves: Vec::new() }, MockHost::default())
    }

    fn desktop() -> Viewport {
        Viewport::new(1280.0, 600.0, 480.0)
    }

    #[test]
    fn start_builds_world_and_schedules_frame() {
        let mut lp = dropper(true);
        assert_eq!(lp.start(desktop()).unwrap(), None);
        assert_eq!(lp.state(), LoopState::Running);
        assert_eq!(lp.context().physics.body_count(), 1);
        assert_eq!(lp.host().attached, 1);
        assert_eq!(lp.host().requested, 1);
        assert_eq!(lp.host().presented, vec![1]);
    }

    #[test]
    fn failed_first_frame_releases_everything() {
        let mut lp = SimulationLoop::new(
            Dropper { ready: true, moves: Vec::new() },
            MockHost { refuse_frames: true, ..MockHost::default() },
        );
        assert!(matches!(lp.start(desktop()), Err(HostError::Js(_))));
        assert_eq!(lp.state(), LoopState::TornDown);
        assert_eq!(lp.host().attached, 1);
        assert_eq!(lp.host().detached, 1);
        assert_eq!(lp.context().physics.body_count(), 0);
        assert!(lp.context().textures.is_empty());

        lp.pointer(InputEvent::PointerLeave);
        assert!(lp.simulation().moves.is_empty());
        assert!(!lp.frame().unwrap());
        lp.teardown();
        assert_eq!(lp.host().detached, 1);
    }

    #[test]
    fn narrow_viewport_stays_uninitialized() {
        let mut lp = dropper(true);
        let reason = lp.start(Viewport::new(800.0, 600.0, 480.0)).unwrap();
        assert_eq!(reason, Some(SkipReason::ViewportTooNarrow));
        assert_eq!(lp.state(), LoopState::Uninitialized);
        assert_eq!(lp.context().physics.body_count(), 0);
        assert_eq!(lp.host().attached, 0);
    }

    #[test]
    fn unready_or_zero_area_stays_uninitialized() {
        let mut lp = dropper(false);
        assert_eq!(lp.start(desktop()).unwrap(), Some(SkipReason::NotReady));

        let mut lp = dropper(true);
        let reason = lp.start(Viewport::new(1280.0, 0.0, 480.0)).unwrap();
        assert_eq!(reason, Some(SkipReason::ZeroArea));
        assert_eq!(lp.state(), LoopState::Uninitialized);
    }

    #[test]
    fn each_frame_steps_once_and_reschedules() {
        let mut lp = dropper(true);
        lp.start(desktop()).unwrap();
        for _ in 0..5 {
            assert!(lp.frame().unwrap());
        }
        assert_eq!(lp.frame_count(), 5);
        assert_eq!(lp.host().requested, 6);
        assert_eq!(lp.host().presented.len(), 6);
    }

    #[test]
    fn frame_before_start_does_nothing() {
        let mut lp = dropper(true);
        assert!(!lp.frame().unwrap());
        assert_eq!(lp.frame_count(), 0);
        assert_eq!(lp.host().requested, 0);
    }

    #[test]
    fn pointer_events_reach_running_simulation_only() {
        let mut lp = dropper(true);
        lp.pointer(InputEvent::PointerLeave);
        assert!(lp.simulation().moves.is_empty());

        lp.start(desktop()).unwrap();
        lp.pointer(InputEvent::PointerLeave);
        assert_eq!(lp.simulation().moves, vec![InputEvent::PointerLeave]);
    }

    #[test]
    fn teardown_is_idempotent_and_terminal() {
        let mut lp = dropper(true);
        lp.start(desktop()).unwrap();
        lp.frame().unwrap();

        lp.teardown();
        lp.teardown();
        assert_eq!(lp.state(), LoopState::TornDown);
        assert_eq!(lp.host().cancelled, 1);
        assert_eq!(lp.host().detached, 1);
        assert_eq!(lp.context().physics.body_count(), 0);
        assert!(lp.context().textures.is_empty());

        assert!(!lp.frame().unwrap());
        assert_eq!(lp.start(desktop()).unwrap(), Some(SkipReason::AlreadyStarted));
    }

    #[test]
    fn teardown_before_start_skips_host() {
        let mut lp = dropper(true);
        lp.teardown();
        assert_eq!(lp.state(), LoopState::TornDown);
        assert_eq!(lp.host().cancelled, 0);
        assert_eq!(lp.host().detached, 0);
    }
}
