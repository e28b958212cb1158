use glam::Vec2;
use vault_engine::{
    EngineContext, Entity, EntityId, InputEvent, Rng, SimConfig, Simulation, SurfaceProvider,
    Viewport,
};

use crate::bowl::{bowl_walls, wall_material};
use crate::catalog::SkillCatalog;
use crate::config::BowlConfig;
use crate::repulsor::Repulsor;
use crate::spawner::spawn_bubbles;

pub const WALL_TAG: &str = "wall";

/// The skill bowl: one bubble per catalog item, dropped into a funnel and
/// pushed around by the pointer.
pub struct SkillBowl {
    catalog: Option<SkillCatalog>,
    config: BowlConfig,
    sim_config: SimConfig,
    rng: Rng,
    bubbles: Vec<EntityId>,
    repulsor: Option<Repulsor>,
}

impl SkillBowl {
    /// `None` means the catalog has not arrived; the bowl stays idle.
    pub fn new(catalog: Option<SkillCatalog>, config: BowlConfig) -> Self {
        let seed = config
            .seed
            .unwrap_or_else(|| 0x5EED_0000 ^ catalog.as_ref().map_or(0, |c| c.item_count()) as u64);
        Self {
            catalog,
            config,
            sim_config: SimConfig::default(),
            rng: Rng::new(seed),
            bubbles: Vec::new(),
            repulsor: None,
        }
    }

    /// Build from host-supplied JSON.
    ///
    /// An unparsable catalog is logged and treated as not loaded. The config
    /// object may carry engine keys (`min_viewport_width`, ...) and bowl keys
    /// (`visual_radius`, ...) side by side; unknown or invalid config falls
    /// back to defaults.
    pub fn from_json(data: Option<&str>, config: Option<&str>) -> Self {
        let catalog = data.and_then(|json| match SkillCatalog::from_json(json) {
            Ok(catalog) => Some(catalog),
            Err(e) => {
                log::warn!("Ignoring skill catalog: {}", e);
                None
            }
        });

        let (bowl_config, sim_config) = match config {
            Some(json) => (
                BowlConfig::from_json(json).unwrap_or_else(|e| {
                    log::warn!("Invalid bowl config, using defaults: {}", e);
                    BowlConfig::default()
                }),
                SimConfig::from_json(json).unwrap_or_else(|e| {
                    log::warn!("Invalid engine config, using defaults: {}", e);
                    SimConfig::default()
                }),
            ),
            None => (BowlConfig::default(), SimConfig::default()),
        };

        Self::new(catalog, bowl_config).with_sim_config(sim_config)
    }

    pub fn with_sim_config(mut self, sim_config: SimConfig) -> Self {
        self.sim_config = sim_config;
        self
    }

    pub fn catalog(&self) -> Option<&SkillCatalog> {
        self.catalog.as_ref()
    }

    /// Bubble entities in catalog order.
    pub fn bubbles(&self) -> &[EntityId] {
        &self.bubbles
    }

    pub fn repulsor(&self) -> Option<&Repulsor> {
        self.repulsor.as_ref()
    }
}

impl Simulation for SkillBowl {
    fn config(&self) -> SimConfig {
        self.sim_config.clone()
    }

    fn is_ready(&self) -> bool {
        self.catalog.is_some()
    }

    fn init(&mut self, ctx: &mut EngineContext, surfaces: &mut dyn SurfaceProvider, viewport: Viewport) {
        let catalog = match &self.catalog {
            Some(catalog) => catalog,
            None => return,
        };
        let (width, height) = (viewport.container_width, viewport.container_height);

        let material = wall_material(&self.config);
        for desc in bowl_walls(width, height, &self.config) {
            let id = ctx.next_id();
            ctx.spawn_with_body(Entity::new(id).with_tag(WALL_TAG), desc, material);
        }

        self.bubbles = spawn_bubbles(ctx, surfaces, catalog.items(), width, &self.config, &mut self.rng);
        self.repulsor = Some(Repulsor::spawn(ctx, &self.config));

        log::info!(
            "Skill bowl built: {} bubbles in {} categories, {}x{}",
            self.bubbles.len(),
            catalog.categories().len(),
            width,
            height
        );
    }

    fn on_input(&mut self, ctx: &mut EngineContext, event: InputEvent) {
        let repulsor = match &self.repulsor {
            Some(repulsor) => repulsor,
            None => return,
        };
        match event {
            InputEvent::PointerMove { x, y, .. } => repulsor.move_to(ctx, Vec2::new(x, y)),
            InputEvent::PointerLeave => repulsor.park(ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bowl::REPULSOR_FILTER;
    use crate::bubble::paint_bubble;
    use vault_engine::{
        FrameHost, HostError, LoopState, PointerSource, RasterProvider, RenderBuffer,
        SimulationLoop, SkipReason, TextureRegistry,
    };

    const ONE_ITEM: &str = r##"{"languages": {"items": [{"name": "C", "color": "#64748b"}]}}"##;

    /// Ten simulated seconds at one step per frame.
    const SETTLE_FRAMES: usize = 600;

    #[derive(Default)]
    struct HeadlessHost {
        attached: bool,
        pending_frame: bool,
        detach_calls: u32,
        raster: RasterProvider,
    }

    impl FrameHost for HeadlessHost {
        fn attach(&mut self, _viewport: Viewport) -> Result<(), HostError> {
            self.attached = true;
            Ok(())
        }
        fn request_frame(&mut self) -> Result<(), HostError> {
            self.pending_frame = true;
            Ok(())
        }
        fn cancel_frame(&mut self) {
            self.pending_frame = false;
        }
        fn present(&mut self, _buffer: &RenderBuffer, _textures: &TextureRegistry) -> Result<(), HostError> {
            Ok(())
        }
        fn detach(&mut self) {
            self.attached = false;
            self.detach_calls += 1;
        }
        fn surfaces(&mut self) -> &mut dyn SurfaceProvider {
            &mut self.raster
        }
    }

    fn bowl(data: &str) -> SkillBowl {
        SkillBowl::from_json(Some(data), None)
    }

    fn desktop(width: f32, height: f32) -> Viewport {
        Viewport::new(1440.0, width, height)
    }

    /// Init directly against a context, without a loop.
    fn build(sim: &mut SkillBowl, width: f32, height: f32) -> EngineContext {
        let mut ctx = EngineContext::new(&sim.config());
        sim.init(&mut ctx, &mut RasterProvider, desktop(width, height));
        ctx
    }

    fn settle(ctx: &mut EngineContext) {
        for _ in 0..SETTLE_FRAMES {
            ctx.step_physics();
        }
    }

    #[test]
    fn one_body_and_one_matching_texture_per_item() {
        let mut sim = SkillBowl::new(Some(SkillCatalog::builtin()), BowlConfig::default());
        let ctx = build(&mut sim, 1200.0, 600.0);

        assert_eq!(ctx.physics.dynamic_body_count(), 14);
        assert_eq!(ctx.textures.len(), 14);
        assert_eq!(sim.bubbles().len(), 14);

        let config = BowlConfig::default();
        let items: Vec<_> = SkillCatalog::builtin().items().cloned().collect();
        for (id, item) in sim.bubbles().iter().zip(&items) {
            let texture = ctx.scene.get(*id).and_then(|e| e.sprite).unwrap();
            assert_eq!(ctx.textures.name(texture), Some(item.name.as_str()));

            let expected = paint_bubble(&mut RasterProvider, &item.name, &item.color, &config).unwrap();
            assert_eq!(ctx.textures.get(texture), Some(&expected), "sprite for {}", item.name);
        }
    }

    #[test]
    fn single_bubble_drops_from_above_center_and_rests_in_bowl() {
        let mut sim = bowl(ONE_ITEM);
        let mut ctx = build(&mut sim, 480.0, 480.0);
        assert_eq!(ctx.physics.dynamic_body_count(), 1);

        let id = sim.bubbles()[0];
        let start = ctx.position(id).unwrap();
        assert!((start.x - 240.0).abs() <= 20.0, "start x {}", start.x);
        assert_eq!(start.y, -50.0);

        settle(&mut ctx);
        let rest = ctx.position(id).unwrap();
        assert!(rest.y > 0.0 && rest.y < 455.0, "rest y {}", rest.y);
        assert!(ctx.velocity(id).length() < 20.0, "still moving: {:?}", ctx.velocity(id));
    }

    fn assert_contained(sim: &SkillBowl, ctx: &EngineContext, width: f32, height: f32) {
        for id in sim.bubbles() {
            let pos = ctx.position(*id).unwrap();
            assert!(
                (0.0..=height).contains(&pos.y) && (0.0..=width).contains(&pos.x),
                "bubble escaped {}x{} container: {:?}",
                width,
                height,
                pos
            );
        }
    }

    #[test]
    fn builtin_catalog_stays_inside_containers() {
        let sizes = [
            (300.0, 300.0),
            (480.0, 480.0),
            (1200.0, 600.0),
            (700.0, 900.0),
            (400.0, 1000.0),
            (1024.0, 1024.0),
        ];
        for (width, height) in sizes {
            let mut sim = SkillBowl::new(Some(SkillCatalog::builtin()), BowlConfig::default());
            let mut ctx = build(&mut sim, width, height);
            settle(&mut ctx);
            assert_contained(&sim, &ctx, width, height);
        }
    }

    #[test]
    fn pointer_sweep_keeps_bubbles_in_bowl() {
        let mut sim = SkillBowl::new(Some(SkillCatalog::builtin()), BowlConfig::default());
        let mut ctx = build(&mut sim, 480.0, 480.0);
        settle(&mut ctx);

        // Drag the repulsor back and forth across the pile.
        for pass in 0..4 {
            for step in 0..=60 {
                let t = step as f32 / 60.0;
                let x = if pass % 2 == 0 { 120.0 + 240.0 * t } else { 360.0 - 240.0 * t };
                sim.on_input(&mut ctx, InputEvent::PointerMove { x, y: 380.0, source: PointerSource::Mouse });
                ctx.step_physics();
            }
        }
        sim.on_input(&mut ctx, InputEvent::PointerLeave);
        settle(&mut ctx);
        assert_contained(&sim, &ctx, 480.0, 480.0);
    }

    #[test]
    fn empty_catalog_runs_with_walls_and_repulsor_only() {
        let mut lp = SimulationLoop::new(bowl("{}"), HeadlessHost::default());
        assert_eq!(lp.start(desktop(600.0, 480.0)).unwrap(), None);
        assert_eq!(lp.state(), LoopState::Running);

        let ctx = lp.context();
        assert_eq!(ctx.physics.dynamic_body_count(), 0);
        assert_eq!(ctx.physics.body_count(), 6);
        assert_eq!(ctx.scene.find_all_by_tag(WALL_TAG).len(), 5);
        assert!(ctx.textures.is_empty());
    }

    #[test]
    fn narrow_viewport_never_starts() {
        let mut lp = SimulationLoop::new(bowl(ONE_ITEM), HeadlessHost::default());
        let reason = lp.start(Viewport::new(800.0, 600.0, 480.0)).unwrap();
        assert_eq!(reason, Some(SkipReason::ViewportTooNarrow));
        assert!(!lp.frame().unwrap());
        assert_eq!(lp.state(), LoopState::Uninitialized);
        assert_eq!(lp.context().physics.body_count(), 0);
        assert!(!lp.host().attached);
    }

    #[test]
    fn missing_or_broken_catalog_stays_idle() {
        for sim in [SkillBowl::from_json(None, None), SkillBowl::from_json(Some("[]"), None)] {
            let mut lp = SimulationLoop::new(sim, HeadlessHost::default());
            assert_eq!(lp.start(desktop(600.0, 480.0)).unwrap(), Some(SkipReason::NotReady));
            assert_eq!(lp.state(), LoopState::Uninitialized);
        }
    }

    #[test]
    fn config_json_reaches_engine_and_bowl() {
        let sim = SkillBowl::from_json(Some("{}"), Some(r#"{"min_viewport_width": 640, "visual_radius": 20}"#));
        assert_eq!(sim.config().min_viewport_width, 640.0);
        assert_eq!(sim.config.visual_radius, 20.0);

        let mut lp = SimulationLoop::new(sim, HeadlessHost::default());
        assert_eq!(lp.start(Viewport::new(800.0, 600.0, 480.0)).unwrap(), None);
    }

    #[test]
    fn pointer_moves_repulsor_in_container_space() {
        let mut sim = bowl(ONE_ITEM);
        let mut ctx = build(&mut sim, 480.0, 480.0);
        let repulsor = *sim.repulsor().unwrap();

        // Container whose top-left sits at (600, 300) in the page.
        let event = InputEvent::pointer_from_client(
            Vec2::new(700.0, 420.0),
            Vec2::new(600.0, 300.0),
            PointerSource::Touch,
        );
        sim.on_input(&mut ctx, event);
        assert_eq!(repulsor.position(&ctx), Some(Vec2::new(100.0, 120.0)));

        ctx.step_physics();
        assert_eq!(repulsor.position(&ctx), Some(Vec2::new(100.0, 120.0)));
    }

    #[test]
    fn pointer_leave_parks_repulsor_far_from_walls() {
        let mut sim = bowl(ONE_ITEM);
        let mut ctx = build(&mut sim, 480.0, 480.0);
        let repulsor = *sim.repulsor().unwrap();

        sim.on_input(&mut ctx, InputEvent::PointerMove { x: 240.0, y: 240.0, source: PointerSource::Mouse });
        sim.on_input(&mut ctx, InputEvent::PointerLeave);

        let parked = repulsor.position(&ctx).unwrap();
        assert_eq!(parked, Vec2::new(-2000.0, -2000.0));
        for wall in ctx.scene.find_all_by_tag(WALL_TAG) {
            assert!(parked.distance(wall.pos) > 1000.0);
        }
    }

    #[test]
    fn repulsor_shoves_resting_bubble_aside() {
        let mut sim = bowl(ONE_ITEM);
        let mut ctx = build(&mut sim, 480.0, 480.0);
        let repulsor = *sim.repulsor().unwrap();
        let bubble = sim.bubbles()[0];
        settle(&mut ctx);

        let resting = ctx.position(bubble).unwrap();
        // Overlap the bubble from its lower right so it is pushed up and away.
        sim.on_input(
            &mut ctx,
            InputEvent::PointerMove { x: resting.x + 30.0, y: resting.y + 20.0, source: PointerSource::Mouse },
        );
        for _ in 0..60 {
            ctx.step_physics();
        }

        let moved = ctx.position(bubble).unwrap();
        assert!(moved.distance(resting) > 10.0, "bubble did not move: {:?}", moved);
        let gap = moved.distance(repulsor.position(&ctx).unwrap());
        assert!(gap > 60.0, "bubble still overlapping the repulsor: gap {}", gap);
    }

    #[test]
    fn repulsor_is_invisible_and_filtered_from_walls() {
        let mut sim = bowl(ONE_ITEM);
        let ctx = build(&mut sim, 480.0, 480.0);
        let entity = ctx.scene.get(sim.repulsor().unwrap().id()).unwrap();
        assert!(entity.sprite.is_none());
        let body = entity.body.unwrap();
        assert_eq!(ctx.physics.collision_filter(&body), Some(REPULSOR_FILTER));
    }

    #[test]
    fn teardown_stops_frames_and_releases_world() {
        let mut lp = SimulationLoop::new(bowl(ONE_ITEM), HeadlessHost::default());
        lp.start(desktop(480.0, 480.0)).unwrap();
        lp.frame().unwrap();
        assert!(lp.host().pending_frame);

        lp.teardown();
        lp.teardown();
        assert_eq!(lp.state(), LoopState::TornDown);
        assert!(!lp.host().pending_frame);
        assert!(!lp.host().attached);
        assert_eq!(lp.host().detach_calls, 1);
        assert_eq!(lp.context().physics.body_count(), 0);

        let frames = lp.frame_count();
        assert!(!lp.frame().unwrap());
        assert_eq!(lp.frame_count(), frames);
    }
}
