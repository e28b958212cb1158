pub mod canvas;
pub mod host;

pub use canvas::{CanvasSurface, CanvasSurfaceProvider};
pub use host::WebHost;

/// Generate the `#[wasm_bindgen]` mount surface for a simulation.
///
/// Generates:
/// - `thread_local!` storage for the mounted `SimulationLoop`
/// - frame and pointer trampolines the [`WebHost`] calls into
/// - `sim_mount`, `sim_set_data`, `sim_unmount` and `sim_state` exports
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// mod sim;
/// use sim::MySim;
///
/// vault_web::export_simulation!(MySim, "my-sim");
/// ```
///
/// # Arguments
///
/// - `$sim_type`: implements `vault_engine::Simulation` and provides
///   `fn from_json(data: Option<&str>, config: Option<&str>) -> Self`
/// - `$sim_name`: a string literal used in log messages
#[macro_export]
macro_rules! export_simulation {
    ($sim_type:ty, $sim_name:literal) => {
        use std::cell::RefCell;

        struct Mount {
            container: web_sys::HtmlElement,
            config_json: Option<String>,
            sim_loop: $crate::__engine::SimulationLoop<$sim_type, $crate::WebHost>,
        }

        thread_local! {
            static MOUNT: RefCell<Option<Mount>> = RefCell::new(None);
        }

        fn with_loop(f: impl FnOnce(&mut $crate::__engine::SimulationLoop<$sim_type, $crate::WebHost>)) {
            MOUNT.with(|cell| {
                if let Some(mount) = cell.borrow_mut().as_mut() {
                    f(&mut mount.sim_loop);
                }
            });
        }

        fn on_frame() {
            with_loop(|sim_loop| {
                if let Err(e) = sim_loop.frame() {
                    log::warn!("{}: frame failed: {}", $sim_name, e);
                }
            });
        }

        fn on_pointer(event: $crate::__engine::InputEvent) {
            with_loop(|sim_loop| sim_loop.pointer(event));
        }

        fn take_mount() -> Option<Mount> {
            MOUNT.with(|cell| cell.borrow_mut().take())
        }

        fn build_mount(
            container: web_sys::HtmlElement,
            data_json: Option<String>,
            config_json: Option<String>,
        ) -> Result<(), JsValue> {
            let sim = <$sim_type>::from_json(data_json.as_deref(), config_json.as_deref());
            let host = $crate::WebHost::new(container.clone(), on_frame, on_pointer)
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
            let viewport = host.measure();
            let mut sim_loop = $crate::__engine::SimulationLoop::new(sim, host);

            match sim_loop.start(viewport) {
                Ok(None) => log::info!("{}: running", $sim_name),
                Ok(Some(reason)) => log::info!("{}: not started ({:?})", $sim_name, reason),
                Err(e) => log::warn!("{}: failed to start: {}", $sim_name, e),
            }

            MOUNT.with(|cell| {
                *cell.borrow_mut() = Some(Mount {
                    container,
                    config_json,
                    sim_loop,
                });
            });
            Ok(())
        }

        /// Mount into `container`. Any previous mount is torn down first.
        #[wasm_bindgen]
        pub fn sim_mount(
            container: web_sys::HtmlElement,
            data_json: Option<String>,
            config_json: Option<String>,
        ) -> Result<(), JsValue> {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            if let Some(mut old) = take_mount() {
                old.sim_loop.teardown();
            }
            build_mount(container, data_json, config_json)
        }

        /// Replace the simulation's data: the current world is discarded
        /// and a fresh one built in the same container.
        #[wasm_bindgen]
        pub fn sim_set_data(data_json: Option<String>) -> Result<(), JsValue> {
            match take_mount() {
                Some(mut old) => {
                    old.sim_loop.teardown();
                    build_mount(old.container, data_json, old.config_json)
                }
                None => {
                    log::warn!("{}: sim_set_data called before sim_mount", $sim_name);
                    Ok(())
                }
            }
        }

        /// Tear down and forget the current mount. Safe to call repeatedly.
        #[wasm_bindgen]
        pub fn sim_unmount() {
            if let Some(mut old) = take_mount() {
                old.sim_loop.teardown();
                log::info!("{}: unmounted", $sim_name);
            }
        }

        /// `"unmounted"`, `"uninitialized"`, `"running"` or `"torn-down"`.
        #[wasm_bindgen]
        pub fn sim_state() -> String {
            MOUNT.with(|cell| match cell.borrow().as_ref() {
                None => "unmounted".to_string(),
                Some(mount) => match mount.sim_loop.state() {
                    $crate::__engine::LoopState::Uninitialized => "uninitialized".to_string(),
                    $crate::__engine::LoopState::Running => "running".to_string(),
                    $crate::__engine::LoopState::TornDown => "torn-down".to_string(),
                },
            })
        }
    };
}

#[doc(hidden)]
pub use vault_engine as __engine;
