use orrery_engine::{
    Catalog, EngineConfig, FrameHost, InputEvent, InputQueue, PointerPan, SetupError, Settings,
    Solarsystem, Timer, VectorSurface,
};

/// Owns one orrery session and wires the engine loop together.
///
/// wasm-bindgen cannot export this struct's borrows directly, so `lib.rs`
/// keeps it in a `thread_local!` and forwards free functions to it.
pub struct OrreryRunner {
    system: Solarsystem,
    settings: Settings,
    timer: Timer,
    surface: VectorSurface,
    input: InputQueue,
    pan: PointerPan,
}

impl OrreryRunner {
    pub fn new(config: EngineConfig, settings: Settings) -> Self {
        Self {
            system: Solarsystem::new(&config),
            settings,
            timer: Timer::new(&config),
            surface: VectorSurface::new(),
            input: InputQueue::new(),
            pan: PointerPan::new(),
        }
    }

    /// Replace the registry with the bodies of a catalog document.
    pub fn load_catalog(&mut self, json: &str) -> Result<(), SetupError> {
        self.system.setup_json(json, &self.settings)
    }

    pub fn load_builtin_catalog(&mut self) -> Result<(), SetupError> {
        self.system.setup(&Catalog::builtin(), &self.settings)
    }

    pub fn start(&mut self, host: &mut dyn FrameHost) {
        self.timer.start(host);
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// One host frame: apply queued input, then run due steps. Returns the
    /// number of steps run.
    pub fn frame(&mut self, timestamp_ms: f64, host: &mut dyn FrameHost) -> u32 {
        for event in self.input.drain() {
            self.pan.apply(event, &mut self.settings, &mut self.system);
        }
        self.timer.on_frame(
            timestamp_ms,
            &mut self.system,
            &mut self.settings,
            &mut self.surface,
            host,
        )
    }

    /// Follow the named body. An unknown name is kept but has no effect
    /// until a body of that name exists.
    pub fn set_focus(&mut self, name: &str) {
        if !name.is_empty() && self.system.lookup(name).is_none() {
            log::warn!("focus: no body named `{name}`");
        }
        self.settings.focus = name.to_string();
    }

    pub fn set_setting(&mut self, key: &str, value: f64) -> bool {
        let accepted = self.settings.set(key, value);
        if !accepted {
            log::warn!("settings: rejected {key} = {value}");
        }
        accepted
    }

    pub fn reset_settings(&mut self) {
        self.settings.reset();
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn system(&self) -> &Solarsystem {
        &self.system
    }

    pub fn body_names(&self) -> Vec<String> {
        self.system.body_names().into_iter().map(String::from).collect()
    }

    // ---- Vertex buffer accessors for zero-copy reads ----

    pub fn vertices_ptr(&self) -> *const f32 {
        self.surface.buffer_ptr()
    }

    pub fn vertex_count(&self) -> u32 {
        self.surface.vertex_count() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingHost {
        requests: u32,
    }

    impl FrameHost for CountingHost {
        fn request_frame(&mut self) {
            self.requests += 1;
        }
    }

    fn runner() -> OrreryRunner {
        let mut settings = Settings::default();
        settings.reset();
        let mut runner = OrreryRunner::new(EngineConfig::default(), settings);
        runner.load_builtin_catalog().unwrap();
        runner
    }

    #[test]
    fn frames_before_start_are_ignored() {
        let mut runner = runner();
        let mut host = CountingHost::default();
        assert_eq!(runner.frame(1000.0, &mut host), 0);
        assert_eq!(host.requests, 0);
        assert_eq!(runner.vertex_count(), 0);
    }

    #[test]
    fn running_frame_fills_vertex_buffer() {
        let mut runner = runner();
        let mut host = CountingHost::default();
        runner.start(&mut host);
        assert_eq!(host.requests, 1);

        let steps = runner.frame(45.0, &mut host);
        assert_eq!(steps, 2);
        assert_eq!(host.requests, 2);
        assert!(runner.vertex_count() > 0);
    }

    #[test]
    fn queued_drag_is_applied_on_next_frame() {
        let mut runner = runner();
        let mut host = CountingHost::default();
        runner.start(&mut host);
        runner.push_input(InputEvent::PointerDown { x: 100.0, y: 100.0 });
        runner.push_input(InputEvent::PointerMove { x: 120.0, y: 90.0 });
        assert_eq!(runner.settings().offset_x, 0.0);

        runner.frame(1.0, &mut host);
        assert_eq!(runner.settings().offset_x, -20.0);
        assert_eq!(runner.settings().offset_y, 10.0);
    }

    #[test]
    fn setting_focus_recentres_on_output() {
        let mut runner = runner();
        let mut host = CountingHost::default();
        runner.start(&mut host);
        runner.set_focus("Sun");
        runner.frame(20.0, &mut host);
        let sun = runner.system().position_of("Sun").unwrap();
        assert_eq!(runner.settings().offset_x, sun.x - 400.0);
        assert_eq!(runner.settings().offset_y, sun.y - 300.0);
    }

    #[test]
    fn bad_catalog_keeps_bodies() {
        let mut runner = runner();
        let before = runner.body_names().len();
        assert!(runner.load_catalog("{ \"planets\": [ 1 ] }").is_err());
        assert_eq!(runner.body_names().len(), before);
    }

    #[test]
    fn rejected_setting_is_reported() {
        let mut runner = runner();
        assert!(!runner.set_setting("timeScaling", 0.0));
        assert!(!runner.set_setting("noSuchKey", 1.0));
        assert!(runner.set_setting("timeScaling", 3.0));
        assert_eq!(runner.settings().time_scaling, 3.0);
    }
}
