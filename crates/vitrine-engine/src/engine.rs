//! Storefront Engine
//!
//! Owns the page session: the document, the resolved capability surface,
//! both viewport pipelines, the task queue, and the interactive page
//! behaviors. The host drives it with lifecycle dispatches
//! ([`Engine::dispatch_content_loaded`], [`Engine::dispatch_load`]),
//! scroll and input events, and preload/load completions; everything
//! deferred runs through [`Engine::run_until_idle`].

use std::collections::HashMap;

use vitrine_devtools::{
    render_blocking, DiagnosticsHub, LayoutShiftMonitor, LongTaskMonitor, ResourceTiming,
    ScriptError,
};
use vitrine_dom::{Document, NodeId};
use vitrine_media::{ImagePipeline, BELOW_FOLD_DELAY_MS};
use vitrine_platform::{
    Capabilities, ConnectionClass, DeviceProfile, LocalStore, TaskQueue, Timeline, TimeMs,
    TweenDefaults, Viewport,
};
use vitrine_reveal::{RevealScheduler, SingleFlight, INIT_DELAY_MS};

use crate::behaviors::{
    apply_slide_transform, build_mobile_menu, clamp_slide_index, header_on_scroll,
    newsletter_success, set_text,
};
use crate::config::Config;
use crate::task::EngineTask;

/// Key under which the theme preference persists
const THEME_KEY: &str = "darkMode";

/// Tilt-capability settings applied to every `data-tilt` element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltSettings {
    pub max_tilt_deg: f64,
    pub speed_ms: u64,
    pub glare: bool,
    pub max_glare: f64,
}

impl Default for TiltSettings {
    fn default() -> Self {
        Self {
            max_tilt_deg: 15.0,
            speed_ms: 400,
            glare: true,
            max_glare: 0.3,
        }
    }
}

/// Platform inputs resolved once before boot
#[derive(Debug)]
pub struct Session {
    pub capabilities: Capabilities,
    pub profile: DeviceProfile,
    pub connection: ConnectionClass,
    pub store: LocalStore,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            capabilities: Capabilities::full(),
            profile: DeviceProfile::desktop(),
            connection: ConnectionClass::default(),
            store: LocalStore::new(),
        }
    }
}

/// Engine-level failures. Capability absence is never an error; these
/// surface only when the page markup lacks an element an interaction
/// requires.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("required element missing: .{0}")]
    MissingElement(&'static str),
}

/// The page behavior engine
pub struct Engine {
    config: Config,
    doc: Document,
    caps: Capabilities,
    profile: DeviceProfile,
    connection: ConnectionClass,
    store: LocalStore,
    queue: TaskQueue<EngineTask>,
    viewport: Viewport,

    reveal: RevealScheduler,
    pipeline: ImagePipeline,
    /// Below-the-fold deferred images awaiting the slow-connection grace
    below_fold: Vec<NodeId>,
    /// Preloads whose start turn has run; completion arrives via
    /// [`Engine::preload_finished`]
    started_preloads: Vec<String>,

    diagnostics: DiagnosticsHub,
    long_tasks: LongTaskMonitor,
    layout_shifts: LayoutShiftMonitor,
    resources: Vec<ResourceTiming>,
    blocking_report: Vec<ResourceTiming>,

    /// Recorded entrance/floating timelines (empty without the capability)
    timelines: Vec<Timeline>,
    /// Hover scale tweens share one recording timeline
    hover_timeline: Timeline,
    tilt_targets: Vec<NodeId>,

    /// Global guard: one button ripple at a time, page-wide
    ripple_guard: SingleFlight,
    /// Per-element guards for product-image hover tweens
    image_guards: HashMap<NodeId, SingleFlight>,

    slide_index: usize,
    last_scroll_top: f64,
    resize_epoch: u64,
    scroll_refreshes: usize,
}

impl Engine {
    pub fn new(doc: Document, config: Config, session: Session) -> Self {
        let Session {
            capabilities,
            profile,
            connection,
            store,
        } = session;

        let viewport = Viewport::new(config.viewport_width, config.viewport_height);
        let pipeline = ImagePipeline::new(profile.is_low_end, capabilities.viewport_observer);

        Self {
            config,
            doc,
            caps: capabilities,
            profile,
            connection,
            store,
            queue: TaskQueue::new(),
            viewport,
            reveal: RevealScheduler::new(),
            pipeline,
            below_fold: Vec::new(),
            started_preloads: Vec::new(),
            diagnostics: DiagnosticsHub::new(),
            long_tasks: LongTaskMonitor::new(),
            layout_shifts: LayoutShiftMonitor::new(),
            resources: Vec::new(),
            blocking_report: Vec::new(),
            timelines: Vec::new(),
            hover_timeline: Timeline::new(TweenDefaults::new("power1.out", 400)),
            tilt_targets: Vec::new(),
            ripple_guard: SingleFlight::new(),
            image_guards: HashMap::new(),
            slide_index: 0,
            last_scroll_top: 0.0,
            resize_epoch: 0,
            scroll_refreshes: 0,
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Structural-ready dispatch: restore the persisted theme, start the
    /// image pipeline, and retrofit responsive hints onto eager images.
    pub fn dispatch_content_loaded(&mut self) {
        if self.store.get(THEME_KEY) == Some("true") {
            let body = self.doc.body();
            self.doc.tree_mut().add_class(body, "dark-mode");
        }

        let root = self.doc.tree().root();
        let start = self
            .pipeline
            .begin(self.doc.tree_mut(), root, self.connection, self.viewport);
        if !start.below_fold.is_empty() {
            self.below_fold = start.below_fold;
            self.queue
                .schedule_in(BELOW_FOLD_DELAY_MS, EngineTask::ObserveBelowFold);
        }

        let webp = self.caps.webp;
        self.pipeline.retrofit_loaded(self.doc.tree_mut(), root, webp);

        // Images already in the initial viewport resolve right away
        self.check_images();
    }

    /// Load dispatch: loader teardown, reveal initialization (full,
    /// degraded, or reduced-motion path), entrance timelines, tilt, and
    /// the deferred resource audit.
    pub fn dispatch_load(&mut self) {
        self.queue
            .schedule_in(self.config.loader_hide_delay_ms, EngineTask::HideLoader);

        let root = self.doc.tree().root();
        let sections = self.doc.elements_by_tag("section");

        if self.caps.reduced_motion {
            // Everything visible now, transitions disabled, zero observers,
            // and no timelines recorded
            self.reveal.apply_degraded(self.doc.tree_mut(), &sections);
            self.reveal.apply_all_immediately(self.doc.tree_mut(), root);
        } else if self.profile.is_low_end {
            self.reveal.apply_degraded(self.doc.tree_mut(), &sections);
            if self.caps.animation_timeline {
                self.timelines.push(Self::minimal_hero_timeline());
            }
        } else {
            self.queue
                .schedule_in(INIT_DELAY_MS, EngineTask::RevealBatch { start: 0 });
            if self.caps.animation_timeline {
                self.timelines.push(Self::hero_timeline());
                self.timelines.push(Self::floating_timeline());
            }
        }

        if self.caps.tilt {
            self.tilt_targets = self
                .doc
                .tree()
                .descendants(root)
                .into_iter()
                .filter(|&id| self.doc.tree().get_attr(id, "data-tilt").is_some())
                .collect();
            tracing::debug!(count = self.tilt_targets.len(), "tilt targets initialized");
        }

        if self.caps.performance_observer {
            self.queue
                .schedule_in(self.config.resource_audit_delay_ms, EngineTask::AuditResources);
        }
    }

    /// Drain the task queue, advancing the virtual clock
    pub fn run_until_idle(&mut self) {
        while let Some(task) = self.queue.next() {
            self.handle_task(task);
        }
    }

    fn handle_task(&mut self, task: EngineTask) {
        match task {
            EngineTask::HideLoader => self.hide_loader(),
            EngineTask::RevealBatch { start } => {
                let sections = self.doc.elements_by_tag("section");
                if let Some(next) =
                    self.reveal
                        .tag_batch(self.doc.tree_mut(), &sections, start)
                {
                    self.queue
                        .schedule_frame(EngineTask::RevealBatch { start: next });
                }
                // Freshly tagged elements already in view trigger now
                self.check_reveal();
            }
            EngineTask::ApplyReveal { node } => {
                RevealScheduler::apply_active(self.doc.tree_mut(), node);
            }
            EngineTask::ObserveBelowFold => {
                let group = std::mem::take(&mut self.below_fold);
                self.pipeline.observe_deferred(&group);
                self.check_images();
            }
            EngineTask::StartPreload { node: _, src } => {
                if !self.started_preloads.contains(&src) {
                    tracing::debug!(src, "image preload started");
                    self.started_preloads.push(src);
                }
            }
            EngineTask::RemoveRipple { button: _, ripple } => {
                self.doc.tree_mut().detach(ripple);
                self.ripple_guard.finish();
            }
            EngineTask::ResetCartButton { button, label } => {
                set_text(self.doc.tree_mut(), button, &label);
                if let Some(el) = self.doc.tree_mut().element_mut(button) {
                    el.clear_style("background-color");
                }
            }
            EngineTask::FinishImageHover { image } => {
                if let Some(guard) = self.image_guards.get_mut(&image) {
                    guard.finish();
                }
            }
            EngineTask::RefreshScrollTrigger { epoch } => {
                // A newer resize superseded this one
                if epoch == self.resize_epoch && self.caps.scroll_trigger {
                    self.scroll_refreshes += 1;
                    tracing::debug!("scroll-driven animations refreshed");
                }
            }
            EngineTask::AuditResources => {
                self.blocking_report = render_blocking(&self.resources);
            }
        }
    }

    fn hide_loader(&mut self) {
        if let Some(loader) = self.doc.first_by_class("loader") {
            if let Some(el) = self.doc.tree_mut().element_mut(loader) {
                el.set_style("opacity", "0");
                el.set_style("visibility", "hidden");
            }
        }
        let body = self.doc.body();
        if let Some(el) = self.doc.tree_mut().element_mut(body) {
            el.set_style("overflow", "visible");
        }
    }

    // ------------------------------------------------------------------
    // Scroll and viewport
    // ------------------------------------------------------------------

    /// Scroll event: header classes plus a scan turn for both observers
    pub fn scroll_to(&mut self, y: f64) {
        self.viewport = self.viewport.at_scroll(y);

        if let Some(header) = self.doc.elements_by_tag("header").into_iter().next() {
            header_on_scroll(self.doc.tree_mut(), header, y, self.last_scroll_top);
        }
        self.last_scroll_top = y;

        self.check_reveal();
        self.check_images();
    }

    /// Smooth-scroll to an anchor target; unknown fragments are ignored
    pub fn scroll_to_fragment(&mut self, href: &str) {
        let id = href.trim_start_matches('#');
        if let Some(target) = self.doc.get_element_by_id(id) {
            let top = self.doc.tree().bounds(target).top();
            self.scroll_to(top);
        }
    }

    /// Resize event, debounced: only the last resize in the window
    /// refreshes scroll-driven animations
    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.width = width;
        self.viewport.height = height;
        self.resize_epoch += 1;
        self.queue.schedule_in(
            self.config.resize_debounce_ms,
            EngineTask::RefreshScrollTrigger {
                epoch: self.resize_epoch,
            },
        );
    }

    fn check_reveal(&mut self) {
        let hits = self.reveal.check_viewport(self.doc.tree(), self.viewport);
        for node in self.reveal.on_intersections(&hits) {
            // Active class lands on the next animation frame
            self.queue.schedule_frame(EngineTask::ApplyReveal { node });
        }
    }

    fn check_images(&mut self) {
        let hits = self.pipeline.check_viewport(self.doc.tree(), self.viewport);
        let requests =
            self.pipeline
                .on_intersections(self.doc.tree_mut(), self.connection, &hits);
        for request in requests {
            self.queue.schedule_in(
                request.delay_ms,
                EngineTask::StartPreload {
                    node: request.node,
                    src: request.src,
                },
            );
        }
    }

    // ------------------------------------------------------------------
    // Network and load completions
    // ------------------------------------------------------------------

    /// Preload completion, success or failure
    pub fn preload_finished(&mut self, src: &str, ok: bool) {
        self.started_preloads.retain(|s| s != src);
        let connection = self.connection;
        let webp = self.caps.webp;
        self.pipeline
            .finish_preload(self.doc.tree_mut(), src, ok, connection, webp);
    }

    /// Load completion for a retrofitted eager image
    pub fn image_loaded(&mut self, node: NodeId) {
        self.pipeline.notify_loaded(self.doc.tree_mut(), node);
    }

    /// Effective-connection-type change. Already-resolved images are not
    /// re-evaluated; only future resolutions see the new class.
    pub fn connection_changed(&mut self, effective_type: &str) {
        if !self.caps.network_info {
            return;
        }
        self.connection = ConnectionClass::from_effective_type(effective_type);
        tracing::info!(connection = self.connection.as_str(), "connection class changed");
    }

    // ------------------------------------------------------------------
    // Interactive behaviors
    // ------------------------------------------------------------------

    /// Toggle the dark theme and persist the choice. Returns the new state.
    pub fn toggle_theme(&mut self) -> bool {
        let body = self.doc.body();
        let dark = self
            .doc
            .tree_mut()
            .element_mut(body)
            .map(|el| el.toggle_class("dark-mode"))
            .unwrap_or(false);
        self.store.set(THEME_KEY, if dark { "true" } else { "false" });
        dark
    }

    /// Toggle the mobile menu, building it on first use
    pub fn toggle_mobile_menu(&mut self) -> Result<(), EngineError> {
        let hamburger = self
            .doc
            .first_by_class("hamburger")
            .ok_or(EngineError::MissingElement("hamburger"))?;

        let menu = match self.doc.first_by_class("mobile-menu") {
            Some(menu) => menu,
            None => {
                let nav_links = self
                    .doc
                    .first_by_class("nav-links")
                    .ok_or(EngineError::MissingElement("nav-links"))?;
                let body = self.doc.body();
                build_mobile_menu(self.doc.tree_mut(), body, nav_links)
            }
        };

        let tree = self.doc.tree_mut();
        if let Some(el) = tree.element_mut(menu) {
            el.toggle_class("active");
        }
        if let Some(el) = tree.element_mut(hamburger) {
            el.toggle_class("active");
        }
        Ok(())
    }

    /// Close the mobile menu (close button or link activation)
    pub fn close_mobile_menu(&mut self) {
        if let Some(menu) = self.doc.first_by_class("mobile-menu") {
            self.doc.tree_mut().remove_class(menu, "active");
        }
        if let Some(hamburger) = self.doc.first_by_class("hamburger") {
            self.doc.tree_mut().remove_class(hamburger, "active");
        }
    }

    /// Advance the trending slider. Returns the clamped index.
    pub fn slider_next(&mut self) -> Result<usize, EngineError> {
        self.slide_to(self.slide_index as i64 + 1)
    }

    /// Rewind the trending slider. Returns the clamped index.
    pub fn slider_prev(&mut self) -> Result<usize, EngineError> {
        self.slide_to(self.slide_index as i64 - 1)
    }

    fn slide_to(&mut self, index: i64) -> Result<usize, EngineError> {
        let container = self
            .doc
            .first_by_class("trending-slider")
            .ok_or(EngineError::MissingElement("trending-slider"))?;
        let slide_count = self.doc.elements_by_class("trending-slide").len();

        self.slide_index = clamp_slide_index(index, slide_count);
        apply_slide_transform(
            self.doc.tree_mut(),
            container,
            self.slide_index,
            self.config.slide_width_px,
        );
        Ok(self.slide_index)
    }

    /// Newsletter submit. Returns true when the form was replaced with
    /// the success message.
    pub fn submit_newsletter(&mut self, email: &str) -> bool {
        let form = match self.doc.first_by_class("newsletter-form") {
            Some(form) => form,
            None => return false,
        };
        if email.is_empty() {
            return false;
        }
        newsletter_success(self.doc.tree_mut(), form);
        true
    }

    /// Add-to-cart click: temporary label and color, restored after the
    /// configured delay
    pub fn add_to_cart(&mut self, button: NodeId) -> Result<(), EngineError> {
        let card = self
            .doc
            .tree()
            .closest_with_class(button, "product-card")
            .ok_or(EngineError::MissingElement("product-card"))?;
        let name = self
            .doc
            .tree()
            .elements_by_tag(card, "h3")
            .into_iter()
            .next()
            .map(|h| self.doc.tree().text_content(h))
            .unwrap_or_default();

        let label = self.doc.tree().text_content(button);
        set_text(self.doc.tree_mut(), button, "Added to Cart!");
        if let Some(el) = self.doc.tree_mut().element_mut(button) {
            el.set_style("background-color", "#2ecc71");
        }
        self.queue.schedule_in(
            self.config.cart_reset_delay_ms,
            EngineTask::ResetCartButton { button, label },
        );

        tracing::info!(product = %name, "added to cart");
        Ok(())
    }

    /// Button hover: spawn a ripple at the pointer offset unless one is
    /// already live anywhere on the page. Returns the ripple node.
    pub fn hover_button(&mut self, button: NodeId, x: f64, y: f64) -> Option<NodeId> {
        if !self.ripple_guard.try_begin() {
            return None;
        }

        let tree = self.doc.tree_mut();
        let ripple = tree.create_element("span");
        tree.add_class(ripple, "ripple");
        if let Some(el) = tree.element_mut(ripple) {
            el.set_style("left", &format!("{x}px"));
            el.set_style("top", &format!("{y}px"));
        }
        tree.append_child(button, ripple);

        self.queue.schedule_in(
            self.config.ripple_lifetime_ms,
            EngineTask::RemoveRipple { button, ripple },
        );
        Some(ripple)
    }

    /// Product-image hover: scale tween guarded per element, suppressed
    /// on narrow viewports. Returns true when the tween started.
    pub fn hover_product_image(&mut self, image: NodeId) -> bool {
        if self.viewport.width <= self.config.hover_suppress_width_px {
            return false;
        }
        let guard = self.image_guards.entry(image).or_default();
        if !guard.try_begin() {
            return false;
        }

        if self.caps.animation_timeline {
            self.hover_timeline
                .to(".product-image img", &[("scale", 1.05)], 0);
        }
        let duration = self.hover_timeline.defaults.duration_ms;
        self.queue
            .schedule_in(duration, EngineTask::FinishImageHover { image });
        true
    }

    /// Product-image hover end: scale back to rest, unguarded
    pub fn leave_product_image(&mut self, _image: NodeId) {
        if self.viewport.width <= self.config.hover_suppress_width_px {
            return;
        }
        if self.caps.animation_timeline {
            self.hover_timeline
                .to(".product-image img", &[("scale", 1.0)], 0);
        }
    }

    // ------------------------------------------------------------------
    // Diagnostics
    // ------------------------------------------------------------------

    pub fn report_error(&mut self, error: ScriptError) {
        self.diagnostics.report_error(error);
    }

    pub fn report_rejection(&mut self, reason: &str) {
        self.diagnostics.report_rejection(reason);
    }

    pub fn record_long_task(&mut self, name: &str, duration_ms: f64) {
        if self.caps.performance_observer {
            self.long_tasks.record(name, duration_ms);
        }
    }

    pub fn record_layout_shift(&mut self, value: f64) {
        if self.caps.performance_observer {
            self.layout_shifts.record(value);
        }
    }

    pub fn record_resource(&mut self, resource: ResourceTiming) {
        self.resources.push(resource);
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn now(&self) -> TimeMs {
        self.queue.now()
    }

    pub fn connection(&self) -> ConnectionClass {
        self.connection
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn reveal(&self) -> &RevealScheduler {
        &self.reveal
    }

    pub fn pipeline(&self) -> &ImagePipeline {
        &self.pipeline
    }

    pub fn diagnostics(&self) -> &DiagnosticsHub {
        &self.diagnostics
    }

    pub fn long_tasks(&self) -> &LongTaskMonitor {
        &self.long_tasks
    }

    pub fn layout_shifts(&self) -> &LayoutShiftMonitor {
        &self.layout_shifts
    }

    pub fn blocking_report(&self) -> &[ResourceTiming] {
        &self.blocking_report
    }

    pub fn timelines(&self) -> &[Timeline] {
        &self.timelines
    }

    pub fn hover_timeline(&self) -> &Timeline {
        &self.hover_timeline
    }

    pub fn tilt_targets(&self) -> &[NodeId] {
        &self.tilt_targets
    }

    pub fn tilt_settings(&self) -> TiltSettings {
        TiltSettings::default()
    }

    /// Preloads started but not yet finished
    pub fn started_preloads(&self) -> &[String] {
        &self.started_preloads
    }

    pub fn slide_index(&self) -> usize {
        self.slide_index
    }

    pub fn scroll_refreshes(&self) -> usize {
        self.scroll_refreshes
    }

    // ------------------------------------------------------------------
    // Timelines
    // ------------------------------------------------------------------

    fn hero_timeline() -> Timeline {
        let mut tl = Timeline::new(TweenDefaults::new("power2.out", 800));
        tl.from(".hero-content h1", &[("y", 30.0), ("opacity", 0.0)], 0)
            .from(".hero-content p", &[("y", 20.0), ("opacity", 0.0)], -500)
            .from(".hero-buttons", &[("y", 20.0), ("opacity", 0.0)], -500);
        tl
    }

    fn floating_timeline() -> Timeline {
        let mut tl = Timeline::new(TweenDefaults::new("sine.inOut", 600));
        tl.to_looping(".floating-image", &[("y", -15.0)], 3000);
        tl
    }

    /// Hero-only entrance for low-end devices: shorter, no movement on
    /// the secondary lines
    fn minimal_hero_timeline() -> Timeline {
        let mut tl = Timeline::new(TweenDefaults::new("power2.out", 600));
        tl.from(".hero-content h1", &[("y", 20.0), ("opacity", 0.0)], 0)
            .from(".hero-content p", &[("opacity", 0.0)], -300)
            .from(".hero-buttons", &[("opacity", 0.0)], -300);
        tl
    }
}
