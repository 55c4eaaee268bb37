use crate::animation::{AnimationDriver, Scheduler, TimerHandle};
use crate::core::config::ViewerConfig;
use crate::core::geo::{Point, Size};
use crate::core::zoom::{ZoomLevel, ZoomTable};
use crate::input::events::Direction;
use crate::overlay::{render_overlays, Location, LocationKey, PathOverlay, PathRecord};
use crate::rendering::MapRenderer;
use crate::tiles::{TileLoader, TileSource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Snapshot of the visible region, as exposed to collaborators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    /// Top-left corner in current-zoom pixels
    pub offset: Point,
    pub zoom: usize,
    /// Viewport center in zoom-0 pixels, floored
    pub center: Point,
}

/// Pointer and offset captured when a drag starts
#[derive(Debug, Clone, Copy, PartialEq)]
struct DragAnchor {
    pointer: Point,
    offset: Point,
}

/// Everything needed to assemble a viewport; produced by the builder
pub(crate) struct ViewportParts<R, S> {
    pub zoom_levels: ZoomTable,
    pub config: ViewerConfig,
    pub size: Size,
    pub center: Point,
    pub zoom: isize,
    pub locations: BTreeMap<LocationKey, Location>,
    pub path: Option<PathRecord>,
    pub source: Box<dyn TileSource>,
    pub renderer: R,
    pub scheduler: S,
}

/// The single live view onto the map: pan offset, zoom level and everything
/// drawn inside it.
///
/// Offsets are the top-left corner of the viewport in the pixel space of the
/// current zoom level. After every public operation the offset lies within
/// `[0, max_offset]` on both axes. Navigation requests never fail; they are
/// clamped or degraded instead.
pub struct Viewport<R: MapRenderer, S: Scheduler> {
    zoom_levels: ZoomTable,
    config: ViewerConfig,
    size: Size,
    offset: Point,
    zoom: usize,
    /// Offset of the last tile load
    last_load: Point,
    default_center: Point,
    default_zoom: usize,
    locations: BTreeMap<LocationKey, Location>,
    path: Option<PathOverlay>,
    drag: Option<DragAnchor>,
    animation: AnimationDriver,
    loader: TileLoader,
    renderer: R,
    scheduler: S,
}

impl<R: MapRenderer, S: Scheduler> Viewport<R, S> {
    pub(crate) fn assemble(parts: ViewportParts<R, S>) -> crate::Result<Self> {
        let ViewportParts {
            zoom_levels,
            config,
            size,
            center,
            zoom,
            locations,
            path,
            source,
            renderer,
            scheduler,
        } = parts;

        if !size.is_positive() {
            return Err(crate::MapError::InvalidInit(format!(
                "viewport size must be positive, got {}x{}",
                size.width, size.height
            ))
            .into());
        }
        if !center.is_finite() {
            return Err(crate::MapError::InvalidInit("initial center is not finite".to_string()).into());
        }

        let zoom = match zoom_levels.correct_index(zoom) {
            Some(corrected) => {
                log::warn!("initial zoom {} out of range, using {}", zoom, corrected);
                corrected
            }
            None => zoom as usize,
        };

        let loader = TileLoader::new(source, config.tiles.clone());
        let path = path.map(|record| PathOverlay::new(record, &zoom_levels, loader.source()));

        let mut viewport = Self {
            zoom_levels,
            config,
            size,
            offset: Point::default(),
            zoom,
            last_load: Point::default(),
            default_center: center,
            default_zoom: zoom,
            locations,
            path,
            drag: None,
            animation: AnimationDriver::new(),
            loader,
            renderer,
            scheduler,
        };

        if let Some(path) = &viewport.path {
            viewport.renderer.preload(path.images());
        }
        viewport.renderer.select_zoom(zoom);
        viewport.center_on(center);

        log::info!(
            "viewport {}x{} ready at zoom {} centered on ({}, {})",
            size.width,
            size.height,
            zoom,
            center.x,
            center.y
        );
        Ok(viewport)
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn zoom_index(&self) -> usize {
        self.zoom
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn zoom_levels(&self) -> &ZoomTable {
        &self.zoom_levels
    }

    pub fn current_level(&self) -> &ZoomLevel {
        self.zoom_levels.level(self.zoom)
    }

    pub fn scale(&self) -> f64 {
        self.zoom_levels.scale(self.zoom)
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn last_load(&self) -> Point {
        self.last_load
    }

    pub fn default_view(&self) -> (Point, usize) {
        (self.default_center, self.default_zoom)
    }

    pub fn locations(&self) -> &BTreeMap<LocationKey, Location> {
        &self.locations
    }

    pub fn path(&self) -> Option<&PathOverlay> {
        self.path.as_ref()
    }

    pub fn animation(&self) -> &AnimationDriver {
        &self.animation
    }

    /// Ticks left in the running pan or slide
    pub fn button_scroll_count(&self) -> u32 {
        self.animation.scroll_remaining()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Zoom-0 map point under the viewport center, unrounded
    pub fn map_center(&self) -> Point {
        self.offset.add(&self.size.half()).divide(self.scale())
    }

    pub fn state(&self) -> ViewState {
        ViewState {
            offset: self.offset,
            zoom: self.zoom,
            center: self.map_center().floor(),
        }
    }

    /// Snaps so that the zoom-0 point `map` is centered, then redraws
    pub fn center_on(&mut self, map: Point) {
        self.offset = self.offset_for_center(map);
        self.update_location();
        self.redraw_overlays();
        self.load_current_view();
    }

    /// Animates towards the zoom-0 point `map`.
    ///
    /// Targets further than `slide_snap_factor` viewport widths away snap
    /// instead. If a slide or button pan is already running it is stopped
    /// on its next tick and this request is dropped.
    pub fn slide_to(&mut self, map: Point) {
        let target = self.offset_for_center(map);
        let diff = target.subtract(&self.offset);
        let distance = target.distance_to(&self.offset);
        let animation = &self.config.animation;

        if !animation.animate_slides || distance > self.size.width * animation.slide_snap_factor {
            log::debug!("slide of {:.1}px snaps", distance);
            self.center_on(map);
            return;
        }

        if self.animation.is_scrolling() {
            self.animation.interrupt_scroll();
            return;
        }

        let step = diff.divide(animation.tick_budget.max(1) as f64);
        self.animation
            .start_scroll(&mut self.scheduler, step, &self.config.animation);
    }

    /// Changes zoom keeping the same map point centered, then redraws
    pub fn set_zoom_level(&mut self, index: isize) {
        self.set_zoom_level_no_redraw(index);
        self.update_location();
        self.load_current_view();
        self.redraw_overlays();
    }

    /// Changes zoom without clamping, reloading or redrawing.
    ///
    /// Callers are expected to reposition right after, e.g. with [`Self::center_on`].
    pub fn set_zoom_level_no_redraw(&mut self, index: isize) {
        let new_zoom = match self.zoom_levels.correct_index(index) {
            Some(corrected) => {
                log::warn!(
                    "zoom level {} out of range 0..{}, using {}",
                    index,
                    self.zoom_levels.len(),
                    corrected
                );
                corrected
            }
            None => index as usize,
        };

        self.renderer.select_zoom(new_zoom);
        if new_zoom == self.zoom {
            return;
        }

        let factor = self.zoom_levels.scale(new_zoom) / self.zoom_levels.scale(self.zoom);
        let half = self.size.half();
        self.offset = self.offset.add(&half).multiply(factor).subtract(&half);
        self.zoom = new_zoom;
        log::debug!("zoom changed to {}", new_zoom);
    }

    pub fn zoom_in(&mut self) {
        if self.zoom > 0 {
            self.set_zoom_level(self.zoom as isize - 1);
        }
    }

    pub fn zoom_out(&mut self) {
        if self.zoom < self.zoom_levels.last_index() {
            self.set_zoom_level(self.zoom as isize + 1);
        }
    }

    /// Returns to the initial view; slides when the zoom is unchanged, snaps otherwise
    pub fn recenter(&mut self) {
        if self.zoom == self.default_zoom {
            self.slide_to(self.default_center);
        } else {
            self.set_zoom_level_no_redraw(self.default_zoom as isize);
            self.center_on(self.default_center);
        }
    }

    /// Moves by a pixel delta in current-zoom space
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.offset = self.offset.add(&Point::new(dx, dy));
        self.update_location();
        self.check_for_load();
    }

    /// Pan button press: preloads tiles half a viewport ahead and starts a
    /// fixed-budget scroll unless one is already running
    pub fn pan_button(&mut self, direction: Direction) {
        let extent = if direction.is_horizontal() {
            self.size.width
        } else {
            self.size.height
        };
        let ahead = self.offset.add(&direction.unit().multiply(extent / 2.0));
        self.load_view(ahead);

        let step = direction
            .unit()
            .multiply(self.config.animation.button_increment);
        self.animation
            .start_scroll(&mut self.scheduler, step, &self.config.animation);
    }

    pub fn key_down(&mut self, direction: Direction) {
        self.animation
            .press(direction, &mut self.scheduler, &self.config.animation);
    }

    pub fn key_up(&mut self, direction: Direction) {
        self.animation.release(direction, &mut self.scheduler);
    }

    pub fn begin_drag(&mut self, pointer: Point) {
        self.drag = Some(DragAnchor {
            pointer,
            offset: self.offset,
        });
    }

    /// Follows the pointer; ignored when no drag is in progress
    pub fn drag_to(&mut self, pointer: Point) {
        let Some(anchor) = self.drag else {
            return;
        };
        self.offset = anchor.offset.subtract(&pointer.subtract(&anchor.pointer));
        self.update_location();
        self.check_for_load();
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Advances whichever animation owns `handle`; stale handles are ignored
    pub fn tick(&mut self, handle: TimerHandle) {
        let reload_interval = self.config.animation.reload_check_interval;
        if let Some(tick) = self
            .animation
            .advance_scroll(handle, &mut self.scheduler, reload_interval)
        {
            self.offset = self.offset.add(&tick.step);
            self.update_location();
            if tick.check_load {
                self.check_for_load();
            }
            return;
        }

        let arrow_pan = self.config.animation.arrow_pan;
        if let Some(delta) = self
            .animation
            .advance_keys(handle, &mut self.scheduler, arrow_pan)
        {
            self.offset = self.offset.add(&delta);
            self.update_location();
            self.check_for_load();
            return;
        }

        log::trace!("ignoring tick for inactive timer {:?}", handle);
    }

    /// Cancels every running animation and forgets held keys
    pub fn stop_animations(&mut self) {
        self.animation.cancel_all(&mut self.scheduler);
    }

    /// Slides to a stored location; returns false if the key is unknown
    pub fn slide_to_location(&mut self, key: LocationKey) -> bool {
        match self.locations.get(&key) {
            Some(location) => {
                let target = location.position();
                self.slide_to(target);
                true
            }
            None => {
                log::warn!("slide to unknown location {}", key);
                false
            }
        }
    }

    /// Replaces the live route, preloading its image for every zoom level
    pub fn set_path(&mut self, record: PathRecord) {
        let path = PathOverlay::new(record, &self.zoom_levels, self.loader.source());
        self.renderer.preload(path.images());
        log::info!(
            "path {} -> {} set ({:.2} mi)",
            path.record().origin,
            path.record().destination,
            path.distance()
        );
        self.path = Some(path);
        self.redraw_overlays();
    }

    pub fn clear_path(&mut self) {
        if self.path.take().is_some() {
            self.redraw_overlays();
        }
    }

    /// Reloads tiles once the view has drifted more than half a viewport
    /// extent on either axis since the last load
    pub fn check_for_load(&mut self) {
        let drift = self.offset.subtract(&self.last_load);
        if drift.x.abs() > self.size.width / 2.0 || drift.y.abs() > self.size.height / 2.0 {
            self.load_current_view();
        }
    }

    pub fn load_current_view(&mut self) {
        self.load_view(self.offset);
    }

    /// Replaces the rendered tiles with the window around `at`
    pub fn load_view(&mut self, at: Point) {
        let tiles = self
            .loader
            .load(at, self.size, self.zoom, self.zoom_levels.level(self.zoom));
        self.renderer.replace_tiles(&tiles);
        self.last_load = at;
    }

    pub fn redraw_overlays(&mut self) {
        let frame = render_overlays(
            &self.locations,
            self.path.as_ref(),
            &self.zoom_levels,
            self.zoom,
        );
        self.renderer.replace_overlays(&frame);
    }

    fn offset_for_center(&self, map: Point) -> Point {
        map.multiply(self.scale()).subtract(&self.size.half())
    }

    /// Clamps the offset to the current level and moves the map layer
    fn update_location(&mut self) {
        self.offset = self.clamp_offset(self.offset);
        self.renderer.move_to(self.offset);
    }

    /// Keeps the viewport on the map; a map smaller than the viewport pins to zero
    fn clamp_offset(&self, offset: Point) -> Point {
        let max = self.current_level().max_offset(self.size);
        Point::new(
            offset.x.min(max.x).max(0.0),
            offset.y.min(max.y).max(0.0),
        )
    }
}

impl<R: MapRenderer, S: Scheduler> std::fmt::Debug for Viewport<R, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewport")
            .field("offset", &self.offset)
            .field("zoom", &self.zoom)
            .field("size", &self.size)
            .field("last_load", &self.last_load)
            .field("scrolling", &self.animation.is_scrolling())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{ManualScheduler, TimerSlot};
    use crate::core::builder::ViewportBuilder;
    use crate::rendering::RecordingRenderer;

    type TestViewport = Viewport<RecordingRenderer, ManualScheduler>;

    fn viewport_at(zoom: isize, center: Point) -> TestViewport {
        ViewportBuilder::new()
            .with_viewport_size(Size::new(500.0, 375.0))
            .with_center(center)
            .with_zoom(zoom)
            .build(RecordingRenderer::new(), ManualScheduler::new())
            .unwrap()
    }

    fn run_scroll(viewport: &mut TestViewport) -> usize {
        let mut ticks = 0;
        while let Some(handle) = viewport.scheduler().active(TimerSlot::Scroll) {
            viewport.tick(handle);
            ticks += 1;
        }
        ticks
    }

    fn assert_clamped(viewport: &TestViewport) {
        let max = viewport.current_level().max_offset(viewport.size());
        let offset = viewport.offset();
        assert!(offset.x >= 0.0 && offset.x <= max.x, "x out of range: {:?}", offset);
        assert!(offset.y >= 0.0 && offset.y <= max.y, "y out of range: {:?}", offset);
    }

    #[test]
    fn test_initial_offset() {
        let viewport = viewport_at(2, Point::new(3600.0, 3300.0));
        assert_eq!(viewport.offset(), Point::new(650.0, 637.5));
        assert_eq!(viewport.last_load(), Point::new(650.0, 637.5));
        assert_eq!(viewport.renderer().selected_zoom, Some(2));
        assert_eq!(viewport.renderer().tile_loads, 1);
        assert_clamped(&viewport);
    }

    #[test]
    fn test_center_on_clamps_at_edges() {
        let mut viewport = viewport_at(2, Point::new(3600.0, 3300.0));
        viewport.center_on(Point::new(0.0, 0.0));
        assert_eq!(viewport.offset(), Point::new(0.0, 0.0));

        viewport.center_on(Point::new(7200.0, 6600.0));
        assert_eq!(viewport.offset(), Point::new(1300.0, 1275.0));
        assert_eq!(viewport.renderer().position, Some(Point::new(1300.0, 1275.0)));
    }

    #[test]
    fn test_zoom_keeps_center() {
        let mut viewport = viewport_at(1, Point::new(3000.0, 2500.0));
        for target in [0, 3, 2, 0, 1] {
            let before = viewport.map_center();
            viewport.set_zoom_level_no_redraw(target);
            let after = viewport.map_center();
            assert!((before.x - after.x).abs() < 1e-9);
            assert!((before.y - after.y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zoom_out_of_range_is_corrected() {
        let mut viewport = viewport_at(1, Point::new(3600.0, 3300.0));
        viewport.set_zoom_level(10);
        assert_eq!(viewport.zoom_index(), 3);
        viewport.set_zoom_level(-4);
        assert_eq!(viewport.zoom_index(), 0);
        assert_clamped(&viewport);
    }

    #[test]
    fn test_set_same_zoom_only_reselects() {
        let mut viewport = viewport_at(2, Point::new(3600.0, 3300.0));
        let before = viewport.offset();
        viewport.set_zoom_level_no_redraw(2);
        assert_eq!(viewport.offset(), before);
        assert_eq!(viewport.renderer().selected_zoom, Some(2));
    }

    #[test]
    fn test_zoom_in_and_out_stop_at_ends() {
        let mut viewport = viewport_at(0, Point::new(3600.0, 3300.0));
        viewport.zoom_in();
        assert_eq!(viewport.zoom_index(), 0);
        for _ in 0..6 {
            viewport.zoom_out();
        }
        assert_eq!(viewport.zoom_index(), 3);
    }

    #[test]
    fn test_check_for_load_hysteresis() {
        let mut viewport = viewport_at(0, Point::new(1250.0, 1187.5));
        assert_eq!(viewport.last_load(), Point::new(1000.0, 1000.0));
        viewport.renderer_mut().reset_counters();

        viewport.pan(240.0, 0.0);
        assert_eq!(viewport.renderer().tile_loads, 0);
        assert_eq!(viewport.last_load(), Point::new(1000.0, 1000.0));

        viewport.pan(20.0, 0.0);
        assert_eq!(viewport.renderer().tile_loads, 1);
        assert_eq!(viewport.last_load(), Point::new(1260.0, 1000.0));
    }

    #[test]
    fn test_slide_runs_thirty_ticks() {
        let mut viewport = viewport_at(2, Point::new(3600.0, 3300.0));
        viewport.slide_to(Point::new(4000.0, 3000.0));

        assert_eq!(viewport.button_scroll_count(), 30);
        assert_eq!(run_scroll(&mut viewport), 30);
        assert_eq!(viewport.button_scroll_count(), 0);
        assert!(viewport.scheduler().is_idle());

        let expected = Point::new(750.0, 562.5);
        assert!((viewport.offset().x - expected.x).abs() < 1e-6);
        assert!((viewport.offset().y - expected.y).abs() < 1e-6);
    }

    #[test]
    fn test_far_slide_snaps() {
        let mut viewport = viewport_at(0, Point::new(3600.0, 3300.0));
        viewport.slide_to(Point::new(600.0, 600.0));
        assert!(viewport.scheduler().is_idle());
        assert_eq!(viewport.offset(), Point::new(350.0, 412.5));
    }

    #[test]
    fn test_second_slide_interrupts_first() {
        let mut viewport = viewport_at(2, Point::new(3600.0, 3300.0));
        viewport.slide_to(Point::new(4000.0, 3300.0));
        let handle = viewport.scheduler().active(TimerSlot::Scroll).unwrap();
        viewport.tick(handle);
        viewport.tick(handle);

        viewport.slide_to(Point::new(3000.0, 3300.0));
        assert_eq!(viewport.button_scroll_count(), 0);
        assert_eq!(run_scroll(&mut viewport), 1);
        assert!(viewport.scheduler().is_idle());
        // three steps of the first slide, none of the second
        assert!((viewport.offset().x - (650.0 + 3.0 * 100.0 / 30.0)).abs() < 1e-9);
    }

    #[test]
    fn test_pan_button_preloads_and_scrolls() {
        let mut viewport = viewport_at(2, Point::new(3600.0, 3300.0));
        viewport.pan_button(Direction::Right);
        assert_eq!(viewport.last_load(), Point::new(900.0, 637.5));

        // a second press while scrolling does not restart
        viewport.pan_button(Direction::Down);
        assert_eq!(viewport.scheduler().timers().len(), 1);

        assert_eq!(run_scroll(&mut viewport), 30);
        assert_eq!(viewport.offset(), Point::new(950.0, 637.5));
    }

    #[test]
    fn test_button_scroll_stops_at_boundary() {
        let mut viewport = viewport_at(2, Point::new(0.0, 0.0));
        viewport.pan_button(Direction::Up);
        run_scroll(&mut viewport);
        assert_eq!(viewport.offset(), Point::new(0.0, 0.0));
        assert_clamped(&viewport);
    }

    #[test]
    fn test_key_repeat_moves_until_release() {
        let mut viewport = viewport_at(2, Point::new(3600.0, 3300.0));
        viewport.key_down(Direction::Left);
        let handle = viewport.scheduler().active(TimerSlot::KeyRepeat).unwrap();
        for _ in 0..5 {
            viewport.tick(handle);
        }
        assert_eq!(viewport.offset(), Point::new(600.0, 637.5));

        viewport.key_up(Direction::Left);
        assert!(viewport.scheduler().is_idle());
        viewport.tick(handle);
        assert_eq!(viewport.offset(), Point::new(600.0, 637.5));
    }

    #[test]
    fn test_drag_moves_against_pointer() {
        let mut viewport = viewport_at(2, Point::new(3600.0, 3300.0));
        viewport.drag_to(Point::new(10.0, 10.0));
        assert_eq!(viewport.offset(), Point::new(650.0, 637.5));

        viewport.begin_drag(Point::new(100.0, 100.0));
        viewport.drag_to(Point::new(140.0, 70.0));
        assert_eq!(viewport.offset(), Point::new(610.0, 667.5));
        viewport.end_drag();
        assert!(!viewport.is_dragging());
    }

    #[test]
    fn test_recenter_after_zoom_change_snaps() {
        let mut viewport = viewport_at(2, Point::new(3600.0, 3300.0));
        viewport.set_zoom_level(0);
        viewport.pan(400.0, 0.0);
        viewport.recenter();

        assert_eq!(viewport.zoom_index(), 2);
        assert_eq!(viewport.offset(), Point::new(650.0, 637.5));
        assert!(viewport.scheduler().is_idle());
    }

    #[test]
    fn test_recenter_at_same_zoom_slides() {
        let mut viewport = viewport_at(2, Point::new(3600.0, 3300.0));
        viewport.pan(100.0, 0.0);
        viewport.recenter();
        assert!(viewport.animation().is_scrolling());
        run_scroll(&mut viewport);
        assert!((viewport.offset().x - 650.0).abs() < 1e-9);
    }

    #[test]
    fn test_state_reports_zoom0_center() {
        let viewport = viewport_at(2, Point::new(3601.0, 3302.0));
        let state = viewport.state();
        assert_eq!(state.zoom, 2);
        assert_eq!(state.center, Point::new(3601.0, 3302.0));
    }

    #[test]
    fn test_path_replacement_redraws() {
        let mut viewport = viewport_at(2, Point::new(3600.0, 3300.0));
        viewport.set_path(PathRecord {
            origin: 4,
            destination: 2,
            x: 1000.0,
            y: 1000.0,
            width: 400.0,
            height: 200.0,
            distance: 0.5,
        });

        assert_eq!(viewport.renderer().preloaded.len(), 4);
        let frame = viewport.renderer().overlays.clone().unwrap();
        assert_eq!(frame.path.unwrap().width, 100);

        viewport.clear_path();
        assert!(viewport.renderer().overlays.as_ref().unwrap().path.is_none());
    }
}
