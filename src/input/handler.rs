use crate::animation::Scheduler;
use crate::core::geo::Point;
use crate::core::viewport::Viewport;
use crate::input::events::NavCommand;
use crate::rendering::MapRenderer;

impl<R: MapRenderer, S: Scheduler> Viewport<R, S> {
    /// Dispatches one semantic navigation command
    pub fn handle(&mut self, command: NavCommand) {
        log::trace!("handling {:?}", command);
        match command {
            NavCommand::PanButton { direction } => self.pan_button(direction),
            NavCommand::KeyDown { direction } => self.key_down(direction),
            NavCommand::KeyUp { direction } => self.key_up(direction),
            NavCommand::Pan { dx, dy } => self.pan(dx, dy),
            NavCommand::ZoomIn => self.zoom_in(),
            NavCommand::ZoomOut => self.zoom_out(),
            NavCommand::ZoomTo { index } => self.set_zoom_level(index),
            NavCommand::Recenter => self.recenter(),
            NavCommand::CenterOn { x, y } => self.center_on(Point::new(x, y)),
            NavCommand::SlideTo { x, y } => self.slide_to(Point::new(x, y)),
            NavCommand::SlideToLocation { key } => {
                self.slide_to_location(key);
            }
            NavCommand::DragStart { pointer } => self.begin_drag(pointer),
            NavCommand::DragMove { pointer } => self.drag_to(pointer),
            NavCommand::DragEnd => self.end_drag(),
        }
    }
}
