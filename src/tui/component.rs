use ratatui::Frame;
use ratatui::layout::Rect;

/// A piece of the screen that draws itself into a given area.
///
/// Components receive their data as struct fields (props) and may keep
/// presentation state of their own. `render` takes `&mut self` so layout
/// caches and scroll offsets can be updated during the draw pass, the same
/// way ratatui's `StatefulWidget` works.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that reacts to terminal events.
pub trait EventHandler {
    /// The higher-level event this component emits.
    type Event;

    /// Handle a low-level `TuiEvent`, optionally returning a higher-level one.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
