use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::{
    ConfirmClear, LandingPage, MessageList, PickerEntry, SIDEBAR_WIDTH, Sidebar, TitleBar,
};
use crate::tui::{Focus, TuiState};

/// Below this width the sidebar is hidden.
const SIDEBAR_MIN_TERMINAL_WIDTH: u16 = 70;

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};

    let picker_focused = tui.focus == Focus::Picker && !app.confirming_clear;
    tui.input_box.focused = tui.focus == Focus::Input && !app.confirming_clear;
    tui.input_box.awaiting = app.conversation.is_awaiting();
    tui.picker.include_suggestions = app.conversation.is_empty();

    let area = frame.area();
    let main_area = if area.width >= SIDEBAR_MIN_TERMINAL_WIDTH {
        let [sidebar_area, main_area] =
            Layout::horizontal([Length(SIDEBAR_WIDTH), Min(0)]).areas(area);
        Sidebar::new(&tui.picker, picker_focused).render(frame, sidebar_area);
        main_area
    } else {
        area
    };

    let input_height = tui.input_box.calculate_height(main_area.width);
    let [title_area, body_area, input_area] =
        Layout::vertical([Length(1), Min(0), Length(input_height)]).areas(main_area);

    if app.conversation.is_empty() {
        let highlighted = match tui.picker.current() {
            PickerEntry::Suggestion(i) if picker_focused => Some(i),
            _ => None,
        };
        LandingPage::new(highlighted).render(frame, body_area);
    } else {
        MessageList::new(
            &mut tui.message_list,
            app.conversation.messages(),
            app.conversation.is_awaiting(),
            spinner_frame,
        )
        .render(frame, body_area);
    }

    TitleBar::new(
        app.model_name(),
        &app.status_message,
        tui.message_list.has_unseen_content(),
    )
    .render(frame, title_area);

    tui.input_box.render(frame, input_area);

    if app.confirming_clear {
        ConfirmClear.render(frame, area);
    }
}
