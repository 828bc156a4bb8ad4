//! Login and signup form rendering.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use crate::app::state::AuthField;
use crate::app::{App, centered_rect};

/// Width of the form card.
const FORM_WIDTH: u16 = 44;

impl App {
    /// Renders the form card centered in `area`.
    pub(crate) fn render_auth(&self, frame: &mut Frame, area: Rect) {
        let form = &self.auth_form;
        let inputs: Vec<AuthField> = AuthField::order(form.view)
            .iter()
            .copied()
            .filter(AuthField::is_input)
            .collect();

        // Inputs, error line, button, switch link and a blank row, plus borders.
        #[allow(clippy::cast_possible_truncation)] // At most three inputs
        let height = inputs.len() as u16 * 3 + 1 + 3 + 2 + 2;
        let card = centered_rect(FORM_WIDTH, height, area);

        let block = Block::bordered()
            .title(format!(" {} ", form.view.title()))
            .title_style(self.theme.header_style())
            .border_style(self.theme.border_style());
        let inner = block.inner(card);
        frame.render_widget(block, card);

        let mut constraints: Vec<Constraint> =
            inputs.iter().map(|_| Constraint::Length(3)).collect();
        constraints.extend([
            Constraint::Length(1), // Validation message
            Constraint::Length(3), // Submit button
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Switch link
        ]);
        let rows = Layout::vertical(constraints).split(inner);

        for (field, area) in inputs.iter().zip(rows.iter()) {
            self.render_auth_input(frame, *field, *area);
        }

        let base = inputs.len();
        if let Some(error) = &form.error {
            frame.render_widget(
                Paragraph::new(Span::styled(error.message, self.theme.error_style())),
                rows[base],
            );
        }
        self.render_submit_button(frame, rows[base + 1]);
        self.render_switch_link(frame, rows[base + 3]);
    }

    fn render_auth_input(&self, frame: &mut Frame, field: AuthField, area: Rect) {
        let Some(textarea) = self.auth_form.textarea(field) else {
            return;
        };
        let focused = self.auth_form.focus == field;
        let border_style = if focused {
            self.theme.focus_style()
        } else {
            self.theme.border_style()
        };

        let mut textarea = textarea.clone();
        textarea.set_block(Block::bordered().border_style(border_style));
        textarea.set_style(self.theme.normal_style());
        textarea.set_placeholder_style(self.theme.placeholder_style());
        if !focused {
            textarea.set_cursor_style(Style::default());
        }
        frame.render_widget(&textarea, area);
    }

    fn render_submit_button(&self, frame: &mut Frame, area: Rect) {
        let focused = self.auth_form.focus == AuthField::Submit;
        let style = if focused {
            self.theme.focus_style().add_modifier(Modifier::REVERSED)
        } else {
            self.theme.normal_style()
        };
        let button = Paragraph::new(Line::from(Span::styled(
            self.auth_form.submit_label(),
            style,
        )))
        .centered()
        .block(Block::bordered().border_style(if focused {
            self.theme.focus_style()
        } else {
            self.theme.border_style()
        }));
        frame.render_widget(button, area);
    }

    fn render_switch_link(&self, frame: &mut Frame, area: Rect) {
        let (prompt, link) = self.auth_form.switch_prompt();
        let link_style = if self.auth_form.focus == AuthField::SwitchLink {
            self.theme
                .focus_style()
                .add_modifier(Modifier::UNDERLINED | Modifier::REVERSED)
        } else {
            self.theme.focus_style().add_modifier(Modifier::UNDERLINED)
        };
        let line = Line::from(vec![
            Span::styled(prompt, self.theme.muted_style()),
            Span::styled(link, link_style),
        ]);
        frame.render_widget(Paragraph::new(line).centered(), area);
    }

    /// Renders the key hints below the form.
    pub(crate) fn render_auth_hints(&self, frame: &mut Frame, area: Rect) {
        let hints = Line::from(vec![
            Span::styled(" [Tab] ", self.theme.focus_style()),
            Span::styled("Next field  ", self.theme.muted_style()),
            Span::styled("[Enter] ", self.theme.focus_style()),
            Span::styled("Submit  ", self.theme.muted_style()),
            Span::styled("[Ctrl+T] ", self.theme.focus_style()),
            Span::styled("Switch form  ", self.theme.muted_style()),
            Span::styled("[Esc] ", self.theme.focus_style()),
            Span::styled("Quit", self.theme.muted_style()),
        ]);
        frame.render_widget(Paragraph::new(hints), area);
    }
}
