//! Render orchestration for the dice TUI

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use dice_core::Verdict;

use crate::app::App;
use crate::ui::layout::{centered_rect, dice_slots, AppLayout};
use crate::ui::widgets::{ButtonWidget, DieFaceWidget, HelpWidget};

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let layout = AppLayout::calculate(area);

    render_title_bar(frame, app, layout.title_area);
    render_dice(frame, app, layout.dice_area);
    render_result(frame, app, layout.result_area);
    render_controls(frame, app, &layout);
    render_status_bar(frame, app, layout.status_bar);

    if app.showing_help() {
        frame.render_widget(HelpWidget::new(&app.theme), centered_rect(70, 60, area));
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = Paragraph::new(Line::from(Span::styled(
        "Dice Roller",
        app.theme.title_style(),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(title, area);
}

fn render_dice(frame: &mut Frame, app: &App, area: Rect) {
    let controller = &app.controller;
    let rolling = controller.is_rolling();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(rolling));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let slots = dice_slots(controller.dice().len(), inner);
    if slots.len() < controller.dice().len() {
        render_too_small(frame, app, inner);
        return;
    }

    let elapsed = controller.roll_elapsed().unwrap_or_default();
    for (i, (value, slot)) in controller.dice().values().iter().zip(slots).enumerate() {
        let mut widget = DieFaceWidget::new(*value, &app.theme).within(inner);
        if rolling {
            if let Some(params) = controller.shake().get(i) {
                widget = widget.rolling(*params, elapsed);
            }
        }
        frame.render_widget(widget, slot);
    }
}

/// Shown instead of the dice when the table cannot hold all of them.
fn render_too_small(frame: &mut Frame, app: &App, area: Rect) {
    let count = app.controller.count();
    let hint = Paragraph::new(vec![
        Line::from(Span::styled(
            "Terminal too small",
            app.theme.verdict_style(Verdict::Lose),
        )),
        Line::from(Span::styled(
            format!("Enlarge the window to see all {count} dice"),
            app.theme.status_style(),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });

    let top = area.y + area.height.saturating_sub(2) / 2;
    let height = area.height.min(2);
    frame.render_widget(hint, Rect::new(area.x, top, area.width, height));
}

fn render_result(frame: &mut Frame, app: &App, area: Rect) {
    let controller = &app.controller;

    let line = if controller.is_rolling() {
        Line::from(Span::styled("Rolling...", app.theme.status_style()))
    } else if let Some(outcome) = controller.outcome() {
        let verdict = if outcome.verdict.is_win() {
            "You win!"
        } else {
            "Keep trying!"
        };
        Line::from(vec![
            Span::styled(format!("Total: {}  ", outcome.total), app.theme.title_style()),
            Span::styled(verdict, app.theme.verdict_style(outcome.verdict)),
        ])
    } else {
        Line::from(Span::styled(
            format!("Need {} or more to win", controller.count().win_threshold()),
            app.theme.status_style(),
        ))
    };

    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn render_controls(frame: &mut Frame, app: &App, layout: &AppLayout) {
    let controller = &app.controller;
    let theme = &app.theme;

    frame.render_widget(
        ButtonWidget::new("", theme)
            .icon("-")
            .disabled(!controller.can_adjust(-1)),
        layout.remove_button,
    );

    let count = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("Dice: {}", controller.count()),
            theme.title_style(),
        )),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(count, layout.count_label);

    frame.render_widget(
        ButtonWidget::new("", theme)
            .icon("+")
            .disabled(!controller.can_adjust(1)),
        layout.add_button,
    );

    let label = if controller.is_rolling() {
        "Rolling"
    } else {
        "Roll"
    };
    frame.render_widget(
        ButtonWidget::new(label, theme)
            .icon("⚄")
            .disabled(controller.is_rolling()),
        layout.roll_button,
    );
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        " r roll  +/- dice  ? help  q quit ",
        app.theme.status_style(),
    )];
    if let Some(message) = app.status_message() {
        spans.push(Span::raw("| "));
        spans.push(Span::raw(message.to_string()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
