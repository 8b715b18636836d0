//! UI rendering for the TUI.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle},
        Block, Borders, Gauge, Paragraph,
    },
    Frame,
};

use crate::exercise::{format_clock, PhaseColor, SessionStatus, Visuals};
use crate::tui::app::View;

/// Half-height of the drawing area, leaving room for the hold ring.
const CANVAS_EXTENT: f64 = 1.25;
/// Radius step used to fill the circle.
const FILL_STEP: f64 = 0.03;

const fn phase_color(color: PhaseColor) -> Color {
    match color {
        PhaseColor::Green => Color::Green,
        PhaseColor::Blue => Color::Blue,
        PhaseColor::Red => Color::Red,
    }
}

/// Render the application UI.
pub fn render(frame: &mut Frame<'_>, view: &View) {
    // Create layout: header, circle, progress, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Circle
            Constraint::Length(1), // Session progress
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, view, chunks[0]);
    render_circle(frame, view, chunks[1]);
    render_progress(frame, view, chunks[2]);
    render_status_bar(frame, view, chunks[3]);
}

/// Render the header.
fn render_header(frame: &mut Frame<'_>, view: &View, area: Rect) {
    let status_style = match view.status {
        SessionStatus::Running => Style::default().fg(Color::Green),
        SessionStatus::Paused => Style::default().fg(Color::Yellow),
        SessionStatus::Completed => Style::default().fg(Color::Cyan),
        SessionStatus::Idle => Style::default().fg(Color::DarkGray),
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {} ", view.title),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} ", view.status),
            status_style.add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" cycles {}", view.cycles_completed),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(header, area);
}

/// Render the breathing circle with the phase label and timer in the middle.
fn render_circle(frame: &mut Frame<'_>, view: &View, area: Rect) {
    let Some(visuals) = view.visuals.clone() else {
        return;
    };

    // Terminal cells are about twice as tall as they are wide.
    let aspect = if area.height == 0 {
        1.0
    } else {
        f64::from(area.width) / (2.0 * f64::from(area.height))
    };
    let x_extent = CANVAS_EXTENT * aspect.max(1.0);
    let y_extent = CANVAS_EXTENT * (1.0 / aspect).max(1.0);

    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([-x_extent, x_extent])
        .y_bounds([-y_extent, y_extent])
        .paint(move |ctx| paint_circle(ctx, &visuals, view.status));

    frame.render_widget(canvas, area);
}

fn paint_circle(
    ctx: &mut ratatui::widgets::canvas::Context<'_>,
    visuals: &Visuals,
    status: SessionStatus,
) {
    let color = phase_color(visuals.color);

    let mut radius = visuals.circle;
    while radius > 0.0 {
        ctx.draw(&Circle {
            x: 0.0,
            y: 0.0,
            radius,
            color,
        });
        radius -= FILL_STEP;
    }

    if let Some(ring) = visuals.ring {
        // Faint rings fade to grey; terminals have no alpha.
        let ring_color = if visuals.ring_opacity >= 0.5 {
            color
        } else {
            Color::DarkGray
        };
        if visuals.ring_opacity > 0.05 {
            ctx.draw(&Circle {
                x: 0.0,
                y: 0.0,
                radius: ring,
                color: ring_color,
            });
        }
    }
    ctx.layer();

    let text_style = Style::default()
        .bg(color)
        .fg(if visuals.light_text {
            Color::White
        } else {
            Color::Black
        })
        .add_modifier(Modifier::BOLD);

    let label = match status {
        SessionStatus::Paused => "Paused",
        SessionStatus::Completed => "Done",
        SessionStatus::Running | SessionStatus::Idle => visuals.phase_label,
    };
    ctx.print(0.0, 0.1, Line::styled(format!(" {label} "), text_style));
    ctx.print(
        0.0,
        -0.1,
        Line::styled(format!(" {} ", visuals.phase_timer), text_style),
    );
}

/// Render the session progress gauge.
fn render_progress(frame: &mut Frame<'_>, view: &View, area: Rect) {
    let label = format!(
        "{} left of {}",
        format_clock(view.total_remaining),
        format_clock(view.total_seconds)
    );
    let color = view
        .visuals
        .as_ref()
        .map_or(Color::Cyan, |v| phase_color(v.color));

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(color).bg(Color::Black))
        .ratio(view.session_progress())
        .label(label);

    frame.render_widget(gauge, area);
}

/// Render the status bar.
fn render_status_bar(frame: &mut Frame<'_>, view: &View, area: Rect) {
    let status_text = match view.status {
        SessionStatus::Completed => "r:restart | q:quit",
        SessionStatus::Paused => "space:resume | r:restart | q:quit",
        SessionStatus::Running | SessionStatus::Idle => "space:pause | r:restart | q:quit",
    };

    let status = Paragraph::new(status_text).style(Style::default().fg(Color::DarkGray));

    frame.render_widget(status, area);
}
