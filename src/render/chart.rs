//! Post-run plot of total reward per episode

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    symbols,
    text::Line,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

/// (episode, total reward) pairs, episodes numbered from 1
pub fn reward_points(history: &[f32]) -> Vec<(f64, f64)> {
    history
        .iter()
        .enumerate()
        .map(|(i, reward)| ((i + 1) as f64, *reward as f64))
        .collect()
}

/// Axis bounds for the reward history, padded so they never collapse
pub fn reward_bounds(history: &[f32]) -> ([f64; 2], [f64; 2]) {
    let x_max = history.len().max(2) as f64;

    let (min, max) = history
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
            (lo.min(*r as f64), hi.max(*r as f64))
        });
    let y = if history.is_empty() {
        [-1.0, 1.0]
    } else if min == max {
        [min - 1.0, max + 1.0]
    } else {
        [min, max]
    };

    ([1.0, x_max], y)
}

/// Draw the reward history as a line chart
pub fn render_reward_chart(frame: &mut Frame, history: &[f32]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    let points = reward_points(history);
    let ([x_min, x_max], [y_min, y_max]) = reward_bounds(history);

    let dataset = Dataset::default()
        .name("Total reward")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&points);

    let axis_style = Style::default().fg(Color::Gray);
    let chart = Chart::new(vec![dataset])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Snake Learning Progress "),
        )
        .x_axis(
            Axis::default()
                .title("Episode")
                .style(axis_style)
                .bounds([x_min, x_max])
                .labels(vec![format!("{x_min:.0}"), format!("{x_max:.0}")]),
        )
        .y_axis(
            Axis::default()
                .title("Total Reward")
                .style(axis_style)
                .bounds([y_min, y_max])
                .labels(vec![format!("{y_min:.0}"), format!("{y_max:.0}")]),
        );

    frame.render_widget(chart, chunks[0]);
    frame.render_widget(
        Paragraph::new(Line::from("Press any key to exit")),
        chunks[1],
    );
}
