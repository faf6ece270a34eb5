use std::time::Duration;

use chrono::{DateTime, Local};
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Stylize;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};
use ratatui::Frame;

use voxlive_core::transcribe::TimedSentence;

/// Dashboard redraw interval (10 frames per second).
pub const REFRESH_INTERVAL: Duration = Duration::from_millis(100);

/// Everything one redraw needs. Rendering is a pure function of this value;
/// the dashboard holds no state of its own.
pub struct DashboardState<'a> {
    pub model_label: &'a str,
    pub sample_rate: u32,
    pub block_samples: usize,
    pub sentences: &'a [TimedSentence],
    pub partial: &'a str,
    pub now: DateTime<Local>,
}

/// Header / sentence log / live input / parameter footer, top to bottom.
pub fn draw(frame: &mut Frame, state: &DashboardState) {
    let [header, log, input, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(4),
        Constraint::Length(3),
    ])
    .areas(frame.area());

    draw_header(frame, header, state.now);
    draw_log(frame, log, state.sentences);
    draw_input(frame, input, state.partial);
    draw_footer(frame, footer, state);
}

fn draw_header(frame: &mut Frame, area: Rect, now: DateTime<Local>) {
    let block = Block::bordered();
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [left, center, right] = Layout::horizontal([
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
    ])
    .areas(inner);

    frame.render_widget(Paragraph::new("voxlive"), left);
    frame.render_widget(
        Paragraph::new(Line::from("Vosk live demo".bold())).alignment(Alignment::Center),
        center,
    );
    frame.render_widget(
        Paragraph::new(Line::from(now.format("%c").to_string().green()))
            .alignment(Alignment::Right),
        right,
    );
}

fn draw_log(frame: &mut Frame, area: Rect, sentences: &[TimedSentence]) {
    let lines: Vec<Line> = sentences
        .iter()
        .map(|sentence| {
            Line::from(vec![
                format!("[{}]:", sentence.at.format("%H:%M:%S")).green(),
                Span::raw(" "),
                Span::raw(sentence.text.as_str()),
            ])
        })
        .collect();
    frame.render_widget(
        Paragraph::new(lines).block(Block::bordered().title("Sentence log")),
        area,
    );
}

fn draw_input(frame: &mut Frame, area: Rect, partial: &str) {
    frame.render_widget(
        Paragraph::new(partial)
            .wrap(Wrap { trim: false })
            .block(Block::bordered().title("Live input")),
        area,
    );
}

fn draw_footer(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let text = format!(
        "Model: {} | Sample rate: {} | Block size: {}",
        state.model_label, state.sample_rate, state.block_samples
    );
    frame.render_widget(
        Paragraph::new(text).block(Block::bordered().title("Parameters")),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn rendered(state: &DashboardState) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| draw(frame, state)).unwrap();

        let buffer = terminal.backend().buffer();
        let area = buffer.area;
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .filter_map(|x| buffer.cell((x, y)).map(|cell| cell.symbol()))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn state_with<'a>(sentences: &'a [TimedSentence], partial: &'a str) -> DashboardState<'a> {
        DashboardState {
            model_label: "nl",
            sample_rate: 16000,
            block_samples: 8000,
            sentences,
            partial,
            now: Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_all_panes_render() {
        let at = Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let sentences = vec![TimedSentence::new(at, "hello world")];
        let screen = rendered(&state_with(&sentences, "and now"));

        assert!(screen.contains("Vosk live demo"));
        assert!(screen.contains("Sentence log"));
        assert!(screen.contains("[12:00:00]: hello world"));
        assert!(screen.contains("Live input"));
        assert!(screen.contains("and now"));
        assert!(screen.contains("Parameters"));
        assert!(screen.contains("Model: nl | Sample rate: 16000 | Block size: 8000"));
    }

    #[test]
    fn test_empty_session_renders_empty_panes() {
        let screen = rendered(&state_with(&[], ""));
        assert!(screen.contains("Sentence log"));
        assert!(screen.contains("Live input"));
    }
}
