//! Terminal rendering of a flappy session.

use crate::core::{FlappyGame, Preset, RunState};
use crate::ui::game_common::{
    controls_line, create_game_layout, info_line, render_info_panel_frame, render_modal,
    render_status_bar,
};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const INFO_PANEL_WIDTH: u16 = 22;

/// Everything the scene shows, borrowed from the session for one frame.
pub struct SceneView<'a> {
    pub game: &'a FlappyGame,
    pub best: u32,
    pub new_best: bool,
    pub preset: Preset,
    pub sound: bool,
    /// Best score is not being persisted this session.
    pub memory_only: bool,
}

/// One character cell of the play field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Pipe,
    /// Pipe cell bordering the gap.
    PipeRim,
    Ground,
    Bird(char),
}

impl Cell {
    fn span(self) -> Span<'static> {
        match self {
            Cell::Empty => Span::raw(" "),
            Cell::Pipe => Span::styled("█", Style::default().fg(Color::Green)),
            Cell::PipeRim => Span::styled("▓", Style::default().fg(Color::LightGreen)),
            Cell::Ground => Span::styled("▒", Style::default().fg(Color::DarkGray)),
            Cell::Bird(glyph) => Span::styled(
                glyph.to_string(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        }
    }
}

/// Glyph for the bird's tilt: climbing, diving or level.
pub fn bird_glyph(rotation: f64) -> char {
    if rotation < -0.2 {
        '▲'
    } else if rotation > 0.5 {
        '▼'
    } else {
        '►'
    }
}

/// Sample the world onto a `cols` x `rows` grid, one sample per cell centre.
pub fn project(game: &FlappyGame, cols: usize, rows: usize) -> Vec<Vec<Cell>> {
    if cols == 0 || rows == 0 {
        return Vec::new();
    }

    let config = &game.config;
    let sx = config.width / cols as f64;
    let sy = config.height / rows as f64;
    let ground_y = config.ground_y();

    let mut grid = vec![vec![Cell::Empty; cols]; rows];

    for (r, row) in grid.iter_mut().enumerate() {
        let wy = (r as f64 + 0.5) * sy;
        for (c, cell) in row.iter_mut().enumerate() {
            let wx = (c as f64 + 0.5) * sx;

            if wy >= ground_y {
                *cell = Cell::Ground;
                continue;
            }

            for pipe in &game.pipes {
                if wx < pipe.x || wx > pipe.x + config.pipe_width {
                    continue;
                }
                let gap_end = pipe.gap_start + config.gap_height;
                if wy < pipe.gap_start {
                    *cell = if wy >= pipe.gap_start - sy {
                        Cell::PipeRim
                    } else {
                        Cell::Pipe
                    };
                } else if wy > gap_end {
                    *cell = if wy <= gap_end + sy {
                        Cell::PipeRim
                    } else {
                        Cell::Pipe
                    };
                }
                break;
            }
        }
    }

    let bird = &game.bird;
    let bird_col = (bird.x / sx).floor();
    let bird_row = (bird.y / sy).floor();
    if bird_col >= 0.0 && bird_row >= 0.0 {
        let (c, r) = (bird_col as usize, bird_row as usize);
        if r < rows && c < cols {
            grid[r][c] = Cell::Bird(bird_glyph(bird.rotation));
        }
    }

    grid
}

/// Render the whole scene.
pub fn render_flappy(frame: &mut Frame, area: Rect, view: &SceneView) {
    let layout = create_game_layout(
        frame,
        area,
        " Flappy ",
        Color::Cyan,
        10,
        INFO_PANEL_WIDTH,
    );

    render_play_area(frame, layout.content, view.game);
    render_status_bar_content(frame, layout.status_bar, view);
    render_info_panel(frame, layout.info_panel, view);

    match view.game.state {
        RunState::Idle => render_menu(frame, layout.content, view),
        RunState::GameOver => render_game_over(frame, layout.content, view),
        RunState::Running => {}
    }
}

fn render_play_area(frame: &mut Frame, area: Rect, game: &FlappyGame) {
    let grid = project(game, area.width as usize, area.height as usize);
    let lines: Vec<Line> = grid
        .into_iter()
        .map(|row| Line::from(row.into_iter().map(Cell::span).collect::<Vec<_>>()))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_status_bar_content(frame: &mut Frame, area: Rect, view: &SceneView) {
    match view.game.state {
        RunState::Idle => render_status_bar(
            frame,
            area,
            "Press Enter to fly!",
            Color::Yellow,
            &[("[Enter]", "Play"), ("[m]", "Sound"), ("[Esc/q]", "Quit")],
        ),
        RunState::Running => render_status_bar(
            frame,
            area,
            &format!("Score: {}", view.game.score),
            Color::Green,
            &[("[Space/Up]", "Flap"), ("[m]", "Sound"), ("[q]", "Quit")],
        ),
        RunState::GameOver => render_status_bar(
            frame,
            area,
            &format!("Crashed with {} points", view.game.score),
            Color::Red,
            &[("[Enter]", "Retry"), ("[Esc]", "Menu"), ("[q]", "Quit")],
        ),
    }
}

fn render_info_panel(frame: &mut Frame, area: Rect, view: &SceneView) {
    let inner = render_info_panel_frame(frame, area);
    if inner.height < 2 || inner.width < 4 {
        return;
    }

    let game = view.game;
    let mut lines = vec![
        Line::from(Span::styled(
            format!(" {} ", view.preset.name()),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        info_line("Score", game.score.to_string(), Color::White),
        info_line("Best", view.best.to_string(), Color::Yellow),
        Line::from(""),
        info_line("Speed", format!("{:.0}", game.speed), Color::Green),
        info_line("Time", format!("{:.1}s", game.elapsed), Color::Green),
        Line::from(""),
        info_line(
            "Sound",
            if view.sound { "on" } else { "off" }.to_string(),
            if view.sound {
                Color::Green
            } else {
                Color::DarkGray
            },
        ),
    ];
    if view.memory_only {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            " Best not saved",
            Style::default().fg(Color::DarkGray),
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_menu(frame: &mut Frame, area: Rect, view: &SceneView) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Fly through the gaps.",
            Style::default().fg(Color::White),
        )),
        Line::from(Span::styled(
            "Ceiling is soft. Ground is not.",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Best: {}", view.best),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
        controls_line(&[("[Enter]", "Play"), ("[Space]", "Flap")]),
    ];
    render_modal(frame, area, Color::Cyan, " Flappy ", lines);
}

fn render_game_over(frame: &mut Frame, area: Rect, view: &SceneView) {
    let mut lines = vec![
        Line::from(Span::styled(
            "CRASH!",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Score: {}", view.game.score),
            Style::default().fg(Color::White),
        )),
        Line::from(Span::styled(
            format!("Best: {}", view.best),
            Style::default().fg(Color::Yellow),
        )),
    ];
    if view.new_best {
        lines.push(Line::from(Span::styled(
            "New best!",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )));
    }
    lines.push(Line::from(""));
    lines.push(controls_line(&[("[Enter]", "Retry"), ("[Esc]", "Menu")]));

    render_modal(frame, area, Color::Red, " Game Over ", lines);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{start, GameConfig, Pipe};
    use ratatui::{backend::TestBackend, Terminal};

    fn game_with_pipe() -> FlappyGame {
        let mut game = FlappyGame::new(GameConfig::arcade());
        game.pipes.push(Pipe {
            x: 300.0,
            gap_start: 200.0,
            passed: false,
        });
        game
    }

    #[test]
    fn test_project_places_bird() {
        // 72 x 54 cells -> 10 world px per cell
        let game = game_with_pipe();
        let grid = project(&game, 72, 54);
        assert_eq!(grid.len(), 54);
        assert_eq!(grid[0].len(), 72);
        assert_eq!(grid[27][16], Cell::Bird('►'));
    }

    #[test]
    fn test_project_ground_rows() {
        let grid = project(&game_with_pipe(), 72, 54);
        assert_eq!(grid[49][0], Cell::Empty);
        assert_eq!(grid[50][0], Cell::Ground);
        assert_eq!(grid[53][71], Cell::Ground);
    }

    #[test]
    fn test_project_pipe_and_gap() {
        let grid = project(&game_with_pipe(), 72, 54);
        assert_eq!(grid[5][30], Cell::Pipe);
        assert_eq!(grid[19][30], Cell::PipeRim);
        assert_eq!(grid[25][30], Cell::Empty);
        assert_eq!(grid[36][37], Cell::PipeRim);
        assert_eq!(grid[40][37], Cell::Pipe);
        assert_eq!(grid[5][38], Cell::Empty);
    }

    #[test]
    fn test_project_empty_area() {
        assert!(project(&game_with_pipe(), 0, 10).is_empty());
    }

    #[test]
    fn test_bird_glyphs() {
        assert_eq!(bird_glyph(-0.41), '▲');
        assert_eq!(bird_glyph(0.0), '►');
        assert_eq!(bird_glyph(1.2), '▼');
    }

    fn render_to_text(view: &SceneView) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.size();
                render_flappy(frame, area, view);
            })
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content
            .iter()
            .map(|cell| cell.symbol().to_string())
            .collect()
    }

    #[test]
    fn test_menu_renders_best() {
        let game = FlappyGame::new(GameConfig::arcade());
        let view = SceneView {
            game: &game,
            best: 42,
            new_best: false,
            preset: Preset::Arcade,
            sound: true,
            memory_only: false,
        };
        let text = render_to_text(&view);
        assert!(text.contains("Best: 42"));
        assert!(text.contains("Press Enter to fly!"));
    }

    #[test]
    fn test_game_over_shows_new_best() {
        let mut game = FlappyGame::new(GameConfig::arcade());
        start(&mut game);
        game.score = 7;
        game.state = RunState::GameOver;
        let view = SceneView {
            game: &game,
            best: 7,
            new_best: true,
            preset: Preset::Classic,
            sound: false,
            memory_only: true,
        };
        let text = render_to_text(&view);
        assert!(text.contains("CRASH!"));
        assert!(text.contains("New best!"));
        assert!(text.contains("Classic"));
    }
}
