pub mod flappy_scene;
pub mod game_common;
pub mod terminal;

use flappy_scene::{render_flappy, SceneView};
use ratatui::Frame;

/// Draw one frame of the game screen.
pub fn draw(frame: &mut Frame, view: &SceneView) {
    let area = frame.size();
    render_flappy(frame, area, view);
}
