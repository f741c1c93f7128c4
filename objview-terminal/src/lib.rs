/// Terminal host for the objview model store
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use objview_core::{ModelStore, ProjectorKind};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::debug;

pub mod renderer;

pub use renderer::{PointRenderer, Viewport};

/// What a key press asks the app to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    Reset,
    Close,
    ToggleRotation,
    CycleProjector,
}

impl Command {
    pub fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
            KeyCode::Char('r') => Some(Command::Reset),
            KeyCode::Char('c') => Some(Command::Close),
            KeyCode::Char(' ') => Some(Command::ToggleRotation),
            KeyCode::Char('p') => Some(Command::CycleProjector),
            _ => None,
        }
    }
}

/// Main application struct for viewing a model in the terminal
pub struct TerminalApp {
    store: ModelStore,
    renderer: PointRenderer,
    title: String,
    running: bool,
    visible_points: usize,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(store: ModelStore, title: impl Into<String>) -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        Ok(Self::with_viewport(store, title, Viewport::new(cols, rows)))
    }

    pub fn with_viewport(store: ModelStore, title: impl Into<String>, viewport: Viewport) -> Self {
        Self {
            store,
            renderer: PointRenderer::new(viewport),
            title: title.into(),
            running: true,
            visible_points: 0,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;
        terminal::disable_raw_mode()?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let tick_ms = self.store.config().tick_interval_ms;
        let target_frame_time = Duration::from_millis(tick_ms);

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(event);
            }

            self.store.tick(tick_ms);

            if self.store.take_redraw() {
                self.render()?;
            }

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    /// Route one terminal event into the store
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => {
                if let Some(command) = Command::from_key(code) {
                    self.apply(command);
                }
            }
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(cols, rows) => {
                debug!(cols, rows, "terminal resized");
                self.renderer = PointRenderer::new(Viewport::new(cols, rows));
                self.store.request_redraw();
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let viewport = self.renderer.viewport();
        let (x, y) = viewport.cell_to_pixel(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.store.begin_drag(x, y),
            MouseEventKind::Drag(MouseButton::Left) => {
                self.store
                    .drag_to(x, y, viewport.pixel_width(), viewport.pixel_height());
            }
            MouseEventKind::Up(MouseButton::Left) => self.store.end_drag(),
            _ => {}
        }
    }

    pub fn apply(&mut self, command: Command) {
        debug!(?command, "command");
        match command {
            Command::Quit => self.running = false,
            Command::Reset => self.store.reset(),
            Command::Close => self.store.close(),
            Command::ToggleRotation => {
                self.store.toggle_rotating();
            }
            Command::CycleProjector => {
                let next = self.store.projector_kind().next();
                self.store.set_projector(next);
            }
        }
    }

    /// Redraw the point grid from the store
    pub fn plot(&mut self) {
        let viewport = self.renderer.viewport();
        let points = self
            .store
            .projected_points(viewport.pixel_width(), viewport.pixel_height());
        self.renderer.clear();
        self.visible_points = self.renderer.plot_points(&points);
    }

    pub fn status_line(&self) -> String {
        let stats = self.store.stats();
        let projector = match self.store.projector_kind() {
            ProjectorKind::Orthographic => "ortho",
            ProjectorKind::Rotating => "rotating",
        };
        format!(
            "{} | V: {} F: {} | size {:.2} x {:.2} x {:.2} | {} | {} | {}/{} shown | FPS: {:.1} | drag=pan r=reset c=close space=spin p=projector q=quit",
            self.title,
            stats.vertex_count,
            stats.face_count,
            stats.size.x,
            stats.size.y,
            stats.size.z,
            if self.store.view().rotating { "spinning" } else { "paused" },
            projector,
            self.visible_points,
            stats.vertex_count,
            self.fps,
        )
    }

    fn render(&mut self) -> io::Result<()> {
        self.plot();

        let mut stdout = stdout();
        queue!(
            stdout,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0)
        )?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(self.status_line()),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn app() -> TerminalApp {
        let mut store = ModelStore::new();
        store.close();
        TerminalApp::with_viewport(store, "test", Viewport::new(80, 40))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(Command::from_key(KeyCode::Char('q')), Some(Command::Quit));
        assert_eq!(Command::from_key(KeyCode::Esc), Some(Command::Quit));
        assert_eq!(Command::from_key(KeyCode::Char('r')), Some(Command::Reset));
        assert_eq!(Command::from_key(KeyCode::Char('x')), None);
    }

    #[test]
    fn test_quit_key_stops_app() {
        let mut app = app();
        app.handle_event(Event::Key(KeyEvent::new(
            KeyCode::Char('q'),
            KeyModifiers::NONE,
        )));
        assert!(!app.is_running());
    }

    #[test]
    fn test_mouse_drag_pans_model() {
        let mut app = app();
        app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 40, 20));
        assert!(app.store().is_dragging());
        app.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), 45, 20));
        app.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), 45, 20));
        assert!(!app.store().is_dragging());
        // five columns of eight pixels at scale 100
        assert!((app.store().view().translate_x - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_plot_shows_cube_corners() {
        let mut app = app();
        app.plot();
        // opposite corners overlap in x/y, so eight vertices land on four cells
        assert_eq!(app.visible_points, 8);
        assert!(app.status_line().contains("V: 8 F: 6"));
    }

    #[test]
    fn test_toggle_rotation_and_projector() {
        let mut app = app();
        app.apply(Command::ToggleRotation);
        assert!(!app.store().view().rotating);
        app.apply(Command::CycleProjector);
        assert_eq!(app.store().projector_kind(), ProjectorKind::Rotating);
        assert!(app.status_line().contains("paused"));
    }
}
