/// Terminal front end for the rig editor: viewport, timeline strip and status line
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use log::{debug, info};
use rigstage_core::{EditorConfig, EditorSession, Joint, Selection, TimelineRuler, ViewMode};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;
pub mod timeline;

pub use renderer::AsciiRenderer;
pub use timeline::TimelineStrip;

/// Rows below the viewport: ruler, keyframe track, status line
const FOOTER_ROWS: u16 = 3;
/// Row above the viewport for the title bar
const HEADER_ROWS: u16 = 1;
/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: u32 = 2;

/// Model offered by the `m` key, standing in for a pick from the model library
const DEFAULT_MODEL: &str = "Character";

/// Map a low-level error into the `io::Error` the front end reports
pub fn io_error(error: rigstage_core::RigError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, error.to_string())
}

/// Main application struct for the terminal editor
pub struct TerminalApp {
    session: EditorSession,
    renderer: AsciiRenderer,
    strip: TimelineStrip,
    running: bool,
    target_frame_time: Duration,
    last_fps_sample: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: &EditorConfig) -> io::Result<Self> {
        let session = EditorSession::new(config).map_err(io_error)?;
        let (width, height) = terminal::size()?;

        let mut app = Self {
            session,
            renderer: AsciiRenderer::new(0, 0),
            strip: TimelineStrip::new(TimelineRuler::new(config.total_frames, 0.0)),
            running: true,
            target_frame_time: Duration::from_secs(1) / config.render_fps,
            last_fps_sample: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        };
        app.resize(width, height);
        Ok(app)
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    fn viewport_rows(height: u16) -> u16 {
        height.saturating_sub(HEADER_ROWS + FOOTER_ROWS).max(1)
    }

    fn resize(&mut self, width: u16, height: u16) {
        let rows = Self::viewport_rows(height);
        self.renderer.resize(width as usize, rows as usize);
        self.session
            .camera
            .set_aspect(u32::from(width), u32::from(rows) * CELL_ASPECT);
        self.strip = TimelineStrip::new(TimelineRuler::new(
            self.session.controller.total_frames(),
            f32::from(width),
        ));
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
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let mut last_tick = Instant::now();

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?)?;
            }

            // Update
            let now = Instant::now();
            self.session.render_tick(now - last_tick);
            last_tick = now;

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.target_frame_time {
                std::thread::sleep(self.target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_fps_sample).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_fps_sample).as_secs_f32();
                self.frame_count = 0;
                self.last_fps_sample = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> io::Result<()> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse)?,
            Event::Resize(width, height) => self.resize(width, height),
            _ => {}
        }
        Ok(())
    }

    fn handle_key(&mut self, KeyEvent { code, .. }: KeyEvent) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char(' ') => self.session.controller.toggle(),
            KeyCode::Home => self.session.controller.seek_start(),
            KeyCode::End => self.session.controller.seek_end(),
            KeyCode::Left => self.session.controller.step_backward(),
            KeyCode::Right => self.session.controller.step_forward(),
            KeyCode::Char('k') => {
                if !self.session.add_keyframe() {
                    debug!("nothing selected, keyframe not added");
                }
            }
            KeyCode::Char('b') => self.cycle_bone(),
            KeyCode::Char('m') => self.session.select(Selection::Model(DEFAULT_MODEL.to_string())),
            KeyCode::Char('x') => self.session.deselect(),
            KeyCode::Char('1') => self.session.camera.set_view(ViewMode::Perspective),
            KeyCode::Char('2') => self.session.camera.set_view(ViewMode::Top),
            KeyCode::Char('3') => self.session.camera.set_view(ViewMode::Front),
            KeyCode::Char('4') => self.session.camera.set_view(ViewMode::Side),
            KeyCode::Char('+') | KeyCode::Char('=') => self.session.camera.zoom_in(),
            KeyCode::Char('-') => self.session.camera.zoom_out(),
            KeyCode::Char('w') | KeyCode::Up => self.session.camera.orbit(0.0, 0.1),
            KeyCode::Char('s') | KeyCode::Down => self.session.camera.orbit(0.0, -0.1),
            KeyCode::Char('a') => self.session.camera.orbit(-0.1, 0.0),
            KeyCode::Char('d') => self.session.camera.orbit(0.1, 0.0),
            _ => {}
        }
    }

    /// Clicking or dragging on the timeline rows scrubs the playhead
    fn handle_mouse(&mut self, mouse: MouseEvent) -> io::Result<()> {
        let (_, height) = terminal::size()?;
        let first_timeline_row = HEADER_ROWS + Self::viewport_rows(height);
        let on_timeline = mouse.row >= first_timeline_row && mouse.row < first_timeline_row + 2;

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left)
                if on_timeline =>
            {
                let frame = self.strip.frame_at_column(mouse.column);
                self.session.controller.seek(i64::from(frame));
            }
            _ => {}
        }
        Ok(())
    }

    /// Step the bone selection through the rig, then back to nothing
    fn cycle_bone(&mut self) {
        match next_bone(self.session.selected_joint()) {
            Some(joint) => self.session.select(Selection::Bone(joint)),
            None => self.session.deselect(),
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let commands = self.session.draw_list();

        self.renderer.clear();
        self.renderer.render(&commands, &self.session.camera);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, HEADER_ROWS))?;
        self.renderer.draw(&mut stdout)?;

        // Timeline strip
        let controller = &self.session.controller;
        let footer = HEADER_ROWS + self.renderer.height() as u16;
        queue!(stdout, cursor::MoveTo(0, footer))?;
        self.strip.draw_ruler(&mut stdout, controller.current_frame())?;
        queue!(stdout, cursor::MoveTo(0, footer + 1))?;
        self.strip
            .draw_keyframes(&mut stdout, controller.keyframes(), controller.current_frame())?;

        // Status line
        let state = if controller.is_playing() { "Playing" } else { "Stopped" };
        let selection = match self.session.selection() {
            Some(Selection::Bone(joint)) => joint.display_name().to_string(),
            Some(Selection::Model(model)) => model.clone(),
            None => "-".to_string(),
        };
        queue!(
            stdout,
            cursor::MoveTo(0, footer + 2),
            Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Grey),
            Print(format!(
                "Frame {} / {} | {} | {} fps | Selected: {} | Keys: {} | View: {}",
                controller.current_frame(),
                controller.total_frames(),
                state,
                controller.rate(),
                selection,
                controller.keyframes().len(),
                self.session.camera.view,
            )),
            ResetColor
        )?;

        // Title bar
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "rigstage | FPS: {:.1} | Space=Play Home/End=Seek \u{2190}\u{2192}=Step K=Key B=Bone M=Model X=Clear 1-4=View Q=Quit",
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

/// Bone after `current` in rig order; `None` once the last bone is passed
fn next_bone(current: Option<Joint>) -> Option<Joint> {
    match current {
        None => Joint::ALL.first().copied(),
        Some(joint) => Joint::ALL
            .iter()
            .position(|j| *j == joint)
            .and_then(|index| Joint::ALL.get(index + 1).copied()),
    }
}

/// Run a transport script without a terminal and print the resulting state
pub fn run_headless(config: &EditorConfig, script: &str) -> io::Result<()> {
    print!("{}", headless_report(config, script)?);
    Ok(())
}

/// State report after running `script`: transport line, keyframes, joint rotations
pub fn headless_report(config: &EditorConfig, script: &str) -> io::Result<String> {
    let mut session = EditorSession::new(config).map_err(io_error)?;
    let count = session.run_script(script).map_err(io_error)?;
    info!("applied {} commands", count);

    let controller = &session.controller;
    let mut report = format!(
        "frame {} / {} ({})\n",
        controller.current_frame(),
        controller.total_frames(),
        if controller.is_playing() { "playing" } else { "stopped" }
    );
    for key in controller.keyframes() {
        report.push_str(&format!("key {} {}\n", key.frame, key.kind.as_str()));
    }
    for (joint, offset) in session.pose().iter() {
        report.push_str(&format!("{:<6} {:+.4}\n", joint.display_name(), offset.rotation));
    }
    Ok(report)
}
