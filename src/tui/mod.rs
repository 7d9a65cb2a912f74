pub mod app;
pub mod ui;

use std::time::{Duration, Instant};
use std::{error::Error, io};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::session::Session;
use app::{App, InputMode};
use ui::ui;

pub fn run_tui() -> Result<(), Box<dyn Error>> {
    let mut session = Session::new();
    match session.authorize() {
        Ok(true) => {}
        Ok(false) => {
            eprintln!("Not signed in. Run `taskhub login <username>` first.");
            return Ok(());
        }
        Err(err) => {
            eprintln!("Failed to load session data: {}", err.message());
            return Ok(());
        }
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let mut app = App::new(session);

    // Run loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err)
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    // The poll timeout keeps the loop turning so the toast countdown ticks
    // at 1 Hz even when no keys arrive.
    let tick_rate = Duration::from_secs(1);
    let mut last_tick = Instant::now();
    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                match app.input_mode {
                    InputMode::Normal => match key.code {
                        KeyCode::Char('q') => return Ok(()),
                        KeyCode::Down | KeyCode::Char('j') => app.next(),
                        KeyCode::Up | KeyCode::Char('k') => app.previous(),
                        KeyCode::Char(' ') => app.complete_selected(),
                        KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
                        KeyCode::Char('a') => app.start_add(),
                        KeyCode::Char('r') => app.refresh(),
                        KeyCode::Char('c') => app.toggle_completed(),
                        KeyCode::Char('x') => app.toast.dismiss(),
                        _ => {}
                    },
                    InputMode::Adding => match key.code {
                        KeyCode::Enter => app.handle_input(),
                        KeyCode::Esc => {
                            app.input_mode = InputMode::Normal;
                            app.input_buffer.clear();
                        }
                        KeyCode::Char(c) => {
                            app.input_buffer.push(c);
                        }
                        KeyCode::Backspace => {
                            app.input_buffer.pop();
                        }
                        _ => {}
                    },
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.toast.tick();
            last_tick = Instant::now();
        }
    }
}
