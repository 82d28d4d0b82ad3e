use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

type CrossTerminal = Terminal<CrosstermBackend<std::io::Stdout>>;

/// Run `f` on the alternate screen with raw mode and mouse capture on.
/// The terminal is restored on error and on panic as well.
pub fn with_terminal<F>(f: F) -> anyhow::Result<()>
where
    F: FnOnce(&mut CrossTerminal) -> anyhow::Result<()>,
{
    let mut terminal = acquire()?;
    set_panic_hook();
    let result = f(&mut terminal);
    release()?;
    result
}

fn acquire() -> anyhow::Result<CrossTerminal> {
    let mut stdout = std::io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    crossterm::terminal::enable_raw_mode()?;

    let mut terminal = Terminal::new(backend::CrosstermBackend::new(stdout))?;
    terminal.hide_cursor()?;

    Ok(terminal)
}

fn release() -> anyhow::Result<()> {
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(std::io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}

fn set_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        if let Err(e) = release() {
            eprintln!("failed to restore the terminal : {e}");
        }
        original_hook(panic);
    }));
}
