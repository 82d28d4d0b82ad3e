use std::{
    fmt,
    path::Path,
    sync::atomic::{AtomicBool, Ordering},
    time::SystemTime,
};

static STARTED: AtomicBool = AtomicBool::new(false);

pub fn is_active() -> bool {
    STARTED.load(Ordering::SeqCst)
}

/// Level at which records from `target` are kept.
///
/// midilog's own crates log at `Info`, or everything when `verbose`.
/// Dependencies such as `midir` only get through with warnings, or with
/// `Info` when `verbose`.
fn level_for(target: &str, verbose: bool) -> log::LevelFilter {
    let ours = target.starts_with("midilog");

    match (ours, verbose) {
        (true, true) => log::LevelFilter::Trace,
        (true, false) => log::LevelFilter::Info,
        (false, true) => log::LevelFilter::Info,
        (false, false) => log::LevelFilter::Warn,
    }
}

fn line(time: SystemTime, level: log::Level, target: &str, msg: &fmt::Arguments) -> String {
    let time = humantime::format_rfc3339_millis(time);
    let module = target.strip_prefix("midilog_").unwrap_or(target);
    format!("{time} {level:<5} {module} : {msg}")
}

/// Send every log record to `file`. The terminal belongs to the UI
/// so nothing is ever written to stdout or stderr.
pub fn start(file: impl AsRef<Path>, verbose: bool) -> anyhow::Result<()> {
    if STARTED
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        anyhow::bail!("attempted to setup logger more than once");
    }

    let file = file.as_ref();
    let dispatch = || -> anyhow::Result<()> {
        if let Some(dir) = file.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }

        fern::Dispatch::new()
            .format(|out, msg, record| {
                out.finish(format_args!(
                    "{}",
                    line(SystemTime::now(), record.level(), record.target(), msg)
                ))
            })
            .level(log::LevelFilter::Trace)
            .filter(move |meta| meta.level() <= level_for(meta.target(), verbose))
            .chain(fern::log_file(file)?)
            .apply()?;

        Ok(())
    };

    if let Err(e) = dispatch() {
        STARTED.store(false, Ordering::SeqCst);
        return Err(e);
    }

    log::info!(
        "midilog {} started, pid {}",
        env!("CARGO_PKG_VERSION"),
        std::process::id()
    );

    Ok(())
}
