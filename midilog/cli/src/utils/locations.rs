/// Default locations stored in `~/.midilog`
///
/// .
/// └── log
///    └── midilog.log
///
use std::path::PathBuf;

pub fn midilog() -> Option<PathBuf> {
    Some(dirs::home_dir()?.join(".midilog"))
}

pub fn log() -> Option<PathBuf> {
    Some(midilog()?.join("log"))
}

pub fn log_file(name: &str) -> Option<PathBuf> {
    Some(log()?.join(format!("{name}.log")))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn log_files_live_under_the_log_directory() {
        let Some(file) = log_file("midilog") else {
            return;
        };

        assert!(file.ends_with(".midilog/log/midilog.log"));
    }
}
