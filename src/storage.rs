use std::fs::{self, OpenOptions};
use std::io::{self, Read, Write};
use std::path::PathBuf;

/// Returns the path to the stored API key file.
///
/// The path is determined in the following order:
/// 1. `TASKHUB_KEY_FILE` environment variable.
/// 2. `~/.local/share/taskhub/api_key` (on Linux).
/// 3. `./api_key` (fallback).
fn key_path() -> PathBuf {
    std::env::var("TASKHUB_KEY_FILE").map(PathBuf::from).unwrap_or_else(|_| {
        let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        p.push("taskhub");
        if !p.exists() {
            let _ = fs::create_dir_all(&p);
        }
        p.push("api_key");
        p
    })
}

/// Loads the stored API key.
///
/// Returns `None` if no key file exists or the stored key is empty, so a
/// `Some` result is always a usable, non-empty credential.
pub fn load_api_key() -> Option<String> {
    let path = key_path();
    if !path.exists() {
        return None;
    }
    let mut f = match OpenOptions::new().read(true).open(&path) {
        Ok(f) => f,
        Err(_) => return None,
    };
    let mut s = String::new();
    if f.read_to_string(&mut s).is_err() {
        return None;
    }
    let key = s.trim().to_string();
    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}

/// Stores the API key, overwriting any previous one.
pub fn save_api_key(key: &str) -> io::Result<()> {
    let path = key_path();
    let mut f = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&path)?;
    f.write_all(key.as_bytes())?;
    Ok(())
}

/// Removes the stored API key, if any.
pub fn clear_api_key() -> io::Result<()> {
    let path = key_path();
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}
