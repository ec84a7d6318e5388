use crate::error::Error;
use chrono::Local;
use hyper::{
    header::{HeaderName, HeaderValue},
    HeaderMap,
};
use rand::{distributions::Alphanumeric, Rng};
use serde::de::DeserializeOwned;
use std::{
    collections::HashMap,
    env, fs,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn extract_headers(header_map: &HeaderMap) -> HashMap<String, String> {
    // it currently ignores header values with opaque characters
    header_map
        .iter()
        .map(|(k, v)| (String::from(k.as_str()), v.to_str()))
        .filter_map(|(key, value)| value.ok().map(|v| (key, String::from(v))))
        .collect::<HashMap<_, _>>()
}

pub fn put_headers<'a, I: IntoIterator<Item = (&'a String, &'a String)>>(
    header_map: &mut HeaderMap<HeaderValue>,
    headers: I,
) -> Result<(), Error> {
    for (key, value) in headers {
        let header_name = HeaderName::from_lowercase(key.to_lowercase().as_bytes())?;
        let header_value = HeaderValue::from_str(value)?;
        header_map.append(header_name, header_value);
    }

    Ok(())
}

/// Cuts `text` down to at most `max_chars` characters without splitting a code point.
pub fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

pub fn random_string(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

pub fn random_email(domain: &str) -> String {
    format!("{}@{}", random_string(8), domain)
}

pub fn random_user_id() -> i64 {
    rand::thread_rng().gen_range(1000..=9999)
}

/// Seconds since the unix epoch.
pub fn timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Milliseconds since the unix epoch.
pub fn timestamp_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

pub fn current_time() -> String {
    current_time_with_format(TIME_FORMAT)
}

pub fn current_time_with_format(format: &str) -> String {
    Local::now().format(format).to_string()
}

pub fn load_yaml<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T, Error> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::ConfigNotFound(path.to_path_buf()));
    }

    let contents = fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&contents)?)
}

/// Looks for `relative` in the working directory and each of its ancestors.
pub fn find_upwards<P: AsRef<Path>>(relative: P) -> Option<PathBuf> {
    let start = env::current_dir().ok()?;
    find_upwards_from(start, relative)
}

pub fn find_upwards_from<P: AsRef<Path>, R: AsRef<Path>>(start: P, relative: R) -> Option<PathBuf> {
    start
        .as_ref()
        .ancestors()
        .map(|dir| dir.join(relative.as_ref()))
        .find(|candidate| candidate.is_file())
}
