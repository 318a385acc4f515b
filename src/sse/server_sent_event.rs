use serde::de::DeserializeOwned;

#[derive(Debug, PartialEq)]
pub struct ServerSentEvent<T> {
    pub id: Option<String>,
    pub event: Option<String>,
    pub retry: Option<usize>,
    pub comment: Option<String>,
    pub data: Option<T>,
}

impl<T> ServerSentEvent<T>
where
    T: DeserializeOwned,
{
    /// Parses a single event block. Multiple `data:` lines are joined with a newline before the payload is deserialized.
    pub fn from_str(s: &str) -> Result<ServerSentEvent<T>, serde_json::Error> {
        let mut id = None;
        let mut event = None;
        let mut retry = None;
        let mut comment = None;
        let mut data_lines: Vec<&str> = Vec::new();

        for line in s.lines() {
            if let Some(value) = line.strip_prefix("id:") {
                id = Some(value.trim().to_string());
            } else if let Some(value) = line.strip_prefix("event:") {
                event = Some(value.trim().to_string());
            } else if let Some(value) = line.strip_prefix("retry:") {
                retry = value.trim().parse::<usize>().ok();
            } else if let Some(value) = line.strip_prefix(':') {
                comment = Some(value.trim().to_string());
            } else if let Some(value) = line.strip_prefix("data:") {
                data_lines.push(value.trim());
            }
        }

        let data = match data_lines.is_empty() {
            true => None,
            false => Some(serde_json::from_str(&data_lines.join("\n"))?),
        };

        Ok(ServerSentEvent {
            id,
            event,
            retry,
            comment,
            data,
        })
    }
}

/// Splits complete event blocks off the front of `buffer`, leaving a trailing partial block in place.
///
/// Only complete blocks are decoded, so a character split across network chunks stays intact.
pub fn drain_blocks(buffer: &mut Vec<u8>) -> Vec<String> {
    let normalized = normalize_line_endings(buffer);
    let Some(end) = normalized.windows(2).rposition(|w| w == b"\n\n") else {
        *buffer = normalized;
        return Vec::new();
    };

    let complete = String::from_utf8_lossy(&normalized[..end]);
    let blocks = complete.split("\n\n").filter(|b| !b.trim().is_empty()).map(str::to_string).collect();
    *buffer = normalized[end + 2..].to_vec();
    blocks
}

// A trailing '\r' is kept until its '\n' arrives
fn normalize_line_endings(bytes: &[u8]) -> Vec<u8> {
    let mut normalized = Vec::with_capacity(bytes.len());
    let mut iter = bytes.iter().peekable();
    while let Some(&byte) = iter.next() {
        if byte == b'\r' && iter.peek() == Some(&&b'\n') {
            continue;
        }
        normalized.push(byte);
    }
    normalized
}
