use chrono::{DateTime, Utc};

/// Directory used when the uploader's identity cannot be resolved
pub const FALLBACK_DIR: &str = "temp";

const MAX_BASENAME_CHARS: usize = 100;

/// Where an accepted upload lands, relative to the upload root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Slash-separated, e.g. "d/dupont-jean/2024-03-01" or "temp"
    pub relative_dir: String,
    pub filename: String,
}

impl Placement {
    /// Derive the placement for `original_name` uploaded by `owner` ("last", "first") at `now`.
    /// Without a usable owner name the file goes to the fallback directory.
    pub fn resolve(owner: Option<(&str, &str)>, original_name: &str, now: DateTime<Utc>) -> Self {
        let filename = stored_filename(original_name, now.timestamp_millis());

        let relative_dir = owner
            .and_then(|(last, first)| owner_dir(last, first, now))
            .unwrap_or_else(|| FALLBACK_DIR.to_string());

        Self { relative_dir, filename }
    }

    pub fn relative_path(&self) -> String {
        format!("{}/{}", self.relative_dir, self.filename)
    }
}

fn owner_dir(last: &str, first: &str, now: DateTime<Utc>) -> Option<String> {
    let letter = normalize_name(last).chars().next()?;
    let name = normalize_name(&format!("{}-{}", last, first));
    if name.is_empty() {
        return None;
    }
    Some(format!("{}/{}/{}", letter, name, now.format("%Y-%m-%d")))
}

/// Lowercase ASCII slug: accents folded, anything outside [a-z0-9-] becomes '-', dashes collapsed
pub fn normalize_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars().flat_map(char::to_lowercase) {
        if c.is_ascii() {
            push_slug_char(&mut out, c);
        } else {
            fold_accent(c).chars().for_each(|f| push_slug_char(&mut out, f));
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

fn push_slug_char(out: &mut String, c: char) {
    let mapped = if c.is_ascii_lowercase() || c.is_ascii_digit() { c } else { '-' };
    if mapped == '-' && (out.is_empty() || out.ends_with('-')) {
        return;
    }
    out.push(mapped);
}

/// `<basename>-<millis>.<ext>` with the basename reduced to [A-Za-z0-9_-]
pub fn stored_filename(original_name: &str, millis: i64) -> String {
    // Browsers on some platforms send the full client path
    let name = original_name
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(original_name);

    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => (stem, Some(ext.to_ascii_lowercase())),
        _ => (name, None),
    };

    let mut base: String = stem
        .chars()
        .take(MAX_BASENAME_CHARS)
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if base.is_empty() {
        base = "document".to_string();
    }

    match ext {
        Some(ext) => format!("{}-{}.{}", base, millis, ext),
        None => format!("{}-{}", base, millis),
    }
}

fn fold_accent(c: char) -> &'static str {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'č' | 'ĉ' | 'ċ' => "c",
        'ď' | 'đ' | 'ð' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => "e",
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => "g",
        'ĥ' | 'ħ' => "h",
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => "i",
        'ĵ' => "j",
        'ķ' => "k",
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => "l",
        'ñ' | 'ń' | 'ņ' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => "o",
        'œ' => "oe",
        'ŕ' | 'ŗ' | 'ř' => "r",
        'ś' | 'ŝ' | 'ş' | 'š' => "s",
        'ß' => "ss",
        'ţ' | 'ť' | 'ŧ' => "t",
        'þ' => "th",
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => "u",
        'ŵ' => "w",
        'ý' | 'ÿ' | 'ŷ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => "-",
    }
}
