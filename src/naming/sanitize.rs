//! Filesystem-safe names and title heuristics

use crate::types::WorkMetadata;
use regex::Captures;
use once_cell::sync::Lazy;
use regex::Regex;

/// Characters Windows refuses in file names
const RESERVED: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];
/// Fullwidth counterparts, index-aligned with `RESERVED`
const FULLWIDTH: [char; 9] = ['＼', '／', '：', '＊', '？', '＂', '＜', '＞', '｜'];

static BRACKET_SPAN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"【.*?】").expect("bracket regex should compile"));

static FILE_TITLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d*[_.、\s]*(.+)\.\w+$").expect("file title regex should compile")
});

static TEMPLATE_FIELD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"rjcode|maker_name|work_name|cv_list_str|release_date")
        .expect("template field regex should compile")
});

static FOLDER_TITLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d*[_.、\s]*(.+)$").expect("folder title regex should compile")
});

/// Make `text` safe to use as a single path component
///
/// Reserved characters become their fullwidth forms when `to_fullwidth` is
/// set and are dropped otherwise. Surrounding whitespace is trimmed.
pub fn sanitize(text: &str, to_fullwidth: bool) -> String {
    let mapped: String = if to_fullwidth {
        text.chars()
            .map(|ch| match RESERVED.iter().position(|&r| r == ch) {
                Some(i) => FULLWIDTH[i],
                None => ch,
            })
            .collect()
    } else {
        text.chars().filter(|ch| !RESERVED.contains(ch)).collect()
    };
    mapped.trim().to_string()
}

/// Strip `【...】` spans from a work title when `exclude_brackets` is set
pub fn clean_title(text: &str, exclude_brackets: bool) -> String {
    if exclude_brackets {
        BRACKET_SPAN_REGEX.replace_all(text, "").trim().to_string()
    } else {
        text.to_string()
    }
}

/// Track title from a file name: leading track number and separators and
/// the extension are removed ("01_Intro.flac" -> "Intro")
pub fn sniff_title(file_name: &str) -> Option<String> {
    FILE_TITLE_REGEX
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Disc subtitle candidate from a folder name ("02. Bonus" -> "Bonus")
pub fn sniff_disc_subtitle(folder_name: &str) -> Option<String> {
    FOLDER_TITLE_REGEX
        .captures(folder_name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Fill a renamer template with a work's metadata
///
/// Recognized placeholders: `rjcode`, `maker_name`, `work_name`,
/// `cv_list_str`, `release_date`. Substitution is a single pass, so values
/// containing placeholder words are left alone. The result is sanitized.
pub fn render_template(
    template: &str,
    metadata: &WorkMetadata,
    delimiter: &str,
    exclude_brackets: bool,
    to_fullwidth: bool,
) -> String {
    let work_name = clean_title(&metadata.work_name, exclude_brackets);
    let cv_list = metadata.cvs.join(delimiter);
    let rendered = TEMPLATE_FIELD_REGEX.replace_all(template, |caps: &Captures| {
        let value = match &caps[0] {
            "rjcode" => &metadata.product_code,
            "maker_name" => &metadata.maker_name,
            "work_name" => &work_name,
            "cv_list_str" => &cv_list,
            _ => &metadata.release_date,
        };
        value.clone()
    });
    sanitize(&rendered, to_fullwidth)
}
