//! Terminal output formatting.

use colored::{ColoredString, Colorize};
use geosight_core::AnalysisResult;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Zoom level used for map links, matching the web map.
const MAP_ZOOM: u8 = 6;

/// Print an analysis result.
pub fn print_result(result: &AnalysisResult, show_thoughts: bool) {
    let width = term_width().min(100);
    let body_width = width.saturating_sub(4).max(20);

    println!();
    let mut heading = result.country.cyan().bold().to_string();
    if let Some(region) = result.region_label() {
        heading.push_str(&format!(" {}", format!("· {}", region).dimmed()));
    }
    println!("  {}  {}", heading, confidence_badge(result.confidence));
    println!(
        "  {} {:.4}, {:.4}",
        "◎".green(),
        result.latitude,
        result.longitude
    );
    if result.has_finite_coordinates() {
        println!(
            "  {} {}",
            "→".dimmed(),
            map_link(result.latitude, result.longitude).underline()
        );
    }

    if !result.visual_cues.is_empty() {
        println!();
        println!("  {}", "Visual cues".bold());
        for cue in &result.visual_cues {
            let cue = truncate_visual(cue, body_width.saturating_sub(2));
            println!("  {} {}", "•".blue(), cue);
        }
    }

    println!();
    println!("  {}", "Analysis".bold());
    for line in wrap(&result.explanation, body_width) {
        println!("  {}", line);
    }

    if show_thoughts {
        println!();
        println!("  {}", "Thought process".bold());
        for line in wrap(&result.thought_process, body_width) {
            println!("  {}", line.dimmed());
        }
    }
    println!();
}

/// OpenStreetMap link centred on the estimate.
pub fn map_link(latitude: f64, longitude: f64) -> String {
    format!(
        "https://www.openstreetmap.org/?mlat={lat:.4}&mlon={lon:.4}#map={zoom}/{lat:.4}/{lon:.4}",
        lat = latitude,
        lon = longitude,
        zoom = MAP_ZOOM
    )
}

/// Human-readable byte count.
pub fn format_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;

    let bytes_f = bytes as f64;
    if bytes_f >= MB {
        format!("{:.1} MB", bytes_f / MB)
    } else if bytes_f >= KB {
        format!("{:.1} KB", bytes_f / KB)
    } else {
        format!("{} B", bytes)
    }
}

fn confidence_badge(confidence: f64) -> ColoredString {
    let label = format!("{:.0}%", confidence);
    if confidence >= 70.0 {
        label.green().bold()
    } else if confidence >= 40.0 {
        label.yellow().bold()
    } else {
        label.red().bold()
    }
}

/// Get terminal width, defaulting to 80.
fn term_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}

/// Truncate a string respecting visual width.
fn truncate_visual(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut result = String::new();
    let mut current_width = 0;
    for ch in s.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if current_width + ch_width > max_width - 2 {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }
    result.push_str("..");
    result
}

/// Wrap text to a visual width.
///
/// Breaks at whitespace where possible; runs without spaces (CJK text) are
/// broken at character boundaries. Existing line breaks are kept.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        let mut line_width = 0;

        for word in paragraph.split_whitespace() {
            let word_width = UnicodeWidthStr::width(word);
            let sep = usize::from(!line.is_empty());

            if line_width + sep + word_width <= width {
                if sep == 1 {
                    line.push(' ');
                }
                line.push_str(word);
                line_width += sep + word_width;
                continue;
            }

            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
            }
            for ch in word.chars() {
                let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
                if line_width + ch_width > width && !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                    line_width = 0;
                }
                line.push(ch);
                line_width += ch_width;
            }
        }

        lines.push(line);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_link() {
        assert_eq!(
            map_link(48.858_37, 2.294_48),
            "https://www.openstreetmap.org/?mlat=48.8584&mlon=2.2945#map=6/48.8584/2.2945"
        );
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_truncate_visual() {
        assert_eq!(truncate_visual("short", 10), "short");
        assert_eq!(truncate_visual("a longer cue", 8), "a long..");
        // Wide characters count double
        assert_eq!(truncate_visual("東京都渋谷区", 6), "東京..");
    }

    #[test]
    fn test_wrap_words() {
        let lines = wrap("the quick brown fox jumps", 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn test_wrap_wide_characters() {
        let lines = wrap("法国巴黎街景", 4);
        assert_eq!(lines, vec!["法国", "巴黎", "街景"]);
        for line in &lines {
            assert!(UnicodeWidthStr::width(line.as_str()) <= 4);
        }
    }

    #[test]
    fn test_wrap_keeps_paragraphs() {
        let lines = wrap("first\n\nsecond", 20);
        assert_eq!(lines, vec!["first", "", "second"]);
    }
}
